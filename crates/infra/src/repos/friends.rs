use sqlx::{PgExecutor, Result as SqlxResult};
use uuid::Uuid;

use crate::models::FriendRow;

const FRIEND_COLUMNS: &str =
    "id, display_name, riot_game_name, riot_tag_line, is_archived, created_at, updated_at";

#[derive(Debug, Clone, Default)]
pub struct FriendFilter {
    /// Case-insensitive substring match on display name or Riot game name.
    pub query: Option<String>,
    pub include_archived: bool,
}

#[derive(Debug, Clone)]
pub struct CreateFriend {
    pub display_name: String,
    pub riot_game_name: Option<String>,
    pub riot_tag_line: Option<String>,
}

/// Full replacement of the editable friend profile.
#[derive(Debug, Clone)]
pub struct UpdateFriend {
    pub display_name: String,
    pub riot_game_name: Option<String>,
    pub riot_tag_line: Option<String>,
}

pub async fn list<'e>(
    executor: impl PgExecutor<'e>,
    filter: &FriendFilter,
) -> SqlxResult<Vec<FriendRow>> {
    let pattern = filter
        .query
        .as_deref()
        .map(str::trim)
        .filter(|q| !q.is_empty())
        .map(|q| format!("%{}%", q.replace('%', "\\%").replace('_', "\\_")));

    sqlx::query_as::<_, FriendRow>(&format!(
        r#"
        SELECT {FRIEND_COLUMNS}
        FROM friends
        WHERE ($1::boolean OR is_archived = FALSE)
          AND ($2::text IS NULL OR display_name ILIKE $2 OR riot_game_name ILIKE $2)
        ORDER BY display_name ASC, id ASC
        "#
    ))
    .bind(filter.include_archived)
    .bind(pattern)
    .fetch_all(executor)
    .await
}

pub async fn list_active_ids<'e>(executor: impl PgExecutor<'e>) -> SqlxResult<Vec<Uuid>> {
    sqlx::query_scalar::<_, Uuid>(
        r#"
        SELECT id
        FROM friends
        WHERE is_archived = FALSE
        ORDER BY display_name ASC, id ASC
        "#,
    )
    .fetch_all(executor)
    .await
}

pub async fn get_by_id<'e>(
    executor: impl PgExecutor<'e>,
    id: Uuid,
) -> SqlxResult<Option<FriendRow>> {
    sqlx::query_as::<_, FriendRow>(&format!(
        "SELECT {FRIEND_COLUMNS} FROM friends WHERE id = $1"
    ))
    .bind(id)
    .fetch_optional(executor)
    .await
}

/// Same as `get_by_id` but locks the row for the rest of the transaction.
pub async fn get_by_id_for_update<'e>(
    executor: impl PgExecutor<'e>,
    id: Uuid,
) -> SqlxResult<Option<FriendRow>> {
    sqlx::query_as::<_, FriendRow>(&format!(
        "SELECT {FRIEND_COLUMNS} FROM friends WHERE id = $1 FOR UPDATE"
    ))
    .bind(id)
    .fetch_optional(executor)
    .await
}

pub async fn get_by_ids<'e>(
    executor: impl PgExecutor<'e>,
    ids: &[Uuid],
) -> SqlxResult<Vec<FriendRow>> {
    sqlx::query_as::<_, FriendRow>(&format!(
        "SELECT {FRIEND_COLUMNS} FROM friends WHERE id = ANY($1::uuid[])"
    ))
    .bind(ids)
    .fetch_all(executor)
    .await
}

pub async fn create<'e>(
    executor: impl PgExecutor<'e>,
    data: CreateFriend,
) -> SqlxResult<FriendRow> {
    sqlx::query_as::<_, FriendRow>(&format!(
        r#"
        INSERT INTO friends (id, display_name, riot_game_name, riot_tag_line)
        VALUES ($1, $2, $3, $4)
        RETURNING {FRIEND_COLUMNS}
        "#
    ))
    .bind(Uuid::now_v7())
    .bind(data.display_name)
    .bind(data.riot_game_name)
    .bind(data.riot_tag_line)
    .fetch_one(executor)
    .await
}

pub async fn update<'e>(
    executor: impl PgExecutor<'e>,
    id: Uuid,
    data: UpdateFriend,
) -> SqlxResult<Option<FriendRow>> {
    sqlx::query_as::<_, FriendRow>(&format!(
        r#"
        UPDATE friends
        SET display_name = $2, riot_game_name = $3, riot_tag_line = $4, updated_at = NOW()
        WHERE id = $1
        RETURNING {FRIEND_COLUMNS}
        "#
    ))
    .bind(id)
    .bind(data.display_name)
    .bind(data.riot_game_name)
    .bind(data.riot_tag_line)
    .fetch_optional(executor)
    .await
}

pub async fn set_archived<'e>(
    executor: impl PgExecutor<'e>,
    id: Uuid,
    is_archived: bool,
) -> SqlxResult<Option<FriendRow>> {
    sqlx::query_as::<_, FriendRow>(&format!(
        r#"
        UPDATE friends
        SET is_archived = $2, updated_at = NOW()
        WHERE id = $1
        RETURNING {FRIEND_COLUMNS}
        "#
    ))
    .bind(id)
    .bind(is_archived)
    .fetch_optional(executor)
    .await
}
