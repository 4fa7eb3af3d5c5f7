use chrono::{DateTime, Utc};
use sqlx::{PgExecutor, Postgres, QueryBuilder, Result as SqlxResult};
use uuid::Uuid;

use crate::models::{ContentType, SessionRow, SessionStatus};

const SESSION_COLUMNS: &str = "id, content_type, title, starts_at, status, editor_token, \
     admin_token, is_admin_unlocked, created_at, updated_at";

#[derive(Debug, Clone)]
pub struct CreateSession {
    pub id: Uuid,
    pub content_type: ContentType,
    pub title: Option<String>,
    pub starts_at: DateTime<Utc>,
    pub editor_token: String,
    pub admin_token: String,
}

#[derive(Debug, Clone)]
pub struct UpdateSessionInfo {
    pub content_type: ContentType,
    pub title: Option<String>,
    pub starts_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Default)]
pub struct SessionFilter {
    /// Sessions the caller may see; empty matches nothing.
    pub ids: Vec<Uuid>,
    pub content_type: Option<ContentType>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionOrderColumn {
    /// Distance between `starts_at` and now, either direction.
    DateProximity,
    StartsAt,
    /// Lifecycle order: SCHEDULED, CONFIRMED, DONE.
    StatusPriority,
    CreatedAt,
}

impl SessionOrderColumn {
    fn sql(self) -> &'static str {
        match self {
            SessionOrderColumn::DateProximity => "ABS(EXTRACT(EPOCH FROM (starts_at - NOW())))",
            SessionOrderColumn::StartsAt => "starts_at",
            SessionOrderColumn::StatusPriority => "status",
            SessionOrderColumn::CreatedAt => "created_at",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionOrder {
    pub column: SessionOrderColumn,
    pub descending: bool,
}

pub async fn create<'e>(
    executor: impl PgExecutor<'e>,
    data: CreateSession,
) -> SqlxResult<SessionRow> {
    sqlx::query_as::<_, SessionRow>(&format!(
        r#"
        INSERT INTO sessions (id, content_type, title, starts_at, editor_token, admin_token)
        VALUES ($1, $2, $3, $4, $5, $6)
        RETURNING {SESSION_COLUMNS}
        "#
    ))
    .bind(data.id)
    .bind(data.content_type)
    .bind(data.title)
    .bind(data.starts_at)
    .bind(data.editor_token)
    .bind(data.admin_token)
    .fetch_one(executor)
    .await
}

pub async fn get_by_id<'e>(
    executor: impl PgExecutor<'e>,
    id: Uuid,
) -> SqlxResult<Option<SessionRow>> {
    sqlx::query_as::<_, SessionRow>(&format!(
        "SELECT {SESSION_COLUMNS} FROM sessions WHERE id = $1"
    ))
    .bind(id)
    .fetch_optional(executor)
    .await
}

/// Ordered by `order`, then id in the direction of the last key. Without an
/// order: start time, then status, then id.
pub async fn list<'e>(
    executor: impl PgExecutor<'e>,
    filter: &SessionFilter,
    order: &[SessionOrder],
) -> SqlxResult<Vec<SessionRow>> {
    let mut query = QueryBuilder::<Postgres>::new(format!(
        "SELECT {SESSION_COLUMNS} FROM sessions WHERE id = ANY("
    ));
    query.push_bind(filter.ids.clone());
    query.push(")");

    if let Some(content_type) = filter.content_type {
        query.push(" AND content_type = ");
        query.push_bind(content_type);
    }

    query.push(" ORDER BY ");
    if order.is_empty() {
        query.push("starts_at ASC, status ASC, id ASC");
    } else {
        for key in order {
            query.push(key.column.sql());
            query.push(if key.descending { " DESC, " } else { " ASC, " });
        }
        let last_descending = order.last().is_some_and(|key| key.descending);
        query.push(if last_descending { "id DESC" } else { "id ASC" });
    }

    let rows = query.build_query_as::<SessionRow>().fetch_all(executor).await?;
    Ok(rows)
}

/// Bumps `updated_at` after a change to a child row.
pub async fn touch<'e>(executor: impl PgExecutor<'e>, id: Uuid) -> SqlxResult<SessionRow> {
    sqlx::query_as::<_, SessionRow>(&format!(
        "UPDATE sessions SET updated_at = NOW() WHERE id = $1 RETURNING {SESSION_COLUMNS}"
    ))
    .bind(id)
    .fetch_one(executor)
    .await
}

/// Locks the session row; every structural change to a session goes through this.
pub async fn get_by_id_for_update<'e>(
    executor: impl PgExecutor<'e>,
    id: Uuid,
) -> SqlxResult<Option<SessionRow>> {
    sqlx::query_as::<_, SessionRow>(&format!(
        "SELECT {SESSION_COLUMNS} FROM sessions WHERE id = $1 FOR UPDATE"
    ))
    .bind(id)
    .fetch_optional(executor)
    .await
}

pub async fn update_status<'e>(
    executor: impl PgExecutor<'e>,
    id: Uuid,
    status: SessionStatus,
) -> SqlxResult<SessionRow> {
    sqlx::query_as::<_, SessionRow>(&format!(
        r#"
        UPDATE sessions
        SET status = $2, updated_at = NOW()
        WHERE id = $1
        RETURNING {SESSION_COLUMNS}
        "#
    ))
    .bind(id)
    .bind(status)
    .fetch_one(executor)
    .await
}

pub async fn update_info<'e>(
    executor: impl PgExecutor<'e>,
    id: Uuid,
    data: UpdateSessionInfo,
) -> SqlxResult<SessionRow> {
    sqlx::query_as::<_, SessionRow>(&format!(
        r#"
        UPDATE sessions
        SET content_type = $2, title = $3, starts_at = $4, updated_at = NOW()
        WHERE id = $1
        RETURNING {SESSION_COLUMNS}
        "#
    ))
    .bind(id)
    .bind(data.content_type)
    .bind(data.title)
    .bind(data.starts_at)
    .fetch_one(executor)
    .await
}

pub async fn set_admin_unlocked<'e>(
    executor: impl PgExecutor<'e>,
    id: Uuid,
    is_admin_unlocked: bool,
) -> SqlxResult<SessionRow> {
    sqlx::query_as::<_, SessionRow>(&format!(
        r#"
        UPDATE sessions
        SET is_admin_unlocked = $2, updated_at = NOW()
        WHERE id = $1
        RETURNING {SESSION_COLUMNS}
        "#
    ))
    .bind(id)
    .bind(is_admin_unlocked)
    .fetch_one(executor)
    .await
}

/// Hard delete. Children go with it through ON DELETE CASCADE.
pub async fn delete<'e>(executor: impl PgExecutor<'e>, id: Uuid) -> SqlxResult<u64> {
    let result = sqlx::query("DELETE FROM sessions WHERE id = $1")
        .bind(id)
        .execute(executor)
        .await?;
    Ok(result.rows_affected())
}
