use chrono::{DateTime, Utc};
use sqlx::{PgExecutor, Result as SqlxResult};
use uuid::Uuid;

use crate::models::{ConfirmedMatchMemberRow, MatchRow, Side};

const MATCH_COLUMNS: &str = "id, session_id, match_no, status, winner_side, team_a_side, \
     is_confirmed, created_at, updated_at";

/// Window over confirmed matches used by statistics.
#[derive(Debug, Clone, Default)]
pub struct ConfirmedMatchFilter {
    /// Only matches this friend played in.
    pub friend_id: Option<Uuid>,
    pub start_date: Option<DateTime<Utc>>,
    pub end_date: Option<DateTime<Utc>>,
}

/// Allocates the next match number inside the caller's transaction.
/// Callers hold the session row lock, so numbers stay dense per session.
pub async fn next_match_no<'e>(
    executor: impl PgExecutor<'e>,
    session_id: Uuid,
) -> SqlxResult<i32> {
    sqlx::query_scalar::<_, i32>(
        "SELECT COALESCE(MAX(match_no), 0) + 1 FROM matches WHERE session_id = $1",
    )
    .bind(session_id)
    .fetch_one(executor)
    .await
}

pub async fn create<'e>(
    executor: impl PgExecutor<'e>,
    session_id: Uuid,
    match_no: i32,
) -> SqlxResult<MatchRow> {
    sqlx::query_as::<_, MatchRow>(&format!(
        r#"
        INSERT INTO matches (id, session_id, match_no)
        VALUES ($1, $2, $3)
        RETURNING {MATCH_COLUMNS}
        "#
    ))
    .bind(Uuid::now_v7())
    .bind(session_id)
    .bind(match_no)
    .fetch_one(executor)
    .await
}

pub async fn get_by_id<'e>(
    executor: impl PgExecutor<'e>,
    id: Uuid,
) -> SqlxResult<Option<MatchRow>> {
    sqlx::query_as::<_, MatchRow>(&format!(
        "SELECT {MATCH_COLUMNS} FROM matches WHERE id = $1"
    ))
    .bind(id)
    .fetch_optional(executor)
    .await
}

pub async fn get_by_id_for_update<'e>(
    executor: impl PgExecutor<'e>,
    id: Uuid,
) -> SqlxResult<Option<MatchRow>> {
    sqlx::query_as::<_, MatchRow>(&format!(
        "SELECT {MATCH_COLUMNS} FROM matches WHERE id = $1 FOR UPDATE"
    ))
    .bind(id)
    .fetch_optional(executor)
    .await
}

pub async fn list_by_session<'e>(
    executor: impl PgExecutor<'e>,
    session_id: Uuid,
) -> SqlxResult<Vec<MatchRow>> {
    sqlx::query_as::<_, MatchRow>(&format!(
        "SELECT {MATCH_COLUMNS} FROM matches WHERE session_id = $1 ORDER BY match_no ASC"
    ))
    .bind(session_id)
    .fetch_all(executor)
    .await
}

pub async fn count_by_session<'e>(
    executor: impl PgExecutor<'e>,
    session_id: Uuid,
) -> SqlxResult<i64> {
    sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM matches WHERE session_id = $1")
        .bind(session_id)
        .fetch_one(executor)
        .await
}

pub async fn confirm_result<'e>(
    executor: impl PgExecutor<'e>,
    id: Uuid,
    winner_side: Side,
    team_a_side: Side,
) -> SqlxResult<MatchRow> {
    sqlx::query_as::<_, MatchRow>(&format!(
        r#"
        UPDATE matches
        SET status = 'COMPLETED', winner_side = $2, team_a_side = $3,
            is_confirmed = TRUE, updated_at = NOW()
        WHERE id = $1
        RETURNING {MATCH_COLUMNS}
        "#
    ))
    .bind(id)
    .bind(winner_side)
    .bind(team_a_side)
    .fetch_one(executor)
    .await
}

pub async fn delete<'e>(executor: impl PgExecutor<'e>, id: Uuid) -> SqlxResult<u64> {
    let result = sqlx::query("DELETE FROM matches WHERE id = $1")
        .bind(id)
        .execute(executor)
        .await?;
    Ok(result.rows_affected())
}

/// Every participant of every confirmed match in the window, one row per member.
pub async fn list_confirmed_members<'e>(
    executor: impl PgExecutor<'e>,
    filter: &ConfirmedMatchFilter,
) -> SqlxResult<Vec<ConfirmedMatchMemberRow>> {
    sqlx::query_as::<_, ConfirmedMatchMemberRow>(
        r#"
        SELECT m.id AS match_id, m.winner_side, m.team_a_side,
               mtm.friend_id, mtm.team, mtm.lane, mtm.champion
        FROM matches m
        JOIN match_team_members mtm ON mtm.match_id = m.id
        WHERE m.is_confirmed = TRUE
          AND ($1::uuid IS NULL OR mtm.friend_id = $1)
          AND ($2::timestamptz IS NULL OR m.created_at >= $2)
          AND ($3::timestamptz IS NULL OR m.created_at <= $3)
        ORDER BY m.created_at ASC, m.id ASC, mtm.id ASC
        "#,
    )
    .bind(filter.friend_id)
    .bind(filter.start_date)
    .bind(filter.end_date)
    .fetch_all(executor)
    .await
}
