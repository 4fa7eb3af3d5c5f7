use sqlx::{PgExecutor, Result as SqlxResult};
use uuid::Uuid;

use crate::models::{Lane, Team, TeamPresetMemberRow};

const PRESET_COLUMNS: &str = "id, session_id, friend_id, team, lane, created_at, updated_at";

pub async fn list_by_session<'e>(
    executor: impl PgExecutor<'e>,
    session_id: Uuid,
) -> SqlxResult<Vec<TeamPresetMemberRow>> {
    sqlx::query_as::<_, TeamPresetMemberRow>(&format!(
        r#"
        SELECT {PRESET_COLUMNS}
        FROM team_preset_members
        WHERE session_id = $1
        ORDER BY team ASC, created_at ASC, id ASC
        "#
    ))
    .bind(session_id)
    .fetch_all(executor)
    .await
}

/// Inserts the member or moves an existing one to the given team and lane.
pub async fn upsert<'e>(
    executor: impl PgExecutor<'e>,
    session_id: Uuid,
    friend_id: Uuid,
    team: Team,
    lane: Lane,
) -> SqlxResult<TeamPresetMemberRow> {
    sqlx::query_as::<_, TeamPresetMemberRow>(&format!(
        r#"
        INSERT INTO team_preset_members (id, session_id, friend_id, team, lane)
        VALUES ($1, $2, $3, $4, $5)
        ON CONFLICT (session_id, friend_id)
        DO UPDATE SET team = EXCLUDED.team, lane = EXCLUDED.lane, updated_at = NOW()
        RETURNING {PRESET_COLUMNS}
        "#
    ))
    .bind(Uuid::now_v7())
    .bind(session_id)
    .bind(friend_id)
    .bind(team)
    .bind(lane)
    .fetch_one(executor)
    .await
}

pub async fn delete<'e>(
    executor: impl PgExecutor<'e>,
    session_id: Uuid,
    friend_id: Uuid,
) -> SqlxResult<u64> {
    let result =
        sqlx::query("DELETE FROM team_preset_members WHERE session_id = $1 AND friend_id = $2")
            .bind(session_id)
            .bind(friend_id)
            .execute(executor)
            .await?;
    Ok(result.rows_affected())
}
