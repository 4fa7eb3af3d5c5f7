use sqlx::{PgExecutor, Result as SqlxResult};
use uuid::Uuid;

use crate::models::{Lane, MatchTeamMemberRow, Team};

const MEMBER_COLUMNS: &str =
    "id, match_id, friend_id, team, lane, champion, created_at, updated_at";

pub async fn create<'e>(
    executor: impl PgExecutor<'e>,
    match_id: Uuid,
    friend_id: Uuid,
    team: Team,
    lane: Lane,
) -> SqlxResult<MatchTeamMemberRow> {
    sqlx::query_as::<_, MatchTeamMemberRow>(&format!(
        r#"
        INSERT INTO match_team_members (id, match_id, friend_id, team, lane)
        VALUES ($1, $2, $3, $4, $5)
        RETURNING {MEMBER_COLUMNS}
        "#
    ))
    .bind(Uuid::now_v7())
    .bind(match_id)
    .bind(friend_id)
    .bind(team)
    .bind(lane)
    .fetch_one(executor)
    .await
}

pub async fn list_by_match<'e>(
    executor: impl PgExecutor<'e>,
    match_id: Uuid,
) -> SqlxResult<Vec<MatchTeamMemberRow>> {
    sqlx::query_as::<_, MatchTeamMemberRow>(&format!(
        r#"
        SELECT {MEMBER_COLUMNS}
        FROM match_team_members
        WHERE match_id = $1
        ORDER BY team ASC, created_at ASC, id ASC
        "#
    ))
    .bind(match_id)
    .fetch_all(executor)
    .await
}

/// Returns `None` when the friend does not play in the match.
pub async fn set_lane<'e>(
    executor: impl PgExecutor<'e>,
    match_id: Uuid,
    friend_id: Uuid,
    lane: Lane,
) -> SqlxResult<Option<MatchTeamMemberRow>> {
    sqlx::query_as::<_, MatchTeamMemberRow>(&format!(
        r#"
        UPDATE match_team_members
        SET lane = $3, updated_at = NOW()
        WHERE match_id = $1 AND friend_id = $2
        RETURNING {MEMBER_COLUMNS}
        "#
    ))
    .bind(match_id)
    .bind(friend_id)
    .bind(lane)
    .fetch_optional(executor)
    .await
}

pub async fn set_champion<'e>(
    executor: impl PgExecutor<'e>,
    match_id: Uuid,
    friend_id: Uuid,
    champion: Option<String>,
) -> SqlxResult<Option<MatchTeamMemberRow>> {
    sqlx::query_as::<_, MatchTeamMemberRow>(&format!(
        r#"
        UPDATE match_team_members
        SET champion = $3, updated_at = NOW()
        WHERE match_id = $1 AND friend_id = $2
        RETURNING {MEMBER_COLUMNS}
        "#
    ))
    .bind(match_id)
    .bind(friend_id)
    .bind(champion)
    .fetch_optional(executor)
    .await
}
