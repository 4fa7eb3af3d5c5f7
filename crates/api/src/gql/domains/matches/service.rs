use serde_json::json;
use sqlx::{PgConnection, PgPool};
use uuid::Uuid;

use crate::auth::{assert_session_access, AuthContext};
use crate::domain::lifecycle::{
    ensure_match_confirmable, ensure_match_deletable, ensure_structure_change_allowed,
};
use crate::domain::{DomainError, Lane, Side};
use infra::models::MatchRow;
use infra::repos::{
    attachments, background_jobs, match_team_members, matches, sessions, team_preset_members,
};

pub async fn get_match(
    pool: &PgPool,
    auth: &AuthContext,
    match_id: Uuid,
) -> Result<MatchRow, DomainError> {
    let row = matches::get_by_id(pool, match_id)
        .await?
        .ok_or(DomainError::MatchNotFound)?;
    assert_session_access(auth, row.session_id)?;
    Ok(row)
}

/// Locks the match row, then checks the caller may touch its session.
async fn lock_match(
    conn: &mut PgConnection,
    auth: &AuthContext,
    match_id: Uuid,
) -> Result<MatchRow, DomainError> {
    let row = matches::get_by_id_for_update(conn, match_id)
        .await?
        .ok_or(DomainError::MatchNotFound)?;
    assert_session_access(auth, row.session_id)?;
    Ok(row)
}

/// Snapshots the session's team preset into a new DRAFT match.
pub async fn create_match_from_preset(
    pool: &PgPool,
    auth: &AuthContext,
    session_id: Uuid,
) -> Result<MatchRow, DomainError> {
    assert_session_access(auth, session_id)?;

    let mut tx = pool.begin().await?;

    let session = sessions::get_by_id_for_update(&mut *tx, session_id)
        .await?
        .ok_or(DomainError::SessionNotFound)?;
    let attachment_count = attachments::count_by_session(&mut *tx, session_id).await?;
    ensure_structure_change_allowed(attachment_count, session.is_admin_unlocked)?;

    let preset = team_preset_members::list_by_session(&mut *tx, session_id).await?;
    let match_no = matches::next_match_no(&mut *tx, session_id).await?;
    let created = matches::create(&mut *tx, session_id, match_no).await?;
    for member in &preset {
        match_team_members::create(&mut *tx, created.id, member.friend_id, member.team, member.lane)
            .await?;
    }

    tx.commit().await?;

    tracing::info!(
        session_id = %session_id,
        match_id = %created.id,
        match_no,
        members = preset.len(),
        "match created from preset"
    );
    Ok(created)
}

/// No-op when the friend does not play in the match.
pub async fn set_lane(
    pool: &PgPool,
    auth: &AuthContext,
    match_id: Uuid,
    friend_id: Uuid,
    lane: Lane,
) -> Result<MatchRow, DomainError> {
    let mut tx = pool.begin().await?;

    let row = lock_match(&mut tx, auth, match_id).await?;
    match_team_members::set_lane(&mut *tx, match_id, friend_id, lane.into()).await?;

    tx.commit().await?;
    Ok(row)
}

/// No-op when the friend does not play in the match.
pub async fn set_champion(
    pool: &PgPool,
    auth: &AuthContext,
    match_id: Uuid,
    friend_id: Uuid,
    champion: Option<String>,
) -> Result<MatchRow, DomainError> {
    let mut tx = pool.begin().await?;

    let row = lock_match(&mut tx, auth, match_id).await?;
    match_team_members::set_champion(&mut *tx, match_id, friend_id, champion).await?;

    tx.commit().await?;
    Ok(row)
}

/// DRAFT -> COMPLETED, exactly once.
pub async fn confirm_match_result(
    pool: &PgPool,
    auth: &AuthContext,
    match_id: Uuid,
    winner_side: Side,
    team_a_side: Side,
) -> Result<MatchRow, DomainError> {
    let mut tx = pool.begin().await?;

    let row = lock_match(&mut tx, auth, match_id).await?;
    ensure_match_confirmable(row.status.into(), row.is_confirmed)?;
    let confirmed =
        matches::confirm_result(&mut *tx, match_id, winner_side.into(), team_a_side.into())
            .await?;

    tx.commit().await?;

    tracing::info!(match_id = %match_id, winner_side = %winner_side, "match result confirmed");
    Ok(confirmed)
}

pub async fn delete_match(
    pool: &PgPool,
    auth: &AuthContext,
    match_id: Uuid,
) -> Result<(), DomainError> {
    let mut tx = pool.begin().await?;

    let row = lock_match(&mut tx, auth, match_id).await?;
    ensure_match_deletable(row.is_confirmed)?;

    let keys = attachments::list_keys_by_match(&mut *tx, match_id).await?;
    matches::delete(&mut *tx, match_id).await?;
    if !keys.is_empty() {
        background_jobs::enqueue(
            &mut *tx,
            background_jobs::CLEANUP_STORAGE_OBJECTS,
            json!({ "s3Keys": keys }),
        )
        .await?;
    }

    tx.commit().await?;

    tracing::info!(match_id = %match_id, "match deleted");
    Ok(())
}
