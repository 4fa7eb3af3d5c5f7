//! Session workflows. Resolvers authenticate and decode ids; everything
//! that reads a guard and then writes runs in one transaction with the
//! session row locked.

use serde_json::json;
use sqlx::{PgConnection, PgPool};
use uuid::Uuid;

use super::types::{NewComment, NewSession, SessionPatch, TeamAssignment};
use crate::auth::{assert_session_access, AuthContext};
use crate::domain::lifecycle::{
    ensure_session_editable, ensure_structure_change_allowed, session_transition, SessionAction,
};
use crate::domain::value_object::SessionToken;
use crate::domain::{AttendanceStatus, ContentType, DomainError};
use infra::models::{CommentRow, SessionRow};
use infra::repos::{
    attachments, attendances, background_jobs, comments, friends, sessions, team_preset_members,
    CreateSession, SessionFilter, SessionOrder, UpdateSessionInfo,
};

/// A new session with the tokens that are only ever shown once.
pub struct CreatedSession {
    pub session: SessionRow,
    pub editor_token: String,
    pub admin_token: String,
}

/// Creates the session and seeds an UNDECIDED attendance for every active friend.
pub async fn create_session(pool: &PgPool, data: NewSession) -> Result<CreatedSession, DomainError> {
    let editor_token = SessionToken::generate().into_string();
    let admin_token = SessionToken::generate().into_string();

    let mut tx = pool.begin().await?;

    let friend_ids = friends::list_active_ids(&mut *tx).await?;
    let session = sessions::create(
        &mut *tx,
        CreateSession {
            id: Uuid::now_v7(),
            content_type: data.content_type.into(),
            title: data.title,
            starts_at: data.starts_at,
            editor_token: editor_token.clone(),
            admin_token: admin_token.clone(),
        },
    )
    .await?;
    let seeded = attendances::create_undecided(&mut *tx, session.id, &friend_ids).await?;

    tx.commit().await?;

    tracing::info!(session_id = %session.id, attendances = seeded, "session created");
    Ok(CreatedSession {
        session,
        editor_token,
        admin_token,
    })
}

pub async fn get_session(
    pool: &PgPool,
    auth: &AuthContext,
    session_id: Uuid,
) -> Result<SessionRow, DomainError> {
    assert_session_access(auth, session_id)?;
    sessions::get_by_id(pool, session_id)
        .await?
        .ok_or(DomainError::SessionNotFound)
}

/// A token reaches exactly one session, so the list holds at most that one.
pub async fn list_sessions(
    pool: &PgPool,
    auth: &AuthContext,
    content_type: Option<ContentType>,
    order: &[SessionOrder],
) -> Result<Vec<SessionRow>, DomainError> {
    let filter = SessionFilter {
        ids: vec![auth.session_id],
        content_type: content_type.map(Into::into),
    };
    Ok(sessions::list(pool, &filter, order).await?)
}

/// Unauthenticated lookup; callers expose only non-secret fields.
pub async fn get_preview(
    pool: &PgPool,
    session_id: Uuid,
) -> Result<(SessionRow, i64), DomainError> {
    let session = sessions::get_by_id(pool, session_id)
        .await?
        .ok_or(DomainError::SessionNotFound)?;
    let attending = attendances::count_attending(pool, session_id).await?;
    Ok((session, attending))
}

pub async fn list_comments(
    pool: &PgPool,
    auth: &AuthContext,
    session_id: Uuid,
) -> Result<Vec<CommentRow>, DomainError> {
    assert_session_access(auth, session_id)?;
    Ok(comments::list_by_session(pool, session_id).await?)
}

/// Access check plus `SELECT ... FOR UPDATE` on the session.
async fn lock_session(
    conn: &mut PgConnection,
    auth: &AuthContext,
    session_id: Uuid,
) -> Result<SessionRow, DomainError> {
    assert_session_access(auth, session_id)?;
    sessions::get_by_id_for_update(conn, session_id)
        .await?
        .ok_or(DomainError::SessionNotFound)
}

/// Fails with `SESSION_LOCKED` once attachments exist and no admin unlocked it.
async fn ensure_structure_unlocked(
    conn: &mut PgConnection,
    session: &SessionRow,
) -> Result<(), DomainError> {
    let count = attachments::count_by_session(conn, session.id).await?;
    ensure_structure_change_allowed(count, session.is_admin_unlocked)
}

pub async fn transition_session(
    pool: &PgPool,
    auth: &AuthContext,
    session_id: Uuid,
    action: SessionAction,
) -> Result<SessionRow, DomainError> {
    let mut tx = pool.begin().await?;

    let session = lock_session(&mut tx, auth, session_id).await?;
    let next = session_transition(session.status.into(), action)?;
    let updated = sessions::update_status(&mut *tx, session_id, next.into()).await?;

    tx.commit().await?;

    tracing::info!(
        session_id = %session_id,
        from = %crate::domain::SessionStatus::from(session.status),
        to = %next,
        "session transitioned"
    );
    Ok(updated)
}

pub async fn update_session(
    pool: &PgPool,
    auth: &AuthContext,
    session_id: Uuid,
    patch: SessionPatch,
) -> Result<SessionRow, DomainError> {
    let mut tx = pool.begin().await?;

    let session = lock_session(&mut tx, auth, session_id).await?;
    ensure_session_editable(session.status.into())?;

    let info = UpdateSessionInfo {
        content_type: patch
            .content_type
            .map(Into::into)
            .unwrap_or(session.content_type),
        title: patch.title.unwrap_or(session.title),
        starts_at: patch.starts_at.unwrap_or(session.starts_at),
    };
    let updated = sessions::update_info(&mut *tx, session_id, info).await?;

    tx.commit().await?;
    Ok(updated)
}

/// Hard delete. Stored attachment objects are handed to the cleanup worker.
pub async fn delete_session(
    pool: &PgPool,
    auth: &AuthContext,
    session_id: Uuid,
) -> Result<(), DomainError> {
    let mut tx = pool.begin().await?;

    lock_session(&mut tx, auth, session_id).await?;
    let keys = attachments::list_keys_by_session(&mut *tx, session_id).await?;
    let key_count = keys.len();
    sessions::delete(&mut *tx, session_id).await?;
    if key_count > 0 {
        background_jobs::enqueue(
            &mut *tx,
            background_jobs::CLEANUP_STORAGE_OBJECTS,
            json!({ "s3Keys": keys }),
        )
        .await?;
    }

    tx.commit().await?;

    tracing::info!(session_id = %session_id, attachments = key_count, "session deleted");
    Ok(())
}

pub async fn admin_unlock(
    pool: &PgPool,
    auth: &AuthContext,
    session_id: Uuid,
) -> Result<SessionRow, DomainError> {
    let mut tx = pool.begin().await?;

    lock_session(&mut tx, auth, session_id).await?;
    let updated = sessions::set_admin_unlocked(&mut *tx, session_id, true).await?;

    tx.commit().await?;

    tracing::info!(session_id = %session_id, "session structure unlocked by admin");
    Ok(updated)
}

/// Last write wins. A friend without an attendance row is left alone.
pub async fn set_attendance(
    pool: &PgPool,
    auth: &AuthContext,
    session_id: Uuid,
    friend_id: Uuid,
    status: AttendanceStatus,
) -> Result<SessionRow, DomainError> {
    let mut tx = pool.begin().await?;

    lock_session(&mut tx, auth, session_id).await?;
    attendances::set_status(&mut *tx, session_id, friend_id, status.into()).await?;
    let updated = sessions::touch(&mut *tx, session_id).await?;

    tx.commit().await?;
    Ok(updated)
}

pub async fn set_team_members(
    pool: &PgPool,
    auth: &AuthContext,
    session_id: Uuid,
    assignments: &[TeamAssignment],
) -> Result<SessionRow, DomainError> {
    let mut tx = pool.begin().await?;

    let session = lock_session(&mut tx, auth, session_id).await?;
    ensure_structure_unlocked(&mut tx, &session).await?;

    for assignment in assignments {
        friends::get_by_id(&mut *tx, assignment.friend_id)
            .await?
            .ok_or(DomainError::FriendNotFound)?;
        team_preset_members::upsert(
            &mut *tx,
            session_id,
            assignment.friend_id,
            assignment.team.into(),
            assignment.lane.into(),
        )
        .await?;
    }
    let updated = sessions::touch(&mut *tx, session_id).await?;

    tx.commit().await?;
    Ok(updated)
}

pub async fn remove_team_member(
    pool: &PgPool,
    auth: &AuthContext,
    session_id: Uuid,
    friend_id: Uuid,
) -> Result<SessionRow, DomainError> {
    let mut tx = pool.begin().await?;

    let session = lock_session(&mut tx, auth, session_id).await?;
    ensure_structure_unlocked(&mut tx, &session).await?;
    team_preset_members::delete(&mut *tx, session_id, friend_id).await?;
    let updated = sessions::touch(&mut *tx, session_id).await?;

    tx.commit().await?;
    Ok(updated)
}

pub async fn create_comment(
    pool: &PgPool,
    auth: &AuthContext,
    session_id: Uuid,
    comment: NewComment,
) -> Result<CommentRow, DomainError> {
    assert_session_access(auth, session_id)?;
    sessions::get_by_id(pool, session_id)
        .await?
        .ok_or(DomainError::SessionNotFound)?;
    Ok(comments::create(pool, session_id, comment.body, comment.display_name).await?)
}

pub async fn delete_comment(
    pool: &PgPool,
    auth: &AuthContext,
    comment_id: Uuid,
) -> Result<(), DomainError> {
    let comment = comments::get_by_id(pool, comment_id)
        .await?
        .ok_or(DomainError::CommentNotFound)?;
    assert_session_access(auth, comment.session_id)?;
    comments::delete(pool, comment_id).await?;
    Ok(())
}
