use sqlx::PgPool;
use uuid::Uuid;

use super::{AuthContext, SessionRole};
use crate::domain::value_object::{value_equals, SessionToken};
use crate::domain::DomainError;
use crate::gql::relay;
use infra::models::SessionRow;
use infra::repos::sessions;

pub const SESSION_ID_HEADER: &str = "x-session-id";
pub const SESSION_TOKEN_HEADER: &str = "x-session-token";

/// Admin token first: a session whose two tokens collide still grants admin.
pub fn resolve_role(session: &SessionRow, presented: &SessionToken) -> Option<SessionRole> {
    if value_equals(presented, SessionToken::parse(&session.admin_token).as_ref()) {
        Some(SessionRole::Admin)
    } else if value_equals(presented, SessionToken::parse(&session.editor_token).as_ref()) {
        Some(SessionRole::Editor)
    } else {
        None
    }
}

/// Accepts the raw UUID or a `Session` global id.
pub fn parse_session_id(raw: &str) -> Option<Uuid> {
    let raw = raw.trim();
    Uuid::parse_str(raw)
        .ok()
        .or_else(|| relay::decode_id(raw, "Session").ok())
}

pub async fn validate_token(
    db: &PgPool,
    raw_session_id: &str,
    raw_token: &str,
) -> Result<AuthContext, DomainError> {
    let (Some(session_id), Some(token)) = (
        parse_session_id(raw_session_id),
        SessionToken::parse(raw_token),
    ) else {
        return Err(DomainError::Unauthorized);
    };

    let session = sessions::get_by_id(db, session_id)
        .await?
        .ok_or(DomainError::Unauthorized)?;

    let role = resolve_role(&session, &token).ok_or(DomainError::Unauthorized)?;
    Ok(AuthContext { session_id, role })
}
