use async_graphql::Context;
use uuid::Uuid;

use super::AuthContext;
use crate::domain::DomainError;

/// The caller's session auth, or `UNAUTHORIZED` when the headers were missing or wrong.
pub fn require_auth(ctx: &Context<'_>) -> Result<AuthContext, DomainError> {
    ctx.data_opt::<AuthContext>()
        .copied()
        .ok_or(DomainError::Unauthorized)
}

pub fn require_admin(ctx: &Context<'_>) -> Result<AuthContext, DomainError> {
    let auth = require_auth(ctx)?;
    if !auth.is_admin() {
        return Err(DomainError::Forbidden("Admin role required"));
    }
    Ok(auth)
}

/// A token only reaches the session it was issued for.
pub fn assert_session_access(auth: &AuthContext, session_id: Uuid) -> Result<(), DomainError> {
    if auth.session_id != session_id {
        return Err(DomainError::Forbidden("Access denied for session"));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::SessionRole;

    #[test]
    fn foreign_session_is_forbidden() {
        let auth = AuthContext {
            session_id: Uuid::new_v4(),
            role: SessionRole::Admin,
        };
        assert!(assert_session_access(&auth, auth.session_id).is_ok());
        let err = assert_session_access(&auth, Uuid::new_v4()).unwrap_err();
        assert_eq!(err.code(), "FORBIDDEN");
        assert_eq!(err.status(), 403);
        assert_eq!(err.to_string(), "Access denied for session");
    }
}
