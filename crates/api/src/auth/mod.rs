pub mod permissions;
pub mod session_token;

use async_graphql::Enum;
use uuid::Uuid;

pub use permissions::{assert_session_access, require_admin, require_auth};

/// What a session token grants. Admin tokens can also reopen, delete and unlock.
#[derive(Enum, Copy, Clone, Eq, PartialEq, Debug)]
pub enum SessionRole {
    Editor,
    Admin,
}

/// Resolved per request from the session headers; never persisted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AuthContext {
    pub session_id: Uuid,
    pub role: SessionRole,
}

impl AuthContext {
    pub fn is_admin(&self) -> bool {
        self.role == SessionRole::Admin
    }
}
