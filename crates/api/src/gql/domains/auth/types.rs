use async_graphql::{SimpleObject, ID};

use crate::auth::{AuthContext, SessionRole};
use crate::gql::relay::to_global_id;

/// What the presented session token grants.
#[derive(SimpleObject, Clone)]
#[graphql(name = "AuthContext")]
pub struct SessionAuth {
    pub session_id: ID,
    pub role: SessionRole,
}

impl From<AuthContext> for SessionAuth {
    fn from(auth: AuthContext) -> Self {
        Self {
            session_id: to_global_id("Session", auth.session_id),
            role: auth.role,
        }
    }
}
