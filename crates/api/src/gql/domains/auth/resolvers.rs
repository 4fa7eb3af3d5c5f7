use async_graphql::{Context, Object, Result};

use super::types::SessionAuth;
use crate::auth::require_auth;
use crate::gql::error::ResultExt;

#[derive(Default)]
pub struct AuthQuery;

#[Object]
impl AuthQuery {
    /// The session and role behind the request's `x-session-*` headers.
    async fn auth_context(&self, ctx: &Context<'_>) -> Result<SessionAuth> {
        let auth = require_auth(ctx).gql_err()?;
        Ok(auth.into())
    }
}
