use async_graphql::{Context, Interface, Object, Result, ID};

use crate::auth::{assert_session_access, require_auth, AuthContext};
use crate::domain::DomainError;
use crate::gql::domains::attachments::service as attachments_service;
use crate::gql::domains::attachments::types::{Attachment, ExtractionResult};
use crate::gql::domains::friends::types::Friend;
use crate::gql::domains::matches::service as matches_service;
use crate::gql::domains::matches::types::Match;
use crate::gql::domains::sessions::service as sessions_service;
use crate::gql::domains::sessions::types::{Comment, Session};
use crate::gql::error::ResultExt;
use crate::gql::relay::from_global_id;
use crate::state::AppState;
use infra::repos::{comments, extraction_results, friends, matches};
use uuid::Uuid;

/// Relay object identification.
#[derive(Interface)]
#[graphql(field(name = "id", ty = "&ID"))]
pub enum Node {
    Session(Session),
    Friend(Friend),
    Match(Match),
    Comment(Comment),
    Attachment(Attachment),
    ExtractionResult(ExtractionResult),
}

/// Missing rows resolve to null; every other failure is still an error.
fn found<T>(result: Result<T, DomainError>) -> Result<Option<T>, DomainError> {
    match result {
        Ok(value) => Ok(Some(value)),
        Err(
            DomainError::SessionNotFound
            | DomainError::FriendNotFound
            | DomainError::MatchNotFound
            | DomainError::CommentNotFound
            | DomainError::AttachmentNotFound,
        ) => Ok(None),
        Err(e) => Err(e),
    }
}

/// Undecodable ids are a validation error; unknown types, non-UUID local ids
/// and missing rows resolve to null.
async fn fetch_node(state: &AppState, auth: &AuthContext, id: &ID) -> Result<Option<Node>> {
    let db = &state.db;

    let resolved = from_global_id(id)
        .ok_or(DomainError::InvalidId("global"))
        .gql_err()?;
    let Ok(local_id) = Uuid::parse_str(&resolved.id) else {
        return Ok(None);
    };

    let node = match resolved.type_name.as_str() {
        "Session" => found(sessions_service::get_session(db, auth, local_id).await)
            .gql_err()?
            .map(|row| Node::Session(row.into())),
        "Friend" => friends::get_by_id(db, local_id)
            .await
            .gql_err()?
            .map(|row| Node::Friend(row.into())),
        "Match" => found(matches_service::get_match(db, auth, local_id).await)
            .gql_err()?
            .map(|row| Node::Match(row.into())),
        "Comment" => match comments::get_by_id(db, local_id).await.gql_err()? {
            Some(row) => {
                assert_session_access(auth, row.session_id).gql_err()?;
                Some(Node::Comment(row.into()))
            }
            None => None,
        },
        "Attachment" => found(attachments_service::get_attachment(db, auth, local_id).await)
            .gql_err()?
            .map(|row| Node::Attachment(row.into())),
        "ExtractionResult" => match extraction_results::get_by_id(db, local_id)
            .await
            .gql_err()?
        {
            Some(row) => match matches::get_by_id(db, row.match_id).await.gql_err()? {
                Some(owner) => {
                    assert_session_access(auth, owner.session_id).gql_err()?;
                    Some(Node::ExtractionResult(ExtractionResult::from_dto(row.into())))
                }
                None => None,
            },
            None => None,
        },
        _ => None,
    };

    Ok(node)
}

#[derive(Default)]
pub struct NodeQuery;

#[Object]
impl NodeQuery {
    /// Fetches any object by global id. Session-owned objects require access
    /// to their session.
    async fn node(&self, ctx: &Context<'_>, id: ID) -> Result<Option<Node>> {
        let auth = require_auth(ctx).gql_err()?;
        let state = ctx.data::<AppState>()?;
        fetch_node(state, &auth, &id).await
    }

    /// Batch form of `node`, in request order.
    async fn nodes(&self, ctx: &Context<'_>, ids: Vec<ID>) -> Result<Vec<Option<Node>>> {
        let auth = require_auth(ctx).gql_err()?;
        let state = ctx.data::<AppState>()?;

        let mut nodes = Vec::with_capacity(ids.len());
        for id in &ids {
            nodes.push(fetch_node(state, &auth, id).await?);
        }
        Ok(nodes)
    }
}
