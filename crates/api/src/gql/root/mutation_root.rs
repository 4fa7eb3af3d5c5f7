use async_graphql::MergedObject;

use crate::gql::domains::attachments::AttachmentMutation;
use crate::gql::domains::friends::FriendMutation;
use crate::gql::domains::matches::MatchMutation;
use crate::gql::domains::sessions::SessionMutation;

#[derive(MergedObject, Default)]
pub struct MutationRoot(AttachmentMutation, FriendMutation, MatchMutation, SessionMutation);
