use async_graphql::MergedObject;

use crate::gql::domains::auth::AuthQuery;
use crate::gql::domains::friends::FriendQuery;
use crate::gql::domains::matches::MatchQuery;
use crate::gql::domains::node::NodeQuery;
use crate::gql::domains::sessions::SessionQuery;
use crate::gql::domains::statistics::StatisticsQuery;

#[derive(MergedObject, Default)]
pub struct QueryRoot(
    AuthQuery,
    FriendQuery,
    MatchQuery,
    NodeQuery,
    SessionQuery,
    StatisticsQuery,
);
