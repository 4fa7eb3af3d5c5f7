use async_graphql::dataloader::DataLoader;
use async_graphql::{EmptySubscription, Schema};

use super::loaders::FriendLoader;
use super::{MutationRoot, QueryRoot};
use crate::domain::enums::register_domain_enums;
use crate::state::AppState;

pub type AppSchema = Schema<QueryRoot, MutationRoot, EmptySubscription>;

/// Build the GraphQL schema and inject shared state (AppState) into the context.
pub fn build_schema(state: AppState) -> AppSchema {
    let friend_loader = DataLoader::new(FriendLoader::new(state.db.clone()), tokio::spawn);
    let introspection_enabled = state.config().introspection;

    let mut builder = register_domain_enums(Schema::build(
        QueryRoot::default(),
        MutationRoot::default(),
        EmptySubscription,
    ))
    .data(state) // AppState is Clone; available in resolvers via ctx.data::<AppState>()
    .data(friend_loader)
    .limit_depth(15)
    .limit_complexity(500);

    if !introspection_enabled {
        builder = builder.disable_introspection();
    }

    builder.finish()
}
