use async_graphql::{Context, Object, Result};

use super::service;
use super::types::{CreateFriendInput, Friend, FriendIdInput, FriendPayload, UpdateFriendInput};
use crate::auth::{require_admin, require_auth};
use crate::gql::error::ResultExt;
use crate::gql::relay::decode_id;
use crate::state::AppState;
use infra::repos::FriendFilter;

#[derive(Default)]
pub struct FriendQuery;

#[Object]
impl FriendQuery {
    /// Friends matching `query` on display name or Riot game name. Archived
    /// friends are hidden unless `includeArchived` is set.
    async fn friends(
        &self,
        ctx: &Context<'_>,
        query: Option<String>,
        include_archived: Option<bool>,
    ) -> Result<Vec<Friend>> {
        require_auth(ctx).gql_err()?;
        let state = ctx.data::<AppState>()?;

        let filter = FriendFilter {
            query,
            include_archived: include_archived.unwrap_or(false),
        };
        let rows = service::list_friends(&state.db, filter).await.gql_err()?;
        Ok(rows.into_iter().map(Friend::from).collect())
    }
}

#[derive(Default)]
pub struct FriendMutation;

#[Object]
impl FriendMutation {
    async fn create_friend(
        &self,
        ctx: &Context<'_>,
        input: CreateFriendInput,
    ) -> Result<FriendPayload> {
        require_admin(ctx).gql_err()?;
        let state = ctx.data::<AppState>()?;

        let data = input.validate().gql_err()?;
        let row = service::create_friend(&state.db, data).await.gql_err()?;

        Ok(FriendPayload {
            client_mutation_id: input.mutation.client_mutation_id,
            friend: row.into(),
        })
    }

    async fn update_friend(
        &self,
        ctx: &Context<'_>,
        input: UpdateFriendInput,
    ) -> Result<FriendPayload> {
        require_admin(ctx).gql_err()?;
        let state = ctx.data::<AppState>()?;

        let (friend_id, patch) = input.validate().gql_err()?;
        let row = service::update_friend(&state.db, friend_id, patch)
            .await
            .gql_err()?;

        Ok(FriendPayload {
            client_mutation_id: input.mutation.client_mutation_id,
            friend: row.into(),
        })
    }

    async fn archive_friend(&self, ctx: &Context<'_>, input: FriendIdInput) -> Result<FriendPayload> {
        require_admin(ctx).gql_err()?;
        let state = ctx.data::<AppState>()?;

        let friend_id = decode_id(&input.friend_id, "Friend").gql_err()?;
        let row = service::archive_friend(&state.db, friend_id).await.gql_err()?;

        Ok(FriendPayload {
            client_mutation_id: input.mutation.client_mutation_id,
            friend: row.into(),
        })
    }

    async fn restore_friend(&self, ctx: &Context<'_>, input: FriendIdInput) -> Result<FriendPayload> {
        require_admin(ctx).gql_err()?;
        let state = ctx.data::<AppState>()?;

        let friend_id = decode_id(&input.friend_id, "Friend").gql_err()?;
        let row = service::restore_friend(&state.db, friend_id).await.gql_err()?;

        Ok(FriendPayload {
            client_mutation_id: input.mutation.client_mutation_id,
            friend: row.into(),
        })
    }
}
