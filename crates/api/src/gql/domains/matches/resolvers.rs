use async_graphql::{Context, Object, Result, ID};

use super::service;
use super::types::{
    ConfirmMatchResultInput, CreateMatchFromPresetInput, DeleteMatchInput, DeleteMatchPayload,
    Match, MatchPayload, SetChampionInput, SetLaneInput,
};
use crate::auth::{require_admin, require_auth};
use crate::gql::error::ResultExt;
use crate::gql::relay::{decode_id, to_global_id};
use crate::state::AppState;

#[derive(Default)]
pub struct MatchQuery;

#[Object]
impl MatchQuery {
    #[graphql(name = "match")]
    async fn match_(&self, ctx: &Context<'_>, match_id: ID) -> Result<Match> {
        let auth = require_auth(ctx).gql_err()?;
        let state = ctx.data::<AppState>()?;

        let match_id = decode_id(&match_id, "Match").gql_err()?;
        let row = service::get_match(&state.db, &auth, match_id)
            .await
            .gql_err()?;
        Ok(row.into())
    }
}

#[derive(Default)]
pub struct MatchMutation;

#[Object]
impl MatchMutation {
    async fn create_match_from_preset(
        &self,
        ctx: &Context<'_>,
        input: CreateMatchFromPresetInput,
    ) -> Result<MatchPayload> {
        let auth = require_auth(ctx).gql_err()?;
        let state = ctx.data::<AppState>()?;

        let session_id = decode_id(&input.session_id, "Session").gql_err()?;
        let row = service::create_match_from_preset(&state.db, &auth, session_id)
            .await
            .gql_err()?;

        Ok(MatchPayload {
            client_mutation_id: input.mutation.client_mutation_id,
            match_: row.into(),
        })
    }

    async fn set_lane(&self, ctx: &Context<'_>, input: SetLaneInput) -> Result<MatchPayload> {
        let auth = require_auth(ctx).gql_err()?;
        let state = ctx.data::<AppState>()?;

        let match_id = decode_id(&input.match_id, "Match").gql_err()?;
        let friend_id = decode_id(&input.friend_id, "Friend").gql_err()?;
        let row = service::set_lane(&state.db, &auth, match_id, friend_id, input.lane)
            .await
            .gql_err()?;

        Ok(MatchPayload {
            client_mutation_id: input.mutation.client_mutation_id,
            match_: row.into(),
        })
    }

    async fn set_champion(
        &self,
        ctx: &Context<'_>,
        input: SetChampionInput,
    ) -> Result<MatchPayload> {
        let auth = require_auth(ctx).gql_err()?;
        let state = ctx.data::<AppState>()?;

        let (match_id, friend_id, champion) = input.validate().gql_err()?;
        let row = service::set_champion(&state.db, &auth, match_id, friend_id, champion)
            .await
            .gql_err()?;

        Ok(MatchPayload {
            client_mutation_id: input.mutation.client_mutation_id,
            match_: row.into(),
        })
    }

    async fn confirm_match_result(
        &self,
        ctx: &Context<'_>,
        input: ConfirmMatchResultInput,
    ) -> Result<MatchPayload> {
        let auth = require_auth(ctx).gql_err()?;
        let state = ctx.data::<AppState>()?;

        let (match_id, winner_side, team_a_side) = input.validate().gql_err()?;
        let row =
            service::confirm_match_result(&state.db, &auth, match_id, winner_side, team_a_side)
                .await
                .gql_err()?;

        Ok(MatchPayload {
            client_mutation_id: input.mutation.client_mutation_id,
            match_: row.into(),
        })
    }

    async fn delete_match(
        &self,
        ctx: &Context<'_>,
        input: DeleteMatchInput,
    ) -> Result<DeleteMatchPayload> {
        let auth = require_admin(ctx).gql_err()?;
        let state = ctx.data::<AppState>()?;

        let match_id = decode_id(&input.match_id, "Match").gql_err()?;
        service::delete_match(&state.db, &auth, match_id)
            .await
            .gql_err()?;

        Ok(DeleteMatchPayload {
            client_mutation_id: input.mutation.client_mutation_id,
            deleted_match_id: to_global_id("Match", match_id),
        })
    }
}
