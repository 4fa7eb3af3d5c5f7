use async_graphql::{Context, Object, Result};

use super::service::{self, StatsWindow};
use super::types::{FriendStatsSummary, StatsDetail, StatsDetailInput, StatsOverview, StatsOverviewInput};
use crate::auth::require_auth;
use crate::gql::error::ResultExt;
use crate::gql::relay::decode_id;
use crate::state::AppState;

#[derive(Default)]
pub struct StatisticsQuery;

#[Object]
impl StatisticsQuery {
    /// Win/loss summary of every friend over confirmed matches.
    async fn stats_overview(
        &self,
        ctx: &Context<'_>,
        input: Option<StatsOverviewInput>,
    ) -> Result<StatsOverview> {
        require_auth(ctx).gql_err()?;
        let state = ctx.data::<AppState>()?;

        let input = input.unwrap_or_default();
        let window = StatsWindow {
            start_date: input.start_date,
            end_date: input.end_date,
            include_archived: input.include_archived,
        };
        let summaries = service::overview(&state.db, window).await.gql_err()?;

        Ok(StatsOverview {
            friends: summaries.into_iter().map(FriendStatsSummary::from).collect(),
        })
    }

    async fn stats_detail(&self, ctx: &Context<'_>, input: StatsDetailInput) -> Result<StatsDetail> {
        require_auth(ctx).gql_err()?;
        let state = ctx.data::<AppState>()?;

        let friend_id = decode_id(&input.friend_id, "Friend").gql_err()?;
        let window = StatsWindow {
            start_date: input.start_date,
            end_date: input.end_date,
            include_archived: input.include_archived,
        };
        let detail = service::detail(&state.db, friend_id, window)
            .await
            .gql_err()?;

        Ok(StatsDetail::new(friend_id, detail))
    }
}
