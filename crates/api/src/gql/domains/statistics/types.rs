use async_graphql::{ComplexObject, Context, InputObject, Result, SimpleObject, ID};
use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::domain::stats;
use crate::domain::Lane;
use crate::gql::domains::friends::types::Friend;
use crate::gql::loaders::load_friend;
use crate::gql::relay::to_global_id;

#[derive(InputObject, Default)]
pub struct StatsOverviewInput {
    pub start_date: Option<DateTime<Utc>>,
    pub end_date: Option<DateTime<Utc>>,
    #[graphql(default)]
    pub include_archived: bool,
}

#[derive(InputObject)]
pub struct StatsDetailInput {
    pub friend_id: ID,
    pub start_date: Option<DateTime<Utc>>,
    pub end_date: Option<DateTime<Utc>>,
    #[graphql(default)]
    pub include_archived: bool,
}

#[derive(SimpleObject, Clone)]
#[graphql(complex)]
pub struct FriendStatsSummary {
    pub friend_id: ID,
    #[graphql(skip)]
    pub friend_local_id: Uuid,
    /// Null until the friend has a confirmed match.
    pub win_rate: Option<f64>,
    pub wins: u32,
    pub losses: u32,
    pub total_matches: u32,
    pub top_lane: Option<Lane>,
}

impl From<stats::FriendSummary> for FriendStatsSummary {
    fn from(summary: stats::FriendSummary) -> Self {
        Self {
            friend_id: to_global_id("Friend", summary.friend_id),
            friend_local_id: summary.friend_id,
            win_rate: summary.win_rate,
            wins: summary.wins,
            losses: summary.losses,
            total_matches: summary.total_matches,
            top_lane: summary.top_lane,
        }
    }
}

#[ComplexObject]
impl FriendStatsSummary {
    async fn friend(&self, ctx: &Context<'_>) -> Result<Friend> {
        Ok(load_friend(ctx, self.friend_local_id).await?.into())
    }
}

#[derive(SimpleObject, Clone)]
pub struct StatsOverview {
    pub friends: Vec<FriendStatsSummary>,
}

#[derive(SimpleObject, Clone)]
pub struct StatsDetailSummary {
    pub win_rate: Option<f64>,
    pub total_matches: u32,
    pub top_lane: Option<Lane>,
}

#[derive(SimpleObject, Clone)]
pub struct LaneDistribution {
    pub lane: Lane,
    pub play_count: u32,
}

#[derive(SimpleObject, Clone)]
pub struct ChampionStats {
    /// "Unknown" groups games without a recorded champion.
    pub champion: String,
    pub wins: u32,
    pub games: u32,
    pub win_rate: f64,
}

#[derive(SimpleObject, Clone)]
#[graphql(complex)]
pub struct StatsDetail {
    pub friend_id: ID,
    #[graphql(skip)]
    pub friend_local_id: Uuid,
    pub summary: StatsDetailSummary,
    pub lane_distribution: Vec<LaneDistribution>,
    pub top_champions: Vec<ChampionStats>,
}

impl StatsDetail {
    pub fn new(friend_id: Uuid, detail: stats::FriendDetail) -> Self {
        Self {
            friend_id: to_global_id("Friend", friend_id),
            friend_local_id: friend_id,
            summary: StatsDetailSummary {
                win_rate: detail.summary.win_rate,
                total_matches: detail.summary.total_matches,
                top_lane: detail.summary.top_lane,
            },
            lane_distribution: detail
                .lane_distribution
                .into_iter()
                .map(|l| LaneDistribution {
                    lane: l.lane,
                    play_count: l.play_count,
                })
                .collect(),
            top_champions: detail
                .top_champions
                .into_iter()
                .map(|c| ChampionStats {
                    champion: c.champion,
                    wins: c.wins,
                    games: c.games,
                    win_rate: c.win_rate,
                })
                .collect(),
        }
    }
}

#[ComplexObject]
impl StatsDetail {
    async fn friend(&self, ctx: &Context<'_>) -> Result<Friend> {
        Ok(load_friend(ctx, self.friend_local_id).await?.into())
    }
}
