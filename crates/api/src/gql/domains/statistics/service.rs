use chrono::{DateTime, Utc};
use futures_util::future::try_join;
use sqlx::PgPool;
use uuid::Uuid;

use crate::domain::stats::{self, FriendDetail, FriendSummary, Participation};
use crate::domain::DomainError;
use infra::repos::{friends, matches, ConfirmedMatchFilter, FriendFilter};

/// Which friends and which confirmed matches a statistic covers.
#[derive(Debug, Clone, Copy, Default)]
pub struct StatsWindow {
    pub start_date: Option<DateTime<Utc>>,
    pub end_date: Option<DateTime<Utc>>,
    pub include_archived: bool,
}

impl StatsWindow {
    fn friend_filter(&self) -> FriendFilter {
        FriendFilter {
            query: None,
            include_archived: self.include_archived,
        }
    }

    fn match_filter(&self, friend_id: Option<Uuid>) -> ConfirmedMatchFilter {
        ConfirmedMatchFilter {
            friend_id,
            start_date: self.start_date,
            end_date: self.end_date,
        }
    }
}

pub async fn overview(pool: &PgPool, window: StatsWindow) -> Result<Vec<FriendSummary>, DomainError> {
    let friend_filter = window.friend_filter();
    let match_filter = window.match_filter(None);
    let (friend_rows, member_rows) = try_join(
        friends::list(pool, &friend_filter),
        matches::list_confirmed_members(pool, &match_filter),
    )
    .await?;

    let participations: Vec<Participation> =
        member_rows.into_iter().map(Participation::from).collect();

    let mut summaries: Vec<FriendSummary> = friend_rows
        .iter()
        .map(|friend| stats::summarize(friend.id, &friend.display_name, &participations))
        .collect();
    stats::sort_overview(&mut summaries);
    Ok(summaries)
}

/// `FRIEND_NOT_FOUND` unless the friend is in the window's friend set.
pub async fn detail(
    pool: &PgPool,
    friend_id: Uuid,
    window: StatsWindow,
) -> Result<FriendDetail, DomainError> {
    let friend_filter = window.friend_filter();
    let match_filter = window.match_filter(Some(friend_id));
    let (friend_rows, member_rows) = try_join(
        friends::list(pool, &friend_filter),
        matches::list_confirmed_members(pool, &match_filter),
    )
    .await?;

    if !friend_rows.iter().any(|friend| friend.id == friend_id) {
        return Err(DomainError::FriendNotFound);
    }

    let participations: Vec<Participation> =
        member_rows.into_iter().map(Participation::from).collect();
    Ok(stats::detail(friend_id, &participations))
}
