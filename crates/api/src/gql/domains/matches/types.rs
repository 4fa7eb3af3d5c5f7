use async_graphql::{ComplexObject, Context, InputObject, Result, SimpleObject, ID};
use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::domain::validation::optional_text;
use crate::domain::{DomainError, Lane, MatchStatus, Side, Team, ValidationErrors};
use crate::gql::domains::attachments::types::{Attachment, ExtractionResult};
use crate::gql::domains::friends::types::Friend;
use crate::gql::domains::sessions::types::Session;
use crate::gql::error::ResultExt;
use crate::gql::loaders::load_friend;
use crate::gql::relay::{decode_id, to_global_id, ClientMutationId};
use crate::state::AppState;
use infra::repos::{attachments, extraction_results, match_team_members, sessions};

const CHAMPION_MAX: usize = 64;

#[derive(SimpleObject, Clone)]
#[graphql(complex)]
pub struct Match {
    pub id: ID,
    #[graphql(skip)]
    pub local_id: Uuid,
    #[graphql(skip)]
    pub session_local_id: Uuid,
    pub match_no: i32,
    pub status: MatchStatus,
    pub winner_side: Side,
    pub team_a_side: Side,
    pub is_confirmed: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<infra::models::MatchRow> for Match {
    fn from(row: infra::models::MatchRow) -> Self {
        Self {
            id: to_global_id("Match", row.id),
            local_id: row.id,
            session_local_id: row.session_id,
            match_no: row.match_no,
            status: row.status.into(),
            winner_side: row.winner_side.into(),
            team_a_side: row.team_a_side.into(),
            is_confirmed: row.is_confirmed,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

#[ComplexObject]
impl Match {
    async fn session(&self, ctx: &Context<'_>) -> Result<Session> {
        let state = ctx.data::<AppState>()?;
        sessions::get_by_id(&state.db, self.session_local_id)
            .await
            .map_err(DomainError::from)
            .and_then(|row| row.ok_or(DomainError::SessionNotFound))
            .map(Session::from)
            .gql_err()
    }

    async fn team_members(&self, ctx: &Context<'_>) -> Result<Vec<MatchTeamMember>> {
        let state = ctx.data::<AppState>()?;
        let rows = match_team_members::list_by_match(&state.db, self.local_id)
            .await
            .gql_err()?;
        Ok(rows.into_iter().map(MatchTeamMember::from).collect())
    }

    async fn attachments(&self, ctx: &Context<'_>) -> Result<Vec<Attachment>> {
        let state = ctx.data::<AppState>()?;
        let rows = attachments::list_by_match(&state.db, self.local_id)
            .await
            .gql_err()?;
        Ok(rows.into_iter().map(Attachment::from).collect())
    }

    async fn extraction_results(&self, ctx: &Context<'_>) -> Result<Vec<ExtractionResult>> {
        let state = ctx.data::<AppState>()?;
        let rows = extraction_results::list_by_match(&state.db, self.local_id)
            .await
            .gql_err()?;
        Ok(rows
            .into_iter()
            .map(|row| ExtractionResult::from_dto(row.into()))
            .collect())
    }
}

#[derive(SimpleObject, Clone)]
#[graphql(complex)]
pub struct MatchTeamMember {
    pub id: ID,
    pub friend_id: ID,
    #[graphql(skip)]
    pub friend_local_id: Uuid,
    pub team: Team,
    pub lane: Lane,
    pub champion: Option<String>,
}

impl From<infra::models::MatchTeamMemberRow> for MatchTeamMember {
    fn from(row: infra::models::MatchTeamMemberRow) -> Self {
        Self {
            id: to_global_id("MatchTeamMember", row.id),
            friend_id: to_global_id("Friend", row.friend_id),
            friend_local_id: row.friend_id,
            team: row.team.into(),
            lane: row.lane.into(),
            champion: row.champion,
        }
    }
}

#[ComplexObject]
impl MatchTeamMember {
    async fn friend(&self, ctx: &Context<'_>) -> Result<Friend> {
        Ok(load_friend(ctx, self.friend_local_id).await?.into())
    }
}

// Input types

#[derive(InputObject)]
pub struct CreateMatchFromPresetInput {
    #[graphql(flatten)]
    pub mutation: ClientMutationId,
    pub session_id: ID,
}

#[derive(InputObject)]
pub struct SetLaneInput {
    #[graphql(flatten)]
    pub mutation: ClientMutationId,
    pub match_id: ID,
    pub friend_id: ID,
    pub lane: Lane,
}

#[derive(InputObject)]
pub struct SetChampionInput {
    #[graphql(flatten)]
    pub mutation: ClientMutationId,
    pub match_id: ID,
    pub friend_id: ID,
    /// Blank or omitted clears the champion.
    pub champion: Option<String>,
}

impl SetChampionInput {
    /// `(match_id, friend_id, champion)`
    pub fn validate(&self) -> Result<(Uuid, Uuid, Option<String>), DomainError> {
        let match_id = decode_id(&self.match_id, "Match")?;
        let friend_id = decode_id(&self.friend_id, "Friend")?;
        let mut errors = ValidationErrors::default();
        let champion = optional_text(
            &mut errors,
            "champion",
            self.champion.as_deref(),
            CHAMPION_MAX,
        );
        let champion = errors.finish(champion)?;
        Ok((match_id, friend_id, champion))
    }
}

#[derive(InputObject)]
pub struct ConfirmMatchResultInput {
    #[graphql(flatten)]
    pub mutation: ClientMutationId,
    pub match_id: ID,
    pub winner_side: Side,
    pub team_a_side: Side,
}

impl ConfirmMatchResultInput {
    /// Both sides must be known; UNKNOWN only marks an unconfirmed match.
    pub fn validate(&self) -> Result<(Uuid, Side, Side), DomainError> {
        let match_id = decode_id(&self.match_id, "Match")?;
        let mut errors = ValidationErrors::default();
        if self.winner_side == Side::Unknown {
            errors.push("winnerSide", "must be BLUE or RED");
        }
        if self.team_a_side == Side::Unknown {
            errors.push("teamASide", "must be BLUE or RED");
        }
        let (winner_side, team_a_side) = errors.finish((self.winner_side, self.team_a_side))?;
        Ok((match_id, winner_side, team_a_side))
    }
}

#[derive(InputObject)]
pub struct DeleteMatchInput {
    #[graphql(flatten)]
    pub mutation: ClientMutationId,
    pub match_id: ID,
}

// Payloads

#[derive(SimpleObject)]
pub struct MatchPayload {
    pub client_mutation_id: Option<String>,
    #[graphql(name = "match")]
    pub match_: Match,
}

#[derive(SimpleObject)]
pub struct DeleteMatchPayload {
    pub client_mutation_id: Option<String>,
    pub deleted_match_id: ID,
}
