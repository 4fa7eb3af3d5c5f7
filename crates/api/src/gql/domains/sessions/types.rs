use async_graphql::{ComplexObject, Context, Enum, InputObject, Result, SimpleObject, ID};
use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::domain::lifecycle::is_structure_locked;
use crate::domain::validation::{optional_text, required_text};
use crate::domain::{
    AttendanceStatus, ContentType, DomainError, Lane, SessionStatus, Team, ValidationErrors,
};
use crate::gql::domains::attachments::types::Attachment;
use crate::gql::domains::friends::types::Friend;
use crate::gql::domains::matches::types::Match;
use crate::gql::error::ResultExt;
use crate::gql::loaders::load_friend;
use crate::gql::relay::{decode_id, to_global_id, ClientMutationId, OrderDirection, PageInfo};
use crate::state::AppState;
use infra::repos::{
    attachments, attendances, comments, matches, team_preset_members, SessionOrder,
    SessionOrderColumn,
};

const TITLE_MAX: usize = 255;
const COMMENT_BODY_MAX: usize = 2000;
const COMMENT_AUTHOR_MAX: usize = 255;

#[derive(SimpleObject, Clone)]
#[graphql(complex)]
pub struct Session {
    pub id: ID,
    #[graphql(skip)]
    pub local_id: Uuid,
    pub content_type: ContentType,
    pub title: Option<String>,
    pub starts_at: DateTime<Utc>,
    pub status: SessionStatus,
    pub is_admin_unlocked: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<infra::models::SessionRow> for Session {
    fn from(row: infra::models::SessionRow) -> Self {
        Self {
            id: to_global_id("Session", row.id),
            local_id: row.id,
            content_type: row.content_type.into(),
            title: row.title,
            starts_at: row.starts_at,
            status: row.status.into(),
            is_admin_unlocked: row.is_admin_unlocked,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

#[ComplexObject]
impl Session {
    async fn attending_count(&self, ctx: &Context<'_>) -> Result<i64> {
        let state = ctx.data::<AppState>()?;
        attendances::count_attending(&state.db, self.local_id)
            .await
            .gql_err()
    }

    async fn match_count(&self, ctx: &Context<'_>) -> Result<i64> {
        let state = ctx.data::<AppState>()?;
        matches::count_by_session(&state.db, self.local_id)
            .await
            .gql_err()
    }

    /// True while attachments freeze team presets and the match list.
    async fn effective_locked(&self, ctx: &Context<'_>) -> Result<bool> {
        let state = ctx.data::<AppState>()?;
        let count = attachments::count_by_session(&state.db, self.local_id)
            .await
            .gql_err()?;
        Ok(is_structure_locked(count, self.is_admin_unlocked))
    }

    async fn attendances(&self, ctx: &Context<'_>) -> Result<Vec<Attendance>> {
        let state = ctx.data::<AppState>()?;
        let rows = attendances::list_by_session(&state.db, self.local_id)
            .await
            .gql_err()?;
        Ok(rows.into_iter().map(Attendance::from).collect())
    }

    async fn team_preset_members(&self, ctx: &Context<'_>) -> Result<Vec<TeamPresetMember>> {
        let state = ctx.data::<AppState>()?;
        let rows = team_preset_members::list_by_session(&state.db, self.local_id)
            .await
            .gql_err()?;
        Ok(rows.into_iter().map(TeamPresetMember::from).collect())
    }

    async fn matches(&self, ctx: &Context<'_>) -> Result<Vec<Match>> {
        let state = ctx.data::<AppState>()?;
        let rows = matches::list_by_session(&state.db, self.local_id)
            .await
            .gql_err()?;
        Ok(rows.into_iter().map(Match::from).collect())
    }

    async fn attachments(&self, ctx: &Context<'_>) -> Result<Vec<Attachment>> {
        let state = ctx.data::<AppState>()?;
        let rows = attachments::list_by_session(&state.db, self.local_id)
            .await
            .gql_err()?;
        Ok(rows.into_iter().map(Attachment::from).collect())
    }

    async fn comments(&self, ctx: &Context<'_>) -> Result<Vec<Comment>> {
        let state = ctx.data::<AppState>()?;
        let rows = comments::list_by_session(&state.db, self.local_id)
            .await
            .gql_err()?;
        Ok(rows.into_iter().map(Comment::from).collect())
    }
}

#[derive(SimpleObject, Clone)]
pub struct SessionEdge {
    pub cursor: String,
    pub node: Session,
}

#[derive(SimpleObject, Clone)]
pub struct SessionConnection {
    pub edges: Vec<SessionEdge>,
    pub page_info: PageInfo,
}

#[derive(InputObject, Clone, Default)]
#[graphql(name = "SessionFilter")]
pub struct SessionFilterInput {
    pub content_type: Option<ContentType>,
}

#[derive(Enum, Copy, Clone, Debug, PartialEq, Eq)]
pub enum SessionOrderField {
    /// Closest to now first when ascending, past or future.
    DateProximity,
    StartsAt,
    StatusPriority,
    CreatedAt,
}

#[derive(InputObject, Clone, Copy)]
#[graphql(name = "SessionOrder")]
pub struct SessionOrderInput {
    pub field: SessionOrderField,
    pub direction: OrderDirection,
}

impl From<SessionOrderInput> for SessionOrder {
    fn from(input: SessionOrderInput) -> Self {
        Self {
            column: match input.field {
                SessionOrderField::DateProximity => SessionOrderColumn::DateProximity,
                SessionOrderField::StartsAt => SessionOrderColumn::StartsAt,
                SessionOrderField::StatusPriority => SessionOrderColumn::StatusPriority,
                SessionOrderField::CreatedAt => SessionOrderColumn::CreatedAt,
            },
            descending: input.direction == OrderDirection::Desc,
        }
    }
}

/// What an invite link shows before the visitor has a token.
#[derive(SimpleObject, Clone)]
pub struct SessionPreview {
    pub id: ID,
    pub content_type: ContentType,
    pub title: Option<String>,
    pub starts_at: DateTime<Utc>,
    pub status: SessionStatus,
    pub attending_count: i64,
}

#[derive(SimpleObject, Clone)]
#[graphql(complex)]
pub struct Attendance {
    pub id: ID,
    #[graphql(skip)]
    pub friend_local_id: Uuid,
    pub status: AttendanceStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<infra::models::AttendanceRow> for Attendance {
    fn from(row: infra::models::AttendanceRow) -> Self {
        Self {
            id: to_global_id("Attendance", row.id),
            friend_local_id: row.friend_id,
            status: row.status.into(),
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

#[ComplexObject]
impl Attendance {
    async fn friend(&self, ctx: &Context<'_>) -> Result<Friend> {
        Ok(load_friend(ctx, self.friend_local_id).await?.into())
    }
}

#[derive(SimpleObject, Clone)]
#[graphql(complex)]
pub struct TeamPresetMember {
    pub id: ID,
    #[graphql(skip)]
    pub friend_local_id: Uuid,
    pub team: Team,
    pub lane: Lane,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<infra::models::TeamPresetMemberRow> for TeamPresetMember {
    fn from(row: infra::models::TeamPresetMemberRow) -> Self {
        Self {
            id: to_global_id("TeamPresetMember", row.id),
            friend_local_id: row.friend_id,
            team: row.team.into(),
            lane: row.lane.into(),
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

#[ComplexObject]
impl TeamPresetMember {
    async fn friend(&self, ctx: &Context<'_>) -> Result<Friend> {
        Ok(load_friend(ctx, self.friend_local_id).await?.into())
    }
}

#[derive(SimpleObject, Clone)]
pub struct Comment {
    pub id: ID,
    #[graphql(skip)]
    pub local_id: Uuid,
    pub session_id: ID,
    pub body: String,
    pub display_name: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl From<infra::models::CommentRow> for Comment {
    fn from(row: infra::models::CommentRow) -> Self {
        Self {
            id: to_global_id("Comment", row.id),
            local_id: row.id,
            session_id: to_global_id("Session", row.session_id),
            body: row.body,
            display_name: row.display_name,
            created_at: row.created_at,
        }
    }
}

// Validated inputs

#[derive(Debug, Clone, PartialEq)]
pub struct NewSession {
    pub content_type: ContentType,
    pub title: Option<String>,
    pub starts_at: DateTime<Utc>,
}

/// `None` keeps the stored value; `title: Some(None)` clears it.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SessionPatch {
    pub content_type: Option<ContentType>,
    pub title: Option<Option<String>>,
    pub starts_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TeamAssignment {
    pub friend_id: Uuid,
    pub team: Team,
    pub lane: Lane,
}

#[derive(Debug, Clone, PartialEq)]
pub struct NewComment {
    pub body: String,
    pub display_name: Option<String>,
}

// Input types

#[derive(InputObject)]
pub struct CreateSessionInput {
    #[graphql(flatten)]
    pub mutation: ClientMutationId,
    pub content_type: ContentType,
    pub title: Option<String>,
    pub starts_at: DateTime<Utc>,
}

impl CreateSessionInput {
    pub fn validate(&self) -> Result<NewSession, ValidationErrors> {
        let mut errors = ValidationErrors::default();
        let title = optional_text(&mut errors, "title", self.title.as_deref(), TITLE_MAX);
        errors.finish(NewSession {
            content_type: self.content_type,
            title,
            starts_at: self.starts_at,
        })
    }
}

#[derive(InputObject)]
pub struct UpdateSessionInput {
    #[graphql(flatten)]
    pub mutation: ClientMutationId,
    pub session_id: ID,
    pub content_type: Option<ContentType>,
    /// A blank title clears it.
    pub title: Option<String>,
    pub starts_at: Option<DateTime<Utc>>,
}

impl UpdateSessionInput {
    pub fn validate(&self) -> Result<(Uuid, SessionPatch), DomainError> {
        let session_id = decode_id(&self.session_id, "Session")?;
        let mut errors = ValidationErrors::default();
        let title = self
            .title
            .as_deref()
            .map(|title| optional_text(&mut errors, "title", Some(title), TITLE_MAX));
        let patch = errors.finish(SessionPatch {
            content_type: self.content_type,
            title,
            starts_at: self.starts_at,
        })?;
        Ok((session_id, patch))
    }
}

/// Input of the mutations that only name a session.
#[derive(InputObject)]
pub struct SessionIdInput {
    #[graphql(flatten)]
    pub mutation: ClientMutationId,
    pub session_id: ID,
}

#[derive(InputObject)]
pub struct SetAttendanceInput {
    #[graphql(flatten)]
    pub mutation: ClientMutationId,
    pub session_id: ID,
    pub friend_id: ID,
    pub status: AttendanceStatus,
}

#[derive(InputObject)]
pub struct TeamAssignmentInput {
    pub friend_id: ID,
    pub team: Team,
    /// Defaults to UNKNOWN.
    pub lane: Option<Lane>,
}

impl TeamAssignmentInput {
    pub fn validate(&self) -> Result<TeamAssignment, DomainError> {
        Ok(TeamAssignment {
            friend_id: decode_id(&self.friend_id, "Friend")?,
            team: self.team,
            lane: self.lane.unwrap_or(Lane::Unknown),
        })
    }
}

#[derive(InputObject)]
pub struct SetTeamMemberInput {
    #[graphql(flatten)]
    pub mutation: ClientMutationId,
    pub session_id: ID,
    pub friend_id: ID,
    pub team: Team,
    pub lane: Option<Lane>,
}

#[derive(InputObject)]
pub struct BulkSetTeamsInput {
    #[graphql(flatten)]
    pub mutation: ClientMutationId,
    pub session_id: ID,
    pub assignments: Vec<TeamAssignmentInput>,
}

#[derive(InputObject)]
pub struct RemoveTeamMemberInput {
    #[graphql(flatten)]
    pub mutation: ClientMutationId,
    pub session_id: ID,
    pub friend_id: ID,
}

#[derive(InputObject)]
pub struct CreateCommentInput {
    #[graphql(flatten)]
    pub mutation: ClientMutationId,
    pub session_id: ID,
    pub body: String,
    pub display_name: Option<String>,
}

impl CreateCommentInput {
    pub fn validate(&self) -> Result<(Uuid, NewComment), DomainError> {
        let session_id = decode_id(&self.session_id, "Session")?;
        let mut errors = ValidationErrors::default();
        let body = required_text(&mut errors, "body", &self.body, COMMENT_BODY_MAX);
        let display_name = optional_text(
            &mut errors,
            "displayName",
            self.display_name.as_deref(),
            COMMENT_AUTHOR_MAX,
        );
        let comment = errors.finish(NewComment { body, display_name })?;
        Ok((session_id, comment))
    }
}

#[derive(InputObject)]
pub struct DeleteCommentInput {
    #[graphql(flatten)]
    pub mutation: ClientMutationId,
    pub comment_id: ID,
}

// Payloads

#[derive(SimpleObject)]
pub struct CreateSessionPayload {
    pub client_mutation_id: Option<String>,
    pub session: Session,
    /// Shown once; grants edit access to this session.
    pub editor_token: String,
    /// Shown once; also grants reopen, delete and unlock.
    pub admin_token: String,
}

#[derive(SimpleObject)]
pub struct SessionPayload {
    pub client_mutation_id: Option<String>,
    pub session: Session,
}

#[derive(SimpleObject)]
pub struct DeleteSessionPayload {
    pub client_mutation_id: Option<String>,
    pub deleted_session_id: ID,
}

#[derive(SimpleObject)]
pub struct CommentPayload {
    pub client_mutation_id: Option<String>,
    pub comment: Comment,
}

#[derive(SimpleObject)]
pub struct DeleteCommentPayload {
    pub client_mutation_id: Option<String>,
    pub deleted_comment_id: ID,
}
