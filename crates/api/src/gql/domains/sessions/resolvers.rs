use async_graphql::{Context, Object, Result, ID};

use super::service;
use super::types::{
    BulkSetTeamsInput, Comment, CommentPayload, CreateCommentInput, CreateSessionInput,
    CreateSessionPayload, DeleteCommentInput, DeleteCommentPayload, DeleteSessionPayload,
    RemoveTeamMemberInput, Session, SessionConnection, SessionEdge, SessionFilterInput,
    SessionIdInput, SessionOrderInput, SessionPayload, SessionPreview, SetAttendanceInput,
    SetTeamMemberInput, TeamAssignmentInput, UpdateSessionInput,
};
use crate::auth::{require_admin, require_auth, AuthContext};
use crate::domain::lifecycle::SessionAction;
use crate::gql::error::ResultExt;
use crate::gql::relay::{decode_id, paginate, to_global_id, ConnectionArgs};
use infra::repos::SessionOrder;
use crate::state::AppState;

#[derive(Default)]
pub struct SessionQuery;

#[Object]
impl SessionQuery {
    async fn session(&self, ctx: &Context<'_>, session_id: ID) -> Result<Session> {
        let auth = require_auth(ctx).gql_err()?;
        let state = ctx.data::<AppState>()?;

        let session_id = decode_id(&session_id, "Session").gql_err()?;
        let row = service::get_session(&state.db, &auth, session_id)
            .await
            .gql_err()?;
        Ok(row.into())
    }

    /// Public: lets an invitee see what they were invited to.
    async fn session_preview(&self, ctx: &Context<'_>, session_id: ID) -> Result<SessionPreview> {
        let state = ctx.data::<AppState>()?;

        let session_id = decode_id(&session_id, "Session").gql_err()?;
        let (row, attending_count) = service::get_preview(&state.db, session_id)
            .await
            .gql_err()?;
        Ok(SessionPreview {
            id: to_global_id("Session", row.id),
            content_type: row.content_type.into(),
            title: row.title,
            starts_at: row.starts_at,
            status: row.status.into(),
            attending_count,
        })
    }

    /// Relay connection over the sessions the caller can see, which is at
    /// most the one its token belongs to.
    #[allow(clippy::too_many_arguments)]
    async fn sessions(
        &self,
        ctx: &Context<'_>,
        first: Option<i32>,
        after: Option<String>,
        last: Option<i32>,
        before: Option<String>,
        filter: Option<SessionFilterInput>,
        order_by: Option<Vec<SessionOrderInput>>,
    ) -> Result<SessionConnection> {
        let auth = require_auth(ctx).gql_err()?;
        let state = ctx.data::<AppState>()?;

        let window = ConnectionArgs {
            first,
            after,
            last,
            before,
        }
        .validate()
        .gql_err()?;
        let order: Vec<SessionOrder> = order_by
            .unwrap_or_default()
            .into_iter()
            .map(SessionOrder::from)
            .collect();
        let content_type = filter.and_then(|f| f.content_type);

        let rows = service::list_sessions(&state.db, &auth, content_type, &order)
            .await
            .gql_err()?;
        let (edges, page_info) = paginate(rows, |row| row.id, &window);

        Ok(SessionConnection {
            edges: edges
                .into_iter()
                .map(|(cursor, row)| SessionEdge {
                    cursor,
                    node: row.into(),
                })
                .collect(),
            page_info,
        })
    }

    async fn comments(&self, ctx: &Context<'_>, session_id: ID) -> Result<Vec<Comment>> {
        let auth = require_auth(ctx).gql_err()?;
        let state = ctx.data::<AppState>()?;

        let session_id = decode_id(&session_id, "Session").gql_err()?;
        let rows = service::list_comments(&state.db, &auth, session_id)
            .await
            .gql_err()?;
        Ok(rows.into_iter().map(Comment::from).collect())
    }
}

#[derive(Default)]
pub struct SessionMutation;

impl SessionMutation {
    async fn transition(
        ctx: &Context<'_>,
        auth: AuthContext,
        input: SessionIdInput,
        action: SessionAction,
    ) -> Result<SessionPayload> {
        let state = ctx.data::<AppState>()?;

        let session_id = decode_id(&input.session_id, "Session").gql_err()?;
        let row = service::transition_session(&state.db, &auth, session_id, action)
            .await
            .gql_err()?;

        Ok(SessionPayload {
            client_mutation_id: input.mutation.client_mutation_id,
            session: row.into(),
        })
    }
}

#[Object]
impl SessionMutation {
    /// Public. The returned tokens are the only way back into the session.
    async fn create_session(
        &self,
        ctx: &Context<'_>,
        input: CreateSessionInput,
    ) -> Result<CreateSessionPayload> {
        let state = ctx.data::<AppState>()?;

        let data = input.validate().gql_err()?;
        let created = service::create_session(&state.db, data).await.gql_err()?;

        Ok(CreateSessionPayload {
            client_mutation_id: input.mutation.client_mutation_id,
            session: created.session.into(),
            editor_token: created.editor_token,
            admin_token: created.admin_token,
        })
    }

    async fn confirm_session(
        &self,
        ctx: &Context<'_>,
        input: SessionIdInput,
    ) -> Result<SessionPayload> {
        let auth = require_auth(ctx).gql_err()?;
        Self::transition(ctx, auth, input, SessionAction::Confirm).await
    }

    async fn mark_done(&self, ctx: &Context<'_>, input: SessionIdInput) -> Result<SessionPayload> {
        let auth = require_auth(ctx).gql_err()?;
        Self::transition(ctx, auth, input, SessionAction::MarkDone).await
    }

    async fn reopen_session(
        &self,
        ctx: &Context<'_>,
        input: SessionIdInput,
    ) -> Result<SessionPayload> {
        let auth = require_admin(ctx).gql_err()?;
        Self::transition(ctx, auth, input, SessionAction::Reopen).await
    }

    async fn delete_session(
        &self,
        ctx: &Context<'_>,
        input: SessionIdInput,
    ) -> Result<DeleteSessionPayload> {
        let auth = require_admin(ctx).gql_err()?;
        let state = ctx.data::<AppState>()?;

        let session_id = decode_id(&input.session_id, "Session").gql_err()?;
        service::delete_session(&state.db, &auth, session_id)
            .await
            .gql_err()?;

        Ok(DeleteSessionPayload {
            client_mutation_id: input.mutation.client_mutation_id,
            deleted_session_id: to_global_id("Session", session_id),
        })
    }

    async fn update_session(
        &self,
        ctx: &Context<'_>,
        input: UpdateSessionInput,
    ) -> Result<SessionPayload> {
        let auth = require_auth(ctx).gql_err()?;
        let state = ctx.data::<AppState>()?;

        let (session_id, patch) = input.validate().gql_err()?;
        let row = service::update_session(&state.db, &auth, session_id, patch)
            .await
            .gql_err()?;

        Ok(SessionPayload {
            client_mutation_id: input.mutation.client_mutation_id,
            session: row.into(),
        })
    }

    /// Lifts the attachment structure lock for this session.
    async fn admin_unlock(
        &self,
        ctx: &Context<'_>,
        input: SessionIdInput,
    ) -> Result<SessionPayload> {
        let auth = require_admin(ctx).gql_err()?;
        let state = ctx.data::<AppState>()?;

        let session_id = decode_id(&input.session_id, "Session").gql_err()?;
        let row = service::admin_unlock(&state.db, &auth, session_id)
            .await
            .gql_err()?;

        Ok(SessionPayload {
            client_mutation_id: input.mutation.client_mutation_id,
            session: row.into(),
        })
    }

    async fn set_attendance(
        &self,
        ctx: &Context<'_>,
        input: SetAttendanceInput,
    ) -> Result<SessionPayload> {
        let auth = require_auth(ctx).gql_err()?;
        let state = ctx.data::<AppState>()?;

        let session_id = decode_id(&input.session_id, "Session").gql_err()?;
        let friend_id = decode_id(&input.friend_id, "Friend").gql_err()?;
        let row = service::set_attendance(&state.db, &auth, session_id, friend_id, input.status)
            .await
            .gql_err()?;

        Ok(SessionPayload {
            client_mutation_id: input.mutation.client_mutation_id,
            session: row.into(),
        })
    }

    async fn set_team_member(
        &self,
        ctx: &Context<'_>,
        input: SetTeamMemberInput,
    ) -> Result<SessionPayload> {
        let auth = require_auth(ctx).gql_err()?;
        let state = ctx.data::<AppState>()?;

        let session_id = decode_id(&input.session_id, "Session").gql_err()?;
        let assignment = TeamAssignmentInput {
            friend_id: input.friend_id,
            team: input.team,
            lane: input.lane,
        }
        .validate()
        .gql_err()?;
        let row = service::set_team_members(&state.db, &auth, session_id, &[assignment])
            .await
            .gql_err()?;

        Ok(SessionPayload {
            client_mutation_id: input.mutation.client_mutation_id,
            session: row.into(),
        })
    }

    /// Upserts every assignment in one transaction; members not listed stay.
    async fn bulk_set_teams(
        &self,
        ctx: &Context<'_>,
        input: BulkSetTeamsInput,
    ) -> Result<SessionPayload> {
        let auth = require_auth(ctx).gql_err()?;
        let state = ctx.data::<AppState>()?;

        let session_id = decode_id(&input.session_id, "Session").gql_err()?;
        let assignments = input
            .assignments
            .iter()
            .map(TeamAssignmentInput::validate)
            .collect::<std::result::Result<Vec<_>, _>>()
            .gql_err()?;
        let row = service::set_team_members(&state.db, &auth, session_id, &assignments)
            .await
            .gql_err()?;

        Ok(SessionPayload {
            client_mutation_id: input.mutation.client_mutation_id,
            session: row.into(),
        })
    }

    async fn remove_team_member(
        &self,
        ctx: &Context<'_>,
        input: RemoveTeamMemberInput,
    ) -> Result<SessionPayload> {
        let auth = require_auth(ctx).gql_err()?;
        let state = ctx.data::<AppState>()?;

        let session_id = decode_id(&input.session_id, "Session").gql_err()?;
        let friend_id = decode_id(&input.friend_id, "Friend").gql_err()?;
        let row = service::remove_team_member(&state.db, &auth, session_id, friend_id)
            .await
            .gql_err()?;

        Ok(SessionPayload {
            client_mutation_id: input.mutation.client_mutation_id,
            session: row.into(),
        })
    }

    async fn create_comment(
        &self,
        ctx: &Context<'_>,
        input: CreateCommentInput,
    ) -> Result<CommentPayload> {
        let auth = require_auth(ctx).gql_err()?;
        let state = ctx.data::<AppState>()?;

        let (session_id, comment) = input.validate().gql_err()?;
        let row = service::create_comment(&state.db, &auth, session_id, comment)
            .await
            .gql_err()?;

        Ok(CommentPayload {
            client_mutation_id: input.mutation.client_mutation_id,
            comment: row.into(),
        })
    }

    async fn delete_comment(
        &self,
        ctx: &Context<'_>,
        input: DeleteCommentInput,
    ) -> Result<DeleteCommentPayload> {
        let auth = require_auth(ctx).gql_err()?;
        let state = ctx.data::<AppState>()?;

        let comment_id = decode_id(&input.comment_id, "Comment").gql_err()?;
        service::delete_comment(&state.db, &auth, comment_id)
            .await
            .gql_err()?;

        Ok(DeleteCommentPayload {
            client_mutation_id: input.mutation.client_mutation_id,
            deleted_comment_id: to_global_id("Comment", comment_id),
        })
    }
}
