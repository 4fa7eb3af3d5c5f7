use async_graphql::{Context, Object, Result};

use super::service;
use super::types::{
    Attachment, CompleteUploadInput, CompleteUploadPayload, CompleteUploadsInput,
    CompleteUploadsPayload, CreatePresignedUploadInput, CreatePresignedUploadPayload,
    CreatePresignedUploadsInput, CreatePresignedUploadsPayload, DeleteAttachmentInput,
    DeleteAttachmentPayload,
};
use crate::auth::require_auth;
use crate::gql::error::ResultExt;
use crate::gql::relay::{decode_id, to_global_id};
use crate::state::AppState;

#[derive(Default)]
pub struct AttachmentMutation;

#[Object]
impl AttachmentMutation {
    /// Reserves a storage key and returns a PUT URL for the browser upload.
    async fn create_presigned_upload(
        &self,
        ctx: &Context<'_>,
        input: CreatePresignedUploadInput,
    ) -> Result<CreatePresignedUploadPayload> {
        let auth = require_auth(ctx).gql_err()?;
        let state = ctx.data::<AppState>()?;

        let request = input.validate().gql_err()?;
        let storage = state.storage().gql_err()?;
        let upload = service::create_presigned_upload(&state.db, storage, &auth, request)
            .await
            .gql_err()?;

        Ok(CreatePresignedUploadPayload {
            client_mutation_id: input.mutation.client_mutation_id,
            upload,
        })
    }

    /// Batch form of `createPresignedUpload`; the limit counts every file.
    async fn create_presigned_uploads(
        &self,
        ctx: &Context<'_>,
        input: CreatePresignedUploadsInput,
    ) -> Result<CreatePresignedUploadsPayload> {
        let auth = require_auth(ctx).gql_err()?;
        let state = ctx.data::<AppState>()?;

        let (session_id, requests) = input.validate().gql_err()?;
        let storage = state.storage().gql_err()?;
        let uploads =
            service::create_presigned_uploads(&state.db, storage, &auth, session_id, requests)
                .await
                .gql_err()?;

        Ok(CreatePresignedUploadsPayload {
            client_mutation_id: input.mutation.client_mutation_id,
            uploads,
        })
    }

    async fn complete_upload(
        &self,
        ctx: &Context<'_>,
        input: CompleteUploadInput,
    ) -> Result<CompleteUploadPayload> {
        let auth = require_auth(ctx).gql_err()?;
        let state = ctx.data::<AppState>()?;

        let upload = input.validate().gql_err()?;
        let row = service::complete_upload(&state.db, &auth, upload)
            .await
            .gql_err()?;

        Ok(CompleteUploadPayload {
            client_mutation_id: input.mutation.client_mutation_id,
            attachment: row.into(),
        })
    }

    /// Registers several uploads of one session in a single transaction.
    async fn complete_uploads(
        &self,
        ctx: &Context<'_>,
        input: CompleteUploadsInput,
    ) -> Result<CompleteUploadsPayload> {
        let auth = require_auth(ctx).gql_err()?;
        let state = ctx.data::<AppState>()?;

        let uploads = input.validate().gql_err()?;
        let rows = service::complete_uploads(&state.db, &auth, uploads)
            .await
            .gql_err()?;

        Ok(CompleteUploadsPayload {
            client_mutation_id: input.mutation.client_mutation_id,
            attachments: rows.into_iter().map(Attachment::from).collect(),
        })
    }

    async fn delete_attachment(
        &self,
        ctx: &Context<'_>,
        input: DeleteAttachmentInput,
    ) -> Result<DeleteAttachmentPayload> {
        let auth = require_auth(ctx).gql_err()?;
        let state = ctx.data::<AppState>()?;

        let attachment_id = decode_id(&input.attachment_id, "Attachment").gql_err()?;
        service::delete_attachment(&state.db, &auth, attachment_id)
            .await
            .gql_err()?;

        Ok(DeleteAttachmentPayload {
            client_mutation_id: input.mutation.client_mutation_id,
            deleted_attachment_id: to_global_id("Attachment", attachment_id),
        })
    }
}
