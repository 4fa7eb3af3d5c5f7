use async_graphql::{ComplexObject, Context, InputObject, Json, Result, SimpleObject, ID};
use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::domain::validation::{optional_text, positive, required_text};
use crate::domain::{
    AttachmentScope, AttachmentType, DomainError, ExtractionStatus, ValidationErrors,
};
use crate::gql::error::ResultExt;
use crate::gql::relay::{decode_id, to_global_id, ClientMutationId};
use crate::state::AppState;
use infra::repos::extraction_results;

const CONTENT_TYPE_MAX: usize = 100;
const FILE_NAME_MAX: usize = 255;

#[derive(SimpleObject, Clone)]
#[graphql(complex)]
pub struct Attachment {
    pub id: ID,
    #[graphql(skip)]
    pub local_id: Uuid,
    pub session_id: ID,
    pub match_id: Option<ID>,
    pub s3_key: String,
    pub scope: AttachmentScope,
    #[graphql(name = "type")]
    pub attachment_type: AttachmentType,
    pub content_type: String,
    pub size: i32,
    pub width: Option<i32>,
    pub height: Option<i32>,
    pub original_file_name: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl From<infra::models::AttachmentRow> for Attachment {
    fn from(row: infra::models::AttachmentRow) -> Self {
        Self {
            id: to_global_id("Attachment", row.id),
            local_id: row.id,
            session_id: to_global_id("Session", row.session_id),
            match_id: row.match_id.map(|id| to_global_id("Match", id)),
            s3_key: row.s3_key,
            scope: row.scope.into(),
            attachment_type: row.attachment_type.into(),
            content_type: row.content_type,
            size: row.size,
            width: row.width,
            height: row.height,
            original_file_name: row.original_file_name,
            created_at: row.created_at,
        }
    }
}

#[ComplexObject]
impl Attachment {
    /// Presigned download URL, valid for an hour. Null when storage is not configured.
    async fn url(&self, ctx: &Context<'_>) -> Result<Option<String>> {
        let state = ctx.data::<AppState>()?;
        let Ok(storage) = state.storage() else {
            return Ok(None);
        };
        storage.presign_get(&self.s3_key).await.map(Some).gql_err()
    }

    async fn extraction_result(&self, ctx: &Context<'_>) -> Result<Option<ExtractionResult>> {
        let state = ctx.data::<AppState>()?;
        let row = extraction_results::get_by_attachment(&state.db, self.local_id)
            .await
            .gql_err()?;
        Ok(row.map(|row| ExtractionResult::from_dto(row.into())))
    }
}

/// Extraction output as the application layer hands it out.
#[derive(Debug, Clone, PartialEq)]
pub struct ExtractionResultDto {
    pub id: Uuid,
    pub attachment_id: Uuid,
    pub match_id: Uuid,
    pub status: ExtractionStatus,
    pub model: Option<String>,
    pub result: Option<serde_json::Value>,
    pub created_at: DateTime<Utc>,
}

impl From<infra::models::ExtractionResultRow> for ExtractionResultDto {
    fn from(row: infra::models::ExtractionResultRow) -> Self {
        Self {
            id: row.id,
            attachment_id: row.attachment_id,
            match_id: row.match_id,
            status: row.status.into(),
            model: row.model,
            result: row.result,
            created_at: row.created_at,
        }
    }
}

#[derive(SimpleObject, Clone)]
pub struct ExtractionResult {
    pub id: ID,
    #[graphql(skip)]
    pub local_id: Uuid,
    pub attachment_id: ID,
    pub match_id: ID,
    pub status: ExtractionStatus,
    pub model: Option<String>,
    /// Raw extractor output; shape depends on `model`.
    pub result: Option<Json<serde_json::Value>>,
    pub created_at: DateTime<Utc>,
}

impl ExtractionResult {
    pub fn from_dto(dto: ExtractionResultDto) -> Self {
        Self {
            id: to_global_id("ExtractionResult", dto.id),
            local_id: dto.id,
            attachment_id: to_global_id("Attachment", dto.attachment_id),
            match_id: to_global_id("Match", dto.match_id),
            status: dto.status,
            model: dto.model,
            result: dto.result.map(Json),
            created_at: dto.created_at,
        }
    }
}

#[derive(SimpleObject, Clone)]
pub struct PresignedUpload {
    /// Storage key; pass it back to `completeUpload`.
    pub upload_id: String,
    pub presigned_url: String,
}

/// MATCH scope needs a match, SESSION scope must not name one.
fn validate_scope(
    errors: &mut ValidationErrors,
    scope: AttachmentScope,
    match_id: Option<&ID>,
) -> Result<Option<Uuid>, DomainError> {
    let match_id = match match_id {
        Some(id) => Some(decode_id(id, "Match")?),
        None => None,
    };
    match (scope, match_id) {
        (AttachmentScope::Match, None) => errors.push("matchId", "is required for MATCH scope"),
        (AttachmentScope::Session, Some(_)) => {
            errors.push("matchId", "must be empty for SESSION scope")
        }
        _ => {}
    }
    Ok(match_id)
}

// Validated inputs

#[derive(Debug, Clone, PartialEq)]
pub struct UploadRequest {
    pub session_id: Uuid,
    pub match_id: Option<Uuid>,
    pub content_type: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CompletedUpload {
    pub session_id: Uuid,
    pub match_id: Option<Uuid>,
    pub scope: AttachmentScope,
    pub attachment_type: AttachmentType,
    pub s3_key: String,
    pub content_type: String,
    pub size: i32,
    pub width: Option<i32>,
    pub height: Option<i32>,
    pub original_file_name: Option<String>,
}

// Input types

#[derive(InputObject, Clone)]
pub struct PresignedUploadFileInput {
    pub match_id: Option<ID>,
    pub scope: AttachmentScope,
    #[graphql(name = "type")]
    pub attachment_type: AttachmentType,
    pub content_type: String,
    pub original_file_name: Option<String>,
}

impl PresignedUploadFileInput {
    pub fn validate(&self, session_id: Uuid) -> Result<UploadRequest, DomainError> {
        let mut errors = ValidationErrors::default();
        let match_id = validate_scope(&mut errors, self.scope, self.match_id.as_ref())?;
        let content_type =
            required_text(&mut errors, "contentType", &self.content_type, CONTENT_TYPE_MAX);
        optional_text(
            &mut errors,
            "originalFileName",
            self.original_file_name.as_deref(),
            FILE_NAME_MAX,
        );
        Ok(errors.finish(UploadRequest {
            session_id,
            match_id,
            content_type,
        })?)
    }
}

#[derive(InputObject)]
pub struct CreatePresignedUploadInput {
    #[graphql(flatten)]
    pub mutation: ClientMutationId,
    pub session_id: ID,
    pub match_id: Option<ID>,
    pub scope: AttachmentScope,
    #[graphql(name = "type")]
    pub attachment_type: AttachmentType,
    pub content_type: String,
    pub original_file_name: Option<String>,
}

impl CreatePresignedUploadInput {
    pub fn validate(&self) -> Result<UploadRequest, DomainError> {
        let session_id = decode_id(&self.session_id, "Session")?;
        PresignedUploadFileInput {
            match_id: self.match_id.clone(),
            scope: self.scope,
            attachment_type: self.attachment_type,
            content_type: self.content_type.clone(),
            original_file_name: self.original_file_name.clone(),
        }
        .validate(session_id)
    }
}

#[derive(InputObject)]
pub struct CreatePresignedUploadsInput {
    #[graphql(flatten)]
    pub mutation: ClientMutationId,
    pub session_id: ID,
    pub files: Vec<PresignedUploadFileInput>,
}

impl CreatePresignedUploadsInput {
    pub fn validate(&self) -> Result<(Uuid, Vec<UploadRequest>), DomainError> {
        let session_id = decode_id(&self.session_id, "Session")?;
        let requests = self
            .files
            .iter()
            .map(|file| file.validate(session_id))
            .collect::<Result<Vec<_>, _>>()?;
        Ok((session_id, requests))
    }
}

#[derive(InputObject, Clone)]
pub struct CompleteUploadFileInput {
    pub upload_id: String,
    pub session_id: ID,
    pub match_id: Option<ID>,
    pub scope: AttachmentScope,
    #[graphql(name = "type")]
    pub attachment_type: AttachmentType,
    pub content_type: String,
    /// Bytes.
    pub size: i32,
    pub width: Option<i32>,
    pub height: Option<i32>,
    pub original_file_name: Option<String>,
}

impl CompleteUploadFileInput {
    pub fn validate(&self) -> Result<CompletedUpload, DomainError> {
        let session_id = decode_id(&self.session_id, "Session")?;
        let mut errors = ValidationErrors::default();

        let s3_key = self.upload_id.trim().to_string();
        let prefix = format!("sessions/{session_id}/attachments/");
        let suffix_is_id = s3_key
            .strip_prefix(&prefix)
            .is_some_and(|rest| Uuid::parse_str(rest).is_ok());
        if !suffix_is_id {
            errors.push("uploadId", "does not belong to this session");
        }

        let match_id = validate_scope(&mut errors, self.scope, self.match_id.as_ref())?;
        let content_type =
            required_text(&mut errors, "contentType", &self.content_type, CONTENT_TYPE_MAX);
        let size = positive(&mut errors, "size", self.size);
        let width = self.width.map(|w| positive(&mut errors, "width", w));
        let height = self.height.map(|h| positive(&mut errors, "height", h));
        let original_file_name = optional_text(
            &mut errors,
            "originalFileName",
            self.original_file_name.as_deref(),
            FILE_NAME_MAX,
        );

        Ok(errors.finish(CompletedUpload {
            session_id,
            match_id,
            scope: self.scope,
            attachment_type: self.attachment_type,
            s3_key,
            content_type,
            size,
            width,
            height,
            original_file_name,
        })?)
    }
}

#[derive(InputObject)]
pub struct CompleteUploadInput {
    #[graphql(flatten)]
    pub mutation: ClientMutationId,
    pub upload_id: String,
    pub session_id: ID,
    pub match_id: Option<ID>,
    pub scope: AttachmentScope,
    #[graphql(name = "type")]
    pub attachment_type: AttachmentType,
    pub content_type: String,
    /// Bytes.
    pub size: i32,
    pub width: Option<i32>,
    pub height: Option<i32>,
    pub original_file_name: Option<String>,
}

impl CompleteUploadInput {
    pub fn validate(&self) -> Result<CompletedUpload, DomainError> {
        CompleteUploadFileInput {
            upload_id: self.upload_id.clone(),
            session_id: self.session_id.clone(),
            match_id: self.match_id.clone(),
            scope: self.scope,
            attachment_type: self.attachment_type,
            content_type: self.content_type.clone(),
            size: self.size,
            width: self.width,
            height: self.height,
            original_file_name: self.original_file_name.clone(),
        }
        .validate()
    }
}

#[derive(InputObject)]
pub struct CompleteUploadsInput {
    #[graphql(flatten)]
    pub mutation: ClientMutationId,
    pub files: Vec<CompleteUploadFileInput>,
}

impl CompleteUploadsInput {
    /// Every file must belong to the same session.
    pub fn validate(&self) -> Result<Vec<CompletedUpload>, DomainError> {
        let uploads = self
            .files
            .iter()
            .map(CompleteUploadFileInput::validate)
            .collect::<Result<Vec<_>, _>>()?;
        if let Some(first) = uploads.first() {
            if uploads.iter().any(|u| u.session_id != first.session_id) {
                let mut errors = ValidationErrors::default();
                errors.push("files", "must all belong to one session");
                return Err(errors.into());
            }
        }
        Ok(uploads)
    }
}

#[derive(InputObject)]
pub struct DeleteAttachmentInput {
    #[graphql(flatten)]
    pub mutation: ClientMutationId,
    pub attachment_id: ID,
}

// Payloads

#[derive(SimpleObject)]
pub struct CreatePresignedUploadPayload {
    pub client_mutation_id: Option<String>,
    pub upload: PresignedUpload,
}

#[derive(SimpleObject)]
pub struct CreatePresignedUploadsPayload {
    pub client_mutation_id: Option<String>,
    pub uploads: Vec<PresignedUpload>,
}

#[derive(SimpleObject)]
pub struct CompleteUploadsPayload {
    pub client_mutation_id: Option<String>,
    pub attachments: Vec<Attachment>,
}

#[derive(SimpleObject)]
pub struct CompleteUploadPayload {
    pub client_mutation_id: Option<String>,
    pub attachment: Attachment,
}

#[derive(SimpleObject)]
pub struct DeleteAttachmentPayload {
    pub client_mutation_id: Option<String>,
    pub deleted_attachment_id: ID,
}
