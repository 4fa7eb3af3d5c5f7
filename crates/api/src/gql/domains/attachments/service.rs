use serde_json::json;
use sqlx::PgPool;
use uuid::Uuid;

use super::types::{CompletedUpload, PresignedUpload, UploadRequest};
use crate::auth::{assert_session_access, AuthContext};
use crate::domain::{AttachmentType, DomainError, ValidationErrors};
use crate::storage::S3Presigner;
use infra::models::AttachmentRow;
use infra::repos::{
    attachments, background_jobs, extraction_results, matches, sessions, CreateAttachment,
};

/// Screenshots per session.
pub const ATTACHMENT_LIMIT: i64 = 10;

pub fn upload_key(session_id: Uuid, upload_id: Uuid) -> String {
    format!("sessions/{session_id}/attachments/{upload_id}")
}

/// `matchId` must name a match of the same session.
fn match_outside_session() -> DomainError {
    let mut errors = ValidationErrors::default();
    errors.push("matchId", "does not belong to this session");
    errors.into()
}

pub async fn create_presigned_upload(
    pool: &PgPool,
    storage: &S3Presigner,
    auth: &AuthContext,
    request: UploadRequest,
) -> Result<PresignedUpload, DomainError> {
    let session_id = request.session_id;
    let mut uploads =
        create_presigned_uploads(pool, storage, auth, session_id, vec![request]).await?;
    uploads
        .pop()
        .ok_or_else(|| DomainError::Internal("presigning returned no upload".into()))
}

/// Reserves one key per file. The limit counts the whole batch.
pub async fn create_presigned_uploads(
    pool: &PgPool,
    storage: &S3Presigner,
    auth: &AuthContext,
    session_id: Uuid,
    requests: Vec<UploadRequest>,
) -> Result<Vec<PresignedUpload>, DomainError> {
    assert_session_access(auth, session_id)?;

    sessions::get_by_id(pool, session_id)
        .await?
        .ok_or(DomainError::SessionNotFound)?;
    for match_id in requests.iter().filter_map(|r| r.match_id) {
        let row = matches::get_by_id(pool, match_id)
            .await?
            .ok_or(DomainError::MatchNotFound)?;
        if row.session_id != session_id {
            return Err(match_outside_session());
        }
    }

    let count = attachments::count_by_session(pool, session_id).await?;
    if exceeds_limit(count, requests.len()) {
        return Err(DomainError::AttachmentLimitExceeded);
    }

    let mut uploads = Vec::with_capacity(requests.len());
    for request in &requests {
        let upload_id = upload_key(session_id, Uuid::now_v7());
        let presigned_url = storage.presign_put(&upload_id, &request.content_type).await?;
        uploads.push(PresignedUpload {
            upload_id,
            presigned_url,
        });
    }
    Ok(uploads)
}

fn exceeds_limit(existing: i64, adding: usize) -> bool {
    let adding = i64::try_from(adding).unwrap_or(i64::MAX);
    existing.saturating_add(adding) > ATTACHMENT_LIMIT
}

pub async fn complete_upload(
    pool: &PgPool,
    auth: &AuthContext,
    upload: CompletedUpload,
) -> Result<AttachmentRow, DomainError> {
    let mut rows = complete_uploads(pool, auth, vec![upload]).await?;
    rows.pop()
        .ok_or_else(|| DomainError::Internal("completion returned no attachment".into()))
}

/// Registers uploaded objects of one session. The limit is checked with the
/// session row locked so concurrent completions cannot overshoot it.
pub async fn complete_uploads(
    pool: &PgPool,
    auth: &AuthContext,
    uploads: Vec<CompletedUpload>,
) -> Result<Vec<AttachmentRow>, DomainError> {
    let Some(session_id) = uploads.first().map(|u| u.session_id) else {
        return Ok(Vec::new());
    };
    assert_session_access(auth, session_id)?;

    let mut tx = pool.begin().await?;

    sessions::get_by_id_for_update(&mut *tx, session_id)
        .await?
        .ok_or(DomainError::SessionNotFound)?;

    let count = attachments::count_by_session(&mut *tx, session_id).await?;
    if exceeds_limit(count, uploads.len()) {
        return Err(DomainError::AttachmentLimitExceeded);
    }

    let mut created = Vec::with_capacity(uploads.len());
    for upload in uploads {
        if let Some(match_id) = upload.match_id {
            let row = matches::get_by_id(&mut *tx, match_id)
                .await?
                .ok_or(DomainError::MatchNotFound)?;
            if row.session_id != session_id {
                return Err(match_outside_session());
            }
        }

        let attachment = attachments::create(
            &mut *tx,
            CreateAttachment {
                session_id,
                match_id: upload.match_id,
                scope: upload.scope.into(),
                attachment_type: upload.attachment_type.into(),
                s3_key: upload.s3_key,
                content_type: upload.content_type,
                size: upload.size,
                width: upload.width,
                height: upload.height,
                original_file_name: upload.original_file_name,
            },
        )
        .await?;

        if let (AttachmentType::LolResultScreen, Some(match_id)) =
            (upload.attachment_type, upload.match_id)
        {
            extraction_results::create_pending(&mut *tx, attachment.id, match_id).await?;
            background_jobs::enqueue(
                &mut *tx,
                background_jobs::EXTRACT_LOL_END_SCREEN,
                json!({ "attachmentId": attachment.id, "matchId": match_id }),
            )
            .await?;
        }
        created.push(attachment);
    }

    tx.commit().await?;

    tracing::info!(
        session_id = %session_id,
        attachments = created.len(),
        "attachments registered"
    );
    Ok(created)
}

pub async fn get_attachment(
    pool: &PgPool,
    auth: &AuthContext,
    attachment_id: Uuid,
) -> Result<AttachmentRow, DomainError> {
    let row = attachments::get_by_id(pool, attachment_id)
        .await?
        .ok_or(DomainError::AttachmentNotFound)?;
    assert_session_access(auth, row.session_id)?;
    Ok(row)
}

/// Deletes the row and queues the stored object for removal.
pub async fn delete_attachment(
    pool: &PgPool,
    auth: &AuthContext,
    attachment_id: Uuid,
) -> Result<(), DomainError> {
    let mut tx = pool.begin().await?;

    let row = attachments::get_by_id(&mut *tx, attachment_id)
        .await?
        .ok_or(DomainError::AttachmentNotFound)?;
    assert_session_access(auth, row.session_id)?;

    attachments::delete(&mut *tx, attachment_id).await?;
    background_jobs::enqueue(
        &mut *tx,
        background_jobs::CLEANUP_STORAGE_OBJECTS,
        json!({ "s3Keys": [row.s3_key] }),
    )
    .await?;

    tx.commit().await?;

    tracing::info!(attachment_id = %attachment_id, "attachment deleted");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn upload_keys_are_scoped_to_the_session() {
        let session_id = Uuid::now_v7();
        let upload_id = Uuid::now_v7();
        assert_eq!(
            upload_key(session_id, upload_id),
            format!("sessions/{session_id}/attachments/{upload_id}")
        );
    }

    #[test]
    fn limit_counts_the_whole_batch() {
        assert!(!exceeds_limit(0, 10));
        assert!(exceeds_limit(0, 11));
        assert!(!exceeds_limit(7, 3));
        assert!(exceeds_limit(7, 4));
        assert!(exceeds_limit(10, 1));
        assert!(!exceeds_limit(10, 0));
    }

    #[test]
    fn foreign_match_is_a_validation_error() {
        let err = match_outside_session();
        assert_eq!(err.code(), "VALIDATION_ERROR");
        assert_eq!(err.status(), 400);
    }
}
