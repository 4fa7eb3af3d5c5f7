use sqlx::{PgExecutor, Result as SqlxResult};
use uuid::Uuid;

use crate::models::{AttachmentRow, AttachmentScope, AttachmentType};

const ATTACHMENT_COLUMNS: &str = "id, session_id, match_id, scope, type, s3_key, content_type, \
     size, width, height, original_file_name, created_at";

#[derive(Debug, Clone)]
pub struct CreateAttachment {
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

pub async fn create<'e>(
    executor: impl PgExecutor<'e>,
    data: CreateAttachment,
) -> SqlxResult<AttachmentRow> {
    sqlx::query_as::<_, AttachmentRow>(&format!(
        r#"
        INSERT INTO attachments (id, session_id, match_id, scope, type, s3_key, content_type,
                                 size, width, height, original_file_name)
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11)
        RETURNING {ATTACHMENT_COLUMNS}
        "#
    ))
    .bind(Uuid::now_v7())
    .bind(data.session_id)
    .bind(data.match_id)
    .bind(data.scope)
    .bind(data.attachment_type)
    .bind(data.s3_key)
    .bind(data.content_type)
    .bind(data.size)
    .bind(data.width)
    .bind(data.height)
    .bind(data.original_file_name)
    .fetch_one(executor)
    .await
}

pub async fn get_by_id<'e>(
    executor: impl PgExecutor<'e>,
    id: Uuid,
) -> SqlxResult<Option<AttachmentRow>> {
    sqlx::query_as::<_, AttachmentRow>(&format!(
        "SELECT {ATTACHMENT_COLUMNS} FROM attachments WHERE id = $1"
    ))
    .bind(id)
    .fetch_optional(executor)
    .await
}

pub async fn list_by_session<'e>(
    executor: impl PgExecutor<'e>,
    session_id: Uuid,
) -> SqlxResult<Vec<AttachmentRow>> {
    sqlx::query_as::<_, AttachmentRow>(&format!(
        r#"
        SELECT {ATTACHMENT_COLUMNS}
        FROM attachments
        WHERE session_id = $1
        ORDER BY created_at ASC, id ASC
        "#
    ))
    .bind(session_id)
    .fetch_all(executor)
    .await
}

pub async fn list_by_match<'e>(
    executor: impl PgExecutor<'e>,
    match_id: Uuid,
) -> SqlxResult<Vec<AttachmentRow>> {
    sqlx::query_as::<_, AttachmentRow>(&format!(
        r#"
        SELECT {ATTACHMENT_COLUMNS}
        FROM attachments
        WHERE match_id = $1
        ORDER BY created_at ASC, id ASC
        "#
    ))
    .bind(match_id)
    .fetch_all(executor)
    .await
}

pub async fn count_by_session<'e>(
    executor: impl PgExecutor<'e>,
    session_id: Uuid,
) -> SqlxResult<i64> {
    sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM attachments WHERE session_id = $1")
        .bind(session_id)
        .fetch_one(executor)
        .await
}

/// Storage keys of every attachment in the session, collected before a cascade delete.
pub async fn list_keys_by_session<'e>(
    executor: impl PgExecutor<'e>,
    session_id: Uuid,
) -> SqlxResult<Vec<String>> {
    sqlx::query_scalar::<_, String>("SELECT s3_key FROM attachments WHERE session_id = $1")
        .bind(session_id)
        .fetch_all(executor)
        .await
}

pub async fn list_keys_by_match<'e>(
    executor: impl PgExecutor<'e>,
    match_id: Uuid,
) -> SqlxResult<Vec<String>> {
    sqlx::query_scalar::<_, String>("SELECT s3_key FROM attachments WHERE match_id = $1")
        .bind(match_id)
        .fetch_all(executor)
        .await
}

pub async fn delete<'e>(executor: impl PgExecutor<'e>, id: Uuid) -> SqlxResult<u64> {
    let result = sqlx::query("DELETE FROM attachments WHERE id = $1")
        .bind(id)
        .execute(executor)
        .await?;
    Ok(result.rows_affected())
}
