use sqlx::{PgExecutor, Result as SqlxResult};
use uuid::Uuid;

use crate::models::ExtractionResultRow;

const EXTRACTION_COLUMNS: &str = "id, attachment_id, match_id, status, model, result, created_at";

/// Creates a PENDING result for the attachment.
pub async fn create_pending<'e>(
    executor: impl PgExecutor<'e>,
    attachment_id: Uuid,
    match_id: Uuid,
) -> SqlxResult<ExtractionResultRow> {
    sqlx::query_as::<_, ExtractionResultRow>(&format!(
        r#"
        INSERT INTO extraction_results (id, attachment_id, match_id, status)
        VALUES ($1, $2, $3, 'PENDING')
        RETURNING {EXTRACTION_COLUMNS}
        "#
    ))
    .bind(Uuid::now_v7())
    .bind(attachment_id)
    .bind(match_id)
    .fetch_one(executor)
    .await
}

pub async fn get_by_id<'e>(
    executor: impl PgExecutor<'e>,
    id: Uuid,
) -> SqlxResult<Option<ExtractionResultRow>> {
    sqlx::query_as::<_, ExtractionResultRow>(&format!(
        "SELECT {EXTRACTION_COLUMNS} FROM extraction_results WHERE id = $1"
    ))
    .bind(id)
    .fetch_optional(executor)
    .await
}

pub async fn get_by_attachment<'e>(
    executor: impl PgExecutor<'e>,
    attachment_id: Uuid,
) -> SqlxResult<Option<ExtractionResultRow>> {
    sqlx::query_as::<_, ExtractionResultRow>(&format!(
        "SELECT {EXTRACTION_COLUMNS} FROM extraction_results WHERE attachment_id = $1"
    ))
    .bind(attachment_id)
    .fetch_optional(executor)
    .await
}

pub async fn list_by_match<'e>(
    executor: impl PgExecutor<'e>,
    match_id: Uuid,
) -> SqlxResult<Vec<ExtractionResultRow>> {
    sqlx::query_as::<_, ExtractionResultRow>(&format!(
        r#"
        SELECT {EXTRACTION_COLUMNS}
        FROM extraction_results
        WHERE match_id = $1
        ORDER BY created_at ASC, id ASC
        "#
    ))
    .bind(match_id)
    .fetch_all(executor)
    .await
}
