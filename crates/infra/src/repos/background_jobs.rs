use sqlx::{PgExecutor, Result as SqlxResult};
use uuid::Uuid;

pub const CLEANUP_STORAGE_OBJECTS: &str = "cleanup_s3_objects";
pub const EXTRACT_LOL_END_SCREEN: &str = "lol_endscreen_extract";

/// Appends a job to the outbox. Workers are deployed separately.
pub async fn enqueue<'e>(
    executor: impl PgExecutor<'e>,
    task_identifier: &str,
    payload: serde_json::Value,
) -> SqlxResult<Uuid> {
    sqlx::query_scalar::<_, Uuid>(
        r#"
        INSERT INTO background_jobs (id, task_identifier, payload)
        VALUES ($1, $2, $3)
        RETURNING id
        "#,
    )
    .bind(Uuid::now_v7())
    .bind(task_identifier)
    .bind(payload)
    .fetch_one(executor)
    .await
}
