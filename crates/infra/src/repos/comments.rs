use sqlx::{PgExecutor, Result as SqlxResult};
use uuid::Uuid;

use crate::models::CommentRow;

pub async fn create<'e>(
    executor: impl PgExecutor<'e>,
    session_id: Uuid,
    body: String,
    display_name: Option<String>,
) -> SqlxResult<CommentRow> {
    sqlx::query_as::<_, CommentRow>(
        r#"
        INSERT INTO comments (id, session_id, body, display_name)
        VALUES ($1, $2, $3, $4)
        RETURNING id, session_id, body, display_name, created_at
        "#,
    )
    .bind(Uuid::now_v7())
    .bind(session_id)
    .bind(body)
    .bind(display_name)
    .fetch_one(executor)
    .await
}

pub async fn get_by_id<'e>(
    executor: impl PgExecutor<'e>,
    id: Uuid,
) -> SqlxResult<Option<CommentRow>> {
    sqlx::query_as::<_, CommentRow>(
        "SELECT id, session_id, body, display_name, created_at FROM comments WHERE id = $1",
    )
    .bind(id)
    .fetch_optional(executor)
    .await
}

pub async fn list_by_session<'e>(
    executor: impl PgExecutor<'e>,
    session_id: Uuid,
) -> SqlxResult<Vec<CommentRow>> {
    sqlx::query_as::<_, CommentRow>(
        r#"
        SELECT id, session_id, body, display_name, created_at
        FROM comments
        WHERE session_id = $1
        ORDER BY created_at ASC, id ASC
        "#,
    )
    .bind(session_id)
    .fetch_all(executor)
    .await
}

pub async fn delete<'e>(executor: impl PgExecutor<'e>, id: Uuid) -> SqlxResult<u64> {
    let result = sqlx::query("DELETE FROM comments WHERE id = $1")
        .bind(id)
        .execute(executor)
        .await?;
    Ok(result.rows_affected())
}
