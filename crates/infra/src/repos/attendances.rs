use sqlx::{PgExecutor, Result as SqlxResult};
use uuid::Uuid;

use crate::models::{AttendanceRow, AttendanceStatus};

const ATTENDANCE_COLUMNS: &str = "id, session_id, friend_id, status, created_at, updated_at";

/// Seeds one UNDECIDED row per friend.
pub async fn create_undecided<'e>(
    executor: impl PgExecutor<'e>,
    session_id: Uuid,
    friend_ids: &[Uuid],
) -> SqlxResult<u64> {
    if friend_ids.is_empty() {
        return Ok(0);
    }
    let ids: Vec<Uuid> = friend_ids.iter().map(|_| Uuid::now_v7()).collect();

    let result = sqlx::query(
        r#"
        INSERT INTO attendances (id, session_id, friend_id, status)
        SELECT t.id, $2, t.friend_id, 'UNDECIDED'
        FROM UNNEST($1::uuid[], $3::uuid[]) AS t(id, friend_id)
        ON CONFLICT (session_id, friend_id) DO NOTHING
        "#,
    )
    .bind(&ids)
    .bind(session_id)
    .bind(friend_ids)
    .execute(executor)
    .await?;
    Ok(result.rows_affected())
}

pub async fn list_by_session<'e>(
    executor: impl PgExecutor<'e>,
    session_id: Uuid,
) -> SqlxResult<Vec<AttendanceRow>> {
    sqlx::query_as::<_, AttendanceRow>(&format!(
        r#"
        SELECT {ATTENDANCE_COLUMNS}
        FROM attendances
        WHERE session_id = $1
        ORDER BY created_at ASC, id ASC
        "#
    ))
    .bind(session_id)
    .fetch_all(executor)
    .await
}

/// Returns `None` when the friend has no attendance row for the session.
pub async fn set_status<'e>(
    executor: impl PgExecutor<'e>,
    session_id: Uuid,
    friend_id: Uuid,
    status: AttendanceStatus,
) -> SqlxResult<Option<AttendanceRow>> {
    sqlx::query_as::<_, AttendanceRow>(&format!(
        r#"
        UPDATE attendances
        SET status = $3, updated_at = NOW()
        WHERE session_id = $1 AND friend_id = $2
        RETURNING {ATTENDANCE_COLUMNS}
        "#
    ))
    .bind(session_id)
    .bind(friend_id)
    .bind(status)
    .fetch_optional(executor)
    .await
}

pub async fn count_attending<'e>(
    executor: impl PgExecutor<'e>,
    session_id: Uuid,
) -> SqlxResult<i64> {
    sqlx::query_scalar::<_, i64>(
        "SELECT COUNT(*) FROM attendances WHERE session_id = $1 AND status = 'ATTENDING'",
    )
    .bind(session_id)
    .fetch_one(executor)
    .await
}
