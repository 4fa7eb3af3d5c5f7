mod common;

use api::gql::AppSchema;
use api::gql::build_schema;
use common::*;
use serde_json::json;
use uuid::Uuid;

const COMPLETE: &str = r#"
    mutation($input: CompleteUploadInput!) {
        completeUpload(input: $input) {
            attachment { id s3Key scope type url extractionResult { status matchId } }
        }
    }
"#;

fn upload_input(session: &TestSession) -> serde_json::Value {
    json!({
        "uploadId": format!("sessions/{}/attachments/{}", session.local_id, Uuid::now_v7()),
        "sessionId": session.id,
        "scope": "SESSION",
        "type": "LOL_RESULT_SCREEN",
        "contentType": "image/png",
        "size": 2048,
        "width": 1920,
        "height": 1080,
        "originalFileName": "result.png",
    })
}

async fn complete_upload(
    schema: &AppSchema,
    session: &TestSession,
    input: serde_json::Value,
) -> async_graphql::Response {
    execute_graphql(
        schema,
        COMPLETE,
        vars(json!({ "input": input })),
        Some(editor(session.local_id)),
    )
    .await
}

#[tokio::test]
async fn presigned_uploads_need_storage_configuration() {
    let Some(state) = try_setup_test_db().await else {
        return;
    };
    let schema = build_schema(state);
    let session = create_test_session(&schema, "No bucket").await;

    let response = execute_graphql(
        &schema,
        r#"
        mutation($input: CreatePresignedUploadInput!) {
            createPresignedUpload(input: $input) { upload { uploadId presignedUrl } }
        }
        "#,
        vars(json!({
            "input": {
                "sessionId": session.id,
                "scope": "SESSION",
                "type": "LOL_RESULT_SCREEN",
                "contentType": "image/png",
            }
        })),
        Some(editor(session.local_id)),
    )
    .await;
    assert_eq!(error_code(&response).as_deref(), Some("STORAGE_UNAVAILABLE"));
}

#[tokio::test]
async fn sessions_hold_at_most_ten_attachments() {
    let Some(state) = try_setup_test_db().await else {
        return;
    };
    let schema = build_schema(state);
    let session = create_test_session(&schema, "Screenshot spam").await;

    for _ in 0..10 {
        let response = complete_upload(&schema, &session, upload_input(&session)).await;
        let attachment = &data(&response)["completeUpload"]["attachment"];
        assert_eq!(attachment["scope"], "SESSION");
        assert_eq!(attachment["url"], serde_json::Value::Null);
        assert_eq!(attachment["extractionResult"], serde_json::Value::Null);
    }

    let response = complete_upload(&schema, &session, upload_input(&session)).await;
    assert_eq!(
        error_code(&response).as_deref(),
        Some("ATTACHMENT_LIMIT_EXCEEDED")
    );
}

#[tokio::test]
async fn batch_completion_checks_the_limit_for_all_files_at_once() {
    let Some(state) = try_setup_test_db().await else {
        return;
    };
    let schema = build_schema(state);
    let session = create_test_session(&schema, "Batch upload").await;
    let complete_many = r#"
        mutation($input: CompleteUploadsInput!) {
            completeUploads(input: $input) { clientMutationId attachments { id sessionId } }
        }
    "#;
    let batch = |n: usize| -> Vec<serde_json::Value> {
        (0..n).map(|_| upload_input(&session)).collect()
    };

    let response = execute_graphql(
        &schema,
        complete_many,
        vars(json!({ "input": { "clientMutationId": "b1", "files": batch(8) } })),
        Some(editor(session.local_id)),
    )
    .await;
    let payload = &data(&response)["completeUploads"];
    assert_eq!(payload["clientMutationId"], "b1");
    let attachments = payload["attachments"].as_array().expect("attachments");
    assert_eq!(attachments.len(), 8);
    assert!(attachments.iter().all(|a| a["sessionId"] == session.id.as_str()));

    // 8 + 3 would overshoot; nothing from the batch is kept
    let response = execute_graphql(
        &schema,
        complete_many,
        vars(json!({ "input": { "files": batch(3) } })),
        Some(editor(session.local_id)),
    )
    .await;
    assert_eq!(
        error_code(&response).as_deref(),
        Some("ATTACHMENT_LIMIT_EXCEEDED")
    );

    let response = execute_graphql(
        &schema,
        "query($id: ID!) { session(sessionId: $id) { attachments { id } } }",
        vars(json!({ "id": session.id })),
        Some(editor(session.local_id)),
    )
    .await;
    assert_eq!(
        data(&response)["session"]["attachments"]
            .as_array()
            .map(Vec::len),
        Some(8)
    );

    let response = execute_graphql(
        &schema,
        complete_many,
        vars(json!({ "input": { "files": batch(2) } })),
        Some(editor(session.local_id)),
    )
    .await;
    assert_eq!(
        data(&response)["completeUploads"]["attachments"]
            .as_array()
            .map(Vec::len),
        Some(2)
    );
}

#[tokio::test]
async fn upload_ids_must_belong_to_the_session() {
    let Some(state) = try_setup_test_db().await else {
        return;
    };
    let schema = build_schema(state);
    let session = create_test_session(&schema, "Mine").await;
    let other = create_test_session(&schema, "Theirs").await;

    let mut input = upload_input(&session);
    input["uploadId"] = json!(format!("sessions/{}/attachments/{}", other.local_id, Uuid::now_v7()));

    let response = complete_upload(&schema, &session, input).await;
    assert_eq!(error_code(&response).as_deref(), Some("VALIDATION_ERROR"));
    let ext = response.errors[0].extensions.as_ref().expect("extensions");
    let fields = ext.get("fields").expect("fields").clone().into_json().unwrap();
    assert_eq!(fields[0]["field"], "uploadId");
}

#[tokio::test]
async fn match_result_screens_queue_extraction() {
    let Some(state) = try_setup_test_db().await else {
        return;
    };
    let schema = build_schema(state.clone());
    let session = create_test_session(&schema, "Extraction").await;

    let response = execute_graphql(
        &schema,
        r#"
        mutation($input: CreateMatchFromPresetInput!) {
            createMatchFromPreset(input: $input) { match { id } }
        }
        "#,
        vars(json!({ "input": { "sessionId": session.id } })),
        Some(editor(session.local_id)),
    )
    .await;
    let match_id = data(&response)["createMatchFromPreset"]["match"]["id"].clone();

    let mut input = upload_input(&session);
    input["scope"] = json!("MATCH");
    input["matchId"] = match_id.clone();
    let response = complete_upload(&schema, &session, input).await;
    let attachment = data(&response)["completeUpload"]["attachment"].clone();
    assert_eq!(attachment["extractionResult"]["status"], "PENDING");
    assert_eq!(attachment["extractionResult"]["matchId"], match_id);

    let attachment_local = local_id(&attachment["id"]);
    let queued: i64 = sqlx::query_scalar(
        "SELECT COUNT(*) FROM background_jobs WHERE task_identifier = $1 AND payload->>'attachmentId' = $2",
    )
    .bind("lol_endscreen_extract")
    .bind(attachment_local.to_string())
    .fetch_one(&state.db)
    .await
    .expect("count jobs");
    assert_eq!(queued, 1);

    let response = execute_graphql(
        &schema,
        r#"
        mutation($input: DeleteAttachmentInput!) {
            deleteAttachment(input: $input) { deletedAttachmentId }
        }
        "#,
        vars(json!({ "input": { "attachmentId": attachment["id"] } })),
        Some(editor(session.local_id)),
    )
    .await;
    assert_eq!(
        data(&response)["deleteAttachment"]["deletedAttachmentId"],
        attachment["id"]
    );

    let cleanups: i64 = sqlx::query_scalar(
        "SELECT COUNT(*) FROM background_jobs WHERE task_identifier = $1 AND payload->'s3Keys' ? $2",
    )
    .bind("cleanup_s3_objects")
    .bind(attachment["s3Key"].as_str().expect("s3 key"))
    .fetch_one(&state.db)
    .await
    .expect("count jobs");
    assert_eq!(cleanups, 1);
}

#[tokio::test]
async fn attachments_lock_the_session_structure_until_unlocked() {
    let Some(state) = try_setup_test_db().await else {
        return;
    };
    let schema = build_schema(state);
    let session = create_test_session(&schema, "Locked").await;

    let response = complete_upload(&schema, &session, upload_input(&session)).await;
    data(&response);

    let bulk = r#"
        mutation($input: BulkSetTeamsInput!) {
            bulkSetTeams(input: $input) { session { effectiveLocked } }
        }
    "#;
    let bulk_input = vars(json!({ "input": { "sessionId": session.id, "assignments": [] } }));

    let response =
        execute_graphql(&schema, bulk, bulk_input.clone(), Some(editor(session.local_id))).await;
    assert_eq!(error_code(&response).as_deref(), Some("SESSION_LOCKED"));

    let response = execute_graphql(
        &schema,
        r#"
        mutation($input: CreateMatchFromPresetInput!) {
            createMatchFromPreset(input: $input) { match { id } }
        }
        "#,
        vars(json!({ "input": { "sessionId": session.id } })),
        Some(editor(session.local_id)),
    )
    .await;
    assert_eq!(error_code(&response).as_deref(), Some("SESSION_LOCKED"));

    let response = execute_graphql(
        &schema,
        r#"
        mutation($input: SessionIdInput!) {
            adminUnlock(input: $input) { session { isAdminUnlocked effectiveLocked } }
        }
        "#,
        vars(json!({ "input": { "sessionId": session.id } })),
        Some(admin(session.local_id)),
    )
    .await;
    let unlocked = data(&response)["adminUnlock"]["session"].clone();
    assert_eq!(unlocked["isAdminUnlocked"], true);
    assert_eq!(unlocked["effectiveLocked"], false);

    let response = execute_graphql(&schema, bulk, bulk_input, Some(editor(session.local_id))).await;
    assert_eq!(data(&response)["bulkSetTeams"]["session"]["effectiveLocked"], false);
}
