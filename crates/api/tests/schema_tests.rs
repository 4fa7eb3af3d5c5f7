mod common;

use api::gql::build_schema;
use api::gql::relay::to_global_id;
use async_graphql::Value;
use common::*;
use serde_json::json;
use uuid::Uuid;

#[tokio::test]
async fn auth_context_requires_session_headers() {
    let schema = build_schema(lazy_state());

    let response = execute_graphql(
        &schema,
        "query { authContext { sessionId role } }",
        None,
        None,
    )
    .await;

    assert_eq!(error_code(&response).as_deref(), Some("UNAUTHORIZED"));
    let ext = response.errors[0].extensions.as_ref().expect("extensions");
    assert_eq!(ext.get("statusCode"), Some(&Value::from(401)));
}

#[tokio::test]
async fn auth_context_reports_role_and_session() {
    let schema = build_schema(lazy_state());
    let session_id = Uuid::now_v7();

    let response = execute_graphql(
        &schema,
        "query { authContext { sessionId role } }",
        None,
        Some(admin(session_id)),
    )
    .await;

    let body = data(&response);
    assert_eq!(body["authContext"]["role"], "ADMIN");
    assert_eq!(
        body["authContext"]["sessionId"],
        to_global_id("Session", session_id).0
    );
}

#[tokio::test]
async fn editors_cannot_run_admin_mutations() {
    let schema = build_schema(lazy_state());
    let session_id = Uuid::now_v7();
    let session_gid = to_global_id("Session", session_id).0;

    let cases = [
        (
            "mutation($input: SessionIdInput!) { reopenSession(input: $input) { session { id } } }",
            json!({ "input": { "sessionId": session_gid } }),
        ),
        (
            "mutation($input: SessionIdInput!) { deleteSession(input: $input) { deletedSessionId } }",
            json!({ "input": { "sessionId": session_gid } }),
        ),
        (
            "mutation($input: SessionIdInput!) { adminUnlock(input: $input) { session { id } } }",
            json!({ "input": { "sessionId": session_gid } }),
        ),
        (
            "mutation($input: CreateFriendInput!) { createFriend(input: $input) { friend { id } } }",
            json!({ "input": { "displayName": "Faker" } }),
        ),
    ];

    for (query, variables) in cases {
        let response =
            execute_graphql(&schema, query, vars(variables), Some(editor(session_id))).await;
        assert_eq!(
            error_code(&response).as_deref(),
            Some("FORBIDDEN"),
            "{query}: {:?}",
            response.errors
        );
        assert_eq!(response.errors[0].message, "Admin role required");
    }
}

#[tokio::test]
async fn create_session_rejects_overlong_title() {
    let schema = build_schema(lazy_state());

    let response = execute_graphql(
        &schema,
        r#"
        mutation($input: CreateSessionInput!) {
            createSession(input: $input) { editorToken }
        }
        "#,
        vars(json!({
            "input": {
                "contentType": "FUTSAL",
                "title": "x".repeat(256),
                "startsAt": "2026-03-01T19:00:00Z",
            }
        })),
        None,
    )
    .await;

    assert_eq!(error_code(&response).as_deref(), Some("VALIDATION_ERROR"));
    let ext = response.errors[0].extensions.as_ref().expect("extensions");
    assert_eq!(ext.get("statusCode"), Some(&Value::from(400)));
    let fields = ext.get("fields").expect("fields").clone().into_json().unwrap();
    assert_eq!(fields[0]["field"], "title");
}

#[tokio::test]
async fn create_friend_rejects_blank_display_name() {
    let schema = build_schema(lazy_state());

    let response = execute_graphql(
        &schema,
        "mutation($input: CreateFriendInput!) { createFriend(input: $input) { friend { id } } }",
        vars(json!({ "input": { "displayName": "   " } })),
        Some(admin(Uuid::now_v7())),
    )
    .await;

    assert_eq!(error_code(&response).as_deref(), Some("VALIDATION_ERROR"));
}

#[tokio::test]
async fn ids_of_the_wrong_type_are_validation_errors() {
    let schema = build_schema(lazy_state());
    let session_id = Uuid::now_v7();
    let friend_gid = to_global_id("Friend", session_id).0;

    let response = execute_graphql(
        &schema,
        "query($id: ID!) { sessionPreview(sessionId: $id) { id } }",
        vars(json!({ "id": friend_gid })),
        None,
    )
    .await;
    assert_eq!(error_code(&response).as_deref(), Some("VALIDATION_ERROR"));
    assert_eq!(response.errors[0].message, "Invalid Session id");

    let response = execute_graphql(
        &schema,
        "mutation($input: SessionIdInput!) { confirmSession(input: $input) { session { id } } }",
        vars(json!({ "input": { "sessionId": "not-base64!" } })),
        Some(editor(session_id)),
    )
    .await;
    assert_eq!(error_code(&response).as_deref(), Some("VALIDATION_ERROR"));
}

#[tokio::test]
async fn confirm_match_result_requires_known_sides() {
    let schema = build_schema(lazy_state());
    let match_gid = to_global_id("Match", Uuid::now_v7()).0;

    let response = execute_graphql(
        &schema,
        r#"
        mutation($input: ConfirmMatchResultInput!) {
            confirmMatchResult(input: $input) { match { id } }
        }
        "#,
        vars(json!({
            "input": { "matchId": match_gid, "winnerSide": "UNKNOWN", "teamASide": "BLUE" }
        })),
        Some(editor(Uuid::now_v7())),
    )
    .await;

    assert_eq!(error_code(&response).as_deref(), Some("VALIDATION_ERROR"));
    let ext = response.errors[0].extensions.as_ref().expect("extensions");
    let fields = ext.get("fields").expect("fields").clone().into_json().unwrap();
    assert_eq!(fields[0]["field"], "winnerSide");
}

#[tokio::test]
async fn node_rejects_undecodable_global_ids() {
    let schema = build_schema(lazy_state());

    // "garbage" is not base64; "VW5rbm93bg==" decodes to "Unknown" (no colon)
    for id in ["garbage", "VW5rbm93bg=="] {
        let response = execute_graphql(
            &schema,
            "query($id: ID!) { node(id: $id) { id } }",
            vars(json!({ "id": id })),
            Some(editor(Uuid::now_v7())),
        )
        .await;
        assert_eq!(error_code(&response).as_deref(), Some("VALIDATION_ERROR"), "{id}");
        assert_eq!(response.errors[0].message, "Invalid global id");
    }
}

#[tokio::test]
async fn node_is_null_for_unknown_types_and_non_uuid_ids() {
    let schema = build_schema(lazy_state());
    let unknown_type = to_global_id("Widget", Uuid::now_v7()).0;
    let not_a_uuid = to_global_id("Session", "not-a-uuid").0;

    for id in [unknown_type.as_str(), not_a_uuid.as_str()] {
        let response = execute_graphql(
            &schema,
            "query($id: ID!) { node(id: $id) { id } }",
            vars(json!({ "id": id })),
            Some(editor(Uuid::now_v7())),
        )
        .await;
        assert!(response.errors.is_empty(), "{id}: {:?}", response.errors);
        assert_eq!(data(&response)["node"], serde_json::Value::Null, "{id}");
    }
}

#[tokio::test]
async fn nodes_keeps_request_order_and_validates_every_id() {
    let schema = build_schema(lazy_state());
    let unknown_type = to_global_id("Widget", Uuid::now_v7()).0;

    let response = execute_graphql(
        &schema,
        "query($ids: [ID!]!) { nodes(ids: $ids) { id } }",
        vars(json!({ "ids": [unknown_type, unknown_type] })),
        Some(editor(Uuid::now_v7())),
    )
    .await;
    assert!(response.errors.is_empty(), "{:?}", response.errors);
    assert_eq!(data(&response)["nodes"], json!([null, null]));

    let response = execute_graphql(
        &schema,
        "query($ids: [ID!]!) { nodes(ids: $ids) { id } }",
        vars(json!({ "ids": [unknown_type, "garbage"] })),
        Some(editor(Uuid::now_v7())),
    )
    .await;
    assert_eq!(error_code(&response).as_deref(), Some("VALIDATION_ERROR"));

    let response = execute_graphql(
        &schema,
        "query { nodes(ids: []) { id } }",
        None,
        None,
    )
    .await;
    assert_eq!(error_code(&response).as_deref(), Some("UNAUTHORIZED"));
}

#[tokio::test]
async fn sessions_connection_validates_relay_arguments() {
    let schema = build_schema(lazy_state());
    let auth = Some(editor(Uuid::now_v7()));

    for (query, field) in [
        ("query { sessions { edges { cursor } } }", "first"),
        ("query { sessions(first: 1, last: 1) { edges { cursor } } }", "last"),
        ("query { sessions(first: 101) { edges { cursor } } }", "first"),
        ("query { sessions(last: -1) { edges { cursor } } }", "last"),
        (r#"query { sessions(first: 1, after: "nope") { edges { cursor } } }"#, "after"),
    ] {
        let response = execute_graphql(&schema, query, None, auth).await;
        assert_eq!(error_code(&response).as_deref(), Some("VALIDATION_ERROR"), "{query}");
        let ext = response.errors[0].extensions.as_ref().expect("extensions");
        let fields = ext.get("fields").expect("fields").clone().into_json().unwrap();
        assert_eq!(fields[0]["field"], field, "{query}");
    }
}

#[tokio::test]
async fn batch_presign_needs_storage_configuration() {
    let schema = build_schema(lazy_state());
    let session_id = Uuid::now_v7();

    let response = execute_graphql(
        &schema,
        r#"
        mutation($input: CreatePresignedUploadsInput!) {
            createPresignedUploads(input: $input) { uploads { uploadId presignedUrl } }
        }
        "#,
        vars(json!({
            "input": {
                "sessionId": to_global_id("Session", session_id).0,
                "files": [
                    { "scope": "SESSION", "type": "LOL_RESULT_SCREEN", "contentType": "image/png" },
                    { "scope": "SESSION", "type": "LOL_RESULT_SCREEN", "contentType": "image/jpeg" },
                ],
            }
        })),
        Some(editor(session_id)),
    )
    .await;
    assert_eq!(error_code(&response).as_deref(), Some("STORAGE_UNAVAILABLE"));
}

#[tokio::test]
async fn client_mutation_id_is_part_of_every_input() {
    let schema = build_schema(lazy_state());
    let sdl = schema.sdl();

    assert!(sdl.contains("input CreateSessionInput"));
    for input in [
        "CreateSessionInput",
        "ConfirmMatchResultInput",
        "CreateFriendInput",
        "CreatePresignedUploadsInput",
        "CompleteUploadsInput",
    ] {
        let start = sdl.find(&format!("input {input} {{")).expect(input);
        let block = &sdl[start..start + sdl[start..].find('}').expect("block end")];
        assert!(block.contains("clientMutationId: String"), "{input}");
    }
}
