mod common;

use api::gql::build_schema;
use api::gql::relay::to_global_id;
use common::*;
use serde_json::json;
use uuid::Uuid;

const CONFIRM: &str = r#"
    mutation($input: ConfirmMatchResultInput!) {
        confirmMatchResult(input: $input) { match { status isConfirmed winnerSide teamASide } }
    }
"#;

const DELETE: &str = r#"
    mutation($input: DeleteMatchInput!) { deleteMatch(input: $input) { deletedMatchId } }
"#;

/// Session with a two-friend preset (A on MID, B on TOP).
async fn session_with_preset(schema: &api::gql::AppSchema) -> (TestSession, String, String) {
    let bootstrap = create_test_session(schema, "Roster").await;
    let blue = create_test_friend(schema, bootstrap.local_id, "Blue carry").await;
    let red = create_test_friend(schema, bootstrap.local_id, "Red carry").await;
    let session = create_test_session(schema, "Scrim").await;

    let response = execute_graphql(
        schema,
        r#"
        mutation($input: BulkSetTeamsInput!) {
            bulkSetTeams(input: $input) { session { teamPresetMembers { team lane } } }
        }
        "#,
        vars(json!({
            "input": {
                "sessionId": session.id,
                "assignments": [
                    { "friendId": blue, "team": "A", "lane": "MID" },
                    { "friendId": red, "team": "B", "lane": "TOP" },
                ]
            }
        })),
        Some(editor(session.local_id)),
    )
    .await;
    let members = data(&response)["bulkSetTeams"]["session"]["teamPresetMembers"].clone();
    assert_eq!(members.as_array().map(Vec::len), Some(2));

    (session, blue, red)
}

async fn create_match(schema: &api::gql::AppSchema, session: &TestSession) -> serde_json::Value {
    let response = execute_graphql(
        schema,
        r#"
        mutation($input: CreateMatchFromPresetInput!) {
            createMatchFromPreset(input: $input) {
                match { id matchNo status isConfirmed teamMembers { friendId team lane champion } }
            }
        }
        "#,
        vars(json!({ "input": { "sessionId": session.id } })),
        Some(editor(session.local_id)),
    )
    .await;
    data(&response)["createMatchFromPreset"]["match"].clone()
}

#[tokio::test]
async fn matches_snapshot_the_team_preset() {
    let Some(state) = try_setup_test_db().await else {
        return;
    };
    let schema = build_schema(state);
    let (session, blue, _red) = session_with_preset(&schema).await;

    let first = create_match(&schema, &session).await;
    assert_eq!(first["matchNo"], 1);
    assert_eq!(first["status"], "DRAFT");
    assert_eq!(first["isConfirmed"], false);
    let members = first["teamMembers"].as_array().cloned().unwrap_or_default();
    assert_eq!(members.len(), 2);
    assert!(members
        .iter()
        .any(|m| m["friendId"] == blue.as_str() && m["team"] == "A" && m["lane"] == "MID"));

    let second = create_match(&schema, &session).await;
    assert_eq!(second["matchNo"], 2);

    let response = execute_graphql(
        &schema,
        r#"
        mutation($input: SetChampionInput!) {
            setChampion(input: $input) { match { teamMembers { friendId champion } } }
        }
        "#,
        vars(json!({
            "input": { "matchId": first["id"], "friendId": blue, "champion": "  Ahri " }
        })),
        Some(editor(session.local_id)),
    )
    .await;
    let members = data(&response)["setChampion"]["match"]["teamMembers"].clone();
    let blue_member = members
        .as_array()
        .and_then(|all| all.iter().find(|m| m["friendId"] == blue.as_str()))
        .cloned()
        .expect("blue member");
    assert_eq!(blue_member["champion"], "Ahri");
}

#[tokio::test]
async fn confirm_match_result_happens_once() {
    let Some(state) = try_setup_test_db().await else {
        return;
    };
    let schema = build_schema(state);
    let (session, _blue, _red) = session_with_preset(&schema).await;
    let created = create_match(&schema, &session).await;
    let input = vars(json!({
        "input": { "matchId": created["id"], "winnerSide": "RED", "teamASide": "BLUE" }
    }));

    let response =
        execute_graphql(&schema, CONFIRM, input.clone(), Some(editor(session.local_id))).await;
    let confirmed = data(&response)["confirmMatchResult"]["match"].clone();
    assert_eq!(confirmed["status"], "COMPLETED");
    assert_eq!(confirmed["isConfirmed"], true);
    assert_eq!(confirmed["winnerSide"], "RED");
    assert_eq!(confirmed["teamASide"], "BLUE");

    let response = execute_graphql(&schema, CONFIRM, input, Some(editor(session.local_id))).await;
    assert_eq!(error_code(&response).as_deref(), Some("INVALID_MATCH_STATE"));
    let ext = response.errors[0].extensions.as_ref().expect("extensions");
    assert_eq!(ext.get("statusCode"), Some(&async_graphql::Value::from(400)));

    let response = execute_graphql(
        &schema,
        DELETE,
        vars(json!({ "input": { "matchId": created["id"] } })),
        Some(admin(session.local_id)),
    )
    .await;
    assert_eq!(
        error_code(&response).as_deref(),
        Some("CONFIRMED_MATCH_UNDELETABLE")
    );
}

#[tokio::test]
async fn confirm_unknown_match_is_not_found() {
    let Some(state) = try_setup_test_db().await else {
        return;
    };
    let schema = build_schema(state);

    let response = execute_graphql(
        &schema,
        CONFIRM,
        vars(json!({
            "input": {
                "matchId": to_global_id("Match", Uuid::now_v7()).0,
                "winnerSide": "BLUE",
                "teamASide": "BLUE",
            }
        })),
        Some(editor(Uuid::now_v7())),
    )
    .await;
    assert_eq!(error_code(&response).as_deref(), Some("MATCH_NOT_FOUND"));
    let ext = response.errors[0].extensions.as_ref().expect("extensions");
    assert_eq!(ext.get("statusCode"), Some(&async_graphql::Value::from(404)));
}

#[tokio::test]
async fn draft_matches_can_be_deleted_by_admins() {
    let Some(state) = try_setup_test_db().await else {
        return;
    };
    let schema = build_schema(state);
    let (session, _blue, _red) = session_with_preset(&schema).await;
    let created = create_match(&schema, &session).await;
    let input = vars(json!({ "input": { "matchId": created["id"] } }));

    let response =
        execute_graphql(&schema, DELETE, input.clone(), Some(editor(session.local_id))).await;
    assert_eq!(error_code(&response).as_deref(), Some("FORBIDDEN"));

    let response = execute_graphql(&schema, DELETE, input, Some(admin(session.local_id))).await;
    assert_eq!(data(&response)["deleteMatch"]["deletedMatchId"], created["id"]);

    let response = execute_graphql(
        &schema,
        "query($id: ID!) { match(matchId: $id) { id } }",
        vars(json!({ "id": created["id"] })),
        Some(editor(session.local_id)),
    )
    .await;
    assert_eq!(error_code(&response).as_deref(), Some("MATCH_NOT_FOUND"));
}
