use reqwest::StatusCode;
use serde_json::json;

use crate::fixtures::test_app::TestApp;

#[tokio::test]
async fn add_team_returns_roster() {
    let app = TestApp::spawn().await;

    let json = app
        .add_team("backend", &[("u1", "Alice", true), ("u2", "Bob", false)])
        .await;

    assert_eq!(json["team"]["team_name"], "backend");
    let members = json["team"]["members"].as_array().unwrap();
    assert_eq!(members.len(), 2);
    assert_eq!(members[0]["user_id"], "u1");
    assert_eq!(members[0]["username"], "Alice");
    assert_eq!(members[1]["is_active"], false);
}

#[tokio::test]
async fn get_team_lists_members() {
    let app = TestApp::spawn().await;
    app.seed_backend_team().await;

    let (status, json) = app.get("/team/get?team_name=backend").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["team_name"], "backend");
    let ids: Vec<&str> = json["members"]
        .as_array()
        .unwrap()
        .iter()
        .map(|m| m["user_id"].as_str().unwrap())
        .collect();
    assert_eq!(ids, vec!["u1", "u2", "u3", "u4"]);
}

#[tokio::test]
async fn duplicate_team_is_rejected_without_side_effects() {
    let app = TestApp::spawn().await;
    app.add_team("backend", &[("u1", "Alice", true)]).await;

    let (status, json) = app
        .post(
            "/team/add",
            &json!({
                "team_name": "backend",
                "members": [{ "user_id": "u1", "username": "Renamed", "is_active": false }],
            }),
        )
        .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["error"]["code"], "TEAM_EXISTS");

    let (_, json) = app.get("/team/get?team_name=backend").await;
    assert_eq!(json["members"][0]["username"], "Alice");
    assert_eq!(json["members"][0]["is_active"], true);
}

#[tokio::test]
async fn adding_user_to_second_team_moves_them() {
    let app = TestApp::spawn().await;
    app.add_team("backend", &[("u1", "Alice", true), ("u2", "Bob", true)])
        .await;
    app.add_team("frontend", &[("u2", "Bobby", false)]).await;

    let (_, backend) = app.get("/team/get?team_name=backend").await;
    let (_, frontend) = app.get("/team/get?team_name=frontend").await;

    assert_eq!(backend["members"].as_array().unwrap().len(), 1);
    assert_eq!(frontend["members"][0]["user_id"], "u2");
    assert_eq!(frontend["members"][0]["username"], "Bobby");
    assert_eq!(frontend["members"][0]["is_active"], false);
}

#[tokio::test]
async fn member_without_activity_flag_is_rejected() {
    let app = TestApp::spawn().await;

    let (status, json) = app
        .post(
            "/team/add",
            &json!({
                "team_name": "backend",
                "members": [{ "user_id": "u2", "username": "Bob" }],
            }),
        )
        .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["error"]["code"], "INVALID_REQUEST");
    let (status, _) = app.get("/team/get?team_name=backend").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn unknown_team_is_not_found() {
    let app = TestApp::spawn().await;

    let (status, json) = app.get("/team/get?team_name=ghosts").await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(json["error"]["code"], "NOT_FOUND");
}

#[tokio::test]
async fn empty_team_exists_but_has_no_roster() {
    let app = TestApp::spawn().await;

    let (status, json) = app
        .post("/team/add", &json!({ "team_name": "empty", "members": [] }))
        .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(json["team"]["members"], json!([]));

    let (status, _) = app.get("/team/get?team_name=empty").await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, json) = app
        .post("/team/add", &json!({ "team_name": "empty", "members": [] }))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["error"]["code"], "TEAM_EXISTS");
}
