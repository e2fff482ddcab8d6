//! Same flows against a real MongoDB replica set.
//!
//! Run with `--ignored` once ROSTER__DATABASE__URL points at a replica set.

use futures::future::join_all;
use reqwest::StatusCode;
use serde_json::json;

use crate::fixtures::{seed::reviewers, test_app::TestApp};

#[tokio::test]
#[ignore = "requires a MongoDB replica set"]
async fn team_lifecycle_on_mongo() {
    let app = TestApp::spawn_mongo().await;
    app.seed_backend_team().await;

    let (status, json) = app
        .post(
            "/team/add",
            &json!({ "team_name": "backend", "members": [{ "user_id": "u9", "username": "Zed", "is_active": true }] }),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["error"]["code"], "TEAM_EXISTS");

    let (status, _) = app.get("/users/getReview?user_id=u9").await;
    assert_eq!(status, StatusCode::OK);
    let (status, _) = app.set_active("u9", true).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    app.add_team("frontend", &[("u4", "Dan", false)]).await;
    let (_, backend) = app.get("/team/get?team_name=backend").await;
    assert_eq!(backend["members"].as_array().unwrap().len(), 3);
}

#[tokio::test]
#[ignore = "requires a MongoDB replica set"]
async fn concurrent_add_team_on_mongo_has_one_winner() {
    let app = TestApp::spawn_mongo().await;
    let app = &app;

    let results = join_all((0..4).map(|i| {
        let body = json!({
            "team_name": "backend",
            "members": [
                { "user_id": "u1", "username": format!("Alice {i}"), "is_active": true },
                { "user_id": format!("u{}", i + 2), "username": "Other", "is_active": true },
            ],
        });
        async move { app.post("/team/add", &body).await }
    }))
    .await;

    let created = results
        .iter()
        .filter(|(status, _)| *status == StatusCode::CREATED)
        .count();
    assert_eq!(created, 1);
    for (status, json) in results.iter().filter(|(s, _)| *s != StatusCode::CREATED) {
        assert_eq!(*status, StatusCode::BAD_REQUEST, "{json}");
        assert_eq!(json["error"]["code"], "TEAM_EXISTS");
    }

    let (_, team) = app.get("/team/get?team_name=backend").await;
    assert_eq!(team["members"].as_array().unwrap().len(), 2);
}

#[tokio::test]
#[ignore = "requires a MongoDB replica set"]
async fn concurrent_teams_sharing_a_new_user_on_mongo() {
    let app = TestApp::spawn_mongo().await;
    let app = &app;

    let results = join_all(["backend", "frontend"].into_iter().map(|team| {
        let body = json!({
            "team_name": team,
            "members": [{ "user_id": "u1", "username": "Alice", "is_active": true }],
        });
        async move { app.post("/team/add", &body).await }
    }))
    .await;

    for (status, json) in &results {
        assert_eq!(*status, StatusCode::CREATED, "{json}");
    }
}

#[tokio::test]
#[ignore = "requires a MongoDB replica set"]
async fn pull_request_lifecycle_on_mongo() {
    let app = TestApp::spawn_mongo().await;
    app.seed_backend_team().await;

    let pr = app.create_pr("pr-1", "u1").await;
    let assigned = reviewers(&pr);
    assert_eq!(assigned.len(), 2);

    let (status, json) = app.reassign("pr-1", &assigned[0]).await;
    assert_eq!(status, StatusCode::OK);
    let replaced_by = json["replaced_by"].as_str().unwrap().to_string();

    let (_, queue) = app.get(&format!("/users/getReview?user_id={replaced_by}")).await;
    assert_eq!(queue["pull_requests"][0]["pull_request_id"], "pr-1");

    let (_, first) = app.merge("pr-1").await;
    let (_, second) = app.merge("pr-1").await;
    assert_eq!(first["pr"]["status"], "MERGED");
    assert_eq!(first["pr"]["mergedAt"], second["pr"]["mergedAt"]);

    let (status, json) = app.reassign("pr-1", &replaced_by).await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(json["error"]["code"], "PR_MERGED");
}

#[tokio::test]
#[ignore = "requires a MongoDB replica set"]
async fn duplicate_pull_request_id_on_mongo() {
    let app = TestApp::spawn_mongo().await;
    app.seed_backend_team().await;

    let body = json!({ "pull_request_id": "pr-1", "pull_request_name": "Race", "author_id": "u1" });
    let results = join_all((0..4).map(|_| app.post("/pullRequest/create", &body))).await;

    let created = results
        .iter()
        .filter(|(status, _)| *status == StatusCode::CREATED)
        .count();
    assert_eq!(created, 1);
}
