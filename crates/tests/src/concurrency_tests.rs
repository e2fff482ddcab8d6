use futures::future::join_all;
use reqwest::StatusCode;

use crate::fixtures::{seed::reviewers, test_app::TestApp};

#[tokio::test]
async fn concurrent_merges_agree_on_timestamp() {
    let app = TestApp::spawn().await;
    app.seed_backend_team().await;
    app.create_pr("pr-1", "u1").await;

    let results = join_all((0..8).map(|_| app.merge("pr-1"))).await;

    let stamps: Vec<_> = results
        .iter()
        .map(|(status, json)| {
            assert_eq!(*status, StatusCode::OK);
            json["pr"]["mergedAt"].clone()
        })
        .collect();
    assert!(stamps.windows(2).all(|w| w[0] == w[1]));
}

#[tokio::test]
async fn concurrent_reassigns_never_duplicate_reviewers() {
    let app = TestApp::spawn().await;
    app.add_team(
        "backend",
        &[
            ("u1", "Alice", true),
            ("u2", "Bob", true),
            ("u3", "Carol", true),
            ("u4", "Dan", true),
            ("u5", "Eve", true),
            ("u6", "Frank", true),
        ],
    )
    .await;
    let pr = app.create_pr("pr-1", "u1").await;
    let assigned = reviewers(&pr);

    let results = join_all(assigned.iter().map(|old| app.reassign("pr-1", old))).await;

    for (status, json) in &results {
        assert!(
            *status == StatusCode::OK || json["error"]["code"] == "CONFLICT",
            "unexpected outcome {status}: {json}"
        );
    }
    assert!(results.iter().any(|(status, _)| *status == StatusCode::OK));

    let (_, queue) = app.get("/users/getReview?user_id=u1").await;
    assert_eq!(queue["pull_requests"].as_array().unwrap().len(), 0);

    let (_, merged) = app.merge("pr-1").await;
    let finals = reviewers(&merged["pr"]);
    assert_eq!(finals.len(), 2);
    assert_ne!(finals[0], finals[1]);
    assert!(!finals.contains(&"u1".to_string()));
}

#[tokio::test]
async fn concurrent_creates_with_same_id_have_one_winner() {
    let app = TestApp::spawn().await;
    app.seed_backend_team().await;

    let body = serde_json::json!({
        "pull_request_id": "pr-1",
        "pull_request_name": "Race",
        "author_id": "u1",
    });
    let results = join_all((0..5).map(|_| app.post("/pullRequest/create", &body))).await;

    let created = results
        .iter()
        .filter(|(status, _)| *status == StatusCode::CREATED)
        .count();
    assert_eq!(created, 1);
    assert!(
        results
            .iter()
            .filter(|(status, _)| *status != StatusCode::CREATED)
            .all(|(_, json)| json["error"]["code"] == "PR_EXISTS")
    );
}
