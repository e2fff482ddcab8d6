use reqwest::StatusCode;
use serde_json::{Value, json};

use super::test_app::TestApp;

/// (user_id, username, is_active)
pub type Member<'a> = (&'a str, &'a str, bool);

impl TestApp {
    /// Create a team through the API and assert it succeeded.
    pub async fn add_team(&self, team_name: &str, members: &[Member<'_>]) -> Value {
        let members: Vec<Value> = members
            .iter()
            .map(|(id, name, active)| {
                json!({ "user_id": id, "username": name, "is_active": active })
            })
            .collect();
        let (status, json) = self
            .post(
                "/team/add",
                &json!({ "team_name": team_name, "members": members }),
            )
            .await;
        assert_eq!(status, StatusCode::CREATED, "AddTeam failed: {json}");
        json
    }

    /// The usual four-person team used across the suites.
    pub async fn seed_backend_team(&self) {
        self.add_team(
            "backend",
            &[
                ("u1", "Alice", true),
                ("u2", "Bob", true),
                ("u3", "Carol", true),
                ("u4", "Dan", true),
            ],
        )
        .await;
    }

    /// Create a PR through the API and return the `pr` object.
    pub async fn create_pr(&self, pr_id: &str, author_id: &str) -> Value {
        let (status, json) = self
            .post(
                "/pullRequest/create",
                &json!({
                    "pull_request_id": pr_id,
                    "pull_request_name": format!("Change {pr_id}"),
                    "author_id": author_id,
                }),
            )
            .await;
        assert_eq!(status, StatusCode::CREATED, "Create failed: {json}");
        json["pr"].clone()
    }

    pub async fn set_active(&self, user_id: &str, is_active: bool) -> (StatusCode, Value) {
        self.post(
            "/users/setIsActive",
            &json!({ "user_id": user_id, "is_active": is_active }),
        )
        .await
    }

    pub async fn reassign(&self, pr_id: &str, old_user_id: &str) -> (StatusCode, Value) {
        self.post(
            "/pullRequest/reassign",
            &json!({ "pull_request_id": pr_id, "old_user_id": old_user_id }),
        )
        .await
    }

    pub async fn merge(&self, pr_id: &str) -> (StatusCode, Value) {
        self.post("/pullRequest/merge", &json!({ "pull_request_id": pr_id }))
            .await
    }
}

/// Reviewer ids of a serialized PR.
pub fn reviewers(pr: &Value) -> Vec<String> {
    pr["assigned_reviewers"]
        .as_array()
        .map(|ids| {
            ids.iter()
                .filter_map(|id| id.as_str().map(str::to_string))
                .collect()
        })
        .unwrap_or_default()
}
