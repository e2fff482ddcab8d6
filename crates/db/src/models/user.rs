use bson::DateTime;
use serde::{Deserialize, Serialize};

use super::team::TeamMember;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    #[serde(rename = "_id")]
    pub user_id: String,
    pub username: String,
    pub team_name: String,
    #[serde(default)]
    pub is_active: bool,
    pub created_at: DateTime,
    pub updated_at: DateTime,
}

impl User {
    pub const COLLECTION: &'static str = "users";

    pub fn from_member(team_name: &str, member: &TeamMember, now: DateTime) -> Self {
        Self {
            user_id: member.user_id.clone(),
            username: member.username.clone(),
            team_name: team_name.to_string(),
            is_active: member.is_active,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn to_member(&self) -> TeamMember {
        TeamMember {
            user_id: self.user_id.clone(),
            username: self.username.clone(),
            is_active: self.is_active,
        }
    }
}
