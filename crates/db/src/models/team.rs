use bson::DateTime;
use serde::{Deserialize, Serialize};

/// Team registry entry. Members are not embedded: a user's `team_name`
/// is the only source of affiliation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Team {
    #[serde(rename = "_id")]
    pub name: String,
    pub created_at: DateTime,
}

impl Team {
    pub const COLLECTION: &'static str = "teams";

    pub fn new(name: impl Into<String>, created_at: DateTime) -> Self {
        Self {
            name: name.into(),
            created_at,
        }
    }
}

/// A member as supplied to (and reported by) team operations.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TeamMember {
    pub user_id: String,
    pub username: String,
    pub is_active: bool,
}

/// A team as reconstructed from its members' affiliations.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TeamRoster {
    pub team_name: String,
    pub members: Vec<TeamMember>,
}
