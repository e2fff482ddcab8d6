pub mod pull_request;
pub mod team;
pub mod user;

pub use pull_request::{MAX_REVIEWERS, PrStatus, PullRequest, PullRequestSummary};
pub use team::{Team, TeamMember, TeamRoster};
pub use user::User;
