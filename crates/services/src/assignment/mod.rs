//! Reviewer assignment and pull request lifecycle.
//!
//! A PR is created OPEN with up to [`MAX_REVIEWERS`] reviewers drawn from
//! the author's team, may have single reviewers swapped while OPEN, and
//! moves to MERGED exactly once. Reads and the final write of an operation
//! are not covered by one lock; the final write is conditional and losing
//! a race is reported instead of overwritten.

pub mod selection;

use std::fmt;
use std::sync::Arc;

use bson::DateTime;
use parking_lot::Mutex;
use rand::{SeedableRng, rngs::StdRng};
use roster_config::{AssignmentSettings, NoCandidatePolicy};
use roster_db::models::{
    MAX_REVIEWERS, PullRequest, PullRequestSummary, TeamMember, TeamRoster, User,
};
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::dao::DaoError;
use crate::store::ReviewStore;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Entity {
    Team,
    User,
    PullRequest,
}

impl fmt::Display for Entity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Entity::Team => "team",
            Entity::User => "user",
            Entity::PullRequest => "pull request",
        })
    }
}

#[derive(Debug, Error)]
pub enum AssignmentError {
    #[error("{0} {1} not found")]
    NotFound(Entity, String),
    #[error("team {0} already exists")]
    TeamExists(String),
    #[error("pull request {0} already exists")]
    PrExists(String),
    #[error("pull request {0} is already merged")]
    PrMerged(String),
    #[error("user {reviewer} is not assigned to pull request {pr_id}")]
    NotAssigned { pr_id: String, reviewer: String },
    #[error("no active replacement candidate for pull request {0}")]
    NoCandidate(String),
    /// Another reassignment changed the reviewer list between read and
    /// write. Nothing was written; the caller may retry.
    #[error("pull request {0} was modified concurrently")]
    Conflict(String),
    #[error("storage error: {0}")]
    Store(#[from] DaoError),
}

impl AssignmentError {
    /// Stable machine-readable code for the error kind.
    pub fn code(&self) -> &'static str {
        match self {
            AssignmentError::NotFound(..) => "NOT_FOUND",
            AssignmentError::TeamExists(_) => "TEAM_EXISTS",
            AssignmentError::PrExists(_) => "PR_EXISTS",
            AssignmentError::PrMerged(_) => "PR_MERGED",
            AssignmentError::NotAssigned { .. } => "NOT_ASSIGNED",
            AssignmentError::NoCandidate(_) => "NO_CANDIDATE",
            AssignmentError::Conflict(_) => "CONFLICT",
            AssignmentError::Store(_) => "INTERNAL",
        }
    }
}

pub type AssignmentResult<T> = Result<T, AssignmentError>;

/// Source of timestamps for created/merged times.
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime;
}

pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime {
        DateTime::now()
    }
}

#[derive(Debug, Clone)]
pub struct ReassignOutcome {
    pub pull_request: PullRequest,
    /// The reviewer now holding the slot. Equals the old reviewer when the
    /// `Keep` policy applied.
    pub replaced_by: String,
}

pub struct AssignmentService {
    store: Arc<dyn ReviewStore>,
    clock: Arc<dyn Clock>,
    rng: Mutex<StdRng>,
    no_candidate: NoCandidatePolicy,
}

impl AssignmentService {
    pub fn new(
        store: Arc<dyn ReviewStore>,
        clock: Arc<dyn Clock>,
        rng: StdRng,
        no_candidate: NoCandidatePolicy,
    ) -> Self {
        Self {
            store,
            clock,
            rng: Mutex::new(rng),
            no_candidate,
        }
    }

    /// System clock, and a generator seeded from `rng_seed` or OS entropy.
    pub fn from_settings(store: Arc<dyn ReviewStore>, settings: &AssignmentSettings) -> Self {
        let rng = match settings.rng_seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_os_rng(),
        };
        Self::new(store, Arc::new(SystemClock), rng, settings.no_candidate)
    }

    fn draw(&self, pool: &[&str], count: usize) -> Vec<String> {
        let mut rng = self.rng.lock();
        selection::draw(pool, count, &mut *rng)
    }

    // -- Teams & users --------------------------------------------------

    pub async fn add_team(
        &self,
        team_name: &str,
        members: &[TeamMember],
    ) -> AssignmentResult<TeamRoster> {
        let now = self.clock.now();
        match self.store.create_team(team_name, members, now).await {
            Ok(()) => {}
            Err(DaoError::DuplicateKey(_)) => {
                warn!(team = team_name, "Team already exists");
                return Err(AssignmentError::TeamExists(team_name.to_string()));
            }
            Err(e) => return Err(e.into()),
        }
        info!(team = team_name, members = members.len(), "Team created");

        let members = self.store.team_members(team_name).await?;
        Ok(roster(team_name, &members))
    }

    pub async fn get_team(&self, team_name: &str) -> AssignmentResult<TeamRoster> {
        let members = self.store.team_members(team_name).await?;
        if members.is_empty() {
            return Err(AssignmentError::NotFound(Entity::Team, team_name.to_string()));
        }
        Ok(roster(team_name, &members))
    }

    pub async fn set_active(&self, user_id: &str, is_active: bool) -> AssignmentResult<User> {
        let user = self
            .store
            .set_user_active(user_id, is_active, self.clock.now())
            .await?
            .ok_or_else(|| AssignmentError::NotFound(Entity::User, user_id.to_string()))?;
        info!(user_id, is_active, team = %user.team_name, "User activity changed");
        Ok(user)
    }

    /// PRs (open or merged) currently assigned to `user_id`, most recent
    /// first. Unknown users simply have an empty queue.
    pub async fn review_queue(&self, user_id: &str) -> AssignmentResult<Vec<PullRequestSummary>> {
        let prs = self.store.pull_requests_for_reviewer(user_id).await?;
        Ok(prs.iter().map(PullRequestSummary::from).collect())
    }

    // -- Pull requests --------------------------------------------------

    pub async fn create(
        &self,
        pr_id: &str,
        title: &str,
        author_id: &str,
    ) -> AssignmentResult<PullRequest> {
        let author = self.find_user(author_id).await?;
        let team = self.store.team_members(&author.team_name).await?;
        let pool = selection::candidate_pool(&team, &[author_id]);
        let reviewers = self.draw(&pool, MAX_REVIEWERS);

        let pr = PullRequest::open(
            pr_id.to_string(),
            title.to_string(),
            author_id.to_string(),
            reviewers,
            self.clock.now(),
        );
        match self.store.insert_pull_request(&pr).await {
            Ok(()) => {}
            Err(DaoError::DuplicateKey(_)) => {
                warn!(pr_id, "Pull request already exists");
                return Err(AssignmentError::PrExists(pr_id.to_string()));
            }
            Err(e) => return Err(e.into()),
        }

        info!(
            pr_id,
            author_id,
            team = %author.team_name,
            reviewers = ?pr.reviewers,
            "Pull request created"
        );
        Ok(pr)
    }

    /// Idempotent: merging a merged PR returns it unchanged.
    pub async fn merge(&self, pr_id: &str) -> AssignmentResult<PullRequest> {
        let pr = self.find_pull_request(pr_id).await?;
        if pr.is_merged() {
            debug!(pr_id, "Pull request already merged");
            return Ok(pr);
        }

        if self.store.mark_merged(pr_id, self.clock.now()).await? {
            info!(pr_id, "Pull request merged");
        } else {
            debug!(pr_id, "Concurrent merge won");
        }
        // Re-read so every caller reports the timestamp that was stored.
        self.find_pull_request(pr_id).await
    }

    pub async fn reassign(
        &self,
        pr_id: &str,
        old_reviewer: &str,
    ) -> AssignmentResult<ReassignOutcome> {
        let mut pr = self.find_pull_request(pr_id).await?;
        if pr.is_merged() {
            return Err(AssignmentError::PrMerged(pr_id.to_string()));
        }
        if !pr.has_reviewer(old_reviewer) {
            return Err(not_assigned(pr_id, old_reviewer));
        }

        let author = self.find_user(&pr.author_id).await?;
        let team = self.store.team_members(&author.team_name).await?;

        // Current reviewers (the old one included) and the author are never candidates.
        let mut excluded: Vec<&str> = vec![pr.author_id.as_str()];
        excluded.extend(pr.reviewers.iter().map(String::as_str));
        let pool = selection::candidate_pool(&team, &excluded);

        let Some(new_reviewer) = self.draw(&pool, 1).pop() else {
            return match self.no_candidate {
                NoCandidatePolicy::Fail => {
                    warn!(pr_id, old_reviewer, "No replacement candidate");
                    Err(AssignmentError::NoCandidate(pr_id.to_string()))
                }
                NoCandidatePolicy::Keep => {
                    info!(pr_id, old_reviewer, "No replacement candidate, keeping reviewer");
                    Ok(ReassignOutcome {
                        pull_request: pr,
                        replaced_by: old_reviewer.to_string(),
                    })
                }
            };
        };

        let updated: Vec<String> = pr
            .reviewers
            .iter()
            .map(|r| {
                if r == old_reviewer {
                    new_reviewer.clone()
                } else {
                    r.clone()
                }
            })
            .collect();

        if !self.store.swap_reviewers(pr_id, &pr.reviewers, &updated).await? {
            return Err(self.classify_lost_swap(pr_id, old_reviewer).await);
        }

        info!(pr_id, old_reviewer, new_reviewer = %new_reviewer, "Reviewer reassigned");
        pr.reviewers = updated;
        Ok(ReassignOutcome {
            pull_request: pr,
            replaced_by: new_reviewer,
        })
    }

    /// Explains why a reviewer swap matched nothing, from the state as it
    /// is now.
    async fn classify_lost_swap(&self, pr_id: &str, old_reviewer: &str) -> AssignmentError {
        match self.store.find_pull_request(pr_id).await {
            Err(e) => e.into(),
            Ok(None) => AssignmentError::NotFound(Entity::PullRequest, pr_id.to_string()),
            Ok(Some(pr)) if pr.is_merged() => AssignmentError::PrMerged(pr_id.to_string()),
            Ok(Some(pr)) if !pr.has_reviewer(old_reviewer) => not_assigned(pr_id, old_reviewer),
            Ok(Some(_)) => {
                warn!(pr_id, old_reviewer, "Reviewer list changed during reassignment");
                AssignmentError::Conflict(pr_id.to_string())
            }
        }
    }

    async fn find_user(&self, user_id: &str) -> AssignmentResult<User> {
        self.store
            .find_user(user_id)
            .await?
            .ok_or_else(|| AssignmentError::NotFound(Entity::User, user_id.to_string()))
    }

    async fn find_pull_request(&self, pr_id: &str) -> AssignmentResult<PullRequest> {
        self.store
            .find_pull_request(pr_id)
            .await?
            .ok_or_else(|| AssignmentError::NotFound(Entity::PullRequest, pr_id.to_string()))
    }
}

fn roster(team_name: &str, members: &[User]) -> TeamRoster {
    TeamRoster {
        team_name: team_name.to_string(),
        members: members.iter().map(User::to_member).collect(),
    }
}

fn not_assigned(pr_id: &str, reviewer: &str) -> AssignmentError {
    AssignmentError::NotAssigned {
        pr_id: pr_id.to_string(),
        reviewer: reviewer.to_string(),
    }
}
