//! Candidate pool construction and the random draw.

use rand::{Rng, seq::IndexedRandom};
use roster_db::models::User;

/// Active members not listed in `excluded`, in roster order.
pub fn candidate_pool<'a>(members: &'a [User], excluded: &[&str]) -> Vec<&'a str> {
    members
        .iter()
        .filter(|m| m.is_active && !excluded.contains(&m.user_id.as_str()))
        .map(|m| m.user_id.as_str())
        .collect()
}

/// Uniform sample of up to `count` distinct ids from `pool`.
pub fn draw<R: Rng + ?Sized>(pool: &[&str], count: usize, rng: &mut R) -> Vec<String> {
    pool.choose_multiple(rng, count)
        .map(|id| id.to_string())
        .collect()
}
