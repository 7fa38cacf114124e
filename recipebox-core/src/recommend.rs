//! Weighted-random recipe recommendation.
//!
//! Recipes that haven't been made (or saved) in a while are more likely to be
//! picked. A per-user history of recently recommended recipes keeps the same
//! recipe from coming up twice in a row; once every candidate has been shown
//! the history is forgotten and the cycle starts over.

use chrono::{DateTime, Utc};
use rand::seq::IndexedRandom;
use rand::Rng;
use std::collections::{HashMap, HashSet};
use std::convert::Infallible;
use uuid::Uuid;

/// The fields of a recipe the sampler needs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Candidate {
    pub id: Uuid,
    pub saved_at: DateTime<Utc>,
    pub last_made_at: Option<DateTime<Utc>>,
}

/// Sampling weight: whole days since the recipe was last made (or saved, if
/// never made), plus one. Never below 1.
pub fn recency_weight(candidate: &Candidate, now: DateTime<Utc>) -> u64 {
    let reference = candidate.last_made_at.unwrap_or(candidate.saved_at);
    let days = (now - reference).num_days();
    days.saturating_add(1).max(1) as u64
}

/// Storage for the recipes recently recommended to each user.
pub trait RecommendationHistory {
    type Error;

    fn recently_shown(&mut self, user_id: Uuid) -> Result<HashSet<Uuid>, Self::Error>;

    /// Forget everything recommended to this user.
    fn reset(&mut self, user_id: Uuid) -> Result<(), Self::Error>;

    fn record(
        &mut self,
        user_id: Uuid,
        recipe_id: Uuid,
        at: DateTime<Utc>,
    ) -> Result<(), Self::Error>;
}

/// Pick one recipe for `user_id` out of `candidates`.
///
/// Returns `None` only when there are no candidates at all. The chosen id is
/// recorded in `history` before it is returned.
pub fn recommend<H, R>(
    history: &mut H,
    user_id: Uuid,
    candidates: &[Candidate],
    now: DateTime<Utc>,
    rng: &mut R,
) -> Result<Option<Uuid>, H::Error>
where
    H: RecommendationHistory,
    R: Rng + ?Sized,
{
    let mut shown = history.recently_shown(user_id)?;

    if candidates.iter().all(|c| shown.contains(&c.id)) {
        tracing::debug!(%user_id, "recommendation history exhausted, starting over");
        history.reset(user_id)?;
        shown.clear();
    }

    let pool: Vec<&Candidate> = candidates
        .iter()
        .filter(|c| !shown.contains(&c.id))
        .collect();

    let Ok(chosen) = pool.choose_weighted(rng, |c| recency_weight(c, now)) else {
        return Ok(None);
    };
    let chosen_id = chosen.id;

    history.record(user_id, chosen_id, now)?;

    Ok(Some(chosen_id))
}

/// Per-user in-memory history.
#[derive(Debug, Default)]
pub struct MemoryHistory {
    shown: HashMap<Uuid, HashSet<Uuid>>,
}

impl MemoryHistory {
    pub fn new() -> Self {
        Self::default()
    }
}

impl RecommendationHistory for MemoryHistory {
    type Error = Infallible;

    fn recently_shown(&mut self, user_id: Uuid) -> Result<HashSet<Uuid>, Infallible> {
        Ok(self.shown.get(&user_id).cloned().unwrap_or_default())
    }

    fn reset(&mut self, user_id: Uuid) -> Result<(), Infallible> {
        self.shown.remove(&user_id);
        Ok(())
    }

    fn record(
        &mut self,
        user_id: Uuid,
        recipe_id: Uuid,
        _at: DateTime<Utc>,
    ) -> Result<(), Infallible> {
        self.shown.entry(user_id).or_default().insert(recipe_id);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn candidate(saved_days_ago: i64, made_days_ago: Option<i64>, now: DateTime<Utc>) -> Candidate {
        Candidate {
            id: Uuid::new_v4(),
            saved_at: now - Duration::days(saved_days_ago),
            last_made_at: made_days_ago.map(|d| now - Duration::days(d)),
        }
    }

    #[test]
    fn test_weight_uses_last_made_over_saved() {
        let now = Utc::now();
        assert_eq!(recency_weight(&candidate(100, Some(3), now), now), 4);
        assert_eq!(recency_weight(&candidate(100, None, now), now), 101);
    }

    #[test]
    fn test_weight_floor_is_one() {
        let now = Utc::now();
        assert_eq!(recency_weight(&candidate(0, None, now), now), 1);

        // Clock skew: saved "in the future"
        let future = Candidate {
            id: Uuid::new_v4(),
            saved_at: now + Duration::days(5),
            last_made_at: None,
        };
        assert_eq!(recency_weight(&future, now), 1);
    }

    #[test]
    fn test_weight_is_monotonic() {
        let now = Utc::now();
        let mut previous = 0;
        for days in 0..60 {
            let weight = recency_weight(&candidate(365, Some(days), now), now);
            assert!(weight >= previous);
            previous = weight;
        }
    }
}
