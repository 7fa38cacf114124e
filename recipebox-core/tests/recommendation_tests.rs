//! Recommendation sampling with an in-memory history and seeded RNGs.

use chrono::{DateTime, Duration, Utc};
use rand::rngs::StdRng;
use rand::SeedableRng;
use recipebox_core::recommend::recency_weight;
use recipebox_core::{recommend, Candidate, MemoryHistory, RecommendationHistory};
use std::collections::HashSet;
use uuid::Uuid;

fn made_days_ago(days: i64, now: DateTime<Utc>) -> Candidate {
    Candidate {
        id: Uuid::new_v4(),
        saved_at: now - Duration::days(400),
        last_made_at: Some(now - Duration::days(days)),
    }
}

#[test]
fn empty_pool_returns_none() {
    let mut history = MemoryHistory::new();
    let mut rng = StdRng::seed_from_u64(7);
    let user = Uuid::new_v4();

    let chosen = recommend(&mut history, user, &[], Utc::now(), &mut rng).unwrap();
    assert_eq!(chosen, None);
}

#[test]
fn never_repeats_until_every_recipe_was_shown() {
    let now = Utc::now();
    let candidates: Vec<Candidate> = (1..=6).map(|d| made_days_ago(d * 5, now)).collect();
    let mut history = MemoryHistory::new();
    let mut rng = StdRng::seed_from_u64(42);
    let user = Uuid::new_v4();

    let mut seen = HashSet::new();
    for _ in 0..candidates.len() {
        let chosen = recommend(&mut history, user, &candidates, now, &mut rng)
            .unwrap()
            .unwrap();
        assert!(seen.insert(chosen), "recipe {} recommended twice", chosen);
    }
    assert_eq!(seen.len(), candidates.len());
    assert_eq!(history.recently_shown(user).unwrap(), seen);
}

#[test]
fn history_resets_after_exhaustion() {
    let now = Utc::now();
    let candidates = vec![made_days_ago(1, now), made_days_ago(2, now)];
    let mut history = MemoryHistory::new();
    let mut rng = StdRng::seed_from_u64(3);
    let user = Uuid::new_v4();

    for _ in 0..2 {
        recommend(&mut history, user, &candidates, now, &mut rng).unwrap();
    }
    assert_eq!(history.recently_shown(user).unwrap().len(), 2);

    let third = recommend(&mut history, user, &candidates, now, &mut rng)
        .unwrap()
        .unwrap();
    assert_eq!(
        history.recently_shown(user).unwrap(),
        HashSet::from([third])
    );
}

#[test]
fn single_recipe_is_always_recommended() {
    let now = Utc::now();
    let only = made_days_ago(4, now);
    let mut history = MemoryHistory::new();
    let mut rng = StdRng::seed_from_u64(11);
    let user = Uuid::new_v4();

    for _ in 0..5 {
        let chosen = recommend(&mut history, user, &[only], now, &mut rng).unwrap();
        assert_eq!(chosen, Some(only.id));
    }
}

#[test]
fn history_is_per_user() {
    let now = Utc::now();
    let candidates = vec![made_days_ago(1, now), made_days_ago(9, now)];
    let mut history = MemoryHistory::new();
    let mut rng = StdRng::seed_from_u64(5);
    let alice = Uuid::new_v4();
    let bob = Uuid::new_v4();

    recommend(&mut history, alice, &candidates, now, &mut rng).unwrap();
    assert_eq!(history.recently_shown(alice).unwrap().len(), 1);
    assert!(history.recently_shown(bob).unwrap().is_empty());
}

#[test]
fn older_recipes_are_picked_at_least_as_often() {
    let now = Utc::now();
    let yesterday = made_days_ago(1, now);
    let ten_days = made_days_ago(10, now);
    assert!(recency_weight(&ten_days, now) >= recency_weight(&yesterday, now));

    let candidates = [yesterday, ten_days];
    let mut rng = StdRng::seed_from_u64(2024);
    let user = Uuid::new_v4();

    let mut older_picks = 0;
    let mut newer_picks = 0;
    for _ in 0..2000 {
        // Fresh history each draw so both recipes are always eligible
        let mut history = MemoryHistory::new();
        match recommend(&mut history, user, &candidates, now, &mut rng).unwrap() {
            Some(id) if id == ten_days.id => older_picks += 1,
            Some(id) if id == yesterday.id => newer_picks += 1,
            other => panic!("unexpected recommendation {:?}", other),
        }
    }

    // Weights are 11 vs 2
    assert!(older_picks >= newer_picks);
    assert!(older_picks > 1400, "older recipe picked {} times", older_picks);
}
