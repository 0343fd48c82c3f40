//! Phase 3 tests: Attention calibration, exploration placement and vote rates.

use rand::rngs::StdRng;
use rand::SeedableRng;

use discourse_score::config::EngineConfig;
use discourse_score::engine::attention::{vote_rate, AttentionCalibrator, ExplorationPolicy};
use discourse_score::engine::bayes::BayesianEstimate;
use discourse_score::engine::{ScoreEngine, ScoreState, VoteEngine};
use discourse_score::graph::TreeBuilder;
use discourse_score::types::{
    Direction, Location, LocationStats, LocationType, Placement, PostId, ScoreError, VoteEvent,
    DEFAULT_ALPHA, DEFAULT_PRIOR_WEIGHT,
};

fn approx(a: f64, b: f64) -> bool {
    (a - b).abs() < 1e-9
}

fn front(rank: u32) -> Location {
    Location::new(LocationType::Frontpage, rank).unwrap()
}

fn calibrator() -> AttentionCalibrator {
    AttentionCalibrator::new(DEFAULT_ALPHA).unwrap()
}

// ==================== Calibrator Setup Tests ====================

#[test]
fn test_window_size_from_alpha() {
    assert_eq!(calibrator().window_size(), 10_000);
    assert_eq!(AttentionCalibrator::new(0.5).unwrap().window_size(), 2);
    assert_eq!(AttentionCalibrator::new(0.99).unwrap().window_size(), 100);
}

#[test]
fn test_alpha_must_be_open_unit_interval() {
    for alpha in [0.0, 1.0, -0.5, 1.5, f64::NAN] {
        assert!(
            matches!(
                AttentionCalibrator::new(alpha),
                Err(ScoreError::InvalidConfig(_))
            ),
            "alpha {} accepted",
            alpha
        );
    }
}

#[test]
fn test_unseen_location_has_zero_share() {
    let cal = calibrator();
    assert_eq!(cal.vote_share(&front(1)), 0.0);
    assert!(cal.stats(&front(1)).is_none());
    assert_eq!(cal.sitewide_vote_count(), 0);
}

#[test]
fn test_rank_zero_rejected_without_side_effects() {
    let mut cal = calibrator();
    let bad = Location {
        location_type: LocationType::NewPage,
        one_based_rank: 0,
    };
    assert!(matches!(
        cal.record_exploration_vote(bad),
        Err(ScoreError::InvalidRank(0))
    ));
    assert_eq!(cal.sitewide_vote_count(), 0);
    assert!(cal.all_stats().is_empty());
}

// ==================== Running Average Regime Tests ====================

#[test]
fn test_first_vote_takes_full_share() {
    let mut cal = calibrator();
    assert_eq!(cal.record_exploration_vote(front(1)).unwrap(), 1.0);
    assert_eq!(cal.sitewide_vote_count(), 1);
}

#[test]
fn test_thousand_votes_single_location() {
    let mut cal = calibrator();
    for n in 1..=1_000u64 {
        let share = cal.record_exploration_vote(front(1)).unwrap();
        assert!(cal.is_running_average(n));
        assert_eq!(share, 1.0);
    }
    let row = cal.stats(&front(1)).unwrap();
    assert_eq!(row.latest_sitewide_vote_count, 1_000);
    assert_eq!(cal.vote_share(&front(1)), 1.0);
}

#[test]
fn test_running_average_matches_vote_fraction() {
    let mut cal = calibrator();
    let locations = [front(1), front(2), front(3)];
    let mut counts = [0u64; 3];

    for i in 0..1_000u64 {
        // Uneven spread: rank 1 gets half the votes.
        let slot = match i % 4 {
            0 | 1 => 0,
            2 => 1,
            _ => 2,
        };
        cal.record_exploration_vote(locations[slot]).unwrap();
        counts[slot] += 1;
        assert!(cal.is_running_average(cal.sitewide_vote_count()));
    }

    let n = cal.sitewide_vote_count() as f64;
    let mut total = 0.0;
    for (location, count) in locations.iter().zip(counts) {
        let share = cal.vote_share(location);
        assert!(approx(share, count as f64 / n), "{}: {}", location, share);
        total += share;
    }
    assert!(approx(total, 1.0));
    assert!(approx(cal.vote_share(&front(1)), 0.5));
}

#[test]
fn test_share_decays_while_other_slots_vote() {
    let mut cal = calibrator();
    cal.record_exploration_vote(front(1)).unwrap();
    for _ in 0..3 {
        cal.record_exploration_vote(front(2)).unwrap();
    }
    // Stored row is stale, the query brings it forward.
    assert_eq!(cal.stats(&front(1)).unwrap().vote_share, 1.0);
    assert!(approx(cal.vote_share(&front(1)), 0.25));
    assert!(approx(cal.vote_share(&front(2)), 0.75));
    assert!(approx(cal.expected_votes(&front(2), 400), 300.0));
}

// ==================== Regime Boundary Tests ====================

#[test]
fn test_regime_switch_at_window() {
    let mut cal = calibrator();
    let a = front(1);
    let b = front(2);

    for _ in 1..=9_998 {
        cal.record_exploration_vote(a).unwrap();
    }
    let share_b = cal.record_exploration_vote(b).unwrap();
    assert_eq!(cal.sitewide_vote_count(), 9_999);
    assert!(cal.is_running_average(9_999));
    assert!(approx(share_b, 1.0 / 9_999.0));
    assert!(approx(cal.vote_share(&a), 9_998.0 / 9_999.0));

    // n == window: EWMA with a two-vote gap since a's last update.
    let share_a = cal.record_exploration_vote(a).unwrap();
    assert!(!cal.is_running_average(10_000));
    let expected = DEFAULT_ALPHA.powi(2) + (1.0 - DEFAULT_ALPHA);
    assert!((share_a - expected).abs() < 1e-12);
    // The running-average value would have been 9_999 / 10_000.
    assert!((share_a - 0.9999).abs() < 1e-6);

    // n == window + 1
    let share_b = cal.record_exploration_vote(b).unwrap();
    let expected_b = (1.0 / 9_999.0) * DEFAULT_ALPHA.powi(2) + (1.0 - DEFAULT_ALPHA);
    assert!((share_b - expected_b).abs() < 1e-12);
}

#[test]
fn test_regimes_agree_for_consecutive_votes() {
    let mut cal = calibrator();
    let a = front(1);
    let b = front(2);

    for n in 1..=9_998u64 {
        let loc = if n % 2 == 1 { a } else { b };
        cal.record_exploration_vote(loc).unwrap();
    }
    let before = cal.record_exploration_vote(a).unwrap();
    assert!(approx(before, 5_000.0 / 9_999.0));

    let ewma = cal.record_exploration_vote(a).unwrap();
    let running = (before * 9_999.0 + 1.0) / 10_000.0;
    assert!((ewma - running).abs() < 1e-12, "{} vs {}", ewma, running);
    assert!(approx(ewma, 5_001.0 / 10_000.0));
}

#[test]
fn test_ewma_small_window() {
    let mut cal = AttentionCalibrator::new(0.5).unwrap();
    let a = front(1);
    let b = front(2);

    assert_eq!(cal.record_exploration_vote(a).unwrap(), 1.0);
    assert!(approx(cal.record_exploration_vote(a).unwrap(), 1.0));
    assert!(approx(cal.record_exploration_vote(b).unwrap(), 0.5));
    assert!(approx(cal.record_exploration_vote(a).unwrap(), 0.75));
    assert!(approx(cal.vote_share(&b), 0.25));
    assert!(approx(cal.vote_share(&a) + cal.vote_share(&b), 1.0));
}

#[test]
fn test_from_parts_resumes() {
    let rows = vec![
        LocationStats {
            location: front(2),
            vote_share: 0.4,
            latest_sitewide_vote_count: 10,
        },
        LocationStats {
            location: front(1),
            vote_share: 0.6,
            latest_sitewide_vote_count: 9,
        },
    ];
    let mut cal = AttentionCalibrator::from_parts(DEFAULT_ALPHA, 10, rows).unwrap();
    assert_eq!(cal.sitewide_vote_count(), 10);
    assert!(approx(cal.vote_share(&front(1)), 0.6 * 9.0 / 10.0));

    let share = cal.record_exploration_vote(front(1)).unwrap();
    assert!(approx(share, (0.6 * 9.0 + 1.0) / 11.0));

    let ordered: Vec<Location> = cal.all_stats().iter().map(|r| r.location).collect();
    assert_eq!(ordered, vec![front(1), front(2)]);
}

// ==================== Exploration Policy Tests ====================

#[test]
fn test_policy_without_exploration_keeps_rank_order() {
    let policy = ExplorationPolicy::new(LocationType::Frontpage, 0.0).unwrap();
    let mut rng = StdRng::seed_from_u64(7);
    let slots = policy.arrange(&[5, 3, 9], &mut rng);

    let ids: Vec<PostId> = slots.iter().map(|(id, _)| *id).collect();
    assert_eq!(ids, vec![5, 3, 9]);
    for (i, (_, placement)) in slots.iter().enumerate() {
        assert!(!placement.is_exploration);
        assert_eq!(placement.location, front(i as u32 + 1));
    }
}

#[test]
fn test_policy_always_exploring_is_permutation() {
    let policy = ExplorationPolicy::new(LocationType::NewPage, 1.0).unwrap();
    let mut rng = StdRng::seed_from_u64(42);
    let ranked: Vec<PostId> = (1..=20).collect();
    let slots = policy.arrange(&ranked, &mut rng);

    assert!(slots.iter().all(|(_, p)| p.is_exploration));
    let mut ids: Vec<PostId> = slots.iter().map(|(id, _)| *id).collect();
    ids.sort_unstable();
    assert_eq!(ids, ranked);
    assert_eq!(slots[19].1.location.one_based_rank, 20);
}

#[test]
fn test_policy_mixed_is_deterministic_per_seed() {
    let policy = ExplorationPolicy::new(LocationType::Frontpage, 0.3).unwrap();
    let ranked: Vec<PostId> = (100..130).collect();
    let first = policy.arrange(&ranked, &mut StdRng::seed_from_u64(1));
    let second = policy.arrange(&ranked, &mut StdRng::seed_from_u64(1));
    assert_eq!(first, second);
    assert_eq!(first.len(), ranked.len());
}

#[test]
fn test_policy_rejects_bad_probability() {
    assert!(ExplorationPolicy::new(LocationType::Frontpage, 1.5).is_err());
    assert!(ExplorationPolicy::new(LocationType::Frontpage, -0.1).is_err());
}

// ==================== Engine Integration Tests ====================

#[test]
fn test_only_exploration_votes_calibrate() {
    let tree = TreeBuilder::new().post(1).post(2).build().unwrap();
    let config = EngineConfig::default();
    let writer = VoteEngine::new(config);
    let reader = ScoreEngine::new(config);
    let mut state = ScoreState::new(&config).unwrap();

    let ranked = writer
        .ingest(
            &tree,
            &mut state,
            VoteEvent::new(1, 1, Direction::Up, 1).placed(Placement::ranked(front(1))),
        )
        .unwrap();
    assert_eq!(ranked.vote_share, None);

    let neutral = writer
        .ingest(
            &tree,
            &mut state,
            VoteEvent::new(2, 1, Direction::Neutral, 2).placed(Placement::exploration(front(1))),
        )
        .unwrap();
    assert_eq!(neutral.vote_share, None);
    assert_eq!(state.attention().sitewide_vote_count(), 0);

    let explored = writer
        .ingest(
            &tree,
            &mut state,
            VoteEvent::new(3, 2, Direction::Down, 3).placed(Placement::exploration(front(2))),
        )
        .unwrap();
    assert_eq!(explored.vote_share, Some(1.0));
    assert_eq!(reader.vote_share(&state, &front(2)), 1.0);
    assert_eq!(reader.vote_share(&state, &front(1)), 0.0);
    assert_eq!(state.ledger().exploration_events().count(), 1);
}

#[test]
fn test_replay_counts_exploration_votes() {
    let tree = TreeBuilder::new().post(1).build().unwrap();
    let config = EngineConfig::default();
    let writer = VoteEngine::new(config);
    let mut state = ScoreState::new(&config).unwrap();

    let votes: Vec<VoteEvent> = (1..=6)
        .map(|voter| {
            let placement = if voter % 2 == 0 {
                Placement::exploration(front(1))
            } else {
                Placement::ranked(front(1))
            };
            VoteEvent::new(voter, 1, Direction::Up, voter).placed(placement)
        })
        .collect();
    let report = writer.replay(&tree, &mut state, votes).unwrap();
    assert_eq!(report.votes_applied, 6);
    assert_eq!(report.exploration_votes, 3);
    assert_eq!(state.attention().sitewide_vote_count(), 3);
}

// ==================== Vote Rate Tests ====================

#[test]
fn test_vote_rate_without_data_is_prior() {
    let prior = BayesianEstimate::rate(1.0, DEFAULT_PRIOR_WEIGHT);
    let rate = vote_rate(prior, 0, 0.0, 0, 0.0);
    assert!(approx(rate.average, 1.0));
    assert!(approx(rate.weight, DEFAULT_PRIOR_WEIGHT));
}

#[test]
fn test_vote_rate_shrinks_toward_sitewide() {
    let prior = BayesianEstimate::rate(1.0, DEFAULT_PRIOR_WEIGHT);
    let sitewide = (DEFAULT_PRIOR_WEIGHT + 200.0) / (DEFAULT_PRIOR_WEIGHT + 100.0);

    let unseen = vote_rate(prior, 0, 0.0, 200, 100.0);
    assert!(approx(unseen.average, sitewide));
    assert!(approx(unseen.weight, DEFAULT_PRIOR_WEIGHT));

    let post = vote_rate(prior, 10, 2.0, 200, 100.0);
    let expected = (sitewide * DEFAULT_PRIOR_WEIGHT + 10.0) / (DEFAULT_PRIOR_WEIGHT + 2.0);
    assert!(approx(post.average, expected));
    assert!(post.average > sitewide);
}

#[test]
fn test_engine_vote_rate_uses_tallies() {
    let tree = TreeBuilder::new().post(1).post(2).build().unwrap();
    let config = EngineConfig::default();
    let writer = VoteEngine::new(config);
    let reader = ScoreEngine::new(config);
    let mut state = ScoreState::new(&config).unwrap();

    let votes = vec![
        VoteEvent::new(1, 1, Direction::Up, 1),
        VoteEvent::new(2, 1, Direction::Up, 2),
        VoteEvent::new(3, 1, Direction::Up, 3),
        VoteEvent::new(4, 1, Direction::Down, 4),
        VoteEvent::new(1, 2, Direction::Up, 5),
    ];
    writer.replay(&tree, &mut state, votes).unwrap();

    let rate = reader.vote_rate(&state, 1, 2.0, 8.0);
    let expected = vote_rate(config.rate_prior(), 3, 2.0, 4, 8.0);
    assert_eq!(rate, expected);
}
