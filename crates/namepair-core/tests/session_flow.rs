use namepair_core::matchmaker::eligible_combinations;
use namepair_core::model::{Gender, GenderMode, Momentum, Outcome, ScoringGroup};
use namepair_core::rating::INITIAL_RATING;
use namepair_core::{EngineError, Ranker, Store};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

const NAMES: &[(&str, Gender)] = &[
    ("Anna", Gender::Feminine),
    ("Rose", Gender::Feminine),
    ("Iris", Gender::Feminine),
    ("Noah", Gender::Masculine),
    ("Liam", Gender::Masculine),
    ("Eli", Gender::Masculine),
    ("Sam", Gender::Neutral),
    ("Quinn", Gender::Neutral),
];

fn populated(seed: u64) -> Ranker {
    let mut ranker = Ranker::with_seed(Store::in_memory(), seed);
    for (text, gender) in NAMES {
        ranker.add_name(text, *gender).unwrap();
    }
    ranker
}

#[test]
fn every_name_pair_is_materialized_in_both_groups() {
    let ranker = populated(1);
    let n = NAMES.len();
    assert_eq!(ranker.state().combinations().len(), 2 * n * (n - 1));
    for group in ScoringGroup::ALL {
        let in_group = ranker
            .state()
            .combinations()
            .iter()
            .filter(|c| c.group == group)
            .inspect(|c| {
                assert_ne!(c.first, c.middle);
                assert_eq!(c.rating, INITIAL_RATING);
                assert_eq!(c.plays, 0);
                assert_eq!(c.momentum, Momentum::NEUTRAL);
            })
            .count();
        assert_eq!(in_group, n * (n - 1));
    }
}

#[test]
fn picks_respect_group_and_gender_mode() {
    let mut ranker = populated(7);
    for mode in [GenderMode::FeminineOnly, GenderMode::MasculineOnly] {
        for group in ScoringGroup::ALL {
            for _ in 0..50 {
                let pair = ranker.pick_pair(group, mode).expect("enough combinations");
                assert_ne!(pair.a, pair.b);
                for id in [pair.a, pair.b] {
                    let combo = ranker.state().combination(id).unwrap();
                    assert_eq!(combo.group, group);
                    for name in combo.names() {
                        let gender = ranker.state().name(name).unwrap().gender;
                        assert!(mode.admits(gender), "{gender} leaked into {mode:?}");
                    }
                }
            }
        }
    }
}

#[test]
fn long_random_session_keeps_invariants() {
    let mut ranker = populated(2024);
    let mut driver = StdRng::seed_from_u64(99);
    let mut decided = 0usize;
    let mut skipped = 0usize;

    for round in 0..400 {
        let group = if round % 3 == 0 {
            ScoringGroup::Secondary
        } else {
            ScoringGroup::Primary
        };
        let mode = if driver.gen_bool(0.5) {
            GenderMode::FeminineOnly
        } else {
            GenderMode::MasculineOnly
        };
        let pair = ranker.pick_pair(group, mode).unwrap();
        if driver.gen_bool(0.15) {
            ranker.record_skip(group, pair.a, pair.b).unwrap();
            skipped += 1;
        } else if driver.gen_bool(0.5) {
            ranker.apply_decision(group, pair.a, pair.b).unwrap();
            decided += 1;
        } else {
            ranker.apply_decision(group, pair.b, pair.a).unwrap();
            decided += 1;
        }
    }

    let state = ranker.state();
    for combo in state.combinations() {
        let momentum = combo.momentum.value();
        assert!((Momentum::MIN..=Momentum::MAX).contains(&momentum));
        assert!(combo.rating.is_finite());
        let appearances = state
            .decisions()
            .iter()
            .filter(|d| d.outcome.combinations().contains(&combo.id))
            .count();
        assert!(combo.plays as usize <= appearances);
    }

    let total_wins: u32 = state.names().iter().map(|n| n.wins).sum();
    let total_losses: u32 = state.names().iter().map(|n| n.losses).sum();
    assert_eq!(total_wins as usize, 2 * decided);
    assert_eq!(total_losses as usize, 2 * decided);
    for name in state.names() {
        let reputation = name.reputation();
        assert!((0.2..=2.0).contains(&reputation));
    }

    let log = state.decisions();
    assert_eq!(log.len(), decided + skipped);
    assert!(log.windows(2).all(|w| w[0].sequence < w[1].sequence));
    assert_eq!(
        log.iter().filter(|d| matches!(d.outcome, Outcome::Skip { .. })).count(),
        skipped
    );
}

#[test]
fn pairing_needs_two_eligible_combinations() {
    let mut ranker = Ranker::with_seed(Store::in_memory(), 5);
    ranker.add_name("Anna", Gender::Feminine).unwrap();
    assert!(ranker.pick_pair(ScoringGroup::Primary, GenderMode::FeminineOnly).is_none());

    ranker.add_name("Noah", Gender::Masculine).unwrap();
    // Anna/Noah mixes genders, so neither mode admits it.
    for mode in [GenderMode::FeminineOnly, GenderMode::MasculineOnly] {
        assert!(eligible_combinations(ranker.state(), ScoringGroup::Primary, mode).is_empty());
        assert!(ranker.pick_pair(ScoringGroup::Primary, mode).is_none());
    }

    ranker.add_name("Sam", Gender::Neutral).unwrap();
    let pair = ranker
        .pick_pair(ScoringGroup::Primary, GenderMode::FeminineOnly)
        .unwrap();
    let mut ids = [pair.a, pair.b];
    ids.sort();
    let mut expected: Vec<_> =
        eligible_combinations(ranker.state(), ScoringGroup::Primary, GenderMode::FeminineOnly)
            .iter()
            .map(|c| c.id)
            .collect();
    expected.sort();
    assert_eq!(ids.to_vec(), expected);
}

#[test]
fn invalid_requests_do_not_touch_the_log() {
    let mut ranker = populated(3);
    let pair = ranker
        .pick_pair(ScoringGroup::Primary, GenderMode::FeminineOnly)
        .unwrap();

    let err = ranker
        .apply_decision(ScoringGroup::Secondary, pair.a, pair.b)
        .unwrap_err();
    assert!(matches!(err, EngineError::GroupMismatch { .. }));
    assert!(ranker.decisions(None).is_empty());

    ranker
        .apply_decision(ScoringGroup::Primary, pair.a, pair.b)
        .unwrap();
    assert_eq!(ranker.decisions(Some(ScoringGroup::Primary)).len(), 1);
    assert!(ranker.decisions(Some(ScoringGroup::Secondary)).is_empty());
}

#[test]
fn leaderboards_follow_decisions() {
    let mut ranker = populated(11);
    let pair = ranker
        .pick_pair(ScoringGroup::Primary, GenderMode::MasculineOnly)
        .unwrap();
    for _ in 0..3 {
        ranker
            .apply_decision(ScoringGroup::Primary, pair.a, pair.b)
            .unwrap();
    }

    let top = ranker.top_combinations(ScoringGroup::Primary, None, 1);
    assert_eq!(top[0].id, pair.a);
    assert!(top[0].rating > INITIAL_RATING);

    let bottom = ranker.top_combinations(ScoringGroup::Primary, None, usize::MAX);
    assert_eq!(bottom.last().map(|s| s.id), Some(pair.b));

    let combined = ranker.top_combinations_combined(None, 1);
    assert!(combined[0].average_rating > INITIAL_RATING);
}
