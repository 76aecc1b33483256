use serde::Serialize;

use crate::model::combination::Combination;
use crate::model::momentum::Momentum;
use crate::settings::Settings;

/// Rating assigned to every freshly generated combination.
pub const INITIAL_RATING: f64 = 1000.0;

/// Logistic expected score of `a` against `b`; `expected(a, b) + expected(b, a) == 1`.
pub fn expected_score(rating_a: f64, rating_b: f64) -> f64 {
    1.0 / (1.0 + 10f64.powf((rating_b - rating_a) / 400.0))
}

/// Before/after view of one applied result, for logging and callers.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct RatingUpdate {
    pub winner_before: f64,
    pub winner_after: f64,
    pub loser_before: f64,
    pub loser_after: f64,
    pub winner_k: f64,
    pub loser_k: f64,
    pub winner_momentum: Momentum,
    pub loser_momentum: Momentum,
}

/// Applies a decided comparison to both combinations in place.
///
/// K-factors are chosen from the pre-match play counts. Ratings move first,
/// then play counts, then momentum.
pub fn apply_result(
    winner: &mut Combination,
    loser: &mut Combination,
    settings: &Settings,
) -> RatingUpdate {
    let winner_before = winner.rating;
    let loser_before = loser.rating;

    let winner_expected = expected_score(winner_before, loser_before);
    let loser_expected = expected_score(loser_before, winner_before);

    let winner_k = settings.k_factor(winner.plays);
    let loser_k = settings.k_factor(loser.plays);

    winner.rating += winner_k * (1.0 - winner_expected);
    loser.rating += loser_k * (0.0 - loser_expected);
    winner.plays = winner.plays.saturating_add(1);
    loser.plays = loser.plays.saturating_add(1);

    winner.momentum = winner.momentum.after_win();
    loser.momentum = loser.momentum.after_loss();

    RatingUpdate {
        winner_before,
        winner_after: winner.rating,
        loser_before,
        loser_after: loser.rating,
        winner_k,
        loser_k,
        winner_momentum: winner.momentum,
        loser_momentum: loser.momentum,
    }
}

/// Backs a skipped combination out of the queue: one fewer play, one step cooler.
pub fn apply_skip(combo: &mut Combination) {
    combo.plays = combo.plays.saturating_sub(1);
    combo.momentum = combo.momentum.relaxed();
}
