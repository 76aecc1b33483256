/// Floor of the reputation weight; approached but never reached.
pub const REPUTATION_FLOOR: f64 = 0.2;
/// Ceiling of the reputation weight; approached but never reached.
pub const REPUTATION_CEILING: f64 = 2.0;

/// Maps a name's slot-agnostic win/loss tally to a selection weight.
///
/// The win rate is Laplace-smoothed, `(wins + 1) / (wins + losses + 2)`, so a
/// name with no history lands at the midpoint of the win-rate scale and sparse
/// records never produce a zero or saturated weight. The result is scaled
/// into the open interval `(0.2, 2.0)`. A name with no history therefore
/// scores 1.1, not 1.0. It is only ever used to weight the featured-name draw
/// and is recomputed from the live tally on every call.
pub fn reputation(wins: u32, losses: u32) -> f64 {
    let wins = f64::from(wins);
    let losses = f64::from(losses);
    let win_rate = (wins + 1.0) / (wins + losses + 2.0);
    REPUTATION_FLOOR + (REPUTATION_CEILING - REPUTATION_FLOOR) * win_rate
}
