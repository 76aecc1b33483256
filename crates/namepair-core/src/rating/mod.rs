//! Rating and reputation arithmetic.
//!
//! - `elo`: logistic expected score, K-factor driven rating updates and skip relaxation.
//! - `reputation`: bounded desirability weight derived from a name's win/loss tally.

pub mod elo;
mod reputation;

pub use elo::{INITIAL_RATING, RatingUpdate, apply_result, apply_skip, expected_score};
pub use reputation::{REPUTATION_CEILING, REPUTATION_FLOOR, reputation};
