//! Reputation-first, streak-aware pair selection.
//!
//! Each request either takes the dark-horse path (two eligible combinations
//! drawn uniformly) or runs three weighted stages:
//! 1. feature a name, weighted by reputation;
//! 2. pick an anchor combination containing it, favouring under-played and hot ones;
//! 3. feature an opposing name the same way and take its combination rated
//!    closest to a target that hot anchors push upward.

mod sampler;

use std::collections::{HashMap, HashSet};

use rand::Rng;
use statrs::statistics::Statistics;
use tracing::{Level, event};

use crate::model::{AtomicName, Combination, CombinationId, GenderMode, Momentum, NameId, ScoringGroup};
use crate::settings::Settings;
use crate::store::StoreState;

pub use sampler::{sample_two, sample_weighted};

/// Rating spread assumed when the eligible ratings give no usable deviation.
const FALLBACK_RATING_SPREAD: f64 = 100.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SelectionPath {
    /// Uniform draw requested by the random-match rate.
    DarkHorse,
    /// Anchor and opponent both came from the featured-name stages.
    Featured,
    /// Opponent name had nothing usable; closest-rated eligible combination used.
    ClosestRated,
    /// A stage came up empty and the pair was drawn uniformly.
    Uniform,
}

impl SelectionPath {
    pub const fn as_str(self) -> &'static str {
        match self {
            SelectionPath::DarkHorse => "dark_horse",
            SelectionPath::Featured => "featured",
            SelectionPath::ClosestRated => "closest_rated",
            SelectionPath::Uniform => "uniform",
        }
    }
}

/// Two combinations to present side by side.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PairSelection {
    pub a: CombinationId,
    pub b: CombinationId,
    pub path: SelectionPath,
}

impl PairSelection {
    pub const fn ids(&self) -> (CombinationId, CombinationId) {
        (self.a, self.b)
    }
}

/// Under-played bonus times streak multiplier.
pub fn combination_weight(combo: &Combination) -> f64 {
    let underplayed = 1.0 / (f64::from(combo.plays) + 1.0);
    let streak = f64::from(combo.momentum.value());
    let multiplier = if streak > 0.0 {
        1.0 + 0.3 * streak
    } else if streak < 0.0 {
        (1.0 + 0.15 * streak).max(0.25)
    } else {
        1.0
    };
    underplayed * multiplier
}

/// How many rating deviations above the anchor the opponent target sits.
pub fn reach(momentum: Momentum) -> f64 {
    match momentum.value() {
        i8::MIN..=0 => 0.4,
        1 => 0.7,
        2 => 1.0,
        _ => 1.4,
    }
}

/// Names eligible under `mode`, in store order.
pub fn eligible_names(state: &StoreState, mode: GenderMode) -> Vec<&AtomicName> {
    state
        .names()
        .iter()
        .filter(|name| mode.admits(name.gender))
        .collect()
}

/// Combinations of `group` whose both names are eligible under `mode`.
pub fn eligible_combinations(
    state: &StoreState,
    group: ScoringGroup,
    mode: GenderMode,
) -> Vec<&Combination> {
    let allowed: HashSet<NameId> = eligible_names(state, mode).iter().map(|n| n.id).collect();
    state
        .combinations()
        .iter()
        .filter(|c| c.group == group && allowed.contains(&c.first) && allowed.contains(&c.middle))
        .collect()
}

/// Chooses the next pair for `group`, or `None` when fewer than two combinations are eligible.
pub fn pick_pair<R>(
    state: &StoreState,
    group: ScoringGroup,
    mode: GenderMode,
    settings: &Settings,
    rng: &mut R,
) -> Option<PairSelection>
where
    R: Rng + ?Sized,
{
    let names = eligible_names(state, mode);
    let combos = eligible_combinations(state, group, mode);
    if combos.len() < 2 {
        event!(
            target: "namepair::matchmaker",
            Level::DEBUG,
            group = group.number(),
            mode = mode.as_str(),
            eligible = combos.len(),
            "not enough combinations to pair"
        );
        return None;
    }

    let selection = if rng.gen_bool(settings.random_match_probability()) {
        uniform_pair(&combos, SelectionPath::DarkHorse, rng)
    } else {
        weighted_pair(&names, &combos, rng)
    };

    if let Some(selection) = selection.as_ref() {
        event!(
            target: "namepair::matchmaker",
            Level::DEBUG,
            group = group.number(),
            mode = mode.as_str(),
            eligible = combos.len(),
            a = selection.a.0,
            b = selection.b.0,
            path = selection.path.as_str(),
        );
    }
    selection
}

fn uniform_pair<R>(combos: &[&Combination], path: SelectionPath, rng: &mut R) -> Option<PairSelection>
where
    R: Rng + ?Sized,
{
    let (a, b) = sample_two(combos, rng)?;
    Some(PairSelection {
        a: a.id,
        b: b.id,
        path,
    })
}

fn weighted_pair<R>(
    names: &[&AtomicName],
    combos: &[&Combination],
    rng: &mut R,
) -> Option<PairSelection>
where
    R: Rng + ?Sized,
{
    let mut by_name: HashMap<NameId, Vec<&Combination>> = HashMap::new();
    for combo in combos {
        by_name.entry(combo.first).or_default().push(combo);
        by_name.entry(combo.middle).or_default().push(combo);
    }

    let spread = rating_spread(combos);

    // Stages 1 and 2.
    let anchor = sample_weighted(names, |n| n.reputation(), rng)
        .and_then(|featured| by_name.get(&featured.id))
        .and_then(|candidates| sample_weighted(candidates, |c| combination_weight(c), rng))
        .copied();
    let Some(anchor) = anchor else {
        return uniform_pair(combos, SelectionPath::Uniform, rng);
    };

    // Stage 3.
    let target = anchor.rating + reach(anchor.momentum) * spread;
    let opposing: Vec<&AtomicName> = names
        .iter()
        .copied()
        .filter(|n| !anchor.contains(n.id))
        .collect();

    let featured_opponent = sample_weighted(&opposing, |n| n.reputation(), rng)
        .and_then(|name| by_name.get(&name.id))
        .and_then(|candidates| closest_to(candidates, target, anchor.id));

    let (opponent, path) = match featured_opponent {
        Some(opponent) => (Some(opponent), SelectionPath::Featured),
        None => (closest_to(combos, target, anchor.id), SelectionPath::ClosestRated),
    };

    match opponent {
        Some(opponent) => Some(PairSelection {
            a: anchor.id,
            b: opponent.id,
            path,
        }),
        None => {
            let others: Vec<&Combination> = combos
                .iter()
                .copied()
                .filter(|c| c.id != anchor.id)
                .collect();
            let opponent = sample_weighted(&others, |_| 1.0, rng)?;
            Some(PairSelection {
                a: anchor.id,
                b: opponent.id,
                path: SelectionPath::Uniform,
            })
        }
    }
}

fn closest_to<'a>(
    candidates: &[&'a Combination],
    target: f64,
    exclude: CombinationId,
) -> Option<&'a Combination> {
    candidates
        .iter()
        .copied()
        .filter(|c| c.id != exclude)
        .min_by(|x, y| (x.rating - target).abs().total_cmp(&(y.rating - target).abs()))
}

/// Sample standard deviation of the eligible ratings.
fn rating_spread(combos: &[&Combination]) -> f64 {
    let spread = combos.iter().map(|c| c.rating).std_dev();
    if spread.is_finite() {
        spread
    } else {
        FALLBACK_RATING_SPREAD
    }
}
