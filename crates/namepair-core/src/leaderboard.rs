//! Read-only standings. Plain sorts over the committed state.

use std::collections::BTreeMap;

use serde::Serialize;

use crate::model::{Combination, CombinationId, Gender, GenderMode, NameId, ScoringGroup};
use crate::store::StoreState;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CombinationStanding {
    pub rank: usize,
    pub id: CombinationId,
    pub first: String,
    pub middle: String,
    /// "First Middle Surname".
    pub display: String,
    pub rating: f64,
    pub plays: u32,
    pub momentum: i8,
}

/// A (first, middle) pair with its rating averaged over the groups that hold it.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CombinedStanding {
    pub rank: usize,
    pub first: String,
    pub middle: String,
    pub display: String,
    pub average_rating: f64,
    pub groups: usize,
    pub total_plays: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NameStanding {
    pub rank: usize,
    pub text: String,
    pub gender: Gender,
    pub reputation: f64,
    pub wins: u32,
    pub losses: u32,
    pub skips: u32,
}

/// Highest-rated combinations of one group.
pub fn top_combinations(
    state: &StoreState,
    group: ScoringGroup,
    filter: Option<GenderMode>,
    limit: usize,
) -> Vec<CombinationStanding> {
    let surname = state.settings().surname;
    let mut rows: Vec<&Combination> = state
        .combinations()
        .iter()
        .filter(|c| c.group == group && admitted(state, c, filter))
        .collect();
    rows.sort_by(|a, b| b.rating.total_cmp(&a.rating));

    rows.into_iter()
        .take(limit)
        .enumerate()
        .map(|(i, c)| {
            let (first, middle) = texts(state, c.first, c.middle);
            CombinationStanding {
                rank: i + 1,
                id: c.id,
                display: display_name(&first, &middle, &surname),
                first,
                middle,
                rating: c.rating,
                plays: c.plays,
                momentum: c.momentum.value(),
            }
        })
        .collect()
}

/// Pairs ranked by their rating averaged across both groups.
pub fn top_combinations_combined(
    state: &StoreState,
    filter: Option<GenderMode>,
    limit: usize,
) -> Vec<CombinedStanding> {
    let surname = state.settings().surname;
    let mut pooled: BTreeMap<(NameId, NameId), (f64, usize, u32)> = BTreeMap::new();
    for combo in state.combinations() {
        if !admitted(state, combo, filter) {
            continue;
        }
        let entry = pooled.entry((combo.first, combo.middle)).or_insert((0.0, 0, 0));
        entry.0 += combo.rating;
        entry.1 += 1;
        entry.2 += combo.plays;
    }

    let mut rows: Vec<((NameId, NameId), f64, usize, u32)> = pooled
        .into_iter()
        .map(|(key, (sum, count, plays))| (key, sum / count as f64, count, plays))
        .collect();
    rows.sort_by(|a, b| b.1.total_cmp(&a.1));

    rows.into_iter()
        .take(limit)
        .enumerate()
        .map(|(i, ((first_id, middle_id), average_rating, groups, total_plays))| {
            let (first, middle) = texts(state, first_id, middle_id);
            CombinedStanding {
                rank: i + 1,
                display: display_name(&first, &middle, &surname),
                first,
                middle,
                average_rating,
                groups,
                total_plays,
            }
        })
        .collect()
}

/// Names ordered by reputation.
pub fn top_names(state: &StoreState, gender: Option<Gender>, limit: usize) -> Vec<NameStanding> {
    let mut rows: Vec<NameStanding> = state
        .names()
        .iter()
        .filter(|n| gender.is_none_or(|g| n.gender == g))
        .map(|n| NameStanding {
            rank: 0,
            text: n.text.clone(),
            gender: n.gender,
            reputation: n.reputation(),
            wins: n.wins,
            losses: n.losses,
            skips: n.skips,
        })
        .collect();
    rows.sort_by(|a, b| b.reputation.total_cmp(&a.reputation));
    rows.truncate(limit);
    for (i, row) in rows.iter_mut().enumerate() {
        row.rank = i + 1;
    }
    rows
}

pub fn display_name(first: &str, middle: &str, surname: &str) -> String {
    format!("{first} {middle} {surname}")
}

fn admitted(state: &StoreState, combo: &Combination, filter: Option<GenderMode>) -> bool {
    let Some(mode) = filter else {
        return true;
    };
    combo
        .names()
        .iter()
        .all(|id| state.name(*id).is_some_and(|n| mode.admits(n.gender)))
}

fn texts(state: &StoreState, first: NameId, middle: NameId) -> (String, String) {
    let text = |id: NameId| {
        state
            .name(id)
            .map(|n| n.text.clone())
            .unwrap_or_else(|| format!("#{id}"))
    };
    (text(first), text(middle))
}
