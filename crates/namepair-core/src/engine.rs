//! The [`Ranker`] binds one [`Store`] to one random source and exposes the
//! operations a front end drives: add names, ask for a pair, report the
//! outcome, read standings.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::Serialize;
use thiserror::Error;
use tracing::{Level, event};

use crate::generator::generate_for_new_name;
use crate::leaderboard::{self, CombinationStanding, CombinedStanding, NameStanding};
use crate::matchmaker::{self, PairSelection};
use crate::model::{
    CombinationId, DecisionRecord, Gender, GenderMode, NameId, Outcome, ScoringGroup,
    normalize_name_text,
};
use crate::rating::{RatingUpdate, apply_result, apply_skip};
use crate::settings::Settings;
use crate::store::{Store, StoreError, StoreState};

#[derive(Debug, Error)]
pub enum EngineError {
    #[error("combination {id} does not exist")]
    CombinationNotFound { id: CombinationId },
    #[error("combination {id} does not belong to group {group}")]
    GroupMismatch {
        id: CombinationId,
        group: ScoringGroup,
    },
    #[error("combination {id} cannot be compared with itself")]
    SameCombination { id: CombinationId },
    #[error("name {id} does not exist")]
    NameNotFound { id: NameId },
    #[error(transparent)]
    Storage(#[from] StoreError),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AddedName {
    pub id: NameId,
    pub text: String,
    /// Combinations generated for the new name across both groups.
    pub created: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct DecisionSummary {
    pub sequence: u64,
    pub update: RatingUpdate,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct SessionStats {
    pub decisions: usize,
    pub skips: usize,
}

pub struct Ranker<R = StdRng> {
    store: Store,
    rng: R,
}

impl Ranker<StdRng> {
    /// Ranker with an entropy-seeded generator.
    pub fn new(store: Store) -> Self {
        Self::with_seed(store, rand::random())
    }

    pub fn with_seed(store: Store, seed: u64) -> Self {
        Self::with_rng(store, StdRng::seed_from_u64(seed))
    }
}

impl<R: Rng> Ranker<R> {
    pub fn with_rng(store: Store, rng: R) -> Self {
        Self { store, rng }
    }

    pub fn state(&self) -> &StoreState {
        self.store.state()
    }

    pub fn settings(&self) -> Settings {
        self.store.state().settings()
    }

    /// Registers a name and generates every combination it takes part in.
    pub fn add_name(&mut self, text: &str, gender: Gender) -> Result<AddedName, EngineError> {
        let text = normalize_name_text(text).ok_or(StoreError::EmptyName)?;
        let added = self.store.transaction(|tx| {
            let id = tx.insert_name(&text, gender)?;
            let created = generate_for_new_name(tx, id)?;
            Ok::<_, EngineError>(AddedName {
                id,
                text: text.clone(),
                created,
            })
        })?;

        event!(
            target: "namepair::names",
            Level::INFO,
            name_id = added.id.0,
            text = %added.text,
            gender = gender.as_str(),
            created = added.created,
            "name added"
        );
        Ok(added)
    }

    /// Ensures all combinations for an existing name exist; returns how many were created.
    pub fn generate_combinations(&mut self, name: NameId) -> Result<usize, EngineError> {
        let created = self.store.transaction(|tx| {
            if tx.name(name).is_none() {
                return Err(EngineError::NameNotFound { id: name });
            }
            Ok(generate_for_new_name(tx, name)?)
        })?;
        event!(
            target: "namepair::generator",
            Level::INFO,
            name_id = name.0,
            created,
            "combinations generated"
        );
        Ok(created)
    }

    /// Next pair to compare, or `None` while fewer than two combinations are eligible.
    pub fn pick_pair(&mut self, group: ScoringGroup, mode: GenderMode) -> Option<PairSelection> {
        let state = self.store.state();
        let settings = state.settings();
        matchmaker::pick_pair(state, group, mode, &settings, &mut self.rng)
    }

    /// Applies a decided comparison: ratings, play counts, momentum, name
    /// tallies and the decision log, all in one transaction.
    pub fn apply_decision(
        &mut self,
        group: ScoringGroup,
        winner: CombinationId,
        loser: CombinationId,
    ) -> Result<DecisionSummary, EngineError> {
        if winner == loser {
            return Err(EngineError::SameCombination { id: winner });
        }

        let summary = self.store.transaction(|tx| {
            let settings = tx.settings();
            check_member(tx, group, winner)?;
            check_member(tx, group, loser)?;

            let (winning, losing) = tx
                .combination_pair_mut(winner, loser)
                .ok_or(EngineError::CombinationNotFound { id: winner })?;
            let update = apply_result(winning, losing, &settings);
            let winner_names = winning.names();
            let loser_names = losing.names();

            // Slot-agnostic; a name in both combinations gets both increments.
            for id in winner_names {
                let name = tx.name_mut(id).ok_or(EngineError::NameNotFound { id })?;
                name.wins = name.wins.saturating_add(1);
            }
            for id in loser_names {
                let name = tx.name_mut(id).ok_or(EngineError::NameNotFound { id })?;
                name.losses = name.losses.saturating_add(1);
            }

            let sequence = tx.append_decision(group, Outcome::Decision { winner, loser });
            Ok::<_, EngineError>(DecisionSummary { sequence, update })
        })?;

        event!(
            target: "namepair::rating",
            Level::INFO,
            group = group.number(),
            winner = winner.0,
            loser = loser.0,
            winner_before = summary.update.winner_before,
            winner_after = summary.update.winner_after,
            loser_before = summary.update.loser_before,
            loser_after = summary.update.loser_after,
            winner_momentum = summary.update.winner_momentum.value(),
            loser_momentum = summary.update.loser_momentum.value(),
            sequence = summary.sequence,
            "decision applied"
        );
        Ok(summary)
    }

    /// Records that neither combination was chosen. Ratings and reputation are untouched.
    pub fn record_skip(
        &mut self,
        group: ScoringGroup,
        a: CombinationId,
        b: CombinationId,
    ) -> Result<u64, EngineError> {
        if a == b {
            return Err(EngineError::SameCombination { id: a });
        }

        let sequence = self.store.transaction(|tx| {
            check_member(tx, group, a)?;
            check_member(tx, group, b)?;

            let (first, second) = tx
                .combination_pair_mut(a, b)
                .ok_or(EngineError::CombinationNotFound { id: a })?;
            apply_skip(first);
            apply_skip(second);

            let mut skipped: Vec<NameId> = first.names().into_iter().chain(second.names()).collect();
            skipped.sort();
            skipped.dedup();
            for id in skipped {
                let name = tx.name_mut(id).ok_or(EngineError::NameNotFound { id })?;
                name.skips = name.skips.saturating_add(1);
            }

            Ok::<_, EngineError>(tx.append_decision(group, Outcome::Skip { a, b }))
        })?;

        event!(
            target: "namepair::rating",
            Level::INFO,
            group = group.number(),
            a = a.0,
            b = b.0,
            sequence,
            "pair skipped"
        );
        Ok(sequence)
    }

    /// Stores a validated setting and returns the normalized value.
    pub fn set_setting(&mut self, key: &str, value: &str) -> Result<String, EngineError> {
        let stored = self
            .store
            .transaction(|tx| tx.set_setting(key, value))?;
        event!(
            target: "namepair::settings",
            Level::INFO,
            key,
            value = %stored,
            "setting updated"
        );
        Ok(stored)
    }

    pub fn rename_group(&mut self, group: ScoringGroup, label: &str) -> Result<(), EngineError> {
        Ok(self.store.transaction(|tx| tx.rename_group(group, label))?)
    }

    pub fn top_combinations(
        &self,
        group: ScoringGroup,
        filter: Option<GenderMode>,
        limit: usize,
    ) -> Vec<CombinationStanding> {
        leaderboard::top_combinations(self.state(), group, filter, limit)
    }

    pub fn top_combinations_combined(
        &self,
        filter: Option<GenderMode>,
        limit: usize,
    ) -> Vec<CombinedStanding> {
        leaderboard::top_combinations_combined(self.state(), filter, limit)
    }

    pub fn top_names(&self, gender: Option<Gender>, limit: usize) -> Vec<NameStanding> {
        leaderboard::top_names(self.state(), gender, limit)
    }

    /// Decision log in append order, optionally restricted to one group.
    pub fn decisions(&self, group: Option<ScoringGroup>) -> Vec<&DecisionRecord> {
        self.state()
            .decisions()
            .iter()
            .filter(|d| group.is_none_or(|g| d.group == g))
            .collect()
    }

    pub fn session_stats(&self, group: ScoringGroup) -> SessionStats {
        self.decisions(Some(group))
            .into_iter()
            .fold(SessionStats::default(), |mut stats, record| {
                if record.outcome.is_skip() {
                    stats.skips += 1;
                } else {
                    stats.decisions += 1;
                }
                stats
            })
    }
}

fn check_member(state: &StoreState, group: ScoringGroup, id: CombinationId) -> Result<(), EngineError> {
    match state.combination(id) {
        None => Err(EngineError::CombinationNotFound { id }),
        Some(combo) if combo.group != group => Err(EngineError::GroupMismatch { id, group }),
        Some(_) => Ok(()),
    }
}
