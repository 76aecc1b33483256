//! Views the binary prints, either as JSON or as plain text lines.

use std::fmt::Write as _;

use serde::Serialize;

use namepair_core::leaderboard::{CombinationStanding, CombinedStanding, NameStanding, display_name};
use namepair_core::matchmaker::PairSelection;
use namepair_core::model::{CombinationId, DecisionRecord, Outcome, ScoringGroup};
use namepair_core::store::StoreState;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CombinationView {
    pub id: CombinationId,
    pub display: String,
    pub rating: f64,
    pub plays: u32,
    pub momentum: i8,
}

impl CombinationView {
    pub fn from_state(state: &StoreState, id: CombinationId) -> Option<Self> {
        let combo = state.combination(id)?;
        let first = state.name(combo.first)?;
        let middle = state.name(combo.middle)?;
        Some(Self {
            id,
            display: display_name(&first.text, &middle.text, &state.settings().surname),
            rating: combo.rating,
            plays: combo.plays,
            momentum: combo.momentum.value(),
        })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PairView {
    pub group: u8,
    pub label: String,
    pub path: &'static str,
    pub a: CombinationView,
    pub b: CombinationView,
}

impl PairView {
    pub fn new(state: &StoreState, group: ScoringGroup, pair: &PairSelection) -> Option<Self> {
        Some(Self {
            group: group.number(),
            label: state.group(group).label.clone(),
            path: pair.path.as_str(),
            a: CombinationView::from_state(state, pair.a)?,
            b: CombinationView::from_state(state, pair.b)?,
        })
    }

    pub fn to_text(&self) -> String {
        format!(
            "[{}] {}\n  A #{}: {} ({:.1})\n  B #{}: {} ({:.1})",
            self.group,
            self.label,
            self.a.id,
            self.a.display,
            self.a.rating,
            self.b.id,
            self.b.display,
            self.b.rating
        )
    }
}

pub fn combination_table(rows: &[CombinationStanding]) -> String {
    let mut out = String::new();
    for row in rows {
        let _ = writeln!(
            out,
            "{:>3}. {:<32} {:>7.1}  plays {:>3}  momentum {:+}  (#{})",
            row.rank, row.display, row.rating, row.plays, row.momentum, row.id
        );
    }
    out
}

pub fn combined_table(rows: &[CombinedStanding]) -> String {
    let mut out = String::new();
    for row in rows {
        let _ = writeln!(
            out,
            "{:>3}. {:<32} {:>7.1}  groups {}  plays {:>3}",
            row.rank, row.display, row.average_rating, row.groups, row.total_plays
        );
    }
    out
}

pub fn name_table(rows: &[NameStanding]) -> String {
    let mut out = String::new();
    for row in rows {
        let _ = writeln!(
            out,
            "{:>3}. {:<16} {}  reputation {:.2}  W{} L{} S{}",
            row.rank,
            row.text,
            row.gender.as_str(),
            row.reputation,
            row.wins,
            row.losses,
            row.skips
        );
    }
    out
}

pub fn history_line(record: &DecisionRecord) -> String {
    match record.outcome {
        Outcome::Decision { winner, loser } => format!(
            "#{} group {}: #{} beat #{}",
            record.sequence, record.group, winner, loser
        ),
        Outcome::Skip { a, b } => format!(
            "#{} group {}: skipped #{} and #{}",
            record.sequence, record.group, a, b
        ),
    }
}
