use serde::{Deserialize, Serialize};

use crate::model::combination::CombinationId;
use crate::model::group::ScoringGroup;

/// Append-only log entry for a presented pair.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DecisionRecord {
    pub sequence: u64,
    pub group: ScoringGroup,
    pub outcome: Outcome,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Outcome {
    Decision {
        winner: CombinationId,
        loser: CombinationId,
    },
    Skip {
        a: CombinationId,
        b: CombinationId,
    },
}

impl Outcome {
    pub const fn is_skip(&self) -> bool {
        matches!(self, Outcome::Skip { .. })
    }

    pub const fn combinations(&self) -> [CombinationId; 2] {
        match *self {
            Outcome::Decision { winner, loser } => [winner, loser],
            Outcome::Skip { a, b } => [a, b],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn outcome_serializes_with_kind_tag() {
        let skip = Outcome::Skip {
            a: CombinationId(1),
            b: CombinationId(2),
        };
        let json = serde_json::to_string(&skip).unwrap();
        assert_eq!(json, r#"{"kind":"skip","a":1,"b":2}"#);
        assert!(skip.is_skip());
    }

    #[test]
    fn decision_lists_winner_first() {
        let decision = Outcome::Decision {
            winner: CombinationId(9),
            loser: CombinationId(4),
        };
        assert_eq!(decision.combinations(), [CombinationId(9), CombinationId(4)]);
        assert!(!decision.is_skip());
    }
}
