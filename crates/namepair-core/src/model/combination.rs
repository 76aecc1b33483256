use core::fmt;
use serde::{Deserialize, Serialize};

use crate::model::group::ScoringGroup;
use crate::model::momentum::Momentum;
use crate::model::name::NameId;
use crate::rating::elo::INITIAL_RATING;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CombinationId(pub u32);

impl fmt::Display for CombinationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Ordered (first, middle) pair ranked within one scoring group.
///
/// `(A, B)` and `(B, A)` are distinct combinations; a name never pairs with itself.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Combination {
    pub id: CombinationId,
    pub group: ScoringGroup,
    pub first: NameId,
    pub middle: NameId,
    pub rating: f64,
    pub plays: u32,
    pub momentum: Momentum,
}

impl Combination {
    pub fn new(id: CombinationId, group: ScoringGroup, first: NameId, middle: NameId) -> Self {
        Self {
            id,
            group,
            first,
            middle,
            rating: INITIAL_RATING,
            plays: 0,
            momentum: Momentum::NEUTRAL,
        }
    }

    pub fn key(&self) -> CombinationKey {
        CombinationKey {
            group: self.group,
            first: self.first,
            middle: self.middle,
        }
    }

    pub fn contains(&self, name: NameId) -> bool {
        self.first == name || self.middle == name
    }

    pub fn names(&self) -> [NameId; 2] {
        [self.first, self.middle]
    }
}

/// Uniqueness key for a combination.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct CombinationKey {
    pub group: ScoringGroup,
    pub first: NameId,
    pub middle: NameId,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_combination_uses_defaults() {
        let combo = Combination::new(CombinationId(7), ScoringGroup::Primary, NameId(1), NameId(2));
        assert_eq!(combo.rating, 1000.0);
        assert_eq!(combo.plays, 0);
        assert_eq!(combo.momentum, Momentum::NEUTRAL);
    }

    #[test]
    fn key_is_order_sensitive() {
        let ab = Combination::new(CombinationId(1), ScoringGroup::Primary, NameId(1), NameId(2));
        let ba = Combination::new(CombinationId(2), ScoringGroup::Primary, NameId(2), NameId(1));
        assert_ne!(ab.key(), ba.key());
        assert!(ab.contains(NameId(2)));
        assert!(!ab.contains(NameId(3)));
    }
}
