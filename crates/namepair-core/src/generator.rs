use tracing::{Level, event};

use crate::model::{CombinationKey, NameId, ScoringGroup};
use crate::store::{StoreError, StoreState};

/// Materializes every ordered pair the newly introduced `new_name` takes part in.
///
/// For each scoring group and every other known name, both `(new, other)` and
/// `(other, new)` are created unless that exact triple already exists.
/// Returns how many combinations were inserted; calling it again for the same
/// name inserts nothing.
pub fn generate_for_new_name(tx: &mut StoreState, new_name: NameId) -> Result<usize, StoreError> {
    if tx.name(new_name).is_none() {
        return Err(StoreError::UnknownName { id: new_name });
    }

    let others: Vec<NameId> = tx
        .names()
        .iter()
        .map(|name| name.id)
        .filter(|id| *id != new_name)
        .collect();

    let mut created = 0usize;
    for group in ScoringGroup::ALL {
        for &other in &others {
            for (first, middle) in [(new_name, other), (other, new_name)] {
                let key = CombinationKey {
                    group,
                    first,
                    middle,
                };
                if tx.contains_combination(&key) {
                    continue;
                }
                tx.insert_combination(group, first, middle)?;
                created += 1;
            }
        }
    }

    event!(
        target: "namepair::generator",
        Level::DEBUG,
        name_id = new_name.0,
        partners = others.len(),
        created,
    );

    Ok(created)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Gender;
    use std::collections::HashSet;

    fn add(state: &mut StoreState, text: &str) -> NameId {
        state.insert_name(text, Gender::Neutral).unwrap()
    }

    #[test]
    fn first_name_has_nobody_to_pair_with() {
        let mut state = StoreState::seeded();
        let solo = add(&mut state, "Anna");
        assert_eq!(generate_for_new_name(&mut state, solo).unwrap(), 0);
        assert!(state.combinations().is_empty());
    }

    #[test]
    fn creates_two_orders_per_partner_per_group() {
        let mut state = StoreState::seeded();
        for text in ["Anna", "Rose", "Iris"] {
            let id = add(&mut state, text);
            generate_for_new_name(&mut state, id).unwrap();
        }
        let before = state.combinations().len();
        assert_eq!(before, 2 * 3 * 2);

        let newcomer = add(&mut state, "June");
        let created = generate_for_new_name(&mut state, newcomer).unwrap();
        assert_eq!(created, 2 * 2 * 3);
        assert_eq!(state.combinations().len(), before + created);

        let mut seen = HashSet::new();
        for combo in state.combinations() {
            assert_ne!(combo.first, combo.middle);
            assert!(seen.insert(combo.key()), "duplicate {:?}", combo.key());
        }
    }

    #[test]
    fn rerun_is_idempotent_and_skips_existing_rows() {
        let mut state = StoreState::seeded();
        let a = add(&mut state, "Anna");
        let b = add(&mut state, "Rose");
        state
            .insert_combination(ScoringGroup::Primary, b, a)
            .unwrap();

        assert_eq!(generate_for_new_name(&mut state, b).unwrap(), 3);
        assert_eq!(generate_for_new_name(&mut state, b).unwrap(), 0);
        assert_eq!(generate_for_new_name(&mut state, a).unwrap(), 0);
        assert_eq!(state.combinations().len(), 4);
    }

    #[test]
    fn unknown_name_is_rejected() {
        let mut state = StoreState::seeded();
        assert!(matches!(
            generate_for_new_name(&mut state, NameId(5)),
            Err(StoreError::UnknownName { .. })
        ));
    }
}
