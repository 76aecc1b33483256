use std::collections::{BTreeMap, HashMap};

use serde::{Deserialize, Serialize};

use super::StoreError;
use crate::model::{
    AtomicName, Combination, CombinationId, CombinationKey, DecisionRecord, Gender, GroupProfile,
    NameId, Outcome, ScoringGroup,
};
use crate::settings::{self, Settings};

const SNAPSHOT_VERSION: u32 = 1;

/// Everything the ranker persists. Mutated only inside [`super::Store::transaction`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoreState {
    version: u32,
    groups: [GroupProfile; 2],
    names: Vec<AtomicName>,
    combinations: Vec<Combination>,
    decisions: Vec<DecisionRecord>,
    settings: BTreeMap<String, String>,
    next_name_id: u32,
    next_combination_id: u32,
    next_sequence: u64,
    #[serde(skip)]
    index: Indexes,
}

#[derive(Debug, Clone, Default)]
struct Indexes {
    name_slots: HashMap<NameId, usize>,
    name_texts: HashMap<String, NameId>,
    combination_slots: HashMap<CombinationId, usize>,
    combination_keys: HashMap<CombinationKey, CombinationId>,
}

impl Default for StoreState {
    fn default() -> Self {
        Self::seeded()
    }
}

impl StoreState {
    /// Fresh state with both scoring groups and default settings.
    pub fn seeded() -> Self {
        Self {
            version: SNAPSHOT_VERSION,
            groups: GroupProfile::defaults(),
            names: Vec::new(),
            combinations: Vec::new(),
            decisions: Vec::new(),
            settings: Settings::default_entries(),
            next_name_id: 1,
            next_combination_id: 1,
            next_sequence: 1,
            index: Indexes::default(),
        }
    }

    /// Rebuilds lookup indexes after deserialization and checks the uniqueness invariants.
    pub(crate) fn reindex(&mut self) -> Result<(), StoreError> {
        if self.version != SNAPSHOT_VERSION {
            return Err(StoreError::Corrupt(format!(
                "unsupported snapshot version {}",
                self.version
            )));
        }

        let mut index = Indexes::default();
        for (slot, name) in self.names.iter().enumerate() {
            if index.name_slots.insert(name.id, slot).is_some() {
                return Err(StoreError::Corrupt(format!("duplicate name id {}", name.id)));
            }
            if index.name_texts.insert(text_key(&name.text), name.id).is_some() {
                return Err(StoreError::DuplicateName {
                    text: name.text.clone(),
                });
            }
        }

        for (slot, combo) in self.combinations.iter().enumerate() {
            if combo.first == combo.middle {
                return Err(StoreError::SelfPairing { name: combo.first });
            }
            for name in combo.names() {
                if !index.name_slots.contains_key(&name) {
                    return Err(StoreError::UnknownName { id: name });
                }
            }
            if index.combination_slots.insert(combo.id, slot).is_some() {
                return Err(StoreError::Corrupt(format!(
                    "duplicate combination id {}",
                    combo.id
                )));
            }
            if index.combination_keys.insert(combo.key(), combo.id).is_some() {
                return Err(StoreError::DuplicateCombination {
                    group: combo.group,
                    first: combo.first,
                    middle: combo.middle,
                });
            }
        }

        let max_name = self.names.iter().map(|n| n.id.0).max().unwrap_or(0);
        let max_combo = self.combinations.iter().map(|c| c.id.0).max().unwrap_or(0);
        let max_sequence = self.decisions.iter().map(|d| d.sequence).max().unwrap_or(0);
        self.next_name_id = self.next_name_id.max(max_name + 1);
        self.next_combination_id = self.next_combination_id.max(max_combo + 1);
        self.next_sequence = self.next_sequence.max(max_sequence + 1);

        self.index = index;
        Ok(())
    }

    pub fn group(&self, group: ScoringGroup) -> &GroupProfile {
        &self.groups[group.index()]
    }

    pub fn rename_group(&mut self, group: ScoringGroup, label: &str) -> Result<(), StoreError> {
        let label = label.trim();
        if label.is_empty() {
            return Err(StoreError::InvalidSetting {
                key: format!("group.{group}.label"),
                value: label.to_string(),
                message: "label must not be empty".to_string(),
            });
        }
        self.groups[group.index()].label = label.to_string();
        Ok(())
    }

    pub fn names(&self) -> &[AtomicName] {
        &self.names
    }

    pub fn name(&self, id: NameId) -> Option<&AtomicName> {
        self.index.name_slots.get(&id).map(|&slot| &self.names[slot])
    }

    pub fn name_mut(&mut self, id: NameId) -> Option<&mut AtomicName> {
        let slot = *self.index.name_slots.get(&id)?;
        self.names.get_mut(slot)
    }

    /// Case-insensitive lookup by text.
    pub fn find_name(&self, text: &str) -> Option<&AtomicName> {
        self.index
            .name_texts
            .get(&text_key(text))
            .and_then(|id| self.name(*id))
    }

    pub fn insert_name(&mut self, text: &str, gender: Gender) -> Result<NameId, StoreError> {
        let text = text.trim();
        if text.is_empty() {
            return Err(StoreError::EmptyName);
        }
        let key = text_key(text);
        if self.index.name_texts.contains_key(&key) {
            return Err(StoreError::DuplicateName {
                text: text.to_string(),
            });
        }

        let id = NameId(self.next_name_id);
        self.next_name_id += 1;
        self.index.name_slots.insert(id, self.names.len());
        self.index.name_texts.insert(key, id);
        self.names.push(AtomicName::new(id, text.to_string(), gender));
        Ok(id)
    }

    pub fn combinations(&self) -> &[Combination] {
        &self.combinations
    }

    pub fn combination(&self, id: CombinationId) -> Option<&Combination> {
        self.index
            .combination_slots
            .get(&id)
            .map(|&slot| &self.combinations[slot])
    }

    pub fn combination_mut(&mut self, id: CombinationId) -> Option<&mut Combination> {
        let slot = *self.index.combination_slots.get(&id)?;
        self.combinations.get_mut(slot)
    }

    /// Mutable access to two distinct combinations at once.
    pub fn combination_pair_mut(
        &mut self,
        a: CombinationId,
        b: CombinationId,
    ) -> Option<(&mut Combination, &mut Combination)> {
        let slot_a = *self.index.combination_slots.get(&a)?;
        let slot_b = *self.index.combination_slots.get(&b)?;
        if slot_a == slot_b {
            return None;
        }
        if slot_a < slot_b {
            let (left, right) = self.combinations.split_at_mut(slot_b);
            Some((&mut left[slot_a], &mut right[0]))
        } else {
            let (left, right) = self.combinations.split_at_mut(slot_a);
            Some((&mut right[0], &mut left[slot_b]))
        }
    }

    pub fn contains_combination(&self, key: &CombinationKey) -> bool {
        self.index.combination_keys.contains_key(key)
    }

    pub fn insert_combination(
        &mut self,
        group: ScoringGroup,
        first: NameId,
        middle: NameId,
    ) -> Result<CombinationId, StoreError> {
        if first == middle {
            return Err(StoreError::SelfPairing { name: first });
        }
        for name in [first, middle] {
            if !self.index.name_slots.contains_key(&name) {
                return Err(StoreError::UnknownName { id: name });
            }
        }
        let key = CombinationKey {
            group,
            first,
            middle,
        };
        if self.index.combination_keys.contains_key(&key) {
            return Err(StoreError::DuplicateCombination {
                group,
                first,
                middle,
            });
        }

        let id = CombinationId(self.next_combination_id);
        self.next_combination_id += 1;
        self.index
            .combination_slots
            .insert(id, self.combinations.len());
        self.index.combination_keys.insert(key, id);
        self.combinations
            .push(Combination::new(id, group, first, middle));
        Ok(id)
    }

    pub fn decisions(&self) -> &[DecisionRecord] {
        &self.decisions
    }

    pub fn append_decision(&mut self, group: ScoringGroup, outcome: Outcome) -> u64 {
        let sequence = self.next_sequence;
        self.next_sequence += 1;
        self.decisions.push(DecisionRecord {
            sequence,
            group,
            outcome,
        });
        sequence
    }

    pub fn settings(&self) -> Settings {
        Settings::from_map(&self.settings)
    }

    pub fn settings_map(&self) -> &BTreeMap<String, String> {
        &self.settings
    }

    pub fn setting(&self, key: &str) -> Option<&str> {
        self.settings.get(key).map(String::as_str)
    }

    pub fn set_setting(&mut self, key: &str, value: &str) -> Result<String, StoreError> {
        let key = key.trim();
        if key.is_empty() {
            return Err(StoreError::InvalidSetting {
                key: key.to_string(),
                value: value.to_string(),
                message: "key must not be empty".to_string(),
            });
        }
        let normalized = settings::validate_setting(key, value)?;
        self.settings.insert(key.to_string(), normalized.clone());
        Ok(normalized)
    }
}

fn text_key(text: &str) -> String {
    text.trim().to_lowercase()
}
