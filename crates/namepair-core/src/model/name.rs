use core::fmt;
use serde::{Deserialize, Serialize};

use crate::model::gender::Gender;
use crate::rating::reputation;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NameId(pub u32);

impl fmt::Display for NameId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A single word usable in either the first or the middle slot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AtomicName {
    pub id: NameId,
    pub text: String,
    pub gender: Gender,
    /// Slot-agnostic tally of combinations containing this name that won.
    pub wins: u32,
    pub losses: u32,
    pub skips: u32,
}

impl AtomicName {
    pub fn new(id: NameId, text: String, gender: Gender) -> Self {
        Self {
            id,
            text,
            gender,
            wins: 0,
            losses: 0,
            skips: 0,
        }
    }

    /// Selection weight from the live tally; 1.1 before any decision.
    pub fn reputation(&self) -> f64 {
        reputation(self.wins, self.losses)
    }
}

/// Trims and title-cases user input so "  aNNa-marie " and "Anna-Marie" collide.
///
/// Returns `None` when nothing but whitespace was supplied.
pub fn normalize_name_text(raw: &str) -> Option<String> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return None;
    }

    let mut out = String::with_capacity(trimmed.len());
    let mut at_word_start = true;
    for ch in trimmed.chars() {
        if ch.is_alphabetic() {
            if at_word_start {
                out.extend(ch.to_uppercase());
            } else {
                out.extend(ch.to_lowercase());
            }
            at_word_start = false;
        } else {
            out.push(ch);
            at_word_start = true;
        }
    }
    Some(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalizes_case_and_whitespace() {
        assert_eq!(normalize_name_text("  aNNa "), Some("Anna".to_string()));
        assert_eq!(
            normalize_name_text("mary-JANE"),
            Some("Mary-Jane".to_string())
        );
        assert_eq!(normalize_name_text("o'neil"), Some("O'Neil".to_string()));
    }

    #[test]
    fn rejects_blank_text() {
        assert_eq!(normalize_name_text("   "), None);
        assert_eq!(normalize_name_text(""), None);
    }

    #[test]
    fn fresh_name_sits_at_the_prior() {
        let name = AtomicName::new(NameId(1), "Rose".to_string(), Gender::Feminine);
        assert!((name.reputation() - 1.1).abs() < 1e-12);
    }
}
