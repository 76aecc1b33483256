use core::fmt;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// One of the two independent ranking partitions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[repr(u8)]
pub enum ScoringGroup {
    Primary = 0,
    Secondary = 1,
}

impl ScoringGroup {
    pub const ALL: [ScoringGroup; 2] = [ScoringGroup::Primary, ScoringGroup::Secondary];

    pub const fn index(self) -> usize {
        self as usize
    }

    /// One-based number shown to users.
    pub const fn number(self) -> u8 {
        self as u8 + 1
    }
}

impl FromStr for ScoringGroup {
    type Err = ParseGroupError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "1" | "primary" => Ok(ScoringGroup::Primary),
            "2" | "secondary" => Ok(ScoringGroup::Secondary),
            _ => Err(ParseGroupError(value.to_string())),
        }
    }
}

impl fmt::Display for ScoringGroup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.number())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown scoring group '{0}' (expected 1 or 2)")]
pub struct ParseGroupError(pub String);

/// Display identity of a scoring group.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GroupProfile {
    pub label: String,
    pub accent: String,
}

impl GroupProfile {
    pub fn defaults() -> [GroupProfile; 2] {
        [
            GroupProfile {
                label: "Husband".to_string(),
                accent: "#89cff0".to_string(),
            },
            GroupProfile {
                label: "Wife".to_string(),
                accent: "#ffb6c1".to_string(),
            },
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::ScoringGroup;

    #[test]
    fn indexes_follow_declaration_order() {
        for (i, group) in ScoringGroup::ALL.iter().enumerate() {
            assert_eq!(group.index(), i);
            assert_eq!(usize::from(group.number()), i + 1);
        }
    }

    #[test]
    fn parses_one_based_numbers() {
        assert_eq!("1".parse::<ScoringGroup>(), Ok(ScoringGroup::Primary));
        assert_eq!("2".parse::<ScoringGroup>(), Ok(ScoringGroup::Secondary));
        assert!("0".parse::<ScoringGroup>().is_err());
        assert_eq!(ScoringGroup::Secondary.to_string(), "2");
    }
}
