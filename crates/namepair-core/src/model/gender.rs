use core::fmt;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Gender {
    Masculine,
    Feminine,
    Neutral,
}

impl Gender {
    pub const fn as_str(self) -> &'static str {
        match self {
            Gender::Masculine => "M",
            Gender::Feminine => "F",
            Gender::Neutral => "N",
        }
    }
}

impl FromStr for Gender {
    type Err = ParseGenderError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "m" | "masculine" | "male" => Ok(Gender::Masculine),
            "f" | "feminine" | "female" => Ok(Gender::Feminine),
            "n" | "neutral" | "unisex" => Ok(Gender::Neutral),
            _ => Err(ParseGenderError(value.to_string())),
        }
    }
}

impl fmt::Display for Gender {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Restricts which names may appear on either side of a combination.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum GenderMode {
    MasculineOnly,
    FeminineOnly,
}

impl GenderMode {
    /// Neutral names are admitted by both modes.
    pub const fn admits(self, gender: Gender) -> bool {
        match self {
            GenderMode::MasculineOnly => matches!(gender, Gender::Masculine | Gender::Neutral),
            GenderMode::FeminineOnly => matches!(gender, Gender::Feminine | Gender::Neutral),
        }
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            GenderMode::MasculineOnly => "M",
            GenderMode::FeminineOnly => "F",
        }
    }
}

impl FromStr for GenderMode {
    type Err = ParseGenderError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.parse::<Gender>() {
            Ok(Gender::Masculine) => Ok(GenderMode::MasculineOnly),
            Ok(Gender::Feminine) => Ok(GenderMode::FeminineOnly),
            _ => Err(ParseGenderError(value.to_string())),
        }
    }
}

impl fmt::Display for GenderMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unrecognised gender '{0}' (expected M, F or N)")]
pub struct ParseGenderError(pub String);

#[cfg(test)]
mod tests {
    use super::{Gender, GenderMode};

    #[test]
    fn parses_short_and_long_forms() {
        assert_eq!("m".parse::<Gender>(), Ok(Gender::Masculine));
        assert_eq!(" Feminine ".parse::<Gender>(), Ok(Gender::Feminine));
        assert_eq!("N".parse::<Gender>(), Ok(Gender::Neutral));
        assert!("x".parse::<Gender>().is_err());
    }

    #[test]
    fn modes_admit_neutral_names() {
        assert!(GenderMode::MasculineOnly.admits(Gender::Neutral));
        assert!(GenderMode::FeminineOnly.admits(Gender::Neutral));
        assert!(!GenderMode::MasculineOnly.admits(Gender::Feminine));
        assert!(!GenderMode::FeminineOnly.admits(Gender::Masculine));
    }

    #[test]
    fn neutral_is_not_a_mode() {
        assert!("n".parse::<GenderMode>().is_err());
        assert_eq!("F".parse::<GenderMode>(), Ok(GenderMode::FeminineOnly));
    }
}
