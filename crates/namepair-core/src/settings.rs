//! Typed view over the tunable key→string settings held in the store.

use std::collections::BTreeMap;
use std::str::FromStr;

use tracing::{Level, event};

use crate::store::StoreError;

pub const MATCH_RANDOM_PCT: &str = "match_random_pct";
pub const K_FACTOR_DEFAULT: &str = "k_factor_default";
pub const K_FACTOR_STABLE: &str = "k_factor_stable";
pub const K_STABLE_THRESHOLD: &str = "k_stable_threshold";
pub const SURNAME: &str = "surname";

const DEFAULT_RANDOM_PCT: u8 = 25;
const DEFAULT_K_FACTOR: f64 = 64.0;
const DEFAULT_K_FACTOR_STABLE: f64 = 32.0;
const DEFAULT_STABLE_THRESHOLD: u32 = 30;
const DEFAULT_SURNAME: &str = "Smith";

/// Snapshot of the tunables, read once at the start of each operation.
#[derive(Debug, Clone, PartialEq)]
pub struct Settings {
    /// Dark-horse probability in percent.
    pub random_match_pct: u8,
    pub k_factor_default: f64,
    pub k_factor_stable: f64,
    /// Play count at which a combination switches to the stable K-factor.
    pub stable_threshold: u32,
    /// Display-only suffix.
    pub surname: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            random_match_pct: DEFAULT_RANDOM_PCT,
            k_factor_default: DEFAULT_K_FACTOR,
            k_factor_stable: DEFAULT_K_FACTOR_STABLE,
            stable_threshold: DEFAULT_STABLE_THRESHOLD,
            surname: DEFAULT_SURNAME.to_string(),
        }
    }
}

impl Settings {
    /// Reads known keys, falling back to defaults for absent or malformed values.
    pub fn from_map(map: &BTreeMap<String, String>) -> Self {
        let defaults = Settings::default();
        Self {
            random_match_pct: read_or(map, MATCH_RANDOM_PCT, defaults.random_match_pct, |v| {
                *v <= 100
            }),
            k_factor_default: read_or(map, K_FACTOR_DEFAULT, defaults.k_factor_default, |v| {
                v.is_finite() && *v > 0.0
            }),
            k_factor_stable: read_or(map, K_FACTOR_STABLE, defaults.k_factor_stable, |v| {
                v.is_finite() && *v > 0.0
            }),
            stable_threshold: read_or(map, K_STABLE_THRESHOLD, defaults.stable_threshold, |_| {
                true
            }),
            surname: map
                .get(SURNAME)
                .map(|s| s.trim())
                .filter(|s| !s.is_empty())
                .map(str::to_string)
                .unwrap_or(defaults.surname),
        }
    }

    /// Entries written into a freshly created store.
    pub fn default_entries() -> BTreeMap<String, String> {
        let defaults = Settings::default();
        BTreeMap::from([
            (SURNAME.to_string(), defaults.surname),
            (
                MATCH_RANDOM_PCT.to_string(),
                defaults.random_match_pct.to_string(),
            ),
            (
                K_FACTOR_DEFAULT.to_string(),
                format_number(defaults.k_factor_default),
            ),
            (
                K_FACTOR_STABLE.to_string(),
                format_number(defaults.k_factor_stable),
            ),
            (
                K_STABLE_THRESHOLD.to_string(),
                defaults.stable_threshold.to_string(),
            ),
        ])
    }

    pub fn random_match_probability(&self) -> f64 {
        f64::from(self.random_match_pct.min(100)) / 100.0
    }

    /// Larger step while a combination is fresh, smaller once it has settled.
    pub fn k_factor(&self, plays: u32) -> f64 {
        if plays >= self.stable_threshold {
            self.k_factor_stable
        } else {
            self.k_factor_default
        }
    }
}

/// Checks a value headed for the store; returns the normalized string to persist.
///
/// Unknown keys are accepted verbatim.
pub fn validate_setting(key: &str, value: &str) -> Result<String, StoreError> {
    let trimmed = value.trim();
    let invalid = |message: &str| StoreError::InvalidSetting {
        key: key.to_string(),
        value: value.to_string(),
        message: message.to_string(),
    };

    match key {
        MATCH_RANDOM_PCT => {
            let pct: u8 = trimmed
                .parse()
                .map_err(|_| invalid("expected a whole percentage"))?;
            if pct > 100 {
                return Err(invalid("percentage must be between 0 and 100"));
            }
            Ok(pct.to_string())
        }
        K_FACTOR_DEFAULT | K_FACTOR_STABLE => {
            let k: f64 = trimmed.parse().map_err(|_| invalid("expected a number"))?;
            if !k.is_finite() || k <= 0.0 {
                return Err(invalid("K-factor must be greater than zero"));
            }
            Ok(format_number(k))
        }
        K_STABLE_THRESHOLD => {
            let threshold: u32 = trimmed
                .parse()
                .map_err(|_| invalid("expected a non-negative whole number"))?;
            Ok(threshold.to_string())
        }
        SURNAME => {
            if trimmed.is_empty() {
                return Err(invalid("surname must not be empty"));
            }
            Ok(trimmed.to_string())
        }
        _ => Ok(value.to_string()),
    }
}

fn read_or<T>(map: &BTreeMap<String, String>, key: &str, default: T, valid: impl Fn(&T) -> bool) -> T
where
    T: FromStr + Copy + std::fmt::Debug,
{
    let Some(raw) = map.get(key) else {
        return default;
    };

    match raw.trim().parse::<T>() {
        Ok(value) if valid(&value) => value,
        _ => {
            event!(
                target: "namepair::settings",
                Level::WARN,
                key,
                value = %raw,
                fallback = ?default,
                "ignoring malformed setting"
            );
            default
        }
    }
}

fn format_number(value: f64) -> String {
    if value.fract() == 0.0 {
        format!("{value:.0}")
    } else {
        value.to_string()
    }
}
