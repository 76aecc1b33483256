use serde::{Deserialize, Serialize};

/// Signed streak of consecutive same-direction outcomes, capped at ±5.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
#[serde(try_from = "i8", into = "i8")]
pub struct Momentum(i8);

impl Momentum {
    pub const MAX: i8 = 5;
    pub const MIN: i8 = -5;
    pub const NEUTRAL: Momentum = Momentum(0);

    /// Builds a momentum value, clamping into the legal range.
    pub fn new(value: i8) -> Self {
        Momentum(value.clamp(Self::MIN, Self::MAX))
    }

    pub const fn value(self) -> i8 {
        self.0
    }

    /// A win extends a non-negative streak and breaks a cold one back to +1.
    pub fn after_win(self) -> Self {
        if self.0 >= 0 {
            Momentum::new(self.0.saturating_add(1))
        } else {
            Momentum(1)
        }
    }

    /// A loss deepens a non-positive streak and breaks a hot one back to -1.
    pub fn after_loss(self) -> Self {
        if self.0 <= 0 {
            Momentum::new(self.0.saturating_sub(1))
        } else {
            Momentum(-1)
        }
    }

    /// One step toward zero, never crossing it.
    pub fn relaxed(self) -> Self {
        Momentum(self.0 - self.0.signum())
    }
}

impl From<Momentum> for i8 {
    fn from(momentum: Momentum) -> Self {
        momentum.0
    }
}

impl TryFrom<i8> for Momentum {
    type Error = String;

    fn try_from(value: i8) -> Result<Self, Self::Error> {
        if (Self::MIN..=Self::MAX).contains(&value) {
            Ok(Momentum(value))
        } else {
            Err(format!(
                "momentum {value} outside [{}, {}]",
                Self::MIN,
                Self::MAX
            ))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::Momentum;

    #[test]
    fn wins_grow_until_cap() {
        let mut m = Momentum::NEUTRAL;
        for expected in [1, 2, 3, 4, 5, 5, 5] {
            m = m.after_win();
            assert_eq!(m.value(), expected);
        }
    }

    #[test]
    fn losses_deepen_until_floor() {
        let mut m = Momentum::NEUTRAL;
        for expected in [-1, -2, -3, -4, -5, -5] {
            m = m.after_loss();
            assert_eq!(m.value(), expected);
        }
    }

    #[test]
    fn opposite_outcome_resets_streak() {
        assert_eq!(Momentum::new(4).after_loss().value(), -1);
        assert_eq!(Momentum::new(-3).after_win().value(), 1);
        assert_eq!(Momentum::new(1).after_loss().value(), -1);
        assert_eq!(Momentum::new(-1).after_win().value(), 1);
    }

    #[test]
    fn relax_moves_toward_zero_without_crossing() {
        assert_eq!(Momentum::new(3).relaxed().value(), 2);
        assert_eq!(Momentum::new(-1).relaxed().value(), 0);
        assert_eq!(Momentum::NEUTRAL.relaxed().value(), 0);
    }

    #[test]
    fn new_clamps_out_of_range_values() {
        assert_eq!(Momentum::new(9).value(), 5);
        assert_eq!(Momentum::new(-100).value(), -5);
    }

    #[test]
    fn deserialize_rejects_out_of_range() {
        assert!(serde_json::from_str::<Momentum>("6").is_err());
        assert_eq!(serde_json::from_str::<Momentum>("-5").unwrap().value(), -5);
    }
}
