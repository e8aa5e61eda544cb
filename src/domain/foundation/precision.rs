//! Decimal precision value object used to round aggregated preferences.

use serde::{Deserialize, Serialize};
use std::fmt;

use super::ValidationError;

/// Number of decimal places kept when rounding preference degrees.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DecimalPlace(u8);

impl DecimalPlace {
    /// Largest supported precision; beyond this `f64` carries no more digits.
    pub const MAX: u8 = 15;

    /// Default precision.
    pub const DEFAULT: Self = Self(3);

    /// Creates a precision, clamping to the supported range.
    pub fn new(places: u8) -> Self {
        Self(places.min(Self::MAX))
    }

    /// Creates a precision, returning error if negative or too large.
    pub fn try_new(places: i32) -> Result<Self, ValidationError> {
        if !(0..=Self::MAX as i32).contains(&places) {
            return Err(ValidationError::out_of_range(
                "decimal_place",
                0.0,
                f64::from(Self::MAX),
                f64::from(places),
            ));
        }
        Ok(Self(places as u8))
    }

    /// Returns the number of places.
    pub fn value(&self) -> u8 {
        self.0
    }

    /// Rounds `value` to this precision, ties to even.
    pub fn round(&self, value: f64) -> f64 {
        if !value.is_finite() {
            return value;
        }
        let factor = 10f64.powi(i32::from(self.0));
        let rounded = half_to_even(value * factor) / factor;
        // Normalise -0.0 so repeated runs compare bit-identical.
        if rounded == 0.0 {
            0.0
        } else {
            rounded
        }
    }
}

fn half_to_even(x: f64) -> f64 {
    let floor = x.floor();
    let diff = x - floor;
    if diff > 0.5 {
        floor + 1.0
    } else if diff < 0.5 {
        floor
    } else if floor % 2.0 == 0.0 {
        floor
    } else {
        floor + 1.0
    }
}

impl Default for DecimalPlace {
    fn default() -> Self {
        Self::DEFAULT
    }
}

impl fmt::Display for DecimalPlace {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} dp", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn try_new_rejects_negative() {
        assert!(matches!(
            DecimalPlace::try_new(-1),
            Err(ValidationError::OutOfRange { .. })
        ));
    }

    #[test]
    fn try_new_rejects_too_large() {
        assert!(DecimalPlace::try_new(16).is_err());
        assert!(DecimalPlace::try_new(15).is_ok());
    }

    #[test]
    fn new_clamps_to_max() {
        assert_eq!(DecimalPlace::new(40).value(), DecimalPlace::MAX);
    }

    #[test]
    fn round_keeps_requested_places() {
        let dp = DecimalPlace::new(2);
        assert_eq!(dp.round(0.123_456), 0.12);
        assert_eq!(dp.round(0.5), 0.5);
        assert_eq!(dp.round(1.0 / 3.0), 0.33);
    }

    #[test]
    fn round_ties_go_to_even() {
        let dp = DecimalPlace::new(0);
        assert_eq!(dp.round(0.5), 0.0);
        assert_eq!(dp.round(1.5), 2.0);
        assert_eq!(dp.round(2.5), 2.0);
        assert_eq!(dp.round(3.5), 4.0);
        assert_eq!(dp.round(-2.5), -2.0);
        assert_eq!(dp.round(-3.5), -4.0);
        assert_eq!(DecimalPlace::new(1).round(0.25), 0.2);
    }

    #[test]
    fn round_normalises_negative_zero() {
        let dp = DecimalPlace::new(2);
        let rounded = dp.round(-0.001);
        assert_eq!(rounded.to_bits(), 0.0f64.to_bits());
    }

    #[test]
    fn default_is_three_places() {
        assert_eq!(DecimalPlace::default().value(), 3);
    }

    #[test]
    fn serializes_transparently() {
        let json = serde_json::to_string(&DecimalPlace::new(4)).unwrap();
        assert_eq!(json, "4");
    }
}
