//! Generalized Criterion Library - the six PROMETHEE transfer functions.
//!
//! Each function maps a signed deviation `d` to a partial preference degree
//! in `[0, 1]`. Boundaries are inclusive on the lower side (`d ≤ q` gives 0),
//! and every function is non-decreasing in `d`.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::domain::foundation::ValidationError;

/// Selector for one of the six generalized criteria.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FunctionKind {
    Usual,
    UShape,
    VShape,
    Level,
    VShapeIndifference,
    Gaussian,
}

impl FunctionKind {
    /// All selectors, in their conventional numbering order (1..=6).
    pub const ALL: [FunctionKind; 6] = [
        FunctionKind::Usual,
        FunctionKind::UShape,
        FunctionKind::VShape,
        FunctionKind::Level,
        FunctionKind::VShapeIndifference,
        FunctionKind::Gaussian,
    ];

    /// Returns the display label for this selector.
    pub fn label(&self) -> &'static str {
        match self {
            FunctionKind::Usual => "usual",
            FunctionKind::UShape => "u-shape",
            FunctionKind::VShape => "v-shape",
            FunctionKind::Level => "level",
            FunctionKind::VShapeIndifference => "v-shape-indifference",
            FunctionKind::Gaussian => "gaussian",
        }
    }

    /// Conventional type number (Usual = 1 … Gaussian = 6).
    pub fn number(&self) -> u8 {
        match self {
            FunctionKind::Usual => 1,
            FunctionKind::UShape => 2,
            FunctionKind::VShape => 3,
            FunctionKind::Level => 4,
            FunctionKind::VShapeIndifference => 5,
            FunctionKind::Gaussian => 6,
        }
    }

    /// Selector from its conventional type number.
    pub fn from_number(number: u8) -> Result<Self, ValidationError> {
        Self::ALL
            .iter()
            .copied()
            .find(|kind| kind.number() == number)
            .ok_or_else(|| ValidationError::unknown_preference_function(number.to_string()))
    }
}

impl fmt::Display for FunctionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

impl FromStr for FunctionKind {
    type Err = ValidationError;

    /// Accepts the label, the snake_case name, or the type number.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_ascii_lowercase().replace('_', "-");
        if let Ok(number) = normalized.parse::<u8>() {
            return Self::from_number(number);
        }
        Self::ALL
            .iter()
            .copied()
            .find(|kind| kind.label() == normalized)
            .ok_or_else(|| ValidationError::unknown_preference_function(s))
    }
}

/// Raw thresholds as handed over by a caller; which ones are required
/// depends on the function kind.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Thresholds {
    /// Indifference threshold.
    pub q: Option<f64>,
    /// Preference threshold.
    pub p: Option<f64>,
    /// Gaussian inflection point.
    pub s: Option<f64>,
}

impl Thresholds {
    pub fn none() -> Self {
        Self::default()
    }

    pub fn indifference(q: f64) -> Self {
        Self { q: Some(q), ..Self::default() }
    }

    pub fn preference(p: f64) -> Self {
        Self { p: Some(p), ..Self::default() }
    }

    pub fn indifference_preference(q: f64, p: f64) -> Self {
        Self { q: Some(q), p: Some(p), s: None }
    }

    pub fn gaussian(s: f64) -> Self {
        Self { s: Some(s), ..Self::default() }
    }
}

/// A generalized criterion with validated thresholds.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum PreferenceFunction {
    Usual,
    UShape { q: f64 },
    VShape { p: f64 },
    Level { q: f64, p: f64 },
    VShapeIndifference { q: f64, p: f64 },
    Gaussian { s: f64 },
}

impl PreferenceFunction {
    pub fn usual() -> Self {
        PreferenceFunction::Usual
    }

    pub fn u_shape(q: f64) -> Result<Self, ValidationError> {
        Ok(PreferenceFunction::UShape {
            q: non_negative("q", q)?,
        })
    }

    pub fn v_shape(p: f64) -> Result<Self, ValidationError> {
        Ok(PreferenceFunction::VShape {
            p: non_negative("p", p)?,
        })
    }

    /// Level criterion; requires `q ≤ p`.
    pub fn level(q: f64, p: f64) -> Result<Self, ValidationError> {
        let (q, p) = ordered_pair("level", q, p)?;
        Ok(PreferenceFunction::Level { q, p })
    }

    /// V-shape with indifference; requires `q ≤ p`.
    pub fn v_shape_indifference(q: f64, p: f64) -> Result<Self, ValidationError> {
        let (q, p) = ordered_pair("v-shape-indifference", q, p)?;
        Ok(PreferenceFunction::VShapeIndifference { q, p })
    }

    /// Gaussian criterion; requires `s > 0`.
    pub fn gaussian(s: f64) -> Result<Self, ValidationError> {
        if !s.is_finite() || s <= 0.0 {
            return Err(ValidationError::out_of_range("s", f64::MIN_POSITIVE, f64::MAX, s));
        }
        Ok(PreferenceFunction::Gaussian { s })
    }

    /// Builds the function selected by `kind` from raw thresholds.
    ///
    /// `criterion` is only used to name the offending field in errors.
    pub fn build(
        kind: FunctionKind,
        thresholds: &Thresholds,
        criterion: &str,
    ) -> Result<Self, ValidationError> {
        let require = |value: Option<f64>, name: &str| {
            value.ok_or_else(|| ValidationError::empty_field(format!("{}.{}", criterion, name)))
        };
        let function = match kind {
            FunctionKind::Usual => Self::usual(),
            FunctionKind::UShape => Self::u_shape(require(thresholds.q, "q")?)?,
            FunctionKind::VShape => Self::v_shape(require(thresholds.p, "p")?)?,
            FunctionKind::Level => {
                let q = require(thresholds.q, "q")?;
                let p = require(thresholds.p, "p")?;
                Self::level(q, p).map_err(|e| rename_threshold_error(e, criterion))?
            }
            FunctionKind::VShapeIndifference => {
                let q = require(thresholds.q, "q")?;
                let p = require(thresholds.p, "p")?;
                Self::v_shape_indifference(q, p).map_err(|e| rename_threshold_error(e, criterion))?
            }
            FunctionKind::Gaussian => Self::gaussian(require(thresholds.s, "s")?)?,
        };
        Ok(function)
    }

    pub fn kind(&self) -> FunctionKind {
        match self {
            PreferenceFunction::Usual => FunctionKind::Usual,
            PreferenceFunction::UShape { .. } => FunctionKind::UShape,
            PreferenceFunction::VShape { .. } => FunctionKind::VShape,
            PreferenceFunction::Level { .. } => FunctionKind::Level,
            PreferenceFunction::VShapeIndifference { .. } => FunctionKind::VShapeIndifference,
            PreferenceFunction::Gaussian { .. } => FunctionKind::Gaussian,
        }
    }

    /// Deviation beyond which the criterion expresses strict preference.
    ///
    /// Used as the per-criterion margin when checking profile separation.
    /// Usual and Gaussian carry no such threshold and report 0.
    pub fn preference_threshold(&self) -> f64 {
        match *self {
            PreferenceFunction::Usual | PreferenceFunction::Gaussian { .. } => 0.0,
            PreferenceFunction::UShape { q } => q,
            PreferenceFunction::VShape { p }
            | PreferenceFunction::Level { p, .. }
            | PreferenceFunction::VShapeIndifference { p, .. } => p,
        }
    }

    /// Maps a deviation to a preference degree in `[0, 1]`.
    pub fn evaluate(&self, d: f64) -> f64 {
        match *self {
            PreferenceFunction::Usual => {
                if d > 0.0 {
                    1.0
                } else {
                    0.0
                }
            }
            PreferenceFunction::UShape { q } => {
                if d <= q {
                    0.0
                } else {
                    1.0
                }
            }
            PreferenceFunction::VShape { p } => {
                if d <= 0.0 {
                    0.0
                } else if d <= p {
                    d / p
                } else {
                    1.0
                }
            }
            PreferenceFunction::Level { q, p } => {
                if d <= q {
                    0.0
                } else if d <= p {
                    0.5
                } else {
                    1.0
                }
            }
            PreferenceFunction::VShapeIndifference { q, p } => {
                if d <= q {
                    0.0
                } else if d <= p {
                    (d - q) / (p - q)
                } else {
                    1.0
                }
            }
            PreferenceFunction::Gaussian { s } => {
                if d <= 0.0 {
                    0.0
                } else {
                    1.0 - (-(d * d) / (2.0 * s * s)).exp()
                }
            }
        }
    }
}

fn non_negative(field: &str, value: f64) -> Result<f64, ValidationError> {
    if !value.is_finite() || value < 0.0 {
        return Err(ValidationError::out_of_range(field, 0.0, f64::MAX, value));
    }
    Ok(value)
}

fn ordered_pair(function: &str, q: f64, p: f64) -> Result<(f64, f64), ValidationError> {
    let q = non_negative("q", q)?;
    let p = non_negative("p", p)?;
    if q > p {
        return Err(ValidationError::threshold_order(function, q, p));
    }
    Ok((q, p))
}

fn rename_threshold_error(err: ValidationError, criterion: &str) -> ValidationError {
    match err {
        ValidationError::ThresholdOrder { q, p, .. } => ValidationError::threshold_order(criterion, q, p),
        other => other,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn usual_is_a_step_at_zero() {
        let f = PreferenceFunction::usual();
        assert_eq!(f.evaluate(-1.0), 0.0);
        assert_eq!(f.evaluate(0.0), 0.0);
        assert_eq!(f.evaluate(1e-9), 1.0);
    }

    #[test]
    fn u_shape_boundary_is_inclusive() {
        let f = PreferenceFunction::u_shape(2.0).unwrap();
        assert_eq!(f.evaluate(2.0), 0.0);
        assert_eq!(f.evaluate(2.0001), 1.0);
    }

    #[test]
    fn v_shape_is_linear_up_to_p() {
        let f = PreferenceFunction::v_shape(4.0).unwrap();
        assert_eq!(f.evaluate(0.0), 0.0);
        assert_eq!(f.evaluate(1.0), 0.25);
        assert_eq!(f.evaluate(4.0), 1.0);
        assert_eq!(f.evaluate(10.0), 1.0);
    }

    #[test]
    fn level_has_half_step() {
        let f = PreferenceFunction::level(1.0, 3.0).unwrap();
        assert_eq!(f.evaluate(1.0), 0.0);
        assert_eq!(f.evaluate(2.0), 0.5);
        assert_eq!(f.evaluate(3.0), 0.5);
        assert_eq!(f.evaluate(3.5), 1.0);
    }

    #[test]
    fn v_shape_indifference_interpolates_between_q_and_p() {
        let f = PreferenceFunction::v_shape_indifference(1.0, 3.0).unwrap();
        assert_eq!(f.evaluate(1.0), 0.0);
        assert_eq!(f.evaluate(2.0), 0.5);
        assert_eq!(f.evaluate(3.0), 1.0);
    }

    #[test]
    fn v_shape_indifference_with_equal_thresholds_is_a_step() {
        let f = PreferenceFunction::v_shape_indifference(2.0, 2.0).unwrap();
        assert_eq!(f.evaluate(2.0), 0.0);
        assert_eq!(f.evaluate(2.5), 1.0);
    }

    #[test]
    fn gaussian_matches_closed_form() {
        let f = PreferenceFunction::gaussian(1.0).unwrap();
        assert_eq!(f.evaluate(0.0), 0.0);
        let expected = 1.0 - (-0.5f64).exp();
        assert!((f.evaluate(1.0) - expected).abs() < 1e-15);
    }

    #[test]
    fn level_rejects_q_above_p() {
        assert!(matches!(
            PreferenceFunction::level(3.0, 1.0),
            Err(ValidationError::ThresholdOrder { .. })
        ));
        assert!(PreferenceFunction::v_shape_indifference(3.0, 1.0).is_err());
    }

    #[test]
    fn gaussian_rejects_non_positive_s() {
        assert!(PreferenceFunction::gaussian(0.0).is_err());
        assert!(PreferenceFunction::gaussian(-1.0).is_err());
    }

    #[test]
    fn build_requires_thresholds_for_kind() {
        let err = PreferenceFunction::build(FunctionKind::VShape, &Thresholds::none(), "price").unwrap_err();
        assert_eq!(err, ValidationError::empty_field("price.p"));
    }

    #[test]
    fn build_names_criterion_on_threshold_order() {
        let err = PreferenceFunction::build(
            FunctionKind::Level,
            &Thresholds::indifference_preference(5.0, 1.0),
            "price",
        )
        .unwrap_err();
        assert_eq!(err, ValidationError::threshold_order("price", 5.0, 1.0));
    }

    #[test]
    fn kind_parses_labels_and_numbers() {
        assert_eq!("usual".parse::<FunctionKind>().unwrap(), FunctionKind::Usual);
        assert_eq!("V_Shape".parse::<FunctionKind>().unwrap(), FunctionKind::VShape);
        assert_eq!("5".parse::<FunctionKind>().unwrap(), FunctionKind::VShapeIndifference);
        assert!("linear".parse::<FunctionKind>().is_err());
        assert!("7".parse::<FunctionKind>().is_err());
    }

    #[test]
    fn preference_threshold_per_kind() {
        assert_eq!(PreferenceFunction::usual().preference_threshold(), 0.0);
        assert_eq!(PreferenceFunction::u_shape(1.5).unwrap().preference_threshold(), 1.5);
        assert_eq!(PreferenceFunction::level(1.0, 2.0).unwrap().preference_threshold(), 2.0);
    }

    #[test]
    fn function_serializes_with_kind_tag() {
        let json = serde_json::to_string(&PreferenceFunction::v_shape(2.0).unwrap()).unwrap();
        assert_eq!(json, r#"{"kind":"v_shape","p":2.0}"#);
    }
}
