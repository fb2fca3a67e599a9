//! Override sanity checks.
//!
//! Findings are reported as warnings only. The upstream API stays the
//! authority on which values it accepts.

use crate::config::schema::SamplingOverrides;

/// A suspicious override value.
#[derive(Debug, Clone, PartialEq)]
pub enum ValidationWarning {
    /// NaN or infinite; the override is dropped from outbound bodies.
    NotFinite { param: &'static str },
    /// Outside the documented `[0, 1]` range.
    OutOfRange { param: &'static str, value: f64 },
    /// `top_k` of zero.
    ZeroTopK,
}

impl std::fmt::Display for ValidationWarning {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ValidationWarning::NotFinite { param } => {
                write!(f, "{} is not a finite number and will not be applied", param)
            }
            ValidationWarning::OutOfRange { param, value } => {
                write!(f, "{} = {} is outside the expected range 0.0-1.0", param, value)
            }
            ValidationWarning::ZeroTopK => write!(f, "top_k = 0 is likely to be rejected upstream"),
        }
    }
}

/// Check the effective overrides. Returns every finding, not just the first.
pub fn validate_overrides(overrides: &SamplingOverrides) -> Vec<ValidationWarning> {
    let mut warnings = Vec::new();

    for (param, value) in [("temperature", overrides.temperature), ("top_p", overrides.top_p)] {
        let Some(value) = value else { continue };
        if !value.is_finite() {
            warnings.push(ValidationWarning::NotFinite { param });
        } else if !(0.0..=1.0).contains(&value) {
            warnings.push(ValidationWarning::OutOfRange { param, value });
        }
    }

    if overrides.top_k == Some(0) {
        warnings.push(ValidationWarning::ZeroTopK);
    }

    warnings
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sane_values_pass() {
        let overrides = SamplingOverrides {
            temperature: Some(0.7),
            top_p: Some(1.0),
            top_k: Some(40),
        };
        assert!(validate_overrides(&overrides).is_empty());
        assert!(validate_overrides(&SamplingOverrides::default()).is_empty());
    }

    #[test]
    fn reports_all_findings() {
        let overrides = SamplingOverrides {
            temperature: Some(f64::INFINITY),
            top_p: Some(1.5),
            top_k: Some(0),
        };
        let warnings = validate_overrides(&overrides);
        assert_eq!(
            warnings,
            vec![
                ValidationWarning::NotFinite { param: "temperature" },
                ValidationWarning::OutOfRange { param: "top_p", value: 1.5 },
                ValidationWarning::ZeroTopK,
            ]
        );
    }
}
