//! Error taxonomy for model validation, simulation and evaluation.

use thiserror::Error;

/// Errors raised when a microgrid model is malformed.
///
/// Degenerate ratios (zero served energy, zero rated storage, ...) are not
/// errors: they evaluate to `f64::INFINITY` in the result records.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum MicrogridError {
    /// A parameter is non-finite or outside its admissible range.
    #[error("invalid parameter `{field}`: {message}")]
    InvalidParameter { field: String, message: String },

    /// A time series does not have the same number of samples as the load.
    #[error("time series `{name}` has {actual} samples, expected {expected}")]
    LengthMismatch {
        name: String,
        expected: usize,
        actual: usize,
    },

    /// The replacement count implied by a component lifetime does not fit in `u32`.
    #[error(
        "component lifetime {lifetime} yr implies too many replacements over a {project_lifetime} yr project"
    )]
    ReplacementOverflow { lifetime: f64, project_lifetime: u32 },
}

impl MicrogridError {
    pub(crate) fn invalid(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidParameter {
            field: field.into(),
            message: message.into(),
        }
    }
}

/// Result alias used across the library.
pub type Result<T, E = MicrogridError> = std::result::Result<T, E>;

/// Checks that `value` is finite and `>= 0`.
pub(crate) fn ensure_non_negative(field: &str, value: f64) -> Result<()> {
    if value.is_finite() && value >= 0.0 {
        Ok(())
    } else {
        Err(MicrogridError::invalid(
            field,
            format!("must be finite and >= 0, got {value}"),
        ))
    }
}

/// Checks that `value` is finite and `> 0`.
pub(crate) fn ensure_positive(field: &str, value: f64) -> Result<()> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(MicrogridError::invalid(
            field,
            format!("must be finite and > 0, got {value}"),
        ))
    }
}

/// Checks that `value` lies in the closed unit interval.
pub(crate) fn ensure_fraction(field: &str, value: f64) -> Result<()> {
    if (0.0..=1.0).contains(&value) {
        Ok(())
    } else {
        Err(MicrogridError::invalid(
            field,
            format!("must be in [0, 1], got {value}"),
        ))
    }
}

/// Checks that `value` is finite. Used for prices, which may be negative (subsidies).
pub(crate) fn ensure_finite(field: &str, value: f64) -> Result<()> {
    if value.is_finite() {
        Ok(())
    } else {
        Err(MicrogridError::invalid(field, format!("must be finite, got {value}")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn range_checks_accept_boundaries() {
        assert!(ensure_non_negative("x", 0.0).is_ok());
        assert!(ensure_positive("x", 1e-9).is_ok());
        assert!(ensure_fraction("x", 0.0).is_ok());
        assert!(ensure_fraction("x", 1.0).is_ok());
        assert!(ensure_finite("x", -5.0).is_ok());
    }

    #[test]
    fn range_checks_reject_nan_and_out_of_range() {
        assert!(ensure_non_negative("x", -1.0).is_err());
        assert!(ensure_non_negative("x", f64::NAN).is_err());
        assert!(ensure_positive("x", 0.0).is_err());
        assert!(ensure_positive("x", f64::INFINITY).is_err());
        assert!(ensure_fraction("x", 1.01).is_err());
        assert!(ensure_fraction("x", f64::NAN).is_err());
        assert!(ensure_finite("x", f64::NEG_INFINITY).is_err());
    }

    #[test]
    fn invalid_parameter_message_names_field() {
        let err = MicrogridError::invalid("storage.soc_min", "must be in [0, 1], got 2");
        assert_eq!(
            err.to_string(),
            "invalid parameter `storage.soc_min`: must be in [0, 1], got 2"
        );
    }
}
