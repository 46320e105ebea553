//! Project-wide economic and timing parameters.

use serde::{Deserialize, Serialize};

use crate::error::{MicrogridError, Result, ensure_positive};

/// Project lifetime, discount rate, timestep and currency.
///
/// All sections of a scenario are expressed against these parameters: the
/// timestep gives the duration of one sample of every time series, and the
/// lifetime and discount rate drive all present-value computations.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Project {
    /// Project lifetime in years (must be > 0).
    pub lifetime: u32,
    /// Annual discount rate (e.g. 0.05 for 5%).
    pub discount_rate: f64,
    /// Duration of one time series sample, in hours.
    pub timestep: f64,
    /// Currency label used in reports.
    pub currency: String,
}

impl Default for Project {
    fn default() -> Self {
        Self {
            lifetime: 25,
            discount_rate: 0.05,
            timestep: 1.0,
            currency: "$".to_string(),
        }
    }
}

impl Project {
    /// Creates a project with the default currency label.
    pub fn new(lifetime: u32, discount_rate: f64, timestep: f64) -> Self {
        Self {
            lifetime,
            discount_rate,
            timestep,
            ..Self::default()
        }
    }

    /// Checks lifetime, discount rate and timestep.
    ///
    /// # Errors
    ///
    /// Returns [`MicrogridError::InvalidParameter`] if the lifetime is zero, the
    /// discount rate is not finite or `<= -1`, or the timestep is not finite and positive.
    pub fn validate(&self) -> Result<()> {
        if self.lifetime == 0 {
            return Err(MicrogridError::invalid("project.lifetime", "must be > 0"));
        }
        if !self.discount_rate.is_finite() || self.discount_rate <= -1.0 {
            return Err(MicrogridError::invalid(
                "project.discount_rate",
                format!("must be finite and > -1, got {}", self.discount_rate),
            ));
        }
        ensure_positive("project.timestep", self.timestep)
    }
}
