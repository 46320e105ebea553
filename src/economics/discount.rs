//! Discounting, annuities and component replacement schedules.

use crate::components::Project;
use crate::error::{MicrogridError, Result};

/// Present-value factor `1 / (1 + rate)^year`.
///
/// `year` may be fractional: replacements of components whose lifetime is
/// not a whole number of years happen at fractional times.
pub fn discount_factor(rate: f64, year: f64) -> f64 {
    (1.0 + rate).powf(-year)
}

/// Discount factors for years `1..=project.lifetime`.
pub fn discount_factors(project: &Project) -> Vec<f64> {
    (1..=project.lifetime)
        .map(|year| discount_factor(project.discount_rate, f64::from(year)))
        .collect()
}

/// Present value of a unit amount paid at the end of every project year.
pub fn annuity_factor(project: &Project) -> f64 {
    discount_factors(project).iter().sum()
}

/// Capital recovery factor: the inverse of the annuity factor.
pub fn capital_recovery_factor(project: &Project) -> f64 {
    1.0 / annuity_factor(project)
}

/// When a component is replaced, and how much of its life remains at project end.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ReplacementSchedule {
    /// Component lifetime (years), possibly infinite.
    pub lifetime: f64,
    /// Number of replacements during the project.
    pub count: u32,
    /// Fraction of the last unit's life remaining at project end, in [0, 1].
    pub remaining_fraction: f64,
}

impl ReplacementSchedule {
    /// Computes the schedule of a component of `lifetime` years over `project_lifetime` years.
    ///
    /// The component is replaced at years `L, 2L, ...` strictly before the
    /// project end; an infinite lifetime means no replacement and a fully
    /// remaining life.
    ///
    /// # Errors
    ///
    /// Returns [`MicrogridError::InvalidParameter`] if `lifetime` is NaN or
    /// not positive, and [`MicrogridError::ReplacementOverflow`] if the
    /// replacement count does not fit in `u32`.
    pub fn new(project_lifetime: u32, lifetime: f64) -> Result<Self> {
        if lifetime.is_nan() || lifetime <= 0.0 {
            return Err(MicrogridError::invalid(
                "lifetime",
                format!("must be > 0, got {lifetime}"),
            ));
        }
        if lifetime.is_infinite() {
            return Ok(Self {
                lifetime,
                count: 0,
                remaining_fraction: 1.0,
            });
        }

        let project = f64::from(project_lifetime);
        let count = (project / lifetime).ceil() - 1.0;
        if !count.is_finite() || count > f64::from(u32::MAX) {
            return Err(MicrogridError::ReplacementOverflow {
                lifetime,
                project_lifetime,
            });
        }
        let count = count.max(0.0) as u32;
        let remaining = lifetime * (f64::from(count) + 1.0) - project;

        Ok(Self {
            lifetime,
            count,
            remaining_fraction: remaining / lifetime,
        })
    }

    /// Years at which replacements happen.
    pub fn years(&self) -> impl Iterator<Item = f64> + '_ {
        (1..=self.count).map(|i| f64::from(i) * self.lifetime)
    }
}
