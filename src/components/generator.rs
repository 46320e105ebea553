//! Dispatchable fuel-burning generator.

use serde::{Deserialize, Serialize};

use super::{default_price_ratio, validate_price_ratios};
use crate::error::{Result, ensure_finite, ensure_fraction, ensure_non_negative, ensure_positive};

/// A dispatchable generator (e.g. diesel genset) with an affine fuel curve.
///
/// Fuel consumption per hour at output `P` is
/// `fuel_intercept * power_rated + fuel_slope * P`, counted only while `P > 0`.
/// Wear is counted in operating hours, so the effective lifetime in years
/// depends on how much the generator runs (see [`DispatchableGenerator::lifetime`]).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DispatchableGenerator {
    /// Rated (maximum) output power (kW).
    pub power_rated: f64,
    /// No-load fuel consumption per rated kW (fuel unit / h / kW).
    pub fuel_intercept: f64,
    /// Incremental fuel consumption (fuel unit / kWh).
    pub fuel_slope: f64,
    /// Fuel price (currency / fuel unit).
    pub fuel_price: f64,
    /// Initial investment price (currency / kW).
    pub investment_price: f64,
    /// Operation and maintenance price (currency / kW / operating hour).
    pub om_price_hours: f64,
    /// Lifetime in operating hours.
    pub lifetime_hours: f64,
    /// Minimum load ratio. Carried for reporting; dispatch does not enforce it.
    #[serde(default)]
    pub load_ratio_min: f64,
    /// Replacement price as a fraction of the investment price.
    #[serde(default = "default_price_ratio")]
    pub replacement_price_ratio: f64,
    /// Salvage price as a fraction of the investment price.
    #[serde(default = "default_price_ratio")]
    pub salvage_price_ratio: f64,
    /// Fuel quantity unit label (e.g. "L").
    #[serde(default = "default_fuel_unit")]
    pub fuel_unit: String,
}

fn default_fuel_unit() -> String {
    "L".to_string()
}

impl DispatchableGenerator {
    /// Creates a generator with default secondary parameters.
    ///
    /// # Arguments
    ///
    /// * `power_rated` - Rated power (kW)
    /// * `fuel_intercept` - Fuel curve intercept (fuel unit / h / kW rated)
    /// * `fuel_slope` - Fuel curve slope (fuel unit / kWh)
    /// * `fuel_price` - Price per fuel unit
    /// * `investment_price` - Investment price per rated kW
    /// * `om_price_hours` - O&M price per rated kW per operating hour
    /// * `lifetime_hours` - Lifetime in operating hours
    pub fn new(
        power_rated: f64,
        fuel_intercept: f64,
        fuel_slope: f64,
        fuel_price: f64,
        investment_price: f64,
        om_price_hours: f64,
        lifetime_hours: f64,
    ) -> Self {
        Self {
            power_rated,
            fuel_intercept,
            fuel_slope,
            fuel_price,
            investment_price,
            om_price_hours,
            lifetime_hours,
            load_ratio_min: 0.0,
            replacement_price_ratio: 1.0,
            salvage_price_ratio: 1.0,
            fuel_unit: default_fuel_unit(),
        }
    }

    /// Fuel consumption rate (fuel unit / h) at output `power` (kW).
    ///
    /// Returns 0 when the generator is off (`power <= 0`).
    pub fn fuel_rate(&self, power: f64) -> f64 {
        if power > 0.0 {
            self.fuel_intercept * self.power_rated + self.fuel_slope * power
        } else {
            0.0
        }
    }

    /// Effective lifetime in years given the yearly operating hours.
    ///
    /// A generator that never runs does not wear out: the result is
    /// `f64::INFINITY` when `oper_hours` is zero.
    pub fn lifetime(&self, oper_hours: f64) -> f64 {
        if oper_hours > 0.0 {
            self.lifetime_hours / oper_hours
        } else {
            f64::INFINITY
        }
    }

    /// Checks ratings, fuel curve, prices and lifetime.
    ///
    /// # Errors
    ///
    /// Returns [`crate::MicrogridError::InvalidParameter`] naming the first offending field.
    pub fn validate(&self) -> Result<()> {
        ensure_non_negative("generator.power_rated", self.power_rated)?;
        ensure_non_negative("generator.fuel_intercept", self.fuel_intercept)?;
        ensure_non_negative("generator.fuel_slope", self.fuel_slope)?;
        ensure_finite("generator.fuel_price", self.fuel_price)?;
        ensure_finite("generator.investment_price", self.investment_price)?;
        ensure_finite("generator.om_price_hours", self.om_price_hours)?;
        ensure_positive("generator.lifetime_hours", self.lifetime_hours)?;
        ensure_fraction("generator.load_ratio_min", self.load_ratio_min)?;
        validate_price_ratios(
            "generator",
            self.replacement_price_ratio,
            self.salvage_price_ratio,
        )
    }
}
