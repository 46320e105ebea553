//! Non-dispatchable (variable renewable) sources and the wind power curve.

use std::fmt;

use serde::{Deserialize, Serialize};

use super::{default_price_ratio, validate_price_ratios};
use crate::error::{Result, ensure_finite, ensure_fraction, ensure_non_negative, ensure_positive};

/// Air density at sea level and 15 °C (kg/m³).
const AIR_DENSITY: f64 = 1.225;

/// Economic parameters shared by all non-dispatchable sources.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SourcePricing {
    /// Initial investment price (currency / rated kW).
    pub investment_price: f64,
    /// Operation and maintenance price (currency / rated kW / year).
    pub om_price: f64,
    /// Lifetime (years).
    pub lifetime: f64,
    /// Replacement price as a fraction of the investment price.
    #[serde(default = "default_price_ratio")]
    pub replacement_price_ratio: f64,
    /// Salvage price as a fraction of the investment price.
    #[serde(default = "default_price_ratio")]
    pub salvage_price_ratio: f64,
}

impl SourcePricing {
    /// Creates pricing with replacement and salvage at the full investment price.
    pub fn new(investment_price: f64, om_price: f64, lifetime: f64) -> Self {
        Self {
            investment_price,
            om_price,
            lifetime,
            replacement_price_ratio: 1.0,
            salvage_price_ratio: 1.0,
        }
    }

    /// Checks prices and lifetime. `prefix` starts the reported field paths.
    ///
    /// # Errors
    ///
    /// Returns [`crate::MicrogridError::InvalidParameter`] naming the offending field.
    pub fn validate(&self, prefix: &str) -> Result<()> {
        ensure_finite(&format!("{prefix}.investment_price"), self.investment_price)?;
        ensure_finite(&format!("{prefix}.om_price"), self.om_price)?;
        ensure_positive(&format!("{prefix}.lifetime"), self.lifetime)?;
        validate_price_ratios(prefix, self.replacement_price_ratio, self.salvage_price_ratio)
    }
}

/// A variable renewable source whose production is fixed in advance.
///
/// Implementors provide a production time series (kW, one sample per
/// timestep) and the pricing used by the economic evaluation. The simulator
/// only reads sources, so they must be shareable across threads.
pub trait NonDispatchable: fmt::Debug + Send + Sync {
    /// Potential production time series (kW), before any spillage.
    fn production(&self) -> Vec<f64>;

    /// Rated power (kW), used as the sizing quantity for costs.
    fn power_rated(&self) -> f64;

    /// Economic parameters of the source.
    fn pricing(&self) -> &SourcePricing;

    /// Short human-readable type name (e.g. `"photovoltaic"`).
    fn source_type(&self) -> &'static str;

    /// Checks rating and pricing. `name` prefixes the reported field paths.
    ///
    /// # Errors
    ///
    /// Returns [`crate::MicrogridError::InvalidParameter`] naming the offending field.
    fn validate(&self, name: &str) -> Result<()> {
        ensure_non_negative(&format!("{name}.power_rated"), self.power_rated())?;
        self.pricing().validate(name)
    }
}

/// Solar photovoltaic plant driven by a normalized irradiance series.
#[derive(Debug, Clone, PartialEq)]
pub struct Photovoltaic {
    /// Rated (peak) power (kW).
    pub power_rated: f64,
    /// Irradiance in kW/m² relative to the 1 kW/m² standard test condition.
    pub irradiance: Vec<f64>,
    /// Economic parameters.
    pub pricing: SourcePricing,
    /// Derating factor for soiling, wiring and temperature losses, in [0, 1].
    pub derating_factor: f64,
}

impl Photovoltaic {
    /// Default derating factor.
    pub const DEFAULT_DERATING: f64 = 0.9;

    /// Creates a PV plant with the default derating factor.
    pub fn new(power_rated: f64, irradiance: Vec<f64>, pricing: SourcePricing) -> Self {
        Self {
            power_rated,
            irradiance,
            pricing,
            derating_factor: Self::DEFAULT_DERATING,
        }
    }

    /// Returns the plant with a different derating factor.
    pub fn with_derating_factor(mut self, derating_factor: f64) -> Self {
        self.derating_factor = derating_factor;
        self
    }
}

impl NonDispatchable for Photovoltaic {
    fn production(&self) -> Vec<f64> {
        let scale = self.derating_factor * self.power_rated;
        self.irradiance.iter().map(|&g| scale * g).collect()
    }

    fn power_rated(&self) -> f64 {
        self.power_rated
    }

    fn pricing(&self) -> &SourcePricing {
        &self.pricing
    }

    fn source_type(&self) -> &'static str {
        "photovoltaic"
    }

    fn validate(&self, name: &str) -> Result<()> {
        ensure_non_negative(&format!("{name}.power_rated"), self.power_rated)?;
        ensure_fraction(&format!("{name}.derating_factor"), self.derating_factor)?;
        self.pricing.validate(name)
    }
}

/// Wind farm driven by a capacity factor series.
#[derive(Debug, Clone, PartialEq)]
pub struct WindPower {
    /// Rated power (kW).
    pub power_rated: f64,
    /// Capacity factor (production / rated power), nominally in [0, 1].
    pub capacity_factor: Vec<f64>,
    /// Economic parameters.
    pub pricing: SourcePricing,
}

impl WindPower {
    /// Creates a wind farm from a capacity factor series.
    pub fn new(power_rated: f64, capacity_factor: Vec<f64>, pricing: SourcePricing) -> Self {
        Self {
            power_rated,
            capacity_factor,
            pricing,
        }
    }

    /// Creates a wind farm from a wind speed series (m/s) through a power curve.
    pub fn from_wind_speed(
        power_rated: f64,
        wind_speed: &[f64],
        curve: &PowerCurve,
        pricing: SourcePricing,
    ) -> Self {
        Self::new(power_rated, curve.capacity_from_wind(wind_speed), pricing)
    }
}

impl NonDispatchable for WindPower {
    fn production(&self) -> Vec<f64> {
        self.capacity_factor
            .iter()
            .map(|&cf| self.power_rated * cf)
            .collect()
    }

    fn power_rated(&self) -> f64 {
        self.power_rated
    }

    fn pricing(&self) -> &SourcePricing {
        &self.pricing
    }

    fn source_type(&self) -> &'static str {
        "wind"
    }
}

/// Smooth wind turbine power curve.
///
/// Below rated speed the capacity factor follows `½·Cp·ρ·v³ / TSP`, where TSP
/// is the turbine specific power (rated power per swept area, W/m²). The cubic
/// is saturated at 1 with a LogSumExp smooth minimum of sharpness `sharpness`,
/// and production stops above the cut-out speed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PowerCurve {
    /// Turbine specific power (W/m²).
    pub specific_power: f64,
    /// Power coefficient below rated speed.
    #[serde(default = "default_cp")]
    pub cp: f64,
    /// Cut-out wind speed (m/s).
    #[serde(default = "default_cut_out")]
    pub cut_out_speed: f64,
    /// Sharpness of the saturation knee.
    #[serde(default = "default_sharpness")]
    pub sharpness: f64,
}

fn default_cp() -> f64 {
    0.5
}

fn default_cut_out() -> f64 {
    25.0
}

fn default_sharpness() -> f64 {
    3.0
}

impl PowerCurve {
    /// Creates a power curve with Cp 0.5, cut-out at 25 m/s and sharpness 3.
    pub fn new(specific_power: f64) -> Self {
        Self {
            specific_power,
            cp: default_cp(),
            cut_out_speed: default_cut_out(),
            sharpness: default_sharpness(),
        }
    }

    /// Capacity factor in [0, 1] at wind speed `speed` (m/s).
    pub fn capacity_factor(&self, speed: f64) -> f64 {
        if speed > self.cut_out_speed {
            return 0.0;
        }
        let cubic = 0.5 * self.cp * AIR_DENSITY / self.specific_power * speed.powi(3);
        let a = self.sharpness;
        let saturated = -((-a).exp() + (-a * cubic).exp()).ln() / a;
        saturated.max(0.0)
    }

    /// Capacity factor series for a wind speed series.
    pub fn capacity_from_wind(&self, speeds: &[f64]) -> Vec<f64> {
        speeds.iter().map(|&v| self.capacity_factor(v)).collect()
    }

    /// Checks that all curve parameters are positive.
    ///
    /// # Errors
    ///
    /// Returns [`crate::MicrogridError::InvalidParameter`] naming the offending field.
    pub fn validate(&self, prefix: &str) -> Result<()> {
        ensure_positive(&format!("{prefix}.specific_power"), self.specific_power)?;
        ensure_positive(&format!("{prefix}.cp"), self.cp)?;
        ensure_positive(&format!("{prefix}.cut_out_speed"), self.cut_out_speed)?;
        ensure_positive(&format!("{prefix}.sharpness"), self.sharpness)
    }
}
