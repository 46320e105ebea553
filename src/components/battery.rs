//! Battery energy storage with symmetric loss factor.

use serde::{Deserialize, Serialize};

use super::{default_price_ratio, validate_price_ratios};
use crate::error::{
    MicrogridError, Result, ensure_finite, ensure_fraction, ensure_non_negative, ensure_positive,
};

/// Electrochemical storage described by its rated energy, power rates and losses.
///
/// Energy evolves as `E(k+1) = E(k) - (P + loss_factor * |P|) * dt`, where `P`
/// is positive when discharging. The usable energy range is
/// `[soc_min * energy_rated, energy_rated]`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Battery {
    /// Rated energy capacity (kWh).
    pub energy_rated: f64,
    /// Initial investment price (currency / kWh).
    pub investment_price: f64,
    /// Operation and maintenance price (currency / kWh / year).
    pub om_price: f64,
    /// Calendar lifetime (years).
    pub lifetime_calendar: f64,
    /// Cycling lifetime (number of full cycles).
    pub lifetime_cycles: f64,
    /// Maximum charge power per rated kWh (1/h).
    #[serde(default = "default_rate")]
    pub charge_rate: f64,
    /// Maximum discharge power per rated kWh (1/h).
    #[serde(default = "default_rate")]
    pub discharge_rate: f64,
    /// Linear loss factor applied to `|P|`, in [0, 1).
    #[serde(default = "default_loss_factor")]
    pub loss_factor: f64,
    /// Minimum state of charge, in [0, 1].
    #[serde(default)]
    pub soc_min: f64,
    /// Initial state of charge, in [soc_min, 1].
    #[serde(default)]
    pub soc_ini: f64,
    /// Replacement price as a fraction of the investment price.
    #[serde(default = "default_price_ratio")]
    pub replacement_price_ratio: f64,
    /// Salvage price as a fraction of the investment price.
    #[serde(default = "default_price_ratio")]
    pub salvage_price_ratio: f64,
}

fn default_rate() -> f64 {
    1.0
}

fn default_loss_factor() -> f64 {
    0.05
}

impl Battery {
    /// Creates a battery with default rates, 5% loss factor and an empty initial state.
    ///
    /// # Arguments
    ///
    /// * `energy_rated` - Rated energy (kWh)
    /// * `investment_price` - Investment price per rated kWh
    /// * `om_price` - Yearly O&M price per rated kWh
    /// * `lifetime_calendar` - Calendar lifetime (years)
    /// * `lifetime_cycles` - Cycling lifetime (full cycles)
    pub fn new(
        energy_rated: f64,
        investment_price: f64,
        om_price: f64,
        lifetime_calendar: f64,
        lifetime_cycles: f64,
    ) -> Self {
        Self {
            energy_rated,
            investment_price,
            om_price,
            lifetime_calendar,
            lifetime_cycles,
            charge_rate: default_rate(),
            discharge_rate: default_rate(),
            loss_factor: default_loss_factor(),
            soc_min: 0.0,
            soc_ini: 0.0,
            replacement_price_ratio: 1.0,
            salvage_price_ratio: 1.0,
        }
    }

    /// Lowest admissible stored energy (kWh).
    pub fn energy_min(&self) -> f64 {
        self.soc_min * self.energy_rated
    }

    /// Stored energy at the start of the simulation (kWh).
    pub fn energy_initial(&self) -> f64 {
        self.soc_ini * self.energy_rated
    }

    /// Power bounds `(charge_max, discharge_max)` reachable from `energy` in one step.
    ///
    /// Combines the energy bounds (the step may not leave
    /// `[energy_min, energy_rated]`) with the rate bounds. The charge bound is
    /// always `<= 0` and the discharge bound `>= 0`.
    ///
    /// # Arguments
    ///
    /// * `energy` - Stored energy at the start of the step (kWh)
    /// * `dt` - Step duration (h)
    pub fn power_limits(&self, energy: f64, dt: f64) -> (f64, f64) {
        let charge_from_energy = -(self.energy_rated - energy) / ((1.0 - self.loss_factor) * dt);
        let discharge_from_energy = (energy - self.energy_min()) / ((1.0 + self.loss_factor) * dt);
        let charge_from_rate = -self.charge_rate * self.energy_rated;
        let discharge_from_rate = self.discharge_rate * self.energy_rated;

        let charge_max = charge_from_energy.max(charge_from_rate).min(0.0);
        let discharge_max = discharge_from_energy.min(discharge_from_rate).max(0.0);
        (charge_max, discharge_max)
    }

    /// Stored energy after exchanging `power` (kW, positive = discharge) for `dt` hours.
    pub fn next_energy(&self, energy: f64, power: f64, dt: f64) -> f64 {
        energy - (power + self.loss_factor * power.abs()) * dt
    }

    /// Effective lifetime in years given the yearly number of full cycles.
    ///
    /// The shorter of the calendar lifetime and the cycling lifetime. When
    /// the cycle count is zero or not finite (e.g. zero rated energy), only the
    /// calendar lifetime applies.
    pub fn lifetime(&self, cycles: f64) -> f64 {
        if cycles > 0.0 && cycles.is_finite() {
            self.lifetime_calendar.min(self.lifetime_cycles / cycles)
        } else {
            self.lifetime_calendar
        }
    }

    /// Checks ratings, rates, state-of-charge bounds, prices and lifetimes.
    ///
    /// # Errors
    ///
    /// Returns [`MicrogridError::InvalidParameter`] naming the first offending field.
    pub fn validate(&self) -> Result<()> {
        ensure_non_negative("storage.energy_rated", self.energy_rated)?;
        ensure_finite("storage.investment_price", self.investment_price)?;
        ensure_finite("storage.om_price", self.om_price)?;
        ensure_positive("storage.lifetime_calendar", self.lifetime_calendar)?;
        ensure_positive("storage.lifetime_cycles", self.lifetime_cycles)?;
        ensure_non_negative("storage.charge_rate", self.charge_rate)?;
        ensure_non_negative("storage.discharge_rate", self.discharge_rate)?;
        if !(0.0..1.0).contains(&self.loss_factor) {
            return Err(MicrogridError::invalid(
                "storage.loss_factor",
                format!("must be in [0, 1), got {}", self.loss_factor),
            ));
        }
        ensure_fraction("storage.soc_min", self.soc_min)?;
        ensure_fraction("storage.soc_ini", self.soc_ini)?;
        if self.soc_ini < self.soc_min {
            return Err(MicrogridError::invalid(
                "storage.soc_ini",
                format!("must be >= soc_min ({}), got {}", self.soc_min, self.soc_ini),
            ));
        }
        validate_price_ratios(
            "storage",
            self.replacement_price_ratio,
            self.salvage_price_ratio,
        )
    }
}
