//! TOML-based scenario configuration and preset definitions.

use std::collections::HashSet;
use std::f64::consts::PI;
use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use thiserror::Error;

use crate::components::{
    Battery, DispatchableGenerator, Microgrid, NonDispatchable, Photovoltaic, PowerCurve, Project,
    SourcePricing, WindPower,
};
use crate::error::{MicrogridError, ensure_fraction, ensure_non_negative};
use crate::io::timeseries::TimeSeriesTable;
use crate::profiles::ProfileSpec;

/// Seed offset between consecutive sources, so profiles are not correlated.
const SOURCE_SEED_OFFSET: u64 = 57;

/// Top-level scenario configuration parsed from TOML.
///
/// Missing sections take the values of the `diesel_only` preset. Load from
/// TOML with [`ScenarioConfig::from_toml_file`] or start from a preset with
/// [`ScenarioConfig::from_preset`].
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ScenarioConfig {
    /// Project lifetime, discount rate, timestep and currency.
    pub project: Project,
    /// Number of steps, random seed and optional CSV input.
    pub timeseries: TimeSeriesConfig,
    /// Desired load profile (kW).
    pub load: ProfileSpec,
    /// Dispatchable generator parameters.
    pub generator: DispatchableGenerator,
    /// Storage parameters.
    pub storage: Battery,
    /// Non-dispatchable sources, in report order.
    pub sources: Vec<SourceConfig>,
}

/// Time series length, seed and input file.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct TimeSeriesConfig {
    /// Number of simulated steps (must be > 0).
    pub steps: usize,
    /// Master random seed for synthetic profiles.
    pub seed: u64,
    /// CSV file providing `column` profiles, relative to the scenario file.
    pub path: Option<PathBuf>,
}

impl Default for TimeSeriesConfig {
    fn default() -> Self {
        Self {
            steps: 8760,
            seed: 42,
            path: None,
        }
    }
}

/// One non-dispatchable source, tagged by `type`.
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum SourceConfig {
    /// Solar PV plant.
    Photovoltaic(PhotovoltaicConfig),
    /// Wind farm.
    Wind(WindConfig),
}

/// Solar PV plant parameters.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PhotovoltaicConfig {
    /// Unique source name.
    pub name: String,
    /// Rated power (kW).
    pub power_rated: f64,
    /// Derating factor in [0, 1].
    #[serde(default = "default_derating")]
    pub derating_factor: f64,
    /// Irradiance profile (kW/m²).
    pub irradiance: ProfileSpec,
    /// Economic parameters.
    pub pricing: SourcePricing,
}

fn default_derating() -> f64 {
    Photovoltaic::DEFAULT_DERATING
}

/// Wind farm parameters.
///
/// Without a power curve the profile is read as a capacity factor; with one
/// it is read as a wind speed (m/s) and converted through the curve.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct WindConfig {
    /// Unique source name.
    pub name: String,
    /// Rated power (kW).
    pub power_rated: f64,
    /// Capacity factor or wind speed profile.
    pub profile: ProfileSpec,
    /// Optional wind speed to capacity factor conversion.
    #[serde(default)]
    pub power_curve: Option<PowerCurve>,
    /// Economic parameters.
    pub pricing: SourcePricing,
}

impl SourceConfig {
    /// Unique source name.
    pub fn name(&self) -> &str {
        match self {
            Self::Photovoltaic(pv) => &pv.name,
            Self::Wind(wind) => &wind.name,
        }
    }

    fn profile(&self) -> &ProfileSpec {
        match self {
            Self::Photovoltaic(pv) => &pv.irradiance,
            Self::Wind(wind) => &wind.profile,
        }
    }

    fn profile_field(&self) -> &'static str {
        match self {
            Self::Photovoltaic(_) => "irradiance",
            Self::Wind(_) => "profile",
        }
    }

    /// Builds the source from an already generated profile.
    fn build(&self, profile: Vec<f64>) -> Box<dyn NonDispatchable> {
        match self {
            Self::Photovoltaic(pv) => Box::new(
                Photovoltaic::new(pv.power_rated, profile, pv.pricing.clone())
                    .with_derating_factor(pv.derating_factor),
            ),
            Self::Wind(wind) => Box::new(match &wind.power_curve {
                Some(curve) => {
                    WindPower::from_wind_speed(wind.power_rated, &profile, curve, wind.pricing.clone())
                }
                None => WindPower::new(wind.power_rated, profile, wind.pricing.clone()),
            }),
        }
    }
}

/// Configuration error with field path and constraint description.
#[derive(Debug, Clone, PartialEq, Error)]
#[error("config error: {field}: {message}")]
pub struct ConfigError {
    /// Dotted field path (e.g., `"storage.soc_ini"`).
    pub field: String,
    /// Human-readable constraint description.
    pub message: String,
}

impl ConfigError {
    fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

impl From<MicrogridError> for ConfigError {
    fn from(err: MicrogridError) -> Self {
        match &err {
            MicrogridError::InvalidParameter { field, message } => Self::new(field, message),
            MicrogridError::LengthMismatch { name, .. } => Self::new(name, err.to_string()),
            MicrogridError::ReplacementOverflow { .. } => Self::new("model", err.to_string()),
        }
    }
}

fn diesel_generator() -> DispatchableGenerator {
    DispatchableGenerator::new(1800.0, 0.0, 0.24, 1.0, 400.0, 0.02, 15_000.0)
}

fn island_load() -> ProfileSpec {
    // evening peak at 18:00
    ProfileSpec::Daily {
        base: 1500.0,
        amplitude: 400.0,
        phase_rad: PI,
        noise_std: 50.0,
    }
}

impl Default for ScenarioConfig {
    fn default() -> Self {
        Self::diesel_only()
    }
}

impl ScenarioConfig {
    /// Flat 100 kW load served by a 150 kW generator alone, over one year.
    pub fn diesel_only() -> Self {
        Self {
            project: Project::default(),
            timeseries: TimeSeriesConfig::default(),
            load: ProfileSpec::Constant { value: 100.0 },
            generator: DispatchableGenerator::new(150.0, 0.0, 0.24, 1.0, 400.0, 0.02, 15_000.0),
            storage: Battery::new(0.0, 350.0, 10.0, 15.0, 3000.0),
            sources: Vec::new(),
        }
    }

    /// Island load with a large PV plant, a 9 MWh battery and diesel backup.
    pub fn pv_battery_diesel() -> Self {
        Self {
            load: island_load(),
            generator: diesel_generator(),
            storage: Battery::new(9000.0, 350.0, 10.0, 15.0, 3000.0),
            sources: vec![SourceConfig::Photovoltaic(PhotovoltaicConfig {
                name: "Solar PV".to_string(),
                power_rated: 3000.0,
                derating_factor: 1.0,
                irradiance: ProfileSpec::Solar {
                    peak: 1.0,
                    sunrise_hour: 6.0,
                    sunset_hour: 20.0,
                    noise_std: 0.15,
                },
                pricing: SourcePricing::new(1200.0, 20.0, 25.0),
            })],
            ..Self::diesel_only()
        }
    }

    /// Island load with a wind farm (AR(1) wind speeds), a battery and diesel backup.
    pub fn wind_battery_diesel() -> Self {
        Self {
            load: island_load(),
            generator: diesel_generator(),
            storage: Battery::new(3000.0, 350.0, 10.0, 15.0, 3000.0),
            sources: vec![SourceConfig::Wind(WindConfig {
                name: "Wind".to_string(),
                power_rated: 2000.0,
                profile: ProfileSpec::Ar1 {
                    mean: 8.0,
                    alpha: 0.9,
                    noise_std: 1.5,
                },
                power_curve: Some(PowerCurve::new(300.0)),
                pricing: SourcePricing::new(3500.0, 100.0, 25.0),
            })],
            ..Self::diesel_only()
        }
    }

    /// Available preset names.
    pub const PRESETS: &[&str] = &["diesel_only", "pv_battery_diesel", "wind_battery_diesel"];

    /// Loads a scenario from a named preset.
    ///
    /// # Errors
    ///
    /// Returns a `ConfigError` if the preset name is unknown.
    pub fn from_preset(name: &str) -> Result<Self, ConfigError> {
        match name {
            "diesel_only" => Ok(Self::diesel_only()),
            "pv_battery_diesel" => Ok(Self::pv_battery_diesel()),
            "wind_battery_diesel" => Ok(Self::wind_battery_diesel()),
            _ => Err(ConfigError::new(
                "preset",
                format!(
                    "unknown preset \"{name}\", available: {}",
                    Self::PRESETS.join(", ")
                ),
            )),
        }
    }

    /// Parses a scenario from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns a `ConfigError` if the file cannot be read or the TOML is invalid.
    pub fn from_toml_file(path: &Path) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path).map_err(|e| {
            ConfigError::new("scenario", format!("cannot read \"{}\": {e}", path.display()))
        })?;
        Self::from_toml_str(&content)
    }

    /// Parses a scenario from a TOML string.
    ///
    /// # Errors
    ///
    /// Returns a `ConfigError` if the TOML is invalid or contains unknown fields.
    pub fn from_toml_str(s: &str) -> Result<Self, ConfigError> {
        toml::from_str(s).map_err(|e| ConfigError::new("toml", e.to_string()))
    }

    /// Validates all fields and returns a list of errors.
    ///
    /// Returns an empty vector if configuration is valid.
    pub fn validate(&self) -> Vec<ConfigError> {
        let mut errors = Vec::new();
        let mut check = |result: Result<(), MicrogridError>| {
            if let Err(e) = result {
                errors.push(ConfigError::from(e));
            }
        };

        check(self.project.validate());
        check(self.generator.validate());
        check(self.storage.validate());

        for (i, source) in self.sources.iter().enumerate() {
            let prefix = format!("sources[{i}]");
            match source {
                SourceConfig::Photovoltaic(pv) => {
                    check(ensure_non_negative(&format!("{prefix}.power_rated"), pv.power_rated));
                    check(ensure_fraction(
                        &format!("{prefix}.derating_factor"),
                        pv.derating_factor,
                    ));
                    check(pv.pricing.validate(&format!("{prefix}.pricing")));
                }
                SourceConfig::Wind(wind) => {
                    check(ensure_non_negative(&format!("{prefix}.power_rated"), wind.power_rated));
                    if let Some(curve) = &wind.power_curve {
                        check(curve.validate(&format!("{prefix}.power_curve")));
                    }
                    check(wind.pricing.validate(&format!("{prefix}.pricing")));
                }
            }
        }

        if self.timeseries.steps == 0 {
            errors.push(ConfigError::new("timeseries.steps", "must be > 0"));
        }

        let profiles = std::iter::once(("load".to_string(), &self.load)).chain(
            self.sources.iter().enumerate().map(|(i, s)| {
                (format!("sources[{i}].{}", s.profile_field()), s.profile())
            }),
        );
        for (field, profile) in profiles {
            if let Err(e) = profile.validate() {
                errors.push(ConfigError::new(field.clone(), e.to_string()));
            }
            if matches!(profile, ProfileSpec::Column { .. }) && self.timeseries.path.is_none() {
                errors.push(ConfigError::new(
                    field,
                    "column profiles need timeseries.path to be set",
                ));
            }
        }

        let mut names = HashSet::new();
        for (i, source) in self.sources.iter().enumerate() {
            let name = source.name();
            if name.trim().is_empty() {
                errors.push(ConfigError::new(format!("sources[{i}].name"), "must not be empty"));
            } else if !names.insert(name) {
                errors.push(ConfigError::new(
                    format!("sources[{i}].name"),
                    format!("duplicate source name \"{name}\""),
                ));
            }
        }

        errors
    }

    /// Generates every profile and assembles the microgrid.
    ///
    /// `base_dir` resolves a relative `timeseries.path`, usually the
    /// directory of the scenario file.
    ///
    /// # Errors
    ///
    /// Returns a `ConfigError` if the time series file cannot be loaded, a
    /// profile cannot be generated, two sources share a name, or the
    /// assembled model is invalid.
    pub fn build(&self, base_dir: Option<&Path>) -> Result<Microgrid, ConfigError> {
        let table = match &self.timeseries.path {
            Some(path) => {
                let path = match base_dir {
                    Some(dir) if path.is_relative() => dir.join(path),
                    _ => path.clone(),
                };
                let table = TimeSeriesTable::from_path(&path).map_err(|e| {
                    ConfigError::new("timeseries.path", format!("\"{}\": {e}", path.display()))
                })?;
                Some(table)
            }
            None => None,
        };

        let steps = self.timeseries.steps;
        let dt = self.project.timestep;
        let seed = self.timeseries.seed;

        let load = self
            .load
            .generate(steps, dt, seed, table.as_ref())
            .map_err(|e| ConfigError::new("load", e.to_string()))?;
        let mut microgrid = Microgrid::new(
            self.project.clone(),
            load,
            self.generator.clone(),
            self.storage.clone(),
        );

        for (i, source) in self.sources.iter().enumerate() {
            let source_seed = seed.wrapping_add(SOURCE_SEED_OFFSET.wrapping_mul(i as u64 + 1));
            let profile = source
                .profile()
                .generate(steps, dt, source_seed, table.as_ref())
                .map_err(|e| {
                    ConfigError::new(format!("sources[{i}].{}", source.profile_field()), e.to_string())
                })?;
            if microgrid
                .add_source(source.name(), source.build(profile))
                .is_some()
            {
                return Err(ConfigError::new(
                    format!("sources[{i}].name"),
                    format!("duplicate source name \"{}\"", source.name()),
                ));
            }
        }

        microgrid.validate()?;
        Ok(microgrid)
    }
}
