//! Time series generators for load, irradiance, capacity factor and wind speed.
//!
//! Profiles are either synthetic (seeded, reproducible) or read from a column
//! of a [`TimeSeriesTable`]. Synthetic shapes follow a 24-hour day whatever
//! the timestep.

use std::f64::consts::PI;

use rand::{Rng, SeedableRng, rngs::StdRng};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::io::timeseries::TimeSeriesTable;

/// Errors raised while checking or generating a profile.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ProfileError {
    /// A shape parameter is out of range.
    #[error("{parameter}: {message}")]
    InvalidParameter {
        parameter: &'static str,
        message: String,
    },
    /// A column profile was requested but no table was loaded.
    #[error("column \"{0}\" requested but no time series file is configured")]
    MissingTable(String),
    /// The table has no column with this name.
    #[error("no column \"{0}\" in the time series file")]
    UnknownColumn(String),
    /// The column is shorter than the requested number of steps.
    #[error("column \"{name}\" has {actual} rows, {expected} needed")]
    ColumnTooShort {
        name: String,
        expected: usize,
        actual: usize,
    },
}

/// Description of one time series.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "model", rename_all = "snake_case")]
pub enum ProfileSpec {
    /// The same value at every step.
    Constant { value: f64 },
    /// Daily sinusoid around `base`, with optional Gaussian noise, clamped at 0.
    Daily {
        base: f64,
        amplitude: f64,
        #[serde(default)]
        phase_rad: f64,
        #[serde(default)]
        noise_std: f64,
    },
    /// Half-sine daylight bell between sunrise and sunset, with multiplicative noise.
    Solar {
        peak: f64,
        sunrise_hour: f64,
        sunset_hour: f64,
        #[serde(default)]
        noise_std: f64,
    },
    /// First-order autoregressive process around `mean`, clamped at 0.
    Ar1 {
        mean: f64,
        alpha: f64,
        noise_std: f64,
    },
    /// A named column of the scenario's time series file.
    Column { name: String },
}

/// Gaussian noise with mean 0 and standard deviation `std_dev` (Box-Muller).
pub fn gaussian_noise(rng: &mut StdRng, std_dev: f64) -> f64 {
    if std_dev <= 0.0 {
        return 0.0;
    }

    let u1: f64 = rng.random::<f64>().clamp(1e-12, 1.0);
    let u2: f64 = rng.random::<f64>();
    let z0 = (-2.0 * u1.ln()).sqrt() * (2.0 * PI * u2).cos();
    z0 * std_dev
}

/// Hour of day in [0, 24) at step `k`.
fn hour_of_day(k: usize, timestep: f64) -> f64 {
    (k as f64 * timestep).rem_euclid(24.0)
}

/// Daylight bell in [0, 1]: 0 outside `[sunrise, sunset)`, 1 at solar noon.
pub fn daylight_frac(hour: f64, sunrise_hour: f64, sunset_hour: f64) -> f64 {
    if hour < sunrise_hour || hour >= sunset_hour {
        return 0.0;
    }
    (PI * (hour - sunrise_hour) / (sunset_hour - sunrise_hour)).sin()
}

impl ProfileSpec {
    /// Checks shape parameters.
    ///
    /// # Errors
    ///
    /// Returns [`ProfileError::InvalidParameter`] for non-finite values,
    /// negative noise, inverted daylight hours, or `alpha` outside [0, 1].
    pub fn validate(&self) -> Result<(), ProfileError> {
        fn finite(parameter: &'static str, value: f64) -> Result<(), ProfileError> {
            if value.is_finite() {
                Ok(())
            } else {
                Err(ProfileError::InvalidParameter {
                    parameter,
                    message: format!("must be finite, got {value}"),
                })
            }
        }
        fn noise(value: f64) -> Result<(), ProfileError> {
            if value.is_finite() && value >= 0.0 {
                Ok(())
            } else {
                Err(ProfileError::InvalidParameter {
                    parameter: "noise_std",
                    message: format!("must be >= 0, got {value}"),
                })
            }
        }

        match self {
            Self::Constant { value } => finite("value", *value),
            Self::Daily {
                base,
                amplitude,
                phase_rad,
                noise_std,
            } => {
                finite("base", *base)?;
                finite("amplitude", *amplitude)?;
                finite("phase_rad", *phase_rad)?;
                noise(*noise_std)
            }
            Self::Solar {
                peak,
                sunrise_hour,
                sunset_hour,
                noise_std,
            } => {
                finite("peak", *peak)?;
                let ordered = *sunrise_hour >= 0.0 && sunrise_hour < sunset_hour;
                if !ordered || *sunset_hour > 24.0 {
                    return Err(ProfileError::InvalidParameter {
                        parameter: "sunrise_hour",
                        message: format!(
                            "need 0 <= sunrise_hour < sunset_hour <= 24, \
                             got {sunrise_hour} and {sunset_hour}"
                        ),
                    });
                }
                noise(*noise_std)
            }
            Self::Ar1 {
                mean,
                alpha,
                noise_std,
            } => {
                finite("mean", *mean)?;
                if !(0.0..=1.0).contains(alpha) {
                    return Err(ProfileError::InvalidParameter {
                        parameter: "alpha",
                        message: format!("must be in [0, 1], got {alpha}"),
                    });
                }
                noise(*noise_std)
            }
            Self::Column { .. } => Ok(()),
        }
    }

    /// Generates `steps` samples spaced by `timestep` hours.
    ///
    /// Random profiles draw from a `StdRng` seeded with `seed`, so the same
    /// arguments always give the same series. Column profiles take the first
    /// `steps` rows of the column.
    ///
    /// # Errors
    ///
    /// Returns a [`ProfileError`] if a column is requested and `table` is
    /// `None`, lacks the column, or is too short.
    pub fn generate(
        &self,
        steps: usize,
        timestep: f64,
        seed: u64,
        table: Option<&TimeSeriesTable>,
    ) -> Result<Vec<f64>, ProfileError> {
        let mut rng = StdRng::seed_from_u64(seed);
        let series = match self {
            Self::Constant { value } => vec![*value; steps],
            Self::Daily {
                base,
                amplitude,
                phase_rad,
                noise_std,
            } => (0..steps)
                .map(|k| {
                    let angle = 2.0 * PI * hour_of_day(k, timestep) / 24.0 + phase_rad;
                    let kw = base + amplitude * angle.sin() + gaussian_noise(&mut rng, *noise_std);
                    kw.max(0.0)
                })
                .collect(),
            Self::Solar {
                peak,
                sunrise_hour,
                sunset_hour,
                noise_std,
            } => (0..steps)
                .map(|k| {
                    let frac = daylight_frac(hour_of_day(k, timestep), *sunrise_hour, *sunset_hour);
                    if frac <= 0.0 {
                        return 0.0;
                    }
                    let noise_mult = 1.0 + gaussian_noise(&mut rng, *noise_std);
                    (peak * frac * noise_mult).max(0.0)
                })
                .collect(),
            Self::Ar1 {
                mean,
                alpha,
                noise_std,
            } => {
                let mut deviation = 0.0;
                (0..steps)
                    .map(|_| {
                        deviation = alpha * deviation + gaussian_noise(&mut rng, *noise_std);
                        (mean + deviation).max(0.0)
                    })
                    .collect()
            }
            Self::Column { name } => {
                let table = table.ok_or_else(|| ProfileError::MissingTable(name.clone()))?;
                let column = table
                    .column(name)
                    .ok_or_else(|| ProfileError::UnknownColumn(name.clone()))?;
                if column.len() < steps {
                    return Err(ProfileError::ColumnTooShort {
                        name: name.clone(),
                        expected: steps,
                        actual: column.len(),
                    });
                }
                column[..steps].to_vec()
            }
        };
        Ok(series)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn constant_profile_repeats_value() {
        let p = ProfileSpec::Constant { value: 100.0 };
        assert_eq!(p.generate(3, 1.0, 0, None).unwrap(), vec![100.0; 3]);
    }

    #[test]
    fn daily_profile_without_noise_is_periodic() {
        let p = ProfileSpec::Daily {
            base: 10.0,
            amplitude: 4.0,
            phase_rad: 0.0,
            noise_std: 0.0,
        };
        let s = p.generate(48, 1.0, 0, None).unwrap();
        assert_abs_diff_eq!(s[6], 14.0, epsilon = 1e-9);
        assert_abs_diff_eq!(s[18], 6.0, epsilon = 1e-9);
        for k in 0..24 {
            assert_abs_diff_eq!(s[k], s[k + 24], epsilon = 1e-9);
        }
    }

    #[test]
    fn solar_profile_is_dark_at_night_and_peaks_at_noon() {
        let p = ProfileSpec::Solar {
            peak: 1.0,
            sunrise_hour: 6.0,
            sunset_hour: 18.0,
            noise_std: 0.0,
        };
        let s = p.generate(24, 1.0, 0, None).unwrap();
        assert!(s[..6].iter().all(|&x| x == 0.0));
        assert!(s[18..].iter().all(|&x| x == 0.0));
        assert_abs_diff_eq!(s[12], 1.0, epsilon = 1e-12);
    }

    #[test]
    fn sub_hourly_timestep_follows_clock_time() {
        let p = ProfileSpec::Solar {
            peak: 1.0,
            sunrise_hour: 6.0,
            sunset_hour: 18.0,
            noise_std: 0.0,
        };
        let s = p.generate(96, 0.25, 0, None).unwrap();
        assert_abs_diff_eq!(s[48], 1.0, epsilon = 1e-12);
        assert_eq!(s[23], 0.0);
    }

    #[test]
    fn ar1_profile_is_seeded_and_non_negative() {
        let p = ProfileSpec::Ar1 {
            mean: 7.0,
            alpha: 0.9,
            noise_std: 1.5,
        };
        let a = p.generate(500, 1.0, 42, None).unwrap();
        let b = p.generate(500, 1.0, 42, None).unwrap();
        let c = p.generate(500, 1.0, 43, None).unwrap();
        assert_eq!(a, b);
        assert_ne!(a, c);
        assert!(a.iter().all(|&v| v >= 0.0));
    }

    #[test]
    fn column_profile_needs_a_table() {
        let p = ProfileSpec::Column {
            name: "load".to_string(),
        };
        assert_eq!(
            p.generate(2, 1.0, 0, None),
            Err(ProfileError::MissingTable("load".to_string()))
        );
    }

    #[test]
    fn column_profile_reads_table() {
        let csv = "load,wind\n1.5,3\n2.5,4\n3.5,5\n";
        let table = TimeSeriesTable::from_reader(csv.as_bytes()).unwrap();
        let p = ProfileSpec::Column {
            name: "wind".to_string(),
        };
        assert_eq!(p.generate(2, 1.0, 0, Some(&table)).unwrap(), vec![3.0, 4.0]);
        assert!(matches!(
            p.generate(4, 1.0, 0, Some(&table)),
            Err(ProfileError::ColumnTooShort { expected: 4, actual: 3, .. })
        ));
        let missing = ProfileSpec::Column {
            name: "solar".to_string(),
        };
        assert!(matches!(
            missing.generate(1, 1.0, 0, Some(&table)),
            Err(ProfileError::UnknownColumn(_))
        ));
    }

    #[test]
    fn invalid_shapes_rejected() {
        let inverted = ProfileSpec::Solar {
            peak: 1.0,
            sunrise_hour: 18.0,
            sunset_hour: 6.0,
            noise_std: 0.0,
        };
        assert!(inverted.validate().is_err());
        let unstable = ProfileSpec::Ar1 {
            mean: 7.0,
            alpha: 1.2,
            noise_std: 1.0,
        };
        assert!(unstable.validate().is_err());
        let noisy = ProfileSpec::Daily {
            base: 1.0,
            amplitude: 0.0,
            phase_rad: 0.0,
            noise_std: -1.0,
        };
        assert!(noisy.validate().is_err());
    }
}
