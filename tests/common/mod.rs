//! Shared test fixtures for integration tests.
#![allow(dead_code)]

use rand::{Rng, rngs::StdRng};

use microgrid_sim::components::{
    Battery, DispatchableGenerator, Microgrid, Photovoltaic, Project, SourcePricing, WindPower,
};

/// Default project (25 years, 5% discount rate, 1 h timestep).
pub fn default_project() -> Project {
    Project::default()
}

/// Diesel generator (0.24 L/kWh, no intercept, 1 $/L, 400 $/kW, 15000 h).
pub fn diesel(power_rated: f64) -> DispatchableGenerator {
    DispatchableGenerator::new(power_rated, 0.0, 0.24, 1.0, 400.0, 0.02, 15_000.0)
}

/// Li-ion battery (350 $/kWh, 10 $/kWh/yr, 15 years, 3000 cycles, 5% loss).
pub fn battery(energy_rated: f64) -> Battery {
    Battery::new(energy_rated, 350.0, 10.0, 15.0, 3000.0)
}

/// Solar PV plant without derating (1200 $/kW, 20 $/kW/yr, 25 years).
pub fn pv(power_rated: f64, irradiance: Vec<f64>) -> Photovoltaic {
    Photovoltaic::new(power_rated, irradiance, SourcePricing::new(1200.0, 20.0, 25.0))
        .with_derating_factor(1.0)
}

/// Wind farm (3500 $/kW, 100 $/kW/yr, 25 years).
pub fn wind(power_rated: f64, capacity_factor: Vec<f64>) -> WindPower {
    WindPower::new(power_rated, capacity_factor, SourcePricing::new(3500.0, 100.0, 25.0))
}

/// Half-sine irradiance between 6:00 and 18:00, hourly samples.
pub fn clear_sky(steps: usize) -> Vec<f64> {
    (0..steps)
        .map(|k| {
            let h = (k % 24) as f64;
            if (6.0..18.0).contains(&h) {
                (std::f64::consts::PI * (h - 6.0) / 12.0).sin()
            } else {
                0.0
            }
        })
        .collect()
}

/// Uniform random series in `[lo, hi)`.
pub fn random_series(rng: &mut StdRng, steps: usize, lo: f64, hi: f64) -> Vec<f64> {
    (0..steps).map(|_| rng.random_range(lo..hi)).collect()
}

/// Microgrid with random sizes, storage parameters and time series.
pub fn random_microgrid(rng: &mut StdRng, steps: usize) -> Microgrid {
    let timestep = [0.25, 0.5, 1.0][rng.random_range(0..3)];
    let project = Project::new(rng.random_range(5..30), rng.random_range(0.0..0.1), timestep);

    let mut storage = battery(rng.random_range(0.0..500.0));
    storage.charge_rate = rng.random_range(0.1..2.0);
    storage.discharge_rate = rng.random_range(0.1..2.0);
    storage.loss_factor = rng.random_range(0.0..0.2);
    storage.soc_min = rng.random_range(0.0..0.4);
    storage.soc_ini = rng.random_range(storage.soc_min..=1.0);

    let load = random_series(rng, steps, 0.0, 200.0);
    let irradiance = random_series(rng, steps, 0.0, 1.0);
    let cf = random_series(rng, steps, 0.0, 1.0);

    Microgrid::new(project, load, diesel(rng.random_range(0.0..200.0)), storage)
        .with_source("PV", pv(rng.random_range(0.0..300.0), irradiance))
        .with_source("Wind", wind(rng.random_range(0.0..150.0), cf))
}
