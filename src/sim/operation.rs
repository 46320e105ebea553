//! Time-stepped operation of a microgrid under the load-following rule.

use tracing::{debug, warn};

use super::dispatch::dispatch;
use super::recorder::{TrajectoryRecorder, TrajectoryVar};
use super::stats::{OperationStats, RunTotals, StatsAccumulator};
use crate::components::Microgrid;
use crate::error::Result;

/// Total renewable potential (kW) at each instant, summed over all sources.
fn renewable_potential(microgrid: &Microgrid) -> Vec<f64> {
    let mut total = vec![0.0; microgrid.steps()];
    for source in microgrid.nondispatchables.values() {
        for (acc, p) in total.iter_mut().zip(source.production()) {
            *acc += p;
        }
    }
    total
}

/// Simulates the operation of `microgrid` over its whole load series.
///
/// The model is validated first. At each instant the storage power limits
/// are derived from the stored energy, the [`dispatch`] rule picks the
/// set-points, the storage energy is advanced, and the decision is folded
/// into the statistics. When a recorder is given, every variable it declared
/// is filled along the way.
///
/// # Arguments
///
/// * `microgrid` - Model to simulate (not modified)
/// * `recorder` - Optional trajectory sink, see [`TrajectoryRecorder::declare_operation`]
///
/// # Errors
///
/// Returns a [`crate::MicrogridError`] if the model fails validation.
///
/// # Panics
///
/// Panics if the recorder declared a variable shorter than the run.
pub fn simulate_operation(
    microgrid: &Microgrid,
    mut recorder: Option<&mut TrajectoryRecorder>,
) -> Result<OperationStats> {
    microgrid.validate()?;

    let dt = microgrid.project.timestep;
    let generator = &microgrid.generator;
    let storage = &microgrid.storage;
    let potential = renewable_potential(microgrid);
    debug!(
        steps = microgrid.steps(),
        sources = microgrid.nondispatchables.len(),
        dt,
        "simulating operation"
    );

    let energy_initial = storage.energy_initial();
    let mut energy = energy_initial;
    let mut acc = StatsAccumulator::default();

    for (k, (&load, &renew)) in microgrid.load.iter().zip(&potential).enumerate() {
        let (charge_max, discharge_max) = storage.power_limits(energy, dt);
        let d = dispatch(load - renew, charge_max, discharge_max, generator.power_rated);

        if let Some(rec) = recorder.as_deref_mut() {
            rec.record(
                k,
                [
                    (TrajectoryVar::RenewPotential, renew),
                    (TrajectoryVar::GenPower, d.gen_kw),
                    (TrajectoryVar::StoragePower, d.storage_kw),
                    (TrajectoryVar::StorageEnergy, energy),
                    (TrajectoryVar::SpilledPower, d.spilled_kw),
                    (TrajectoryVar::ShedPower, d.shed_kw),
                ],
            );
        }

        energy = storage.next_energy(energy, d.storage_kw, dt);
        acc.fold(&d, generator.fuel_rate(d.gen_kw), dt);
    }

    if let Some(rec) = recorder {
        rec.record(microgrid.steps(), [(TrajectoryVar::StorageEnergy, energy)]);
    }

    let stats = acc.finish(RunTotals {
        load_energy: microgrid.load_energy(),
        renew_potential_energy: potential.iter().sum::<f64>() * dt,
        storage_energy_initial: energy_initial,
        storage_energy_final: energy,
        storage_energy_rated: storage.energy_rated,
    });

    if stats.served_energy == 0.0 {
        warn!("no load energy served, renewable rate is reported as infinite");
    }
    debug!(
        served_kwh = stats.served_energy,
        shed_kwh = stats.shed_energy,
        gen_kwh = stats.gen_energy,
        spilled_kwh = stats.spilled_energy,
        "operation simulated"
    );
    Ok(stats)
}
