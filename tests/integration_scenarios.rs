//! End-to-end runs of hand-built microgrids through simulation and costing.

mod common;

use approx::{assert_abs_diff_eq, assert_relative_eq};
use rand::{SeedableRng, rngs::StdRng};

use common::*;
use microgrid_sim::components::{Battery, Microgrid, Project};
use microgrid_sim::economics::annuity_factor;
use microgrid_sim::sim::{TrajectoryRecorder, TrajectoryVar};
use microgrid_sim::simulate;

const HOURS_PER_YEAR: usize = 8760;

#[test]
fn diesel_only_flat_load_over_one_year() {
    let mg = Microgrid::new(
        default_project(),
        vec![100.0; HOURS_PER_YEAR],
        diesel(150.0),
        battery(0.0),
    );
    let (stats, costs) = simulate(&mg, None).unwrap();

    assert_abs_diff_eq!(stats.gen_hours, 8760.0);
    assert_abs_diff_eq!(stats.gen_energy, 876_000.0, epsilon = 1e-6);
    assert_abs_diff_eq!(stats.gen_fuel, 210_240.0, epsilon = 1e-6);
    assert_abs_diff_eq!(stats.served_energy, 876_000.0, epsilon = 1e-6);
    assert_eq!(stats.shed_energy, 0.0);
    assert_eq!(stats.spilled_energy, 0.0);
    assert_eq!(stats.renew_rate, 0.0);

    let annuity = annuity_factor(&mg.project);
    assert_relative_eq!(costs.generator.fuel, 210_240.0 * annuity, max_relative = 1e-12);
    assert_abs_diff_eq!(costs.generator.investment, 150.0 * 400.0, epsilon = 1e-9);
    // 15000 h at 8760 h/yr wears out the generator several times in 25 years.
    assert!(costs.generator.replacement > 0.0);
    assert_abs_diff_eq!(costs.npc, costs.system.total, epsilon = 1e-6);
    assert!(costs.lcoe.is_finite() && costs.lcoe > 0.0);
}

#[test]
fn without_storage_surplus_is_spilled() {
    let mut rng = StdRng::seed_from_u64(7);
    let steps = 500;
    let load = random_series(&mut rng, steps, 0.0, 100.0);
    let irradiance = random_series(&mut rng, steps, 0.0, 1.0);
    let mg = Microgrid::new(default_project(), load.clone(), diesel(120.0), battery(0.0))
        .with_source("PV", pv(150.0, irradiance.clone()));

    let mut rec = TrajectoryRecorder::for_operation(steps);
    simulate(&mg, Some(&mut rec)).unwrap();

    let storage = rec.get(TrajectoryVar::StoragePower).unwrap();
    let spilled = rec.get(TrajectoryVar::SpilledPower).unwrap();
    for k in 0..steps {
        let renew = 150.0 * irradiance[k];
        assert_eq!(storage[k], 0.0, "step {k}");
        assert_abs_diff_eq!(spilled[k], (renew - load[k]).max(0.0), epsilon = 1e-9);
    }
}

#[test]
fn pv_battery_diesel_energy_balance() {
    let steps = 24 * 14;
    let load: Vec<f64> = (0..steps)
        .map(|k| 80.0 + 30.0 * ((k % 24) as f64 / 24.0 * std::f64::consts::TAU).cos())
        .collect();
    let mg = Microgrid::new(default_project(), load, diesel(100.0), battery(400.0))
        .with_source("PV", pv(250.0, clear_sky(steps)));

    let (stats, costs) = simulate(&mg, None).unwrap();

    let supplied = stats.gen_energy + stats.storage_dis_energy - stats.storage_char_energy
        + stats.renew_energy;
    assert_relative_eq!(stats.served_energy, supplied, max_relative = 1e-9);
    assert_abs_diff_eq!(
        stats.renew_energy,
        stats.renew_potential_energy - stats.spilled_energy,
        epsilon = 1e-6
    );
    assert!(stats.renew_rate > 0.0 && stats.renew_rate < 1.0);
    assert!(stats.storage_cycles > 0.0);
    assert!(stats.storage_loss_energy >= -1e-9);
    assert!(costs.storage.total > 0.0);
    assert!(costs.nondispatchables["PV"].total > 0.0);
}

#[test]
fn renewables_reduce_fuel_use() {
    let steps = 24 * 7;
    let load = vec![60.0; steps];
    let base = Microgrid::new(default_project(), load.clone(), diesel(80.0), battery(0.0));
    let hybrid = Microgrid::new(default_project(), load, diesel(80.0), battery(200.0))
        .with_source("PV", pv(120.0, clear_sky(steps)));

    let (base_stats, _) = simulate(&base, None).unwrap();
    let (hybrid_stats, _) = simulate(&hybrid, None).unwrap();
    assert!(hybrid_stats.gen_fuel < base_stats.gen_fuel);
    assert!(hybrid_stats.gen_hours <= base_stats.gen_hours);
}

/// Hybrid microgrid with every price multiplied by `scale`.
fn priced_microgrid(scale: f64) -> Microgrid {
    let steps = 24 * 10;
    let load = random_series(&mut StdRng::seed_from_u64(11), steps, 20.0, 120.0);
    let cf = random_series(&mut StdRng::seed_from_u64(12), steps, 0.0, 1.0);

    let mut generator = diesel(100.0);
    generator.investment_price *= scale;
    generator.om_price_hours *= scale;
    generator.fuel_price *= scale;
    let mut storage = battery(300.0);
    storage.investment_price *= scale;
    storage.om_price *= scale;
    let mut solar = pv(150.0, clear_sky(steps));
    solar.pricing.investment_price *= scale;
    solar.pricing.om_price *= scale;
    let mut farm = wind(80.0, cf);
    farm.pricing.investment_price *= scale;
    farm.pricing.om_price *= scale;

    Microgrid::new(default_project(), load, generator, storage)
        .with_source("PV", solar)
        .with_source("Wind", farm)
}

#[test]
fn lcoe_scales_linearly_with_prices() {
    let (stats, costs) = simulate(&priced_microgrid(1.0), None).unwrap();
    let (scaled_stats, scaled_costs) = simulate(&priced_microgrid(2.0), None).unwrap();

    assert_eq!(stats, scaled_stats);
    assert_relative_eq!(scaled_costs.npc, 2.0 * costs.npc, max_relative = 1e-9);
    assert_relative_eq!(scaled_costs.lcoe, 2.0 * costs.lcoe, max_relative = 1e-9);
    for (name, factors) in &costs.nondispatchables {
        assert_relative_eq!(
            scaled_costs.nondispatchables[name].total,
            2.0 * factors.total,
            max_relative = 1e-9
        );
    }
}

#[test]
fn simulation_is_deterministic() {
    let mg = random_microgrid(&mut StdRng::seed_from_u64(3), 300);
    let mut rec_a = TrajectoryRecorder::for_operation(300);
    let mut rec_b = TrajectoryRecorder::for_operation(300);
    let a = simulate(&mg, Some(&mut rec_a)).unwrap();
    let b = simulate(&mg, Some(&mut rec_b)).unwrap();
    assert_eq!(a, b);
    assert_eq!(rec_a, rec_b);
}

#[test]
fn parallel_runs_match_sequential_runs() {
    let grids: Vec<Microgrid> = (0..4)
        .map(|seed| random_microgrid(&mut StdRng::seed_from_u64(seed), 240))
        .collect();
    let sequential: Vec<_> = grids.iter().map(|mg| simulate(mg, None).unwrap()).collect();

    let parallel: Vec<_> = std::thread::scope(|s| {
        let handles: Vec<_> = grids
            .iter()
            .map(|mg| s.spawn(move || simulate(mg, None).unwrap()))
            .collect();
        handles.into_iter().map(|h| h.join().unwrap()).collect()
    });
    assert_eq!(sequential, parallel);
}

#[test]
fn recorded_trajectories_integrate_to_stats() {
    let project = Project::new(20, 0.06, 0.5);
    let steps = 96;
    let storage = Battery {
        soc_ini: 0.5,
        ..battery(150.0)
    };
    let cf = random_series(&mut StdRng::seed_from_u64(5), steps, 0.0, 1.0);
    let mg = Microgrid::new(project, vec![70.0; steps], diesel(50.0), storage)
        .with_source("Wind", wind(120.0, cf));

    let mut rec = TrajectoryRecorder::for_operation(steps);
    let (stats, _) = simulate(&mg, Some(&mut rec)).unwrap();
    let integral = |var| rec.get(var).unwrap().iter().sum::<f64>() * 0.5;

    assert_relative_eq!(integral(TrajectoryVar::GenPower), stats.gen_energy, max_relative = 1e-9);
    assert_relative_eq!(
        integral(TrajectoryVar::RenewPotential),
        stats.renew_potential_energy,
        max_relative = 1e-9
    );
    assert_abs_diff_eq!(integral(TrajectoryVar::ShedPower), stats.shed_energy, epsilon = 1e-9);
    assert_abs_diff_eq!(integral(TrajectoryVar::SpilledPower), stats.spilled_energy, epsilon = 1e-9);

    let energy = rec.get(TrajectoryVar::StorageEnergy).unwrap();
    assert_eq!(energy.len(), steps + 1);
    assert_abs_diff_eq!(energy[0], 75.0);
}
