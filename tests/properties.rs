//! Randomized invariant checks with seeded generators.

mod common;

use approx::{assert_abs_diff_eq, assert_relative_eq};
use rand::{Rng, SeedableRng, rngs::StdRng};

use common::random_microgrid;
use microgrid_sim::components::Project;
use microgrid_sim::economics::discount::discount_factor;
use microgrid_sim::economics::{CostFactors, CostInputs};
use microgrid_sim::sim::{TrajectoryRecorder, TrajectoryVar, dispatch, simulate_operation};

const EPS: f64 = 1e-9;

#[test]
fn dispatch_balances_within_bounds() {
    let mut rng = StdRng::seed_from_u64(42);
    for _ in 0..10_000 {
        let net = rng.random_range(-500.0..500.0);
        let charge_max = -rng.random_range(0.0..200.0);
        let discharge_max = rng.random_range(0.0..200.0);
        let gen_max = rng.random_range(0.0..300.0);
        let d = dispatch(net, charge_max, discharge_max, gen_max);

        assert_abs_diff_eq!(d.balance_kw(), net, epsilon = EPS);
        assert!((0.0..=gen_max).contains(&d.gen_kw), "{d:?}");
        assert!((charge_max..=discharge_max).contains(&d.storage_kw), "{d:?}");
        assert!(d.shed_kw >= 0.0 && d.spilled_kw >= 0.0, "{d:?}");
        assert!(d.shed_kw == 0.0 || d.spilled_kw == 0.0, "{d:?}");

        if net >= 0.0 {
            assert_eq!(d.spilled_kw, 0.0);
            assert!(d.storage_kw >= 0.0);
            // Generator only runs once storage is exhausted.
            if d.gen_kw > 0.0 {
                assert_abs_diff_eq!(d.storage_kw, discharge_max, epsilon = EPS);
            }
        } else {
            assert_eq!(d.gen_kw, 0.0);
            assert_eq!(d.shed_kw, 0.0);
            assert!(d.storage_kw <= 0.0);
        }
    }
}

#[test]
fn storage_energy_stays_within_bounds() {
    let mut rng = StdRng::seed_from_u64(1);
    for _ in 0..50 {
        let mg = random_microgrid(&mut rng, 200);
        let mut rec = TrajectoryRecorder::for_operation(mg.steps());
        simulate_operation(&mg, Some(&mut rec)).unwrap();

        let lo = mg.storage.energy_min() - 1e-6;
        let hi = mg.storage.energy_rated + 1e-6;
        for (k, &e) in rec.get(TrajectoryVar::StorageEnergy).unwrap().iter().enumerate() {
            assert!((lo..=hi).contains(&e), "step {k}: {e} outside [{lo}, {hi}]");
        }
    }
}

#[test]
fn storage_losses_reconcile_with_throughput() {
    let mut rng = StdRng::seed_from_u64(2);
    for _ in 0..50 {
        let mg = random_microgrid(&mut rng, 150);
        let stats = simulate_operation(&mg, None).unwrap();
        let throughput = stats.storage_char_energy + stats.storage_dis_energy;

        assert!(stats.storage_loss_energy >= -1e-6);
        assert_abs_diff_eq!(
            stats.storage_loss_energy,
            mg.storage.loss_factor * throughput,
            epsilon = 1e-6 * (1.0 + throughput)
        );
    }
}

#[test]
fn served_energy_matches_supply() {
    let mut rng = StdRng::seed_from_u64(3);
    for _ in 0..50 {
        let mg = random_microgrid(&mut rng, 120);
        let s = simulate_operation(&mg, None).unwrap();

        let supplied = s.gen_energy + s.storage_dis_energy - s.storage_char_energy + s.renew_energy;
        assert_abs_diff_eq!(s.served_energy, supplied, epsilon = 1e-6 * (1.0 + s.served_energy));
        assert_abs_diff_eq!(
            s.served_energy + s.shed_energy,
            mg.load_energy(),
            epsilon = 1e-6 * (1.0 + s.served_energy)
        );
        assert!(s.shed_max >= 0.0 && s.spilled_max >= 0.0);
    }
}

#[test]
fn zero_quantity_component_is_additive_identity() {
    let mut rng = StdRng::seed_from_u64(4);
    for _ in 0..200 {
        let project = Project::new(rng.random_range(1..40), rng.random_range(0.0..0.15), 1.0);
        let inputs = CostInputs {
            quantity: 0.0,
            investment_price: rng.random_range(0.0..5000.0),
            replacement_price: rng.random_range(0.0..5000.0),
            salvage_price: rng.random_range(0.0..5000.0),
            om_price: rng.random_range(0.0..100.0),
            lifetime: rng.random_range(0.5..50.0),
            ..CostInputs::default()
        };
        let zero = CostFactors::from_prices(&project, &inputs).unwrap();
        assert_eq!(zero.total, 0.0);

        let other = CostFactors::new(
            rng.random_range(0.0..1e6),
            rng.random_range(0.0..1e6),
            rng.random_range(0.0..1e5),
            rng.random_range(0.0..1e6),
            -rng.random_range(0.0..1e5),
        );
        assert_eq!(other + zero, other);
    }
}

#[test]
fn cost_factor_sums_ignore_order() {
    let mut rng = StdRng::seed_from_u64(6);
    let mut draw = || {
        CostFactors::new(
            rng.random_range(0.0..1e6),
            rng.random_range(0.0..1e6),
            rng.random_range(0.0..1e5),
            rng.random_range(0.0..1e6),
            -rng.random_range(0.0..1e5),
        )
    };
    for _ in 0..200 {
        let (a, b, c) = (draw(), draw(), draw());
        let left = (a + b) + c;
        let right = a + (b + c);
        let swapped = c + b + a;
        for (x, y) in left.as_row().iter().zip(right.as_row()) {
            assert_relative_eq!(*x, y, max_relative = 1e-12);
        }
        for (x, y) in left.as_row().iter().zip(swapped.as_row()) {
            assert_relative_eq!(*x, y, max_relative = 1e-12);
        }
        assert_eq!(a + b, b + a);
    }
}

#[test]
fn divisible_lifetime_leaves_no_salvage() {
    let mut rng = StdRng::seed_from_u64(5);
    for _ in 0..200 {
        let lifetime: u32 = rng.random_range(1..12);
        let units: u32 = rng.random_range(1..5);
        let project = Project::new(lifetime * units, rng.random_range(0.0..0.12), 1.0);
        let inputs = CostInputs {
            quantity: 10.0,
            investment_price: 100.0,
            replacement_price: 80.0,
            salvage_price: 50.0,
            lifetime: f64::from(lifetime),
            ..CostInputs::default()
        };
        let c = CostFactors::from_prices(&project, &inputs).unwrap();

        let rate = project.discount_rate;
        let replaced: f64 = (1..units)
            .map(|i| discount_factor(rate, f64::from(i * lifetime)))
            .sum();
        assert_relative_eq!(c.replacement, 800.0 * replaced, max_relative = 1e-12);
        assert_abs_diff_eq!(c.salvage, 0.0);
    }
}
