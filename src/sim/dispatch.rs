//! Load-following dispatch rule for one instant.

/// Power set-points chosen for one instant (all kW).
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Dispatch {
    /// Generator output, in `[0, gen_max]`.
    pub gen_kw: f64,
    /// Storage power, positive when discharging, in `[charge_max, discharge_max]`.
    pub storage_kw: f64,
    /// Renewable production spilled (curtailed), `>= 0`.
    pub spilled_kw: f64,
    /// Load shed, `>= 0`.
    pub shed_kw: f64,
}

impl Dispatch {
    /// Net load reconstructed from the set-points.
    ///
    /// Equals the net load the decision was made for (power balance).
    pub fn balance_kw(&self) -> f64 {
        self.gen_kw + self.storage_kw + self.shed_kw - self.spilled_kw
    }
}

/// Chooses the set-points that serve `net_load_kw` (load minus renewables).
///
/// With a deficit, storage discharges first, then the generator runs, and
/// whatever remains is shed. With a surplus, the generator is off, storage
/// absorbs what it can and the rest is spilled.
///
/// # Arguments
///
/// * `net_load_kw` - Load minus renewable potential (kW)
/// * `storage_charge_max_kw` - Most negative admissible storage power (`<= 0`)
/// * `storage_discharge_max_kw` - Largest admissible storage power (`>= 0`)
/// * `gen_max_kw` - Generator rated power (`>= 0`)
///
/// # Returns
///
/// A [`Dispatch`] satisfying `gen + storage + shed - spilled == net_load`,
/// with at most one of `shed_kw` and `spilled_kw` non-zero.
pub fn dispatch(
    net_load_kw: f64,
    storage_charge_max_kw: f64,
    storage_discharge_max_kw: f64,
    gen_max_kw: f64,
) -> Dispatch {
    if net_load_kw >= 0.0 {
        let storage_kw = net_load_kw.min(storage_discharge_max_kw);
        let residual = net_load_kw - storage_kw;
        let gen_kw = residual.min(gen_max_kw);
        Dispatch {
            gen_kw,
            storage_kw,
            spilled_kw: 0.0,
            shed_kw: residual - gen_kw,
        }
    } else {
        let storage_kw = net_load_kw.max(storage_charge_max_kw);
        Dispatch {
            gen_kw: 0.0,
            storage_kw,
            spilled_kw: storage_kw - net_load_kw,
            shed_kw: 0.0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn deficit_served_by_storage_first() {
        let d = dispatch(30.0, -50.0, 40.0, 100.0);
        assert_eq!(
            d,
            Dispatch {
                gen_kw: 0.0,
                storage_kw: 30.0,
                spilled_kw: 0.0,
                shed_kw: 0.0
            }
        );
    }

    #[test]
    fn generator_covers_remainder_after_storage() {
        let d = dispatch(100.0, -50.0, 40.0, 100.0);
        assert_eq!(d.storage_kw, 40.0);
        assert_eq!(d.gen_kw, 60.0);
        assert_eq!(d.shed_kw, 0.0);
    }

    #[test]
    fn shortfall_is_shed() {
        let d = dispatch(200.0, -50.0, 40.0, 100.0);
        assert_eq!(d.storage_kw, 40.0);
        assert_eq!(d.gen_kw, 100.0);
        assert_eq!(d.shed_kw, 60.0);
        assert_eq!(d.spilled_kw, 0.0);
    }

    #[test]
    fn surplus_charges_then_spills() {
        let d = dispatch(-80.0, -50.0, 40.0, 100.0);
        assert_eq!(d.gen_kw, 0.0);
        assert_eq!(d.storage_kw, -50.0);
        assert_eq!(d.spilled_kw, 30.0);
        assert_eq!(d.shed_kw, 0.0);
    }

    #[test]
    fn small_surplus_fully_absorbed() {
        let d = dispatch(-20.0, -50.0, 40.0, 100.0);
        assert_eq!(d.storage_kw, -20.0);
        assert_eq!(d.spilled_kw, 0.0);
    }

    #[test]
    fn zero_net_load_is_idle() {
        assert_eq!(dispatch(0.0, -50.0, 40.0, 100.0), Dispatch::default());
    }

    #[test]
    fn balance_holds_for_all_branches() {
        for net in [-200.0, -30.0, 0.0, 25.0, 120.0, 500.0] {
            let d = dispatch(net, -60.0, 45.0, 150.0);
            assert_abs_diff_eq!(d.balance_kw(), net, epsilon = 1e-9);
        }
    }
}
