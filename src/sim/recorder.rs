//! Opt-in recording of per-instant trajectories.

use std::collections::BTreeMap;
use std::fmt;

/// Variables the simulator can record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum TrajectoryVar {
    /// Total renewable potential production (kW).
    RenewPotential,
    /// Generator output (kW).
    GenPower,
    /// Storage power, positive when discharging (kW).
    StoragePower,
    /// Stored energy at the start of each instant, plus the final value (kWh).
    StorageEnergy,
    /// Spilled renewable power (kW).
    SpilledPower,
    /// Shed load (kW).
    ShedPower,
}

impl TrajectoryVar {
    /// Every recordable variable, in export column order.
    pub const ALL: [Self; 6] = [
        Self::RenewPotential,
        Self::GenPower,
        Self::StoragePower,
        Self::StorageEnergy,
        Self::SpilledPower,
        Self::ShedPower,
    ];

    /// Column name used in exports.
    pub fn name(self) -> &'static str {
        match self {
            Self::RenewPotential => "renew_potential_kw",
            Self::GenPower => "gen_kw",
            Self::StoragePower => "storage_kw",
            Self::StorageEnergy => "storage_energy_kwh",
            Self::SpilledPower => "spilled_kw",
            Self::ShedPower => "shed_kw",
        }
    }

    /// Number of samples for a run of `steps` instants.
    ///
    /// Stored energy has one more sample than the powers: its final value.
    pub fn samples(self, steps: usize) -> usize {
        match self {
            Self::StorageEnergy => steps + 1,
            _ => steps,
        }
    }
}

impl fmt::Display for TrajectoryVar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Fixed-length numeric series, written only for the variables declared up front.
///
/// Writing a variable that was not declared is a no-op, so the simulator can
/// record unconditionally while callers choose what to keep.
///
/// # Examples
///
/// ```
/// use microgrid_sim::sim::recorder::{TrajectoryRecorder, TrajectoryVar};
///
/// let mut rec = TrajectoryRecorder::new();
/// rec.declare(TrajectoryVar::GenPower, 3);
/// rec.record(1, [(TrajectoryVar::GenPower, 5.0), (TrajectoryVar::ShedPower, 2.0)]);
/// assert_eq!(rec.get(TrajectoryVar::GenPower), Some(&[0.0, 5.0, 0.0][..]));
/// assert_eq!(rec.get(TrajectoryVar::ShedPower), None);
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TrajectoryRecorder {
    series: BTreeMap<TrajectoryVar, Vec<f64>>,
}

impl TrajectoryRecorder {
    /// Creates a recorder with nothing declared.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a recorder with every variable declared for a run of `steps` instants.
    pub fn for_operation(steps: usize) -> Self {
        let mut rec = Self::new();
        rec.declare_operation(steps);
        rec
    }

    /// Declares `var` as a zero-filled series of length `len`.
    ///
    /// Re-declaring a variable resets it.
    pub fn declare(&mut self, var: TrajectoryVar, len: usize) {
        self.series.insert(var, vec![0.0; len]);
    }

    /// Declares every variable with the lengths of a run of `steps` instants.
    pub fn declare_operation(&mut self, steps: usize) {
        for var in TrajectoryVar::ALL {
            self.declare(var, var.samples(steps));
        }
    }

    /// Whether `var` was declared.
    pub fn is_declared(&self, var: TrajectoryVar) -> bool {
        self.series.contains_key(&var)
    }

    /// Writes the values at `index` for each declared variable among `values`.
    ///
    /// # Panics
    ///
    /// Panics if `index` is past the end of a declared series.
    pub fn record(&mut self, index: usize, values: impl IntoIterator<Item = (TrajectoryVar, f64)>) {
        for (var, value) in values {
            if let Some(series) = self.series.get_mut(&var) {
                series[index] = value;
            }
        }
    }

    /// The recorded series of `var`, if declared.
    pub fn get(&self, var: TrajectoryVar) -> Option<&[f64]> {
        self.series.get(&var).map(Vec::as_slice)
    }

    /// Declared variables with their series, in [`TrajectoryVar::ALL`] order.
    pub fn iter(&self) -> impl Iterator<Item = (TrajectoryVar, &[f64])> {
        self.series.iter().map(|(var, s)| (*var, s.as_slice()))
    }
}
