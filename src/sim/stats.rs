//! Aggregate operation statistics and their per-instant accumulation.

use std::fmt;

use serde::Serialize;

use super::dispatch::Dispatch;

/// Aggregate energy statistics of one simulation run.
///
/// Energies are in kWh, powers in kW, durations in hours. Ratios whose
/// denominator is zero are `f64::INFINITY` (e.g. `shed_rate` with no load,
/// `storage_cycles` with zero rated storage).
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct OperationStats {
    /// Load energy actually served.
    pub served_energy: f64,
    /// Load energy shed.
    pub shed_energy: f64,
    /// Largest shed power.
    pub shed_max: f64,
    /// Total duration with some load shed.
    pub shed_hours: f64,
    /// Longest uninterrupted shedding duration.
    pub shed_duration_max: f64,
    /// Shed energy over desired load energy.
    pub shed_rate: f64,
    /// Generator energy.
    pub gen_energy: f64,
    /// Generator operating hours (`P > 0`).
    pub gen_hours: f64,
    /// Fuel consumed (fuel unit).
    pub gen_fuel: f64,
    /// Equivalent full storage cycles.
    pub storage_cycles: f64,
    /// Energy sent into storage.
    pub storage_char_energy: f64,
    /// Energy drawn from storage.
    pub storage_dis_energy: f64,
    /// Energy dissipated by storage losses.
    pub storage_loss_energy: f64,
    /// Renewable energy spilled.
    pub spilled_energy: f64,
    /// Largest spilled power.
    pub spilled_max: f64,
    /// Spilled energy over renewable potential energy.
    pub spilled_rate: f64,
    /// Renewable energy that could have been produced.
    pub renew_potential_energy: f64,
    /// Renewable energy actually used.
    pub renew_energy: f64,
    /// Share of served energy not coming from the generator.
    pub renew_rate: f64,
}

/// `num / den`, or `f64::INFINITY` when `den` is zero.
pub(crate) fn ratio_or_inf(num: f64, den: f64) -> f64 {
    if den == 0.0 { f64::INFINITY } else { num / den }
}

/// Running sums folded over the simulation loop.
#[derive(Debug, Default)]
pub(crate) struct StatsAccumulator {
    shed_energy: f64,
    shed_max: f64,
    shed_hours: f64,
    shed_duration: f64,
    shed_duration_max: f64,
    gen_energy: f64,
    gen_hours: f64,
    gen_fuel: f64,
    storage_char_energy: f64,
    storage_dis_energy: f64,
    spilled_energy: f64,
    spilled_max: f64,
}

/// Totals that do not depend on the dispatch decisions.
#[derive(Debug, Clone, Copy)]
pub(crate) struct RunTotals {
    pub load_energy: f64,
    pub renew_potential_energy: f64,
    pub storage_energy_initial: f64,
    pub storage_energy_final: f64,
    pub storage_energy_rated: f64,
}

impl StatsAccumulator {
    /// Folds one instant's decision.
    ///
    /// `fuel_rate` is the generator fuel consumption per hour at `d.gen_kw`.
    pub fn fold(&mut self, d: &Dispatch, fuel_rate: f64, dt: f64) {
        if d.shed_kw > 0.0 {
            self.shed_energy += d.shed_kw * dt;
            self.shed_max = self.shed_max.max(d.shed_kw);
            self.shed_hours += dt;
            self.shed_duration += dt;
            self.shed_duration_max = self.shed_duration_max.max(self.shed_duration);
        } else {
            self.shed_duration = 0.0;
        }

        if d.gen_kw > 0.0 {
            self.gen_energy += d.gen_kw * dt;
            self.gen_hours += dt;
            self.gen_fuel += fuel_rate * dt;
        }

        if d.storage_kw > 0.0 {
            self.storage_dis_energy += d.storage_kw * dt;
        } else {
            self.storage_char_energy -= d.storage_kw * dt;
        }

        self.spilled_energy += d.spilled_kw * dt;
        self.spilled_max = self.spilled_max.max(d.spilled_kw);
    }

    /// Derives the final statistics once the loop is over.
    pub fn finish(self, totals: RunTotals) -> OperationStats {
        let served_energy = totals.load_energy - self.shed_energy;
        let storage_loss_energy = self.storage_char_energy
            - self.storage_dis_energy
            - (totals.storage_energy_final - totals.storage_energy_initial);
        let storage_cycles = ratio_or_inf(
            self.storage_char_energy + self.storage_dis_energy,
            2.0 * totals.storage_energy_rated,
        );
        let renew_energy = totals.renew_potential_energy - self.spilled_energy;
        let renew_rate = if served_energy == 0.0 {
            f64::INFINITY
        } else {
            1.0 - self.gen_energy / served_energy
        };

        OperationStats {
            served_energy,
            shed_energy: self.shed_energy,
            shed_max: self.shed_max,
            shed_hours: self.shed_hours,
            shed_duration_max: self.shed_duration_max,
            shed_rate: ratio_or_inf(self.shed_energy, totals.load_energy),
            gen_energy: self.gen_energy,
            gen_hours: self.gen_hours,
            gen_fuel: self.gen_fuel,
            storage_cycles,
            storage_char_energy: self.storage_char_energy,
            storage_dis_energy: self.storage_dis_energy,
            storage_loss_energy,
            spilled_energy: self.spilled_energy,
            spilled_max: self.spilled_max,
            spilled_rate: ratio_or_inf(self.spilled_energy, totals.renew_potential_energy),
            renew_potential_energy: totals.renew_potential_energy,
            renew_energy,
            renew_rate,
        }
    }
}

impl fmt::Display for OperationStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "--- Operation statistics ---")?;
        writeln!(f, "Served energy:         {:.1} kWh", self.served_energy)?;
        writeln!(
            f,
            "Shed energy:           {:.1} kWh ({:.3}% of load)",
            self.shed_energy,
            100.0 * self.shed_rate
        )?;
        writeln!(
            f,
            "Shedding:              max {:.1} kW, {:.1} h total, {:.1} h longest",
            self.shed_max, self.shed_hours, self.shed_duration_max
        )?;
        writeln!(
            f,
            "Generator energy:      {:.1} kWh over {:.1} h",
            self.gen_energy, self.gen_hours
        )?;
        writeln!(f, "Generator fuel:        {:.1}", self.gen_fuel)?;
        writeln!(
            f,
            "Storage throughput:    {:.1} kWh in, {:.1} kWh out ({:.1} cycles)",
            self.storage_char_energy, self.storage_dis_energy, self.storage_cycles
        )?;
        writeln!(f, "Storage losses:        {:.1} kWh", self.storage_loss_energy)?;
        writeln!(
            f,
            "Renewable potential:   {:.1} kWh",
            self.renew_potential_energy
        )?;
        writeln!(
            f,
            "Spilled energy:        {:.1} kWh ({:.2}% of potential)",
            self.spilled_energy,
            100.0 * self.spilled_rate
        )?;
        write!(f, "Renewable rate:        {:.2}%", 100.0 * self.renew_rate)
    }
}
