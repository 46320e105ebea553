//! Economic evaluation of a simulated microgrid: NPC and LCOE.

use indexmap::IndexMap;
use serde::Serialize;
use tracing::{debug, warn};

use super::cost_factors::{CostFactors, CostInputs};
use super::discount::capital_recovery_factor;
use crate::components::{Battery, DispatchableGenerator, Microgrid, NonDispatchable, Project};
use crate::error::Result;
use crate::sim::OperationStats;

/// Column labels of [`MicrogridCosts::costs_table`].
pub const COST_COLUMNS: [&str; 6] = ["Investment", "Replacement", "O&M", "Fuel", "Salvage", "Total"];

/// Label of the system total row in [`MicrogridCosts::costs_table`].
pub const SYSTEM_ROW: &str = "All components";

/// Economic results of a microgrid over its project lifetime.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MicrogridCosts {
    /// Levelized cost of electricity (currency / kWh served), `+inf` if nothing is served.
    pub lcoe: f64,
    /// Net present cost of the whole system.
    pub npc: f64,
    /// Currency label of all amounts.
    pub currency: String,
    /// Component-wise sum of every breakdown below.
    pub system: CostFactors,
    /// Dispatchable generator costs.
    pub generator: CostFactors,
    /// Storage costs.
    pub storage: CostFactors,
    /// Costs of each non-dispatchable source, in model order.
    pub nondispatchables: IndexMap<String, CostFactors>,
}

/// Labelled rows of cost breakdowns, one column per [`COST_COLUMNS`] entry.
#[derive(Debug, Clone, PartialEq)]
pub struct CostTable {
    /// Row labels: components, then [`SYSTEM_ROW`].
    pub rows: Vec<String>,
    /// One `[investment, replacement, om, fuel, salvage, total]` row per label.
    pub values: Vec<[f64; 6]>,
}

fn generator_costs(
    project: &Project,
    generator: &DispatchableGenerator,
    stats: &OperationStats,
) -> Result<CostFactors> {
    CostFactors::from_prices(
        project,
        &CostInputs {
            quantity: generator.power_rated,
            investment_price: generator.investment_price,
            replacement_price: generator.investment_price * generator.replacement_price_ratio,
            salvage_price: generator.investment_price * generator.salvage_price_ratio,
            om_price: generator.om_price_hours * stats.gen_hours,
            lifetime: generator.lifetime(stats.gen_hours),
            fuel_consumption: stats.gen_fuel,
            fuel_price: generator.fuel_price,
        },
    )
}

fn storage_costs(project: &Project, storage: &Battery, stats: &OperationStats) -> Result<CostFactors> {
    CostFactors::from_prices(
        project,
        &CostInputs {
            quantity: storage.energy_rated,
            investment_price: storage.investment_price,
            replacement_price: storage.investment_price * storage.replacement_price_ratio,
            salvage_price: storage.investment_price * storage.salvage_price_ratio,
            om_price: storage.om_price,
            lifetime: storage.lifetime(stats.storage_cycles),
            ..CostInputs::default()
        },
    )
}

fn source_costs(project: &Project, source: &dyn NonDispatchable) -> Result<CostFactors> {
    let pricing = source.pricing();
    CostFactors::from_prices(
        project,
        &CostInputs {
            quantity: source.power_rated(),
            investment_price: pricing.investment_price,
            replacement_price: pricing.investment_price * pricing.replacement_price_ratio,
            salvage_price: pricing.investment_price * pricing.salvage_price_ratio,
            om_price: pricing.om_price,
            lifetime: pricing.lifetime,
            ..CostInputs::default()
        },
    )
}

/// Evaluates the costs of `microgrid` given the statistics of its simulated operation.
///
/// The generator O&M is charged per operating hour and its lifetime derives
/// from those hours; the storage lifetime derives from the cycle count.
/// Sizing quantities are rated power (generator, sources) and rated energy
/// (storage).
///
/// # Errors
///
/// Returns a [`crate::MicrogridError`] if a component lifetime is invalid or
/// implies an unrepresentable number of replacements.
pub fn evaluate(microgrid: &Microgrid, stats: &OperationStats) -> Result<MicrogridCosts> {
    let project = &microgrid.project;
    let generator = generator_costs(project, &microgrid.generator, stats)?;
    let storage = storage_costs(project, &microgrid.storage, stats)?;
    let nondispatchables = microgrid
        .nondispatchables
        .iter()
        .map(|(name, source)| Ok((name.clone(), source_costs(project, source.as_ref())?)))
        .collect::<Result<IndexMap<_, _>>>()?;

    let system = generator + storage + nondispatchables.values().sum::<CostFactors>();
    let npc = system.total;
    let lcoe = if stats.served_energy == 0.0 {
        warn!("no energy served, LCOE is reported as infinite");
        f64::INFINITY
    } else {
        npc * capital_recovery_factor(project) / stats.served_energy
    };
    debug!(npc, lcoe, "costs evaluated");

    Ok(MicrogridCosts {
        lcoe,
        npc,
        currency: project.currency.clone(),
        system,
        generator,
        storage,
        nondispatchables,
    })
}

impl MicrogridCosts {
    /// Tabular view: generator, storage, each source, then the system total.
    pub fn costs_table(&self) -> CostTable {
        let mut rows = vec!["Generator".to_string(), "Storage".to_string()];
        let mut values = vec![self.generator.as_row(), self.storage.as_row()];
        for (name, costs) in &self.nondispatchables {
            rows.push(name.clone());
            values.push(costs.as_row());
        }
        rows.push(SYSTEM_ROW.to_string());
        values.push(self.system.as_row());
        CostTable { rows, values }
    }
}
