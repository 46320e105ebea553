//! Economic evaluation: discounting, component cost breakdowns, NPC and LCOE.

pub mod cost_factors;
pub mod costs;
pub mod discount;

pub use cost_factors::{CostFactors, CostInputs};
pub use costs::{CostTable, MicrogridCosts, evaluate};
pub use discount::{ReplacementSchedule, annuity_factor, capital_recovery_factor};
