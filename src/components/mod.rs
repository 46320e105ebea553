//! Component descriptions of a microgrid: plain records validated once per run.

pub mod battery;
pub mod generator;
pub mod microgrid;
pub mod nondispatchable;
pub mod project;

pub use battery::Battery;
pub use generator::DispatchableGenerator;
pub use microgrid::Microgrid;
pub use nondispatchable::{NonDispatchable, Photovoltaic, PowerCurve, SourcePricing, WindPower};
pub use project::Project;

use crate::error::{Result, ensure_finite};

/// Default replacement and salvage price ratio: the full investment price.
pub(crate) fn default_price_ratio() -> f64 {
    1.0
}

pub(crate) fn validate_price_ratios(prefix: &str, replacement: f64, salvage: f64) -> Result<()> {
    ensure_finite(&format!("{prefix}.replacement_price_ratio"), replacement)?;
    ensure_finite(&format!("{prefix}.salvage_price_ratio"), salvage)
}
