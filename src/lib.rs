//! Technical and economic simulation of islanded microgrids.
//!
//! A [`Microgrid`] combines a load series, a dispatchable generator, an
//! energy storage and any number of non-dispatchable sources. Its operation
//! is simulated with a load-following rule ([`sim`]), then its costs are
//! evaluated over the project lifetime ([`economics`]).

pub mod components;
pub mod config;
pub mod economics;
pub mod error;
pub mod io;
pub mod logging;
pub mod profiles;
pub mod reporting;
/// Dispatch rule, time loop, statistics and trajectory recording.
pub mod sim;

pub use components::Microgrid;
pub use economics::MicrogridCosts;
pub use error::{MicrogridError, Result};
pub use sim::{OperationStats, TrajectoryRecorder};

/// Simulates the operation of `microgrid`, then evaluates its costs.
///
/// # Errors
///
/// Returns a [`MicrogridError`] if the model is invalid.
pub fn simulate(
    microgrid: &Microgrid,
    recorder: Option<&mut TrajectoryRecorder>,
) -> Result<(OperationStats, MicrogridCosts)> {
    let stats = sim::simulate_operation(microgrid, recorder)?;
    let costs = economics::evaluate(microgrid, &stats)?;
    Ok((stats, costs))
}
