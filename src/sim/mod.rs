//! Operation simulation: dispatch rule, time loop, statistics and trajectories.

pub mod dispatch;
pub mod operation;
pub mod recorder;
pub mod stats;

pub use dispatch::{Dispatch, dispatch};
pub use operation::simulate_operation;
pub use recorder::{TrajectoryRecorder, TrajectoryVar};
pub use stats::OperationStats;
