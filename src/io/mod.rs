//! File input and output: CSV time series in, trajectories and cost tables out.

pub mod export;
pub mod timeseries;
