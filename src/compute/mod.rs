//! Data shaping kept off the interactive thread.
//!
//! `jobs` holds the pure transforms; `channel` moves them onto the worker
//! pool when one is available and runs them inline otherwise. Both paths
//! produce identical results.

mod channel;
mod jobs;

pub use channel::{ComputeChannel, ExecutionMode, JobHandle, WorkerJob};
pub use jobs::{
    AggregateSummary, ComputeJob, ComputeOutput, ScenarioMultipliers, ScenarioSet, ScenarioView,
    aggregate, cagr, growth_rates, shape_scenarios, smooth,
};
