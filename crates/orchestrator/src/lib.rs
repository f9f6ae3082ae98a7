//! The run loop: every (site, criterion) pair is dispatched to its
//! evaluator, failures are converted to results at this boundary, and the
//! run always terminates with `sites x criteria` results, resumable from
//! the last checkpoint.

mod errors;
mod model;
mod orchestrator;

pub use errors::OrchestratorError;
pub use model::{RunOptions, RunSummary};
pub use orchestrator::Orchestrator;
