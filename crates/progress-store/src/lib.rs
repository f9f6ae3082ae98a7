//! Durable run progress.
//!
//! One JSON checkpoint records every completed (site, criterion) pair and
//! its result. The orchestrator reads it at startup to resume exactly where
//! a previous run stopped; during a run all mutation goes through the
//! single-writer aggregator task in [`writer`].

mod model;
mod store;
pub mod writer;

pub use model::ProgressRecord;
pub use store::{JsonProgressStore, StoreError};
pub use writer::{ProgressWriter, WriterMsg};
