//! CLI shell around the sitegauge audit engine: configuration, catalog
//! loading and the snapshot-backed page adapter. The engine itself lives in
//! the workspace crates.

pub mod catalog;
pub mod cli;
pub mod config;
pub mod snapshot;
