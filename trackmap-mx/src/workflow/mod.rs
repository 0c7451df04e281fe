//! Batch workflow
//!
//! Runs the selection orchestrator over a list of tracks with bounded concurrency.
//! Every track yields exactly one row; per-track failures become error rows.

pub mod batch;
pub mod mapping;

pub use batch::run_batch;
pub use mapping::{run_mapping, MappingError, MappingReport};
