//! # trackmap Common Library
//!
//! Shared code for the trackmap services:
//! - Error type used at configuration and I/O boundaries
//! - TOML configuration loading and secret resolution
//! - Tracing subscriber initialization
//! - Human-readable duration formatting

pub mod config;
pub mod error;
pub mod human_time;
pub mod logging;

pub use error::{Error, Result};
