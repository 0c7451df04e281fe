//! Track-to-video matching engine
//!
//! Query building, candidate scoring, duration verification, candidate enrichment
//! and the per-track selection orchestrator.

pub mod duration;
pub mod enricher;
pub mod orchestrator;
pub mod query;
pub mod scorer;

pub use orchestrator::{EngineConfig, MatchError, MatchPhase, TrackMatcher};
pub use query::{build_query, QueryProfile};
