//! Data model for the matching engine
//!
//! - [`Track`]: source catalog item (input, immutable)
//! - [`Candidate`]: enriched video search result, lives for one decision
//! - [`MatchOptions`]: per-batch preferences
//! - [`Decision`] / [`ResultRow`]: per-track output

pub mod candidate;
pub mod decision;
pub mod options;
pub mod track;

pub use candidate::{watch_url, Candidate};
pub use decision::{Decision, DecisionSource, MatchDebug, ResultRow};
pub use options::MatchOptions;
pub use track::{Album, Track};
