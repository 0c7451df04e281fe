//! HTTP API handlers for trackmap-mx

pub mod download;
pub mod health;
pub mod run;

pub use download::download_routes;
pub use health::health_routes;
pub use run::run_routes;
