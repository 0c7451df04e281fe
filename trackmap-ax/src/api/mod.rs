//! HTTP API handlers for trackmap-ax

pub mod download;
pub mod extract;
pub mod health;

pub use download::download_routes;
pub use extract::extract_routes;
pub use health::health_routes;
