//! Clients for external services.

pub mod georef;

pub use georef::GeorefClient;
