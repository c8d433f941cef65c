//! `UrbanRetail` - Site forecasting for urban retail locations
//!
//! This library estimates pedestrian traffic, monthly revenue and qualitative
//! scores for a site, combining a deterministic spatial gravity model with an
//! external reasoning service and a heuristic fallback.

pub mod api;
pub mod config;
pub mod dynamics;
pub mod error;
pub mod models;
pub mod selection;
pub mod telemetry;
pub mod web;

// Re-export core types for public API
pub use crate::config::UrbanRetailConfig;
pub use dynamics::{
    Baseline, GeoBaselineModel, PredictionError, PredictionReport, ReasoningService,
    UrbanDynamicsPredictor,
};
pub use error::UrbanRetailError;
pub use models::{Coordinate, Forecast, NearbySite, PointOfInterest, SiteConfig, TimePeriod};
pub use selection::{Selection, SiteSelector};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
