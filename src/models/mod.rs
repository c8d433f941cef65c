//! Data models for the UrbanRetail application
//!
//! This module contains the core domain models organized by concern:
//! - Location: Geographic coordinates and distances
//! - Site: Site configuration, competitors and time-of-day context
//! - Forecast: Prediction output shared by the reasoning and heuristic paths

pub mod forecast;
pub mod location;
pub mod site;

// Re-export all public types for convenient access
pub use forecast::{Forecast, ForecastSource, RadarScores, Swot};
pub use location::Coordinate;
pub use site::{
    DesignStyle, NearbySite, PointOfInterest, PriceTier, SiteConfig, SiteParameters, TimePeriod,
};
