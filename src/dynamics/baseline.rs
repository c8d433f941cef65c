//! Spatial gravity model for baseline foot traffic.
//!
//! Traffic decays with distance from a commercial centre in three tiers, is
//! scaled by a time-of-day multiplier and boosted logarithmically by the number
//! of nearby sites (density counts as exposure, not only competition).

use serde::Serialize;
use tracing::{debug, warn};

use crate::models::{Coordinate, NearbySite, TimePeriod};

/// Kunshan commercial centre
pub const DEFAULT_CENTER: Coordinate = Coordinate {
    latitude: 31.385,
    longitude: 120.980,
};

/// Result of a baseline computation
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Baseline {
    /// Pedestrians per hour
    pub traffic: u32,
    /// Distance between the evaluated point and the centre
    pub distance_meters: f64,
    /// True when the input could not be parsed and the centre was used instead
    pub used_reference_center: bool,
}

/// Deterministic traffic estimate from geography and time context
#[derive(Debug, Clone)]
pub struct GeoBaselineModel {
    center: Coordinate,
}

impl Default for GeoBaselineModel {
    fn default() -> Self {
        Self::new(DEFAULT_CENTER)
    }
}

impl GeoBaselineModel {
    #[must_use]
    pub fn new(center: Coordinate) -> Self {
        Self { center }
    }

    #[must_use]
    pub fn center(&self) -> Coordinate {
        self.center
    }

    /// Baseline for a `"lat,lon"` string. Unparsable input is evaluated at the
    /// reference centre; the substitution is logged and flagged in the result.
    pub fn compute_baseline(
        &self,
        coords: &str,
        time_period: &TimePeriod,
        nearby_sites: &[NearbySite],
    ) -> Baseline {
        match coords.parse::<Coordinate>() {
            Ok(coordinate) => self.compute_baseline_at(coordinate, time_period, nearby_sites),
            Err(err) => {
                warn!("{err}; using reference centre {}", self.center);
                Baseline {
                    used_reference_center: true,
                    ..self.compute_baseline_at(self.center, time_period, nearby_sites)
                }
            }
        }
    }

    /// Baseline for an already parsed coordinate
    pub fn compute_baseline_at(
        &self,
        coordinate: Coordinate,
        time_period: &TimePeriod,
        nearby_sites: &[NearbySite],
    ) -> Baseline {
        let distance_meters = coordinate.distance_meters(&self.center);
        let traffic = baseline_traffic(distance_meters, time_period, nearby_sites.len());

        debug!(
            distance_meters,
            time_period = %time_period,
            competitors = nearby_sites.len(),
            traffic,
            "Computed spatial gravity baseline"
        );

        Baseline {
            traffic,
            distance_meters,
            used_reference_center: false,
        }
    }
}

/// `(base, decay)` for a distance from the centre in meters
fn distance_tier(distance_meters: f64) -> (f64, f64) {
    if distance_meters < 800.0 {
        (450.0, 1.0 - distance_meters / 4000.0)
    } else if distance_meters < 2500.0 {
        (250.0, 0.9 - distance_meters / 8000.0)
    } else {
        (100.0, 0.8)
    }
}

fn density_multiplier(site_count: usize) -> f64 {
    1.0 + (1.0 + site_count as f64).log10()
}

/// `floor(base * decay * time * density)`, clamped at zero
#[must_use]
pub fn baseline_traffic(distance_meters: f64, time_period: &TimePeriod, site_count: usize) -> u32 {
    let (base, decay) = distance_tier(distance_meters);
    let traffic = base
        * decay.max(0.0)
        * time_period.traffic_multiplier()
        * density_multiplier(site_count);

    traffic.max(0.0).floor() as u32
}
