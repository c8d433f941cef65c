//! Site selection helpers
//!
//! Resolves a map click into a prediction target and gathers the nearest
//! competing sites around it.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::config::SelectionConfig;
use crate::models::{Coordinate, NearbySite, PointOfInterest, SiteConfig};

/// What a map interaction resolved to
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Selection {
    pub coordinate: Coordinate,
    /// True when an existing (or previously simulated) marker was selected
    pub is_existing_shop: bool,
    /// Name of the selected site, if any
    pub name: Option<String>,
    /// Config of a selected simulated site
    pub config: Option<SiteConfig>,
}

/// Geometric selection over a set of points of interest
pub struct SiteSelector<'a> {
    sites: &'a [PointOfInterest],
    settings: &'a SelectionConfig,
}

impl<'a> SiteSelector<'a> {
    #[must_use]
    pub fn new(sites: &'a [PointOfInterest], settings: &'a SelectionConfig) -> Self {
        Self { sites, settings }
    }

    /// Resolve a click. A marker counts only if it lies within the snap
    /// radius of the click; the site nearest to it is then selected.
    #[must_use]
    pub fn resolve_target(&self, click: Coordinate, marker: Option<Coordinate>) -> Selection {
        let snapped = marker
            .filter(|marker| click.distance_meters(marker) < self.settings.snap_radius_m)
            .and_then(|marker| self.nearest_site(&marker));

        match snapped {
            Some(site) => {
                debug!("Click snapped to site {}", site.name);
                Selection {
                    coordinate: click,
                    is_existing_shop: true,
                    name: Some(site.name.clone()),
                    config: site.config.clone().filter(|_| site.is_simulated),
                }
            }
            None => Selection {
                coordinate: click,
                is_existing_shop: false,
                name: None,
                config: None,
            },
        }
    }

    /// Sites farther than the minimum distance, nearest first, capped
    #[must_use]
    pub fn nearest_competitors(&self, target: Coordinate) -> Vec<NearbySite> {
        nearest_competitors(
            target,
            self.sites,
            self.settings.min_competitor_distance_m,
            self.settings.max_competitors,
        )
    }

    fn nearest_site(&self, point: &Coordinate) -> Option<&'a PointOfInterest> {
        self.sites.iter().min_by(|a, b| {
            a.coordinate()
                .distance_meters(point)
                .total_cmp(&b.coordinate().distance_meters(point))
        })
    }
}

/// Every site strictly farther than `min_distance_m` from `target`,
/// ordered nearest first and truncated to `limit`
#[must_use]
pub fn nearest_competitors(
    target: Coordinate,
    sites: &[PointOfInterest],
    min_distance_m: f64,
    limit: usize,
) -> Vec<NearbySite> {
    let mut results: Vec<NearbySite> = sites
        .iter()
        .map(|site| NearbySite {
            distance_meters: target.distance_meters(&site.coordinate()),
            name: Some(site.name.clone()),
            rating: Some(site.rating.clone()),
            is_simulated: site.is_simulated,
        })
        .filter(|site| site.distance_meters > min_distance_m)
        .collect();

    results.sort_by(|a, b| a.distance_meters.total_cmp(&b.distance_meters));
    results.truncate(limit);
    results
}
