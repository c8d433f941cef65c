//! Site descriptions: simulated site configuration, competing sites and the
//! time-of-day context a prediction runs under.

use std::fmt;

use serde::{Deserialize, Serialize};

use super::Coordinate;

/// Time-of-day context for a prediction
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum TimePeriod {
    MorningPeak,
    #[default]
    LunchBreak,
    AfterWork,
    /// Any other label; carries no traffic boost
    Other(String),
}

impl TimePeriod {
    #[must_use]
    pub fn from_label(label: &str) -> Self {
        match label.trim() {
            "Morning Peak" => Self::MorningPeak,
            "Lunch Break" => Self::LunchBreak,
            "After Work" => Self::AfterWork,
            other => Self::Other(other.to_string()),
        }
    }

    #[must_use]
    pub fn label(&self) -> &str {
        match self {
            Self::MorningPeak => "Morning Peak",
            Self::LunchBreak => "Lunch Break",
            Self::AfterWork => "After Work",
            Self::Other(label) => label,
        }
    }

    /// Traffic multiplier applied by the spatial gravity model
    #[must_use]
    pub fn traffic_multiplier(&self) -> f64 {
        match self {
            Self::MorningPeak => 1.9,
            Self::LunchBreak => 1.5,
            Self::AfterWork => 2.4,
            Self::Other(_) => 1.0,
        }
    }
}

impl From<String> for TimePeriod {
    fn from(value: String) -> Self {
        Self::from_label(&value)
    }
}

impl From<TimePeriod> for String {
    fn from(value: TimePeriod) -> Self {
        value.label().to_string()
    }
}

impl fmt::Display for TimePeriod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Pricing strategy of a site
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum PriceTier {
    Value,
    #[default]
    MidRange,
    Premium,
    UltraLuxury,
    /// Unrecognised label, priced like `MidRange`
    Unknown(String),
}

impl PriceTier {
    #[must_use]
    pub fn from_label(label: &str) -> Self {
        match label.trim() {
            "Value (Budget)" | "Value" => Self::Value,
            "Mid-Range" | "MidRange" => Self::MidRange,
            "Premium" => Self::Premium,
            "Ultra-Luxury" | "UltraLuxury" => Self::UltraLuxury,
            other => Self::Unknown(other.to_string()),
        }
    }

    #[must_use]
    pub fn label(&self) -> &str {
        match self {
            Self::Value => "Value (Budget)",
            Self::MidRange => "Mid-Range",
            Self::Premium => "Premium",
            Self::UltraLuxury => "Ultra-Luxury",
            Self::Unknown(label) => label,
        }
    }

    /// Average spend per customer in currency units
    #[must_use]
    pub fn average_check(&self) -> u32 {
        match self {
            Self::Value => 15,
            Self::MidRange => 30,
            Self::Premium => 55,
            Self::UltraLuxury => 120,
            Self::Unknown(_) => 30,
        }
    }
}

impl From<String> for PriceTier {
    fn from(value: String) -> Self {
        Self::from_label(&value)
    }
}

impl From<PriceTier> for String {
    fn from(value: PriceTier) -> Self {
        value.label().to_string()
    }
}

impl fmt::Display for PriceTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Interior design style of a simulated site
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum DesignStyle {
    Modern,
    Industrial,
    Cyberpunk,
    Vintage,
    Other(String),
}

impl DesignStyle {
    #[must_use]
    pub fn from_label(label: &str) -> Self {
        match label.trim() {
            "Modern" => Self::Modern,
            "Industrial" => Self::Industrial,
            "Cyberpunk" => Self::Cyberpunk,
            "Vintage" => Self::Vintage,
            other => Self::Other(other.to_string()),
        }
    }

    #[must_use]
    pub fn label(&self) -> &str {
        match self {
            Self::Modern => "Modern",
            Self::Industrial => "Industrial",
            Self::Cyberpunk => "Cyberpunk",
            Self::Vintage => "Vintage",
            Self::Other(label) => label,
        }
    }
}

impl From<String> for DesignStyle {
    fn from(value: String) -> Self {
        Self::from_label(&value)
    }
}

impl From<DesignStyle> for String {
    fn from(value: DesignStyle) -> Self {
        value.label().to_string()
    }
}

impl fmt::Display for DesignStyle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Area assumed for sites without a configuration, in square meters
pub const DEFAULT_AREA_SQM: f64 = 35.0;

/// Configuration of a simulated (not yet existing) site
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SiteConfig {
    /// Floor area in square meters
    #[serde(default = "default_area")]
    pub area: f64,
    /// Interior style; `None` when the user left it open
    #[serde(default)]
    pub style: Option<DesignStyle>,
    #[serde(default)]
    pub price_tier: PriceTier,
}

fn default_area() -> f64 {
    DEFAULT_AREA_SQM
}

impl SiteConfig {
    #[must_use]
    pub fn new(area: f64, style: Option<DesignStyle>, price_tier: PriceTier) -> Self {
        Self {
            area,
            style,
            price_tier,
        }
    }
}

/// Parameters the predictor works with once an optional config is resolved
#[derive(Debug, Clone, PartialEq)]
pub struct SiteParameters {
    pub area: f64,
    pub style: String,
    pub price_tier: PriceTier,
}

impl SiteParameters {
    /// Resolve an optional config: existing sites fall back to a 35 sqm
    /// "Classic" mid-range shop, simulated ones without a style to "Modern".
    #[must_use]
    pub fn resolve(config: Option<&SiteConfig>) -> Self {
        match config {
            Some(config) => Self {
                area: if config.area.is_finite() && config.area > 0.0 {
                    config.area
                } else {
                    DEFAULT_AREA_SQM
                },
                style: config
                    .style
                    .as_ref()
                    .map_or_else(|| "Modern".to_string(), |s| s.label().to_string()),
                price_tier: config.price_tier.clone(),
            },
            None => Self {
                area: DEFAULT_AREA_SQM,
                style: "Classic".to_string(),
                price_tier: PriceTier::MidRange,
            },
        }
    }
}

/// A competing site near the prediction target
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NearbySite {
    /// Distance from the prediction target in meters
    pub distance_meters: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rating: Option<String>,
    #[serde(default)]
    pub is_simulated: bool,
}

impl NearbySite {
    #[must_use]
    pub fn new(distance_meters: f64) -> Self {
        Self {
            distance_meters,
            name: None,
            rating: None,
            is_simulated: false,
        }
    }

    #[must_use]
    pub fn named(name: impl Into<String>, distance_meters: f64) -> Self {
        Self {
            name: Some(name.into()),
            ..Self::new(distance_meters)
        }
    }
}

/// A point of interest on the map, either fetched or user-simulated
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PointOfInterest {
    pub name: String,
    pub latitude: f64,
    pub longitude: f64,
    #[serde(default = "default_rating")]
    pub rating: String,
    #[serde(default)]
    pub is_simulated: bool,
    #[serde(default)]
    pub comment: String,
    /// Present only for simulated sites
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub config: Option<SiteConfig>,
}

fn default_rating() -> String {
    "4.2".to_string()
}

impl PointOfInterest {
    /// An established site as delivered by a places provider
    #[must_use]
    pub fn existing(name: impl Into<String>, coordinate: Coordinate) -> Self {
        Self {
            name: name.into(),
            latitude: coordinate.latitude,
            longitude: coordinate.longitude,
            rating: default_rating(),
            is_simulated: false,
            comment: "Established market player with high brand recognition.".to_string(),
            config: None,
        }
    }

    /// A site deployed from the simulation form
    #[must_use]
    pub fn simulated(name: &str, coordinate: Coordinate, config: SiteConfig) -> Self {
        let parameters = SiteParameters::resolve(Some(&config));
        Self {
            name: format!("[SIM] {name}"),
            latitude: coordinate.latitude,
            longitude: coordinate.longitude,
            rating: "4.9".to_string(),
            is_simulated: true,
            comment: format!(
                "A {} boutique cafe positioned at {} market.",
                parameters.style, parameters.price_tier
            ),
            config: Some(config),
        }
    }

    #[must_use]
    pub fn coordinate(&self) -> Coordinate {
        Coordinate::new(self.latitude, self.longitude)
    }
}
