//! Urban dynamics predictor: baseline plus reasoning service, with the
//! heuristic forecast standing in for every failure of the external path.

use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::{info, warn};

use super::baseline::{Baseline, GeoBaselineModel};
use super::error::{PredictionError, Result};
use super::fallback::compute_fallback;
use super::prompt::{PromptContext, build_prompt};
use super::reasoning::{ChatCompletionClient, ReasoningService, parse_forecast};
use crate::config::UrbanRetailConfig;
use crate::models::{Coordinate, Forecast, NearbySite, SiteConfig, SiteParameters, TimePeriod};

/// Forecast together with the data that explains how it was produced
#[derive(Debug, Clone, Serialize)]
pub struct PredictionReport {
    pub forecast: Forecast,
    pub baseline: Baseline,
    /// Why the heuristic path was taken, if it was
    #[serde(skip_serializing_if = "Option::is_none", serialize_with = "display")]
    pub failure: Option<PredictionError>,
    pub generated_at: DateTime<Utc>,
}

fn display<S: serde::Serializer>(
    failure: &Option<PredictionError>,
    serializer: S,
) -> std::result::Result<S::Ok, S::Error> {
    match failure {
        Some(err) => serializer.serialize_str(&err.to_string()),
        None => serializer.serialize_none(),
    }
}

/// One prediction request
#[derive(Debug, Clone)]
pub struct PredictionRequest<'a> {
    /// `"lat,lon"`; unparsable input is evaluated at the reference centre
    pub coords: &'a str,
    pub time_period: &'a TimePeriod,
    pub nearby_sites: &'a [NearbySite],
    pub is_existing_shop: bool,
    pub config: Option<&'a SiteConfig>,
}

/// Stateless predictor; safe to share between concurrent requests
#[derive(Clone)]
pub struct UrbanDynamicsPredictor {
    baseline_model: GeoBaselineModel,
    reasoning: Arc<dyn ReasoningService>,
    timeout: Duration,
}

impl UrbanDynamicsPredictor {
    pub fn new(
        baseline_model: GeoBaselineModel,
        reasoning: Arc<dyn ReasoningService>,
        timeout: Duration,
    ) -> Self {
        Self {
            baseline_model,
            reasoning,
            timeout,
        }
    }

    /// Build a predictor backed by the chat-completion service from config
    pub fn from_config(config: &UrbanRetailConfig) -> Result<Self> {
        let timeout = Duration::from_secs(u64::from(config.reasoning.timeout_seconds));
        let client = ChatCompletionClient::new(
            config.reasoning.api_key.clone().unwrap_or_default(),
            config.reasoning.base_url.clone(),
            config.reasoning.model.clone(),
            timeout,
        )?;
        let center = Coordinate::new(config.geo.center_latitude, config.geo.center_longitude);

        Ok(Self::new(
            GeoBaselineModel::new(center),
            Arc::new(client),
            timeout,
        ))
    }

    #[must_use]
    pub fn baseline_model(&self) -> &GeoBaselineModel {
        &self.baseline_model
    }

    /// Forecast for a site. Never fails: any problem with the reasoning
    /// service yields the heuristic forecast instead.
    pub async fn predict(
        &self,
        coords: &str,
        time_period: &TimePeriod,
        nearby_sites: &[NearbySite],
        is_existing_shop: bool,
        config: Option<&SiteConfig>,
    ) -> Forecast {
        self.predict_detailed(PredictionRequest {
            coords,
            time_period,
            nearby_sites,
            is_existing_shop,
            config,
        })
        .await
        .forecast
    }

    /// Like [`predict`](Self::predict) but also reports the baseline and the
    /// reason for falling back.
    #[tracing::instrument(
        name = "predict",
        level = "info",
        skip_all,
        fields(coords = request.coords, period = %request.time_period)
    )]
    pub async fn predict_detailed(&self, request: PredictionRequest<'_>) -> PredictionReport {
        let baseline = self.baseline_model.compute_baseline(
            request.coords,
            request.time_period,
            request.nearby_sites,
        );
        let parameters = SiteParameters::resolve(request.config);

        let prompt = build_prompt(&PromptContext {
            is_existing_shop: request.is_existing_shop,
            parameters: &parameters,
            baseline_traffic: baseline.traffic,
            nearby_sites: request.nearby_sites,
        });

        match self.reason(&prompt, baseline.traffic).await {
            Ok(forecast) => {
                info!(
                    traffic = forecast.predicted_traffic,
                    revenue = forecast.est_monthly_revenue,
                    "Reasoning forecast accepted"
                );
                PredictionReport {
                    forecast,
                    baseline,
                    failure: None,
                    generated_at: Utc::now(),
                }
            }
            Err(err) => {
                warn!("Reasoning path failed, using heuristic forecast: {err}");
                PredictionReport {
                    forecast: compute_fallback(baseline.traffic, &parameters),
                    baseline,
                    failure: Some(err),
                    generated_at: Utc::now(),
                }
            }
        }
    }

    /// Single bounded attempt at the reasoning service; no retries
    async fn reason(&self, prompt: &str, baseline_traffic: u32) -> Result<Forecast> {
        let content = tokio::time::timeout(self.timeout, self.reasoning.complete(prompt))
            .await
            .map_err(|_| {
                PredictionError::external(format!(
                    "Reasoning service timed out after {:?}",
                    self.timeout
                ))
            })??;

        parse_forecast(&content, baseline_traffic)
    }
}
