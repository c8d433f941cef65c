use std::sync::Arc;

use axum::{
    Router,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Json, Response},
    routing::{get, post},
};
use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::{
    UrbanRetailError,
    config::SelectionConfig,
    dynamics::{PredictionRequest, UrbanDynamicsPredictor},
    models::{Coordinate, Forecast, NearbySite, PointOfInterest, SiteConfig, TimePeriod},
    selection::SiteSelector,
};

/// Shared state of the HTTP surface
pub struct AppState {
    pub predictor: UrbanDynamicsPredictor,
    pub selection: SelectionConfig,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct PredictPayload {
    /// `"lat,lon"`; malformed values are evaluated at the reference centre
    pub coordinate: String,
    #[serde(default)]
    pub time_period: TimePeriod,
    #[serde(default)]
    pub nearby_sites: Vec<NearbySite>,
    #[serde(default)]
    pub is_existing_shop: bool,
    #[serde(default)]
    pub config: Option<SiteConfig>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct CompetitorsPayload {
    pub target: Coordinate,
    pub sites: Vec<PointOfInterest>,
}

/// Error body returned by the API
struct ApiError(UrbanRetailError);

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match self.0 {
            UrbanRetailError::Validation { .. } => StatusCode::UNPROCESSABLE_ENTITY,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        };
        tracing::debug!("Request rejected: {}", self.0);
        (status, Json(json!({ "error": self.0.user_message() }))).into_response()
    }
}

pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/predict", post(predict))
        .route("/competitors", post(competitors))
        .with_state(state)
}

async fn health() -> Json<serde_json::Value> {
    Json(json!({ "status": "ok", "version": crate::VERSION }))
}

async fn predict(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<PredictPayload>,
) -> Result<Json<Forecast>, ApiError> {
    if let Some(config) = &payload.config {
        if !(config.area.is_finite() && config.area > 0.0) {
            return Err(ApiError(UrbanRetailError::validation(
                "config.area must be a positive number of square meters",
            )));
        }
    }

    let report = state
        .predictor
        .predict_detailed(PredictionRequest {
            coords: &payload.coordinate,
            time_period: &payload.time_period,
            nearby_sites: &payload.nearby_sites,
            is_existing_shop: payload.is_existing_shop,
            config: payload.config.as_ref(),
        })
        .await;

    Ok(Json(report.forecast))
}

async fn competitors(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<CompetitorsPayload>,
) -> Json<Vec<NearbySite>> {
    let selector = SiteSelector::new(&payload.sites, &state.selection);
    Json(selector.nearest_competitors(payload.target))
}
