//! Urban dynamics prediction engine
//!
//! This module turns a coordinate, a time-of-day context and the nearby
//! competing sites into a traffic and revenue forecast:
//! - Baseline: deterministic spatial gravity model
//! - Reasoning: chat-completion client and response validation
//! - Fallback: heuristic forecast used whenever the reasoning path fails
//! - Predictor: orchestration of the above

pub mod baseline;
pub mod error;
pub mod fallback;
pub mod predictor;
pub mod prompt;
pub mod reasoning;

pub use baseline::{Baseline, DEFAULT_CENTER, GeoBaselineModel};
pub use error::{PredictionError, Result};
pub use fallback::{FALLBACK_NOTICE, compute_fallback};
pub use predictor::{PredictionReport, PredictionRequest, UrbanDynamicsPredictor};
pub use reasoning::{ChatCompletionClient, ReasoningService, parse_forecast};
