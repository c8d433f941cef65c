//! Chat-completion client for the external reasoning service and validation
//! of the structured forecast it returns.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use super::error::{PredictionError, Result};
use crate::models::{Forecast, ForecastSource, RadarScores, Swot};

/// Text-generation backend used by the predictor
#[async_trait]
pub trait ReasoningService: Send + Sync {
    /// Send a single user prompt and return the raw message content
    async fn complete(&self, prompt: &str) -> Result<String>;
}

/// Client for an OpenAI-compatible `/chat/completions` endpoint
pub struct ChatCompletionClient {
    client: Client,
    api_key: String,
    base_url: String,
    model: String,
}

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: [ChatMessage<'a>; 1],
    response_format: ResponseFormat,
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Debug, Serialize)]
struct ResponseFormat {
    #[serde(rename = "type")]
    kind: &'static str,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatResponseMessage,
}

#[derive(Debug, Deserialize)]
struct ChatResponseMessage {
    content: Option<String>,
}

impl ChatCompletionClient {
    /// Create a client; `timeout` bounds each whole request
    pub fn new(
        api_key: impl Into<String>,
        base_url: impl Into<String>,
        model: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .user_agent(concat!("UrbanRetail/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| PredictionError::external(format!("Failed to create HTTP client: {e}")))?;

        Ok(Self {
            client,
            api_key: api_key.into(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
            model: model.into(),
        })
    }

    #[must_use]
    pub fn endpoint(&self) -> String {
        format!("{}/chat/completions", self.base_url)
    }
}

#[async_trait]
impl ReasoningService for ChatCompletionClient {
    #[tracing::instrument(name = "reasoning_call", level = "debug", skip_all, fields(model = %self.model))]
    async fn complete(&self, prompt: &str) -> Result<String> {
        let body = ChatRequest {
            model: &self.model,
            messages: [ChatMessage {
                role: "user",
                content: prompt,
            }],
            response_format: ResponseFormat {
                kind: "json_object",
            },
        };

        let response = self
            .client
            .post(self.endpoint())
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| PredictionError::external(format!("Request failed: {e}")))?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response.text().await.unwrap_or_default();
            return Err(PredictionError::external(format!(
                "Reasoning service returned {status}: {error_text}"
            )));
        }

        let chat: ChatResponse = response.json().await?;
        debug!("Received {} choice(s)", chat.choices.len());

        chat.choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .ok_or_else(|| PredictionError::shape("Response contained no message content"))
    }
}

/// Forecast as sent by the reasoning service; every field may be missing
#[derive(Debug, Deserialize)]
struct ReasoningForecast {
    predicted_traffic: Option<f64>,
    est_monthly_revenue: Option<f64>,
    payback_months: Option<f64>,
    radar_scores: Option<ReasoningRadar>,
    swot: Option<ReasoningSwot>,
    reasoning: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ReasoningRadar {
    traffic: Option<f64>,
    competition: Option<f64>,
    brand: Option<f64>,
}

#[derive(Debug, Deserialize)]
struct ReasoningSwot {
    strength: Option<String>,
    risk: Option<String>,
}

/// Drop a surrounding Markdown code fence, which some models add despite
/// the JSON response format.
fn strip_code_fence(content: &str) -> &str {
    let trimmed = content.trim();
    trimmed
        .strip_prefix("```json")
        .or_else(|| trimmed.strip_prefix("```"))
        .and_then(|rest| rest.strip_suffix("```"))
        .map_or(trimmed, str::trim)
}

fn score(value: Option<f64>, name: &str) -> u8 {
    let Some(raw) = value.filter(|v| v.is_finite()) else {
        return 50;
    };
    let clamped = raw.round().clamp(0.0, 100.0);
    if clamped != raw.round() {
        warn!("Radar score {name}={raw} outside 0..=100, clamped to {clamped}");
    }
    clamped as u8
}

/// Parse and validate message content into a forecast.
///
/// Missing fields are defaulted; a missing, zero or negative revenue is
/// rejected so the caller falls back to the heuristic.
pub fn parse_forecast(content: &str, baseline_traffic: u32) -> Result<Forecast> {
    let raw: ReasoningForecast = serde_json::from_str(strip_code_fence(content))?;

    let revenue = raw.est_monthly_revenue.unwrap_or(0.0);
    if !revenue.is_finite() || revenue < 0.0 {
        return Err(PredictionError::shape(format!(
            "est_monthly_revenue must be a non-negative number, got {revenue}"
        )));
    }
    let revenue = revenue.round() as u64;
    if revenue == 0 {
        return Err(PredictionError::ZeroRevenue);
    }

    let predicted_traffic = raw
        .predicted_traffic
        .filter(|t| t.is_finite())
        .map_or(baseline_traffic, |t| t.max(0.0).round() as u32);

    let payback_months = raw
        .payback_months
        .filter(|p| p.is_finite())
        .map_or(0.0, |p| p.max(0.0));

    let radar_scores = raw.radar_scores.map_or_else(RadarScores::default, |radar| {
        RadarScores::new(
            score(radar.traffic, "traffic"),
            score(radar.competition, "competition"),
            score(radar.brand, "brand"),
        )
    });

    let swot = raw.swot.map_or_else(Swot::default, |swot| Swot {
        strength: swot.strength.unwrap_or_default(),
        risk: swot.risk.unwrap_or_default(),
    });

    Ok(Forecast {
        predicted_traffic,
        est_monthly_revenue: revenue,
        payback_months,
        radar_scores,
        swot,
        reasoning: raw.reasoning.unwrap_or_default(),
        source: ForecastSource::Reasoning,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    const FULL_RESPONSE: &str = r#"{
        "predicted_traffic": 640,
        "est_monthly_revenue": 312000,
        "payback_months": 5.4,
        "radar_scores": {"traffic": 82, "competition": 55, "brand": 71},
        "swot": {"strength": "Office crowd at lunch", "risk": "Two chains within 100 m"},
        "reasoning": "Premium pricing matches the office clientele."
    }"#;

    #[test]
    fn test_parse_full_response() {
        let forecast = parse_forecast(FULL_RESPONSE, 500).unwrap();
        assert_eq!(forecast.predicted_traffic, 640);
        assert_eq!(forecast.est_monthly_revenue, 312_000);
        assert_eq!(forecast.payback_months, 5.4);
        assert_eq!(forecast.radar_scores, RadarScores::new(82, 55, 71));
        assert_eq!(forecast.swot.risk, "Two chains within 100 m");
        assert_eq!(forecast.source, ForecastSource::Reasoning);
    }

    #[test]
    fn test_parse_fills_missing_fields() {
        let forecast = parse_forecast(r#"{"est_monthly_revenue": 90000.0}"#, 321).unwrap();
        assert_eq!(forecast.predicted_traffic, 321);
        assert_eq!(forecast.est_monthly_revenue, 90_000);
        assert_eq!(forecast.payback_months, 0.0);
        assert_eq!(forecast.radar_scores, RadarScores::default());
        assert_eq!(forecast.swot, Swot::default());
        assert!(forecast.reasoning.is_empty());
    }

    #[test]
    fn test_parse_clamps_radar_scores() {
        let content = r#"{
            "est_monthly_revenue": 1000,
            "radar_scores": {"traffic": 140, "competition": -3, "brand": 64.6}
        }"#;
        let forecast = parse_forecast(content, 0).unwrap();
        assert_eq!(forecast.radar_scores, RadarScores::new(100, 0, 65));
    }

    #[test]
    fn test_parse_accepts_code_fence() {
        let fenced = format!("```json\n{FULL_RESPONSE}\n```");
        assert!(parse_forecast(&fenced, 0).is_ok());
    }

    #[test]
    fn test_zero_or_missing_revenue_is_rejected() {
        assert_eq!(
            parse_forecast(r#"{"est_monthly_revenue": 0}"#, 100),
            Err(PredictionError::ZeroRevenue)
        );
        assert_eq!(
            parse_forecast(r#"{"predicted_traffic": 10}"#, 100),
            Err(PredictionError::ZeroRevenue)
        );
    }

    #[test]
    fn test_malformed_responses_are_shape_errors() {
        for content in [
            "The site looks promising.",
            r#"{"est_monthly_revenue": "lots"}"#,
            r#"{"est_monthly_revenue": -5}"#,
            "null",
        ] {
            assert!(
                matches!(
                    parse_forecast(content, 100),
                    Err(PredictionError::ResponseShape(_))
                ),
                "expected shape error for {content}"
            );
        }
    }

    #[test]
    fn test_client_endpoint() {
        let client = ChatCompletionClient::new(
            "sk-test",
            "https://api.deepseek.com/",
            "deepseek-chat",
            Duration::from_secs(12),
        )
        .unwrap();
        assert_eq!(client.endpoint(), "https://api.deepseek.com/chat/completions");
    }
}
