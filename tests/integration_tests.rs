//! Integration tests for the prediction engine against a mocked
//! chat-completion service, and for the JSON API.

use std::sync::Arc;
use std::time::Duration;

use axum::body::{Body, to_bytes};
use axum::http::{Request, StatusCode};
use serde_json::{Value, json};
use tower::ServiceExt;
use wiremock::matchers::{body_partial_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use urbanretail::api::AppState;
use urbanretail::config::SelectionConfig;
use urbanretail::dynamics::{
    ChatCompletionClient, FALLBACK_NOTICE, GeoBaselineModel, PredictionError, PredictionRequest,
    UrbanDynamicsPredictor,
};
use urbanretail::models::{DesignStyle, ForecastSource, PriceTier, RadarScores};
use urbanretail::{NearbySite, SiteConfig, TimePeriod, UrbanRetailConfig, web};

const API_KEY: &str = "sk-integration-test";
const CENTER: &str = "31.3850,120.9800";

fn chat_reply(content: &str) -> Value {
    json!({
        "id": "chatcmpl-1",
        "object": "chat.completion",
        "choices": [{
            "index": 0,
            "message": {"role": "assistant", "content": content},
            "finish_reason": "stop"
        }]
    })
}

fn predictor_for(server: &MockServer, timeout: Duration) -> UrbanDynamicsPredictor {
    let client =
        ChatCompletionClient::new(API_KEY, server.uri(), "deepseek-chat", timeout).unwrap();
    UrbanDynamicsPredictor::new(GeoBaselineModel::default(), Arc::new(client), timeout)
}

fn premium_site() -> SiteConfig {
    SiteConfig::new(45.0, Some(DesignStyle::Modern), PriceTier::Premium)
}

#[tokio::test]
async fn test_reasoning_forecast_is_used() {
    let server = MockServer::start().await;
    let content = json!({
        "predicted_traffic": 820,
        "est_monthly_revenue": 356000,
        "payback_months": 4.1,
        "radar_scores": {"traffic": 88, "competition": 47, "brand": 73},
        "swot": {"strength": "Transit hub", "risk": "High rent"},
        "reasoning": "Modern style suits commuter traffic."
    })
    .to_string();

    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .and(header("authorization", format!("Bearer {API_KEY}").as_str()))
        .and(body_partial_json(json!({
            "model": "deepseek-chat",
            "response_format": {"type": "json_object"}
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(chat_reply(&content)))
        .expect(1)
        .mount(&server)
        .await;

    let forecast = predictor_for(&server, Duration::from_secs(5))
        .predict(CENTER, &TimePeriod::LunchBreak, &[], false, Some(&premium_site()))
        .await;

    assert_eq!(forecast.source, ForecastSource::Reasoning);
    assert_eq!(forecast.predicted_traffic, 820);
    assert_eq!(forecast.est_monthly_revenue, 356_000);
    assert_eq!(forecast.radar_scores, RadarScores::new(88, 47, 73));
    assert_eq!(forecast.swot.strength, "Transit hub");
}

#[tokio::test]
async fn test_zero_revenue_response_matches_fallback() {
    let server = MockServer::start().await;
    let content = json!({
        "predicted_traffic": 400,
        "est_monthly_revenue": 0,
        "payback_months": 0.0,
        "radar_scores": {"traffic": 10, "competition": 10, "brand": 10},
        "swot": {"strength": "-", "risk": "-"},
        "reasoning": "Not viable."
    })
    .to_string();

    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .respond_with(ResponseTemplate::new(200).set_body_json(chat_reply(&content)))
        .mount(&server)
        .await;

    let config = premium_site();
    let report = predictor_for(&server, Duration::from_secs(5))
        .predict_detailed(PredictionRequest {
            coords: CENTER,
            time_period: &TimePeriod::AfterWork,
            nearby_sites: &[],
            is_existing_shop: false,
            config: Some(&config),
        })
        .await;

    assert_eq!(report.failure, Some(PredictionError::ZeroRevenue));
    assert_eq!(report.forecast.predicted_traffic, 1080);
    assert_eq!(report.forecast.est_monthly_revenue, 1_425_600);
    assert_eq!(report.forecast.radar_scores, RadarScores::new(70, 40, 60));
    assert!(report.forecast.reasoning.contains(FALLBACK_NOTICE));
}

#[tokio::test]
async fn test_server_error_falls_back() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(503).set_body_string("overloaded"))
        .mount(&server)
        .await;

    let report = predictor_for(&server, Duration::from_secs(5))
        .predict_detailed(PredictionRequest {
            coords: CENTER,
            time_period: &TimePeriod::LunchBreak,
            nearby_sites: &[NearbySite::named("Starbucks", 35.0)],
            is_existing_shop: true,
            config: None,
        })
        .await;

    assert!(report.forecast.is_fallback());
    assert!(report.forecast.est_monthly_revenue > 0);
    let failure = report.failure.unwrap();
    assert!(matches!(failure, PredictionError::ExternalService(_)));
    assert!(failure.to_string().contains("503"));
}

#[tokio::test]
async fn test_non_json_content_falls_back() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(chat_reply("Sorry, I can't help with that.")),
        )
        .mount(&server)
        .await;

    let report = predictor_for(&server, Duration::from_secs(5))
        .predict_detailed(PredictionRequest {
            coords: CENTER,
            time_period: &TimePeriod::LunchBreak,
            nearby_sites: &[],
            is_existing_shop: false,
            config: None,
        })
        .await;

    assert!(report.forecast.is_fallback());
    assert!(matches!(
        report.failure,
        Some(PredictionError::ResponseShape(_))
    ));
}

#[tokio::test]
async fn test_slow_service_times_out_to_fallback() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(chat_reply(r#"{"est_monthly_revenue": 1000}"#))
                .set_delay(Duration::from_secs(3)),
        )
        .mount(&server)
        .await;

    let forecast = predictor_for(&server, Duration::from_millis(300))
        .predict(CENTER, &TimePeriod::MorningPeak, &[], false, None)
        .await;

    assert!(forecast.is_fallback());
    assert_eq!(forecast.radar_scores, RadarScores::new(70, 40, 60));
}

#[tokio::test]
async fn test_unreachable_service_falls_back() {
    // nothing listens on the discard port
    let client = ChatCompletionClient::new(
        API_KEY,
        "http://127.0.0.1:9",
        "deepseek-chat",
        Duration::from_secs(2),
    )
    .unwrap();
    let predictor = UrbanDynamicsPredictor::new(
        GeoBaselineModel::default(),
        Arc::new(client),
        Duration::from_secs(2),
    );

    let forecast = predictor
        .predict("garbage", &TimePeriod::AfterWork, &[], false, None)
        .await;

    assert!(forecast.is_fallback());
    assert_eq!(forecast.predicted_traffic, 1080);
    assert_eq!(forecast.est_monthly_revenue, 777_600);
    assert_eq!(forecast.payback_months, 1.8);
}

#[tokio::test]
async fn test_predictor_from_config_uses_reasoning_settings() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .and(body_partial_json(json!({"model": "custom-model"})))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(chat_reply(r#"{"est_monthly_revenue": 12345}"#)),
        )
        .expect(1)
        .mount(&server)
        .await;

    let mut config = UrbanRetailConfig::default();
    config.reasoning.api_key = Some(API_KEY.to_string());
    config.reasoning.base_url = server.uri();
    config.reasoning.model = "custom-model".to_string();

    let forecast = UrbanDynamicsPredictor::from_config(&config)
        .unwrap()
        .predict(CENTER, &TimePeriod::LunchBreak, &[], true, None)
        .await;

    assert_eq!(forecast.est_monthly_revenue, 12_345);
}

async fn call_api(app: axum::Router, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let request = match body {
        Some(body) => Request::builder()
            .method("POST")
            .uri(uri)
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => Request::builder().uri(uri).body(Body::empty()).unwrap(),
    };
    let response = app.oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    (status, serde_json::from_slice(&bytes).unwrap())
}

fn app_for(server: &MockServer) -> axum::Router {
    let state = Arc::new(AppState {
        predictor: predictor_for(server, Duration::from_millis(500)),
        selection: SelectionConfig::default(),
    });
    web::app(state, Duration::from_secs(10))
}

#[tokio::test]
async fn test_api_health() {
    let server = MockServer::start().await;
    let (status, body) = call_api(app_for(&server), "/api/health", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
}

#[tokio::test]
async fn test_api_predict_returns_fallback_when_service_down() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let (status, body) = call_api(
        app_for(&server),
        "/api/predict",
        Some(json!({
            "coordinate": CENTER,
            "time_period": "After Work",
            "nearby_sites": [],
            "config": {"area": 45, "style": "Modern", "price_tier": "Premium"}
        })),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["predicted_traffic"], 1080);
    assert_eq!(body["est_monthly_revenue"], 1_425_600);
    assert_eq!(body["radar_scores"]["competition"], 40);
    assert_eq!(body["source"], "heuristic");
}

#[tokio::test]
async fn test_api_predict_rejects_non_positive_area() {
    let server = MockServer::start().await;
    let (status, body) = call_api(
        app_for(&server),
        "/api/predict",
        Some(json!({"coordinate": CENTER, "config": {"area": 0}})),
    )
    .await;

    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert!(body["error"].as_str().unwrap().contains("area"));
}

#[tokio::test]
async fn test_api_predict_huge_area_keeps_numeric_payback() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&server)
        .await;

    let (status, body) = call_api(
        app_for(&server),
        "/api/predict",
        Some(json!({"coordinate": CENTER, "config": {"area": 1e308}})),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    let payback = body["payback_months"].as_f64().expect("payback is a number");
    assert!(payback.is_finite() && payback >= 0.0);
}

#[tokio::test]
async fn test_api_competitors() {
    let server = MockServer::start().await;
    let (status, body) = call_api(
        app_for(&server),
        "/api/competitors",
        Some(json!({
            "target": {"latitude": 31.385, "longitude": 120.980},
            "sites": [
                {"name": "Self", "latitude": 31.385, "longitude": 120.980},
                {"name": "B", "latitude": 31.387, "longitude": 120.980},
                {"name": "A", "latitude": 31.386, "longitude": 120.980},
                {"name": "C", "latitude": 31.390, "longitude": 120.980},
                {"name": "D", "latitude": 31.400, "longitude": 120.980}
            ]
        })),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    let names: Vec<&str> = body
        .as_array()
        .unwrap()
        .iter()
        .map(|site| site["name"].as_str().unwrap())
        .collect();
    assert_eq!(names, vec!["A", "B", "C"]);
}
