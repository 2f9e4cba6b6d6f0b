//! Insight fetching against a mocked text-generation service.

mod common;

use axum::http::StatusCode;
use common::{gemini_settings, profile_json, TestClient};
use finadvisor::models::{fallback_insights, AiInsight, AiProvider, AiSettings, FinancialProfile};
use finadvisor::services::insights::fetch_insights;
use finadvisor::services::session::InsightStatus;
use std::sync::Arc;
use std::time::Duration;
use wiremock::matchers::{body_string_contains, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const GEMINI_PATH: &str = "/v1beta/models/gemini-2.5-flash:generateContent";

fn five_insights() -> serde_json::Value {
    serde_json::json!([
        {"title": "Goal needs a SIP", "description": "Invest 75k a month.", "type": "info", "category": "Goal", "impact": "High"},
        {"title": "Low expense ratio", "description": "30% of income.", "type": "positive", "category": "Savings", "impact": "Medium"},
        {"title": "Claim 80C", "description": "Use ELSS.", "type": "suggestion", "category": "Tax", "impact": "Medium"},
        {"title": "Balanced allocation", "description": "60/40 equity/debt.", "type": "suggestion", "category": "Investment", "impact": "Low"},
        {"title": "Prepay the loan", "description": "Debt is 8% of income.", "type": "warning", "category": "Debt", "impact": "Low"}
    ])
}

fn gemini_body(text: &str) -> serde_json::Value {
    serde_json::json!({
        "candidates": [{"content": {"role": "model", "parts": [{"text": text}]}}]
    })
}

async fn mount_gemini(server: &MockServer, response: ResponseTemplate) {
    Mock::given(method("POST"))
        .and(path(GEMINI_PATH))
        .respond_with(response)
        .mount(server)
        .await;
}

#[tokio::test]
async fn test_well_formed_response_is_returned_unmodified() {
    let server = MockServer::start().await;
    let expected: Vec<AiInsight> = serde_json::from_value(five_insights()).unwrap();

    Mock::given(method("POST"))
        .and(path(GEMINI_PATH))
        .and(header("x-goog-api-key", "test-key"))
        .and(body_string_contains("Monthly Income: 150000"))
        .and(body_string_contains("application/json"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(gemini_body(&five_insights().to_string())),
        )
        .expect(1)
        .mount(&server)
        .await;

    let insights = fetch_insights(&gemini_settings(&server.uri()), &FinancialProfile::demo()).await;

    assert_eq!(insights, expected);
}

#[tokio::test]
async fn test_server_error_falls_back() {
    let server = MockServer::start().await;
    mount_gemini(&server, ResponseTemplate::new(500).set_body_string("overloaded")).await;

    let insights = fetch_insights(&gemini_settings(&server.uri()), &FinancialProfile::demo()).await;

    assert_eq!(insights.len(), 3);
    assert_eq!(insights, fallback_insights());
    assert_eq!(insights[0].title, "Emergency Fund Priority");
    assert_eq!(insights[1].title, "Tax Optimization (80C)");
    assert_eq!(insights[2].title, "Goal Feasibility");
}

#[tokio::test]
async fn test_malformed_json_falls_back() {
    let server = MockServer::start().await;
    mount_gemini(
        &server,
        ResponseTemplate::new(200).set_body_json(gemini_body("Sorry, I can't do that.")),
    )
    .await;

    let insights = fetch_insights(&gemini_settings(&server.uri()), &FinancialProfile::demo()).await;

    assert_eq!(insights, fallback_insights());
}

#[tokio::test]
async fn test_schema_violation_falls_back() {
    let server = MockServer::start().await;
    let bad = serde_json::json!([
        {"title": "x", "description": "y", "type": "critical", "category": "Goal", "impact": "High"}
    ]);
    mount_gemini(
        &server,
        ResponseTemplate::new(200).set_body_json(gemini_body(&bad.to_string())),
    )
    .await;

    let insights = fetch_insights(&gemini_settings(&server.uri()), &FinancialProfile::demo()).await;

    assert_eq!(insights, fallback_insights());
}

#[tokio::test]
async fn test_unexpected_envelope_falls_back() {
    let server = MockServer::start().await;
    mount_gemini(
        &server,
        ResponseTemplate::new(200).set_body_json(serde_json::json!({"error": "quota"})),
    )
    .await;

    let insights = fetch_insights(&gemini_settings(&server.uri()), &FinancialProfile::demo()).await;

    assert_eq!(insights, fallback_insights());
}

#[tokio::test]
async fn test_timeout_falls_back() {
    let server = MockServer::start().await;
    mount_gemini(
        &server,
        ResponseTemplate::new(200)
            .set_body_json(gemini_body(&five_insights().to_string()))
            .set_delay(Duration::from_secs(2)),
    )
    .await;

    let settings = gemini_settings(&server.uri()).with_timeout(Duration::from_millis(200));
    let insights = fetch_insights(&settings, &FinancialProfile::demo()).await;

    assert_eq!(insights, fallback_insights());
}

#[tokio::test]
async fn test_openai_compatible_provider() {
    let server = MockServer::start().await;
    let content = serde_json::json!({"insights": five_insights()}).to_string();

    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .and(header("Authorization", "Bearer sk-test"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "choices": [{"message": {"role": "assistant", "content": content}}]
        })))
        .mount(&server)
        .await;

    let settings = AiSettings::new(
        AiProvider::OpenAi,
        Some(server.uri()),
        Some("sk-test".into()),
        None,
    );
    let insights = fetch_insights(&settings, &FinancialProfile::demo()).await;

    assert_eq!(insights.len(), 5);
    assert_eq!(insights[4].title, "Prepay the loan");
}

#[tokio::test]
async fn test_ollama_provider() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/generate"))
        .and(body_string_contains("\"stream\":false"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "response": format!("```json\n{}\n```", five_insights())
        })))
        .mount(&server)
        .await;

    let settings = AiSettings::new(AiProvider::Ollama, Some(server.uri()), None, None);
    let insights = fetch_insights(&settings, &FinancialProfile::demo()).await;

    assert_eq!(insights.len(), 5);
}

#[tokio::test]
async fn test_anthropic_provider() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/v1/messages"))
        .and(header("x-api-key", "ant-test"))
        .and(header("anthropic-version", "2023-06-01"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "content": [{"type": "text", "text": five_insights().to_string()}]
        })))
        .mount(&server)
        .await;

    let settings = AiSettings::new(
        AiProvider::Anthropic,
        Some(server.uri()),
        Some("ant-test".into()),
        None,
    );
    let insights = fetch_insights(&settings, &FinancialProfile::demo()).await;

    assert_eq!(insights[0].title, "Goal needs a SIP");
}

#[tokio::test]
async fn test_post_insights_endpoint() {
    let server = MockServer::start().await;
    mount_gemini(
        &server,
        ResponseTemplate::new(200).set_body_json(gemini_body(&five_insights().to_string())),
    )
    .await;

    let client = TestClient::with_ai_settings(gemini_settings(&server.uri()));
    let body = profile_json(90_000.0, 30_000.0, 5_000.0, 100_000.0);
    let (status, body) = client.send_json("POST", "/api/insights", &body).await;

    assert_eq!(status, StatusCode::OK);
    let insights: Vec<AiInsight> = serde_json::from_str(&body).unwrap();
    assert_eq!(insights.len(), 5);
    // Stateless: the session is untouched.
    assert_eq!(client.state.session.generation(), 1);
}

#[tokio::test]
async fn test_post_insights_rejects_invalid_profile() {
    let client = TestClient::new();
    let (status, _) = client
        .send_json("POST", "/api/insights", r#"{"Name": "x"}"#)
        .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_insights_panel_shows_skeleton_then_cards() {
    let client = TestClient::new();

    let (status, body) = client.get("/insights").await;
    assert_eq!(status, StatusCode::OK);
    assert!(body.contains("animate-pulse"));
    assert!(body.contains("load delay:1s"));

    let (_, parsed): (_, Option<serde_json::Value>) = client.get_json("/api/insights").await;
    assert_eq!(parsed.unwrap()["status"], "loading");

    client.state.refresh_insights();
    client.wait_for_insights().await;

    let (status, body) = client.get("/insights").await;
    assert_eq!(status, StatusCode::OK);
    assert!(!body.contains("animate-pulse"));
    assert!(body.contains("Emergency Fund Priority"));
    assert!(body.contains("Tax Optimization (80C)"));
    assert!(body.contains("High Impact"));

    let (_, parsed): (_, Option<serde_json::Value>) = client.get_json("/api/insights").await;
    let json = parsed.unwrap();
    assert_eq!(json["status"], "ready");
    assert_eq!(json["insights"].as_array().unwrap().len(), 3);
}

#[tokio::test]
async fn test_late_response_for_old_profile_never_wins() {
    let server = MockServer::start().await;

    let stale = serde_json::json!([
        {"title": "Stale advice", "description": "old", "type": "info", "category": "Goal", "impact": "Low"}
    ]);
    let fresh = serde_json::json!([
        {"title": "Fresh advice", "description": "new", "type": "positive", "category": "Savings", "impact": "High"}
    ]);

    Mock::given(method("POST"))
        .and(path(GEMINI_PATH))
        .and(body_string_contains("Monthly Income: 150000"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(gemini_body(&stale.to_string()))
                .set_delay(Duration::from_millis(400)),
        )
        .mount(&server)
        .await;

    Mock::given(method("POST"))
        .and(path(GEMINI_PATH))
        .and(body_string_contains("Monthly Income: 90000"))
        .respond_with(ResponseTemplate::new(200).set_body_json(gemini_body(&fresh.to_string())))
        .mount(&server)
        .await;

    let client = TestClient::with_ai_settings(gemini_settings(&server.uri()));
    let session = Arc::clone(&client.state.session);

    client.state.refresh_insights();

    let body = profile_json(90_000.0, 30_000.0, 5_000.0, 0.0);
    let (status, _) = client.send_json("PUT", "/api/profile", &body).await;
    assert_eq!(status, StatusCode::OK);

    client.wait_for_insights().await;
    // Give the slow response time to arrive if it were still running.
    tokio::time::sleep(Duration::from_millis(600)).await;

    match session.insights() {
        InsightStatus::Ready(insights) => {
            assert_eq!(insights.len(), 1);
            assert_eq!(insights[0].title, "Fresh advice");
        }
        InsightStatus::Loading => panic!("insights should have settled"),
    }
}
