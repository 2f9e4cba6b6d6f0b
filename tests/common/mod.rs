//! Shared test utilities for integration tests.
//!
//! This module provides a `TestClient` that drives the application router
//! directly, without binding a socket. Methods are intentionally broad to
//! support various test scenarios across different test files.

#![allow(dead_code)]

use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::Router;
use finadvisor::config::Config;
use finadvisor::handlers;
use finadvisor::models::{AiProvider, AiSettings, FinancialProfile};
use finadvisor::services::session::DashboardSession;
use finadvisor::state::AppState;
use http_body_util::BodyExt;
use std::path::PathBuf;
use std::time::Duration;
use tower::ServiceExt;

/// The upstream record format, as a test fixture.
pub const PROFILE_JSON: &str = r#"{
    "_id": {"$oid": "6998a8cfcf1b460b34615c33"},
    "Name": "Aditya Sharma",
    "email": "aditya@example.com",
    "Age": "21",
    "employement-status": "Salaried",
    "Goal": {"goal": "Luxury Car", "target-amt": 2100000, "target-time": 24},
    "financials": {"monthly-income": 150000, "monthly-expenses": 45000, "debt": 12000, "em-fund-opted": true},
    "investments": {"risk-opt": "Medium", "prefered-mode": "Lumpsum", "invest-amt": 500000},
    "progress": {"tenure": 1, "start_date": "2024-02-20", "auto-adjust": false},
    "onboarding": {"status": "completed", "current_step": null, "last_updated": "2024-02-20T18:33:53.678600"}
}"#;

/// Profile JSON with custom cash-flow figures.
pub fn profile_json(income: f64, expenses: f64, debt: f64, invested: f64) -> String {
    serde_json::json!({
        "Name": "Test User",
        "email": "test@example.com",
        "Age": "30",
        "Goal": {"goal": "House", "target-amt": 1000000, "target-time": 36},
        "financials": {
            "monthly-income": income,
            "monthly-expenses": expenses,
            "debt": debt,
            "em-fund-opted": false
        },
        "investments": {"risk-opt": "Low", "prefered-mode": "SIP", "invest-amt": invested}
    })
    .to_string()
}

/// Gemini settings pointing at a mock server.
pub fn gemini_settings(base_url: &str) -> AiSettings {
    AiSettings::new(
        AiProvider::Gemini,
        Some(base_url.to_string()),
        Some("test-key".to_string()),
        None,
    )
    .with_timeout(Duration::from_secs(5))
}

/// A test client holding one application state, allowing sequential requests.
pub struct TestClient {
    pub state: AppState,
}

impl TestClient {
    /// Demo profile, unconfigured AI provider (insights always fall back).
    pub fn new() -> Self {
        Self::with_ai_settings(AiSettings::new(AiProvider::Gemini, None, None, None))
    }

    pub fn with_ai_settings(ai: AiSettings) -> Self {
        let config = Config {
            host: "127.0.0.1".into(),
            port: 7070,
            static_path: PathBuf::from("static"),
            profile_path: None,
            ai,
        };

        let state = AppState::new(config, DashboardSession::new(FinancialProfile::demo()));
        Self { state }
    }

    pub fn router(&self) -> Router {
        handlers::routes().with_state(self.state.clone())
    }

    async fn send(&self, request: Request<Body>) -> (StatusCode, String) {
        let response = self.router().oneshot(request).await.unwrap();
        let status = response.status();
        let body = response.into_body().collect().await.unwrap().to_bytes();
        (status, String::from_utf8_lossy(&body).to_string())
    }

    /// Make a GET request and return status and body.
    pub async fn get(&self, uri: &str) -> (StatusCode, String) {
        self.send(Request::builder().uri(uri).body(Body::empty()).unwrap())
            .await
    }

    /// Send a JSON body with the given method and return status and body.
    pub async fn send_json(&self, method: &str, uri: &str, body: &str) -> (StatusCode, String) {
        self.send(
            Request::builder()
                .method(method)
                .uri(uri)
                .header("Content-Type", "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
        )
        .await
    }

    /// Get JSON from an endpoint and parse it.
    pub async fn get_json<T: serde::de::DeserializeOwned>(
        &self,
        uri: &str,
    ) -> (StatusCode, Option<T>) {
        let (status, body) = self.get(uri).await;
        let parsed = serde_json::from_str(&body).ok();
        (status, parsed)
    }

    /// Wait until the session's insights slot leaves the loading state.
    pub async fn wait_for_insights(&self) {
        for _ in 0..100 {
            if !self.state.session.insights().is_loading() {
                return;
            }
            tokio::time::sleep(Duration::from_millis(20)).await;
        }
        panic!("insights never settled");
    }
}

impl Default for TestClient {
    fn default() -> Self {
        Self::new()
    }
}
