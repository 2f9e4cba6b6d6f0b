pub mod api;
pub mod dashboard;
pub mod insights;

use axum::routing::{get, put};
use axum::Router;

use crate::state::AppState;

pub fn routes() -> Router<AppState> {
    Router::new()
        // Pages
        .route("/", get(dashboard::index))
        .route("/insights", get(insights::panel))
        // Profile
        .route("/api/user-data", get(api::user_data))
        .route("/api/profile", put(api::replace_profile))
        // Derived figures (JSON for charts)
        .route(
            "/api/report",
            get(api::current_report).post(api::report_for),
        )
        .route("/api/charts/cash-flow", get(api::cash_flow_chart))
        .route("/api/charts/flow-graph", get(api::flow_graph_chart))
        // Insights
        .route(
            "/api/insights",
            get(insights::status_json).post(insights::generate),
        )
        // Health check
        .route("/health", get(health))
}

async fn health() -> &'static str {
    "OK"
}
