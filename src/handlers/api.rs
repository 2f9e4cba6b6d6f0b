use axum::body::Bytes;
use axum::extract::State;
use axum::response::Json;
use serde::Serialize;
use tracing::info;

use crate::error::AppResult;
use crate::models::FinancialProfile;
use crate::services::flow::{cash_flow_buckets, CashFlow, FlowBucket, FlowGraph};
use crate::services::report::DashboardReport;
use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct ProfileReplaced {
    pub generation: u64,
}

pub async fn user_data(State(state): State<AppState>) -> Json<FinancialProfile> {
    Json(state.session.profile().as_ref().clone())
}

/// Swap in a new profile and start exactly one insight fetch for it.
pub async fn replace_profile(
    State(state): State<AppState>,
    body: Bytes,
) -> AppResult<Json<ProfileReplaced>> {
    let profile = FinancialProfile::parse(&body)?;
    let generation = state.replace_profile(profile);

    info!(generation, "Financial profile updated");
    Ok(Json(ProfileReplaced { generation }))
}

pub async fn current_report(State(state): State<AppState>) -> Json<DashboardReport> {
    Json(DashboardReport::build(&state.session.profile()))
}

pub async fn report_for(body: Bytes) -> AppResult<Json<DashboardReport>> {
    let profile = FinancialProfile::parse(&body)?;
    Ok(Json(DashboardReport::build(&profile)))
}

pub async fn cash_flow_chart(State(state): State<AppState>) -> Json<Vec<FlowBucket>> {
    let flow = CashFlow::derive(&state.session.profile());
    Json(cash_flow_buckets(&flow))
}

pub async fn flow_graph_chart(State(state): State<AppState>) -> Json<FlowGraph> {
    let flow = CashFlow::derive(&state.session.profile());
    Json(FlowGraph::build(&flow))
}
