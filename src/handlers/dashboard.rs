use askama::Template;
use axum::extract::State;
use axum::response::Html;
use tracing::debug;

use crate::error::{AppResult, RenderHtml};
use crate::filters::{format_inr, format_percent};
use crate::services::flow::FlowBucket;
use crate::services::report::{DashboardReport, MetricCard};
use crate::state::AppState;
use crate::VERSION;

/// Legend row under the cash-flow donut.
pub struct BucketRow {
    pub name: &'static str,
    pub color: &'static str,
    pub formatted: String,
}

impl From<&FlowBucket> for BucketRow {
    fn from(bucket: &FlowBucket) -> Self {
        Self {
            name: bucket.name,
            color: bucket.color,
            formatted: format_inr(bucket.amount),
        }
    }
}

#[derive(Template)]
#[template(path = "pages/dashboard.html")]
pub struct DashboardTemplate {
    pub title: String,
    pub version: &'static str,
    pub name: String,
    pub last_updated: Option<String>,
    pub metrics: Vec<MetricCard>,
    pub buckets: Vec<BucketRow>,
    pub savings_rate: String,
    pub debt_ratio: String,
    pub goal_label: String,
    pub goal_percent: i64,
    pub goal_bar_width: String,
    pub goal_target: String,
    pub goal_months: u32,
}

pub async fn index(State(state): State<AppState>) -> AppResult<Html<String>> {
    let profile = state.session.profile();
    let report = DashboardReport::build(&profile);

    debug!(
        savings_rate = report.savings_rate,
        debt_ratio = report.debt_ratio,
        "Dashboard data derived"
    );

    let template = DashboardTemplate {
        title: "AI-Financial Advisor".into(),
        version: VERSION,
        name: profile.name.clone(),
        last_updated: profile
            .onboarding
            .as_ref()
            .map(|o| o.last_updated.format("%d/%m/%Y").to_string()),
        buckets: report.cash_flow_buckets.iter().map(BucketRow::from).collect(),
        savings_rate: format_percent(report.savings_rate),
        debt_ratio: format_percent(report.debt_ratio),
        goal_label: report.goal.label.clone(),
        goal_percent: report.goal.percent,
        goal_bar_width: format!("{:.1}", report.goal.bar_width),
        goal_target: format_inr(report.goal.target_amount),
        goal_months: report.goal.target_time_months,
        metrics: report.metrics,
    };

    template.render_html()
}
