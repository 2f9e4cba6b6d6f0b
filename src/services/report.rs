use serde::Serialize;

use crate::filters::format_inr;
use crate::models::FinancialProfile;
use crate::services::flow::{cash_flow_buckets, CashFlow, FlowBucket, FlowGraph};

/// Headline figure shown in the metric cards at the top of the dashboard.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MetricCard {
    pub title: &'static str,
    pub amount: f64,
    pub formatted: String,
    /// Small badge text (risk profile, status) or goal label.
    pub caption: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GoalProgress {
    pub label: String,
    pub target_amount: f64,
    pub target_time_months: u32,
    /// Invested share of the target, rounded for display. May exceed 100.
    pub percent: i64,
    /// Progress bar width, capped at 100.
    pub bar_width: f64,
}

impl GoalProgress {
    pub fn from_profile(profile: &FinancialProfile) -> Self {
        let target = profile.goal.target_amount;
        let raw = if target > 0.0 {
            profile.investments.invested_amount / target * 100.0
        } else {
            0.0
        };

        Self {
            label: profile.goal.label.clone(),
            target_amount: target,
            target_time_months: profile.goal.target_time_months,
            percent: raw.round() as i64,
            bar_width: raw.clamp(0.0, 100.0),
        }
    }
}

/// Everything the dashboard shows that can be computed from the profile alone.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DashboardReport {
    pub metrics: Vec<MetricCard>,
    pub savings_rate: i64,
    pub debt_ratio: i64,
    pub goal: GoalProgress,
    pub cash_flow: CashFlow,
    pub cash_flow_buckets: Vec<FlowBucket>,
    pub flow_graph: FlowGraph,
}

impl DashboardReport {
    pub fn build(profile: &FinancialProfile) -> Self {
        let cash_flow = CashFlow::derive(profile);

        let metrics = vec![
            metric(
                "Monthly Income",
                cash_flow.income,
                profile.employment_status.clone().unwrap_or_default(),
            ),
            metric(
                "Total Portfolio",
                cash_flow.invested_amount,
                profile.investments.risk_profile.clone(),
            ),
            metric(
                "Goal Target",
                profile.goal.target_amount,
                profile.goal.label.clone(),
            ),
            metric("Monthly Debt", cash_flow.debt, "Active".into()),
        ];

        Self {
            metrics,
            savings_rate: cash_flow.savings_rate(),
            debt_ratio: cash_flow.debt_ratio(),
            goal: GoalProgress::from_profile(profile),
            cash_flow_buckets: cash_flow_buckets(&cash_flow),
            flow_graph: FlowGraph::build(&cash_flow),
            cash_flow,
        }
    }
}

fn metric(title: &'static str, amount: f64, caption: String) -> MetricCard {
    MetricCard {
        title,
        amount,
        formatted: format_inr(amount),
        caption,
    }
}
