//! Cash-flow derivation behind the dashboard charts.
//!
//! [`CashFlow::derive`] is the single source of every monetary figure the
//! charts show. The donut and Sankey views only select from it. Chart widths
//! go through [`VisibilityFloor`] as a separate step, so a bucket's `amount`
//! is always the real figure and `render_value` is only for drawing.

use serde::Serialize;

use crate::models::FinancialProfile;

/// The Sankey view spreads the invested total over a year of monthly flows.
pub const MONTHS_PER_YEAR: f64 = 12.0;

/// Horizon over which the invested total is amortized for `amortized_surplus`.
pub const INVESTMENT_AMORTIZATION_MONTHS: f64 = 60.0;

/// Minimum drawn size for a chart segment or link.
///
/// Charting libraries drop zero-width links and slices, which would make a
/// node disappear from the diagram. This floor is a rendering artifact and is
/// never mixed into real totals.
pub struct VisibilityFloor;

impl VisibilityFloor {
    pub const MIN: f64 = 1.0;

    pub fn apply(value: f64) -> f64 {
        value.max(Self::MIN)
    }
}

/// True monthly figures derived from one profile. No field is floored for display.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct CashFlow {
    pub income: f64,
    pub expenses: f64,
    pub debt: f64,
    pub invested_amount: f64,
    /// `max(0, income - expenses - debt)`
    pub surplus: f64,
    /// Monthly equivalent of the invested total.
    pub monthly_investment: f64,
    /// Surplus after amortizing the invested total over five years.
    pub amortized_surplus: f64,
    /// Surplus left once the monthly investment flow is taken out.
    pub surplus_after_investment: f64,
}

impl CashFlow {
    pub fn derive(profile: &FinancialProfile) -> Self {
        Self::from_amounts(
            profile.financials.monthly_income,
            profile.financials.monthly_expenses,
            profile.financials.monthly_debt_payment,
            profile.investments.invested_amount,
        )
    }

    pub fn from_amounts(income: f64, expenses: f64, debt: f64, invested_amount: f64) -> Self {
        let free_cash = income - expenses - debt;
        let monthly_investment = invested_amount / MONTHS_PER_YEAR;
        let amortization = if invested_amount > 0.0 {
            invested_amount / INVESTMENT_AMORTIZATION_MONTHS
        } else {
            0.0
        };

        Self {
            income,
            expenses,
            debt,
            invested_amount,
            surplus: non_negative(free_cash),
            monthly_investment,
            amortized_surplus: non_negative(free_cash - amortization),
            surplus_after_investment: non_negative(free_cash - monthly_investment),
        }
    }

    /// Share of income left as investable surplus, in whole percent.
    pub fn savings_rate(&self) -> i64 {
        whole_percent(self.surplus, self.income)
    }

    /// Share of income going to debt repayment, in whole percent.
    pub fn debt_ratio(&self) -> i64 {
        whole_percent(self.debt, self.income)
    }
}

fn non_negative(value: f64) -> f64 {
    value.max(0.0)
}

/// `round(part / whole * 100)`, or 0 when there is nothing to divide by.
pub fn whole_percent(part: f64, whole: f64) -> i64 {
    if whole > 0.0 {
        (part / whole * 100.0).round() as i64
    } else {
        0
    }
}

/// One slice of the proportional (donut) chart.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FlowBucket {
    pub name: &'static str,
    pub amount: f64,
    pub render_value: f64,
    pub color: &'static str,
}

impl FlowBucket {
    fn new(name: &'static str, amount: f64, color: &'static str) -> Self {
        Self {
            name,
            amount,
            render_value: VisibilityFloor::apply(amount),
            color,
        }
    }
}

pub const LIVING_EXPENSES: &str = "Living Expenses";
pub const DEBT_REPAYMENT: &str = "Debt Repayment";
pub const INVESTABLE_SURPLUS: &str = "Investable Surplus";

/// Expenses, debt and surplus for the donut chart. Amounts sum to
/// `max(income, expenses + debt)`.
pub fn cash_flow_buckets(flow: &CashFlow) -> Vec<FlowBucket> {
    vec![
        FlowBucket::new(LIVING_EXPENSES, flow.expenses, "#f43f5e"),
        FlowBucket::new(DEBT_REPAYMENT, flow.debt, "#f59e0b"),
        FlowBucket::new(INVESTABLE_SURPLUS, flow.surplus, "#10b981"),
    ]
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum NodeCategory {
    Source,
    Expense,
    Debt,
    Investment,
    Savings,
}

impl NodeCategory {
    pub fn color(&self) -> &'static str {
        match self {
            Self::Source => "#3b82f6",
            Self::Expense => "#ef4444",
            Self::Debt => "#f59e0b",
            Self::Investment => "#10b981",
            Self::Savings => "#6366f1",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FlowNode {
    pub name: &'static str,
    pub category: NodeCategory,
    pub color: &'static str,
}

impl FlowNode {
    fn new(name: &'static str, category: NodeCategory) -> Self {
        Self {
            name,
            category,
            color: category.color(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FlowLink {
    pub source: usize,
    pub target: usize,
    pub amount: f64,
    pub render_value: f64,
}

/// Nodes and links for the Sankey diagram.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FlowGraph {
    pub nodes: Vec<FlowNode>,
    pub links: Vec<FlowLink>,
}

pub const INCOME_NODE: usize = 0;
pub const EXPENSES_NODE: usize = 1;
pub const DEBT_NODE: usize = 2;
pub const INVESTMENTS_NODE: usize = 3;
pub const SAVINGS_NODE: usize = 4;

impl FlowGraph {
    pub fn build(flow: &CashFlow) -> Self {
        let nodes = vec![
            FlowNode::new("Monthly Income", NodeCategory::Source),
            FlowNode::new("Expenses", NodeCategory::Expense),
            FlowNode::new("Debt Repayment", NodeCategory::Debt),
            FlowNode::new("Investments", NodeCategory::Investment),
            FlowNode::new("Surplus Savings", NodeCategory::Savings),
        ];

        let links = [
            (EXPENSES_NODE, flow.expenses),
            (DEBT_NODE, flow.debt),
            (INVESTMENTS_NODE, flow.monthly_investment),
            (SAVINGS_NODE, flow.surplus_after_investment),
        ]
        .into_iter()
        .map(|(target, amount)| FlowLink {
            source: INCOME_NODE,
            target,
            amount,
            render_value: VisibilityFloor::apply(amount),
        })
        .collect();

        Self { nodes, links }
    }

    pub fn link_to(&self, target: usize) -> Option<&FlowLink> {
        self.links.iter().find(|l| l.target == target)
    }
}
