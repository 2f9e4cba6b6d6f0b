use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InsightType {
    Positive,
    Warning,
    Info,
    Suggestion,
}

impl InsightType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Positive => "positive",
            Self::Warning => "warning",
            Self::Info => "info",
            Self::Suggestion => "suggestion",
        }
    }

    /// Card background/border classes.
    pub fn card_class(&self) -> &'static str {
        match self {
            Self::Positive => "bg-emerald-500/5 border-emerald-500/10",
            Self::Warning => "bg-rose-500/5 border-rose-500/10",
            Self::Suggestion => "bg-indigo-500/5 border-indigo-500/10",
            Self::Info => "bg-blue-500/5 border-blue-500/10",
        }
    }

    /// Category badge classes.
    pub fn badge_class(&self) -> &'static str {
        match self {
            Self::Positive => "bg-emerald-500/20 text-emerald-400",
            Self::Warning => "bg-rose-500/20 text-rose-400",
            Self::Suggestion => "bg-indigo-500/20 text-indigo-400",
            Self::Info => "bg-blue-500/20 text-blue-400",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum InsightCategory {
    Goal,
    Tax,
    Savings,
    Investment,
    Debt,
}

impl InsightCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Goal => "Goal",
            Self::Tax => "Tax",
            Self::Savings => "Savings",
            Self::Investment => "Investment",
            Self::Debt => "Debt",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Impact {
    High,
    Medium,
    Low,
}

impl Impact {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::High => "High",
            Self::Medium => "Medium",
            Self::Low => "Low",
        }
    }

    pub fn text_class(&self) -> &'static str {
        match self {
            Self::High => "text-rose-400",
            Self::Medium | Self::Low => "text-slate-500",
        }
    }
}

/// One advisory card produced by the text-generation service.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AiInsight {
    pub title: String,
    pub description: String,
    #[serde(rename = "type")]
    pub kind: InsightType,
    pub category: InsightCategory,
    pub impact: Impact,
}

/// Canned insights shown whenever the service cannot deliver a usable answer.
pub fn fallback_insights() -> Vec<AiInsight> {
    vec![
        AiInsight {
            title: "Emergency Fund Priority".into(),
            description: "Your current expenses are \u{20b9}45,000. We suggest maintaining an \
                          emergency fund of at least \u{20b9}2.7L (6 months) before aggressive \
                          investing."
                .into(),
            kind: InsightType::Warning,
            category: InsightCategory::Savings,
            impact: Impact::High,
        },
        AiInsight {
            title: "Tax Optimization (80C)".into(),
            description: "Consider investing in ELSS or PPF to exhaust your \u{20b9}1.5L limit \
                          under Section 80C for better post-tax returns."
                .into(),
            kind: InsightType::Suggestion,
            category: InsightCategory::Tax,
            impact: Impact::Medium,
        },
        AiInsight {
            title: "Goal Feasibility".into(),
            description: "To reach \u{20b9}21L in 24 months, you need a monthly SIP of approx \
                          \u{20b9}75,000 assuming 12% CAGR."
                .into(),
            kind: InsightType::Info,
            category: InsightCategory::Goal,
            impact: Impact::High,
        },
    ]
}
