pub mod ai_settings;
pub mod insight;
pub mod profile;

pub use ai_settings::{AiProvider, AiSettings};
pub use insight::{fallback_insights, AiInsight, Impact, InsightCategory, InsightType};
pub use profile::{FinancialProfile, Financials, Goal, Investments, Onboarding, Progress};
