use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

use crate::error::{AppError, AppResult};

/// Object id as exported by the document store that produces profile records.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecordId {
    #[serde(rename = "$oid")]
    pub oid: String,
}

/// Savings goal the user is working towards.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Goal {
    #[serde(rename = "goal")]
    pub label: String,
    #[serde(rename = "target-amt")]
    pub target_amount: f64,
    #[serde(rename = "target-time")]
    pub target_time_months: u32,
}

/// Monthly cash-flow figures. All amounts are in rupees.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Financials {
    #[serde(rename = "monthly-income")]
    pub monthly_income: f64,
    #[serde(rename = "monthly-expenses")]
    pub monthly_expenses: f64,
    #[serde(rename = "debt")]
    pub monthly_debt_payment: f64,
    #[serde(rename = "em-fund-opted")]
    pub emergency_fund_opted: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Investments {
    /// Low / Medium / High. Passed through as-is.
    #[serde(rename = "risk-opt")]
    pub risk_profile: String,
    #[serde(rename = "prefered-mode")]
    pub preferred_mode: String,
    #[serde(rename = "invest-amt")]
    pub invested_amount: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Progress {
    pub tenure: u32,
    pub start_date: NaiveDate,
    #[serde(rename = "auto-adjust")]
    pub auto_adjust: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Onboarding {
    pub status: String,
    pub current_step: Option<String>,
    pub last_updated: NaiveDateTime,
}

/// Snapshot of one user's finances, the sole input to every derivation.
///
/// Field names on the wire follow the upstream record format, which is why
/// several of them are renamed. Unknown fields (e.g. `password`) are ignored
/// and never echoed back.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FinancialProfile {
    #[serde(rename = "_id", default, skip_serializing_if = "Option::is_none")]
    pub id: Option<RecordId>,
    #[serde(rename = "Name")]
    pub name: String,
    pub email: String,
    #[serde(rename = "Age")]
    pub age: String,
    #[serde(
        rename = "employement-status",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub employment_status: Option<String>,
    #[serde(rename = "Goal")]
    pub goal: Goal,
    pub financials: Financials,
    pub investments: Investments,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub progress: Option<Progress>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub onboarding: Option<Onboarding>,
}

impl FinancialProfile {
    /// Parse and validate a profile from raw JSON.
    ///
    /// This is the one place untrusted profile data enters the system, so
    /// every shape or range problem is reported here as a validation error.
    pub fn parse(bytes: &[u8]) -> AppResult<Self> {
        let profile: Self = serde_json::from_slice(bytes)
            .map_err(|e| AppError::Validation(format!("Invalid financial profile: {}", e)))?;
        profile.validate()?;
        Ok(profile)
    }

    pub fn from_json_file(path: &Path) -> AppResult<Self> {
        let bytes = fs::read(path)?;
        Self::parse(&bytes)
    }

    pub fn validate(&self) -> AppResult<()> {
        non_negative("financials.monthly-income", self.financials.monthly_income)?;
        non_negative("financials.monthly-expenses", self.financials.monthly_expenses)?;
        non_negative("financials.debt", self.financials.monthly_debt_payment)?;
        non_negative("investments.invest-amt", self.investments.invested_amount)?;

        if !self.goal.target_amount.is_finite() || self.goal.target_amount <= 0.0 {
            return Err(AppError::Validation(format!(
                "Goal.target-amt must be greater than zero, got {}",
                self.goal.target_amount
            )));
        }
        if self.goal.target_time_months == 0 {
            return Err(AppError::Validation(
                "Goal.target-time must be at least one month".into(),
            ));
        }

        Ok(())
    }

    /// Demo record served when no profile file is configured.
    pub fn demo() -> Self {
        Self {
            id: Some(RecordId {
                oid: "6998a8cfcf1b460b34615c33".into(),
            }),
            name: "Aditya Sharma".into(),
            email: "aditya@example.com".into(),
            age: "21".into(),
            employment_status: Some("Salaried".into()),
            goal: Goal {
                label: "Luxury Car".into(),
                target_amount: 2_100_000.0,
                target_time_months: 24,
            },
            financials: Financials {
                monthly_income: 150_000.0,
                monthly_expenses: 45_000.0,
                monthly_debt_payment: 12_000.0,
                emergency_fund_opted: true,
            },
            investments: Investments {
                risk_profile: "Medium".into(),
                preferred_mode: "Lumpsum".into(),
                invested_amount: 500_000.0,
            },
            progress: NaiveDate::from_ymd_opt(2024, 2, 20).map(|start_date| Progress {
                tenure: 1,
                start_date,
                auto_adjust: false,
            }),
            onboarding: NaiveDate::from_ymd_opt(2024, 2, 20)
                .and_then(|d| d.and_hms_micro_opt(18, 33, 53, 678_600))
                .map(|last_updated| Onboarding {
                    status: "completed".into(),
                    current_step: None,
                    last_updated,
                }),
        }
    }
}

fn non_negative(field: &str, value: f64) -> AppResult<()> {
    if value.is_finite() && value >= 0.0 {
        Ok(())
    } else {
        Err(AppError::Validation(format!(
            "{} must be a non-negative amount, got {}",
            field, value
        )))
    }
}
