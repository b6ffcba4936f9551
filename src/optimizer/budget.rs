use serde::{Deserialize, Serialize};

use crate::error::PlannerError;
use crate::pricing::Workload;

/// A planning request: budget, its split and the workload to carry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BudgetInput {
    #[serde(rename = "monthlyBudgetINR")]
    pub monthly_budget_inr: f64,
    /// Share of the budget for avatar and voice agent spend
    pub api_allocation_percent: f64,
    pub hosting_allocation_percent: f64,
    pub users: u32,
    pub concurrent_sessions: u32,
    pub minutes_per_month: f64,
    /// When false the avatar plan must bring its own voice
    pub use_voice_agent: bool,
}

impl BudgetInput {
    /// Parse and validate a JSON request body
    pub fn from_json(json: &str) -> Result<Self, PlannerError> {
        let input: BudgetInput =
            serde_json::from_str(json).map_err(|e| PlannerError::invalid("request", e.to_string()))?;
        input.validate()?;
        Ok(input)
    }

    pub fn validate(&self) -> Result<(), PlannerError> {
        if !self.monthly_budget_inr.is_finite() || self.monthly_budget_inr <= 0.0 {
            return Err(PlannerError::invalid(
                "monthlyBudgetINR",
                "must be a positive number",
            ));
        }
        check_percent("apiAllocationPercent", self.api_allocation_percent)?;
        check_percent("hostingAllocationPercent", self.hosting_allocation_percent)?;
        if self.users == 0 {
            return Err(PlannerError::invalid("users", "must be at least 1"));
        }
        if self.concurrent_sessions == 0 {
            return Err(PlannerError::invalid("concurrentSessions", "must be at least 1"));
        }
        if !self.minutes_per_month.is_finite() || self.minutes_per_month < 0.0 {
            return Err(PlannerError::invalid(
                "minutesPerMonth",
                "must be a non-negative number",
            ));
        }
        Ok(())
    }

    pub fn api_budget_inr(&self) -> f64 {
        self.monthly_budget_inr * self.api_allocation_percent / 100.0
    }

    pub fn hosting_budget_inr(&self) -> f64 {
        self.monthly_budget_inr * self.hosting_allocation_percent / 100.0
    }

    pub fn workload(&self) -> Workload {
        Workload {
            users: self.users,
            minutes_per_month: self.minutes_per_month,
            concurrent_sessions: self.concurrent_sessions,
        }
    }

    /// Average minutes per user per month
    pub fn average_session_minutes(&self) -> f64 {
        self.minutes_per_month / self.users.max(1) as f64
    }
}

fn check_percent(field: &str, value: f64) -> Result<(), PlannerError> {
    if !value.is_finite() || !(0.0..=100.0).contains(&value) {
        return Err(PlannerError::invalid(field, "must be between 0 and 100"));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    const VALID: &str = r#"{
        "monthlyBudgetINR": 150000,
        "apiAllocationPercent": 60,
        "hostingAllocationPercent": 40,
        "users": 50,
        "concurrentSessions": 10,
        "minutesPerMonth": 2000,
        "useVoiceAgent": false
    }"#;

    fn field_of(err: PlannerError) -> String {
        match err {
            PlannerError::InvalidInput { field, .. } => field,
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_parse_valid_request() {
        let input = BudgetInput::from_json(VALID).unwrap();
        assert_eq!(input.users, 50);
        assert_eq!(input.api_budget_inr(), 90_000.0);
        assert_eq!(input.hosting_budget_inr(), 60_000.0);
        assert_eq!(input.average_session_minutes(), 40.0);
        assert!(!input.use_voice_agent);
    }

    #[test]
    fn test_rejects_zero_users() {
        let json = VALID.replace("\"users\": 50", "\"users\": 0");
        assert_eq!(field_of(BudgetInput::from_json(&json).unwrap_err()), "users");
    }

    #[test]
    fn test_rejects_non_numeric_budget() {
        let json = VALID.replace("150000", "\"lots\"");
        assert_eq!(field_of(BudgetInput::from_json(&json).unwrap_err()), "request");
    }

    #[test]
    fn test_rejects_negative_counts_and_missing_fields() {
        let json = VALID.replace("\"concurrentSessions\": 10", "\"concurrentSessions\": -1");
        assert!(BudgetInput::from_json(&json).is_err());

        let json = VALID.replace("\"useVoiceAgent\": false", "\"extra\": 1");
        assert!(BudgetInput::from_json(&json).is_err());
    }

    #[test]
    fn test_rejects_out_of_range_values() {
        let json = VALID.replace("\"apiAllocationPercent\": 60", "\"apiAllocationPercent\": 120");
        assert_eq!(
            field_of(BudgetInput::from_json(&json).unwrap_err()),
            "apiAllocationPercent"
        );

        let json = VALID.replace("\"minutesPerMonth\": 2000", "\"minutesPerMonth\": -5");
        assert_eq!(field_of(BudgetInput::from_json(&json).unwrap_err()), "minutesPerMonth");

        let json = VALID.replace("150000", "0");
        assert_eq!(field_of(BudgetInput::from_json(&json).unwrap_err()), "monthlyBudgetINR");
    }

    #[test]
    fn test_allocations_need_not_sum_to_hundred() {
        let json = VALID.replace("\"hostingAllocationPercent\": 40", "\"hostingAllocationPercent\": 70");
        assert!(BudgetInput::from_json(&json).is_ok());
    }
}
