//! Several workload scenarios planned in one run
//!
//! Input is JSON lines, one scenario per line. Every scenario is planned twice,
//! once on the avatar's inbuilt voice and once with a voice agent. A bad line
//! or a rejected request is reported in its outcome and the run carries on.

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use super::{calculate_combinations, BudgetInput, Combination};
use crate::catalog::Catalog;

/// Budget applied when a scenario does not name one
pub const DEFAULT_BATCH_BUDGET_INR: f64 = 100_000.0;
pub const DEFAULT_API_ALLOCATION_PERCENT: f64 = 60.0;
pub const DEFAULT_HOSTING_ALLOCATION_PERCENT: f64 = 40.0;

fn default_budget() -> f64 {
    DEFAULT_BATCH_BUDGET_INR
}

fn default_api_allocation() -> f64 {
    DEFAULT_API_ALLOCATION_PERCENT
}

fn default_hosting_allocation() -> f64 {
    DEFAULT_HOSTING_ALLOCATION_PERCENT
}

/// One line of a batch file
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BatchScenario {
    pub users: u32,
    #[serde(alias = "minutes")]
    pub minutes_per_month: f64,
    #[serde(alias = "concurrency")]
    pub concurrent_sessions: u32,
    #[serde(rename = "monthlyBudgetINR", default = "default_budget")]
    pub monthly_budget_inr: f64,
    #[serde(default = "default_api_allocation")]
    pub api_allocation_percent: f64,
    #[serde(default = "default_hosting_allocation")]
    pub hosting_allocation_percent: f64,
}

impl BatchScenario {
    pub fn request(&self, use_voice_agent: bool) -> BudgetInput {
        BudgetInput {
            monthly_budget_inr: self.monthly_budget_inr,
            api_allocation_percent: self.api_allocation_percent,
            hosting_allocation_percent: self.hosting_allocation_percent,
            users: self.users,
            concurrent_sessions: self.concurrent_sessions,
            minutes_per_month: self.minutes_per_month,
            use_voice_agent,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum VoiceMode {
    Inbuilt,
    Agent,
}

impl VoiceMode {
    pub const ALL: [VoiceMode; 2] = [VoiceMode::Inbuilt, VoiceMode::Agent];

    pub fn uses_agent(&self) -> bool {
        matches!(self, VoiceMode::Agent)
    }
}

/// Result of planning one scenario in one voice mode
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BatchOutcome {
    /// 1-based line in the batch input
    pub line: usize,
    /// Absent when the line itself could not be read
    #[serde(skip_serializing_if = "Option::is_none")]
    pub voice_mode: Option<VoiceMode>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub request: Option<BudgetInput>,
    pub combinations: Vec<Combination>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl BatchOutcome {
    fn failed(line: usize, voice_mode: Option<VoiceMode>, request: Option<BudgetInput>, error: String) -> Self {
        Self {
            line,
            voice_mode,
            request,
            combinations: Vec::new(),
            error: Some(error),
        }
    }
}

/// Plan every scenario in `input`; blank lines and `#` comments are skipped
pub fn run_batch(catalog: &Catalog, input: &str) -> Vec<BatchOutcome> {
    let mut outcomes = Vec::new();
    let mut scenarios = 0;

    for (index, raw) in input.lines().enumerate() {
        let line = index + 1;
        let raw = raw.trim();
        if raw.is_empty() || raw.starts_with('#') {
            continue;
        }
        scenarios += 1;

        let scenario: BatchScenario = match serde_json::from_str(raw) {
            Ok(scenario) => scenario,
            Err(e) => {
                warn!(line = line, error = %e, "Skipping unreadable batch scenario");
                outcomes.push(BatchOutcome::failed(line, None, None, e.to_string()));
                continue;
            }
        };

        for mode in VoiceMode::ALL {
            let request = scenario.request(mode.uses_agent());
            match calculate_combinations(catalog, &request) {
                Ok(combinations) => outcomes.push(BatchOutcome {
                    line,
                    voice_mode: Some(mode),
                    request: Some(request),
                    combinations,
                    error: None,
                }),
                Err(e) => {
                    warn!(line = line, voice_mode = ?mode, error = %e, "Batch scenario rejected");
                    outcomes.push(BatchOutcome::failed(line, Some(mode), Some(request), e.to_string()));
                }
            }
        }
    }

    let failed = outcomes.iter().filter(|o| o.error.is_some()).count();
    info!(scenarios = scenarios, outcomes = outcomes.len(), failed = failed, "Batch planned");

    outcomes
}
