use serde::Serialize;

use super::budget::BudgetInput;
use crate::catalog::{AvatarPlan, HostingOption, Limit, VoiceAgent};
use crate::combos::{AvatarSelection, VoiceSelection};
use crate::pricing::{CostBreakdown, CostCalculator, VoiceCost};

const FITS_BUDGET_BONUS: f64 = 1000.0;
const CAPACITY_BONUS: f64 = 100.0;
const VOICE_BONUS: f64 = 50.0;
const EXTRA_ACCOUNT_PENALTY: f64 = 25.0;

/// One fully costed (avatar, voice, hosting) configuration
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Combination {
    pub id: String,
    pub avatar_plan: AvatarPlan,
    pub avatar_accounts: u32,
    pub avatar_is_combo: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub voice_agent: Option<VoiceAgent>,
    /// 1 when the avatar's inbuilt voice is used
    pub voice_accounts: u32,
    pub voice_is_combo: bool,
    pub hosting_option: HostingOption,
    #[serde(rename = "totalCostINR")]
    pub total_cost_inr: f64,
    pub breakdown: CostBreakdown,
    pub fits_budget: bool,
    pub score: f64,
    pub warnings: Vec<String>,
    #[serde(skip)]
    pub avatar_capacity: Limit,
    #[serde(skip)]
    pub voice_capacity: Option<Limit>,
}

impl Combination {
    /// Cost, check and score one configuration
    pub fn evaluate(
        avatar: &AvatarSelection,
        voice: Option<&VoiceSelection>,
        hosting: &HostingOption,
        input: &BudgetInput,
        calculator: &CostCalculator,
    ) -> Self {
        let workload = input.workload();

        let avatar_cost = calculator.avatar_cost(
            &avatar.plan,
            avatar.account_factor(),
            workload.minutes_per_month,
        );
        let voice_cost = voice.map_or_else(VoiceCost::none, |v| {
            calculator.voice_cost(&v.agent, v.accounts, v.is_combo, &workload)
        });
        let hosting_cost = calculator.hosting_cost(hosting, &workload);
        let breakdown = calculator.breakdown(&avatar_cost, &voice_cost, &hosting_cost);

        let api_budget = input.api_budget_inr();
        let hosting_budget = input.hosting_budget_inr();
        let api_cost = breakdown.api_cost_inr();
        let total_cost_inr = breakdown.total_cost_inr;
        let fits_budget = total_cost_inr <= input.monthly_budget_inr
            && api_cost <= api_budget
            && breakdown.hosting_cost_inr <= hosting_budget;

        let voice_accounts = voice.map_or(1, |v| v.accounts);
        let avatar_capacity = avatar.capacity();
        let voice_capacity = voice.map(VoiceSelection::capacity);
        let required = input.concurrent_sessions;

        let mut warnings = Vec::new();
        if let Limit::Bounded(limit) = avatar_capacity {
            if required > limit {
                warnings.push(format!(
                    "Concurrent sessions ({}) exceed avatar plan limit with {} account(s) ({})",
                    required, avatar.accounts, limit
                ));
            }
        }
        if let Some(Limit::Bounded(limit)) = voice_capacity {
            if required > limit {
                warnings.push(format!(
                    "Concurrent sessions ({}) exceed voice agent limit with {} account(s) ({})",
                    required, voice_accounts, limit
                ));
            }
        }
        if let Limit::Bounded(max_length) = avatar.plan.max_length {
            if input.average_session_minutes() > max_length as f64 {
                warnings.push(format!(
                    "Average session length may exceed plan limit ({} min)",
                    max_length
                ));
            }
        }
        if api_cost > api_budget {
            warnings.push(format!(
                "API cost (₹{:.2}) exceeds allocated budget (₹{:.2})",
                api_cost, api_budget
            ));
        }
        if breakdown.hosting_cost_inr > hosting_budget {
            warnings.push(format!(
                "Hosting cost (₹{:.2}) exceeds allocated budget (₹{:.2})",
                breakdown.hosting_cost_inr, hosting_budget
            ));
        }

        let mut score = 0.0;
        if fits_budget {
            score += FITS_BUDGET_BONUS;
        }
        score -= total_cost_inr / 100.0;
        if avatar_capacity.covers(required) {
            score += CAPACITY_BONUS;
        }
        if voice_capacity.is_some_and(|capacity| capacity.covers(required)) {
            score += CAPACITY_BONUS;
        }
        if voice.is_some() || avatar.plan.has_inbuilt_voice {
            score += VOICE_BONUS;
        }
        score -= EXTRA_ACCOUNT_PENALTY * avatar.accounts.saturating_sub(1) as f64;
        score -= EXTRA_ACCOUNT_PENALTY * voice_accounts.saturating_sub(1) as f64;

        let id = format!(
            "{}x{}-{}x{}-{}",
            avatar.plan.id,
            avatar.accounts,
            voice.map_or("inbuilt", |v| v.agent.id.as_str()),
            voice_accounts,
            hosting.id
        );

        Self {
            id,
            avatar_plan: avatar.plan.clone(),
            avatar_accounts: avatar.accounts,
            avatar_is_combo: avatar.is_combo,
            voice_agent: voice.map(|v| v.agent.clone()),
            voice_accounts,
            voice_is_combo: voice.is_some_and(|v| v.is_combo),
            hosting_option: hosting.clone(),
            total_cost_inr,
            breakdown,
            fits_budget,
            score,
            warnings,
            avatar_capacity,
            voice_capacity,
        }
    }

    /// Hard feasibility, independent of budget
    pub fn is_feasible(&self, input: &BudgetInput) -> bool {
        let required = input.concurrent_sessions;
        if !self.avatar_capacity.covers(required) {
            return false;
        }
        if let Some(capacity) = self.voice_capacity {
            if !capacity.covers(required) {
                return false;
            }
        }
        input.use_voice_agent || self.avatar_plan.has_inbuilt_voice
    }
}
