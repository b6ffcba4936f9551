use crate::catalog::{AvatarPlan, Economics, HostingOption, VoiceAgent, VoicePricing};
use crate::pricing::models::{AvatarCost, CostBreakdown, HostingCost, VoiceCost, Workload};

/// Calculator for the monthly cost of plans, agents and hosting
#[derive(Debug, Clone, Copy)]
pub struct CostCalculator {
    economics: Economics,
}

impl CostCalculator {
    pub fn new(economics: Economics) -> Self {
        Self { economics }
    }

    pub fn economics(&self) -> &Economics {
        &self.economics
    }

    /// Avatar cost for `account_factor` copies of a plan
    ///
    /// The factor is 1 for a two-plan combo, whose price and minutes are
    /// already aggregated, and the account count otherwise.
    pub fn avatar_cost(&self, plan: &AvatarPlan, account_factor: u32, minutes_per_month: f64) -> AvatarCost {
        let factor = account_factor.max(1) as f64;
        let base_usd = plan.monthly_price * factor;
        let included_minutes = plan.minutes * factor;
        let additional_minutes = (minutes_per_month - included_minutes).max(0.0);
        let additional_usd = additional_minutes * plan.additional_per_min;

        AvatarCost {
            base_usd,
            included_minutes,
            additional_minutes,
            additional_usd,
            total_usd: base_usd + additional_usd,
        }
    }

    /// Voice agent cost for a selection of `accounts` accounts
    pub fn voice_cost(&self, agent: &VoiceAgent, accounts: u32, is_combo: bool, workload: &Workload) -> VoiceCost {
        let minutes = workload.minutes_per_month;

        match agent.pricing {
            VoicePricing::Tokens {
                price_per_1m_tokens,
                tokens_per_minute,
            } => {
                let tokens_per_minute =
                    tokens_per_minute.unwrap_or(self.economics.default_tokens_per_minute);
                let total_tokens = minutes * tokens_per_minute;
                VoiceCost {
                    total_usd: (total_tokens / 1_000_000.0) * price_per_1m_tokens,
                    base_usd: None,
                    per_minute_usd: None,
                    total_tokens: Some(total_tokens),
                }
            }
            VoicePricing::PerMinute {
                price_per_minute,
                monthly_minimum_cost,
            } => {
                let variable_usd = price_per_minute * minutes;
                if is_combo {
                    // Floor is already the sum over both accounts
                    VoiceCost {
                        total_usd: monthly_minimum_cost.max(variable_usd),
                        base_usd: Some(monthly_minimum_cost),
                        per_minute_usd: Some(variable_usd),
                        total_tokens: None,
                    }
                } else {
                    let factor = accounts.max(1) as f64;
                    let per_account_usd = monthly_minimum_cost.max(price_per_minute * (minutes / factor));
                    VoiceCost {
                        total_usd: per_account_usd * factor,
                        base_usd: Some(monthly_minimum_cost * factor),
                        per_minute_usd: Some(variable_usd),
                        total_tokens: None,
                    }
                }
            }
            VoicePricing::PerMinutePerConcurrency { price_per_minute } => {
                let usd = price_per_minute * minutes * workload.concurrent_sessions as f64;
                VoiceCost {
                    total_usd: usd,
                    base_usd: None,
                    per_minute_usd: Some(usd),
                    total_tokens: None,
                }
            }
        }
    }

    /// Hosting cost; calls are derived from minutes at the configured call length
    pub fn hosting_cost(&self, option: &HostingOption, workload: &Workload) -> HostingCost {
        let calls = workload.minutes_per_month / self.economics.minutes_per_call;
        let base_inr = option.base_monthly_cost_inr;
        let users_inr = workload.users as f64 * option.cost_per_user_per_month_inr;
        let calls_inr = calls * option.cost_per_call_inr;

        HostingCost {
            base_inr,
            users_inr,
            calls_inr,
            total_inr: base_inr + users_inr + calls_inr,
        }
    }

    /// Combine category costs into a breakdown, adding the fixed monthly expense once
    pub fn breakdown(&self, avatar: &AvatarCost, voice: &VoiceCost, hosting: &HostingCost) -> CostBreakdown {
        let avatar_cost_inr = self.economics.to_inr(avatar.total_usd);
        let voice_cost_inr = self.economics.to_inr(voice.total_usd);
        let misc_expenses_inr = self.economics.misc_expenses_monthly_inr;
        let total_cost_inr = avatar_cost_inr + voice_cost_inr + hosting.total_inr + misc_expenses_inr;

        CostBreakdown {
            avatar_cost_inr,
            avatar_cost_usd: avatar.total_usd,
            avatar_base_cost_usd: avatar.base_usd,
            avatar_additional_minutes: avatar.additional_minutes,
            avatar_additional_cost_usd: avatar.additional_usd,
            voice_cost_inr,
            voice_cost_usd: voice.total_usd,
            voice_base_cost_usd: voice.base_usd,
            voice_per_minute_cost_usd: voice.per_minute_usd,
            voice_total_tokens: voice.total_tokens,
            hosting_cost_inr: hosting.total_inr,
            hosting_base_cost_inr: hosting.base_inr,
            hosting_users_cost_inr: hosting.users_inr,
            hosting_calls_cost_inr: hosting.calls_inr,
            misc_expenses_inr,
            total_cost_inr,
            total_cost_usd: self.economics.to_usd(total_cost_inr),
        }
    }
}
