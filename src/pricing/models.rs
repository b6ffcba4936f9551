use serde::Serialize;

/// Monthly usage a configuration has to carry
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Workload {
    pub users: u32,
    pub minutes_per_month: f64,
    pub concurrent_sessions: u32,
}

/// Avatar plan cost, USD
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct AvatarCost {
    pub base_usd: f64,
    pub included_minutes: f64,
    pub additional_minutes: f64,
    pub additional_usd: f64,
    pub total_usd: f64,
}

/// Voice agent cost, USD
///
/// The optional parts are only reported by the pricing models that have them.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct VoiceCost {
    pub total_usd: f64,
    pub base_usd: Option<f64>,
    pub per_minute_usd: Option<f64>,
    pub total_tokens: Option<f64>,
}

impl VoiceCost {
    /// Cost of relying on the avatar's inbuilt voice
    pub fn none() -> Self {
        Self::default()
    }
}

/// Hosting cost, INR
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct HostingCost {
    pub base_inr: f64,
    pub users_inr: f64,
    pub calls_inr: f64,
    pub total_inr: f64,
}

/// Cost breakdown for one combination, in both currencies
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CostBreakdown {
    #[serde(rename = "avatarCostINR")]
    pub avatar_cost_inr: f64,
    #[serde(rename = "avatarCostUSD")]
    pub avatar_cost_usd: f64,
    #[serde(rename = "avatarBaseCostUSD")]
    pub avatar_base_cost_usd: f64,
    pub avatar_additional_minutes: f64,
    #[serde(rename = "avatarAdditionalCostUSD")]
    pub avatar_additional_cost_usd: f64,
    #[serde(rename = "voiceCostINR")]
    pub voice_cost_inr: f64,
    #[serde(rename = "voiceCostUSD")]
    pub voice_cost_usd: f64,
    #[serde(rename = "voiceBaseCostUSD", skip_serializing_if = "Option::is_none")]
    pub voice_base_cost_usd: Option<f64>,
    #[serde(rename = "voicePerMinuteCostUSD", skip_serializing_if = "Option::is_none")]
    pub voice_per_minute_cost_usd: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub voice_total_tokens: Option<f64>,
    #[serde(rename = "hostingCostINR")]
    pub hosting_cost_inr: f64,
    #[serde(rename = "hostingBaseCostINR")]
    pub hosting_base_cost_inr: f64,
    #[serde(rename = "hostingUsersCostINR")]
    pub hosting_users_cost_inr: f64,
    #[serde(rename = "hostingCallsCostINR")]
    pub hosting_calls_cost_inr: f64,
    #[serde(rename = "miscExpensesINR")]
    pub misc_expenses_inr: f64,
    #[serde(rename = "totalCostINR")]
    pub total_cost_inr: f64,
    #[serde(rename = "totalCostUSD")]
    pub total_cost_usd: f64,
}

impl CostBreakdown {
    /// Avatar plus voice agent, the spend drawn from the API allocation
    pub fn api_cost_inr(&self) -> f64 {
        self.avatar_cost_inr + self.voice_cost_inr
    }
}
