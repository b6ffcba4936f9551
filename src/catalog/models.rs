use serde::ser::{SerializeStruct, Serializer};
use serde::{Deserialize, Serialize};

/// Avatar rendering providers known to the planner
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Provider {
    #[serde(rename = "heygen")]
    HeyGen,
    #[serde(rename = "anam")]
    Anam,
    #[serde(rename = "tavus", alias = "tevus")]
    Tavus,
}

impl Provider {
    /// Every provider, in the order candidates are generated
    pub const ALL: [Provider; 3] = [Provider::HeyGen, Provider::Anam, Provider::Tavus];

    pub fn as_str(&self) -> &'static str {
        match self {
            Provider::HeyGen => "heygen",
            Provider::Anam => "anam",
            Provider::Tavus => "tavus",
        }
    }
}

impl std::fmt::Display for Provider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Avatar plan tier as published by the provider
///
/// `Combo` is never found in a catalog; it marks a synthesized two-plan bundle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AvatarTier {
    Starter,
    Essential,
    Explorer,
    Growth,
    Pro,
    Business,
    Enterprise,
    Combo,
    #[serde(other)]
    Other,
}

/// Voice agent vendor family
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VoiceFamily {
    Hume,
    Google,
    #[serde(rename = "openai")]
    OpenAi,
    Xai,
}

impl VoiceFamily {
    pub const ALL: [VoiceFamily; 4] = [
        VoiceFamily::Hume,
        VoiceFamily::Google,
        VoiceFamily::OpenAi,
        VoiceFamily::Xai,
    ];

    /// Families sold as a ladder of SKUs whose tier breaks cost ties
    /// and which may be stacked as two accounts.
    pub fn is_tiered(&self) -> bool {
        matches!(self, VoiceFamily::Hume)
    }

    pub fn label(&self) -> &'static str {
        match self {
            VoiceFamily::Hume => "Hume",
            VoiceFamily::Google => "Google",
            VoiceFamily::OpenAi => "OpenAI",
            VoiceFamily::Xai => "xAI",
        }
    }
}

/// Voice agent SKU tier within a tiered family
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum VoiceTier {
    Pro,
    Scale,
    Business,
    Enterprise,
    #[serde(other)]
    Other,
}

/// An upper bound that may be absent
///
/// Used for concurrent sessions and for the length of a single session.
/// Serialized the way catalog files write it: the bound as a plain number,
/// with unlimited fields left out by their containers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Limit {
    Bounded(u32),
    Unlimited,
}

impl Limit {
    /// Interpret an optional catalog value, where absence means unlimited
    pub fn from_optional(value: Option<u32>) -> Self {
        value.map_or(Limit::Unlimited, Limit::Bounded)
    }

    pub fn is_unlimited(&self) -> bool {
        matches!(self, Limit::Unlimited)
    }

    /// Limit of `factor` independent copies
    pub fn scaled(self, factor: u32) -> Self {
        match self {
            Limit::Bounded(n) => Limit::Bounded(n.saturating_mul(factor)),
            Limit::Unlimited => Limit::Unlimited,
        }
    }

    /// Sum of two limits; unlimited absorbs
    pub fn sum(self, other: Limit) -> Self {
        match (self, other) {
            (Limit::Bounded(a), Limit::Bounded(b)) => Limit::Bounded(a.saturating_add(b)),
            _ => Limit::Unlimited,
        }
    }

    /// Larger of two limits; unlimited absorbs
    pub fn max(self, other: Limit) -> Self {
        match (self, other) {
            (Limit::Bounded(a), Limit::Bounded(b)) => Limit::Bounded(a.max(b)),
            _ => Limit::Unlimited,
        }
    }

    pub fn covers(&self, required: u32) -> bool {
        match self {
            Limit::Bounded(n) => *n >= required,
            Limit::Unlimited => true,
        }
    }
}

impl Serialize for Limit {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Limit::Bounded(n) => serializer.serialize_u32(*n),
            Limit::Unlimited => serializer.serialize_none(),
        }
    }
}

/// Yearly contract terms attached to enterprise avatar plans
#[derive(Debug, Clone, PartialEq)]
pub struct AnnualCommitment {
    pub commitment_usd: Option<f64>,
    pub total_annual_minutes: Option<f64>,
}

/// Flattened into the plan as `isAnnualOnly` plus the optional terms
impl Serialize for AnnualCommitment {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut state = serializer.serialize_struct("AnnualCommitment", 3)?;
        state.serialize_field("isAnnualOnly", &true)?;
        match self.commitment_usd {
            Some(usd) => state.serialize_field("annualCommitmentUSD", &usd)?,
            None => state.skip_field("annualCommitmentUSD")?,
        }
        match self.total_annual_minutes {
            Some(minutes) => state.serialize_field("totalAnnualMinutes", &minutes)?,
            None => state.skip_field("totalAnnualMinutes")?,
        }
        state.end()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AvatarPlan {
    pub id: String,
    pub name: String,
    pub provider: Provider,
    pub tier: AvatarTier,
    /// USD per month
    pub monthly_price: f64,
    /// Included minutes per month
    pub minutes: f64,
    #[serde(skip_serializing_if = "Limit::is_unlimited")]
    pub max_length: Limit,
    #[serde(skip_serializing_if = "Limit::is_unlimited")]
    pub concurrency: Limit,
    /// USD per minute beyond the included minutes
    pub additional_per_min: f64,
    pub has_inbuilt_voice: bool,
    #[serde(flatten)]
    pub annual: Option<AnnualCommitment>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
}

impl AvatarPlan {
    pub fn is_annual_only(&self) -> bool {
        self.annual.is_some()
    }

    /// Enterprise and annual-only plans are sold under contract and
    /// cannot be stacked into a two-plan bundle.
    pub fn is_combinable(&self) -> bool {
        self.tier != AvatarTier::Enterprise && !self.is_annual_only()
    }
}

/// How a voice agent is billed
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(tag = "pricingModel", rename_all = "kebab-case")]
pub enum VoicePricing {
    #[serde(rename_all = "camelCase")]
    Tokens {
        #[serde(rename = "pricePer1MTokens")]
        price_per_1m_tokens: f64,
        /// Falls back to the configured default when absent
        #[serde(skip_serializing_if = "Option::is_none")]
        tokens_per_minute: Option<f64>,
    },
    #[serde(rename_all = "camelCase")]
    PerMinute {
        price_per_minute: f64,
        /// Minimum monthly spend per account, USD
        monthly_minimum_cost: f64,
    },
    #[serde(rename_all = "camelCase")]
    PerMinutePerConcurrency { price_per_minute: f64 },
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VoiceAgent {
    pub id: String,
    pub name: String,
    pub family: VoiceFamily,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tier: Option<VoiceTier>,
    #[serde(flatten)]
    pub pricing: VoicePricing,
    #[serde(skip_serializing_if = "Limit::is_unlimited")]
    pub concurrency: Limit,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HostingOption {
    pub id: String,
    pub name: String,
    #[serde(rename = "baseMonthlyCostINR")]
    pub base_monthly_cost_inr: f64,
    #[serde(rename = "costPerUserPerMonthINR")]
    pub cost_per_user_per_month_inr: f64,
    #[serde(rename = "costPerCallINR")]
    pub cost_per_call_inr: f64,
    /// Informational only
    #[serde(rename = "storageGB", default)]
    pub storage_gb: f64,
}

/// Business constants applied on top of list prices
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Economics {
    /// INR per USD
    pub usd_to_inr: f64,
    /// Fixed monthly expense added once to every combination
    pub misc_expenses_monthly_inr: f64,
    /// Average call length used to turn minutes into billable calls
    pub minutes_per_call: f64,
    pub default_tokens_per_minute: f64,
}

impl Default for Economics {
    fn default() -> Self {
        Self {
            usd_to_inr: 90.0,
            misc_expenses_monthly_inr: 30_000.0,
            minutes_per_call: 10.0,
            default_tokens_per_minute: 1_000.0,
        }
    }
}

impl Economics {
    pub fn to_inr(&self, usd: f64) -> f64 {
        usd * self.usd_to_inr
    }

    pub fn to_usd(&self, inr: f64) -> f64 {
        inr / self.usd_to_inr
    }
}

/// Immutable reference data every calculation runs against
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Catalog {
    pub avatar_plans: Vec<AvatarPlan>,
    pub voice_agents: Vec<VoiceAgent>,
    pub hosting_options: Vec<HostingOption>,
    pub economics: Economics,
}
