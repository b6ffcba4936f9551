use crate::catalog::{AvatarPlan, AvatarTier, Limit, VoiceAgent, VoicePricing};

/// An avatar plan chosen for evaluation, with the accounts it runs on
#[derive(Debug, Clone, PartialEq)]
pub struct AvatarSelection {
    pub plan: AvatarPlan,
    pub accounts: u32,
    /// Set when `plan` is a synthesized two-plan bundle
    pub is_combo: bool,
}

impl AvatarSelection {
    pub fn single(plan: AvatarPlan) -> Self {
        Self {
            plan,
            accounts: 1,
            is_combo: false,
        }
    }

    /// Bundle two plans of the same provider into one two-account selection
    ///
    /// Returns `None` when the plans belong to different providers or either
    /// plan is sold under an enterprise or annual contract.
    pub fn combo(a: &AvatarPlan, b: &AvatarPlan) -> Option<Self> {
        if a.provider != b.provider || !a.is_combinable() || !b.is_combinable() {
            return None;
        }
        let (first, second) = if a.id <= b.id { (a, b) } else { (b, a) };

        Some(Self {
            plan: aggregate_avatar_plans(first, second),
            accounts: 2,
            is_combo: true,
        })
    }

    /// Multiplier applied to price, minutes and capacity
    pub fn account_factor(&self) -> u32 {
        if self.is_combo {
            1
        } else {
            self.accounts
        }
    }

    pub fn capacity(&self) -> Limit {
        self.plan.concurrency.scaled(self.account_factor())
    }

    pub fn meets_concurrency(&self, required: u32) -> bool {
        self.capacity().covers(required)
    }
}

fn aggregate_avatar_plans(first: &AvatarPlan, second: &AvatarPlan) -> AvatarPlan {
    AvatarPlan {
        id: format!("{}+{}", first.id, second.id),
        name: format!(
            "{} combo: {} + {}",
            first.provider.as_str().to_uppercase(),
            first.name,
            second.name
        ),
        provider: first.provider,
        tier: AvatarTier::Combo,
        monthly_price: first.monthly_price + second.monthly_price,
        minutes: first.minutes + second.minutes,
        max_length: first.max_length.max(second.max_length),
        concurrency: first.concurrency.sum(second.concurrency),
        // Overage is billed at the cheaper of the two rates
        additional_per_min: first.additional_per_min.min(second.additional_per_min),
        has_inbuilt_voice: first.has_inbuilt_voice && second.has_inbuilt_voice,
        annual: None,
        note: None,
    }
}

/// A voice agent chosen for evaluation, with the accounts it runs on
#[derive(Debug, Clone, PartialEq)]
pub struct VoiceSelection {
    pub agent: VoiceAgent,
    pub accounts: u32,
    /// Set when `agent` is a synthesized two-agent bundle
    pub is_combo: bool,
}

impl VoiceSelection {
    pub fn single(agent: VoiceAgent) -> Self {
        Self {
            agent,
            accounts: 1,
            is_combo: false,
        }
    }

    /// Bundle two per-minute agents of one tiered family into a two-account selection
    pub fn combo(a: &VoiceAgent, b: &VoiceAgent) -> Option<Self> {
        if a.family != b.family || !a.family.is_tiered() {
            return None;
        }
        let (first, second) = if a.id <= b.id { (a, b) } else { (b, a) };

        aggregate_voice_agents(first, second).map(|agent| Self {
            agent,
            accounts: 2,
            is_combo: true,
        })
    }

    pub fn account_factor(&self) -> u32 {
        if self.is_combo {
            1
        } else {
            self.accounts
        }
    }

    pub fn capacity(&self) -> Limit {
        self.agent.concurrency.scaled(self.account_factor())
    }

    pub fn meets_concurrency(&self, required: u32) -> bool {
        self.capacity().covers(required)
    }
}

fn aggregate_voice_agents(first: &VoiceAgent, second: &VoiceAgent) -> Option<VoiceAgent> {
    let (
        VoicePricing::PerMinute {
            price_per_minute: rate_a,
            monthly_minimum_cost: floor_a,
        },
        VoicePricing::PerMinute {
            price_per_minute: rate_b,
            monthly_minimum_cost: floor_b,
        },
    ) = (first.pricing, second.pricing)
    else {
        return None;
    };

    Some(VoiceAgent {
        id: format!("{}+{}", first.id, second.id),
        name: format!("{} combo: {} + {}", first.family.label(), first.name, second.name),
        family: first.family,
        tier: None,
        pricing: VoicePricing::PerMinute {
            price_per_minute: rate_a.min(rate_b),
            monthly_minimum_cost: floor_a + floor_b,
        },
        concurrency: first.concurrency.sum(second.concurrency),
    })
}
