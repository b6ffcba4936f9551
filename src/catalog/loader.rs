use crate::catalog::models::{
    AnnualCommitment, AvatarPlan, AvatarTier, Catalog, Economics, HostingOption, Limit, Provider,
    VoiceAgent, VoiceFamily, VoicePricing, VoiceTier,
};
use crate::error::CatalogError;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::Value;
use std::collections::HashSet;
use std::path::Path;
use tracing::{debug, info, warn};

/// Catalog shipped with the binary
pub const DEFAULT_CATALOG_JSON: &str = include_str!("default_catalog.json");

/// Catalog file structure
///
/// Entries stay untyped here so a single malformed record is excluded on its
/// own instead of failing the whole file.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CatalogFile {
    pub avatar_plans: Vec<Value>,
    #[serde(default)]
    pub voice_agents: Vec<Value>,
    pub hosting_options: Vec<Value>,
}

/// Avatar plan as written in a catalog file
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AvatarPlanRecord {
    pub id: String,
    pub name: String,
    pub provider: Provider,
    pub tier: AvatarTier,
    pub monthly_price: f64,
    pub minutes: f64,
    #[serde(default)]
    pub max_length: Option<u32>,
    #[serde(default)]
    pub concurrency: Option<u32>,
    pub additional_per_min: f64,
    pub has_inbuilt_voice: bool,
    #[serde(default)]
    pub is_annual_only: bool,
    #[serde(rename = "annualCommitmentUSD", default)]
    pub annual_commitment_usd: Option<f64>,
    #[serde(default)]
    pub total_annual_minutes: Option<f64>,
    #[serde(default)]
    pub note: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum PricingModelKind {
    Tokens,
    PerMinute,
    PerMinutePerConcurrency,
}

/// Voice agent as written in a catalog file
///
/// Which pricing fields are required depends on `pricing_model`;
/// `into_voice_agent` checks them.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VoiceAgentRecord {
    pub id: String,
    pub name: String,
    pub family: VoiceFamily,
    #[serde(default)]
    pub tier: Option<VoiceTier>,
    pub pricing_model: PricingModelKind,
    #[serde(rename = "pricePer1MTokens", default)]
    pub price_per_1m_tokens: Option<f64>,
    #[serde(default)]
    pub tokens_per_minute: Option<f64>,
    #[serde(default)]
    pub price_per_minute: Option<f64>,
    #[serde(default)]
    pub monthly_base_cost: Option<f64>,
    #[serde(default)]
    pub monthly_minimum_cost: Option<f64>,
    #[serde(default)]
    pub concurrency: Option<u32>,
}

fn non_negative(id: &str, field: &str, value: f64) -> Result<f64, CatalogError> {
    if value.is_finite() && value >= 0.0 {
        Ok(value)
    } else {
        Err(CatalogError::Inconsistent {
            id: id.to_string(),
            reason: format!("{} must be a non-negative number, got {}", field, value),
        })
    }
}

fn required(id: &str, field: &str, value: Option<f64>) -> Result<f64, CatalogError> {
    match value {
        Some(v) => non_negative(id, field, v),
        None => Err(CatalogError::Inconsistent {
            id: id.to_string(),
            reason: format!("missing {} for its pricing model", field),
        }),
    }
}

impl AvatarPlanRecord {
    pub fn into_avatar_plan(self) -> Result<AvatarPlan, CatalogError> {
        let id = self.id.as_str();
        let monthly_price = non_negative(id, "monthlyPrice", self.monthly_price)?;
        let minutes = non_negative(id, "minutes", self.minutes)?;
        let additional_per_min = non_negative(id, "additionalPerMin", self.additional_per_min)?;

        let annual = if self.is_annual_only {
            Some(AnnualCommitment {
                commitment_usd: self
                    .annual_commitment_usd
                    .map(|v| non_negative(id, "annualCommitmentUSD", v))
                    .transpose()?,
                total_annual_minutes: self
                    .total_annual_minutes
                    .map(|v| non_negative(id, "totalAnnualMinutes", v))
                    .transpose()?,
            })
        } else {
            None
        };

        Ok(AvatarPlan {
            id: self.id,
            name: self.name,
            provider: self.provider,
            tier: self.tier,
            monthly_price,
            minutes,
            max_length: Limit::from_optional(self.max_length),
            concurrency: Limit::from_optional(self.concurrency),
            additional_per_min,
            has_inbuilt_voice: self.has_inbuilt_voice,
            annual,
            note: self.note,
        })
    }
}

impl VoiceAgentRecord {
    pub fn into_voice_agent(self) -> Result<VoiceAgent, CatalogError> {
        let id = self.id.as_str();
        let pricing = match self.pricing_model {
            PricingModelKind::Tokens => {
                let tokens_per_minute = match self.tokens_per_minute {
                    Some(t) if t.is_finite() && t > 0.0 => Some(t),
                    Some(t) => {
                        return Err(CatalogError::Inconsistent {
                            id: id.to_string(),
                            reason: format!("tokensPerMinute must be positive, got {}", t),
                        })
                    }
                    None => None,
                };
                VoicePricing::Tokens {
                    price_per_1m_tokens: required(id, "pricePer1MTokens", self.price_per_1m_tokens)?,
                    tokens_per_minute,
                }
            }
            PricingModelKind::PerMinute => {
                // The minimum spend floor falls back to the base cost
                let floor = self.monthly_minimum_cost.or(self.monthly_base_cost).unwrap_or(0.0);
                VoicePricing::PerMinute {
                    price_per_minute: required(id, "pricePerMinute", self.price_per_minute)?,
                    monthly_minimum_cost: non_negative(id, "monthlyMinimumCost", floor)?,
                }
            }
            PricingModelKind::PerMinutePerConcurrency => VoicePricing::PerMinutePerConcurrency {
                price_per_minute: required(id, "pricePerMinute", self.price_per_minute)?,
            },
        };

        Ok(VoiceAgent {
            id: self.id,
            name: self.name,
            family: self.family,
            tier: self.tier,
            pricing,
            concurrency: Limit::from_optional(self.concurrency),
        })
    }
}

fn validate_hosting(option: HostingOption) -> Result<HostingOption, CatalogError> {
    let id = option.id.as_str();
    non_negative(id, "baseMonthlyCostINR", option.base_monthly_cost_inr)?;
    non_negative(id, "costPerUserPerMonthINR", option.cost_per_user_per_month_inr)?;
    non_negative(id, "costPerCallINR", option.cost_per_call_inr)?;
    Ok(option)
}

/// Keep entries that deserialize, validate and whose id has not been seen yet.
/// Defects are logged and dropped.
fn keep_valid<R, T>(
    records: Vec<Value>,
    kind: &str,
    convert: impl Fn(R) -> Result<T, CatalogError>,
) -> Vec<T>
where
    R: DeserializeOwned,
{
    let mut seen = HashSet::new();
    let mut kept = Vec::with_capacity(records.len());

    for (index, record) in records.into_iter().enumerate() {
        let id = record
            .get("id")
            .and_then(Value::as_str)
            .map(str::to_string)
            .unwrap_or_else(|| format!("#{}", index));
        if !seen.insert(id.clone()) {
            warn!(kind = kind, id = %id, "Duplicate catalog id, entry excluded");
            continue;
        }

        let entry = serde_json::from_value::<R>(record)
            .map_err(|e| CatalogError::Inconsistent {
                id: id.clone(),
                reason: e.to_string(),
            })
            .and_then(&convert);
        match entry {
            Ok(entry) => kept.push(entry),
            Err(e) => warn!(kind = kind, error = %e, "Catalog entry excluded"),
        }
    }

    kept
}

/// Parse catalog JSON and validate every entry
pub fn parse_catalog_json(json: &str, economics: Economics) -> Result<Catalog, CatalogError> {
    let file: CatalogFile =
        serde_json::from_str(json).map_err(|e| CatalogError::Parse(e.to_string()))?;

    let avatar_plans = keep_valid(file.avatar_plans, "avatar plan", AvatarPlanRecord::into_avatar_plan);
    let voice_agents = keep_valid(file.voice_agents, "voice agent", VoiceAgentRecord::into_voice_agent);
    let hosting_options = keep_valid(file.hosting_options, "hosting option", validate_hosting);

    if avatar_plans.is_empty() {
        return Err(CatalogError::Empty("avatar plans"));
    }
    if hosting_options.is_empty() {
        return Err(CatalogError::Empty("hosting options"));
    }

    info!(
        "Loaded catalog: {} avatar plans, {} voice agents, {} hosting options",
        avatar_plans.len(),
        voice_agents.len(),
        hosting_options.len()
    );

    Ok(Catalog {
        avatar_plans,
        voice_agents,
        hosting_options,
        economics,
    })
}

/// Load the catalog from a file, or the built-in catalog when no path is given
pub fn load_catalog(path: Option<&Path>, economics: Economics) -> Result<Catalog, CatalogError> {
    match path {
        Some(path) => {
            debug!("Reading catalog from {}", path.display());
            let content = std::fs::read_to_string(path).map_err(|e| {
                CatalogError::Parse(format!("Failed to read {}: {}", path.display(), e))
            })?;
            parse_catalog_json(&content, economics)
        }
        None => parse_catalog_json(DEFAULT_CATALOG_JSON, economics),
    }
}

impl Catalog {
    /// The built-in catalog with default economics
    pub fn builtin() -> Result<Self, CatalogError> {
        parse_catalog_json(DEFAULT_CATALOG_JSON, Economics::default())
    }

    pub fn avatar_plan(&self, id: &str) -> Option<&AvatarPlan> {
        self.avatar_plans.iter().find(|p| p.id == id)
    }

    pub fn voice_agent(&self, id: &str) -> Option<&VoiceAgent> {
        self.voice_agents.iter().find(|a| a.id == id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn minimal_catalog(voice_agents: &str) -> String {
        format!(
            r#"{{
                "avatarPlans": [{{
                    "id": "a", "name": "A", "provider": "anam", "tier": "Pro",
                    "monthlyPrice": 10, "minutes": 100, "additionalPerMin": 0.1,
                    "hasInbuiltVoice": true
                }}],
                "voiceAgents": {},
                "hostingOptions": [{{
                    "id": "h", "name": "H", "baseMonthlyCostINR": 1,
                    "costPerUserPerMonthINR": 1, "costPerCallINR": 1
                }}]
            }}"#,
            voice_agents
        )
    }

    #[test]
    fn test_builtin_catalog_loads_every_entry() {
        let catalog = Catalog::builtin().unwrap();
        assert_eq!(catalog.avatar_plans.len(), 16);
        assert_eq!(catalog.voice_agents.len(), 7);
        assert_eq!(catalog.hosting_options.len(), 4);

        let enterprise = catalog.avatar_plan("heygen-enterprise").unwrap();
        assert!(enterprise.is_annual_only());
        assert!(!enterprise.is_combinable());

        let hume = catalog.voice_agent("hume-enterprise").unwrap();
        assert_eq!(hume.concurrency, Limit::Unlimited);
    }

    #[test]
    fn test_per_minute_agent_without_rate_is_excluded() {
        let json = minimal_catalog(
            r#"[
                {"id": "broken", "name": "Broken", "family": "hume", "pricingModel": "per-minute",
                 "monthlyMinimumCost": 70},
                {"id": "ok", "name": "Ok", "family": "hume", "pricingModel": "per-minute",
                 "pricePerMinute": 0.05, "monthlyBaseCost": 200}
            ]"#,
        );
        let catalog = parse_catalog_json(&json, Economics::default()).unwrap();
        assert_eq!(catalog.voice_agents.len(), 1);
        assert_eq!(
            catalog.voice_agents[0].pricing,
            VoicePricing::PerMinute {
                price_per_minute: 0.05,
                monthly_minimum_cost: 200.0
            }
        );
    }

    #[test]
    fn test_tokens_agent_without_price_is_excluded() {
        let json = minimal_catalog(
            r#"[{"id": "t", "name": "T", "family": "google", "pricingModel": "tokens"}]"#,
        );
        let catalog = parse_catalog_json(&json, Economics::default()).unwrap();
        assert!(catalog.voice_agents.is_empty());
    }

    #[test]
    fn test_duplicate_ids_keep_first() {
        let json = minimal_catalog(
            r#"[
                {"id": "g", "name": "First", "family": "xai", "pricingModel": "per-minute-per-concurrency", "pricePerMinute": 0.05},
                {"id": "g", "name": "Second", "family": "xai", "pricingModel": "per-minute-per-concurrency", "pricePerMinute": 0.07}
            ]"#,
        );
        let catalog = parse_catalog_json(&json, Economics::default()).unwrap();
        assert_eq!(catalog.voice_agents.len(), 1);
        assert_eq!(catalog.voice_agents[0].name, "First");
    }

    #[test]
    fn test_negative_price_is_excluded() {
        let json = r#"{
            "avatarPlans": [{
                "id": "neg", "name": "Neg", "provider": "heygen", "tier": "Starter",
                "monthlyPrice": -1, "minutes": 100, "additionalPerMin": 0.1,
                "hasInbuiltVoice": true
            }],
            "hostingOptions": [{
                "id": "h", "name": "H", "baseMonthlyCostINR": 1,
                "costPerUserPerMonthINR": 1, "costPerCallINR": 1
            }]
        }"#;
        let err = parse_catalog_json(json, Economics::default()).unwrap_err();
        assert_eq!(err, CatalogError::Empty("avatar plans"));
    }

    #[test]
    fn test_malformed_records_are_excluded() {
        let json = r#"{
            "avatarPlans": [
                {"id": "good", "name": "Good", "provider": "anam", "tier": "Pro",
                 "monthlyPrice": 10, "minutes": 100, "additionalPerMin": 0.1,
                 "hasInbuiltVoice": true},
                {"id": "no-overage", "name": "No Overage", "provider": "anam", "tier": "Pro",
                 "monthlyPrice": 10, "minutes": 100, "hasInbuiltVoice": true},
                {"name": "No Id", "provider": "heygen", "tier": "Starter",
                 "monthlyPrice": "ten", "minutes": 100, "additionalPerMin": 0.1,
                 "hasInbuiltVoice": true}
            ],
            "voiceAgents": [
                {"id": "mystery", "name": "Mystery", "family": "acme",
                 "pricingModel": "per-minute-per-concurrency", "pricePerMinute": 0.05},
                {"id": "grok", "name": "Grok", "family": "xai",
                 "pricingModel": "per-minute-per-concurrency", "pricePerMinute": 0.05}
            ],
            "hostingOptions": [
                {"id": "h", "name": "H", "baseMonthlyCostINR": 1,
                 "costPerUserPerMonthINR": 1, "costPerCallINR": 1},
                {"id": "h2", "name": "H2", "baseMonthlyCostINR": "free"}
            ]
        }"#;

        let catalog = parse_catalog_json(json, Economics::default()).unwrap();
        assert_eq!(catalog.avatar_plans.len(), 1);
        assert_eq!(catalog.avatar_plans[0].id, "good");
        assert_eq!(catalog.voice_agents.len(), 1);
        assert_eq!(catalog.voice_agents[0].id, "grok");
        assert_eq!(catalog.hosting_options.len(), 1);
    }

    #[test]
    fn test_served_catalog_loads_back() {
        let builtin = Catalog::builtin().unwrap();
        let json = serde_json::to_string(&builtin).unwrap();

        let reloaded = parse_catalog_json(&json, builtin.economics).unwrap();
        assert_eq!(reloaded, builtin);
    }

    #[test]
    fn test_unparseable_catalog() {
        let err = parse_catalog_json("{not json", Economics::default()).unwrap_err();
        assert!(matches!(err, CatalogError::Parse(_)));
    }
}
