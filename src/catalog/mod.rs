pub mod loader;
pub mod models;

pub use loader::{load_catalog, parse_catalog_json, CatalogFile, DEFAULT_CATALOG_JSON};
pub use models::{
    AnnualCommitment, AvatarPlan, AvatarTier, Catalog, Economics, HostingOption, Limit, Provider,
    VoiceAgent, VoiceFamily, VoicePricing, VoiceTier,
};
