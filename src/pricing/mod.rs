pub mod calculator;
pub mod models;

pub use calculator::CostCalculator;
pub use models::{AvatarCost, CostBreakdown, HostingCost, VoiceCost, Workload};
