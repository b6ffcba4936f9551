//! Tier rankings used to break cost ties
//!
//! Lower rank wins. Every ranking is total: tiers outside a family's ladder
//! share the last rank, `LAST`.

use crate::catalog::{AvatarTier, VoiceAgent, VoiceTier};

pub const LAST: u32 = 999;

/// Rank of an avatar tier across all providers
pub fn avatar_tier_rank(tier: AvatarTier) -> u32 {
    match tier {
        AvatarTier::Starter | AvatarTier::Essential => 1,
        AvatarTier::Explorer => 2,
        AvatarTier::Growth => 3,
        AvatarTier::Pro | AvatarTier::Business => 4,
        AvatarTier::Enterprise => 5,
        AvatarTier::Combo | AvatarTier::Other => LAST,
    }
}

/// Rank of a voice agent within its tiered family
pub fn voice_tier_rank(agent: &VoiceAgent) -> u32 {
    if !agent.family.is_tiered() {
        return LAST;
    }
    match agent.tier {
        Some(VoiceTier::Pro) => 1,
        Some(VoiceTier::Scale) => 2,
        Some(VoiceTier::Business) => 3,
        Some(VoiceTier::Enterprise) | Some(VoiceTier::Other) | None => LAST,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::Catalog;

    #[test]
    fn test_avatar_tier_order() {
        assert!(avatar_tier_rank(AvatarTier::Starter) < avatar_tier_rank(AvatarTier::Explorer));
        assert_eq!(avatar_tier_rank(AvatarTier::Starter), avatar_tier_rank(AvatarTier::Essential));
        assert!(avatar_tier_rank(AvatarTier::Pro) < avatar_tier_rank(AvatarTier::Enterprise));
        assert_eq!(avatar_tier_rank(AvatarTier::Other), LAST);
    }

    #[test]
    fn test_hume_ladder() {
        let catalog = Catalog::builtin().unwrap();
        let rank = |id: &str| voice_tier_rank(catalog.voice_agent(id).unwrap());

        assert_eq!(rank("hume-pro"), 1);
        assert_eq!(rank("hume-scale"), 2);
        assert_eq!(rank("hume-business"), 3);
        assert_eq!(rank("hume-enterprise"), LAST);
        assert_eq!(rank("grok"), LAST);
    }
}
