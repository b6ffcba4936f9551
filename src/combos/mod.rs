//! Candidate generation for avatar plans and voice agents
//!
//! A candidate is either a single plan on one account or a synthesized
//! two-account bundle of plans from the same provider. Candidates are pruned
//! by cost before the optimizer builds the full cross product.

pub mod avatar;
pub mod selection;
pub mod tier;
pub mod voice;

pub use avatar::build_avatar_selections;
pub use selection::{AvatarSelection, VoiceSelection};
pub use voice::build_voice_selections;

/// Singles priced above this multiple of the cheapest avatar single are dropped
pub const AVATAR_SINGLE_TOLERANCE: f64 = 1.02;
/// Singles priced above this multiple of the cheapest tiered voice single are dropped
pub const VOICE_SINGLE_TOLERANCE: f64 = 1.01;
/// A bundle must cost less than this multiple of the cheapest single to be kept
pub const COMBO_DISCOUNT: f64 = 0.95;

/// A selection with its estimated monthly cost and tier rank
#[derive(Debug, Clone)]
pub(crate) struct Ranked<S> {
    pub selection: S,
    pub cost_inr: f64,
    pub tier_rank: u32,
}

/// Costs closer than this (one paisa) count as equal
pub const COST_TIE_INR: f64 = 0.01;

/// Sort by cost, then tier rank, then id
///
/// Costs are grouped into runs that start at the cheapest remaining item and
/// take every item less than `COST_TIE_INR` above it. Every pair inside a run
/// is within a paisa; inside a run items are ordered by tier rank then id.
pub(crate) fn sort_ranked<S>(items: &mut [Ranked<S>], id: impl Fn(&S) -> &str) {
    items.sort_by(|a, b| a.cost_inr.total_cmp(&b.cost_inr));

    let mut start = 0;
    while start < items.len() {
        let anchor = items[start].cost_inr;
        let len = items[start..]
            .iter()
            .take_while(|r| r.cost_inr - anchor < COST_TIE_INR)
            .count();
        let end = start + len.max(1);
        items[start..end].sort_by(|a, b| {
            a.tier_rank
                .cmp(&b.tier_rank)
                .then_with(|| id(&a.selection).cmp(id(&b.selection)))
        });
        start = end;
    }
}
