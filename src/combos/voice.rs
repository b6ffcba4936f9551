use tracing::debug;

use super::selection::VoiceSelection;
use super::tier::voice_tier_rank;
use super::{sort_ranked, Ranked, COMBO_DISCOUNT, VOICE_SINGLE_TOLERANCE};
use crate::catalog::{Catalog, VoiceAgent, VoiceFamily};
use crate::pricing::{CostCalculator, Workload};

/// Candidate voice agent selections worth evaluating
///
/// Flat-priced agents pass whenever they carry the required concurrency.
/// Agents of a tiered family are pruned by cost like avatar plans, with a
/// tighter tolerance for singles.
pub fn build_voice_selections(
    catalog: &Catalog,
    calculator: &CostCalculator,
    workload: &Workload,
) -> Vec<VoiceSelection> {
    let mut selections: Vec<VoiceSelection> = catalog
        .voice_agents
        .iter()
        .filter(|agent| !agent.family.is_tiered())
        .map(|agent| VoiceSelection::single(agent.clone()))
        .filter(|selection| selection.meets_concurrency(workload.concurrent_sessions))
        .collect();
    debug!(agents = selections.len(), "Flat voice candidates selected");

    for family in VoiceFamily::ALL.into_iter().filter(VoiceFamily::is_tiered) {
        let agents: Vec<&VoiceAgent> = catalog
            .voice_agents
            .iter()
            .filter(|agent| agent.family == family)
            .collect();
        if agents.is_empty() {
            continue;
        }
        selections.extend(tiered_family_selections(&agents, calculator, workload, family));
    }

    selections
}

fn tiered_family_selections(
    agents: &[&VoiceAgent],
    calculator: &CostCalculator,
    workload: &Workload,
    family: VoiceFamily,
) -> Vec<VoiceSelection> {
    let mut singles: Vec<Ranked<VoiceSelection>> = agents
        .iter()
        .map(|agent| VoiceSelection::single((*agent).clone()))
        .filter(|selection| selection.meets_concurrency(workload.concurrent_sessions))
        .map(|selection| rank(selection, calculator, workload))
        .collect();
    sort_ranked(&mut singles, |s| s.agent.id.as_str());

    let cheapest = singles.first().map(|r| r.cost_inr);
    let mut accepted: Vec<VoiceSelection> = match cheapest {
        Some(cheapest) => singles
            .into_iter()
            .filter(|r| r.cost_inr <= cheapest * VOICE_SINGLE_TOLERANCE)
            .map(|r| r.selection)
            .collect(),
        None => Vec::new(),
    };
    let single_count = accepted.len();

    let mut combos = Vec::new();
    for (i, first) in agents.iter().enumerate() {
        for second in &agents[i..] {
            let Some(combo) = VoiceSelection::combo(first, second) else {
                continue;
            };
            if !combo.meets_concurrency(workload.concurrent_sessions) {
                continue;
            }
            let ranked = rank(combo, calculator, workload);
            let keep = match cheapest {
                Some(cheapest) => ranked.cost_inr < cheapest * COMBO_DISCOUNT,
                None => true,
            };
            if keep {
                combos.push(ranked);
            }
        }
    }
    sort_ranked(&mut combos, |s| s.agent.id.as_str());

    debug!(
        family = family.label(),
        singles = single_count,
        combos = combos.len(),
        "Tiered voice candidates selected"
    );
    accepted.extend(combos.into_iter().map(|r| r.selection));
    accepted
}

fn rank(selection: VoiceSelection, calculator: &CostCalculator, workload: &Workload) -> Ranked<VoiceSelection> {
    let cost = calculator.voice_cost(
        &selection.agent,
        selection.accounts,
        selection.is_combo,
        workload,
    );
    Ranked {
        cost_inr: calculator.economics().to_inr(cost.total_usd),
        tier_rank: voice_tier_rank(&selection.agent),
        selection,
    }
}
