use tracing::debug;

use super::selection::AvatarSelection;
use super::tier::avatar_tier_rank;
use super::{sort_ranked, Ranked, AVATAR_SINGLE_TOLERANCE, COMBO_DISCOUNT};
use crate::catalog::{AvatarPlan, Catalog, Provider};
use crate::pricing::{CostCalculator, Workload};

/// Candidate avatar selections worth evaluating, grouped by provider
///
/// Plans without a list price are skipped. Per provider, the cheapest
/// qualifying singles survive, together with two-plan bundles that are
/// either clearly cheaper or the only way to reach the required concurrency.
pub fn build_avatar_selections(
    catalog: &Catalog,
    calculator: &CostCalculator,
    workload: &Workload,
) -> Vec<AvatarSelection> {
    let mut selections = Vec::new();

    for provider in Provider::ALL {
        let plans: Vec<&AvatarPlan> = catalog
            .avatar_plans
            .iter()
            .filter(|plan| plan.provider == provider && plan.monthly_price > 0.0)
            .collect();
        if plans.is_empty() {
            continue;
        }

        let mut singles: Vec<Ranked<AvatarSelection>> = plans
            .iter()
            .map(|plan| AvatarSelection::single((*plan).clone()))
            .filter(|selection| selection.meets_concurrency(workload.concurrent_sessions))
            .map(|selection| rank(selection, calculator, workload))
            .collect();
        sort_ranked(&mut singles, |s| s.plan.id.as_str());

        let cheapest = singles.first().map(|r| r.cost_inr);
        let single_count = match cheapest {
            Some(cheapest) => {
                let before = selections.len();
                selections.extend(
                    singles
                        .into_iter()
                        .filter(|r| r.cost_inr <= cheapest * AVATAR_SINGLE_TOLERANCE)
                        .map(|r| r.selection),
                );
                selections.len() - before
            }
            None => 0,
        };

        let mut combos = Vec::new();
        for (i, first) in plans.iter().enumerate() {
            for second in &plans[i..] {
                let Some(combo) = AvatarSelection::combo(first, second) else {
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
        sort_ranked(&mut combos, |s| s.plan.id.as_str());

        debug!(
            provider = %provider,
            singles = single_count,
            combos = combos.len(),
            "Avatar candidates selected"
        );
        selections.extend(combos.into_iter().map(|r| r.selection));
    }

    selections
}

fn rank(selection: AvatarSelection, calculator: &CostCalculator, workload: &Workload) -> Ranked<AvatarSelection> {
    let cost = calculator.avatar_cost(
        &selection.plan,
        selection.account_factor(),
        workload.minutes_per_month,
    );
    Ranked {
        cost_inr: calculator.economics().to_inr(cost.total_usd),
        tier_rank: avatar_tier_rank(selection.plan.tier),
        selection,
    }
}
