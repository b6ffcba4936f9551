/// End-to-end planning runs against the built-in catalog and small hand-built catalogs
use avatar_planner::{
    catalog::{parse_catalog_json, Catalog, Economics, Limit},
    combos::{build_avatar_selections, build_voice_selections},
    error::PlannerError,
    optimizer::{calculate_combinations, evaluate_combinations, BudgetInput},
    pricing::CostCalculator,
};
use serde_json::json;

const HOSTING_JSON: &str = r#"[{
    "id": "railway",
    "name": "Railway",
    "baseMonthlyCostINR": 30000,
    "costPerUserPerMonthINR": 150,
    "costPerCallINR": 1.80,
    "storageGB": 10
}]"#;

fn request(concurrent_sessions: u32, minutes: f64, use_voice_agent: bool) -> BudgetInput {
    BudgetInput::from_json(
        &json!({
            "monthlyBudgetINR": 150000,
            "apiAllocationPercent": 60,
            "hostingAllocationPercent": 40,
            "users": 50,
            "concurrentSessions": concurrent_sessions,
            "minutesPerMonth": minutes,
            "useVoiceAgent": use_voice_agent
        })
        .to_string(),
    )
    .unwrap()
}

fn catalog_with(avatar_plans: serde_json::Value, voice_agents: serde_json::Value) -> Catalog {
    let hosting: serde_json::Value = serde_json::from_str(HOSTING_JSON).unwrap();
    let json = json!({
        "avatarPlans": avatar_plans,
        "voiceAgents": voice_agents,
        "hostingOptions": hosting,
    });
    parse_catalog_json(&json.to_string(), Economics::default()).unwrap()
}

fn tavus_catalog() -> Catalog {
    catalog_with(
        json!([
            {
                "id": "t-starter",
                "name": "Tavus Starter",
                "provider": "tavus",
                "tier": "Starter",
                "monthlyPrice": 59,
                "minutes": 100,
                "concurrency": 3,
                "additionalPerMin": 0.37,
                "hasInbuiltVoice": true
            },
            {
                "id": "t-growth",
                "name": "Tavus Growth",
                "provider": "tavus",
                "tier": "Growth",
                "monthlyPrice": 397,
                "minutes": 1250,
                "concurrency": 15,
                "additionalPerMin": 0.32,
                "hasInbuiltVoice": true
            }
        ]),
        json!([]),
    )
}

fn hume_catalog() -> Catalog {
    catalog_with(
        json!([{
            "id": "open-avatar",
            "name": "Open Avatar",
            "provider": "anam",
            "tier": "Pro",
            "monthlyPrice": 100,
            "minutes": 1000,
            "additionalPerMin": 0.1,
            "hasInbuiltVoice": false
        }]),
        json!([
            {
                "id": "hume-pro",
                "name": "Hume Pro",
                "family": "hume",
                "tier": "Pro",
                "pricingModel": "per-minute",
                "pricePerMinute": 0.06,
                "monthlyMinimumCost": 70,
                "concurrency": 10
            },
            {
                "id": "hume-scale",
                "name": "Hume Scale",
                "family": "hume",
                "tier": "Scale",
                "pricingModel": "per-minute",
                "pricePerMinute": 0.05,
                "monthlyMinimumCost": 200,
                "concurrency": 20
            }
        ]),
    )
}

#[test]
fn test_builtin_avatar_only_ranking() {
    let catalog = Catalog::builtin().unwrap();
    let input = request(10, 2000.0, false);

    let calculation = evaluate_combinations(&catalog, &input).unwrap();
    assert_eq!(calculation.evaluated, 16);
    assert_eq!(calculation.combinations.len(), 16);

    let top = &calculation.combinations[0];
    assert_eq!(top.id, "heygen-essentialx1-inbuiltx1-railway");
    assert!((top.total_cost_inr - 89_010.0).abs() < 1e-6);
    assert!((top.score - 259.9).abs() < 1e-6);
    assert!(top.fits_budget);
    assert_eq!(
        top.warnings,
        vec!["Average session length may exceed plan limit (20 min)".to_string()]
    );
}

#[test]
fn test_results_are_deterministic() {
    let catalog = Catalog::builtin().unwrap();
    let input = request(5, 1500.0, true);

    let first = calculate_combinations(&catalog, &input).unwrap();
    let second = calculate_combinations(&catalog, &input).unwrap();
    assert_eq!(first, second);
}

#[test]
fn test_every_result_is_feasible_and_ranked() {
    let catalog = Catalog::builtin().unwrap();

    for input in [request(5, 1500.0, true), request(10, 2000.0, false), request(2, 300.0, true)] {
        let combinations = calculate_combinations(&catalog, &input).unwrap();
        assert!(!combinations.is_empty());

        for combination in &combinations {
            assert!(combination.avatar_capacity.covers(input.concurrent_sessions));
            if let Some(capacity) = combination.voice_capacity {
                assert!(capacity.covers(input.concurrent_sessions));
            }
            assert_eq!(combination.voice_agent.is_some(), input.use_voice_agent);
            if !input.use_voice_agent {
                assert!(combination.avatar_plan.has_inbuilt_voice);
            }

            let b = &combination.breakdown;
            for cost in [b.avatar_cost_inr, b.voice_cost_inr, b.hosting_cost_inr, b.total_cost_inr] {
                assert!(cost >= 0.0);
            }
            let sum = b.avatar_cost_inr + b.voice_cost_inr + b.hosting_cost_inr + b.misc_expenses_inr;
            assert!((sum - combination.total_cost_inr).abs() < 1e-6);
        }

        for pair in combinations.windows(2) {
            assert!(
                pair[0].score > pair[1].score
                    || (pair[0].score == pair[1].score && pair[0].id < pair[1].id)
            );
        }
    }
}

#[test]
fn test_avatar_singles_stay_within_tolerance() {
    let catalog = Catalog::builtin().unwrap();
    let calculator = CostCalculator::new(catalog.economics);
    let workload = request(10, 2000.0, false).workload();

    let selections = build_avatar_selections(&catalog, &calculator, &workload);
    let ids: Vec<&str> = selections.iter().map(|s| s.plan.id.as_str()).collect();
    assert_eq!(
        ids,
        vec!["heygen-essential", "anam-pro", "anam-growth+anam-growth", "tavus-growth"]
    );
}

#[test]
fn test_combos_only_when_no_single_carries_load() {
    let catalog = tavus_catalog();
    let calculator = CostCalculator::new(catalog.economics);
    let workload = request(16, 100.0, false).workload();

    let selections = build_avatar_selections(&catalog, &calculator, &workload);
    let ids: Vec<&str> = selections.iter().map(|s| s.plan.id.as_str()).collect();
    assert_eq!(ids, vec!["t-growth+t-starter", "t-growth+t-growth"]);
    assert!(selections.iter().all(|s| s.is_combo && s.accounts == 2));

    let combinations = calculate_combinations(&catalog, &request(16, 100.0, false)).unwrap();
    assert_eq!(combinations.len(), 2);
    assert_eq!(combinations[0].id, "t-growth+t-starterx2-inbuiltx1-railway");
    assert_eq!(combinations[0].avatar_capacity, Limit::Bounded(18));
}

#[test]
fn test_voice_combo_applies_summed_floor() {
    let catalog = hume_catalog();
    let calculator = CostCalculator::new(catalog.economics);
    let workload = request(25, 100.0, true).workload();

    let selections = build_voice_selections(&catalog, &calculator, &workload);
    let ids: Vec<&str> = selections.iter().map(|s| s.agent.id.as_str()).collect();
    assert_eq!(ids, vec!["hume-pro+hume-scale", "hume-scale+hume-scale"]);

    let cost = calculator.voice_cost(&selections[0].agent, 2, true, &workload);
    assert!((cost.total_usd - 270.0).abs() < 1e-9);
}

#[test]
fn test_voice_agent_required_for_avatar_without_inbuilt_voice() {
    let catalog = hume_catalog();

    let without_voice = calculate_combinations(&catalog, &request(5, 100.0, false)).unwrap();
    assert!(without_voice.is_empty());

    let with_voice = calculate_combinations(&catalog, &request(5, 100.0, true)).unwrap();
    assert!(!with_voice.is_empty());
    assert_eq!(
        with_voice[0].voice_agent.as_ref().map(|a| a.id.as_str()),
        Some("hume-pro")
    );
}

#[test]
fn test_over_budget_combinations_are_kept_with_warnings() {
    let catalog = Catalog::builtin().unwrap();
    let mut input = request(10, 2000.0, false);
    input.monthly_budget_inr = 10_000.0;

    let combinations = calculate_combinations(&catalog, &input).unwrap();
    assert_eq!(combinations.len(), 16);
    assert!(combinations.iter().all(|c| !c.fits_budget));
    assert!(combinations
        .iter()
        .all(|c| c.warnings.iter().any(|w| w.starts_with("Hosting cost"))));
}

#[test]
fn test_invalid_request_is_rejected() {
    let catalog = Catalog::builtin().unwrap();
    let mut input = request(10, 2000.0, false);
    input.concurrent_sessions = 0;

    let err = calculate_combinations(&catalog, &input).unwrap_err();
    assert!(matches!(err, PlannerError::InvalidInput { .. }));
}

#[test]
fn test_equal_cost_voice_singles_both_kept_in_tier_order() {
    let catalog = catalog_with(
        json!([{
            "id": "open-avatar",
            "name": "Open Avatar",
            "provider": "anam",
            "tier": "Pro",
            "monthlyPrice": 100,
            "minutes": 1000,
            "additionalPerMin": 0.1,
            "hasInbuiltVoice": false
        }]),
        json!([
            {
                "id": "b-scale",
                "name": "Scale",
                "family": "hume",
                "tier": "Scale",
                "pricingModel": "per-minute",
                "pricePerMinute": 0.05,
                "monthlyMinimumCost": 100,
                "concurrency": 20
            },
            {
                "id": "c-pro",
                "name": "Pro",
                "family": "hume",
                "tier": "Pro",
                "pricingModel": "per-minute",
                "pricePerMinute": 0.06,
                "monthlyMinimumCost": 100,
                "concurrency": 10
            }
        ]),
    );
    let calculator = CostCalculator::new(catalog.economics);
    let workload = request(5, 100.0, true).workload();

    let selections = build_voice_selections(&catalog, &calculator, &workload);
    let ids: Vec<&str> = selections.iter().map(|s| s.agent.id.as_str()).collect();
    assert_eq!(ids, vec!["c-pro", "b-scale"]);
}
