use anyhow::Result;
use avatar_planner::catalog::{AvatarPlan, Catalog, Limit, VoiceAgent, VoicePricing};
use colored::Colorize;
use comfy_table::{presets::UTF8_FULL, Cell, Color, ContentArrangement, Table};
use std::path::Path;

/// Execute the catalog command
pub fn execute(config_path: &Path) -> Result<()> {
    let (_, catalog) = super::load_planner(config_path)?;
    print_catalog(&catalog);
    Ok(())
}

fn print_catalog(catalog: &Catalog) {
    let economics = &catalog.economics;

    println!("{}", "Avatar Plans".bold());
    println!("{}", avatar_table(&catalog.avatar_plans));
    println!();
    println!("{}", "Voice Agents".bold());
    println!("{}", voice_table(&catalog.voice_agents));
    println!();
    println!("{}", "Hosting Options".bold());
    println!("{}", hosting_table(catalog));
    println!();
    println!(
        "USD→INR {:.2}, misc expenses ₹{:.2}/month, {} min per call",
        economics.usd_to_inr, economics.misc_expenses_monthly_inr, economics.minutes_per_call
    );
}

fn header(names: &[&str]) -> Vec<Cell> {
    names.iter().map(|name| Cell::new(name).fg(Color::Cyan)).collect()
}

fn limit_label(limit: Limit) -> String {
    match limit {
        Limit::Bounded(n) => n.to_string(),
        Limit::Unlimited => "unlimited".to_string(),
    }
}

fn avatar_table(plans: &[AvatarPlan]) -> Table {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(header(&[
        "ID",
        "PROVIDER",
        "TIER",
        "USD/MONTH",
        "MINUTES",
        "EXTRA USD/MIN",
        "CONCURRENCY",
        "MAX LENGTH",
        "NOTE",
    ]));

    for plan in plans {
        table.add_row(vec![
            Cell::new(&plan.id),
            Cell::new(plan.provider),
            Cell::new(format!("{:?}", plan.tier)),
            Cell::new(format!("{:.2}", plan.monthly_price)),
            Cell::new(plan.minutes),
            Cell::new(format!("{:.3}", plan.additional_per_min)),
            Cell::new(limit_label(plan.concurrency)),
            Cell::new(limit_label(plan.max_length)),
            Cell::new(plan_note(plan)),
        ]);
    }

    table
}

/// Plan note, followed by the annual contract terms when the plan has them
fn plan_note(plan: &AvatarPlan) -> String {
    let mut parts: Vec<String> = plan
        .note
        .iter()
        .map(|note| note.trim_end_matches('.').to_string())
        .collect();
    if let Some(annual) = &plan.annual {
        if let Some(usd) = annual.commitment_usd {
            parts.push(format!("Annual commitment ${:.0}", usd));
        }
        if let Some(minutes) = annual.total_annual_minutes {
            parts.push(format!("{:.0} min/year", minutes));
        }
    }
    parts.join(". ")
}

fn pricing_label(pricing: &VoicePricing) -> String {
    match pricing {
        VoicePricing::Tokens {
            price_per_1m_tokens,
            tokens_per_minute,
        } => match tokens_per_minute {
            Some(tpm) => format!("${:.2}/1M tokens ({} tok/min)", price_per_1m_tokens, tpm),
            None => format!("${:.2}/1M tokens", price_per_1m_tokens),
        },
        VoicePricing::PerMinute {
            price_per_minute,
            monthly_minimum_cost,
        } => format!(
            "${:.3}/min, ${:.2} monthly minimum",
            price_per_minute, monthly_minimum_cost
        ),
        VoicePricing::PerMinutePerConcurrency { price_per_minute } => {
            format!("${:.3}/min per concurrent session", price_per_minute)
        }
    }
}

fn voice_table(agents: &[VoiceAgent]) -> Table {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(header(&["ID", "FAMILY", "PRICING", "CONCURRENCY"]));

    for agent in agents {
        table.add_row(vec![
            Cell::new(&agent.id),
            Cell::new(agent.family.label()),
            Cell::new(pricing_label(&agent.pricing)),
            Cell::new(limit_label(agent.concurrency)),
        ]);
    }

    table
}

fn hosting_table(catalog: &Catalog) -> Table {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(header(&["ID", "NAME", "BASE INR", "INR/USER", "INR/CALL", "STORAGE GB"]));

    for option in &catalog.hosting_options {
        table.add_row(vec![
            Cell::new(&option.id),
            Cell::new(&option.name),
            Cell::new(format!("{:.2}", option.base_monthly_cost_inr)),
            Cell::new(format!("{:.2}", option.cost_per_user_per_month_inr)),
            Cell::new(format!("{:.2}", option.cost_per_call_inr)),
            Cell::new(option.storage_gb),
        ]);
    }

    table
}
