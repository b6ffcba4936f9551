use anyhow::{Context, Result};
use avatar_planner::optimizer::{
    calculate_combinations, run_batch, BatchOutcome, BudgetInput, Combination, VoiceMode,
};
use colored::Colorize;
use comfy_table::{presets::UTF8_FULL, Cell, Color, ContentArrangement, Table};
use std::path::Path;

use crate::cli::OutputFormat;

/// Execute the calculate command
///
/// Prints the ranked combinations as compact JSON, or the top `limit` as a table.
pub fn execute(config_path: &Path, input: &str, format: OutputFormat, limit: usize) -> Result<()> {
    let (_, catalog) = super::load_planner(config_path)?;

    let json = read_input(input)?;
    let request = BudgetInput::from_json(&json)?;
    let combinations = calculate_combinations(&catalog, &request)?;

    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string(&combinations)?),
        OutputFormat::Table => {
            println!("{}", render_table(&combinations, limit));
            println!(
                "{} feasible combination(s), showing {}",
                combinations.len(),
                combinations.len().min(limit)
            );
        }
    }

    Ok(())
}

/// Execute the calculate command over a batch of scenarios
///
/// JSON output is one object per scenario and voice mode, one per line.
pub fn execute_batch(config_path: &Path, input: &str, format: OutputFormat, limit: usize) -> Result<()> {
    let (_, catalog) = super::load_planner(config_path)?;

    let lines = read_input(input)?;
    let outcomes = run_batch(&catalog, &lines);

    match format {
        OutputFormat::Json => {
            for outcome in &outcomes {
                println!("{}", serde_json::to_string(outcome)?);
            }
        }
        OutputFormat::Table => {
            for outcome in &outcomes {
                println!("{}", outcome_heading(outcome).bold());
                match &outcome.error {
                    Some(error) => println!("  {} {}", "✗".red(), error),
                    None => println!("{}", render_table(&outcome.combinations, limit)),
                }
                println!();
            }
        }
    }

    let failed = outcomes.iter().filter(|o| o.error.is_some()).count();
    if failed > 0 {
        eprintln!("{} {} of {} batch run(s) failed", "⚠".yellow(), failed, outcomes.len());
    }

    Ok(())
}

fn outcome_heading(outcome: &BatchOutcome) -> String {
    let voice = match outcome.voice_mode {
        Some(VoiceMode::Inbuilt) => "inbuilt voice",
        Some(VoiceMode::Agent) => "voice agent",
        None => "unreadable",
    };
    match &outcome.request {
        Some(request) => format!(
            "Line {}: {} users, {} min/month, {} concurrent ({})",
            outcome.line, request.users, request.minutes_per_month, request.concurrent_sessions, voice
        ),
        None => format!("Line {} ({})", outcome.line, voice),
    }
}

/// The request text: file contents when `input` names an existing file, else `input` itself
fn read_input(input: &str) -> Result<String> {
    let path = Path::new(input);
    if path.is_file() {
        std::fs::read_to_string(path).with_context(|| format!("Failed to read {}", path.display()))
    } else {
        Ok(input.to_string())
    }
}

fn render_table(combinations: &[Combination], limit: usize) -> Table {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic);

    table.set_header(vec![
        Cell::new("RANK").fg(Color::Cyan),
        Cell::new("FITS").fg(Color::Cyan),
        Cell::new("SCORE").fg(Color::Cyan),
        Cell::new("TOTAL INR").fg(Color::Cyan),
        Cell::new("TOTAL USD").fg(Color::Cyan),
        Cell::new("AVATAR").fg(Color::Cyan),
        Cell::new("VOICE").fg(Color::Cyan),
        Cell::new("HOSTING").fg(Color::Cyan),
        Cell::new("WARNINGS").fg(Color::Cyan),
    ]);

    for (rank, combination) in combinations.iter().take(limit).enumerate() {
        let fits = if combination.fits_budget {
            Cell::new("yes").fg(Color::Green)
        } else {
            Cell::new("no").fg(Color::Red)
        };

        table.add_row(vec![
            Cell::new(rank + 1),
            fits,
            Cell::new(format!("{:.1}", combination.score)),
            Cell::new(format!("₹{:.2}", combination.total_cost_inr)),
            Cell::new(format!("${:.2}", combination.breakdown.total_cost_usd)),
            Cell::new(format!(
                "{} x{}",
                combination.avatar_plan.name, combination.avatar_accounts
            )),
            Cell::new(voice_label(combination)),
            Cell::new(&combination.hosting_option.name),
            Cell::new(combination.warnings.join("\n")),
        ]);
    }

    table
}

fn voice_label(combination: &Combination) -> String {
    match &combination.voice_agent {
        Some(agent) => format!("{} x{}", agent.name, combination.voice_accounts),
        None => "Inbuilt".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use avatar_planner::catalog::Catalog;
    use std::io::Write;

    const REQUEST: &str = r#"{"monthlyBudgetINR":150000,"apiAllocationPercent":60,"hostingAllocationPercent":40,"users":50,"concurrentSessions":10,"minutesPerMonth":2000,"useVoiceAgent":false}"#;

    #[test]
    fn test_read_input_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "{}", REQUEST).unwrap();

        let content = read_input(file.path().to_str().unwrap()).unwrap();
        assert_eq!(content, REQUEST);
    }

    #[test]
    fn test_read_input_passes_json_through() {
        assert_eq!(read_input(REQUEST).unwrap(), REQUEST);
    }

    #[test]
    fn test_outcome_heading_names_scenario_and_mode() {
        let catalog = Catalog::builtin().unwrap();
        let outcomes = run_batch(&catalog, "{\"users\": 20, \"minutes\": 500, \"concurrency\": 2}\nnope");

        assert_eq!(
            outcome_heading(&outcomes[1]),
            "Line 1: 20 users, 500 min/month, 2 concurrent (voice agent)"
        );
        assert_eq!(outcome_heading(&outcomes[2]), "Line 2 (unreadable)");
    }

    #[test]
    fn test_render_table_respects_limit() {
        let catalog = Catalog::builtin().unwrap();
        let request = BudgetInput::from_json(REQUEST).unwrap();
        let combinations = calculate_combinations(&catalog, &request).unwrap();

        let table = render_table(&combinations, 3);
        assert_eq!(table.row_iter().count(), 3);
        let rendered = table.to_string();
        assert!(rendered.contains("HeyGen Essential x1"));
        assert!(rendered.contains("Inbuilt"));
    }
}
