use anyhow::Result;
use clap::Parser;

mod cli;
mod commands;

use avatar_planner::init_tracing;

#[tokio::main]
async fn main() -> Result<()> {
    let args = cli::Cli::parse();
    let command = args.get_command();

    // Only the server logs at the configured level; one-shot commands keep stderr quiet
    match &command {
        cli::Commands::Serve => {
            let level = avatar_planner::config::load_config(&args.config)
                .map(|cfg| cfg.server.log_level)
                .unwrap_or_else(|_| "info".to_string());
            init_tracing(&level);
        }
        _ => init_tracing("warn"),
    }

    match command {
        cli::Commands::Serve => {
            commands::serve::execute(&args.config).await?;
        }
        cli::Commands::Calculate {
            input,
            batch,
            format,
            limit,
        } => {
            if batch {
                commands::calculate::execute_batch(&args.config, &input, format, limit)?;
            } else {
                commands::calculate::execute(&args.config, &input, format, limit)?;
            }
        }
        cli::Commands::Catalog => {
            commands::catalog::execute(&args.config)?;
        }
        cli::Commands::Telemetry { action } => match action {
            cli::TelemetryCommands::Collect => commands::telemetry::collect(&args.config).await?,
            cli::TelemetryCommands::Show => commands::telemetry::show(&args.config)?,
        },
        cli::Commands::Config { action } => match action {
            cli::ConfigCommands::Show => commands::config::show(&args.config)?,
            cli::ConfigCommands::Validate => commands::config::validate(&args.config)?,
        },
        cli::Commands::Version => {
            println!("Avatar Planner v{}", env!("CARGO_PKG_VERSION"));
        }
    }

    Ok(())
}
