use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    name = "avatar-planner",
    version,
    about = "Cost-optimal avatar, voice agent and hosting planner"
)]
pub struct Cli {
    /// Configuration file path
    #[arg(short, long, default_value = "config.toml", global = true)]
    pub config: PathBuf,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    /// Start the planner HTTP server (default)
    Serve,

    /// Rank configurations for a request given as a JSON file path or JSON string
    Calculate {
        /// Path to a JSON request file, or the JSON request itself
        input: String,

        /// Treat INPUT as JSON lines of scenarios, each planned with and without a voice agent
        #[arg(long)]
        batch: bool,

        /// Output format
        #[arg(short, long, value_enum, default_value = "json")]
        format: OutputFormat,

        /// Number of combinations shown in table format
        #[arg(short, long, default_value = "20")]
        limit: usize,
    },

    /// Show the pricing catalog in effect
    Catalog,

    /// Provider latency and uptime telemetry
    Telemetry {
        #[command(subcommand)]
        action: TelemetryCommands,
    },

    /// Configuration management commands
    Config {
        #[command(subcommand)]
        action: ConfigCommands,
    },

    /// Show version information
    Version,
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Json,
    Table,
}

#[derive(Subcommand, Debug, Clone)]
pub enum TelemetryCommands {
    /// Scrape every known provider and store the results
    Collect,

    /// Show default latency estimates and stored aggregates
    Show,
}

#[derive(Subcommand, Debug, Clone)]
pub enum ConfigCommands {
    /// Display the effective configuration
    Show,

    /// Validate configuration file
    Validate,
}

impl Cli {
    /// Get the command to execute, defaulting to Serve if none provided
    pub fn get_command(&self) -> Commands {
        self.command.clone().unwrap_or(Commands::Serve)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_command_is_serve() {
        let cli = Cli {
            config: PathBuf::from("config.toml"),
            command: None,
        };

        assert!(matches!(cli.get_command(), Commands::Serve));
    }

    #[test]
    fn test_cli_parsing_calculate_defaults() {
        let args = vec!["avatar-planner", "calculate", "request.json"];
        let cli = Cli::try_parse_from(args).unwrap();

        match cli.get_command() {
            Commands::Calculate {
                input,
                batch,
                format,
                limit,
            } => {
                assert_eq!(input, "request.json");
                assert!(!batch);
                assert_eq!(format, OutputFormat::Json);
                assert_eq!(limit, 20);
            }
            _ => panic!("Expected Calculate command"),
        }
    }

    #[test]
    fn test_cli_parsing_calculate_batch() {
        let args = vec!["avatar-planner", "calculate", "--batch", "scenarios.jsonl"];
        let cli = Cli::try_parse_from(args).unwrap();

        match cli.get_command() {
            Commands::Calculate { input, batch, .. } => {
                assert_eq!(input, "scenarios.jsonl");
                assert!(batch);
            }
            _ => panic!("Expected Calculate command"),
        }
    }

    #[test]
    fn test_cli_parsing_calculate_table() {
        let args = vec![
            "avatar-planner",
            "calculate",
            "{\"users\": 1}",
            "--format",
            "table",
            "--limit",
            "5",
        ];
        let cli = Cli::try_parse_from(args).unwrap();

        match cli.get_command() {
            Commands::Calculate { format, limit, .. } => {
                assert_eq!(format, OutputFormat::Table);
                assert_eq!(limit, 5);
            }
            _ => panic!("Expected Calculate command"),
        }
    }

    #[test]
    fn test_cli_parsing_telemetry_and_global_config() {
        let args = vec!["avatar-planner", "telemetry", "show", "--config", "planner.toml"];
        let cli = Cli::try_parse_from(args).unwrap();

        assert_eq!(cli.config, PathBuf::from("planner.toml"));
        assert!(matches!(
            cli.get_command(),
            Commands::Telemetry {
                action: TelemetryCommands::Show
            }
        ));
    }

    #[test]
    fn test_cli_parsing_config_validate() {
        let args = vec!["avatar-planner", "config", "validate"];
        let cli = Cli::try_parse_from(args).unwrap();

        assert!(matches!(
            cli.get_command(),
            Commands::Config {
                action: ConfigCommands::Validate
            }
        ));
    }
}
