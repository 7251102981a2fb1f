//! CLI interface and argument parsing
//!
//! This module provides the command-line interface for the packager using clap.

pub mod commands;

use clap::{Parser, Subcommand};

/// Report packager - bundles sent reports into zip archives with a borderel manifest
#[derive(Parser, Debug)]
#[command(name = "packager")]
#[command(version, about, long_about = None)]
#[command(author = "Packager Contributors")]
pub struct Cli {
    /// Path to configuration file
    #[arg(short, long, default_value = "packager.toml", env = "PACKAGER_CONFIG")]
    pub config: String,

    /// Log level (trace, debug, info, warn, error)
    #[arg(short, long, env = "PACKAGER_LOG_LEVEL")]
    pub log_level: Option<String>,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Serve the HTTP trigger and the interval scheduler
    Serve(commands::serve::ServeArgs),

    /// Perform a single packaging run and wait for it to finish
    Run(commands::run::RunArgs),

    /// Release reports left in processing by an interrupted run
    Reconcile(commands::reconcile::ReconcileArgs),

    /// Show packaging status counts
    Status(commands::status::StatusArgs),

    /// Validate configuration file
    ValidateConfig(commands::validate::ValidateArgs),

    /// Initialize a new configuration file
    Init(commands::init::InitArgs),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_parse_serve() {
        let cli = Cli::parse_from(["packager", "serve"]);
        assert_eq!(cli.config, "packager.toml");
        assert!(matches!(cli.command, Commands::Serve(_)));
    }

    #[test]
    fn test_cli_parse_serve_overrides() {
        let cli = Cli::parse_from([
            "packager",
            "serve",
            "--bind",
            "127.0.0.1:8080",
            "--no-scheduler",
            "--migrate",
        ]);
        match cli.command {
            Commands::Serve(args) => {
                assert_eq!(args.bind.as_deref(), Some("127.0.0.1:8080"));
                assert!(args.no_scheduler);
                assert!(args.migrate);
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn test_cli_parse_with_config() {
        let cli = Cli::parse_from(["packager", "--config", "custom.toml", "run"]);
        assert_eq!(cli.config, "custom.toml");
    }

    #[test]
    fn test_cli_parse_with_log_level() {
        let cli = Cli::parse_from(["packager", "--log-level", "debug", "run"]);
        assert_eq!(cli.log_level, Some("debug".to_string()));
    }

    #[test]
    fn test_cli_parse_run_flags() {
        let cli = Cli::parse_from([
            "packager",
            "run",
            "--reconcile",
            "--files-per-report",
            "3",
            "--json",
        ]);
        match cli.command {
            Commands::Run(args) => {
                assert!(args.reconcile);
                assert_eq!(args.files_per_report, Some(3));
                assert!(args.json);
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn test_cli_parse_run_does_not_reconcile_by_default() {
        let cli = Cli::parse_from(["packager", "run"]);
        match cli.command {
            Commands::Run(args) => assert!(!args.reconcile),
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn test_cli_parse_reconcile() {
        let cli = Cli::parse_from(["packager", "reconcile"]);
        assert!(matches!(cli.command, Commands::Reconcile(_)));
    }

    #[test]
    fn test_cli_parse_validate_config() {
        let cli = Cli::parse_from(["packager", "validate-config"]);
        assert!(matches!(cli.command, Commands::ValidateConfig(_)));
    }

    #[test]
    fn test_cli_parse_status() {
        let cli = Cli::parse_from(["packager", "status", "--json"]);
        assert!(matches!(cli.command, Commands::Status(ref args) if args.json));
    }

    #[test]
    fn test_cli_parse_init() {
        let cli = Cli::parse_from(["packager", "init"]);
        assert!(matches!(cli.command, Commands::Init(_)));
    }
}
