//! # jshape CLI entry point
//!
//! Parses command-line arguments, sets up logging and dispatches to the
//! subcommand handlers.

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use jshape_cli::check::{run_check, CheckArgs};
use jshape_cli::config::CliConfig;
use jshape_cli::show::{run_show, ShowArgs};

/// Check JSON and YAML documents against named schemas.
#[derive(Parser, Debug)]
#[command(name = "jshape", version, about, long_about = None)]
struct Cli {
    /// Enable verbose output. Repeat for more verbosity (-v, -vv, -vvv).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Path to configuration file.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Column limit for report legends; overrides the configuration file.
    #[arg(long, global = true)]
    width: Option<usize>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Coerce a document against a declared type and report any mismatch.
    Check(CheckArgs),

    /// Print declared type definitions.
    Show(ShowArgs),
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let filter = match cli.verbose {
        0 => EnvFilter::new("warn"),
        1 => EnvFilter::new("info"),
        2 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"),
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let result = CliConfig::load(cli.config.as_deref()).and_then(|config| {
        let options = config.with_width(cli.width).render;
        match &cli.command {
            Commands::Check(args) => run_check(args, &options),
            Commands::Show(args) => run_show(args, &options),
        }
    });

    match result {
        Ok(code) => ExitCode::from(code),
        Err(e) => {
            tracing::error!("{e:#}");
            ExitCode::from(2)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cli_parse_check() {
        let cli = Cli::try_parse_from([
            "jshape", "check", "--decl", "types.yaml", "--type", "order", "order.json",
        ])
        .unwrap();
        let Commands::Check(args) = cli.command else {
            panic!("expected check");
        };
        assert_eq!(args.decl, PathBuf::from("types.yaml"));
        assert_eq!(args.type_name, "order");
        assert_eq!(args.input, PathBuf::from("order.json"));
    }

    #[test]
    fn cli_parse_show_with_and_without_name() {
        let cli = Cli::try_parse_from(["jshape", "show", "--decl", "types.yaml"]).unwrap();
        assert!(matches!(cli.command, Commands::Show(ShowArgs { name: None, .. })));

        let cli = Cli::try_parse_from(["jshape", "show", "--decl", "t.yaml", "item"]).unwrap();
        let Commands::Show(args) = cli.command else {
            panic!("expected show");
        };
        assert_eq!(args.name.as_deref(), Some("item"));
    }

    #[test]
    fn cli_parse_global_flags() {
        let cli = Cli::try_parse_from([
            "jshape", "-vv", "--config", "jshape.yaml", "show", "--decl", "t.yaml", "--width", "60",
        ])
        .unwrap();
        assert_eq!(cli.verbose, 2);
        assert_eq!(cli.config, Some(PathBuf::from("jshape.yaml")));
        assert_eq!(cli.width, Some(60));
    }

    #[test]
    fn cli_parse_check_requires_type() {
        assert!(Cli::try_parse_from(["jshape", "check", "--decl", "t.yaml", "in.json"]).is_err());
    }

    #[test]
    fn cli_parse_no_subcommand_errors() {
        assert!(Cli::try_parse_from(["jshape"]).is_err());
    }
}
