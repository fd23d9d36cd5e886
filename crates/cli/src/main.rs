//! Commons CLI - Command-line interface for the permission matrix
//!
//! Usage:
//!   commons                                   - Start interactive explorer
//!   commons init [dir]                        - Write a permissions.yaml
//!   commons policy check --roles <csv>        - Show effective permissions
//!   commons policy check -m project -a edit   - Check one action (exit 1 if denied)
//!   commons policy roles|modules|matrix       - Inspect the policy

use clap::{Parser, Subcommand};
use cli::commands::{InitCommand, PolicyCommand};
use cli::context::AccessContext;
use cli::interactive::InteractiveCli;
use std::path::PathBuf;
use std::process::ExitCode;

#[derive(Parser)]
#[command(name = "commons")]
#[command(about = "Commons - Role-based permission inspection for the community platform")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Comma-separated roles (defaults to the configured environment variable)
    #[arg(short, long, global = true)]
    roles: Option<String>,

    /// Permission config file (YAML or JSON)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Output as JSON
    #[arg(long, global = true)]
    json: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Write a permission config file
    Init(InitCommand),
    /// Policy inspection
    Policy(PolicyCommand),
}

fn main() -> anyhow::Result<ExitCode> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Some(Commands::Init(cmd)) => {
            cmd.run()?;
            Ok(ExitCode::SUCCESS)
        }
        Some(Commands::Policy(cmd)) => {
            let ctx = AccessContext::load(cli.config.as_deref())?;
            let allowed = cmd.run(&ctx, cli.roles.as_deref(), cli.json)?;
            Ok(if allowed { ExitCode::SUCCESS } else { ExitCode::FAILURE })
        }
        None => {
            // No subcommand - start interactive mode
            let ctx = AccessContext::load(cli.config.as_deref())?;
            let mut interactive = InteractiveCli::new(ctx, cli.roles);
            interactive.run()?;
            Ok(ExitCode::SUCCESS)
        }
    }
}
