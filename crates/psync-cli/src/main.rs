//! promptsync CLI
//!
//! The command-line interface for syncing prompt templates and provider
//! connections with the remote registry.

mod cli;
mod commands;
mod error;

use clap::Parser;
use colored::Colorize;
use tracing::Level;
use tracing_subscriber::FmtSubscriber;

use cli::{Cli, Commands, ConnectionAction, PromptAction};
use error::Result;

#[tokio::main(flavor = "current_thread")]
async fn main() {
    let cli = Cli::parse();

    // Setup tracing if verbose
    if cli.verbose {
        let subscriber = FmtSubscriber::builder()
            .with_max_level(Level::DEBUG)
            .with_target(true)
            .finish();
        tracing::subscriber::set_global_default(subscriber)
            .expect("Failed to set tracing subscriber");
        tracing::debug!("Verbose mode enabled");
    }

    match execute_command(cli.command).await {
        Ok(clean) => {
            if !clean {
                std::process::exit(1);
            }
        }
        Err(e) => {
            eprintln!("{}: {}", "error".red().bold(), e);
            std::process::exit(1);
        }
    }
}

/// Run one command; the returned flag is whether the run was clean.
async fn execute_command(command: Commands) -> Result<bool> {
    match command {
        Commands::Prompts(action) => match action {
            PromptAction::Check { dir, label, limit } => {
                commands::run_prompt_check(&dir, label, limit).await
            }
            PromptAction::Pull {
                dir,
                label,
                limit,
                dry_run,
                force,
            } => commands::run_prompt_pull(&dir, label, limit, dry_run, force).await,
            PromptAction::Push {
                dir,
                label,
                limit,
                dry_run,
                debug_diff,
                commit,
                push_on_fetch_error,
            } => {
                commands::run_prompt_push(
                    &dir,
                    label,
                    limit,
                    dry_run,
                    debug_diff,
                    commit,
                    push_on_fetch_error,
                )
                .await
            }
        },
        Commands::Connections(action) => match action {
            ConnectionAction::Check { dir, env, limit } => {
                commands::run_connection_check(&dir, env, limit).await
            }
            ConnectionAction::Pull {
                dir,
                limit,
                dry_run,
            } => commands::run_connection_pull(&dir, limit, dry_run).await,
            ConnectionAction::Push {
                dir,
                env,
                limit,
                dry_run,
                debug_diff,
                push_on_fetch_error,
            } => {
                commands::run_connection_push(
                    &dir,
                    env,
                    limit,
                    dry_run,
                    debug_diff,
                    push_on_fetch_error,
                )
                .await
            }
        },
    }
}
