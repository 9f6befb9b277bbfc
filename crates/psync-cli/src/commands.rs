//! Command implementations
//!
//! Each run function builds the engine against the HTTP registry, executes
//! one command, renders its report, and returns whether the run was clean.
//! The caller turns that into the process exit code.

use colored::Colorize;

use psync_engine::{
    CheckOptions, CheckReport, FetchFailurePolicy, PullOptions, PullReport, PushOptions,
    PushReport, PushStatus, SyncEngine,
};
use psync_registry::HttpRegistry;

use crate::error::Result;

/// Fallback label when neither the flag nor the artifact provides one.
pub const DEFAULT_LABEL_VAR: &str = "PSYNC_DEFAULT_LABEL";
/// Fallback environment filter for connections.
pub const DEFAULT_ENV_VAR: &str = "PSYNC_DEFAULT_ENV";

pub async fn run_prompt_check(dir: &str, label: Option<String>, limit: u32) -> Result<bool> {
    println!(
        "{} Checking prompts against the registry...",
        "=>".blue().bold()
    );
    let registry = HttpRegistry::from_env()?;
    let engine = SyncEngine::new(&registry);
    let report = engine
        .check_prompts(&check_options(dir, label, limit, DEFAULT_LABEL_VAR))
        .await?;
    print_check_report(&report);
    Ok(report.is_clean())
}

pub async fn run_prompt_pull(
    dir: &str,
    label: Option<String>,
    limit: u32,
    dry_run: bool,
    force: bool,
) -> Result<bool> {
    println!("{} Pulling prompts from the registry...", "=>".blue().bold());
    let registry = HttpRegistry::from_env()?;
    let engine = SyncEngine::new(&registry);
    let mut options = PullOptions::new(dir);
    options.scope = label;
    options.default_scope = std::env::var(DEFAULT_LABEL_VAR).ok();
    options.limit = limit;
    options.dry_run = dry_run;
    options.force = force;
    let report = engine.pull_prompts(&options).await?;
    print_pull_report(&report);
    Ok(report.failures.is_empty())
}

#[allow(clippy::too_many_arguments)]
pub async fn run_prompt_push(
    dir: &str,
    label: Option<String>,
    limit: u32,
    dry_run: bool,
    debug_diff: bool,
    commit: Option<String>,
    push_on_fetch_error: bool,
) -> Result<bool> {
    println!("{} Pushing prompts to the registry...", "=>".blue().bold());
    let registry = HttpRegistry::from_env()?;
    let engine = SyncEngine::new(&registry);
    let mut options = push_options(dir, label, limit, DEFAULT_LABEL_VAR);
    options.dry_run = dry_run;
    options.debug_diff = debug_diff;
    options.commit_message = commit;
    if push_on_fetch_error {
        options.fetch_failure = FetchFailurePolicy::PushAnyway;
    }
    let report = engine.push_prompts(&options).await?;
    print_push_report(&report);
    Ok(!report.has_failures())
}

pub async fn run_connection_check(dir: &str, env: Option<String>, limit: u32) -> Result<bool> {
    println!(
        "{} Checking connections against the registry...",
        "=>".blue().bold()
    );
    let registry = HttpRegistry::from_env()?;
    let engine = SyncEngine::new(&registry);
    let report = engine
        .check_connections(&check_options(dir, env, limit, DEFAULT_ENV_VAR))
        .await?;
    print_check_report(&report);
    Ok(report.is_clean())
}

pub async fn run_connection_pull(dir: &str, limit: u32, dry_run: bool) -> Result<bool> {
    println!(
        "{} Pulling connections from the registry...",
        "=>".blue().bold()
    );
    let registry = HttpRegistry::from_env()?;
    let engine = SyncEngine::new(&registry);
    let mut options = PullOptions::new(dir);
    options.limit = limit;
    options.dry_run = dry_run;
    let report = engine.pull_connections(&options).await?;
    print_pull_report(&report);
    Ok(report.failures.is_empty())
}

pub async fn run_connection_push(
    dir: &str,
    env: Option<String>,
    limit: u32,
    dry_run: bool,
    debug_diff: bool,
    push_on_fetch_error: bool,
) -> Result<bool> {
    println!("{} Pushing connections to the registry...", "=>".blue().bold());
    let registry = HttpRegistry::from_env()?;
    let engine = SyncEngine::new(&registry);
    let mut options = push_options(dir, env, limit, DEFAULT_ENV_VAR);
    options.dry_run = dry_run;
    options.debug_diff = debug_diff;
    if push_on_fetch_error {
        options.fetch_failure = FetchFailurePolicy::PushAnyway;
    }
    let report = engine.push_connections(&options).await?;
    print_push_report(&report);
    Ok(!report.has_failures())
}

fn check_options(dir: &str, scope: Option<String>, limit: u32, env_var: &str) -> CheckOptions {
    let mut options = CheckOptions::new(dir);
    options.scope = scope;
    options.default_scope = std::env::var(env_var).ok();
    options.limit = limit;
    options
}

fn push_options(dir: &str, scope: Option<String>, limit: u32, env_var: &str) -> PushOptions {
    let mut options = PushOptions::new(dir);
    options.scope = scope;
    options.default_scope = std::env::var(env_var).ok();
    options.limit = limit;
    options
}

fn print_check_report(report: &CheckReport) {
    if report.is_clean() {
        println!(
            "{} {} artifact(s) checked. No drift detected.",
            "OK".green().bold(),
            report.checked
        );
        return;
    }

    for key in &report.missing {
        println!(
            "{} {} has no remote counterpart",
            "MISSING".yellow().bold(),
            key.cyan()
        );
    }
    for drift in &report.drifted {
        println!("{} {}", "DRIFTED".red().bold(), drift.key.cyan());
        for issue in &drift.issues {
            println!("   {} {}", "!".red(), indent_continuation(&issue.to_string()));
        }
    }
    for failure in &report.failures {
        println!("{} {}", "ERROR".red().bold(), failure);
    }
}

fn print_pull_report(report: &PullReport) {
    let verb = if report.dry_run { "Would write" } else { "Wrote" };
    for key in &report.written {
        println!("   {} {} {}", "+".green(), verb, key.cyan());
    }
    for skip in &report.skipped {
        println!("   {} Skipped {}", "-".yellow(), skip);
    }
    for failure in &report.failures {
        println!("   {} {}", "!".red(), failure);
    }

    if report.written.is_empty() && report.skipped.is_empty() && report.failures.is_empty() {
        println!("{} Nothing to pull.", "OK".green().bold());
    } else {
        println!(
            "{} {} written, {} skipped, {} failed",
            "OK".green().bold(),
            report.written.len(),
            report.skipped.len(),
            report.failures.len()
        );
    }
}

fn print_push_report(report: &PushReport) {
    let verb = if report.dry_run { "Would push" } else { "Pushed" };
    for result in &report.results {
        match result.status {
            PushStatus::Pushed => {
                println!("   {} {} {}", "+".green(), verb, result.key.cyan());
                if let Some(detail) = &result.detail {
                    println!("{}", indent_block(detail));
                }
            }
            PushStatus::Skipped => {
                println!("   {} {} unchanged", "=".dimmed(), result.key.cyan());
            }
            PushStatus::Failed => {
                println!(
                    "   {} {} failed: {}",
                    "!".red(),
                    result.key.cyan(),
                    result.detail.as_deref().unwrap_or("unknown error")
                );
            }
        }
    }
    for failure in &report.failures {
        println!("   {} {}", "!".red(), failure);
    }

    println!(
        "{} {} pushed, {} skipped, {} failed",
        if report.has_failures() {
            "DONE".red().bold()
        } else {
            "OK".green().bold()
        },
        report.pushed(),
        report.skipped(),
        report.failed()
    );
}

fn indent_continuation(text: &str) -> String {
    text.replace('\n', "\n     ")
}

fn indent_block(text: &str) -> String {
    text.lines()
        .map(|line| format!("     {line}"))
        .collect::<Vec<_>>()
        .join("\n")
}
