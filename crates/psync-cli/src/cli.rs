//! CLI argument parsing using clap derive

use clap::{Parser, Subcommand};

/// promptsync - keep prompt templates and provider connections in sync
/// with the registry
#[derive(Parser, Debug)]
#[command(name = "psync")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// The command to run
    #[command(subcommand)]
    pub command: Commands,
}

/// Available commands
#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Commands {
    /// Sync prompt templates
    #[command(subcommand)]
    Prompts(PromptAction),

    /// Sync provider connections
    #[command(subcommand)]
    Connections(ConnectionAction),
}

/// Prompt subcommands
#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum PromptAction {
    /// Compare local prompts against the registry (exit 1 on drift)
    Check {
        /// Prompt root directory
        #[arg(long, default_value = "prompts")]
        dir: String,

        /// Label filter; falls back to PSYNC_DEFAULT_LABEL
        #[arg(long)]
        label: Option<String>,

        /// Remote page size (1-100)
        #[arg(long, default_value_t = 100)]
        limit: u32,
    },

    /// Write remote prompts into the local tree
    Pull {
        #[arg(long, default_value = "prompts")]
        dir: String,

        /// Label to pull; falls back to PSYNC_DEFAULT_LABEL
        #[arg(long)]
        label: Option<String>,

        #[arg(long, default_value_t = 100)]
        limit: u32,

        /// Report what would change without writing
        #[arg(long)]
        dry_run: bool,

        /// Overwrite local prompts that declare extends
        #[arg(long)]
        force: bool,
    },

    /// Push local prompts to the registry, skipping unchanged ones
    Push {
        #[arg(long, default_value = "prompts")]
        dir: String,

        /// Label filter; falls back to PSYNC_DEFAULT_LABEL
        #[arg(long)]
        label: Option<String>,

        #[arg(long, default_value_t = 100)]
        limit: u32,

        /// Resolve and compare but issue no writes
        #[arg(long)]
        dry_run: bool,

        /// Print the structural diff before pushing
        #[arg(long)]
        debug_diff: bool,

        /// Commit message recorded on the registry
        #[arg(long)]
        commit: Option<String>,

        /// Push even when the comparison fetch fails
        #[arg(long)]
        push_on_fetch_error: bool,
    },
}

/// Connection subcommands
#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum ConnectionAction {
    /// Compare local connections against the registry (exit 1 on drift)
    Check {
        /// Connection root directory
        #[arg(long, default_value = "connections")]
        dir: String,

        /// Environment filter; falls back to PSYNC_DEFAULT_ENV
        #[arg(long)]
        env: Option<String>,

        /// Remote page size (1-100)
        #[arg(long, default_value_t = 100)]
        limit: u32,
    },

    /// Write remote connections into the local tree
    Pull {
        #[arg(long, default_value = "connections")]
        dir: String,

        #[arg(long, default_value_t = 100)]
        limit: u32,

        /// Report what would change without writing
        #[arg(long)]
        dry_run: bool,
    },

    /// Push local connections to the registry, skipping unchanged ones
    Push {
        #[arg(long, default_value = "connections")]
        dir: String,

        /// Environment filter; falls back to PSYNC_DEFAULT_ENV
        #[arg(long)]
        env: Option<String>,

        #[arg(long, default_value_t = 100)]
        limit: u32,

        /// Resolve and compare but issue no writes
        #[arg(long)]
        dry_run: bool,

        /// Print the structural diff before pushing
        #[arg(long)]
        debug_diff: bool,

        /// Push even when the comparison fetch fails
        #[arg(long)]
        push_on_fetch_error: bool,
    },
}
