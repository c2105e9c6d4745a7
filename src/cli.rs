//! CLI argument definitions.

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};

/// Top-level CLI parser for `glt`.
#[derive(Debug, Parser)]
#[command(name = "glt", version, about = "Turn plain-language requirements into GitLab issues")]
pub struct Cli {
    /// The command to execute.
    #[command(subcommand)]
    pub command: Command,
}

/// How `glt extract` prints its result.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Markdown summary.
    #[default]
    Text,
    /// Tasks with their issue payloads, as JSON.
    Json,
    /// Tasks with their issue payloads, as YAML.
    Yaml,
}

/// Supported top-level subcommands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Extract tasks from a description without creating anything.
    Extract {
        /// Read the description from this file instead of stdin.
        #[arg(long)]
        file: Option<PathBuf>,
        /// YAML or JSON project context used for enrichment.
        #[arg(long)]
        context: Option<PathBuf>,
        /// Analyze with the LLM instead of the pattern tables.
        #[arg(long)]
        ai: bool,
        /// Output format.
        #[arg(long, value_enum, default_value_t)]
        format: OutputFormat,
    },
    /// Extract tasks and create one GitLab issue per task.
    Create {
        /// GitLab project ID or `group/project` path.
        #[arg(long)]
        project: String,
        /// Read the description from this file instead of stdin.
        #[arg(long)]
        file: Option<PathBuf>,
        /// YAML or JSON project context used for enrichment.
        #[arg(long, conflicts_with = "fetch_context")]
        context: Option<PathBuf>,
        /// Fetch open issues, members and milestones from GitLab first.
        #[arg(long)]
        fetch_context: bool,
        /// Analyze with the LLM instead of the pattern tables.
        #[arg(long)]
        ai: bool,
        /// Preview the issues instead of creating them.
        #[arg(long)]
        dry_run: bool,
    },
    /// Match a natural-language command and show what it would run.
    Parse {
        /// The command text, e.g. `rename branches in AI-ML-Services from trunk to main`.
        #[arg(required = true, num_args = 1.., trailing_var_arg = true)]
        text: Vec<String>,
        /// Print the match as JSON.
        #[arg(long)]
        json: bool,
    },
    /// List the known commands, or explain one.
    Commands {
        /// Operation name or keyword, e.g. `rename-branches` or `dashboard`.
        name: Option<String>,
    },
}
