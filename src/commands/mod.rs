//! Command dispatch and handlers.

pub mod catalog;
pub mod create;
pub mod extract;
pub mod parse;

use std::io::Read;
use std::path::Path;

use tokio::runtime::Runtime;

use crate::cli::Command;
use crate::config::Config;
use crate::context::ServiceContext;
use crate::extract::ProjectContext;
use crate::service::NlpIssueService;

/// Dispatch a parsed command to its handler.
///
/// Only `extract` and `create` read the environment and build port
/// adapters. When `GLT_RECORD` names a file, their port traffic is recorded
/// to that cassette.
///
/// # Errors
///
/// Returns an error string if the selected command handler fails.
pub fn dispatch(command: &Command) -> Result<(), String> {
    match command {
        Command::Parse { text, json } => parse::run(&text.join(" "), *json),
        Command::Commands { name } => catalog::run(name.as_deref()),
        Command::Extract { file, context, ai, format } => with_context(|config, ctx| {
            extract::run(ctx, config, file.as_deref(), context.as_deref(), *ai, *format)
        }),
        Command::Create { project, file, context, fetch_context, ai, dry_run } => {
            let options = create::CreateOptions {
                fetch_context: *fetch_context,
                use_ai: *ai,
                dry_run: *dry_run,
            };
            with_context(|config, ctx| {
                create::run(ctx, config, project, file.as_deref(), context.as_deref(), options)
            })
        }
    }
}

/// Runs `handler` with the environment config and a context built from it.
/// The context, and any cassette it records, is dropped afterwards.
fn with_context<T>(handler: impl FnOnce(&Config, &ServiceContext) -> T) -> T {
    let config = Config::from_env();
    let ctx = ServiceContext::from_config(&config);
    handler(&config, &ctx)
}

/// Builds the pipeline service over `ctx` with the configured vocabulary.
fn build_service<'c>(
    ctx: &'c ServiceContext,
    config: &Config,
) -> Result<NlpIssueService<'c>, String> {
    let table = config.pattern_table().map_err(|e| e.to_string())?;
    Ok(NlpIssueService::new(ctx, table, Some(config.ai_model.clone())))
}

/// Reads the description from `file`, or from stdin when no file is given.
fn read_description(file: Option<&Path>) -> Result<String, String> {
    match file {
        Some(path) => std::fs::read_to_string(path)
            .map_err(|e| format!("Failed to read {}: {e}", path.display())),
        None => {
            let mut buf = String::new();
            std::io::stdin()
                .read_to_string(&mut buf)
                .map_err(|e| format!("Failed to read description from stdin: {e}"))?;
            Ok(buf)
        }
    }
}

fn load_context(path: Option<&Path>) -> Result<Option<ProjectContext>, String> {
    path.map(|p| ProjectContext::load(p).map_err(|e| e.to_string())).transpose()
}

/// Single-threaded runtime for one command invocation.
fn runtime() -> Result<Runtime, String> {
    tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .map_err(|e| format!("Failed to start async runtime: {e}"))
}
