//! Core library entry for the `glt` CLI.
//!
//! Free-text requirements go through [`service::NlpIssueService`], which
//! extracts ordered tasks and files them through the ports in
//! [`context::ServiceContext`]. Short natural-language commands are routed
//! by [`command::CommandParser`].

pub mod adapters;
pub mod ai;
pub mod cassette;
pub mod cli;
pub mod command;
pub mod commands;
pub mod config;
pub mod context;
pub mod extract;
pub mod ports;
pub mod service;
pub mod task;

use clap::Parser;

/// Run the CLI with the provided arguments.
///
/// # Errors
///
/// Returns an error string when argument parsing fails or command execution fails.
pub fn run<I, T>(args: I) -> Result<(), String>
where
    I: IntoIterator<Item = T>,
    T: Into<std::ffi::OsString> + Clone,
{
    let cli = cli::Cli::try_parse_from(args).map_err(|err| err.to_string())?;
    commands::dispatch(&cli.command)
}
