//! Binary entrypoint for the `glt` CLI.

use std::process::ExitCode;

use tracing_subscriber::EnvFilter;

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("glt=info")),
        )
        .with_writer(std::io::stderr)
        .init();

    // Recording is handled in commands::dispatch via GLT_RECORD=<file>.
    match glt::run(std::env::args()) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("{err}");
            ExitCode::FAILURE
        }
    }
}
