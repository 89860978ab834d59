//! The `shutter` binary. Argument parsing, rendering and exit codes live in
//! `cli/`; this file installs logging, runs the CLI and terminates the process.

use tracing_subscriber::EnvFilter;

mod cli;

/// Log filter variable, e.g. `SHUTTER_LOG=debug`.
const LOG_ENV: &str = "SHUTTER_LOG";

fn init_logging() {
    let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

#[tokio::main(flavor = "current_thread")]
async fn main() {
    init_logging();

    let code = match cli::run().await {
        Ok(code) => code,
        Err(e) => {
            cli::report_error(&e);
            1
        }
    };
    std::process::exit(code);
}
