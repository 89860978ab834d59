use super::render::render_outcome;
use super::setup::Cli;
use clap::Parser;
use shutter::config::{FileConfigLoader, CONFIG_FILENAME, RC_ENV};
use shutter::dispatch::{Dispatcher, Environment};
use shutter::error::{Result, ShutterError};
use shutter::handlers::ShutterHandlers;
use std::path::PathBuf;

/// Parses the command line, dispatches it and renders the outcome.
///
/// Returns the exit code for every handled outcome; errors are left to the caller.
pub async fn run() -> Result<i32> {
    let cli = Cli::try_parse()
        .map_err(|e| ShutterError::InvalidArguments(e.to_string().trim_end().to_string()))?;

    let cwd = std::env::current_dir()?;
    let explicit_rc = std::env::var_os(RC_ENV)
        .filter(|v| !v.is_empty())
        .map(PathBuf::from);
    let new_config_path = explicit_rc
        .clone()
        .unwrap_or_else(|| cwd.join(CONFIG_FILENAME));
    let loader = FileConfigLoader::new(&cwd).with_explicit_path(explicit_rc);
    let handlers = ShutterHandlers::new(new_config_path);
    let dispatcher = Dispatcher::new(loader, handlers, Environment::from_process());

    let outcome = dispatcher.run(cli.into_input()).await?;
    Ok(render_outcome(&outcome))
}
