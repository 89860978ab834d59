use super::CmdResult;
use crate::commands::ShutterCommand;
use crate::dispatch::{CommandContext, Flags, API_ENV};
use crate::error::{Result, ShutterError};
use std::io::ErrorKind;
use std::path::Path;
use tracing::{debug, warn};

/// Environment variable carrying the saved token to collaborator executables.
pub const TOKEN_ENV: &str = "SHUTTER_TOKEN";

const PROGRAM_PREFIX: &str = "shutter-";

pub fn program_name(command: ShutterCommand) -> String {
    format!("{}{}", PROGRAM_PREFIX, command.name())
}

/// Starts the collaborator executable and waits for it to finish.
///
/// Its stdio is inherited. The endpoint is handed to the child only; this
/// process' own environment is left untouched. Without a resolved endpoint the
/// child gets no `SHUTTER_API` at all and picks its own default.
pub async fn run(
    program: &Path,
    command: ShutterCommand,
    args: &[String],
    flags: Flags,
    context: &CommandContext,
) -> Result<CmdResult> {
    let mut child = tokio::process::Command::new(program);
    child.args(args);
    if flags.await_completion {
        child.arg("--awaitCompletion");
    }
    if flags.local {
        child.arg("--local");
    }
    match &context.endpoint {
        Some(endpoint) => child.env(API_ENV, endpoint),
        None => child.env_remove(API_ENV),
    };
    match context.token() {
        Some(token) => {
            child.env(TOKEN_ENV, token);
        }
        None => warn!(%command, "no token saved; run `shutter authenticate <token>` first"),
    }

    debug!(
        program = %program.display(),
        endpoint = ?context.endpoint,
        args = args.len(),
        "starting collaborator"
    );

    let status = child.status().await.map_err(|err| match err.kind() {
        ErrorKind::NotFound => ShutterError::handler(
            command.name(),
            format!("{} was not found on PATH", program.display()),
        ),
        _ => ShutterError::Io(err),
    })?;

    if !status.success() {
        let message = match status.code() {
            Some(code) => format!("{} exited with status {}", program.display(), code),
            None => format!("{} was terminated by a signal", program.display()),
        };
        return Err(ShutterError::handler(command.name(), message));
    }

    Ok(CmdResult::default())
}
