//! Command handlers.
//!
//! `authenticate` is implemented here because it only touches `.shutterrc`.
//! The remaining commands talk to the rendering service and live in their own
//! executables (`shutter-update`, `shutter-pull`, `shutter-snapshot`), which the
//! handler starts with the resolved endpoint, if any, in their environment.

use crate::commands::ShutterCommand;
use crate::dispatch::{CommandContext, Flags};
use crate::error::{Result, ShutterError};
use std::future::Future;
use std::path::PathBuf;

pub mod authenticate;
pub mod external;

/// Runs a resolved command. Invoked at most once per process.
pub trait CommandHandler {
    fn run(
        &self,
        command: ShutterCommand,
        args: &[String],
        flags: Flags,
        context: &CommandContext,
    ) -> impl Future<Output = Result<CmdResult>>;
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MessageLevel {
    Info,
    Success,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CmdMessage {
    pub level: MessageLevel,
    pub content: String,
}

impl CmdMessage {
    pub fn info(content: impl Into<String>) -> Self {
        Self {
            level: MessageLevel::Info,
            content: content.into(),
        }
    }

    pub fn success(content: impl Into<String>) -> Self {
        Self {
            level: MessageLevel::Success,
            content: content.into(),
        }
    }
}

/// What a handler wants the CLI to tell the user.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct CmdResult {
    pub messages: Vec<CmdMessage>,
}

impl CmdResult {
    pub fn add_message(&mut self, message: CmdMessage) {
        self.messages.push(message);
    }
}

/// The production handler set.
#[derive(Debug, Clone)]
pub struct ShutterHandlers {
    new_config_path: PathBuf,
    program_dir: Option<PathBuf>,
}

impl ShutterHandlers {
    /// `new_config_path` is where `authenticate` writes when no config was loaded.
    pub fn new(new_config_path: impl Into<PathBuf>) -> Self {
        Self {
            new_config_path: new_config_path.into(),
            program_dir: None,
        }
    }

    /// Look for collaborator executables in `dir` instead of on `PATH`.
    pub fn with_program_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.program_dir = Some(dir.into());
        self
    }

    fn program_for(&self, command: ShutterCommand) -> PathBuf {
        let name = external::program_name(command);
        match &self.program_dir {
            Some(dir) => dir.join(name),
            None => PathBuf::from(name),
        }
    }
}

impl CommandHandler for ShutterHandlers {
    async fn run(
        &self,
        command: ShutterCommand,
        args: &[String],
        flags: Flags,
        context: &CommandContext,
    ) -> Result<CmdResult> {
        match command {
            ShutterCommand::Authenticate => {
                let token = args
                    .first()
                    .ok_or(ShutterError::InsufficientArguments {
                        command: command.name(),
                        minimum: 1,
                        supplied: 0,
                    })?;
                authenticate::run(&self.new_config_path, token, context.config.as_ref()).await
            }
            ShutterCommand::Update | ShutterCommand::Pull | ShutterCommand::Snapshot => {
                external::run(&self.program_for(command), command, args, flags, context).await
            }
        }
    }
}
