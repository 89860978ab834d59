use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ShutterError {
    #[error("Unknown command: {0}")]
    UnknownCommand(String),

    #[error("{0}")]
    InvalidArguments(String),

    #[error("{command} expects at least {minimum} argument(s), got {supplied}")]
    InsufficientArguments {
        command: &'static str,
        minimum: usize,
        supplied: usize,
    },

    #[error("No .shutterrc found in {} or any parent directory", .0.display())]
    ConfigNotFound(PathBuf),

    #[error("Could not read {}: {source}", path.display())]
    ConfigRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid configuration in {}: {source}", path.display())]
    ConfigParse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("{command} failed: {message}")]
    Handler {
        command: &'static str,
        message: String,
    },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl ShutterError {
    pub fn handler(command: &'static str, message: impl Into<String>) -> Self {
        ShutterError::Handler {
            command,
            message: message.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, ShutterError>;
