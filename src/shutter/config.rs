use crate::error::{Result, ShutterError};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::future::Future;
use std::path::{Path, PathBuf};
use tracing::debug;

pub const CONFIG_FILENAME: &str = ".shutterrc";

/// Environment variable naming an explicit `.shutterrc` path, bypassing discovery.
pub const RC_ENV: &str = "SHUTTER_RC";

/// A `serviceHost` that stringifies to this is treated as absent.
const UNDEFINED_SENTINEL: &str = "undefined";

/// Configuration for shutter, stored as JSON in `.shutterrc`
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ShutterConfig {
    /// Authentication token written by `shutter authenticate`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub token: Option<String>,

    /// Alternative API endpoint, mostly used during development
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub service_host: Option<Value>,

    /// Fields owned by other tools; kept so that saving does not drop them
    #[serde(flatten)]
    pub extra: Map<String, Value>,

    /// File this config was read from, if any
    #[serde(skip)]
    pub source: Option<PathBuf>,
}

impl ShutterConfig {
    /// The service host coerced to a string.
    ///
    /// Any JSON scalar is accepted, including `""`, `0` and `false`. A missing or
    /// `null` value, or one that reads `"undefined"`, yields `None`. Arrays and
    /// objects are not rejected; they come back as compact JSON text, so
    /// `{"a": 1}` becomes `{"a":1}`.
    pub fn service_host(&self) -> Option<String> {
        let raw = match self.service_host.as_ref()? {
            Value::Null => return None,
            Value::String(s) => s.clone(),
            other => other.to_string(),
        };
        (raw != UNDEFINED_SENTINEL).then_some(raw)
    }

    /// Reads and parses the config file at `path`
    pub async fn read(path: &Path) -> Result<Self> {
        let content =
            tokio::fs::read_to_string(path)
                .await
                .map_err(|source| ShutterError::ConfigRead {
                    path: path.to_path_buf(),
                    source,
                })?;
        let mut config: ShutterConfig =
            serde_json::from_str(&content).map_err(|source| ShutterError::ConfigParse {
                path: path.to_path_buf(),
                source,
            })?;
        config.source = Some(path.to_path_buf());
        Ok(config)
    }

    /// Save config to `path`, creating parent directories as needed
    pub async fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                tokio::fs::create_dir_all(parent).await?;
            }
        }

        let mut content = serde_json::to_string_pretty(self)?;
        content.push('\n');
        tokio::fs::write(path, content).await?;
        Ok(())
    }
}

/// Source of the configuration handed to the dispatcher.
pub trait ConfigLoader {
    fn load(&self) -> impl Future<Output = Result<ShutterConfig>>;
}

/// Loads `.shutterrc` from disk.
///
/// Unless an explicit path is given, the working directory and then each of
/// its ancestors is searched; the nearest file wins.
#[derive(Debug, Clone)]
pub struct FileConfigLoader {
    cwd: PathBuf,
    explicit: Option<PathBuf>,
}

impl FileConfigLoader {
    pub fn new(cwd: impl Into<PathBuf>) -> Self {
        Self {
            cwd: cwd.into(),
            explicit: None,
        }
    }

    pub fn with_explicit_path(mut self, path: Option<PathBuf>) -> Self {
        self.explicit = path;
        self
    }

    /// Finds the config file to load without reading it
    pub async fn locate(&self) -> Result<PathBuf> {
        if let Some(path) = &self.explicit {
            return Ok(path.clone());
        }

        for dir in self.cwd.ancestors() {
            let candidate = dir.join(CONFIG_FILENAME);
            if tokio::fs::try_exists(&candidate).await.unwrap_or(false) {
                return Ok(candidate);
            }
        }
        Err(ShutterError::ConfigNotFound(self.cwd.clone()))
    }
}

impl ConfigLoader for FileConfigLoader {
    async fn load(&self) -> Result<ShutterConfig> {
        let path = self.locate().await?;
        debug!(path = %path.display(), "loading config");
        ShutterConfig::read(&path).await
    }
}
