use super::{CmdMessage, CmdResult};
use crate::config::ShutterConfig;
use crate::error::{Result, ShutterError};
use std::path::Path;
use tracing::info;

/// Stores `token` in the loaded `.shutterrc`, or at `new_config_path` when none was loaded.
///
/// Fields already present in the loaded file are preserved.
pub async fn run(
    new_config_path: &Path,
    token: &str,
    config: Option<&ShutterConfig>,
) -> Result<CmdResult> {
    let token = token.trim();
    if token.is_empty() {
        return Err(ShutterError::handler("authenticate", "token must not be empty"));
    }

    let mut updated = config.cloned().unwrap_or_default();
    let path = updated
        .source
        .clone()
        .unwrap_or_else(|| new_config_path.to_path_buf());
    let replaced = updated.token.is_some();
    updated.token = Some(token.to_string());
    updated.save(&path).await?;
    info!(path = %path.display(), replaced, "stored authentication token");

    let mut result = CmdResult::default();
    if replaced {
        result.add_message(CmdMessage::info("Replacing previously saved token."));
    }
    result.add_message(CmdMessage::success(format!(
        "Authentication token saved to {}",
        path.display()
    )));
    Ok(result)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::CONFIG_FILENAME;
    use serde_json::json;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_creates_config_without_existing_config() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join(CONFIG_FILENAME);

        let result = run(&path, "abc123", None).await.unwrap();

        let saved = ShutterConfig::read(&path).await.unwrap();
        assert_eq!(saved.token.as_deref(), Some("abc123"));
        assert_eq!(result.messages.len(), 1);
    }

    #[tokio::test]
    async fn test_updates_loaded_config_in_place() {
        let temp = TempDir::new().unwrap();
        let project = temp.path().join("project");
        std::fs::create_dir_all(&project).unwrap();
        let rc = temp.path().join(CONFIG_FILENAME);
        std::fs::write(
            &rc,
            r#"{"token": "old", "serviceHost": "https://dev", "viewport": 1024}"#,
        )
        .unwrap();
        let loaded = ShutterConfig::read(&rc).await.unwrap();

        let result = run(&project.join(CONFIG_FILENAME), "new", Some(&loaded))
            .await
            .unwrap();

        assert!(!project.join(CONFIG_FILENAME).exists());
        let saved = ShutterConfig::read(&rc).await.unwrap();
        assert_eq!(saved.token.as_deref(), Some("new"));
        assert_eq!(saved.service_host(), Some("https://dev".to_string()));
        assert_eq!(saved.extra.get("viewport"), Some(&json!(1024)));
        assert_eq!(result.messages[0], CmdMessage::info("Replacing previously saved token."));
    }

    #[tokio::test]
    async fn test_rejects_blank_token() {
        let temp = TempDir::new().unwrap();

        let path = temp.path().join(CONFIG_FILENAME);
        let err = run(&path, "   ", None).await.unwrap_err();
        assert!(matches!(err, ShutterError::Handler { .. }));
        assert!(!path.exists());
    }
}
