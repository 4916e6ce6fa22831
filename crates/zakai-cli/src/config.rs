use anyhow::Context;
use serde::Deserialize;
use std::path::{Path, PathBuf};
use tracing::{info, warn};
use zakai_agent::ChatConfig;

/// Environment variable that overrides `model.api_key`.
pub const API_KEY_ENV: &str = "OPENAI_API_KEY";

/// Contents of `zakai.toml`.
#[derive(Debug, Deserialize)]
pub struct ZakaiConfig {
    #[serde(flatten)]
    pub chat: ChatConfig,
    /// Where revised documents are written.
    #[serde(default = "default_output_dir")]
    pub output_dir: PathBuf,
}

fn default_output_dir() -> PathBuf {
    PathBuf::from("./downloads")
}

impl Default for ZakaiConfig {
    fn default() -> Self {
        Self {
            chat: ChatConfig::default(),
            output_dir: default_output_dir(),
        }
    }
}

impl ZakaiConfig {
    /// Reads the config file. A missing file yields the defaults.
    pub async fn load(path: &Path) -> anyhow::Result<Self> {
        match tokio::fs::read_to_string(path).await {
            Ok(config_str) => toml::from_str(&config_str)
                .with_context(|| format!("Failed to parse config file '{}'", path.display())),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                info!(path = %path.display(), "No config file, using defaults");
                Ok(Self::default())
            }
            Err(e) => Err(anyhow::anyhow!(
                "Failed to read config file '{}': {}",
                path.display(),
                e
            )),
        }
    }

    /// Applies overrides from the environment and the command line.
    pub fn apply_overrides(&mut self, api_key: Option<String>, model: Option<String>) {
        if let Some(key) = api_key.filter(|k| !k.trim().is_empty()) {
            self.chat.model.api_key = key;
        }
        if let Some(model) = model {
            self.chat.model.model_id = model;
        }
        if self.chat.model.api_key.is_empty() {
            warn!("No API key configured; set {API_KEY_ENV} or model.api_key");
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_missing_file_uses_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = ZakaiConfig::load(&dir.path().join("absent.toml")).await.unwrap();
        assert_eq!(config.output_dir, PathBuf::from("./downloads"));
        assert_eq!(config.chat.model.model_id, "gpt-4o");
    }

    #[tokio::test]
    async fn test_full_file_parses() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("zakai.toml");
        tokio::fs::write(
            &path,
            r#"
system_prompt = "Jawab dalam bahasa Indonesia"
output_dir = "./out"

[model]
provider = "openrouter"
model_id = "openai/gpt-4o"
api_key = "from-file"

[intents]
create_keywords = ["buat", "create"]
image_keywords = ["gambar", "image"]

[stream]
typing_delay_ms = 0
"#,
        )
        .await
        .unwrap();

        let config = ZakaiConfig::load(&path).await.unwrap();
        assert_eq!(config.chat.system_prompt, "Jawab dalam bahasa Indonesia");
        assert_eq!(config.output_dir, PathBuf::from("./out"));
        assert_eq!(config.chat.model.api_key, "from-file");
        assert_eq!(config.chat.intents.create_keywords, vec!["buat", "create"]);
        assert_eq!(config.chat.intents.revision_keywords, vec!["revisi"]);
        assert_eq!(config.chat.stream.typing_delay_ms, 0);
    }

    #[tokio::test]
    async fn test_invalid_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("zakai.toml");
        tokio::fs::write(&path, "[model\nbroken").await.unwrap();
        let err = ZakaiConfig::load(&path).await.unwrap_err();
        assert!(err.to_string().contains("Failed to parse config file"));
    }

    #[test]
    fn test_overrides() {
        let mut config = ZakaiConfig::default();
        config.chat.model.api_key = "from-file".into();

        config.apply_overrides(Some("   ".into()), None);
        assert_eq!(config.chat.model.api_key, "from-file");

        config.apply_overrides(Some("sk-env".into()), Some("gpt-4o-mini".into()));
        assert_eq!(config.chat.model.api_key, "sk-env");
        assert_eq!(config.chat.model.model_id, "gpt-4o-mini");
    }
}
