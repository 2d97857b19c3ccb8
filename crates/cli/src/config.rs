use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

pub const DEFAULT_API_URL: &str = "http://localhost:8000/api";

/// Loaded from `config.toml` in the user's config directory. Every field has
/// a default so a missing file is not an error.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub api_base_url: String,
    /// Idle seconds before the stored session is dropped.
    pub idle_timeout_secs: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_base_url: DEFAULT_API_URL.to_string(),
            idle_timeout_secs: 30 * 60,
        }
    }
}

impl Config {
    pub fn load() -> Result<Self> {
        Self::load_from(&config_path()?)
    }

    fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("reading {}", path.display()))?;
        toml::from_str(&raw).with_context(|| format!("parsing {}", path.display()))
    }

    /// Effective API base URL: CLI flag, then FORMS_API_URL, then the file.
    pub fn api_url(&self, flag: Option<&str>) -> String {
        flag.map(str::to_string)
            .or_else(|| std::env::var("FORMS_API_URL").ok())
            .unwrap_or_else(|| self.api_base_url.clone())
    }
}

pub fn config_dir() -> Result<PathBuf> {
    dirs::config_dir()
        .map(|dir| dir.join("maturity-forms"))
        .context("no config directory on this platform")
}

fn config_path() -> Result<PathBuf> {
    Ok(config_dir()?.join("config.toml"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn missing_file_yields_defaults() {
        let dir = tempfile::tempdir().expect("tempdir");
        let config = Config::load_from(&dir.path().join("config.toml")).expect("loads");
        assert_eq!(config.api_base_url, DEFAULT_API_URL);
        assert_eq!(config.idle_timeout_secs, 1800);
    }

    #[test]
    fn partial_file_keeps_remaining_defaults() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "api_base_url = \"https://forms.example.com/api\"\n")
            .expect("writes");

        let config = Config::load_from(&path).expect("loads");
        assert_eq!(config.api_base_url, "https://forms.example.com/api");
        assert_eq!(config.idle_timeout_secs, 1800);
    }

    #[test]
    fn flag_overrides_the_file() {
        let config = Config::default();
        assert_eq!(
            config.api_url(Some("https://staging.example.com/api")),
            "https://staging.example.com/api"
        );
    }
}
