use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use spanlens_providers::Backend;
use std::path::{Path, PathBuf};

pub const CONFIG_FILE: &str = "spanlens.toml";
pub const DATA_DIR_ENV: &str = "SPANLENS_PATH";

/// Resolve the data directory based on priority:
/// 1. Explicit `--data-dir` (with tilde expansion)
/// 2. SPANLENS_PATH environment variable (with tilde expansion)
/// 3. The current directory
pub fn resolve_data_dir(explicit_path: Option<&str>) -> PathBuf {
    if let Some(path) = explicit_path {
        return expand_tilde(path);
    }

    if let Ok(env_path) = std::env::var(DATA_DIR_ENV)
        && !env_path.trim().is_empty()
    {
        return expand_tilde(&env_path);
    }

    PathBuf::from(".")
}

pub fn expand_tilde(path: &str) -> PathBuf {
    if let Some(stripped) = path.strip_prefix("~/")
        && let Some(home) = dirs::home_dir()
    {
        return home.join(stripped);
    }
    PathBuf::from(path)
}

/// Output limits for the plain-text reports.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DisplayConfig {
    pub max_contained_shown: usize,
    pub max_missing_shown: usize,
    pub max_new_messages_shown: usize,
    pub chunk_preview_chars: usize,
    pub missing_preview_chars: usize,
    pub context_chars: usize,
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            max_contained_shown: 5,
            max_missing_shown: 3,
            max_new_messages_shown: 3,
            chunk_preview_chars: 100,
            missing_preview_chars: 200,
            context_chars: 50,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    /// Backend checked first when auto-detecting a trace export
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub backend: Option<Backend>,

    #[serde(default)]
    pub display: DisplayConfig,
}

impl Config {
    pub fn path_in(data_dir: &Path) -> PathBuf {
        data_dir.join(CONFIG_FILE)
    }

    /// Load the config file; a missing file yields the defaults.
    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config {}", path.display()))?;
        let config: Config = toml::from_str(&content)
            .with_context(|| format!("Invalid config {}", path.display()))?;
        Ok(config)
    }
}
