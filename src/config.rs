use anyhow::{anyhow, bail, Context, Result};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::import::DEFAULT_MAX_IMPORT_BYTES;

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub storage: StorageConfig,
    #[serde(default)]
    pub import: ImportConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct StorageConfig {
    /// Directory holding guests.json; defaults to ~/.guestlist
    #[serde(skip_serializing_if = "Option::is_none")]
    pub state_dir: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ImportConfig {
    #[serde(default = "default_max_file_size_kb")]
    pub max_file_size_kb: u64,
}

fn default_max_file_size_kb() -> u64 {
    DEFAULT_MAX_IMPORT_BYTES / 1024
}

impl Default for ImportConfig {
    fn default() -> Self {
        Self { max_file_size_kb: default_max_file_size_kb() }
    }
}

/// Keys accepted by `config set` and `config show <key>`
pub const CONFIG_KEYS: [&str; 2] = ["storage.state_dir", "import.max_file_size_kb"];

impl Config {
    pub fn load() -> Result<Self> {
        Self::load_from(&get_config_path()?)
    }

    pub fn save(&self) -> Result<()> {
        self.save_to(&get_config_path()?)
    }

    /// Load the config at `path`, writing the defaults there if it does not exist
    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            let default_config = Config::default();
            default_config.save_to(path)?;
            return Ok(default_config);
        }

        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file at {}", path.display()))?;
        toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file at {}", path.display()))
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }

        let content = toml::to_string_pretty(self)?;
        fs::write(path, content).context("Failed to write config file")?;

        Ok(())
    }

    pub fn max_import_bytes(&self) -> u64 {
        self.import.max_file_size_kb.saturating_mul(1024)
    }

    /// Resolved guest store directory, expanding a leading `~/`
    pub fn state_dir(&self) -> Option<PathBuf> {
        self.storage.state_dir.as_deref().map(expand_path)
    }

    pub fn get(&self, key: &str) -> Result<String> {
        match key {
            "storage.state_dir" => {
                Ok(self.storage.state_dir.clone().unwrap_or_else(|| "(default)".to_string()))
            }
            "import.max_file_size_kb" => Ok(self.import.max_file_size_kb.to_string()),
            _ => Err(unknown_key(key)),
        }
    }

    pub fn set(&mut self, key: &str, value: &str) -> Result<()> {
        let value = value.trim();
        match key {
            "storage.state_dir" => {
                if value.is_empty() {
                    bail!("storage.state_dir cannot be empty");
                }
                self.storage.state_dir = Some(value.to_string());
            }
            "import.max_file_size_kb" => {
                let kb: u64 = value
                    .parse()
                    .with_context(|| format!("'{}' is not a whole number of kilobytes", value))?;
                if kb == 0 {
                    bail!("import.max_file_size_kb must be greater than zero");
                }
                self.import.max_file_size_kb = kb;
            }
            _ => return Err(unknown_key(key)),
        }
        Ok(())
    }
}

fn unknown_key(key: &str) -> anyhow::Error {
    anyhow!("Unknown config key '{}'. Available keys: {}", key, CONFIG_KEYS.join(", "))
}

fn get_config_path() -> Result<PathBuf> {
    let proj_dirs = ProjectDirs::from("com", "guestlist", "guestlist")
        .context("Failed to determine config directory")?;

    Ok(proj_dirs.config_dir().join("config.toml"))
}

/// Expand ~ in paths to the home directory
pub fn expand_path(path: &str) -> PathBuf {
    if let Some(rest) = path.strip_prefix("~/") {
        if let Some(home) = dirs::home_dir() {
            return home.join(rest);
        }
    }
    PathBuf::from(path)
}
