use anyhow::{Context, Result};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::{fs, path::PathBuf};
use tracing::debug;

#[derive(Debug, Deserialize, Serialize, Clone)]
#[serde(default)]
pub struct SourceConfig {
    pub page_url: String,
}

impl Default for SourceConfig {
    fn default() -> Self {
        SourceConfig {
            page_url:
                "https://web.archive.org/web/20230908091635/https://en.wikipedia.org/wiki/List_of_largest_banks"
                    .to_string(),
        }
    }
}

#[derive(Debug, Deserialize, Serialize, Clone)]
#[serde(default)]
pub struct OutputConfig {
    pub csv_path: String,
    pub db_path: String,
    pub table_name: String,
}

impl Default for OutputConfig {
    fn default() -> Self {
        OutputConfig {
            csv_path: "Largest_banks_data.csv".to_string(),
            db_path: "Banks.db".to_string(),
            table_name: "Largest_banks".to_string(),
        }
    }
}

/// Tool configuration. Every field has a default matching the archived
/// banks page and the conventional output paths, so the tool runs with
/// no configuration file present.
#[derive(Debug, Deserialize, Serialize, Clone)]
#[serde(default)]
pub struct AppConfig {
    pub source: SourceConfig,
    pub rates_csv: String,
    pub output: OutputConfig,
    pub journal_path: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        AppConfig {
            source: SourceConfig::default(),
            rates_csv: "exchange_rate.csv".to_string(),
            output: OutputConfig::default(),
            journal_path: "code_log.txt".to_string(),
        }
    }
}

impl AppConfig {
    /// Loads the config from the default location, falling back to the
    /// built-in defaults when no file exists there.
    pub fn load() -> Result<Self> {
        let config_path = Self::default_config_path()?;
        if !config_path.exists() {
            debug!("No config file at {}, using defaults", config_path.display());
            return Ok(Self::default());
        }
        Self::load_from_path(&config_path)
    }

    pub fn default_config_path() -> Result<PathBuf> {
        let proj_dirs = ProjectDirs::from("in", "codito", "bankcap")
            .context("Could not determine project directories")?;
        Ok(proj_dirs.config_dir().join("config.yaml"))
    }

    pub fn load_from_path<P: AsRef<std::path::Path>>(path: P) -> Result<Self> {
        let config_str = fs::read_to_string(path.as_ref())
            .with_context(|| format!("Failed to read config file: {}", path.as_ref().display()))?;

        let config: Self = serde_yaml::from_str(&config_str)
            .with_context(|| format!("Failed to parse config file: {}", path.as_ref().display()))?;
        debug!("Successfully loaded config");
        Ok(config)
    }
}
