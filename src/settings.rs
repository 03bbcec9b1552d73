use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{OffseasonError, Result};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Settings {
    /// Two-digit fiscal year the CY extract reports on.
    #[serde(default = "default_current_fiscal_year")]
    pub current_fiscal_year: i32,
    #[serde(default)]
    pub prior_year_file: Option<String>,
    #[serde(default)]
    pub current_year_file: Option<String>,
    #[serde(default)]
    pub graph_file: Option<String>,
    #[serde(default)]
    pub target_file: Option<String>,
}

fn default_current_fiscal_year() -> i32 {
    25
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            current_fiscal_year: default_current_fiscal_year(),
            prior_year_file: None,
            current_year_file: None,
            graph_file: None,
            target_file: None,
        }
    }
}

fn config_dir() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".config")
        .join("offseason")
}

pub fn settings_path() -> PathBuf {
    config_dir().join("settings.json")
}

pub fn load_settings() -> Settings {
    load_settings_from(&settings_path())
}

/// Missing or unparseable files fall back to defaults.
fn load_settings_from(path: &Path) -> Settings {
    if path.exists() {
        let content = std::fs::read_to_string(path).unwrap_or_default();
        serde_json::from_str(&content).unwrap_or_default()
    } else {
        Settings::default()
    }
}

pub fn save_settings(settings: &Settings) -> Result<()> {
    save_settings_to(settings, &settings_path())
}

fn save_settings_to(settings: &Settings, path: &Path) -> Result<()> {
    if let Some(dir) = path.parent() {
        std::fs::create_dir_all(dir)?;
    }
    let json = serde_json::to_string_pretty(settings)
        .map_err(|e| OffseasonError::Settings(e.to_string()))?;
    std::fs::write(path, format!("{json}\n"))?;
    Ok(())
}

pub fn shellexpand_path(path: &str) -> String {
    if path.starts_with('~') {
        if let Some(home) = dirs::home_dir() {
            return path.replacen('~', &home.to_string_lossy(), 1);
        }
    }
    std::fs::canonicalize(path)
        .unwrap_or_else(|_| PathBuf::from(path))
        .to_string_lossy()
        .to_string()
}
