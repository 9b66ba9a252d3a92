use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use log::{debug, error};
use serde::{Deserialize, Serialize};
use thiserror::Error;

const CONFIG_FILE_NAME: &str = "config.json";
const APP_DIR_NAME: &str = "dark-mode-reader";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("no configuration directory available")]
    NoConfigDir,

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(default, rename_all = "camelCase")]
pub struct Config {
    /// Key of the persisted on/off preference.
    pub storage_key: String,

    /// Class put on the root element while the overlay is applied.
    pub marker_class: String,

    /// Style variables set on the root element while the overlay is applied.
    pub palette: BTreeMap<String, String>,
}

impl Default for Config {
    fn default() -> Self {
        let palette = [
            ("--dd-background", "#050608"),
            ("--dd-surface", "#111827"),
            ("--dd-surface-soft", "#020617"),
            ("--dd-text", "#e5e7eb"),
            ("--dd-text-soft", "#9ca3af"),
            ("--dd-accent", "#3b82f6"),
        ]
        .into_iter()
        .map(|(name, value)| (name.to_string(), value.to_string()))
        .collect();

        Config {
            storage_key: "deepDarkModeEnabled".to_string(),
            marker_class: "deep-dark-mode-root".to_string(),
            palette,
        }
    }
}

/// Returns the directory holding the config file: `dir` if given, the
/// per-user config directory otherwise.
pub fn config_dir(dir: Option<&Path>) -> Result<PathBuf, ConfigError> {
    match dir {
        Some(dir) => Ok(dir.to_path_buf()),
        None => dirs::config_dir()
            .map(|base| base.join(APP_DIR_NAME))
            .ok_or(ConfigError::NoConfigDir),
    }
}

pub fn save(dir: &Path, config: &Config) -> Result<(), ConfigError> {
    fs::create_dir_all(dir)?;

    let config_path = dir.join(CONFIG_FILE_NAME);
    debug!("saving config file: {:?}", config_path);
    let json = serde_json::to_string_pretty(config)?;
    fs::write(config_path, json)?;
    Ok(())
}

pub fn load(dir: &Path) -> Config {
    let config_path = dir.join(CONFIG_FILE_NAME);
    if let Ok(json) = fs::read_to_string(&config_path) {
        match serde_json::from_str(&json) {
            Ok(config) => return config,
            Err(err) => error!("invalid config file {:?}: {}", config_path, err),
        }
    }

    debug!("no usable config at {:?}, returning default config", config_path);
    Config::default()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scratch_dir(name: &str) -> PathBuf {
        std::env::temp_dir().join(format!("dark-mode-reader-config-{}-{}", name, std::process::id()))
    }

    #[test]
    fn default_palette_matches_overlay_variables() {
        let config = Config::default();
        assert_eq!(config.palette.len(), 6);
        assert_eq!(config.palette.get("--dd-background").map(String::as_str), Some("#050608"));
        assert_eq!(config.storage_key, "deepDarkModeEnabled");
    }

    #[test]
    fn save_then_load() {
        let dir = scratch_dir("roundtrip");
        let mut config = Config::default();
        config.marker_class = "night".to_string();

        save(&dir, &config).expect("Expected config to be saved");
        assert_eq!(load(&dir), config);

        let _ = fs::remove_dir_all(dir);
    }

    #[test]
    fn missing_or_broken_file_yields_default() {
        let dir = scratch_dir("broken");
        assert_eq!(load(&dir), Config::default());

        fs::create_dir_all(&dir).unwrap();
        fs::write(dir.join(CONFIG_FILE_NAME), "{ not json").unwrap();
        assert_eq!(load(&dir), Config::default());

        let _ = fs::remove_dir_all(dir);
    }

    #[test]
    fn partial_file_fills_in_defaults() {
        let config: Config = serde_json::from_str(r#"{"storageKey": "custom"}"#).unwrap();
        assert_eq!(config.storage_key, "custom");
        assert_eq!(config.marker_class, Config::default().marker_class);
    }
}
