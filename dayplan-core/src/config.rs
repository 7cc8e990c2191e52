//! dayplan configuration at ~/.config/dayplan/config.toml

use std::path::{Path, PathBuf};
use std::time::Duration;

use config::{Config, File};
use serde::{Deserialize, Serialize};

use crate::autosave::{AutosaveConfig, DEFAULT_AUTOSAVE_DELAY, DEFAULT_SAVED_DISPLAY};
use crate::error::{PlanError, PlanResult};

const APP_DIR: &str = "dayplan";

fn default_autosave_delay_ms() -> u64 {
    DEFAULT_AUTOSAVE_DELAY.as_millis() as u64
}

fn default_saved_display_ms() -> u64 {
    DEFAULT_SAVED_DISPLAY.as_millis() as u64
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlanConfig {
    /// Where the saved plans live. Defaults to the platform data directory.
    pub data_dir: Option<PathBuf>,

    /// Where backups are written. Defaults to the current directory.
    pub export_dir: Option<PathBuf>,

    #[serde(default = "default_autosave_delay_ms")]
    pub autosave_delay_ms: u64,

    #[serde(default = "default_saved_display_ms")]
    pub saved_display_ms: u64,

    #[serde(default)]
    pub advisory: AdvisoryConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AdvisoryConfig {
    /// Chat-completions endpoint URL
    pub endpoint: String,
    pub model: String,
    pub temperature: f32,
    /// Name of the environment variable holding the API key
    pub api_key_env: String,
}

impl Default for AdvisoryConfig {
    fn default() -> Self {
        AdvisoryConfig {
            endpoint: "https://api.openai.com/v1/chat/completions".to_string(),
            model: "gpt-4o-mini".to_string(),
            temperature: 0.7,
            api_key_env: "DAYPLAN_API_KEY".to_string(),
        }
    }
}

impl Default for PlanConfig {
    fn default() -> Self {
        PlanConfig {
            data_dir: None,
            export_dir: None,
            autosave_delay_ms: default_autosave_delay_ms(),
            saved_display_ms: default_saved_display_ms(),
            advisory: AdvisoryConfig::default(),
        }
    }
}

impl PlanConfig {
    pub fn config_path() -> PlanResult<PathBuf> {
        let config_dir = dirs::config_dir()
            .ok_or_else(|| PlanError::Config("Could not determine config directory".into()))?
            .join(APP_DIR);

        Ok(config_dir.join("config.toml"))
    }

    /// Load ~/.config/dayplan/config.toml, creating a commented-out default
    /// the first time.
    pub fn load() -> PlanResult<Self> {
        let config_path = Self::config_path()?;

        if !config_path.exists() {
            Self::create_default_config(&config_path)?;
        }

        Self::load_from(&config_path)
    }

    pub fn load_from(path: &Path) -> PlanResult<Self> {
        Config::builder()
            .add_source(File::from(path.to_path_buf()).required(false))
            .build()
            .map_err(|e| PlanError::Config(e.to_string()))?
            .try_deserialize()
            .map_err(|e| PlanError::Config(e.to_string()))
    }

    pub fn data_path(&self) -> PlanResult<PathBuf> {
        match &self.data_dir {
            Some(dir) => Ok(expand(dir)),
            None => Ok(dirs::data_dir()
                .ok_or_else(|| PlanError::Config("Could not determine data directory".into()))?
                .join(APP_DIR)),
        }
    }

    pub fn export_path(&self) -> PathBuf {
        self.export_dir
            .as_deref()
            .map(expand)
            .unwrap_or_else(|| PathBuf::from("."))
    }

    pub fn autosave(&self) -> AutosaveConfig {
        AutosaveConfig {
            delay: Duration::from_millis(self.autosave_delay_ms),
            saved_display: Duration::from_millis(self.saved_display_ms),
        }
    }

    /// Create a default config file with all options commented out.
    pub fn create_default_config(path: &Path) -> PlanResult<()> {
        let defaults = AdvisoryConfig::default();
        let contents = format!(
            "\
# dayplan configuration

# Where your plans are saved:
# data_dir = \"~/.local/share/dayplan\"

# Where backups are written:
# export_dir = \"~/Documents\"

# Quiet period before edits are saved automatically:
# autosave_delay_ms = {}

# [advisory]
# endpoint = \"{}\"
# model = \"{}\"
# temperature = {}
# api_key_env = \"{}\"
",
            default_autosave_delay_ms(),
            defaults.endpoint,
            defaults.model,
            defaults.temperature,
            defaults.api_key_env,
        );

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| {
                PlanError::Config(format!("Could not create config directory: {e}"))
            })?;
        }

        std::fs::write(path, contents)
            .map_err(|e| PlanError::Config(format!("Could not write config file: {e}")))?;

        Ok(())
    }
}

fn expand(path: &Path) -> PathBuf {
    PathBuf::from(shellexpand::tilde(&path.to_string_lossy()).into_owned())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_file_loads_as_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("dayplan/config.toml");

        PlanConfig::create_default_config(&path).unwrap();
        let config = PlanConfig::load_from(&path).unwrap();

        assert_eq!(config.autosave_delay_ms, 500);
        assert_eq!(config.advisory.api_key_env, "DAYPLAN_API_KEY");
        assert!(config.data_dir.is_none());
    }

    #[test]
    fn test_overrides_are_read() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(
            &path,
            "data_dir = \"/tmp/plans\"\nautosave_delay_ms = 50\n\n[advisory]\nmodel = \"local\"\n",
        )
        .unwrap();

        let config = PlanConfig::load_from(&path).unwrap();

        assert_eq!(config.data_path().unwrap(), PathBuf::from("/tmp/plans"));
        assert_eq!(config.autosave().delay, Duration::from_millis(50));
        assert_eq!(config.advisory.model, "local");
        assert_eq!(config.advisory.temperature, 0.7);
    }
}
