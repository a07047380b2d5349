//! Configuration for the intake wizard.
//!
//! Stored as TOML at `$INTAKEFLOW_HOME/config/config.toml`, or under the OS
//! data directory (`IntakeFlow/config/config.toml`) when the variable is unset.

use serde::{Deserialize, Serialize};

use crate::answers::CompletionRules;

/// Root configuration persisted per installation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct WizardConfig {
    /// Completeness rules applied by the evaluator.
    #[serde(default)]
    pub validation: ValidationSettings,
    /// Country reference list presentation.
    #[serde(default)]
    pub countries: CountrySettings,
    /// Where resumable session snapshots live.
    #[serde(default)]
    pub sessions: SessionSettings,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValidationSettings {
    /// Required answer count when a question declares none.
    #[serde(default = "default_required_answers")]
    pub default_required_answers: u32,
    /// Whether structured questions infer their count from number words.
    #[serde(default = "default_infer_required_from_text")]
    pub infer_required_from_text: bool,
}

impl Default for ValidationSettings {
    fn default() -> Self {
        Self {
            default_required_answers: default_required_answers(),
            infer_required_from_text: default_infer_required_from_text(),
        }
    }
}

impl ValidationSettings {
    pub fn rules(&self) -> CompletionRules {
        CompletionRules {
            default_required: self.default_required_answers.max(1) as usize,
            infer_from_text: self.infer_required_from_text,
        }
    }
}

const fn default_required_answers() -> u32 {
    1
}

const fn default_infer_required_from_text() -> bool {
    true
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CountrySettings {
    /// Glyph shown when a country has no usable ISO code or the list is pending.
    #[serde(default = "default_fallback_glyph")]
    pub fallback_glyph: String,
}

impl Default for CountrySettings {
    fn default() -> Self {
        Self {
            fallback_glyph: default_fallback_glyph(),
        }
    }
}

fn default_fallback_glyph() -> String {
    "\u{1F310}".to_string()
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionSettings {
    /// Snapshot directory; defaults to `<workspace>/sessions`.
    #[serde(default)]
    pub snapshot_dir: Option<PathBuf>,
    /// Persist a snapshot after every dispatched event.
    #[serde(default = "default_autosave")]
    pub autosave: bool,
}

impl Default for SessionSettings {
    fn default() -> Self {
        Self {
            snapshot_dir: None,
            autosave: default_autosave(),
        }
    }
}

const fn default_autosave() -> bool {
    true
}

/// Standard relative path to the config file (resolved per OS at runtime).
pub const CONFIG_FILE_NAME: &str = "config.toml";

use anyhow::{Context, Result};
use directories::BaseDirs;
use std::env;
use std::fs;
use std::path::PathBuf;

/// Returns the root directory where the wizard stores data.
///
/// Order of precedence:
/// 1. `INTAKEFLOW_HOME` environment variable.
/// 2. OS-specific data directory via `directories::BaseDirs`.
pub fn workspace_root() -> Result<PathBuf> {
    if let Ok(path) = env::var("INTAKEFLOW_HOME") {
        return Ok(PathBuf::from(path));
    }
    let base_dirs = BaseDirs::new().context("Unable to determine OS data directory")?;
    Ok(base_dirs.data_dir().join("IntakeFlow"))
}

pub fn config_dir() -> Result<PathBuf> {
    Ok(workspace_root()?.join("config"))
}

pub fn config_file_path() -> Result<PathBuf> {
    Ok(config_dir()?.join(CONFIG_FILE_NAME))
}

/// Resolved snapshot directory for the given config.
pub fn snapshot_dir(config: &WizardConfig) -> Result<PathBuf> {
    match &config.sessions.snapshot_dir {
        Some(dir) => Ok(dir.clone()),
        None => Ok(workspace_root()?.join("sessions")),
    }
}

/// Loads the configuration from disk or returns defaults.
pub fn load_or_default() -> Result<WizardConfig> {
    let path = config_file_path()?;
    if path.exists() {
        let data = fs::read_to_string(&path)
            .with_context(|| format!("Failed to read config file {:?}", path))?;
        let cfg: WizardConfig = toml::from_str(&data)
            .with_context(|| format!("Failed to parse config file {:?}", path))?;
        Ok(cfg)
    } else {
        Ok(WizardConfig::default())
    }
}

/// Persists the configuration to disk.
pub fn save(config: &WizardConfig) -> Result<()> {
    let dir = config_dir()?;
    fs::create_dir_all(&dir)?;
    let path = config_file_path()?;
    let data = toml::to_string_pretty(config)?;
    fs::write(&path, data)?;
    Ok(())
}
