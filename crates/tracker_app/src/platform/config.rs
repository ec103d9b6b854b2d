//! Binary configuration, read from a RON file.
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::Context;
use serde::{Deserialize, Serialize};
use tracker_core::AgentTimings;
use tracker_engine::{RowPlacement, SheetsSettings};
use tracker_logging::{tracker_info, tracker_warn};

pub const TOKEN_ENV_VAR: &str = "JOB_TRACKER_ACCESS_TOKEN";
const DEFAULT_TOKEN_COMMAND: &str = "gcloud auth print-access-token";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub settings_path: PathBuf,
    pub api_base: String,
    pub placement: RowPlacement,
    /// Used when neither `access_token` nor the environment supplies a token.
    pub token_command: String,
    pub access_token: Option<String>,
    pub reset_delay_ms: u64,
    pub toast_delay_ms: u64,
    pub log_file: Option<PathBuf>,
}

impl Default for AppConfig {
    fn default() -> Self {
        let timings = AgentTimings::default();
        Self {
            settings_path: PathBuf::from("./job_tracker_settings.ron"),
            api_base: SheetsSettings::default().api_base,
            placement: RowPlacement::default(),
            token_command: DEFAULT_TOKEN_COMMAND.to_string(),
            access_token: None,
            reset_delay_ms: timings.reset_delay.as_millis() as u64,
            toast_delay_ms: timings.toast_delay.as_millis() as u64,
            log_file: None,
        }
    }
}

impl AppConfig {
    pub fn timings(&self) -> AgentTimings {
        AgentTimings {
            reset_delay: Duration::from_millis(self.reset_delay_ms),
            toast_delay: Duration::from_millis(self.toast_delay_ms),
        }
    }

    pub fn sheets_settings(&self) -> SheetsSettings {
        SheetsSettings {
            api_base: self.api_base.clone(),
        }
    }
}

/// Where the running configuration came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigSource {
    Defaults(PathBuf),
    File(PathBuf),
}

impl ConfigSource {
    /// Call once the logger is up; `load_config` runs before it.
    pub fn log(&self) {
        match self {
            ConfigSource::Defaults(path) => {
                tracker_warn!("No config at {:?}; using defaults", path);
            }
            ConfigSource::File(path) => tracker_info!("Loaded config from {:?}", path),
        }
    }
}

/// Reads `path`; a missing file yields defaults.
pub fn load_config(path: &Path) -> anyhow::Result<(AppConfig, ConfigSource)> {
    let content = match fs::read_to_string(path) {
        Ok(text) => text,
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
            return Ok((AppConfig::default(), ConfigSource::Defaults(path.to_path_buf())));
        }
        Err(err) => {
            return Err(err).with_context(|| format!("failed to read config {:?}", path));
        }
    };
    let config = ron::from_str(&content).with_context(|| format!("failed to parse config {:?}", path))?;
    Ok((config, ConfigSource::File(path.to_path_buf())))
}
