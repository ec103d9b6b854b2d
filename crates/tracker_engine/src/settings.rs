use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use tracker_core::{validate_sheet_id, Request, Settings, SettingsError, SettingsStatus};
use tracker_logging::{tracker_error, tracker_info, tracker_warn};

use crate::{write_atomically, Messenger};

/// Key-value storage for [`Settings`].
pub trait SettingsStore: Send + Sync {
    fn load(&self) -> Result<Settings, SettingsError>;
    fn save(&self, settings: &Settings) -> Result<(), SettingsError>;
}

/// Settings kept in a RON file. A missing file reads as empty settings.
#[derive(Debug, Clone)]
pub struct RonSettingsStore {
    path: PathBuf,
}

impl RonSettingsStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl SettingsStore for RonSettingsStore {
    fn load(&self) -> Result<Settings, SettingsError> {
        let content = match fs::read_to_string(&self.path) {
            Ok(text) => text,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
                return Ok(Settings::default());
            }
            Err(err) => {
                return Err(SettingsError::Storage(format!(
                    "failed to read {:?}: {err}",
                    self.path
                )));
            }
        };
        ron::from_str(&content).map_err(|err| {
            SettingsError::Storage(format!("failed to parse {:?}: {err}", self.path))
        })
    }

    fn save(&self, settings: &Settings) -> Result<(), SettingsError> {
        let pretty = ron::ser::PrettyConfig::new();
        let content = ron::ser::to_string_pretty(settings, pretty)
            .map_err(|err| SettingsError::Storage(err.to_string()))?;
        write_atomically(&self.path, &content)
            .map_err(|err| SettingsError::Storage(err.to_string()))?;
        tracker_info!("Saved settings to {:?}", self.path);
        Ok(())
    }
}

/// In-process store, mainly for tests and one-shot runs.
#[derive(Debug, Default)]
pub struct MemorySettingsStore {
    inner: Mutex<Settings>,
}

impl MemorySettingsStore {
    pub fn new(settings: Settings) -> Self {
        Self {
            inner: Mutex::new(settings),
        }
    }
}

impl SettingsStore for MemorySettingsStore {
    fn load(&self) -> Result<Settings, SettingsError> {
        self.inner
            .lock()
            .map(|guard| guard.clone())
            .map_err(|_| SettingsError::Storage("settings lock poisoned".to_string()))
    }

    fn save(&self, settings: &Settings) -> Result<(), SettingsError> {
        let mut guard = self
            .inner
            .lock()
            .map_err(|_| SettingsError::Storage("settings lock poisoned".to_string()))?;
        *guard = settings.clone();
        Ok(())
    }
}

/// Options panel: shows the stored sheet id, saves new ones, tests connectivity.
pub struct SettingsPanel {
    store: Arc<dyn SettingsStore>,
    current: Option<String>,
}

impl SettingsPanel {
    /// Loads the stored id. A read failure leaves the panel empty.
    pub fn open(store: Arc<dyn SettingsStore>) -> Self {
        let current = match store.load() {
            Ok(settings) => settings.sheet_id,
            Err(err) => {
                tracker_error!("Error loading settings: {}", err);
                None
            }
        };
        Self { store, current }
    }

    pub fn current(&self) -> Option<&str> {
        self.current.as_deref()
    }

    pub fn save(&mut self, input: &str) -> SettingsStatus {
        let sheet_id = match validate_sheet_id(input) {
            Ok(id) => id,
            Err(err) => return SettingsStatus::from(&err),
        };
        let settings = Settings {
            sheet_id: Some(sheet_id.into_inner()),
        };
        match self.store.save(&settings) {
            Ok(()) => {
                self.current = settings.sheet_id;
                SettingsStatus::saved()
            }
            Err(err) => {
                tracker_error!("Error saving settings: {}", err);
                SettingsStatus::save_failed()
            }
        }
    }

    /// Connectivity check for the entered id. Only emptiness is checked here;
    /// the provider decides whether the id exists.
    pub fn test(&self, input: &str, messenger: &dyn Messenger) -> SettingsStatus {
        let sheet_id = input.trim();
        if sheet_id.is_empty() {
            return SettingsStatus::missing_for_test();
        }
        let response = messenger.send_message(Request::TestConnection {
            sheet_id: Some(sheet_id.to_string()),
        });
        if response.success {
            SettingsStatus::connection_ok()
        } else {
            tracker_warn!("Connection test failed: {:?}", response.error);
            SettingsStatus::connection_failed(response.error.as_deref())
        }
    }
}
