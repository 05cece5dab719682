//! Host settings-store boundary and the file-backed default.
//!
//! The painting application owns a string-keyed persistent map; the core
//! only ever touches one key in it. Hosts embed their own store behind
//! [`SettingsStore`]; the TOML-file store covers tests and standalone use.

use std::collections::HashMap;
use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use tracing::{error, info};

use crate::constants;

/// The host application's persistent string-keyed settings map.
pub trait SettingsStore {
    /// Read `key`, falling back to `default` when unset.
    fn read_setting(&self, key: &str, default: &str) -> String;

    /// Write `key`. File-backed stores persist immediately.
    fn write_setting(&mut self, key: &str, value: &str) -> Result<()>;
}

/// In-memory store for tests and for hosts that persist elsewhere.
#[derive(Debug, Default)]
pub struct MemorySettingsStore {
    values: HashMap<String, String>,
}

impl MemorySettingsStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl SettingsStore for MemorySettingsStore {
    fn read_setting(&self, key: &str, default: &str) -> String {
        self.values
            .get(key)
            .cloned()
            .unwrap_or_else(|| default.to_string())
    }

    fn write_setting(&mut self, key: &str, value: &str) -> Result<()> {
        self.values.insert(key.to_string(), value.to_string());
        Ok(())
    }
}

/// Values held in the settings file.
#[derive(Debug, Default, Serialize, Deserialize)]
struct StoredValues {
    #[serde(flatten)]
    values: HashMap<String, String>,
}

/// TOML-file store under the user config directory.
#[derive(Debug)]
pub struct FileSettingsStore {
    path: PathBuf,
    values: StoredValues,
}

impl FileSettingsStore {
    fn default_path() -> PathBuf {
        let mut path = dirs::config_dir().unwrap_or_else(|| PathBuf::from("."));
        path.push(constants::config::APP_DIR);
        path.push(constants::config::FILENAME);
        path
    }

    /// Open the store at the default config location. A missing file
    /// starts empty; an unparseable one is reported and treated as empty
    /// rather than overwritten silently on the next read.
    pub fn open() -> Self {
        Self::open_at(Self::default_path())
    }

    /// Open a store backed by an explicit file (tests, portable installs).
    pub fn open_at(path: PathBuf) -> Self {
        let values = match fs::read_to_string(&path) {
            Ok(contents) => match toml::from_str(&contents) {
                Ok(values) => values,
                Err(e) => {
                    error!(path = %path.display(), error = %e, "failed to parse settings file, starting empty");
                    StoredValues::default()
                }
            },
            Err(_) => StoredValues::default(),
        };
        Self { path, values }
    }

    fn persist(&self) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create config directory {:?}", parent))?;
        }
        let contents =
            toml::to_string_pretty(&self.values).context("Failed to serialize settings to TOML")?;
        fs::write(&self.path, contents)
            .with_context(|| format!("Failed to write settings to {:?}", self.path))?;
        Ok(())
    }
}

impl SettingsStore for FileSettingsStore {
    fn read_setting(&self, key: &str, default: &str) -> String {
        self.values
            .values
            .get(key)
            .cloned()
            .unwrap_or_else(|| default.to_string())
    }

    fn write_setting(&mut self, key: &str, value: &str) -> Result<()> {
        self.values
            .values
            .insert(key.to_string(), value.to_string());
        self.persist()?;
        info!(path = %self.path.display(), key = %key, "saved setting");
        Ok(())
    }
}
