//! The owned settings collection and its persistence lifecycle.
//!
//! Replaces the original plugin's global mutable list: callers own a
//! [`SettingsList`], load it from a store at session start, mutate records
//! in place while the dialog is open, and either save it back or reload
//! (dropping scratch state). Single writer, one reader at a time; there is
//! no internal locking.

use std::path::{Path, PathBuf};

use anyhow::Result;
use tracing::info;

use crate::constants;

use super::matcher::find_settings_for_file;
use super::parse::deserialize;
use super::record::ExportSettingsRecord;
use super::serialize::serialize;
use super::store::SettingsStore;

/// All known per-file export settings for one editing session.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SettingsList {
    records: Vec<ExportSettingsRecord>,
}

impl SettingsList {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_records(records: Vec<ExportSettingsRecord>) -> Self {
        Self { records }
    }

    /// Load the stored records. Anything scratch from a previous session
    /// is gone by construction; only stored records come back.
    pub fn load(store: &dyn SettingsStore) -> Result<Self> {
        let settings_string = store.read_setting(constants::config::SETTINGS_KEY, "");
        let records = deserialize(&settings_string)?;
        info!(count = records.len(), "loaded stored export settings");
        Ok(Self { records })
    }

    /// Serialize and write back. Scratch records are silently skipped.
    pub fn save(&self, store: &mut dyn SettingsStore) -> Result<()> {
        store.write_setting(constants::config::SETTINGS_KEY, &serialize(&self.records))
    }

    /// Whether saving now would change what the store holds. Drives the
    /// dialog's "Save Settings*" state.
    pub fn is_modified(&self, store: &dyn SettingsStore) -> bool {
        serialize(&self.records) != store.read_setting(constants::config::SETTINGS_KEY, "")
    }

    pub fn records(&self) -> &[ExportSettingsRecord] {
        &self.records
    }

    pub fn records_mut(&mut self) -> &mut Vec<ExportSettingsRecord> {
        &mut self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Best-matching stored record for `path`, exact or version-sibling.
    pub fn find_for_file(&self, path: &Path) -> Option<&ExportSettingsRecord> {
        find_settings_for_file(path, &self.records)
    }

    /// Record whose path is exactly `path`, if any.
    pub fn record_for_path(&self, path: &Path) -> Option<&ExportSettingsRecord> {
        self.records.iter().find(|r| r.path.as_path() == path)
    }

    pub fn record_for_path_mut(&mut self, path: &Path) -> Option<&mut ExportSettingsRecord> {
        self.records.iter_mut().find(|r| r.path.as_path() == path)
    }

    /// Insert `record`, replacing any existing record for the same path.
    /// Upholds the one-record-per-path invariant.
    pub fn upsert(&mut self, record: ExportSettingsRecord) {
        match self.records.iter().position(|r| r.path == record.path) {
            Some(index) => self.records[index] = record,
            None => self.records.push(record),
        }
    }

    /// Add scratch records for open documents that have no record yet.
    /// Existing records (stored or scratch) are left untouched.
    pub fn merge_open_documents<I>(&mut self, open_paths: I)
    where
        I: IntoIterator<Item = PathBuf>,
    {
        for path in open_paths {
            if self.record_for_path(&path).is_some() {
                continue;
            }
            self.records.push(ExportSettingsRecord::scratch_for(&path));
        }
    }

    /// Drop scratch records, keeping only what persistence would keep.
    pub fn retain_stored(&mut self) {
        self.records.retain(|r| r.store);
    }
}
