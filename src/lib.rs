#![forbid(unsafe_code)]

//! Host-independent core of the QuickExport batch-export plugin:
//! per-file export-setting records, their compact stored string form,
//! and the filename-version matching that picks which stored record
//! governs a given file.
//!
//! Widgets, documents and the export pipeline itself live in the host
//! shell; this crate only transforms in-memory data and talks to the
//! host's settings store through the [`settings::SettingsStore`] trait.

pub mod color;
pub mod constants;
pub mod naming;
pub mod paths;
pub mod scaling;
pub mod settings;

// Re-export the types most callers need
pub use color::Rgba;
pub use settings::{
    ExportSettingsRecord, FileSettingsStore, JpegOptions, MemorySettingsStore, PngOptions,
    ScaleOptions, SettingsList, SettingsStore, VersionPolicy, deserialize, find_settings_for_file,
    serialize,
};
