//! Per-file export settings: records, persistence, and version matching.
//!
//! This module owns the whole settings lifecycle:
//! - **record**: the data model (one record per source file)
//! - **serialize** / **parse**: the compact stored string form
//! - **matcher**: which stored record governs a given file
//! - **list**: the owned collection tying load, edit and save together
//! - **store**: the host's string-keyed settings store boundary

pub mod list;
pub mod matcher;
pub mod parse;
pub mod record;
pub mod serialize;
pub mod store;

// Re-export commonly used types
pub use list::SettingsList;
pub use matcher::find_settings_for_file;
pub use parse::deserialize;
pub use record::{
    ExportSettingsRecord, JpegOptions, PngOptions, SUPPORTED_EXTENSIONS, ScaleOptions,
    VersionPolicy,
};
pub use serialize::serialize;
pub use store::{FileSettingsStore, MemorySettingsStore, SettingsStore};
