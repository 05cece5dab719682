//! Application-wide constants
//!
//! Single source of truth for the string literals and bounds shared by the
//! settings modules.

/// Settings persistence constants
pub mod config {
    /// Directory under the user config dir holding the settings file
    pub const APP_DIR: &str = "quickexport";

    /// Settings file name inside the app dir
    pub const FILENAME: &str = "quickexport.toml";

    /// The one key the core reads and writes in the host settings store
    pub const SETTINGS_KEY: &str = "settings";
}

/// Bounds applied to numeric values read back from a stored settings string
pub mod validation {
    /// PNG compression level range end (0..=9)
    pub const MAX_PNG_COMPRESSION: u8 = 9;

    /// JPEG quality range end (0..=100)
    pub const MAX_JPEG_QUALITY: u8 = 100;

    /// JPEG smoothing range end (0..=100)
    pub const MAX_JPEG_SMOOTH: u8 = 100;

    /// Chroma subsampling modes the JPEG exporter understands
    pub const JPEG_SUBSAMPLING_MODES: &[&str] = &["2x2", "2x1", "1x2", "1x1"];
}
