//! Export-setting records and their option groups.
//!
//! One [`ExportSettingsRecord`] exists per tracked source file. Records
//! with `store = false` are scratch state for documents that are open but
//! not yet configured; they never reach the stored settings string.

use std::path::{Path, PathBuf};

use anyhow::bail;

use crate::color::Rgba;
use crate::paths::split_version_suffix;

/// File formats the export dialog can write.
pub const SUPPORTED_EXTENSIONS: &[&str] = &[
    ".gif", ".jpg", ".jpeg", ".pbm", ".pgm", ".png", ".ppm", ".tga", ".bmp", ".ico", ".xbm",
    ".xpm",
];

/// Which version-siblings of a file a stored record applies to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VersionPolicy {
    /// Only the exact file the record was stored for.
    Single,
    /// Version-siblings generally, but never anchored from the unnumbered
    /// base file itself.
    All,
    /// Siblings with an equal-or-later version number.
    AllForward,
}

impl VersionPolicy {
    /// One-letter code used in the stored settings string.
    pub fn code(self) -> char {
        match self {
            VersionPolicy::Single => 's',
            VersionPolicy::All => 'a',
            VersionPolicy::AllForward => 'f',
        }
    }

    pub fn from_code(code: &str) -> Option<Self> {
        match code {
            "s" => Some(VersionPolicy::Single),
            "a" => Some(VersionPolicy::All),
            "f" => Some(VersionPolicy::AllForward),
            _ => None,
        }
    }
}

// Declares the wire order of a group's boolean flags exactly once; packing
// and unpacking both expand from the same field list, so the digit order
// cannot drift between read and write.
macro_rules! flag_group {
    ($ty:ty { $($field:ident),+ $(,)? }) => {
        impl $ty {
            /// Number of digits in the group's packed flag string.
            pub const FLAG_COUNT: usize = [$(stringify!($field)),+].len();

            /// Pack the group's flags into a `1`/`0` digit string in wire
            /// order.
            pub fn pack_flags(&self) -> String {
                let mut digits = String::with_capacity(Self::FLAG_COUNT);
                $(digits.push(if self.$field { '1' } else { '0' });)+
                digits
            }

            /// Apply a packed digit string in wire order.
            ///
            /// Digits missing off the end leave the remaining flags
            /// `false`. Returns the number of surplus digits so the caller
            /// can warn about them; any digit other than `0`/`1` is an
            /// error.
            pub fn unpack_flags(&mut self, digits: &str) -> anyhow::Result<usize> {
                let mut rest = digits.chars();
                $(
                    self.$field = match rest.next() {
                        Some('1') => true,
                        Some('0') | None => false,
                        Some(other) => {
                            bail!("invalid digit '{other}' in flag string '{digits}'")
                        }
                    };
                )+
                Ok(rest.count())
            }
        }
    };
}

/// Scale overrides applied at export time.
///
/// `-1` width/height/resolution means "use the source image's current
/// value"; `"Auto"` lets the host pick the filter strategy.
#[derive(Debug, Clone, PartialEq)]
pub struct ScaleOptions {
    pub enabled: bool,
    pub width: i32,
    pub height: i32,
    pub filter: String,
    pub resolution: f64,
}

impl Default for ScaleOptions {
    fn default() -> Self {
        Self {
            enabled: false,
            width: -1,
            height: -1,
            filter: "Auto".to_string(),
            resolution: -1.0,
        }
    }
}

/// PNG exporter settings.
#[derive(Debug, Clone, PartialEq)]
pub struct PngOptions {
    pub fill_color: Rgba,
    pub compression: u8,
    pub alpha: bool,
    pub indexed: bool,
    pub interlaced: bool,
    pub hdr: bool,
    pub embed_srgb: bool,
    pub force_srgb: bool,
    pub metadata: bool,
    pub author: bool,
    pub force_8bit: bool,
}

impl Default for PngOptions {
    fn default() -> Self {
        Self {
            fill_color: Rgba::WHITE,
            compression: 9,
            alpha: false,
            indexed: true,
            interlaced: false,
            hdr: false,
            embed_srgb: false,
            force_srgb: false,
            metadata: false,
            author: false,
            force_8bit: false,
        }
    }
}

flag_group!(PngOptions {
    alpha,
    indexed,
    interlaced,
    hdr,
    embed_srgb,
    force_srgb,
    metadata,
    author,
    force_8bit,
});

/// JPEG exporter settings.
#[derive(Debug, Clone, PartialEq)]
pub struct JpegOptions {
    pub fill_color: Rgba,
    pub quality: u8,
    pub smooth: u8,
    pub subsampling: String,
    pub progressive: bool,
    pub icc_profile: bool,
    pub force_baseline: bool,
    pub optimise: bool,
    pub exif: bool,
    pub iptc: bool,
    pub xmp: bool,
    pub tool_information: bool,
    pub anonymiser: bool,
    pub metadata: bool,
    pub author: bool,
}

impl Default for JpegOptions {
    fn default() -> Self {
        Self {
            fill_color: Rgba::WHITE,
            quality: 80,
            smooth: 0,
            subsampling: "2x2".to_string(),
            progressive: false,
            icc_profile: false,
            force_baseline: true,
            optimise: false,
            exif: true,
            iptc: true,
            xmp: true,
            tool_information: false,
            anonymiser: false,
            metadata: false,
            author: false,
        }
    }
}

flag_group!(JpegOptions {
    progressive,
    icc_profile,
    force_baseline,
    optimise,
    exif,
    iptc,
    xmp,
    tool_information,
    anonymiser,
    metadata,
    author,
});

/// One source file's export configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct ExportSettingsRecord {
    /// Source file; identity key for exact matching.
    pub path: PathBuf,
    /// Whether this record is persisted. Scratch records (`false`) exist
    /// for open-but-unconfigured documents and are dropped on reload.
    pub store: bool,
    pub version_policy: VersionPolicy,
    pub output_is_abs: bool,
    /// Absolute directory the export lands in.
    pub output_dir: PathBuf,
    /// Output filename stem, no extension.
    pub output_name: String,
    /// Chosen export format's extension, e.g. `.png`.
    pub extension: String,
    pub scale: ScaleOptions,
    pub png: PngOptions,
    pub jpeg: JpegOptions,
}

impl ExportSettingsRecord {
    /// Fresh record for `path` with default settings.
    ///
    /// The version policy follows the filename: an unnumbered stem
    /// defaults to `All`, a `_NNN`-versioned one to `AllForward`.
    pub fn defaults_for(path: &Path) -> Self {
        let (base_stem, _) = split_version_suffix(path);
        let stem = path
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_default();
        let version_policy = if base_stem == stem {
            VersionPolicy::All
        } else {
            VersionPolicy::AllForward
        };
        Self {
            path: path.to_path_buf(),
            store: false,
            version_policy,
            output_is_abs: false,
            output_dir: path.parent().unwrap_or_else(|| Path::new("")).to_path_buf(),
            output_name: String::new(),
            extension: ".png".to_string(),
            scale: ScaleOptions::default(),
            png: PngOptions::default(),
            jpeg: JpegOptions::default(),
        }
    }

    /// Scratch record for a document that is open but has no stored
    /// settings yet: defaults, output name matching the source stem.
    pub fn scratch_for(path: &Path) -> Self {
        let mut record = Self::defaults_for(path);
        record.output_name = path
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_default();
        record
    }

    /// Scratch copy of an existing record (a second view of the same
    /// file); never serialized.
    pub fn scratch_copy(&self) -> Self {
        let mut copy = self.clone();
        copy.store = false;
        copy
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_flag_counts_match_wire_format() {
        assert_eq!(PngOptions::FLAG_COUNT, 9);
        assert_eq!(JpegOptions::FLAG_COUNT, 11);
    }

    #[test]
    fn test_png_default_flags_pack() {
        // only `indexed` defaults on
        assert_eq!(PngOptions::default().pack_flags(), "010000000");
    }

    #[test]
    fn test_jpeg_default_flags_pack() {
        // force_baseline, exif, iptc, xmp default on
        assert_eq!(JpegOptions::default().pack_flags(), "00101110000");
    }

    #[test]
    fn test_flags_round_trip() {
        let mut png = PngOptions::default();
        png.alpha = true;
        png.force_8bit = true;
        let packed = png.pack_flags();

        let mut restored = PngOptions::default();
        let surplus = restored.unpack_flags(&packed).unwrap();
        assert_eq!(surplus, 0);
        assert_eq!(restored, png);
    }

    #[test]
    fn test_truncated_flag_string_leaves_rest_false() {
        let mut png = PngOptions::default();
        png.unpack_flags("11").unwrap();
        assert!(png.alpha);
        assert!(png.indexed);
        assert!(!png.interlaced);
        assert!(!png.force_8bit);
    }

    #[test]
    fn test_surplus_flag_digits_are_counted() {
        let mut png = PngOptions::default();
        let surplus = png.unpack_flags("01000000011").unwrap();
        assert_eq!(surplus, 2);
    }

    #[test]
    fn test_invalid_flag_digit_is_an_error() {
        let mut png = PngOptions::default();
        assert!(png.unpack_flags("01x000000").is_err());
    }

    #[test]
    fn test_version_policy_codes() {
        for policy in [
            VersionPolicy::Single,
            VersionPolicy::All,
            VersionPolicy::AllForward,
        ] {
            assert_eq!(
                VersionPolicy::from_code(&policy.code().to_string()),
                Some(policy)
            );
        }
        assert_eq!(VersionPolicy::from_code("x"), None);
    }

    #[test]
    fn test_default_policy_follows_filename() {
        let plain = ExportSettingsRecord::defaults_for(Path::new("/a/art.kra"));
        assert_eq!(plain.version_policy, VersionPolicy::All);

        let versioned = ExportSettingsRecord::defaults_for(Path::new("/a/art_004.kra"));
        assert_eq!(versioned.version_policy, VersionPolicy::AllForward);
    }

    #[test]
    fn test_scratch_record_takes_source_stem() {
        let scratch = ExportSettingsRecord::scratch_for(Path::new("/a/pic_002.kra"));
        assert!(!scratch.store);
        assert_eq!(scratch.output_name, "pic_002");
        assert_eq!(scratch.output_dir, PathBuf::from("/a"));
        assert_eq!(scratch.extension, ".png");
    }

    #[test]
    fn test_scratch_copy_clears_store() {
        let mut record = ExportSettingsRecord::scratch_for(Path::new("/a/pic.kra"));
        record.store = true;
        let copy = record.scratch_copy();
        assert!(!copy.store);
        assert_eq!(copy.path, record.path);
    }
}
