//! Writing the settings list to its stored string form.
//!
//! One record serializes to `,`-joined `key=value` fields with nested
//! `group=[...]` blocks, records join with `;`:
//!
//! ```text
//! path=/a/b.kra,v=a,output=b,ext=.png,scale=[e=1,w=1024,h=768,f=Bic,r=72],png=[fc=#ffffff,co=9,flag=010000000],jpeg=[fc=#ffffff,qu=80,sm=0,ss=2x2,flag=00101110000]
//! ```
//!
//! Commas are the field separator, so literal commas inside path and name
//! values are escaped as `/,` before emission.

use std::path::Path;

use crate::paths::relative_from;
use crate::scaling::filter_store_code;

use super::record::ExportSettingsRecord;

/// Serialize `records` for storage.
///
/// Only records with `store = true` are written, in list order. An empty
/// selection yields the empty string, never a bare `;`.
pub fn serialize(records: &[ExportSettingsRecord]) -> String {
    let parts: Vec<String> = records
        .iter()
        .filter(|record| record.store)
        .map(serialize_record)
        .collect();
    parts.join(";")
}

fn serialize_record(record: &ExportSettingsRecord) -> String {
    let base = record.path.parent().unwrap_or_else(|| Path::new(""));
    let output = serialize_output_path(
        base,
        record.output_is_abs,
        &record.output_dir,
        &record.output_name,
    );

    let mut scale_fields = vec![format!("e={}", if record.scale.enabled { '1' } else { '0' })];
    if record.scale.width != -1 {
        scale_fields.push(format!("w={}", record.scale.width));
    }
    if record.scale.height != -1 {
        scale_fields.push(format!("h={}", record.scale.height));
    }
    scale_fields.push(format!("f={}", filter_store_code(&record.scale.filter)));
    if record.scale.resolution != -1.0 {
        scale_fields.push(format!("r={}", format_resolution(record.scale.resolution)));
    }

    format!(
        "path={path},v={v},output={output},ext={ext},scale=[{scale}],\
         png=[fc={png_fc},co={png_co},flag={png_flag}],\
         jpeg=[fc={jpeg_fc},qu={jpeg_qu},sm={jpeg_sm},ss={jpeg_ss},flag={jpeg_flag}]",
        path = escape(&record.path.to_string_lossy()),
        v = record.version_policy.code(),
        output = escape(&output),
        ext = record.extension,
        scale = scale_fields.join(","),
        png_fc = record.png.fill_color.to_hex_rgb(),
        png_co = record.png.compression,
        png_flag = record.png.pack_flags(),
        jpeg_fc = record.jpeg.fill_color.to_hex_rgb(),
        jpeg_qu = record.jpeg.quality,
        jpeg_sm = record.jpeg.smooth,
        jpeg_ss = record.jpeg.subsampling,
        jpeg_flag = record.jpeg.pack_flags(),
    )
}

/// Encode an output location relative to `base`, the source file's
/// directory.
///
/// Absolute outputs store the full path; an output in `base` itself
/// stores the bare name; anything else stores `./`-prefixed relative
/// form. The extension is never part of the stored output.
pub(crate) fn serialize_output_path(base: &Path, is_abs: bool, dir: &Path, name: &str) -> String {
    if is_abs {
        return dir.join(name).to_string_lossy().into_owned();
    }
    if dir == base {
        return name.to_string();
    }
    let relative = relative_from(&dir.join(name), base);
    format!("./{}", relative.display())
}

/// Escape literal commas in a value as `/,`.
pub(crate) fn escape(value: &str) -> String {
    value.replace(',', "/,")
}

/// Format a resolution with up to 4 decimal digits, trailing zeros and a
/// trailing decimal point stripped.
pub(crate) fn format_resolution(value: f64) -> String {
    let formatted = format!("{value:.4}");
    formatted
        .trim_end_matches('0')
        .trim_end_matches('.')
        .to_string()
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use super::super::record::VersionPolicy;
    use super::*;

    fn stored_record(path: &str) -> ExportSettingsRecord {
        let mut record = ExportSettingsRecord::scratch_for(Path::new(path));
        record.store = true;
        record
    }

    #[test]
    fn test_serialize_empty_list() {
        assert_eq!(serialize(&[]), "");
    }

    #[test]
    fn test_serialize_default_record() {
        let record = stored_record("/a/b.kra");
        assert_eq!(
            serialize(&[record]),
            "path=/a/b.kra,v=a,output=b,ext=.png,scale=[e=0,f=A],\
             png=[fc=#ffffff,co=9,flag=010000000],\
             jpeg=[fc=#ffffff,qu=80,sm=0,ss=2x2,flag=00101110000]"
        );
    }

    #[test]
    fn test_scratch_records_are_never_emitted() {
        let stored = stored_record("/a/b.kra");
        let scratch = ExportSettingsRecord::scratch_for(Path::new("/a/c.kra"));

        let serialized = serialize(&[stored, scratch]);
        assert!(serialized.contains("path=/a/b.kra"));
        assert!(!serialized.contains("c.kra"));
        assert!(!serialized.contains(';'));
    }

    #[test]
    fn test_records_join_with_semicolons_in_order() {
        let first = stored_record("/a/b.kra");
        let second = stored_record("/a/d.kra");

        let serialized = serialize(&[first, second]);
        let records: Vec<&str> = serialized.split(';').collect();
        assert_eq!(records.len(), 2);
        assert!(records[0].starts_with("path=/a/b.kra,"));
        assert!(records[1].starts_with("path=/a/d.kra,"));
    }

    #[test]
    fn test_scale_overrides_are_emitted_when_set() {
        let mut record = stored_record("/a/b.kra");
        record.scale.enabled = true;
        record.scale.width = 1024;
        record.scale.height = 768;
        record.scale.filter = "Bicubic".to_string();
        record.scale.resolution = 72.0;

        let serialized = serialize(&[record]);
        assert!(serialized.contains("scale=[e=1,w=1024,h=768,f=Bic,r=72]"));
    }

    #[test]
    fn test_version_policy_codes_on_the_wire() {
        let mut record = stored_record("/a/b.kra");
        record.version_policy = VersionPolicy::AllForward;
        assert!(serialize(&[record.clone()]).contains(",v=f,"));
        record.version_policy = VersionPolicy::Single;
        assert!(serialize(&[record]).contains(",v=s,"));
    }

    #[test]
    fn test_output_path_same_directory_is_bare_name() {
        let encoded =
            serialize_output_path(Path::new("/home/user/Pictures"), false, Path::new("/home/user/Pictures"), "pic");
        assert_eq!(encoded, "pic");
    }

    #[test]
    fn test_output_path_relative_gets_dot_slash_marker() {
        let encoded =
            serialize_output_path(Path::new("/home/user/Pictures"), false, Path::new("/home/user"), "pic");
        assert_eq!(encoded, "./../pic");

        let encoded = serialize_output_path(
            Path::new("/home/user/Pictures"),
            false,
            Path::new("/home/user/Pictures/subdir"),
            "pic",
        );
        assert_eq!(encoded, "./subdir/pic");
    }

    #[test]
    fn test_output_path_absolute_is_full_path() {
        let encoded = serialize_output_path(
            Path::new("/home/user/Pictures"),
            true,
            Path::new("/home/user/Pictures"),
            "pic",
        );
        assert_eq!(encoded, "/home/user/Pictures/pic");
    }

    #[test]
    fn test_commas_in_path_and_name_are_escaped() {
        let mut record = stored_record("/pa,th/to/,a/file.kra");
        record.output_dir = PathBuf::from("/pa,th/to/,a");
        record.output_name = "file,".to_string();

        let serialized = serialize(&[record]);
        assert!(serialized.contains("path=/pa/,th/to//,a/file.kra,"));
        assert!(serialized.contains("output=file/,,"));
    }

    #[test]
    fn test_format_resolution_trims_trailing_zeros() {
        assert_eq!(format_resolution(72.0), "72");
        assert_eq!(format_resolution(300.5), "300.5");
        assert_eq!(format_resolution(118.1102), "118.1102");
        assert_eq!(format_resolution(99.99999), "100");
    }
}
