//! Reading the stored settings string back into records.
//!
//! The string is tokenized on its five control characters (`= , ; [ ]`),
//! `/,` escapes are rejoined, and the tokens are walked with a small
//! stack: `[` after a key starts a `key_` prefix for the keys inside the
//! group, `;` closes a record. Unknown keys are skipped with a warning so
//! newer plugin versions can add fields without breaking older ones;
//! recognized keys with invalid values fail the whole call — a garbled
//! half-parse is worse than an explicit error.

use std::mem;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use tracing::warn;

use crate::color::Rgba;
use crate::constants::validation;
use crate::paths::normalize;
use crate::scaling::filter_from_store_code;

use super::record::{ExportSettingsRecord, JpegOptions, PngOptions, VersionPolicy};

/// Parse a stored settings string. The empty string is an empty list, not
/// an error.
pub fn deserialize(s: &str) -> Result<Vec<ExportSettingsRecord>> {
    if s.is_empty() {
        return Ok(Vec::new());
    }

    let mut tokens = tokenize(s);
    unescape_tokens(&mut tokens);
    if tokens.last().map(String::as_str) != Some(";") {
        tokens.push(";".to_string());
    }

    let mut records = Vec::new();
    let mut pairs: Vec<(String, String)> = Vec::new();
    let mut prefix = String::new();
    let mut stack: Vec<String> = Vec::new();
    for token in tokens {
        if token == "," || token == "=" {
            continue;
        }
        if token == ";" {
            if !pairs.is_empty() {
                records.push(build_record(&pairs)?);
            }
            pairs.clear();
            continue;
        }
        if token == "[" {
            match stack.pop() {
                Some(group) => prefix = format!("{group}_"),
                None => bail!("settings string has a '[' with no group name before it"),
            }
            continue;
        }
        if token == "]" {
            prefix.clear();
            continue;
        }
        stack.push(token);
        if stack.len() == 2 {
            let value = stack.pop().unwrap_or_default();
            let key = stack.pop().unwrap_or_default();
            pairs.push((format!("{prefix}{key}"), value));
        }
    }
    Ok(records)
}

/// Split on the control characters, keeping each as its own token.
fn tokenize(s: &str) -> Vec<String> {
    let mut tokens = Vec::new();
    let mut literal = String::new();
    for c in s.chars() {
        match c {
            '=' | ',' | ';' | '[' | ']' => {
                if !literal.is_empty() {
                    tokens.push(mem::take(&mut literal));
                }
                tokens.push(c.to_string());
            }
            _ => literal.push(c),
        }
    }
    if !literal.is_empty() {
        tokens.push(literal);
    }
    tokens
}

/// Rejoin tokens split apart by the `/,` escape.
///
/// A literal ending in `/` followed by a `,` token takes the comma back
/// as a literal character and, unless the next token is a plain `,`
/// separator, absorbs the literal that follows it. The pass re-examines
/// the merged token, so runs of escapes collapse correctly.
fn unescape_tokens(tokens: &mut Vec<String>) {
    let mut i = 0;
    while i + 1 < tokens.len() {
        if tokens[i].ends_with('/') && tokens[i + 1] == "," {
            tokens[i].pop();
            tokens[i].push(',');
            tokens.remove(i + 1);
            if i + 1 < tokens.len() && tokens[i + 1] != "," {
                let follower = tokens.remove(i + 1);
                tokens[i].push_str(&follower);
            }
            continue;
        }
        i += 1;
    }
}

/// Build one record from its collected key/value pairs.
fn build_record(pairs: &[(String, String)]) -> Result<ExportSettingsRecord> {
    let path = pairs
        .iter()
        .find(|(key, _)| key == "path")
        .map(|(_, value)| PathBuf::from(value))
        .context("stored settings record has no 'path' field")?;

    let mut record = ExportSettingsRecord::defaults_for(&path);
    record.store = true;
    let mut output_string: Option<&str> = None;

    for (key, value) in pairs {
        match key.as_str() {
            "path" => {}
            "v" => {
                record.version_policy = VersionPolicy::from_code(value)
                    .with_context(|| format!("unknown version policy code '{value}'"))?;
            }
            "output" => output_string = Some(value.as_str()),
            "ext" => record.extension = value.clone(),
            "scale_e" => record.scale.enabled = parse_flag(key, value)?,
            "scale_w" => record.scale.width = parse_dimension(key, value)?,
            "scale_h" => record.scale.height = parse_dimension(key, value)?,
            "scale_f" => record.scale.filter = filter_from_store_code(value).to_string(),
            "scale_r" => record.scale.resolution = parse_resolution(key, value)?,
            "png_fc" => record.png.fill_color = parse_color(key, value)?,
            "png_co" => {
                record.png.compression =
                    parse_ranged(key, value, validation::MAX_PNG_COMPRESSION)?;
            }
            "png_flag" => apply_flag_string(key, value, PngOptions::FLAG_COUNT, |digits| {
                record.png.unpack_flags(digits)
            })?,
            "jpeg_fc" => record.jpeg.fill_color = parse_color(key, value)?,
            "jpeg_qu" => {
                record.jpeg.quality = parse_ranged(key, value, validation::MAX_JPEG_QUALITY)?;
            }
            "jpeg_sm" => {
                record.jpeg.smooth = parse_ranged(key, value, validation::MAX_JPEG_SMOOTH)?;
            }
            "jpeg_ss" => {
                if !validation::JPEG_SUBSAMPLING_MODES.contains(&value.as_str()) {
                    bail!("unknown jpeg subsampling mode '{value}'");
                }
                record.jpeg.subsampling = value.clone();
            }
            "jpeg_flag" => apply_flag_string(key, value, JpegOptions::FLAG_COUNT, |digits| {
                record.jpeg.unpack_flags(digits)
            })?,
            _ => warn!(key = %key, "unrecognised settings key, skipping"),
        }
    }

    if let Some(output) = output_string {
        let base = record.path.parent().unwrap_or_else(|| Path::new("")).to_path_buf();
        let (is_abs, dir, name) = deserialize_output_path(&base, output);
        record.output_is_abs = is_abs;
        record.output_dir = dir;
        record.output_name = name;
    }

    Ok(record)
}

/// Decode a stored output string relative to `base`, the source file's
/// directory. Three forms: leading `./` is relative to `base` (lexically
/// normalized), an absolute path stands alone, and a bare name lives in
/// `base` itself.
pub(crate) fn deserialize_output_path(base: &Path, s: &str) -> (bool, PathBuf, String) {
    if let Some(rest) = s.strip_prefix("./") {
        let p = Path::new(rest);
        let parent = p.parent().unwrap_or_else(|| Path::new(""));
        let name = p
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        return (false, normalize(&base.join(parent)), name);
    }

    let p = Path::new(s);
    if p.is_absolute() {
        let dir = p.parent().unwrap_or_else(|| Path::new("/")).to_path_buf();
        let name = p
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        return (true, dir, name);
    }

    (false, base.to_path_buf(), s.to_string())
}

fn parse_flag(key: &str, value: &str) -> Result<bool> {
    match value {
        "1" => Ok(true),
        "0" => Ok(false),
        _ => bail!("invalid value '{value}' for '{key}', expected 0 or 1"),
    }
}

fn parse_dimension(key: &str, value: &str) -> Result<i32> {
    let dimension: i32 = value
        .parse()
        .with_context(|| format!("invalid value '{value}' for '{key}'"))?;
    if dimension != -1 && dimension <= 0 {
        bail!("invalid value '{value}' for '{key}', expected -1 or a positive size");
    }
    Ok(dimension)
}

fn parse_resolution(key: &str, value: &str) -> Result<f64> {
    let resolution: f64 = value
        .parse()
        .with_context(|| format!("invalid value '{value}' for '{key}'"))?;
    if resolution != -1.0 && (resolution.is_nan() || resolution <= 0.0) {
        bail!("invalid value '{value}' for '{key}', expected -1 or a positive resolution");
    }
    Ok(resolution)
}

fn parse_ranged(key: &str, value: &str, max: u8) -> Result<u8> {
    let number: u8 = value
        .parse()
        .with_context(|| format!("invalid value '{value}' for '{key}'"))?;
    if number > max {
        bail!("value {number} for '{key}' is out of range (max {max})");
    }
    Ok(number)
}

fn parse_color(key: &str, value: &str) -> Result<Rgba> {
    Rgba::parse(value).with_context(|| format!("invalid color '{value}' for '{key}'"))
}

fn apply_flag_string(
    key: &str,
    digits: &str,
    expected: usize,
    unpack: impl FnOnce(&str) -> Result<usize>,
) -> Result<()> {
    if digits.len() < expected {
        warn!(key = %key, flags = %digits, expected, "flag string is short, missing flags read as off");
    }
    let surplus = unpack(digits).with_context(|| format!("invalid flag string for '{key}'"))?;
    if surplus > 0 {
        warn!(key = %key, flags = %digits, surplus, "flag string has surplus digits, ignoring them");
    }
    Ok(())
}
