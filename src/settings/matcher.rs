//! Version-sibling matching: which stored record governs a file.

use std::path::Path;

use crate::paths::split_version_suffix;

use super::record::{ExportSettingsRecord, VersionPolicy};

/// Find the stored record whose settings should apply to `path`.
///
/// Match quality, worst to best, for a query like `art_005.kra`:
/// a version-sibling with a lower number (`art_002.kra`, AllForward),
/// a closer-preceding sibling (`art_004.kra`, AllForward), and finally
/// the exact file itself, which wins outright under any policy. Records
/// for strictly later versions never apply, and `Single` records only
/// ever match their own file.
///
/// Only path components are compared; whether the files still exist is
/// the caller's concern. `None` is the normal no-match outcome.
pub fn find_settings_for_file<'a>(
    path: &Path,
    records: &'a [ExportSettingsRecord],
) -> Option<&'a ExportSettingsRecord> {
    let (base_stem, version) = split_version_suffix(path);
    let parent = path.parent();
    let extension = path.extension();

    let mut best: Option<&ExportSettingsRecord> = None;
    let mut best_version = 0u64;

    for record in records {
        if !record.store {
            // only stored settings can govern other files
            continue;
        }

        if record.path.as_path() == path {
            // exact match beats any version-sibling
            return Some(record);
        }

        if record.version_policy == VersionPolicy::Single {
            continue;
        }

        if record.path.parent() != parent {
            // same-named files in other directories are unrelated
            continue;
        }

        let (record_base, record_version) = split_version_suffix(&record.path);
        if record_base != base_stem {
            // not versions of the same image
            continue;
        }

        if record.path.extension() != extension {
            continue;
        }

        if record.version_policy == VersionPolicy::All {
            // `All` never anchors matches from its own unnumbered base
            // file; only `AllForward` reaches other versions from there.
            let record_stem = record
                .path
                .file_stem()
                .map(|s| s.to_string_lossy().into_owned())
                .unwrap_or_default();
            if record_stem == record_base {
                continue;
            }
        }

        if record_version > version {
            // settings recorded for a later version never apply backwards
            continue;
        }

        if best.is_some() && record_version <= best_version {
            // closest-preceding version wins; on ties the first found stays
            continue;
        }

        best = Some(record);
        best_version = record_version;
    }

    best
}
