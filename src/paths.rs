//! Lexical path helpers for the stored output-path encoding and the
//! version matcher.
//!
//! Everything here works on path strings alone; no filesystem access.

use std::path::{Component, Path, PathBuf};

/// Collapse `.` and `..` components without touching the filesystem.
///
/// `..` pops a preceding normal component; at the root it is discarded
/// (`/home/../../x` becomes `/x`), and in a relative path with nothing
/// left to pop it is kept.
pub fn normalize(path: &Path) -> PathBuf {
    let mut parts: Vec<Component> = Vec::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => match parts.last() {
                Some(Component::Normal(_)) => {
                    parts.pop();
                }
                Some(Component::RootDir) | Some(Component::Prefix(_)) => {}
                _ => parts.push(component),
            },
            other => parts.push(other),
        }
    }
    parts.iter().map(|c| c.as_os_str()).collect()
}

/// Relative path from `base` to `path`, `..`-stepping out of `base` where
/// needed. Both arguments are taken as already-absolute directories or
/// files; the result never starts with a separator.
pub fn relative_from(path: &Path, base: &Path) -> PathBuf {
    let path = normalize(path);
    let base = normalize(base);

    let mut path_components = path.components();
    let mut base_components = base.components();
    let mut parts: Vec<Component> = Vec::new();
    loop {
        match (path_components.next(), base_components.next()) {
            (None, None) => break,
            (Some(p), None) => {
                parts.push(p);
                parts.extend(path_components);
                break;
            }
            (None, Some(_)) => parts.push(Component::ParentDir),
            (Some(p), Some(b)) if parts.is_empty() && p == b => {}
            (Some(p), Some(_)) => {
                parts.push(Component::ParentDir);
                parts.extend(base_components.map(|_| Component::ParentDir));
                parts.push(p);
                parts.extend(path_components);
                break;
            }
        }
    }
    parts.iter().map(|c| c.as_os_str()).collect()
}

/// Split a trailing `_NNN` version counter off a file's stem.
///
/// `art_003.kra` gives `("art", 3)`, `art_003_007.kra` gives
/// `("art_003", 7)`, and an unnumbered `art.kra` gives `("art", 0)`.
pub fn split_version_suffix(path: &Path) -> (String, u64) {
    let stem = path
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();
    if let Some(underscore) = stem.rfind('_') {
        let digits = &stem[underscore + 1..];
        if !digits.is_empty()
            && digits.bytes().all(|b| b.is_ascii_digit())
            && let Ok(number) = digits.parse::<u64>()
        {
            return (stem[..underscore].to_string(), number);
        }
    }
    (stem, 0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_collapses_parent_dirs() {
        assert_eq!(
            normalize(Path::new("/home/user/a/../b")),
            PathBuf::from("/home/user/b")
        );
        assert_eq!(
            normalize(Path::new("/home/user/./pic")),
            PathBuf::from("/home/user/pic")
        );
    }

    #[test]
    fn test_normalize_clamps_at_root() {
        assert_eq!(normalize(Path::new("/home/../../x")), PathBuf::from("/x"));
    }

    #[test]
    fn test_normalize_keeps_leading_parent_in_relative_path() {
        assert_eq!(normalize(Path::new("../a/b/..")), PathBuf::from("../a"));
    }

    #[test]
    fn test_relative_from_subdirectory() {
        let rel = relative_from(
            Path::new("/home/user/Pictures/subdir/pic"),
            Path::new("/home/user/Pictures"),
        );
        assert_eq!(rel, PathBuf::from("subdir/pic"));
    }

    #[test]
    fn test_relative_from_parent_directory() {
        let rel = relative_from(Path::new("/home/user/pic"), Path::new("/home/user/Pictures"));
        assert_eq!(rel, PathBuf::from("../pic"));
    }

    #[test]
    fn test_relative_from_sibling_directory() {
        let rel = relative_from(
            Path::new("/home/user/x/pic"),
            Path::new("/home/user/Pictures"),
        );
        assert_eq!(rel, PathBuf::from("../x/pic"));
    }

    #[test]
    fn test_split_version_suffix_numbered() {
        assert_eq!(
            split_version_suffix(Path::new("/a/art_003.kra")),
            ("art".to_string(), 3)
        );
    }

    #[test]
    fn test_split_version_suffix_nested_counter() {
        assert_eq!(
            split_version_suffix(Path::new("/a/art_003_007.kra")),
            ("art_003".to_string(), 7)
        );
    }

    #[test]
    fn test_split_version_suffix_unnumbered() {
        assert_eq!(
            split_version_suffix(Path::new("/a/art.kra")),
            ("art".to_string(), 0)
        );
    }

    #[test]
    fn test_split_version_suffix_requires_all_digits() {
        assert_eq!(
            split_version_suffix(Path::new("/a/art_12x.kra")),
            ("art_12x".to_string(), 0)
        );
    }

    #[test]
    fn test_split_version_suffix_leading_zeroes() {
        assert_eq!(
            split_version_suffix(Path::new("pic_000.png")),
            ("pic".to_string(), 0)
        );
    }
}
