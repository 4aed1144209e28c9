//! Utility functions for file naming, selection validation and size tallies

use crate::error::{Error, Result};
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// Maximum number of rename attempts when resolving file collisions
const MAX_RENAME_ATTEMPTS: u32 = 9999;

/// Characters that are replaced when turning an app name into a path segment
const UNSAFE_FILENAME_CHARS: &[char] = &['/', '\\', ':', '*', '?', '"', '<', '>', '|'];

/// Make an app name safe to use as a single path segment
///
/// Each of `/ \ : * ? " < > |` becomes `_`, then surrounding whitespace is
/// trimmed.
///
/// # Examples
///
/// ```
/// use appcask::utils::sanitize_filename;
///
/// assert_eq!(sanitize_filename("App/Name"), "App_Name");
/// assert_eq!(sanitize_filename("  AppName  "), "AppName");
/// ```
#[must_use]
pub fn sanitize_filename(name: &str) -> String {
    name.replace(UNSAFE_FILENAME_CHARS, "_").trim().to_string()
}

/// Candidate names for a file that must not replace an existing one
///
/// Yields `path` itself, then `stem_1.ext`, `stem_2.ext`, ... Only the last
/// extension is kept apart from the stem. Callers create the first candidate
/// that is still free with an exclusive open, so checking and creating are a
/// single step.
///
/// # Examples
///
/// ```
/// use appcask::utils::collision_candidates;
/// use std::path::Path;
///
/// let names: Vec<_> = collision_candidates(Path::new("icons/icon.png"))
///     .unwrap()
///     .take(3)
///     .collect();
/// assert_eq!(names[0], Path::new("icons/icon.png"));
/// assert_eq!(names[2], Path::new("icons/icon_2.png"));
/// ```
pub fn collision_candidates(path: &Path) -> Result<impl Iterator<Item = PathBuf>> {
    let stem = path
        .file_stem()
        .and_then(|s| s.to_str())
        .ok_or_else(|| Error::Other(format!("cannot extract file stem: {}", path.display())))?
        .to_string();
    let extension = path.extension().and_then(|e| e.to_str()).map(str::to_string);
    let parent = path.parent().unwrap_or_else(|| Path::new("")).to_path_buf();

    let renamed = (1..=MAX_RENAME_ATTEMPTS).map(move |i| {
        parent.join(match &extension {
            Some(ext) => format!("{stem}_{i}.{ext}"),
            None => format!("{stem}_{i}"),
        })
    });
    Ok(std::iter::once(path.to_path_buf()).chain(renamed))
}

/// Whether `index` addresses one of `count` items
#[must_use]
pub fn valid_index(index: i64, count: usize) -> bool {
    index >= 0 && (index as u128) < count as u128
}

/// Round half away from zero to `decimals` places
#[must_use]
pub fn round_to(value: f64, decimals: i32) -> f64 {
    let factor = 10f64.powi(decimals);
    (value * factor).round() / factor
}

/// Bytes to megabytes (bytes / 1024 / 1024), rounded to 2 decimals
#[must_use]
pub fn bytes_to_mb(bytes: u64) -> f64 {
    round_to(bytes as f64 / 1024.0 / 1024.0, 2)
}

/// Count regular files under `dir` and sum their sizes
///
/// Reads the filesystem, so the result reflects what is actually on disk.
/// A directory that does not exist tallies as empty.
pub fn tally_directory(dir: &Path) -> Result<(usize, u64)> {
    if !dir.exists() {
        return Ok((0, 0));
    }

    let mut files = 0;
    let mut bytes = 0;
    for entry in WalkDir::new(dir) {
        let entry = entry.map_err(|e| Error::Io(std::io::Error::other(e)))?;
        if entry.file_type().is_file() {
            files += 1;
            bytes += entry
                .metadata()
                .map_err(|e| Error::Io(std::io::Error::other(e)))?
                .len();
        }
    }
    Ok((files, bytes))
}

// unwrap/expect are acceptable in tests for concise failure-on-error assertions
#[allow(clippy::unwrap_used, clippy::expect_used)]
#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn sanitize_replaces_every_reserved_character() {
        for bad in ["App/Name", "App\\Name", "App:Name", "App*Name", "App?Name"] {
            assert_eq!(sanitize_filename(bad), "App_Name", "input {bad:?}");
        }
        for bad in ["App\"Name", "App<Name", "App>Name", "App|Name"] {
            assert_eq!(sanitize_filename(bad), "App_Name", "input {bad:?}");
        }
    }

    #[test]
    fn sanitize_trims_surrounding_whitespace() {
        assert_eq!(sanitize_filename("  AppName  "), "AppName");
        assert_eq!(sanitize_filename(" Test/App:Name "), "Test_App_Name");
    }

    #[test]
    fn sanitize_output_never_contains_reserved_characters() {
        let input = r#" a/b\c:d*e?f"g<h>i|j "#;
        let out = sanitize_filename(input);
        assert!(!out.contains(UNSAFE_FILENAME_CHARS));
        assert_eq!(out, "a_b_c_d_e_f_g_h_i_j");
    }

    #[test]
    fn sanitize_keeps_unicode_names() {
        assert_eq!(sanitize_filename("微信"), "微信");
        assert_eq!(sanitize_filename("Café: Menu"), "Café_ Menu");
    }

    fn first_candidates(path: &Path, n: usize) -> Vec<PathBuf> {
        collision_candidates(path).unwrap().take(n).collect()
    }

    #[test]
    fn candidates_start_with_the_requested_name() {
        let path = Path::new("/out/icons/test.png");
        assert_eq!(
            first_candidates(path, 3),
            vec![
                PathBuf::from("/out/icons/test.png"),
                PathBuf::from("/out/icons/test_1.png"),
                PathBuf::from("/out/icons/test_2.png"),
            ]
        );
    }

    #[test]
    fn candidates_are_bounded() {
        let count = collision_candidates(Path::new("a.png")).unwrap().count();
        assert_eq!(count, MAX_RENAME_ATTEMPTS as usize + 1);
    }

    #[test]
    fn candidates_without_extension() {
        assert_eq!(
            first_candidates(Path::new("/out/test"), 2)[1],
            PathBuf::from("/out/test_1")
        );
    }

    #[test]
    fn candidates_keep_only_the_last_extension() {
        assert_eq!(
            first_candidates(Path::new("/out/icon-512x512.bb.png"), 2)[1],
            PathBuf::from("/out/icon-512x512.bb_1.png")
        );
    }

    #[test]
    fn valid_index_accepts_only_in_range_values() {
        assert!(valid_index(0, 10));
        assert!(valid_index(5, 10));
        assert!(valid_index(9, 10));

        assert!(!valid_index(-1, 10));
        assert!(!valid_index(10, 10));
        assert!(!valid_index(100, 10));
        assert!(!valid_index(0, 0));
    }

    #[test]
    fn megabytes_are_rounded_to_two_decimals() {
        assert_eq!(bytes_to_mb(10_485_760), 10.0);
        assert_eq!(bytes_to_mb(0), 0.0);
        assert_eq!(bytes_to_mb(123_456_789), 117.74);
    }

    #[test]
    fn round_to_one_decimal() {
        assert_eq!(round_to(4.462, 1), 4.5);
        assert_eq!(round_to(4.5, 1), 4.5);
        assert_eq!(round_to(3.04, 1), 3.0);
    }

    #[test]
    fn tally_counts_nested_files_only() {
        let temp_dir = TempDir::new().unwrap();
        let nested = temp_dir.path().join("screenshots").join("iPhone");
        fs::create_dir_all(&nested).unwrap();
        fs::write(temp_dir.path().join("a.txt"), [0u8; 10]).unwrap();
        fs::write(nested.join("b.png"), [0u8; 32]).unwrap();

        assert_eq!(tally_directory(temp_dir.path()).unwrap(), (2, 42));
    }

    #[test]
    fn tally_of_missing_directory_is_empty() {
        let temp_dir = TempDir::new().unwrap();
        assert_eq!(
            tally_directory(&temp_dir.path().join("missing")).unwrap(),
            (0, 0)
        );
    }
}
