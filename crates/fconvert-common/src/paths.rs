//! Destination path policy.
//!
//! A converted file keeps its base name with the text after the last "."
//! replaced by the target extension. When an output directory is configured
//! it replaces the source's directory while the base name is kept.

use std::path::{Path, PathBuf};

use crate::error::{Error, Result};
use crate::types::TargetFormat;

/// Compute the destination path for converting `source` to `format`.
///
/// Only the text after the final "." of the source *file name* is replaced;
/// dots earlier in the name are preserved. A name without any "." keeps its
/// whole name as the stem. With an `output_dir` the destination lands there
/// regardless of where the source lives, otherwise next to the source.
///
/// # Examples
///
/// ```
/// use std::path::{Path, PathBuf};
/// use fconvert_common::paths::destination_for;
/// use fconvert_common::TargetFormat;
///
/// let png = TargetFormat::from("png");
/// assert_eq!(
///     destination_for(Path::new("/tmp/a.jpg"), &png, None),
///     PathBuf::from("/tmp/a.png"),
/// );
/// assert_eq!(
///     destination_for(Path::new("a.b.jpg"), &png, Some(Path::new("/out"))),
///     PathBuf::from("/out/a.b.png"),
/// );
/// ```
pub fn destination_for(
    source: &Path,
    format: &TargetFormat,
    output_dir: Option<&Path>,
) -> PathBuf {
    let name = source
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();

    let stem = match name.rsplit_once('.') {
        Some((stem, _)) if !stem.is_empty() => stem,
        _ => name.as_str(),
    };

    let dir = match output_dir {
        Some(dir) => dir.to_path_buf(),
        None => source.parent().map(Path::to_path_buf).unwrap_or_default(),
    };

    dir.join(format!("{}.{}", stem, format.extension()))
}

/// Create the configured output directory if it is missing.
///
/// Recursive and idempotent; an existing directory is not an error. A
/// failure here is reported for the affected file only, it never aborts the
/// whole run.
pub fn ensure_output_dir(dir: &Path) -> Result<()> {
    std::fs::create_dir_all(dir).map_err(|e| Error::directory(dir, e))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn png() -> TargetFormat {
        TargetFormat::from("png")
    }

    #[test]
    fn test_replaces_only_last_extension() {
        assert_eq!(
            destination_for(Path::new("a.b.jpg"), &png(), None),
            PathBuf::from("a.b.png")
        );
    }

    #[test]
    fn test_output_dir_replaces_source_dir() {
        assert_eq!(
            destination_for(Path::new("/tmp/a.jpg"), &png(), Some(Path::new("/out"))),
            PathBuf::from("/out/a.png")
        );
    }

    #[test]
    fn test_source_dir_is_kept_without_output_dir() {
        assert_eq!(
            destination_for(Path::new("/media/in/clip.mov"), &TargetFormat::Mp4, None),
            PathBuf::from("/media/in/clip.mp4")
        );
    }

    #[test]
    fn test_name_without_dot_keeps_whole_name() {
        assert_eq!(
            destination_for(Path::new("/tmp/README"), &png(), None),
            PathBuf::from("/tmp/README.png")
        );
    }

    #[test]
    fn test_hidden_file_name_is_kept() {
        // ".bashrc" has no stem before the dot; the whole name is kept.
        assert_eq!(
            destination_for(Path::new(".bashrc"), &png(), None),
            PathBuf::from(".bashrc.png")
        );
    }

    #[test]
    fn test_ensure_output_dir_is_idempotent() {
        let dir = tempfile::tempdir().expect("tempdir");
        let nested = dir.path().join("a/b/c");
        ensure_output_dir(&nested).expect("first create");
        ensure_output_dir(&nested).expect("second create");
        assert!(nested.is_dir());
    }

    #[test]
    fn test_ensure_output_dir_reports_failure() {
        let dir = tempfile::tempdir().expect("tempdir");
        let file = dir.path().join("occupied");
        std::fs::write(&file, b"not a directory").expect("write");
        let err = ensure_output_dir(&file.join("sub")).expect_err("must fail");
        assert!(err.to_string().contains("failed to create directory"));
    }
}
