//! Locating the file the office suite wrote.
//!
//! The tool writes `<outdir>/<stem>.<target>` in the common case, but some
//! export filters choose a different name or extension casing. When the
//! expected path is absent, the output directory is scanned for the first
//! file whose name starts with the source stem and ends with
//! `.<target>` (case-insensitive).
//!
//! The scan is a heuristic: a pre-existing file that shares the stem and
//! extension (e.g. `report_old.pdf` next to `report.docx`) can be picked
//! instead of the real output.

use std::path::{Path, PathBuf};

/// The path the tool is expected to write for `source` converted to
/// `target`: same directory and stem, new extension.
pub fn expected_output(source: &Path, target: &str) -> PathBuf {
    source.with_extension(target)
}

/// Resolve the converted file for `source`, or `None` if nothing matches.
///
/// Directory-listing errors are treated as "not found".
pub fn locate_output(source: &Path, target: &str) -> Option<PathBuf> {
    let expected = expected_output(source, target);
    if expected.exists() {
        return Some(expected);
    }

    let stem = source.file_stem()?.to_string_lossy().into_owned();
    let suffix = format!(".{}", target.to_lowercase());
    let dir = match source.parent() {
        Some(p) if !p.as_os_str().is_empty() => p.to_path_buf(),
        _ => PathBuf::from("."),
    };

    let entries = match std::fs::read_dir(&dir) {
        Ok(entries) => entries,
        Err(e) => {
            tracing::debug!("cannot scan {} for output: {e}", dir.display());
            return None;
        }
    };

    entries.flatten().map(|entry| entry.path()).find(|path| {
        path.file_name()
            .map(|name| {
                let name = name.to_string_lossy();
                name.starts_with(&stem) && name.to_lowercase().ends_with(&suffix)
            })
            .unwrap_or(false)
    })
}
