// crates/patch_directory/src/lib.rs

use anyhow::{Context, Result};
use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use find_target_files::find_target_files;
use insert_pragma::{patch_content, DeclarationMatcher};
use pragma_marker::{PRAGMA_MARKER, TARGET_EXTENSION};

pub mod config;

/// What to do when a single file cannot be read or written.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ErrorPolicy {
    /// Stop the pass at the first failing file. Files already written stay written.
    #[default]
    Abort,
    /// Log the failure, record it in the report and carry on with the next file.
    Skip,
}

/// Everything a pass needs, passed in explicitly.
#[derive(Clone, Debug)]
pub struct PassConfig {
    /// Directory whose files are patched (not recursively).
    pub dir: PathBuf,
    /// Extension, without the dot, of the files to patch.
    pub extension: String,
    /// Annotation line inserted ahead of each declaration.
    pub marker: String,
    pub matcher: DeclarationMatcher,
    /// Report what would change without touching any file.
    pub dry_run: bool,
    pub policy: ErrorPolicy,
}

impl PassConfig {
    /// A configuration using the default extension, marker and pattern.
    pub fn new<P: Into<PathBuf>>(dir: P) -> Self {
        Self {
            dir: dir.into(),
            extension: TARGET_EXTENSION.to_string(),
            marker: PRAGMA_MARKER.to_string(),
            matcher: DeclarationMatcher::default(),
            dry_run: false,
            policy: ErrorPolicy::Abort,
        }
    }
}

/// Summary of one pass.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct PassReport {
    /// Number of candidate files found in the directory.
    pub scanned: usize,
    /// Files that were rewritten (or would be, in a dry run).
    pub patched: Vec<PathBuf>,
    /// Files skipped under [`ErrorPolicy::Skip`], with the error message.
    pub failed: Vec<(PathBuf, String)>,
}

/// Overwrites `path` with `patched` when it differs from `original`.
///
/// Returns whether the content changed. Nothing is written when the two are
/// equal or when `dry_run` is set. The new content goes to a temporary file in
/// the same directory which then replaces `path`, so a failed write never
/// leaves a half-written file behind. Symlinks are resolved first: the file
/// they point at is replaced and the link itself is kept.
pub fn write_if_changed(path: &Path, original: &str, patched: &str, dry_run: bool) -> io::Result<bool> {
    if original == patched {
        return Ok(false);
    }
    if dry_run {
        return Ok(true);
    }

    let target = fs::canonicalize(path)?;
    let parent = match target.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    };
    let permissions = fs::metadata(&target)?.permissions();
    let mut tmp = tempfile::NamedTempFile::new_in(parent)?;
    tmp.write_all(patched.as_bytes())?;
    tmp.as_file().sync_all()?;
    fs::set_permissions(tmp.path(), permissions)?;
    tmp.persist(&target).map_err(|e| e.error)?;
    Ok(true)
}

/// Runs one pass over `config.dir`: walk, read, patch, compare, write.
///
/// Prints `Final patch for {filename}` for every rewritten file
/// (`Would patch {filename}` in a dry run).
///
/// # Errors
///
/// Fails if the directory cannot be listed. A file that cannot be read or
/// written fails the pass under [`ErrorPolicy::Abort`].
pub fn run_pass(config: &PassConfig) -> Result<PassReport> {
    let files = find_target_files(&config.dir, &config.extension)
        .with_context(|| format!("Failed to list {}", config.dir.display()))?;
    log::info!(
        "Scanning {} file(s) in {}",
        files.len(),
        config.dir.display()
    );

    let mut report = PassReport {
        scanned: files.len(),
        ..PassReport::default()
    };

    for path in files {
        match patch_file(&path, config) {
            Ok(true) => {
                let filename = display_name(&path);
                if config.dry_run {
                    println!("Would patch {}", filename);
                } else {
                    println!("Final patch for {}", filename);
                }
                report.patched.push(path);
            }
            Ok(false) => log::debug!("{} already up to date", path.display()),
            Err(err) => match config.policy {
                ErrorPolicy::Abort => return Err(err),
                ErrorPolicy::Skip => {
                    log::error!("Skipping {}: {:#}", path.display(), err);
                    report.failed.push((path, format!("{:#}", err)));
                }
            },
        }
    }

    Ok(report)
}

fn patch_file(path: &Path, config: &PassConfig) -> Result<bool> {
    let original = fs::read_to_string(path)
        .with_context(|| format!("Error reading file {}", path.display()))?;
    let outcome = patch_content(&original, &config.matcher, &config.marker);
    if outcome.is_changed() {
        log::debug!(
            "{}: {} marker(s) to insert",
            path.display(),
            outcome.inserted
        );
    }
    write_if_changed(path, &original, &outcome.content, config.dry_run)
        .with_context(|| format!("Error writing file {}", path.display()))
}

fn display_name(path: &Path) -> String {
    path.file_name()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_write_if_changed_skips_equal_content() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("missing.dart");
        // The file does not exist, so any write attempt would fail.
        let changed = write_if_changed(&path, "same\n", "same\n", false).unwrap();
        assert!(!changed);
        assert!(!path.exists());
    }

    #[test]
    fn test_write_if_changed_replaces_content() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("model.dart");
        fs::write(&path, "old\n").unwrap();
        let changed = write_if_changed(&path, "old\n", "new\n", false).unwrap();
        assert!(changed);
        assert_eq!(fs::read_to_string(&path).unwrap(), "new\n");
        // No temporary files are left next to the target.
        assert_eq!(fs::read_dir(dir.path()).unwrap().count(), 1);
    }

    #[test]
    fn test_write_if_changed_dry_run_reports_without_writing() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("model.dart");
        fs::write(&path, "old\n").unwrap();
        let changed = write_if_changed(&path, "old\n", "new\n", true).unwrap();
        assert!(changed);
        assert_eq!(fs::read_to_string(&path).unwrap(), "old\n");
    }

    #[test]
    fn test_pass_config_defaults() {
        let config = PassConfig::new("some/dir");
        assert_eq!(config.dir, PathBuf::from("some/dir"));
        assert_eq!(config.extension, "dart");
        assert_eq!(config.marker, "@pragma('vm:prefer-inline')");
        assert!(!config.dry_run);
        assert_eq!(config.policy, ErrorPolicy::Abort);
    }

    #[test]
    fn test_display_name_uses_basename() {
        assert_eq!(display_name(Path::new("a/b/c.dart")), "c.dart");
    }
}
