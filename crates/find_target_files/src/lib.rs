// crates/find_target_files/src/lib.rs

use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// Lists the regular files directly inside `dir` whose name ends with
/// `.{extension}`, sorted by file name.
///
/// Subdirectories are never descended into, and a subdirectory whose name
/// happens to end with the extension is not reported either. Symlinks to
/// files are reported; entries without the suffix are never inspected.
///
/// # Errors
///
/// Returns an error if `dir` does not exist, is not a directory, or cannot be
/// listed. Enumeration is a precondition of a pass, so nothing is skipped.
pub fn find_target_files<P: AsRef<Path>>(dir: P, extension: &str) -> io::Result<Vec<PathBuf>> {
    let finder = TargetFileFinder::new(dir.as_ref(), extension);
    finder.find()
}

// === Private Implementation === //

struct TargetFileFinder<'a> {
    dir: &'a Path,
    suffix: String,
}

impl<'a> TargetFileFinder<'a> {
    fn new(dir: &'a Path, extension: &str) -> Self {
        Self {
            dir,
            suffix: format!(".{}", extension.trim_start_matches('.')),
        }
    }

    fn find(&self) -> io::Result<Vec<PathBuf>> {
        let metadata = fs::metadata(self.dir)?;
        if !metadata.is_dir() {
            return Err(io::Error::new(
                io::ErrorKind::InvalidInput,
                format!("{} is not a directory", self.dir.display()),
            ));
        }

        let mut found = Vec::new();
        for entry in WalkDir::new(self.dir)
            .min_depth(1)
            .max_depth(1)
            .sort_by_file_name()
        {
            let entry = entry?;
            if !entry.file_name().to_string_lossy().ends_with(&self.suffix) {
                continue;
            }
            if entry.file_type().is_file()
                || (entry.path_is_symlink() && links_to_file(entry.path()))
            {
                found.push(entry.into_path());
            }
        }

        log::debug!(
            "{} file(s) ending with '{}' in {}",
            found.len(),
            self.suffix,
            self.dir.display()
        );
        Ok(found)
    }
}

// A dangling link with the suffix is kept so that reading it fails like any
// other unreadable file.
fn links_to_file(path: &Path) -> bool {
    match fs::metadata(path) {
        Ok(target) => target.is_file(),
        Err(err) => {
            log::debug!("{} is a dangling link: {}", path.display(), err);
            true
        }
    }
}
