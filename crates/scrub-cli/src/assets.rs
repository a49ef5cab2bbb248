//! Document discovery under a project root.

use std::{
    ffi::OsStr,
    path::{Path, PathBuf},
};

use log::{debug, warn};
use walkdir::{DirEntry, WalkDir};

use scrub::ScrubError;

/// Top-level directories holding generated or cached files.
const EXCLUDED_DIRS: [&str; 5] = ["Library", "Temp", "Logs", "obj", "Build"];

/// Collects every document under `root` whose extension is one of
/// `extensions`, sorted by path.
///
/// Hidden directories and the engine's generated directories are not entered.
/// Entries that cannot be read below the root are logged and skipped.
///
/// # Errors
///
/// Returns [`ScrubError::Walk`] if `root` itself cannot be read.
pub fn enumerate(root: &Path, extensions: &[String]) -> Result<Vec<PathBuf>, ScrubError> {
    let mut documents = Vec::new();

    let walker = WalkDir::new(root)
        .follow_links(false)
        .into_iter()
        .filter_entry(|entry| !is_excluded(entry));

    for entry in walker {
        let entry = match entry {
            Ok(entry) => entry,
            Err(err) if err.depth() == 0 => return Err(err.into()),
            Err(err) => {
                warn!(err:%; "Skipping unreadable entry");
                continue;
            }
        };

        if entry.file_type().is_file() && has_extension(entry.path(), extensions) {
            documents.push(entry.into_path());
        }
    }

    documents.sort();
    debug!(root = root.display().to_string(), documents_count = documents.len(); "Documents enumerated");

    Ok(documents)
}

fn is_excluded(entry: &DirEntry) -> bool {
    if entry.depth() == 0 || !entry.file_type().is_dir() {
        return false;
    }

    let name = entry.file_name().to_string_lossy();
    name.starts_with('.') || (entry.depth() == 1 && EXCLUDED_DIRS.contains(&name.as_ref()))
}

fn has_extension(path: &Path, extensions: &[String]) -> bool {
    path.extension()
        .and_then(OsStr::to_str)
        .is_some_and(|ext| extensions.iter().any(|wanted| wanted.eq_ignore_ascii_case(ext)))
}
