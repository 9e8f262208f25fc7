use crate::Error;
use log::warn;
use std::fs;
use std::path::{Path, PathBuf};

/// Collects every regular file beneath `path`.
///
/// A file path yields itself; a directory is walked recursively. Entries are
/// returned sorted so batch results are reproducible.
///
/// When `ignore_errors` is set, unreadable directories and paths which are
/// neither files nor directories are logged and skipped; otherwise the first
/// such problem is returned as an error.
pub fn iter_files(path: &Path, ignore_errors: bool) -> Result<Vec<PathBuf>, Error> {
    let mut files = Vec::new();
    let mut stack = vec![path.to_path_buf()];

    while let Some(item) = stack.pop() {
        if item.is_file() {
            files.push(item);
        } else if item.is_dir() {
            let entries = match fs::read_dir(&item) {
                Ok(entries) => entries,
                Err(err) => {
                    if !ignore_errors {
                        return Err(err.into());
                    }
                    warn!("Failed to read directory '{}': {}", item.display(), err);
                    continue;
                }
            };

            for entry in entries {
                match entry {
                    Ok(entry) => stack.push(entry.path()),
                    Err(err) => {
                        if !ignore_errors {
                            return Err(err.into());
                        }
                        warn!("Failed to read entry in '{}': {}", item.display(), err);
                    }
                }
            }
        } else {
            if !ignore_errors {
                return Err(Error::FileNotFound(item));
            }
            warn!("Ignoring content in '{}'", item.display());
        }
    }

    files.sort();

    Ok(files)
}
