use anyhow::{Context, Result};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::warn;
use walkdir::WalkDir;

/// List every regular file below `root`, depth-first with entries sorted by name.
/// Symlinks to files are listed; symlinked directories are not descended into.
///
/// Unreadable entries are logged and skipped; a root that is not a directory is an error.
pub fn list_files_recursive<P: AsRef<Path>>(root: P) -> Result<Vec<PathBuf>> {
    let root = root.as_ref();

    if !root.is_dir() {
        anyhow::bail!("Root is not a directory: {:?}", root);
    }

    let files = WalkDir::new(root)
        .sort_by_file_name()
        .into_iter()
        .filter_map(|entry| match entry {
            Ok(entry) => Some(entry),
            Err(e) => {
                warn!("Skipping unreadable entry under {:?}: {}", root, e);
                None
            }
        })
        .filter(|entry| {
            entry.file_type().is_file() || (entry.path_is_symlink() && entry.path().is_file())
        })
        .map(|entry| entry.into_path())
        .collect();

    Ok(files)
}

/// Check whether `path` names `target`.
///
/// A bare filename matches the last component; a target such as `models/device.js`
/// matches when the trailing components line up.
pub fn matches_target(path: &Path, target: &str) -> bool {
    let target = Path::new(target);
    target.components().next().is_some() && path.ends_with(target)
}

/// Read a whole file as UTF-8
pub fn read_text_file<P: AsRef<Path>>(path: P) -> Result<String> {
    let path = path.as_ref();
    fs::read_to_string(path).with_context(|| format!("Failed to read file: {:?}", path))
}

/// Overwrite a file with `contents`
pub fn write_text_file<P: AsRef<Path>>(path: P, contents: &str) -> Result<()> {
    let path = path.as_ref();
    fs::write(path, contents).with_context(|| format!("Failed to write file: {:?}", path))
}

/// Read a file, transform its text and write the result back in place.
/// Returns whether the text changed.
pub fn rewrite_text_file<P, F>(path: P, transform: F) -> Result<bool>
where
    P: AsRef<Path>,
    F: FnOnce(&str) -> Result<String>,
{
    let path = path.as_ref();
    let original = read_text_file(path)?;
    let updated = transform(&original)
        .with_context(|| format!("Failed to transform contents of {:?}", path))?;

    write_text_file(path, &updated)?;

    Ok(updated != original)
}

/// Write one line per item, each terminated by `\n`, replacing any existing file
pub fn write_lines<P: AsRef<Path>, S: AsRef<str>>(path: P, lines: &[S]) -> Result<()> {
    let contents: String = lines
        .iter()
        .map(|line| format!("{}\n", line.as_ref()))
        .collect();

    write_text_file(path, &contents)
}
