//! File discovery: which files under a project root are user-authored.
//!
//! Build output, VCS metadata, virtualenvs, vendored libraries and binary or
//! media files are left out, as is anything above the size ceiling.

use ignore::WalkBuilder;
use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

use crate::config::DiscoveryConfig;

/// Walk `root` and return the sorted list of user files.
pub fn discover_user_files(root: &Path, config: &DiscoveryConfig) -> Vec<PathBuf> {
    let ignored: HashSet<String> = config.ignored_dirs.iter().cloned().collect();

    let mut files: Vec<PathBuf> = WalkBuilder::new(root)
        .hidden(false)
        .git_ignore(true)
        .git_global(false)
        .git_exclude(true)
        .filter_entry(move |entry| {
            let is_dir = entry.file_type().is_some_and(|ft| ft.is_dir());
            !(is_dir && entry.depth() > 0 && ignored.contains(&*entry.file_name().to_string_lossy()))
        })
        .build()
        .filter_map(|entry| entry.ok())
        .filter(|entry| entry.file_type().is_some_and(|ft| ft.is_file()))
        .map(|entry| entry.into_path())
        .filter(|path| is_user_file(path, root, config))
        .collect();

    files.sort();
    debug!(root = %root.display(), files = files.len(), "discovered user files");
    files
}

/// Whether `path` (inside `root`) passes the size, library, extension and
/// directory rules.
pub fn is_user_file(path: &Path, root: &Path, config: &DiscoveryConfig) -> bool {
    match fs::metadata(path) {
        Ok(meta) if meta.len() > config.max_file_bytes => {
            debug!(file = %path.display(), bytes = meta.len(), "skipping large file");
            return false;
        }
        Ok(_) => {}
        Err(_) => return false,
    }

    let relative = path.strip_prefix(root).unwrap_or(path);
    let mut dirs = relative.parent().into_iter().flat_map(|p| p.components());
    let in_excluded_dir = dirs.any(|c| {
        let name = c.as_os_str().to_string_lossy().to_lowercase();
        config.library_dirs.iter().any(|d| d.eq_ignore_ascii_case(&name))
            || config.ignored_dirs.iter().any(|d| d.eq_ignore_ascii_case(&name))
    });
    if in_excluded_dir {
        return false;
    }

    let ext = path
        .extension()
        .map(|e| e.to_string_lossy().to_lowercase())
        .unwrap_or_default();
    !config.ignored_extensions.iter().any(|e| e == &ext)
}
