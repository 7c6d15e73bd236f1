//! File watcher: keeps a session in sync with the project on disk.
//!
//! Changes are debounced; each settled batch that touches a user file triggers
//! one rediscovery and full rebuild of the session. A batch that arrives while
//! a build is still running is dropped.

use notify_debouncer_mini::{new_debouncer, DebouncedEvent, DebouncedEventKind};
use std::path::{Component, Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, warn};

use crate::config::DiscoveryConfig;
use crate::error::LumenError;
use crate::session::Session;

/// Default debounce duration for file events.
const DEFAULT_DEBOUNCE_MS: u64 = 200;

/// Start watching `root` recursively, refreshing `session` on changes.
///
/// Returns a handle that keeps the watcher alive. Drop it to stop watching.
/// A `debounce_ms` of 0 uses the default of 200ms.
pub fn start_watching(
    root: &Path,
    session: Arc<Session>,
    debounce_ms: u64,
) -> Result<WatcherHandle, notify::Error> {
    let debounce = if debounce_ms == 0 {
        Duration::from_millis(DEFAULT_DEBOUNCE_MS)
    } else {
        Duration::from_millis(debounce_ms)
    };

    let root_owned = root.to_path_buf();

    let mut debouncer = new_debouncer(debounce, move |result: Result<Vec<DebouncedEvent>, notify::Error>| {
        match result {
            Ok(events) => handle_events(&events, &session, &root_owned),
            Err(e) => warn!(error = %e, "file watcher error"),
        }
    })?;

    debouncer.watcher().watch(root, notify::RecursiveMode::Recursive)?;

    info!(root = %root.display(), debounce_ms = debounce.as_millis() as u64, "file watcher started");

    Ok(WatcherHandle { _debouncer: debouncer })
}

fn handle_events(events: &[DebouncedEvent], session: &Session, root: &Path) {
    let changed = relevant_paths(events, root, &session.config().discovery);
    if changed.is_empty() {
        return;
    }

    debug!(count = changed.len(), "processing file events");

    match session.refresh() {
        Ok(report) => debug!(files = report.files, dependencies = report.dependencies, "refreshed after file changes"),
        Err(LumenError::BuildInProgress) => debug!("build in progress, skipping file events"),
        Err(e) => warn!(error = %e, "refresh after file changes failed"),
    }
}

/// Settled events outside ignored directories, deduplicated.
fn relevant_paths(events: &[DebouncedEvent], root: &Path, config: &DiscoveryConfig) -> Vec<PathBuf> {
    let mut paths: Vec<PathBuf> = events
        .iter()
        .filter(|e| e.kind == DebouncedEventKind::Any)
        .filter(|e| !should_ignore(&e.path, root, config))
        .map(|e| e.path.clone())
        .collect();
    paths.sort();
    paths.dedup();
    paths
}

/// Whether any directory component below `root` is an ignored or library dir.
fn should_ignore(path: &Path, root: &Path, config: &DiscoveryConfig) -> bool {
    let relative = path.strip_prefix(root).unwrap_or(path);
    relative.components().any(|component| match component {
        Component::Normal(name) => {
            let name = name.to_string_lossy();
            config.ignored_dirs.iter().any(|d| d.eq_ignore_ascii_case(&name))
                || config.library_dirs.iter().any(|d| d.eq_ignore_ascii_case(&name))
        }
        _ => false,
    })
}

/// Handle that keeps the file watcher alive.
/// Drop this to stop watching.
pub struct WatcherHandle {
    _debouncer: notify_debouncer_mini::Debouncer<notify::RecommendedWatcher>,
}
