//! Sliding-window matcher over normalized file contents.
//!
//! The cache is scoped to one project and rebuilt wholesale the first time a
//! match is requested after the project changed.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

use super::normalize::{has_code_indicators, normalize};
use crate::config::MatcherConfig;
use crate::project::Project;

const MIN_NORMALIZED_QUERY: usize = 5;

#[derive(Debug, Clone)]
pub struct CachedFile {
    pub normalized: String,
    pub original: String,
}

#[derive(Debug, Clone, Default)]
pub struct CodeMatcher {
    config: MatcherConfig,
    project: Option<String>,
    files: BTreeMap<PathBuf, CachedFile>,
}

impl CodeMatcher {
    pub fn new(config: MatcherConfig) -> Self {
        Self {
            config,
            ..Self::default()
        }
    }

    pub fn config(&self) -> &MatcherConfig {
        &self.config
    }

    /// Read, normalize and cache every file of `project` under the size ceiling.
    /// Files that normalize to nothing are not cached.
    pub fn cache_project(&mut self, project: &Project) -> usize {
        self.files.clear();
        for path in &project.files {
            match fs::metadata(path) {
                Ok(meta) if meta.len() > self.config.max_file_bytes => {
                    debug!(file = %path.display(), bytes = meta.len(), "too large for context matching");
                    continue;
                }
                Ok(_) => {}
                Err(e) => {
                    debug!(file = %path.display(), error = %e, "skipping unreadable file");
                    continue;
                }
            }
            let original = match fs::read(path) {
                Ok(bytes) => String::from_utf8_lossy(&bytes).into_owned(),
                Err(e) => {
                    debug!(file = %path.display(), error = %e, "skipping unreadable file");
                    continue;
                }
            };
            let normalized = normalize(&original);
            if normalized.is_empty() {
                continue;
            }
            self.files.insert(
                path.clone(),
                CachedFile { normalized, original },
            );
        }
        self.project = Some(project.name.clone());
        info!(project = %project.name, files = self.files.len(), "normalized file cache built");
        self.files.len()
    }

    pub fn invalidate(&mut self) {
        self.project = None;
        self.files.clear();
    }

    pub fn cached_files(&self) -> usize {
        self.files.len()
    }

    pub fn cached(&self, path: &Path) -> Option<&CachedFile> {
        self.files.get(path)
    }

    /// Best-scoring files for `query` at the configured threshold.
    pub fn find_matching_files(&mut self, query: &str, project: Option<&Project>) -> Vec<(PathBuf, f64)> {
        let threshold = self.config.threshold;
        self.find_matching_files_above(query, project, threshold)
    }

    /// Up to `max_results` `(file, score)` pairs with `score >= threshold`, best first.
    pub fn find_matching_files_above(
        &mut self,
        query: &str,
        project: Option<&Project>,
        threshold: f64,
    ) -> Vec<(PathBuf, f64)> {
        let Some(project) = project else {
            return Vec::new();
        };
        if !has_code_indicators(query) {
            return Vec::new();
        }
        let query = normalize(query);
        if query.chars().count() < MIN_NORMALIZED_QUERY {
            return Vec::new();
        }
        if self.project.as_deref() != Some(project.name.as_str()) || self.files.is_empty() {
            self.cache_project(project);
        }

        let mut matches: Vec<(PathBuf, f64)> = self
            .files
            .iter()
            .map(|(path, file)| (path.clone(), self.score(&query, &file.normalized)))
            .filter(|(_, score)| *score >= threshold)
            .collect();
        matches.sort_by(|a, b| b.1.total_cmp(&a.1));
        debug!(found = matches.len(), "sliding-window matches");
        matches.truncate(self.config.max_results);
        matches
    }

    /// Similarity of a normalized query against a normalized file, in `[0, 1]`.
    pub fn score(&self, query: &str, file: &str) -> f64 {
        sliding_window_score(
            query,
            file,
            self.config.min_window,
            self.config.max_window,
            self.config.window_step,
        )
    }
}

/// Largest query window (by character count) found verbatim in `file`,
/// relative to the query length.
///
/// Window sizes run from `min_window` in steps of `step` while below both
/// `max_window` and the query length plus one. A window at offset 0 earns a
/// 1.2 bonus. The scan stops at the first score above 0.9. Queries shorter
/// than `min_window` only get a containment check worth at most 0.8.
pub fn sliding_window_score(query: &str, file: &str, min_window: usize, max_window: usize, step: usize) -> f64 {
    if query.is_empty() || file.is_empty() {
        return 0.0;
    }

    let bounds: Vec<usize> = query
        .char_indices()
        .map(|(i, _)| i)
        .chain(std::iter::once(query.len()))
        .collect();
    let query_len = bounds.len() - 1;

    if query_len < min_window {
        return if file.contains(query) {
            (query_len as f64 / 20.0).min(0.8)
        } else {
            0.0
        };
    }

    let mut best: f64 = 0.0;
    for window in (min_window..max_window.min(query_len + 1)).step_by(step.max(1)) {
        for start in 0..=(query_len - window) {
            if !file.contains(&query[bounds[start]..bounds[start + window]]) {
                continue;
            }
            let mut score = window as f64 / query_len as f64;
            if start == 0 {
                score *= 1.2;
            }
            if score > 0.9 {
                return score.min(1.0);
            }
            best = best.max(score);
        }
    }
    best.min(1.0)
}
