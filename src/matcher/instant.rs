//! Instant attribution of pasted text to project files.
//!
//! The index holds three hash tables built from the active project's files:
//! trimmed lines, 3/4-word windows and identifiers. Lookups only consult those
//! tables, so detection cost depends on the size of the query, not the project.
//!
//! Collisions are last-writer-wins: when two files share a line, whichever was
//! indexed later owns it.

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};
use tracing::{debug, info};

use super::fingerprint::{identifiers, is_meaningful_triple, line_hash, sequence_hash, words};
use crate::config::IndexConfig;
use crate::project::Project;

pub const LINE_CONFIDENCE: f64 = 0.95;
pub const SEQUENCE_CONFIDENCE: f64 = 0.8;
const MIN_QUERY_CHARS: usize = 5;
const MIN_SHARED_IDENTIFIERS: usize = 2;

/// One ranked attribution.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MatchCandidate {
    pub file_path: PathBuf,
    pub file_name: String,
    pub confidence: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IndexStats {
    pub project: Option<String>,
    pub files_indexed: usize,
    pub line_hashes: usize,
    pub word_sequences: usize,
    pub identifiers: usize,
    pub build_time_ms: f64,
    pub ready: bool,
}

#[derive(Debug, Clone, Default)]
pub struct InstantMatcher {
    config: IndexConfig,
    project: Option<String>,
    line_hashes: HashMap<String, (PathBuf, usize)>,
    word_sequences: HashMap<String, (PathBuf, usize)>,
    identifier_files: HashMap<String, BTreeSet<PathBuf>>,
    files_indexed: usize,
    build_time: Duration,
}

impl InstantMatcher {
    pub fn new(config: IndexConfig) -> Self {
        Self {
            config,
            ..Self::default()
        }
    }

    /// Rebuild all tables for `project_name` from `files`.
    ///
    /// Files over the size ceiling or unreadable files are skipped; the rest
    /// count as indexed even when empty.
    pub fn build(&mut self, project_name: &str, files: &[PathBuf]) -> usize {
        let start = Instant::now();
        self.clear();

        let mut indexed = 0;
        for file in files {
            match fs::metadata(file) {
                Ok(meta) if meta.len() > self.config.max_file_bytes => {
                    debug!(file = %file.display(), bytes = meta.len(), "too large for instant index");
                    continue;
                }
                Ok(_) => {}
                Err(e) => {
                    debug!(file = %file.display(), error = %e, "skipping unreadable file");
                    continue;
                }
            }
            match fs::read(file) {
                Ok(bytes) => {
                    self.index_text(file, &String::from_utf8_lossy(&bytes));
                    indexed += 1;
                }
                Err(e) => debug!(file = %file.display(), error = %e, "skipping unreadable file"),
            }
        }

        self.project = Some(project_name.to_string());
        self.files_indexed = indexed;
        self.build_time = start.elapsed();

        info!(
            project = project_name,
            files = indexed,
            lines = self.line_hashes.len(),
            sequences = self.word_sequences.len(),
            identifiers = self.identifier_files.len(),
            elapsed_ms = self.build_time.as_millis() as u64,
            "instant index built"
        );
        indexed
    }

    fn index_text(&mut self, file: &Path, content: &str) {
        if content.trim().is_empty() {
            return;
        }

        for (i, line) in content.split('\n').enumerate() {
            let trimmed = line.trim();
            if trimmed.chars().count() > self.config.min_line_chars {
                self.line_hashes
                    .insert(line_hash(trimmed), (file.to_path_buf(), i + 1));
            }
        }

        let tokens = words(content);
        let tokens: Vec<&str> = tokens.iter().map(String::as_str).collect();
        for (i, window) in tokens.windows(3).enumerate() {
            if is_meaningful_triple(window) {
                self.word_sequences
                    .insert(sequence_hash(window), (file.to_path_buf(), i));
            }
        }
        for (i, window) in tokens.windows(4).enumerate() {
            self.word_sequences
                .insert(sequence_hash(window), (file.to_path_buf(), i));
        }

        for identifier in identifiers(content) {
            self.identifier_files
                .entry(identifier)
                .or_default()
                .insert(file.to_path_buf());
        }
    }

    /// Rank files that likely contain `text`, best first.
    ///
    /// Returns nothing unless the index is bound to `active`. Each file's
    /// confidence is the strongest single signal, never a sum.
    pub fn detect(&self, text: &str, active: Option<&str>) -> Vec<MatchCandidate> {
        if self.project.is_none() || self.project.as_deref() != active {
            return Vec::new();
        }
        let query = text.trim();
        if query.chars().count() < MIN_QUERY_CHARS {
            return Vec::new();
        }

        let mut scores: BTreeMap<&Path, f64> = BTreeMap::new();

        for line in query.split('\n') {
            let trimmed = line.trim();
            if trimmed.chars().count() > self.config.min_line_chars {
                if let Some((file, _)) = self.line_hashes.get(&line_hash(trimmed)) {
                    raise(&mut scores, file, LINE_CONFIDENCE);
                }
            }
        }

        let tokens = words(query);
        let tokens: Vec<&str> = tokens.iter().map(String::as_str).collect();
        for window in tokens.windows(3).filter(|w| is_meaningful_triple(w)) {
            if let Some((file, _)) = self.word_sequences.get(&sequence_hash(window)) {
                raise(&mut scores, file, SEQUENCE_CONFIDENCE);
            }
        }

        let mut shared: BTreeMap<&Path, usize> = BTreeMap::new();
        for identifier in identifiers(query) {
            if let Some(files) = self.identifier_files.get(&identifier) {
                for file in files {
                    *shared.entry(file.as_path()).or_default() += 1;
                }
            }
        }
        for (file, count) in shared {
            if count >= MIN_SHARED_IDENTIFIERS {
                raise(&mut scores, file, identifier_confidence(count));
            }
        }

        let mut ranked: Vec<MatchCandidate> = scores
            .into_iter()
            .map(|(file, confidence)| MatchCandidate {
                file_path: file.to_path_buf(),
                file_name: file
                    .file_name()
                    .map(|n| n.to_string_lossy().into_owned())
                    .unwrap_or_default(),
                confidence,
            })
            .collect();
        ranked.sort_by(|a, b| b.confidence.total_cmp(&a.confidence));
        ranked.truncate(self.config.max_results);
        ranked
    }

    pub fn detect_best(&self, text: &str, active: Option<&str>) -> Option<MatchCandidate> {
        self.detect(text, active).into_iter().next()
    }

    /// Bound to `active` and holding at least one line fingerprint.
    pub fn is_ready(&self, active: Option<&str>) -> bool {
        self.project.is_some() && self.project.as_deref() == active && !self.line_hashes.is_empty()
    }

    pub fn stats(&self, active: Option<&str>) -> IndexStats {
        IndexStats {
            project: self.project.clone(),
            files_indexed: self.files_indexed,
            line_hashes: self.line_hashes.len(),
            word_sequences: self.word_sequences.len(),
            identifiers: self.identifier_files.len(),
            build_time_ms: (self.build_time.as_secs_f64() * 100_000.0).round() / 100.0,
            ready: self.is_ready(active),
        }
    }

    /// Rebuild when the active project differs from the indexed one; clear
    /// when nothing is active. Returns true if anything changed.
    pub fn refresh_if_needed(&mut self, active: Option<&Project>) -> bool {
        let active_name = active.map(|p| p.name.as_str());
        if self.project.as_deref() == active_name {
            return false;
        }
        match active {
            Some(project) => {
                info!(project = %project.name, "active project changed, rebuilding instant index");
                self.build(&project.name, &project.files);
            }
            None => {
                info!("no active project, clearing instant index");
                self.clear();
            }
        }
        true
    }

    pub fn clear(&mut self) {
        self.project = None;
        self.line_hashes.clear();
        self.word_sequences.clear();
        self.identifier_files.clear();
        self.files_indexed = 0;
        self.build_time = Duration::ZERO;
    }

    pub fn project(&self) -> Option<&str> {
        self.project.as_deref()
    }
}

fn raise<'a>(scores: &mut BTreeMap<&'a Path, f64>, file: &'a Path, confidence: f64) {
    let slot = scores.entry(file).or_insert(0.0);
    *slot = slot.max(confidence);
}

fn identifier_confidence(count: usize) -> f64 {
    (0.3 + 0.1 * count as f64).min(0.7)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn build(files: &[(&str, &str)]) -> (tempfile::TempDir, InstantMatcher, Vec<PathBuf>) {
        let dir = tempdir().unwrap();
        let mut paths = Vec::new();
        for (name, body) in files {
            let path = dir.path().join(name);
            fs::write(&path, body).unwrap();
            paths.push(path);
        }
        let mut matcher = InstantMatcher::new(IndexConfig::default());
        matcher.build("demo", &paths);
        (dir, matcher, paths)
    }

    #[test]
    fn test_verbatim_line_is_high_confidence() {
        let (_dir, matcher, paths) = build(&[
            ("x.py", "def alpha():\n    total_amount = 4\n"),
            ("y.py", "print('nothing to see')\n"),
        ]);
        let hits = matcher.detect("total_amount = 4", Some("demo"));
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].file_path, paths[0]);
        assert_eq!(hits[0].file_name, "x.py");
        assert!((hits[0].confidence - LINE_CONFIDENCE).abs() < 1e-9);
    }

    #[test]
    fn test_wrong_project_is_empty() {
        let (_dir, matcher, _) = build(&[("x.py", "total_amount = compute(4)\n")]);
        assert!(matcher.detect("total_amount = compute(4)", Some("other")).is_empty());
        assert!(matcher.detect("total_amount = compute(4)", None).is_empty());
    }

    #[test]
    fn test_short_query_is_empty() {
        let (_dir, matcher, _) = build(&[("x.py", "abcd\n")]);
        assert!(matcher.detect("  abcd  ", Some("demo")).is_empty());
    }

    #[test]
    fn test_word_sequence_match() {
        let (_dir, matcher, paths) = build(&[(
            "notes.js",
            "// fetch the latest user records from storage\nconst x = 1;\n",
        )]);
        let hits = matcher.detect("please fetch the latest records", Some("demo"));
        assert_eq!(hits[0].file_path, paths[0]);
        assert!((hits[0].confidence - SEQUENCE_CONFIDENCE).abs() < 1e-9);
    }

    #[test]
    fn test_identifier_overlap() {
        let (_dir, matcher, paths) = build(&[
            ("svc.ts", "export function loadInvoice(invoiceId) { return repository.find(invoiceId); }\n"),
            ("other.ts", "export const unrelated = 1;\n"),
        ]);
        let hits = matcher.detect("repository?? invoiceid!! loadinvoice", Some("demo"));
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].file_path, paths[0]);
        assert!((hits[0].confidence - 0.6).abs() < 1e-9);
    }

    #[test]
    fn test_single_identifier_is_not_enough() {
        let (_dir, matcher, _) = build(&[("svc.ts", "function loadInvoice() {}\n")]);
        assert!(matcher.detect("loadinvoice ok", Some("demo")).is_empty());
    }

    #[test]
    fn test_max_not_sum() {
        let (_dir, matcher, _) = build(&[(
            "calc.py",
            "def compute_invoice_total(invoice_lines):\n    return sum(invoice_lines)\n",
        )]);
        let hits = matcher.detect("def compute_invoice_total(invoice_lines):", Some("demo"));
        assert_eq!(hits.len(), 1);
        assert!((hits[0].confidence - LINE_CONFIDENCE).abs() < 1e-9);
    }

    #[test]
    fn test_prose_is_empty() {
        let (_dir, matcher, _) = build(&[("main.rs", "fn main() { let value = compute(); }\n")]);
        assert!(matcher.detect("the weather was lovely on our trip", Some("demo")).is_empty());
    }

    #[test]
    fn test_last_writer_wins() {
        let (_dir, matcher, paths) = build(&[
            ("first.py", "shared_value = 123456\n"),
            ("second.py", "shared_value = 123456\n"),
        ]);
        let hits = matcher.detect("shared_value = 123456", Some("demo"));
        assert_eq!(hits[0].file_path, paths[1]);
    }

    #[test]
    fn test_oversize_file_skipped() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("big.txt");
        fs::write(&path, "a_long_enough_line = 1\n").unwrap();
        let mut matcher = InstantMatcher::new(IndexConfig {
            max_file_bytes: 4,
            ..IndexConfig::default()
        });
        assert_eq!(matcher.build("demo", &[path]), 0);
        assert!(!matcher.is_ready(Some("demo")));
    }

    #[test]
    fn test_stats_and_readiness() {
        let (_dir, matcher, _) = build(&[("x.py", "total_amount = compute(4)\n")]);
        let stats = matcher.stats(Some("demo"));
        assert_eq!(stats.project.as_deref(), Some("demo"));
        assert_eq!(stats.files_indexed, 1);
        assert_eq!(stats.line_hashes, 1);
        assert!(stats.ready);
        assert!(!matcher.stats(Some("other")).ready);

        let json = serde_json::to_value(&stats).unwrap();
        assert!(json.get("filesIndexed").is_some());
        assert!(json.get("buildTimeMs").is_some());
    }

    #[test]
    fn test_refresh_if_needed() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("x.py");
        fs::write(&path, "total_amount = compute(4)\n").unwrap();
        let project = Project {
            name: "demo".into(),
            root: dir.path().to_path_buf(),
            files: vec![path],
            linked_at: chrono::Utc::now(),
        };

        let mut matcher = InstantMatcher::new(IndexConfig::default());
        assert!(matcher.refresh_if_needed(Some(&project)));
        assert!(!matcher.refresh_if_needed(Some(&project)));
        assert!(matcher.is_ready(Some("demo")));

        assert!(matcher.refresh_if_needed(None));
        assert_eq!(matcher.project(), None);
        assert_eq!(matcher.stats(None).line_hashes, 0);
    }

    #[test]
    fn test_clear_resets_build_time() {
        let (_dir, mut matcher, _) = build(&[("x.py", "total_amount = compute(4)\n")]);
        matcher.build_time = Duration::from_millis(12);
        assert_eq!(matcher.stats(Some("demo")).build_time_ms, 12.0);

        assert!(matcher.refresh_if_needed(None));
        let stats = matcher.stats(None);
        assert_eq!(stats.build_time_ms, 0.0);
        assert_eq!(stats.files_indexed, 0);
    }

    #[test]
    fn test_identifier_confidence_caps() {
        assert!((identifier_confidence(2) - 0.5).abs() < 1e-9);
        assert!((identifier_confidence(10) - 0.7).abs() < 1e-9);
    }
}
