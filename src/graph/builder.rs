//! Graph builder. Reads each file, extracts imports lexically, resolves them,
//! and assembles the dependency graph plus per-file metadata.
//!
//! A build is clear-then-rebuild: the previous graph and records are dropped
//! before the first file is read.

use std::collections::{BTreeSet, HashMap};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Instant;
use tracing::{debug, info};

use super::engine::DependencyGraph;
use super::resolver::{absolutize, resolve_import_path};
use super::types::FileRecord;
use crate::config::GraphConfig;
use crate::parser::extract_file;

/// Owns the dependency graph and file records for one project.
#[derive(Debug, Clone, Default)]
pub struct DependencyAnalyzer {
    pub(super) config: GraphConfig,
    root: Option<PathBuf>,
    graph: DependencyGraph,
    records: HashMap<PathBuf, FileRecord>,
}

impl DependencyAnalyzer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: GraphConfig) -> Self {
        Self {
            config,
            ..Self::default()
        }
    }

    /// Analyze `files` (paths inside `root`) from scratch.
    ///
    /// Unreadable files are skipped and do not become nodes. Every file that
    /// was read becomes exactly one node, even with no imports.
    pub fn analyze_project(&mut self, root: &Path, files: &[PathBuf]) -> &DependencyGraph {
        let start = Instant::now();
        self.graph.clear();
        self.records.clear();
        let root = absolutize(root);

        let mut skipped = 0usize;
        for file in files {
            match analyze_file(file, &root) {
                Some(record) => self.insert(record),
                None => skipped += 1,
            }
        }
        self.root = Some(root);

        info!(
            files = self.graph.node_count(),
            edges = self.graph.edge_count(),
            skipped,
            elapsed_ms = start.elapsed().as_millis() as u64,
            "dependency graph built"
        );
        &self.graph
    }

    fn insert(&mut self, record: FileRecord) {
        self.graph.add_node(&record.path);
        for target in &record.resolved_imports {
            self.graph.add_edge(&record.path, target);
        }
        self.records.insert(record.path.clone(), record);
    }

    pub fn graph(&self) -> &DependencyGraph {
        &self.graph
    }

    pub fn root(&self) -> Option<&Path> {
        self.root.as_deref()
    }

    pub fn record(&self, path: &Path) -> Option<&FileRecord> {
        self.records.get(path)
    }

    pub fn records(&self) -> &HashMap<PathBuf, FileRecord> {
        &self.records
    }
}

/// Read and analyze a single file. `None` when the file cannot be read.
///
/// Content is decoded lossily, so odd encodings still yield a record.
pub fn analyze_file(file: &Path, root: &Path) -> Option<FileRecord> {
    let path = absolutize(file);
    let bytes = match fs::read(&path) {
        Ok(bytes) => bytes,
        Err(e) => {
            debug!(file = %path.display(), error = %e, "skipping unreadable file");
            return None;
        }
    };
    let source = String::from_utf8_lossy(&bytes);
    let extracted = extract_file(&path, &source);

    let resolved: BTreeSet<PathBuf> = extracted
        .imports
        .iter()
        .filter_map(|import| resolve_import_path(&path, import, root))
        .collect();

    Some(FileRecord {
        lines: count_newlines(&bytes),
        size: bytes.len() as u64,
        path,
        language: extracted.language,
        raw_imports: extracted.imports,
        resolved_imports: resolved.into_iter().collect(),
        exports: extracted.exports,
        variables: extracted.variables,
    })
}

fn count_newlines(bytes: &[u8]) -> usize {
    bytes.iter().filter(|&&b| b == b'\n').count()
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_python_chain() {
        let dir = tempdir().unwrap();
        let root = dir.path();
        fs::write(root.join("a.py"), "import b\n").unwrap();
        fs::write(root.join("b.py"), "import c\n").unwrap();
        fs::write(root.join("c.py"), "x = 1\n").unwrap();

        let files = vec![root.join("a.py"), root.join("b.py"), root.join("c.py")];
        let mut analyzer = DependencyAnalyzer::new();
        let graph = analyzer.analyze_project(root, &files);

        assert_eq!(graph.node_count(), 3);
        assert_eq!(graph.edge_count(), 2);
        let a = absolutize(&root.join("a.py"));
        let b = absolutize(&root.join("b.py"));
        let c = absolutize(&root.join("c.py"));
        assert!(graph.has_edge(&a, &b));
        assert!(graph.has_edge(&b, &c));
    }

    #[test]
    fn test_unresolved_imports_recorded_without_edges() {
        let dir = tempdir().unwrap();
        let root = dir.path();
        fs::write(root.join("main.py"), "import numpy\nimport os\n").unwrap();

        let mut analyzer = DependencyAnalyzer::new();
        analyzer.analyze_project(root, &[root.join("main.py")]);

        let record = analyzer.record(&absolutize(&root.join("main.py"))).unwrap();
        assert_eq!(record.raw_imports, vec!["numpy".to_string(), "os".to_string()]);
        assert!(record.resolved_imports.is_empty());
        assert_eq!(analyzer.graph().edge_count(), 0);
        assert_eq!(analyzer.graph().node_count(), 1);
    }

    #[test]
    fn test_missing_file_is_skipped() {
        let dir = tempdir().unwrap();
        let root = dir.path();
        fs::write(root.join("ok.js"), "const x = 1;\n").unwrap();

        let mut analyzer = DependencyAnalyzer::new();
        let graph = analyzer.analyze_project(root, &[root.join("gone.js"), root.join("ok.js")]);
        assert_eq!(graph.node_count(), 1);
    }

    #[test]
    fn test_unknown_language_is_isolated_node() {
        let dir = tempdir().unwrap();
        let root = dir.path();
        fs::write(root.join("README.md"), "import a from './a'\n").unwrap();
        fs::write(root.join("a.js"), "").unwrap();

        let mut analyzer = DependencyAnalyzer::new();
        let graph = analyzer.analyze_project(root, &[root.join("README.md")]);
        assert_eq!(graph.node_count(), 1);
        assert_eq!(graph.edge_count(), 0);
    }

    #[test]
    fn test_size_and_lines() {
        let dir = tempdir().unwrap();
        let root = dir.path();
        fs::write(root.join("m.py"), "a = 1\nb = 2\n").unwrap();

        let record = analyze_file(&root.join("m.py"), root).unwrap();
        assert_eq!(record.size, 12);
        assert_eq!(record.lines, 2);
    }

    #[test]
    fn test_invalid_utf8_still_analyzed() {
        let dir = tempdir().unwrap();
        let root = dir.path();
        fs::write(root.join("b.py"), "").unwrap();
        fs::write(root.join("a.py"), b"import b\n# \xff\xfe\n").unwrap();

        let record = analyze_file(&root.join("a.py"), root).unwrap();
        assert_eq!(record.resolved_imports, vec![absolutize(&root.join("b.py"))]);
    }

    #[test]
    fn test_reanalysis_drops_stale_edges() {
        let dir = tempdir().unwrap();
        let root = dir.path();
        fs::write(root.join("a.py"), "import b\n").unwrap();
        fs::write(root.join("b.py"), "").unwrap();

        let mut analyzer = DependencyAnalyzer::new();
        let files = vec![root.join("a.py"), root.join("b.py")];
        assert_eq!(analyzer.analyze_project(root, &files).edge_count(), 1);

        fs::remove_file(root.join("b.py")).unwrap();
        let graph = analyzer.analyze_project(root, &files);
        assert_eq!(graph.edge_count(), 0);
        assert_eq!(graph.node_count(), 1);
    }
}
