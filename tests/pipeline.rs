//! End-to-end behavior over small projects written to a temp dir.

use lumen::config::{IndexConfig, MatcherConfig};
use lumen::graph::{DependencyAnalyzer, GraphView};
use lumen::matcher::{sliding_window_score, CodeMatcher, InstantMatcher};
use lumen::{ContextKind, Project, Session};
use std::collections::BTreeSet;
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::tempdir;

fn write(root: &Path, files: &[(&str, &str)]) -> Vec<PathBuf> {
    files
        .iter()
        .map(|(name, body)| {
            let path = root.join(name);
            if let Some(parent) = path.parent() {
                fs::create_dir_all(parent).unwrap();
            }
            fs::write(&path, body).unwrap();
            path
        })
        .collect()
}

// ─── Graph ─────────────────────────────────────────────────────

#[test]
fn test_python_chain() {
    let dir = tempdir().unwrap();
    let files = write(
        dir.path(),
        &[("a.py", "import b\n"), ("b.py", "import c\n"), ("c.py", "VALUE = 1\n")],
    );

    let mut analyzer = DependencyAnalyzer::new();
    analyzer.analyze_project(dir.path(), &files);

    let graph = analyzer.graph();
    assert!(graph.has_edge(&files[0], &files[1]));
    assert!(graph.has_edge(&files[1], &files[2]));
    assert!(analyzer.find_cycles().is_empty());

    let stats = analyzer.stats();
    assert_eq!(stats.total_files, 3);
    assert_eq!(stats.total_dependencies, 2);
    assert_eq!(stats.circular_dependencies, 0);
    assert_eq!(stats.isolated_files, 0);
}

#[test]
fn test_javascript_cycle() {
    let dir = tempdir().unwrap();
    let files = write(
        dir.path(),
        &[
            ("a.js", "import { b } from './b';\nexport const a = 1;\n"),
            ("b.js", "import { a } from './a';\nexport const b = 2;\n"),
        ],
    );

    let mut analyzer = DependencyAnalyzer::new();
    analyzer.analyze_project(dir.path(), &files);

    let cycles = analyzer.find_cycles();
    assert_eq!(cycles.len(), 1);
    let members: BTreeSet<PathBuf> = cycles[0].iter().cloned().collect();
    let expected: BTreeSet<PathBuf> = files.iter().cloned().collect();
    assert_eq!(members, expected);
    assert_eq!(analyzer.stats().circular_dependencies, 1);
}

#[test]
fn test_every_input_file_is_a_node() {
    let dir = tempdir().unwrap();
    let files = write(
        dir.path(),
        &[
            ("main.go", "package main\n"),
            ("notes.txt", "plain text\n"),
            ("empty.py", ""),
        ],
    );

    let mut analyzer = DependencyAnalyzer::new();
    analyzer.analyze_project(dir.path(), &files);

    let stats = analyzer.stats();
    assert_eq!(stats.total_files, 3);
    assert_eq!(stats.total_dependencies, 0);
    assert_eq!(stats.isolated_files, 3);
}

#[test]
fn test_deleting_target_drops_edge() {
    let dir = tempdir().unwrap();
    let files = write(dir.path(), &[("a.py", "import b\n"), ("b.py", "X = 1\n")]);

    let mut analyzer = DependencyAnalyzer::new();
    analyzer.analyze_project(dir.path(), &files);
    assert_eq!(analyzer.graph().edge_count(), 1);

    fs::remove_file(&files[1]).unwrap();
    analyzer.analyze_project(dir.path(), &files);
    assert_eq!(analyzer.graph().edge_count(), 0);
    assert!(!analyzer.graph().has_edge(&files[0], &files[1]));
}

#[test]
fn test_focused_edges_stay_inside_closure() {
    let dir = tempdir().unwrap();
    let files = write(
        dir.path(),
        &[
            ("a.py", "import b\n"),
            ("b.py", "import c\n"),
            ("c.py", "import d\n"),
            ("d.py", "import a\n"),
            ("e.py", "import d\n"),
        ],
    );

    let mut analyzer = DependencyAnalyzer::new();
    analyzer.analyze_project(dir.path(), &files);

    let GraphView::Focused(view) = analyzer.focused_graph_data(&files[1], 1) else {
        panic!("expected a focused view");
    };
    let ids: BTreeSet<&str> = view.nodes.iter().map(|n| n.id.as_str()).collect();
    assert_eq!(ids.len(), 3);
    for edge in &view.edges {
        assert!(ids.contains(edge.source.as_str()), "dangling source {}", edge.source);
        assert!(ids.contains(edge.target.as_str()), "dangling target {}", edge.target);
    }
    assert_eq!(view.edges.len(), 2);
}

// ─── Matching ──────────────────────────────────────────────────

#[test]
fn test_verbatim_line_detected() {
    let dir = tempdir().unwrap();
    let files = write(
        dir.path(),
        &[
            ("counter.js", "function tick() {\n  let count = 42;\n  return count;\n}\n"),
            ("greet.py", "def greet(name):\n    print('hello world')\n"),
        ],
    );

    let mut index = InstantMatcher::new(IndexConfig::default());
    index.build("demo", &files);

    let hits = index.detect("let count = 42;", Some("demo"));
    assert_eq!(hits.len(), 1);
    assert_eq!(hits[0].file_path, files[0]);
    assert_eq!(hits[0].file_name, "counter.js");
    assert_eq!(hits[0].confidence, 0.95);
}

#[test]
fn test_prose_matches_nothing() {
    let dir = tempdir().unwrap();
    let files = write(
        dir.path(),
        &[("counter.js", "function tick() {\n  let count = 42;\n  return count;\n}\n")],
    );
    let project = Project::with_files("demo", dir.path(), files.clone());

    let mut index = InstantMatcher::new(IndexConfig::default());
    index.build("demo", &files);
    assert!(index.detect("thanks that was helpful", Some("demo")).is_empty());

    let mut matcher = CodeMatcher::new(MatcherConfig::default());
    assert!(matcher
        .find_matching_files("thanks that was helpful", Some(&project))
        .is_empty());
}

#[test]
fn test_identical_query_scores_full() {
    let q = "abcdefghijklmnopqrst";
    assert_eq!(sliding_window_score(q, q, 10, 100, 5), 1.0);
    let short = "abcdefgh";
    assert_eq!(sliding_window_score(short, short, 10, 100, 5), 0.4);
}

#[test]
fn test_reformatted_snippet_still_matches() {
    let dir = tempdir().unwrap();
    let files = write(
        dir.path(),
        &[("cart.js", "function addToCart(item) {\n    cart.items.push(item);\n}\n")],
    );
    let project = Project::with_files("demo", dir.path(), files.clone());

    let mut matcher = CodeMatcher::new(MatcherConfig::default());
    let found = matcher.find_matching_files("function addToCart(item){cart.items.push(item)}", Some(&project));
    assert_eq!(found.len(), 1);
    assert_eq!(found[0].0, files[0]);
    assert!(found[0].1 > 0.9);
}

// ─── Session ───────────────────────────────────────────────────

#[test]
fn test_session_flow() {
    let dir = tempdir().unwrap();
    write(
        dir.path(),
        &[
            ("src/app.py", "import util\n\ndef main():\n    return util.compute_total(items)\n"),
            ("src/util.py", "def compute_total(items):\n    return sum(i.price for i in items)\n"),
            ("node_modules/lib/index.js", "module.exports = 1;\n"),
        ],
    );

    let session = Session::open(dir.path(), Some("shop")).unwrap();
    let project = session.active_project().unwrap().unwrap();
    assert_eq!(project.files.len(), 2);

    let stats = session.stats().unwrap();
    assert_eq!(stats.total_files, 2);
    assert_eq!(stats.total_dependencies, 1);

    let hits = session.detect("return sum(i.price for i in items)").unwrap();
    assert_eq!(hits[0].file_name, "util.py");

    let full = session.decide_context("anything", true).unwrap();
    assert_eq!(full.kind, ContextKind::FullProject);
    assert!(full.content.contains("Project: shop"));

    let matched = session
        .decide_context("def compute_total(items): return sum(i.price for i in items)", false)
        .unwrap();
    assert_eq!(matched.kind, ContextKind::SpecificFile);
    assert!(matched.content.contains("File: util.py"));

    let none = session.decide_context("thanks that was helpful", false).unwrap();
    assert!(!none.include);
}
