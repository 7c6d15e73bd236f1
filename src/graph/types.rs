//! Graph data types: per-file metadata and the JSON export shapes.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::path::PathBuf;

use crate::parser::Language;

/// Metadata recorded for every analyzed file.
///
/// Overwritten wholesale on each project analysis; there is no per-file diffing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FileRecord {
    pub path: PathBuf,
    pub language: Language,
    /// Import strings exactly as written, including unresolved ones.
    pub raw_imports: Vec<String>,
    /// Absolute paths of the imports that resolved, deduplicated.
    pub resolved_imports: Vec<PathBuf>,
    pub exports: Vec<String>,
    pub variables: Vec<String>,
    pub size: u64,
    pub lines: usize,
}

/// Summary numbers for the whole graph.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GraphStats {
    pub total_files: usize,
    pub total_dependencies: usize,
    pub circular_dependencies: usize,
    pub isolated_files: usize,
    /// `(file name, in-degree)`, highest first.
    pub most_imported: Vec<(String, usize)>,
    /// `(file name, out-degree)`, highest first.
    pub most_dependencies: Vec<(String, usize)>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NodeExport {
    pub id: String,
    pub label: String,
    pub language: Language,
    pub size: u64,
    pub lines: usize,
    pub export_count: usize,
    pub in_degree: usize,
    pub out_degree: usize,
    /// Only populated in focused exports.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub imports: Option<Vec<String>>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EdgeExport {
    pub source: String,
    pub target: String,
}

/// Full-graph export.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GraphExport {
    pub nodes: Vec<NodeExport>,
    pub edges: Vec<EdgeExport>,
    pub stats: GraphStats,
}

/// Neighborhood export around one file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FocusedGraphExport {
    pub nodes: Vec<NodeExport>,
    pub edges: Vec<EdgeExport>,
    pub stats: GraphStats,
    pub center_file: String,
}

/// Either shape, since a focused request on an unknown file falls back to the full graph.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum GraphView {
    Focused(FocusedGraphExport),
    Full(GraphExport),
}

/// Transitive neighborhood of one file, excluding the file itself.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DependencySet {
    /// What the file imports, directly or transitively.
    pub dependencies: BTreeSet<PathBuf>,
    /// What imports the file, directly or transitively.
    pub dependents: BTreeSet<PathBuf>,
}
