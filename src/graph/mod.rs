//! File-level dependency graph built from lexical import extraction.

pub mod builder;
pub mod engine;
pub mod query;
pub mod resolver;
pub mod types;

pub use builder::{analyze_file, DependencyAnalyzer};
pub use engine::{DependencyGraph, NodeId};
pub use resolver::resolve_import_path;
pub use types::{
    DependencySet, EdgeExport, FileRecord, FocusedGraphExport, GraphExport, GraphStats, GraphView,
    NodeExport,
};
