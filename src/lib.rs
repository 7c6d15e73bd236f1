//! # Lumen
//!
//! Lexical code intelligence for a linked project directory.
//!
//! - **Dependency graph**: imports extracted by per-language regex profiles,
//!   resolved to files, with cycles, stats and focused neighborhood exports
//! - **Instant attribution**: hash lookups map a copied snippet back to the
//!   file it came from in constant time
//! - **Sliding-window matching**: fuzzy normalized comparison for snippets
//!   that were edited after copying
//! - **Context decisions**: which project context should accompany a message
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use lumen::Session;
//! use std::path::Path;
//!
//! let session = Session::open(Path::new("."), None)?;
//! let stats = session.stats()?;
//! let hits = session.detect("return payload.strip()")?;
//! # Ok::<(), lumen::LumenError>(())
//! ```

pub mod config;
pub mod daemon;
pub mod error;
pub mod graph;
pub mod matcher;
pub mod parser;
pub mod project;
pub mod query;
pub mod session;
pub mod watcher;

// Re-exports for convenience
pub use config::Config;
pub use error::{LumenError, Result};
pub use graph::{DependencyAnalyzer, DependencyGraph, GraphExport, GraphStats, GraphView};
pub use matcher::{CodeMatcher, InstantMatcher, MatchCandidate};
pub use parser::{extract_file, Language};
pub use project::Project;
pub use query::{ContextDecision, ContextEngine, ContextKind};
pub use session::{BuildReport, Session};
