//! Query module: decides which project context accompanies a message.

pub mod context;
pub mod types;

pub use context::{file_context, full_project_context, ContextEngine};
pub use types::{ContextDecision, ContextKind, SummaryMap};
