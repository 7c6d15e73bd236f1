//! Context decision types.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::PathBuf;

/// Externally produced file summaries, keyed by absolute path.
pub type SummaryMap = BTreeMap<PathBuf, String>;

/// Which context strategy won.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ContextKind {
    FullProject,
    SpecificFile,
    None,
}

/// Outcome of one decision: whether to attach context, which kind, and the text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContextDecision {
    pub include: bool,
    #[serde(rename = "type")]
    pub kind: ContextKind,
    pub content: String,
}

impl ContextDecision {
    pub fn none() -> Self {
        Self {
            include: false,
            kind: ContextKind::None,
            content: String::new(),
        }
    }

    pub fn full_project(content: String) -> Self {
        Self {
            include: true,
            kind: ContextKind::FullProject,
            content,
        }
    }

    pub fn specific_file(content: String) -> Self {
        Self {
            include: true,
            kind: ContextKind::SpecificFile,
            content,
        }
    }
}
