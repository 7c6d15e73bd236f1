//! Error types for Lumen.
//!
//! Per-file problems (unreadable, oversize, odd encoding) never show up here:
//! they are logged and the file is skipped. These variants cover failures of a
//! whole operation.

use std::path::PathBuf;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, LumenError>;

#[derive(Error, Debug)]
pub enum LumenError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("invalid config: {0}")]
    Config(#[from] toml::de::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("project path does not exist: {0}")]
    ProjectNotFound(PathBuf),

    #[error("project path is not a directory: {0}")]
    NotADirectory(PathBuf),

    #[error("no active project")]
    NoActiveProject,

    #[error("a build is already in progress")]
    BuildInProgress,

    #[error("lock poisoned: {0}")]
    LockPoisoned(String),
}

impl<T> From<std::sync::PoisonError<T>> for LumenError {
    fn from(e: std::sync::PoisonError<T>) -> Self {
        LumenError::LockPoisoned(e.to_string())
    }
}
