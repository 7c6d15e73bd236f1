//! Configuration: optional `.lumen/config.toml` in the project root.
//!
//! Every field has a default, so an absent file or a partial file both work.
//!
//! ```toml
//! [index]
//! max_file_bytes = 262144
//!
//! [matcher]
//! threshold = 0.3
//! ```

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

use crate::error::Result;

/// Directory (inside the project root) holding config, socket and pid file.
pub const STATE_DIR: &str = ".lumen";

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub discovery: DiscoveryConfig,
    pub graph: GraphConfig,
    pub index: IndexConfig,
    pub matcher: MatcherConfig,
    pub daemon: DaemonConfig,
}

/// Rules for turning a project root into a list of user-authored files.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DiscoveryConfig {
    pub max_file_bytes: u64,
    pub ignored_dirs: Vec<String>,
    pub library_dirs: Vec<String>,
    pub ignored_extensions: Vec<String>,
}

impl Default for DiscoveryConfig {
    fn default() -> Self {
        let owned = |items: &[&str]| items.iter().map(|s| s.to_string()).collect();
        Self {
            max_file_bytes: 10 * 1024 * 1024,
            ignored_dirs: owned(&[
                "node_modules", ".git", ".svn", ".hg", "__pycache__", ".pytest_cache",
                ".mypy_cache", ".coverage", "dist", "build", "target", "out", "bin",
                ".venv", "venv", "env", ".env", ".idea", ".vscode", ".vs", "logs",
                "temp", "tmp", STATE_DIR,
            ]),
            library_dirs: owned(&[
                "node_modules", "site-packages", "dist-packages", "vendor",
                "third_party", "external", ".cargo", ".gem", ".npm",
            ]),
            ignored_extensions: owned(&[
                "pyc", "pyo", "pyd", "so", "dll", "dylib", "class", "jar", "war", "ear",
                "o", "obj", "lib", "a", "tmp", "temp", "log", "cache", "mp4", "avi",
                "mov", "wmv", "flv", "webm", "mkv", "mp3", "wav", "flac", "aac", "ogg",
                "wma", "jpg", "jpeg", "png", "gif", "bmp", "tiff", "svg", "webp", "pdf",
                "doc", "docx", "xls", "xlsx", "ppt", "pptx", "zip", "rar", "7z", "tar",
                "gz", "bz2", "exe", "msi", "dmg", "deb", "rpm", "iso", "img", "bin", "cue",
            ]),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GraphConfig {
    /// Depth used by neighborhood queries when the caller gives none.
    pub default_depth: usize,
    /// Length of the most-imported / most-dependent lists in stats.
    pub top_n: usize,
}

impl Default for GraphConfig {
    fn default() -> Self {
        Self { default_depth: 2, top_n: 5 }
    }
}

/// Limits for the instant-lookup fingerprint index.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct IndexConfig {
    pub max_file_bytes: u64,
    pub min_line_chars: usize,
    pub max_results: usize,
}

impl Default for IndexConfig {
    fn default() -> Self {
        Self {
            max_file_bytes: 500 * 1024,
            min_line_chars: 10,
            max_results: 5,
        }
    }
}

/// Parameters of the sliding-window matcher and the context strings built from it.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct MatcherConfig {
    pub max_file_bytes: u64,
    pub min_window: usize,
    pub max_window: usize,
    pub window_step: usize,
    pub threshold: f64,
    pub max_results: usize,
    pub truncate_chars: usize,
}

impl Default for MatcherConfig {
    fn default() -> Self {
        Self {
            max_file_bytes: 1024 * 1024,
            min_window: 10,
            max_window: 100,
            window_step: 5,
            threshold: 0.2,
            max_results: 3,
            truncate_chars: 2000,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DaemonConfig {
    pub debounce_ms: u64,
}

impl Default for DaemonConfig {
    fn default() -> Self {
        Self { debounce_ms: 200 }
    }
}

impl Config {
    /// Path of the config file for a project root.
    pub fn path_for(root: &Path) -> PathBuf {
        root.join(STATE_DIR).join("config.toml")
    }

    /// Load `<root>/.lumen/config.toml`, falling back to defaults when it is absent.
    pub fn load(root: &Path) -> Result<Self> {
        let path = Self::path_for(root);
        if !path.is_file() {
            debug!(path = %path.display(), "no config file, using defaults");
            return Ok(Self::default());
        }
        let text = fs::read_to_string(&path)?;
        Self::from_toml_str(&text)
    }

    pub fn from_toml_str(text: &str) -> Result<Self> {
        Ok(toml::from_str(text)?)
    }
}
