//! Project model: a named root directory plus its discovered user files.

pub mod discovery;

use chrono::{DateTime, Local, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt::Write as _;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::info;

use crate::config::DiscoveryConfig;
use crate::error::{LumenError, Result};

pub use discovery::{discover_user_files, is_user_file};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Project {
    pub name: String,
    pub root: PathBuf,
    pub files: Vec<PathBuf>,
    pub linked_at: DateTime<Utc>,
}

impl Project {
    /// Link a project directory: canonicalize the root and discover its files.
    pub fn link(name: &str, root: &Path, config: &DiscoveryConfig) -> Result<Self> {
        if !root.exists() {
            return Err(LumenError::ProjectNotFound(root.to_path_buf()));
        }
        if !root.is_dir() {
            return Err(LumenError::NotADirectory(root.to_path_buf()));
        }
        let root = fs::canonicalize(root)?;
        let files = discover_user_files(&root, config);
        info!(project = name, root = %root.display(), files = files.len(), "project linked");
        Ok(Self {
            name: name.to_string(),
            root,
            files,
            linked_at: Utc::now(),
        })
    }

    /// A project over an explicit file list; nothing is discovered.
    pub fn with_files(name: &str, root: &Path, files: Vec<PathBuf>) -> Self {
        Self {
            name: name.to_string(),
            root: root.to_path_buf(),
            files,
            linked_at: Utc::now(),
        }
    }

    /// Re-run discovery, picking up created and deleted files.
    pub fn rediscover(&mut self, config: &DiscoveryConfig) {
        self.files = discover_user_files(&self.root, config);
    }

    /// Default project name: the root directory's name.
    pub fn default_name(root: &Path) -> String {
        root.file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "project".to_string())
    }

    /// Plain-text overview: header lines, then files grouped by directory.
    pub fn structure_summary(&self) -> String {
        let mut tree: BTreeMap<String, Vec<String>> = BTreeMap::new();
        for file in &self.files {
            let relative = file.strip_prefix(&self.root).unwrap_or(file);
            let dir = relative
                .parent()
                .map(|p| p.to_string_lossy().into_owned())
                .unwrap_or_default();
            let name = relative
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_default();
            tree.entry(dir).or_default().push(name);
        }

        let linked = self.linked_at.with_timezone(&Local).format("%a %b %e %H:%M:%S %Y");
        let mut out = String::new();
        let _ = writeln!(out, "Project: {}", self.name);
        let _ = writeln!(out, "Path: {}", self.root.display());
        let _ = writeln!(out, "Files: {}", self.files.len());
        let _ = writeln!(out, "Linked: {linked}\n");
        out.push_str("File Structure:\n");
        for (dir, mut names) in tree {
            if dir.is_empty() {
                out.push_str("Root:\n");
            } else {
                let _ = writeln!(out, "{dir}/:");
            }
            names.sort();
            for name in names {
                let _ = writeln!(out, "  - {name}");
            }
            out.push('\n');
        }
        out
    }
}
