//! Session: the engines for one active project, owned explicitly.
//!
//! Each engine sits behind its own lock. A rebuild constructs fresh engines
//! without holding any lock and swaps them in afterwards, so a lookup sees
//! either the old structures or the new ones, never a half-built index. Only
//! one rebuild may run at a time; a second request is rejected.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, RwLock};
use std::thread::{self, JoinHandle};
use std::time::Instant;
use tracing::{info, warn};

use crate::config::Config;
use crate::error::{LumenError, Result};
use crate::graph::{DependencyAnalyzer, DependencySet, GraphExport, GraphStats, GraphView};
use crate::matcher::{IndexStats, InstantMatcher, MatchCandidate};
use crate::project::Project;
use crate::query::{ContextDecision, ContextEngine, SummaryMap};

/// What a rebuild produced.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BuildReport {
    pub project: String,
    pub files: usize,
    pub dependencies: usize,
    pub indexed_files: usize,
    pub elapsed_ms: u64,
}

pub struct Session {
    config: Config,
    project: RwLock<Option<Project>>,
    analyzer: RwLock<DependencyAnalyzer>,
    instant: RwLock<InstantMatcher>,
    context: Mutex<ContextEngine>,
    summaries: RwLock<SummaryMap>,
    building: AtomicBool,
}

/// Clears the build flag when the build ends, including by panic.
struct BuildGuard<'a>(&'a AtomicBool);

impl Drop for BuildGuard<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

impl Session {
    pub fn new(config: Config) -> Self {
        Self {
            analyzer: RwLock::new(DependencyAnalyzer::with_config(config.graph.clone())),
            instant: RwLock::new(InstantMatcher::new(config.index.clone())),
            context: Mutex::new(ContextEngine::new(config.matcher.clone())),
            project: RwLock::new(None),
            summaries: RwLock::new(SummaryMap::new()),
            building: AtomicBool::new(false),
            config,
        }
    }

    /// Load `<root>/.lumen/config.toml`, link the project at `root` and build it.
    pub fn open(root: &Path, name: Option<&str>) -> Result<Self> {
        let config = Config::load(root)?;
        let name = match name {
            Some(name) => name.to_string(),
            None => Project::default_name(&root.canonicalize().unwrap_or_else(|_| root.to_path_buf())),
        };
        let project = Project::link(&name, root, &config.discovery)?;
        let session = Self::new(config);
        session.activate(project)?;
        Ok(session)
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Make `project` the active one and rebuild everything for it.
    ///
    /// Fails with [`LumenError::BuildInProgress`] and leaves the session
    /// untouched if another build is running.
    pub fn activate(&self, project: Project) -> Result<BuildReport> {
        let _guard = self.begin_build()?;
        info!(project = %project.name, files = project.files.len(), "activating project");
        *self.project.write()? = Some(project);
        self.summaries.write()?.clear();
        self.context.lock()?.invalidate();
        self.build_and_swap()
    }

    /// Drop the active project and every structure built for it.
    pub fn deactivate(&self) -> Result<()> {
        *self.project.write()? = None;
        *self.analyzer.write()? = DependencyAnalyzer::with_config(self.config.graph.clone());
        self.instant.write()?.refresh_if_needed(None);
        self.context.lock()?.invalidate();
        self.summaries.write()?.clear();
        Ok(())
    }

    pub fn active_project(&self) -> Result<Option<Project>> {
        Ok(self.project.read()?.clone())
    }

    pub fn is_building(&self) -> bool {
        self.building.load(Ordering::Acquire)
    }

    /// Rebuild graph and instant index for the active project from scratch.
    pub fn rebuild(&self) -> Result<BuildReport> {
        let _guard = self.begin_build()?;
        self.build_and_swap()
    }

    fn begin_build(&self) -> Result<BuildGuard<'_>> {
        self.building
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .map_err(|_| LumenError::BuildInProgress)?;
        Ok(BuildGuard(&self.building))
    }

    /// Caller holds the build flag.
    fn build_and_swap(&self) -> Result<BuildReport> {
        let project = self.project.read()?.clone().ok_or(LumenError::NoActiveProject)?;
        let start = Instant::now();

        let mut analyzer = DependencyAnalyzer::with_config(self.config.graph.clone());
        analyzer.analyze_project(&project.root, &project.files);
        let mut instant = InstantMatcher::new(self.config.index.clone());
        let indexed_files = instant.build(&project.name, &project.files);

        let report = BuildReport {
            project: project.name.clone(),
            files: analyzer.graph().node_count(),
            dependencies: analyzer.graph().edge_count(),
            indexed_files,
            elapsed_ms: start.elapsed().as_millis() as u64,
        };

        *self.analyzer.write()? = analyzer;
        *self.instant.write()? = instant;
        self.context.lock()?.invalidate();

        info!(
            project = %report.project,
            files = report.files,
            dependencies = report.dependencies,
            elapsed_ms = report.elapsed_ms,
            "session rebuilt"
        );
        Ok(report)
    }

    /// Re-run file discovery for the active project, then rebuild.
    pub fn refresh(&self) -> Result<BuildReport> {
        let _guard = self.begin_build()?;
        {
            let mut active = self.project.write()?;
            let project = active.as_mut().ok_or(LumenError::NoActiveProject)?;
            project.rediscover(&self.config.discovery);
        }
        self.build_and_swap()
    }

    /// Run [`Session::rebuild`] on a background thread.
    pub fn spawn_rebuild(self: &Arc<Self>) -> JoinHandle<Result<BuildReport>> {
        let session = Arc::clone(self);
        thread::spawn(move || {
            let result = session.rebuild();
            if let Err(e) = &result {
                warn!(error = %e, "background rebuild failed");
            }
            result
        })
    }

    /// Replace the summaries used by context decisions. Relative keys are
    /// taken from the project root.
    pub fn set_summaries(&self, summaries: SummaryMap) -> Result<()> {
        let resolved = summaries
            .into_iter()
            .map(|(path, summary)| Ok((self.resolve_path(&path)?, summary)))
            .collect::<Result<SummaryMap>>()?;
        *self.summaries.write()? = resolved;
        Ok(())
    }

    // ─── Lookups ───────────────────────────────────────────────

    pub fn detect(&self, text: &str) -> Result<Vec<MatchCandidate>> {
        let project = self.project.read()?;
        let active = project.as_ref().map(|p| p.name.as_str());
        Ok(self.instant.read()?.detect(text, active))
    }

    pub fn decide_context(&self, message: &str, full_context: bool) -> Result<ContextDecision> {
        let project = self.project.read()?.clone();
        let summaries = self.summaries.read()?;
        let mut context = self.context.lock()?;
        Ok(context.decide(message, full_context, project.as_ref(), &summaries))
    }

    pub fn graph_export(&self) -> Result<GraphExport> {
        Ok(self.analyzer.read()?.export_graph_data())
    }

    pub fn focused_graph(&self, center: &Path, depth: Option<usize>) -> Result<GraphView> {
        let depth = depth.unwrap_or(self.config.graph.default_depth);
        let center = self.resolve_path(center)?;
        Ok(self.analyzer.read()?.focused_graph_data(&center, depth))
    }

    pub fn dependencies_of(&self, file: &Path, depth: Option<usize>) -> Result<DependencySet> {
        let depth = depth.unwrap_or(self.config.graph.default_depth);
        let file = self.resolve_path(file)?;
        Ok(self.analyzer.read()?.dependencies_of(&file, depth))
    }

    pub fn stats(&self) -> Result<GraphStats> {
        Ok(self.analyzer.read()?.stats())
    }

    pub fn cycles(&self) -> Result<Vec<Vec<PathBuf>>> {
        Ok(self.analyzer.read()?.find_cycles())
    }

    pub fn index_stats(&self) -> Result<IndexStats> {
        let project = self.project.read()?;
        let active = project.as_ref().map(|p| p.name.as_str());
        Ok(self.instant.read()?.stats(active))
    }

    /// Relative paths are taken from the project root.
    fn resolve_path(&self, path: &Path) -> Result<PathBuf> {
        if path.is_absolute() {
            return Ok(crate::graph::resolver::absolutize(path));
        }
        let project = self.project.read()?;
        let root = project.as_ref().map(|p| p.root.as_path()).ok_or(LumenError::NoActiveProject)?;
        Ok(crate::graph::resolver::absolutize(&root.join(path)))
    }
}
