//! Dependency graph storage: explicit forward and reverse adjacency.
//!
//! Nodes are file paths interned to dense indices in insertion order. Edges are
//! unweighted and deduplicated; self-loops and cycles are allowed.

use std::collections::{BTreeSet, HashMap};
use std::path::{Path, PathBuf};

pub type NodeId = usize;

#[derive(Debug, Clone, Default)]
pub struct DependencyGraph {
    nodes: Vec<PathBuf>,
    index: HashMap<PathBuf, NodeId>,
    successors: Vec<BTreeSet<NodeId>>,
    predecessors: Vec<BTreeSet<NodeId>>,
    edge_count: usize,
}

impl DependencyGraph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a node, returning its id. Adding an existing path is a no-op.
    pub fn add_node(&mut self, path: &Path) -> NodeId {
        if let Some(&id) = self.index.get(path) {
            return id;
        }
        let id = self.nodes.len();
        self.nodes.push(path.to_path_buf());
        self.index.insert(path.to_path_buf(), id);
        self.successors.push(BTreeSet::new());
        self.predecessors.push(BTreeSet::new());
        id
    }

    /// Add `source → target`, creating either endpoint if needed.
    /// Returns false when the edge already existed.
    pub fn add_edge(&mut self, source: &Path, target: &Path) -> bool {
        let s = self.add_node(source);
        let t = self.add_node(target);
        if !self.successors[s].insert(t) {
            return false;
        }
        self.predecessors[t].insert(s);
        self.edge_count += 1;
        true
    }

    pub fn clear(&mut self) {
        *self = Self::default();
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn edge_count(&self) -> usize {
        self.edge_count
    }

    pub fn contains(&self, path: &Path) -> bool {
        self.index.contains_key(path)
    }

    pub fn id_of(&self, path: &Path) -> Option<NodeId> {
        self.index.get(path).copied()
    }

    pub fn path_of(&self, id: NodeId) -> &Path {
        &self.nodes[id]
    }

    /// Node paths in insertion order.
    pub fn nodes(&self) -> impl Iterator<Item = &Path> {
        self.nodes.iter().map(PathBuf::as_path)
    }

    /// All edges as `(source, target)` paths, grouped by source in insertion order.
    pub fn edges(&self) -> impl Iterator<Item = (&Path, &Path)> {
        self.successors.iter().enumerate().flat_map(move |(s, targets)| {
            targets
                .iter()
                .map(move |&t| (self.nodes[s].as_path(), self.nodes[t].as_path()))
        })
    }

    pub fn successors(&self, id: NodeId) -> &BTreeSet<NodeId> {
        &self.successors[id]
    }

    pub fn predecessors(&self, id: NodeId) -> &BTreeSet<NodeId> {
        &self.predecessors[id]
    }

    pub fn in_degree(&self, id: NodeId) -> usize {
        self.predecessors[id].len()
    }

    pub fn out_degree(&self, id: NodeId) -> usize {
        self.successors[id].len()
    }

    pub fn has_edge(&self, source: &Path, target: &Path) -> bool {
        match (self.id_of(source), self.id_of(target)) {
            (Some(s), Some(t)) => self.successors[s].contains(&t),
            _ => false,
        }
    }

    /// Nodes with neither incoming nor outgoing edges.
    pub fn isolates(&self) -> impl Iterator<Item = NodeId> + '_ {
        (0..self.nodes.len()).filter(move |&id| self.in_degree(id) == 0 && self.out_degree(id) == 0)
    }
}
