//! Graph queries: bounded neighborhoods, cycle enumeration, statistics and
//! the JSON export views.

use std::collections::{BTreeSet, HashMap, HashSet};
use std::path::Path;

use super::builder::DependencyAnalyzer;
use super::engine::{DependencyGraph, NodeId};
use super::types::{
    DependencySet, EdgeExport, FocusedGraphExport, GraphExport, GraphStats, GraphView, NodeExport,
};
use crate::parser::Language;

#[derive(Clone, Copy)]
enum Direction {
    Forward,
    Backward,
}

impl DependencyAnalyzer {
    /// Files reachable within `depth` hops along imports, and along reverse
    /// imports. The file itself is never part of either set.
    pub fn dependencies_of(&self, file: &Path, depth: usize) -> DependencySet {
        let graph = self.graph();
        let Some(start) = graph.id_of(file) else {
            return DependencySet::default();
        };
        let collect = |dir| {
            bounded_bfs(graph, start, depth, dir)
                .into_iter()
                .filter(|&id| id != start)
                .map(|id| graph.path_of(id).to_path_buf())
                .collect()
        };
        DependencySet {
            dependencies: collect(Direction::Forward),
            dependents: collect(Direction::Backward),
        }
    }

    /// Every elementary cycle, each as the list of files along it.
    ///
    /// Runs Johnson's algorithm, which is output-sensitive: dense graphs with
    /// many overlapping cycles can take a long time.
    pub fn find_cycles(&self) -> Vec<Vec<std::path::PathBuf>> {
        let graph = self.graph();
        simple_cycles(graph)
            .into_iter()
            .map(|cycle| cycle.into_iter().map(|id| graph.path_of(id).to_path_buf()).collect())
            .collect()
    }

    pub fn stats(&self) -> GraphStats {
        let graph = self.graph();
        let top_n = self.config.top_n;
        let top_by = |degree: &dyn Fn(NodeId) -> usize| {
            let mut ranked: Vec<NodeId> = (0..graph.node_count()).collect();
            // Stable: equal degrees keep insertion order.
            ranked.sort_by(|&a, &b| degree(b).cmp(&degree(a)));
            ranked
                .into_iter()
                .take(top_n)
                .map(|id| (file_name(graph.path_of(id)), degree(id)))
                .collect()
        };

        GraphStats {
            total_files: graph.node_count(),
            total_dependencies: graph.edge_count(),
            circular_dependencies: simple_cycles(graph).len(),
            isolated_files: graph.isolates().count(),
            most_imported: top_by(&|id| graph.in_degree(id)),
            most_dependencies: top_by(&|id| graph.out_degree(id)),
        }
    }

    pub fn export_graph_data(&self) -> GraphExport {
        let graph = self.graph();
        GraphExport {
            nodes: (0..graph.node_count()).map(|id| self.node_export(id, false)).collect(),
            edges: graph.edges().map(edge_export).collect(),
            stats: self.stats(),
        }
    }

    /// Neighborhood of `center` within `depth` hops in both directions.
    ///
    /// Falls back to the full export when `center` is not in the graph.
    pub fn focused_graph_data(&self, center: &Path, depth: usize) -> GraphView {
        let graph = self.graph();
        let Some(start) = graph.id_of(center) else {
            return GraphView::Full(self.export_graph_data());
        };

        let mut members = bounded_bfs(graph, start, depth, Direction::Forward);
        members.extend(bounded_bfs(graph, start, depth, Direction::Backward));

        let edges = graph
            .edges()
            .filter(|(s, t)| {
                let inside = |p: &Path| graph.id_of(p).is_some_and(|id| members.contains(&id));
                inside(s) && inside(t)
            })
            .map(edge_export)
            .collect();

        GraphView::Focused(FocusedGraphExport {
            nodes: members.iter().map(|&id| self.node_export(id, true)).collect(),
            edges,
            stats: self.stats(),
            center_file: path_id(center),
        })
    }

    fn node_export(&self, id: NodeId, with_imports: bool) -> NodeExport {
        let graph = self.graph();
        let path = graph.path_of(id);
        let record = self.record(path);
        NodeExport {
            id: path_id(path),
            label: file_name(path),
            language: record.map(|r| r.language).unwrap_or(Language::Unknown),
            size: record.map_or(0, |r| r.size),
            lines: record.map_or(0, |r| r.lines),
            export_count: record.map_or(0, |r| r.exports.len()),
            in_degree: graph.in_degree(id),
            out_degree: graph.out_degree(id),
            imports: with_imports.then(|| record.map(|r| r.raw_imports.clone()).unwrap_or_default()),
        }
    }
}

fn path_id(path: &Path) -> String {
    path.to_string_lossy().into_owned()
}

fn file_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path_id(path))
}

fn edge_export((source, target): (&Path, &Path)) -> EdgeExport {
    EdgeExport {
        source: path_id(source),
        target: path_id(target),
    }
}

fn neighbors(graph: &DependencyGraph, id: NodeId, dir: Direction) -> &BTreeSet<NodeId> {
    match dir {
        Direction::Forward => graph.successors(id),
        Direction::Backward => graph.predecessors(id),
    }
}

/// Level-by-level BFS, at most `depth` levels out. Includes `start`.
fn bounded_bfs(graph: &DependencyGraph, start: NodeId, depth: usize, dir: Direction) -> BTreeSet<NodeId> {
    let mut seen = BTreeSet::from([start]);
    let mut frontier = vec![start];
    for _ in 0..depth {
        let mut next = Vec::new();
        for &node in &frontier {
            for &n in neighbors(graph, node, dir) {
                if seen.insert(n) {
                    next.push(n);
                }
            }
        }
        if next.is_empty() {
            break;
        }
        frontier = next;
    }
    seen
}

// ─── Johnson's elementary circuits ──────────────────────────────────────────

/// All elementary cycles. Each cycle starts at its lowest node id, so every
/// cycle is reported exactly once.
fn simple_cycles(graph: &DependencyGraph) -> Vec<Vec<NodeId>> {
    let mut cycles = Vec::new();
    for s in 0..graph.node_count() {
        let component = component_from(graph, s);
        let succ = |n: NodeId| -> Vec<NodeId> {
            graph
                .successors(n)
                .iter()
                .copied()
                .filter(|m| component.contains(m))
                .collect()
        };
        if succ(s).is_empty() {
            continue;
        }
        circuits_from(s, &succ, &mut cycles);
    }
    cycles
}

/// Strongly connected component of `s` in the subgraph induced by ids >= `s`.
fn component_from(graph: &DependencyGraph, s: NodeId) -> HashSet<NodeId> {
    let reach = |dir| {
        let mut seen = HashSet::from([s]);
        let mut stack = vec![s];
        while let Some(n) = stack.pop() {
            for &m in neighbors(graph, n, dir) {
                if m >= s && seen.insert(m) {
                    stack.push(m);
                }
            }
        }
        seen
    };
    let forward = reach(Direction::Forward);
    let backward = reach(Direction::Backward);
    forward.intersection(&backward).copied().collect()
}

fn circuits_from(
    s: NodeId,
    succ: &dyn Fn(NodeId) -> Vec<NodeId>,
    cycles: &mut Vec<Vec<NodeId>>,
) {
    let mut blocked = HashSet::from([s]);
    let mut block_map: HashMap<NodeId, HashSet<NodeId>> = HashMap::new();
    let mut closed: HashSet<NodeId> = HashSet::new();
    let mut path = vec![s];
    let mut stack = vec![(s, succ(s))];

    while let Some(top) = stack.last_mut() {
        let this = top.0;
        if let Some(next) = top.1.pop() {
            if next == s {
                cycles.push(path.clone());
                closed.extend(path.iter().copied());
            } else if !blocked.contains(&next) {
                path.push(next);
                stack.push((next, succ(next)));
                closed.remove(&next);
                blocked.insert(next);
                continue;
            }
        }

        let exhausted = stack.last().is_some_and(|t| t.1.is_empty());
        if exhausted {
            if closed.contains(&this) {
                unblock(this, &mut blocked, &mut block_map);
            } else {
                for n in succ(this) {
                    block_map.entry(n).or_default().insert(this);
                }
            }
            stack.pop();
            path.pop();
        }
    }
}

fn unblock(node: NodeId, blocked: &mut HashSet<NodeId>, block_map: &mut HashMap<NodeId, HashSet<NodeId>>) {
    let mut pending = vec![node];
    while let Some(n) = pending.pop() {
        if blocked.remove(&n) {
            if let Some(waiting) = block_map.remove(&n) {
                pending.extend(waiting);
            }
        }
    }
}
