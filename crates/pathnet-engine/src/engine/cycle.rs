//! Cycle search in pathway graphs.
//!
//! Metabolic pathways such as the citric acid cycle close on themselves; the
//! layouts place the longest such loop on a circle and hang everything else
//! off it. Two notions of "cycle" are used:
//!
//! - [`largest_directed_cycle`] follows reaction direction. Strongly
//!   connected components narrow the search, then a bounded depth-first
//!   enumeration of simple cycles picks the longest.
//! - [`cycle_basis`] ignores direction and returns one cycle per independent
//!   loop of a spanning forest.
//!
//! [`detect_cycle`] and [`find_cycle`] answer the narrower question "is there
//! a loop at all?" and report a concrete path, in time linear in the graph.

use petgraph::algo::tarjan_scc;
use petgraph::graph::NodeIndex;
use petgraph::Direction;
use std::collections::{HashMap, HashSet};

use super::graph::PathwayGraph;

/// Bounds for simple-cycle enumeration.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CycleLimits {
    /// Stop after this many cycles have been found.
    pub max_cycles: usize,
    /// Stop after this many DFS steps.
    pub max_steps: usize,
}

impl Default for CycleLimits {
    fn default() -> Self {
        CycleLimits {
            max_cycles: 20_000,
            max_steps: 2_000_000,
        }
    }
}

/// Find the longest directed simple cycle with at least three nodes.
/// Returns node names in cycle order, or None if there is no such cycle.
pub fn largest_directed_cycle(graph: &PathwayGraph, limits: CycleLimits) -> Option<Vec<String>> {
    let sccs = tarjan_scc(graph.inner());
    let mut largest: Option<Vec<NodeIndex>> = None;
    for scc in sccs {
        if largest.as_ref().is_none_or(|l| scc.len() > l.len()) {
            largest = Some(scc);
        }
    }
    let mut members = largest?;
    if members.len() < 3 {
        return None;
    }
    members.sort();
    let in_scc: HashSet<NodeIndex> = members.iter().copied().collect();

    let mut search = CycleSearch {
        graph,
        in_scc: &in_scc,
        limits,
        found: 0,
        steps: 0,
        best: Vec::new(),
    };
    for &start in &members {
        let mut path = vec![start];
        let mut on_path = HashSet::from([start]);
        search.dfs(start, start, &mut path, &mut on_path);
        if search.exhausted() {
            break;
        }
    }

    if search.best.len() >= 3 {
        Some(search.best.iter().map(|idx| graph.name(*idx).to_string()).collect())
    } else {
        None
    }
}

struct CycleSearch<'a> {
    graph: &'a PathwayGraph,
    in_scc: &'a HashSet<NodeIndex>,
    limits: CycleLimits,
    found: usize,
    steps: usize,
    best: Vec<NodeIndex>,
}

impl CycleSearch<'_> {
    fn exhausted(&self) -> bool {
        self.found >= self.limits.max_cycles || self.steps >= self.limits.max_steps
    }

    /// Each cycle is enumerated once, from its lowest-index node.
    fn dfs(
        &mut self,
        start: NodeIndex,
        current: NodeIndex,
        path: &mut Vec<NodeIndex>,
        on_path: &mut HashSet<NodeIndex>,
    ) {
        for next in self.graph.directed_indices(current, Direction::Outgoing) {
            if self.exhausted() {
                return;
            }
            self.steps += 1;
            if !self.in_scc.contains(&next) {
                continue;
            }
            if next == start {
                if path.len() >= 3 {
                    self.found += 1;
                    if path.len() > self.best.len() {
                        self.best = path.clone();
                    }
                }
                continue;
            }
            if next < start || on_path.contains(&next) {
                continue;
            }
            path.push(next);
            on_path.insert(next);
            self.dfs(start, next, path, on_path);
            path.pop();
            on_path.remove(&next);
        }
    }
}

/// Detect a directed cycle reachable from `start`.
/// Returns Some(cycle_path) if a cycle is found, None otherwise. The last
/// entry repeats the node where the path closes.
pub fn detect_cycle(start: &str, graph: &PathwayGraph) -> Option<Vec<String>> {
    let start = graph.index_of(start.trim())?;
    let mut walk = CycleWalk::default();
    walk.visit(start, graph).then(|| walk.names(graph))
}

/// First directed cycle of any length, trying roots in insertion order.
/// Each node is expanded at most once over the whole search.
pub fn find_cycle(graph: &PathwayGraph) -> Option<Vec<String>> {
    let mut walk = CycleWalk::default();
    for root in graph.inner().node_indices() {
        if walk.visit(root, graph) {
            return Some(walk.names(graph));
        }
    }
    None
}

/// Three-colour DFS: nodes on `path` are in `visiting`, fully explored
/// nodes are in `done` and never walked again.
#[derive(Default)]
struct CycleWalk {
    visiting: HashSet<NodeIndex>,
    done: HashSet<NodeIndex>,
    path: Vec<NodeIndex>,
}

impl CycleWalk {
    fn visit(&mut self, current: NodeIndex, graph: &PathwayGraph) -> bool {
        if self.visiting.contains(&current) {
            self.path.push(current);
            return true;
        }
        if self.done.contains(&current) {
            return false;
        }

        self.visiting.insert(current);
        self.path.push(current);

        for next in graph.directed_indices(current, Direction::Outgoing) {
            if self.visit(next, graph) {
                return true;
            }
        }

        self.path.pop();
        self.visiting.remove(&current);
        self.done.insert(current);
        false
    }

    fn names(&self, graph: &PathwayGraph) -> Vec<String> {
        self.path.iter().map(|idx| graph.name(*idx).to_string()).collect()
    }
}

/// Undirected cycle basis. Roots are taken in node insertion order so the
/// result is deterministic. Self-loops appear as one-node cycles.
pub fn cycle_basis(graph: &PathwayGraph) -> Vec<Vec<String>> {
    let g = graph.inner();
    let node_limit = g.node_count() + 1;
    let mut covered: HashSet<NodeIndex> = HashSet::new();
    let mut cycles: Vec<Vec<NodeIndex>> = Vec::new();

    for root in g.node_indices() {
        if covered.contains(&root) {
            continue;
        }
        let mut stack = vec![root];
        let mut pred: HashMap<NodeIndex, NodeIndex> = HashMap::from([(root, root)]);
        let mut used: HashMap<NodeIndex, HashSet<NodeIndex>> =
            HashMap::from([(root, HashSet::new())]);

        while let Some(z) = stack.pop() {
            for nbr in graph.undirected_indices(z) {
                if !used.contains_key(&nbr) {
                    pred.insert(nbr, z);
                    stack.push(nbr);
                    used.insert(nbr, HashSet::from([z]));
                } else if nbr == z {
                    cycles.push(vec![z]);
                } else if !used.get(&z).is_some_and(|zu| zu.contains(&nbr)) {
                    let pn = used.get(&nbr).cloned().unwrap_or_default();
                    let mut cycle = vec![nbr, z];
                    let mut p = pred[&z];
                    let mut steps = 0;
                    while !pn.contains(&p) && steps < node_limit {
                        cycle.push(p);
                        p = pred[&p];
                        steps += 1;
                    }
                    if steps < node_limit {
                        cycle.push(p);
                        cycles.push(cycle);
                    }
                    if let Some(nu) = used.get_mut(&nbr) {
                        nu.insert(z);
                    }
                }
            }
        }
        covered.extend(pred.keys().copied());
    }

    cycles
        .into_iter()
        .map(|c| c.into_iter().map(|idx| graph.name(idx).to_string()).collect())
        .collect()
}

/// Longest cycle of the undirected basis; the first one wins ties.
pub fn largest_basis_cycle(graph: &PathwayGraph) -> Option<Vec<String>> {
    let mut best: Option<Vec<String>> = None;
    for cycle in cycle_basis(graph) {
        if best.as_ref().is_none_or(|b| cycle.len() > b.len()) {
            best = Some(cycle);
        }
    }
    best
}
