//! Directed pathway graph keyed by node name.
//!
//! Nodes keep insertion order and neighbour lists are returned in edge
//! insertion order, so every layout computed from a graph is reproducible
//! for the same input tables.

use petgraph::Direction;
use petgraph::graph::{DiGraph, NodeIndex};
use petgraph::visit::EdgeRef;
use std::collections::{HashMap, HashSet};

/// A directed graph of metabolites/enzymes connected by reactions.
#[derive(Clone, Debug, Default)]
pub struct PathwayGraph {
    graph: DiGraph<String, ()>,
    index: HashMap<String, NodeIndex>,
}

impl PathwayGraph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a graph from (source, target) pairs.
    pub fn from_edges<'a, I>(edges: I) -> Self
    where
        I: IntoIterator<Item = (&'a str, &'a str)>,
    {
        let mut graph = Self::new();
        for (source, target) in edges {
            graph.add_edge(source, target);
        }
        graph
    }

    /// Add a node by name. Blank names are ignored.
    pub fn add_node(&mut self, name: &str) -> Option<NodeIndex> {
        let name = name.trim();
        if name.is_empty() {
            return None;
        }
        if let Some(idx) = self.index.get(name) {
            return Some(*idx);
        }
        let idx = self.graph.add_node(name.to_string());
        self.index.insert(name.to_string(), idx);
        Some(idx)
    }

    /// Add a directed edge. Returns false when an endpoint is blank or the
    /// edge already exists.
    pub fn add_edge(&mut self, source: &str, target: &str) -> bool {
        let (Some(a), Some(b)) = (self.add_node(source), self.add_node(target)) else {
            return false;
        };
        if self.graph.find_edge(a, b).is_some() {
            return false;
        }
        self.graph.add_edge(a, b, ());
        true
    }

    pub fn node_count(&self) -> usize {
        self.graph.node_count()
    }

    pub fn edge_count(&self) -> usize {
        self.graph.edge_count()
    }

    pub fn is_empty(&self) -> bool {
        self.graph.node_count() == 0
    }

    pub fn contains(&self, name: &str) -> bool {
        self.index.contains_key(name.trim())
    }

    pub fn has_edge(&self, source: &str, target: &str) -> bool {
        match (self.index.get(source), self.index.get(target)) {
            (Some(a), Some(b)) => self.graph.find_edge(*a, *b).is_some(),
            _ => false,
        }
    }

    /// Node names in insertion order.
    pub fn node_names(&self) -> Vec<&str> {
        self.graph
            .node_indices()
            .map(|idx| self.graph[idx].as_str())
            .collect()
    }

    pub(crate) fn index_of(&self, name: &str) -> Option<NodeIndex> {
        self.index.get(name).copied()
    }

    pub(crate) fn name(&self, idx: NodeIndex) -> &str {
        &self.graph[idx]
    }

    pub(crate) fn inner(&self) -> &DiGraph<String, ()> {
        &self.graph
    }

    pub fn in_degree(&self, name: &str) -> usize {
        self.index_of(name)
            .map(|idx| self.graph.edges_directed(idx, Direction::Incoming).count())
            .unwrap_or(0)
    }

    /// Undirected degree (in + out).
    pub fn degree(&self, name: &str) -> usize {
        self.index_of(name)
            .map(|idx| {
                self.graph.edges_directed(idx, Direction::Incoming).count()
                    + self.graph.edges_directed(idx, Direction::Outgoing).count()
            })
            .unwrap_or(0)
    }

    pub fn successors(&self, name: &str) -> Vec<&str> {
        self.index_of(name)
            .map(|idx| {
                self.directed_indices(idx, Direction::Outgoing)
                    .into_iter()
                    .map(|n| self.name(n))
                    .collect()
            })
            .unwrap_or_default()
    }

    pub fn predecessors(&self, name: &str) -> Vec<&str> {
        self.index_of(name)
            .map(|idx| {
                self.directed_indices(idx, Direction::Incoming)
                    .into_iter()
                    .map(|n| self.name(n))
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Neighbours ignoring direction, successors first, without repeats.
    pub fn neighbors_undirected(&self, name: &str) -> Vec<&str> {
        self.index_of(name)
            .map(|idx| {
                self.undirected_indices(idx)
                    .into_iter()
                    .map(|n| self.name(n))
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Endpoints in edge insertion order. petgraph walks adjacency lists
    /// newest-first, so sort by edge index.
    pub(crate) fn directed_indices(&self, idx: NodeIndex, dir: Direction) -> Vec<NodeIndex> {
        let mut edges: Vec<_> = self
            .graph
            .edges_directed(idx, dir)
            .map(|e| {
                let other = match dir {
                    Direction::Outgoing => e.target(),
                    Direction::Incoming => e.source(),
                };
                (e.id(), other)
            })
            .collect();
        edges.sort_by_key(|(id, _)| *id);
        edges.into_iter().map(|(_, n)| n).collect()
    }

    pub(crate) fn undirected_indices(&self, idx: NodeIndex) -> Vec<NodeIndex> {
        let mut seen = HashSet::new();
        self.directed_indices(idx, Direction::Outgoing)
            .into_iter()
            .chain(self.directed_indices(idx, Direction::Incoming))
            .filter(|n| seen.insert(*n))
            .collect()
    }

    /// Induced subgraph on `names`, keeping this graph's node and edge order.
    pub fn subgraph(&self, names: &HashSet<String>) -> PathwayGraph {
        let mut sub = PathwayGraph::new();
        for idx in self.graph.node_indices() {
            if names.contains(self.name(idx)) {
                sub.add_node(self.name(idx));
            }
        }
        for edge in self.graph.edge_references() {
            let (a, b) = (self.name(edge.source()), self.name(edge.target()));
            if sub.contains(a) && sub.contains(b) {
                sub.add_edge(a, b);
            }
        }
        sub
    }
}
