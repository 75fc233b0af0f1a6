use super::pathway::{SelectedNode, select_pathway_nodes};
use crate::error::Result;
use crate::sheet::Sheet;
use crate::storage::PositionLedger;
use pathnet_engine::engine::{PathwayGraph, find_cycle};
use pathnet_engine::layout::{LayoutParams, LayoutStrategy, Placement, arrange};
use serde::Serialize;
use std::collections::HashSet;
use tracing::{debug, info};

/// Planned positions for one pathway.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct PathwayLayout {
    pub pathway: String,
    pub placements: Vec<Placement>,
    /// Cycle the layout was built around.
    pub cycle: Option<Vec<String>>,
    /// Nodes the ledger says are already positioned.
    pub skipped: Vec<SelectedNode>,
    /// Ledger ids of the placed nodes.
    #[serde(skip)]
    pub placed_ids: Vec<String>,
}

/// Graph of the selected nodes. Every selected node is present, linked or
/// not; an edge is kept when both ends are selected.
fn pathway_graph(selected: &[SelectedNode], edges: &[(String, String)]) -> PathwayGraph {
    let names: HashSet<&str> = selected.iter().map(|n| n.name.as_str()).collect();
    let mut graph = PathwayGraph::new();
    for node in selected {
        graph.add_node(&node.name);
    }
    for (source, target) in edges {
        if names.contains(target.as_str()) && names.contains(source.as_str()) {
            graph.add_edge(source, target);
        }
    }
    graph
}

/// Lay out the `k`-th pathway. Its centre is `params.origin` shifted `k`
/// times by `params.pathway_offset`.
pub fn plan_pathway_layout(
    nodes: &Sheet,
    edges: &[(String, String)],
    pathway: &str,
    k: usize,
    ledger: &PositionLedger,
    strategy: LayoutStrategy,
    params: &LayoutParams,
) -> Result<PathwayLayout> {
    let selection = select_pathway_nodes(nodes, pathway, ledger)?;
    let graph = pathway_graph(&selection.nodes, edges);
    let center = params.origin.offset(params.pathway_offset, k);
    let outcome = arrange(&graph, strategy, center, params);

    if outcome.cycle.is_none() && strategy == LayoutStrategy::Tree {
        if let Some(path) = find_cycle(&graph) {
            debug!(pathway, ?path, "loop shorter than min_cycle_len ignored");
        }
    }

    info!(
        pathway,
        placed = outcome.placements.len(),
        skipped = selection.skipped.len(),
        edges = graph.edge_count(),
        "planned pathway layout"
    );
    Ok(PathwayLayout {
        pathway: pathway.trim().to_string(),
        placements: outcome.placements,
        cycle: outcome.cycle,
        skipped: selection.skipped,
        placed_ids: selection.nodes.into_iter().map(|n| n.id).collect(),
    })
}

/// Lay out every pathway column left to right. A node placed for one
/// pathway is skipped by later ones. `ledger` itself is not changed; the
/// caller appends the returned `placed_ids`.
pub fn plan_all_pathways(
    nodes: &Sheet,
    edges: &[(String, String)],
    ledger: &PositionLedger,
    strategy: LayoutStrategy,
    params: &LayoutParams,
) -> Result<Vec<PathwayLayout>> {
    let mut seen = ledger.clone();
    let mut layouts = Vec::new();
    for (k, column) in nodes.pathway_columns().into_iter().enumerate() {
        let layout = plan_pathway_layout(nodes, edges, &column.name, k, &seen, strategy, params)?;
        for id in &layout.placed_ids {
            seen.remember(id);
        }
        layouts.push(layout);
    }
    Ok(layouts)
}
