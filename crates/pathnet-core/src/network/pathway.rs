use crate::error::{PathnetError, Result};
use crate::sheet::Sheet;
use crate::storage::PositionLedger;
use serde::Serialize;

/// A node row chosen for a pathway.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct SelectedNode {
    /// Ledger id: the `SUID` cell, else the first cell
    pub id: String,
    /// Graph name: the `name` cell, else the first cell
    pub name: String,
}

/// Nodes of one pathway, split by whether the ledger already holds them.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Selection {
    pub nodes: Vec<SelectedNode>,
    pub skipped: Vec<SelectedNode>,
}

/// Rows whose `Pathway:<pathway>` cell is 1.
pub fn select_pathway_nodes(
    nodes: &Sheet,
    pathway: &str,
    ledger: &PositionLedger,
) -> Result<Selection> {
    let column = nodes
        .pathway_column(pathway)
        .ok_or_else(|| PathnetError::MissingColumn(format!("Pathway:{}", pathway.trim())))?;
    let id_col = nodes.column_index("SUID").unwrap_or(0);
    let name_col = nodes.column_index("name").unwrap_or(0);

    let mut selection = Selection::default();
    for row in &nodes.rows {
        if !row.get(column.index).is_some_and(|c| c.matches_literal("1")) {
            continue;
        }
        let id = row.get(id_col).map(|c| c.as_key()).unwrap_or_default();
        let name = row.get(name_col).map(|c| c.as_key()).unwrap_or_default();
        if id.is_empty() || name.is_empty() {
            continue;
        }
        let node = SelectedNode { id, name };
        if ledger.contains(&node.id) {
            selection.skipped.push(node);
        } else {
            selection.nodes.push(node);
        }
    }
    Ok(selection)
}

const SOURCE_NAMES: [&str; 4] = ["source", "Source", "FROM", "from"];
const TARGET_NAMES: [&str; 4] = ["target", "Target", "TO", "to"];

/// Source and target columns of an edge table.
fn endpoint_columns(edges: &Sheet) -> Result<(usize, usize)> {
    let exact = |name: &str| edges.header.iter().position(|h| h.trim() == name);

    if let (Some(s), Some(t)) = (exact("SOURCE"), exact("TARGET")) {
        return Ok((s, t));
    }
    let source = SOURCE_NAMES.iter().find_map(|n| exact(n));
    let target = TARGET_NAMES.iter().find_map(|n| exact(n));
    if let (Some(s), Some(t)) = (source, target) {
        return Ok((s, t));
    }
    if let (Some(s), Some(t)) = (exact("shared name"), exact("name")) {
        return Ok((s, t));
    }
    edges.require_width(2)?;
    Ok((0, 1))
}

/// (source, target) of every edge row with both ends filled in.
pub fn edge_pairs(edges: &Sheet) -> Result<Vec<(String, String)>> {
    let (source, target) = endpoint_columns(edges)?;
    Ok(edges
        .rows
        .iter()
        .filter_map(|row| {
            let s = row.get(source)?.as_key();
            let t = row.get(target)?.as_key();
            (!s.is_empty() && !t.is_empty()).then_some((s, t))
        })
        .collect())
}
