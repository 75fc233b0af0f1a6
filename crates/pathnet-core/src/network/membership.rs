//! Derive `Pathway:` indicator columns of the node table from the pathway
//! column of the edge table.

use crate::error::Result;
use crate::hygiene::id_key;
use crate::sheet::Sheet;
use pathnet_engine::engine::Cell;
use std::collections::HashMap;
use tracing::{info, warn};

/// Column of the edge table naming the pathway of each edge.
const EDGE_PATHWAY_COL: usize = 3;

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct MembershipReport {
    /// Pathway names found in the edge table, in order of appearance.
    pub pathways: Vec<String>,
    /// Headers of the columns that had to be added.
    pub added_columns: Vec<String>,
    /// Node cells set to 1 that were not 1 before.
    pub marked: usize,
    /// Edge endpoints with no node row, first occurrence only.
    pub unknown: Vec<String>,
}

/// Set `Pathway:<p>` to 1 on both endpoints of every edge whose fourth
/// column names pathway `p`. Missing pathway columns are added, filled
/// with 0, using the colon style of the table's existing pathway columns.
/// Existing 1s are kept.
pub fn mark_pathway_membership(nodes: &mut Sheet, edges: &Sheet) -> Result<MembershipReport> {
    nodes.require_width(1)?;
    edges.require_width(EDGE_PATHWAY_COL + 1)?;

    let prefix = nodes.pathway_prefix();
    let mut report = MembershipReport::default();
    let mut columns: HashMap<String, usize> = HashMap::new();
    for row in &edges.rows {
        let pathway = row[EDGE_PATHWAY_COL].as_key();
        if pathway.is_empty() || columns.contains_key(&pathway) {
            continue;
        }
        let col = match nodes.pathway_column(&pathway) {
            Some(existing) => existing.index,
            None => {
                let header = format!("{}{}", prefix, pathway);
                report.added_columns.push(header.clone());
                nodes.add_column(&header, Cell::new_number(0.0))
            }
        };
        columns.insert(pathway.clone(), col);
        report.pathways.push(pathway);
    }

    let mut rows_by_id: HashMap<String, Vec<usize>> = HashMap::new();
    for (row, cell) in nodes.column(0).enumerate() {
        if !cell.is_blank() {
            rows_by_id.entry(id_key(cell)).or_default().push(row);
        }
    }

    let one = Cell::new_number(1.0);
    for row in &edges.rows {
        let Some(&col) = columns.get(&row[EDGE_PATHWAY_COL].as_key()) else {
            continue;
        };
        for end in &row[..2] {
            if end.is_blank() {
                continue;
            }
            match rows_by_id.get(&id_key(end)) {
                Some(node_rows) => {
                    for &r in node_rows {
                        let already = nodes.cell(r, col).is_some_and(|c| c.matches_literal("1"));
                        if !already && nodes.set_cell(r, col, one.clone()) {
                            report.marked += 1;
                        }
                    }
                }
                None => {
                    let id = end.as_key();
                    if !report.unknown.contains(&id) {
                        warn!(node = %id, "edge endpoint not in node table");
                        report.unknown.push(id);
                    }
                }
            }
        }
    }

    info!(
        pathways = report.pathways.len(),
        added = report.added_columns.len(),
        marked = report.marked,
        "marked pathway membership"
    );
    Ok(report)
}
