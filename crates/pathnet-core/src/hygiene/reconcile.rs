//! Cross-checks between the node table's id column and the id columns of
//! the edge table.
//!
//! Ids are compared trimmed and case-insensitively. Results keep the
//! trimmed text of the first occurrence.

use super::id_key;
use crate::error::Result;
use crate::sheet::Sheet;
use std::collections::HashSet;
use tracing::debug;

/// Unique non-blank ids in first-appearance order.
#[derive(Default)]
struct IdSet {
    keys: HashSet<String>,
    ids: Vec<String>,
}

impl IdSet {
    fn extend<'a>(&mut self, cells: impl Iterator<Item = &'a pathnet_engine::engine::Cell>) {
        for cell in cells {
            if cell.is_blank() {
                continue;
            }
            if self.keys.insert(id_key(cell)) {
                self.ids.push(cell.as_key());
            }
        }
    }

    fn contains_key(&self, key: &str) -> bool {
        self.keys.contains(key)
    }
}

fn node_ids(nodes: &Sheet) -> Result<IdSet> {
    nodes.require_width(1)?;
    let mut set = IdSet::default();
    set.extend(nodes.column(0));
    Ok(set)
}

/// Sources first, then targets.
fn edge_ids(edges: &Sheet) -> Result<IdSet> {
    edges.require_width(2)?;
    let mut set = IdSet::default();
    set.extend(edges.column(0));
    set.extend(edges.column(1));
    Ok(set)
}

/// Node ids that never appear as a source or target.
pub fn node_ids_missing_from_edges(nodes: &Sheet, edges: &Sheet) -> Result<Vec<String>> {
    let edge_set = edge_ids(edges)?;
    let node_set = node_ids(nodes)?;
    Ok(node_set
        .ids
        .into_iter()
        .filter(|id| !edge_set.contains_key(&id.to_lowercase()))
        .collect())
}

/// Edge endpoints with no row in the node table.
pub fn edge_ids_missing_from_nodes(nodes: &Sheet, edges: &Sheet) -> Result<Vec<String>> {
    let node_set = node_ids(nodes)?;
    let edge_set = edge_ids(edges)?;
    Ok(edge_set
        .ids
        .into_iter()
        .filter(|id| !node_set.contains_key(&id.to_lowercase()))
        .collect())
}

/// Delete node rows whose id is blank or is not an edge endpoint.
/// Returns `(row_number, id)` of each removed row, numbered as before the
/// removal.
pub fn prune_orphan_nodes(nodes: &mut Sheet, edges: &Sheet) -> Result<Vec<(usize, String)>> {
    nodes.require_width(1)?;
    let edge_set = edge_ids(edges)?;

    let mut removed = Vec::new();
    let mut indices = Vec::new();
    for (row, cell) in nodes.column(0).enumerate() {
        if cell.is_blank() || !edge_set.contains_key(&id_key(cell)) {
            removed.push((nodes.row_number(row), cell.as_key()));
            indices.push(row);
        }
    }
    nodes.remove_rows(indices);
    debug!(count = removed.len(), "pruned orphan nodes");
    Ok(removed)
}

/// Append a node row for every edge endpoint missing from the node table.
pub fn append_missing_nodes(nodes: &mut Sheet, edges: &Sheet) -> Result<Vec<String>> {
    let missing = edge_ids_missing_from_nodes(nodes, edges)?;
    for id in &missing {
        nodes.append_row_with_first(id);
    }
    debug!(count = missing.len(), "appended missing nodes");
    Ok(missing)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::PathnetError;

    fn sheet(csv: &str) -> Sheet {
        Sheet::from_csv_str(csv, true).unwrap()
    }

    #[test]
    fn test_set_difference_both_directions() {
        let nodes = sheet("name,TYPE\nA,common\nB,enzyme\nC,compound\n");
        let edges = sheet("SOURCE,TARGET\nB,C\nC,D\n");
        assert_eq!(node_ids_missing_from_edges(&nodes, &edges).unwrap(), vec!["A"]);
        assert_eq!(edge_ids_missing_from_nodes(&nodes, &edges).unwrap(), vec!["D"]);
    }

    #[test]
    fn test_comparison_ignores_case_and_spaces() {
        let nodes = sheet("name\n\" ATP \"\nNADH\n");
        let edges = sheet("SOURCE,TARGET\natp,nadh\n");
        assert!(node_ids_missing_from_edges(&nodes, &edges).unwrap().is_empty());
        assert!(edge_ids_missing_from_nodes(&nodes, &edges).unwrap().is_empty());
    }

    #[test]
    fn test_edge_values_are_column_major_and_unique() {
        let nodes = sheet("name\nX\n");
        let edges = sheet("SOURCE,TARGET\nA,T1\nB,T2\nA,t1\n");
        assert_eq!(
            edge_ids_missing_from_nodes(&nodes, &edges).unwrap(),
            vec!["A", "B", "T1", "T2"]
        );
    }

    #[test]
    fn test_edge_table_needs_two_columns() {
        let nodes = sheet("name\nX\n");
        let edges = sheet("SOURCE\nX\n");
        assert!(matches!(
            node_ids_missing_from_edges(&nodes, &edges),
            Err(PathnetError::TooFewColumns { needed: 2, found: 1 })
        ));
    }

    #[test]
    fn test_prune_removes_blank_and_orphan_rows() {
        let mut nodes = sheet("name,TYPE\nA,common\n,enzyme\nB,compound\n");
        let edges = sheet("SOURCE,TARGET\nB,C\n");
        let removed = prune_orphan_nodes(&mut nodes, &edges).unwrap();
        assert_eq!(removed, vec![(2, "A".to_string()), (3, String::new())]);
        assert_eq!(nodes.len(), 1);
        assert!(nodes.modified);
    }

    #[test]
    fn test_append_missing_nodes() {
        let mut nodes = sheet("name,TYPE\nB,enzyme\n");
        let edges = sheet("SOURCE,TARGET\nB,C\nD,b\n");
        let added = append_missing_nodes(&mut nodes, &edges).unwrap();
        assert_eq!(added, vec!["D", "C"]);
        assert_eq!(nodes.len(), 3);
        assert_eq!(nodes.cell(1, 0).unwrap().display(), "D");
        assert!(nodes.cell(1, 1).unwrap().is_blank());
    }
}
