//! Table hygiene: the checks and fixes run on node and edge tables before
//! they are loaded into a network viewer.
//!
//! - [`duplicates`] - repeated node ids and duplicate edges
//! - [`reconcile`] - ids present in one table but not the other
//! - [`sorting`] - canonical row order for node tables
//! - [`normalize`] - zero/blank normalization of indicator cells

pub mod duplicates;
pub mod normalize;
pub mod reconcile;
pub mod sorting;

pub use duplicates::{
    DuplicateGroup, Repeat, RepeatReport, duplicate_groups, first_column_repeats,
    remove_duplicates,
};
pub use normalize::{blanks_to_value, data_bounds, zeros_to_blank};
pub use reconcile::{
    append_missing_nodes, edge_ids_missing_from_nodes, node_ids_missing_from_edges,
    prune_orphan_nodes,
};
pub use sorting::sort_by_type_and_pathways;

use pathnet_engine::engine::Cell;

/// Comparison key for ids across tables: trimmed, lowercased.
pub(crate) fn id_key(cell: &Cell) -> String {
    cell.as_key().to_lowercase()
}
