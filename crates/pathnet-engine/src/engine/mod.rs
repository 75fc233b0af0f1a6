//! Pathnet engine API.
//!
//! - [`Cell`], [`CellValue`] - Table cell values
//! - [`CellRef`], [`CellRange`] - A1 references and ranges ↔ row/col indices
//! - [`PathwayGraph`] - Directed graph of pathway nodes
//! - [`largest_directed_cycle`], [`cycle_basis`], [`detect_cycle`], [`find_cycle`] - Cycle search
//! - [`format_number`] - Format coordinates for plan files

mod cell;
mod cell_ref;
mod cycle;
mod format;
mod graph;

pub use cell::{Cell, CellValue};
pub use cell_ref::{CellRange, CellRef};
pub use cycle::{
    CycleLimits, cycle_basis, detect_cycle, find_cycle, largest_basis_cycle,
    largest_directed_cycle,
};
pub use format::format_number;
pub use graph::PathwayGraph;
