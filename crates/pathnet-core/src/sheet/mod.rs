//! Table state and logic.

mod io;
mod ops;
mod state;

pub use state::{PATHWAY_PREFIXES, PathwayColumn, Sheet};
