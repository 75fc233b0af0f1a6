//! pathnet-core - Table model, storage, hygiene operations and layout planning.

pub mod error;
pub mod hygiene;
pub mod network;
pub mod sheet;
pub mod storage;

pub use error::{PathnetError, Result};
pub use sheet::Sheet;

pub use pathnet_engine::engine::CellRef;
