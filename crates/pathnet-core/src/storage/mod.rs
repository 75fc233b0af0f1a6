//! File formats and file handling.

pub mod backup;
pub mod csv;
pub mod ledger;
pub mod md;
pub mod writer;

pub use backup::{BackupNaming, create_backup};
pub use csv::{parse_csv_content, to_csv_string};
pub use ledger::{DEFAULT_LEDGER_FILE, PositionLedger};
pub use md::write_markdown;
pub use writer::{RetryPolicy, write_text, write_with_retry};
