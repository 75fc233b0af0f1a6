//! Ledger of nodes that already have a position.
//!
//! Pathways share nodes. Once a node has been placed by one pathway's
//! layout, later pathways leave it where it is. The ledger is a plain text
//! file with one node id per line so it can be inspected and edited by hand.

use crate::error::Result;
use std::collections::HashSet;
use std::fs::OpenOptions;
use std::io::Write;
use std::path::{Path, PathBuf};

pub const DEFAULT_LEDGER_FILE: &str = "positioned_nodes.txt";

#[derive(Clone, Debug, Default)]
pub struct PositionLedger {
    path: Option<PathBuf>,
    ids: HashSet<String>,
    order: Vec<String>,
    /// The file does not end in a newline yet.
    unterminated: bool,
}

impl PositionLedger {
    /// An in-memory ledger with nothing recorded.
    pub fn new() -> Self {
        Self::default()
    }

    /// Read the ledger at `path`. A missing file is an empty ledger.
    pub fn load(path: &Path) -> Result<Self> {
        let mut ledger = PositionLedger {
            path: Some(path.to_path_buf()),
            ..Self::default()
        };
        match std::fs::read_to_string(path) {
            Ok(content) => {
                ledger.unterminated = !content.is_empty() && !content.ends_with('\n');
                for line in content.lines() {
                    ledger.remember(line);
                }
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
            Err(e) => return Err(e.into()),
        }
        Ok(ledger)
    }

    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    pub fn contains(&self, id: &str) -> bool {
        self.ids.contains(id.trim())
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// Ids in the order they were recorded.
    pub fn ids(&self) -> &[String] {
        &self.order
    }

    /// Record an id in memory. False when it is blank or already known.
    pub fn remember<S: AsRef<str>>(&mut self, id: S) -> bool {
        let id = id.as_ref().trim();
        if id.is_empty() || self.ids.contains(id) {
            return false;
        }
        self.ids.insert(id.to_string());
        self.order.push(id.to_string());
        true
    }

    /// Record ids and append the new ones to the ledger file.
    pub fn append<I, S>(&mut self, ids: I) -> Result<usize>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let fresh: Vec<String> = ids
            .into_iter()
            .filter_map(|id| {
                let id = id.as_ref().trim().to_string();
                self.remember(&id).then_some(id)
            })
            .collect();
        if let Some(path) = &self.path {
            if !fresh.is_empty() {
                let mut file = OpenOptions::new().create(true).append(true).open(path)?;
                if self.unterminated {
                    writeln!(file)?;
                    self.unterminated = false;
                }
                for id in &fresh {
                    writeln!(file, "{}", id)?;
                }
            }
        }
        Ok(fresh.len())
    }

    /// Forget every id and truncate the ledger file.
    pub fn reset(&mut self) -> Result<()> {
        self.ids.clear();
        self.order.clear();
        self.unterminated = false;
        if let Some(path) = &self.path {
            if path.exists() {
                std::fs::write(path, "")?;
            }
        }
        Ok(())
    }
}
