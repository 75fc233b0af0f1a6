use crate::error::{PathnetError, Result};
use pathnet_engine::engine::Cell;
use std::path::PathBuf;

/// Header prefixes that mark a pathway indicator column. The full-width
/// colon is common in tables edited with CJK input methods.
pub const PATHWAY_PREFIXES: [&str; 2] = ["Pathway:", "Pathway："];

/// A `Pathway:` indicator column.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PathwayColumn {
    pub index: usize,
    /// Header text after the prefix, trimmed.
    pub name: String,
    /// Full header text.
    pub header: String,
}

/// A node or edge table held in memory.
#[derive(Clone, Debug, Default)]
pub struct Sheet {
    /// Column names; empty strings when the table has no header line
    pub header: Vec<String>,
    /// Data rows, each padded to the header width
    pub rows: Vec<Vec<Cell>>,
    /// Whether the first line of the file is a header
    pub has_header: bool,
    /// File the table was loaded from
    pub path: Option<PathBuf>,
    /// Whether rows have changed since loading or saving
    pub modified: bool,
    /// The file started with a UTF-8 byte-order mark
    pub(crate) bom: bool,
}

impl Sheet {
    /// Create a table with a header line.
    pub fn new(header: Vec<String>, rows: Vec<Vec<Cell>>) -> Self {
        let mut sheet = Sheet {
            header,
            rows,
            has_header: true,
            ..Self::default()
        };
        sheet.pad_rows();
        sheet
    }

    /// Create a table whose first line is data.
    pub fn without_header(rows: Vec<Vec<Cell>>) -> Self {
        let mut sheet = Sheet {
            rows,
            has_header: false,
            ..Self::default()
        };
        sheet.pad_rows();
        sheet
    }

    /// Make every row, and the header, as wide as the widest row.
    pub(crate) fn pad_rows(&mut self) {
        let width = self
            .rows
            .iter()
            .map(Vec::len)
            .max()
            .unwrap_or(0)
            .max(self.header.len());
        self.header.resize(width, String::new());
        for row in &mut self.rows {
            row.resize(width, Cell::new_empty());
        }
    }

    pub fn width(&self) -> usize {
        self.header.len()
    }

    /// Number of data rows.
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// File name for messages, or "(unsaved)".
    pub fn display_name(&self) -> String {
        self.path
            .as_ref()
            .and_then(|p| p.file_name())
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "(unsaved)".to_string())
    }

    /// 1-based row number as a spreadsheet shows it, counting the header.
    pub fn row_number(&self, idx: usize) -> usize {
        idx + 1 + usize::from(self.has_header)
    }

    pub fn cell(&self, row: usize, col: usize) -> Option<&Cell> {
        self.rows.get(row).and_then(|r| r.get(col))
    }

    /// Replace a cell. Returns false when out of range.
    pub fn set_cell(&mut self, row: usize, col: usize, cell: Cell) -> bool {
        match self.rows.get_mut(row).and_then(|r| r.get_mut(col)) {
            Some(slot) => {
                if *slot != cell {
                    *slot = cell;
                    self.modified = true;
                }
                true
            }
            None => false,
        }
    }

    /// Cells of one column, top to bottom.
    pub fn column(&self, col: usize) -> impl Iterator<Item = &Cell> + '_ {
        self.rows.iter().filter_map(move |r| r.get(col))
    }

    /// Index of the column whose header equals `name` (trimmed); an exact
    /// match wins over a case-insensitive one.
    pub fn column_index(&self, name: &str) -> Option<usize> {
        let name = name.trim();
        self.header
            .iter()
            .position(|h| h.trim() == name)
            .or_else(|| self.header.iter().position(|h| h.trim().eq_ignore_ascii_case(name)))
    }

    /// Like [`Sheet::column_index`] but an error when absent.
    pub fn require_column(&self, name: &str) -> Result<usize> {
        self.column_index(name)
            .ok_or_else(|| PathnetError::MissingColumn(name.to_string()))
    }

    /// First of `names` that is a column.
    pub fn first_column_of(&self, names: &[&str]) -> Option<usize> {
        names.iter().find_map(|n| self.column_index(n))
    }

    /// Fail unless the table has at least `needed` columns.
    pub fn require_width(&self, needed: usize) -> Result<()> {
        if self.width() < needed {
            return Err(PathnetError::TooFewColumns {
                needed,
                found: self.width(),
            });
        }
        Ok(())
    }

    /// Pathway indicator columns, left to right.
    pub fn pathway_columns(&self) -> Vec<PathwayColumn> {
        self.header
            .iter()
            .enumerate()
            .filter_map(|(index, header)| {
                let trimmed = header.trim();
                PATHWAY_PREFIXES.iter().find_map(|prefix| {
                    trimmed.strip_prefix(prefix).map(|rest| PathwayColumn {
                        index,
                        name: rest.trim().to_string(),
                        header: header.clone(),
                    })
                })
            })
            .collect()
    }

    /// Prefix new pathway columns should use: the one the first existing
    /// pathway column was written with, else `Pathway:`.
    pub fn pathway_prefix(&self) -> &'static str {
        self.header
            .iter()
            .find_map(|h| PATHWAY_PREFIXES.into_iter().find(|p| h.trim().starts_with(*p)))
            .unwrap_or(PATHWAY_PREFIXES[0])
    }

    /// Find a pathway column by its name (after the prefix) or full header.
    pub fn pathway_column(&self, name: &str) -> Option<PathwayColumn> {
        let name = name.trim();
        self.pathway_columns().into_iter().find(|p| {
            p.name.eq_ignore_ascii_case(name) || p.header.trim().eq_ignore_ascii_case(name)
        })
    }
}
