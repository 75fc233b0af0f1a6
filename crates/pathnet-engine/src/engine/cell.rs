//! Cell data structures for node and edge tables.
//!
//! - [`CellValue`] - The type of content in a cell (empty, text, or number)
//! - [`Cell`] - A single table cell

use serde::{Deserialize, Serialize};

/// The type of content stored in a cell.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum CellValue {
    Empty,
    Text(String),
    Number(f64),
}

/// A cell in a node or edge table.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Cell {
    pub value: CellValue,
}

impl Cell {
    pub fn new_empty() -> Cell {
        Cell {
            value: CellValue::Empty,
        }
    }

    pub fn new_text(text: &str) -> Cell {
        Cell {
            value: CellValue::Text(text.to_string()),
        }
    }

    pub fn new_number(n: f64) -> Cell {
        Cell {
            value: CellValue::Number(n),
        }
    }

    /// Parse table text and create appropriate cell type.
    /// - Empty string or whitespace -> Empty
    /// - Plain decimal that prints back unchanged -> Number
    /// - Otherwise -> Text (trimmed)
    ///
    /// "007", "1.50" and "nan" stay text so rewriting a table never alters
    /// a value the user typed.
    pub fn from_input(input: &str) -> Cell {
        let trimmed = input.trim();
        if trimmed.is_empty() {
            return Cell::new_empty();
        }
        if let Some(n) = parse_plain_number(trimmed) {
            if n.to_string() == trimmed {
                return Cell::new_number(n);
            }
        }
        Cell::new_text(trimmed)
    }

    /// True for empty cells and whitespace-only text.
    pub fn is_blank(&self) -> bool {
        match &self.value {
            CellValue::Empty => true,
            CellValue::Text(s) => s.trim().is_empty(),
            CellValue::Number(_) => false,
        }
    }

    /// True for zero however it was written ("0", "0.0", "-0").
    pub fn is_zero(&self) -> bool {
        match &self.value {
            CellValue::Number(n) => *n == 0.0,
            CellValue::Text(s) => parse_plain_number(s.trim()) == Some(0.0),
            CellValue::Empty => false,
        }
    }

    /// Display text as it would be written back to a table.
    pub fn display(&self) -> String {
        match &self.value {
            CellValue::Empty => String::new(),
            CellValue::Text(s) => s.clone(),
            CellValue::Number(n) => n.to_string(),
        }
    }

    /// Trimmed display text, used when comparing cells across tables.
    pub fn as_key(&self) -> String {
        self.display().trim().to_string()
    }

    /// True when the cell matches `literal`: numerically when both sides
    /// are numbers, by trimmed text otherwise.
    pub fn matches_literal(&self, literal: &str) -> bool {
        let literal = literal.trim();
        match &self.value {
            CellValue::Empty => literal.is_empty(),
            CellValue::Number(n) => parse_plain_number(literal) == Some(*n),
            CellValue::Text(s) => {
                let s = s.trim();
                match (parse_plain_number(s), parse_plain_number(literal)) {
                    (Some(a), Some(b)) => a == b,
                    _ => s == literal,
                }
            }
        }
    }
}

/// Decimal numbers only: optional sign, digits, optional fraction and
/// exponent. Rejects "inf", "NaN" and hex, which `f64::from_str` would
/// partly accept.
fn parse_plain_number(s: &str) -> Option<f64> {
    let body = s.strip_prefix(['+', '-']).unwrap_or(s);
    if !body.starts_with(|c: char| c.is_ascii_digit() || c == '.') {
        return None;
    }
    if !body
        .chars()
        .all(|c| c.is_ascii_digit() || matches!(c, '.' | 'e' | 'E' | '+' | '-'))
    {
        return None;
    }
    s.parse::<f64>().ok().filter(|n| n.is_finite())
}

impl Default for Cell {
    fn default() -> Self {
        Cell::new_empty()
    }
}
