//! Zero/blank normalization of pathway indicator tables.
//!
//! Only the bounding box of the data is touched: from the first to the last
//! row that has any non-blank cell, and likewise for columns. Trailing
//! padding of ragged rows therefore stays blank. An explicit [`CellRange`]
//! replaces the box; the header row is never changed.

use crate::sheet::Sheet;
use pathnet_engine::engine::{Cell, CellRange, CellRef};
use std::ops::RangeInclusive;

/// Row and column ranges of the non-blank data, or `None` when every cell
/// is blank.
pub fn data_bounds(sheet: &Sheet) -> Option<(RangeInclusive<usize>, RangeInclusive<usize>)> {
    let mut rows: Option<(usize, usize)> = None;
    let mut cols: Option<(usize, usize)> = None;
    for (r, row) in sheet.rows.iter().enumerate() {
        for (c, cell) in row.iter().enumerate() {
            if cell.is_blank() {
                continue;
            }
            rows = Some(rows.map_or((r, r), |(lo, hi)| (lo.min(r), hi.max(r))));
            cols = Some(cols.map_or((c, c), |(lo, hi)| (lo.min(c), hi.max(c))));
        }
    }
    Some((rows.map(|(a, b)| a..=b)?, cols.map(|(a, b)| a..=b)?))
}

/// Data-row and column ranges to work on: `region` clipped to the table,
/// or the data box when no region is given.
fn target_box(
    sheet: &Sheet,
    region: Option<&CellRange>,
) -> Option<(RangeInclusive<usize>, RangeInclusive<usize>)> {
    let Some(region) = region else {
        return data_bounds(sheet);
    };
    let header = usize::from(sheet.has_header);
    let last_row = sheet.rows.len().checked_sub(1)?;
    let last_col = sheet.width().checked_sub(1)?;
    let last_wanted = region.end.row.checked_sub(header)?.min(last_row);
    let rows = region.start.row.saturating_sub(header)..=last_wanted;
    let cols = region.start.col..=region.end.col.min(last_col);
    (!rows.is_empty() && !cols.is_empty()).then_some((rows, cols))
}

fn cell_ref(sheet: &Sheet, row: usize, col: usize) -> CellRef {
    CellRef::new(col, sheet.row_number(row) - 1)
}

/// Blank every cell in the data box (or `region`) that matches one of
/// `values`. Returns the changed cells as spreadsheet references.
pub fn zeros_to_blank(
    sheet: &mut Sheet,
    values: &[String],
    region: Option<&CellRange>,
) -> Vec<CellRef> {
    let Some((rows, cols)) = target_box(sheet, region) else {
        return Vec::new();
    };
    let mut changed = Vec::new();
    for r in rows {
        for c in cols.clone() {
            let hit = sheet
                .cell(r, c)
                .is_some_and(|cell| !cell.is_blank() && values.iter().any(|v| cell.matches_literal(v)));
            if hit && sheet.set_cell(r, c, Cell::new_empty()) {
                changed.push(cell_ref(sheet, r, c));
            }
        }
    }
    changed
}

/// Fill every blank cell in the data box (or `region`) with `fill`.
pub fn blanks_to_value(sheet: &mut Sheet, fill: &str, region: Option<&CellRange>) -> Vec<CellRef> {
    let Some((rows, cols)) = target_box(sheet, region) else {
        return Vec::new();
    };
    let value = Cell::from_input(fill);
    if value.is_blank() {
        return Vec::new();
    }
    let mut changed = Vec::new();
    for r in rows {
        for c in cols.clone() {
            let blank = sheet.cell(r, c).is_some_and(Cell::is_blank);
            if blank && sheet.set_cell(r, c, value.clone()) {
                changed.push(cell_ref(sheet, r, c));
            }
        }
    }
    changed
}
