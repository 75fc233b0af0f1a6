//! Repeated node ids and duplicate edge rows.

use crate::error::Result;
use crate::sheet::Sheet;
use std::collections::HashMap;

/// One repeated occurrence of a first-column value.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Repeat {
    pub value: String,
    /// Data row index
    pub row: usize,
    /// Spreadsheet row number
    pub row_number: usize,
    /// 2 for the second occurrence, 3 for the third, ...
    pub occurrence: usize,
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct RepeatReport {
    /// Every occurrence after the first, in row order
    pub repeats: Vec<Repeat>,
    /// Values seen more than once with their total count, in order of
    /// first appearance
    pub counts: Vec<(String, usize)>,
}

impl RepeatReport {
    pub fn is_clean(&self) -> bool {
        self.repeats.is_empty()
    }
}

/// Node ids that appear more than once in the first column. Blank cells
/// are skipped.
pub fn first_column_repeats(sheet: &Sheet) -> Result<RepeatReport> {
    sheet.require_width(1)?;

    let mut seen: HashMap<String, usize> = HashMap::new();
    let mut first_order: Vec<String> = Vec::new();
    let mut report = RepeatReport::default();

    for (row, cell) in sheet.column(0).enumerate() {
        if cell.is_blank() {
            continue;
        }
        let value = cell.as_key();
        let count = seen.entry(value.clone()).or_insert(0);
        *count += 1;
        if *count == 1 {
            first_order.push(value);
        } else {
            report.repeats.push(Repeat {
                value,
                row,
                row_number: sheet.row_number(row),
                occurrence: *count,
            });
        }
    }

    report.counts = first_order
        .into_iter()
        .filter_map(|v| {
            let n = seen[&v];
            (n > 1).then_some((v, n))
        })
        .collect();
    Ok(report)
}

/// Rows sharing the same values in the key columns.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DuplicateGroup {
    /// Display text of the key cells
    pub key: Vec<String>,
    /// Data row indices, ascending
    pub rows: Vec<usize>,
}

impl DuplicateGroup {
    /// The row reported and removed: the highest-numbered one.
    pub fn duplicate(&self) -> usize {
        self.rows.last().copied().unwrap_or(0)
    }
}

/// Groups of rows whose first `key_cols` cells are equal, in order of
/// first appearance. Rows whose key cells are all blank are ignored.
pub fn duplicate_groups(sheet: &Sheet, key_cols: usize) -> Result<Vec<DuplicateGroup>> {
    let key_cols = key_cols.max(1);
    sheet.require_width(key_cols)?;
    if sheet.len() < 2 {
        return Ok(Vec::new());
    }

    let mut index: HashMap<Vec<String>, usize> = HashMap::new();
    let mut groups: Vec<DuplicateGroup> = Vec::new();
    for (row, cells) in sheet.rows.iter().enumerate() {
        let key: Vec<String> = cells[..key_cols].iter().map(|c| c.as_key()).collect();
        if key.iter().all(String::is_empty) {
            continue;
        }
        match index.get(&key) {
            Some(&g) => groups[g].rows.push(row),
            None => {
                index.insert(key.clone(), groups.len());
                groups.push(DuplicateGroup {
                    key,
                    rows: vec![row],
                });
            }
        }
    }
    groups.retain(|g| g.rows.len() > 1);
    Ok(groups)
}

/// Remove the highest-numbered row of each group. Returns rows removed.
pub fn remove_duplicates(sheet: &mut Sheet, groups: &[DuplicateGroup]) -> usize {
    sheet.remove_rows(groups.iter().map(DuplicateGroup::duplicate))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::PathnetError;

    fn edges(csv: &str) -> Sheet {
        Sheet::from_csv_str(csv, true).unwrap()
    }

    #[test]
    fn test_two_rows_with_same_pair_form_one_group() {
        let sheet = edges("SOURCE,TARGET,relationship\nA,B,reaction\nB,C,reaction\nA,B,inhibit\n");
        let groups = duplicate_groups(&sheet, 2).unwrap();
        assert_eq!(groups.len(), 1);
        assert_eq!(groups[0].key, vec!["A", "B"]);
        assert_eq!(groups[0].rows, vec![0, 2]);
        assert_eq!(sheet.row_number(groups[0].duplicate()), 4);
    }

    #[test]
    fn test_three_key_columns_distinguish_relationship() {
        let sheet = edges("SOURCE,TARGET,relationship\nA,B,reaction\nA,B,inhibit\n");
        assert!(duplicate_groups(&sheet, 3).unwrap().is_empty());
        assert!(matches!(
            duplicate_groups(&sheet, 4),
            Err(PathnetError::TooFewColumns { needed: 4, found: 3 })
        ));
    }

    #[test]
    fn test_single_row_has_no_groups() {
        let sheet = edges("SOURCE,TARGET\nA,B\n");
        assert!(duplicate_groups(&sheet, 2).unwrap().is_empty());
    }

    #[test]
    fn test_remove_highest_of_each_group() {
        let mut sheet = edges("S,T\nA,B\nA,B\nC,D\nA,B\nC,D\n");
        let groups = duplicate_groups(&sheet, 2).unwrap();
        assert_eq!(remove_duplicates(&mut sheet, &groups), 2);
        let left: Vec<String> = sheet.column(1).map(|c| c.display()).collect();
        assert_eq!(left, vec!["B", "B", "D"]);
    }

    #[test]
    fn test_first_column_repeats_from_second_occurrence() {
        let sheet = edges("name\nATP\nADP\n\nATP\nATP\nADP\n");
        let report = first_column_repeats(&sheet).unwrap();
        let rows: Vec<(String, usize, usize)> = report
            .repeats
            .iter()
            .map(|r| (r.value.clone(), r.row_number, r.occurrence))
            .collect();
        // the blank line is row 4 and is skipped
        assert_eq!(
            rows,
            vec![
                ("ATP".to_string(), 5, 2),
                ("ATP".to_string(), 6, 3),
                ("ADP".to_string(), 7, 2),
            ]
        );
        assert_eq!(
            report.counts,
            vec![("ATP".to_string(), 3), ("ADP".to_string(), 2)]
        );
    }

    #[test]
    fn test_blank_ids_are_not_repeats() {
        let sheet = edges("name,TYPE\n,enzyme\n,enzyme\nx,common\n");
        assert!(first_column_repeats(&sheet).unwrap().is_clean());
    }
}
