use super::Sheet;
use pathnet_engine::engine::Cell;
use std::collections::BTreeSet;

impl Sheet {
    /// Delete data rows by index. Out-of-range and repeated indices are
    /// ignored. Returns the number of rows removed.
    pub fn remove_rows<I>(&mut self, indices: I) -> usize
    where
        I: IntoIterator<Item = usize>,
    {
        let doomed: BTreeSet<usize> = indices.into_iter().filter(|i| *i < self.len()).collect();
        if doomed.is_empty() {
            return 0;
        }
        let mut idx = 0;
        self.rows.retain(|_| {
            let keep = !doomed.contains(&idx);
            idx += 1;
            keep
        });
        self.modified = true;
        doomed.len()
    }

    /// Append a row whose first cell is `value` and whose other cells are
    /// empty. Returns the new row's index.
    pub fn append_row_with_first(&mut self, value: &str) -> usize {
        let width = self.width().max(1);
        let mut row = vec![Cell::new_empty(); width];
        row[0] = Cell::from_input(value);
        if self.header.is_empty() {
            self.header.push(String::new());
        }
        self.rows.push(row);
        self.modified = true;
        self.rows.len() - 1
    }

    /// Put rows in the order given by `order`, a permutation of row
    /// indices. Returns false (and changes nothing) for anything else.
    pub fn reorder(&mut self, order: &[usize]) -> bool {
        if order.len() != self.len() {
            return false;
        }
        let mut seen = vec![false; order.len()];
        for &i in order {
            if i >= seen.len() || seen[i] {
                return false;
            }
            seen[i] = true;
        }
        if order.iter().enumerate().all(|(pos, &i)| pos == i) {
            return true;
        }
        let mut old: Vec<Option<Vec<Cell>>> = std::mem::take(&mut self.rows)
            .into_iter()
            .map(Some)
            .collect();
        self.rows = order.iter().filter_map(|&i| old[i].take()).collect();
        self.modified = true;
        true
    }

    /// Add a column at the right, every row holding `fill`. Returns its
    /// index.
    pub fn add_column(&mut self, header: &str, fill: Cell) -> usize {
        self.header.push(header.to_string());
        for row in &mut self.rows {
            row.push(fill.clone());
        }
        self.modified = true;
        self.header.len() - 1
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ids(sheet: &Sheet) -> Vec<String> {
        sheet.column(0).map(|c| c.display()).collect()
    }

    fn sheet_of(values: &[&str]) -> Sheet {
        Sheet::new(
            vec!["id".into(), "TYPE".into()],
            values.iter().map(|v| vec![Cell::from_input(v)]).collect(),
        )
    }

    #[test]
    fn test_remove_rows() {
        let mut sheet = sheet_of(&["a", "b", "c", "d"]);
        assert_eq!(sheet.remove_rows([3, 1, 1, 9]), 2);
        assert_eq!(ids(&sheet), vec!["a", "c"]);
        assert!(sheet.modified);
    }

    #[test]
    fn test_remove_nothing_keeps_unmodified() {
        let mut sheet = sheet_of(&["a"]);
        assert_eq!(sheet.remove_rows(Vec::new()), 0);
        assert!(!sheet.modified);
    }

    #[test]
    fn test_append_row_with_first() {
        let mut sheet = sheet_of(&["a"]);
        let idx = sheet.append_row_with_first("pyruvate");
        assert_eq!(idx, 1);
        assert_eq!(sheet.rows[1].len(), 2);
        assert_eq!(sheet.rows[1][0].display(), "pyruvate");
        assert!(sheet.rows[1][1].is_blank());
    }

    #[test]
    fn test_reorder_rejects_non_permutation() {
        let mut sheet = sheet_of(&["a", "b", "c"]);
        assert!(!sheet.reorder(&[0, 0, 1]));
        assert!(!sheet.reorder(&[0, 1]));
        assert!(sheet.reorder(&[2, 0, 1]));
        assert_eq!(ids(&sheet), vec!["c", "a", "b"]);
    }

    #[test]
    fn test_add_column_fills_rows() {
        let mut sheet = sheet_of(&["a", "b"]);
        let col = sheet.add_column("Pathway:urea", Cell::new_number(0.0));
        assert_eq!(col, 2);
        assert_eq!(sheet.width(), 3);
        assert!(sheet.cell(1, 2).unwrap().is_zero());
    }
}
