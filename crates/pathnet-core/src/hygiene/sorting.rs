//! Canonical row order for node tables.

use crate::error::Result;
use crate::sheet::Sheet;
use pathnet_engine::engine::Cell;
use tracing::{debug, warn};

fn type_rank(cell: Option<&Cell>) -> u8 {
    match cell {
        Some(c) if c.as_key().eq_ignore_ascii_case("common") => 0,
        _ => 1,
    }
}

/// `1` sorts before `0`, which sorts before anything else.
fn pathway_rank(cell: Option<&Cell>) -> u8 {
    match cell {
        Some(c) if c.matches_literal("1") => 0,
        Some(c) if c.matches_literal("0") => 1,
        _ => 2,
    }
}

/// Sort rows so `TYPE = common` comes first, then by each pathway column
/// left to right. The sort is stable. Returns whether the order changed.
pub fn sort_by_type_and_pathways(sheet: &mut Sheet) -> Result<bool> {
    let type_col = sheet.require_column("TYPE")?;
    let pathways: Vec<usize> = sheet.pathway_columns().iter().map(|p| p.index).collect();
    if pathways.is_empty() {
        warn!("no pathway columns; sorting by TYPE only");
    }

    let keys: Vec<Vec<u8>> = sheet
        .rows
        .iter()
        .map(|row| {
            std::iter::once(type_rank(row.get(type_col)))
                .chain(pathways.iter().map(|&col| pathway_rank(row.get(col))))
                .collect()
        })
        .collect();

    let mut order: Vec<usize> = (0..sheet.len()).collect();
    order.sort_by(|&a, &b| keys[a].cmp(&keys[b]));

    let changed = order.iter().enumerate().any(|(pos, &i)| pos != i);
    if changed {
        sheet.reorder(&order);
    }
    debug!(rows = sheet.len(), pathways = pathways.len(), changed, "sorted table");
    Ok(changed)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::PathnetError;

    fn names(sheet: &Sheet) -> Vec<String> {
        sheet.column(0).map(|c| c.display()).collect()
    }

    #[test]
    fn test_common_rows_first_then_pathway_flags() {
        let mut sheet = Sheet::from_csv_str(
            "name,TYPE,Pathway:glycolysis,Pathway:TCA\n\
             e1,enzyme,0,1\n\
             c1,compound,,1\n\
             w,Common,0,0\n\
             e2,enzyme,1,\n\
             e3,enzyme,0,0\n",
            true,
        )
        .unwrap();
        assert!(sort_by_type_and_pathways(&mut sheet).unwrap());
        assert_eq!(names(&sheet), vec!["w", "e2", "e1", "e3", "c1"]);
        assert!(sheet.modified);
    }

    #[test]
    fn test_ties_keep_input_order() {
        let mut sheet = Sheet::from_csv_str(
            "name,TYPE,Pathway：urea\nb,enzyme,1\na,compound,1\nc, common ,\n",
            true,
        )
        .unwrap();
        sort_by_type_and_pathways(&mut sheet).unwrap();
        assert_eq!(names(&sheet), vec!["c", "b", "a"]);
    }

    #[test]
    fn test_already_sorted_is_unchanged() {
        let mut sheet =
            Sheet::from_csv_str("name,TYPE,Pathway:x\na,common,1\nb,enzyme,0\n", true).unwrap();
        assert!(!sort_by_type_and_pathways(&mut sheet).unwrap());
        assert!(!sheet.modified);
    }

    #[test]
    fn test_missing_type_column() {
        let mut sheet = Sheet::from_csv_str("name,kind\na,common\n", true).unwrap();
        assert!(matches!(
            sort_by_type_and_pathways(&mut sheet),
            Err(PathnetError::MissingColumn(c)) if c == "TYPE"
        ));
    }
}
