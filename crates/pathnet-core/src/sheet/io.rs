use super::Sheet;
use crate::error::{PathnetError, Result};
use crate::storage::csv::{parse_csv_content, parse_csv_field, to_csv_string};
use crate::storage::{RetryPolicy, write_with_retry};
use std::path::{Path, PathBuf};
use tracing::debug;

const MAX_TABLE_BYTES: u64 = 256 * 1_048_576; // 256 MiB

fn read_table_file(path: &Path) -> Result<String> {
    let meta = std::fs::metadata(path)?;
    if meta.len() > MAX_TABLE_BYTES {
        return Err(PathnetError::Io(std::io::Error::new(
            std::io::ErrorKind::InvalidData,
            format!(
                "Refusing to read {}: table too large ({} bytes, max {})",
                path.display(),
                meta.len(),
                MAX_TABLE_BYTES
            ),
        )));
    }
    Ok(std::fs::read_to_string(path)?)
}

impl Sheet {
    /// Parse CSV text. With `has_header` the first record names the columns.
    pub fn from_csv_str(content: &str, has_header: bool) -> Result<Sheet> {
        let parsed = parse_csv_content(content)?;
        let mut records = parsed.records.into_iter();

        let header = if has_header {
            records.next().ok_or(PathnetError::EmptySheet)?
        } else {
            Vec::new()
        };
        let rows = records
            .map(|record| record.iter().map(|f| parse_csv_field(f)).collect())
            .collect();

        let mut sheet = if has_header {
            Sheet::new(header, rows)
        } else {
            Sheet::without_header(rows)
        };
        if sheet.width() == 0 {
            return Err(PathnetError::EmptySheet);
        }
        sheet.bom = parsed.had_bom;
        Ok(sheet)
    }

    /// Load a table from a CSV file.
    pub fn load(path: &Path, has_header: bool) -> Result<Sheet> {
        let content = read_table_file(path)?;
        let mut sheet = Sheet::from_csv_str(&content, has_header)?;
        sheet.path = Some(path.to_path_buf());
        debug!(
            path = %path.display(),
            rows = sheet.len(),
            cols = sheet.width(),
            "loaded table"
        );
        Ok(sheet)
    }

    /// CSV text for the table as it would be saved. Cell text is written
    /// verbatim so an in-place rewrite only changes what an operation changed.
    pub fn to_csv_string(&self) -> String {
        let header = self.has_header.then_some(self.header.as_slice());
        to_csv_string(header, &self.rows, self.bom)
    }

    /// Save to the file the table was loaded from.
    /// Returns the path saved to.
    pub fn save(&mut self, retry: &RetryPolicy) -> Result<PathBuf> {
        let Some(path) = self.path.clone() else {
            return Err(PathnetError::NoFilePath);
        };
        self.save_as(&path, retry)?;
        Ok(path)
    }

    /// Save to `path` and make it the table's file.
    pub fn save_as(&mut self, path: &Path, retry: &RetryPolicy) -> Result<()> {
        write_with_retry(path, self.to_csv_string().as_bytes(), retry)?;
        self.path = Some(path.to_path_buf());
        self.modified = false;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pathnet_engine::engine::CellValue;

    #[test]
    fn test_header_and_rows() {
        let sheet = Sheet::from_csv_str("SUID,name,TYPE\n101,glucose,metabolite\n102,HK\n", true)
            .unwrap();
        assert_eq!(sheet.header, vec!["SUID", "name", "TYPE"]);
        assert_eq!(sheet.len(), 2);
        assert_eq!(sheet.rows[0][0].value, CellValue::Number(101.0));
        assert_eq!(sheet.rows[1][2].value, CellValue::Empty);
    }

    #[test]
    fn test_without_header_first_line_is_data() {
        let sheet = Sheet::from_csv_str("A,B\nB,C\n", false).unwrap();
        assert_eq!(sheet.len(), 2);
        assert_eq!(sheet.row_number(1), 2);
    }

    #[test]
    fn test_empty_input_is_an_error() {
        assert!(matches!(Sheet::from_csv_str("", true), Err(PathnetError::EmptySheet)));
        assert!(matches!(Sheet::from_csv_str("\n\n", false), Err(PathnetError::EmptySheet)));
    }

    #[test]
    fn test_save_round_trip_keeps_text() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nodes.csv");
        let original = "\u{feff}id,note,Pathway:glycolysis\n007,\"a, b\",1\n-ATP,1.50,\n";
        std::fs::write(&path, original).unwrap();

        let mut sheet = Sheet::load(&path, true).unwrap();
        let saved = sheet.save(&RetryPolicy::default()).unwrap();
        assert_eq!(saved, path);
        assert_eq!(std::fs::read_to_string(&path).unwrap(), original);
        assert!(!sheet.modified);
    }

    #[test]
    fn test_blank_row_keeps_its_place_on_save() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nodes.csv");
        std::fs::write(&path, "id,TYPE\nATP,common\n\nADP,common\n").unwrap();

        let mut sheet = Sheet::load(&path, true).unwrap();
        assert_eq!(sheet.len(), 3);
        assert_eq!(sheet.row_number(2), 4);
        sheet.save(&RetryPolicy::default()).unwrap();
        assert_eq!(
            std::fs::read_to_string(&path).unwrap(),
            "id,TYPE\nATP,common\n,\nADP,common\n"
        );
    }

    #[test]
    fn test_save_without_path() {
        let mut sheet = Sheet::from_csv_str("a\n1\n", true).unwrap();
        assert!(matches!(
            sheet.save(&RetryPolicy::default()),
            Err(PathnetError::NoFilePath)
        ));
    }
}
