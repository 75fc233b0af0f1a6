//! Markdown export functionality

use crate::sheet::Sheet;
use pathnet_engine::engine::CellRef;
use std::io::Write;
use std::path::Path;

/// Write the table to a markdown file
pub fn write_markdown(path: &Path, sheet: &Sheet) -> std::io::Result<()> {
    let mut file = std::fs::File::create(path)?;
    render_markdown(&mut file, sheet)
}

/// Render the table as a markdown document. Rows are labelled with their
/// spreadsheet row numbers so findings from other commands can be located.
pub fn render_markdown<W: Write>(w: &mut W, sheet: &Sheet) -> std::io::Result<()> {
    writeln!(w, "# {}", sheet.display_name())?;
    writeln!(w)?;

    let width = sheet.width();
    if width == 0 || (sheet.rows.is_empty() && !sheet.has_header) {
        writeln!(w, "*Empty table*")?;
        return Ok(());
    }

    // Header row: column names when the table has them, letters otherwise
    write!(w, "|   |")?;
    for col in 0..width {
        let title = if sheet.has_header {
            sheet.header.get(col).cloned().unwrap_or_default()
        } else {
            CellRef::col_to_letters(col)
        };
        write!(w, " {} |", escape_markdown(&title))?;
    }
    writeln!(w)?;

    write!(w, "|---|")?;
    for _ in 0..width {
        write!(w, "---|")?;
    }
    writeln!(w)?;

    for (idx, row) in sheet.rows.iter().enumerate() {
        write!(w, "| {} |", sheet.row_number(idx))?;
        for col in 0..width {
            let display = row.get(col).map(|c| c.display()).unwrap_or_default();
            write!(w, " {} |", escape_markdown(&display))?;
        }
        writeln!(w)?;
    }

    Ok(())
}

/// Escape special markdown characters in cell content
fn escape_markdown(s: &str) -> String {
    s.replace('|', "\\|").replace('\n', " ").replace('\r', "")
}

#[cfg(test)]
mod tests {
    use super::*;
    use pathnet_engine::engine::Cell;

    #[test]
    fn test_escape_markdown() {
        assert_eq!(escape_markdown("a|b\nc"), "a\\|b c");
    }

    #[test]
    fn test_render_uses_header_and_row_numbers() {
        let sheet = Sheet::new(
            vec!["SUID".into(), "name".into()],
            vec![vec![Cell::new_number(1.0), Cell::new_text("glucose|G")]],
        );
        let mut out = Vec::new();
        render_markdown(&mut out, &sheet).unwrap();
        let text = String::from_utf8(out).unwrap();
        assert!(text.contains("|   | SUID | name |"));
        assert!(text.contains("| 2 | 1 | glucose\\|G |"));
    }

    #[test]
    fn test_render_empty_table() {
        let sheet = Sheet::without_header(Vec::new());
        let mut out = Vec::new();
        render_markdown(&mut out, &sheet).unwrap();
        assert!(String::from_utf8(out).unwrap().contains("*Empty table*"));
    }
}
