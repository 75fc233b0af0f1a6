//! CSV import/export for node and edge tables

use crate::error::{PathnetError, Result};
use pathnet_engine::engine::{Cell, CellValue};

const BOM: char = '\u{feff}';

/// Records of a CSV file as raw fields. A leading byte-order mark is
/// stripped; the flag tells the caller it was there.
pub struct CsvRecords {
    pub records: Vec<Vec<String>>,
    pub had_bom: bool,
}

/// Parse CSV text into records, handling quoted fields that contain
/// separators, escaped quotes and line breaks.
pub fn parse_csv_content(content: &str) -> Result<CsvRecords> {
    let (content, had_bom) = match content.strip_prefix(BOM) {
        Some(rest) => (rest, true),
        None => (content, false),
    };

    let mut records = Vec::new();
    let mut fields = Vec::new();
    let mut current = String::new();
    let mut in_quotes = false;
    let mut field_was_quoted = false;
    let mut line = 1usize;
    let mut record_line = 1usize;
    let mut chars = content.chars().peekable();

    let finish_field = |current: &mut String, quoted: bool, fields: &mut Vec<String>| {
        let field = std::mem::take(current);
        if quoted {
            fields.push(field);
        } else {
            fields.push(field.trim().to_string());
        }
    };

    while let Some(c) = chars.next() {
        if in_quotes {
            if c == '"' {
                // Check for escaped quote
                if chars.peek() == Some(&'"') {
                    current.push('"');
                    chars.next();
                } else {
                    in_quotes = false;
                }
            } else {
                if c == '\n' {
                    line += 1;
                }
                current.push(c);
            }
            continue;
        }
        match c {
            '"' => {
                in_quotes = true;
                field_was_quoted = true;
            }
            ',' => {
                finish_field(&mut current, field_was_quoted, &mut fields);
                field_was_quoted = false;
            }
            '\r' if chars.peek() == Some(&'\n') => {}
            '\n' | '\r' => {
                finish_field(&mut current, field_was_quoted, &mut fields);
                field_was_quoted = false;
                records.push(std::mem::take(&mut fields));
                line += 1;
                record_line = line;
            }
            _ => current.push(c),
        }
    }

    if in_quotes {
        return Err(PathnetError::Parse {
            line: record_line,
            message: "unterminated quoted field".to_string(),
        });
    }
    if !current.is_empty() || field_was_quoted || !fields.is_empty() {
        finish_field(&mut current, field_was_quoted, &mut fields);
        records.push(fields);
    }

    // A blank line inside the file is an empty row; blank lines at the end
    // are not rows.
    let is_blank = |r: &Vec<String>| r.len() == 1 && r[0].is_empty();
    while records.last().is_some_and(is_blank) {
        records.pop();
    }

    Ok(CsvRecords { records, had_bom })
}

/// Parse a single CSV line, handling quoted fields
#[cfg(test)]
pub(crate) fn parse_csv_line(line: &str) -> Vec<String> {
    parse_csv_content(line)
        .ok()
        .and_then(|r| r.records.into_iter().next())
        .unwrap_or_else(|| vec![String::new()])
}

/// Parse a CSV field into an appropriate Cell type
/// - Empty string -> Empty
/// - Surrounding whitespace (from a quoted field) -> Text, kept as is
/// - Otherwise as [`Cell::from_input`]: numbers only when they print back
///   unchanged, so "007" stays text
pub(crate) fn parse_csv_field(field: &str) -> Cell {
    if field.is_empty() {
        return Cell::new_empty();
    }
    let trimmed = field.trim();
    if field != trimmed && !trimmed.is_empty() {
        return Cell::new_text(field);
    }
    Cell::from_input(field)
}

/// Render rows as CSV text. Text is written verbatim, quoted only where
/// the CSV syntax needs it.
pub fn to_csv_string(header: Option<&[String]>, rows: &[Vec<Cell>], bom: bool) -> String {
    let mut out = String::new();
    if bom {
        out.push(BOM);
    }
    if let Some(header) = header {
        let fields: Vec<String> = header.iter().map(|h| escape_csv_field(h)).collect();
        out.push_str(&fields.join(","));
        out.push('\n');
    }
    for row in rows {
        let fields: Vec<String> = row
            .iter()
            .map(|cell| match &cell.value {
                CellValue::Text(s) => escape_csv_field(s),
                _ => escape_csv_field(&cell.display()),
            })
            .collect();
        out.push_str(&fields.join(","));
        out.push('\n');
    }
    out
}

/// Escape a field for CSV output
pub(crate) fn escape_csv_field(field: &str) -> String {
    if field.contains(',')
        || field.contains('"')
        || field.contains('\n')
        || field.contains('\r')
        || field.starts_with(char::is_whitespace)
        || field.ends_with(char::is_whitespace)
    {
        format!("\"{}\"", field.replace('"', "\"\""))
    } else {
        field.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_csv_line_simple() {
        assert_eq!(parse_csv_line("a,b,c"), vec!["a", "b", "c"]);
    }

    #[test]
    fn test_parse_csv_line_quoted() {
        assert_eq!(
            parse_csv_line(r#"a,"hello, world",c"#),
            vec!["a", "hello, world", "c"]
        );
    }

    #[test]
    fn test_parse_csv_line_quoted_preserves_whitespace() {
        assert_eq!(
            parse_csv_line(r#""  keep me  ",x"#),
            vec!["  keep me  ", "x"]
        );
    }

    #[test]
    fn test_parse_csv_line_escaped_quotes() {
        assert_eq!(
            parse_csv_line(r#"a,"say ""hello""",c"#),
            vec!["a", r#"say "hello""#, "c"]
        );
    }

    #[test]
    fn test_parse_content_multiline_field_and_crlf() {
        let content = "id,note\r\nATP,\"line one\nline two\"\r\nADP,\r\n\r\n";
        let parsed = parse_csv_content(content).unwrap();
        assert_eq!(parsed.records.len(), 3);
        assert_eq!(parsed.records[1][1], "line one\nline two");
        assert_eq!(parsed.records[2], vec!["ADP", ""]);
        assert!(!parsed.had_bom);
    }

    #[test]
    fn test_parse_content_keeps_inner_blank_lines() {
        let parsed = parse_csv_content("id\nATP\n\nADP\n\n\n").unwrap();
        assert_eq!(
            parsed.records,
            vec![vec!["id"], vec!["ATP"], vec![""], vec!["ADP"]]
        );
    }

    #[test]
    fn test_parse_content_strips_bom() {
        let parsed = parse_csv_content("\u{feff}SUID,name\n1,glucose").unwrap();
        assert!(parsed.had_bom);
        assert_eq!(parsed.records[0][0], "SUID");
    }

    #[test]
    fn test_parse_content_unterminated_quote() {
        let err = parse_csv_content("a,b\nc,\"oops\n").err().unwrap();
        assert!(matches!(err, PathnetError::Parse { line: 2, .. }));
    }

    #[test]
    fn test_escape_csv_field() {
        assert_eq!(escape_csv_field("simple"), "simple");
        assert_eq!(escape_csv_field("with,comma"), "\"with,comma\"");
        assert_eq!(escape_csv_field("with\"quote"), "\"with\"\"quote\"");
        assert_eq!(escape_csv_field(" padded"), "\" padded\"");
    }

    #[test]
    fn test_parse_csv_field_number() {
        assert_eq!(parse_csv_field("42").value, CellValue::Number(42.0));
        assert_eq!(parse_csv_field("0").value, CellValue::Number(0.0));
    }

    #[test]
    fn test_parse_csv_field_leading_zero() {
        assert_eq!(parse_csv_field("007").value, CellValue::Text("007".into()));
    }

    #[test]
    fn test_parse_csv_field_preserves_surrounding_whitespace() {
        assert_eq!(
            parse_csv_field("  keep me  ").value,
            CellValue::Text("  keep me  ".into())
        );
    }

    #[test]
    fn test_leading_sign_text_is_written_verbatim() {
        let rows = vec![vec![Cell::new_number(-1.0), Cell::new_text("-1 charge")]];
        assert_eq!(to_csv_string(None, &rows, false), "-1,-1 charge\n");
    }
}
