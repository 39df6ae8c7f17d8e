//! Minimal quoted-CSV reader/writer for the master artifact and the manual
//! vendor sheets. Quote-escaped fields, embedded commas/newlines, CRLF
//! tolerant.

use std::io::{self, Write};
use std::mem::take;

pub fn parse_rows(text: &str) -> Vec<Vec<String>> {
    let mut rows = Vec::new();
    let mut row = Vec::new();
    let mut field = String::new();
    let mut in_quotes = false;
    let mut chars = text.chars().peekable();

    while let Some(ch) = chars.next() {
        match ch {
            '"' => {
                if in_quotes {
                    if matches!(chars.peek(), Some('"')) {
                        chars.next(); // "" escape
                        field.push('"');
                    } else {
                        in_quotes = false;
                    }
                } else {
                    in_quotes = true;
                }
            }
            ',' if !in_quotes => row.push(take(&mut field)),
            '\n' | '\r' if !in_quotes => {
                if ch == '\r' && matches!(chars.peek(), Some('\n')) {
                    chars.next();
                }
                row.push(take(&mut field));
                if !(row.len() == 1 && row[0].is_empty()) {
                    rows.push(take(&mut row));
                } else {
                    row.clear();
                }
            }
            _ => field.push(ch),
        }
    }

    // Flush trailing field/row, even after an unterminated quote.
    if !field.is_empty() || !row.is_empty() {
        row.push(field);
        rows.push(row);
    }

    rows
}

fn needs_quotes(field: &str) -> bool {
    field.contains(',') || field.contains('"') || field.contains('\n') || field.contains('\r')
}

pub fn write_row<W: Write>(mut w: W, row: &[String]) -> io::Result<()> {
    for (i, cell) in row.iter().enumerate() {
        if i > 0 {
            write!(w, ",")?;
        }
        if needs_quotes(cell) {
            write!(w, "\"{}\"", cell.replace('"', "\"\""))?;
        } else {
            write!(w, "{}", cell)?;
        }
    }
    writeln!(w)
}

// ── Tests ──

#[cfg(test)]
mod tests {
    use super::*;

    fn row(cells: &[&str]) -> Vec<String> {
        cells.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn plain_rows() {
        let rows = parse_rows("a,b,c\n1,2,3\n");
        assert_eq!(rows, vec![row(&["a", "b", "c"]), row(&["1", "2", "3"])]);
    }

    #[test]
    fn quoted_fields() {
        let rows = parse_rows("\"BPC 157, 5mg\",\"say \"\"hi\"\"\"\n");
        assert_eq!(rows, vec![row(&["BPC 157, 5mg", "say \"hi\""])]);
    }

    #[test]
    fn crlf_and_blank_lines() {
        let rows = parse_rows("a,b\r\n\r\nc,d\r\n");
        assert_eq!(rows, vec![row(&["a", "b"]), row(&["c", "d"])]);
    }

    #[test]
    fn empty_cells_survive() {
        let rows = parse_rows("a,,c\n");
        assert_eq!(rows, vec![row(&["a", "", "c"])]);
    }

    #[test]
    fn write_round_trip() {
        let original = vec![row(&["ZJ", "AOD-9604", "10mg*10vials", "40", ""])];
        let mut buf = Vec::new();
        for r in &original {
            write_row(&mut buf, r).unwrap();
        }
        let text = String::from_utf8(buf).unwrap();
        assert_eq!(parse_rows(&text), original);
    }

    #[test]
    fn write_quotes_when_needed() {
        let mut buf = Vec::new();
        write_row(&mut buf, &row(&["a,b", "he said \"no\""])).unwrap();
        let text = String::from_utf8(buf).unwrap();
        assert_eq!(text, "\"a,b\",\"he said \"\"no\"\"\"\n");
        assert_eq!(parse_rows(&text), vec![row(&["a,b", "he said \"no\""])]);
    }
}
