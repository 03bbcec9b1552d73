//! Line-oriented CSV reader for the POS extracts.
//!
//! The extracts are not well-formed enough for a strict CSV reader: header
//! cells are quoted and wrapped across physical lines, and rows whose last
//! column is empty drop the trailing delimiter. Data rows are single-line.

use std::collections::HashMap;

use tracing::debug;

/// Extra physical lines a quoted header may span beyond the first.
const MAX_HEADER_CONTINUATION: usize = 4;

/// One data row keyed by cleaned header name.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CsvRow {
    /// 1-based physical line number in the source text.
    pub line: usize,
    cells: HashMap<String, String>,
}

impl CsvRow {
    pub fn new(line: usize, cells: HashMap<String, String>) -> Self {
        Self { line, cells }
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.cells.get(key).map(String::as_str)
    }

    /// Value of the first alias present in the row.
    pub fn get_any(&self, keys: &[&str]) -> Option<&str> {
        keys.iter().find_map(|k| self.get(k))
    }
}

#[derive(Debug, Default)]
pub struct ParsedCsv {
    pub headers: Vec<String>,
    pub rows: Vec<CsvRow>,
    /// Data lines rejected for having two or more fields fewer than the header.
    pub dropped_lines: Vec<usize>,
}

/// Split one line into fields. `""` inside a quoted span is a literal quote;
/// commas only separate fields outside quotes. Every field is trimmed.
pub fn tokenize_line(line: &str) -> Vec<String> {
    let mut fields = Vec::new();
    let mut current = String::new();
    let mut in_quotes = false;
    let mut chars = line.chars().peekable();

    while let Some(c) = chars.next() {
        match c {
            '"' if in_quotes && chars.peek() == Some(&'"') => {
                current.push('"');
                chars.next();
            }
            '"' => in_quotes = !in_quotes,
            ',' if !in_quotes => {
                fields.push(current.trim().to_string());
                current.clear();
            }
            _ => current.push(c),
        }
    }
    fields.push(current.trim().to_string());
    fields
}

fn has_open_quote(text: &str) -> bool {
    text.chars().filter(|c| *c == '"').count() % 2 == 1
}

fn clean_header(raw: &str) -> String {
    let mut h = raw.trim();
    for q in ['"', '\''] {
        if h.len() >= 2 && h.starts_with(q) && h.ends_with(q) {
            h = &h[1..h.len() - 1];
            break;
        }
    }
    h.replace("\r\n", " ")
        .replace(['\r', '\n'], " ")
        .trim()
        .to_string()
}

pub fn parse_csv(text: &str) -> ParsedCsv {
    let lines: Vec<(usize, &str)> = text
        .split('\n')
        .map(|l| l.strip_suffix('\r').unwrap_or(l))
        .enumerate()
        .map(|(i, l)| (i + 1, l))
        .filter(|(_, l)| !l.trim().is_empty())
        .collect();

    if lines.len() < 2 {
        return ParsedCsv::default();
    }

    let mut header_text = lines[0].1.to_string();
    let mut header_end = 0;
    while has_open_quote(&header_text)
        && header_end < MAX_HEADER_CONTINUATION
        && header_end + 1 < lines.len()
    {
        header_end += 1;
        header_text.push(' ');
        header_text.push_str(lines[header_end].1);
    }
    if header_end > 0 {
        debug!(lines = header_end + 1, "Assembled multi-line header");
    }

    let headers: Vec<String> = tokenize_line(&header_text)
        .iter()
        .map(|h| clean_header(h))
        .collect();

    let mut parsed = ParsedCsv {
        headers,
        ..ParsedCsv::default()
    };

    for &(line_no, line) in &lines[header_end + 1..] {
        let values = tokenize_line(line);
        if values.len() + 1 < parsed.headers.len() {
            debug!(line = line_no, fields = values.len(), "Dropping short row");
            parsed.dropped_lines.push(line_no);
            continue;
        }
        let cells = parsed
            .headers
            .iter()
            .enumerate()
            .map(|(i, h)| (h.clone(), values.get(i).cloned().unwrap_or_default()))
            .collect();
        parsed.rows.push(CsvRow::new(line_no, cells));
    }

    parsed
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tokenize_line_quoted_comma() {
        assert_eq!(
            tokenize_line("\"Acme, Inc.\",100"),
            vec!["Acme, Inc.".to_string(), "100".to_string()]
        );
    }

    #[test]
    fn test_tokenize_line_escaped_quote() {
        assert_eq!(
            tokenize_line("\"12\"\" Tote\", x "),
            vec!["12\" Tote".to_string(), "x".to_string()]
        );
    }

    #[test]
    fn test_tokenize_line_empty_fields() {
        assert_eq!(tokenize_line("a,,"), vec!["a", "", ""]);
        assert_eq!(tokenize_line(""), vec![""]);
    }

    #[test]
    fn test_parse_csv_quoted_field_and_short_row() {
        let text = "Name,Amount,Note\n\"Acme, Inc.\",100,ok\nShort,200\n";
        let parsed = parse_csv(text);
        assert_eq!(parsed.headers, vec!["Name", "Amount", "Note"]);
        assert_eq!(parsed.rows.len(), 2);
        assert_eq!(parsed.rows[0].get("Name"), Some("Acme, Inc."));
        assert_eq!(parsed.rows[0].get("Amount"), Some("100"));
        assert_eq!(parsed.rows[1].get("Name"), Some("Short"));
        assert_eq!(parsed.rows[1].get("Note"), Some(""));
        assert!(parsed.dropped_lines.is_empty());
    }

    #[test]
    fn test_parse_csv_drops_rows_missing_two_fields() {
        let text = "a,b,c\n1,2,3\n1\n";
        let parsed = parse_csv(text);
        assert_eq!(parsed.rows.len(), 1);
        assert_eq!(parsed.dropped_lines, vec![3]);
    }

    #[test]
    fn test_parse_csv_extra_fields_are_discarded() {
        let parsed = parse_csv("a,b\n1,2,3\n");
        assert_eq!(parsed.rows.len(), 1);
        assert_eq!(parsed.rows[0].get("b"), Some("2"));
    }

    #[test]
    fn test_parse_csv_crlf_and_blank_lines() {
        let text = "a,b\r\n\r\n1,2\r\n   \r\n3,4\r\n";
        let parsed = parse_csv(text);
        assert_eq!(parsed.rows.len(), 2);
        assert_eq!(parsed.rows[0].line, 3);
        assert_eq!(parsed.rows[1].get("a"), Some("3"));
        assert_eq!(parsed.rows[1].get("b"), Some("4"));
    }

    #[test]
    fn test_parse_csv_multiline_header() {
        let text = "ITEM CODE,\"AC Sales\n(Cost)\",STORE\nA1,10,S1\n";
        let parsed = parse_csv(text);
        assert_eq!(parsed.headers, vec!["ITEM CODE", "AC Sales (Cost)", "STORE"]);
        assert_eq!(parsed.rows.len(), 1);
        assert_eq!(parsed.rows[0].get("AC Sales (Cost)"), Some("10"));
        assert_eq!(parsed.rows[0].line, 3);
    }

    #[test]
    fn test_parse_csv_header_continuation_is_capped() {
        // Unterminated quote: at most four continuation lines join the header.
        let text = "a,\"b\n1\n2\n3\n4\n5,6\n7,8\n";
        let parsed = parse_csv(text);
        assert_eq!(parsed.headers.len(), 2);
        assert_eq!(parsed.rows.len(), 2);
        assert_eq!(parsed.rows[0].get("a"), Some("5"));
    }

    #[test]
    fn test_parse_csv_strips_single_quotes_from_headers() {
        let parsed = parse_csv("'Period',Country\n2512,HK\n");
        assert_eq!(parsed.headers, vec!["Period", "Country"]);
    }

    #[test]
    fn test_parse_csv_too_short() {
        assert!(parse_csv("").rows.is_empty());
        assert!(parse_csv("a,b,c\n").rows.is_empty());
        assert!(parse_csv("a,b,c\n\n\n").headers.is_empty());
    }

    #[test]
    fn test_csv_row_get_any() {
        let parsed = parse_csv("AC Sales (Cost),x\n5,6\n");
        let row = &parsed.rows[0];
        assert_eq!(row.get_any(&["AC Sales\n(Cost)", "AC Sales (Cost)"]), Some("5"));
        assert_eq!(row.get_any(&["missing"]), None);
    }
}
