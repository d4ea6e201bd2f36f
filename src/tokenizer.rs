use tracing::debug;

use crate::error::IngestError;
use crate::types::RawRow;

/// Header plus the data rows that had the same number of fields.
#[derive(Debug, Clone)]
pub struct CsvTable {
    pub headers: Vec<String>,
    pub rows: Vec<RawRow>,
    /// Data lines dropped for a field-count mismatch.
    pub malformed_rows: usize,
}

/// Split raw CSV text into a header and keyed rows.
///
/// Every line is scanned on its own, so a broken line (for example an
/// unbalanced quote) only loses itself. Rows whose width differs from the
/// header are skipped rather than failing the whole file.
pub fn tokenize(text: &str) -> Result<CsvTable, IngestError> {
    let text = text.trim();
    let mut lines = text.split('\n');
    let header_line = lines.next().unwrap_or_default();
    let data_lines: Vec<&str> = lines.collect();
    if data_lines.is_empty() {
        return Err(IngestError::EmptyInput);
    }

    let headers = split_header(header_line);

    let mut rows = Vec::new();
    let mut malformed_rows = 0usize;
    for (idx, line) in data_lines.iter().enumerate() {
        let fields = split_line(line);
        if fields.len() == headers.len() {
            rows.push(RawRow::from_fields(&headers, fields.iter().map(String::as_str)));
        } else {
            malformed_rows += 1;
            debug!(
                line = idx + 2,
                fields = fields.len(),
                expected = headers.len(),
                "dropping row with wrong field count"
            );
        }
    }

    if rows.is_empty() {
        return Err(IngestError::NoValidRows);
    }

    Ok(CsvTable {
        headers,
        rows,
        malformed_rows,
    })
}

/// Header names are split on every comma; quotes are only stripped from
/// the ends of each name.
pub fn split_header(line: &str) -> Vec<String> {
    line.split(',')
        .map(|h| strip_quotes(h.trim()).to_string())
        .collect()
}

/// Split one data line into trimmed fields.
///
/// A `"` anywhere switches quoted mode, `""` inside quotes is a literal
/// quote, and only commas outside quotes delimit fields.
pub fn split_line(line: &str) -> Vec<String> {
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
                fields.push(strip_quotes(current.trim()).to_string());
                current.clear();
            }
            _ => current.push(c),
        }
    }
    fields.push(strip_quotes(current.trim()).to_string());
    fields
}

// Drops one leading and one trailing quote, if present.
fn strip_quotes(s: &str) -> &str {
    let s = s.strip_prefix('"').unwrap_or(s);
    s.strip_suffix('"').unwrap_or(s)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_header_and_rows() {
        let table = tokenize("Team,Enabled Users\nAlpha,100\nBeta,50\n").unwrap();
        assert_eq!(table.headers, vec!["Team", "Enabled Users"]);
        assert_eq!(table.rows.len(), 2);
        assert_eq!(table.rows[1].get("Team"), Some("Beta"));
        assert_eq!(table.rows[1].get("Enabled Users"), Some("50"));
        assert_eq!(table.malformed_rows, 0);
    }

    #[test]
    fn quoted_fields_keep_commas_and_escaped_quotes() {
        let text = "Team,Note\n\"Acme, Inc\",\"say \"\"hi\"\" now\"\n";
        let table = tokenize(text).unwrap();
        assert_eq!(table.rows[0].get("Team"), Some("Acme, Inc"));
        assert_eq!(table.rows[0].get("Note"), Some("say \"hi\" now"));
    }

    #[test]
    fn quote_after_leading_space_still_quotes() {
        let fields = split_line("Alpha, \"1,234\", \"1,000\"");
        assert_eq!(fields, vec!["Alpha", "1,234", "1,000"]);

        let table = tokenize("Team,Enabled Users\nAlpha, \"1,234\"").unwrap();
        assert_eq!(table.rows.len(), 1);
        assert_eq!(table.rows[0].get("Enabled Users"), Some("1,234"));
    }

    #[test]
    fn quote_in_middle_of_field_toggles() {
        assert_eq!(split_line("Al\"pha, Inc\",5"), vec!["Alpha, Inc", "5"]);
    }

    #[test]
    fn unbalanced_quote_only_loses_its_line() {
        let table = tokenize("Team,Enabled Users\n\"Alpha,5\nBeta,10\nGamma,3").unwrap();
        let teams: Vec<&str> = table.rows.iter().filter_map(|r| r.get("Team")).collect();
        assert_eq!(teams, vec!["Beta", "Gamma"]);
        assert_eq!(table.malformed_rows, 1);
    }

    #[test]
    fn quoted_newline_does_not_join_lines() {
        let table = tokenize("Team,Note\n\"multi\nline\",x\nBeta,y").unwrap();
        assert_eq!(table.rows.len(), 1);
        assert_eq!(table.rows[0].get("Team"), Some("Beta"));
        assert_eq!(table.malformed_rows, 2);
    }

    #[test]
    fn header_splits_on_every_comma() {
        assert_eq!(split_header(" \"Team\" ,\"Org, Name\""), vec!["Team", "Org", "Name"]);
    }

    #[test]
    fn trims_whitespace_around_fields() {
        let table = tokenize("  Team , Users \r\n Alpha ,  12 \r\n").unwrap();
        assert_eq!(table.headers, vec!["Team", "Users"]);
        assert_eq!(table.rows[0].get("Team"), Some("Alpha"));
        assert_eq!(table.rows[0].get("Users"), Some("12"));
    }

    #[test]
    fn wrong_width_rows_are_dropped() {
        let table = tokenize("Team,Users\nAlpha,1\nBroken,2,3\nBeta,4").unwrap();
        assert_eq!(table.rows.len(), 2);
        assert_eq!(table.malformed_rows, 1);
        assert_eq!(table.rows[1].get("Team"), Some("Beta"));
    }

    #[test]
    fn header_only_is_empty_input() {
        assert_eq!(tokenize("Team,Users\n").unwrap_err(), IngestError::EmptyInput);
        assert_eq!(tokenize("   ").unwrap_err(), IngestError::EmptyInput);
    }

    #[test]
    fn all_rows_malformed_is_no_valid_rows() {
        let err = tokenize("Team,Users\nAlpha\nBeta,1,2").unwrap_err();
        assert_eq!(err, IngestError::NoValidRows);
    }

    #[test]
    fn duplicate_header_keeps_last_value() {
        let table = tokenize("Team,Users,Users\nAlpha,1,2").unwrap();
        assert_eq!(table.rows[0].get("Users"), Some("2"));
    }
}
