// 🏗️ Row Parser - Delimited feed text → positional rows
// Quote-aware field splitting for the published catalogue sheet

use crate::error::RowError;
use serde::{Deserialize, Serialize};
use tracing::debug;

// ============================================================================
// CORE TYPES
// ============================================================================

/// RawRow - Output of RowParser::parse_feed()
/// Positional field values before any attribute mapping
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawRow {
    /// Line index in the feed (header = 0). Becomes the entity id.
    pub line_number: usize,

    /// Field values exactly as split (untrimmed, quotes removed)
    pub fields: Vec<String>,

    /// Original line for debugging
    pub raw_line: String,
}

/// A line that was not turned into a RawRow, and why
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkippedRow {
    pub line_number: usize,
    pub reason: RowError,
}

/// Result of splitting a whole feed
#[derive(Debug, Clone, Default)]
pub struct ParsedFeed {
    /// Header fields (line 0)
    pub header: Vec<String>,
    pub rows: Vec<RawRow>,
    pub skipped: Vec<SkippedRow>,
}

impl ParsedFeed {
    /// Number of fields every data row must at least carry
    pub fn expected_width(&self) -> usize {
        self.header.len()
    }
}

// ============================================================================
// ROW PARSER
// ============================================================================

/// RowParser - splits lines on a delimiter, honouring quoted segments
///
/// A quote character toggles "inside quotes" mode and is dropped from the
/// output. Inside quotes the delimiter is literal text. There is no escape
/// for an embedded quote: `""` simply toggles twice. Unbalanced quotes never
/// fail; whatever was accumulated up to end of line is emitted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RowParser {
    pub delimiter: char,
    pub quote: char,
}

impl RowParser {
    pub fn new() -> Self {
        RowParser {
            delimiter: ',',
            quote: '"',
        }
    }

    /// Builder: use another delimiter (e.g. tab-separated exports)
    pub fn with_delimiter(mut self, delimiter: char) -> Self {
        self.delimiter = delimiter;
        self
    }

    /// Builder: use another quote character
    pub fn with_quote(mut self, quote: char) -> Self {
        self.quote = quote;
        self
    }

    /// Split one line into fields
    ///
    /// The field after the last delimiter is always emitted, so `a,` gives
    /// `["a", ""]` and the empty line gives `[""]`.
    pub fn parse_row(&self, line: &str) -> Vec<String> {
        let mut fields = Vec::new();
        let mut current = String::new();
        let mut in_quotes = false;

        for ch in line.chars() {
            if ch == self.quote {
                in_quotes = !in_quotes;
            } else if ch == self.delimiter && !in_quotes {
                fields.push(std::mem::take(&mut current));
            } else {
                current.push(ch);
            }
        }

        fields.push(current);
        fields
    }

    /// Split a whole feed: header first, then one RawRow per usable line
    ///
    /// Blank lines and lines narrower than the header are recorded in
    /// `skipped` and never reach the normalizer.
    pub fn parse_feed(&self, text: &str) -> ParsedFeed {
        // Trailing newlines are line terminators, not blank rows
        let body = text.trim_end_matches(|c: char| c == '\n' || c == '\r');
        let mut lines = body.split('\n').map(|l| l.strip_suffix('\r').unwrap_or(l));

        let header = match lines.next() {
            Some(line) if !line.trim().is_empty() => self.parse_row(line),
            _ => return ParsedFeed::default(),
        };

        let expected = header.len();
        let mut feed = ParsedFeed {
            header,
            rows: Vec::new(),
            skipped: Vec::new(),
        };

        for (offset, line) in lines.enumerate() {
            let line_number = offset + 1;

            if line.trim().is_empty() {
                feed.skipped.push(SkippedRow {
                    line_number,
                    reason: RowError::Blank,
                });
                continue;
            }

            let fields = self.parse_row(line);
            if fields.len() < expected {
                debug!(
                    line = line_number,
                    expected,
                    found = fields.len(),
                    "skipping short row"
                );
                feed.skipped.push(SkippedRow {
                    line_number,
                    reason: RowError::ShapeMismatch {
                        expected,
                        found: fields.len(),
                    },
                });
                continue;
            }

            feed.rows.push(RawRow {
                line_number,
                fields,
                raw_line: line.to_string(),
            });
        }

        feed
    }
}

impl Default for RowParser {
    fn default() -> Self {
        Self::new()
    }
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_simple_row() {
        let parser = RowParser::new();
        assert_eq!(parser.parse_row("a,b,c"), vec!["a", "b", "c"]);
    }

    #[test]
    fn test_quoted_delimiter_is_literal() {
        let parser = RowParser::new();
        let fields = parser.parse_row(r#"Acme,"tag1, tag2",SaaS"#);

        assert_eq!(fields, vec!["Acme", "tag1, tag2", "SaaS"]);
    }

    #[test]
    fn test_trailing_empty_field_is_emitted() {
        let parser = RowParser::new();
        assert_eq!(parser.parse_row("a,"), vec!["a", ""]);
        assert_eq!(parser.parse_row(""), vec![""]);
    }

    #[test]
    fn test_unbalanced_quote_does_not_fail() {
        let parser = RowParser::new();
        let fields = parser.parse_row(r#"a,"b,c"#);

        // Everything after the stray quote lands in one field
        assert_eq!(fields, vec!["a", "b,c"]);
    }

    #[test]
    fn test_doubled_quote_is_not_an_escape() {
        let parser = RowParser::new();
        let fields = parser.parse_row(r#""say ""hi""",x"#);

        assert_eq!(fields, vec!["say hi", "x"]);
    }

    #[test]
    fn test_custom_delimiter() {
        let parser = RowParser::new().with_delimiter('\t');
        assert_eq!(parser.parse_row("a\tb,c"), vec!["a", "b,c"]);
    }

    #[test]
    fn test_parse_feed_skips_blank_and_short_rows() {
        let parser = RowParser::new();
        let text = "name,desc,url\r\nAcme,Rockets,http://acme\r\n\r\nShort,row\r\nBeta,Betas,\r\n";
        let feed = parser.parse_feed(text);

        assert_eq!(feed.expected_width(), 3);
        assert_eq!(feed.rows.len(), 2, "Should keep the two full rows");
        assert_eq!(feed.rows[0].line_number, 1);
        assert_eq!(feed.rows[1].line_number, 4);
        assert_eq!(feed.rows[1].fields, vec!["Beta", "Betas", ""]);

        assert!(feed.skipped.contains(&SkippedRow {
            line_number: 3,
            reason: RowError::ShapeMismatch { expected: 3, found: 2 },
        }));
        assert!(feed
            .skipped
            .iter()
            .any(|s| s.line_number == 2 && s.reason == RowError::Blank));
    }

    #[test]
    fn test_parse_feed_empty_text() {
        let parser = RowParser::new();
        let feed = parser.parse_feed("");

        assert!(feed.header.is_empty());
        assert!(feed.rows.is_empty());
    }

    #[test]
    fn test_parse_feed_header_only() {
        let parser = RowParser::new();
        let feed = parser.parse_feed("name,desc\n");

        assert_eq!(feed.header, vec!["name", "desc"]);
        assert!(feed.rows.is_empty());
    }
}
