// ============================================================
// CSV PARSER
// ============================================================
// Decode CSV bytes into a cell grid with encoding fallback and delimiter detection

use std::borrow::Cow;

use csv::{ReaderBuilder, Trim};
use encoding_rs::{UTF_8, WINDOWS_1252};

use crate::domain::error::{AppError, Result};

/// CSV parser with encoding detection
#[derive(Debug, Default)]
pub struct CsvParser {
    /// Delimiter character; detected from the content when unset
    delimiter: Option<u8>,
}

impl CsvParser {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set custom delimiter
    pub fn with_delimiter(mut self, delimiter: u8) -> Self {
        self.delimiter = Some(delimiter);
        self
    }

    /// Parse raw CSV bytes into rows of cells, header row included.
    /// Cells are returned untrimmed; fully empty lines are dropped by the reader.
    pub fn parse_bytes(&self, bytes: &[u8]) -> Result<Vec<Vec<String>>> {
        let content = Self::decode_text(bytes);
        if content.trim().is_empty() {
            return Err(AppError::FormatError("Empty file".to_string()));
        }

        let delimiter = self
            .delimiter
            .unwrap_or_else(|| Self::detect_delimiter(&content));

        let mut reader = ReaderBuilder::new()
            .delimiter(delimiter)
            .has_headers(false)
            .trim(Trim::None)
            .flexible(true) // Allow rows with different lengths
            .from_reader(content.as_bytes());

        let mut rows = Vec::new();
        for (line, result) in reader.records().enumerate() {
            let record = result.map_err(|e| {
                AppError::FormatError(format!("Failed to parse CSV record {}: {}", line + 1, e))
            })?;
            rows.push(record.iter().map(|s| s.to_string()).collect());
        }

        Ok(rows)
    }

    /// UTF-8 (BOM stripped) when the bytes are valid, Windows-1252 otherwise.
    fn decode_text(bytes: &[u8]) -> Cow<'_, str> {
        let (content, had_errors) = UTF_8.decode_with_bom_removal(bytes);
        if !had_errors {
            return content;
        }

        let (content, _) = WINDOWS_1252.decode_without_bom_handling(bytes);
        content
    }

    /// Detect delimiter from content (comma, semicolon, tab, pipe)
    pub fn detect_delimiter(content: &str) -> u8 {
        let candidates = [b',', b';', b'\t', b'|'];

        let sample_lines: Vec<_> = content.lines().take(10).collect();
        if sample_lines.is_empty() {
            return b',';
        }

        let mut best_delimiter = b',';
        let mut best_score = 0.0f32;

        for &delimiter in &candidates {
            let field_counts: Vec<usize> = sample_lines
                .iter()
                .map(|line| line.chars().filter(|&c| c == delimiter as char).count())
                .collect();

            // Score by consistency (low standard deviation) and frequency
            let avg = field_counts.iter().sum::<usize>() as f32 / field_counts.len() as f32;
            let variance = field_counts
                .iter()
                .map(|&x| (x as f32 - avg).powi(2))
                .sum::<f32>()
                / field_counts.len() as f32;

            let score = avg / (1.0 + variance.sqrt());

            if score > best_score {
                best_score = score;
                best_delimiter = delimiter;
            }
        }

        best_delimiter
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_simple_csv() {
        let content = b"Name,Email\nAlice,alice@x.com\nBob,bob@x.com";
        let rows = CsvParser::new().parse_bytes(content).unwrap();

        assert_eq!(rows.len(), 3);
        assert_eq!(rows[0], vec!["Name", "Email"]);
        assert_eq!(rows[2], vec!["Bob", "bob@x.com"]);
    }

    #[test]
    fn test_quoted_fields_keep_commas() {
        let content = b"Name,Lead Details\n\"Smith, John\",\"Wants a quote, urgently\"";
        let rows = CsvParser::new().parse_bytes(content).unwrap();
        assert_eq!(rows[1], vec!["Smith, John", "Wants a quote, urgently"]);
    }

    #[test]
    fn test_detect_delimiter() {
        assert_eq!(CsvParser::detect_delimiter("a,b,c\nd,e,f"), b',');
        assert_eq!(CsvParser::detect_delimiter("a;b;c\nd;e;f"), b';');
        assert_eq!(CsvParser::detect_delimiter("a\tb\tc\nd\te\tf"), b'\t');
    }

    #[test]
    fn test_semicolon_file() {
        let rows = CsvParser::new()
            .parse_bytes(b"Name;Email\nAlice;alice@x.com")
            .unwrap();
        assert_eq!(rows[1], vec!["Alice", "alice@x.com"]);
    }

    #[test]
    fn test_explicit_delimiter_overrides_detection() {
        let rows = CsvParser::new()
            .with_delimiter(b'|')
            .parse_bytes(b"Name|Email\nA,B|a@x.com")
            .unwrap();
        assert_eq!(rows[1], vec!["A,B", "a@x.com"]);
    }

    #[test]
    fn test_utf8_bom_is_stripped() {
        let mut content = vec![0xEF, 0xBB, 0xBF];
        content.extend_from_slice(b"Name,Email\nAlice,alice@x.com");
        let rows = CsvParser::new().parse_bytes(&content).unwrap();
        assert_eq!(rows[0][0], "Name");
    }

    #[test]
    fn test_windows_1252_fallback() {
        // "José" with 0xE9 for é
        let content = b"Name,Email\nJos\xE9,jose@x.com";
        let rows = CsvParser::new().parse_bytes(content).unwrap();
        assert_eq!(rows[1][0], "José");
    }

    #[test]
    fn test_empty_content_is_format_error() {
        assert!(matches!(
            CsvParser::new().parse_bytes(b""),
            Err(AppError::FormatError(_))
        ));
        assert!(matches!(
            CsvParser::new().parse_bytes(b"  \n \n"),
            Err(AppError::FormatError(_))
        ));
    }
}
