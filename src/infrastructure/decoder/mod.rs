// ============================================================
// FILE DECODER
// ============================================================
// Upload bytes -> header row + ordered raw rows. Pure, no side effects.

mod csv_parser;
mod xlsx_parser;

pub use csv_parser::CsvParser;
pub use xlsx_parser::parse_xlsx_bytes;

use crate::domain::error::{AppError, Result};
use crate::domain::import::{DecodedSheet, FileFormat, RawRow};
use crate::infrastructure::config::ImportConfig;

pub struct FileDecoder {
    max_file_bytes: usize,
    csv_delimiter: Option<u8>,
}

impl Default for FileDecoder {
    fn default() -> Self {
        Self::new(&ImportConfig::default())
    }
}

impl FileDecoder {
    pub fn new(config: &ImportConfig) -> Self {
        Self {
            max_file_bytes: config.max_file_bytes,
            // Validated when the configuration was loaded
            csv_delimiter: config.delimiter_byte().ok().flatten(),
        }
    }

    /// Decode an upload. Any failure here is fatal for the whole import.
    pub fn decode(&self, file_name: &str, bytes: &[u8]) -> Result<DecodedSheet> {
        let format = FileFormat::from_file_name(file_name)?;

        if bytes.is_empty() {
            return Err(AppError::FormatError("Empty file".to_string()));
        }
        if bytes.len() > self.max_file_bytes {
            return Err(AppError::FormatError(format!(
                "File is {} bytes, limit is {}",
                bytes.len(),
                self.max_file_bytes
            )));
        }

        let grid = match format {
            FileFormat::Csv => {
                let parser = match self.csv_delimiter {
                    Some(delimiter) => CsvParser::new().with_delimiter(delimiter),
                    None => CsvParser::new(),
                };
                parser.parse_bytes(bytes)?
            }
            FileFormat::Xlsx => parse_xlsx_bytes(bytes)?,
        };

        split_header_and_rows(format, grid)
    }
}

/// First row is the header. Blank data rows are dropped but keep their index slot.
fn split_header_and_rows(format: FileFormat, grid: Vec<Vec<String>>) -> Result<DecodedSheet> {
    let mut grid = grid.into_iter();

    let headers = grid
        .next()
        .ok_or_else(|| AppError::FormatError("Empty file".to_string()))?;
    if headers.iter().all(|h| h.trim().is_empty()) {
        return Err(AppError::FormatError("Missing header row".to_string()));
    }

    let rows = grid
        .enumerate()
        .map(|(idx, cells)| RawRow::new(idx + 1, cells))
        .filter(|row| !row.is_blank())
        .collect();

    Ok(DecodedSheet {
        format,
        headers,
        rows,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    const LEADS_XLSX: &[u8] = include_bytes!("../../../resources/leads/fixtures/leads.xlsx");

    #[test]
    fn test_decode_csv_rows_are_one_based() {
        let sheet = FileDecoder::default()
            .decode("leads.csv", b"Name,Email\nAlice,alice@x.com\nBob,bob@x.com\n")
            .unwrap();

        assert_eq!(sheet.format, FileFormat::Csv);
        assert_eq!(sheet.headers, vec!["Name", "Email"]);
        assert_eq!(sheet.rows.len(), 2);
        assert_eq!(sheet.rows[0].row_index, 1);
        assert_eq!(sheet.rows[1].row_index, 2);
        assert_eq!(sheet.rows[1].cell(1), Some("bob@x.com"));
    }

    #[test]
    fn test_decode_xlsx_workbook() {
        let sheet = FileDecoder::default()
            .decode("Leads.XLSX", LEADS_XLSX)
            .unwrap();

        assert_eq!(sheet.format, FileFormat::Xlsx);
        assert_eq!(sheet.headers, vec!["Client Name", "EMAIL", "Phone Number"]);

        // Sheet row 3 is empty and is skipped without shifting later rows
        let indices: Vec<_> = sheet.rows.iter().map(|r| r.row_index).collect();
        assert_eq!(indices, vec![1, 3, 4]);

        assert_eq!(sheet.rows[0].cell(0), Some("Alice"));
        assert_eq!(sheet.rows[0].cell(1), Some(" Alice@X.com "));
        assert_eq!(sheet.rows[0].cell(2), Some("5551234567"));
        assert_eq!(sheet.rows[1].cell(2), Some(""));
        assert_eq!(sheet.rows[2].cell(1), Some("bad email"));
    }

    #[test]
    fn test_blank_rows_keep_index_slot() {
        let sheet = FileDecoder::default()
            .decode("leads.csv", b"Name,Email\nAlice,a@x.com\n,\nBob,b@x.com")
            .unwrap();

        let indices: Vec<_> = sheet.rows.iter().map(|r| r.row_index).collect();
        assert_eq!(indices, vec![1, 3]);
    }

    #[test]
    fn test_header_only_file_has_no_rows() {
        let sheet = FileDecoder::default().decode("leads.csv", b"Name,Email\n").unwrap();
        assert!(sheet.rows.is_empty());
    }

    #[test]
    fn test_unsupported_extension_is_format_error() {
        let result = FileDecoder::default().decode("leads.txt", b"Name,Email");
        assert!(matches!(result, Err(AppError::FormatError(_))));
    }

    #[test]
    fn test_empty_bytes_are_format_error() {
        let result = FileDecoder::default().decode("leads.csv", b"");
        assert!(matches!(result, Err(AppError::FormatError(_))));

        let result = FileDecoder::default().decode("leads.xlsx", b"");
        assert!(matches!(result, Err(AppError::FormatError(_))));
    }

    #[test]
    fn test_blank_header_is_format_error() {
        let result = FileDecoder::default().decode("leads.csv", b",,\nAlice,a@x.com,");
        assert!(matches!(result, Err(AppError::FormatError(_))));
    }

    #[test]
    fn test_oversized_upload_is_format_error() {
        let decoder = FileDecoder::new(&ImportConfig {
            max_file_bytes: 8,
            ..Default::default()
        });
        let result = decoder.decode("leads.csv", b"Name,Email\nAlice,a@x.com");
        assert!(matches!(result, Err(AppError::FormatError(_))));
    }

    #[test]
    fn test_corrupt_xlsx_is_format_error() {
        let result = FileDecoder::default().decode("leads.xlsx", b"Name,Email\nAlice,a@x.com");
        assert!(matches!(result, Err(AppError::FormatError(_))));
    }
}
