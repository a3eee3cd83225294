use std::io::Cursor;

use calamine::{Data, Reader, Xlsx};

use crate::domain::error::{AppError, Result};

/// Read the first worksheet of an XLSX workbook into rows of cells, header row included.
pub fn parse_xlsx_bytes(bytes: &[u8]) -> Result<Vec<Vec<String>>> {
    let mut workbook: Xlsx<_> = Xlsx::new(Cursor::new(bytes))
        .map_err(|e| AppError::FormatError(format!("Failed to open Excel file: {}", e)))?;

    let range = workbook
        .worksheet_range_at(0)
        .ok_or_else(|| AppError::FormatError("No worksheet found".to_string()))?
        .map_err(|e| AppError::FormatError(format!("Failed to read Excel range: {}", e)))?;

    Ok(range
        .rows()
        .map(|row| row.iter().map(cell_to_string).collect())
        .collect())
}

/// Integral floats render without a fraction so numeric phone cells survive intact.
pub(crate) fn cell_to_string(cell: &Data) -> String {
    match cell {
        Data::Empty => String::new(),
        Data::String(s) => s.clone(),
        Data::Float(f) if f.fract() == 0.0 && f.abs() < 1e15 => format!("{}", *f as i64),
        Data::Float(f) => f.to_string(),
        Data::Int(i) => i.to_string(),
        Data::Bool(b) => b.to_string(),
        other => format!("{}", other),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_corrupt_bytes_are_format_error() {
        let result = parse_xlsx_bytes(b"definitely not a zip archive");
        assert!(matches!(result, Err(AppError::FormatError(_))));
    }

    #[test]
    fn test_cell_to_string() {
        assert_eq!(cell_to_string(&Data::Empty), "");
        assert_eq!(cell_to_string(&Data::String("Alice".to_string())), "Alice");
        assert_eq!(cell_to_string(&Data::Float(5551234567.0)), "5551234567");
        assert_eq!(cell_to_string(&Data::Float(2.5)), "2.5");
        assert_eq!(cell_to_string(&Data::Int(42)), "42");
        assert_eq!(cell_to_string(&Data::Bool(true)), "true");
    }
}
