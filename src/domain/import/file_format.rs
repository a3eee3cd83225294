use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::domain::error::{AppError, Result};

/// Upload formats the decoder accepts. Detected from the file name only.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FileFormat {
    Csv,
    Xlsx,
}

impl FileFormat {
    pub fn from_file_name(file_name: &str) -> Result<Self> {
        let extension = Path::new(file_name)
            .extension()
            .and_then(|ext| ext.to_str())
            .ok_or_else(|| {
                AppError::FormatError(format!("File has no extension: {}", file_name))
            })?
            .to_lowercase();

        match extension.as_str() {
            "csv" => Ok(FileFormat::Csv),
            "xlsx" => Ok(FileFormat::Xlsx),
            other => Err(AppError::FormatError(format!(
                "Unsupported file type: {}",
                other
            ))),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            FileFormat::Csv => "csv",
            FileFormat::Xlsx => "xlsx",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_detects_by_extension_case_insensitive() {
        assert_eq!(FileFormat::from_file_name("leads.csv").unwrap(), FileFormat::Csv);
        assert_eq!(FileFormat::from_file_name("Leads.XLSX").unwrap(), FileFormat::Xlsx);
    }

    #[test]
    fn test_rejects_unsupported_extensions() {
        assert!(matches!(
            FileFormat::from_file_name("leads.xls"),
            Err(AppError::FormatError(_))
        ));
        assert!(matches!(
            FileFormat::from_file_name("leads"),
            Err(AppError::FormatError(_))
        ));
    }
}
