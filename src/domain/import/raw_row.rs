use super::FileFormat;

/// One data row as decoded from the upload.
///
/// `row_index` is 1-based and excludes the header row. Cells are positional and
/// line up with [`DecodedSheet::headers`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawRow {
    pub row_index: usize,
    pub cells: Vec<String>,
}

impl RawRow {
    pub fn new(row_index: usize, cells: Vec<String>) -> Self {
        Self { row_index, cells }
    }

    pub fn cell(&self, column: usize) -> Option<&str> {
        self.cells.get(column).map(|s| s.as_str())
    }

    pub fn is_blank(&self) -> bool {
        self.cells.iter().all(|c| c.trim().is_empty())
    }
}

/// Header row plus every data row of a decoded upload, in file order.
#[derive(Debug, Clone)]
pub struct DecodedSheet {
    pub format: FileFormat,
    pub headers: Vec<String>,
    pub rows: Vec<RawRow>,
}
