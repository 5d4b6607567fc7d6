//! Import secrets from other providers and software.
use futures::StreamExt;
use tokio::io::AsyncRead;

use crate::Result;

pub mod csv;

/// Header row naming the columns of a CSV export.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Header {
    columns: Vec<String>,
}

impl Header {
    /// Create a header from column names.
    pub fn new(columns: Vec<String>) -> Self {
        Self { columns }
    }

    /// Column names in source order.
    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    /// Index of the first column matching any of the names,
    /// compared case-insensitively after trimming.
    pub fn position(&self, names: &[&str]) -> Option<usize> {
        self.columns.iter().position(|column| {
            let column = column.trim();
            names.iter().any(|name| column.eq_ignore_ascii_case(name))
        })
    }

    /// Whether the header has no columns.
    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }
}

/// Uninterpreted row of a CSV export.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawRow {
    /// Line number in the source file, the header is line 1.
    pub line: u64,
    /// Cell values, invalid UTF-8 sequences are replaced.
    pub cells: Vec<String>,
    /// Indices of cells that were not valid UTF-8.
    pub undecodable: Vec<usize>,
}

impl RawRow {
    /// Cell value at a column index.
    pub fn get(&self, index: usize) -> Option<&str> {
        self.cells.get(index).map(|s| s.as_str())
    }
}

/// Header and data rows of a CSV export.
#[derive(Debug, Default)]
pub struct SourceRows {
    /// The first row of the file.
    pub header: Header,
    /// Remaining rows.
    pub rows: Vec<RawRow>,
}

/// Read every record of a CSV file and split off the header row.
///
/// Records may have different lengths; no value is
/// interpreted here.
pub(crate) async fn read_csv_rows<R: AsyncRead + Unpin + Send>(
    reader: R,
) -> Result<SourceRows> {
    let mut rows = Vec::new();
    let mut rdr = csv_async::AsyncReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .create_reader(reader);
    let mut records = rdr.byte_records();
    while let Some(record) = records.next().await {
        let record = record?;
        let line = record
            .position()
            .map(|p| p.line())
            .unwrap_or(rows.len() as u64 + 1);
        let mut cells = Vec::with_capacity(record.len());
        let mut undecodable = Vec::new();
        for (index, bytes) in record.iter().enumerate() {
            match std::str::from_utf8(bytes) {
                Ok(cell) => cells.push(cell.to_owned()),
                Err(_) => {
                    undecodable.push(index);
                    cells.push(String::from_utf8_lossy(bytes).into_owned());
                }
            }
        }
        rows.push(RawRow {
            line,
            cells,
            undecodable,
        });
    }

    if rows.is_empty() {
        return Ok(Default::default());
    }
    let header = rows.remove(0);
    if !header.undecodable.is_empty() {
        tracing::warn!(
            columns = ?header.undecodable,
            "header is not valid UTF-8");
    }
    Ok(SourceRows {
        header: Header::new(header.cells),
        rows,
    })
}
