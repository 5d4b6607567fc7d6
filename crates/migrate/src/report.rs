//! Report of source rows skipped during a conversion.
use serde::Serialize;
use std::path::Path;

use crate::{Error, Result};

/// Row that could not be converted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SkippedRow {
    /// Line number in the source file.
    pub line: u64,
    /// Name of the entry when the row has one.
    pub name: Option<String>,
    /// Why the row was skipped.
    pub reason: String,
}

/// Rows skipped during a conversion.
#[derive(Debug, Default)]
pub struct ConversionReport {
    skipped: Vec<SkippedRow>,
}

impl ConversionReport {
    /// Record a skipped row.
    pub fn skip(&mut self, line: u64, name: Option<String>, error: &Error) {
        self.skipped.push(SkippedRow {
            line,
            name,
            reason: error.to_string(),
        });
    }

    /// Skipped rows in source order.
    pub fn skipped(&self) -> &[SkippedRow] {
        &self.skipped
    }

    /// Number of skipped rows.
    pub fn len(&self) -> usize {
        self.skipped.len()
    }

    /// Whether every row was converted.
    pub fn is_empty(&self) -> bool {
        self.skipped.is_empty()
    }

    /// Write the skipped rows as CSV.
    pub async fn write(&self, path: impl AsRef<Path>) -> Result<()> {
        let mut out = csv_async::AsyncSerializer::from_writer(
            tokio::fs::File::create(path.as_ref()).await?,
        );
        for row in &self.skipped {
            out.serialize(row).await?;
        }
        out.flush().await?;
        tracing::info!(
            path = %path.as_ref().display(),
            rows = self.skipped.len(),
            "wrote skipped rows report");
        Ok(())
    }
}
