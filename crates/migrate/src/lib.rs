#![deny(missing_docs)]
#![forbid(unsafe_code)]
//! Convert a Passwords Plus CSV export into a document that
//! Bitwarden can import.
//!
//! Rows that cannot be mapped are skipped and recorded in a
//! [ConversionReport](report::ConversionReport) so a single bad
//! row never aborts the conversion.

use async_trait::async_trait;

mod error;

pub mod export;
pub mod import;
pub mod report;

pub use error::{Error, ValidationError};

/// Result type for the migration library.
pub type Result<T> = std::result::Result<T, Error>;

/// Output of a conversion.
#[derive(Debug)]
pub struct Conversion {
    /// Document to import.
    pub export: export::bitwarden::BitwardenExport,
    /// Rows that were skipped.
    pub report: report::ConversionReport,
}

/// Trait for implementations that can convert data
/// from a third-party provider.
#[async_trait]
pub trait Convert {
    /// Input type for the conversion.
    type Input;

    /// Convert the input.
    async fn convert(&self, source: Self::Input) -> Result<Conversion>;
}
