//! Convert a Passwords Plus CSV export into a Bitwarden JSON
//! import file.

/// Target for tracing macros.
///
/// Used so that error messages are succinct rather than
/// including the full module path.
pub const TARGET: &str = "pp2bw";

pub mod cli;
pub mod config;
mod error;
pub mod helpers;

pub use error::Error;
pub type Result<T> = std::result::Result<T, error::Error>;
