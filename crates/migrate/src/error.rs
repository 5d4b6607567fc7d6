use enum_iterator::all;
use std::fmt;
use thiserror::Error;

use crate::export::bitwarden::{
    FieldType, ItemType, LinkedId, Reprompt, UriMatch,
};

/// Errors raised when a value does not satisfy the
/// constraints of the Bitwarden import schema.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ValidationError {
    /// Custom field type code is not known.
    #[error(
        "field type {0} is invalid, must be one of {codes}",
        codes = readable_list(all::<FieldType>().map(u8::from), "or")
    )]
    UnknownFieldType(i64),

    /// URI match code is not known.
    #[error(
        "uri match {0} is invalid, must be one of {codes}",
        codes = readable_list(all::<UriMatch>().map(u8::from), "or")
    )]
    UnknownUriMatch(String),

    /// Item type code is not known.
    #[error(
        "item type {0} is invalid, must be one of {codes}",
        codes = readable_list(all::<ItemType>().map(u8::from), "or")
    )]
    UnknownItemType(String),

    /// Reprompt code is not known.
    #[error(
        "reprompt {0} is invalid, must be one of {codes}",
        codes = readable_list(all::<Reprompt>().map(u8::from), "or")
    )]
    UnknownReprompt(String),

    /// Linked field reference is not known.
    #[error(
        "linked id {0} is invalid, must be one of {names}",
        names = readable_list(all::<LinkedId>(), "or")
    )]
    UnknownLinkedId(String),

    /// Only linked fields may reference another field.
    #[error("only a Linked field may have a linkedId, {0} field has one")]
    LinkedIdNotAllowed(FieldType),

    /// Field must have a value.
    #[error("a {0} field must have a value")]
    ValueRequired(FieldType),

    /// Linked fields may not carry a value.
    #[error("a Linked field may only have a linkedId, not a value")]
    ValueNotAllowed,

    /// Linked fields must reference another field.
    #[error("a Linked field must have a linkedId")]
    LinkedIdRequired,

    /// Boolean fields only accept boolean values.
    #[error("a Boolean field must have a value of boolean type, got {0}")]
    NotBoolean(serde_json::Value),

    /// Text and hidden fields only accept scalar values.
    #[error("a {0} field must have a text value, got {1}")]
    NotScalar(FieldType, serde_json::Value),

    /// Source value could not be read as a boolean flag.
    #[error("{0:?} is not a boolean flag for {1}")]
    InvalidBool(String, String),
}

/// Errors generated converting an export.
#[derive(Debug, Error)]
pub enum Error {
    /// Value rejected by the target schema.
    #[error(transparent)]
    SchemaValidation(#[from] ValidationError),

    /// Source row is missing a required column.
    #[error("missing required column {column}")]
    MissingColumn {
        /// Name of the column.
        column: String,
    },

    /// Source cell is not valid UTF-8.
    #[error("column {column} is not valid UTF-8")]
    InvalidEncoding {
        /// Name of the column.
        column: String,
    },

    /// Error generated by the io module.
    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// Error generated reading or writing CSV.
    #[error(transparent)]
    Csv(#[from] csv_async::Error),

    /// Error generated by the JSON library.
    #[error(transparent)]
    Json(#[from] serde_json::Error),

    /// Error moving a temporary file into place.
    #[error(transparent)]
    Persist(#[from] tempfile::PersistError),
}

impl Error {
    /// Determine if this error only affects a single source row.
    ///
    /// Row errors are reported and the conversion continues,
    /// any other error aborts the conversion.
    pub fn is_row_error(&self) -> bool {
        matches!(
            self,
            Self::SchemaValidation(_)
                | Self::MissingColumn { .. }
                | Self::InvalidEncoding { .. }
        )
    }
}

/// Join a sequence into a human readable list with an Oxford comma.
pub(crate) fn readable_list<T: fmt::Display>(
    seq: impl IntoIterator<Item = T>,
    sep: &str,
) -> String {
    let mut items: Vec<String> =
        seq.into_iter().map(|s| s.to_string()).collect();
    if items.len() < 3 {
        return items.join(&format!(" {} ", sep));
    }
    let last = items.pop().unwrap_or_default();
    format!("{}, {} {}", items.join(", "), sep, last)
}
