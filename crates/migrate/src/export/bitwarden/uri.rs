//! Login URIs and their match strategies.
use enum_iterator::{all, Sequence};
use serde::{Serialize, Serializer};
use serde_with::DeserializeFromStr;
use std::{fmt, str::FromStr};

use crate::ValidationError;

/// Strategy used to match a stored URI against a browsed URL.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Sequence, DeserializeFromStr)]
pub enum UriMatch {
    /// Use the client default.
    Default,
    /// Match the base domain.
    BaseDomain,
    /// Match the host name and port.
    Host,
    /// Match the start of the URL.
    StartsWith,
    /// Match a regular expression.
    RegularExpression,
    /// Match the exact URL.
    Exact,
    /// Never match.
    Never,
}

impl fmt::Display for UriMatch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}",
            match self {
                Self::Default => "Default",
                Self::BaseDomain => "Base domain",
                Self::Host => "Host",
                Self::StartsWith => "Starts with",
                Self::RegularExpression => "Regex",
                Self::Exact => "Exact",
                Self::Never => "Never",
            }
        )
    }
}

impl From<UriMatch> for u8 {
    fn from(value: UriMatch) -> Self {
        (&value).into()
    }
}

impl From<&UriMatch> for u8 {
    fn from(value: &UriMatch) -> Self {
        match value {
            UriMatch::Default => 0,
            UriMatch::BaseDomain => 1,
            UriMatch::Host => 2,
            UriMatch::StartsWith => 3,
            UriMatch::RegularExpression => 4,
            UriMatch::Exact => 5,
            UriMatch::Never => 6,
        }
    }
}

impl TryFrom<i64> for UriMatch {
    type Error = ValidationError;

    fn try_from(value: i64) -> Result<Self, Self::Error> {
        all::<UriMatch>()
            .find(|m| i64::from(u8::from(m)) == value)
            .ok_or_else(|| ValidationError::UnknownUriMatch(value.to_string()))
    }
}

impl FromStr for UriMatch {
    type Err = ValidationError;

    /// Parse from the numeric code or the display name,
    /// ignoring case, spaces and underscores.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if let Ok(code) = s.trim().parse::<i64>() {
            return code.try_into();
        }
        let needle = normalize(s);
        all::<UriMatch>()
            .find(|m| normalize(&m.to_string()) == needle)
            .or(match needle.as_str() {
                "basedomain" | "domain" => Some(UriMatch::BaseDomain),
                "regularexpression" => Some(UriMatch::RegularExpression),
                _ => None,
            })
            .ok_or_else(|| ValidationError::UnknownUriMatch(s.to_owned()))
    }
}

fn normalize(s: &str) -> String {
    s.chars()
        .filter(|c| !c.is_whitespace() && *c != '_' && *c != '-')
        .flat_map(char::to_lowercase)
        .collect()
}

impl Serialize for UriMatch {
    fn serialize<S>(
        &self,
        serializer: S,
    ) -> std::result::Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_u8(self.into())
    }
}

/// URI for a login and the strategy used to match it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UriPattern {
    #[serde(rename = "match")]
    match_type: Option<UriMatch>,
    uri: String,
}

impl UriPattern {
    /// Create a URI pattern from an optional match code.
    ///
    /// No match code defers to the client default. The URI
    /// itself is not validated.
    pub fn new(
        match_code: Option<i64>,
        uri: impl Into<String>,
    ) -> Result<Self, ValidationError> {
        let match_type = match_code.map(UriMatch::try_from).transpose()?;
        Ok(Self {
            match_type,
            uri: uri.into(),
        })
    }

    /// Match strategy for the URI.
    pub fn match_type(&self) -> Option<UriMatch> {
        self.match_type
    }

    /// The URI.
    pub fn uri(&self) -> &str {
        &self.uri
    }
}
