//! Conversion from CSV exports.
//!
//! Columns are identified by label, compared case-insensitively,
//! using the table in [Role]. Values for columns without a role
//! are kept as custom fields.
use enum_iterator::{all, Sequence};
use serde::Deserialize;
use std::collections::HashMap;

use crate::{
    export::bitwarden::{ItemType, Reprompt, UriMatch},
    ValidationError,
};

pub mod passwords_plus;

/// Default label for entries without a title.
pub const UNTITLED: &str = "Untitled";

/// Category names mapped to item types unless
/// overridden by [MapperOptions::categories].
const DEFAULT_CATEGORIES: &[(&str, ItemType)] = &[
    ("Login", ItemType::Login),
    ("Web Login", ItemType::Login),
    ("Web Site", ItemType::Login),
    ("Website", ItemType::Login),
    ("Email", ItemType::Login),
    ("Email Account", ItemType::Login),
    ("Internet", ItemType::Login),
    ("Credit Card", ItemType::Card),
    ("Card", ItemType::Card),
    ("Debit Card", ItemType::Card),
    ("Identity", ItemType::Identity),
    ("Personal", ItemType::Identity),
    ("Note", ItemType::SecureNote),
    ("Notes", ItemType::SecureNote),
    ("Secure Note", ItemType::SecureNote),
];

/// Options that control how rows are mapped to items.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct MapperOptions {
    /// Create a folder for each category.
    pub category_folders: bool,
    /// Match strategy for every login URI.
    pub uri_match: Option<UriMatch>,
    /// Reprompt setting for every item.
    pub reprompt: Option<Reprompt>,
    /// Organization that owns the imported items.
    pub organization_id: Option<String>,
    /// Collections for the imported items.
    pub collection_ids: Option<Vec<String>>,
    /// Labels of custom fields that are masked.
    pub hidden_fields: Vec<String>,
    /// Labels of custom fields that hold boolean flags.
    pub boolean_fields: Vec<String>,
    /// Additional category names and the item type they map to.
    pub categories: HashMap<String, ItemType>,
}

impl Default for MapperOptions {
    fn default() -> Self {
        Self {
            category_folders: true,
            uri_match: None,
            reprompt: None,
            organization_id: None,
            collection_ids: None,
            hidden_fields: vec![
                "Password".to_owned(),
                "PIN".to_owned(),
                "Security Answer".to_owned(),
            ],
            boolean_fields: Vec::new(),
            categories: HashMap::new(),
        }
    }
}

impl MapperOptions {
    /// Item type for a category name.
    pub fn category_type(&self, category: &str) -> Option<ItemType> {
        let category = category.trim();
        self.categories
            .iter()
            .map(|(name, kind)| (name.as_str(), *kind))
            .chain(DEFAULT_CATEGORIES.iter().copied())
            .find(|(name, _)| name.eq_ignore_ascii_case(category))
            .map(|(_, kind)| kind)
    }

    pub(crate) fn is_hidden(&self, label: &str) -> bool {
        contains_label(&self.hidden_fields, label)
    }

    pub(crate) fn is_boolean(&self, label: &str) -> bool {
        contains_label(&self.boolean_fields, label)
    }
}

fn contains_label(labels: &[String], label: &str) -> bool {
    labels.iter().any(|l| l.trim().eq_ignore_ascii_case(label.trim()))
}

/// Meaning of a source column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Sequence)]
pub enum Role {
    /// Item name.
    Name,
    /// Category, used for the item type and folder.
    Category,
    /// Item notes.
    Notes,
    /// Favorite flag.
    Favorite,
    /// Login or identity username.
    Username,
    /// Login password.
    Password,
    /// Login websites.
    Uri,
    /// Login TOTP.
    Totp,
    /// Card holder name.
    CardholderName,
    /// Card brand.
    CardBrand,
    /// Card number.
    CardNumber,
    /// Card expiry month.
    CardExpMonth,
    /// Card expiry year.
    CardExpYear,
    /// Combined card expiry date.
    CardExpiration,
    /// Card security code.
    CardCode,
    /// Identity first name.
    FirstName,
    /// Identity middle name.
    MiddleName,
    /// Identity last name.
    LastName,
    /// Identity email.
    Email,
    /// Identity phone.
    Phone,
    /// Identity first address line.
    Address1,
    /// Identity second address line.
    Address2,
    /// Identity third address line.
    Address3,
    /// Identity city.
    City,
    /// Identity state.
    State,
    /// Identity postal code.
    PostalCode,
    /// Identity country.
    Country,
    /// Identity company.
    Company,
    /// Identity social security number.
    Ssn,
    /// Identity passport number.
    PassportNumber,
    /// Identity license number.
    LicenseNumber,
}

impl Role {
    /// Column labels for this role.
    pub fn labels(&self) -> &'static [&'static str] {
        match self {
            Self::Name => &["Title", "Name"],
            Self::Category => &["Category", "Type"],
            Self::Notes => &["Notes", "Note", "Comments"],
            Self::Favorite => &["Favorite", "Favourite"],
            Self::Username => &["Username", "User Name", "User ID", "Login"],
            Self::Password => &["Password"],
            Self::Uri => &["URL", "Website", "Web Site", "URI", "Login URI"],
            Self::Totp => &["TOTP", "OTP", "OTPAuth", "One-Time Password"],
            Self::CardholderName => {
                &["Cardholder", "Cardholder Name", "Name on Card"]
            }
            Self::CardBrand => &["Card Type", "Brand"],
            Self::CardNumber => &["Card Number", "Account Number"],
            Self::CardExpMonth => &["Exp Month", "Expiration Month"],
            Self::CardExpYear => &["Exp Year", "Expiration Year"],
            Self::CardExpiration => {
                &["Expiration", "Expiration Date", "Expires"]
            }
            Self::CardCode => &["CVV", "CVC", "CVV2", "Security Code"],
            Self::FirstName => &["First Name"],
            Self::MiddleName => &["Middle Name"],
            Self::LastName => &["Last Name"],
            Self::Email => &["Email", "E-mail", "Email Address"],
            Self::Phone => &["Phone", "Phone Number", "Telephone"],
            Self::Address1 => &["Address", "Address 1", "Street"],
            Self::Address2 => &["Address 2"],
            Self::Address3 => &["Address 3"],
            Self::City => &["City", "Town"],
            Self::State => &["State", "Province"],
            Self::PostalCode => &["Zip", "Zip Code", "Postal Code", "Postcode"],
            Self::Country => &["Country"],
            Self::Company => &["Company", "Organization"],
            Self::Ssn => &["SSN", "Social Security Number"],
            Self::PassportNumber => &["Passport Number", "Passport"],
            Self::LicenseNumber => &["License Number", "Driver License"],
        }
    }

    /// Find the role for a column label.
    pub fn from_label(label: &str) -> Option<Self> {
        let label = label.trim();
        all::<Role>().find(|role| {
            role.labels().iter().any(|l| l.eq_ignore_ascii_case(label))
        })
    }

    /// Item type a value for this role implies when the
    /// category does not name one.
    pub(crate) fn implies(&self) -> Option<ItemType> {
        match self {
            Self::Name | Self::Category | Self::Notes | Self::Favorite => None,
            Self::Username | Self::Password | Self::Uri | Self::Totp => {
                Some(ItemType::Login)
            }
            Self::CardholderName
            | Self::CardBrand
            | Self::CardNumber
            | Self::CardExpMonth
            | Self::CardExpYear
            | Self::CardExpiration
            | Self::CardCode => Some(ItemType::Card),
            _ => Some(ItemType::Identity),
        }
    }
}

/// Parse a boolean flag from a source value.
pub(crate) fn parse_bool(
    value: &str,
    label: &str,
) -> std::result::Result<bool, ValidationError> {
    match value.trim().to_lowercase().as_str() {
        "true" | "yes" | "y" | "1" => Ok(true),
        "false" | "no" | "n" | "0" | "" => Ok(false),
        _ => Err(ValidationError::InvalidBool(
            value.to_owned(),
            label.to_owned(),
        )),
    }
}

/// Parse a `MM/YY` or `MM/YYYY` expiry into month and
/// four digit year.
pub(crate) fn parse_expiration(value: &str) -> Option<(String, String)> {
    let (month, year) = value.trim().split_once(['/', '-'])?;
    let month: u8 = month.trim().parse().ok()?;
    if !(1..=12).contains(&month) {
        return None;
    }
    let year = year.trim();
    if !year.chars().all(|c| c.is_ascii_digit()) {
        return None;
    }
    let year = match year.len() {
        2 => format!("20{}", year),
        4 => year.to_owned(),
        _ => return None,
    };
    Some((month.to_string(), year))
}
