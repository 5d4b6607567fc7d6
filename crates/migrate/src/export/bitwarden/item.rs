//! Items in a Bitwarden import document.
use enum_iterator::{all, Sequence};
use serde::{Serialize, Serializer};
use serde_with::DeserializeFromStr;
use std::{fmt, str::FromStr};

use super::{CustomField, UriPattern};
use crate::{Result, ValidationError};

/// Enumeration of item types.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Sequence, DeserializeFromStr)]
pub enum ItemType {
    /// Website login.
    Login,
    /// Free text note.
    SecureNote,
    /// Payment card.
    Card,
    /// Personal identity.
    Identity,
}

impl ItemType {
    fn name(&self) -> &'static str {
        match self {
            Self::Login => "login",
            Self::SecureNote => "secureNote",
            Self::Card => "card",
            Self::Identity => "identity",
        }
    }
}

impl fmt::Display for ItemType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

impl From<ItemType> for u8 {
    fn from(value: ItemType) -> Self {
        (&value).into()
    }
}

impl From<&ItemType> for u8 {
    fn from(value: &ItemType) -> Self {
        match value {
            ItemType::Login => 1,
            ItemType::SecureNote => 2,
            ItemType::Card => 3,
            ItemType::Identity => 4,
        }
    }
}

impl TryFrom<i64> for ItemType {
    type Error = ValidationError;

    fn try_from(value: i64) -> std::result::Result<Self, Self::Error> {
        all::<ItemType>()
            .find(|t| i64::from(u8::from(t)) == value)
            .ok_or_else(|| ValidationError::UnknownItemType(value.to_string()))
    }
}

impl FromStr for ItemType {
    type Err = ValidationError;

    /// Parse from the numeric code or the name, `note` is
    /// accepted for secure notes.
    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        let needle = s.trim();
        if let Ok(code) = needle.parse::<i64>() {
            return code.try_into();
        }
        if needle.eq_ignore_ascii_case("note")
            || needle.eq_ignore_ascii_case("secure note")
        {
            return Ok(ItemType::SecureNote);
        }
        all::<ItemType>()
            .find(|t| t.name().eq_ignore_ascii_case(needle))
            .ok_or_else(|| ValidationError::UnknownItemType(s.to_owned()))
    }
}

impl Serialize for ItemType {
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

/// Whether the master password is requested before
/// an item is revealed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Sequence, DeserializeFromStr)]
pub enum Reprompt {
    /// Do not ask again.
    None,
    /// Ask for the master password.
    Password,
}

impl From<Reprompt> for u8 {
    fn from(value: Reprompt) -> Self {
        (&value).into()
    }
}

impl From<&Reprompt> for u8 {
    fn from(value: &Reprompt) -> Self {
        match value {
            Reprompt::None => 0,
            Reprompt::Password => 1,
        }
    }
}

impl FromStr for Reprompt {
    type Err = ValidationError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "0" | "none" => Ok(Reprompt::None),
            "1" | "password" => Ok(Reprompt::Password),
            _ => Err(ValidationError::UnknownReprompt(s.to_owned())),
        }
    }
}

impl Serialize for Reprompt {
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

/// Login credentials.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Login {
    /// Websites for the login.
    pub uris: Vec<UriPattern>,
    /// Account username.
    pub username: Option<String>,
    /// Account password.
    pub password: Option<String>,
    /// TOTP secret or `otpauth://` URL.
    pub totp: Option<String>,
}

/// Secure note payload.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SecureNote {
    /// Note type, always generic.
    #[serde(rename = "type")]
    kind: u8,
}

/// Payment card.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Card {
    /// Name on the card.
    pub cardholder_name: Option<String>,
    /// Card brand, for example `Visa`.
    pub brand: Option<String>,
    /// Card number.
    pub number: Option<String>,
    /// Expiry month without a leading zero.
    pub exp_month: Option<String>,
    /// Four digit expiry year.
    pub exp_year: Option<String>,
    /// Security code.
    pub code: Option<String>,
}

/// Personal identity.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Identity {
    /// Form of address.
    pub title: Option<String>,
    /// First name.
    pub first_name: Option<String>,
    /// Middle name.
    pub middle_name: Option<String>,
    /// Last name.
    pub last_name: Option<String>,
    /// First address line.
    pub address1: Option<String>,
    /// Second address line.
    pub address2: Option<String>,
    /// Third address line.
    pub address3: Option<String>,
    /// City or town.
    pub city: Option<String>,
    /// State or province.
    pub state: Option<String>,
    /// Postal code.
    pub postal_code: Option<String>,
    /// Country.
    pub country: Option<String>,
    /// Company.
    pub company: Option<String>,
    /// Email address.
    pub email: Option<String>,
    /// Phone number.
    pub phone: Option<String>,
    /// Social security number.
    pub ssn: Option<String>,
    /// Username.
    pub username: Option<String>,
    /// Passport number.
    pub passport_number: Option<String>,
    /// Driver license number.
    pub license_number: Option<String>,
}

/// Type specific data for an item.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum ItemData {
    /// Login data.
    Login(Login),
    /// Secure note data.
    SecureNote(SecureNote),
    /// Card data.
    Card(Card),
    /// Identity data.
    Identity(Identity),
}

impl ItemData {
    /// Empty data for an item type.
    pub fn empty(kind: ItemType) -> Self {
        match kind {
            ItemType::Login => Self::Login(Default::default()),
            ItemType::SecureNote => Self::SecureNote(Default::default()),
            ItemType::Card => Self::Card(Default::default()),
            ItemType::Identity => Self::Identity(Default::default()),
        }
    }

    /// Item type for this data.
    pub fn kind(&self) -> ItemType {
        match self {
            Self::Login(_) => ItemType::Login,
            Self::SecureNote(_) => ItemType::SecureNote,
            Self::Card(_) => ItemType::Card,
            Self::Identity(_) => ItemType::Identity,
        }
    }
}

/// Entry in a Bitwarden import document.
///
/// The item type is derived from the data so they always agree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Item {
    name: String,
    organization_id: Option<String>,
    folder_id: Option<String>,
    reprompt: Option<Reprompt>,
    notes: Option<String>,
    favorite: bool,
    collection_ids: Option<Vec<String>>,
    fields: Vec<CustomField>,
    data: ItemData,
}

impl Item {
    /// Item type.
    pub fn kind(&self) -> ItemType {
        self.data.kind()
    }

    /// Item name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Organization identifier.
    pub fn organization_id(&self) -> Option<&str> {
        self.organization_id.as_deref()
    }

    /// Folder identifier.
    pub fn folder_id(&self) -> Option<&str> {
        self.folder_id.as_deref()
    }

    /// Reprompt setting.
    pub fn reprompt(&self) -> Option<Reprompt> {
        self.reprompt
    }

    /// Notes.
    pub fn notes(&self) -> Option<&str> {
        self.notes.as_deref()
    }

    /// Favorite flag.
    pub fn favorite(&self) -> bool {
        self.favorite
    }

    /// Collection identifiers.
    pub fn collection_ids(&self) -> Option<&[String]> {
        self.collection_ids.as_deref()
    }

    /// Custom fields in insertion order.
    pub fn fields(&self) -> &[CustomField] {
        &self.fields
    }

    /// Type specific data.
    pub fn data(&self) -> &ItemData {
        &self.data
    }

    /// Append a custom field.
    pub fn add_field(&mut self, field: CustomField) {
        self.fields.push(field);
    }

    /// Render this item as pretty printed JSON with sorted keys.
    pub fn to_json(&self) -> Result<String> {
        super::to_sorted_json(self)
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ItemRepr<'a> {
    #[serde(rename = "type")]
    kind: ItemType,
    name: &'a str,
    organization_id: Option<&'a str>,
    folder_id: Option<&'a str>,
    reprompt: Option<Reprompt>,
    notes: Option<&'a str>,
    favorite: bool,
    fields: &'a [CustomField],
    #[serde(flatten)]
    data: &'a ItemData,
    collection_ids: Option<&'a [String]>,
}

impl Serialize for Item {
    fn serialize<S>(
        &self,
        serializer: S,
    ) -> std::result::Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        ItemRepr {
            kind: self.kind(),
            name: &self.name,
            organization_id: self.organization_id(),
            folder_id: self.folder_id(),
            reprompt: self.reprompt,
            notes: self.notes(),
            favorite: self.favorite,
            fields: &self.fields,
            data: &self.data,
            collection_ids: self.collection_ids(),
        }
        .serialize(serializer)
    }
}

/// Build an item.
pub struct ItemBuilder {
    item: Item,
}

impl ItemBuilder {
    /// Create a builder for an item with data.
    pub fn new(name: impl Into<String>, data: ItemData) -> Self {
        Self {
            item: Item {
                name: name.into(),
                organization_id: None,
                folder_id: None,
                reprompt: None,
                notes: None,
                favorite: false,
                collection_ids: None,
                fields: Vec::new(),
                data,
            },
        }
    }

    /// Create a builder for an empty item from a type code.
    pub fn from_type_code(
        code: i64,
        name: impl Into<String>,
    ) -> std::result::Result<Self, ValidationError> {
        let kind = ItemType::try_from(code)?;
        Ok(Self::new(name, ItemData::empty(kind)))
    }

    /// Set the organization identifier.
    pub fn organization_id(mut self, id: Option<String>) -> Self {
        self.item.organization_id = id;
        self
    }

    /// Set the folder identifier.
    pub fn folder_id(mut self, id: Option<String>) -> Self {
        self.item.folder_id = id;
        self
    }

    /// Set the reprompt setting.
    pub fn reprompt(mut self, reprompt: Option<Reprompt>) -> Self {
        self.item.reprompt = reprompt;
        self
    }

    /// Set the notes.
    pub fn notes(mut self, notes: Option<String>) -> Self {
        self.item.notes = notes;
        self
    }

    /// Set the favorite flag.
    pub fn favorite(mut self, favorite: bool) -> Self {
        self.item.favorite = favorite;
        self
    }

    /// Set the collection identifiers.
    pub fn collection_ids(mut self, ids: Option<Vec<String>>) -> Self {
        self.item.collection_ids = ids;
        self
    }

    /// Append a custom field.
    pub fn field(mut self, field: CustomField) -> Self {
        self.item.add_field(field);
        self
    }

    /// Build the item.
    pub fn build(self) -> Item {
        self.item
    }
}
