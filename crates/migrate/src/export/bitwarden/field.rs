//! Custom fields attached to an item.
use enum_iterator::{all, Sequence};
use serde::{Serialize, Serializer};
use serde_json::Value;
use std::{fmt, str::FromStr};

use crate::ValidationError;

/// Enumeration of custom field types.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Sequence)]
pub enum FieldType {
    /// Plain text value.
    Text,
    /// Text value masked when displayed.
    Hidden,
    /// Boolean value.
    Boolean,
    /// Reference to a built-in field of the item.
    Linked,
}

impl fmt::Display for FieldType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}",
            match self {
                Self::Text => "Text",
                Self::Hidden => "Hidden",
                Self::Boolean => "Boolean",
                Self::Linked => "Linked",
            }
        )
    }
}

impl From<FieldType> for u8 {
    fn from(value: FieldType) -> Self {
        (&value).into()
    }
}

impl From<&FieldType> for u8 {
    fn from(value: &FieldType) -> Self {
        match value {
            FieldType::Text => 0,
            FieldType::Hidden => 1,
            FieldType::Boolean => 2,
            FieldType::Linked => 3,
        }
    }
}

impl TryFrom<i64> for FieldType {
    type Error = ValidationError;

    fn try_from(value: i64) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(FieldType::Text),
            1 => Ok(FieldType::Hidden),
            2 => Ok(FieldType::Boolean),
            3 => Ok(FieldType::Linked),
            _ => Err(ValidationError::UnknownFieldType(value)),
        }
    }
}

impl Serialize for FieldType {
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

/// Built-in item fields that a linked custom field may reference.
///
/// Names follow the property names of the item payloads; the
/// identity username is named `identityUsername` so it does not
/// collide with the login username.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Sequence)]
pub enum LinkedId {
    /// Login username.
    LoginUsername,
    /// Login password.
    LoginPassword,
    /// Card holder name.
    CardholderName,
    /// Card expiry month.
    CardExpMonth,
    /// Card expiry year.
    CardExpYear,
    /// Card security code.
    CardCode,
    /// Card brand.
    CardBrand,
    /// Card number.
    CardNumber,
    /// Identity title.
    IdentityTitle,
    /// Identity middle name.
    IdentityMiddleName,
    /// Identity first address line.
    IdentityAddress1,
    /// Identity second address line.
    IdentityAddress2,
    /// Identity third address line.
    IdentityAddress3,
    /// Identity city.
    IdentityCity,
    /// Identity state.
    IdentityState,
    /// Identity postal code.
    IdentityPostalCode,
    /// Identity country.
    IdentityCountry,
    /// Identity company.
    IdentityCompany,
    /// Identity email.
    IdentityEmail,
    /// Identity phone.
    IdentityPhone,
    /// Identity social security number.
    IdentitySsn,
    /// Identity username.
    IdentityUsername,
    /// Identity passport number.
    IdentityPassportNumber,
    /// Identity license number.
    IdentityLicenseNumber,
    /// Identity first name.
    IdentityFirstName,
    /// Identity last name.
    IdentityLastName,
    /// Identity full name.
    IdentityFullName,
}

impl LinkedId {
    /// Property name of the referenced field.
    pub fn name(&self) -> &'static str {
        match self {
            Self::LoginUsername => "username",
            Self::LoginPassword => "password",
            Self::CardholderName => "cardholderName",
            Self::CardExpMonth => "expMonth",
            Self::CardExpYear => "expYear",
            Self::CardCode => "code",
            Self::CardBrand => "brand",
            Self::CardNumber => "number",
            Self::IdentityTitle => "title",
            Self::IdentityMiddleName => "middleName",
            Self::IdentityAddress1 => "address1",
            Self::IdentityAddress2 => "address2",
            Self::IdentityAddress3 => "address3",
            Self::IdentityCity => "city",
            Self::IdentityState => "state",
            Self::IdentityPostalCode => "postalCode",
            Self::IdentityCountry => "country",
            Self::IdentityCompany => "company",
            Self::IdentityEmail => "email",
            Self::IdentityPhone => "phone",
            Self::IdentitySsn => "ssn",
            Self::IdentityUsername => "identityUsername",
            Self::IdentityPassportNumber => "passportNumber",
            Self::IdentityLicenseNumber => "licenseNumber",
            Self::IdentityFirstName => "firstName",
            Self::IdentityLastName => "lastName",
            Self::IdentityFullName => "fullName",
        }
    }
}

impl fmt::Display for LinkedId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

impl From<LinkedId> for u16 {
    fn from(value: LinkedId) -> Self {
        (&value).into()
    }
}

impl From<&LinkedId> for u16 {
    fn from(value: &LinkedId) -> Self {
        match value {
            LinkedId::LoginUsername => 100,
            LinkedId::LoginPassword => 101,
            LinkedId::CardholderName => 300,
            LinkedId::CardExpMonth => 301,
            LinkedId::CardExpYear => 302,
            LinkedId::CardCode => 303,
            LinkedId::CardBrand => 304,
            LinkedId::CardNumber => 305,
            LinkedId::IdentityTitle => 400,
            LinkedId::IdentityMiddleName => 401,
            LinkedId::IdentityAddress1 => 402,
            LinkedId::IdentityAddress2 => 403,
            LinkedId::IdentityAddress3 => 404,
            LinkedId::IdentityCity => 405,
            LinkedId::IdentityState => 406,
            LinkedId::IdentityPostalCode => 407,
            LinkedId::IdentityCountry => 408,
            LinkedId::IdentityCompany => 409,
            LinkedId::IdentityEmail => 410,
            LinkedId::IdentityPhone => 411,
            LinkedId::IdentitySsn => 412,
            LinkedId::IdentityUsername => 413,
            LinkedId::IdentityPassportNumber => 414,
            LinkedId::IdentityLicenseNumber => 415,
            LinkedId::IdentityFirstName => 416,
            LinkedId::IdentityLastName => 417,
            LinkedId::IdentityFullName => 418,
        }
    }
}

impl FromStr for LinkedId {
    type Err = ValidationError;

    /// Parse from the property name (case-insensitive) or
    /// the numeric code.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let needle = s.trim();
        if let Ok(code) = needle.parse::<u16>() {
            return all::<LinkedId>()
                .find(|id| u16::from(id) == code)
                .ok_or_else(|| ValidationError::UnknownLinkedId(s.to_owned()));
        }
        all::<LinkedId>()
            .find(|id| id.name().eq_ignore_ascii_case(needle))
            .ok_or_else(|| ValidationError::UnknownLinkedId(s.to_owned()))
    }
}

impl Serialize for LinkedId {
    fn serialize<S>(
        &self,
        serializer: S,
    ) -> std::result::Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_u16(self.into())
    }
}

/// Custom field attached to an item.
///
/// Each variant carries exactly the data its type allows so
/// an invalid combination cannot be represented once constructed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CustomField {
    /// Plain text field.
    Text {
        /// Field name.
        name: String,
        /// Field value.
        value: String,
    },
    /// Masked text field.
    Hidden {
        /// Field name.
        name: String,
        /// Field value.
        value: String,
    },
    /// Boolean field.
    Boolean {
        /// Field name.
        name: String,
        /// Field value.
        value: bool,
    },
    /// Field referencing a built-in field.
    Linked {
        /// Field name.
        name: String,
        /// Referenced field.
        linked_id: LinkedId,
    },
}

impl CustomField {
    /// Create a validated custom field from a type code and
    /// the optional value and linked reference.
    pub fn new(
        name: impl Into<String>,
        kind: i64,
        value: Option<Value>,
        linked_id: Option<LinkedId>,
    ) -> Result<Self, ValidationError> {
        let name = name.into();
        // Null is the same as no value
        let value = value.filter(|v| !v.is_null());
        let kind = FieldType::try_from(kind)?;
        match kind {
            FieldType::Text | FieldType::Hidden => {
                if linked_id.is_some() {
                    return Err(ValidationError::LinkedIdNotAllowed(kind));
                }
                let value = match value {
                    Some(Value::String(s)) => s,
                    Some(v @ (Value::Number(_) | Value::Bool(_))) => {
                        v.to_string()
                    }
                    Some(v) => {
                        return Err(ValidationError::NotScalar(kind, v))
                    }
                    None => return Err(ValidationError::ValueRequired(kind)),
                };
                Ok(if kind == FieldType::Text {
                    Self::Text { name, value }
                } else {
                    Self::Hidden { name, value }
                })
            }
            FieldType::Boolean => {
                if linked_id.is_some() {
                    return Err(ValidationError::LinkedIdNotAllowed(kind));
                }
                match value {
                    Some(Value::Bool(value)) => Ok(Self::Boolean { name, value }),
                    Some(v) => Err(ValidationError::NotBoolean(v)),
                    None => Err(ValidationError::ValueRequired(kind)),
                }
            }
            FieldType::Linked => {
                if value.is_some() {
                    return Err(ValidationError::ValueNotAllowed);
                }
                let linked_id =
                    linked_id.ok_or(ValidationError::LinkedIdRequired)?;
                Ok(Self::Linked { name, linked_id })
            }
        }
    }

    /// Create a text field.
    pub fn text(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self::Text {
            name: name.into(),
            value: value.into(),
        }
    }

    /// Create a hidden field.
    pub fn hidden(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self::Hidden {
            name: name.into(),
            value: value.into(),
        }
    }

    /// Create a boolean field.
    pub fn boolean(name: impl Into<String>, value: bool) -> Self {
        Self::Boolean {
            name: name.into(),
            value,
        }
    }

    /// Create a linked field.
    pub fn linked(name: impl Into<String>, linked_id: LinkedId) -> Self {
        Self::Linked {
            name: name.into(),
            linked_id,
        }
    }

    /// Name of the field.
    pub fn name(&self) -> &str {
        match self {
            Self::Text { name, .. }
            | Self::Hidden { name, .. }
            | Self::Boolean { name, .. }
            | Self::Linked { name, .. } => name,
        }
    }

    /// Type of the field.
    pub fn field_type(&self) -> FieldType {
        match self {
            Self::Text { .. } => FieldType::Text,
            Self::Hidden { .. } => FieldType::Hidden,
            Self::Boolean { .. } => FieldType::Boolean,
            Self::Linked { .. } => FieldType::Linked,
        }
    }

    /// Value of the field, `null` for linked fields.
    pub fn value(&self) -> Value {
        match self {
            Self::Text { value, .. } | Self::Hidden { value, .. } => {
                Value::String(value.clone())
            }
            Self::Boolean { value, .. } => Value::Bool(*value),
            Self::Linked { .. } => Value::Null,
        }
    }

    /// Linked reference for linked fields.
    pub fn linked_id(&self) -> Option<LinkedId> {
        match self {
            Self::Linked { linked_id, .. } => Some(*linked_id),
            _ => None,
        }
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct CustomFieldRepr<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    linked_id: Option<LinkedId>,
    name: &'a str,
    #[serde(rename = "type")]
    kind: FieldType,
    value: Value,
}

impl Serialize for CustomField {
    fn serialize<S>(
        &self,
        serializer: S,
    ) -> std::result::Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        CustomFieldRepr {
            name: self.name(),
            value: self.value(),
            kind: self.field_type(),
            linked_id: self.linked_id(),
        }
        .serialize(serializer)
    }
}
