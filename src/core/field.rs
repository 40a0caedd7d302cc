//! Field identity and values shared by both wizards

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Every form field used by either flow
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Field {
    DialCode,
    PhoneNumber,
    ConfirmationCode,
    Email,
    Password,
    /// Terms of use checkbox
    Agreement,
    FirstName,
    SecondName,
    BirthDate,
    BirthPlace,
    SkypeName,
    FacebookProfile,
    Address,
    City,
    Country,
    ZipCode,
    /// Free-form extra delivery line
    Optional,
}

impl Field {
    /// Wire name, as used in answers files and submissions
    pub fn as_str(&self) -> &'static str {
        match self {
            Field::DialCode => "dialCode",
            Field::PhoneNumber => "phoneNumber",
            Field::ConfirmationCode => "confirmationCode",
            Field::Email => "email",
            Field::Password => "password",
            Field::Agreement => "agreement",
            Field::FirstName => "firstName",
            Field::SecondName => "secondName",
            Field::BirthDate => "birthDate",
            Field::BirthPlace => "birthPlace",
            Field::SkypeName => "skypeName",
            Field::FacebookProfile => "facebookProfile",
            Field::Address => "address",
            Field::City => "city",
            Field::Country => "country",
            Field::ZipCode => "zipCode",
            Field::Optional => "optional",
        }
    }

    /// Label shown next to the input
    pub fn label(&self) -> &'static str {
        match self {
            Field::DialCode => "Dial code",
            Field::PhoneNumber => "Phone number",
            Field::ConfirmationCode => "Confirmation code",
            Field::Email => "Email",
            Field::Password => "Password",
            Field::Agreement => "I agree with Terms of use",
            Field::FirstName => "First name",
            Field::SecondName => "Second name",
            Field::BirthDate => "Date of birth",
            Field::BirthPlace => "Place of birth",
            Field::SkypeName => "Skype",
            Field::FacebookProfile => "Facebook",
            Field::Address => "Address",
            Field::City => "City",
            Field::Country => "Country",
            Field::ZipCode => "Zip code",
            Field::Optional => "Optional",
        }
    }

    /// Whether the field holds a checkbox value rather than text
    pub fn is_flag(&self) -> bool {
        matches!(self, Field::Agreement)
    }

    /// The value an untouched field reads as
    pub fn empty_value(&self) -> FieldValue {
        if self.is_flag() {
            FieldValue::Flag(false)
        } else {
            FieldValue::Text(String::new())
        }
    }

    pub fn all() -> &'static [Field] {
        &[
            Field::DialCode,
            Field::PhoneNumber,
            Field::ConfirmationCode,
            Field::Email,
            Field::Password,
            Field::Agreement,
            Field::FirstName,
            Field::SecondName,
            Field::BirthDate,
            Field::BirthPlace,
            Field::SkypeName,
            Field::FacebookProfile,
            Field::Address,
            Field::City,
            Field::Country,
            Field::ZipCode,
            Field::Optional,
        ]
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
#[error("Unknown field: {0}")]
pub struct UnknownField(pub String);

impl FromStr for Field {
    type Err = UnknownField;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Field::all()
            .iter()
            .find(|f| f.as_str() == s)
            .copied()
            .ok_or_else(|| UnknownField(s.to_string()))
    }
}

/// Current value of a field
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FieldValue {
    Flag(bool),
    Text(String),
}

impl FieldValue {
    pub fn text(s: impl Into<String>) -> Self {
        FieldValue::Text(s.into())
    }

    /// Text content, or "" for flags
    pub fn as_text(&self) -> &str {
        match self {
            FieldValue::Text(s) => s,
            FieldValue::Flag(_) => "",
        }
    }

    pub fn as_flag(&self) -> bool {
        matches!(self, FieldValue::Flag(true))
    }

    /// Empty string or unchecked box
    pub fn is_empty(&self) -> bool {
        match self {
            FieldValue::Text(s) => s.is_empty(),
            FieldValue::Flag(b) => !b,
        }
    }
}

impl fmt::Display for FieldValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldValue::Text(s) => write!(f, "{}", s),
            FieldValue::Flag(b) => write!(f, "{}", b),
        }
    }
}

impl From<&str> for FieldValue {
    fn from(s: &str) -> Self {
        FieldValue::Text(s.to_string())
    }
}

impl From<String> for FieldValue {
    fn from(s: String) -> Self {
        FieldValue::Text(s)
    }
}

impl From<bool> for FieldValue {
    fn from(b: bool) -> Self {
        FieldValue::Flag(b)
    }
}
