use std::fmt;

use bytes::Bytes;
use serde::{Deserialize, Serialize};

/// Countries the applicant can pick in the address section.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Country {
    #[serde(rename = "PL")]
    Poland,
    #[serde(rename = "DE")]
    Germany,
    #[serde(rename = "US")]
    UnitedStates,
}

impl Country {
    pub const ALL: [Country; 3] = [Country::Poland, Country::Germany, Country::UnitedStates];

    pub const fn code(self) -> &'static str {
        match self {
            Country::Poland => "PL",
            Country::Germany => "DE",
            Country::UnitedStates => "US",
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            Country::Poland => "Polska",
            Country::Germany => "Niemcy",
            Country::UnitedStates => "Stany Zjednoczone",
        }
    }

    /// Parse a dropdown value. Codes are matched exactly.
    pub fn from_code(code: &str) -> Option<Self> {
        Country::ALL.into_iter().find(|country| country.code() == code)
    }
}

impl fmt::Display for Country {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

/// Every input on the form, keyed the way the submission payload names them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum FieldName {
    FirstName,
    LastName,
    DateOfBirth,
    AddressLine1,
    AddressLine2,
    ZipCode,
    Voivodeship,
    City,
    Country,
}

impl FieldName {
    /// Declaration order; payload parts follow it.
    pub const ALL: [FieldName; 9] = [
        FieldName::FirstName,
        FieldName::LastName,
        FieldName::DateOfBirth,
        FieldName::AddressLine1,
        FieldName::AddressLine2,
        FieldName::ZipCode,
        FieldName::Voivodeship,
        FieldName::City,
        FieldName::Country,
    ];

    pub const fn key(self) -> &'static str {
        match self {
            FieldName::FirstName => "firstName",
            FieldName::LastName => "lastName",
            FieldName::DateOfBirth => "dateOfBirth",
            FieldName::AddressLine1 => "addressLine1",
            FieldName::AddressLine2 => "addressLine2",
            FieldName::ZipCode => "zipCode",
            FieldName::Voivodeship => "voivodeship",
            FieldName::City => "city",
            FieldName::Country => "country",
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            FieldName::FirstName => "Imię",
            FieldName::LastName => "Nazwisko",
            FieldName::DateOfBirth => "Data urodzenia",
            FieldName::AddressLine1 => "Adres 1",
            FieldName::AddressLine2 => "Adres 2",
            FieldName::ZipCode => "Kod pocztowy",
            FieldName::Voivodeship => "Region/Województwo",
            FieldName::City => "Miasto",
            FieldName::Country => "Kraj",
        }
    }

    pub const fn required(self) -> bool {
        !matches!(self, FieldName::AddressLine2 | FieldName::Country)
    }

    pub fn from_key(key: &str) -> Option<Self> {
        FieldName::ALL.into_iter().find(|field| field.key() == key)
    }
}

impl fmt::Display for FieldName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

/// Raw values as typed by the applicant.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApplicantRecord {
    pub first_name: String,
    pub last_name: String,
    pub date_of_birth: String,
    pub address_line1: String,
    pub address_line2: Option<String>,
    pub zip_code: String,
    pub country: Option<Country>,
    pub voivodeship: String,
    pub city: String,
}

impl ApplicantRecord {
    /// Current value of a field as it would be rendered in its input.
    pub fn value(&self, field: FieldName) -> &str {
        match field {
            FieldName::FirstName => &self.first_name,
            FieldName::LastName => &self.last_name,
            FieldName::DateOfBirth => &self.date_of_birth,
            FieldName::AddressLine1 => &self.address_line1,
            FieldName::AddressLine2 => self.address_line2.as_deref().unwrap_or(""),
            FieldName::ZipCode => &self.zip_code,
            FieldName::Voivodeship => &self.voivodeship,
            FieldName::City => &self.city,
            FieldName::Country => self.country.map(Country::code).unwrap_or(""),
        }
    }

    /// Write a text input. Country goes through its code so unknown values deselect it.
    pub fn set_value(&mut self, field: FieldName, value: String) {
        match field {
            FieldName::FirstName => self.first_name = value,
            FieldName::LastName => self.last_name = value,
            FieldName::DateOfBirth => self.date_of_birth = value,
            FieldName::AddressLine1 => self.address_line1 = value,
            FieldName::AddressLine2 => self.address_line2 = Some(value),
            FieldName::ZipCode => self.zip_code = value,
            FieldName::Voivodeship => self.voivodeship = value,
            FieldName::City => self.city = value,
            FieldName::Country => self.country = Country::from_code(value.trim()),
        }
    }
}

/// One of the two required photo positions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PhotoSlot {
    First,
    Second,
}

impl PhotoSlot {
    pub const ALL: [PhotoSlot; 2] = [PhotoSlot::First, PhotoSlot::Second];

    pub const fn key(self) -> &'static str {
        match self {
            PhotoSlot::First => "first",
            PhotoSlot::Second => "second",
        }
    }

    /// Multipart field carrying this slot's file.
    pub const fn field_name(self) -> &'static str {
        match self {
            PhotoSlot::First => "firstPhoto",
            PhotoSlot::Second => "secondPhoto",
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            PhotoSlot::First => "Zdjęcie nr 1",
            PhotoSlot::Second => "Zdjęcie nr 2",
        }
    }

    pub fn from_field_name(name: &str) -> Option<Self> {
        PhotoSlot::ALL
            .into_iter()
            .find(|slot| slot.field_name() == name)
    }

    pub(crate) const fn index(self) -> usize {
        match self {
            PhotoSlot::First => 0,
            PhotoSlot::Second => 1,
        }
    }
}

impl fmt::Display for PhotoSlot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

/// A file picked by the applicant, with the MIME type reported by the picker.
#[derive(Clone, PartialEq, Eq)]
pub struct SelectedFile {
    pub name: String,
    pub content_type: String,
    pub bytes: Bytes,
}

impl SelectedFile {
    pub fn new(name: impl Into<String>, content_type: impl Into<String>, bytes: Bytes) -> Self {
        Self {
            name: name.into(),
            content_type: content_type.into(),
            bytes,
        }
    }

    pub fn size(&self) -> usize {
        self.bytes.len()
    }
}

impl fmt::Debug for SelectedFile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SelectedFile")
            .field("name", &self.name)
            .field("content_type", &self.content_type)
            .field("size", &self.size())
            .finish()
    }
}

/// State of a single photo slot.
///
/// `error` distinguishes "never checked" (`None`) from "checked and fine"
/// (`Some("")`).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Photo {
    pub file: Option<SelectedFile>,
    pub is_valid: bool,
    pub has_been_uploaded: bool,
    pub error: Option<String>,
}

impl Photo {
    pub fn empty() -> Self {
        Self::default()
    }

    pub(crate) fn rejected(file: SelectedFile, message: impl Into<String>) -> Self {
        Self {
            file: Some(file),
            is_valid: false,
            has_been_uploaded: true,
            error: Some(message.into()),
        }
    }

    pub(crate) fn accepted(file: SelectedFile) -> Self {
        Self {
            file: Some(file),
            is_valid: true,
            has_been_uploaded: true,
            error: Some(String::new()),
        }
    }

    /// Error text worth showing; the empty success marker is not.
    pub fn visible_error(&self) -> Option<&str> {
        self.error.as_deref().filter(|message| !message.is_empty())
    }
}
