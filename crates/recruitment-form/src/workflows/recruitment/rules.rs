//! Declarative field rules for the applicant record.
//!
//! Every field is checked independently and reports at most one message: the first rule it
//! breaks, in the order the rules are listed. The region field carries one cross-field rule
//! whose shape depends on the selected country.

use std::collections::BTreeMap;
use std::sync::OnceLock;

use chrono::{Datelike, NaiveDate};
use regex::Regex;
use serde::Serialize;

use super::domain::{ApplicantRecord, Country, FieldName};
use super::regions::RegionInput;

pub const REQUIRED_MESSAGE: &str = "To pole jest wymagane";

const LETTERS_PATTERN: &str = r"^[a-zA-ZąćęłńóśźżĄĆĘŁŃÓŚŹŻ\s-]+$";
const ISO_DATE_PATTERN: &str = r"^[0-9]{4}-[0-9]{2}-[0-9]{2}$";
const ZIP_CODE_PATTERN: &str = r"^[a-zA-Z0-9\s-]+$";

const NAME_MIN: usize = 2;
const NAME_MAX: usize = 40;
const ADDRESS_MIN: usize = 5;
const ADDRESS_MAX: usize = 60;
const ZIP_MIN: usize = 2;
const ZIP_MAX: usize = 10;
const ADULT_AGE: i32 = 18;

fn cached(cell: &'static OnceLock<Regex>, pattern: &str) -> &'static Regex {
    cell.get_or_init(|| Regex::new(pattern).expect("field pattern compiles"))
}

fn letters() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    cached(&PATTERN, LETTERS_PATTERN)
}

fn iso_date() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    cached(&PATTERN, ISO_DATE_PATTERN)
}

fn zip_code() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    cached(&PATTERN, ZIP_CODE_PATTERN)
}

/// Whether a value passes the letters-only pattern used for names and free-text regions.
pub fn is_letters_only(value: &str) -> bool {
    letters().is_match(value)
}

/// Field-level messages keyed by field, ready to render next to each input.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct FieldErrors(BTreeMap<FieldName, String>);

impl FieldErrors {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, field: FieldName, message: impl Into<String>) {
        self.0.insert(field, message.into());
    }

    pub fn get(&self, field: FieldName) -> Option<&str> {
        self.0.get(&field).map(String::as_str)
    }

    pub fn contains(&self, field: FieldName) -> bool {
        self.0.contains_key(&field)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = (FieldName, &str)> {
        self.0.iter().map(|(field, message)| (*field, message.as_str()))
    }
}

/// Trimmed, typed applicant data produced by a successful validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidatedApplicant {
    pub first_name: String,
    pub last_name: String,
    pub date_of_birth: NaiveDate,
    pub address_line1: String,
    pub address_line2: Option<String>,
    pub zip_code: String,
    pub voivodeship: String,
    pub city: String,
    pub country: Country,
}

impl ValidatedApplicant {
    /// Non-empty values in declaration order, keyed by field.
    pub fn fields(&self) -> Vec<(FieldName, String)> {
        let values = [
            (FieldName::FirstName, self.first_name.clone()),
            (FieldName::LastName, self.last_name.clone()),
            (
                FieldName::DateOfBirth,
                self.date_of_birth.format("%Y-%m-%d").to_string(),
            ),
            (FieldName::AddressLine1, self.address_line1.clone()),
            (
                FieldName::AddressLine2,
                self.address_line2.clone().unwrap_or_default(),
            ),
            (FieldName::ZipCode, self.zip_code.clone()),
            (FieldName::Voivodeship, self.voivodeship.clone()),
            (FieldName::City, self.city.clone()),
            (FieldName::Country, self.country.code().to_string()),
        ];

        values
            .into_iter()
            .filter(|(_, value)| !value.is_empty())
            .collect()
    }
}

/// Age in whole years on `today`.
pub fn age_on(date_of_birth: NaiveDate, today: NaiveDate) -> i32 {
    let mut age = today.year() - date_of_birth.year();
    if (today.month(), today.day()) < (date_of_birth.month(), date_of_birth.day()) {
        age -= 1;
    }
    age
}

/// Check the whole record, collecting one message per failing field.
pub fn validate_applicant(
    record: &ApplicantRecord,
    today: NaiveDate,
) -> Result<ValidatedApplicant, FieldErrors> {
    let mut errors = FieldErrors::new();

    let first_name = collect(
        &mut errors,
        FieldName::FirstName,
        person_name(&record.first_name, "Imię"),
    );
    let last_name = collect(
        &mut errors,
        FieldName::LastName,
        person_name(&record.last_name, "Nazwisko"),
    );
    let date_of_birth = collect(
        &mut errors,
        FieldName::DateOfBirth,
        date_of_birth(&record.date_of_birth, today),
    );
    let address_line1 = collect(
        &mut errors,
        FieldName::AddressLine1,
        address_line1(&record.address_line1),
    );
    let address_line2 = collect(
        &mut errors,
        FieldName::AddressLine2,
        address_line2(record.address_line2.as_deref()),
    );
    let zip_code = collect(&mut errors, FieldName::ZipCode, zip(&record.zip_code));
    let voivodeship = collect(
        &mut errors,
        FieldName::Voivodeship,
        required_trimmed(&record.voivodeship)
            .and_then(|region| region_for_country(region, record.country)),
    );
    let city = collect(&mut errors, FieldName::City, city(&record.city));
    let country = collect(
        &mut errors,
        FieldName::Country,
        record.country.ok_or_else(|| REQUIRED_MESSAGE.to_string()),
    );

    match (
        first_name,
        last_name,
        date_of_birth,
        address_line1,
        address_line2,
        zip_code,
        voivodeship,
        city,
        country,
    ) {
        (
            Some(first_name),
            Some(last_name),
            Some(date_of_birth),
            Some(address_line1),
            Some(address_line2),
            Some(zip_code),
            Some(voivodeship),
            Some(city),
            Some(country),
        ) if errors.is_empty() => Ok(ValidatedApplicant {
            first_name,
            last_name,
            date_of_birth,
            address_line1,
            address_line2,
            zip_code,
            voivodeship,
            city,
            country,
        }),
        _ => Err(errors),
    }
}

fn collect<T>(errors: &mut FieldErrors, field: FieldName, result: Result<T, String>) -> Option<T> {
    match result {
        Ok(value) => Some(value),
        Err(message) => {
            errors.insert(field, message);
            None
        }
    }
}

fn char_len(value: &str) -> usize {
    value.chars().count()
}

fn person_name(raw: &str, subject: &str) -> Result<String, String> {
    if raw.is_empty() {
        return Err(REQUIRED_MESSAGE.to_string());
    }

    let value = raw.trim();
    let len = char_len(value);
    if len < NAME_MIN {
        return Err(format!("{subject} musi mieć co najmniej {NAME_MIN} znaki"));
    }
    if len > NAME_MAX {
        return Err(format!("{subject} nie może mieć więcej niż {NAME_MAX} znaków"));
    }
    if !is_letters_only(value) {
        return Err(format!(
            "{subject} może zawierać tylko polskie i angielskie litery"
        ));
    }

    Ok(value.to_string())
}

fn date_of_birth(raw: &str, today: NaiveDate) -> Result<NaiveDate, String> {
    if raw.is_empty() {
        return Err(REQUIRED_MESSAGE.to_string());
    }

    let value = raw.trim();
    if !iso_date().is_match(value) {
        return Err("Data musi zostać zapisana w formacie: YYYY-MM-DD".to_string());
    }

    let date = NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .map_err(|_| "Data jest nieprawidłowa".to_string())?;

    if age_on(date, today) < ADULT_AGE {
        return Err(format!("Musisz mieć co najmniej {ADULT_AGE} lat"));
    }

    Ok(date)
}

fn address_line1(raw: &str) -> Result<String, String> {
    if raw.is_empty() {
        return Err(REQUIRED_MESSAGE.to_string());
    }

    let value = raw.trim();
    if char_len(value) < ADDRESS_MIN {
        return Err(format!("Adres musi mieć co najmniej {ADDRESS_MIN} znaków"));
    }
    address_max(value)?;

    Ok(value.to_string())
}

fn address_line2(raw: Option<&str>) -> Result<Option<String>, String> {
    let Some(value) = raw.map(str::trim) else {
        return Ok(None);
    };

    address_max(value)?;

    if value.is_empty() {
        Ok(None)
    } else {
        Ok(Some(value.to_string()))
    }
}

fn address_max(value: &str) -> Result<(), String> {
    if char_len(value) > ADDRESS_MAX {
        return Err(format!("Adres nie może mieć więcej niż {ADDRESS_MAX} znaków"));
    }
    Ok(())
}

fn zip(raw: &str) -> Result<String, String> {
    if raw.is_empty() {
        return Err(REQUIRED_MESSAGE.to_string());
    }

    let len = char_len(raw);
    if len < ZIP_MIN {
        return Err(format!(
            "Kod pocztowy musi mieć co najmniej {ZIP_MIN} znaki"
        ));
    }
    if len > ZIP_MAX {
        return Err(format!(
            "Kod pocztowy nie może mieć więcej niż {ZIP_MAX} znaków"
        ));
    }
    if !zip_code().is_match(raw) {
        return Err(
            "Kod pocztowy może zawierać tylko litery, cyfry, spacje i myślniki".to_string(),
        );
    }

    Ok(raw.to_string())
}

fn required_trimmed(raw: &str) -> Result<String, String> {
    if raw.is_empty() {
        return Err(REQUIRED_MESSAGE.to_string());
    }
    Ok(raw.trim().to_string())
}

// Whitespace-only input is treated as missing; an empty city would otherwise be dropped from
// the payload while passing validation.
fn city(raw: &str) -> Result<String, String> {
    let value = raw.trim();
    if value.is_empty() {
        return Err(REQUIRED_MESSAGE.to_string());
    }
    Ok(value.to_string())
}

fn region_for_country(region: String, country: Option<Country>) -> Result<String, String> {
    match RegionInput::for_country(country) {
        input @ RegionInput::Enumerated(_) => {
            if input.accepts_listed(&region) {
                Ok(region)
            } else {
                Err("Wybierz stan z listy".to_string())
            }
        }
        RegionInput::FreeText { .. } => {
            if is_letters_only(&region) {
                Ok(region)
            } else {
                Err("Województwo lub region może zawierać tylko litery".to_string())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn patterns_are_compiled_once() {
        assert!(std::ptr::eq(letters(), letters()));
        assert!(std::ptr::eq(zip_code(), zip_code()));
        assert!(!std::ptr::eq(letters(), iso_date()));
        assert!(iso_date().is_match("2001-02-30"));
    }
}
