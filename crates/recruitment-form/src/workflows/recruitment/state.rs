use chrono::NaiveDate;

use super::domain::{ApplicantRecord, Country, FieldName, Photo, PhotoSlot};
use super::payload::SubmissionPayload;
use super::photos::{PhotoStore, PhotoTicket};
use super::rules::{validate_applicant, FieldErrors, REQUIRED_MESSAGE};

/// Discrete user-driven transitions of the form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FormAction {
    FieldChanged { field: FieldName, value: String },
    /// Sets the country and clears a region that belonged to the previous one.
    CountryChanged(Country),
    PhotoSelected { slot: PhotoSlot },
    PhotoValidated { ticket: PhotoTicket, photo: Photo },
    PhotoCleared { slot: PhotoSlot },
    SubmitRequested { today: NaiveDate },
    SubmitSettled,
}

/// Everything the form renders from.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FormState {
    pub values: ApplicantRecord,
    pub field_errors: FieldErrors,
    pub photos: PhotoStore,
    pub submitting: bool,
    /// Date of the first submit attempt; from then on edits re-run the field rules.
    pub validated_on: Option<NaiveDate>,
    pending: Option<SubmissionPayload>,
}

impl FormState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_values(values: ApplicantRecord) -> Self {
        Self {
            values,
            ..Self::default()
        }
    }

    /// Payload accepted by the last submit request, until it settles.
    pub fn pending_submission(&self) -> Option<&SubmissionPayload> {
        self.pending.as_ref()
    }

    /// Newest validation handle issued for `slot`.
    pub fn latest_ticket(&self, slot: PhotoSlot) -> PhotoTicket {
        self.photos.latest(slot)
    }

    pub fn reduce(mut self, action: FormAction) -> Self {
        match action {
            FormAction::FieldChanged {
                field: FieldName::Country,
                value,
            } => {
                let country = Country::from_code(value.trim());
                self.change_country(country);
            }
            FormAction::FieldChanged { field, value } => {
                self.values.set_value(field, value);
                self.revalidate();
            }
            FormAction::CountryChanged(country) => self.change_country(Some(country)),
            FormAction::PhotoSelected { slot } => {
                self.photos.begin(slot);
            }
            FormAction::PhotoValidated { ticket, photo } => {
                self.photos.resolve(ticket, photo);
            }
            FormAction::PhotoCleared { slot } => self.photos.reset(slot),
            FormAction::SubmitRequested { today } => self.request_submit(today),
            FormAction::SubmitSettled => {
                self.submitting = false;
                self.pending = None;
            }
        }
        self
    }

    fn change_country(&mut self, country: Option<Country>) {
        if self.values.country != country {
            self.values.country = country;
            self.values.voivodeship.clear();
        }
        self.revalidate();
    }

    fn revalidate(&mut self) {
        if let Some(today) = self.validated_on {
            self.field_errors = validate_applicant(&self.values, today)
                .err()
                .unwrap_or_default();
        }
    }

    fn request_submit(&mut self, today: NaiveDate) {
        if self.submitting {
            return;
        }

        self.validated_on = Some(today);
        let applicant = match validate_applicant(&self.values, today) {
            Ok(applicant) => {
                self.field_errors = FieldErrors::new();
                Some(applicant)
            }
            Err(errors) => {
                self.field_errors = errors;
                None
            }
        };

        for slot in PhotoSlot::ALL {
            self.photos.require_file(slot, REQUIRED_MESSAGE);
        }

        if let Some(applicant) = applicant {
            if self.photos.all_valid() {
                self.pending = Some(SubmissionPayload::assemble(&applicant, &self.photos));
                self.submitting = true;
            }
        }
    }
}
