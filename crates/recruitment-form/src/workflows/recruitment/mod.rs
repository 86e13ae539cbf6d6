//! Recruitment application form: field rules, photo checks, and submission.
//!
//! Form state is an explicit value updated by a pure reducer ([`FormState::reduce`]);
//! [`RecruitmentForm`] wraps it with the asynchronous collaborators (image decoding, the
//! submission sink, and the notification sink) and [`recruitment_router`] exposes it over HTTP.

pub mod domain;
pub mod payload;
pub mod photos;
pub mod regions;
pub mod router;
pub mod rules;
pub mod service;
pub mod sinks;
pub mod state;
pub mod views;

#[cfg(test)]
mod tests;

pub use domain::{ApplicantRecord, Country, FieldName, Photo, PhotoSlot, SelectedFile};
pub use payload::{PartValue, PayloadPart, PayloadSummary, SubmissionPayload};
pub use photos::{
    DecodeError, ImageCrateDecoder, ImageDecoder, ImageDimensions, PhotoPolicy, PhotoStore,
    PhotoTicket, PhotoValidator,
};
pub use regions::{AddressPlaceholders, RegionInput, US_STATES};
pub use router::recruitment_router;
pub use rules::{validate_applicant, FieldErrors, ValidatedApplicant, REQUIRED_MESSAGE};
pub use service::{
    FormIntake, FormServiceError, RecruitmentForm, SubmissionRejection, SubmitOutcome,
};
pub use sinks::{
    LoggingNotificationSink, LoggingSubmissionSink, Notification, NotificationError,
    NotificationKind, NotificationSink, SinkError, SubmissionSink,
};
pub use state::{FormAction, FormState};
pub use views::{FormView, PhotoStatus};
