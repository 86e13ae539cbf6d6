use std::collections::BTreeMap;
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;

use chrono::{Local, NaiveDate};
use serde::Serialize;
use tracing::{debug, info, warn};

use super::domain::{Country, FieldName, PhotoSlot, SelectedFile};
use super::photos::{ImageDecoder, PhotoPolicy, PhotoTicket, PhotoValidator};
use super::rules::FieldErrors;
use super::sinks::{Notification, NotificationError, NotificationSink, SubmissionSink};
use super::state::{FormAction, FormState};
use super::views::FormView;
use crate::config::FormConfig;

type Clock = Arc<dyn Fn() -> NaiveDate + Send + Sync>;

/// Why a submit request did not reach the sink.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SubmissionRejection {
    pub field_errors: FieldErrors,
    pub photo_errors: BTreeMap<PhotoSlot, String>,
}

/// Result of a submit request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitOutcome {
    Submitted,
    Rejected(SubmissionRejection),
    Failed { reason: String },
    /// A previous submit is still settling.
    AlreadySubmitting,
}

#[derive(Debug, thiserror::Error)]
pub enum FormServiceError {
    #[error(transparent)]
    Notification(#[from] NotificationError),
}

/// Drives one applicant's form: field edits, photo checks, and submission.
pub struct RecruitmentForm<S, N, D> {
    state: Mutex<FormState>,
    sink: Arc<S>,
    notifier: Arc<N>,
    validator: PhotoValidator<D>,
    settling_delay: Duration,
    clock: Clock,
}

impl<S, N, D> RecruitmentForm<S, N, D>
where
    S: SubmissionSink + 'static,
    N: NotificationSink + 'static,
    D: ImageDecoder + 'static,
{
    pub fn new(sink: Arc<S>, notifier: Arc<N>, decoder: Arc<D>, config: &FormConfig) -> Self {
        let policy = PhotoPolicy::default().with_max_megabytes(config.photo_max_mb);
        Self {
            state: Mutex::new(FormState::new()),
            sink,
            notifier,
            validator: PhotoValidator::new(decoder, policy),
            settling_delay: config.settling_delay,
            clock: Arc::new(|| Local::now().date_naive()),
        }
    }

    /// Evaluate age rules against a fixed calendar instead of the local date.
    pub fn with_clock<F>(self, clock: F) -> Self
    where
        F: Fn() -> NaiveDate + Send + Sync + 'static,
    {
        self.with_shared_clock(Arc::new(clock))
    }

    fn with_shared_clock(mut self, clock: Clock) -> Self {
        self.clock = clock;
        self
    }

    pub fn policy(&self) -> &PhotoPolicy {
        self.validator.policy()
    }

    pub fn snapshot(&self) -> FormState {
        self.lock().clone()
    }

    pub fn is_submitting(&self) -> bool {
        self.lock().submitting
    }

    pub fn view(&self) -> FormView {
        FormView::render(&self.lock(), self.validator.policy())
    }

    pub fn change_field(&self, field: FieldName, value: impl Into<String>) {
        self.dispatch(FormAction::FieldChanged {
            field,
            value: value.into(),
        });
    }

    pub fn change_country(&self, country: Country) {
        self.dispatch(FormAction::CountryChanged(country));
    }

    /// Clear the slot or validate a new file for it.
    ///
    /// Returns `false` when a newer selection for the same slot superseded this one and its
    /// result was discarded.
    pub async fn select_photo(&self, slot: PhotoSlot, file: Option<SelectedFile>) -> bool {
        let Some(file) = file else {
            self.dispatch(FormAction::PhotoCleared { slot });
            debug!(%slot, "photo cleared");
            return true;
        };

        let ticket = self.begin_photo(slot);
        let photo = self.validator.validate(Some(file)).await;

        let mut guard = self.lock();
        let applied = guard.photos.is_current(ticket);
        if applied {
            let state = std::mem::take(&mut *guard);
            *guard = state.reduce(FormAction::PhotoValidated { ticket, photo });
        } else {
            debug!(%slot, request_id = ticket.request_id, "discarding stale photo validation");
        }
        applied
    }

    pub async fn submit(&self) -> Result<SubmitOutcome, FormServiceError> {
        let today = (self.clock)();

        let payload = {
            let mut guard = self.lock();
            if guard.submitting {
                return Ok(SubmitOutcome::AlreadySubmitting);
            }
            let state = std::mem::take(&mut *guard);
            *guard = state.reduce(FormAction::SubmitRequested { today });

            match guard.pending_submission() {
                Some(payload) => payload.clone(),
                None => {
                    let rejection = rejection_from(&guard);
                    info!(
                        field_errors = rejection.field_errors.len(),
                        photo_errors = rejection.photo_errors.len(),
                        "submission blocked by validation"
                    );
                    return Ok(SubmitOutcome::Rejected(rejection));
                }
            }
        };

        info!(
            fields = payload.text_count(),
            photos = payload.file_count(),
            "submitting recruitment form"
        );

        let (outcome, notification) = match self.sink.submit(payload).await {
            Ok(()) => {
                tokio::time::sleep(self.settling_delay).await;
                (SubmitOutcome::Submitted, Notification::success())
            }
            Err(err) => {
                warn!(error = %err, "submission sink failed");
                (
                    SubmitOutcome::Failed {
                        reason: err.to_string(),
                    },
                    Notification::failure(),
                )
            }
        };

        let notified = self.notifier.notify(notification);
        self.dispatch(FormAction::SubmitSettled);
        notified?;

        Ok(outcome)
    }

    fn begin_photo(&self, slot: PhotoSlot) -> PhotoTicket {
        let mut guard = self.lock();
        let state = std::mem::take(&mut *guard);
        *guard = state.reduce(FormAction::PhotoSelected { slot });
        guard.latest_ticket(slot)
    }

    fn dispatch(&self, action: FormAction) {
        let mut guard = self.lock();
        let state = std::mem::take(&mut *guard);
        *guard = state.reduce(action);
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, FormState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// Shared collaborators from which a fresh form is opened per applicant.
pub struct FormIntake<S, N, D> {
    sink: Arc<S>,
    notifier: Arc<N>,
    decoder: Arc<D>,
    config: FormConfig,
    clock: Option<Clock>,
}

impl<S, N, D> FormIntake<S, N, D>
where
    S: SubmissionSink + 'static,
    N: NotificationSink + 'static,
    D: ImageDecoder + 'static,
{
    pub fn new(sink: Arc<S>, notifier: Arc<N>, decoder: Arc<D>, config: FormConfig) -> Self {
        Self {
            sink,
            notifier,
            decoder,
            config,
            clock: None,
        }
    }

    pub fn with_clock<F>(mut self, clock: F) -> Self
    where
        F: Fn() -> NaiveDate + Send + Sync + 'static,
    {
        self.clock = Some(Arc::new(clock));
        self
    }

    pub fn config(&self) -> &FormConfig {
        &self.config
    }

    pub fn open(&self) -> RecruitmentForm<S, N, D> {
        let form = RecruitmentForm::new(
            Arc::clone(&self.sink),
            Arc::clone(&self.notifier),
            Arc::clone(&self.decoder),
            &self.config,
        );
        match &self.clock {
            Some(clock) => form.with_shared_clock(Arc::clone(clock)),
            None => form,
        }
    }
}

fn rejection_from(state: &FormState) -> SubmissionRejection {
    let photo_errors = state
        .photos
        .iter()
        .filter(|(_, photo)| !photo.is_valid)
        .filter_map(|(slot, photo)| {
            photo
                .visible_error()
                .map(|message| (slot, message.to_string()))
        })
        .collect();

    SubmissionRejection {
        field_errors: state.field_errors.clone(),
        photo_errors,
    }
}
