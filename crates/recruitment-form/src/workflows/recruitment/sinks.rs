use async_trait::async_trait;
use serde::Serialize;
use tracing::info;

use super::payload::SubmissionPayload;

pub const SUCCESS_MESSAGE: &str = "Formularz został pomyślnie wysłany!";
pub const FAILURE_MESSAGE: &str = "Nie udało się wysłać formularza. Spróbuj ponownie.";

/// Receiver of finished payloads (e.g. a recruitment intake endpoint).
#[async_trait]
pub trait SubmissionSink: Send + Sync {
    async fn submit(&self, payload: SubmissionPayload) -> Result<(), SinkError>;
}

#[derive(Debug, thiserror::Error)]
pub enum SinkError {
    #[error("submission endpoint rejected the payload: {0}")]
    Rejected(String),
    #[error("submission endpoint unavailable: {0}")]
    Unavailable(String),
}

/// User-facing toast hooks.
pub trait NotificationSink: Send + Sync {
    fn notify(&self, notification: Notification) -> Result<(), NotificationError>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum NotificationKind {
    Success,
    Failure,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Notification {
    pub kind: NotificationKind,
    pub message: String,
}

impl Notification {
    pub fn success() -> Self {
        Self {
            kind: NotificationKind::Success,
            message: SUCCESS_MESSAGE.to_string(),
        }
    }

    pub fn failure() -> Self {
        Self {
            kind: NotificationKind::Failure,
            message: FAILURE_MESSAGE.to_string(),
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum NotificationError {
    #[error("notification channel unavailable: {0}")]
    Transport(String),
}

/// Sink that only records the payload in the log.
#[derive(Debug, Clone, Copy, Default)]
pub struct LoggingSubmissionSink;

#[async_trait]
impl SubmissionSink for LoggingSubmissionSink {
    async fn submit(&self, payload: SubmissionPayload) -> Result<(), SinkError> {
        let summary = serde_json::to_string(&payload.summary())
            .map_err(|err| SinkError::Rejected(err.to_string()))?;
        info!(
            fields = payload.text_count(),
            photos = payload.file_count(),
            payload = %summary,
            "recruitment form submitted"
        );
        Ok(())
    }
}

/// Notifications surfaced through the log.
#[derive(Debug, Clone, Copy, Default)]
pub struct LoggingNotificationSink;

impl NotificationSink for LoggingNotificationSink {
    fn notify(&self, notification: Notification) -> Result<(), NotificationError> {
        info!(kind = ?notification.kind, message = %notification.message, "notification");
        Ok(())
    }
}
