use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use axum::response::Response;
use bytes::Bytes;
use chrono::NaiveDate;
use serde_json::Value;

use crate::config::FormConfig;
use crate::workflows::recruitment::domain::{ApplicantRecord, Country, FieldName, SelectedFile};
use crate::workflows::recruitment::payload::SubmissionPayload;
use crate::workflows::recruitment::photos::{DecodeError, ImageDecoder, ImageDimensions};
use crate::workflows::recruitment::service::{FormIntake, RecruitmentForm};
use crate::workflows::recruitment::sinks::{
    Notification, NotificationError, NotificationSink, SinkError, SubmissionSink,
};

pub(super) const SLOW_PREFIX: &str = "slow:";

pub(super) fn today() -> NaiveDate {
    NaiveDate::from_ymd_opt(2026, 10, 19).expect("valid date")
}

pub(super) fn valid_record() -> ApplicantRecord {
    ApplicantRecord {
        first_name: "Jan".to_string(),
        last_name: "Kowalski".to_string(),
        date_of_birth: "2007-10-19".to_string(),
        address_line1: "ul. Marszałkowska 100".to_string(),
        address_line2: None,
        zip_code: "00-950".to_string(),
        country: Some(Country::Poland),
        voivodeship: "Mazowieckie".to_string(),
        city: "Warszawa".to_string(),
    }
}

/// File whose bytes spell out the dimensions the fake decoder reports, e.g. `600x600`.
pub(super) fn photo(name: &str, content_type: &str, body: &str) -> SelectedFile {
    SelectedFile::new(name, content_type, Bytes::from(body.to_string()))
}

pub(super) fn jpeg(body: &str) -> SelectedFile {
    photo("photo.jpg", "image/jpeg", body)
}

/// Reads `WIDTHxHEIGHT` from the file body; `slow:` delays the answer by 50ms.
#[derive(Debug, Default)]
pub(super) struct HeaderDecoder {
    calls: AtomicUsize,
}

impl HeaderDecoder {
    pub(super) fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ImageDecoder for HeaderDecoder {
    async fn dimensions(&self, bytes: Bytes) -> Result<ImageDimensions, DecodeError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let text = String::from_utf8_lossy(&bytes).to_string();
        let dims = match text.strip_prefix(SLOW_PREFIX) {
            Some(rest) => {
                tokio::time::sleep(Duration::from_millis(50)).await;
                rest.to_string()
            }
            None => text,
        };

        let (width, height) = dims
            .split_once('x')
            .ok_or_else(|| DecodeError::Unreadable(dims.clone()))?;
        let width = width
            .trim()
            .parse()
            .map_err(|_| DecodeError::Unreadable(dims.clone()))?;
        let height = height
            .trim()
            .parse()
            .map_err(|_| DecodeError::Unreadable(dims.clone()))?;
        Ok(ImageDimensions::new(width, height))
    }
}

#[derive(Debug, Default)]
pub(super) struct MemorySink {
    payloads: Mutex<Vec<SubmissionPayload>>,
}

impl MemorySink {
    pub(super) fn payloads(&self) -> Vec<SubmissionPayload> {
        self.payloads.lock().expect("sink mutex poisoned").clone()
    }
}

#[async_trait]
impl SubmissionSink for MemorySink {
    async fn submit(&self, payload: SubmissionPayload) -> Result<(), SinkError> {
        self.payloads
            .lock()
            .expect("sink mutex poisoned")
            .push(payload);
        Ok(())
    }
}

#[derive(Debug, Default)]
pub(super) struct FailingSink;

#[async_trait]
impl SubmissionSink for FailingSink {
    async fn submit(&self, _payload: SubmissionPayload) -> Result<(), SinkError> {
        Err(SinkError::Unavailable("intake offline".to_string()))
    }
}

#[derive(Debug, Default)]
pub(super) struct MemoryNotifier {
    events: Mutex<Vec<Notification>>,
}

impl MemoryNotifier {
    pub(super) fn events(&self) -> Vec<Notification> {
        self.events.lock().expect("notifier mutex poisoned").clone()
    }
}

impl NotificationSink for MemoryNotifier {
    fn notify(&self, notification: Notification) -> Result<(), NotificationError> {
        self.events
            .lock()
            .expect("notifier mutex poisoned")
            .push(notification);
        Ok(())
    }
}

#[derive(Debug, Default)]
pub(super) struct BrokenNotifier;

impl NotificationSink for BrokenNotifier {
    fn notify(&self, _notification: Notification) -> Result<(), NotificationError> {
        Err(NotificationError::Transport("toast layer gone".to_string()))
    }
}

pub(super) struct Harness<S> {
    pub(super) sink: Arc<S>,
    pub(super) notifier: Arc<MemoryNotifier>,
    pub(super) decoder: Arc<HeaderDecoder>,
    pub(super) form: Arc<RecruitmentForm<S, MemoryNotifier, HeaderDecoder>>,
}

pub(super) fn harness_with<S>(sink: S) -> Harness<S>
where
    S: SubmissionSink + 'static,
{
    let sink = Arc::new(sink);
    let notifier = Arc::new(MemoryNotifier::default());
    let decoder = Arc::new(HeaderDecoder::default());
    let form = RecruitmentForm::new(
        sink.clone(),
        notifier.clone(),
        decoder.clone(),
        &FormConfig::default(),
    )
    .with_clock(today);

    Harness {
        sink,
        notifier,
        decoder,
        form: Arc::new(form),
    }
}

pub(super) fn harness() -> Harness<MemorySink> {
    harness_with(MemorySink::default())
}

pub(super) fn fill<S>(form: &RecruitmentForm<S, MemoryNotifier, HeaderDecoder>)
where
    S: SubmissionSink + 'static,
{
    let record = valid_record();
    form.change_country(Country::Poland);
    for field in FieldName::ALL {
        if field != FieldName::Country {
            form.change_field(field, record.value(field));
        }
    }
}

pub(super) fn intake(
    sink: Arc<MemorySink>,
    notifier: Arc<MemoryNotifier>,
) -> Arc<FormIntake<MemorySink, MemoryNotifier, HeaderDecoder>> {
    let config = FormConfig {
        settling_delay: Duration::ZERO,
        ..FormConfig::default()
    };
    Arc::new(
        FormIntake::new(sink, notifier, Arc::new(HeaderDecoder::default()), config)
            .with_clock(today),
    )
}

pub(super) const BOUNDARY: &str = "recruitment-boundary";

pub(super) struct FilePart<'a> {
    pub(super) name: &'a str,
    pub(super) file_name: &'a str,
    pub(super) content_type: &'a str,
    pub(super) body: &'a [u8],
}

pub(super) fn multipart_body(texts: &[(&str, &str)], files: &[FilePart<'_>]) -> Vec<u8> {
    let mut body = Vec::new();
    for (name, value) in texts {
        body.extend_from_slice(
            format!(
                "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"{name}\"\r\n\r\n{value}\r\n"
            )
            .as_bytes(),
        );
    }
    for file in files {
        body.extend_from_slice(
            format!(
                "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"{}\"; filename=\"{}\"\r\nContent-Type: {}\r\n\r\n",
                file.name, file.file_name, file.content_type
            )
            .as_bytes(),
        );
        body.extend_from_slice(file.body);
        body.extend_from_slice(b"\r\n");
    }
    body.extend_from_slice(format!("--{BOUNDARY}--\r\n").as_bytes());
    body
}

pub(super) async fn read_json_body(response: Response) -> Value {
    let body = axum::body::to_bytes(response.into_body(), 256 * 1024)
        .await
        .expect("read body");
    serde_json::from_slice(&body).expect("json payload")
}
