use bytes::Bytes;
use metrics_exporter_prometheus::PrometheusHandle;
use recruitment_form::error::AppError;
use recruitment_form::workflows::recruitment::{
    Country, Notification, NotificationError, NotificationKind, NotificationSink, SelectedFile,
};
use std::path::Path;
use std::sync::atomic::AtomicBool;
use std::sync::Arc;

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

/// Prints notifications the way a terminal user would see a toast.
#[derive(Debug, Default, Clone, Copy)]
pub(crate) struct ConsoleNotificationSink;

impl NotificationSink for ConsoleNotificationSink {
    fn notify(&self, notification: Notification) -> Result<(), NotificationError> {
        let marker = match notification.kind {
            NotificationKind::Success => "OK",
            NotificationKind::Failure => "ERROR",
        };
        println!("[{marker}] {}", notification.message);
        Ok(())
    }
}

pub(crate) fn parse_country(raw: &str) -> Result<Country, String> {
    let code = raw.trim().to_ascii_uppercase();
    Country::from_code(&code).ok_or_else(|| {
        let known: Vec<_> = Country::ALL.iter().map(|country| country.code()).collect();
        format!("unknown country '{raw}' (expected one of {})", known.join(", "))
    })
}

/// Read a photo from disk, guessing its MIME type from the extension like a file picker does.
pub(crate) async fn load_selected_file(path: &Path) -> Result<SelectedFile, AppError> {
    let bytes = tokio::fs::read(path).await?;
    let content_type = mime_guess::from_path(path)
        .first_or_octet_stream()
        .essence_str()
        .to_string();
    let name = path
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string());

    Ok(SelectedFile::new(name, content_type, Bytes::from(bytes)))
}
