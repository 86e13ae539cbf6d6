use std::collections::BTreeMap;
use std::sync::Arc;

use axum::{
    extract::{DefaultBodyLimit, Multipart, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde::Deserialize;
use serde_json::json;
use tracing::debug;

use super::domain::{Country, FieldName, PhotoSlot, SelectedFile};
use super::photos::{ImageDecoder, PhotoPolicy};
use super::service::{FormIntake, SubmitOutcome};
use super::sinks::{NotificationSink, SubmissionSink};
use crate::error::AppError;

const MULTIPART_OVERHEAD: usize = 64 * 1024;

#[derive(Debug, Default, Deserialize)]
pub struct FormViewQuery {
    pub country: Option<String>,
}

/// Router exposing the rendered form and multipart submission.
pub fn recruitment_router<S, N, D>(intake: Arc<FormIntake<S, N, D>>) -> Router
where
    S: SubmissionSink + 'static,
    N: NotificationSink + 'static,
    D: ImageDecoder + 'static,
{
    // Oversized photos must reach the validator so the applicant sees its message.
    let policy = PhotoPolicy::default().with_max_megabytes(intake.config().photo_max_mb);
    let body_limit = policy
        .max_bytes()
        .saturating_mul(4)
        .saturating_add(MULTIPART_OVERHEAD);

    Router::new()
        .route("/api/v1/recruitment/form", get(form_view_handler::<S, N, D>))
        .route(
            "/api/v1/recruitment/applications",
            post(submit_handler::<S, N, D>),
        )
        .layer(DefaultBodyLimit::max(body_limit))
        .with_state(intake)
}

pub(crate) async fn form_view_handler<S, N, D>(
    State(intake): State<Arc<FormIntake<S, N, D>>>,
    Query(query): Query<FormViewQuery>,
) -> Response
where
    S: SubmissionSink + 'static,
    N: NotificationSink + 'static,
    D: ImageDecoder + 'static,
{
    let form = intake.open();
    if let Some(country) = query.country.as_deref().and_then(Country::from_code) {
        form.change_country(country);
    }
    (StatusCode::OK, Json(form.view())).into_response()
}

pub(crate) async fn submit_handler<S, N, D>(
    State(intake): State<Arc<FormIntake<S, N, D>>>,
    mut multipart: Multipart,
) -> Response
where
    S: SubmissionSink + 'static,
    N: NotificationSink + 'static,
    D: ImageDecoder + 'static,
{
    let mut values: BTreeMap<FieldName, String> = BTreeMap::new();
    let mut photos: BTreeMap<PhotoSlot, SelectedFile> = BTreeMap::new();

    loop {
        let field = match multipart.next_field().await {
            Ok(Some(field)) => field,
            Ok(None) => break,
            Err(err) => return bad_request(err.to_string()),
        };

        let name = field.name().unwrap_or_default().to_string();
        if let Some(slot) = PhotoSlot::from_field_name(&name) {
            let file_name = field.file_name().unwrap_or_default().to_string();
            let content_type = field
                .content_type()
                .unwrap_or(mime::APPLICATION_OCTET_STREAM.essence_str())
                .to_string();
            let bytes = match field.bytes().await {
                Ok(bytes) => bytes,
                Err(err) => return bad_request(err.to_string()),
            };
            // Browsers send an empty part for an untouched file input.
            if file_name.is_empty() && bytes.is_empty() {
                continue;
            }
            photos.insert(slot, SelectedFile::new(file_name, content_type, bytes));
        } else if let Some(field_name) = FieldName::from_key(&name) {
            match field.text().await {
                Ok(text) => {
                    values.insert(field_name, text);
                }
                Err(err) => return bad_request(err.to_string()),
            }
        } else {
            debug!(part = %name, "ignoring unknown multipart part");
        }
    }

    let form = intake.open();

    // The country goes first; changing it afterwards would wipe the region.
    if let Some(country) = values.remove(&FieldName::Country) {
        form.change_field(FieldName::Country, country);
    }
    for (field, value) in values {
        form.change_field(field, value);
    }

    let first = photos.remove(&PhotoSlot::First);
    let second = photos.remove(&PhotoSlot::Second);
    tokio::join!(
        form.select_photo(PhotoSlot::First, first),
        form.select_photo(PhotoSlot::Second, second),
    );

    match form.submit().await {
        Ok(SubmitOutcome::Submitted) => (
            StatusCode::ACCEPTED,
            Json(json!({ "status": "submitted" })),
        )
            .into_response(),
        Ok(SubmitOutcome::Rejected(rejection)) => (
            StatusCode::UNPROCESSABLE_ENTITY,
            Json(json!({
                "status": "rejected",
                "field_errors": rejection.field_errors,
                "photo_errors": rejection.photo_errors,
            })),
        )
            .into_response(),
        Ok(SubmitOutcome::Failed { reason }) => (
            StatusCode::BAD_GATEWAY,
            Json(json!({ "status": "failed", "error": reason })),
        )
            .into_response(),
        Ok(SubmitOutcome::AlreadySubmitting) => (
            StatusCode::CONFLICT,
            Json(json!({ "status": "submitting" })),
        )
            .into_response(),
        Err(err) => AppError::from(err).into_response(),
    }
}

fn bad_request(message: String) -> Response {
    (
        StatusCode::BAD_REQUEST,
        Json(json!({ "error": message })),
    )
        .into_response()
}
