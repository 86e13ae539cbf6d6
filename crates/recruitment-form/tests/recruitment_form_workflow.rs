//! Integration scenarios for the recruitment form.
//!
//! Scenarios drive the public form facade and HTTP router with real image decoding so the
//! photo rules are exercised against encoded JPEG and PNG bytes.

mod common {
    use std::io::Cursor;
    use std::sync::{Arc, Mutex};
    use std::time::Duration;

    use async_trait::async_trait;
    use bytes::Bytes;
    use chrono::NaiveDate;

    use recruitment_form::config::FormConfig;
    use recruitment_form::workflows::recruitment::{
        FormIntake, ImageCrateDecoder, Notification, NotificationError, NotificationSink,
        SelectedFile, SinkError, SubmissionPayload, SubmissionSink,
    };

    pub(super) fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 10, 19).expect("valid date")
    }

    pub(super) fn encoded(width: u32, height: u32, format: image::ImageFormat) -> Vec<u8> {
        let mut bytes = Vec::new();
        image::RgbImage::new(width, height)
            .write_to(&mut Cursor::new(&mut bytes), format)
            .expect("encode image");
        bytes
    }

    pub(super) fn jpeg_file(name: &str, width: u32, height: u32) -> SelectedFile {
        SelectedFile::new(
            name,
            "image/jpeg",
            Bytes::from(encoded(width, height, image::ImageFormat::Jpeg)),
        )
    }

    #[derive(Debug, Default)]
    pub(super) struct RecordingSink {
        payloads: Mutex<Vec<SubmissionPayload>>,
    }

    impl RecordingSink {
        pub(super) fn payloads(&self) -> Vec<SubmissionPayload> {
            self.payloads.lock().expect("sink mutex poisoned").clone()
        }
    }

    #[async_trait]
    impl SubmissionSink for RecordingSink {
        async fn submit(&self, payload: SubmissionPayload) -> Result<(), SinkError> {
            self.payloads
                .lock()
                .expect("sink mutex poisoned")
                .push(payload);
            Ok(())
        }
    }

    #[derive(Debug, Default)]
    pub(super) struct RecordingNotifier {
        events: Mutex<Vec<Notification>>,
    }

    impl RecordingNotifier {
        pub(super) fn events(&self) -> Vec<Notification> {
            self.events.lock().expect("notifier mutex poisoned").clone()
        }
    }

    impl NotificationSink for RecordingNotifier {
        fn notify(&self, notification: Notification) -> Result<(), NotificationError> {
            self.events
                .lock()
                .expect("notifier mutex poisoned")
                .push(notification);
            Ok(())
        }
    }

    pub(super) type Intake = FormIntake<RecordingSink, RecordingNotifier, ImageCrateDecoder>;

    pub(super) fn build_intake() -> (Arc<Intake>, Arc<RecordingSink>, Arc<RecordingNotifier>) {
        let sink = Arc::new(RecordingSink::default());
        let notifier = Arc::new(RecordingNotifier::default());
        let config = FormConfig {
            settling_delay: Duration::from_millis(10),
            ..FormConfig::default()
        };
        let intake = FormIntake::new(
            sink.clone(),
            notifier.clone(),
            Arc::new(ImageCrateDecoder),
            config,
        )
        .with_clock(today);
        (Arc::new(intake), sink, notifier)
    }
}

mod form {
    use super::common::*;

    use recruitment_form::workflows::recruitment::{
        Country, FieldName, NotificationKind, PhotoSlot, PhotoStatus, SubmitOutcome,
        REQUIRED_MESSAGE,
    };

    #[tokio::test]
    async fn applicant_completes_form_with_real_photos() {
        let (intake, sink, notifier) = build_intake();
        let form = intake.open();

        form.change_country(Country::UnitedStates);
        form.change_field(FieldName::FirstName, "Anna");
        form.change_field(FieldName::LastName, "Nowak-Smith");
        form.change_field(FieldName::DateOfBirth, "1995-03-14");
        form.change_field(FieldName::AddressLine1, "1600 Market St");
        form.change_field(FieldName::ZipCode, "94105");
        form.change_field(FieldName::Voivodeship, "California");
        form.change_field(FieldName::City, "San Francisco");

        assert!(
            form.select_photo(PhotoSlot::First, Some(jpeg_file("front.jpg", 700, 700)))
                .await
        );
        assert!(
            form.select_photo(PhotoSlot::Second, Some(jpeg_file("side.jpg", 700, 700)))
                .await
        );
        let view = form.view();
        assert!(view
            .photos
            .iter()
            .all(|photo| photo.status == PhotoStatus::Valid));

        let outcome = form.submit().await.expect("submit");

        assert_eq!(outcome, SubmitOutcome::Submitted);
        let payloads = sink.payloads();
        assert_eq!(payloads.len(), 1);
        assert_eq!(payloads[0].text("voivodeship"), Some("California"));
        assert_eq!(payloads[0].text("country"), Some("US"));
        assert_eq!(payloads[0].file_count(), 2);
        let events = notifier.events();
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].kind, NotificationKind::Success);
    }

    #[tokio::test]
    async fn undersized_png_and_missing_photo_block_submission() {
        let (intake, sink, notifier) = build_intake();
        let form = intake.open();
        let small = recruitment_form::workflows::recruitment::SelectedFile::new(
            "small.png",
            "image/png",
            bytes::Bytes::from(encoded(256, 256, image::ImageFormat::Png)),
        );

        form.select_photo(PhotoSlot::First, Some(small)).await;
        let outcome = form.submit().await.expect("submit");

        let SubmitOutcome::Rejected(rejection) = outcome else {
            panic!("submission should be rejected");
        };
        assert_eq!(
            rejection.photo_errors.get(&PhotoSlot::First).map(String::as_str),
            Some("Minimalne wymiary zdjęcia to 512x512 px")
        );
        assert_eq!(
            rejection.photo_errors.get(&PhotoSlot::Second).map(String::as_str),
            Some(REQUIRED_MESSAGE)
        );
        assert_eq!(
            rejection.field_errors.get(FieldName::Country),
            Some(REQUIRED_MESSAGE)
        );
        assert!(sink.payloads().is_empty());
        assert!(notifier.events().is_empty());
    }
}

mod http {
    use super::common::*;

    use axum::body::Body;
    use axum::http::{header, Request, StatusCode};
    use tower::ServiceExt;

    use recruitment_form::workflows::recruitment::recruitment_router;

    const BOUNDARY: &str = "integration-boundary";

    fn text_part(body: &mut Vec<u8>, name: &str, value: &str) {
        body.extend_from_slice(
            format!(
                "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"{name}\"\r\n\r\n{value}\r\n"
            )
            .as_bytes(),
        );
    }

    fn file_part(body: &mut Vec<u8>, name: &str, file_name: &str, bytes: &[u8]) {
        body.extend_from_slice(
            format!(
                "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"{name}\"; filename=\"{file_name}\"\r\nContent-Type: image/jpeg\r\n\r\n"
            )
            .as_bytes(),
        );
        body.extend_from_slice(bytes);
        body.extend_from_slice(b"\r\n");
    }

    #[tokio::test]
    async fn multipart_application_is_accepted() {
        let (intake, sink, _) = build_intake();
        let router = recruitment_router(intake);

        let mut body = Vec::new();
        for (name, value) in [
            ("firstName", "Jan"),
            ("lastName", "Kowalski"),
            ("dateOfBirth", "2000-01-01"),
            ("addressLine1", "ul. Długa 12"),
            ("zipCode", "80-831"),
            ("voivodeship", "Pomorskie"),
            ("city", "Gdańsk"),
            ("country", "PL"),
        ] {
            text_part(&mut body, name, value);
        }
        let photo = encoded(600, 800, image::ImageFormat::Jpeg);
        file_part(&mut body, "firstPhoto", "a.jpg", &photo);
        file_part(&mut body, "secondPhoto", "b.jpg", &photo);
        body.extend_from_slice(format!("--{BOUNDARY}--\r\n").as_bytes());

        let response = router
            .oneshot(
                Request::post("/api/v1/recruitment/applications")
                    .header(
                        header::CONTENT_TYPE,
                        format!("multipart/form-data; boundary={BOUNDARY}"),
                    )
                    .body(Body::from(body))
                    .expect("request builds"),
            )
            .await
            .expect("route executes");

        assert_eq!(response.status(), StatusCode::ACCEPTED);
        let payloads = sink.payloads();
        assert_eq!(payloads.len(), 1);
        assert_eq!(payloads[0].text("city"), Some("Gdańsk"));
        assert_eq!(
            payloads[0]
                .file(recruitment_form::workflows::recruitment::PhotoSlot::First)
                .map(|file| file.size()),
            Some(photo.len())
        );
    }
}
