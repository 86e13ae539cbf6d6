use crate::cli::ServeArgs;
use crate::infra::AppState;
use crate::routes::with_form_routes;
use axum::Extension;
use axum_prometheus::PrometheusMetricLayer;
use recruitment_form::config::AppConfig;
use recruitment_form::error::AppError;
use recruitment_form::telemetry;
use recruitment_form::workflows::recruitment::{
    FormIntake, ImageCrateDecoder, LoggingNotificationSink, LoggingSubmissionSink,
};
use std::sync::atomic::Ordering;
use std::sync::Arc;
use tracing::info;

pub(crate) async fn run(mut args: ServeArgs) -> Result<(), AppError> {
    let mut config = AppConfig::load()?;

    if let Some(host) = args.host.take() {
        config.server.host = host;
    }
    if let Some(port) = args.port.take() {
        config.server.port = port;
    }

    telemetry::init(&config.telemetry)?;

    let (prometheus_layer, prometheus_handle) = PrometheusMetricLayer::pair();
    let readiness_flag = Arc::new(std::sync::atomic::AtomicBool::new(false));
    let app_state = AppState {
        readiness: readiness_flag.clone(),
        metrics: Arc::new(prometheus_handle),
    };

    let intake = Arc::new(FormIntake::new(
        Arc::new(LoggingSubmissionSink),
        Arc::new(LoggingNotificationSink),
        Arc::new(ImageCrateDecoder),
        config.form.clone(),
    ));

    let app = with_form_routes(intake)
        .layer(Extension(app_state))
        .layer(prometheus_layer);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    readiness_flag.store(true, Ordering::Release);

    info!(
        ?config.environment,
        %addr,
        settling_delay_ms = config.form.settling_delay.as_millis() as u64,
        photo_max_mb = config.form.photo_max_mb,
        "recruitment form service ready"
    );

    axum::serve(listener, app).await?;
    Ok(())
}
