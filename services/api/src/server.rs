use crate::cli::ServeArgs;
use crate::infra::{AppState, EnvIdentityProvider, InMemoryRegistrationRepository};
use crate::routes::with_service_routes;
use axum::Extension;
use axum_prometheus::PrometheusMetricLayer;
use std::sync::atomic::Ordering;
use std::sync::Arc;
use tracing::info;

use mlj_recruit::admin::AdminContext;
use mlj_recruit::config::AppConfig;
use mlj_recruit::error::AppError;
use mlj_recruit::registration::SubmissionService;
use mlj_recruit::storage::MemoryStorage;
use mlj_recruit::telemetry;

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

    let repository = Arc::new(InMemoryRegistrationRepository::default());
    let storage = Arc::new(MemoryStorage::default());
    let provider = Arc::new(EnvIdentityProvider::new(config.admin.clone()));

    let submission_service = Arc::new(SubmissionService::new(
        repository.clone(),
        storage.clone(),
        config.rate_limit,
    ));
    let admin_context = Arc::new(AdminContext::new(repository, storage, provider));

    let app = with_service_routes(submission_service, admin_context)
        .layer(Extension(app_state))
        .layer(prometheus_layer);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    readiness_flag.store(true, Ordering::Release);

    info!(?config.environment, %addr, "recruiting service ready");

    axum::serve(listener, app).await?;
    Ok(())
}
