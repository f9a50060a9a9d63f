use crate::cli::ServeArgs;
use crate::infra::AppState;
use crate::routes::with_donation_routes;
use axum::Extension;
use axum_prometheus::PrometheusMetricLayer;
use donations::config::AppConfig;
use donations::donations::{
    DonationRepository, DonationService, InMemoryDonationRepository, PgDonationRepository,
};
use donations::error::AppError;
use donations::telemetry;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tracing::{info, warn};

pub(crate) async fn run(mut args: ServeArgs) -> Result<(), AppError> {
    let mut config = AppConfig::load()?;

    if let Some(host) = args.host.take() {
        config.server.host = host;
    }
    if let Some(port) = args.port.take() {
        config.server.port = port;
    }

    telemetry::init(&config.telemetry)?;

    if args.in_memory {
        warn!("serving from the in-memory store; donations are lost on shutdown");
        let repository = Arc::new(InMemoryDonationRepository::default());
        serve(&config, repository).await
    } else {
        let repository = PgDonationRepository::connect(&config.database).await?;
        repository.migrate().await?;
        serve(&config, Arc::new(repository)).await
    }
}

async fn serve<R>(config: &AppConfig, repository: Arc<R>) -> Result<(), AppError>
where
    R: DonationRepository + 'static,
{
    let (prometheus_layer, prometheus_handle) = PrometheusMetricLayer::pair();
    let readiness_flag = Arc::new(AtomicBool::new(false));
    let app_state = AppState {
        readiness: readiness_flag.clone(),
        metrics: Arc::new(prometheus_handle),
    };

    let donation_service = Arc::new(DonationService::new(repository));

    let app = with_donation_routes(donation_service)
        .layer(Extension(app_state))
        .layer(prometheus_layer);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    readiness_flag.store(true, Ordering::Release);

    info!(?config.environment, %addr, "donations service ready");

    axum::serve(listener, app).await?;
    Ok(())
}
