use crate::cli::ServeArgs;
use crate::infra::{load_ledger, AppState};
use crate::routes::insights_router;
use axum_prometheus::PrometheusMetricLayer;
use notary_insights::config::AppConfig;
use notary_insights::error::AppError;
use notary_insights::scheduler::{spawn_report_scheduler, TracingDigestPublisher};
use notary_insights::telemetry;
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

    let ledger = load_ledger(config.ledger_csv.as_deref())?;

    let (prometheus_layer, prometheus_handle) = PrometheusMetricLayer::pair();
    let readiness_flag = Arc::new(AtomicBool::new(false));
    let app_state = AppState {
        readiness: readiness_flag.clone(),
        metrics: Arc::new(prometheus_handle),
        mode: config.mode,
        stats: Arc::new(ledger.clone()),
    };

    let app = insights_router(app_state).layer(prometheus_layer);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;

    let scheduler = spawn_report_scheduler(
        ledger,
        Arc::new(TracingDigestPublisher),
        config.reports,
    );
    readiness_flag.store(true, Ordering::Release);

    info!(?config.environment, mode = ?config.mode, %addr, "strategic insights service ready");

    let served = axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await;

    readiness_flag.store(false, Ordering::Release);
    scheduler.shutdown().await;
    served?;
    Ok(())
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        warn!(error = %err, "failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    info!("shutdown signal received");
}
