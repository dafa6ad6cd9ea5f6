use crate::infra::AppState;
use axum::http::{header, StatusCode};
use axum::response::IntoResponse;
use axum::routing::get;
use axum::{Extension, Json, Router};
use notary_insights::endpoints;
use notary_insights::error::AppError;
use notary_insights::insights::{generate_strategic_insights, StrategicInsightsReport};
use serde_json::json;
use std::sync::atomic::Ordering;

pub(crate) fn insights_router(state: AppState) -> Router {
    Router::new()
        .route(endpoints::HEALTH, get(healthcheck))
        .route(endpoints::READY, get(readiness_endpoint))
        .route(endpoints::METRICS, get(metrics_endpoint))
        .route(endpoints::OPERATING_MODE, get(operating_mode_endpoint))
        .route(
            endpoints::STRATEGIC_INSIGHTS,
            get(strategic_insights_endpoint),
        )
        .layer(Extension(state))
}

pub(crate) async fn healthcheck() -> Json<serde_json::Value> {
    Json(json!({ "status": "ok" }))
}

pub(crate) async fn readiness_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    let ready = state.readiness.load(Ordering::Relaxed);
    let status = if ready {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    let payload = if ready {
        json!({ "status": "ready" })
    } else {
        json!({ "status": "initializing" })
    };

    (status, Json(payload))
}

pub(crate) async fn metrics_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    (
        StatusCode::OK,
        [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
        state.metrics.render(),
    )
}

pub(crate) async fn operating_mode_endpoint(
    Extension(state): Extension<AppState>,
) -> Json<serde_json::Value> {
    let strict = state.mode.strict_verification();
    Json(json!({
        "mode": state.mode,
        "strictVerification": strict,
        "legalValidity": strict,
    }))
}

pub(crate) async fn strategic_insights_endpoint(
    Extension(state): Extension<AppState>,
) -> Result<Json<StrategicInsightsReport>, AppError> {
    let report = generate_strategic_insights(state.stats.as_ref()).await?;
    Ok(Json(report))
}
