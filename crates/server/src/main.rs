use std::{net::SocketAddr, sync::Arc};

use anyhow::Context;
use axum::{
    extract::{rejection::JsonRejection, DefaultBodyLimit, State},
    http::{header, HeaderValue, Method, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, MethodFilter},
    Json, Router,
};
use serde_json::Value;
use server_api::{allow_header_value, create_event, health, read_event, ApiContext};
use shared::{
    error::{ApiError, ErrorCode},
    protocol::{events_route, CreateEventResponse},
};
use storage::{EventStore, InMemoryEventStore};
use tower_http::{limit::RequestBodyLimitLayer, trace::TraceLayer};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

mod app_state;
mod config;

use app_state::AppState;
use crate::config::load_settings;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let settings = load_settings()?;
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&settings.log_filter));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let store: Arc<dyn EventStore> = Arc::new(InMemoryEventStore::new());
    let state = AppState {
        api: ApiContext::new(store),
    };
    let body_limit = usize::try_from(settings.body_limit_bytes)
        .context("body_limit_bytes does not fit in memory on this platform")?;
    let app = build_router(Arc::new(state), body_limit);

    let addr: SocketAddr = settings
        .bind_addr
        .parse()
        .with_context(|| format!("invalid bind address '{}'", settings.bind_addr))?;
    info!(%addr, body_limit, "event store listening");
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;
    Ok(())
}

fn build_router(state: Arc<AppState>, body_limit: usize) -> Router {
    Router::new()
        .route("/healthz", get(healthz))
        .route(
            events_route(),
            get(http_read_event)
                .post(http_create_event)
                // `get` would otherwise answer HEAD too
                .on(MethodFilter::HEAD, http_method_not_allowed)
                .fallback(http_method_not_allowed),
        )
        .layer(DefaultBodyLimit::disable())
        .layer(RequestBodyLimitLayer::new(body_limit))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

fn status_for(code: ErrorCode) -> StatusCode {
    match code {
        ErrorCode::MethodNotAllowed => StatusCode::METHOD_NOT_ALLOWED,
        ErrorCode::Validation => StatusCode::BAD_REQUEST,
        ErrorCode::Internal => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

fn error_response(err: ApiError) -> (StatusCode, Json<ApiError>) {
    (status_for(err.code), Json(err))
}

async fn healthz(
    State(state): State<Arc<AppState>>,
) -> Result<&'static str, (StatusCode, Json<ApiError>)> {
    health(&state.api).await.map_err(error_response)?;
    Ok("ok")
}

async fn http_create_event(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<Value>, JsonRejection>,
) -> Result<Json<CreateEventResponse>, (StatusCode, Json<ApiError>)> {
    let Json(body) = payload.map_err(|rejection| {
        warn!(status = %rejection.status(), "rejected unreadable event body");
        (
            rejection.status(),
            Json(ApiError::new(ErrorCode::Validation, rejection.body_text())),
        )
    })?;
    let response = create_event(&state.api, body)
        .await
        .map_err(error_response)?;
    Ok(Json(response))
}

/// Serializes to `null` until the first event is created.
async fn http_read_event(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Option<Value>>, (StatusCode, Json<ApiError>)> {
    let latest = read_event(&state.api).await.map_err(error_response)?;
    Ok(Json(latest))
}

async fn http_method_not_allowed(method: Method) -> Response {
    warn!(%method, "rejected unsupported method on events endpoint");
    let err = ApiError::method_not_allowed(method.as_str());
    let mut response = error_response(err).into_response();
    if let Ok(allow) = HeaderValue::from_str(&allow_header_value()) {
        response.headers_mut().insert(header::ALLOW, allow);
    }
    response
}

#[cfg(test)]
#[path = "tests/main_tests.rs"]
mod tests;
