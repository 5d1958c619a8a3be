use std::sync::Arc;

use serde_json::Value;
use shared::{
    error::{ApiError, ErrorCode},
    protocol::{CreateEventResponse, EVENT_SAVED_MESSAGE},
};
use storage::EventStore;
use tracing::{debug, info};

/// Methods the events endpoint answers; everything else is a 405.
pub const ALLOWED_METHODS: [&str; 2] = ["GET", "POST"];

#[derive(Clone)]
pub struct ApiContext {
    pub store: Arc<dyn EventStore>,
}

impl ApiContext {
    pub fn new(store: Arc<dyn EventStore>) -> Self {
        Self { store }
    }
}

/// Value for the `Allow` header of a 405 response.
pub fn allow_header_value() -> String {
    ALLOWED_METHODS.join(", ")
}

/// Overwrites the stored event with `body` and echoes it back. The body is
/// not inspected.
pub async fn create_event(ctx: &ApiContext, body: Value) -> Result<CreateEventResponse, ApiError> {
    let stored = ctx.store.put(body).await.map_err(internal)?;
    info!(revision = stored.revision, "event stored");
    Ok(CreateEventResponse {
        message: EVENT_SAVED_MESSAGE.to_string(),
        event_data: stored.body,
    })
}

/// Returns the last created event, or `None` before the first create.
pub async fn read_event(ctx: &ApiContext) -> Result<Option<Value>, ApiError> {
    let latest = ctx.store.latest().await.map_err(internal)?;
    match &latest {
        Some(stored) => debug!(revision = stored.revision, "serving stored event"),
        None => debug!("no event stored yet"),
    }
    Ok(latest.map(|stored| stored.body))
}

pub async fn health(ctx: &ApiContext) -> Result<(), ApiError> {
    ctx.store.health_check().await.map_err(internal)
}

fn internal(err: anyhow::Error) -> ApiError {
    ApiError::new(ErrorCode::Internal, err.to_string())
}

#[cfg(test)]
#[path = "tests/lib_tests.rs"]
mod tests;
