//! HTTP access to the event store endpoint.

use async_trait::async_trait;
use reqwest::{Client, Response};
use shared::protocol::{events_route, CreateEventResponse, EventPayload};
use tracing::debug;
use url::Url;

use crate::error::TransportError;

#[async_trait]
pub trait EventTransport: Send + Sync {
    /// Sends `payload` to the store and returns the record it echoed back.
    async fn create_event(&self, payload: &EventPayload) -> Result<EventPayload, TransportError>;
    /// Reads the last stored record; `None` when nothing was created yet.
    async fn fetch_latest(&self) -> Result<Option<EventPayload>, TransportError>;
}

#[derive(Debug, Clone)]
pub struct HttpEventClient {
    http: Client,
    events_url: Url,
}

impl HttpEventClient {
    pub fn new(server_url: &str) -> Result<Self, TransportError> {
        Self::with_client(Client::new(), server_url)
    }

    pub fn with_client(http: Client, server_url: &str) -> Result<Self, TransportError> {
        let invalid = |source| TransportError::InvalidUrl {
            url: server_url.to_string(),
            source,
        };
        let mut base = Url::parse(server_url.trim()).map_err(invalid)?;
        if !base.path().ends_with('/') {
            let path = format!("{}/", base.path());
            base.set_path(&path);
        }
        let events_url = base
            .join(events_route().trim_start_matches('/'))
            .map_err(invalid)?;
        Ok(Self { http, events_url })
    }

    pub fn events_url(&self) -> &Url {
        &self.events_url
    }
}

fn ensure_success(res: Response) -> Result<Response, TransportError> {
    let status = res.status();
    if status.is_success() {
        Ok(res)
    } else {
        Err(TransportError::Status { status })
    }
}

#[async_trait]
impl EventTransport for HttpEventClient {
    async fn create_event(&self, payload: &EventPayload) -> Result<EventPayload, TransportError> {
        let res = self
            .http
            .post(self.events_url.clone())
            .json(payload)
            .send()
            .await?;
        let body: CreateEventResponse = ensure_success(res)?.json().await?;
        debug!(message = %body.message, "event store accepted event");
        Ok(serde_json::from_value(body.event_data)?)
    }

    async fn fetch_latest(&self) -> Result<Option<EventPayload>, TransportError> {
        let res = self.http.get(self.events_url.clone()).send().await?;
        let bytes = ensure_success(res)?.bytes().await?;
        if bytes.iter().all(u8::is_ascii_whitespace) {
            return Ok(None);
        }
        Ok(serde_json::from_slice(&bytes)?)
    }
}
