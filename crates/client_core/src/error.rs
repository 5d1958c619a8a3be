use std::path::PathBuf;

use thiserror::Error;

use crate::form::ValidationReport;

#[derive(Debug, Error)]
pub enum TransportError {
    #[error("invalid server url '{url}': {source}")]
    InvalidUrl {
        url: String,
        source: url::ParseError,
    },
    #[error("server answered {status}")]
    Status { status: reqwest::StatusCode },
    #[error("request failed: {0}")]
    Request(#[from] reqwest::Error),
    #[error("unexpected response body: {0}")]
    Decode(#[from] serde_json::Error),
}

impl TransportError {
    /// True when the server was reached but refused the request.
    pub fn is_status(&self) -> bool {
        matches!(self, TransportError::Status { .. })
    }
}

#[derive(Debug, Error)]
pub enum FormError {
    #[error("{0}")]
    Validation(ValidationReport),
    #[error(transparent)]
    Transport(#[from] TransportError),
    #[error("the form is {0} and cannot accept this action")]
    NotReady(&'static str),
    #[error("failed to read image '{}': {source}", path.display())]
    ImageRead {
        path: PathBuf,
        source: std::io::Error,
    },
}
