use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

pub const GENERIC_SERVICE_FAILURE: &str = "processing failed";

/// Body returned by the analysis service when it rejects or fails a job.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ServiceFailure {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error_type: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ClientError {
    #[error("please select an image file (got '{content_type}')")]
    InvalidFileType { content_type: String },
    #[error("please select an image first")]
    NoFileSelected,
    #[error("HTTP error: {status}")]
    Http { status: u16 },
    #[error("{message}")]
    Service { message: String },
    #[error("transport error: {0}")]
    Transport(String),
    #[error("request timed out after {after:?}")]
    Timeout { after: Duration },
    #[error("malformed service response: {0}")]
    Decode(String),
    #[error("submission cancelled")]
    Cancelled,
}

impl ClientError {
    /// Text shown in the message area for this failure.
    pub fn user_message(&self) -> String {
        match self {
            ClientError::InvalidFileType { .. } | ClientError::NoFileSelected => self.to_string(),
            _ => format!("Processing failed: {self}"),
        }
    }
}

impl From<ServiceFailure> for ClientError {
    fn from(value: ServiceFailure) -> Self {
        let message = value
            .error
            .filter(|message| !message.trim().is_empty())
            .unwrap_or_else(|| GENERIC_SERVICE_FAILURE.to_string());
        ClientError::Service { message }
    }
}
