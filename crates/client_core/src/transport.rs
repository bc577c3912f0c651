//! HTTP access to the remote analysis service.

use std::time::Duration;

use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::{
    multipart::{Form, Part},
    Client, Response,
};
use shared::{
    domain::TaskId,
    error::{ClientError, ServiceFailure},
    protocol::{HealthResponse, ProcessOutcome, ProcessResponse, StoredResult},
};

use crate::{config::ClientSettings, intake::SelectedFile};

pub const PROCESS_PATH: &str = "/api/process";
pub const UPLOAD_FIELD: &str = "image";

/// Invoked once the service has answered the upload with a 2xx status,
/// before the body is read.
pub type AcceptedHook = Box<dyn FnOnce() + Send>;

#[async_trait]
pub trait AnalysisService: Send + Sync {
    /// Uploads one image and returns the confirmed-successful outcome.
    async fn process(
        &self,
        file: SelectedFile,
        on_accepted: AcceptedHook,
    ) -> Result<ProcessOutcome, ClientError>;
    async fn health(&self) -> Result<HealthResponse, ClientError>;
    async fn fetch_artifact(&self, url: &str) -> Result<Vec<u8>, ClientError>;
    async fn fetch_result(&self, task_id: &TaskId) -> Result<StoredResult, ClientError>;
}

pub struct HttpAnalysisService {
    http: Client,
    settings: ClientSettings,
}

impl HttpAnalysisService {
    pub fn new(settings: ClientSettings) -> Result<Self> {
        let http = Client::builder()
            .timeout(settings.request_timeout)
            .build()
            .context("failed to build HTTP client")?;
        Ok(Self { http, settings })
    }

    pub fn settings(&self) -> &ClientSettings {
        &self.settings
    }

    fn url(&self, path: &str) -> String {
        self.settings.resolve(path)
    }

    fn map_transport(&self, err: reqwest::Error) -> ClientError {
        map_reqwest_error(err, self.settings.request_timeout)
    }

    fn checked(&self, response: Response) -> Result<Response, ClientError> {
        let status = response.status();
        if status.is_success() {
            Ok(response)
        } else {
            tracing::warn!(status = status.as_u16(), url = %response.url(), "analysis service returned error status");
            Err(ClientError::Http {
                status: status.as_u16(),
            })
        }
    }
}

pub(crate) fn map_reqwest_error(err: reqwest::Error, timeout: Duration) -> ClientError {
    if err.is_timeout() {
        ClientError::Timeout { after: timeout }
    } else if err.is_decode() {
        ClientError::Decode(err.to_string())
    } else if let Some(status) = err.status() {
        ClientError::Http {
            status: status.as_u16(),
        }
    } else {
        ClientError::Transport(err.to_string())
    }
}

#[async_trait]
impl AnalysisService for HttpAnalysisService {
    async fn process(
        &self,
        file: SelectedFile,
        on_accepted: AcceptedHook,
    ) -> Result<ProcessOutcome, ClientError> {
        let part = Part::bytes(file.bytes().to_vec())
            .file_name(file.name().to_string())
            .mime_str(file.content_type())
            .map_err(|err| self.map_transport(err))?;
        let form = Form::new().part(UPLOAD_FIELD, part);

        tracing::info!(name = file.name(), bytes = file.len(), "uploading image for analysis");
        let response = self
            .http
            .post(self.url(PROCESS_PATH))
            .multipart(form)
            .send()
            .await
            .map_err(|err| self.map_transport(err))?;
        let response = self.checked(response)?;
        on_accepted();

        let body: ProcessResponse = response
            .json()
            .await
            .map_err(|err| ClientError::Decode(err.to_string()))?;
        body.into_outcome()
    }

    async fn health(&self) -> Result<HealthResponse, ClientError> {
        let response = self
            .http
            .get(self.url("/health"))
            .send()
            .await
            .map_err(|err| self.map_transport(err))?;
        self.checked(response)?
            .json()
            .await
            .map_err(|err| ClientError::Decode(err.to_string()))
    }

    async fn fetch_artifact(&self, url: &str) -> Result<Vec<u8>, ClientError> {
        let response = self
            .http
            .get(self.url(url))
            .send()
            .await
            .map_err(|err| self.map_transport(err))?;
        let bytes = self
            .checked(response)?
            .bytes()
            .await
            .map_err(|err| self.map_transport(err))?;
        Ok(bytes.to_vec())
    }

    async fn fetch_result(&self, task_id: &TaskId) -> Result<StoredResult, ClientError> {
        let response = self
            .http
            .get(self.url(&format!("/api/result/{}", task_id.0)))
            .send()
            .await
            .map_err(|err| self.map_transport(err))?;
        let status = response.status();
        if status == reqwest::StatusCode::NOT_FOUND {
            let failure: ServiceFailure = response.json().await.unwrap_or_default();
            return Err(ClientError::Service {
                message: failure
                    .error
                    .unwrap_or_else(|| format!("result {} not found", task_id.0)),
            });
        }
        self.checked(response)?
            .json()
            .await
            .map_err(|err| ClientError::Decode(err.to_string()))
    }
}

#[cfg(test)]
#[path = "tests/transport_tests.rs"]
mod tests;
