//! HTTP Classifier Backend
//!
//! Talks to the classification service over plain JSON HTTP.
//!
//! # Endpoints
//!
//! - `/predict` - classify one message
//! - `/models` - list available classifier variants

use std::time::Duration;

use async_trait::async_trait;

use super::traits::{
    BackendError, ClassifierBackend, ModelDescriptor, ModelsResponse, PredictRequest,
    PredictResponse,
};
use crate::config::ClientConfig;

/// Default registry fetch timeout
const REGISTRY_TIMEOUT: Duration = Duration::from_secs(10);

/// HTTP classifier client
#[derive(Clone)]
pub struct HttpClassifier {
    /// Base URL without trailing slash
    base_url: String,
    /// Timeout for the registry fetch
    registry_timeout: Duration,
    /// HTTP client
    http_client: reqwest::Client,
}

impl HttpClassifier {
    /// Create a client for `base_url` with no prediction timeout
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying HTTP client cannot be built.
    pub fn new(base_url: impl Into<String>) -> Result<Self, BackendError> {
        Self::build(base_url.into(), None, REGISTRY_TIMEOUT)
    }

    /// Create from a loaded [`ClientConfig`]
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying HTTP client cannot be built.
    pub fn from_config(config: &ClientConfig) -> Result<Self, BackendError> {
        Self::build(
            config.base_url.clone(),
            config.request_timeout,
            config.registry_timeout,
        )
    }

    fn build(
        base_url: String,
        request_timeout: Option<Duration>,
        registry_timeout: Duration,
    ) -> Result<Self, BackendError> {
        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = request_timeout {
            builder = builder.timeout(timeout);
        }

        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            registry_timeout,
            http_client: builder.build()?,
        })
    }

    /// Get the base URL
    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Get predict endpoint URL
    fn predict_url(&self) -> String {
        format!("{}/predict", self.base_url)
    }

    /// Get models endpoint URL
    fn models_url(&self) -> String {
        format!("{}/models", self.base_url)
    }

    /// Fail on non-2xx, otherwise hand back the raw body
    async fn read_body(response: reqwest::Response) -> Result<String, BackendError> {
        let status = response.status();
        let body = response.text().await?;
        if !status.is_success() {
            return Err(BackendError::Status {
                status: status.as_u16(),
                body,
            });
        }
        Ok(body)
    }
}

#[async_trait]
impl ClassifierBackend for HttpClassifier {
    fn name(&self) -> &'static str {
        "http"
    }

    async fn predict(&self, request: &PredictRequest) -> Result<PredictResponse, BackendError> {
        let response = self
            .http_client
            .post(self.predict_url())
            .json(request)
            .send()
            .await?;

        let body = Self::read_body(response).await?;
        let parsed: PredictResponse = serde_json::from_str(&body)?;

        tracing::debug!(
            prediction = %parsed.prediction,
            model_used = ?parsed.model_used,
            "Prediction received"
        );
        Ok(parsed)
    }

    async fn list_models(&self) -> Result<Vec<ModelDescriptor>, BackendError> {
        let response = self
            .http_client
            .get(self.models_url())
            .timeout(self.registry_timeout)
            .send()
            .await?;

        let body = Self::read_body(response).await?;
        let parsed: ModelsResponse = serde_json::from_str(&body)?;
        Ok(parsed.models)
    }
}
