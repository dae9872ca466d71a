//! Classifier Backend Traits
//!
//! Trait definitions for the remote classification service. The session
//! controller and the model registry only talk to a [`ClassifierBackend`],
//! so tests and alternative transports can stand in for the HTTP client.
//!
//! # Wire Format
//!
//! - `POST {base}/predict` with `{ "text": ..., "model": ... }`
//! - `GET {base}/models` returning `{ "models": [...] }`

use async_trait::async_trait;
use serde::{Deserialize, Deserializer, Serialize};
use thiserror::Error;

/// Errors produced while talking to the classification service
#[derive(Debug, Error)]
pub enum BackendError {
    /// The request never produced a response (connection refused, timeout, ...)
    #[error("Request to classifier failed: {0}")]
    Transport(#[from] reqwest::Error),

    /// The service answered with a non-2xx status
    #[error("Classifier returned {status}: {body}")]
    Status {
        /// HTTP status code
        status: u16,
        /// Response body (may be empty)
        body: String,
    },

    /// The response body was not the expected JSON shape
    #[error("Malformed classifier response: {0}")]
    Decode(#[from] serde_json::Error),

    /// The response parsed but violated the protocol
    #[error("Unexpected classifier response: {0}")]
    Protocol(String),
}

/// Body of a prediction request
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct PredictRequest {
    /// The message under analysis
    pub text: String,
    /// Selected model id, omitted when the caller has no selection
    #[serde(skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,
}

impl PredictRequest {
    /// Create a request for `text` against `model`
    ///
    /// An empty model id means "let the service choose" and is not sent.
    pub fn new(text: impl Into<String>, model: impl Into<String>) -> Self {
        let model = model.into();
        Self {
            text: text.into(),
            model: (!model.is_empty()).then_some(model),
        }
    }
}

/// Body of a successful prediction response
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
pub struct PredictResponse {
    /// Opaque class discriminator, `"1"` for spam and `"0"` for not spam
    #[serde(deserialize_with = "prediction_as_string")]
    pub prediction: String,
    /// Model id the service actually used, if it reports one
    #[serde(default)]
    pub model_used: Option<String>,
}

/// Accept both `"1"` and `1` for the prediction field
fn prediction_as_string<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Text(String),
        Number(i64),
    }

    Ok(match Raw::deserialize(deserializer)? {
        Raw::Text(s) => s,
        Raw::Number(n) => n.to_string(),
    })
}

/// Metadata for one selectable classifier variant
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModelDescriptor {
    /// Stable identifier sent back in prediction requests
    pub id: String,
    /// Display label
    pub name: String,
    /// Short description
    #[serde(default)]
    pub description: String,
}

impl ModelDescriptor {
    /// Create a descriptor
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        description: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            description: description.into(),
        }
    }
}

/// Body of a model registry response
#[derive(Clone, Debug, Deserialize)]
pub struct ModelsResponse {
    /// Available models in service order
    pub models: Vec<ModelDescriptor>,
}

/// Classification service trait
///
/// Implement this trait to plug a different transport in front of the
/// session controller.
#[async_trait]
pub trait ClassifierBackend: Send + Sync {
    /// Get the backend name (for logs)
    fn name(&self) -> &str;

    /// Classify one message
    async fn predict(&self, request: &PredictRequest) -> Result<PredictResponse, BackendError>;

    /// List the selectable classifier variants
    async fn list_models(&self) -> Result<Vec<ModelDescriptor>, BackendError>;
}
