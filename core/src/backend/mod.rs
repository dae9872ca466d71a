//! Classifier Backend Integration
//!
//! This module provides access to the remote classification service through
//! a common trait interface.
//!
//! # Available Backends
//!
//! - **HTTP**: JSON over HTTP (default)
//!
//! # Usage
//!
//! ```ignore
//! use lexiguard_core::backend::{ClassifierBackend, HttpClassifier, PredictRequest};
//!
//! let backend = HttpClassifier::new("http://localhost:8000")?;
//! let response = backend.predict(&PredictRequest::new("Win a prize!", "")).await?;
//! ```

mod http;
mod traits;

pub use http::HttpClassifier;
pub use traits::{
    BackendError, ClassifierBackend, ModelDescriptor, ModelsResponse, PredictRequest,
    PredictResponse,
};
