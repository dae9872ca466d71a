//! LexiGuard Core - Headless Spam-Check Client
//!
//! This crate holds everything a LexiGuard surface needs besides drawing:
//! talking to the classification service, explaining a spam verdict, and
//! sequencing the intro reveal. It can drive a TUI, a web front-end, or run
//! headless in tests.
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────┐
//! │                         UI Surfaces                          │
//! │        ┌─────────┐    ┌─────────┐    ┌──────────────┐        │
//! │        │   TUI   │    │  WebUI  │    │   Headless   │        │
//! │        └────┬────┘    └────┬────┘    └──────┬───────┘        │
//! │             └──────────────┼────────────────┘                │
//! │                 snapshots (up) / operations (down)           │
//! └────────────────────────────┼─────────────────────────────────┘
//!                              │
//! ┌────────────────────────────┼─────────────────────────────────┐
//! │                      LEXIGUARD CORE                          │
//! │  ┌───────────────┐  ┌─────────────┐  ┌────────────────────┐  │
//! │  │ Prediction    │  │   Model     │  │  Reveal            │  │
//! │  │ Session       │  │   Registry  │  │  Controller        │  │
//! │  └──────┬────────┘  └──────┬──────┘  └────────────────────┘  │
//! │         │ detect()         │                                 │
//! │  ┌──────┴────────┐  ┌──────┴──────────────────────────────┐  │
//! │  │ Indicators    │  │ ClassifierBackend (HTTP)            │  │
//! │  └───────────────┘  └─────────────────────────────────────┘  │
//! └──────────────────────────────────────────────────────────────┘
//! ```
//!
//! # Quick Start
//!
//! ```ignore
//! use lexiguard_core::{
//!     load_config, HttpClassifier, ModelRegistry, PredictionSession, Verdict,
//! };
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = load_config()?;
//!     let backend = HttpClassifier::from_config(&config)?;
//!
//!     let mut registry = ModelRegistry::new();
//!     registry.refresh(&backend).await;
//!
//!     let session = PredictionSession::new(backend);
//!     session.submit("Claim your FREE prize now!", registry.selected_id()).await;
//!
//!     let state = session.snapshot();
//!     if state.verdict == Some(Verdict::Spam) {
//!         for indicator in &state.indicators {
//!             println!("- {}", indicator.description());
//!         }
//!     }
//!     Ok(())
//! }
//! ```
//!
//! # Module Overview
//!
//! - [`backend`]: classification service abstraction and HTTP client
//! - [`config`]: TOML + environment configuration
//! - [`indicators`]: rule set that explains spam verdicts
//! - [`registry`]: selectable models with a built-in fallback
//! - [`reveal`]: timer-driven intro state machine
//! - [`samples`]: example messages
//! - [`session`]: submit-to-result controller
//!
//! # No TUI Dependencies
//!
//! This crate has **zero** dependencies on ratatui, crossterm, or any other
//! UI framework.

#![deny(missing_docs)]
#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod backend;
pub mod config;
pub mod indicators;
pub mod registry;
pub mod reveal;
pub mod samples;
pub mod session;

// Re-exports for convenience
pub use backend::{
    BackendError, ClassifierBackend, HttpClassifier, ModelDescriptor, PredictRequest,
    PredictResponse,
};
pub use indicators::{detect, Indicator};
pub use registry::{fallback_model, ModelRegistry, FALLBACK_MODEL_ID};
pub use reveal::{
    RevealCallbacks, RevealController, RevealError, RevealHandle, RevealPhase, RevealTimings,
};
pub use samples::{Sample, SampleKind, SAMPLES};
pub use session::{
    PredictionSession, SessionPhase, SessionState, SkipReason, SubmitOutcome, Verdict,
};

// Config exports
pub use config::{
    default_config_path, load_config, load_config_from_path, ClientConfig, ConfigError,
    ConfigSource, DEFAULT_BASE_URL,
};
