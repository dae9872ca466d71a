//! Prediction Session
//!
//! Owns the state of the submit-to-result cycle and publishes it as
//! snapshots. Surfaces read snapshots (or subscribe) and call the named
//! operations; they never write the state themselves.
//!
//! # Cycle
//!
//! ```text
//! Idle --submit--> Submitting --+--> Settled(Spam | NotSpam)
//!                               +--> Failed (verdict = Error)
//! ```
//!
//! The next edit, sample selection or submission returns the session to a
//! clean slate.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use serde::Serialize;
use tokio::sync::watch;

use crate::backend::{ClassifierBackend, PredictRequest};
use crate::indicators::{detect, Indicator};
use crate::samples;

/// Prediction value the service uses for spam
const SPAM_CLASS: &str = "1";
/// Prediction value the service uses for not spam
const HAM_CLASS: &str = "0";

/// Outcome of one classification
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
pub enum Verdict {
    /// The service flagged the message
    Spam,
    /// The service cleared the message
    NotSpam,
    /// No usable answer (transport, status or protocol failure)
    Error,
}

impl Verdict {
    /// Interpret the service's class discriminator
    ///
    /// Only `"1"` and `"0"` are recognised; anything else is a protocol error.
    #[must_use]
    pub fn from_prediction(prediction: &str) -> Self {
        match prediction.trim() {
            SPAM_CLASS => Self::Spam,
            HAM_CLASS => Self::NotSpam,
            _ => Self::Error,
        }
    }

    /// Whether this is the positive (spam) class
    #[must_use]
    pub fn is_spam(self) -> bool {
        matches!(self, Self::Spam)
    }
}

/// Coarse position in the submit cycle, derived from a [`SessionState`]
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SessionPhase {
    /// Nothing submitted since the last reset
    Idle,
    /// A request is in flight
    Submitting,
    /// The service answered with a class
    Settled(Verdict),
    /// The cycle ended in [`Verdict::Error`]
    Failed,
}

/// Snapshot of everything a surface needs to render the session
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct SessionState {
    /// Text under analysis (last edited or submitted)
    pub message: String,
    /// Model id the user picked
    pub selected_model_id: String,
    /// Verdict of the last cycle, `None` until one settles
    pub verdict: Option<Verdict>,
    /// Model that actually produced the verdict
    pub model_used: Option<String>,
    /// Spam cues, only filled for a spam verdict
    pub indicators: Vec<Indicator>,
    /// Whether a request is in flight
    pub is_submitting: bool,
    /// Technical detail of the last failure, for logs and dev views
    pub last_error: Option<String>,
}

impl SessionState {
    /// Where the cycle currently is
    #[must_use]
    pub fn phase(&self) -> SessionPhase {
        if self.is_submitting {
            return SessionPhase::Submitting;
        }
        match self.verdict {
            None => SessionPhase::Idle,
            Some(Verdict::Error) => SessionPhase::Failed,
            Some(verdict) => SessionPhase::Settled(verdict),
        }
    }

    /// Whether a submit trigger should be enabled for this state
    #[must_use]
    pub fn can_submit(&self) -> bool {
        !self.is_submitting && !self.message.trim().is_empty()
    }

    /// Clear the result fields
    fn clear_result(&mut self) {
        self.verdict = None;
        self.model_used = None;
        self.indicators.clear();
        self.last_error = None;
    }
}

/// Why a submission did nothing
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SkipReason {
    /// The message was empty after trimming
    EmptyMessage,
    /// Another submission is still in flight
    Busy,
}

/// Result of [`PredictionSession::submit`]
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// No request was issued and no state changed
    Skipped(SkipReason),
    /// The cycle ran to completion with this verdict
    Completed(Verdict),
    /// The message was edited or reset while the request was in flight, so
    /// this verdict was dropped instead of written to state
    Superseded(Verdict),
}

/// Clears `is_submitting` however the submit future ends
struct SubmittingGuard<'a> {
    state: &'a watch::Sender<SessionState>,
}

impl Drop for SubmittingGuard<'_> {
    fn drop(&mut self) {
        self.state.send_if_modified(|s| {
            let was_submitting = s.is_submitting;
            s.is_submitting = false;
            was_submitting
        });
    }
}

/// Controller for the submit-to-result cycle
///
/// Cloning is cheap; clones share the same state.
pub struct PredictionSession<B: ClassifierBackend> {
    backend: Arc<B>,
    state: Arc<watch::Sender<SessionState>>,
    /// Bumped by every submit, edit and reset; only touched under the
    /// watch lock
    generation: Arc<AtomicU64>,
}

impl<B: ClassifierBackend> Clone for PredictionSession<B> {
    fn clone(&self) -> Self {
        Self {
            backend: Arc::clone(&self.backend),
            state: Arc::clone(&self.state),
            generation: Arc::clone(&self.generation),
        }
    }
}

impl<B: ClassifierBackend> PredictionSession<B> {
    /// Create a session over `backend`
    pub fn new(backend: B) -> Self {
        Self::with_backend(Arc::new(backend))
    }

    /// Create a session over a shared backend
    pub fn with_backend(backend: Arc<B>) -> Self {
        let (state, _) = watch::channel(SessionState::default());
        Self {
            backend,
            state: Arc::new(state),
            generation: Arc::new(AtomicU64::new(0)),
        }
    }

    /// The backend this session talks to
    #[must_use]
    pub fn backend(&self) -> &Arc<B> {
        &self.backend
    }

    /// Current state
    #[must_use]
    pub fn snapshot(&self) -> SessionState {
        self.state.borrow().clone()
    }

    /// Subscribe to state changes
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<SessionState> {
        self.state.subscribe()
    }

    /// Whether a request is in flight
    #[must_use]
    pub fn is_submitting(&self) -> bool {
        self.state.borrow().is_submitting
    }

    /// Record the model the user picked
    pub fn select_model(&self, model_id: impl Into<String>) {
        let model_id = model_id.into();
        self.state.send_if_modified(|s| {
            if s.selected_model_id == model_id {
                return false;
            }
            s.selected_model_id = model_id;
            true
        });
    }

    /// Clear the verdict, model-used label and indicators
    ///
    /// Local and synchronous: no request is issued. A request already in
    /// flight still completes but its result is discarded.
    pub fn reset(&self) {
        self.state.send_if_modified(|s| {
            self.generation.fetch_add(1, Ordering::Relaxed);
            let had_result =
                s.verdict.is_some() || s.model_used.is_some() || !s.indicators.is_empty();
            s.clear_result();
            had_result
        });
    }

    /// Replace the message text and clear any previous result
    ///
    /// A request already in flight still completes but its result is
    /// discarded.
    pub fn edit(&self, message: impl Into<String>) {
        let message = message.into();
        self.state.send_modify(|s| {
            self.generation.fetch_add(1, Ordering::Relaxed);
            s.message = message;
            s.clear_result();
        });
    }

    /// Load built-in sample `index` as the message
    ///
    /// Returns `false` for an unknown index (nothing changes).
    pub fn select_sample(&self, index: usize) -> bool {
        match samples::get(index) {
            Some(sample) => {
                self.edit(sample.text);
                true
            }
            None => false,
        }
    }

    /// Run one classification cycle
    ///
    /// Empty (after trimming) messages and calls made while another cycle is
    /// in flight are skipped without touching state or the network.
    /// Otherwise the previous result is cleared before the request is sent,
    /// and `is_submitting` is cleared however the cycle ends. If the message
    /// is edited or reset before the reply arrives, the reply is dropped.
    pub async fn submit(&self, message: &str, model_id: &str) -> SubmitOutcome {
        if message.trim().is_empty() {
            tracing::debug!("Skipping submit of empty message");
            return SubmitOutcome::Skipped(SkipReason::EmptyMessage);
        }

        let mut busy = false;
        let mut cycle = 0;
        self.state.send_if_modified(|s| {
            if s.is_submitting {
                busy = true;
                return false;
            }
            cycle = self.generation.fetch_add(1, Ordering::Relaxed) + 1;
            s.is_submitting = true;
            s.message = message.to_string();
            s.selected_model_id = model_id.to_string();
            s.clear_result();
            true
        });
        if busy {
            tracing::debug!("Skipping submit while another is in flight");
            return SubmitOutcome::Skipped(SkipReason::Busy);
        }

        let _guard = SubmittingGuard { state: &self.state };

        let request = PredictRequest::new(message, model_id);
        tracing::debug!(
            backend = self.backend.name(),
            model = %model_id,
            chars = message.chars().count(),
            "Submitting message"
        );

        let settled = match self.backend.predict(&request).await {
            Ok(response) => {
                let verdict = Verdict::from_prediction(&response.prediction);
                if verdict == Verdict::Error {
                    tracing::warn!(
                        prediction = %response.prediction,
                        "Classifier returned an unrecognised prediction"
                    );
                    Settled::failed(format!(
                        "unrecognised prediction '{}'",
                        response.prediction
                    ))
                } else {
                    let model_used = response
                        .model_used
                        .filter(|m| !m.is_empty())
                        .or_else(|| (!model_id.is_empty()).then(|| model_id.to_string()));
                    let indicators = if verdict.is_spam() {
                        detect(message)
                    } else {
                        Vec::new()
                    };
                    tracing::info!(
                        verdict = ?verdict,
                        model_used = ?model_used,
                        indicators = indicators.len(),
                        "Prediction settled"
                    );
                    Settled {
                        verdict,
                        model_used,
                        indicators,
                        error: None,
                    }
                }
            }
            Err(e) => {
                tracing::warn!(error = %e, model = %model_id, "Prediction request failed");
                Settled::failed(e.to_string())
            }
        };

        let verdict = settled.verdict;
        let mut current = true;
        self.state.send_modify(|s| {
            current = self.generation.load(Ordering::Relaxed) == cycle;
            if current {
                s.verdict = Some(settled.verdict);
                s.model_used = settled.model_used;
                s.indicators = settled.indicators;
                s.last_error = settled.error;
            }
            s.is_submitting = false;
        });

        if current {
            SubmitOutcome::Completed(verdict)
        } else {
            tracing::debug!(verdict = ?verdict, "Discarding result of a superseded submit");
            SubmitOutcome::Superseded(verdict)
        }
    }
}

/// Terminal values of one cycle
struct Settled {
    verdict: Verdict,
    model_used: Option<String>,
    indicators: Vec<Indicator>,
    error: Option<String>,
}

impl Settled {
    fn failed(error: String) -> Self {
        Self {
            verdict: Verdict::Error,
            model_used: None,
            indicators: Vec::new(),
            error: Some(error),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::{BackendError, ModelDescriptor, PredictResponse};
    use async_trait::async_trait;
    use pretty_assertions::assert_eq;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;
    use std::time::Duration;
    use tokio::sync::Notify;

    const PRIZE: &str =
        "CONGRATULATIONS! You've won a FREE iPhone! Click here to claim your prize NOW!!!";
    const COFFEE: &str = "Hey, are we still meeting for coffee tomorrow at 3pm?";

    /// Scripted backend that counts calls and can hold requests open
    struct MockBackend {
        reply: Mutex<Result<(String, Option<String>), String>>,
        calls: AtomicUsize,
        requests: Mutex<Vec<PredictRequest>>,
        gate: Option<Arc<Notify>>,
    }

    impl MockBackend {
        fn answering(prediction: &str, model_used: Option<&str>) -> Self {
            Self {
                reply: Mutex::new(Ok((prediction.to_string(), model_used.map(String::from)))),
                calls: AtomicUsize::new(0),
                requests: Mutex::new(Vec::new()),
                gate: None,
            }
        }

        fn failing(error: &str) -> Self {
            Self {
                reply: Mutex::new(Err(error.to_string())),
                ..Self::answering("0", None)
            }
        }

        fn gated(mut self, gate: Arc<Notify>) -> Self {
            self.gate = Some(gate);
            self
        }

        fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl ClassifierBackend for MockBackend {
        fn name(&self) -> &str {
            "mock"
        }

        async fn predict(&self, request: &PredictRequest) -> Result<PredictResponse, BackendError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.requests.lock().unwrap().push(request.clone());
            if let Some(gate) = &self.gate {
                gate.notified().await;
            }
            match &*self.reply.lock().unwrap() {
                Ok((prediction, model_used)) => Ok(PredictResponse {
                    prediction: prediction.clone(),
                    model_used: model_used.clone(),
                }),
                Err(message) => Err(BackendError::Protocol(message.clone())),
            }
        }

        async fn list_models(&self) -> Result<Vec<ModelDescriptor>, BackendError> {
            Ok(Vec::new())
        }
    }

    #[test]
    fn test_verdict_from_prediction() {
        assert_eq!(Verdict::from_prediction("1"), Verdict::Spam);
        assert_eq!(Verdict::from_prediction("0"), Verdict::NotSpam);
        assert_eq!(Verdict::from_prediction(" 1 "), Verdict::Spam);
        assert_eq!(Verdict::from_prediction("spam"), Verdict::Error);
        assert_eq!(Verdict::from_prediction("2"), Verdict::Error);
        assert_eq!(Verdict::from_prediction(""), Verdict::Error);
    }

    #[tokio::test]
    async fn empty_messages_are_skipped() {
        let session = PredictionSession::new(MockBackend::answering("1", None));

        assert_eq!(
            session.submit("", "nb").await,
            SubmitOutcome::Skipped(SkipReason::EmptyMessage)
        );
        assert_eq!(
            session.submit("   \n\t", "nb").await,
            SubmitOutcome::Skipped(SkipReason::EmptyMessage)
        );

        assert_eq!(session.backend().calls(), 0);
        assert_eq!(session.snapshot(), SessionState::default());
    }

    #[tokio::test]
    async fn empty_submit_keeps_previous_verdict() {
        let session = PredictionSession::new(MockBackend::answering("1", None));
        session.submit(PRIZE, "nb").await;
        let before = session.snapshot();

        session.submit("  ", "nb").await;
        assert_eq!(session.snapshot(), before);
        assert_eq!(session.backend().calls(), 1);
    }

    #[tokio::test]
    async fn spam_verdict_records_indicators() {
        let session = PredictionSession::new(MockBackend::answering("1", Some("svm")));

        let outcome = session.submit(PRIZE, "nb").await;
        assert_eq!(outcome, SubmitOutcome::Completed(Verdict::Spam));

        let state = session.snapshot();
        assert_eq!(state.verdict, Some(Verdict::Spam));
        assert_eq!(state.indicators, detect(PRIZE));
        assert_eq!(state.model_used.as_deref(), Some("svm"));
        assert_eq!(state.phase(), SessionPhase::Settled(Verdict::Spam));
        assert!(!state.is_submitting);

        let requests = session.backend().requests.lock().unwrap().clone();
        assert_eq!(requests, vec![PredictRequest::new(PRIZE, "nb")]);
    }

    #[tokio::test]
    async fn not_spam_has_no_indicators() {
        // Even a spammy-looking text gets no explanation when the model clears it
        let session = PredictionSession::new(MockBackend::answering("0", None));
        session.submit(PRIZE, "nb").await;

        let state = session.snapshot();
        assert_eq!(state.verdict, Some(Verdict::NotSpam));
        assert!(state.indicators.is_empty());
    }

    #[tokio::test]
    async fn model_used_falls_back_to_requested_id() {
        let session = PredictionSession::new(MockBackend::answering("0", None));
        session.submit(COFFEE, "nb").await;
        assert_eq!(session.snapshot().model_used.as_deref(), Some("nb"));

        let session = PredictionSession::new(MockBackend::answering("0", Some("")));
        session.submit(COFFEE, "svm").await;
        assert_eq!(session.snapshot().model_used.as_deref(), Some("svm"));
    }

    #[tokio::test]
    async fn transport_failure_is_error_verdict() {
        let session = PredictionSession::new(MockBackend::failing("connection refused"));

        let outcome = session.submit(PRIZE, "nb").await;
        assert_eq!(outcome, SubmitOutcome::Completed(Verdict::Error));

        let state = session.snapshot();
        assert_eq!(state.verdict, Some(Verdict::Error));
        assert!(state.indicators.is_empty());
        assert_eq!(state.model_used, None);
        assert!(!state.is_submitting);
        assert!(state.can_submit());
        assert_eq!(state.phase(), SessionPhase::Failed);
        assert!(state.last_error.unwrap().contains("connection refused"));
    }

    #[tokio::test]
    async fn unknown_prediction_is_error_verdict() {
        let session = PredictionSession::new(MockBackend::answering("maybe", Some("svm")));
        session.submit(PRIZE, "nb").await;

        let state = session.snapshot();
        assert_eq!(state.verdict, Some(Verdict::Error));
        assert_eq!(state.model_used, None);
        assert!(state.indicators.is_empty());
    }

    #[tokio::test]
    async fn previous_result_cleared_before_request() {
        let gate = Arc::new(Notify::new());
        let session = PredictionSession::new(
            MockBackend::answering("1", None).gated(Arc::clone(&gate)),
        );

        // Settle a first spam cycle
        gate.notify_one();
        session.submit(PRIZE, "nb").await;
        assert!(!session.snapshot().indicators.is_empty());

        // Start a second one and hold it open
        let mut updates = session.subscribe();
        let worker = session.clone();
        let pending = tokio::spawn(async move { worker.submit(COFFEE, "svm").await });

        let in_flight = updates
            .wait_for(|s| s.is_submitting)
            .await
            .unwrap()
            .clone();
        assert_eq!(in_flight.verdict, None);
        assert_eq!(in_flight.model_used, None);
        assert!(in_flight.indicators.is_empty());
        assert_eq!(in_flight.message, COFFEE);
        assert_eq!(in_flight.phase(), SessionPhase::Submitting);
        assert!(!in_flight.can_submit());

        // A second trigger while busy does nothing
        assert_eq!(
            session.submit(PRIZE, "nb").await,
            SubmitOutcome::Skipped(SkipReason::Busy)
        );

        gate.notify_one();
        assert_eq!(
            pending.await.unwrap(),
            SubmitOutcome::Completed(Verdict::Spam)
        );
        assert_eq!(session.backend().calls(), 2);
        assert!(!session.is_submitting());
    }

    #[tokio::test]
    async fn dropped_submit_re_enables_trigger() {
        let gate = Arc::new(Notify::new());
        let session =
            PredictionSession::new(MockBackend::answering("1", None).gated(Arc::clone(&gate)));

        let timed_out =
            tokio::time::timeout(Duration::from_millis(20), session.submit(PRIZE, "nb")).await;
        assert!(timed_out.is_err());

        let state = session.snapshot();
        assert!(!state.is_submitting);
        assert_eq!(state.verdict, None);
    }

    #[tokio::test]
    async fn edit_and_sample_reset_locally() {
        let session = PredictionSession::new(MockBackend::answering("1", None));
        session.submit(PRIZE, "nb").await;

        session.edit("new text");
        let state = session.snapshot();
        assert_eq!(state.message, "new text");
        assert_eq!(state.verdict, None);
        assert_eq!(state.model_used, None);
        assert!(state.indicators.is_empty());
        assert_eq!(state.phase(), SessionPhase::Idle);

        assert!(session.select_sample(3));
        assert_eq!(session.snapshot().message, samples::SAMPLES[3].text);
        assert!(!session.select_sample(999));

        session.submit(PRIZE, "nb").await;
        session.reset();
        let state = session.snapshot();
        assert_eq!(state.verdict, None);
        assert_eq!(state.message, PRIZE);
        assert_eq!(session.backend().calls(), 2);
    }

    #[tokio::test]
    async fn edit_during_request_discards_its_result() {
        let gate = Arc::new(Notify::new());
        let session = PredictionSession::new(
            MockBackend::answering("1", Some("nb")).gated(Arc::clone(&gate)),
        );

        let mut updates = session.subscribe();
        let worker = session.clone();
        let pending = tokio::spawn(async move { worker.submit(PRIZE, "nb").await });
        updates.wait_for(|s| s.is_submitting).await.unwrap();

        session.edit("hello friend");
        gate.notify_one();
        assert_eq!(
            pending.await.unwrap(),
            SubmitOutcome::Superseded(Verdict::Spam)
        );

        let state = session.snapshot();
        assert_eq!(state.message, "hello friend");
        assert_eq!(state.verdict, None);
        assert_eq!(state.model_used, None);
        assert!(state.indicators.is_empty());
        assert!(!state.is_submitting);
        assert_eq!(state.phase(), SessionPhase::Idle);

        // The next cycle lands normally
        gate.notify_one();
        assert_eq!(
            session.submit(PRIZE, "nb").await,
            SubmitOutcome::Completed(Verdict::Spam)
        );
        assert_eq!(session.snapshot().verdict, Some(Verdict::Spam));
    }

    #[tokio::test]
    async fn reset_during_request_discards_its_result() {
        let gate = Arc::new(Notify::new());
        let session = PredictionSession::new(
            MockBackend::answering("1", None).gated(Arc::clone(&gate)),
        );

        let mut updates = session.subscribe();
        let worker = session.clone();
        let pending = tokio::spawn(async move { worker.submit(PRIZE, "nb").await });
        updates.wait_for(|s| s.is_submitting).await.unwrap();

        session.reset();
        gate.notify_one();
        assert_eq!(
            pending.await.unwrap(),
            SubmitOutcome::Superseded(Verdict::Spam)
        );

        let state = session.snapshot();
        assert_eq!(state.message, PRIZE);
        assert_eq!(state.verdict, None);
        assert!(state.indicators.is_empty());
        assert!(!state.is_submitting);
    }

    #[tokio::test]
    async fn select_model_is_recorded() {
        let session = PredictionSession::new(MockBackend::answering("0", None));
        let mut updates = session.subscribe();

        session.select_model("svm");
        assert!(updates.has_changed().unwrap());
        assert_eq!(updates.borrow_and_update().selected_model_id, "svm");

        session.select_model("svm");
        assert!(!updates.has_changed().unwrap());
    }
}
