//! Integration Tests for TUI + Core
//!
//! These tests drive the App the way a user would (key presses, frame
//! ticks) against a mock classifier, then check both the session state and
//! the rendered screen.
//!
//! # Test Coverage
//!
//! 1. **Submit Flow**: type, press Enter, see verdict and explanation
//! 2. **Failure Flow**: service error is shown and a resubmit recovers
//! 3. **Busy Guard**: repeated Enter during a request sends one request
//!
//! # Mock Backend
//!
//! The mock counts requests, can fail the first N of them, and can hold
//! every request until the test releases it.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ratatui::backend::TestBackend;
use ratatui::Terminal;
use tokio::sync::Notify;

use lexiguard_core::{
    BackendError, ClassifierBackend, ClientConfig, ModelDescriptor, PredictRequest,
    PredictResponse, Verdict,
};
use lexiguard_tui::display;
use lexiguard_tui::locale::EN;
use lexiguard_tui::App;

// ============================================================================
// Mock Backend
// ============================================================================

struct MockClassifier {
    prediction: &'static str,
    request_count: Arc<AtomicUsize>,
    fail_first: usize,
    gate: Option<Arc<Notify>>,
}

impl MockClassifier {
    fn answering(prediction: &'static str) -> Self {
        Self {
            prediction,
            request_count: Arc::new(AtomicUsize::new(0)),
            fail_first: 0,
            gate: None,
        }
    }
}

#[async_trait]
impl ClassifierBackend for MockClassifier {
    fn name(&self) -> &str {
        "mock"
    }

    async fn predict(&self, request: &PredictRequest) -> Result<PredictResponse, BackendError> {
        let seen = self.request_count.fetch_add(1, Ordering::SeqCst);
        if let Some(gate) = &self.gate {
            gate.notified().await;
        }
        if seen < self.fail_first {
            return Err(BackendError::Status {
                status: 503,
                body: "unavailable".to_string(),
            });
        }
        Ok(PredictResponse {
            prediction: self.prediction.to_string(),
            model_used: request.model.clone(),
        })
    }

    async fn list_models(&self) -> Result<Vec<ModelDescriptor>, BackendError> {
        Ok(vec![ModelDescriptor::new("nb", "Naive Bayes", "Fast")])
    }
}

// ============================================================================
// Helpers
// ============================================================================

fn config() -> ClientConfig {
    let mut config = ClientConfig::default();
    config.show_intro = false;
    config
}

fn type_text(app: &mut App<MockClassifier>, text: &str) {
    for c in text.chars() {
        app.handle_key(KeyEvent::new(KeyCode::Char(c), KeyModifiers::NONE));
    }
}

fn enter(app: &mut App<MockClassifier>) {
    app.handle_key(KeyEvent::new(KeyCode::Enter, KeyModifiers::NONE));
}

async fn wait_until(app: &mut App<MockClassifier>, done: impl Fn(&App<MockClassifier>) -> bool) {
    tokio::time::timeout(Duration::from_secs(2), async {
        loop {
            app.tick();
            if done(app) {
                break;
            }
            tokio::time::sleep(Duration::from_millis(5)).await;
        }
    })
    .await
    .expect("timed out waiting for app");
}

fn screen(app: &App<MockClassifier>) -> String {
    let mut terminal = Terminal::new(TestBackend::new(100, 30)).unwrap();
    terminal
        .draw(|frame| display::draw(frame, &app.view()))
        .unwrap();
    let buffer = terminal.backend().buffer();
    let mut out = String::new();
    for y in 0..buffer.area.height {
        for x in 0..buffer.area.width {
            out.push_str(buffer[(x, y)].symbol());
        }
        out.push('\n');
    }
    out
}

// ============================================================================
// Tests
// ============================================================================

#[tokio::test]
async fn test_spam_flow_renders_explanation() {
    let mut app = App::with_backend(MockClassifier::answering("1"), &config());
    wait_until(&mut app, |a| !a.registry().is_fallback()).await;

    type_text(&mut app, "URGENT: click here to claim your FREE gift");
    enter(&mut app);
    wait_until(&mut app, |a| a.state().verdict.is_some()).await;

    assert_eq!(app.state().verdict, Some(Verdict::Spam));
    let text = screen(&app);
    assert!(text.contains(EN.verdict_spam.split(' ').next().unwrap()));
    assert!(text.contains(EN.why_flagged));
    assert!(text.contains("Model used: Naive Bayes"));
    for indicator in &app.state().indicators {
        assert!(text.contains(EN.indicator(*indicator)), "missing {indicator}");
    }
}

#[tokio::test]
async fn test_failure_is_shown_and_recoverable() {
    let mut backend = MockClassifier::answering("0");
    backend.fail_first = 1;
    let mut app = App::with_backend(backend, &config());

    type_text(&mut app, "lunch at noon?");
    enter(&mut app);
    wait_until(&mut app, |a| a.state().verdict.is_some()).await;
    assert_eq!(app.state().verdict, Some(Verdict::Error));
    assert!(screen(&app).contains(EN.error_message));

    enter(&mut app);
    wait_until(&mut app, |a| a.state().verdict == Some(Verdict::NotSpam)).await;
    let text = screen(&app);
    assert!(text.contains("Not Spam"));
    assert!(!text.contains(EN.error_message));
}

#[tokio::test]
async fn test_enter_while_busy_sends_one_request() {
    let gate = Arc::new(Notify::new());
    let mut backend = MockClassifier::answering("0");
    backend.gate = Some(Arc::clone(&gate));
    let requests = Arc::clone(&backend.request_count);
    let mut app = App::with_backend(backend, &config());

    type_text(&mut app, "hello");
    enter(&mut app);
    wait_until(&mut app, |a| a.state().is_submitting).await;
    assert!(screen(&app).contains(EN.analyzing));

    enter(&mut app);
    enter(&mut app);
    type_text(&mut app, "!!!");
    assert_eq!(app.input(), "hello");

    gate.notify_one();
    wait_until(&mut app, |a| !a.state().is_submitting).await;
    assert_eq!(requests.load(Ordering::SeqCst), 1);
    assert_eq!(app.state().verdict, Some(Verdict::NotSpam));
}
