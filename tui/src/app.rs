//! Main Application
//!
//! The App struct manages the TUI lifecycle as a thin client of
//! `lexiguard-core`:
//! - Event loop (keyboard, resize, frame tick)
//! - PredictionSession for submit-to-result cycles
//! - ModelRegistry fetched once in the background at startup
//! - RevealHandle for the intro overlay
//!
//! Every frame the App drains what the background work produced (reveal
//! boundaries, the registry answer, session snapshots) and redraws.

use std::io;
use std::sync::Arc;
use std::time::Duration;

use crossterm::event::{Event, EventStream, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use futures::StreamExt;
use rand::Rng;
use ratatui::backend::CrosstermBackend;
use ratatui::Terminal;
use tokio::sync::{mpsc, oneshot, watch};

use lexiguard_core::{
    BackendError, ClassifierBackend, ClientConfig, HttpClassifier, ModelDescriptor, ModelRegistry,
    PredictionSession, RevealCallbacks, RevealController, RevealHandle, RevealPhase,
    SessionState, SAMPLES,
};

use crate::display::{self, Focus, View};
use crate::locale::Locale;
use crate::widgets::Dropdown;

/// Frame tick when no terminal event arrives
const FRAME_INTERVAL: Duration = Duration::from_millis(50);

type RegistryFetch = oneshot::Receiver<Result<Vec<ModelDescriptor>, BackendError>>;

/// Main application state
pub struct App<B: ClassifierBackend + 'static = HttpClassifier> {
    // === Core State ===
    /// Is the app still running?
    running: bool,
    locale: Locale,

    // === Session ===
    session: PredictionSession<B>,
    session_rx: watch::Receiver<SessionState>,
    /// Last snapshot pulled from `session_rx`
    state: SessionState,

    // === Registry ===
    registry: ModelRegistry,
    /// Pending startup fetch, `None` once applied
    registry_rx: Option<RegistryFetch>,

    // === Intro ===
    reveal: Option<RevealHandle>,
    reveal_events: Option<mpsc::UnboundedReceiver<RevealPhase>>,
    ui_visible: bool,

    // === Input State ===
    input: String,
    focus: Focus,
    dropdown: Dropdown,
    sample_cursor: usize,
}

impl App {
    /// Create an App talking to the configured HTTP service
    pub fn new(config: &ClientConfig) -> anyhow::Result<Self> {
        let backend = HttpClassifier::from_config(config)?;
        Ok(Self::with_backend(backend, config))
    }
}

impl<B: ClassifierBackend + 'static> App<B> {
    /// Create an App around any backend
    ///
    /// Starts the registry fetch and (if enabled) the intro reveal right
    /// away. Must be called inside a Tokio runtime.
    pub fn with_backend(backend: B, config: &ClientConfig) -> Self {
        let session = PredictionSession::new(backend);
        let session_rx = session.subscribe();
        let registry = ModelRegistry::new();
        session.select_model(registry.selected_id());

        let registry_rx = Some(spawn_registry_fetch(Arc::clone(session.backend())));

        let (reveal, reveal_events) = if config.show_intro {
            let (handle, events) = start_reveal();
            (Some(handle), Some(events))
        } else {
            (None, None)
        };

        let dropdown = Dropdown::new(model_names(&registry));
        let state = session.snapshot();

        Self {
            running: true,
            locale: Locale::from_code(&config.locale),
            session,
            session_rx,
            state,
            registry,
            registry_rx,
            ui_visible: reveal.is_none(),
            reveal,
            reveal_events,
            input: String::new(),
            focus: Focus::default(),
            dropdown,
            sample_cursor: 0,
        }
    }

    /// Main event loop
    pub async fn run(
        &mut self,
        terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    ) -> anyhow::Result<()> {
        let mut event_stream = EventStream::new();

        self.render(terminal)?;

        while self.running {
            tokio::select! {
                biased;

                maybe_event = event_stream.next() => {
                    match maybe_event {
                        // Only handle Press events (not Release or Repeat)
                        Some(Ok(Event::Key(key))) if key.kind == KeyEventKind::Press => {
                            self.handle_key(key);
                        }
                        Some(Ok(_)) => {}
                        Some(Err(e)) => tracing::warn!(error = %e, "Terminal event error"),
                        None => self.running = false,
                    }
                }

                () = tokio::time::sleep(FRAME_INTERVAL) => {}
            }

            self.tick();
            self.render(terminal)?;
        }

        self.shutdown();
        Ok(())
    }

    /// Apply everything background work produced since the last frame
    pub fn tick(&mut self) {
        self.process_reveal_events();
        self.process_registry();
        self.sync_session();
    }

    /// Stop the intro timers. Safe to call more than once.
    pub fn shutdown(&mut self) {
        if let Some(mut reveal) = self.reveal.take() {
            reveal.dispose();
        }
        self.reveal_events = None;
    }

    fn render(&self, terminal: &mut Terminal<CrosstermBackend<io::Stdout>>) -> io::Result<()> {
        terminal.draw(|frame| display::draw(frame, &self.view()))?;
        Ok(())
    }

    /// Borrowed view of the current frame
    pub fn view(&self) -> View<'_> {
        View {
            strings: self.locale.strings(),
            intro: self.intro_phase(),
            ui_visible: self.ui_visible,
            input: &self.input,
            focus: self.focus,
            state: &self.state,
            registry: &self.registry,
            dropdown: &self.dropdown,
            sample_cursor: self.sample_cursor,
        }
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn is_ui_visible(&self) -> bool {
        self.ui_visible
    }

    /// Intro phase while the overlay is mounted
    pub fn intro_phase(&self) -> Option<RevealPhase> {
        self.reveal
            .as_ref()
            .map(RevealHandle::phase)
            .filter(|phase| phase.shows_overlay())
    }

    pub fn state(&self) -> &SessionState {
        &self.state
    }

    pub fn registry(&self) -> &ModelRegistry {
        &self.registry
    }

    pub fn input(&self) -> &str {
        &self.input
    }

    pub fn focus(&self) -> Focus {
        self.focus
    }

    pub fn locale(&self) -> Locale {
        self.locale
    }

    // ========================================================================
    // Background work
    // ========================================================================

    fn process_reveal_events(&mut self) {
        let mut finished = false;
        if let Some(events) = self.reveal_events.as_mut() {
            while let Ok(phase) = events.try_recv() {
                tracing::debug!(?phase, "Intro boundary");
                match phase {
                    RevealPhase::Reveal => self.ui_visible = true,
                    RevealPhase::Done => finished = true,
                    RevealPhase::Initial | RevealPhase::Split => {}
                }
            }
        }

        if let Some(phase) = self.reveal.as_ref().map(RevealHandle::phase) {
            self.ui_visible |= phase.is_interactive();
        }

        if finished {
            self.ui_visible = true;
            self.shutdown();
        }
    }

    fn process_registry(&mut self) {
        let Some(rx) = self.registry_rx.as_mut() else {
            return;
        };
        let result = match rx.try_recv() {
            Ok(result) => result,
            Err(oneshot::error::TryRecvError::Empty) => return,
            Err(oneshot::error::TryRecvError::Closed) => {
                Err(BackendError::Protocol("registry fetch was cancelled".to_string()))
            }
        };
        self.registry_rx = None;

        self.registry.apply_fetch(result);
        self.dropdown
            .set_options(model_names(&self.registry), self.registry.selected_index());
        self.session.select_model(self.registry.selected_id());
    }

    fn sync_session(&mut self) {
        if self.session_rx.has_changed().unwrap_or(false) {
            self.state = self.session_rx.borrow_and_update().clone();
        }
    }

    // ========================================================================
    // Input
    // ========================================================================

    /// Handle keyboard input
    pub fn handle_key(&mut self, key: KeyEvent) {
        let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);

        match key.code {
            KeyCode::Char('c') if ctrl => {
                self.running = false;
                return;
            }
            KeyCode::Esc if self.dropdown.is_open() => {
                self.dropdown.close();
                return;
            }
            KeyCode::Esc => {
                self.running = false;
                return;
            }
            _ => {}
        }

        // Nothing but quitting until the UI is revealed
        if !self.ui_visible {
            return;
        }

        match key.code {
            KeyCode::Tab => {
                self.dropdown.close();
                self.focus = self.focus.next();
            }
            KeyCode::F(2) => {
                self.locale = self.locale.toggled();
            }
            KeyCode::Char('r') if ctrl => self.load_random_sample(),
            _ => match self.focus {
                Focus::Input => self.handle_input_key(key),
                Focus::Model => self.handle_model_key(key),
                Focus::Samples => self.handle_samples_key(key),
            },
        }
    }

    fn handle_input_key(&mut self, key: KeyEvent) {
        let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
        let alt = key.modifiers.contains(KeyModifiers::ALT);

        match key.code {
            KeyCode::Enter if alt => self.edit(|input| input.push('\n')),
            KeyCode::Enter => self.submit(),
            KeyCode::Char('u') if ctrl => self.edit(String::clear),
            KeyCode::Char(c) if !ctrl => self.edit(|input| input.push(c)),
            KeyCode::Backspace => self.edit(|input| {
                input.pop();
            }),
            _ => {}
        }
    }

    fn handle_model_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Enter | KeyCode::Char(' ') => {
                if self.dropdown.is_open() {
                    if let Some(index) = self.dropdown.confirm() {
                        self.registry.select_index(index);
                        self.session.select_model(self.registry.selected_id());
                        tracing::debug!(model = %self.registry.selected_id(), "Model selected");
                    }
                } else {
                    self.dropdown.toggle();
                }
            }
            KeyCode::Down => self.dropdown.next(),
            KeyCode::Up => self.dropdown.previous(),
            _ => {}
        }
    }

    fn handle_samples_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Down => self.sample_cursor = (self.sample_cursor + 1) % SAMPLES.len(),
            KeyCode::Up => {
                self.sample_cursor = self
                    .sample_cursor
                    .checked_sub(1)
                    .unwrap_or(SAMPLES.len() - 1);
            }
            KeyCode::Enter => {
                if self.load_sample(self.sample_cursor) {
                    self.focus = Focus::Input;
                }
            }
            _ => {}
        }
    }

    // ========================================================================
    // Session operations
    // ========================================================================

    /// Change the message; locked while a request is in flight
    fn edit(&mut self, change: impl FnOnce(&mut String)) {
        if self.session.is_submitting() {
            return;
        }
        change(&mut self.input);
        self.session.edit(self.input.clone());
    }

    fn load_sample(&mut self, index: usize) -> bool {
        if self.session.is_submitting() {
            return false;
        }
        let Some(sample) = SAMPLES.get(index) else {
            return false;
        };
        self.session.select_sample(index);
        self.input = sample.text.to_string();
        self.sample_cursor = index;
        true
    }

    fn load_random_sample(&mut self) {
        let index = rand::thread_rng().gen_range(0..SAMPLES.len());
        self.load_sample(index);
    }

    /// Start a classification cycle in the background
    fn submit(&mut self) {
        if self.session.is_submitting() || self.input.trim().is_empty() {
            return;
        }
        let session = self.session.clone();
        let message = self.input.clone();
        let model_id = self.registry.selected_id().to_string();
        tokio::spawn(async move {
            session.submit(&message, &model_id).await;
        });
    }
}

fn model_names(registry: &ModelRegistry) -> Vec<String> {
    registry.models().iter().map(|m| m.name.clone()).collect()
}

fn spawn_registry_fetch<B: ClassifierBackend + 'static>(backend: Arc<B>) -> RegistryFetch {
    let (tx, rx) = oneshot::channel();
    tokio::spawn(async move {
        // The App may already be gone
        let _ = tx.send(backend.list_models().await);
    });
    rx
}

/// Start the intro and forward its boundaries into a channel
fn start_reveal() -> (RevealHandle, mpsc::UnboundedReceiver<RevealPhase>) {
    let (tx, rx) = mpsc::unbounded_channel();
    let notify = |phase: RevealPhase| {
        let tx = tx.clone();
        move || {
            let _ = tx.send(phase);
        }
    };
    let callbacks = RevealCallbacks::new()
        .on_split(notify(RevealPhase::Split))
        .on_reveal(notify(RevealPhase::Reveal))
        .on_complete(notify(RevealPhase::Done));
    (RevealController::default().start(callbacks), rx)
}
