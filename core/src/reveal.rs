//! Intro Reveal
//!
//! A timer-driven state machine for the staged intro animation:
//!
//! ```text
//! Initial --T1--> Split --T2--> Reveal --T3--> Done
//! ```
//!
//! The machine knows nothing about rendering. Surfaces observe the current
//! [`RevealPhase`] (poll [`RevealHandle::phase`] or subscribe) and get one
//! callback per boundary:
//!
//! - `on_split`: the title starts to split, the host may prepare its UI
//! - `on_reveal`: the host UI should become visible and interactive
//! - `on_complete`: the overlay should leave the render tree entirely
//!
//! [`RevealController::start`] consumes the controller, so one controller
//! drives exactly one activation. Dropping or disposing the returned handle
//! cancels every boundary that has not fired yet.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use thiserror::Error;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::Instant;

/// Errors from building reveal timings
#[derive(Debug, Error, PartialEq, Eq)]
pub enum RevealError {
    /// Boundaries must satisfy `split < reveal < done`
    #[error("Reveal timings must be strictly increasing (split {split:?}, reveal {reveal:?}, done {done:?})")]
    NonIncreasing {
        /// Offset of the split boundary
        split: Duration,
        /// Offset of the reveal boundary
        reveal: Duration,
        /// Offset of the done boundary
        done: Duration,
    },
}

/// Stage of the intro sequence
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub enum RevealPhase {
    /// Title shown whole
    #[default]
    Initial,
    /// Title halves moving apart
    Split,
    /// Host UI visible, title fading
    Reveal,
    /// Sequence finished, overlay gone
    Done,
}

impl RevealPhase {
    /// The phase that follows this one, `None` once done
    #[must_use]
    pub fn next(self) -> Option<Self> {
        match self {
            Self::Initial => Some(Self::Split),
            Self::Split => Some(Self::Reveal),
            Self::Reveal => Some(Self::Done),
            Self::Done => None,
        }
    }

    /// Whether the host UI should accept input in this phase
    #[must_use]
    pub fn is_interactive(self) -> bool {
        self >= Self::Reveal
    }

    /// Whether the intro overlay is still part of the render tree
    #[must_use]
    pub fn shows_overlay(self) -> bool {
        self != Self::Done
    }
}

/// Boundary offsets, measured from activation
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RevealTimings {
    split: Duration,
    reveal: Duration,
    done: Duration,
}

impl Default for RevealTimings {
    fn default() -> Self {
        Self {
            split: Duration::from_millis(600),
            reveal: Duration::from_millis(1400),
            done: Duration::from_millis(2200),
        }
    }
}

impl RevealTimings {
    /// Create custom timings
    ///
    /// # Errors
    ///
    /// Returns [`RevealError::NonIncreasing`] unless `split < reveal < done`.
    pub fn new(split: Duration, reveal: Duration, done: Duration) -> Result<Self, RevealError> {
        if split < reveal && reveal < done {
            Ok(Self {
                split,
                reveal,
                done,
            })
        } else {
            Err(RevealError::NonIncreasing {
                split,
                reveal,
                done,
            })
        }
    }

    /// Offset at which `phase` begins (`Initial` begins at zero)
    #[must_use]
    pub fn offset(&self, phase: RevealPhase) -> Duration {
        match phase {
            RevealPhase::Initial => Duration::ZERO,
            RevealPhase::Split => self.split,
            RevealPhase::Reveal => self.reveal,
            RevealPhase::Done => self.done,
        }
    }

    /// Total length of the sequence
    #[must_use]
    pub fn total(&self) -> Duration {
        self.done
    }

    /// Phase the sequence is in after `elapsed`
    #[must_use]
    pub fn phase_at(&self, elapsed: Duration) -> RevealPhase {
        if elapsed >= self.done {
            RevealPhase::Done
        } else if elapsed >= self.reveal {
            RevealPhase::Reveal
        } else if elapsed >= self.split {
            RevealPhase::Split
        } else {
            RevealPhase::Initial
        }
    }
}

type Callback = Box<dyn FnOnce() + Send + 'static>;

/// Optional boundary notifications
#[derive(Default)]
pub struct RevealCallbacks {
    on_split: Option<Callback>,
    on_reveal: Option<Callback>,
    on_complete: Option<Callback>,
}

impl RevealCallbacks {
    /// No callbacks
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Called when the phase becomes [`RevealPhase::Split`]
    #[must_use]
    pub fn on_split(mut self, f: impl FnOnce() + Send + 'static) -> Self {
        self.on_split = Some(Box::new(f));
        self
    }

    /// Called when the phase becomes [`RevealPhase::Reveal`]
    #[must_use]
    pub fn on_reveal(mut self, f: impl FnOnce() + Send + 'static) -> Self {
        self.on_reveal = Some(Box::new(f));
        self
    }

    /// Called when the phase becomes [`RevealPhase::Done`]
    #[must_use]
    pub fn on_complete(mut self, f: impl FnOnce() + Send + 'static) -> Self {
        self.on_complete = Some(Box::new(f));
        self
    }
}

impl std::fmt::Debug for RevealCallbacks {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RevealCallbacks")
            .field("on_split", &self.on_split.is_some())
            .field("on_reveal", &self.on_reveal.is_some())
            .field("on_complete", &self.on_complete.is_some())
            .finish()
    }
}

/// One-shot driver for the intro sequence
#[derive(Clone, Copy, Debug, Default)]
pub struct RevealController {
    timings: RevealTimings,
}

impl RevealController {
    /// Create a controller with the given timings
    #[must_use]
    pub fn new(timings: RevealTimings) -> Self {
        Self { timings }
    }

    /// Timings this controller will use
    #[must_use]
    pub fn timings(&self) -> RevealTimings {
        self.timings
    }

    /// Activate the sequence
    ///
    /// Must be called from within a tokio runtime. Returns immediately; all
    /// effects are observed through the handle and the callbacks.
    #[must_use = "dropping the handle cancels the reveal"]
    pub fn start(self, callbacks: RevealCallbacks) -> RevealHandle {
        let started_at = Instant::now();
        let (phase_tx, phase_rx) = watch::channel(RevealPhase::Initial);
        let cancelled = Arc::new(Mutex::new(false));

        let steps: [(RevealPhase, Option<Callback>); 3] = [
            (RevealPhase::Split, callbacks.on_split),
            (RevealPhase::Reveal, callbacks.on_reveal),
            (RevealPhase::Done, callbacks.on_complete),
        ];

        let timings = self.timings;
        let flag = Arc::clone(&cancelled);
        let task = tokio::spawn(async move {
            for (phase, callback) in steps {
                tokio::time::sleep_until(started_at + timings.offset(phase)).await;

                // Held through the callback so dispose waits for it.
                let disposed = lock(&flag);
                if *disposed {
                    return;
                }
                fire(&phase_tx, phase, callback);
            }
        });

        RevealHandle {
            timings,
            started_at,
            phase_rx,
            cancelled,
            task: Some(task),
        }
    }
}

/// Owned handle to a running reveal
///
/// Disposing (or dropping) the handle cancels pending boundaries.
#[derive(Debug)]
pub struct RevealHandle {
    timings: RevealTimings,
    started_at: Instant,
    phase_rx: watch::Receiver<RevealPhase>,
    cancelled: Arc<Mutex<bool>>,
    task: Option<JoinHandle<()>>,
}

impl RevealHandle {
    /// Current phase
    ///
    /// Derived from elapsed time while the reveal is live, so a boundary
    /// counts as reached the instant it passes even if the timer task has
    /// not run yet. After disposal this is the last phase that fired.
    #[must_use]
    pub fn phase(&self) -> RevealPhase {
        let fired = *self.phase_rx.borrow();
        if self.is_disposed() {
            fired
        } else {
            fired.max(self.timings.phase_at(self.started_at.elapsed()))
        }
    }

    /// Subscribe to phase changes
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<RevealPhase> {
        self.phase_rx.clone()
    }

    /// Time since activation
    #[must_use]
    pub fn elapsed(&self) -> Duration {
        self.started_at.elapsed()
    }

    /// Timings driving this reveal
    #[must_use]
    pub fn timings(&self) -> RevealTimings {
        self.timings
    }

    /// Whether [`dispose`](Self::dispose) has run
    #[must_use]
    pub fn is_disposed(&self) -> bool {
        *lock(&self.cancelled)
    }

    /// Wait until the sequence reaches [`RevealPhase::Done`]
    ///
    /// Returns `false` if the reveal was disposed first.
    pub async fn finished(&mut self) -> bool {
        if self.is_disposed() {
            return false;
        }
        self.phase_rx
            .wait_for(|phase| *phase == RevealPhase::Done)
            .await
            .is_ok()
    }

    /// Cancel every boundary that has not fired yet
    ///
    /// Idempotent. No callback runs after this returns: a callback already
    /// in progress on another worker finishes before this does.
    pub fn dispose(&mut self) {
        *lock(&self.cancelled) = true;
        if let Some(task) = self.task.take() {
            task.abort();
            tracing::trace!(phase = ?self.phase(), "Reveal disposed");
        }
    }
}

impl Drop for RevealHandle {
    fn drop(&mut self) {
        self.dispose();
    }
}

fn fire(phase_tx: &watch::Sender<RevealPhase>, phase: RevealPhase, callback: Option<Callback>) {
    phase_tx.send_replace(phase);
    tracing::debug!(phase = ?phase, "Reveal phase advanced");

    if let Some(callback) = callback {
        callback();
    }
}

fn lock(flag: &Mutex<bool>) -> MutexGuard<'_, bool> {
    flag.lock().unwrap_or_else(PoisonError::into_inner)
}
