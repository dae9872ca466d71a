//! LexiGuard TUI - Terminal interface for the LexiGuard spam checker
//!
//! A full-screen surface over `lexiguard-core`: type or pick a message,
//! choose a model, and see the verdict with the cues that made it look
//! like spam.
//!
//! # Architecture
//!
//! - **App**: event loop, key handling, background work polling
//! - **Display**: stateless frame rendering from a borrowed view
//! - **Widgets**: wrapped input text and the model dropdown
//! - **Locale**: English and Spanish string tables

pub mod app;
pub mod display;
pub mod locale;
pub mod theme;
pub mod widgets;

pub use app::App;
