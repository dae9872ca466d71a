//! Theme and Colors
//!
//! LexiGuard's palette: a blue accent, a warm red for spam and a teal
//! green for safe messages.

use ratatui::style::{Color, Modifier, Style};

// ============================================================================
// Brand Palette
// ============================================================================

/// Accent used for the focused control
pub const BRAND_ACCENT: Color = Color::Rgb(69, 123, 157);

/// Title and intro wordmark
pub const WORDMARK: Color = Color::Rgb(168, 218, 220);

// ============================================================================
// Verdict Colors
// ============================================================================

/// Spam verdict
pub const SPAM_RED: Color = Color::Rgb(215, 38, 56);

/// Not-spam verdict
pub const SAFE_GREEN: Color = Color::Rgb(42, 157, 143);

/// Service error
pub const ERROR_AMBER: Color = Color::Rgb(244, 162, 97);

// ============================================================================
// UI Colors
// ============================================================================

/// System/dim text
pub const DIM_GRAY: Color = Color::Rgb(100, 100, 100);

/// Unfocused borders
pub const BORDER_GRAY: Color = Color::Rgb(70, 70, 70);

/// Border style for a control, highlighted when focused
pub fn border(focused: bool) -> Style {
    if focused {
        Style::default().fg(BRAND_ACCENT)
    } else {
        Style::default().fg(BORDER_GRAY)
    }
}

/// Bold text in `color`
pub fn strong(color: Color) -> Style {
    Style::default().fg(color).add_modifier(Modifier::BOLD)
}
