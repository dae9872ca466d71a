//! Display
//!
//! Everything needed to draw one frame. The App gathers a [`View`] of
//! borrowed state each frame and [`draw`] turns it into widgets; nothing
//! here mutates application state.
//!
//! # Layout
//!
//! ```text
//! ┌ LexiGuard · Spam message checker ───────────────┐
//! │ Message                                         │
//! │ Model                                           │
//! │ Examples            │ Result                    │
//! │ help                                            │
//! └─────────────────────────────────────────────────┘
//! ```
//!
//! The intro overlay is drawn on top while the reveal is mounted.

use ratatui::layout::{Alignment, Constraint, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Clear, List, ListItem, ListState, Paragraph, Wrap};
use ratatui::Frame;

use lexiguard_core::{ModelRegistry, RevealPhase, SampleKind, SessionState, Verdict, SAMPLES};

use crate::locale::Strings;
use crate::theme;
use crate::widgets::{Dropdown, DropdownView, TextBlock};

/// Input box height including borders
const INPUT_HEIGHT: u16 = 6;

/// Which control receives keys
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Focus {
    #[default]
    Input,
    Model,
    Samples,
}

impl Focus {
    /// Next control in Tab order
    pub fn next(self) -> Self {
        match self {
            Self::Input => Self::Model,
            Self::Model => Self::Samples,
            Self::Samples => Self::Input,
        }
    }
}

/// Borrowed state for one frame
pub struct View<'a> {
    pub strings: &'static Strings,
    /// Current intro phase, `None` once the overlay is unmounted
    pub intro: Option<RevealPhase>,
    /// Whether the main UI is drawn at all
    pub ui_visible: bool,
    pub input: &'a str,
    pub focus: Focus,
    pub state: &'a SessionState,
    pub registry: &'a ModelRegistry,
    pub dropdown: &'a Dropdown,
    pub sample_cursor: usize,
}

/// Draw one frame
pub fn draw(frame: &mut Frame, view: &View) {
    let area = frame.area();
    if view.ui_visible {
        draw_main(frame, area, view);
    }
    if let Some(phase) = view.intro {
        draw_intro(frame, area, phase);
    }
}

fn draw_main(frame: &mut Frame, area: Rect, view: &View) {
    let strings = view.strings;
    let chunks = Layout::vertical([
        Constraint::Length(1),
        Constraint::Length(INPUT_HEIGHT),
        Constraint::Length(view.dropdown.height() + 2),
        Constraint::Min(6),
        Constraint::Length(1),
    ])
    .split(area);

    // Header
    let header = Line::from(vec![
        Span::styled(strings.title, theme::strong(theme::WORDMARK)),
        Span::styled(" · ", Style::default().fg(theme::DIM_GRAY)),
        Span::styled(strings.subtitle, Style::default().fg(theme::DIM_GRAY)),
    ]);
    frame.render_widget(Paragraph::new(header), chunks[0]);

    // Message input
    let input_focused = view.focus == Focus::Input;
    let input_block = Block::bordered()
        .title(strings.input_label)
        .border_style(theme::border(input_focused));
    let input_inner = input_block.inner(chunks[1]);
    frame.render_widget(input_block, chunks[1]);
    let text_style = if view.state.is_submitting {
        Style::default().fg(theme::DIM_GRAY)
    } else {
        Style::default()
    };
    frame.render_widget(
        TextBlock::new(view.input)
            .style(text_style)
            .placeholder(strings.placeholder, Style::default().fg(theme::DIM_GRAY))
            .cursor(input_focused && !view.state.is_submitting),
        input_inner,
    );

    // Model selector
    let model_block = Block::bordered()
        .title(strings.model_label)
        .border_style(theme::border(view.focus == Focus::Model));
    let model_inner = model_block.inner(chunks[2]);
    frame.render_widget(model_block, chunks[2]);
    frame.render_widget(
        DropdownView::new(view.dropdown)
            .highlight_style(Style::default().fg(theme::BRAND_ACCENT).add_modifier(Modifier::BOLD)),
        model_inner,
    );

    // Samples | Result
    let body = Layout::horizontal([Constraint::Percentage(35), Constraint::Percentage(65)])
        .split(chunks[3]);
    draw_samples(frame, body[0], view);
    draw_result(frame, body[1], view);

    // Help line
    frame.render_widget(
        Paragraph::new(Span::styled(strings.help, Style::default().fg(theme::DIM_GRAY))),
        chunks[4],
    );
}

fn draw_samples(frame: &mut Frame, area: Rect, view: &View) {
    let focused = view.focus == Focus::Samples;
    let items: Vec<ListItem> = SAMPLES
        .iter()
        .map(|sample| {
            let color = match sample.kind {
                SampleKind::Spam => theme::SPAM_RED,
                SampleKind::Safe => theme::SAFE_GREEN,
            };
            ListItem::new(Line::from(vec![
                Span::styled("● ", Style::default().fg(color)),
                Span::raw(sample.label),
            ]))
        })
        .collect();

    let list = List::new(items)
        .block(
            Block::bordered()
                .title(view.strings.samples_label)
                .border_style(theme::border(focused)),
        )
        .highlight_symbol("› ")
        .highlight_style(Style::default().add_modifier(Modifier::BOLD));

    let mut state = ListState::default();
    if focused {
        state.select(Some(view.sample_cursor));
    }
    frame.render_stateful_widget(list, area, &mut state);
}

fn draw_result(frame: &mut Frame, area: Rect, view: &View) {
    let strings = view.strings;
    let block = Block::bordered()
        .title(strings.result_label)
        .border_style(theme::border(false));
    frame.render_widget(
        Paragraph::new(result_lines(view))
            .block(block)
            .wrap(Wrap { trim: false }),
        area,
    );
}

/// Lines for the result panel
fn result_lines(view: &View) -> Vec<Line<'static>> {
    let strings = view.strings;
    let state = view.state;
    let dim = Style::default().fg(theme::DIM_GRAY);

    if state.is_submitting {
        return vec![Line::styled(strings.analyzing, dim)];
    }

    let Some(verdict) = state.verdict else {
        return vec![Line::styled(strings.result_placeholder, dim)];
    };

    let mut lines = Vec::new();
    match verdict {
        Verdict::Spam => {
            lines.push(Line::styled(strings.verdict_spam, theme::strong(theme::SPAM_RED)));
        }
        Verdict::NotSpam => {
            lines.push(Line::styled(strings.verdict_not_spam, theme::strong(theme::SAFE_GREEN)));
        }
        Verdict::Error => {
            lines.push(Line::styled(strings.error_message, theme::strong(theme::ERROR_AMBER)));
            return lines;
        }
    }

    if let Some(model_id) = &state.model_used {
        let label = view
            .registry
            .get(model_id)
            .map_or(model_id.clone(), |m| m.name.clone());
        lines.push(Line::from(vec![
            Span::styled(format!("{}: ", strings.model_used), dim),
            Span::raw(label),
        ]));
    }

    if verdict == Verdict::Spam {
        lines.push(Line::default());
        lines.push(Line::styled(
            strings.why_flagged,
            Style::default().add_modifier(Modifier::BOLD),
        ));
        if state.indicators.is_empty() {
            lines.push(Line::styled(strings.no_indicators, dim));
        }
        for indicator in &state.indicators {
            lines.push(Line::from(vec![
                Span::styled("• ", Style::default().fg(theme::SPAM_RED)),
                Span::raw(strings.indicator(*indicator)),
            ]));
        }
    }

    lines
}

/// Gap between the two wordmark halves for each phase
fn intro_gap(phase: RevealPhase) -> usize {
    match phase {
        RevealPhase::Initial | RevealPhase::Done => 0,
        RevealPhase::Split => 6,
        RevealPhase::Reveal => 16,
    }
}

fn draw_intro(frame: &mut Frame, area: Rect, phase: RevealPhase) {
    if !phase.shows_overlay() || area.height == 0 {
        return;
    }

    // Before the reveal the overlay hides everything
    if !phase.is_interactive() {
        frame.render_widget(Clear, area);
    }

    let style = if phase == RevealPhase::Reveal {
        Style::default().fg(theme::DIM_GRAY)
    } else {
        theme::strong(theme::WORDMARK)
    };
    let wordmark = Line::from(vec![
        Span::styled("LEXI", style),
        Span::raw(" ".repeat(intro_gap(phase))),
        Span::styled("GUARD", style),
    ]);

    let row = Rect::new(area.x, area.y + area.height / 2, area.width, 1);
    frame.render_widget(Paragraph::new(wordmark).alignment(Alignment::Center), row);
}
