//! Dropdown Widget
//!
//! A single-choice selector. Closed, it shows one line with the current
//! option; open, it lists every option with a movable highlight. The
//! selection only changes on [`Dropdown::confirm`].

use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::widgets::Widget;

/// Selection state
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Dropdown {
    options: Vec<String>,
    selected: usize,
    highlighted: usize,
    open: bool,
}

impl Dropdown {
    pub fn new(options: Vec<String>) -> Self {
        Self {
            options,
            ..Self::default()
        }
    }

    /// Replace the options and select `selected` (clamped). Closes the list.
    pub fn set_options(&mut self, options: Vec<String>, selected: usize) {
        self.selected = selected.min(options.len().saturating_sub(1));
        self.highlighted = self.selected;
        self.options = options;
        self.open = false;
    }

    pub fn options(&self) -> &[String] {
        &self.options
    }

    pub fn selected(&self) -> usize {
        self.selected
    }

    pub fn highlighted(&self) -> usize {
        self.highlighted
    }

    pub fn is_open(&self) -> bool {
        self.open
    }

    /// Open or close. Opening starts the highlight on the current choice.
    pub fn toggle(&mut self) {
        if self.open {
            self.close();
        } else if !self.options.is_empty() {
            self.open = true;
            self.highlighted = self.selected;
        }
    }

    /// Close without changing the selection
    pub fn close(&mut self) {
        self.open = false;
        self.highlighted = self.selected;
    }

    /// Move the highlight down, wrapping
    pub fn next(&mut self) {
        if self.open && !self.options.is_empty() {
            self.highlighted = (self.highlighted + 1) % self.options.len();
        }
    }

    /// Move the highlight up, wrapping
    pub fn previous(&mut self) {
        if self.open && !self.options.is_empty() {
            self.highlighted = self
                .highlighted
                .checked_sub(1)
                .unwrap_or(self.options.len() - 1);
        }
    }

    /// Adopt the highlighted option and close
    ///
    /// Returns the new selection, or `None` when the list was closed.
    pub fn confirm(&mut self) -> Option<usize> {
        if !self.open {
            return None;
        }
        self.selected = self.highlighted;
        self.open = false;
        Some(self.selected)
    }

    /// Rows needed to draw the current state
    pub fn height(&self) -> u16 {
        if self.open {
            u16::try_from(self.options.len().max(1)).unwrap_or(u16::MAX)
        } else {
            1
        }
    }
}

/// Renders a [`Dropdown`]
pub struct DropdownView<'a> {
    dropdown: &'a Dropdown,
    style: Style,
    highlight_style: Style,
}

impl<'a> DropdownView<'a> {
    pub fn new(dropdown: &'a Dropdown) -> Self {
        Self {
            dropdown,
            style: Style::default(),
            highlight_style: Style::default().add_modifier(Modifier::REVERSED),
        }
    }

    pub fn style(mut self, style: Style) -> Self {
        self.style = style;
        self
    }

    pub fn highlight_style(mut self, style: Style) -> Self {
        self.highlight_style = style;
        self
    }
}

impl Widget for DropdownView<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        if area.width == 0 || area.height == 0 {
            return;
        }
        let width = usize::from(area.width);
        let dropdown = self.dropdown;

        if !dropdown.open {
            let label = dropdown
                .options
                .get(dropdown.selected)
                .map_or("", String::as_str);
            buf.set_stringn(area.x, area.y, format!("▾ {label}"), width, self.style);
            return;
        }

        for (row, option) in dropdown
            .options
            .iter()
            .enumerate()
            .take(usize::from(area.height))
        {
            let (marker, style) = if row == dropdown.highlighted {
                ("›", self.highlight_style)
            } else {
                (" ", self.style)
            };
            let check = if row == dropdown.selected { "•" } else { " " };
            #[allow(clippy::cast_possible_truncation)]
            let y = area.y + row as u16;
            buf.set_stringn(area.x, y, format!("{marker}{check} {option}"), width, style);
        }
    }
}
