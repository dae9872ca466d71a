//! TextBlock Widget
//!
//! A borderless text region for the message being typed. Long input wraps
//! and the view follows the last line, so the cursor stays visible.

use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::style::Style;
use ratatui::widgets::Widget;
use textwrap::wrap;

/// Cursor glyph appended to focused input
pub const CURSOR: &str = "▏";

/// Wrap `content` to `width` columns, keeping blank lines
pub fn wrap_lines(content: &str, width: usize) -> Vec<String> {
    if width == 0 {
        return Vec::new();
    }
    content
        .split('\n')
        .flat_map(|line| {
            if line.is_empty() {
                vec![String::new()]
            } else {
                wrap(line, width)
                    .into_iter()
                    .map(|cow| cow.to_string())
                    .collect()
            }
        })
        .collect()
}

/// A borderless, tail-following text block
pub struct TextBlock<'a> {
    content: &'a str,
    placeholder: &'a str,
    style: Style,
    placeholder_style: Style,
    cursor: bool,
}

impl<'a> TextBlock<'a> {
    pub fn new(content: &'a str) -> Self {
        Self {
            content,
            placeholder: "",
            style: Style::default(),
            placeholder_style: Style::default(),
            cursor: false,
        }
    }

    pub fn style(mut self, style: Style) -> Self {
        self.style = style;
        self
    }

    /// Text shown (in `style`) while the content is empty
    pub fn placeholder(mut self, placeholder: &'a str, style: Style) -> Self {
        self.placeholder = placeholder;
        self.placeholder_style = style;
        self
    }

    /// Draw a cursor after the last character
    pub fn cursor(mut self, cursor: bool) -> Self {
        self.cursor = cursor;
        self
    }
}

impl Widget for TextBlock<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        if area.width == 0 || area.height == 0 {
            return;
        }

        if self.content.is_empty() {
            if self.cursor {
                buf.set_string(area.x, area.y, CURSOR, self.style);
            }
            let offset = u16::from(self.cursor);
            if area.width > offset {
                buf.set_stringn(
                    area.x + offset,
                    area.y,
                    self.placeholder,
                    usize::from(area.width - offset),
                    self.placeholder_style,
                );
            }
            return;
        }

        // Reserve a column so the cursor never wraps onto its own line
        let width = usize::from(area.width).saturating_sub(usize::from(self.cursor)).max(1);
        let mut lines = wrap_lines(self.content, width);
        if self.cursor {
            if let Some(last) = lines.last_mut() {
                last.push_str(CURSOR);
            }
        }

        let height = usize::from(area.height);
        let skip = lines.len().saturating_sub(height);
        for (row, line) in lines.iter().skip(skip).enumerate() {
            #[allow(clippy::cast_possible_truncation)]
            let y = area.y + row as u16;
            buf.set_stringn(area.x, y, line, usize::from(area.width), self.style);
        }
    }
}
