//! ContentBlock Widget
//!
//! A borderless, scrollable rendering of a view's [`ViewContent`]. Plain
//! text wraps to the block width; everything else is one row and clips.
//! When the content holds a selected list entry, the scroll offset follows
//! it so the selection never leaves the screen.

use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::text::{Line, Span};
use ratatui::widgets::StatefulWidget;
use textwrap::wrap;

use skyfetch_core::views::RULE;
use skyfetch_core::{ContentLine, ViewContent};

use crate::theme;

/// State for a scrollable content block
#[derive(Debug, Default)]
pub struct ContentBlockState {
    /// Scroll offset (rows from top)
    pub scroll_offset: usize,
    /// Total rows after wrapping
    pub total_lines: usize,
}

impl ContentBlockState {
    /// Back to the top
    pub fn reset(&mut self) {
        self.scroll_offset = 0;
    }

    /// Scroll just enough that `row` is inside a window of `height` rows
    fn reveal(&mut self, row: usize, height: usize) {
        if row < self.scroll_offset {
            self.scroll_offset = row;
        } else if height > 0 && row >= self.scroll_offset + height {
            self.scroll_offset = row + 1 - height;
        }
    }
}

/// A borderless, scrollable block of styled view content
pub struct ContentBlock<'a> {
    content: &'a ViewContent,
}

impl<'a> ContentBlock<'a> {
    pub fn new(content: &'a ViewContent) -> Self {
        Self { content }
    }

    /// Styled rows for `width`, plus the row of the selected entry
    fn layout(&self, width: usize) -> (Vec<Line<'a>>, Option<usize>) {
        let content: &'a ViewContent = self.content;
        let mut rows = Vec::with_capacity(content.lines.len());
        let mut selected_row = None;

        for line in &content.lines {
            match line {
                ContentLine::Heading(title) => {
                    rows.push(Line::from(Span::styled(title.as_str(), theme::label())));
                }
                ContentLine::Rule => rows.push(Line::from(Span::styled(RULE, theme::dim()))),
                ContentLine::Field { label, value } => rows.push(Line::from(vec![
                    Span::styled(format!("{label}: "), theme::label()),
                    Span::styled(value.as_str(), theme::value()),
                ])),
                ContentLine::Text(text) => {
                    if text.is_empty() || width == 0 {
                        rows.push(Line::from(Span::styled(text.as_str(), theme::value())));
                    } else {
                        rows.extend(wrap(text, width).into_iter().map(|cow| {
                            Line::from(Span::styled(cow.into_owned(), theme::value()))
                        }));
                    }
                }
                ContentLine::Muted(text) => {
                    rows.push(Line::from(Span::styled(text.as_str(), theme::muted())));
                }
                ContentLine::Blank => rows.push(Line::default()),
                ContentLine::Entry {
                    title,
                    description,
                    selected,
                } => {
                    let (marker, title_style) = if *selected {
                        selected_row = Some(rows.len());
                        ("> ", theme::selected())
                    } else {
                        ("  ", theme::value())
                    };
                    rows.push(Line::from(vec![
                        Span::styled(marker, theme::selected()),
                        Span::styled(title.as_str(), title_style),
                        Span::styled(format!("  {description}"), theme::dim()),
                    ]));
                }
            }
        }

        (rows, selected_row)
    }
}

impl<'a> StatefulWidget for ContentBlock<'a> {
    type State = ContentBlockState;

    fn render(self, area: Rect, buf: &mut Buffer, state: &mut Self::State) {
        let (rows, selected_row) = self.layout(area.width as usize);
        let height = area.height as usize;

        state.total_lines = rows.len();

        // Clamp scroll, then keep the selection visible
        let max_scroll = state.total_lines.saturating_sub(height);
        state.scroll_offset = state.scroll_offset.min(max_scroll);
        if let Some(row) = selected_row {
            state.reveal(row, height);
        }

        // Render visible rows
        for (i, line) in rows.iter().skip(state.scroll_offset).take(height).enumerate() {
            let y = area.y + i as u16;
            buf.set_line(area.x, y, line, area.width);
        }
    }
}
