//! PaletteStrip Widget
//!
//! Two rows of color swatches inside a rounded border.

use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::style::{Color, Style};
use ratatui::widgets::{Block, BorderType, Widget};

use skyfetch_core::playback::{PaletteRows, SWATCHES};

use crate::theme;

/// Columns per swatch
const SWATCH_WIDTH: u16 = 3;

pub struct PaletteStrip {
    rows: PaletteRows,
}

impl PaletteStrip {
    pub fn new(rows: PaletteRows) -> Self {
        Self { rows }
    }

    /// Width including the border
    pub const fn width() -> u16 {
        SWATCHES as u16 * SWATCH_WIDTH + 2
    }

    /// Height including the border
    pub const fn height() -> u16 {
        4
    }
}

impl Widget for PaletteStrip {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let block = Block::bordered()
            .border_type(BorderType::Rounded)
            .border_style(theme::dim());
        let inner = block.inner(area);
        block.render(area, buf);

        for (r, row) in self.rows.iter().enumerate() {
            let y = inner.y + r as u16;
            if y >= inner.bottom() {
                break;
            }
            for (i, color) in row.iter().enumerate() {
                let x = inner.x + i as u16 * SWATCH_WIDTH;
                if x + SWATCH_WIDTH > inner.right() {
                    break;
                }
                buf.set_string(x, y, "   ", Style::default().bg(Color::Indexed(*color)));
            }
        }
    }
}
