//! Frame Rendering
//!
//! Draws the whole dashboard from a [`Dashboard`] snapshot. Nothing here
//! mutates dashboard state; the only state carried between draws is the
//! content scroll offset.
//!
//! ```text
//!  Skyfetch - System Monitor
//!
//!   Standard   Network   Hardware  ...     (tab bar, when enabled)
//!
//!    animation     System Information
//!    frame         ─────────────────────
//!                  OS: ...
//!  ╭ palette ──╮   ...
//!  ╰───────────╯
//!
//!  notice                                      (when set)
//!  Press 'q' or Ctrl+C to quit | ...
//! ```

use std::time::Instant;

use chrono::NaiveTime;
use ratatui::layout::{Constraint, Layout, Rect};
use ratatui::style::{Color, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;
use ratatui::Frame;
use unicode_width::UnicodeWidthStr;

use skyfetch_core::playback::{glyph_width, palette_strip, static_palette, CLOUD};
use skyfetch_core::Dashboard;

use crate::theme;
use crate::widgets::{ContentBlock, ContentBlockState, PaletteStrip};

/// Dashboard title
pub const TITLE: &str = "Skyfetch - System Monitor";

/// Quit part of the controls hint
const QUIT_HINT: &str = "Press 'q' or Ctrl+C to quit";

/// Shown until the first resize arrives
pub const LOADING: &str = "Loading...";

/// Columns between the animation panel and the content
const GAP: u16 = 3;

/// Padding around the animation: (vertical, horizontal)
const ANIMATION_PADDING: (u16, u16) = (1, 2);

/// Draw the dashboard into `frame`
pub fn draw(
    frame: &mut Frame,
    dashboard: &Dashboard,
    now: Instant,
    clock: NaiveTime,
    content_state: &mut ContentBlockState,
) {
    let area = frame.area();
    let (width, height) = dashboard.size();
    if width == 0 || height == 0 {
        frame.render_widget(Paragraph::new(LOADING).style(theme::hint()), area);
        return;
    }

    let config = dashboard.config();
    let show_tabs = config.tabs.enabled && dashboard.scheduler().len() > 1;
    let notice = dashboard.notice();

    let mut constraints = vec![Constraint::Length(2)];
    if show_tabs {
        constraints.push(Constraint::Length(2));
    }
    constraints.push(Constraint::Min(1));
    if notice.is_some() {
        constraints.push(Constraint::Length(1));
    }
    constraints.push(Constraint::Length(1));
    let rows = Layout::vertical(constraints).split(area);

    let mut next = 0;
    let mut take = || {
        let rect = rows[next];
        next += 1;
        rect
    };

    frame.render_widget(Paragraph::new(Span::styled(TITLE, theme::title())), take());
    if show_tabs {
        draw_tabs(frame, dashboard, take());
    }

    let body = take();
    if config.display.hide_animation {
        draw_content(frame, dashboard, now, clock, body, content_state);
    } else {
        let left_width = animation_width(dashboard).max(PaletteStrip::width());
        let [left, _, right] = Layout::horizontal([
            Constraint::Length(left_width),
            Constraint::Length(GAP),
            Constraint::Min(1),
        ])
        .areas(body);
        draw_animation_column(frame, dashboard, now, left);
        draw_content(frame, dashboard, now, clock, right, content_state);
    }

    if let Some(text) = notice {
        frame.render_widget(Paragraph::new(Span::styled(text, theme::notice())), take());
    }
    let tab_count = if show_tabs { dashboard.scheduler().len() } else { 0 };
    frame.render_widget(
        Paragraph::new(Span::styled(controls_hint(tab_count), theme::hint())),
        take(),
    );
}

/// Controls hint on the last row for `tab_count` switchable tabs
///
/// Number keys only reach the first nine tabs.
pub fn controls_hint(tab_count: usize) -> String {
    match tab_count {
        0 | 1 => QUIT_HINT.to_string(),
        n => format!("{QUIT_HINT} | Tab/Shift+Tab or 1-{} to switch tabs", n.min(9)),
    }
}

/// Active view content, scrolled to keep any selection visible
fn draw_content(
    frame: &mut Frame,
    dashboard: &Dashboard,
    now: Instant,
    clock: NaiveTime,
    area: Rect,
    state: &mut ContentBlockState,
) {
    let ctx = dashboard.view_context(now, clock, area.width, area.height);
    let content = dashboard.render_active(&ctx);
    frame.render_stateful_widget(ContentBlock::new(&content), area, state);
}

/// One tab per view; the active one highlighted
fn draw_tabs(frame: &mut Frame, dashboard: &Dashboard, area: Rect) {
    let scheduler = dashboard.scheduler();
    let mut spans = Vec::with_capacity(scheduler.len() * 2);
    for (i, view) in scheduler.views().iter().enumerate() {
        if i > 0 {
            spans.push(Span::raw(" "));
        }
        let style = if i == scheduler.active_index() {
            theme::active_tab()
        } else {
            theme::inactive_tab()
        };
        spans.push(Span::styled(format!(" {} ", view.title()), style));
    }
    frame.render_widget(Paragraph::new(Line::from(spans)), area);
}

/// Columns needed by the animation panel, padding included
fn animation_width(dashboard: &Dashboard) -> u16 {
    let playback = dashboard.playback();
    let glyph = match playback.sequence() {
        Some(sequence) => sequence
            .iter()
            .flat_map(|frame| frame.lines())
            .map(UnicodeWidthStr::width)
            .max()
            .unwrap_or(0),
        None => glyph_width(),
    };
    u16::try_from(glyph)
        .unwrap_or(u16::MAX)
        .saturating_add(ANIMATION_PADDING.1 * 2)
}

/// The current frame with the palette strip beneath it
fn draw_animation_column(frame: &mut Frame, dashboard: &Dashboard, now: Instant, area: Rect) {
    let playback = dashboard.playback();
    let current = playback.current_frame();

    let frame_height = u16::try_from(current.height())
        .unwrap_or(u16::MAX)
        .saturating_add(ANIMATION_PADDING.0 * 2);
    let [animation, palette, _] = Layout::vertical([
        Constraint::Length(frame_height),
        Constraint::Length(PaletteStrip::height()),
        Constraint::Min(0),
    ])
    .areas(area);

    let lines: Vec<Line> = if playback.is_procedural() {
        current
            .lines()
            .enumerate()
            .map(|(row, text)| {
                let color = if row < CLOUD.len() {
                    theme::CLOUD
                } else {
                    theme::RAIN
                };
                Line::from(Span::styled(text, Style::default().fg(color)))
            })
            .collect()
    } else {
        let style = Style::default().fg(Color::Indexed(current.color().ansi256()));
        current
            .lines()
            .map(|text| Line::from(Span::styled(text, style)))
            .collect()
    };

    let padded = Rect {
        x: animation.x.saturating_add(ANIMATION_PADDING.1),
        y: animation.y.saturating_add(ANIMATION_PADDING.0),
        width: animation.width.saturating_sub(ANIMATION_PADDING.1 * 2),
        height: animation.height.saturating_sub(ANIMATION_PADDING.0 * 2),
    };
    frame.render_widget(Paragraph::new(lines), padded);

    let rows = if dashboard.config().display.static_mode {
        static_palette()
    } else {
        palette_strip(now.saturating_duration_since(dashboard.started()))
    };
    let strip = Rect {
        width: palette.width.min(PaletteStrip::width()),
        ..palette
    };
    frame.render_widget(PaletteStrip::new(rows), strip);
}
