//! Theme and Colors
//!
//! The dashboard palette, as 256-color indices so it looks the same on any
//! terminal that supports them.

use ratatui::style::{Color, Modifier, Style};

// ============================================================================
// Text Colors
// ============================================================================

/// Title and active tab text - aquamarine
pub const TITLE: Color = Color::Indexed(86);

/// Field labels and section headings - deep sky blue
pub const LABEL: Color = Color::Indexed(39);

/// Field values and plain text - light gray
pub const VALUE: Color = Color::Indexed(252);

/// Rules, borders and inactive tabs
pub const DIM: Color = Color::Indexed(240);

/// Controls hint and status text
pub const HINT: Color = Color::Indexed(241);

/// Notices about failed frame files
pub const NOTICE: Color = Color::Indexed(203);

// ============================================================================
// Tab Colors
// ============================================================================

pub const ACTIVE_TAB_BG: Color = Color::Indexed(236);
pub const INACTIVE_TAB_BG: Color = Color::Indexed(235);

// ============================================================================
// Procedural Rain
// ============================================================================

/// Cloud rows
pub const CLOUD: Color = Color::White;

/// Rain drops
pub const RAIN: Color = Color::Blue;

// ============================================================================
// Styles
// ============================================================================

pub fn title() -> Style {
    Style::default().fg(TITLE).add_modifier(Modifier::BOLD)
}

pub fn label() -> Style {
    Style::default().fg(LABEL).add_modifier(Modifier::BOLD)
}

pub fn value() -> Style {
    Style::default().fg(VALUE)
}

pub fn dim() -> Style {
    Style::default().fg(DIM)
}

pub fn muted() -> Style {
    Style::default().fg(HINT).add_modifier(Modifier::ITALIC)
}

pub fn hint() -> Style {
    Style::default().fg(HINT)
}

pub fn notice() -> Style {
    Style::default().fg(NOTICE)
}

pub fn active_tab() -> Style {
    Style::default()
        .fg(TITLE)
        .bg(ACTIVE_TAB_BG)
        .add_modifier(Modifier::BOLD)
}

pub fn inactive_tab() -> Style {
    Style::default().fg(DIM).bg(INACTIVE_TAB_BG)
}

/// Selected list entry
pub fn selected() -> Style {
    Style::default().fg(TITLE).add_modifier(Modifier::BOLD)
}
