//! Dashboard Views
//!
//! A [`View`] turns the cache and system summary into [`ViewContent`]: a list
//! of structured lines (headings, label/value fields, list entries) that a
//! surface styles however it likes. Views hold no data of their own apart
//! from per-view interaction state such as the process list cursor.
//!
//! # Design
//!
//! `View` is a closed enum rather than a trait object. Callers never ask
//! which variant they hold; capabilities such as list navigation are exposed
//! as methods ([`View::handles_list_navigation`]) so input routing stays the
//! same when a variant is added.

mod cursor;
mod panels;
mod scheduler;

use std::time::Duration;

use chrono::NaiveTime;

use crate::cache::{CacheCategory, SnapshotCache};
use crate::collectors::SystemInfo;
use crate::config::DisplayConfig;

pub use cursor::ListCursor;
pub use panels::{format_uptime, RULE};
pub use scheduler::ViewScheduler;

// ============================================================================
// Content
// ============================================================================

/// One line of rendered view content
#[derive(Clone, Debug, PartialEq)]
pub enum ContentLine {
    /// Section heading
    Heading(String),
    /// Horizontal rule under a heading
    Rule,
    /// `label: value` pair
    Field { label: String, value: String },
    /// Plain text
    Text(String),
    /// De-emphasized status text ("Collecting...", failures)
    Muted(String),
    Blank,
    /// Selectable list entry
    Entry {
        title: String,
        description: String,
        selected: bool,
    },
}

/// Everything a view shows, top to bottom
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ViewContent {
    pub lines: Vec<ContentLine>,
}

impl ViewContent {
    pub fn new() -> Self {
        Self::default()
    }

    /// Heading followed by a rule and a blank line
    pub fn section(&mut self, title: impl Into<String>) -> &mut Self {
        self.lines.push(ContentLine::Heading(title.into()));
        self.lines.push(ContentLine::Rule);
        self.lines.push(ContentLine::Blank);
        self
    }

    pub fn field(&mut self, label: impl Into<String>, value: impl Into<String>) -> &mut Self {
        self.lines.push(ContentLine::Field {
            label: label.into(),
            value: value.into(),
        });
        self
    }

    pub fn text(&mut self, text: impl Into<String>) -> &mut Self {
        self.lines.push(ContentLine::Text(text.into()));
        self
    }

    pub fn muted(&mut self, text: impl Into<String>) -> &mut Self {
        self.lines.push(ContentLine::Muted(text.into()));
        self
    }

    pub fn blank(&mut self) -> &mut Self {
        self.lines.push(ContentLine::Blank);
        self
    }

    pub fn entry(
        &mut self,
        title: impl Into<String>,
        description: impl Into<String>,
        selected: bool,
    ) -> &mut Self {
        self.lines.push(ContentLine::Entry {
            title: title.into(),
            description: description.into(),
            selected,
        });
        self
    }

    /// Value of the first field with `label`
    pub fn field_value(&self, label: &str) -> Option<&str> {
        self.lines.iter().find_map(|line| match line {
            ContentLine::Field { label: l, value } if l == label => Some(value.as_str()),
            _ => None,
        })
    }

    /// Unstyled text of every line, for logs and tests
    pub fn plain_lines(&self) -> Vec<String> {
        self.lines
            .iter()
            .map(|line| match line {
                ContentLine::Heading(s) | ContentLine::Text(s) | ContentLine::Muted(s) => s.clone(),
                ContentLine::Rule => panels::RULE.to_string(),
                ContentLine::Field { label, value } => format!("{label}: {value}"),
                ContentLine::Blank => String::new(),
                ContentLine::Entry {
                    title,
                    description,
                    selected,
                } => {
                    let marker = if *selected { ">" } else { " " };
                    format!("{marker} {title} ({description})")
                }
            })
            .collect()
    }
}

// ============================================================================
// Render Context
// ============================================================================

/// Read-only state a view renders from
#[derive(Clone, Copy, Debug)]
pub struct ViewContext<'a> {
    pub cache: &'a SnapshotCache,
    pub system: &'a SystemInfo,
    pub display: &'a DisplayConfig,
    /// Time since the dashboard started
    pub uptime: Duration,
    /// Local wall-clock time
    pub clock: NaiveTime,
    /// Current frame interval
    pub frame_rate: Duration,
    /// Space available to the view, in cells
    pub width: u16,
    pub height: u16,
}

// ============================================================================
// View
// ============================================================================

/// A dashboard panel
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum View {
    /// System summary and runtime information
    Standard,
    Network,
    Hardware,
    /// Top processes, with a selection cursor
    Processes(ListCursor),
    Weather,
}

impl View {
    /// Build a view from its config id, case-insensitively
    pub fn from_id(id: &str) -> Option<Self> {
        match id.trim().to_ascii_lowercase().as_str() {
            "standard" => Some(Self::Standard),
            "network" => Some(Self::Network),
            "hardware" => Some(Self::Hardware),
            "processes" => Some(Self::Processes(ListCursor::new())),
            "weather" => Some(Self::Weather),
            _ => None,
        }
    }

    /// Stable id used in config
    pub fn id(&self) -> &'static str {
        match self {
            Self::Standard => "standard",
            Self::Network => "network",
            Self::Hardware => "hardware",
            Self::Processes(_) => "processes",
            Self::Weather => "weather",
        }
    }

    /// Tab title
    pub fn title(&self) -> &'static str {
        match self {
            Self::Standard => "Standard",
            Self::Network => "Network",
            Self::Hardware => "Hardware",
            Self::Processes(_) => "Processes",
            Self::Weather => "Weather",
        }
    }

    /// True if up/down input moves a cursor inside this view
    pub fn handles_list_navigation(&self) -> bool {
        self.list_cursor().is_some()
    }

    /// The view's list cursor, if it has one
    pub fn list_cursor(&self) -> Option<&ListCursor> {
        match self {
            Self::Processes(cursor) => Some(cursor),
            _ => None,
        }
    }

    /// Mutable access to the view's list cursor, if it has one
    pub fn list_cursor_mut(&mut self) -> Option<&mut ListCursor> {
        match self {
            Self::Processes(cursor) => Some(cursor),
            _ => None,
        }
    }

    /// Cache categories this view reads
    ///
    /// The standard view reads weather only when the weather field is on.
    pub fn categories(&self, display: &DisplayConfig) -> &'static [CacheCategory] {
        match self {
            Self::Standard if display.show_weather => &[CacheCategory::Weather],
            Self::Standard => &[],
            Self::Network => &[CacheCategory::Network],
            Self::Hardware => &[CacheCategory::Hardware],
            Self::Processes(_) => &[CacheCategory::Process],
            Self::Weather => &[CacheCategory::Weather],
        }
    }

    /// Render the view
    pub fn render(&self, ctx: &ViewContext<'_>) -> ViewContent {
        match self {
            Self::Standard => panels::standard(ctx),
            Self::Network => panels::network(ctx),
            Self::Hardware => panels::hardware(ctx),
            Self::Processes(cursor) => panels::processes(ctx, cursor),
            Self::Weather => panels::weather(ctx),
        }
    }
}
