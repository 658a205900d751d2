//! Skyfetch TUI - Terminal surface for the skyfetch dashboard
//!
//! A full-screen terminal UI: an ASCII animation beside tabbed host
//! metrics. All dashboard behavior lives in `skyfetch-core`; this crate
//! turns terminal events into messages, runs the background work the
//! dashboard asks for, and draws the result.
//!
//! # Architecture
//!
//! - **App**: event loop over terminal events and background results
//! - **DashboardClient**: runs dashboard commands as tokio tasks
//! - **Render**: draws one frame from a dashboard snapshot
//! - **Widgets**: scrollable styled content, palette strip

pub mod app;
pub mod dashboard_client;
pub mod input;
pub mod render;
pub mod theme;
pub mod widgets;

pub use app::App;
pub use dashboard_client::{ClientSettings, DashboardClient};
