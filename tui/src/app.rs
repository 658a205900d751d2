//! Main Application
//!
//! The App struct manages the TUI lifecycle as a thin display client:
//! - Event loop (keyboard, resize)
//! - DashboardClient for state and background work
//! - Rendering after every event
//!
//! # Architecture
//!
//! The App owns no dashboard state. It:
//! 1. Converts terminal events to [`Message`]s
//! 2. Forwards them, and every background result, to the [`DashboardClient`]
//! 3. Redraws from the dashboard after each one
//!
//! There is no frame timer in the loop: redraws follow the dashboard's own
//! tick and refresh messages, so a static dashboard sits idle.

use std::time::Instant;

use chrono::Local;
use crossterm::event::{Event, EventStream, KeyEventKind};
use futures::StreamExt;
use ratatui::backend::Backend;
use ratatui::Terminal;

use skyfetch_core::Message;

use crate::dashboard_client::DashboardClient;
use crate::input::map_key;
use crate::render;
use crate::widgets::ContentBlockState;

/// Main application state
pub struct App {
    /// Client owning the dashboard
    client: DashboardClient,
    /// Scroll state of the content column
    content: ContentBlockState,
    /// Active view index at the last draw
    last_view: usize,
}

impl App {
    /// Create a new App around a configured client
    pub fn new(client: DashboardClient) -> Self {
        Self {
            client,
            content: ContentBlockState::default(),
            last_view: 0,
        }
    }

    /// Main event loop
    pub async fn run<B: Backend>(&mut self, terminal: &mut Terminal<B>) -> anyhow::Result<()> {
        self.client.start(Instant::now());

        let size = terminal.size()?;
        self.client.handle(
            Message::Resize {
                width: size.width,
                height: size.height,
            },
            Instant::now(),
        );

        // Render initial frame immediately so user sees UI
        self.render(terminal)?;

        // Create async event stream for non-blocking terminal events
        let mut event_stream = EventStream::new();

        while self.client.is_running() {
            tokio::select! {
                biased;

                // Terminal events - highest priority
                maybe_event = event_stream.next() => match maybe_event {
                    Some(Ok(event)) => self.handle_event(event),
                    Some(Err(e)) => tracing::warn!(error = %e, "Terminal event error"),
                    None => {
                        tracing::info!("Terminal event stream closed");
                        break;
                    }
                },

                // Timers and collector results
                Some(message) = self.client.recv() => {
                    self.client.handle(message, Instant::now());
                }
            }

            self.render(terminal)?;
        }

        Ok(())
    }

    /// Forward a terminal event to the dashboard
    fn handle_event(&mut self, event: Event) {
        let message = match event {
            // Only handle Press events (not Release or Repeat)
            Event::Key(key) if key.kind == KeyEventKind::Press => {
                map_key(key).map(Message::Input)
            }
            Event::Resize(width, height) => Some(Message::Resize { width, height }),
            _ => None,
        };

        if let Some(message) = message {
            self.client.handle(message, Instant::now());
        }
    }

    /// Render the UI
    fn render<B: Backend>(&mut self, terminal: &mut Terminal<B>) -> anyhow::Result<()> {
        let dashboard = self.client.dashboard();

        let active = dashboard.scheduler().active_index();
        if active != self.last_view {
            self.content.reset();
            self.last_view = active;
        }

        let now = Instant::now();
        let clock = Local::now().time();
        let content = &mut self.content;
        terminal.draw(|frame| render::draw(frame, dashboard, now, clock, content))?;

        Ok(())
    }
}
