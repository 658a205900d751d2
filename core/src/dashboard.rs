//! Dashboard
//!
//! The single owner and mutator of all dashboard state: playback, the
//! snapshot cache, the view scheduler and the system summary.
//!
//! # Design
//!
//! ```text
//!   surface ──Message──► Dashboard::update ──Vec<Command>──► surface
//!      ▲                                                        │
//!      └──────────── results of spawned work (Message) ◄────────┘
//! ```
//!
//! `update` never blocks and never performs IO. Anything slow (collectors,
//! frame loads, timers) is requested as a [`Command`] and comes back later
//! as a [`Message`]. Because only one message is applied at a time no state
//! is shared with the background work and nothing needs a lock.

use std::time::{Duration, Instant};

use chrono::NaiveTime;

use crate::cache::{ApplyResult, CacheCategory, SnapshotCache};
use crate::collectors::SystemInfo;
use crate::config::SkyfetchConfig;
use crate::frames::{FrameResolution, FrameSourceChain};
use crate::messages::{Command, InputEvent, Message};
use crate::playback::PlaybackEngine;
use crate::views::{ViewContent, ViewContext, ViewScheduler};

/// How long a notice stays visible
pub const NOTICE_DURATION: Duration = Duration::from_secs(8);

/// Transient status line message
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Notice {
    pub text: String,
    pub shown_at: Instant,
}

/// Dashboard state machine
#[derive(Debug)]
pub struct Dashboard {
    config: SkyfetchConfig,
    sources: FrameSourceChain,
    playback: PlaybackEngine,
    cache: SnapshotCache,
    scheduler: ViewScheduler,
    system: SystemInfo,
    notice: Option<Notice>,
    size: (u16, u16),
    started: Instant,
    running: bool,
    /// Generation of the most recent frame load request
    frame_generation: u64,
    /// A tick is scheduled and not yet delivered
    tick_pending: bool,
    /// When the system summary was last requested
    system_requested: Option<Instant>,
}

impl Dashboard {
    /// Create a dashboard; nothing happens until [`Dashboard::init`]
    pub fn new(config: SkyfetchConfig, sources: FrameSourceChain) -> Self {
        let playback = PlaybackEngine::new(config.playback_options());
        let cache = SnapshotCache::new(config.cache.ttls);
        let scheduler = ViewScheduler::from_config(&config.tabs);

        Self {
            config,
            sources,
            playback,
            cache,
            scheduler,
            system: SystemInfo::basic(),
            notice: None,
            size: (0, 0),
            started: Instant::now(),
            running: true,
            frame_generation: 0,
            tick_pending: false,
            system_requested: None,
        }
    }

    /// Start the dashboard, returning the first batch of work
    pub fn init(&mut self, now: Instant) -> Vec<Command> {
        self.started = now;
        let mut commands = Vec::new();

        if let Some(load) = self.request_frames() {
            commands.push(load);
        }
        commands.extend(self.dispatch_due(now));
        commands.push(self.request_system(now));

        if !self.config.display.static_mode {
            commands.extend(self.schedule_tick());
            commands.push(Command::ScheduleRefresh(self.config.cache.refresh_interval));
        }

        tracing::info!(
            views = self.scheduler.len(),
            frame_sources = self.sources.sources().len(),
            static_mode = self.config.display.static_mode,
            rate_ms = self.playback.rate().as_millis() as u64,
            "Dashboard started"
        );
        commands
    }

    /// Apply one message
    pub fn update(&mut self, message: Message, now: Instant) -> Vec<Command> {
        match message {
            Message::Tick => self.on_tick(),
            Message::Refresh => self.on_refresh(now),
            Message::Collected(report) => {
                let category = report.category;
                if self.cache.apply(report, now) == ApplyResult::Applied
                    && category == CacheCategory::Process
                {
                    self.scheduler.clamp_cursors(self.process_count());
                }
                Vec::new()
            }
            Message::SystemCollected(info) => {
                self.system = info;
                Vec::new()
            }
            Message::FramesLoaded {
                generation,
                resolution,
            } => self.on_frames_loaded(generation, resolution, now),
            Message::Input(input) => self.on_input(input, now),
            Message::Resize { width, height } => {
                self.size = (width, height);
                Vec::new()
            }
        }
    }

    // ========================================================================
    // Message handlers
    // ========================================================================

    fn on_tick(&mut self) -> Vec<Command> {
        self.tick_pending = false;
        let outcome = self.playback.tick();
        if outcome.reschedule && !self.config.display.static_mode {
            self.schedule_tick().into_iter().collect()
        } else {
            Vec::new()
        }
    }

    fn on_refresh(&mut self, now: Instant) -> Vec<Command> {
        let mut commands = self.dispatch_due(now);

        let system_due = self
            .system_requested
            .map_or(true, |at| now.saturating_duration_since(at) >= self.config.cache.system_interval);
        if system_due {
            commands.push(self.request_system(now));
        }

        if self
            .notice
            .as_ref()
            .is_some_and(|n| now.saturating_duration_since(n.shown_at) >= NOTICE_DURATION)
        {
            self.notice = None;
        }

        if !self.config.display.static_mode {
            commands.push(Command::ScheduleRefresh(self.config.cache.refresh_interval));
        }
        commands
    }

    fn on_frames_loaded(
        &mut self,
        generation: u64,
        resolution: FrameResolution,
        now: Instant,
    ) -> Vec<Command> {
        if generation < self.frame_generation {
            tracing::debug!(
                generation,
                latest = self.frame_generation,
                "Ignoring superseded frame load"
            );
            return Vec::new();
        }

        let FrameResolution {
            sequence,
            origin,
            diagnostics,
        } = resolution;

        for diagnostic in &diagnostics {
            tracing::warn!(%diagnostic, "Frame source failed");
        }

        match sequence {
            Some(sequence) => {
                tracing::info!(
                    frames = sequence.len(),
                    origin = ?origin,
                    "Frames loaded"
                );
                self.playback.set_sequence(sequence);
            }
            None => {
                tracing::info!("No frames loaded, using procedural animation");
                self.playback.clear_sequence();
            }
        }

        self.notice = (!diagnostics.is_empty()).then(|| Notice {
            text: diagnostics.join("; "),
            shown_at: now,
        });

        self.schedule_tick().into_iter().collect()
    }

    fn on_input(&mut self, input: InputEvent, now: Instant) -> Vec<Command> {
        match input {
            InputEvent::NextView => self.scheduler.next(),
            InputEvent::PrevView => self.scheduler.prev(),
            InputEvent::JumpTo(index) => {
                self.scheduler.jump_to(index);
            }
            InputEvent::CursorUp => {
                self.scheduler.cursor_up();
            }
            InputEvent::CursorDown => {
                let len = self.process_count();
                self.scheduler.cursor_down(len);
            }
            InputEvent::Reload => {
                return match self.request_frames() {
                    Some(load) => vec![load],
                    None => {
                        self.notice = Some(Notice {
                            text: "No frame file configured".to_string(),
                            shown_at: now,
                        });
                        Vec::new()
                    }
                };
            }
            InputEvent::Quit => {
                tracing::info!("Quit requested");
                self.running = false;
                return vec![Command::Quit];
            }
        }
        Vec::new()
    }

    // ========================================================================
    // Command helpers
    // ========================================================================

    fn request_frames(&mut self) -> Option<Command> {
        if self.sources.is_empty() {
            return None;
        }
        self.frame_generation += 1;
        Some(Command::LoadFrames {
            generation: self.frame_generation,
            chain: self.sources.clone(),
        })
    }

    fn request_system(&mut self, now: Instant) -> Command {
        self.system_requested = Some(now);
        Command::CollectSystem
    }

    /// Dispatch every category a view reads that is due and not in flight
    fn dispatch_due(&mut self, now: Instant) -> Vec<Command> {
        let wanted = self.scheduler.categories(&self.config.display);
        self.cache
            .due_categories(now)
            .into_iter()
            .filter(|category| wanted.contains(category))
            .map(|category| {
                let seq = self.cache.begin_refresh(category, now);
                tracing::debug!(category = %category, seq, "Dispatching collector");
                Command::Collect { category, seq }
            })
            .collect()
    }

    /// Ask for a tick unless one is already on its way or playback is one-shot
    fn schedule_tick(&mut self) -> Option<Command> {
        if self.tick_pending || self.playback.is_one_shot() {
            return None;
        }
        self.tick_pending = true;
        Some(Command::ScheduleTick(self.playback.rate()))
    }

    fn process_count(&self) -> usize {
        self.cache.process().map_or(0, |p| p.top.len())
    }

    // ========================================================================
    // Accessors
    // ========================================================================

    pub fn config(&self) -> &SkyfetchConfig {
        &self.config
    }

    pub fn playback(&self) -> &PlaybackEngine {
        &self.playback
    }

    pub fn cache(&self) -> &SnapshotCache {
        &self.cache
    }

    pub fn scheduler(&self) -> &ViewScheduler {
        &self.scheduler
    }

    pub fn system(&self) -> &SystemInfo {
        &self.system
    }

    /// Current notice text, if any
    pub fn notice(&self) -> Option<&str> {
        self.notice.as_ref().map(|n| n.text.as_str())
    }

    /// Last reported terminal size as `(width, height)`
    pub fn size(&self) -> (u16, u16) {
        self.size
    }

    pub fn started(&self) -> Instant {
        self.started
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    /// Latest frame load generation requested
    pub fn frame_generation(&self) -> u64 {
        self.frame_generation
    }

    /// Context for rendering views at `now`
    pub fn view_context(
        &self,
        now: Instant,
        clock: NaiveTime,
        width: u16,
        height: u16,
    ) -> ViewContext<'_> {
        ViewContext {
            cache: &self.cache,
            system: &self.system,
            display: &self.config.display,
            uptime: now.saturating_duration_since(self.started),
            clock,
            frame_rate: self.playback.rate(),
            width,
            height,
        }
    }

    /// Render the active view
    pub fn render_active(&self, ctx: &ViewContext<'_>) -> ViewContent {
        self.scheduler.render(ctx)
    }
}
