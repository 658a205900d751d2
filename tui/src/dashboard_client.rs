//! Dashboard Client
//!
//! Thin wrapper around the core [`Dashboard`] for TUI integration. The
//! dashboard decides what should happen; this client makes it happen.
//!
//! # Architecture
//!
//! The TUI is a "thin client" with no dashboard logic of its own. The
//! client's job is:
//! 1. Feed messages (input, timers, results) to the dashboard
//! 2. Execute the [`Command`]s it returns as tokio tasks
//! 3. Deliver each task's result back as a [`Message`] on one channel
//!
//! Spawned tasks are never cancelled. If the loop has already exited when a
//! task finishes, its send fails and the result is dropped.

use std::time::{Duration, Instant};

use tokio::sync::mpsc;

use skyfetch_core::collectors::collect_system;
use skyfetch_core::{
    run_collector, CacheCategory, CollectorRegistry, CollectorReport, Command, Dashboard,
    FrameLimits, FrameResolution, FrameSourceChain, Message, RecordingOptions, SkyfetchConfig,
};

/// How the client runs background work
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ClientSettings {
    /// Time budget for one collector run
    pub collector_timeout: Duration,
    /// Time budget for the system summary
    pub system_timeout: Duration,
    pub frame_limits: FrameLimits,
    pub recording: RecordingOptions,
}

impl ClientSettings {
    /// Settings taken from the dashboard configuration
    pub fn from_config(config: &SkyfetchConfig) -> Self {
        Self {
            collector_timeout: config.cache.collector_timeout,
            system_timeout: config.cache.collector_timeout,
            frame_limits: FrameLimits::default(),
            recording: config.animation.recording,
        }
    }
}

/// Client that owns the dashboard and runs its commands
pub struct DashboardClient {
    /// The embedded dashboard
    dashboard: Dashboard,
    /// Collectors used for `Collect` commands
    registry: CollectorRegistry,
    settings: ClientSettings,
    /// Sender cloned into every spawned task
    tx: mpsc::UnboundedSender<Message>,
    /// Receiver for task results
    rx: mpsc::UnboundedReceiver<Message>,
}

impl DashboardClient {
    /// Create a client around `dashboard`
    pub fn new(dashboard: Dashboard, registry: CollectorRegistry, settings: ClientSettings) -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        Self {
            dashboard,
            registry,
            settings,
            tx,
            rx,
        }
    }

    /// Start the dashboard and launch its initial work
    pub fn start(&mut self, now: Instant) {
        let commands = self.dashboard.init(now);
        self.execute_all(commands);
    }

    /// Apply a message and launch whatever work it produces
    pub fn handle(&mut self, message: Message, now: Instant) {
        let commands = self.dashboard.update(message, now);
        self.execute_all(commands);
    }

    /// Wait for the next task result
    ///
    /// Never returns `None` while the client is alive, since it holds a
    /// sender itself.
    pub async fn recv(&mut self) -> Option<Message> {
        self.rx.recv().await
    }

    /// Receive all pending task results (non-blocking)
    pub fn recv_all(&mut self) -> Vec<Message> {
        let mut messages = Vec::new();
        while let Ok(msg) = self.rx.try_recv() {
            messages.push(msg);
        }
        messages
    }

    /// The embedded dashboard
    pub fn dashboard(&self) -> &Dashboard {
        &self.dashboard
    }

    /// Check if the dashboard is still running
    pub fn is_running(&self) -> bool {
        self.dashboard.is_running()
    }

    fn execute_all(&self, commands: Vec<Command>) {
        for command in commands {
            self.execute(command);
        }
    }

    fn execute(&self, command: Command) {
        let tx = self.tx.clone();
        match command {
            Command::ScheduleTick(delay) => {
                tokio::spawn(async move {
                    tokio::time::sleep(delay).await;
                    let _ = tx.send(Message::Tick);
                });
            }
            Command::ScheduleRefresh(delay) => {
                tokio::spawn(async move {
                    tokio::time::sleep(delay).await;
                    let _ = tx.send(Message::Refresh);
                });
            }
            Command::Collect { category, seq } => self.collect(category, seq, tx),
            Command::CollectSystem => {
                let timeout = self.settings.system_timeout;
                tokio::spawn(async move {
                    let info = collect_system(timeout).await;
                    let _ = tx.send(Message::SystemCollected(info));
                });
            }
            Command::LoadFrames { generation, chain } => self.load_frames(generation, chain, tx),
            Command::Quit => {
                tracing::debug!("Quit command received");
            }
        }
    }

    fn collect(&self, category: CacheCategory, seq: u64, tx: mpsc::UnboundedSender<Message>) {
        let Some(collector) = self.registry.get(category) else {
            tracing::debug!(category = %category, "No collector registered");
            let report = CollectorReport::unavailable(category, seq, "no collector available");
            let _ = tx.send(Message::Collected(report));
            return;
        };

        let timeout = self.settings.collector_timeout;
        tokio::spawn(async move {
            let report = run_collector(collector.as_ref(), seq, timeout).await;
            let _ = tx.send(Message::Collected(report));
        });
    }

    fn load_frames(
        &self,
        generation: u64,
        chain: FrameSourceChain,
        tx: mpsc::UnboundedSender<Message>,
    ) {
        let limits = self.settings.frame_limits;
        let options = self.settings.recording;
        tokio::spawn(async move {
            let resolution =
                match tokio::task::spawn_blocking(move || chain.resolve(&limits, &options)).await {
                    Ok(resolution) => resolution,
                    Err(e) => {
                        tracing::error!(error = %e, "Frame loading task failed");
                        FrameResolution {
                            diagnostics: vec![format!("frame loading failed: {e}")],
                            ..FrameResolution::default()
                        }
                    }
                };
            let _ = tx.send(Message::FramesLoaded {
                generation,
                resolution,
            });
        });
    }
}
