//! Skyfetch Core - Headless Dashboard Logic
//!
//! Everything the skyfetch terminal dashboard knows, with no terminal
//! attached: frame file parsing, animation playback, host metric collection
//! and caching, the tabbed views, and the update loop that ties them
//! together.
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────┐
//! │                      Surface (skyfetch-tui)                   │
//! │   key/resize events ─┐                     ┌─► draw state     │
//! │   timers, results ───┤                     │                  │
//! └──────────────────────┼─────────────────────┼──────────────────┘
//!                    Message                Command
//! ┌──────────────────────┼─────────────────────┼──────────────────┐
//! │                      ▼     Dashboard       │                  │
//! │  ┌──────────┐  ┌──────────┐  ┌──────────────┐  ┌────────────┐ │
//! │  │ Playback │  │ Snapshot │  │     View     │  │   System   │ │
//! │  │  Engine  │  │  Cache   │  │  Scheduler   │  │  Summary   │ │
//! │  └────┬─────┘  └────┬─────┘  └──────────────┘  └────────────┘ │
//! │       │             │                                         │
//! │  frames/ (parsers,  collectors/ (async, timeout-bounded)      │
//! │  source chain)                                                │
//! └───────────────────────────────────────────────────────────────┘
//! ```
//!
//! # Key Types
//!
//! - [`Dashboard`]: the state machine; applies [`Message`]s, returns [`Command`]s
//! - [`FrameSequence`]: a non-empty, parsed animation
//! - [`FrameSourceChain`]: ordered frame sources with fallback
//! - [`PlaybackEngine`]: frame index, looping and freezing
//! - [`SnapshotCache`]: per-category TTL cache of collected metrics
//! - [`Collector`]: async source of one category of metrics
//! - [`ViewScheduler`]: ordered views with one active
//!
//! # Module Overview
//!
//! - [`frames`]: frame types, delimited and recording parsers, control-sequence stripping
//! - [`playback`]: playback engine, procedural rain, palette strip
//! - [`cache`]: snapshot cache
//! - [`collectors`]: host collectors and the timeout runner
//! - [`views`]: view rendering and scheduling
//! - [`dashboard`]: the update loop
//! - [`messages`]: messages, commands and input events
//! - [`config`]: TOML + environment configuration
//!
//! # No TUI Dependencies
//!
//! This crate has no dependency on ratatui or crossterm. Views render to
//! structured lines; styling them is the surface's job.

#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]

pub mod cache;
pub mod collectors;
pub mod config;
pub mod dashboard;
pub mod frames;
pub mod messages;
pub mod playback;
pub mod views;

// Re-exports for convenience
pub use cache::{ApplyResult, CacheCategory, CacheTtls, SlotValue, SnapshotCache};
pub use collectors::{
    run_collector, CollectedSnapshot, CollectionError, Collector, CollectorOutcome,
    CollectorRegistry, CollectorReport, CollectorSettings, SystemInfo,
};
pub use dashboard::{Dashboard, Notice};
pub use frames::{
    Frame, FrameColor, FrameError, FrameErrorKind, FrameLimits, FrameOrigin, FrameResolution,
    FrameSequence, FrameSource, FrameSourceChain, RecordingOptions,
};
pub use messages::{Command, InputEvent, Message};
pub use playback::{PlaybackEngine, PlaybackOptions, PlaybackState};
pub use views::{ContentLine, View, ViewContent, ViewContext, ViewScheduler};

// Config exports
pub use config::{
    config_path, default_config_path, load_config, load_config_from_path, load_config_or_default,
    ConfigError, ConfigOverrides, ConfigSource, SkyfetchConfig,
};
