//! Dashboard Messages
//!
//! Everything that flows in and out of the [`Dashboard`](crate::Dashboard).
//!
//! # Design
//!
//! The dashboard is a pure state machine. A surface feeds it [`Message`]s
//! (key presses, timer firings, results of background work) and executes
//! the [`Command`]s it returns. The dashboard never spawns tasks, sleeps,
//! or touches the terminal itself, which keeps it testable with nothing
//! more than a clock value.

use std::time::Duration;

use crate::cache::CacheCategory;
use crate::collectors::{CollectorReport, SystemInfo};
use crate::frames::{FrameResolution, FrameSourceChain};

/// User intent, already decoded from raw key events
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum InputEvent {
    /// Activate the next view (wraps)
    NextView,
    /// Activate the previous view (wraps)
    PrevView,
    /// Activate the view at a zero-based index; ignored when out of range
    JumpTo(usize),
    /// Move the list cursor up on views that have one
    CursorUp,
    /// Move the list cursor down on views that have one
    CursorDown,
    /// Load the frame sources again
    Reload,
    Quit,
}

/// Input to [`Dashboard::update`](crate::Dashboard::update)
#[derive(Clone, Debug)]
pub enum Message {
    // ============================================
    // Timers
    // ============================================
    /// Animation timer fired
    Tick,

    /// Cache refresh timer fired
    Refresh,

    // ============================================
    // Background Results
    // ============================================
    /// A dispatched collector finished (or gave up)
    Collected(CollectorReport),

    /// The system summary was gathered
    SystemCollected(SystemInfo),

    /// A frame load finished
    FramesLoaded {
        /// Load request this answers
        generation: u64,
        resolution: FrameResolution,
    },

    // ============================================
    // Terminal
    // ============================================
    /// Decoded user input
    Input(InputEvent),

    /// Terminal size changed
    Resize {
        width: u16,
        height: u16,
    },
}

/// Work the surface performs on the dashboard's behalf
///
/// Every command eventually produces at most one [`Message`].
#[derive(Clone, Debug, PartialEq)]
pub enum Command {
    /// Send [`Message::Tick`] after the delay
    ScheduleTick(Duration),

    /// Send [`Message::Refresh`] after the delay
    ScheduleRefresh(Duration),

    /// Run the collector for `category` and send [`Message::Collected`]
    Collect {
        category: CacheCategory,
        /// Dispatch sequence number to echo back in the report
        seq: u64,
    },

    /// Gather the system summary and send [`Message::SystemCollected`]
    CollectSystem,

    /// Resolve the chain off the loop and send [`Message::FramesLoaded`]
    LoadFrames {
        generation: u64,
        chain: FrameSourceChain,
    },

    /// Leave the event loop
    Quit,
}
