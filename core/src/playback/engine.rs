//! Playback Engine
//!
//! Owns the current [`FrameSequence`] (or none) and decides, tick by tick,
//! which frame is on screen and whether another tick is wanted.
//!
//! # States
//!
//! - `NoSequence`: no frames loaded, the procedural rain is shown
//! - `Playing`: each tick advances the index
//! - `FrozenAtLast`: non-looping playback reached the final frame
//! - `OneShot`: static mode, rendered once and never advanced
//!
//! The engine has no clock of its own. The dashboard calls [`PlaybackEngine::tick`]
//! and schedules the next tick only when the outcome asks for one.

use std::time::Duration;

use rand::Rng;

use super::rain::{procedural_frame, RainMode};
use crate::frames::{Frame, FrameSequence};

/// Default frame interval (5 fps)
pub const DEFAULT_RATE: Duration = Duration::from_millis(200);

/// Playback settings
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PlaybackOptions {
    /// Interval between ticks
    pub rate: Duration,
    /// Wrap to the first frame after the last one
    pub looping: bool,
    /// Render once and never advance
    pub one_shot: bool,
}

impl Default for PlaybackOptions {
    fn default() -> Self {
        Self {
            rate: DEFAULT_RATE,
            looping: true,
            one_shot: false,
        }
    }
}

/// Observable playback state
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PlaybackState {
    NoSequence,
    Playing,
    FrozenAtLast,
    OneShot,
}

/// Result of one tick
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TickOutcome {
    /// The displayed frame changed
    pub advanced: bool,
    /// Another tick should be scheduled at [`PlaybackEngine::rate`]
    pub reschedule: bool,
}

/// Frame playback state machine
#[derive(Debug)]
pub struct PlaybackEngine {
    options: PlaybackOptions,
    sequence: Option<FrameSequence>,
    index: usize,
    frozen: bool,
    /// Current procedural frame, redrawn on each tick without a sequence
    rain: Frame,
}

impl PlaybackEngine {
    /// Create an engine with no sequence
    pub fn new(options: PlaybackOptions) -> Self {
        let rain = procedural_frame(rain_mode(&options), &mut rand::thread_rng());
        Self {
            options,
            sequence: None,
            index: 0,
            frozen: false,
            rain,
        }
    }

    /// Swap in a new sequence and restart from its first frame
    pub fn set_sequence(&mut self, sequence: FrameSequence) {
        tracing::debug!(frames = sequence.len(), "Playback sequence replaced");
        self.sequence = Some(sequence);
        self.index = 0;
        self.frozen = false;
    }

    /// Drop the sequence and return to the procedural animation
    pub fn clear_sequence(&mut self) {
        self.sequence = None;
        self.index = 0;
        self.frozen = false;
    }

    /// Advance one step using the thread RNG for rain
    pub fn tick(&mut self) -> TickOutcome {
        self.tick_with(&mut rand::thread_rng())
    }

    /// Advance one step with a caller-supplied RNG
    pub fn tick_with<R: Rng + ?Sized>(&mut self, rng: &mut R) -> TickOutcome {
        if self.options.one_shot {
            return TickOutcome {
                advanced: false,
                reschedule: false,
            };
        }

        let Some(sequence) = &self.sequence else {
            self.rain = procedural_frame(RainMode::Animated, rng);
            return TickOutcome {
                advanced: true,
                reschedule: true,
            };
        };

        let count = sequence.len();
        if self.options.looping {
            self.index = (self.index + 1) % count;
            return TickOutcome {
                advanced: count > 1,
                reschedule: true,
            };
        }

        if self.index + 1 < count {
            self.index += 1;
            TickOutcome {
                advanced: true,
                reschedule: true,
            }
        } else {
            if !self.frozen {
                tracing::debug!(index = self.index, "Playback frozen at last frame");
            }
            self.frozen = true;
            TickOutcome {
                advanced: false,
                reschedule: false,
            }
        }
    }

    /// The frame to draw right now
    ///
    /// Falls back to the procedural frame when no sequence is loaded.
    pub fn current_frame(&self) -> &Frame {
        match &self.sequence {
            Some(sequence) => &sequence[self.index],
            None => &self.rain,
        }
    }

    /// True when the procedural animation is showing
    pub fn is_procedural(&self) -> bool {
        self.sequence.is_none()
    }

    /// Current state
    pub fn state(&self) -> PlaybackState {
        if self.options.one_shot {
            PlaybackState::OneShot
        } else if self.sequence.is_none() {
            PlaybackState::NoSequence
        } else if self.frozen {
            PlaybackState::FrozenAtLast
        } else {
            PlaybackState::Playing
        }
    }

    /// Index into the sequence (0 without one)
    pub fn index(&self) -> usize {
        self.index
    }

    /// Number of loaded frames (0 without a sequence)
    pub fn frame_count(&self) -> usize {
        self.sequence.as_ref().map_or(0, |s| s.len())
    }

    /// The loaded sequence, if any
    pub fn sequence(&self) -> Option<&FrameSequence> {
        self.sequence.as_ref()
    }

    /// Interval between ticks
    pub fn rate(&self) -> Duration {
        self.options.rate
    }

    /// True when the engine never advances
    pub fn is_one_shot(&self) -> bool {
        self.options.one_shot
    }
}

fn rain_mode(options: &PlaybackOptions) -> RainMode {
    if options.one_shot {
        RainMode::Static
    } else {
        RainMode::Animated
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::frames::FrameColor;
    use pretty_assertions::assert_eq;

    fn sequence(n: usize) -> FrameSequence {
        let frames = (0..n)
            .map(|i| Frame::new(format!("frame {i}\n"), FrameColor::Default))
            .collect();
        FrameSequence::new(frames, "test").unwrap()
    }

    fn engine(looping: bool) -> PlaybackEngine {
        let mut engine = PlaybackEngine::new(PlaybackOptions {
            looping,
            ..PlaybackOptions::default()
        });
        engine.set_sequence(sequence(3));
        engine
    }

    #[test]
    fn test_looping_wraps() {
        let mut engine = engine(true);
        let indices: Vec<usize> = (0..4)
            .map(|_| {
                engine.tick();
                engine.index()
            })
            .collect();
        assert_eq!(indices, vec![1, 2, 0, 1]);
        assert_eq!(engine.state(), PlaybackState::Playing);
    }

    #[test]
    fn test_non_looping_freezes() {
        let mut engine = engine(false);
        assert!(engine.tick().reschedule);
        assert!(engine.tick().reschedule);
        assert_eq!(engine.index(), 2);

        let outcome = engine.tick();
        assert_eq!(
            outcome,
            TickOutcome {
                advanced: false,
                reschedule: false
            }
        );
        engine.tick();
        assert_eq!(engine.index(), 2);
        assert_eq!(engine.state(), PlaybackState::FrozenAtLast);
    }

    #[test]
    fn test_set_sequence_resets() {
        let mut engine = engine(false);
        for _ in 0..5 {
            engine.tick();
        }
        assert_eq!(engine.state(), PlaybackState::FrozenAtLast);

        engine.set_sequence(sequence(2));
        assert_eq!(engine.index(), 0);
        assert_eq!(engine.state(), PlaybackState::Playing);
        assert_eq!(engine.current_frame().content(), "frame 0\n");
    }

    #[test]
    fn test_one_shot_never_advances() {
        let mut engine = PlaybackEngine::new(PlaybackOptions {
            one_shot: true,
            ..PlaybackOptions::default()
        });
        engine.set_sequence(sequence(3));

        let outcome = engine.tick();
        assert!(!outcome.reschedule);
        assert_eq!(engine.index(), 0);
        assert_eq!(engine.state(), PlaybackState::OneShot);
    }

    #[test]
    fn test_no_sequence_uses_rain() {
        let mut engine = PlaybackEngine::new(PlaybackOptions::default());
        assert_eq!(engine.state(), PlaybackState::NoSequence);
        assert!(engine.is_procedural());
        assert_eq!(engine.frame_count(), 0);

        let outcome = engine.tick();
        assert!(outcome.reschedule);
        assert_eq!(engine.current_frame().height(), 8);
    }

    #[test]
    fn test_one_shot_rain_is_static() {
        let a = PlaybackEngine::new(PlaybackOptions {
            one_shot: true,
            ..PlaybackOptions::default()
        });
        let b = PlaybackEngine::new(PlaybackOptions {
            one_shot: true,
            ..PlaybackOptions::default()
        });
        assert_eq!(a.current_frame(), b.current_frame());
    }

    #[test]
    fn test_single_frame_loop_does_not_report_change() {
        let mut engine = PlaybackEngine::new(PlaybackOptions::default());
        engine.set_sequence(sequence(1));
        let outcome = engine.tick();
        assert!(!outcome.advanced);
        assert!(outcome.reschedule);
        assert_eq!(engine.index(), 0);
    }

    #[test]
    fn test_clear_sequence_returns_to_rain() {
        let mut engine = engine(true);
        engine.tick();
        engine.clear_sequence();
        assert_eq!(engine.index(), 0);
        assert_eq!(engine.state(), PlaybackState::NoSequence);
    }
}
