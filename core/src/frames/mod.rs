//! Animation Frames
//!
//! Frame data types and the two file formats that produce them:
//!
//! - **Delimited files**: blocks of ASCII art separated by `---FRAME---`
//!   sentinel lines, optionally tagged with a color (`---FRAME:RED---`)
//! - **Recordings**: asciicast-style terminal captures, resampled into
//!   discrete frames after stripping control sequences
//!
//! Both parsers enforce the same [`FrameLimits`] and never return an empty
//! [`FrameSequence`]: producing zero frames is an error.

mod delimited;
mod error;
mod reader;
mod recording;
mod source;
mod strip;

use std::ops::Deref;

pub use delimited::{load_delimited, parse_delimited, FRAME_SENTINEL};
pub use error::{FrameError, FrameErrorKind};
pub use recording::{load_recording, parse_recording, RecordingHeader, RecordingOptions};
pub use source::{FrameFormat, FrameOrigin, FrameResolution, FrameSource, FrameSourceChain};
pub use strip::strip_control_sequences;

// ============================================================================
// Limits
// ============================================================================

/// Largest frame file accepted (50 MiB)
pub const MAX_FILE_BYTES: u64 = 50 * 1024 * 1024;

/// Most lines scanned before a parse is aborted
pub const MAX_LINES: usize = 100_000;

/// Most frames a single file may produce
pub const MAX_FRAMES: usize = 10_000;

/// Longest single line accepted (1 MiB)
pub const MAX_LINE_BYTES: usize = 1024 * 1024;

/// Resource limits shared by both frame parsers
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FrameLimits {
    /// Maximum file size in bytes
    pub max_file_bytes: u64,
    /// Maximum number of lines scanned
    pub max_lines: usize,
    /// Maximum number of frames produced
    pub max_frames: usize,
    /// Maximum length of one line in bytes
    pub max_line_bytes: usize,
}

impl Default for FrameLimits {
    fn default() -> Self {
        Self {
            max_file_bytes: MAX_FILE_BYTES,
            max_lines: MAX_LINES,
            max_frames: MAX_FRAMES,
            max_line_bytes: MAX_LINE_BYTES,
        }
    }
}

// ============================================================================
// Frame Color
// ============================================================================

/// Semantic color tag attached to a frame
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum FrameColor {
    /// No explicit color (light gray)
    #[default]
    Default,
    Red,
    Green,
    Blue,
    Yellow,
    Cyan,
    Magenta,
    White,
    BrightBlue,
    BrightGreen,
    BrightRed,
}

impl FrameColor {
    /// Resolve a color name, case-insensitively
    ///
    /// Unrecognized names resolve to [`FrameColor::Default`]; this never fails.
    pub fn from_name(name: &str) -> Self {
        match name.trim().to_ascii_uppercase().as_str() {
            "RED" => Self::Red,
            "GREEN" => Self::Green,
            "BLUE" => Self::Blue,
            "YELLOW" => Self::Yellow,
            "CYAN" => Self::Cyan,
            "MAGENTA" => Self::Magenta,
            "WHITE" => Self::White,
            "BRIGHTBLUE" => Self::BrightBlue,
            "BRIGHTGREEN" => Self::BrightGreen,
            "BRIGHTRED" => Self::BrightRed,
            _ => Self::Default,
        }
    }

    /// 256-color palette index used when drawing this color
    pub fn ansi256(self) -> u8 {
        match self {
            Self::Default | Self::White => 252,
            Self::Red => 196,
            Self::Green => 82,
            Self::Blue => 39,
            Self::Yellow => 226,
            Self::Cyan => 86,
            Self::Magenta => 213,
            Self::BrightBlue => 75,
            Self::BrightGreen => 118,
            Self::BrightRed => 203,
        }
    }
}

// ============================================================================
// Frame / FrameSequence
// ============================================================================

/// One renderable unit of an animation
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Frame {
    content: String,
    color: FrameColor,
}

impl Frame {
    /// Create a frame from a text block and color tag
    pub fn new(content: impl Into<String>, color: FrameColor) -> Self {
        Self {
            content: content.into(),
            color,
        }
    }

    /// The frame's text, newline-delimited
    pub fn content(&self) -> &str {
        &self.content
    }

    /// The frame's color tag
    pub fn color(&self) -> FrameColor {
        self.color
    }

    /// Iterate over the frame's lines
    pub fn lines(&self) -> impl Iterator<Item = &str> {
        self.content.lines()
    }

    /// Width of the widest line, in chars
    pub fn width(&self) -> usize {
        self.lines().map(|l| l.chars().count()).max().unwrap_or(0)
    }

    /// Number of lines
    pub fn height(&self) -> usize {
        self.lines().count()
    }
}

/// A non-empty, ordered list of frames
///
/// The only way to build one is [`FrameSequence::new`], which rejects an
/// empty list, so `len() >= 1` always holds.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FrameSequence {
    frames: Vec<Frame>,
}

impl FrameSequence {
    /// Wrap a list of frames, failing if it is empty
    pub fn new(frames: Vec<Frame>, name: &str) -> Result<Self, FrameError> {
        if frames.is_empty() {
            return Err(FrameError::NoFrames {
                name: name.to_string(),
            });
        }
        Ok(Self { frames })
    }

    /// Widest line across all frames, in chars
    pub fn max_width(&self) -> usize {
        self.frames.iter().map(Frame::width).max().unwrap_or(0)
    }

    /// Tallest frame, in lines
    pub fn max_height(&self) -> usize {
        self.frames.iter().map(Frame::height).max().unwrap_or(0)
    }

    /// Consume the sequence, returning its frames
    pub fn into_frames(self) -> Vec<Frame> {
        self.frames
    }
}

impl Deref for FrameSequence {
    type Target = [Frame];

    fn deref(&self) -> &[Frame] {
        &self.frames
    }
}
