//! Terminal Recordings
//!
//! Reads asciicast-style captures: a JSON header object on the first line,
//! followed by one `[timestamp, kind, data]` event per line.
//!
//! # Resampling
//!
//! A recording can emit hundreds of tiny output events per second. Playing
//! those back one per tick would crawl and would blow through the frame
//! limit, so output is accumulated and cut into a frame whenever at least
//! [`RecordingOptions::min_frame_interval`] has passed since the previous
//! cut. Each cut is stripped of control sequences and kept only if enough
//! visible text remains; cursor-only noise is dropped.

use std::collections::HashMap;
use std::io::{BufRead, BufReader};
use std::path::Path;
use std::time::Duration;

use serde::Deserialize;

use super::reader::{open_checked, LineScanner};
use super::strip::strip_control_sequences;
use super::{Frame, FrameColor, FrameError, FrameLimits, FrameSequence};

/// Event kind carrying terminal output
const OUTPUT_EVENT: &str = "o";

/// Tunable resampling policy for recordings
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RecordingOptions {
    /// Minimum gap between two frame cuts
    pub min_frame_interval: Duration,
    /// A frame needs strictly more visible chars than this to be kept
    pub min_visible_chars: usize,
}

impl Default for RecordingOptions {
    fn default() -> Self {
        Self {
            min_frame_interval: Duration::from_millis(100),
            min_visible_chars: 5,
        }
    }
}

/// First line of a recording
#[derive(Clone, Debug, Default, Deserialize, PartialEq)]
#[serde(default)]
pub struct RecordingHeader {
    /// Format version (2 for asciicast v2)
    pub version: u32,
    /// Terminal width in columns
    pub width: u16,
    /// Terminal height in rows
    pub height: u16,
    /// Unix timestamp of the recording start
    pub timestamp: Option<i64>,
    /// Captured environment (SHELL, TERM, ...)
    pub env: HashMap<String, String>,
}

/// Load a recording file from disk
pub fn load_recording(
    path: &Path,
    limits: &FrameLimits,
    options: &RecordingOptions,
) -> Result<FrameSequence, FrameError> {
    let file = open_checked(path, limits)?;
    let name = path.display().to_string();
    let sequence = parse_recording(BufReader::new(file), &name, limits, options)?;

    tracing::info!(path = %name, frames = sequence.len(), "Loaded recording frames");
    Ok(sequence)
}

/// Parse a recording from any buffered reader
pub fn parse_recording<R: BufRead>(
    reader: R,
    name: &str,
    limits: &FrameLimits,
    options: &RecordingOptions,
) -> Result<FrameSequence, FrameError> {
    let mut scanner = LineScanner::new(reader, name, limits);

    let header_line = scanner.next_line()?.ok_or_else(|| FrameError::InvalidHeader {
        name: name.to_string(),
        reason: "missing header line".to_string(),
    })?;
    let header = parse_header(&header_line).map_err(|reason| FrameError::InvalidHeader {
        name: name.to_string(),
        reason,
    })?;

    if header.version != 2 {
        tracing::warn!(name, version = header.version, "Unexpected recording version");
    }

    let mut cutter = FrameCutter::new(name, limits, options);
    let mut output_bytes = 0usize;
    let mut skipped = 0usize;

    while let Some(line) = scanner.next_line()? {
        let Ok((timestamp, kind, data)) = serde_json::from_str::<(f64, String, String)>(&line)
        else {
            skipped += 1;
            continue;
        };

        if kind != OUTPUT_EVENT {
            continue;
        }

        output_bytes += data.len();
        cutter.push(timestamp, &data)?;
    }

    cutter.flush()?;

    tracing::debug!(
        name,
        width = header.width,
        height = header.height,
        output_bytes,
        skipped,
        "Replayed recording"
    );

    FrameSequence::new(cutter.frames, name)
}

/// Parse the header line, which must be a JSON object
fn parse_header(line: &str) -> Result<RecordingHeader, String> {
    let value: serde_json::Value = serde_json::from_str(line).map_err(|e| e.to_string())?;
    if !value.is_object() {
        return Err("header is not a JSON object".to_string());
    }
    serde_json::from_value(value).map_err(|e| e.to_string())
}

/// Accumulates output and cuts it into frames at the resampling interval
struct FrameCutter<'a> {
    name: &'a str,
    limits: &'a FrameLimits,
    interval: f64,
    min_visible_chars: usize,
    buffer: String,
    last_cut: f64,
    frames: Vec<Frame>,
}

impl<'a> FrameCutter<'a> {
    fn new(name: &'a str, limits: &'a FrameLimits, options: &RecordingOptions) -> Self {
        Self {
            name,
            limits,
            interval: options.min_frame_interval.as_secs_f64(),
            min_visible_chars: options.min_visible_chars,
            buffer: String::new(),
            last_cut: 0.0,
            frames: Vec::new(),
        }
    }

    fn push(&mut self, timestamp: f64, data: &str) -> Result<(), FrameError> {
        self.buffer.push_str(data);

        if timestamp - self.last_cut >= self.interval {
            self.cut()?;
            self.last_cut = timestamp;
        }
        Ok(())
    }

    fn flush(&mut self) -> Result<(), FrameError> {
        self.cut()
    }

    /// Turn the buffer into a candidate frame and clear it
    fn cut(&mut self) -> Result<(), FrameError> {
        if self.buffer.is_empty() {
            return Ok(());
        }

        let text = strip_control_sequences(&std::mem::take(&mut self.buffer));
        if text.trim().chars().count() <= self.min_visible_chars {
            return Ok(());
        }

        if self.frames.len() >= self.limits.max_frames {
            return Err(FrameError::TooManyFrames {
                name: self.name.to_string(),
                max: self.limits.max_frames,
            });
        }

        self.frames.push(Frame::new(text, FrameColor::Default));
        Ok(())
    }
}
