//! Frame loading errors

use std::path::PathBuf;

use thiserror::Error;

/// Broad class of a frame loading failure
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FrameErrorKind {
    /// Missing, directory, empty, oversize, or unreadable file
    FileAccess,
    /// Unparsable recording header
    Format,
    /// Line, line-length, or frame count overrun
    LimitExceeded,
    /// Parsing succeeded but produced no frames
    EmptyResult,
}

/// Errors produced while turning a file into a [`super::FrameSequence`]
#[derive(Debug, Error)]
pub enum FrameError {
    /// The path could not be inspected or opened
    #[error("cannot access {path}: {source}")]
    Access {
        /// The path that was attempted
        path: PathBuf,
        /// The underlying IO error
        #[source]
        source: std::io::Error,
    },

    /// The path names a directory
    #[error("{path} is a directory, not a file")]
    IsDirectory {
        /// The offending path
        path: PathBuf,
    },

    /// The file has zero bytes
    #[error("{path} is empty")]
    EmptyFile {
        /// The offending path
        path: PathBuf,
    },

    /// The file exceeds the size limit
    #[error("{path} is too large ({size} bytes > {max} bytes)")]
    TooLarge {
        /// The offending path
        path: PathBuf,
        /// Actual size
        size: u64,
        /// Configured maximum
        max: u64,
    },

    /// Reading failed part way through
    #[error("error reading {name}: {source}")]
    Read {
        /// Source name (path or label)
        name: String,
        /// The underlying IO error
        #[source]
        source: std::io::Error,
    },

    /// The recording header line is missing or malformed
    #[error("invalid recording header in {name}: {reason}")]
    InvalidHeader {
        /// Source name (path or label)
        name: String,
        /// What was wrong with it
        reason: String,
    },

    /// Too many lines were scanned
    #[error("{name} has too many lines (> {max})")]
    TooManyLines {
        /// Source name (path or label)
        name: String,
        /// Configured maximum
        max: usize,
    },

    /// A single line exceeded the per-line byte limit
    #[error("{name} line {line} is longer than {max} bytes")]
    LineTooLong {
        /// Source name (path or label)
        name: String,
        /// 1-based line number
        line: usize,
        /// Configured maximum
        max: usize,
    },

    /// Too many frames were produced
    #[error("too many frames in {name} (> {max})")]
    TooManyFrames {
        /// Source name (path or label)
        name: String,
        /// Configured maximum
        max: usize,
    },

    /// No frames could be produced
    #[error("no frames found in {name}")]
    NoFrames {
        /// Source name (path or label)
        name: String,
    },
}

impl FrameError {
    /// Classify this error
    pub fn kind(&self) -> FrameErrorKind {
        match self {
            Self::Access { .. }
            | Self::IsDirectory { .. }
            | Self::EmptyFile { .. }
            | Self::TooLarge { .. }
            | Self::Read { .. } => FrameErrorKind::FileAccess,
            Self::InvalidHeader { .. } => FrameErrorKind::Format,
            Self::TooManyLines { .. } | Self::LineTooLong { .. } | Self::TooManyFrames { .. } => {
                FrameErrorKind::LimitExceeded
            }
            Self::NoFrames { .. } => FrameErrorKind::EmptyResult,
        }
    }
}
