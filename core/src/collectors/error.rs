//! Collector errors
//!
//! None of these ever escape the collector runner: every failure becomes an
//! "unavailable" slot value carrying the error's message.

use std::path::PathBuf;
use std::time::Duration;

use thiserror::Error;

/// Why a collector could not produce a snapshot
#[derive(Debug, Error)]
pub enum CollectionError {
    /// The collector did not finish within its time budget
    #[error("timed out after {}ms", .0.as_millis())]
    Timeout(Duration),

    /// An external command could not be started
    #[error("failed to run {program}: {source}")]
    Spawn {
        /// The command that was attempted
        program: String,
        /// The underlying IO error
        #[source]
        source: std::io::Error,
    },

    /// An external command ran but reported failure
    #[error("{program} exited with {status}")]
    CommandFailed {
        /// The command that was run
        program: String,
        /// Exit status as reported by the OS
        status: String,
    },

    /// A system file could not be read
    #[error("cannot read {path}: {source}")]
    Read {
        /// The file that was attempted
        path: PathBuf,
        /// The underlying IO error
        #[source]
        source: std::io::Error,
    },

    /// An HTTP request failed or returned an error status
    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// Output was present but not in the expected shape
    #[error("could not parse {what}: {reason}")]
    Parse {
        /// What was being parsed
        what: &'static str,
        /// What was wrong with it
        reason: String,
    },

    /// The probe has no implementation for this platform
    #[error("{0} is not supported on this platform")]
    Unsupported(&'static str),
}

impl CollectionError {
    /// Build a parse error
    pub fn parse(what: &'static str, reason: impl Into<String>) -> Self {
        Self::Parse {
            what,
            reason: reason.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_messages() {
        assert_eq!(
            CollectionError::Timeout(Duration::from_millis(2500)).to_string(),
            "timed out after 2500ms"
        );
        assert_eq!(
            CollectionError::Unsupported("process listing").to_string(),
            "process listing is not supported on this platform"
        );
        assert_eq!(
            CollectionError::parse("ps output", "no header").to_string(),
            "could not parse ps output: no header"
        );
    }
}
