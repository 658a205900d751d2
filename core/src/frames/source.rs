//! Frame Source Resolution
//!
//! Frames can come from a file named on the command line or from the
//! configured frame file. Sources are tried in order and the first one that
//! parses wins. When every source fails (or there are none) the resolution
//! carries no sequence and playback falls back to the procedural animation.
//!
//! Each failed source leaves a human-readable diagnostic behind so the
//! surface can explain why the fallback is showing.

use std::fmt;
use std::path::{Path, PathBuf};

use super::{load_delimited, load_recording, FrameLimits, FrameSequence, RecordingOptions};

/// On-disk format of a frame file
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FrameFormat {
    /// `---FRAME---` separated ASCII art
    Delimited,
    /// asciicast-style terminal recording
    Recording,
}

impl FrameFormat {
    /// Detect the format from a path's extension
    ///
    /// `.cast` (any case) is a recording; everything else is delimited.
    pub fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|e| e.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("cast") => Self::Recording,
            _ => Self::Delimited,
        }
    }
}

/// Where a frame source was specified
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FrameOrigin {
    /// Positional command line argument
    Cli,
    /// `animation.frame_file` in configuration
    Config,
}

impl fmt::Display for FrameOrigin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Cli => write!(f, "command line"),
            Self::Config => write!(f, "config"),
        }
    }
}

/// One candidate location for frames
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FrameSource {
    /// File to load
    pub path: PathBuf,
    /// Parser to use
    pub format: FrameFormat,
    /// Where the path came from
    pub origin: FrameOrigin,
}

impl FrameSource {
    /// Build a source, detecting the format from the extension
    pub fn new(path: impl Into<PathBuf>, origin: FrameOrigin) -> Self {
        let path = path.into();
        let format = FrameFormat::from_path(&path);
        Self {
            path,
            format,
            origin,
        }
    }

    /// Load and parse this source
    pub fn load(
        &self,
        limits: &FrameLimits,
        options: &RecordingOptions,
    ) -> Result<FrameSequence, super::FrameError> {
        match self.format {
            FrameFormat::Delimited => load_delimited(&self.path, limits),
            FrameFormat::Recording => load_recording(&self.path, limits, options),
        }
    }
}

/// Outcome of resolving a [`FrameSourceChain`]
#[derive(Clone, Debug, Default)]
pub struct FrameResolution {
    /// The winning sequence, or `None` for the procedural fallback
    pub sequence: Option<FrameSequence>,
    /// Which source produced the sequence
    pub origin: Option<FrameOrigin>,
    /// One entry per failed source, in the order they were tried
    pub diagnostics: Vec<String>,
}

impl FrameResolution {
    /// True when playback should use the procedural animation
    pub fn is_fallback(&self) -> bool {
        self.sequence.is_none()
    }
}

/// Ordered list of frame sources
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct FrameSourceChain {
    sources: Vec<FrameSource>,
}

impl FrameSourceChain {
    /// Create an empty chain
    pub fn new() -> Self {
        Self::default()
    }

    /// Build the standard chain: command line first, then configuration
    ///
    /// Absent or blank paths contribute no source.
    pub fn from_paths(cli: Option<&Path>, config: Option<&Path>) -> Self {
        let mut chain = Self::new();
        if let Some(path) = cli.filter(|p| !p.as_os_str().is_empty()) {
            chain.push(FrameSource::new(path, FrameOrigin::Cli));
        }
        if let Some(path) = config.filter(|p| !p.as_os_str().is_empty()) {
            chain.push(FrameSource::new(path, FrameOrigin::Config));
        }
        chain
    }

    /// Append a source to the end of the chain
    pub fn push(&mut self, source: FrameSource) {
        self.sources.push(source);
    }

    /// The sources, in resolution order
    pub fn sources(&self) -> &[FrameSource] {
        &self.sources
    }

    /// True when there is nothing to load
    pub fn is_empty(&self) -> bool {
        self.sources.is_empty()
    }

    /// Try each source in order until one parses
    ///
    /// Blocking: this reads files. Run it off the UI loop.
    pub fn resolve(&self, limits: &FrameLimits, options: &RecordingOptions) -> FrameResolution {
        let mut resolution = FrameResolution::default();

        for source in &self.sources {
            match source.load(limits, options) {
                Ok(sequence) => {
                    tracing::info!(
                        path = %source.path.display(),
                        origin = %source.origin,
                        frames = sequence.len(),
                        "Frame source resolved"
                    );
                    resolution.sequence = Some(sequence);
                    resolution.origin = Some(source.origin);
                    return resolution;
                }
                Err(e) => {
                    tracing::warn!(
                        path = %source.path.display(),
                        origin = %source.origin,
                        kind = ?e.kind(),
                        error = %e,
                        "Frame source failed"
                    );
                    resolution
                        .diagnostics
                        .push(format!("{} frame file: {}", source.origin, e));
                }
            }
        }

        if !self.sources.is_empty() {
            tracing::info!("All frame sources failed, using procedural animation");
        }
        resolution
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::io::Write;

    fn write_file(dir: &tempfile::TempDir, name: &str, content: &str) -> PathBuf {
        let path = dir.path().join(name);
        let mut file = std::fs::File::create(&path).unwrap();
        file.write_all(content.as_bytes()).unwrap();
        path
    }

    #[test]
    fn test_format_detection() {
        assert_eq!(FrameFormat::from_path(Path::new("a.cast")), FrameFormat::Recording);
        assert_eq!(FrameFormat::from_path(Path::new("A.CAST")), FrameFormat::Recording);
        assert_eq!(FrameFormat::from_path(Path::new("a.txt")), FrameFormat::Delimited);
        assert_eq!(FrameFormat::from_path(Path::new("frames")), FrameFormat::Delimited);
        assert_eq!(FrameFormat::from_path(Path::new("cast")), FrameFormat::Delimited);
    }

    #[test]
    fn test_blank_paths_contribute_nothing() {
        let chain = FrameSourceChain::from_paths(Some(Path::new("")), None);
        assert!(chain.is_empty());

        let resolution = chain.resolve(&FrameLimits::default(), &RecordingOptions::default());
        assert!(resolution.is_fallback());
        assert!(resolution.diagnostics.is_empty());
    }

    #[test]
    fn test_cli_precedes_config() {
        let dir = tempfile::tempdir().unwrap();
        let cli = write_file(&dir, "cli.txt", "cli frame\n");
        let config = write_file(&dir, "config.txt", "config frame\n");

        let chain = FrameSourceChain::from_paths(Some(&cli), Some(&config));
        let origins: Vec<FrameOrigin> = chain.sources().iter().map(|s| s.origin).collect();
        assert_eq!(origins, vec![FrameOrigin::Cli, FrameOrigin::Config]);

        let resolution = chain.resolve(&FrameLimits::default(), &RecordingOptions::default());
        assert_eq!(resolution.origin, Some(FrameOrigin::Cli));
        assert_eq!(resolution.sequence.unwrap()[0].content(), "cli frame\n");
    }

    #[test]
    fn test_failed_source_falls_through() {
        let dir = tempfile::tempdir().unwrap();
        let empty = write_file(&dir, "empty.txt", "");
        let config = write_file(&dir, "config.txt", "config frame\n");

        let chain = FrameSourceChain::from_paths(Some(&empty), Some(&config));
        let resolution = chain.resolve(&FrameLimits::default(), &RecordingOptions::default());

        assert_eq!(resolution.origin, Some(FrameOrigin::Config));
        assert_eq!(resolution.diagnostics.len(), 1);
        assert!(resolution.diagnostics[0].starts_with("command line frame file"));
    }

    #[test]
    fn test_all_failures_use_fallback() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("missing.cast");
        let bad_cast = write_file(&dir, "bad.cast", "not a header\n");

        let chain = FrameSourceChain::from_paths(Some(&missing), Some(&bad_cast));
        let resolution = chain.resolve(&FrameLimits::default(), &RecordingOptions::default());

        assert!(resolution.is_fallback());
        assert_eq!(resolution.origin, None);
        assert_eq!(resolution.diagnostics.len(), 2);
    }
}
