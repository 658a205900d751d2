//! Delimited Frame Files
//!
//! Plain-text ASCII art, one block per frame:
//!
//! ```text
//!   o
//!  /|\
//! ---FRAME---
//!  \o/
//!   |
//! ---FRAME:YELLOW---
//! ```
//!
//! A sentinel line closes the frame being built. The colored form
//! (`---FRAME:NAME---`) also tags that closed frame with a color. Content
//! after the last sentinel becomes the final frame.

use std::io::{BufRead, BufReader};
use std::path::Path;

use super::reader::{open_checked, LineScanner};
use super::{Frame, FrameColor, FrameError, FrameLimits, FrameSequence};

/// Line that separates two frames
pub const FRAME_SENTINEL: &str = "---FRAME---";

/// Prefix of a sentinel that carries a color name
const COLOR_SENTINEL_PREFIX: &str = "---FRAME:";

/// Load a delimited frame file from disk
pub fn load_delimited(path: &Path, limits: &FrameLimits) -> Result<FrameSequence, FrameError> {
    let file = open_checked(path, limits)?;
    let name = path.display().to_string();
    let sequence = parse_delimited(BufReader::new(file), &name, limits)?;

    tracing::info!(path = %name, frames = sequence.len(), "Loaded delimited frames");
    Ok(sequence)
}

/// Parse delimited frames from any buffered reader
///
/// `name` is only used in error messages.
pub fn parse_delimited<R: BufRead>(
    reader: R,
    name: &str,
    limits: &FrameLimits,
) -> Result<FrameSequence, FrameError> {
    let mut scanner = LineScanner::new(reader, name, limits);
    let mut frames = Vec::new();
    let mut pending = String::new();

    while let Some(line) = scanner.next_line()? {
        let color = if line == FRAME_SENTINEL {
            Some(FrameColor::Default)
        } else if line.starts_with(COLOR_SENTINEL_PREFIX) {
            Some(sentinel_color(&line))
        } else {
            None
        };

        match color {
            Some(color) => {
                if !pending.is_empty() {
                    push_frame(&mut frames, std::mem::take(&mut pending), color, name, limits)?;
                }
            }
            None => {
                pending.push_str(&line);
                pending.push('\n');
            }
        }
    }

    if !pending.is_empty() {
        push_frame(&mut frames, pending, FrameColor::Default, name, limits)?;
    }

    tracing::debug!(name, lines = scanner.lines_scanned(), "Scanned delimited file");
    FrameSequence::new(frames, name)
}

fn push_frame(
    frames: &mut Vec<Frame>,
    content: String,
    color: FrameColor,
    name: &str,
    limits: &FrameLimits,
) -> Result<(), FrameError> {
    if frames.len() >= limits.max_frames {
        return Err(FrameError::TooManyFrames {
            name: name.to_string(),
            max: limits.max_frames,
        });
    }
    frames.push(Frame::new(content, color));
    Ok(())
}

/// Color named by a `---FRAME:NAME---` sentinel
fn sentinel_color(line: &str) -> FrameColor {
    let rest = &line[COLOR_SENTINEL_PREFIX.len()..];
    let name = rest.strip_suffix("---").unwrap_or(rest);
    FrameColor::from_name(name)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::frames::FrameErrorKind;
    use pretty_assertions::assert_eq;
    use std::io::Cursor;

    fn parse(input: &str) -> Result<FrameSequence, FrameError> {
        parse_delimited(Cursor::new(input), "test", &FrameLimits::default())
    }

    #[test]
    fn test_blocks_become_frames() {
        let seq = parse("a\nb\n---FRAME---\nc\n---FRAME---\nd\n").unwrap();
        let contents: Vec<&str> = seq.iter().map(Frame::content).collect();
        assert_eq!(contents, vec!["a\nb\n", "c\n", "d\n"]);
    }

    #[test]
    fn test_trailing_sentinel_adds_nothing() {
        let seq = parse("a\n---FRAME---\nb\n---FRAME---\n").unwrap();
        assert_eq!(seq.len(), 2);
    }

    #[test]
    fn test_color_sentinel_tags_closed_frame() {
        let seq = parse("red\n---FRAME:RED---\nplain\n---FRAME---\ncyan\n---FRAME:cyan---\n").unwrap();
        let colors: Vec<FrameColor> = seq.iter().map(Frame::color).collect();
        assert_eq!(
            colors,
            vec![FrameColor::Red, FrameColor::Default, FrameColor::Cyan]
        );
    }

    #[test]
    fn test_unknown_color_falls_back() {
        let seq = parse("x\n---FRAME:PUCE---\n").unwrap();
        assert_eq!(seq[0].color(), FrameColor::Default);
    }

    #[test]
    fn test_color_without_suffix() {
        assert_eq!(sentinel_color("---FRAME:green"), FrameColor::Green);
    }

    #[test]
    fn test_blank_lines_inside_frame_are_kept() {
        let seq = parse("top\n\nbottom\n").unwrap();
        assert_eq!(seq[0].content(), "top\n\nbottom\n");
    }

    #[test]
    fn test_only_sentinels_is_empty_result() {
        let err = parse("---FRAME---\n---FRAME:RED---\n---FRAME---\n").unwrap_err();
        assert_eq!(err.kind(), FrameErrorKind::EmptyResult);
    }

    #[test]
    fn test_frame_limit() {
        let limits = FrameLimits {
            max_frames: 2,
            ..FrameLimits::default()
        };
        let err = parse_delimited(
            Cursor::new("a\n---FRAME---\nb\n---FRAME---\nc\n"),
            "test",
            &limits,
        )
        .unwrap_err();
        assert_eq!(err.kind(), FrameErrorKind::LimitExceeded);
    }

    #[test]
    fn test_line_limit_applies_before_frame_validity() {
        let limits = FrameLimits {
            max_lines: 3,
            ..FrameLimits::default()
        };
        let err = parse_delimited(Cursor::new("a\nb\nc\nd\n"), "test", &limits).unwrap_err();
        assert!(matches!(err, FrameError::TooManyLines { .. }));
    }

    // ------------------------------------------------------------------------
    // Loading from disk
    // ------------------------------------------------------------------------

    fn write_art(dir: &tempfile::TempDir, content: &str) -> std::path::PathBuf {
        let path = dir.path().join("art.txt");
        std::fs::write(&path, content).unwrap();
        path
    }

    #[test]
    fn test_load_directory_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let err = load_delimited(dir.path(), &FrameLimits::default()).unwrap_err();
        assert!(matches!(err, FrameError::IsDirectory { .. }));
        assert_eq!(err.kind(), FrameErrorKind::FileAccess);
    }

    #[test]
    fn test_load_empty_file_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_art(&dir, "");
        let err = load_delimited(&path, &FrameLimits::default()).unwrap_err();
        assert!(matches!(err, FrameError::EmptyFile { .. }));
        assert_eq!(err.kind(), FrameErrorKind::FileAccess);
    }

    #[test]
    fn test_load_oversized_file_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_art(&dir, "0123456789\n---FRAME---\nabcdefghij\n");
        let limits = FrameLimits {
            max_file_bytes: 16,
            ..FrameLimits::default()
        };
        let err = load_delimited(&path, &limits).unwrap_err();
        assert!(matches!(err, FrameError::TooLarge { max: 16, .. }));
        assert_eq!(err.kind(), FrameErrorKind::FileAccess);
    }

    #[test]
    fn test_load_missing_file_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let err = load_delimited(&dir.path().join("absent.txt"), &FrameLimits::default())
            .unwrap_err();
        assert!(matches!(err, FrameError::Access { .. }));
        assert_eq!(err.kind(), FrameErrorKind::FileAccess);
    }

    #[test]
    fn test_loading_twice_gives_equal_sequences() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_art(&dir, " o\n/|\\\n---FRAME:CYAN---\n\\o/\n |\n---FRAME---\n");
        let first = load_delimited(&path, &FrameLimits::default()).unwrap();
        let second = load_delimited(&path, &FrameLimits::default()).unwrap();
        assert_eq!(first, second);
        assert_eq!(first.len(), 2);
    }
}
