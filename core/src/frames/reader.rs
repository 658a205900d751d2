//! Bounded file access shared by both frame parsers

use std::fs::File;
use std::io::{BufRead, Read};
use std::path::Path;

use super::{FrameError, FrameLimits};

/// Check a path against the file-level limits and open it
pub(crate) fn open_checked(path: &Path, limits: &FrameLimits) -> Result<File, FrameError> {
    let metadata = std::fs::metadata(path).map_err(|source| FrameError::Access {
        path: path.to_path_buf(),
        source,
    })?;

    if metadata.is_dir() {
        return Err(FrameError::IsDirectory {
            path: path.to_path_buf(),
        });
    }

    if metadata.len() == 0 {
        return Err(FrameError::EmptyFile {
            path: path.to_path_buf(),
        });
    }

    if metadata.len() > limits.max_file_bytes {
        return Err(FrameError::TooLarge {
            path: path.to_path_buf(),
            size: metadata.len(),
            max: limits.max_file_bytes,
        });
    }

    File::open(path).map_err(|source| FrameError::Access {
        path: path.to_path_buf(),
        source,
    })
}

/// Line reader that enforces the line-count and line-length limits
///
/// Lines are returned without their terminator (`\n` or `\r\n`). Invalid
/// UTF-8 is decoded lossily rather than rejected.
pub(crate) struct LineScanner<R> {
    reader: R,
    name: String,
    max_lines: usize,
    max_line_bytes: usize,
    lines: usize,
    buf: Vec<u8>,
}

impl<R: BufRead> LineScanner<R> {
    pub(crate) fn new(reader: R, name: &str, limits: &FrameLimits) -> Self {
        Self {
            reader,
            name: name.to_string(),
            max_lines: limits.max_lines,
            max_line_bytes: limits.max_line_bytes,
            lines: 0,
            buf: Vec::new(),
        }
    }

    /// Read the next line, or `None` at end of input
    pub(crate) fn next_line(&mut self) -> Result<Option<String>, FrameError> {
        self.buf.clear();

        // One byte of headroom tells an exactly-max line from an overlong one
        let limit = self.max_line_bytes as u64 + 2;
        let read = (&mut self.reader)
            .take(limit)
            .read_until(b'\n', &mut self.buf)
            .map_err(|source| FrameError::Read {
                name: self.name.clone(),
                source,
            })?;

        if read == 0 {
            return Ok(None);
        }

        self.lines += 1;
        if self.lines > self.max_lines {
            return Err(FrameError::TooManyLines {
                name: self.name.clone(),
                max: self.max_lines,
            });
        }

        if self.buf.last() == Some(&b'\n') {
            self.buf.pop();
            if self.buf.last() == Some(&b'\r') {
                self.buf.pop();
            }
        }

        if self.buf.len() > self.max_line_bytes {
            return Err(FrameError::LineTooLong {
                name: self.name.clone(),
                line: self.lines,
                max: self.max_line_bytes,
            });
        }

        Ok(Some(String::from_utf8_lossy(&self.buf).into_owned()))
    }

    /// Number of lines read so far
    pub(crate) fn lines_scanned(&self) -> usize {
        self.lines
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn scanner(input: &str, limits: FrameLimits) -> LineScanner<Cursor<Vec<u8>>> {
        LineScanner::new(Cursor::new(input.as_bytes().to_vec()), "test", &limits)
    }

    #[test]
    fn test_strips_line_terminators() {
        let mut s = scanner("a\r\nb\nc", FrameLimits::default());
        assert_eq!(s.next_line().unwrap().as_deref(), Some("a"));
        assert_eq!(s.next_line().unwrap().as_deref(), Some("b"));
        assert_eq!(s.next_line().unwrap().as_deref(), Some("c"));
        assert_eq!(s.next_line().unwrap(), None);
        assert_eq!(s.lines_scanned(), 3);
    }

    #[test]
    fn test_line_count_limit() {
        let limits = FrameLimits {
            max_lines: 2,
            ..FrameLimits::default()
        };
        let mut s = scanner("1\n2\n3\n", limits);
        assert!(s.next_line().is_ok());
        assert!(s.next_line().is_ok());
        assert!(matches!(
            s.next_line(),
            Err(FrameError::TooManyLines { max: 2, .. })
        ));
    }

    #[test]
    fn test_line_length_limit() {
        let limits = FrameLimits {
            max_line_bytes: 4,
            ..FrameLimits::default()
        };
        let mut s = scanner("abcd\nabcde\n", limits);
        assert_eq!(s.next_line().unwrap().as_deref(), Some("abcd"));
        assert!(matches!(
            s.next_line(),
            Err(FrameError::LineTooLong { line: 2, max: 4, .. })
        ));
    }

    #[test]
    fn test_invalid_utf8_is_lossy() {
        let mut s = LineScanner::new(
            Cursor::new(vec![b'o', 0xff, b'k', b'\n']),
            "test",
            &FrameLimits::default(),
        );
        assert_eq!(s.next_line().unwrap().as_deref(), Some("o\u{fffd}k"));
    }
}
