#![forbid(unsafe_code)]

//! The transcript: an append-only log of produced lines.
//!
//! Lines are sanitized on the way in (escape sequences and control bytes
//! stripped) so a hostile paste cannot corrupt whatever renders the
//! transcript. [`TranscriptWriter`] adapts a transcript to [`std::io::Write`]
//! with line buffering, so `writeln!` and log frameworks can target it
//! without tearing lines.

use std::io::{self, Write};

/// Ordered, sanitized log lines.
#[derive(Debug, Clone, Default)]
pub struct Transcript {
    lines: Vec<String>,
}

impl Transcript {
    /// Create an empty transcript.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Append one line, sanitizing it first.
    pub fn push_line(&mut self, line: impl AsRef<str>) {
        self.lines.push(sanitize(line.as_ref()));
    }

    /// All lines, oldest first.
    #[must_use]
    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    /// The most recent `n` lines.
    #[must_use]
    pub fn tail(&self, n: usize) -> &[String] {
        let start = self.lines.len().saturating_sub(n);
        &self.lines[start..]
    }

    /// Number of lines.
    #[must_use]
    pub fn len(&self) -> usize {
        self.lines.len()
    }

    /// Whether the transcript is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Drop all lines.
    pub fn clear(&mut self) {
        self.lines.clear();
    }

    /// Line-buffered [`io::Write`] adapter appending to this transcript.
    #[must_use]
    pub fn writer(&mut self) -> TranscriptWriter<'_> {
        TranscriptWriter {
            transcript: self,
            buffer: Vec::with_capacity(256),
        }
    }
}

/// Strip escape sequences and control bytes from a line.
///
/// CSI (`ESC [ … final`) and OSC (`ESC ] … BEL`/`ESC \`) sequences are
/// removed whole; any other control character is dropped. Tabs survive.
#[must_use]
pub fn sanitize(line: &str) -> String {
    let mut out = String::with_capacity(line.len());
    let mut chars = line.chars().peekable();
    while let Some(c) = chars.next() {
        if c == '\u{1b}' {
            match chars.peek() {
                Some('[') => {
                    chars.next();
                    // Skip parameter/intermediate bytes up to the final byte.
                    for c in chars.by_ref() {
                        if ('\u{40}'..='\u{7e}').contains(&c) {
                            break;
                        }
                    }
                }
                Some(']') => {
                    chars.next();
                    let mut prev = '\0';
                    for c in chars.by_ref() {
                        if c == '\u{7}' || (prev == '\u{1b}' && c == '\\') {
                            break;
                        }
                        prev = c;
                    }
                }
                // Two-character sequence (ESC x); drop the follow byte too.
                Some(_) => {
                    chars.next();
                }
                None => {}
            }
        } else if c == '\t' || !c.is_control() {
            out.push(c);
        }
    }
    out
}

/// Line-buffered writer into a [`Transcript`].
pub struct TranscriptWriter<'a> {
    transcript: &'a mut Transcript,
    buffer: Vec<u8>,
}

impl Write for TranscriptWriter<'_> {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        for &byte in buf {
            if byte == b'\n' {
                let line = String::from_utf8_lossy(&self.buffer).into_owned();
                self.transcript.push_line(line);
                self.buffer.clear();
            } else {
                self.buffer.push(byte);
            }
        }
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        if !self.buffer.is_empty() {
            let line = String::from_utf8_lossy(&self.buffer).into_owned();
            self.transcript.push_line(line);
            self.buffer.clear();
        }
        Ok(())
    }
}

impl Drop for TranscriptWriter<'_> {
    fn drop(&mut self) {
        let _ = self.flush();
    }
}
