#![forbid(unsafe_code)]

//! evtap error model.
//!
//! # Design Principles
//!
//! 1. **Result everywhere** — no panics on the observation path; the
//!    formatter itself is total and cannot fail at all.
//! 2. **Domain-specific errors** — parsing keeps its own typed error so
//!    callers can match on what matters and let the rest propagate.
//! 3. **Graceful degradation** — argument-count mismatches and missing
//!    payloads are specified outcomes of the formatter, not errors; only
//!    parsing and trace I/O can actually fail.

use std::fmt;

use evtap_core::ParseEventKindError;

/// Top-level error type for evtap apps.
#[derive(Debug)]
pub enum Error {
    /// An event name could not be parsed.
    Parse(ParseEventKindError),
    /// Trace or transcript I/O failure.
    Io(std::io::Error),
}

/// Standard result type for evtap APIs.
pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    /// Error type label for metrics and tracing.
    #[must_use]
    pub fn error_type(&self) -> &'static str {
        match self {
            Self::Parse(_) => "parse",
            Self::Io(_) => "io",
        }
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Parse(err) => write!(f, "{err}"),
            Self::Io(err) => write!(f, "I/O: {err}"),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Parse(err) => Some(err),
            Self::Io(err) => Some(err),
        }
    }
}

impl From<ParseEventKindError> for Error {
    fn from(err: ParseEventKindError) -> Self {
        Self::Parse(err)
    }
}

impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err)
    }
}
