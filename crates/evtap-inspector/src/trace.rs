#![forbid(unsafe_code)]

//! Event trace recording and replay.
//!
//! Records observed input events with millisecond timestamps to a JSONL
//! file, optionally gzip-compressed. [`TraceReader`] reads a trace back for
//! replay or offline analysis.
//!
//! # Format
//!
//! Each line is one JSON object tagged with `record`. The first line is
//! always a `trace_header`, the last a `trace_summary`; everything between
//! is an `event` record carrying the kind name, per-kind ordinal, modifier
//! bits, and the typed payload.

use std::io::{self, BufRead, BufReader, BufWriter, Read, Write};
use std::path::Path;

use evtap_core::{EventDetail, EventKind, InputEvent, Modifiers, MouseButton};
use serde::{Deserialize, Serialize};

/// Current schema version for trace files.
pub const SCHEMA_VERSION: &str = "event-tap-v1";

/// A single record in a trace file.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "record")]
pub enum TraceRecord {
    /// Header record (first line).
    #[serde(rename = "trace_header")]
    Header {
        schema_version: String,
        session_name: String,
    },

    /// One observed event.
    #[serde(rename = "event")]
    Event {
        ts_ms: u64,
        kind: String,
        ordinal: u64,
        modifiers: u8,
        detail: SerDetail,
    },

    /// Summary record (last line).
    #[serde(rename = "trace_summary")]
    Summary {
        total_events: u64,
        total_duration_ms: u64,
    },
}

/// Serializable event payload.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "type")]
pub enum SerDetail {
    Key {
        code: String,
        key: String,
        key_code: u16,
    },
    Composition {
        data: String,
        is_composing: bool,
    },
    Edit {
        data: Option<String>,
        input_type: String,
        is_composing: bool,
    },
    Clipboard {
        data: Option<String>,
    },
    Mouse {
        client_x: i32,
        client_y: i32,
        button: SerMouseButton,
    },
    Touch {
        client_x: i32,
        client_y: i32,
        touches: u8,
    },
    Selection,
}

/// Serializable mouse button.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum SerMouseButton {
    Left,
    Right,
    Middle,
}

impl SerMouseButton {
    fn from_button(b: MouseButton) -> Self {
        match b {
            MouseButton::Left => Self::Left,
            MouseButton::Right => Self::Right,
            MouseButton::Middle => Self::Middle,
        }
    }

    fn into_button(self) -> MouseButton {
        match self {
            Self::Left => MouseButton::Left,
            Self::Right => MouseButton::Right,
            Self::Middle => MouseButton::Middle,
        }
    }
}

impl SerDetail {
    fn from_detail(detail: &EventDetail) -> Self {
        match detail {
            EventDetail::Key {
                code,
                key,
                key_code,
            } => Self::Key {
                code: code.clone(),
                key: key.clone(),
                key_code: *key_code,
            },
            EventDetail::Composition { data, is_composing } => Self::Composition {
                data: data.clone(),
                is_composing: *is_composing,
            },
            EventDetail::Edit {
                data,
                input_type,
                is_composing,
            } => Self::Edit {
                data: data.clone(),
                input_type: input_type.clone(),
                is_composing: *is_composing,
            },
            EventDetail::Clipboard { data } => Self::Clipboard { data: data.clone() },
            EventDetail::Mouse {
                client_x,
                client_y,
                button,
            } => Self::Mouse {
                client_x: *client_x,
                client_y: *client_y,
                button: SerMouseButton::from_button(*button),
            },
            EventDetail::Touch {
                client_x,
                client_y,
                touches,
            } => Self::Touch {
                client_x: *client_x,
                client_y: *client_y,
                touches: *touches,
            },
            EventDetail::Selection => Self::Selection,
        }
    }

    fn into_detail(self) -> EventDetail {
        match self {
            Self::Key {
                code,
                key,
                key_code,
            } => EventDetail::Key {
                code,
                key,
                key_code,
            },
            Self::Composition { data, is_composing } => EventDetail::Composition {
                data,
                is_composing,
            },
            Self::Edit {
                data,
                input_type,
                is_composing,
            } => EventDetail::Edit {
                data,
                input_type,
                is_composing,
            },
            Self::Clipboard { data } => EventDetail::Clipboard { data },
            Self::Mouse {
                client_x,
                client_y,
                button,
            } => EventDetail::Mouse {
                client_x,
                client_y,
                button: button.into_button(),
            },
            Self::Touch {
                client_x,
                client_y,
                touches,
            } => EventDetail::Touch {
                client_x,
                client_y,
                touches,
            },
            Self::Selection => EventDetail::Selection,
        }
    }
}

impl TraceRecord {
    /// Build an event record from an [`InputEvent`].
    #[must_use]
    pub fn from_event(event: &InputEvent, ts_ms: u64, ordinal: u64) -> Self {
        Self::Event {
            ts_ms,
            kind: event.kind.as_str().to_string(),
            ordinal,
            modifiers: event.modifiers.bits(),
            detail: SerDetail::from_detail(&event.detail),
        }
    }

    /// Convert this record back into an [`InputEvent`], if it is one.
    ///
    /// Returns `None` for header/summary records and for event records
    /// whose kind name is not recognized.
    #[must_use]
    pub fn to_event(&self) -> Option<InputEvent> {
        match self {
            Self::Event {
                kind,
                modifiers,
                detail,
                ..
            } => {
                let kind: EventKind = kind.parse().ok()?;
                Some(InputEvent {
                    kind,
                    modifiers: Modifiers::from_bits_truncate(*modifiers),
                    detail: detail.clone().into_detail(),
                })
            }
            Self::Header { .. } | Self::Summary { .. } => None,
        }
    }

    /// The timestamp in milliseconds, if this record has one.
    #[must_use]
    pub fn ts_ms(&self) -> Option<u64> {
        match self {
            Self::Event { ts_ms, .. } => Some(*ts_ms),
            Self::Header { .. } | Self::Summary { .. } => None,
        }
    }
}

// ---------------------------------------------------------------------------
// TraceWriter
// ---------------------------------------------------------------------------

/// Writes trace records to JSONL (optionally gzip-compressed).
pub struct TraceWriter<W: Write> {
    writer: BufWriter<W>,
    event_count: u64,
    first_ts_ms: Option<u64>,
    last_ts_ms: u64,
}

impl TraceWriter<std::fs::File> {
    /// Create a writer for an uncompressed `.jsonl` file.
    pub fn plain(path: impl AsRef<Path>, session_name: &str) -> io::Result<Self> {
        let file = std::fs::File::create(path)?;
        Self::from_writer(file, session_name)
    }
}

impl TraceWriter<flate2::write::GzEncoder<std::fs::File>> {
    /// Create a writer for a gzip-compressed `.jsonl.gz` file.
    pub fn gzip(path: impl AsRef<Path>, session_name: &str) -> io::Result<Self> {
        let file = std::fs::File::create(path)?;
        let encoder = flate2::write::GzEncoder::new(file, flate2::Compression::fast());
        Self::from_writer(encoder, session_name)
    }
}

impl<W: Write> TraceWriter<W> {
    /// Create a writer wrapping any `Write` impl; writes the header record.
    pub fn from_writer(writer: W, session_name: &str) -> io::Result<Self> {
        let mut w = BufWriter::new(writer);
        let header = TraceRecord::Header {
            schema_version: SCHEMA_VERSION.to_string(),
            session_name: session_name.to_string(),
        };
        serde_json::to_writer(&mut w, &header).map_err(io::Error::other)?;
        w.write_all(b"\n")?;

        Ok(Self {
            writer: w,
            event_count: 0,
            first_ts_ms: None,
            last_ts_ms: 0,
        })
    }

    /// Record one observed event.
    pub fn record(&mut self, event: &InputEvent, ts_ms: u64, ordinal: u64) -> io::Result<()> {
        self.write_record(&TraceRecord::from_event(event, ts_ms, ordinal))
    }

    /// Write any trace record.
    pub fn write_record(&mut self, record: &TraceRecord) -> io::Result<()> {
        serde_json::to_writer(&mut self.writer, record).map_err(io::Error::other)?;
        self.writer.write_all(b"\n")?;

        if let Some(ts) = record.ts_ms() {
            if self.first_ts_ms.is_none() {
                self.first_ts_ms = Some(ts);
            }
            self.last_ts_ms = ts;
        }
        if matches!(record, TraceRecord::Event { .. }) {
            self.event_count += 1;
        }
        Ok(())
    }

    /// Number of event records written so far.
    #[must_use]
    pub fn event_count(&self) -> u64 {
        self.event_count
    }

    /// Finish the trace: write the summary and flush.
    ///
    /// Returns the underlying writer.
    pub fn finish(mut self) -> io::Result<W> {
        let total_duration_ms = self
            .first_ts_ms
            .map(|first| self.last_ts_ms.saturating_sub(first))
            .unwrap_or(0);
        let summary = TraceRecord::Summary {
            total_events: self.event_count,
            total_duration_ms,
        };
        serde_json::to_writer(&mut self.writer, &summary).map_err(io::Error::other)?;
        self.writer.write_all(b"\n")?;
        self.writer.flush()?;
        self.writer
            .into_inner()
            .map_err(|e| io::Error::other(e.to_string()))
    }
}

// ---------------------------------------------------------------------------
// TraceReader
// ---------------------------------------------------------------------------

/// Reads trace records back from JSONL (gzip detected by `.gz` extension).
pub struct TraceReader {
    reader: BufReader<Box<dyn Read>>,
}

impl TraceReader {
    /// Open a trace file; `.gz` paths are decompressed transparently.
    pub fn open(path: impl AsRef<Path>) -> io::Result<Self> {
        let path = path.as_ref();
        let file = std::fs::File::open(path)?;
        let reader: Box<dyn Read> = if path.extension().is_some_and(|ext| ext == "gz") {
            Box::new(flate2::read::GzDecoder::new(file))
        } else {
            Box::new(file)
        };
        Ok(Self::from_reader(reader))
    }

    /// Wrap any `Read` impl producing uncompressed JSONL.
    #[must_use]
    pub fn from_reader(reader: impl Read + 'static) -> Self {
        Self {
            reader: BufReader::new(Box::new(reader)),
        }
    }

    /// Parse all records, in file order.
    ///
    /// Blank lines are skipped; a malformed line is an error.
    pub fn records(self) -> io::Result<Vec<TraceRecord>> {
        let mut records = Vec::new();
        for line in self.reader.lines() {
            let line = line?;
            if line.trim().is_empty() {
                continue;
            }
            records.push(serde_json::from_str(&line).map_err(io::Error::other)?);
        }
        Ok(records)
    }

    /// Parse only the event records, converted back to [`InputEvent`]s with
    /// their timestamps.
    pub fn events(self) -> io::Result<Vec<(InputEvent, u64)>> {
        Ok(self
            .records()?
            .into_iter()
            .filter_map(|record| {
                let ts = record.ts_ms()?;
                Some((record.to_event()?, ts))
            })
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_events() -> Vec<InputEvent> {
        vec![
            InputEvent::key(EventKind::KeyDown, "KeyA", "a", 65)
                .with_modifiers(Modifiers::SHIFT),
            InputEvent::edit(EventKind::Input, Some("a".into()), "insertText", false),
            InputEvent::mouse(EventKind::Click, 3, 9, MouseButton::Middle),
            InputEvent::selection(EventKind::SelectionChange),
        ]
    }

    fn write_sample(events: &[InputEvent]) -> Vec<u8> {
        let mut writer = TraceWriter::from_writer(Vec::new(), "test_session").unwrap();
        for (i, event) in events.iter().enumerate() {
            writer.record(event, 1_000 + i as u64 * 10, i as u64).unwrap();
        }
        writer.finish().unwrap()
    }

    #[test]
    fn header_is_first_and_summary_is_last() {
        let bytes = write_sample(&sample_events());
        let records = TraceReader::from_reader(io::Cursor::new(bytes))
            .records()
            .unwrap();
        assert_eq!(records.len(), 6);
        assert_eq!(
            records[0],
            TraceRecord::Header {
                schema_version: SCHEMA_VERSION.to_string(),
                session_name: "test_session".to_string(),
            }
        );
        assert_eq!(
            records[5],
            TraceRecord::Summary {
                total_events: 4,
                total_duration_ms: 30,
            }
        );
    }

    #[test]
    fn events_round_trip_through_jsonl() {
        let events = sample_events();
        let bytes = write_sample(&events);
        let read_back = TraceReader::from_reader(io::Cursor::new(bytes))
            .events()
            .unwrap();
        assert_eq!(read_back.len(), events.len());
        for (i, (event, ts)) in read_back.iter().enumerate() {
            assert_eq!(event, &events[i]);
            assert_eq!(*ts, 1_000 + i as u64 * 10);
        }
    }

    #[test]
    fn each_line_is_standalone_json() {
        let bytes = write_sample(&sample_events());
        let text = String::from_utf8(bytes).unwrap();
        for line in text.lines() {
            let value: serde_json::Value = serde_json::from_str(line).unwrap();
            assert!(value.get("record").is_some());
        }
    }

    #[test]
    fn empty_trace_has_zero_duration() {
        let mut bytes = Vec::new();
        {
            let writer = TraceWriter::from_writer(&mut bytes, "empty").unwrap();
            writer.finish().unwrap();
        }
        let records = TraceReader::from_reader(io::Cursor::new(bytes))
            .records()
            .unwrap();
        assert_eq!(
            records[1],
            TraceRecord::Summary {
                total_events: 0,
                total_duration_ms: 0,
            }
        );
    }

    #[test]
    fn unknown_kind_name_yields_no_event() {
        let record = TraceRecord::Event {
            ts_ms: 1,
            kind: "wheel".to_string(),
            ordinal: 0,
            modifiers: 0,
            detail: SerDetail::Selection,
        };
        assert!(record.to_event().is_none());
    }

    #[test]
    fn malformed_line_is_an_error() {
        let result = TraceReader::from_reader(io::Cursor::new(b"{not json}\n".to_vec())).records();
        assert!(result.is_err());
    }

    #[test]
    fn gzip_round_trip_in_memory() {
        let events = sample_events();
        let mut writer = TraceWriter::from_writer(
            flate2::write::GzEncoder::new(Vec::new(), flate2::Compression::fast()),
            "gz",
        )
        .unwrap();
        for (i, event) in events.iter().enumerate() {
            writer.record(event, i as u64, i as u64).unwrap();
        }
        let compressed = writer.finish().unwrap().finish().unwrap();

        let read_back =
            TraceReader::from_reader(flate2::read::GzDecoder::new(io::Cursor::new(compressed)))
                .events()
                .unwrap();
        assert_eq!(read_back.len(), events.len());
        assert_eq!(read_back[0].0, events[0]);
    }

    #[test]
    fn modifiers_survive_the_round_trip() {
        let event = InputEvent::key(EventKind::KeyDown, "KeyS", "s", 83)
            .with_modifiers(Modifiers::CTRL | Modifiers::META);
        let record = TraceRecord::from_event(&event, 5, 0);
        let back = record.to_event().unwrap();
        assert_eq!(back.modifiers, Modifiers::CTRL | Modifiers::META);
    }
}
