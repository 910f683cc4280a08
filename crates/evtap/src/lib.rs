#![forbid(unsafe_code)]

//! evtap: input-event inspection toolkit.
//!
//! Observe input events fired at a text field, count and filter them,
//! compose forgiving printf-style log lines, and record JSONL traces.
//!
//! The workspace splits into three layers, re-exported here:
//!
//! - [`evtap_format`] — the lenient `%s` template formatter.
//! - [`evtap_core`] — event kinds/categories, payloads, text-field state.
//! - [`evtap_inspector`] — counters, toggles, transcript, deferred echoes,
//!   and trace recording.
//!
//! # Quick start
//!
//! ```
//! use evtap::{EventCategory, EventKind, InputEvent, Inspector, TextFieldState};
//!
//! let mut inspector = Inspector::new();
//! inspector.set_category_enabled(EventCategory::Keyboard, true);
//!
//! let mut field = TextFieldState::new();
//! field.insert("a");
//!
//! let event = InputEvent::key(EventKind::KeyDown, "KeyA", "a", 65);
//! inspector.observe(&event, Some(&field));
//! inspector.flush_deferred(Some(&field));
//!
//! assert_eq!(inspector.transcript().len(), 2);
//! assert!(inspector.transcript().lines()[0].starts_with("Event   keydown[0]{"));
//! ```

pub mod error;

pub use error::{Error, Result};
pub use evtap_core::{
    EventCategory, EventDetail, EventKind, InputEvent, Modifiers, MouseButton,
    ParseEventKindError, PropValue, TextFieldState,
};
pub use evtap_format::lenient_format;
pub use evtap_inspector::{
    CategoryToggle, Clock, EventCounters, EventToggle, Inspector, ManualClock, SystemClock,
    ToggleBoard, Toggleable, TraceReader, TraceRecord, TraceWriter, Transcript, TranscriptWriter,
};
