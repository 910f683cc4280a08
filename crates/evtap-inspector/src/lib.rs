#![forbid(unsafe_code)]

//! Inspector: the diagnostic controller around the event model.
//!
//! # Role in evtap
//! `evtap-inspector` owns all mutable diagnostic state: per-kind counters,
//! enable/disable toggles, the transcript of formatted log lines, the
//! deferred-echo queue, and JSONL trace recording. All diagnostic state is
//! explicit controller state; nothing lives in globals.
//!
//! # Primary responsibilities
//! - **Inspector**: observe events, compose log lines, queue deferred echoes.
//! - **EventCounters / ToggleBoard**: counting and filtering.
//! - **Transcript**: the append-only, sanitized log of produced lines.
//! - **TraceWriter / TraceReader**: persisted JSONL event traces.
//!
//! # How it fits in the system
//! Callers (the demo binary, tests, embedding apps) feed
//! `evtap_core::InputEvent` values and a `TextFieldState` into
//! [`Inspector::observe`], then drain [`Inspector::flush_deferred`] and read
//! the transcript. Everything is single threaded; there are no timers and no
//! shared state.

pub mod clock;
pub mod counter;
pub mod inspector;
pub mod toggle;
pub mod trace;
pub mod transcript;

pub use clock::{Clock, ManualClock, SystemClock};
pub use counter::EventCounters;
pub use inspector::Inspector;
pub use toggle::{CategoryToggle, EventToggle, ToggleBoard, Toggleable};
pub use trace::{SCHEMA_VERSION, TraceReader, TraceRecord, TraceWriter};
pub use transcript::{Transcript, TranscriptWriter};
