#![forbid(unsafe_code)]

//! Core: input event kinds, categories, payloads, and text-field state.
//!
//! # Role in evtap
//! `evtap-core` is the data layer. It owns the canonical event vocabulary
//! (the kinds a text field can fire, grouped into categories), the typed
//! payloads those events carry, and a snapshot model of the observed text
//! field's value, cursor, and selection.
//!
//! # Primary responsibilities
//! - **EventKind / EventCategory**: the fixed event vocabulary and grouping.
//! - **InputEvent**: one observed event with modifiers and a typed payload.
//! - **TextFieldState**: grapheme-aware value + selection snapshot.
//!
//! # How it fits in the system
//! The inspector (`evtap-inspector`) consumes `InputEvent` values and reads
//! `TextFieldState` when composing log lines. This crate is independent of
//! logging and formatting, so the model stays reusable and testable.

pub mod event;
pub mod field;

pub use event::{
    EventCategory, EventDetail, EventKind, InputEvent, Modifiers, MouseButton,
    ParseEventKindError, PropValue,
};
pub use field::TextFieldState;
