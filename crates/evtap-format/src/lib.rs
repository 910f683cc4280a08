#![forbid(unsafe_code)]

//! Lenient `%s` template formatting.
//!
//! Provides [`lenient_format`] and the variadic [`lenient_format!`] macro:
//! a small printf-style substitution that never fails, no matter how badly
//! the argument count and the template disagree.
//!
//! # Role in evtap
//! Every log line the inspector produces is built through this crate. It is
//! deliberately decoupled from the event model: it knows nothing about
//! events, fields, or transcripts, only about templates and `Display`
//! arguments.
//!
//! # How it fits in the system
//! `evtap-inspector` composes event ids, property listings, and state
//! summaries with these functions. The crate has no dependencies and no
//! state, so it is reusable anywhere a forgiving formatter is wanted.

pub mod template;

pub use template::lenient_format;
