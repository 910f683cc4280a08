#![forbid(unsafe_code)]

//! The inspector: observe events, compose log lines, queue deferred echoes.
//!
//! For every enabled event the inspector produces a transcript line of the
//! shape
//!
//! ```text
//! Event   keydown[3]{code='KeyA', key='a', keyCode=65}: text="abc" cursor=3, sel=0; (+12)
//! ```
//!
//! where `[3]` is the zero-based per-kind ordinal, `{…}` lists the payload
//! properties, the `text=…` block is present only when a watched field is
//! supplied, and `(+12)` is the millisecond delta since the previous line.
//! Each observation also queues a deferred echo; draining the queue with
//! [`Inspector::flush_deferred`] emits matching `Timeout …` lines with fresh
//! field state and deltas. The queue replaces timer callbacks: everything
//! stays single threaded and the caller decides when "later" is.

use std::collections::VecDeque;

use evtap_core::{EventCategory, EventKind, InputEvent, TextFieldState};
use evtap_format::lenient_format;

use crate::clock::{Clock, SystemClock};
use crate::counter::EventCounters;
use crate::toggle::ToggleBoard;
use crate::transcript::Transcript;

/// Diagnostic controller: counters, toggles, transcript, deferred queue.
#[derive(Debug)]
pub struct Inspector<C: Clock = SystemClock> {
    toggles: ToggleBoard,
    counters: EventCounters,
    transcript: Transcript,
    deferred: VecDeque<String>,
    clock: C,
    last_ts: Option<u64>,
}

impl Inspector<SystemClock> {
    /// Create an inspector on the system clock, with every toggle disabled.
    #[must_use]
    pub fn new() -> Self {
        Self::with_clock(SystemClock)
    }
}

impl Default for Inspector<SystemClock> {
    fn default() -> Self {
        Self::new()
    }
}

impl<C: Clock> Inspector<C> {
    /// Create an inspector on the given clock, with every toggle disabled.
    #[must_use]
    pub fn with_clock(clock: C) -> Self {
        Self {
            toggles: ToggleBoard::new(),
            counters: EventCounters::new(),
            transcript: Transcript::new(),
            deferred: VecDeque::new(),
            clock,
            last_ts: None,
        }
    }

    /// Enable or disable one event kind.
    pub fn set_event_enabled(&mut self, kind: EventKind, enabled: bool) {
        self.toggles.set_event(kind, enabled);
    }

    /// Enable or disable a whole category (cascades to its kinds).
    pub fn set_category_enabled(&mut self, category: EventCategory, enabled: bool) {
        self.toggles.set_category(category, enabled);
    }

    /// Enable or disable everything.
    pub fn set_all_enabled(&mut self, enabled: bool) {
        self.toggles.set_all(enabled);
    }

    /// The toggle board.
    #[must_use]
    pub fn toggles(&self) -> &ToggleBoard {
        &self.toggles
    }

    /// Mutable access to the toggle board.
    pub fn toggles_mut(&mut self) -> &mut ToggleBoard {
        &mut self.toggles
    }

    /// The per-kind counters.
    #[must_use]
    pub fn counters(&self) -> &EventCounters {
        &self.counters
    }

    /// The transcript of produced lines.
    #[must_use]
    pub fn transcript(&self) -> &Transcript {
        &self.transcript
    }

    /// Mutable access to the transcript.
    pub fn transcript_mut(&mut self) -> &mut Transcript {
        &mut self.transcript
    }

    /// Number of queued deferred echoes.
    #[must_use]
    pub fn pending_echoes(&self) -> usize {
        self.deferred.len()
    }

    /// Observe one event against the watched field, if its kind is enabled.
    ///
    /// Returns the pre-increment ordinal when the event was logged, or
    /// `None` when its kind is disabled (a disabled kind is not counted
    /// either). Pass `None` for `field` when the event did not target the
    /// watched text field; the state block is then just the time delta.
    pub fn observe(&mut self, event: &InputEvent, field: Option<&TextFieldState>) -> Option<u64> {
        if !self.toggles.is_enabled(event.kind) {
            return None;
        }
        let ordinal = self.counters.bump(event.kind);
        let event_id = lenient_format!("%s[%s]", event.kind.as_str(), ordinal);
        let event_info = lenient_format!("%s{%s}", event_id, event.describe());
        let state = self.format_state(field);
        tracing::debug!(kind = event.kind.as_str(), ordinal, "observed input event");
        self.transcript
            .push_line(lenient_format!("Event   %s: %s", event_info, state));
        self.deferred.push_back(event_info);
        Some(ordinal)
    }

    /// Emit a `Timeout …` echo line for every queued observation.
    ///
    /// Each echo re-reads the field state and the running time delta at
    /// drain time. Returns the number of echoes emitted.
    pub fn flush_deferred(&mut self, field: Option<&TextFieldState>) -> usize {
        let mut flushed = 0;
        while let Some(event_info) = self.deferred.pop_front() {
            let state = self.format_state(field);
            self.transcript
                .push_line(lenient_format!("Timeout %s: %s", event_info, state));
            flushed += 1;
        }
        flushed
    }

    /// Reset counters, transcript, queue, and the delta baseline.
    ///
    /// Toggles keep their state.
    pub fn reset(&mut self) {
        self.counters.reset();
        self.transcript.clear();
        self.deferred.clear();
        self.last_ts = None;
    }

    /// State block: optional `text="…" cursor=…, sel=…; ` plus `(+delta)`.
    ///
    /// Advances the shared delta baseline, so every call accounts for the
    /// time since whichever line was produced last.
    fn format_state(&mut self, field: Option<&TextFieldState>) -> String {
        let now = self.clock.now_ms();
        let delta = now.saturating_sub(self.last_ts.unwrap_or(now));
        self.last_ts = Some(now);
        let mut msg = String::new();
        if let Some(field) = field {
            msg = lenient_format!(
                "text=\"%s\" cursor=%s, sel=%s; ",
                field.value(),
                field.cursor_pos(),
                field.selection_len()
            );
        }
        lenient_format!("%s(+%s)", msg, delta)
    }
}

#[cfg(test)]
mod tests {
    use evtap_core::MouseButton;

    use super::*;
    use crate::clock::ManualClock;

    fn keydown(key: &str, key_code: u16) -> InputEvent {
        let code = format!("Key{}", key.to_uppercase());
        InputEvent::key(EventKind::KeyDown, code, key, key_code)
    }

    fn inspector_at(start_ms: u64) -> Inspector<ManualClock> {
        Inspector::with_clock(ManualClock::new(start_ms))
    }

    #[test]
    fn disabled_kinds_are_ignored_and_not_counted() {
        let mut inspector = inspector_at(0);
        let field = TextFieldState::new();
        assert_eq!(inspector.observe(&keydown("a", 65), Some(&field)), None);
        assert!(inspector.transcript().is_empty());
        assert_eq!(inspector.counters().get(EventKind::KeyDown), 0);
        assert_eq!(inspector.pending_echoes(), 0);
    }

    #[test]
    fn first_event_line_has_ordinal_zero_and_zero_delta() {
        let mut inspector = inspector_at(1_000);
        inspector.set_event_enabled(EventKind::KeyDown, true);
        let field = TextFieldState::with_value("abc");

        assert_eq!(inspector.observe(&keydown("a", 65), Some(&field)), Some(0));
        assert_eq!(
            inspector.transcript().lines(),
            ["Event   keydown[0]{code='KeyA', key='a', keyCode=65}: \
              text=\"abc\" cursor=3, sel=0; (+0)"]
        );
    }

    #[test]
    fn ordinals_and_deltas_advance_per_line() {
        let clock = ManualClock::new(0);
        let mut inspector = Inspector::with_clock(&clock);
        inspector.set_event_enabled(EventKind::KeyDown, true);

        assert_eq!(inspector.observe(&keydown("a", 65), None), Some(0));
        clock.advance(12);
        assert_eq!(inspector.observe(&keydown("b", 66), None), Some(1));

        let lines = inspector.transcript().lines();
        assert!(lines[0].starts_with("Event   keydown[0]{"));
        assert!(lines[0].ends_with("(+0)"));
        assert!(lines[1].starts_with("Event   keydown[1]{"));
        assert!(lines[1].ends_with("(+12)"));
    }

    #[test]
    fn events_without_a_field_log_only_the_delta() {
        let mut inspector = inspector_at(0);
        inspector.set_category_enabled(EventCategory::Mouse, true);
        let event = InputEvent::mouse(EventKind::Click, 4, 7, MouseButton::Left);
        inspector.observe(&event, None);
        assert_eq!(
            inspector.transcript().lines(),
            ["Event   click[0]{clientX=4, clientY=7, button=0}: (+0)"]
        );
    }

    #[test]
    fn deferred_echo_replays_info_with_fresh_state() {
        let clock = ManualClock::new(0);
        let mut inspector = Inspector::with_clock(&clock);
        inspector.set_event_enabled(EventKind::Input, true);

        let mut field = TextFieldState::with_value("a");
        let event = InputEvent::edit(EventKind::Input, Some("a".into()), "insertText", false);
        inspector.observe(&event, Some(&field));
        assert_eq!(inspector.pending_echoes(), 1);

        // Field changes and time passes before the drain.
        field.insert("b");
        clock.advance(1);
        assert_eq!(inspector.flush_deferred(Some(&field)), 1);
        assert_eq!(inspector.pending_echoes(), 0);

        let lines = inspector.transcript().lines();
        assert_eq!(lines.len(), 2);
        assert_eq!(
            lines[1],
            "Timeout input[0]{data='a', inputType='insertText', isComposing=false}: \
             text=\"ab\" cursor=2, sel=0; (+1)"
        );
    }

    #[test]
    fn deferred_echoes_drain_in_observation_order() {
        let mut inspector = inspector_at(0);
        inspector.set_category_enabled(EventCategory::Keyboard, true);
        inspector.observe(&keydown("a", 65), None);
        inspector.observe(&keydown("b", 66), None);
        assert_eq!(inspector.flush_deferred(None), 2);

        let lines = inspector.transcript().lines();
        assert!(lines[2].starts_with("Timeout keydown[0]{"));
        assert!(lines[3].starts_with("Timeout keydown[1]{"));
    }

    #[test]
    fn flush_with_empty_queue_is_a_no_op() {
        let mut inspector = inspector_at(0);
        assert_eq!(inspector.flush_deferred(None), 0);
        assert!(inspector.transcript().is_empty());
    }

    #[test]
    fn each_kind_counts_separately() {
        let mut inspector = inspector_at(0);
        inspector.set_all_enabled(true);
        inspector.observe(&keydown("a", 65), None);
        inspector.observe(
            &InputEvent::key(EventKind::KeyUp, "KeyA", "a", 65),
            None,
        );
        inspector.observe(&keydown("b", 66), None);

        assert_eq!(inspector.counters().get(EventKind::KeyDown), 2);
        assert_eq!(inspector.counters().get(EventKind::KeyUp), 1);
        let lines = inspector.transcript().lines();
        assert!(lines[1].starts_with("Event   keyup[0]{"));
        assert!(lines[2].starts_with("Event   keydown[1]{"));
    }

    #[test]
    fn selection_events_render_empty_braces() {
        let mut inspector = inspector_at(0);
        inspector.set_category_enabled(EventCategory::Selection, true);
        inspector.observe(&InputEvent::selection(EventKind::SelectStart), None);
        assert_eq!(
            inspector.transcript().lines(),
            ["Event   selectstart[0]{}: (+0)"]
        );
    }

    #[test]
    fn reset_clears_state_but_keeps_toggles() {
        let mut inspector = inspector_at(0);
        inspector.set_event_enabled(EventKind::KeyDown, true);
        inspector.observe(&keydown("a", 65), None);
        inspector.reset();

        assert!(inspector.transcript().is_empty());
        assert_eq!(inspector.pending_echoes(), 0);
        assert_eq!(inspector.counters().total(), 0);
        // Still enabled: the next observation logs with ordinal 0 again.
        assert_eq!(inspector.observe(&keydown("a", 65), None), Some(0));
    }

    #[test]
    fn field_text_containing_markers_is_not_substituted() {
        // A value of literally "%s" must survive composition untouched.
        let mut inspector = inspector_at(0);
        inspector.set_event_enabled(EventKind::Input, true);
        let field = TextFieldState::with_value("%s");
        let event = InputEvent::edit(EventKind::Input, None, "insertText", false);
        inspector.observe(&event, Some(&field));
        let line = &inspector.transcript().lines()[0];
        assert!(line.contains("text=\"%s\""), "line was: {line}");
    }
}
