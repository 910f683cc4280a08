#![forbid(unsafe_code)]

//! Canonical input event types.
//!
//! The event vocabulary is the fixed set of events a text field can fire:
//! keyboard, composition (IME), input, clipboard, mouse, touch, and
//! selection events. Each [`EventKind`] belongs to exactly one
//! [`EventCategory`], and an observed [`InputEvent`] pairs a kind with the
//! typed payload for its category.
//!
//! # Design Notes
//!
//! - Kind/payload agreement is established by the `InputEvent` constructors.
//! - `Modifiers` use bitflags for easy combination.
//! - Property listings ([`InputEvent::props`]) follow a fixed order so log
//!   lines are stable across runs.

use std::fmt;
use std::str::FromStr;

use bitflags::bitflags;

/// Category of input event a text field can fire.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventCategory {
    /// Key press/release/repeat events.
    Keyboard,

    /// IME composition events.
    Composition,

    /// Value-change events (`input`, `beforeinput`).
    Input,

    /// Cut/copy/paste events.
    Clipboard,

    /// Pointer button and movement events.
    Mouse,

    /// Touch contact events.
    Touch,

    /// Selection start/change events.
    Selection,
}

impl EventCategory {
    /// All categories, in display order.
    pub const ALL: [EventCategory; 7] = [
        EventCategory::Keyboard,
        EventCategory::Composition,
        EventCategory::Input,
        EventCategory::Clipboard,
        EventCategory::Mouse,
        EventCategory::Touch,
        EventCategory::Selection,
    ];

    /// Lowercase category label.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Keyboard => "keyboard",
            Self::Composition => "composition",
            Self::Input => "input",
            Self::Clipboard => "clipboard",
            Self::Mouse => "mouse",
            Self::Touch => "touch",
            Self::Selection => "selection",
        }
    }

    /// The event kinds that belong to this category, in display order.
    #[must_use]
    pub const fn kinds(self) -> &'static [EventKind] {
        match self {
            Self::Keyboard => &[EventKind::KeyDown, EventKind::KeyUp, EventKind::KeyPress],
            Self::Composition => &[
                EventKind::CompositionStart,
                EventKind::CompositionUpdate,
                EventKind::CompositionEnd,
            ],
            Self::Input => &[EventKind::Input, EventKind::BeforeInput],
            Self::Clipboard => &[EventKind::Cut, EventKind::Copy, EventKind::Paste],
            Self::Mouse => &[
                EventKind::Click,
                EventKind::DblClick,
                EventKind::MouseUp,
                EventKind::MouseDown,
                EventKind::MouseMove,
            ],
            Self::Touch => &[
                EventKind::TouchStart,
                EventKind::TouchEnd,
                EventKind::TouchMove,
                EventKind::TouchCancel,
            ],
            Self::Selection => &[EventKind::SelectStart, EventKind::SelectionChange],
        }
    }
}

impl fmt::Display for EventCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One concrete event kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventKind {
    /// Key pressed down.
    KeyDown,
    /// Key released.
    KeyUp,
    /// Character-producing key press.
    KeyPress,
    /// IME composition session started.
    CompositionStart,
    /// IME composition text changed.
    CompositionUpdate,
    /// IME composition session ended.
    CompositionEnd,
    /// Field value changed.
    Input,
    /// Field value about to change.
    BeforeInput,
    /// Selection cut to the clipboard.
    Cut,
    /// Selection copied to the clipboard.
    Copy,
    /// Clipboard content pasted.
    Paste,
    /// Primary button click.
    Click,
    /// Primary button double click.
    DblClick,
    /// Mouse button released.
    MouseUp,
    /// Mouse button pressed.
    MouseDown,
    /// Mouse moved.
    MouseMove,
    /// Touch contact started.
    TouchStart,
    /// Touch contact ended.
    TouchEnd,
    /// Touch contact moved.
    TouchMove,
    /// Touch contact cancelled.
    TouchCancel,
    /// Selection started.
    SelectStart,
    /// Selection changed.
    SelectionChange,
}

impl EventKind {
    /// All event kinds, grouped by category in display order.
    pub const ALL: [EventKind; 22] = [
        EventKind::KeyDown,
        EventKind::KeyUp,
        EventKind::KeyPress,
        EventKind::CompositionStart,
        EventKind::CompositionUpdate,
        EventKind::CompositionEnd,
        EventKind::Input,
        EventKind::BeforeInput,
        EventKind::Cut,
        EventKind::Copy,
        EventKind::Paste,
        EventKind::Click,
        EventKind::DblClick,
        EventKind::MouseUp,
        EventKind::MouseDown,
        EventKind::MouseMove,
        EventKind::TouchStart,
        EventKind::TouchEnd,
        EventKind::TouchMove,
        EventKind::TouchCancel,
        EventKind::SelectStart,
        EventKind::SelectionChange,
    ];

    /// Lowercase event name, as it appears in log lines and traces.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::KeyDown => "keydown",
            Self::KeyUp => "keyup",
            Self::KeyPress => "keypress",
            Self::CompositionStart => "compositionstart",
            Self::CompositionUpdate => "compositionupdate",
            Self::CompositionEnd => "compositionend",
            Self::Input => "input",
            Self::BeforeInput => "beforeinput",
            Self::Cut => "cut",
            Self::Copy => "copy",
            Self::Paste => "paste",
            Self::Click => "click",
            Self::DblClick => "dblclick",
            Self::MouseUp => "mouseup",
            Self::MouseDown => "mousedown",
            Self::MouseMove => "mousemove",
            Self::TouchStart => "touchstart",
            Self::TouchEnd => "touchend",
            Self::TouchMove => "touchmove",
            Self::TouchCancel => "touchcancel",
            Self::SelectStart => "selectstart",
            Self::SelectionChange => "selectionchange",
        }
    }

    /// The category this kind belongs to.
    #[must_use]
    pub const fn category(self) -> EventCategory {
        match self {
            Self::KeyDown | Self::KeyUp | Self::KeyPress => EventCategory::Keyboard,
            Self::CompositionStart | Self::CompositionUpdate | Self::CompositionEnd => {
                EventCategory::Composition
            }
            Self::Input | Self::BeforeInput => EventCategory::Input,
            Self::Cut | Self::Copy | Self::Paste => EventCategory::Clipboard,
            Self::Click | Self::DblClick | Self::MouseUp | Self::MouseDown | Self::MouseMove => {
                EventCategory::Mouse
            }
            Self::TouchStart | Self::TouchEnd | Self::TouchMove | Self::TouchCancel => {
                EventCategory::Touch
            }
            Self::SelectStart | Self::SelectionChange => EventCategory::Selection,
        }
    }
}

impl fmt::Display for EventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when parsing an unknown event name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseEventKindError {
    input: String,
}

impl ParseEventKindError {
    /// The rejected input.
    #[must_use]
    pub fn input(&self) -> &str {
        &self.input
    }
}

impl fmt::Display for ParseEventKindError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown event kind: {:?}", self.input)
    }
}

impl std::error::Error for ParseEventKindError {}

impl FromStr for EventKind {
    type Err = ParseEventKindError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|kind| kind.as_str() == s)
            .ok_or_else(|| ParseEventKindError { input: s.to_string() })
    }
}

bitflags! {
    /// Modifier keys held during an event.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct Modifiers: u8 {
        /// No modifiers.
        const NONE  = 0b0000;
        /// Shift key.
        const SHIFT = 0b0001;
        /// Alt/Option key.
        const ALT   = 0b0010;
        /// Control key.
        const CTRL  = 0b0100;
        /// Meta/Command key.
        const META  = 0b1000;
    }
}

impl Default for Modifiers {
    fn default() -> Self {
        Self::NONE
    }
}

/// Mouse button identifiers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MouseButton {
    /// Left (primary) button.
    Left,
    /// Right (secondary) button.
    Right,
    /// Middle button.
    Middle,
}

impl MouseButton {
    /// Numeric button id as reported in log lines (left=0, middle=1, right=2).
    #[must_use]
    pub const fn id(self) -> u8 {
        match self {
            Self::Left => 0,
            Self::Middle => 1,
            Self::Right => 2,
        }
    }
}

/// Typed payload for one event category.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EventDetail {
    /// Keyboard payload.
    Key {
        /// Physical key identifier (e.g. `KeyA`).
        code: String,
        /// Logical key value (e.g. `a`, `Enter`).
        key: String,
        /// Legacy numeric key code.
        key_code: u16,
    },

    /// IME composition payload.
    Composition {
        /// Composition text so far.
        data: String,
        /// Whether a composition session is active.
        is_composing: bool,
    },

    /// Input/beforeinput payload.
    Edit {
        /// Inserted text, if any.
        data: Option<String>,
        /// Edit operation name (e.g. `insertText`, `deleteContentBackward`).
        input_type: String,
        /// Whether the edit happened during composition.
        is_composing: bool,
    },

    /// Clipboard payload.
    Clipboard {
        /// Transferred text, when available.
        data: Option<String>,
    },

    /// Mouse payload.
    Mouse {
        /// Pointer column.
        client_x: i32,
        /// Pointer row.
        client_y: i32,
        /// Button involved.
        button: MouseButton,
    },

    /// Touch payload.
    Touch {
        /// Contact column.
        client_x: i32,
        /// Contact row.
        client_y: i32,
        /// Number of active contacts.
        touches: u8,
    },

    /// Selection events carry no payload.
    Selection,
}

/// A property value shown in an event's property listing.
///
/// String values render single-quoted, everything else bare, so
/// `key='a', keyCode=65` reads unambiguously.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PropValue {
    /// A text property.
    Str(String),
    /// A numeric property.
    Int(i64),
    /// A boolean property.
    Bool(bool),
}

impl fmt::Display for PropValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Str(s) => write!(f, "'{s}'"),
            Self::Int(n) => write!(f, "{n}"),
            Self::Bool(b) => write!(f, "{b}"),
        }
    }
}

/// One observed input event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InputEvent {
    /// What fired.
    pub kind: EventKind,

    /// Modifier keys held at the time.
    pub modifiers: Modifiers,

    /// Category-specific payload.
    pub detail: EventDetail,
}

impl InputEvent {
    /// Create a keyboard event.
    #[must_use]
    pub fn key(
        kind: EventKind,
        code: impl Into<String>,
        key: impl Into<String>,
        key_code: u16,
    ) -> Self {
        debug_assert_eq!(kind.category(), EventCategory::Keyboard);
        Self {
            kind,
            modifiers: Modifiers::NONE,
            detail: EventDetail::Key {
                code: code.into(),
                key: key.into(),
                key_code,
            },
        }
    }

    /// Create an IME composition event.
    #[must_use]
    pub fn composition(kind: EventKind, data: impl Into<String>, is_composing: bool) -> Self {
        debug_assert_eq!(kind.category(), EventCategory::Composition);
        Self {
            kind,
            modifiers: Modifiers::NONE,
            detail: EventDetail::Composition {
                data: data.into(),
                is_composing,
            },
        }
    }

    /// Create an input/beforeinput event.
    #[must_use]
    pub fn edit(
        kind: EventKind,
        data: Option<String>,
        input_type: impl Into<String>,
        is_composing: bool,
    ) -> Self {
        debug_assert_eq!(kind.category(), EventCategory::Input);
        Self {
            kind,
            modifiers: Modifiers::NONE,
            detail: EventDetail::Edit {
                data,
                input_type: input_type.into(),
                is_composing,
            },
        }
    }

    /// Create a clipboard event.
    #[must_use]
    pub fn clipboard(kind: EventKind, data: Option<String>) -> Self {
        debug_assert_eq!(kind.category(), EventCategory::Clipboard);
        Self {
            kind,
            modifiers: Modifiers::NONE,
            detail: EventDetail::Clipboard { data },
        }
    }

    /// Create a mouse event.
    #[must_use]
    pub fn mouse(kind: EventKind, client_x: i32, client_y: i32, button: MouseButton) -> Self {
        debug_assert_eq!(kind.category(), EventCategory::Mouse);
        Self {
            kind,
            modifiers: Modifiers::NONE,
            detail: EventDetail::Mouse {
                client_x,
                client_y,
                button,
            },
        }
    }

    /// Create a touch event.
    #[must_use]
    pub fn touch(kind: EventKind, client_x: i32, client_y: i32, touches: u8) -> Self {
        debug_assert_eq!(kind.category(), EventCategory::Touch);
        Self {
            kind,
            modifiers: Modifiers::NONE,
            detail: EventDetail::Touch {
                client_x,
                client_y,
                touches,
            },
        }
    }

    /// Create a selection event.
    #[must_use]
    pub fn selection(kind: EventKind) -> Self {
        debug_assert_eq!(kind.category(), EventCategory::Selection);
        Self {
            kind,
            modifiers: Modifiers::NONE,
            detail: EventDetail::Selection,
        }
    }

    /// Attach modifiers (builder).
    #[must_use]
    pub fn with_modifiers(mut self, modifiers: Modifiers) -> Self {
        self.modifiers = modifiers;
        self
    }

    /// The category of this event's kind.
    #[must_use]
    pub const fn category(&self) -> EventCategory {
        self.kind.category()
    }

    /// The payload's properties, in fixed display order.
    #[must_use]
    pub fn props(&self) -> Vec<(&'static str, PropValue)> {
        match &self.detail {
            EventDetail::Key {
                code,
                key,
                key_code,
            } => vec![
                ("code", PropValue::Str(code.clone())),
                ("key", PropValue::Str(key.clone())),
                ("keyCode", PropValue::Int(i64::from(*key_code))),
            ],
            EventDetail::Composition { data, is_composing } => vec![
                ("data", PropValue::Str(data.clone())),
                ("isComposing", PropValue::Bool(*is_composing)),
            ],
            EventDetail::Edit {
                data,
                input_type,
                is_composing,
            } => {
                let mut props = Vec::with_capacity(3);
                if let Some(data) = data {
                    props.push(("data", PropValue::Str(data.clone())));
                }
                props.push(("inputType", PropValue::Str(input_type.clone())));
                props.push(("isComposing", PropValue::Bool(*is_composing)));
                props
            }
            EventDetail::Clipboard { data } => match data {
                Some(data) => vec![("data", PropValue::Str(data.clone()))],
                None => Vec::new(),
            },
            EventDetail::Mouse {
                client_x,
                client_y,
                button,
            } => vec![
                ("clientX", PropValue::Int(i64::from(*client_x))),
                ("clientY", PropValue::Int(i64::from(*client_y))),
                ("button", PropValue::Int(i64::from(button.id()))),
            ],
            EventDetail::Touch {
                client_x,
                client_y,
                touches,
            } => vec![
                ("clientX", PropValue::Int(i64::from(*client_x))),
                ("clientY", PropValue::Int(i64::from(*client_y))),
                ("touches", PropValue::Int(i64::from(*touches))),
            ],
            EventDetail::Selection => Vec::new(),
        }
    }

    /// `name=value` listing of the present properties, comma-space joined.
    #[must_use]
    pub fn describe(&self) -> String {
        let props = self.props();
        let mut out = String::new();
        for (i, (name, value)) in props.iter().enumerate() {
            if i > 0 {
                out.push_str(", ");
            }
            out.push_str(name);
            out.push('=');
            out.push_str(&value.to_string());
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn categories_partition_all_kinds() {
        let mut seen = Vec::new();
        for category in EventCategory::ALL {
            for kind in category.kinds() {
                assert_eq!(kind.category(), category);
                assert!(!seen.contains(kind), "{kind} listed twice");
                seen.push(*kind);
            }
        }
        assert_eq!(seen.len(), EventKind::ALL.len());
    }

    #[test]
    fn kind_names_round_trip() {
        for kind in EventKind::ALL {
            assert_eq!(kind.as_str().parse::<EventKind>(), Ok(kind));
        }
    }

    #[test]
    fn unknown_kind_name_is_rejected() {
        let err = "wheel".parse::<EventKind>().unwrap_err();
        assert_eq!(err.input(), "wheel");
        assert!(err.to_string().contains("wheel"));
    }

    #[test]
    fn category_labels() {
        assert_eq!(EventCategory::Keyboard.as_str(), "keyboard");
        assert_eq!(EventCategory::Selection.to_string(), "selection");
    }

    #[test]
    fn key_event_props_in_order() {
        let event = InputEvent::key(EventKind::KeyDown, "KeyA", "a", 65);
        assert_eq!(event.describe(), "code='KeyA', key='a', keyCode=65");
    }

    #[test]
    fn edit_event_without_data_omits_it() {
        let event = InputEvent::edit(EventKind::Input, None, "deleteContentBackward", false);
        assert_eq!(
            event.describe(),
            "inputType='deleteContentBackward', isComposing=false"
        );
    }

    #[test]
    fn edit_event_with_data_lists_it_first() {
        let event = InputEvent::edit(
            EventKind::BeforeInput,
            Some("x".to_string()),
            "insertText",
            false,
        );
        assert_eq!(
            event.describe(),
            "data='x', inputType='insertText', isComposing=false"
        );
    }

    #[test]
    fn mouse_event_props() {
        let event = InputEvent::mouse(EventKind::Click, 10, 20, MouseButton::Left);
        assert_eq!(event.describe(), "clientX=10, clientY=20, button=0");
    }

    #[test]
    fn selection_event_has_empty_description() {
        let event = InputEvent::selection(EventKind::SelectionChange);
        assert_eq!(event.describe(), "");
    }

    #[test]
    fn clipboard_event_data_is_optional() {
        let with = InputEvent::clipboard(EventKind::Paste, Some("hi".to_string()));
        assert_eq!(with.describe(), "data='hi'");
        let without = InputEvent::clipboard(EventKind::Copy, None);
        assert_eq!(without.describe(), "");
    }

    #[test]
    fn modifiers_builder() {
        let event = InputEvent::key(EventKind::KeyDown, "KeyC", "c", 67)
            .with_modifiers(Modifiers::CTRL | Modifiers::SHIFT);
        assert!(event.modifiers.contains(Modifiers::CTRL));
        assert!(event.modifiers.contains(Modifiers::SHIFT));
        assert!(!event.modifiers.contains(Modifiers::ALT));
    }

    #[test]
    fn modifiers_default_is_none() {
        assert_eq!(Modifiers::default(), Modifiers::NONE);
    }

    #[test]
    fn mouse_button_ids() {
        assert_eq!(MouseButton::Left.id(), 0);
        assert_eq!(MouseButton::Middle.id(), 1);
        assert_eq!(MouseButton::Right.id(), 2);
    }

    #[test]
    fn string_props_are_quoted() {
        assert_eq!(PropValue::Str("a".into()).to_string(), "'a'");
        assert_eq!(PropValue::Int(-3).to_string(), "-3");
        assert_eq!(PropValue::Bool(true).to_string(), "true");
    }
}
