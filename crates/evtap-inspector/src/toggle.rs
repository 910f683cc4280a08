#![forbid(unsafe_code)]

//! Enable/disable toggles for events and categories.
//!
//! Filtering is modeled as a [`Toggleable`] seam with two concrete
//! variants: [`EventToggle`] switches one kind, [`CategoryToggle`] switches
//! a whole category. A [`ToggleBoard`] composes them and applies the
//! category cascade: enabling a category enables each of its kinds.
//!
//! Everything starts disabled; the inspector ignores events whose kind is
//! not enabled, which is the moral equivalent of never attaching a listener.

use ahash::AHashMap;
use evtap_core::{EventCategory, EventKind};

/// Anything with an on/off switch and a label.
pub trait Toggleable {
    /// Display label for the switch.
    fn label(&self) -> &'static str;

    /// Current state.
    fn is_enabled(&self) -> bool;

    /// Flip the switch.
    fn set_enabled(&mut self, enabled: bool);
}

/// Switch for a single event kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EventToggle {
    kind: EventKind,
    enabled: bool,
}

impl EventToggle {
    /// Create a disabled toggle for `kind`.
    #[must_use]
    pub fn new(kind: EventKind) -> Self {
        Self {
            kind,
            enabled: false,
        }
    }

    /// The kind this toggle controls.
    #[must_use]
    pub fn kind(&self) -> EventKind {
        self.kind
    }
}

impl Toggleable for EventToggle {
    fn label(&self) -> &'static str {
        self.kind.as_str()
    }

    fn is_enabled(&self) -> bool {
        self.enabled
    }

    fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
    }
}

/// Switch for a whole event category.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CategoryToggle {
    category: EventCategory,
    enabled: bool,
}

impl CategoryToggle {
    /// Create a disabled toggle for `category`.
    #[must_use]
    pub fn new(category: EventCategory) -> Self {
        Self {
            category,
            enabled: false,
        }
    }

    /// The category this toggle controls.
    #[must_use]
    pub fn category(&self) -> EventCategory {
        self.category
    }
}

impl Toggleable for CategoryToggle {
    fn label(&self) -> &'static str {
        self.category.as_str()
    }

    fn is_enabled(&self) -> bool {
        self.enabled
    }

    fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
    }
}

/// All event and category toggles, with the category cascade.
#[derive(Debug, Clone)]
pub struct ToggleBoard {
    events: AHashMap<EventKind, EventToggle>,
    categories: AHashMap<EventCategory, CategoryToggle>,
}

impl ToggleBoard {
    /// Create a board with every toggle disabled.
    #[must_use]
    pub fn new() -> Self {
        let events = EventKind::ALL
            .into_iter()
            .map(|kind| (kind, EventToggle::new(kind)))
            .collect();
        let categories = EventCategory::ALL
            .into_iter()
            .map(|category| (category, CategoryToggle::new(category)))
            .collect();
        Self { events, categories }
    }

    /// Whether events of `kind` should be observed.
    #[must_use]
    pub fn is_enabled(&self, kind: EventKind) -> bool {
        self.events.get(&kind).is_some_and(Toggleable::is_enabled)
    }

    /// Flip a single event kind.
    pub fn set_event(&mut self, kind: EventKind, enabled: bool) {
        if let Some(toggle) = self.events.get_mut(&kind) {
            toggle.set_enabled(enabled);
        }
    }

    /// Flip a category; cascades to each of its kinds.
    pub fn set_category(&mut self, category: EventCategory, enabled: bool) {
        if let Some(toggle) = self.categories.get_mut(&category) {
            toggle.set_enabled(enabled);
        }
        for &kind in category.kinds() {
            self.set_event(kind, enabled);
        }
    }

    /// Flip everything at once.
    pub fn set_all(&mut self, enabled: bool) {
        for category in EventCategory::ALL {
            self.set_category(category, enabled);
        }
    }

    /// Whether the category switch itself is on.
    ///
    /// Individually disabling a member kind does not flip the category
    /// switch back off.
    #[must_use]
    pub fn is_category_enabled(&self, category: EventCategory) -> bool {
        self.categories
            .get(&category)
            .is_some_and(Toggleable::is_enabled)
    }

    /// Enabled kinds, in canonical order.
    #[must_use]
    pub fn enabled_kinds(&self) -> Vec<EventKind> {
        EventKind::ALL
            .into_iter()
            .filter(|&kind| self.is_enabled(kind))
            .collect()
    }
}

impl Default for ToggleBoard {
    fn default() -> Self {
        Self::new()
    }
}
