//! Content payloads and action triggers supplied by callers.
//!
//! The controllers never look inside [`Content`]; they only store it and hand
//! it to the renderer. [`ActionTrigger`]s are pre-built interactive elements:
//! the overlay positions them in its footer and routes clicks and key presses
//! to them.

use std::cell::{Cell, RefCell};
use std::fmt;
use std::rc::Rc;

use crossterm::event::KeyCode;
use ratatui::text::Line;
use serde::{Deserialize, Serialize};

/// Body content of an overlay.
#[derive(Debug, Clone, PartialEq)]
pub enum Content {
    /// Plain text, wrapped by the renderer.
    Text(String),
    /// Pre-styled lines built by the caller.
    Lines(Vec<Line<'static>>),
}

impl Content {
    /// Create text content.
    pub fn text(text: impl Into<String>) -> Self {
        Self::Text(text.into())
    }

    /// Create pre-styled content.
    pub fn lines(lines: Vec<Line<'static>>) -> Self {
        Self::Lines(lines)
    }

    /// Plain-text view of the content, styling dropped.
    pub fn plain_text(&self) -> String {
        match self {
            Content::Text(text) => text.clone(),
            Content::Lines(lines) => lines
                .iter()
                .map(|line| {
                    line.spans
                        .iter()
                        .map(|span| span.content.as_ref())
                        .collect::<String>()
                })
                .collect::<Vec<_>>()
                .join("\n"),
        }
    }
}

impl Default for Content {
    fn default() -> Self {
        Self::Text(String::new())
    }
}

impl From<&str> for Content {
    fn from(text: &str) -> Self {
        Self::text(text)
    }
}

impl From<String> for Content {
    fn from(text: String) -> Self {
        Self::Text(text)
    }
}

impl From<Vec<Line<'static>>> for Content {
    fn from(lines: Vec<Line<'static>>) -> Self {
        Self::Lines(lines)
    }
}

/// Visual variant of an action trigger.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ButtonVariant {
    #[default]
    Primary,
    Secondary,
    Outline,
    Ghost,
    Danger,
}

impl ButtonVariant {
    /// Parse a variant name, falling back to primary.
    pub fn from_name(name: &str) -> Self {
        match name.trim().to_ascii_lowercase().as_str() {
            "secondary" => Self::Secondary,
            "outline" => Self::Outline,
            "ghost" => Self::Ghost,
            "danger" => Self::Danger,
            _ => Self::Primary,
        }
    }
}

type Listener = Rc<dyn Fn()>;

struct TriggerInner {
    label: String,
    variant: Cell<ButtonVariant>,
    key: Cell<Option<KeyCode>>,
    listeners: RefCell<Vec<Listener>>,
}

/// An interactive element placed in an overlay footer or on a notification.
///
/// Clones share identity: a listener added through one clone runs when any
/// clone is clicked, and the builders below update every clone.
#[derive(Clone)]
pub struct ActionTrigger {
    inner: Rc<TriggerInner>,
}

impl ActionTrigger {
    /// Create a primary trigger with no key binding.
    pub fn new(label: impl Into<String>) -> Self {
        Self {
            inner: Rc::new(TriggerInner {
                label: label.into(),
                variant: Cell::new(ButtonVariant::Primary),
                key: Cell::new(None),
                listeners: RefCell::new(Vec::new()),
            }),
        }
    }

    /// Set the visual variant.
    pub fn with_variant(self, variant: ButtonVariant) -> Self {
        self.inner.variant.set(variant);
        self
    }

    /// Bind a key that activates this trigger while its overlay is on top.
    pub fn with_key(self, key: KeyCode) -> Self {
        self.inner.key.set(Some(key));
        self
    }

    /// Register a click listener.
    pub fn on_click(&self, listener: impl Fn() + 'static) {
        self.inner.listeners.borrow_mut().push(Rc::new(listener));
    }

    /// Activate the trigger, running every listener in registration order.
    pub fn click(&self) {
        // Snapshot so listeners may register further listeners.
        let listeners = self.inner.listeners.borrow().clone();
        for listener in listeners {
            listener();
        }
    }

    pub fn label(&self) -> &str {
        &self.inner.label
    }

    pub fn variant(&self) -> ButtonVariant {
        self.inner.variant.get()
    }

    pub fn key(&self) -> Option<KeyCode> {
        self.inner.key.get()
    }

    /// Whether two handles refer to the same trigger.
    pub fn same_as(&self, other: &ActionTrigger) -> bool {
        Rc::ptr_eq(&self.inner, &other.inner)
    }
}

impl fmt::Debug for ActionTrigger {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ActionTrigger")
            .field("label", &self.inner.label)
            .field("variant", &self.inner.variant.get())
            .field("key", &self.inner.key.get())
            .field("listeners", &self.inner.listeners.borrow().len())
            .finish()
    }
}
