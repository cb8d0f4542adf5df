//! Toast notifications and the container that stacks them.
//!
//! Records live in a single container owned by the surface, in insertion
//! order (most recent last). Each record moves through
//! Pending → Visible → Closing → Removed; once Removed it is gone from the
//! container and its handle only answers queries.

use std::cell::{Cell, RefCell};
use std::fmt;
use std::rc::{Rc, Weak};
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::content::{ActionTrigger, ButtonVariant};
use crate::surface;
use crate::timer::{TimerId, TimerService};

/// Default display time for a notification.
pub const DEFAULT_DURATION: Duration = Duration::from_millis(3000);

/// Notification category determining icon and color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NotificationCategory {
    /// Operation succeeded (green)
    Success,
    /// Operation failed (red)
    Error,
    /// Needs attention (yellow)
    Warning,
    /// Informational (cyan)
    #[default]
    Info,
}

impl NotificationCategory {
    /// Parse a category name; anything unrecognized is info.
    pub fn from_name(name: &str) -> Self {
        match name.trim().to_ascii_lowercase().as_str() {
            "success" => Self::Success,
            "error" => Self::Error,
            "warning" => Self::Warning,
            _ => Self::Info,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::Success => "success",
            Self::Error => "error",
            Self::Warning => "warning",
            Self::Info => "info",
        }
    }

    /// Icon shown before the message.
    pub fn prefix(&self) -> &'static str {
        match self {
            Self::Success => "[+]",
            Self::Error => "[x]",
            Self::Warning => "[!]",
            Self::Info => "[i]",
        }
    }
}

/// Placement of the notification container on the surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Position {
    TopLeft,
    TopCenter,
    #[default]
    TopRight,
    MiddleLeft,
    MiddleRight,
    BottomLeft,
    BottomCenter,
    BottomRight,
}

impl Position {
    pub const ALL: [Position; 8] = [
        Position::TopLeft,
        Position::TopCenter,
        Position::TopRight,
        Position::MiddleLeft,
        Position::MiddleRight,
        Position::BottomLeft,
        Position::BottomCenter,
        Position::BottomRight,
    ];

    /// Parse a kebab-case placement; anything unrecognized is top-right.
    pub fn from_name(name: &str) -> Self {
        let name = name.trim().to_ascii_lowercase();
        Self::ALL
            .into_iter()
            .find(|p| p.name() == name)
            .unwrap_or_default()
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::TopLeft => "top-left",
            Self::TopCenter => "top-center",
            Self::TopRight => "top-right",
            Self::MiddleLeft => "middle-left",
            Self::MiddleRight => "middle-right",
            Self::BottomLeft => "bottom-left",
            Self::BottomCenter => "bottom-center",
            Self::BottomRight => "bottom-right",
        }
    }
}

/// Lifecycle state of a notification record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationState {
    Pending,
    Visible,
    Closing,
    Removed,
}

/// Identity of a record, unique within its container.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NotificationId(u64);

/// Options for [`show`].
#[derive(Debug, Clone)]
pub struct NotificationOptions {
    pub message: String,
    pub category: NotificationCategory,
    /// Zero keeps the notification until it is dismissed.
    pub duration: Duration,
    /// Applies to the whole container, not just this notification.
    pub position: Position,
    pub dismissible: bool,
    pub icon: bool,
}

impl Default for NotificationOptions {
    fn default() -> Self {
        Self {
            message: String::new(),
            category: NotificationCategory::Info,
            duration: DEFAULT_DURATION,
            position: Position::TopRight,
            dismissible: true,
            icon: true,
        }
    }
}

impl NotificationOptions {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            ..Self::default()
        }
    }

    pub fn with_category(mut self, category: NotificationCategory) -> Self {
        self.category = category;
        self
    }

    /// Set the category by name, degrading to info.
    pub fn with_type(self, name: &str) -> Self {
        self.with_category(NotificationCategory::from_name(name))
    }

    pub fn with_duration(mut self, duration: Duration) -> Self {
        self.duration = duration;
        self
    }

    /// Keep the notification until it is dismissed.
    pub fn persistent(self) -> Self {
        self.with_duration(Duration::ZERO)
    }

    pub fn with_position(mut self, position: Position) -> Self {
        self.position = position;
        self
    }

    pub fn dismissible(mut self, dismissible: bool) -> Self {
        self.dismissible = dismissible;
        self
    }

    pub fn icon(mut self, icon: bool) -> Self {
        self.icon = icon;
        self
    }
}

struct RecordShared {
    id: NotificationId,
    message: String,
    category: NotificationCategory,
    duration: Duration,
    icon: bool,
    state: Cell<NotificationState>,
    entry_timer: Cell<Option<TimerId>>,
    dismiss_timer: Cell<Option<TimerId>>,
    close_trigger: Option<ActionTrigger>,
    container: Weak<NotificationContainer>,
    timers: Rc<dyn TimerService>,
    exit_delay: Duration,
}

/// Handle to a notification record. Clones share the same record.
#[derive(Clone)]
pub struct NotificationHandle {
    shared: Rc<RecordShared>,
}

impl NotificationHandle {
    /// Begin the exit transition. Safe to call in any state; only the first
    /// call before Closing has an effect, and it cancels the auto-dismiss timer.
    pub fn close(&self) {
        let shared = &self.shared;
        match shared.state.get() {
            NotificationState::Pending | NotificationState::Visible => {}
            NotificationState::Closing | NotificationState::Removed => return,
        }
        if let Some(timer) = shared.entry_timer.take() {
            shared.timers.cancel(timer);
        }
        if let Some(timer) = shared.dismiss_timer.take() {
            shared.timers.cancel(timer);
        }
        shared.state.set(NotificationState::Closing);
        tracing::trace!(id = ?shared.id, "notification closing");

        let this = self.clone();
        shared
            .timers
            .schedule(shared.exit_delay, Box::new(move || this.finish_removal()));
    }

    fn finish_removal(&self) {
        let shared = &self.shared;
        shared.state.set(NotificationState::Removed);
        if let Some(container) = shared.container.upgrade() {
            container.remove(shared.id);
        }
        tracing::debug!(id = ?shared.id, "notification removed");
    }

    pub fn id(&self) -> NotificationId {
        self.shared.id
    }

    pub fn state(&self) -> NotificationState {
        self.shared.state.get()
    }

    pub fn message(&self) -> &str {
        &self.shared.message
    }

    pub fn category(&self) -> NotificationCategory {
        self.shared.category
    }

    pub fn duration(&self) -> Duration {
        self.shared.duration
    }

    pub fn shows_icon(&self) -> bool {
        self.shared.icon
    }

    pub fn is_dismissible(&self) -> bool {
        self.shared.close_trigger.is_some()
    }

    /// The manual-close trigger, present iff the record is dismissible.
    pub fn close_trigger(&self) -> Option<&ActionTrigger> {
        self.shared.close_trigger.as_ref()
    }

    fn downgrade(&self) -> Weak<RecordShared> {
        Rc::downgrade(&self.shared)
    }
}

impl fmt::Debug for NotificationHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NotificationHandle")
            .field("id", &self.shared.id)
            .field("message", &self.shared.message)
            .field("category", &self.shared.category)
            .field("state", &self.shared.state.get())
            .finish()
    }
}

/// The stacking area for notifications.
///
/// There is one per surface, obtained through [`surface::container`].
/// Only this module mutates its record list.
#[derive(Debug)]
pub struct NotificationContainer {
    position: Cell<Position>,
    max_visible: Cell<usize>,
    records: RefCell<Vec<NotificationHandle>>,
    next_id: Cell<u64>,
}

impl Default for NotificationContainer {
    fn default() -> Self {
        Self::new()
    }
}

impl NotificationContainer {
    pub fn new() -> Self {
        Self {
            position: Cell::new(Position::TopRight),
            max_visible: Cell::new(0),
            records: RefCell::new(Vec::new()),
            next_id: Cell::new(1),
        }
    }

    pub fn position(&self) -> Position {
        self.position.get()
    }

    /// Move the whole stack, including notifications already shown.
    pub fn set_position(&self, position: Position) {
        self.position.set(position);
    }

    pub fn max_visible(&self) -> usize {
        self.max_visible.get()
    }

    /// Cap on live (Pending or Visible) records. Zero means unlimited.
    pub fn set_max_visible(&self, max_visible: usize) {
        self.max_visible.set(max_visible);
    }

    /// Records in display order, oldest first.
    pub fn records(&self) -> Vec<NotificationHandle> {
        self.records.borrow().clone()
    }

    pub fn ids(&self) -> Vec<NotificationId> {
        self.records.borrow().iter().map(|r| r.id()).collect()
    }

    pub fn get(&self, id: NotificationId) -> Option<NotificationHandle> {
        self.records.borrow().iter().find(|r| r.id() == id).cloned()
    }

    pub fn contains(&self, id: NotificationId) -> bool {
        self.records.borrow().iter().any(|r| r.id() == id)
    }

    pub fn len(&self) -> usize {
        self.records.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.borrow().is_empty()
    }

    fn allocate_id(&self) -> NotificationId {
        let id = self.next_id.get();
        self.next_id.set(id + 1);
        NotificationId(id)
    }

    fn append(&self, record: NotificationHandle) {
        let mut records = self.records.borrow_mut();
        debug_assert!(!records.iter().any(|r| r.id() == record.id()));
        records.push(record);
    }

    fn remove(&self, id: NotificationId) -> bool {
        let removed = {
            let mut records = self.records.borrow_mut();
            records
                .iter()
                .position(|r| r.id() == id)
                .map(|index| records.remove(index))
        };
        removed.is_some()
    }

    /// Close the oldest live records until the cap is respected.
    fn enforce_max_visible(&self) {
        let max = self.max_visible.get();
        if max == 0 {
            return;
        }
        let live: Vec<NotificationHandle> = self
            .records()
            .into_iter()
            .filter(|r| {
                matches!(
                    r.state(),
                    NotificationState::Pending | NotificationState::Visible
                )
            })
            .collect();
        let excess = live.len().saturating_sub(max);
        for record in live.into_iter().take(excess) {
            tracing::trace!(id = ?record.id(), "evicting notification over cap");
            record.close();
        }
    }
}

/// Show a notification in the surface container.
///
/// The record is appended in Pending state and becomes Visible on the next
/// tick. A non-zero duration arms the auto-dismiss timer; a dismissible
/// record gets a close trigger. Closing lasts `exit_delay` before the record
/// is detached.
pub fn show(
    options: NotificationOptions,
    timers: Rc<dyn TimerService>,
    exit_delay: Duration,
) -> NotificationHandle {
    let container = surface::container();
    container.set_position(options.position);

    let id = container.allocate_id();
    let close_trigger = options.dismissible.then(|| {
        ActionTrigger::new("×").with_variant(ButtonVariant::Ghost)
    });

    let handle = NotificationHandle {
        shared: Rc::new(RecordShared {
            id,
            message: options.message,
            category: options.category,
            duration: options.duration,
            icon: options.icon,
            state: Cell::new(NotificationState::Pending),
            entry_timer: Cell::new(None),
            dismiss_timer: Cell::new(None),
            close_trigger,
            container: Rc::downgrade(&container),
            timers: timers.clone(),
            exit_delay,
        }),
    };
    container.append(handle.clone());
    tracing::debug!(
        ?id,
        category = handle.category().name(),
        position = options.position.name(),
        "notification shown"
    );

    let entering = handle.clone();
    let entry_timer = timers.schedule(
        Duration::ZERO,
        Box::new(move || {
            entering.shared.entry_timer.set(None);
            if entering.state() == NotificationState::Pending {
                entering.shared.state.set(NotificationState::Visible);
            }
        }),
    );
    handle.shared.entry_timer.set(Some(entry_timer));

    if !options.duration.is_zero() {
        let expiring = handle.clone();
        let dismiss_timer = timers.schedule(
            options.duration,
            Box::new(move || {
                expiring.shared.dismiss_timer.set(None);
                expiring.close();
            }),
        );
        handle.shared.dismiss_timer.set(Some(dismiss_timer));
    }

    if let Some(trigger) = handle.close_trigger() {
        let record = handle.downgrade();
        trigger.on_click(move || {
            if let Some(shared) = record.upgrade() {
                NotificationHandle { shared }.close();
            }
        });
    }

    container.enforce_max_visible();
    handle
}
