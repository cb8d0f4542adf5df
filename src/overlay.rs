//! Modal overlays: a backdrop plus a panel with optional header, body and footer.
//!
//! An overlay is built once from [`OverlayOptions`] and driven through its
//! [`OverlayController`]. Lifecycle:
//!
//! ```text
//! Closed --open()--> Opening --next tick--> Open --close()--> Closing --exit delay--> Closed (detached)
//! ```
//!
//! While attached, the overlay holds one reference on the surface scroll lock.
//! Detachment releases it and runs `on_close` exactly once. A detached overlay
//! stays detached; build a new one to show it again.

use std::cell::{Cell, RefCell};
use std::fmt;
use std::rc::{Rc, Weak};
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use crossterm::event::KeyCode;
use serde::{Deserialize, Serialize};

use crate::content::{ActionTrigger, Content};
use crate::surface;
use crate::timer::{TimerId, TimerService};

/// Default time between `close()` and detachment.
pub const DEFAULT_EXIT_DELAY: Duration = Duration::from_millis(300);

/// Panel size relative to the frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OverlaySize {
    Sm,
    #[default]
    Md,
    Lg,
    Xl,
    Full,
}

impl OverlaySize {
    /// Parse a size name, falling back to md.
    pub fn from_name(name: &str) -> Self {
        match name.trim().to_ascii_lowercase().as_str() {
            "sm" => Self::Sm,
            "lg" => Self::Lg,
            "xl" => Self::Xl,
            "full" => Self::Full,
            _ => Self::Md,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::Sm => "sm",
            Self::Md => "md",
            Self::Lg => "lg",
            Self::Xl => "xl",
            Self::Full => "full",
        }
    }

    /// Panel width and height as percentages of the frame.
    pub fn percent(&self) -> (u16, u16) {
        match self {
            Self::Sm => (40, 30),
            Self::Md => (60, 40),
            Self::Lg => (80, 60),
            Self::Xl => (90, 75),
            Self::Full => (100, 100),
        }
    }
}

/// Lifecycle state of an overlay.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OverlayState {
    Closed,
    Opening,
    Open,
    Closing,
}

/// Stable identity of an overlay instance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct OverlayId(u64);

static NEXT_OVERLAY_ID: AtomicU64 = AtomicU64::new(1);

/// Element a click originated on.
///
/// Only [`ClickTarget::Backdrop`] counts as a backdrop click; anything inside
/// the panel is reported as the innermost element hit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClickTarget {
    Backdrop,
    Panel,
    Header,
    Title,
    CloseButton,
    Body,
    Footer,
    Action(usize),
}

/// Options for building an overlay.
pub struct OverlayOptions {
    pub title: Option<String>,
    pub content: Content,
    pub actions: Vec<ActionTrigger>,
    pub close_on_backdrop: bool,
    pub show_close_button: bool,
    pub on_close: Option<Box<dyn FnOnce()>>,
    pub size: OverlaySize,
    pub class_name: Option<String>,
}

impl Default for OverlayOptions {
    fn default() -> Self {
        Self {
            title: None,
            content: Content::default(),
            actions: Vec::new(),
            close_on_backdrop: true,
            show_close_button: true,
            on_close: None,
            size: OverlaySize::Md,
            class_name: None,
        }
    }
}

impl OverlayOptions {
    /// Options with the given body and every other field at its default.
    pub fn new(content: impl Into<Content>) -> Self {
        Self {
            content: content.into(),
            ..Self::default()
        }
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn with_actions(mut self, actions: Vec<ActionTrigger>) -> Self {
        self.actions = actions;
        self
    }

    pub fn with_size(mut self, size: OverlaySize) -> Self {
        self.size = size;
        self
    }

    pub fn with_class_name(mut self, class_name: impl Into<String>) -> Self {
        self.class_name = Some(class_name.into());
        self
    }

    pub fn close_on_backdrop(mut self, enabled: bool) -> Self {
        self.close_on_backdrop = enabled;
        self
    }

    pub fn show_close_button(mut self, enabled: bool) -> Self {
        self.show_close_button = enabled;
        self
    }

    /// Callback run once, after the overlay has been detached.
    pub fn on_close(mut self, callback: impl FnOnce() + 'static) -> Self {
        self.on_close = Some(Box::new(callback));
        self
    }
}

impl fmt::Debug for OverlayOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OverlayOptions")
            .field("title", &self.title)
            .field("content", &self.content)
            .field("actions", &self.actions)
            .field("close_on_backdrop", &self.close_on_backdrop)
            .field("show_close_button", &self.show_close_button)
            .field("on_close", &self.on_close.is_some())
            .field("size", &self.size)
            .field("class_name", &self.class_name)
            .finish()
    }
}

/// Header region: present when there is a title or a close affordance.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Header {
    pub title: Option<String>,
    pub close_button: bool,
}

struct OverlayShared {
    id: OverlayId,
    size: OverlaySize,
    class_name: Option<String>,
    close_on_backdrop: bool,
    header: RefCell<Option<Header>>,
    body: RefCell<Content>,
    actions: Vec<ActionTrigger>,
    state: Cell<OverlayState>,
    detached: Cell<bool>,
    opening_timer: Cell<Option<TimerId>>,
    on_close: RefCell<Option<Box<dyn FnOnce()>>>,
    timers: Rc<dyn TimerService>,
    exit_delay: Duration,
}

/// Handle to one overlay. Clones share the same instance.
#[derive(Clone)]
pub struct OverlayController {
    shared: Rc<OverlayShared>,
}

/// Non-owning handle, for closures stored on the overlay's own triggers.
#[derive(Clone)]
pub struct WeakOverlay {
    shared: Weak<OverlayShared>,
}

impl WeakOverlay {
    pub fn upgrade(&self) -> Option<OverlayController> {
        self.shared.upgrade().map(|shared| OverlayController { shared })
    }
}

impl OverlayController {
    /// Build the overlay structure. Nothing is attached until [`open`](Self::open).
    pub fn create(
        options: OverlayOptions,
        timers: Rc<dyn TimerService>,
        exit_delay: Duration,
    ) -> Self {
        let title = options.title.filter(|t| !t.is_empty());
        let header = (title.is_some() || options.show_close_button).then(|| Header {
            title,
            close_button: options.show_close_button,
        });

        let id = OverlayId(NEXT_OVERLAY_ID.fetch_add(1, Ordering::Relaxed));
        tracing::trace!(?id, size = options.size.name(), "overlay created");

        Self {
            shared: Rc::new(OverlayShared {
                id,
                size: options.size,
                class_name: options.class_name.filter(|c| !c.is_empty()),
                close_on_backdrop: options.close_on_backdrop,
                header: RefCell::new(header),
                body: RefCell::new(options.content),
                actions: options.actions,
                state: Cell::new(OverlayState::Closed),
                detached: Cell::new(false),
                opening_timer: Cell::new(None),
                on_close: RefCell::new(options.on_close),
                timers,
                exit_delay,
            }),
        }
    }

    /// Attach to the surface and lock background scrolling.
    ///
    /// No-op unless the overlay is closed and has never been detached.
    pub fn open(&self) {
        let shared = &self.shared;
        if shared.state.get() != OverlayState::Closed || shared.detached.get() {
            tracing::trace!(id = ?shared.id, state = ?shared.state.get(), "open ignored");
            return;
        }
        if !surface::attach_overlay(self) {
            return;
        }
        surface::lock_scroll();
        shared.state.set(OverlayState::Opening);

        let this = self.clone();
        let timer = shared.timers.schedule(
            Duration::ZERO,
            Box::new(move || {
                this.shared.opening_timer.set(None);
                if this.shared.state.get() == OverlayState::Opening {
                    this.shared.state.set(OverlayState::Open);
                }
            }),
        );
        shared.opening_timer.set(Some(timer));
        tracing::debug!(id = ?shared.id, "overlay opened");
    }

    /// Start the exit transition; detach after the exit delay.
    ///
    /// Only the first call while Opening or Open has any effect.
    pub fn close(&self) {
        let shared = &self.shared;
        match shared.state.get() {
            OverlayState::Opening | OverlayState::Open => {}
            OverlayState::Closed | OverlayState::Closing => return,
        }
        if let Some(timer) = shared.opening_timer.take() {
            shared.timers.cancel(timer);
        }
        shared.state.set(OverlayState::Closing);
        tracing::debug!(id = ?shared.id, "overlay closing");

        let this = self.clone();
        shared
            .timers
            .schedule(shared.exit_delay, Box::new(move || this.finish_close()));
    }

    fn finish_close(&self) {
        let shared = &self.shared;
        // A surface reset already dropped this overlay and its lock.
        if surface::detach_overlay(shared.id) {
            surface::unlock_scroll();
        }
        shared.state.set(OverlayState::Closed);
        shared.detached.set(true);
        tracing::debug!(id = ?shared.id, "overlay detached");

        let on_close = shared.on_close.borrow_mut().take();
        if let Some(on_close) = on_close {
            on_close();
        }
    }

    /// Replace the body content without touching the lifecycle.
    pub fn update_content(&self, content: impl Into<Content>) {
        *self.shared.body.borrow_mut() = content.into();
    }

    /// Replace the title text. Returns `false` (and changes nothing) when the
    /// overlay was built without a title.
    pub fn update_title(&self, title: impl Into<String>) -> bool {
        let mut header = self.shared.header.borrow_mut();
        match header.as_mut().and_then(|h| h.title.as_mut()) {
            Some(current) => {
                *current = title.into();
                true
            }
            None => false,
        }
    }

    /// Route a click that originated on `target`. Returns whether it did anything.
    pub fn dispatch_click(&self, target: ClickTarget) -> bool {
        if !self.accepts_input() {
            return false;
        }
        match target {
            ClickTarget::Backdrop if self.shared.close_on_backdrop => {
                self.close();
                true
            }
            ClickTarget::CloseButton if self.has_close_button() => {
                self.close();
                true
            }
            ClickTarget::Action(index) => match self.shared.actions.get(index) {
                Some(action) => {
                    action.click();
                    true
                }
                None => false,
            },
            _ => false,
        }
    }

    /// Route a key press: bound action triggers first, then `Esc` as the
    /// close affordance. Returns whether the key was consumed.
    pub fn handle_key(&self, key: KeyCode) -> bool {
        if !self.accepts_input() {
            return false;
        }
        if let Some(action) = self.shared.actions.iter().find(|a| a.key() == Some(key)) {
            action.click();
            return true;
        }
        if key == KeyCode::Esc && self.has_close_button() {
            self.close();
            return true;
        }
        false
    }

    fn accepts_input(&self) -> bool {
        matches!(
            self.shared.state.get(),
            OverlayState::Opening | OverlayState::Open
        )
    }

    pub fn id(&self) -> OverlayId {
        self.shared.id
    }

    pub fn state(&self) -> OverlayState {
        self.shared.state.get()
    }

    /// Attached to the surface (Opening, Open or Closing).
    pub fn is_attached(&self) -> bool {
        surface::is_attached(self.shared.id)
    }

    /// Whether the overlay finished its exit transition.
    pub fn is_detached(&self) -> bool {
        self.shared.detached.get()
    }

    pub fn size(&self) -> OverlaySize {
        self.shared.size
    }

    pub fn class_name(&self) -> Option<&str> {
        self.shared.class_name.as_deref()
    }

    pub fn close_on_backdrop(&self) -> bool {
        self.shared.close_on_backdrop
    }

    pub fn header(&self) -> Option<Header> {
        self.shared.header.borrow().clone()
    }

    pub fn has_header(&self) -> bool {
        self.shared.header.borrow().is_some()
    }

    pub fn has_close_button(&self) -> bool {
        self.shared
            .header
            .borrow()
            .as_ref()
            .is_some_and(|h| h.close_button)
    }

    pub fn title(&self) -> Option<String> {
        self.shared
            .header
            .borrow()
            .as_ref()
            .and_then(|h| h.title.clone())
    }

    pub fn content(&self) -> Content {
        self.shared.body.borrow().clone()
    }

    pub fn actions(&self) -> &[ActionTrigger] {
        &self.shared.actions
    }

    pub fn has_footer(&self) -> bool {
        !self.shared.actions.is_empty()
    }

    /// Structural class list: base, size, caller class, and `overlay-active`
    /// while entering or shown.
    pub fn classes(&self) -> Vec<String> {
        let mut classes = vec![
            "overlay".to_string(),
            format!("overlay-{}", self.shared.size.name()),
        ];
        if let Some(class_name) = &self.shared.class_name {
            classes.push(class_name.clone());
        }
        if self.accepts_input() {
            classes.push("overlay-active".to_string());
        }
        classes
    }

    pub fn downgrade(&self) -> WeakOverlay {
        WeakOverlay {
            shared: Rc::downgrade(&self.shared),
        }
    }
}

impl fmt::Debug for OverlayController {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OverlayController")
            .field("id", &self.shared.id)
            .field("state", &self.shared.state.get())
            .field("title", &self.title())
            .field("size", &self.shared.size)
            .field("actions", &self.shared.actions.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::timer::Scheduler;

    fn build(options: OverlayOptions) -> (Rc<Scheduler>, OverlayController) {
        surface::reset();
        let scheduler = Rc::new(Scheduler::new());
        let overlay = OverlayController::create(options, scheduler.clone(), DEFAULT_EXIT_DELAY);
        (scheduler, overlay)
    }

    #[test]
    fn test_size_from_name() {
        assert_eq!(OverlaySize::from_name("lg"), OverlaySize::Lg);
        assert_eq!(OverlaySize::from_name(" SM "), OverlaySize::Sm);
        assert_eq!(OverlaySize::from_name("huge"), OverlaySize::Md);
    }

    #[test]
    fn test_header_omitted_without_title_or_close_button() {
        let (_s, overlay) = build(OverlayOptions::new("body").show_close_button(false));
        assert!(!overlay.has_header());
        assert!(!overlay.has_footer());
    }

    #[test]
    fn test_empty_title_counts_as_none() {
        let (_s, overlay) = build(OverlayOptions::new("body").with_title(""));
        assert_eq!(
            overlay.header(),
            Some(Header {
                title: None,
                close_button: true
            })
        );
    }

    #[test]
    fn test_open_goes_through_opening() {
        let (scheduler, overlay) = build(OverlayOptions::new("body"));
        overlay.open();
        assert_eq!(overlay.state(), OverlayState::Opening);
        scheduler.tick();
        assert_eq!(overlay.state(), OverlayState::Open);
    }

    #[test]
    fn test_close_while_opening_cancels_open() {
        let (scheduler, overlay) = build(OverlayOptions::new("body"));
        overlay.open();
        overlay.close();
        scheduler.tick();
        assert_eq!(overlay.state(), OverlayState::Closing);
        scheduler.advance(DEFAULT_EXIT_DELAY);
        assert_eq!(overlay.state(), OverlayState::Closed);
        assert!(!surface::scroll_locked());
    }

    #[test]
    fn test_classes_track_activity() {
        let (scheduler, overlay) =
            build(OverlayOptions::new("body").with_size(OverlaySize::Lg).with_class_name("editor"));
        assert_eq!(overlay.classes(), vec!["overlay", "overlay-lg", "editor"]);
        overlay.open();
        scheduler.tick();
        assert_eq!(
            overlay.classes(),
            vec!["overlay", "overlay-lg", "editor", "overlay-active"]
        );
    }

    #[test]
    fn test_click_ignored_when_closed() {
        let (_s, overlay) = build(OverlayOptions::new("body"));
        assert!(!overlay.dispatch_click(ClickTarget::Backdrop));
        assert_eq!(overlay.state(), OverlayState::Closed);
    }

    #[test]
    fn test_click_on_content_does_not_close() {
        let (scheduler, overlay) = build(OverlayOptions::new("body"));
        overlay.open();
        scheduler.tick();
        for target in [
            ClickTarget::Panel,
            ClickTarget::Header,
            ClickTarget::Title,
            ClickTarget::Body,
            ClickTarget::Footer,
        ] {
            assert!(!overlay.dispatch_click(target));
        }
        assert_eq!(overlay.state(), OverlayState::Open);
    }

    #[test]
    fn test_escape_closes_only_with_close_button() {
        let (scheduler, overlay) = build(OverlayOptions::new("body").show_close_button(false));
        overlay.open();
        scheduler.tick();
        assert!(!overlay.handle_key(KeyCode::Esc));
        assert_eq!(overlay.state(), OverlayState::Open);

        let (scheduler, overlay) = build(OverlayOptions::new("body"));
        overlay.open();
        scheduler.tick();
        assert!(overlay.handle_key(KeyCode::Esc));
        assert_eq!(overlay.state(), OverlayState::Closing);
    }

    #[test]
    fn test_weak_handle_does_not_keep_alive() {
        let (_s, overlay) = build(OverlayOptions::new("body"));
        let weak = overlay.downgrade();
        assert!(weak.upgrade().is_some());
        drop(overlay);
        assert!(weak.upgrade().is_none());
    }
}
