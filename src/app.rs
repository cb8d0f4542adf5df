//! Demo application state: an activity log behind the overlays and toasts.

use std::cell::RefCell;
use std::rc::Rc;
use std::time::Duration;

use crossterm::event::KeyCode;
use ratatui::{
    style::{Color, Modifier, Style},
    text::{Line, Span},
};

use crate::config::Config;
use crate::confirm::{ConfirmOptions, Confirmation};
use crate::content::{ActionTrigger, ButtonVariant, Content};
use crate::kit::OverlayKit;
use crate::notification::{NotificationCategory, NotificationHandle, NotificationState, Position};
use crate::overlay::{OverlayController, WeakOverlay};
use crate::surface;
use crate::timer::{Scheduler, SystemClock};

/// Events raised by trigger listeners and drained by the app each frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppEvent {
    EditorSaved,
    EditorRenamed,
    EditorClosed,
}

/// What a pending confirmation is asking about.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfirmPurpose {
    ClearLog,
    Quit,
}

/// Demo application state.
pub struct App {
    pub scheduler: Rc<Scheduler>,
    clock: Option<SystemClock>,
    pub kit: OverlayKit,
    /// Background content; does not scroll while an overlay is attached
    pub log: Vec<String>,
    pub scroll_offset: usize,
    pub persistent: Option<NotificationHandle>,
    pub editor: Option<OverlayController>,
    pub pending_confirm: Option<(Confirmation, ConfirmPurpose)>,
    pub should_quit: bool,
    events: Rc<RefCell<Vec<AppEvent>>>,
    position_index: usize,
    saves: usize,
    renames: usize,
}

impl App {
    /// App driven by wall-clock time.
    pub fn new(config: Config) -> Self {
        let mut app = Self::with_scheduler(Rc::new(Scheduler::new()), config);
        app.clock = Some(SystemClock::start());
        app
    }

    /// App driven by a caller-controlled scheduler.
    pub fn with_scheduler(scheduler: Rc<Scheduler>, config: Config) -> Self {
        let position_index = Position::ALL
            .iter()
            .position(|p| *p == config.notification.position)
            .unwrap_or(2);
        Self {
            kit: OverlayKit::new(scheduler.clone(), config),
            scheduler,
            clock: None,
            log: vec!["Welcome. Key bindings are listed in the footer.".to_string()],
            scroll_offset: 0,
            persistent: None,
            editor: None,
            pending_confirm: None,
            should_quit: false,
            events: Rc::new(RefCell::new(Vec::new())),
            position_index,
            saves: 0,
            renames: 0,
        }
    }

    /// Advance timers, then react to trigger events and answered confirmations.
    pub fn tick(&mut self) {
        match self.clock {
            Some(clock) => self.scheduler.advance_to(clock.elapsed()),
            None => self.scheduler.tick(),
        };
        self.process_events();
        self.process_confirmation();
    }

    pub fn record(&mut self, entry: impl Into<String>) {
        self.log.push(entry.into());
    }

    /// Show a notification of the given category.
    pub fn notify(&mut self, category: NotificationCategory) {
        let message = match category {
            NotificationCategory::Success => "Changes saved",
            NotificationCategory::Error => "Could not reach the server",
            NotificationCategory::Warning => "Disk space is running low",
            NotificationCategory::Info => "A new version is available",
        };
        let options = self
            .kit
            .notification_options(message)
            .with_category(category)
            .with_position(self.position());
        self.kit.show_notification(options);
        self.record(format!("{} notification shown", category.name()));
    }

    /// Show or dismiss the persistent notification.
    pub fn toggle_persistent(&mut self) {
        let live = self
            .persistent
            .as_ref()
            .filter(|h| h.state() != NotificationState::Removed)
            .cloned();
        match live {
            Some(handle) => {
                handle.close();
                self.persistent = None;
                self.record("persistent notification dismissed");
            }
            None => {
                let options = self
                    .kit
                    .notification_options("Sync paused until you dismiss this")
                    .with_category(NotificationCategory::Warning)
                    .with_position(self.position())
                    .persistent();
                self.persistent = Some(self.kit.show_notification(options));
                self.record("persistent notification shown");
            }
        }
    }

    /// Close the most recent notification that is still on screen.
    pub fn dismiss_newest(&mut self) {
        let newest = surface::existing_container().and_then(|container| {
            container
                .records()
                .into_iter()
                .rev()
                .find(|r| r.state() == NotificationState::Visible)
        });
        if let Some(record) = newest {
            record.close();
            self.record(format!("notification {:?} dismissed", record.id()));
        }
    }

    pub fn position(&self) -> Position {
        Position::ALL[self.position_index]
    }

    /// Move the notification stack to the next placement.
    pub fn cycle_position(&mut self) {
        self.position_index = (self.position_index + 1) % Position::ALL.len();
        let position = self.position();
        surface::container().set_position(position);
        self.record(format!("notifications moved to {}", position.name()));
    }

    /// Open the editor overlay unless one is already attached.
    pub fn open_editor(&mut self) {
        if self.editor.as_ref().is_some_and(|e| e.is_attached()) {
            return;
        }
        let cancel = ActionTrigger::new("Cancel")
            .with_variant(ButtonVariant::Secondary)
            .with_key(KeyCode::Char('n'));
        let rename = ActionTrigger::new("Rename")
            .with_variant(ButtonVariant::Outline)
            .with_key(KeyCode::Char('r'));
        let save = ActionTrigger::new("Save").with_key(KeyCode::Enter);

        let events = self.events.clone();
        let options = self
            .kit
            .overlay_options(editor_content(self.saves, self.renames))
            .with_title("Edit")
            .with_actions(vec![cancel.clone(), rename.clone(), save.clone()])
            .with_class_name("editor")
            .on_close(move || events.borrow_mut().push(AppEvent::EditorClosed));
        let editor = self.kit.create_overlay(options);

        let weak = editor.downgrade();
        self.on_trigger(&cancel, weak.clone(), None, true);
        self.on_trigger(&rename, weak.clone(), Some(AppEvent::EditorRenamed), false);
        self.on_trigger(&save, weak, Some(AppEvent::EditorSaved), true);

        editor.open();
        self.editor = Some(editor);
        self.record("editor opened");
    }

    fn on_trigger(
        &self,
        trigger: &ActionTrigger,
        overlay: WeakOverlay,
        event: Option<AppEvent>,
        closes: bool,
    ) {
        let events = self.events.clone();
        trigger.on_click(move || {
            if let Some(event) = event {
                events.borrow_mut().push(event);
            }
            if closes {
                if let Some(overlay) = overlay.upgrade() {
                    overlay.close();
                }
            }
        });
    }

    /// Ask before clearing the log.
    pub fn confirm_clear_log(&mut self) {
        self.ask(
            ConfirmOptions::new("Clear the activity log?")
                .with_title("Clear log")
                .with_confirm_text("Clear")
                .with_variant(ButtonVariant::Danger),
            ConfirmPurpose::ClearLog,
        );
    }

    /// Ask before quitting.
    pub fn confirm_quit(&mut self) {
        self.ask(
            ConfirmOptions::new("Quit the demo?").with_confirm_text("Quit"),
            ConfirmPurpose::Quit,
        );
    }

    fn ask(&mut self, options: ConfirmOptions, purpose: ConfirmPurpose) {
        if self.pending_confirm.is_some() {
            return;
        }
        self.pending_confirm = Some((self.kit.confirm(options), purpose));
    }

    fn process_events(&mut self) {
        let events: Vec<AppEvent> = self.events.borrow_mut().drain(..).collect();
        for event in events {
            match event {
                AppEvent::EditorSaved => {
                    self.saves += 1;
                    self.kit.success("Document saved", None);
                    self.record("editor saved");
                }
                AppEvent::EditorRenamed => {
                    self.renames += 1;
                    if let Some(editor) = &self.editor {
                        editor.update_title(format!("Edit (draft {})", self.renames + 1));
                        editor.update_content(editor_content(self.saves, self.renames));
                    }
                    self.record("editor renamed");
                }
                AppEvent::EditorClosed => {
                    self.editor = None;
                    self.record("editor closed");
                }
            }
        }
    }

    fn process_confirmation(&mut self) {
        let Some((confirmation, purpose)) = self.pending_confirm.as_mut() else {
            return;
        };
        let Some(answer) = confirmation.try_result() else {
            return;
        };
        let purpose = *purpose;
        self.pending_confirm = None;
        match (purpose, answer) {
            (ConfirmPurpose::ClearLog, true) => {
                self.log.clear();
                self.scroll_offset = 0;
                self.kit.info("Activity log cleared", Some(Duration::from_millis(1500)));
            }
            (ConfirmPurpose::Quit, true) => self.should_quit = true,
            (_, false) => self.record(format!("{:?} cancelled", purpose)),
        }
    }

    /// Scroll the log. Ignored while an overlay holds the scroll lock.
    pub fn scroll_by(&mut self, delta: isize) {
        if surface::scroll_locked() {
            return;
        }
        let max = self.log.len().saturating_sub(1);
        self.scroll_offset = self.scroll_offset.saturating_add_signed(delta).min(max);
    }
}

fn editor_content(saves: usize, renames: usize) -> Content {
    Content::lines(vec![
        Line::from(vec![
            Span::styled("Document: ", Style::default().fg(Color::Gray)),
            Span::styled(
                "notes.md",
                Style::default().fg(Color::White).add_modifier(Modifier::BOLD),
            ),
        ]),
        Line::from(format!("Saved {} time(s), renamed {} time(s).", saves, renames)),
        Line::from(""),
        Line::from("Enter saves, r renames, n or Esc cancels."),
    ])
}
