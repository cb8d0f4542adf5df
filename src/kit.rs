//! Construction API handed to the components that build content and actions.

use std::rc::Rc;
use std::time::Duration;

use crate::config::Config;
use crate::confirm::{self, ConfirmOptions, Confirmation};
use crate::content::Content;
use crate::notification::{self, NotificationCategory, NotificationHandle, NotificationOptions};
use crate::overlay::{OverlayController, OverlayOptions};
use crate::surface;
use crate::timer::TimerService;

/// Binds a timer service and configuration to the overlay, notification and
/// confirmation entry points.
#[derive(Clone)]
pub struct OverlayKit {
    timers: Rc<dyn TimerService>,
    config: Config,
}

impl OverlayKit {
    pub fn new(timers: Rc<dyn TimerService>, config: Config) -> Self {
        Self { timers, config }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn timers(&self) -> &Rc<dyn TimerService> {
        &self.timers
    }

    /// Overlay options seeded from the `[overlay]` config section.
    pub fn overlay_options(&self, content: impl Into<Content>) -> OverlayOptions {
        let overlay = &self.config.overlay;
        OverlayOptions::new(content)
            .with_size(overlay.size)
            .close_on_backdrop(overlay.close_on_backdrop)
            .show_close_button(overlay.show_close_button)
    }

    /// Build an overlay. It stays detached until `open()`.
    pub fn create_overlay(&self, options: OverlayOptions) -> OverlayController {
        OverlayController::create(options, self.timers.clone(), self.config.overlay.exit_delay())
    }

    /// Notification options seeded from the `[notification]` config section.
    pub fn notification_options(&self, message: impl Into<String>) -> NotificationOptions {
        let config = &self.config.notification;
        NotificationOptions::new(message)
            .with_duration(config.duration())
            .with_position(config.position)
            .dismissible(config.dismissible)
            .icon(config.icon)
    }

    pub fn show_notification(&self, options: NotificationOptions) -> NotificationHandle {
        surface::container().set_max_visible(self.config.notification.max_visible);
        notification::show(
            options,
            self.timers.clone(),
            self.config.notification.exit_delay(),
        )
    }

    fn notify(
        &self,
        category: NotificationCategory,
        message: impl Into<String>,
        duration: Option<Duration>,
    ) -> NotificationHandle {
        let mut options = self.notification_options(message).with_category(category);
        if let Some(duration) = duration {
            options = options.with_duration(duration);
        }
        self.show_notification(options)
    }

    /// Success notification; `None` uses the configured duration.
    pub fn success(&self, message: impl Into<String>, duration: Option<Duration>) -> NotificationHandle {
        self.notify(NotificationCategory::Success, message, duration)
    }

    /// Error notification; `None` uses the configured duration.
    pub fn error(&self, message: impl Into<String>, duration: Option<Duration>) -> NotificationHandle {
        self.notify(NotificationCategory::Error, message, duration)
    }

    /// Warning notification; `None` uses the configured duration.
    pub fn warning(&self, message: impl Into<String>, duration: Option<Duration>) -> NotificationHandle {
        self.notify(NotificationCategory::Warning, message, duration)
    }

    /// Info notification; `None` uses the configured duration.
    pub fn info(&self, message: impl Into<String>, duration: Option<Duration>) -> NotificationHandle {
        self.notify(NotificationCategory::Info, message, duration)
    }

    /// Open a confirmation dialog and return its pending answer.
    pub fn confirm(&self, options: ConfirmOptions) -> Confirmation {
        confirm::open_with(options, |overlay| self.create_overlay(overlay))
    }
}

impl std::fmt::Debug for OverlayKit {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OverlayKit")
            .field("now", &self.timers.now())
            .field("config", &self.config)
            .finish()
    }
}
