//! Overlay Kit - modal overlays, toast notifications and confirmation dialogs.
//!
//! The controllers are headless state machines driven by a [`timer::TimerService`];
//! the [`ui`] module draws the shared [`surface`] with ratatui.

pub mod app;
pub mod config;
pub mod confirm;
pub mod content;
pub mod input;
pub mod kit;
pub mod notification;
pub mod overlay;
pub mod surface;
pub mod timer;
pub mod ui;

pub use confirm::{ConfirmOptions, Confirmation};
pub use content::{ActionTrigger, ButtonVariant, Content};
pub use kit::OverlayKit;
pub use notification::{
    NotificationCategory, NotificationHandle, NotificationOptions, NotificationState, Position,
};
pub use overlay::{ClickTarget, OverlayController, OverlayOptions, OverlaySize, OverlayState};
pub use timer::{Scheduler, SystemClock, TimerService};
