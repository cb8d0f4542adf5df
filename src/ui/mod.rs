//! Terminal rendering of the surface.
//!
//! This module contains:
//! - Overlay panel layout, rendering and hit-testing
//! - Notification stack layout and rendering
//! - Click routing from terminal cells to overlays and toasts
//! - The demo screen

pub mod overlay;
mod render;
pub mod toast;

use crossterm::event::KeyCode;
use ratatui::{layout::Rect, Frame};

use crate::config::ThemeConfig;
use crate::notification::NotificationId;
use crate::overlay::{ClickTarget, OverlayId};
use crate::surface;

pub use overlay::{render_overlay, OverlayLayout};
pub use render::ui;
pub use toast::{render_toasts, ToastHit, ToastSlot};

/// What a click on the surface landed on. Toasts sit above overlays.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SurfaceHit {
    Toast(ToastHit),
    Overlay(OverlayId, ClickTarget),
    Nothing,
}

/// Render every attached overlay (bottom first), then the notification stack.
pub fn render_surface(f: &mut Frame, area: Rect, theme: &ThemeConfig) {
    for overlay in surface::overlays() {
        render_overlay(f, &overlay, area, theme);
    }
    if let Some(container) = surface::existing_container() {
        render_toasts(f, &container, area, theme);
    }
}

/// Classify a click. Only the top overlay receives clicks.
pub fn hit_test(area: Rect, column: u16, row: u16) -> SurfaceHit {
    if let Some(container) = surface::existing_container() {
        if let Some(hit) = toast::hit_test(&container, area, column, row) {
            return SurfaceHit::Toast(hit);
        }
    }
    match surface::top_overlay() {
        Some(top) => SurfaceHit::Overlay(top.id(), overlay::hit_test(&top, area, column, row)),
        None => SurfaceHit::Nothing,
    }
}

/// Route a click to whatever it hit. Returns whether anything reacted.
pub fn dispatch_click(area: Rect, column: u16, row: u16) -> bool {
    match hit_test(area, column, row) {
        SurfaceHit::Toast(ToastHit {
            id,
            close_button: true,
        }) => click_toast_close(id),
        SurfaceHit::Toast(_) => false,
        SurfaceHit::Overlay(_, target) => surface::top_overlay()
            .map(|top| top.dispatch_click(target))
            .unwrap_or(false),
        SurfaceHit::Nothing => false,
    }
}

fn click_toast_close(id: NotificationId) -> bool {
    let record = surface::existing_container().and_then(|container| container.get(id));
    match record.as_ref().and_then(|r| r.close_trigger()) {
        Some(trigger) => {
            trigger.click();
            true
        }
        None => false,
    }
}

/// Offer a key press to the top overlay. Returns whether it was consumed.
pub fn dispatch_key(key: KeyCode) -> bool {
    surface::top_overlay()
        .map(|top| top.handle_key(key))
        .unwrap_or(false)
}
