//! Rendering tests for the surface.
//!
//! Uses ratatui's TestBackend to render to a virtual terminal buffer, then
//! checks rows of plain text.

use std::rc::Rc;
use std::time::Duration;

use insta::assert_snapshot;
use overlay_kit::config::{Config, ThemeConfig};
use overlay_kit::ui::{self, SurfaceHit};
use overlay_kit::{
    surface, ClickTarget, ConfirmOptions, NotificationOptions, NotificationState, OverlayKit,
    OverlayOptions, OverlayState, Position, Scheduler,
};
use ratatui::{backend::TestBackend, layout::Rect, Terminal};

const TERMINAL_WIDTH: u16 = 60;
const TERMINAL_HEIGHT: u16 = 20;

fn kit() -> (Rc<Scheduler>, OverlayKit) {
    surface::reset();
    let scheduler = Rc::new(Scheduler::new());
    let kit = OverlayKit::new(scheduler.clone(), Config::default());
    (scheduler, kit)
}

fn area() -> Rect {
    Rect::new(0, 0, TERMINAL_WIDTH, TERMINAL_HEIGHT)
}

/// Render the surface and return each row as plain text (no styling).
fn render_rows() -> Vec<String> {
    render_rows_sized(TERMINAL_WIDTH, TERMINAL_HEIGHT)
}

fn render_rows_sized(width: u16, height: u16) -> Vec<String> {
    let backend = TestBackend::new(width, height);
    let mut terminal = Terminal::new(backend).unwrap();
    let theme = ThemeConfig::default();
    terminal
        .draw(|f| {
            let area = f.size();
            ui::render_surface(f, area, &theme);
        })
        .unwrap();

    let buffer = terminal.backend().buffer();
    (0..buffer.area().height)
        .map(|y| {
            (0..buffer.area().width)
                .map(|x| buffer.get(x, y).symbol().to_string())
                .collect::<String>()
        })
        .collect()
}

// ─────────────────────────────────────────────────────────────────────────────
// Notifications
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn toast_top_right() {
    let (scheduler, kit) = kit();
    kit.success("Saved", Some(Duration::from_millis(1000)));
    scheduler.tick();

    let rows = render_rows();
    assert_snapshot!(rows[1].trim(), @"┌──────────────────────────────────────┐");
    assert_snapshot!(rows[2].trim(), @"│[+] Saved                           × │");
}

#[test]
fn pending_toast_not_drawn() {
    let (_scheduler, kit) = kit();
    kit.info("Soon", None);
    let rows = render_rows();
    assert!(rows.iter().all(|row| row.trim().is_empty()));
}

#[test]
fn toast_without_icon_or_close() {
    let (scheduler, kit) = kit();
    kit.show_notification(
        NotificationOptions::new("Plain")
            .icon(false)
            .dismissible(false)
            .with_position(Position::TopLeft),
    );
    scheduler.tick();

    let rows = render_rows();
    assert!(rows[2].starts_with("  │Plain "));
    assert!(!rows[2].contains('×'));
}

#[test]
fn toast_stack_bottom_keeps_order() {
    let (scheduler, kit) = kit();
    kit.show_notification(NotificationOptions::new("older").with_position(Position::BottomRight));
    kit.show_notification(NotificationOptions::new("newer").with_position(Position::BottomRight));
    scheduler.tick();

    let rows = render_rows();
    let older = rows.iter().position(|r| r.contains("older")).unwrap();
    let newer = rows.iter().position(|r| r.contains("newer")).unwrap();
    assert!(older < newer);
    assert_eq!(newer, (TERMINAL_HEIGHT - 3) as usize);
}

#[test]
fn toast_in_tiny_frame() {
    let (scheduler, kit) = kit();
    kit.show_notification(NotificationOptions::new("hi"));
    scheduler.tick();

    let rows = render_rows_sized(5, 10);
    assert_eq!(rows.len(), 10);
    assert!(rows.iter().all(|row| !row.contains('×')));
}

#[test]
fn toast_close_click_dismisses() {
    let (scheduler, kit) = kit();
    let handle = kit.info("Click me", None);
    scheduler.tick();

    // Close glyph of the first top-right toast.
    assert_eq!(
        ui::hit_test(area(), 55, 2),
        SurfaceHit::Toast(ui::ToastHit {
            id: handle.id(),
            close_button: true
        })
    );
    assert!(ui::dispatch_click(area(), 55, 2));
    assert_eq!(handle.state(), NotificationState::Closing);
}

#[test]
fn toast_body_click_does_nothing() {
    let (scheduler, kit) = kit();
    let handle = kit.info("Click me", None);
    scheduler.tick();
    assert!(!ui::dispatch_click(area(), 25, 2));
    assert_eq!(handle.state(), NotificationState::Visible);
}

// ─────────────────────────────────────────────────────────────────────────────
// Overlays
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn confirm_dialog_layout() {
    let (scheduler, kit) = kit();
    let _confirmation = kit.confirm(ConfirmOptions::default());
    scheduler.tick();

    let rows = render_rows();
    assert_eq!(rows[8].trim(), "│Confirm             × │");
    assert_eq!(rows[9].trim(), "│Are you sure?         │");
    assert_eq!(rows[11].trim(), "│[ Cancel ] [ Confirm ]│");
}

#[test]
fn overlay_click_routing() {
    let (scheduler, kit) = kit();
    let overlay = kit.create_overlay(OverlayOptions::new("Body text").with_title("Edit"));
    overlay.open();
    scheduler.tick();

    assert_eq!(
        ui::hit_test(area(), 30, 10),
        SurfaceHit::Overlay(overlay.id(), ClickTarget::Body)
    );
    assert!(!ui::dispatch_click(area(), 30, 10));
    assert_eq!(overlay.state(), OverlayState::Open);

    assert!(ui::dispatch_click(area(), 0, 0));
    assert_eq!(overlay.state(), OverlayState::Closing);
}

#[test]
fn toasts_take_clicks_before_overlay() {
    let (scheduler, kit) = kit();
    let overlay = kit.create_overlay(OverlayOptions::new("x"));
    overlay.open();
    let handle = kit.info("On top", None);
    scheduler.tick();

    assert!(ui::dispatch_click(area(), 55, 2));
    assert_eq!(handle.state(), NotificationState::Closing);
    assert_eq!(overlay.state(), OverlayState::Open);
}

#[test]
fn detached_overlay_not_drawn() {
    let (scheduler, kit) = kit();
    let overlay = kit.create_overlay(OverlayOptions::new("Gone soon").with_title("Bye"));
    overlay.open();
    scheduler.tick();
    assert!(render_rows().iter().any(|r| r.contains("Bye")));

    overlay.close();
    scheduler.advance(Duration::from_millis(300));
    assert!(render_rows().iter().all(|r| !r.contains("Bye")));
}
