use std::io;
use std::time::Duration;

use crossterm::event::{
    self, Event, KeyCode, KeyEventKind, KeyModifiers, MouseButton, MouseEvent, MouseEventKind,
};
use ratatui::{backend::Backend, layout::Rect, Terminal};

use crate::app::App;
use crate::config::Config;
use crate::notification::NotificationCategory;
use crate::surface;
use crate::ui;

/// Result of handling an input event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HandleResult {
    /// Continue running the app
    Continue,
    /// Exit the app
    Exit,
}

/// Poll interval while timers are pending, so transitions land on time.
const ACTIVE_POLL_MS: u64 = 16;

/// Run the main application loop.
pub fn run_app<B: Backend>(
    terminal: &mut Terminal<B>,
    app: &mut App,
    config: &Config,
) -> io::Result<()> {
    loop {
        app.tick();
        if app.should_quit {
            return Ok(());
        }

        terminal.draw(|f| ui::ui(f, app, config))?;
        let area = terminal.size()?;

        let timeout = if app.scheduler.pending() > 0 {
            Duration::from_millis(ACTIVE_POLL_MS)
        } else {
            Duration::from_millis(config.behavior.idle_poll_ms)
        };

        if event::poll(timeout)? {
            let result = match event::read()? {
                Event::Key(key) if key.kind == KeyEventKind::Press => {
                    handle_key_event(app, key.code, key.modifiers, config)
                }
                Event::Mouse(mouse) => handle_mouse_event(app, mouse, area),
                _ => HandleResult::Continue,
            };
            if result == HandleResult::Exit {
                return Ok(());
            }
        }
    }
}

/// Handle a key event and return whether to continue or exit.
pub fn handle_key_event(
    app: &mut App,
    code: KeyCode,
    modifiers: KeyModifiers,
    config: &Config,
) -> HandleResult {
    // Global shortcut (works even behind an overlay)
    if code == KeyCode::Char('c') && modifiers.contains(KeyModifiers::CONTROL) {
        return HandleResult::Exit;
    }

    // The top overlay gets first pick; everything else is blocked behind it.
    if ui::dispatch_key(code) || surface::top_overlay().is_some() {
        return HandleResult::Continue;
    }

    let page = config.behavior.scroll_page_size as isize;
    match code {
        KeyCode::Char('s') => app.notify(NotificationCategory::Success),
        KeyCode::Char('e') => app.notify(NotificationCategory::Error),
        KeyCode::Char('w') => app.notify(NotificationCategory::Warning),
        KeyCode::Char('i') => app.notify(NotificationCategory::Info),
        KeyCode::Char('p') => app.toggle_persistent(),
        KeyCode::Char('x') => app.dismiss_newest(),
        KeyCode::Char('o') => app.cycle_position(),
        KeyCode::Char('m') => app.open_editor(),
        KeyCode::Char('c') => app.confirm_clear_log(),
        KeyCode::Char('q') => app.confirm_quit(),
        KeyCode::Up => app.scroll_by(-1),
        KeyCode::Down => app.scroll_by(1),
        KeyCode::PageUp => app.scroll_by(-page),
        KeyCode::PageDown => app.scroll_by(page),
        _ => {}
    }
    HandleResult::Continue
}

/// Route mouse clicks to the surface and wheel scrolling to the log.
pub fn handle_mouse_event(app: &mut App, mouse: MouseEvent, area: Rect) -> HandleResult {
    match mouse.kind {
        MouseEventKind::Down(MouseButton::Left) => {
            ui::dispatch_click(area, mouse.column, mouse.row);
        }
        MouseEventKind::ScrollUp => app.scroll_by(-1),
        MouseEventKind::ScrollDown => app.scroll_by(1),
        _ => {}
    }
    HandleResult::Continue
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::overlay::OverlayState;
    use crate::timer::Scheduler;
    use std::rc::Rc;

    fn app() -> App {
        surface::reset();
        App::with_scheduler(Rc::new(Scheduler::new()), Config::default())
    }

    fn press(app: &mut App, code: KeyCode) -> HandleResult {
        handle_key_event(app, code, KeyModifiers::NONE, &Config::default())
    }

    #[test]
    fn test_ctrl_c_exits() {
        let mut app = app();
        let result = handle_key_event(
            &mut app,
            KeyCode::Char('c'),
            KeyModifiers::CONTROL,
            &Config::default(),
        );
        assert_eq!(result, HandleResult::Exit);
    }

    #[test]
    fn test_notification_keys() {
        let mut app = app();
        press(&mut app, KeyCode::Char('s'));
        press(&mut app, KeyCode::Char('e'));
        assert_eq!(surface::container().len(), 2);
    }

    #[test]
    fn test_keys_blocked_behind_overlay() {
        let mut app = app();
        press(&mut app, KeyCode::Char('m'));
        app.tick();
        press(&mut app, KeyCode::Char('s'));
        assert!(surface::existing_container().is_none());
    }

    #[test]
    fn test_backdrop_click_closes_editor() {
        let mut app = app();
        press(&mut app, KeyCode::Char('m'));
        app.tick();
        let editor = app.editor.clone().unwrap();

        let mouse = MouseEvent {
            kind: MouseEventKind::Down(MouseButton::Left),
            column: 0,
            row: 0,
            modifiers: KeyModifiers::NONE,
        };
        handle_mouse_event(&mut app, mouse, Rect::new(0, 0, 100, 40));
        assert_eq!(editor.state(), OverlayState::Closing);
    }
}
