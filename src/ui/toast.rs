//! Notification stack rendering.
//!
//! Toasts stack in display order (oldest first) at the container position.
//! Pending records keep their slot but are not drawn yet, so the stack does
//! not jump when they appear.

use ratatui::{
    layout::Rect,
    style::{Color, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph},
    Frame,
};

use crate::config::ThemeConfig;
use crate::notification::{
    NotificationCategory, NotificationContainer, NotificationHandle, NotificationId,
    NotificationState, Position,
};

use super::overlay::{contains, CLOSE_GLYPH};

const TOAST_WIDTH: u16 = 40;
const TOAST_HEIGHT: u16 = 3; // Border + content + border

/// Where one toast is drawn.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToastSlot {
    pub id: NotificationId,
    pub area: Rect,
    pub close_button: Option<Rect>,
}

/// What a click on the toast stack hit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ToastHit {
    pub id: NotificationId,
    pub close_button: bool,
}

/// Slots for every record in the container that fits in `area`.
pub fn toast_layout(container: &NotificationContainer, area: Rect) -> Vec<ToastSlot> {
    let records = container.records();
    let width = TOAST_WIDTH.min(area.width.saturating_sub(4));
    if records.is_empty() || width == 0 {
        return Vec::new();
    }

    let position = container.position();
    let x = match position {
        Position::TopLeft | Position::MiddleLeft | Position::BottomLeft => area.x + 2,
        Position::TopCenter | Position::BottomCenter => area.x + (area.width - width) / 2,
        Position::TopRight | Position::MiddleRight | Position::BottomRight => {
            area.x + area.width - width - 2
        }
    };

    let count = records.len() as u16;
    let stack_height = count.saturating_mul(TOAST_HEIGHT);
    let start_y = match position {
        Position::TopLeft | Position::TopCenter | Position::TopRight => area.y as i32 + 1,
        Position::MiddleLeft | Position::MiddleRight => {
            area.y as i32 + (area.height as i32 - stack_height as i32) / 2
        }
        Position::BottomLeft | Position::BottomCenter | Position::BottomRight => {
            area.bottom() as i32 - 1 - stack_height as i32
        }
    };

    records
        .iter()
        .enumerate()
        .filter_map(|(i, record)| {
            let y = start_y + (i as i32) * TOAST_HEIGHT as i32;
            // Don't render if it would go off screen
            if y < area.y as i32 || y + TOAST_HEIGHT as i32 > area.bottom() as i32 {
                return None;
            }
            let toast_area = Rect::new(x, y as u16, width, TOAST_HEIGHT);
            let close_width = CLOSE_GLYPH.chars().count() as u16;
            // The glyph sits inside the right border; narrow toasts go without it.
            let close_button = (record.is_dismissible() && width > close_width + 1).then(|| {
                Rect::new(toast_area.right() - 1 - close_width, toast_area.y + 1, close_width, 1)
            });
            Some(ToastSlot {
                id: record.id(),
                area: toast_area,
                close_button,
            })
        })
        .collect()
}

/// Find the toast under (`column`, `row`).
pub fn hit_test(
    container: &NotificationContainer,
    area: Rect,
    column: u16,
    row: u16,
) -> Option<ToastHit> {
    toast_layout(container, area)
        .into_iter()
        .find(|slot| contains(slot.area, column, row))
        .map(|slot| ToastHit {
            id: slot.id,
            close_button: slot
                .close_button
                .is_some_and(|close| contains(close, column, row)),
        })
}

fn category_color(category: NotificationCategory, theme: &ThemeConfig) -> Color {
    let rgb = match category {
        NotificationCategory::Success => &theme.success,
        NotificationCategory::Error => &theme.error,
        NotificationCategory::Warning => &theme.warning,
        NotificationCategory::Info => &theme.info,
    };
    ThemeConfig::to_color(rgb)
}

/// Truncate to `max` characters, marking the cut with "...".
fn truncate(message: &str, max: usize) -> String {
    if message.chars().count() <= max {
        return message.to_string();
    }
    let kept: String = message.chars().take(max.saturating_sub(3)).collect();
    format!("{}...", kept)
}

fn toast_line(record: &NotificationHandle, text_width: usize, color: Color) -> Line<'static> {
    let mut spans = Vec::new();
    let mut budget = text_width;
    if record.shows_icon() {
        let prefix = record.category().prefix();
        spans.push(Span::styled(prefix, Style::default().fg(color)));
        spans.push(Span::raw(" "));
        budget = budget.saturating_sub(prefix.len() + 1);
    }
    spans.push(Span::styled(
        truncate(record.message(), budget),
        Style::default().fg(Color::White),
    ));
    Line::from(spans)
}

/// Render the notification stack.
pub fn render_toasts(f: &mut Frame, container: &NotificationContainer, area: Rect, theme: &ThemeConfig) {
    for slot in toast_layout(container, area) {
        let Some(record) = container.get(slot.id) else {
            continue;
        };
        let color = match record.state() {
            NotificationState::Pending | NotificationState::Removed => continue,
            NotificationState::Visible => category_color(record.category(), theme),
            NotificationState::Closing => Color::DarkGray,
        };

        // Clear the area behind the toast
        f.render_widget(Clear, slot.area);
        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(color))
            .style(Style::default().bg(ThemeConfig::to_color(&theme.toast_bg)));
        let inner = block.inner(slot.area);
        f.render_widget(block, slot.area);

        let close_width = slot.close_button.map_or(0, |close| close.width);
        let text_area = Rect::new(inner.x, inner.y, inner.width.saturating_sub(close_width), 1);
        let line = toast_line(&record, text_area.width as usize, color);
        f.render_widget(Paragraph::new(line), text_area);

        if let Some(close) = slot.close_button {
            f.render_widget(
                Paragraph::new(CLOSE_GLYPH).style(Style::default().fg(Color::Gray)),
                close,
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truncate_short_message_untouched() {
        assert_eq!(truncate("Saved", 10), "Saved");
    }

    #[test]
    fn test_truncate_counts_chars_not_bytes() {
        assert_eq!(truncate("héllo wörld", 8), "héllo...");
    }

    #[test]
    fn test_layout_empty_container() {
        let container = NotificationContainer::new();
        assert!(toast_layout(&container, Rect::new(0, 0, 80, 24)).is_empty());
    }

    #[test]
    fn test_narrow_area_drops_close_button() {
        crate::surface::reset();
        let scheduler = std::rc::Rc::new(crate::timer::Scheduler::new());
        crate::notification::show(
            crate::notification::NotificationOptions::new("hi"),
            scheduler.clone(),
            std::time::Duration::from_millis(300),
        );
        let container = crate::surface::container();

        let slots = toast_layout(&container, Rect::new(0, 0, 5, 10));
        assert_eq!(slots.len(), 1);
        assert_eq!(slots[0].area.width, 1);
        assert_eq!(slots[0].close_button, None);

        let slots = toast_layout(&container, Rect::new(0, 0, 60, 10));
        assert_eq!(slots[0].close_button, Some(Rect::new(54, 2, 3, 1)));
    }
}
