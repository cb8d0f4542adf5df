//! Overlay rendering and hit-testing.
//!
//! [`OverlayLayout`] is the single source of geometry: the renderer draws
//! into it and [`hit_test`] classifies clicks against it, so a click lands on
//! exactly what the user sees.

use ratatui::{
    layout::{Constraint, Layout, Margin, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Wrap},
    Frame,
};

use crate::config::ThemeConfig;
use crate::content::{ActionTrigger, ButtonVariant, Content};
use crate::overlay::{ClickTarget, OverlayController, OverlayState};

/// Glyph of the close affordance, padded to a 3-cell hit area.
pub const CLOSE_GLYPH: &str = " × ";

const MIN_PANEL_WIDTH: u16 = 24;
const MIN_PANEL_HEIGHT: u16 = 6;

/// Geometry of one overlay within a frame area.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OverlayLayout {
    pub panel: Rect,
    pub header: Option<Rect>,
    pub title: Option<Rect>,
    pub close_button: Option<Rect>,
    pub body: Rect,
    pub footer: Option<Rect>,
    pub actions: Vec<Rect>,
}

/// Width of a rendered action button: `[ label ]`.
pub fn button_width(action: &ActionTrigger) -> u16 {
    (action.label().chars().count() as u16).saturating_add(4)
}

pub(crate) fn contains(rect: Rect, column: u16, row: u16) -> bool {
    column >= rect.x && column < rect.right() && row >= rect.y && row < rect.bottom()
}

impl OverlayLayout {
    pub fn compute(overlay: &OverlayController, area: Rect) -> Self {
        let panel = panel_area(overlay, area);
        let inner = panel.inner(&Margin {
            horizontal: 1,
            vertical: 1,
        });

        let header = overlay.header();
        let has_footer = overlay.has_footer();
        let chunks = Layout::vertical([
            Constraint::Length(if header.is_some() { 1 } else { 0 }),
            Constraint::Min(1),
            Constraint::Length(if has_footer { 1 } else { 0 }),
        ])
        .split(inner);

        let (header_area, title, close_button) = match &header {
            Some(header) => {
                let row = chunks[0];
                let close_width = if header.close_button {
                    (CLOSE_GLYPH.chars().count() as u16).min(row.width)
                } else {
                    0
                };
                let close_button = header.close_button.then(|| {
                    Rect::new(row.right() - close_width, row.y, close_width, row.height)
                });
                let title = header.title.as_ref().map(|title| {
                    let width = (title.chars().count() as u16).min(row.width - close_width);
                    Rect::new(row.x, row.y, width, row.height)
                });
                (Some(row), title, close_button)
            }
            None => (None, None, None),
        };

        let (footer, actions) = if has_footer {
            let row = chunks[2];
            (Some(row), action_areas(overlay.actions(), row))
        } else {
            (None, Vec::new())
        };

        Self {
            panel,
            header: header_area,
            title,
            close_button,
            body: chunks[1],
            footer,
            actions,
        }
    }
}

/// Centered panel sized by the overlay size, clamped to the frame.
fn panel_area(overlay: &OverlayController, area: Rect) -> Rect {
    let (width_percent, height_percent) = overlay.size().percent();
    let width = (area.width as u32 * width_percent as u32 / 100) as u16;
    let height = (area.height as u32 * height_percent as u32 / 100) as u16;
    let width = width.max(MIN_PANEL_WIDTH).min(area.width);
    let height = height.max(MIN_PANEL_HEIGHT).min(area.height);
    let x = area.x + (area.width - width) / 2;
    let y = area.y + (area.height - height) / 2;
    Rect::new(x, y, width, height)
}

/// Buttons right-aligned in the footer row, one cell apart.
fn action_areas(actions: &[ActionTrigger], row: Rect) -> Vec<Rect> {
    let widths: Vec<u16> = actions.iter().map(button_width).collect();
    let total = widths.iter().sum::<u16>() + widths.len().saturating_sub(1) as u16;
    let mut x = row.x + row.width.saturating_sub(total);
    widths
        .into_iter()
        .map(|width| {
            let start = x.min(row.right());
            let width = width.min(row.right() - start);
            x = x.saturating_add(width + 1);
            Rect::new(start, row.y, width, row.height)
        })
        .collect()
}

/// Classify a click at (`column`, `row`) against an overlay.
///
/// Only cells outside the panel are the backdrop.
pub fn hit_test(overlay: &OverlayController, area: Rect, column: u16, row: u16) -> ClickTarget {
    let layout = OverlayLayout::compute(overlay, area);
    if !contains(layout.panel, column, row) {
        return ClickTarget::Backdrop;
    }
    if let Some(close) = layout.close_button {
        if contains(close, column, row) {
            return ClickTarget::CloseButton;
        }
    }
    if let Some(title) = layout.title {
        if contains(title, column, row) {
            return ClickTarget::Title;
        }
    }
    if let Some(header) = layout.header {
        if contains(header, column, row) {
            return ClickTarget::Header;
        }
    }
    if let Some(index) = layout
        .actions
        .iter()
        .position(|action| contains(*action, column, row))
    {
        return ClickTarget::Action(index);
    }
    if let Some(footer) = layout.footer {
        if contains(footer, column, row) {
            return ClickTarget::Footer;
        }
    }
    if contains(layout.body, column, row) {
        return ClickTarget::Body;
    }
    ClickTarget::Panel
}

fn button_style(variant: ButtonVariant, theme: &ThemeConfig) -> Style {
    match variant {
        ButtonVariant::Primary => Style::default()
            .fg(Color::Black)
            .bg(ThemeConfig::to_color(&theme.button_primary))
            .add_modifier(Modifier::BOLD),
        ButtonVariant::Danger => Style::default()
            .fg(Color::Black)
            .bg(ThemeConfig::to_color(&theme.button_danger))
            .add_modifier(Modifier::BOLD),
        ButtonVariant::Secondary => {
            Style::default().fg(ThemeConfig::to_color(&theme.button_secondary))
        }
        ButtonVariant::Outline => Style::default().fg(ThemeConfig::to_color(&theme.button_primary)),
        ButtonVariant::Ghost => Style::default().fg(Color::Gray),
    }
}

/// Render one overlay: dim the backdrop, then draw the panel.
pub fn render_overlay(f: &mut Frame, overlay: &OverlayController, area: Rect, theme: &ThemeConfig) {
    let closing = overlay.state() == OverlayState::Closing;
    let layout = OverlayLayout::compute(overlay, area);

    // Backdrop fades first on the way out.
    if !closing {
        f.buffer_mut().set_style(
            area,
            Style::default()
                .fg(Color::DarkGray)
                .bg(ThemeConfig::to_color(&theme.backdrop)),
        );
    }

    f.render_widget(Clear, layout.panel);
    let border = if closing {
        Color::DarkGray
    } else {
        ThemeConfig::to_color(&theme.panel_border)
    };
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(border))
        .style(Style::default().bg(ThemeConfig::to_color(&theme.panel_bg)));
    f.render_widget(block, layout.panel);

    if let (Some(header), Some(title_area)) = (overlay.header(), layout.title) {
        if let Some(title) = header.title {
            let title = Paragraph::new(Span::styled(
                title,
                Style::default()
                    .fg(ThemeConfig::to_color(&theme.title_fg))
                    .add_modifier(Modifier::BOLD),
            ));
            f.render_widget(title, title_area);
        }
    }
    if let Some(close) = layout.close_button {
        f.render_widget(
            Paragraph::new(CLOSE_GLYPH).style(Style::default().fg(Color::Gray)),
            close,
        );
    }

    let body_style = Style::default().fg(ThemeConfig::to_color(&theme.body_fg));
    let body = match overlay.content() {
        Content::Text(text) => Paragraph::new(text).style(body_style),
        Content::Lines(lines) => Paragraph::new(lines),
    };
    f.render_widget(body.wrap(Wrap { trim: true }), layout.body);

    for (action, rect) in overlay.actions().iter().zip(&layout.actions) {
        let label = Line::from(Span::styled(
            format!("[ {} ]", action.label()),
            button_style(action.variant(), theme),
        ));
        f.render_widget(Paragraph::new(label), *rect);
    }
}
