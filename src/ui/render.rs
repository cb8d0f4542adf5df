use ratatui::{
    layout::{Constraint, Layout, Margin},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, Paragraph},
    Frame,
};

use crate::app::App;
use crate::config::{Config, ThemeConfig};
use crate::surface;

use super::render_surface;

/// Key bindings shown in the footer.
const HELP: &[(&str, &str)] = &[
    ("s/e/w/i", "notify"),
    ("p", "persistent"),
    ("x", "dismiss"),
    ("o", "move"),
    ("m", "editor"),
    ("c", "clear"),
    ("q", "quit"),
];

/// Draw the demo screen: activity log, key help, then the surface on top.
pub fn ui(f: &mut Frame, app: &App, config: &Config) {
    let theme = &config.theme;
    let area = f.size();

    let chunks = Layout::vertical([Constraint::Min(3), Constraint::Length(1)]).split(area);

    let locked = surface::scroll_locked();
    let title = if locked {
        " Activity (scroll locked) "
    } else {
        " Activity "
    };
    let log_block = Block::default()
        .title(title)
        .borders(Borders::ALL)
        .border_style(Style::default().fg(ThemeConfig::to_color(&theme.panel_border)));

    let items: Vec<ListItem> = app
        .log
        .iter()
        .skip(app.scroll_offset)
        .map(|entry| ListItem::new(Line::from(Span::raw(entry.as_str()))))
        .collect();
    f.render_widget(List::new(items).block(log_block), chunks[0]);

    let hints: Vec<Span> = HELP
        .iter()
        .flat_map(|(key, label)| {
            vec![
                Span::styled(format!("[{}]", key), Style::default().fg(Color::Yellow)),
                Span::raw(format!(" {}  ", label)),
            ]
        })
        .collect();
    let position = Span::styled(
        app.position().name(),
        Style::default().add_modifier(Modifier::ITALIC),
    );
    let mut help = hints;
    help.push(position);
    f.render_widget(
        Paragraph::new(Line::from(help)).style(Style::default().fg(Color::Gray)),
        chunks[1].inner(&Margin {
            horizontal: 1,
            vertical: 0,
        }),
    );

    render_surface(f, area, theme);
}
