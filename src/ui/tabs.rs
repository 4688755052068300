// Tab bar rendering with badge support for Console tab.
// Handles visual indication of active tab and unread problem count.

use ratatui::{prelude::*, widgets::*};

use crate::app::{App, Tab};

use super::theme::Theme;

/// Draw the tab bar at the top of the screen.
pub fn draw_tabs(frame: &mut Frame, app: &App, area: Rect, theme: &Theme) {
    let unread = app.console.unread;

    let tab_titles: Vec<Line> = Tab::ALL
        .iter()
        .map(|tab| {
            let title = match tab {
                Tab::Console if unread > 0 => format!("{} ({})", tab.title(), unread),
                Tab::Recent if !app.catalog.changes.is_empty() => {
                    format!("{} ({})", tab.title(), app.catalog.changes.len())
                }
                _ => tab.title().to_string(),
            };

            let style = if *tab == app.active_tab {
                Style::default()
                    .fg(theme.active)
                    .add_modifier(Modifier::BOLD)
            } else if *tab == Tab::Console && unread > 0 {
                Style::default().fg(theme.error)
            } else {
                Style::default().fg(theme.fg)
            };

            Line::from(Span::styled(title, style))
        })
        .collect();

    let selected_index = Tab::ALL
        .iter()
        .position(|t| *t == app.active_tab)
        .unwrap_or(0);

    let tabs_widget = Tabs::new(tab_titles)
        .block(
            Block::default()
                .borders(Borders::BOTTOM)
                .border_style(theme.muted())
                .title(format!(" icondeck · {} ", app.repo_slug))
                .title_style(
                    Style::default()
                        .fg(theme.accent)
                        .add_modifier(Modifier::BOLD),
                ),
        )
        .select(selected_index)
        .highlight_style(Style::default().fg(theme.active))
        .divider(Span::raw(" │ "));

    frame.render_widget(tabs_widget, area);
}
