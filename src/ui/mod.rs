// UI module for rendering the TUI.
// Contains widgets for tabs, the filter bar, lists, and overlays.

mod list;
mod modal;
mod tabs;
mod theme;

use ratatui::{prelude::*, widgets::*};

use crate::app::{App, Tab};
use crate::state::ConsoleLevel;

use theme::Theme;

/// Main draw function that renders the entire UI.
pub fn draw(frame: &mut Frame, app: &mut App) {
    let theme = Theme::new(app.dark_mode);
    frame.render_widget(Block::default().style(theme.base()), frame.area());

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Tab bar
            Constraint::Length(3), // Search and filters
            Constraint::Min(1),    // Main content
            Constraint::Length(1), // Status bar
        ])
        .split(frame.area());

    // Tab bar
    tabs::draw_tabs(frame, app, chunks[0], &theme);

    // Search bar (Icons tab only)
    if app.active_tab == Tab::Icons {
        draw_search_bar(frame, app, chunks[1], &theme);
    } else {
        let block = Block::default()
            .borders(Borders::BOTTOM)
            .border_style(theme.muted());
        frame.render_widget(block, chunks[1]);
    }

    // Main content area
    draw_content(frame, app, chunks[2], &theme);

    // Status bar
    draw_status_bar(frame, app, chunks[3], &theme);

    if app.show_details {
        if let Some(row) = app.catalog.selected_row() {
            let change = app.catalog.change_for(&row.icon);
            modal::draw_details_modal(frame, row, change, &theme);
        }
    }

    // Help overlay (rendered last, on top of everything)
    if app.show_help {
        draw_help_overlay(frame, &theme);
    }
}

/// Draw the main content area based on active tab.
fn draw_content(frame: &mut Frame, app: &mut App, area: Rect, theme: &Theme) {
    match app.active_tab {
        Tab::Icons => list::render_icon_list(frame, &mut app.catalog, area, theme),
        Tab::Recent => list::render_recent_list(frame, &mut app.catalog, area, theme),
        Tab::Console => draw_console_tab(frame, app, area, theme),
    }
}

/// Draw the query input and active filters.
fn draw_search_bar(frame: &mut Frame, app: &App, area: Rect, theme: &Theme) {
    let filters = &app.catalog.filters;
    let border = if app.search_active {
        Style::default().fg(theme.active)
    } else {
        theme.muted()
    };

    let mut spans = vec![Span::styled("/ ", Style::default().fg(theme.active))];
    if app.catalog.query.is_empty() && !app.search_active {
        spans.push(Span::styled("type / to search", theme.muted()));
    } else {
        spans.push(Span::raw(app.catalog.query.clone()));
    }
    if app.search_active {
        spans.push(Span::styled("█", Style::default().fg(theme.active)));
    }

    let filter_line = format!(
        " category: {}  type: {}  {} ",
        filters.category.as_deref().unwrap_or("All"),
        filters.file_type.label(),
        if filters.new_only { "new only" } else { "all ages" },
    );

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(border)
        .title(" Search ")
        .title_bottom(Line::from(Span::styled(filter_line, theme.muted())).right_aligned());

    frame.render_widget(Paragraph::new(Line::from(spans)).block(block), area);
}

/// Draw the Console tab with activity messages.
fn draw_console_tab(frame: &mut Frame, app: &mut App, area: Rect, theme: &Theme) {
    let block = Block::default().borders(Borders::ALL).title(" Console ");

    if app.console.messages.is_empty() {
        let text = Paragraph::new("No messages")
            .alignment(Alignment::Center)
            .style(theme.muted())
            .block(block);
        frame.render_widget(text, area);
    } else {
        let items: Vec<ListItem> = app
            .console
            .messages
            .iter()
            .map(|msg| {
                let (icon, color) = match msg.level {
                    ConsoleLevel::Error => ("❌", theme.error),
                    ConsoleLevel::Warn => ("⚠️", theme.warn),
                    ConsoleLevel::Info => ("ℹ️", theme.accent),
                };

                let time = list::format_relative_time(&msg.timestamp);

                ListItem::new(Line::from(vec![
                    Span::raw(format!("{} ", icon)),
                    Span::styled(time, theme.muted()),
                    Span::raw(" "),
                    Span::styled(msg.message.clone(), Style::default().fg(color)),
                ]))
            })
            .collect();

        let list_widget = List::new(items)
            .block(block)
            .highlight_style(theme.highlight())
            .highlight_symbol("> ");

        frame.render_stateful_widget(list_widget, area, &mut app.console.list_state);
    }
}

/// Draw the status bar with keybinding hints and rate limit.
fn draw_status_bar(frame: &mut Frame, app: &App, area: Rect, theme: &Theme) {
    let key = |k: &'static str, label: &'static str| {
        [Span::raw(k), Span::styled(label, theme.muted())]
    };

    let mut hints: Vec<Span> = if app.search_active {
        [key(" type ", "Filter"), key("  ↵/Esc ", "Done"), key("  ⌫ ", "Delete")].concat()
    } else {
        [
            key(" ↑↓ ", "Navigate"),
            key("  / ", "Search"),
            key("  c/t/n ", "Filters"),
            key("  ↵ ", "Details"),
            key("  Tab ", "Switch"),
            key("  r ", "Refresh"),
            key("  ? ", "Help"),
            key("  q ", "Quit"),
        ]
        .concat()
    };

    if app.loading {
        hints.push(Span::styled("  ⏳ loading", Style::default().fg(theme.warn)));
    }

    // Add rate limit info on the right if available
    if let Some(rate) = app.rate_limit.as_ref().filter(|r| r.limit > 0) {
        let rate_color = if rate.remaining < 10 {
            theme.error
        } else if rate.remaining < 30 {
            theme.warn
        } else {
            theme.muted
        };
        hints.push(Span::styled(
            format!("  API: {}/{}", rate.remaining, rate.limit),
            Style::default().fg(rate_color),
        ));
    }

    let status = Paragraph::new(Line::from(hints));
    frame.render_widget(status, area);
}

/// Draw the help overlay.
fn draw_help_overlay(frame: &mut Frame, theme: &Theme) {
    let area = frame.area();

    // Create a centered popup
    let popup_width = 52.min(area.width);
    let popup_height = 20.min(area.height);
    let popup_x = (area.width.saturating_sub(popup_width)) / 2;
    let popup_y = (area.height.saturating_sub(popup_height)) / 2;

    let popup_area = Rect::new(popup_x, popup_y, popup_width, popup_height);

    // Clear the area behind the popup
    frame.render_widget(Clear, popup_area);

    let bindings = [
        ("  ↑/↓ or j/k    ", "Navigate list"),
        ("  /             ", "Search icons"),
        ("  Esc           ", "Clear search / close"),
        ("  c             ", "Cycle category"),
        ("  t             ", "Cycle file type"),
        ("  n             ", "Toggle new icons only"),
        ("  Enter         ", "Icon details"),
        ("  Tab           ", "Switch tabs"),
        ("  r             ", "Refresh from GitHub"),
        ("  d             ", "Toggle dark mode"),
        ("  ?             ", "Show/hide this help"),
        ("  q             ", "Quit"),
    ];

    let mut help_text = vec![
        Line::from(vec![Span::styled(
            "Keyboard Shortcuts",
            Style::default().add_modifier(Modifier::BOLD),
        )]),
        Line::from(""),
    ];
    help_text.extend(bindings.iter().map(|(keys, action)| {
        Line::from(vec![
            Span::styled(*keys, Style::default().fg(theme.accent)),
            Span::raw(*action),
        ])
    }));
    help_text.push(Line::from(""));
    help_text.push(Line::from(vec![
        Span::styled("Press ", theme.muted()),
        Span::styled("Esc", Style::default().fg(theme.active)),
        Span::styled(" or ", theme.muted()),
        Span::styled("?", Style::default().fg(theme.active)),
        Span::styled(" to close", theme.muted()),
    ]));

    let help_paragraph = Paragraph::new(help_text)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(theme.accent))
                .title(" Help ")
                .title_style(
                    Style::default()
                        .fg(theme.accent)
                        .add_modifier(Modifier::BOLD),
                ),
        )
        .style(theme.base())
        .alignment(Alignment::Left);

    frame.render_widget(help_paragraph, popup_area);
}
