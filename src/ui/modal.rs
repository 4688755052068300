// Modal UI components.
// Detail view for the selected icon, drawn over the list.

use ratatui::{prelude::*, widgets::*};

use crate::catalog::RecentChange;
use crate::state::IconRow;

use super::list::{format_relative_time, format_size};
use super::theme::Theme;

/// Draw the details modal for `row` on top of the current view.
pub fn draw_details_modal(
    frame: &mut Frame,
    row: &IconRow,
    change: Option<&RecentChange>,
    theme: &Theme,
) {
    let area = frame.area();

    // Create centered modal
    let modal_width = area.width.min(80);
    let modal_height = 14.min(area.height);
    let modal_x = (area.width.saturating_sub(modal_width)) / 2;
    let modal_y = (area.height.saturating_sub(modal_height)) / 2;

    let modal_area = Rect::new(modal_x, modal_y, modal_width, modal_height);

    // Clear the area behind the modal
    frame.render_widget(Clear, modal_area);

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Min(1),    // Details
            Constraint::Length(1), // Instructions
        ])
        .split(modal_area);

    let icon = &row.icon;
    let field = |label: &'static str, value: String| {
        Line::from(vec![
            Span::styled(format!("{:<10}", label), theme.muted()),
            Span::raw(value),
        ])
    };

    let status = if icon.is_new() { "Current" } else { "Legacy" };
    let size = if icon.size > 0 {
        format_size(icon.size)
    } else {
        "-".to_string()
    };

    let mut lines = vec![
        field("Path", icon.path.clone()),
        field("Category", icon.category.clone()),
        field("Product", icon.product_name.clone()),
        field("Type", icon.extension.to_uppercase()),
        field("Size", size),
        field("Status", status.to_string()),
        field("URL", icon.raw_url.clone()),
    ];
    if let Some(change) = change {
        lines.push(Line::from(""));
        lines.push(field(
            "Changed",
            format!("{}  {}", format_relative_time(&change.date), change.message),
        ));
    }

    let details = Paragraph::new(lines)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(theme.accent))
                .title(format!(" {} ", icon.filename)),
        )
        .style(theme.base())
        .wrap(Wrap { trim: false });
    frame.render_widget(details, chunks[0]);

    // Instructions
    let instructions = Line::from(vec![
        Span::styled("Esc", Style::default().fg(theme.active)),
        Span::styled(" = Close ", theme.muted()),
    ]);

    let instructions_widget = Paragraph::new(instructions).alignment(Alignment::Center);
    frame.render_widget(instructions_widget, chunks[1]);
}
