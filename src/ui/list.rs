// List rendering for icons, recent changes, and status placeholders.
// Provides styled list views with loading and empty states.

use chrono::{DateTime, Utc};
use ratatui::{prelude::*, widgets::*};

use crate::state::{CatalogViewState, LoadingState};

use super::theme::Theme;

/// Format a timestamp as relative time (e.g., "2h ago").
pub fn format_relative_time(dt: &DateTime<Utc>) -> String {
    let now = Utc::now();
    let duration = now.signed_duration_since(*dt);

    if duration.num_days() > 0 {
        format!("{}d ago", duration.num_days())
    } else if duration.num_hours() > 0 {
        format!("{}h ago", duration.num_hours())
    } else if duration.num_minutes() > 0 {
        format!("{}m ago", duration.num_minutes())
    } else {
        "just now".to_string()
    }
}

/// Format a byte count for display (e.g., "1.5 KB").
pub fn format_size(bytes: u64) -> String {
    const KB: f64 = 1024.0;
    let b = bytes as f64;
    if b < KB {
        format!("{} B", bytes)
    } else if b < KB * KB {
        format!("{:.1} KB", b / KB)
    } else {
        format!("{:.1} MB", b / (KB * KB))
    }
}

/// Split `text` into spans, styling the characters at `positions`.
pub fn highlighted_spans(text: &str, positions: &[usize], base: Style, hit: Style) -> Vec<Span<'static>> {
    let mut spans = Vec::new();
    let mut run = String::new();
    let mut run_is_hit = false;

    for (i, c) in text.chars().enumerate() {
        let is_hit = positions.contains(&i);
        if is_hit != run_is_hit && !run.is_empty() {
            let style = if run_is_hit { hit } else { base };
            spans.push(Span::styled(std::mem::take(&mut run), style));
        }
        run_is_hit = is_hit;
        run.push(c);
    }
    if !run.is_empty() {
        spans.push(Span::styled(run, if run_is_hit { hit } else { base }));
    }
    spans
}

/// Render a loading indicator.
pub fn render_loading(frame: &mut Frame, area: Rect, message: &str, theme: &Theme) {
    let text = Paragraph::new(format!("⏳ {}...", message))
        .alignment(Alignment::Center)
        .style(Style::default().fg(theme.warn));
    frame.render_widget(text, area);
}

/// Render an error message.
pub fn render_error(frame: &mut Frame, area: Rect, error: &str, theme: &Theme) {
    let text = Paragraph::new(format!("❌ {}", error))
        .alignment(Alignment::Center)
        .style(Style::default().fg(theme.error));
    frame.render_widget(text, area);
}

/// Render an empty state message.
pub fn render_empty(frame: &mut Frame, area: Rect, lines: Vec<Line<'static>>, theme: &Theme) {
    let text = Paragraph::new(lines)
        .alignment(Alignment::Center)
        .style(theme.muted())
        .block(Block::default().borders(Borders::ALL).border_style(theme.muted()));
    frame.render_widget(text, area);
}

/// Render the filtered icon list.
pub fn render_icon_list(frame: &mut Frame, state: &mut CatalogViewState, area: Rect, theme: &Theme) {
    let total = match &state.icons {
        LoadingState::Idle | LoadingState::Loading => {
            return render_loading(frame, area, "Loading icons", theme);
        }
        LoadingState::Error(e) => return render_error(frame, area, e, theme),
        LoadingState::Loaded(icons) => icons.len(),
    };

    if state.rows.is_empty() {
        let mut lines = vec![Line::from("No icons match")];
        if let Some(suggestion) = &state.suggestion {
            lines.push(Line::from(""));
            lines.push(Line::from(Span::styled(
                suggestion.to_string(),
                Style::default().fg(theme.accent),
            )));
        }
        return render_empty(frame, area, lines, theme);
    }

    let base = Style::default().fg(theme.fg);
    let hit = Style::default()
        .fg(theme.match_fg)
        .add_modifier(Modifier::BOLD);

    let items: Vec<ListItem> = state
        .rows
        .iter()
        .map(|row| {
            let icon = &row.icon;
            let badge = if icon.is_new() {
                Span::styled("NEW    ", Style::default().fg(theme.new_badge))
            } else {
                Span::styled("LEGACY ", Style::default().fg(theme.legacy_badge))
            };

            let mut spans = vec![badge];
            spans.extend(highlighted_spans(&icon.filename, &row.positions, base, hit));
            spans.push(Span::styled(format!("  {}", icon.category), theme.muted()));

            if let Some(change) = state.changes.get(&icon.filename) {
                spans.push(Span::styled(
                    format!("  ● {}", format_relative_time(&change.date)),
                    Style::default().fg(theme.recent_badge),
                ));
            }

            ListItem::new(Line::from(spans))
        })
        .collect();

    let title = format!(" Icons ({}/{}) ", state.rows.len(), total);
    let list_widget = List::new(items)
        .block(Block::default().borders(Borders::ALL).title(title))
        .highlight_style(theme.highlight())
        .highlight_symbol("> ");

    frame.render_stateful_widget(list_widget, area, &mut state.list_state);
}

/// Render icons changed within the lookback window, newest first.
pub fn render_recent_list(frame: &mut Frame, state: &mut CatalogViewState, area: Rect, theme: &Theme) {
    if state.changes.is_empty() {
        let message = if state.icons.is_loading() {
            "Loading recent changes..."
        } else {
            "No recent changes"
        };
        return render_empty(frame, area, vec![Line::from(message)], theme);
    }

    let items: Vec<ListItem> = state
        .recent_sorted()
        .into_iter()
        .map(|(filename, change)| {
            ListItem::new(Line::from(vec![
                Span::styled(filename.clone(), Style::default().fg(theme.accent)),
                Span::styled(
                    format!("  {}", format_relative_time(&change.date)),
                    theme.muted(),
                ),
                Span::raw(format!("  {}", change.message)),
            ]))
        })
        .collect();

    let list_widget = List::new(items)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(" Recently Changed "),
        )
        .highlight_style(theme.highlight())
        .highlight_symbol("> ");

    frame.render_stateful_widget(list_widget, area, &mut state.recent_state);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_relative_time() {
        assert_eq!(format_relative_time(&Utc::now()), "just now");
        let earlier = Utc::now() - chrono::Duration::hours(3);
        assert_eq!(format_relative_time(&earlier), "3h ago");
        let days = Utc::now() - chrono::Duration::days(2);
        assert_eq!(format_relative_time(&days), "2d ago");
    }

    #[test]
    fn test_format_size() {
        assert_eq!(format_size(512), "512 B");
        assert_eq!(format_size(1536), "1.5 KB");
        assert_eq!(format_size(3 * 1024 * 1024), "3.0 MB");
    }

    #[test]
    fn test_highlighted_spans() {
        let base = Style::default();
        let hit = Style::default().fg(Color::Yellow);
        let spans = highlighted_spans("Teams.png", &[0, 1, 2], base, hit);
        assert_eq!(spans.len(), 2);
        assert_eq!(spans[0].content, "Tea");
        assert_eq!(spans[0].style, hit);
        assert_eq!(spans[1].content, "ms.png");

        let none = highlighted_spans("Azure.svg", &[], base, hit);
        assert_eq!(none.len(), 1);
        assert!(highlighted_spans("", &[0], base, hit).is_empty());
    }
}
