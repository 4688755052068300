// Color palettes for dark and light mode.

use ratatui::prelude::*;

#[derive(Debug, Clone, Copy)]
pub struct Theme {
    pub bg: Color,
    pub fg: Color,
    pub muted: Color,
    pub accent: Color,
    pub active: Color,
    pub match_fg: Color,
    pub selection_bg: Color,
    pub new_badge: Color,
    pub legacy_badge: Color,
    pub recent_badge: Color,
    pub warn: Color,
    pub error: Color,
}

impl Theme {
    pub fn new(dark: bool) -> Self {
        if dark {
            Self {
                bg: Color::Reset,
                fg: Color::White,
                muted: Color::DarkGray,
                accent: Color::Cyan,
                active: Color::Yellow,
                match_fg: Color::Yellow,
                selection_bg: Color::DarkGray,
                new_badge: Color::Green,
                legacy_badge: Color::Gray,
                recent_badge: Color::Magenta,
                warn: Color::Yellow,
                error: Color::Red,
            }
        } else {
            Self {
                bg: Color::White,
                fg: Color::Black,
                muted: Color::Gray,
                accent: Color::Blue,
                active: Color::Magenta,
                match_fg: Color::Red,
                selection_bg: Color::Rgb(220, 220, 220),
                new_badge: Color::Green,
                legacy_badge: Color::DarkGray,
                recent_badge: Color::Magenta,
                warn: Color::Rgb(180, 110, 0),
                error: Color::Red,
            }
        }
    }

    pub fn base(&self) -> Style {
        Style::default().fg(self.fg).bg(self.bg)
    }

    pub fn muted(&self) -> Style {
        Style::default().fg(self.muted)
    }

    pub fn highlight(&self) -> Style {
        Style::default()
            .bg(self.selection_bg)
            .add_modifier(Modifier::BOLD)
    }
}
