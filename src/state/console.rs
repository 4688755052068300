// Console tab state.
// Activity log of loads, refreshes, and failures shown to the user.

use chrono::{DateTime, Utc};
use ratatui::widgets::ListState;

/// Console message level.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConsoleLevel {
    Info,
    Warn,
    Error,
}

/// A console message for the activity log.
#[derive(Debug, Clone)]
pub struct ConsoleMessage {
    pub level: ConsoleLevel,
    pub message: String,
    pub timestamp: DateTime<Utc>,
}

impl ConsoleMessage {
    fn new(level: ConsoleLevel, message: impl Into<String>) -> Self {
        Self {
            level,
            message: message.into(),
            timestamp: Utc::now(),
        }
    }
}

/// Complete state for the Console tab.
#[derive(Debug, Default)]
pub struct ConsoleState {
    pub messages: Vec<ConsoleMessage>,
    pub list_state: ListState,
    /// Warnings and errors logged since the tab was last viewed.
    pub unread: usize,
}

impl ConsoleState {
    const MAX_MESSAGES: usize = 500;

    pub fn new() -> Self {
        Self::default()
    }

    pub fn log_info(&mut self, message: impl Into<String>) {
        self.push(ConsoleMessage::new(ConsoleLevel::Info, message));
    }

    pub fn log_warn(&mut self, message: impl Into<String>) {
        self.push(ConsoleMessage::new(ConsoleLevel::Warn, message));
        self.unread += 1;
    }

    pub fn log_error(&mut self, message: impl Into<String>) {
        self.push(ConsoleMessage::new(ConsoleLevel::Error, message));
        self.unread += 1;
    }

    fn push(&mut self, message: ConsoleMessage) {
        self.messages.push(message);
        if self.messages.len() > Self::MAX_MESSAGES {
            let excess = self.messages.len() - Self::MAX_MESSAGES;
            self.messages.drain(..excess);
        }
        self.scroll_to_bottom();
    }

    pub fn mark_read(&mut self) {
        self.unread = 0;
    }

    /// Scroll message list to bottom.
    fn scroll_to_bottom(&mut self) {
        if !self.messages.is_empty() {
            self.list_state.select(Some(self.messages.len() - 1));
        }
    }

    /// Select previous message in list.
    pub fn select_prev(&mut self) {
        if self.messages.is_empty() {
            return;
        }
        let i = match self.list_state.selected() {
            Some(i) => i.saturating_sub(1),
            None => self.messages.len() - 1,
        };
        self.list_state.select(Some(i));
    }

    /// Select next message in list.
    pub fn select_next(&mut self) {
        if self.messages.is_empty() {
            return;
        }
        let i = match self.list_state.selected() {
            Some(i) if i >= self.messages.len() - 1 => i,
            Some(i) => i + 1,
            None => 0,
        };
        self.list_state.select(Some(i));
    }
}
