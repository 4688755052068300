// Catalog view state.
// Holds the loaded records, current query and filters, and the visible result list.

use ratatui::widgets::ListState;

use crate::catalog::{IconRecord, RecentChange, RecentChanges};
use crate::search::{self, Filters, Suggestion};

/// Loading state for async data.
#[derive(Debug, Clone, Default)]
pub enum LoadingState<T> {
    #[default]
    Idle,
    Loading,
    Loaded(T),
    Error(String),
}

impl<T> LoadingState<T> {
    pub fn is_loading(&self) -> bool {
        matches!(self, LoadingState::Loading)
    }

    pub fn data(&self) -> Option<&T> {
        match self {
            LoadingState::Loaded(data) => Some(data),
            _ => None,
        }
    }
}

/// A search result detached from the record list it was computed from.
#[derive(Debug, Clone)]
pub struct IconRow {
    pub icon: IconRecord,
    pub positions: Vec<usize>,
}

/// Complete state for the Icons and Recent tabs.
#[derive(Debug, Default)]
pub struct CatalogViewState {
    pub icons: LoadingState<Vec<IconRecord>>,
    pub changes: RecentChanges,
    pub query: String,
    pub filters: Filters,
    pub categories: Vec<String>,
    pub rows: Vec<IconRow>,
    pub list_state: ListState,
    /// Offered when the current search has no results.
    pub suggestion: Option<Suggestion>,
    pub recent_state: ListState,
}

impl CatalogViewState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set loaded data, keeping the user's query and filters.
    pub fn set_loaded(&mut self, icons: Vec<IconRecord>) {
        self.categories = search::categories(&icons);
        if let Some(selected) = &self.filters.category {
            if !self.categories.contains(selected) {
                self.filters.category = None;
            }
        }
        self.icons = LoadingState::Loaded(icons);
        self.recompute();
    }

    pub fn set_loading(&mut self) {
        // Keep showing the previous list while a refresh runs
        if self.icons.data().is_none() {
            self.icons = LoadingState::Loading;
        }
    }

    pub fn set_error(&mut self, error: String) {
        if self.icons.data().is_none() {
            self.icons = LoadingState::Error(error);
        }
    }

    pub fn set_changes(&mut self, changes: RecentChanges) {
        self.changes = changes;
        self.recent_state
            .select(if self.changes.is_empty() { None } else { Some(0) });
    }

    /// Re-run the search pipeline after any input change.
    pub fn recompute(&mut self) {
        let Some(icons) = self.icons.data() else {
            self.rows.clear();
            self.suggestion = None;
            return;
        };

        let results = search::search(icons, &self.query, &self.filters);
        self.suggestion = if results.is_empty() && !self.query.trim().is_empty() {
            search::suggest(icons, &self.query, self.filters.category.as_deref())
        } else {
            None
        };
        self.rows = results
            .into_iter()
            .map(|result| IconRow {
                icon: result.icon.clone(),
                positions: result.positions,
            })
            .collect();

        self.list_state
            .select(if self.rows.is_empty() { None } else { Some(0) });
    }

    pub fn push_query_char(&mut self, c: char) {
        self.query.push(c);
        self.recompute();
    }

    pub fn pop_query_char(&mut self) {
        self.query.pop();
        self.recompute();
    }

    pub fn clear_query(&mut self) {
        self.query.clear();
        self.recompute();
    }

    /// Cycle through "all categories" and each category in order.
    pub fn cycle_category(&mut self) {
        let next = match &self.filters.category {
            None => self.categories.first().cloned(),
            Some(current) => self
                .categories
                .iter()
                .position(|c| c == current)
                .and_then(|i| self.categories.get(i + 1))
                .cloned(),
        };
        self.filters.category = next;
        self.recompute();
    }

    pub fn cycle_file_type(&mut self) {
        self.filters.file_type = self.filters.file_type.next();
        self.recompute();
    }

    pub fn toggle_new_only(&mut self) {
        self.filters.new_only = !self.filters.new_only;
        self.recompute();
    }

    /// Select the next row.
    pub fn select_next(&mut self) {
        if self.rows.is_empty() {
            return;
        }
        let i = match self.list_state.selected() {
            Some(i) if i >= self.rows.len() - 1 => i,
            Some(i) => i + 1,
            None => 0,
        };
        self.list_state.select(Some(i));
    }

    /// Select the previous row.
    pub fn select_prev(&mut self) {
        if self.rows.is_empty() {
            return;
        }
        let i = self.list_state.selected().map_or(0, |i| i.saturating_sub(1));
        self.list_state.select(Some(i));
    }

    pub fn selected_row(&self) -> Option<&IconRow> {
        self.rows.get(self.list_state.selected()?)
    }

    /// Recent change for an icon, if its filename changed within the lookback.
    pub fn change_for(&self, icon: &IconRecord) -> Option<&RecentChange> {
        self.changes.get(&icon.filename)
    }

    /// Recent changes, newest first.
    pub fn recent_sorted(&self) -> Vec<(&String, &RecentChange)> {
        let mut entries: Vec<_> = self.changes.iter().collect();
        entries.sort_by(|a, b| b.1.date.cmp(&a.1.date).then_with(|| a.0.cmp(b.0)));
        entries
    }

    pub fn recent_next(&mut self) {
        if self.changes.is_empty() {
            return;
        }
        let last = self.changes.len() - 1;
        let i = self.recent_state.selected().map_or(0, |i| (i + 1).min(last));
        self.recent_state.select(Some(i));
    }

    pub fn recent_prev(&mut self) {
        if self.changes.is_empty() {
            return;
        }
        let i = self.recent_state.selected().map_or(0, |i| i.saturating_sub(1));
        self.recent_state.select(Some(i));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::search::FileType;
    use chrono::Utc;

    fn icon(path: &str) -> IconRecord {
        IconRecord::from_path(path, None, "https://raw.example/", 2026).unwrap()
    }

    fn loaded() -> CatalogViewState {
        let mut state = CatalogViewState::new();
        state.set_loaded(vec![
            icon("Teams/Teams.png"),
            icon("Teams/Teams.svg"),
            icon("SharePoint/SharePoint.png"),
            icon("Azure/Legacy/Azure.svg"),
        ]);
        state
    }

    #[test]
    fn test_loaded_lists_everything() {
        let state = loaded();
        assert_eq!(state.rows.len(), 4);
        assert_eq!(state.categories, ["Azure", "SharePoint", "Teams"]);
        assert_eq!(state.list_state.selected(), Some(0));
        // Legacy icon sorts last
        assert_eq!(state.rows[3].icon.path, "Azure/Legacy/Azure.svg");
    }

    #[test]
    fn test_category_cycle_wraps_to_all() {
        let mut state = loaded();
        state.cycle_category();
        assert_eq!(state.filters.category.as_deref(), Some("Azure"));
        state.cycle_category();
        state.cycle_category();
        assert_eq!(state.filters.category.as_deref(), Some("Teams"));
        assert_eq!(state.rows.len(), 2);
        state.cycle_category();
        assert_eq!(state.filters.category, None);
        assert_eq!(state.rows.len(), 4);
    }

    #[test]
    fn test_filters_and_query() {
        let mut state = loaded();
        state.cycle_file_type();
        assert_eq!(state.filters.file_type, FileType::Png);
        assert_eq!(state.rows.len(), 2);

        for c in "share".chars() {
            state.push_query_char(c);
        }
        assert_eq!(state.rows.len(), 1);
        assert_eq!(state.rows[0].icon.filename, "SharePoint.png");

        state.clear_query();
        state.toggle_new_only();
        assert!(state.rows.iter().all(|r| r.icon.is_new()));
    }

    #[test]
    fn test_suggestion_when_empty() {
        let mut state = loaded();
        state.filters.category = Some("Teams".to_string());
        state.query = "sharepont".to_string();
        state.recompute();
        assert!(state.rows.is_empty());
        assert_eq!(state.list_state.selected(), None);
        assert!(matches!(state.suggestion, Some(Suggestion::Icon { .. })));
    }

    #[test]
    fn test_selection_bounds() {
        let mut state = loaded();
        state.select_prev();
        assert_eq!(state.list_state.selected(), Some(0));
        for _ in 0..10 {
            state.select_next();
        }
        assert_eq!(state.list_state.selected(), Some(3));
        assert!(state.selected_row().is_some());
    }

    #[test]
    fn test_reload_drops_vanished_category() {
        let mut state = loaded();
        state.filters.category = Some("Azure".to_string());
        state.set_loaded(vec![icon("Teams/Teams.png")]);
        assert_eq!(state.filters.category, None);
        assert_eq!(state.rows.len(), 1);
    }

    #[test]
    fn test_recent_sorted_newest_first() {
        let mut state = loaded();
        let mut changes = RecentChanges::new();
        changes.insert(
            "Teams.png".to_string(),
            RecentChange {
                path: "Teams/Teams.png".to_string(),
                date: Utc::now() - chrono::Duration::days(2),
                message: "older".to_string(),
            },
        );
        changes.insert(
            "SharePoint.png".to_string(),
            RecentChange {
                path: "SharePoint/SharePoint.png".to_string(),
                date: Utc::now(),
                message: "newer".to_string(),
            },
        );
        state.set_changes(changes);

        let sorted = state.recent_sorted();
        assert_eq!(sorted[0].1.message, "newer");
        assert_eq!(state.recent_state.selected(), Some(0));
        // SharePoint.png sorts first among the loaded rows
        assert_eq!(state.rows[0].icon.filename, "SharePoint.png");
        assert!(state.change_for(&state.rows[0].icon).is_some());
    }
}
