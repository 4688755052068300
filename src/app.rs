// App state and main event loop.
// Manages tabs, background catalog loads, and keyboard input handling.

use std::io;
use std::sync::Arc;
use std::time::Duration;

use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use ratatui::prelude::*;
use tokio::sync::{Mutex, mpsc};

use crate::cache::CacheService;
use crate::catalog::{CatalogFetcher, GitHubSource, IconRecord, RecentChanges};
use crate::github::RateLimit;
use crate::state::{CatalogViewState, ConsoleState};
use crate::ui;

/// Active tab in the application.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Tab {
    #[default]
    Icons,
    Recent,
    Console,
}

impl Tab {
    pub const ALL: [Tab; 3] = [Tab::Icons, Tab::Recent, Tab::Console];

    pub fn title(&self) -> &'static str {
        match self {
            Tab::Icons => "Icons",
            Tab::Recent => "Recent",
            Tab::Console => "Console",
        }
    }

    pub fn next(&self) -> Self {
        match self {
            Tab::Icons => Tab::Recent,
            Tab::Recent => Tab::Console,
            Tab::Console => Tab::Icons,
        }
    }

    pub fn prev(&self) -> Self {
        match self {
            Tab::Icons => Tab::Console,
            Tab::Recent => Tab::Icons,
            Tab::Console => Tab::Recent,
        }
    }
}

/// Results posted back from background loads.
#[derive(Debug)]
pub enum LoadEvent {
    Icons(Result<Vec<IconRecord>, String>),
    Changes(RecentChanges),
    RateLimit(RateLimit),
    Finished,
}

/// Main application state.
pub struct App {
    /// Currently active tab.
    pub active_tab: Tab,
    pub catalog: CatalogViewState,
    pub console: ConsoleState,
    pub show_help: bool,
    pub show_details: bool,
    /// Keystrokes go to the search box.
    pub search_active: bool,
    pub dark_mode: bool,
    /// A background load is running.
    pub loading: bool,
    pub rate_limit: Option<RateLimit>,
    pub repo_slug: String,
    /// Whether the app should exit.
    pub should_quit: bool,
    fetcher: Arc<Mutex<CatalogFetcher<GitHubSource>>>,
    cache: CacheService,
    events_tx: mpsc::UnboundedSender<LoadEvent>,
    events_rx: mpsc::UnboundedReceiver<LoadEvent>,
}

impl App {
    pub fn new(fetcher: CatalogFetcher<GitHubSource>, repo_slug: String) -> Self {
        let cache = fetcher.cache().clone();
        let (events_tx, events_rx) = mpsc::unbounded_channel();

        let show_help = cache.is_first_visit();
        if show_help {
            cache.mark_visited();
        }

        Self {
            active_tab: Tab::default(),
            catalog: CatalogViewState::new(),
            console: ConsoleState::new(),
            show_help,
            show_details: false,
            search_active: false,
            dark_mode: cache.dark_mode(),
            loading: false,
            rate_limit: None,
            repo_slug,
            should_quit: false,
            fetcher: Arc::new(Mutex::new(fetcher)),
            cache,
            events_tx,
            events_rx,
        }
    }

    /// Main event loop.
    pub fn run(&mut self, terminal: &mut Terminal<impl Backend>) -> io::Result<()> {
        self.spawn_load(false);
        while !self.should_quit {
            self.drain_events();
            terminal.draw(|frame| ui::draw(frame, self))?;
            self.handle_events()?;
        }
        Ok(())
    }

    /// Load icons then recent changes on a background task. With `refresh`,
    /// the cached listing is revalidated first.
    fn spawn_load(&mut self, refresh: bool) {
        if self.loading {
            self.console.log_info("Load already in progress");
            return;
        }
        self.loading = true;
        self.catalog.set_loading();
        if refresh {
            self.console.log_info(format!("Refreshing {}", self.repo_slug));
        }

        let fetcher = Arc::clone(&self.fetcher);
        let tx = self.events_tx.clone();
        tokio::spawn(async move {
            // Concurrent loads queue here and find the cache already written
            let fetcher = fetcher.lock().await;
            if refresh {
                fetcher.request_refresh();
            }

            let icons = fetcher.fetch_icons().await.map_err(|e| e.to_string());
            let _ = tx.send(LoadEvent::Icons(icons));
            let changes = fetcher.fetch_recent_changes().await;
            let _ = tx.send(LoadEvent::Changes(changes));
            let _ = tx.send(LoadEvent::RateLimit(fetcher.source().client().rate_limit()));
            let _ = tx.send(LoadEvent::Finished);
        });
    }

    /// Apply results from background loads.
    fn drain_events(&mut self) {
        while let Ok(event) = self.events_rx.try_recv() {
            self.apply_event(event);
        }
    }

    fn apply_event(&mut self, event: LoadEvent) {
        match event {
            LoadEvent::Icons(Ok(icons)) => {
                self.console.log_info(format!(
                    "Loaded {} icons from {}",
                    icons.len(),
                    self.repo_slug
                ));
                self.catalog.set_loaded(icons);
            }
            LoadEvent::Icons(Err(e)) => {
                self.console.log_error(format!("Failed to load icons: {}", e));
                self.catalog.set_error(e);
            }
            LoadEvent::Changes(changes) => {
                if !changes.is_empty() {
                    self.console
                        .log_info(format!("{} icons changed recently", changes.len()));
                }
                self.catalog.set_changes(changes);
            }
            LoadEvent::RateLimit(rate) => {
                if rate.limit > 0 && rate.remaining == 0 {
                    self.console.log_warn("GitHub API rate limit exhausted");
                }
                self.rate_limit = Some(rate);
            }
            LoadEvent::Finished => self.loading = false,
        }
        if self.active_tab == Tab::Console {
            self.console.mark_read();
        }
    }

    /// Handle keyboard and other events.
    fn handle_events(&mut self) -> io::Result<()> {
        if event::poll(Duration::from_millis(100))? {
            if let Event::Key(key) = event::read()? {
                if key.kind == KeyEventKind::Press {
                    self.handle_key(key);
                }
            }
        }
        Ok(())
    }

    fn handle_key(&mut self, key: KeyEvent) {
        if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
            self.should_quit = true;
            return;
        }

        if self.search_active {
            self.handle_search_key(key.code);
            return;
        }

        if self.show_help {
            match key.code {
                KeyCode::Esc | KeyCode::Char('?') => self.show_help = false,
                KeyCode::Char('q') => self.should_quit = true,
                _ => {}
            }
            return;
        }

        if self.show_details {
            if matches!(key.code, KeyCode::Esc | KeyCode::Enter | KeyCode::Char('q')) {
                self.show_details = false;
            }
            return;
        }

        match key.code {
            KeyCode::Char('q') => self.should_quit = true,
            KeyCode::Char('?') => self.show_help = true,
            KeyCode::Tab => self.switch_tab(self.active_tab.next()),
            KeyCode::BackTab => self.switch_tab(self.active_tab.prev()),
            KeyCode::Char('r') => self.spawn_load(true),
            KeyCode::Char('d') => self.toggle_dark_mode(),
            KeyCode::Down | KeyCode::Char('j') => self.select_next(),
            KeyCode::Up | KeyCode::Char('k') => self.select_prev(),
            _ if self.active_tab == Tab::Icons => self.handle_icons_key(key.code),
            _ => {}
        }
    }

    fn handle_icons_key(&mut self, code: KeyCode) {
        match code {
            KeyCode::Char('/') => self.search_active = true,
            KeyCode::Char('c') => self.catalog.cycle_category(),
            KeyCode::Char('t') => self.catalog.cycle_file_type(),
            KeyCode::Char('n') => self.catalog.toggle_new_only(),
            KeyCode::Enter => self.show_details = self.catalog.selected_row().is_some(),
            KeyCode::Esc => self.catalog.clear_query(),
            _ => {}
        }
    }

    fn handle_search_key(&mut self, code: KeyCode) {
        match code {
            KeyCode::Esc | KeyCode::Enter => self.search_active = false,
            KeyCode::Backspace => self.catalog.pop_query_char(),
            KeyCode::Down => self.catalog.select_next(),
            KeyCode::Up => self.catalog.select_prev(),
            KeyCode::Char(c) => self.catalog.push_query_char(c),
            _ => {}
        }
    }

    fn select_next(&mut self) {
        match self.active_tab {
            Tab::Icons => self.catalog.select_next(),
            Tab::Recent => self.catalog.recent_next(),
            Tab::Console => self.console.select_next(),
        }
    }

    fn select_prev(&mut self) {
        match self.active_tab {
            Tab::Icons => self.catalog.select_prev(),
            Tab::Recent => self.catalog.recent_prev(),
            Tab::Console => self.console.select_prev(),
        }
    }

    fn switch_tab(&mut self, tab: Tab) {
        self.active_tab = tab;
        // Clear console badge when viewing console tab
        if tab == Tab::Console {
            self.console.mark_read();
        }
    }

    fn toggle_dark_mode(&mut self) {
        self.dark_mode = !self.dark_mode;
        self.cache.set_dark_mode(self.dark_mode);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::MemoryStore;
    use crate::config::Config;
    use crate::github::GitHubClient;

    fn app() -> App {
        let config = Config::default();
        let client = GitHubClient::new(&config.api_base, None).unwrap();
        let cache = CacheService::new(Arc::new(MemoryStore::new()), config.cache_ttl);
        let fetcher = CatalogFetcher::new(
            GitHubSource::new(client, &config),
            cache,
            config.retry,
            &config.raw_base,
        );
        App::new(fetcher, config.repo_slug())
    }

    fn press(app: &mut App, code: KeyCode) {
        app.handle_key(KeyEvent::new(code, KeyModifiers::NONE));
    }

    fn icon(path: &str) -> IconRecord {
        IconRecord::from_path(path, None, "https://raw.example/", 2026).unwrap()
    }

    #[test]
    fn test_tab_cycle() {
        assert_eq!(Tab::Icons.next(), Tab::Recent);
        assert_eq!(Tab::Icons.prev(), Tab::Console);
        for tab in Tab::ALL {
            assert_eq!(tab.next().prev(), tab);
        }
    }

    #[test]
    fn test_help_only_on_first_visit() {
        let mut app = app();
        assert!(app.show_help);
        press(&mut app, KeyCode::Esc);
        assert!(!app.show_help);
        assert!(!app.cache.is_first_visit());
    }

    #[test]
    fn test_search_input_routes_keys() {
        let mut app = app();
        app.show_help = false;
        app.apply_event(LoadEvent::Icons(Ok(vec![
            icon("Teams/Teams.png"),
            icon("Azure/Azure.svg"),
        ])));

        press(&mut app, KeyCode::Char('/'));
        assert!(app.search_active);
        for c in "teams".chars() {
            press(&mut app, KeyCode::Char(c));
        }
        // 'q' while typing is text, not quit
        press(&mut app, KeyCode::Char('q'));
        assert!(!app.should_quit);
        assert_eq!(app.catalog.query, "teamsq");
        press(&mut app, KeyCode::Backspace);
        press(&mut app, KeyCode::Enter);
        assert!(!app.search_active);
        assert_eq!(app.catalog.rows.len(), 1);

        press(&mut app, KeyCode::Enter);
        assert!(app.show_details);
        press(&mut app, KeyCode::Esc);
        assert!(!app.show_details);
    }

    #[test]
    fn test_dark_mode_persists() {
        let mut app = app();
        app.show_help = false;
        assert!(app.dark_mode);
        press(&mut app, KeyCode::Char('d'));
        assert!(!app.dark_mode);
        assert!(!app.cache.dark_mode());
    }

    #[test]
    fn test_console_badge_cleared_on_view() {
        let mut app = app();
        app.show_help = false;
        app.apply_event(LoadEvent::Icons(Err("offline".to_string())));
        assert_eq!(app.console.unread, 1);
        assert!(matches!(app.catalog.icons, crate::state::LoadingState::Error(_)));

        press(&mut app, KeyCode::BackTab);
        assert_eq!(app.active_tab, Tab::Console);
        assert_eq!(app.console.unread, 0);
    }
}
