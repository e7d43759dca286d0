use std::time::Instant;

use tokio::sync::mpsc;
use vantage_core::auth::token::now_ms;
use vantage_core::config::settings::Config;
use vantage_core::fetch::throttle::Throttle;
use vantage_core::providers::film::FilmProvider;
use vantage_core::providers::finance::{FinanceProvider, SuggestDecision, TickerSuggester};
use vantage_core::providers::music::MusicProvider;
use vantage_core::providers::news::{NewsFeed, NewsProvider};
use vantage_core::providers::repo::{RepoProvider, RepoRef, INVALID_URL};
use vantage_core::providers::weather::WeatherProvider;
use vantage_core::{
    Command, CoreError, Dashboard, DragSession, Event, OAuthConfig, TokenStore, WidgetKind,
};

use crate::background::{FetchMessage, FetchRequest};
use crate::input::InputAction;
use crate::panes::{FilmPane, FinancePane, MusicPane, NewsPane, RepoPane, WeatherPane};

/// Tiles per row in the selector grid.
pub const GRID_COLUMNS: usize = 3;

/// What the keyboard is currently driving.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppMode {
    /// Browsing the selector grid.
    Selector,
    /// A tile is picked up; arrows move it.
    Dragging,
    /// A widget's detail view is open.
    Widget(WidgetKind),
}

/// Main application state.
pub struct App {
    dashboard: Dashboard,
    cursor: usize,
    drag: Option<DragSession>,
    status: Option<String>,
    should_quit: bool,
    tokens: TokenStore,
    oauth: OAuthConfig,
    tx: mpsc::UnboundedSender<FetchMessage>,
    weather: WeatherPane,
    news: NewsPane,
    finance: FinancePane,
    repo: RepoPane,
    film: FilmPane,
    music: MusicPane,
}

impl App {
    /// Creates the app on the selector grid. Debounced lookups report
    /// back through `tx`.
    pub fn new(
        dashboard: Dashboard,
        config: &Config,
        tokens: TokenStore,
        tx: mpsc::UnboundedSender<FetchMessage>,
    ) -> Self {
        let search = &config.search;
        let suggester = TickerSuggester::new(
            search.ticker_policy(),
            Throttle::new(search.ticker_spacing()),
        );
        Self {
            dashboard,
            cursor: 0,
            drag: None,
            status: None,
            should_quit: false,
            tokens,
            oauth: OAuthConfig::from(&config.music),
            tx,
            weather: WeatherPane::new(search.place_policy()),
            news: NewsPane::new(config.news.items_per_page),
            finance: FinancePane::new(suggester),
            repo: RepoPane::default(),
            film: FilmPane::new(search.title_policy()),
            music: MusicPane::default(),
        }
    }

    /// Returns a new App with the given status message.
    pub fn with_status(self, msg: impl Into<String>) -> Self {
        Self {
            status: Some(msg.into()),
            ..self
        }
    }

    // --- Accessors ---

    pub fn mode(&self) -> AppMode {
        match (self.dashboard.selection().active(), self.drag) {
            (Some(kind), _) => AppMode::Widget(kind),
            (None, Some(_)) => AppMode::Dragging,
            (None, None) => AppMode::Selector,
        }
    }

    pub fn dashboard(&self) -> &Dashboard {
        &self.dashboard
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn status(&self) -> Option<&str> {
        self.status.as_deref()
    }

    pub fn should_quit(&self) -> bool {
        self.should_quit
    }

    pub fn weather(&self) -> &WeatherPane {
        &self.weather
    }

    pub fn news(&self) -> &NewsPane {
        &self.news
    }

    pub fn finance(&self) -> &FinancePane {
        &self.finance
    }

    pub fn repo(&self) -> &RepoPane {
        &self.repo
    }

    pub fn film(&self) -> &FilmPane {
        &self.film
    }

    pub fn music(&self) -> &MusicPane {
        &self.music
    }

    // --- Input ---

    /// Applies one key action and returns the requests it calls for.
    pub fn apply(&mut self, action: InputAction) -> Vec<FetchRequest> {
        match action {
            InputAction::Quit => {
                self.should_quit = true;
                Vec::new()
            }
            InputAction::None => Vec::new(),
            InputAction::Command(cmd) => self.run_command(cmd),
            InputAction::CursorLeft
            | InputAction::CursorRight
            | InputAction::CursorUp
            | InputAction::CursorDown => {
                self.navigate(&action);
                Vec::new()
            }
            InputAction::OpenAtCursor => match self.dashboard.order().get(self.cursor) {
                Some(kind) => self.run_command(Command::Select(kind)),
                None => Vec::new(),
            },
            InputAction::Grab => {
                self.drag = Some(DragSession::begin(self.cursor));
                self.status = Some("Moving tile: arrows to move, Space to drop".to_string());
                Vec::new()
            }
            InputAction::Drop => {
                if let Some(session) = self.drag.take() {
                    self.cursor = session.drop();
                }
                self.status = None;
                Vec::new()
            }
            other => match self.dashboard.selection().active() {
                Some(kind) => self.apply_widget(kind, other),
                None => Vec::new(),
            },
        }
    }

    fn run_command(&mut self, cmd: Command) -> Vec<FetchRequest> {
        let mut requests = Vec::new();
        for event in self.dashboard.handle_command(cmd) {
            match event {
                Event::SelectionChanged(selection) => {
                    self.status = None;
                    if let Some(kind) = selection.active() {
                        requests.extend(self.on_open(kind));
                    }
                }
                Event::OrderChanged(_) => {
                    self.cursor = 0;
                    self.status = Some("Widget order reset".to_string());
                }
                Event::OperationFailed { operation, error } => {
                    self.status = Some(format!("Failed to {operation}: {error}"));
                }
            }
        }
        requests
    }

    fn navigate(&mut self, action: &InputAction) {
        let len = self.dashboard.order().len();
        let from = self.drag.map_or(self.cursor, |d| d.current());
        let target = step(from, action, len);
        if let Some(session) = self.drag {
            match session.hover(self.dashboard.reorder_mut(), target) {
                Ok(next) => self.drag = Some(next),
                Err(e) => {
                    self.status = Some(e.to_string());
                    return;
                }
            }
        }
        self.cursor = target;
    }

    /// Loads whatever a widget shows before any input.
    fn on_open(&mut self, kind: WidgetKind) -> Vec<FetchRequest> {
        match kind {
            WidgetKind::News if self.news.feed.view().data().is_none() => vec![self.load_news()],
            WidgetKind::Movie if self.film.trending.view().data().is_none() => {
                vec![FetchRequest::Trending {
                    ticket: self.film.trending.begin(),
                }]
            }
            WidgetKind::Spotify => self.load_music(),
            _ => Vec::new(),
        }
    }

    fn apply_widget(&mut self, kind: WidgetKind, action: InputAction) -> Vec<FetchRequest> {
        match action {
            InputAction::QueryChar(c) => {
                self.edit_query(kind, |text| text.push(c));
                self.after_edit(kind)
            }
            InputAction::QueryBackspace => {
                self.edit_query(kind, |text| {
                    text.pop();
                });
                self.after_edit(kind)
            }
            InputAction::SuggestionDown => {
                match kind {
                    WidgetKind::Weather => self.weather.query.highlight_next(),
                    WidgetKind::Finance => self.finance.query.highlight_next(),
                    WidgetKind::Movie => self.film.query.highlight_next(),
                    _ => {}
                }
                Vec::new()
            }
            InputAction::SuggestionUp => {
                match kind {
                    WidgetKind::Weather => self.weather.query.highlight_prev(),
                    WidgetKind::Finance => self.finance.query.highlight_prev(),
                    WidgetKind::Movie => self.film.query.highlight_prev(),
                    _ => {}
                }
                Vec::new()
            }
            InputAction::Submit => self.submit(kind),
            InputAction::Cycle => match kind {
                WidgetKind::News => {
                    self.news.category = self.news.category.next();
                    vec![self.load_news()]
                }
                WidgetKind::Finance => {
                    self.finance.range = self.finance.range.next();
                    Vec::new()
                }
                _ => Vec::new(),
            },
            InputAction::LoadMore => {
                let more = self.news.feed.data_mut().is_some_and(NewsFeed::load_more);
                if !more {
                    self.status = Some("No more articles".to_string());
                }
                Vec::new()
            }
            InputAction::Login => {
                self.login();
                Vec::new()
            }
            InputAction::Logout => {
                if let Err(e) = self.tokens.logout() {
                    tracing::error!("Failed to clear music token: {e}");
                }
                self.music.library.reset();
                self.music.connected = false;
                self.status = Some("Disconnected from Spotify".to_string());
                Vec::new()
            }
            _ => Vec::new(),
        }
    }

    fn edit_query(&mut self, kind: WidgetKind, edit: impl FnOnce(&mut String)) {
        let text = match kind {
            WidgetKind::Weather => self.weather.query.text(),
            WidgetKind::Finance => self.finance.query.text(),
            WidgetKind::Movie => self.film.query.text(),
            WidgetKind::Github => self.repo.url.as_str(),
            WidgetKind::News | WidgetKind::Spotify => return,
        };
        let mut text = text.to_string();
        edit(&mut text);
        match kind {
            WidgetKind::Weather => self.weather.query.set_text(text),
            WidgetKind::Finance => self.finance.query.set_text(text),
            WidgetKind::Movie => self.film.query.set_text(text),
            _ => self.repo.url = text,
        }
    }

    /// Suggestion handling after the query text changed.
    fn after_edit(&mut self, kind: WidgetKind) -> Vec<FetchRequest> {
        match kind {
            WidgetKind::Weather => {
                let pane = &mut self.weather;
                if pane.policy.accepts(pane.query.text()) {
                    pane.debouncer.schedule(notify_due(&self.tx, kind));
                } else {
                    pane.debouncer.cancel();
                    pane.query.clear_suggestions();
                }
                Vec::new()
            }
            WidgetKind::Movie => {
                let pane = &mut self.film;
                if pane.policy.accepts(pane.query.text()) {
                    pane.debouncer.schedule(notify_due(&self.tx, kind));
                } else {
                    pane.debouncer.cancel();
                    pane.query.clear_suggestions();
                }
                Vec::new()
            }
            WidgetKind::Finance => {
                let pane = &mut self.finance;
                if pane.suggester.policy().accepts(pane.query.text()) {
                    pane.debouncer.schedule(notify_due(&self.tx, kind));
                } else {
                    pane.debouncer.cancel();
                    pane.query.clear_suggestions();
                }
                Vec::new()
            }
            _ => Vec::new(),
        }
    }

    fn submit(&mut self, kind: WidgetKind) -> Vec<FetchRequest> {
        match kind {
            WidgetKind::Weather => {
                let pane = &mut self.weather;
                if let Some(place) = pane.query.highlighted().map(|s| s.display_name.clone()) {
                    pane.query.set_text(place);
                }
                pane.debouncer.cancel();
                pane.query.clear_suggestions();
                vec![FetchRequest::Weather {
                    ticket: pane.report.begin(),
                    place: pane.query.text().to_string(),
                }]
            }
            WidgetKind::Finance => {
                let pane = &mut self.finance;
                if let Some(symbol) = pane.query.highlighted().map(|s| s.symbol.clone()) {
                    pane.query.set_text(symbol);
                }
                pane.debouncer.cancel();
                pane.query.clear_suggestions();
                vec![FetchRequest::Stock {
                    ticket: pane.snapshot.begin(),
                    symbol: pane.query.text().to_string(),
                }]
            }
            WidgetKind::Github => {
                let pane = &mut self.repo;
                if RepoRef::parse(&pane.url).is_err() {
                    pane.stats.reject(INVALID_URL);
                    return Vec::new();
                }
                vec![FetchRequest::Repo {
                    ticket: pane.stats.begin(),
                    url: pane.url.clone(),
                }]
            }
            WidgetKind::Movie => {
                let pane = &mut self.film;
                if let Some(title) = pane.query.highlighted().map(|m| m.title.clone()) {
                    pane.query.set_text(title);
                }
                pane.debouncer.cancel();
                pane.query.clear_suggestions();
                let query = pane.query.text().trim().to_string();
                if query.is_empty() {
                    pane.searching = false;
                    pane.results.reset();
                    return Vec::new();
                }
                pane.searching = true;
                vec![FetchRequest::FilmSearch {
                    ticket: pane.results.begin(),
                    query,
                }]
            }
            WidgetKind::News => vec![self.load_news()],
            WidgetKind::Spotify => self.load_music(),
        }
    }

    fn load_news(&mut self) -> FetchRequest {
        FetchRequest::News {
            ticket: self.news.feed.begin(),
            category: self.news.category,
        }
    }

    fn load_music(&mut self) -> Vec<FetchRequest> {
        match self.tokens.valid_token(now_ms()) {
            Some(token) => {
                self.music.connected = true;
                vec![FetchRequest::Music {
                    ticket: self.music.library.begin(),
                    token,
                }]
            }
            None => {
                self.music.connected = false;
                self.music.library.reset();
                Vec::new()
            }
        }
    }

    fn login(&mut self) {
        match self.oauth.authorize_url() {
            Ok(url) => {
                open_in_browser(&url);
                self.status = Some(format!("Log in from your browser: {url}"));
            }
            Err(e) => self.status = Some(e.user_message()),
        }
    }

    // --- Background results ---

    /// Commits a background result, returning any follow-up requests.
    pub fn receive(&mut self, msg: FetchMessage) -> Vec<FetchRequest> {
        match msg {
            FetchMessage::SuggestDue(kind) => return self.suggest_now(kind),
            FetchMessage::PlaceSuggestions(ticket, result) => {
                if self.weather.query.slot_mut().finish(ticket, result) {
                    self.weather.query.unhighlight();
                }
            }
            FetchMessage::Weather(ticket, result) => {
                self.weather
                    .report
                    .finish_with(ticket, result, WeatherProvider::describe_failure);
            }
            FetchMessage::News(ticket, result) => {
                let per_page = self.news.per_page;
                let result = result.map(|articles| NewsFeed::new(articles, per_page));
                self.news
                    .feed
                    .finish_with(ticket, result, NewsProvider::describe_failure);
            }
            FetchMessage::TickerSuggestions(ticket, result) => {
                if self.finance.query.slot_mut().finish(ticket, result) {
                    self.finance.query.unhighlight();
                }
            }
            FetchMessage::Stock(ticket, result) => {
                self.finance
                    .snapshot
                    .finish_with(ticket, result, FinanceProvider::describe_failure);
            }
            FetchMessage::Repo(ticket, result) => {
                self.repo
                    .stats
                    .finish_with(ticket, result, RepoProvider::describe_failure);
            }
            FetchMessage::Trending(ticket, result) => {
                self.film
                    .trending
                    .finish_with(ticket, result, FilmProvider::describe_trending_failure);
            }
            FetchMessage::TitleSuggestions(ticket, result) => {
                if self.film.query.slot_mut().finish(ticket, result) {
                    self.film.query.unhighlight();
                }
            }
            FetchMessage::FilmSearch(ticket, result) => {
                self.film
                    .results
                    .finish_with(ticket, result, FilmProvider::describe_failure);
            }
            FetchMessage::Music(ticket, result) => {
                if matches!(result, Err(CoreError::Unauthorized))
                    && self.music.library.generation().is_current(ticket)
                {
                    if let Err(e) = self.tokens.logout() {
                        tracing::error!("Failed to clear rejected music token: {e}");
                    }
                    self.music.connected = false;
                }
                self.music
                    .library
                    .finish_with(ticket, result, MusicProvider::describe_failure);
            }
        }
        Vec::new()
    }

    /// A debounced query went quiet. The text may have changed since, so
    /// the policy is checked again against what is typed now.
    fn suggest_now(&mut self, kind: WidgetKind) -> Vec<FetchRequest> {
        match kind {
            WidgetKind::Weather if self.weather.policy.accepts(self.weather.query.text()) => {
                let query = self.weather.query.text().trim().to_string();
                vec![FetchRequest::PlaceSuggestions {
                    ticket: self.weather.query.slot_mut().begin(),
                    query,
                }]
            }
            WidgetKind::Movie if self.film.policy.accepts(self.film.query.text()) => {
                let query = self.film.query.text().trim().to_string();
                vec![FetchRequest::TitleSuggestions {
                    ticket: self.film.query.slot_mut().begin(),
                    query,
                }]
            }
            WidgetKind::Finance => {
                let pane = &mut self.finance;
                let query = pane.query.text().trim().to_string();
                match pane.suggester.decide(&query, Instant::now()) {
                    SuggestDecision::Clear => {
                        pane.query.clear_suggestions();
                        Vec::new()
                    }
                    SuggestDecision::Skip => Vec::new(),
                    SuggestDecision::Fetch => vec![FetchRequest::TickerSuggestions {
                        ticket: pane.query.slot_mut().begin(),
                        query,
                    }],
                }
            }
            _ => Vec::new(),
        }
    }
}

/// The grid index one step from `from`, clamped to the grid.
pub fn step(from: usize, action: &InputAction, len: usize) -> usize {
    if len == 0 {
        return 0;
    }
    let last = len - 1;
    match action {
        InputAction::CursorLeft => from.saturating_sub(1),
        InputAction::CursorRight => (from + 1).min(last),
        InputAction::CursorUp if from >= GRID_COLUMNS => from - GRID_COLUMNS,
        InputAction::CursorDown if from + GRID_COLUMNS <= last => from + GRID_COLUMNS,
        _ => from,
    }
}

fn notify_due(
    tx: &mpsc::UnboundedSender<FetchMessage>,
    kind: WidgetKind,
) -> impl std::future::Future<Output = ()> + Send + 'static {
    let tx = tx.clone();
    async move {
        let _ = tx.send(FetchMessage::SuggestDue(kind));
    }
}

/// Hands `url` to the desktop's URL opener. Failure only means the user
/// has to copy the URL from the status bar.
fn open_in_browser(url: &str) {
    let opener = if cfg!(target_os = "macos") {
        "open"
    } else {
        "xdg-open"
    };
    match std::process::Command::new(opener)
        .arg(url)
        .stdout(std::process::Stdio::null())
        .stderr(std::process::Stdio::null())
        .spawn()
    {
        Ok(_) => tracing::info!("Opened authorize URL with {opener}"),
        Err(e) => tracing::warn!("Could not launch {opener}: {e}"),
    }
}
