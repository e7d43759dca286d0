//! Background fetches for the widget views.
//!
//! Each request runs on its own tokio task and reports back through an
//! unbounded channel. Messages carry the [`Ticket`] issued when the
//! request started so the app can drop answers that were superseded.

use std::future::Future;
use std::sync::Arc;

use tokio::sync::mpsc;
use vantage_core::config::settings::Config;
use vantage_core::providers::film::{FilmProvider, Movie};
use vantage_core::providers::finance::{FinanceProvider, StockSnapshot, TickerSuggestion};
use vantage_core::providers::music::{MusicLibrary, MusicProvider};
use vantage_core::providers::news::{Article, NewsCategory, NewsProvider};
use vantage_core::providers::repo::{RepoProvider, RepoStats};
use vantage_core::providers::weather::{PlaceSuggestion, WeatherProvider, WeatherReport};
use vantage_core::{CoreResult, HttpClient, Ticket, WidgetKind};

/// Messages sent from background tasks to the main loop.
#[derive(Debug)]
pub enum FetchMessage {
    /// A debounced query went quiet; time to look up suggestions.
    SuggestDue(WidgetKind),
    PlaceSuggestions(Ticket, CoreResult<Vec<PlaceSuggestion>>),
    Weather(Ticket, CoreResult<WeatherReport>),
    News(Ticket, CoreResult<Vec<Article>>),
    TickerSuggestions(Ticket, CoreResult<Vec<TickerSuggestion>>),
    Stock(Ticket, CoreResult<StockSnapshot>),
    Repo(Ticket, CoreResult<RepoStats>),
    Trending(Ticket, CoreResult<Vec<Movie>>),
    TitleSuggestions(Ticket, CoreResult<Vec<Movie>>),
    FilmSearch(Ticket, CoreResult<Vec<Movie>>),
    Music(Ticket, CoreResult<MusicLibrary>),
}

/// A request the app wants issued.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FetchRequest {
    PlaceSuggestions { ticket: Ticket, query: String },
    Weather { ticket: Ticket, place: String },
    News { ticket: Ticket, category: NewsCategory },
    TickerSuggestions { ticket: Ticket, query: String },
    Stock { ticket: Ticket, symbol: String },
    Repo { ticket: Ticket, url: String },
    Trending { ticket: Ticket },
    TitleSuggestions { ticket: Ticket, query: String },
    FilmSearch { ticket: Ticket, query: String },
    Music { ticket: Ticket, token: String },
}

/// The provider adapters, shared across tasks.
#[derive(Clone)]
pub struct Providers {
    pub weather: Arc<WeatherProvider>,
    pub news: Arc<NewsProvider>,
    pub finance: Arc<FinanceProvider>,
    pub repo: Arc<RepoProvider>,
    pub film: Arc<FilmProvider>,
    pub music: Arc<MusicProvider>,
}

impl Providers {
    pub fn new(client: Arc<dyn HttpClient>, config: &Config) -> Self {
        Self {
            weather: Arc::new(WeatherProvider::new(client.clone(), config.weather.clone())),
            news: Arc::new(NewsProvider::new(client.clone(), config.news.clone())),
            finance: Arc::new(FinanceProvider::new(client.clone(), config.finance.clone())),
            repo: Arc::new(RepoProvider::new(client.clone(), config.github.clone())),
            film: Arc::new(FilmProvider::new(client.clone(), config.film.clone())),
            music: Arc::new(MusicProvider::new(client, config.music.clone())),
        }
    }
}

/// Runs `fut` on a new task and sends its result, wrapped by `wrap`.
fn spawn_fetch<T, Fut, W>(tx: &mpsc::UnboundedSender<FetchMessage>, fut: Fut, wrap: W)
where
    T: Send + 'static,
    Fut: Future<Output = CoreResult<T>> + Send + 'static,
    W: FnOnce(CoreResult<T>) -> FetchMessage + Send + 'static,
{
    let tx = tx.clone();
    tokio::spawn(async move {
        let result = fut.await;
        // Receiver gone means the app is shutting down.
        let _ = tx.send(wrap(result));
    });
}

/// Issues `request` in the background.
pub fn dispatch(
    providers: &Providers,
    request: FetchRequest,
    tx: &mpsc::UnboundedSender<FetchMessage>,
) {
    tracing::debug!("Dispatching {request:?}");
    match request {
        FetchRequest::PlaceSuggestions { ticket, query } => {
            let p = providers.weather.clone();
            spawn_fetch(tx, async move { p.suggest(&query).await }, move |r| {
                FetchMessage::PlaceSuggestions(ticket, r)
            });
        }
        FetchRequest::Weather { ticket, place } => {
            let p = providers.weather.clone();
            spawn_fetch(tx, async move { p.report(&place).await }, move |r| {
                FetchMessage::Weather(ticket, r)
            });
        }
        FetchRequest::News { ticket, category } => {
            let p = providers.news.clone();
            spawn_fetch(tx, async move { p.top_headlines(category).await }, move |r| {
                FetchMessage::News(ticket, r)
            });
        }
        FetchRequest::TickerSuggestions { ticket, query } => {
            let p = providers.finance.clone();
            spawn_fetch(tx, async move { p.search_tickers(&query).await }, move |r| {
                FetchMessage::TickerSuggestions(ticket, r)
            });
        }
        FetchRequest::Stock { ticket, symbol } => {
            let p = providers.finance.clone();
            let today = chrono::Local::now().date_naive();
            spawn_fetch(tx, async move { p.snapshot(&symbol, today).await }, move |r| {
                FetchMessage::Stock(ticket, r)
            });
        }
        FetchRequest::Repo { ticket, url } => {
            let p = providers.repo.clone();
            spawn_fetch(tx, async move { p.stats_for_url(&url).await }, move |r| {
                FetchMessage::Repo(ticket, r)
            });
        }
        FetchRequest::Trending { ticket } => {
            let p = providers.film.clone();
            spawn_fetch(tx, async move { p.trending().await }, move |r| {
                FetchMessage::Trending(ticket, r)
            });
        }
        FetchRequest::TitleSuggestions { ticket, query } => {
            let p = providers.film.clone();
            spawn_fetch(tx, async move { p.autocomplete(&query).await }, move |r| {
                FetchMessage::TitleSuggestions(ticket, r)
            });
        }
        FetchRequest::FilmSearch { ticket, query } => {
            let p = providers.film.clone();
            spawn_fetch(tx, async move { p.search(&query).await }, move |r| {
                FetchMessage::FilmSearch(ticket, r)
            });
        }
        FetchRequest::Music { ticket, token } => {
            let p = providers.music.clone();
            spawn_fetch(tx, async move { p.library(&token).await }, move |r| {
                FetchMessage::Music(ticket, r)
            });
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use vantage_core::{Generation, StubClient};

    fn providers(stub: StubClient) -> Providers {
        Providers::new(stub.into_shared(), &Config::default())
    }

    #[tokio::test]
    async fn dispatch_reports_result_with_its_ticket() {
        let stub = StubClient::new().ok("/search", r#"[{"place_id": 1, "display_name": "Rome"}]"#);
        let (tx, mut rx) = mpsc::unbounded_channel();
        let ticket = Generation::new().issue();

        dispatch(
            &providers(stub),
            FetchRequest::PlaceSuggestions {
                ticket,
                query: "rom".to_string(),
            },
            &tx,
        );

        match rx.recv().await {
            Some(FetchMessage::PlaceSuggestions(got, Ok(list))) => {
                assert_eq!(got, ticket);
                assert_eq!(list[0].display_name, "Rome");
            }
            other => panic!("unexpected message: {other:?}"),
        }
    }

    #[tokio::test]
    async fn dispatch_forwards_errors() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let ticket = Generation::new().issue();

        dispatch(
            &providers(StubClient::new()),
            FetchRequest::Trending { ticket },
            &tx,
        );

        assert!(matches!(
            rx.recv().await,
            Some(FetchMessage::Trending(_, Err(_)))
        ));
    }
}
