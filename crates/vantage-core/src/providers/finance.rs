//! Equity quotes, daily history and ticker lookup.

use std::fmt;
use std::str::FromStr;
use std::sync::Arc;
use std::time::Instant;

use chrono::{DateTime, Days, Months, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::config::settings::FinanceConfig;
use crate::error::{CoreError, CoreResult};
use crate::fetch::debounce::SuggestPolicy;
use crate::fetch::throttle::Throttle;
use crate::http::{fetch_json, HttpClient, HttpRequest};
use crate::providers::describe_with;

const FETCH_FAILED: &str = "Failed to fetch stock data. Please try again.";

/// Trailing window applied to the daily history.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TimeRange {
    #[serde(rename = "1W")]
    OneWeek,
    #[default]
    #[serde(rename = "1M")]
    OneMonth,
    #[serde(rename = "3M")]
    ThreeMonths,
    #[serde(rename = "6M")]
    SixMonths,
    #[serde(rename = "1Y")]
    OneYear,
    #[serde(rename = "ALL")]
    All,
}

impl TimeRange {
    pub const ALL: [TimeRange; 6] = [
        TimeRange::OneWeek,
        TimeRange::OneMonth,
        TimeRange::ThreeMonths,
        TimeRange::SixMonths,
        TimeRange::OneYear,
        TimeRange::All,
    ];

    pub fn label(self) -> &'static str {
        match self {
            Self::OneWeek => "1W",
            Self::OneMonth => "1M",
            Self::ThreeMonths => "3M",
            Self::SixMonths => "6M",
            Self::OneYear => "1Y",
            Self::All => "ALL",
        }
    }

    /// First day inside the window ending `today`, or `None` for
    /// [`TimeRange::All`].
    pub fn start_date(self, today: NaiveDate) -> Option<NaiveDate> {
        match self {
            Self::OneWeek => today.checked_sub_days(Days::new(7)),
            Self::OneMonth => today.checked_sub_months(Months::new(1)),
            Self::ThreeMonths => today.checked_sub_months(Months::new(3)),
            Self::SixMonths => today.checked_sub_months(Months::new(6)),
            Self::OneYear => today.checked_sub_months(Months::new(12)),
            Self::All => None,
        }
    }

    #[must_use]
    pub fn next(self) -> Self {
        let index = Self::ALL.iter().position(|r| *r == self).unwrap_or(0);
        Self::ALL[(index + 1) % Self::ALL.len()]
    }
}

impl fmt::Display for TimeRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for TimeRange {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|r| r.label().eq_ignore_ascii_case(s))
            .ok_or_else(|| CoreError::InvalidInput(format!("unknown time range: {s}")))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PricePoint {
    pub date: NaiveDate,
    pub price: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StockSnapshot {
    pub symbol: String,
    pub price: f64,
    pub change: f64,
    pub change_percent: f64,
    pub high: f64,
    pub low: f64,
    pub open: f64,
    pub previous_close: f64,
    pub volume: f64,
    /// Oldest first.
    pub historical_data: Vec<PricePoint>,
}

impl StockSnapshot {
    /// History points on or after the start of `range`.
    pub fn window(&self, range: TimeRange, today: NaiveDate) -> &[PricePoint] {
        match range.start_date(today) {
            None => &self.historical_data,
            Some(start) => {
                let first = self.historical_data.partition_point(|p| p.date < start);
                &self.historical_data[first..]
            }
        }
    }

    pub fn is_up(&self) -> bool {
        self.change >= 0.0
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TickerSuggestion {
    pub symbol: String,
    pub name: String,
}

#[derive(Deserialize)]
struct AggregatesBody {
    #[serde(default)]
    results: Option<Vec<Bar>>,
}

#[derive(Deserialize)]
struct Bar {
    o: Option<f64>,
    c: Option<f64>,
    h: Option<f64>,
    l: Option<f64>,
    v: Option<f64>,
    pc: Option<f64>,
    t: Option<i64>,
}

#[derive(Deserialize)]
struct TickersBody {
    #[serde(default)]
    results: Option<Vec<RawTicker>>,
}

#[derive(Deserialize)]
struct RawTicker {
    ticker: String,
    #[serde(default)]
    name: String,
}

pub struct FinanceProvider {
    client: Arc<dyn HttpClient>,
    config: FinanceConfig,
}

impl FinanceProvider {
    pub fn new(client: Arc<dyn HttpClient>, config: FinanceConfig) -> Self {
        Self { client, config }
    }

    /// Previous-close quote plus daily history from the configured start
    /// through `today`. Both requests run concurrently; either failing
    /// fails the whole snapshot.
    ///
    /// # Errors
    ///
    /// [`CoreError::InvalidInput`] for a blank symbol, [`CoreError::Empty`]
    /// when the provider has no quote for it.
    pub async fn snapshot(&self, symbol: &str, today: NaiveDate) -> CoreResult<StockSnapshot> {
        let symbol = symbol.trim().to_ascii_uppercase();
        if symbol.is_empty() {
            return Err(CoreError::InvalidInput(
                "Please enter a stock symbol.".to_string(),
            ));
        }
        let aggs = format!("{}/v2/aggs/ticker/{symbol}", self.config.base_url);
        let quote_request = HttpRequest::get(format!("{aggs}/prev"))
            .query("adjusted", "true")
            .query("apiKey", &self.config.api_key);
        let history_request = HttpRequest::get(format!(
            "{aggs}/range/1/day/{}/{}",
            self.config.history_start,
            today.format("%Y-%m-%d")
        ))
        .query("adjusted", "true")
        .query("sort", "asc")
        .query("limit", 50000)
        .query("apiKey", &self.config.api_key);

        let client = self.client.as_ref();
        let (quote, history) = tokio::try_join!(
            fetch_json::<AggregatesBody>(client, quote_request),
            fetch_json::<AggregatesBody>(client, history_request),
        )?;

        let bar = quote
            .results
            .and_then(|bars| bars.into_iter().next())
            .ok_or_else(|| CoreError::Empty(format!("No data found for {symbol}.")))?;
        let mut historical_data: Vec<PricePoint> = history
            .results
            .unwrap_or_default()
            .into_iter()
            .filter_map(|b| {
                let date = DateTime::from_timestamp_millis(b.t?)?.date_naive();
                Some(PricePoint { date, price: b.c? })
            })
            .collect();
        historical_data.sort_by_key(|p| p.date);

        let close = bar.c.unwrap_or(0.0);
        let open = bar.o.unwrap_or(0.0);
        let change = close - open;
        let change_percent = if open == 0.0 { 0.0 } else { change / open * 100.0 };

        Ok(StockSnapshot {
            symbol,
            price: close,
            change,
            change_percent,
            high: bar.h.unwrap_or(0.0),
            low: bar.l.unwrap_or(0.0),
            open,
            previous_close: bar.pc.unwrap_or(0.0),
            volume: bar.v.unwrap_or(0.0),
            historical_data,
        })
    }

    /// Active tickers matching `query`, at most ten.
    pub async fn search_tickers(&self, query: &str) -> CoreResult<Vec<TickerSuggestion>> {
        let request = HttpRequest::get(format!("{}/v3/reference/tickers", self.config.base_url))
            .query("search", query.trim())
            .query("active", "true")
            .query("sort", "ticker")
            .query("order", "asc")
            .query("limit", 10)
            .query("apiKey", &self.config.api_key);
        let body: TickersBody = fetch_json(self.client.as_ref(), request).await?;
        Ok(body
            .results
            .unwrap_or_default()
            .into_iter()
            .map(|t| TickerSuggestion {
                symbol: t.ticker,
                name: t.name,
            })
            .collect())
    }

    pub fn describe_failure(err: &CoreError) -> String {
        describe_with(err, FETCH_FAILED)
    }
}

/// What to do with the suggestion list after a keystroke.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SuggestDecision {
    /// Query too short: clear suggestions, no request.
    Clear,
    /// Too soon after the last request: keep what is shown, no request.
    Skip,
    /// Issue a request.
    Fetch,
}

/// Gates ticker lookups behind a [`SuggestPolicy`] and a [`Throttle`].
///
/// The provider's free tier allows five calls a minute; lookups inside the
/// spacing are dropped, never queued.
#[derive(Debug, Clone)]
pub struct TickerSuggester {
    policy: SuggestPolicy,
    throttle: Throttle,
}

impl TickerSuggester {
    pub fn new(policy: SuggestPolicy, throttle: Throttle) -> Self {
        Self { policy, throttle }
    }

    pub fn policy(&self) -> SuggestPolicy {
        self.policy
    }

    pub fn decide(&mut self, query: &str, now: Instant) -> SuggestDecision {
        if !self.policy.accepts(query) {
            return SuggestDecision::Clear;
        }
        if !self.throttle.try_acquire(now) {
            tracing::debug!("Ticker lookup for {query:?} skipped by rate limit");
            return SuggestDecision::Skip;
        }
        SuggestDecision::Fetch
    }
}
