//! Per-widget view state for the terminal frontend.
//!
//! Every remote result lives in a [`WidgetSlot`], so each pane tracks its
//! own request generation and discards answers to superseded requests.

use vantage_core::fetch::debounce::Debouncer;
use vantage_core::providers::film::Movie;
use vantage_core::providers::finance::{StockSnapshot, TickerSuggester, TickerSuggestion, TimeRange};
use vantage_core::providers::music::MusicLibrary;
use vantage_core::providers::news::{NewsCategory, NewsFeed};
use vantage_core::providers::repo::RepoStats;
use vantage_core::providers::weather::{PlaceSuggestion, WeatherReport};
use vantage_core::{SuggestPolicy, WidgetSlot};

/// A text input with an optional suggestion dropdown.
#[derive(Debug, Clone)]
pub struct QueryBox<S> {
    text: String,
    suggestions: WidgetSlot<Vec<S>>,
    highlighted: Option<usize>,
}

impl<S> Default for QueryBox<S> {
    fn default() -> Self {
        Self {
            text: String::new(),
            suggestions: WidgetSlot::new(),
            highlighted: None,
        }
    }
}

impl<S> QueryBox<S> {
    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn set_text(&mut self, text: impl Into<String>) {
        self.text = text.into();
    }

    /// The suggestions currently on screen; empty unless the last lookup
    /// succeeded.
    pub fn suggestions(&self) -> &[S] {
        match self.suggestions.view().error() {
            Some(_) => &[],
            None => self
                .suggestions
                .view()
                .data()
                .map(Vec::as_slice)
                .unwrap_or(&[]),
        }
    }

    pub fn slot_mut(&mut self) -> &mut WidgetSlot<Vec<S>> {
        &mut self.suggestions
    }

    /// Empties the dropdown and supersedes any lookup in flight.
    pub fn clear_suggestions(&mut self) {
        self.suggestions.reset();
        self.highlighted = None;
    }

    /// Called after a fresh list arrives.
    pub fn unhighlight(&mut self) {
        self.highlighted = None;
    }

    pub fn highlighted_index(&self) -> Option<usize> {
        self.highlighted
    }

    pub fn highlighted(&self) -> Option<&S> {
        self.highlighted.and_then(|i| self.suggestions().get(i))
    }

    pub fn highlight_next(&mut self) {
        let len = self.suggestions().len();
        if len == 0 {
            return;
        }
        self.highlighted = Some(match self.highlighted {
            Some(i) if i + 1 < len => i + 1,
            Some(i) => i,
            None => 0,
        });
    }

    pub fn highlight_prev(&mut self) {
        self.highlighted = match self.highlighted {
            Some(0) | None => None,
            Some(i) => Some(i - 1),
        };
    }
}

#[derive(Debug)]
pub struct WeatherPane {
    pub query: QueryBox<PlaceSuggestion>,
    pub report: WidgetSlot<WeatherReport>,
    pub policy: SuggestPolicy,
    pub debouncer: Debouncer,
}

impl WeatherPane {
    pub fn new(policy: SuggestPolicy) -> Self {
        Self {
            query: QueryBox::default(),
            report: WidgetSlot::new(),
            policy,
            debouncer: Debouncer::new(policy.quiet),
        }
    }
}

#[derive(Debug)]
pub struct NewsPane {
    pub category: NewsCategory,
    pub feed: WidgetSlot<NewsFeed>,
    pub per_page: usize,
}

impl NewsPane {
    pub fn new(per_page: usize) -> Self {
        Self {
            category: NewsCategory::default(),
            feed: WidgetSlot::new(),
            per_page,
        }
    }
}

#[derive(Debug)]
pub struct FinancePane {
    pub query: QueryBox<TickerSuggestion>,
    pub snapshot: WidgetSlot<StockSnapshot>,
    pub range: TimeRange,
    /// Consulted when the debounce fires, not on every keystroke.
    pub suggester: TickerSuggester,
    pub debouncer: Debouncer,
}

impl FinancePane {
    pub fn new(suggester: TickerSuggester) -> Self {
        Self {
            query: QueryBox::default(),
            snapshot: WidgetSlot::new(),
            range: TimeRange::default(),
            debouncer: Debouncer::new(suggester.policy().quiet),
            suggester,
        }
    }
}

#[derive(Debug, Default)]
pub struct RepoPane {
    pub url: String,
    pub stats: WidgetSlot<RepoStats>,
}

#[derive(Debug)]
pub struct FilmPane {
    pub query: QueryBox<Movie>,
    pub trending: WidgetSlot<Vec<Movie>>,
    pub results: WidgetSlot<Vec<Movie>>,
    /// Whether the list shows search results rather than trending titles.
    pub searching: bool,
    pub policy: SuggestPolicy,
    pub debouncer: Debouncer,
}

impl FilmPane {
    pub fn new(policy: SuggestPolicy) -> Self {
        Self {
            query: QueryBox::default(),
            trending: WidgetSlot::new(),
            results: WidgetSlot::new(),
            searching: false,
            policy,
            debouncer: Debouncer::new(policy.quiet),
        }
    }
}

#[derive(Debug, Default)]
pub struct MusicPane {
    pub library: WidgetSlot<MusicLibrary>,
    pub connected: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn filled(items: Vec<u32>) -> QueryBox<u32> {
        let mut q = QueryBox::default();
        let ticket = q.slot_mut().begin();
        q.slot_mut().finish(ticket, Ok(items));
        q
    }

    // --- QueryBox ---

    #[test]
    fn set_text_replaces_query() {
        let mut q: QueryBox<u32> = QueryBox::default();
        assert_eq!(q.text(), "");
        q.set_text("rome");
        assert_eq!(q.text(), "rome");
    }

    #[test]
    fn highlight_walks_and_clamps() {
        let mut q = filled(vec![1, 2]);
        assert_eq!(q.highlighted(), None);
        q.highlight_next();
        assert_eq!(q.highlighted(), Some(&1));
        q.highlight_next();
        q.highlight_next();
        assert_eq!(q.highlighted(), Some(&2));
        q.highlight_prev();
        q.highlight_prev();
        assert_eq!(q.highlighted(), None);
    }

    #[test]
    fn highlight_on_empty_list_is_noop() {
        let mut q: QueryBox<u32> = QueryBox::default();
        q.highlight_next();
        assert_eq!(q.highlighted_index(), None);
    }

    #[test]
    fn clear_suggestions_supersedes_inflight_lookup() {
        let mut q: QueryBox<u32> = QueryBox::default();
        let ticket = q.slot_mut().begin();
        q.clear_suggestions();
        assert!(!q.slot_mut().finish(ticket, Ok(vec![9])));
        assert!(q.suggestions().is_empty());
    }

    #[test]
    fn failed_lookup_hides_previous_list() {
        let mut q = filled(vec![1]);
        let ticket = q.slot_mut().begin();
        q.slot_mut()
            .finish(ticket, Err(vantage_core::CoreError::Transport("x".into())));
        assert!(q.suggestions().is_empty());
    }
}
