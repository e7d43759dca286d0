//! Detail views, one per widget kind.
//!
//! Every view draws its [`Display`] state the same way: a hint while idle,
//! a loading line, the error above whatever data is still on hand, or the
//! data itself.

use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Wrap},
    Frame,
};
use vantage_core::providers::film::Movie;
use vantage_core::providers::finance::{StockSnapshot, TimeRange};
use vantage_core::providers::music::{MusicLibrary, Track};
use vantage_core::providers::news::NewsFeed;
use vantage_core::providers::repo::RepoStats;
use vantage_core::providers::weather::WeatherReport;
use vantage_core::{Display, WidgetKind};

use crate::app::App;
use crate::panes::QueryBox;
use crate::ui::selector::accent_color;

const HOURLY_SHOWN: usize = 12;
const SPARK_BLOCKS: [char; 8] = ['▁', '▂', '▃', '▄', '▅', '▆', '▇', '█'];

pub fn render_widget(f: &mut Frame, area: Rect, app: &App, kind: WidgetKind) {
    let descriptor = app.dashboard().registry().get(kind);
    let block = Block::default()
        .borders(Borders::ALL)
        .title(format!(" {} ", descriptor.label))
        .border_style(Style::default().fg(accent_color(descriptor.accent)));
    let inner = block.inner(area);
    f.render_widget(block, area);

    match kind {
        WidgetKind::Weather => {
            let pane = app.weather();
            let body = render_query(f, inner, "City", &pane.query, |s| s.display_name.clone());
            let lines = state_lines(pane.report.display(), "Enter a city and press Enter.", weather_lines);
            render_lines(f, body, lines);
        }
        WidgetKind::News => {
            let pane = app.news();
            let mut lines = vec![Line::from(vec![
                Span::raw("Category: "),
                Span::styled(
                    pane.category.label(),
                    Style::default().add_modifier(Modifier::BOLD),
                ),
            ])];
            lines.push(Line::raw(""));
            lines.extend(state_lines(pane.feed.display(), "Press r to load headlines.", news_lines));
            render_lines(f, inner, lines);
        }
        WidgetKind::Finance => {
            let pane = app.finance();
            let body = render_query(f, inner, "Symbol", &pane.query, |s| {
                format!("{}  {}", s.symbol, s.name)
            });
            let range = pane.range;
            let lines = state_lines(pane.snapshot.display(), "Enter a ticker symbol and press Enter.", |s| {
                stock_lines(s, range)
            });
            render_lines(f, body, lines);
        }
        WidgetKind::Github => {
            let pane = app.repo();
            let body = render_input(f, inner, "Repository URL", &pane.url);
            let lines = state_lines(pane.stats.display(), "Paste a github.com repository URL.", repo_lines);
            render_lines(f, body, lines);
        }
        WidgetKind::Movie => {
            let pane = app.film();
            let body = render_query(f, inner, "Title", &pane.query, movie_label);
            let (slot, idle) = if pane.searching {
                (&pane.results, "No search yet.")
            } else {
                (&pane.trending, "Loading trending movies...")
            };
            let mut lines = vec![Line::styled(
                if pane.searching { "Search results" } else { "Trending this week" },
                Style::default().add_modifier(Modifier::BOLD),
            )];
            lines.extend(state_lines(slot.display(), idle, |movies| movie_lines(movies)));
            render_lines(f, body, lines);
        }
        WidgetKind::Spotify => {
            let pane = app.music();
            let lines = if pane.connected {
                state_lines(pane.library.display(), "Press r to load your library.", music_lines)
            } else {
                vec![Line::raw("Not connected. Press l to log in with Spotify.")]
            };
            render_lines(f, inner, lines);
        }
    }
}

/// Lines for one slot's display state.
pub fn state_lines<T>(
    display: Display<'_, T>,
    idle: &str,
    data: impl Fn(&T) -> Vec<Line<'static>>,
) -> Vec<Line<'static>> {
    match display {
        Display::Idle => vec![Line::styled(
            idle.to_string(),
            Style::default().fg(Color::DarkGray),
        )],
        Display::Loading => vec![Line::styled(
            "Loading...",
            Style::default().fg(Color::DarkGray),
        )],
        Display::Error { message, stale } => {
            let mut lines = vec![Line::styled(
                message.to_string(),
                Style::default().fg(Color::Red),
            )];
            if let Some(previous) = stale {
                lines.push(Line::raw(""));
                lines.extend(data(previous));
            }
            lines
        }
        Display::Ready(value) => data(value),
    }
}

fn render_lines(f: &mut Frame, area: Rect, lines: Vec<Line<'static>>) {
    f.render_widget(Paragraph::new(lines).wrap(Wrap { trim: false }), area);
}

/// Draws a one-line input box at the top of `area`; returns what is left.
fn render_input(f: &mut Frame, area: Rect, title: &str, text: &str) -> Rect {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(3), Constraint::Min(0)])
        .split(area);
    let input = Paragraph::new(Line::from(vec![
        Span::raw(text.to_string()),
        Span::styled("_", Style::default().add_modifier(Modifier::SLOW_BLINK)),
    ]))
    .block(Block::default().borders(Borders::ALL).title(title.to_string()));
    f.render_widget(input, chunks[0]);
    chunks[1]
}

/// Input box plus its suggestion dropdown; returns the remaining area.
fn render_query<S>(
    f: &mut Frame,
    area: Rect,
    title: &str,
    query: &QueryBox<S>,
    label: impl Fn(&S) -> String,
) -> Rect {
    let rest = render_input(f, area, title, query.text());
    let suggestions = query.suggestions();
    if suggestions.is_empty() {
        return rest;
    }
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(suggestions.len() as u16 + 1),
            Constraint::Min(0),
        ])
        .split(rest);
    let lines: Vec<Line> = suggestions
        .iter()
        .enumerate()
        .map(|(i, s)| {
            if query.highlighted_index() == Some(i) {
                Line::styled(
                    format!("> {}", label(s)),
                    Style::default().add_modifier(Modifier::REVERSED),
                )
            } else {
                Line::raw(format!("  {}", label(s)))
            }
        })
        .collect();
    f.render_widget(Paragraph::new(lines), chunks[0]);
    chunks[1]
}

fn heading(text: impl Into<String>) -> Line<'static> {
    Line::styled(text.into(), Style::default().add_modifier(Modifier::BOLD))
}

fn weather_lines(report: &WeatherReport) -> Vec<Line<'static>> {
    let loc = &report.location;
    let mut lines = vec![
        heading(loc.display_name.clone()),
        Line::raw(format!("{:.4}, {:.4}", loc.latitude, loc.longitude)),
        Line::raw(""),
        Line::raw(format!("Temperature  {:.1}°C", report.temperature)),
        Line::raw(format!("Wind         {:.1} km/h", report.wind_speed)),
        Line::raw(""),
        heading("Hourly"),
    ];
    lines.extend(
        report
            .hourly
            .iter()
            .take(HOURLY_SHOWN)
            .map(|p| Line::raw(format!("{}  {:>6.1}°C", p.time, p.temperature))),
    );
    lines
}

fn news_lines(feed: &NewsFeed) -> Vec<Line<'static>> {
    let mut lines = Vec::new();
    for article in feed.visible() {
        lines.push(heading(article.title.clone()));
        lines.push(Line::styled(
            format!("{}  {}", article.source, article.published_at),
            Style::default().fg(Color::DarkGray),
        ));
        if let Some(desc) = &article.description {
            lines.push(Line::raw(desc.clone()));
        }
        lines.push(Line::raw(""));
    }
    if feed.total() == 0 {
        lines.push(Line::raw("No articles."));
    } else if feed.has_more() {
        lines.push(Line::styled(
            format!("{} of {} shown, press n for more", feed.visible().len(), feed.total()),
            Style::default().fg(Color::DarkGray),
        ));
    }
    lines
}

/// Renders `values` as a row of block characters scaled between their
/// minimum and maximum.
pub fn sparkline(values: &[f64]) -> String {
    let (min, max) = values
        .iter()
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), v| {
            (lo.min(*v), hi.max(*v))
        });
    let span = max - min;
    values
        .iter()
        .map(|v| {
            if span <= f64::EPSILON {
                return SPARK_BLOCKS[SPARK_BLOCKS.len() / 2];
            }
            let idx = ((v - min) / span * (SPARK_BLOCKS.len() - 1) as f64).round() as usize;
            SPARK_BLOCKS[idx.min(SPARK_BLOCKS.len() - 1)]
        })
        .collect()
}

fn stock_lines(snapshot: &StockSnapshot, range: TimeRange) -> Vec<Line<'static>> {
    let color = if snapshot.is_up() { Color::Green } else { Color::Red };
    let mut lines = vec![
        Line::from(vec![
            Span::styled(
                format!("{}  ${:.2}  ", snapshot.symbol, snapshot.price),
                Style::default().add_modifier(Modifier::BOLD),
            ),
            Span::styled(
                format!("{:+.2} ({:+.2}%)", snapshot.change, snapshot.change_percent),
                Style::default().fg(color),
            ),
        ]),
        Line::raw(format!(
            "Open {:.2}  High {:.2}  Low {:.2}  Prev close {:.2}",
            snapshot.open, snapshot.high, snapshot.low, snapshot.previous_close
        )),
        Line::raw(format!("Volume {:.0}", snapshot.volume)),
        Line::raw(""),
    ];

    let ranges: Vec<Span> = TimeRange::ALL
        .iter()
        .flat_map(|r| {
            let style = if *r == range {
                Style::default().add_modifier(Modifier::REVERSED)
            } else {
                Style::default().fg(Color::DarkGray)
            };
            [Span::styled(format!(" {} ", r.label()), style), Span::raw(" ")]
        })
        .collect();
    lines.push(Line::from(ranges));

    let today = chrono::Local::now().date_naive();
    let window = snapshot.window(range, today);
    if window.is_empty() {
        lines.push(Line::raw("No history in this range."));
    } else {
        let prices: Vec<f64> = window.iter().map(|p| p.price).collect();
        lines.push(Line::styled(sparkline(&prices), Style::default().fg(color)));
        if let (Some(first), Some(last)) = (window.first(), window.last()) {
            lines.push(Line::styled(
                format!("{} .. {}", first.date, last.date),
                Style::default().fg(Color::DarkGray),
            ));
        }
    }
    lines
}

fn repo_lines(stats: &RepoStats) -> Vec<Line<'static>> {
    let mut lines = vec![heading(stats.name.clone())];
    if let Some(desc) = &stats.description {
        lines.push(Line::raw(desc.clone()));
    }
    lines.push(Line::raw(format!(
        "★ {}  forks {}  watchers {}",
        stats.stars, stats.forks, stats.watchers
    )));
    lines.push(Line::raw(""));
    lines.push(heading("Recent commits"));
    for c in &stats.commits {
        let sha: String = c.sha.chars().take(7).collect();
        lines.push(Line::raw(format!("{sha}  {}  ({}, {})", c.message, c.author, c.date)));
    }
    lines.push(Line::raw(""));
    lines.push(heading("Top contributors"));
    for c in &stats.contributors {
        lines.push(Line::raw(format!("{}  {} commits", c.login, c.contributions)));
    }
    lines
}

fn movie_label(movie: &Movie) -> String {
    match movie.year() {
        Some(year) => format!("{} ({year})", movie.title),
        None => movie.title.clone(),
    }
}

fn movie_lines(movies: &[Movie]) -> Vec<Line<'static>> {
    if movies.is_empty() {
        return vec![Line::raw("No movies found.")];
    }
    movies
        .iter()
        .map(|m| {
            Line::from(vec![
                Span::raw(movie_label(m)),
                Span::styled(
                    format!("  ★ {:.1}", m.vote_average),
                    Style::default().fg(Color::Yellow),
                ),
            ])
        })
        .collect()
}

fn track_line(track: &Track) -> Line<'static> {
    Line::raw(format!(
        "  {}  {}  [{}]",
        track.name,
        track.artists.join(", "),
        track.album
    ))
}

fn music_lines(library: &MusicLibrary) -> Vec<Line<'static>> {
    let mut lines = vec![heading("Top tracks")];
    lines.extend(library.top_tracks.iter().map(track_line));
    lines.push(Line::raw(""));
    lines.push(heading("Recently played"));
    lines.extend(library.recent_tracks.iter().map(track_line));
    lines.push(Line::raw(""));
    lines.push(heading("Playlists"));
    lines.extend(
        library
            .playlists
            .iter()
            .map(|p| Line::raw(format!("  {}  {} tracks", p.name, p.track_count))),
    );
    lines
}

#[cfg(test)]
mod tests {
    use super::*;

    fn text(lines: &[Line<'_>]) -> Vec<String> {
        lines.iter().map(|l| l.to_string()).collect()
    }

    // --- sparkline ---

    #[test]
    fn sparkline_spans_lowest_to_highest_block() {
        assert_eq!(sparkline(&[1.0, 2.0, 3.0]), "▁▅█");
    }

    #[test]
    fn flat_series_uses_middle_block() {
        assert_eq!(sparkline(&[5.0, 5.0]), "▅▅");
    }

    #[test]
    fn empty_series_is_empty() {
        assert_eq!(sparkline(&[]), "");
    }

    // --- display states ---

    fn numbers(n: &u32) -> Vec<Line<'static>> {
        vec![Line::raw(format!("value {n}"))]
    }

    #[test]
    fn idle_shows_hint() {
        assert_eq!(text(&state_lines(Display::Idle, "hint", numbers)), ["hint"]);
    }

    #[test]
    fn loading_shows_loading() {
        assert_eq!(
            text(&state_lines(Display::<u32>::Loading, "hint", numbers)),
            ["Loading..."]
        );
    }

    #[test]
    fn error_keeps_stale_data_below_message() {
        let lines = state_lines(
            Display::Error {
                message: "boom",
                stale: Some(&3),
            },
            "hint",
            numbers,
        );
        assert_eq!(text(&lines), ["boom", "", "value 3"]);
    }

    #[test]
    fn ready_shows_data() {
        assert_eq!(text(&state_lines(Display::Ready(&1), "hint", numbers)), ["value 1"]);
    }
}
