//! Status bar rendering.
//!
//! One row at the bottom of the terminal: the key hints for the current
//! mode, followed by the latest status message if there is one.

use ratatui::{
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};
use vantage_core::WidgetKind;

use crate::app::AppMode;

/// Data needed to render the status bar.
pub struct StatusBarProps<'a> {
    pub mode: AppMode,
    pub status_message: Option<&'a str>,
}

/// Key hints for `mode`.
pub fn hints(mode: AppMode) -> &'static str {
    match mode {
        AppMode::Selector => "arrows move  Enter open  Space grab  r reset  q quit",
        AppMode::Dragging => "arrows move tile  Space drop",
        AppMode::Widget(WidgetKind::News) => "Tab category  n more  r refresh  Esc back",
        AppMode::Widget(WidgetKind::Spotify) => "l login  d logout  r refresh  Esc back",
        AppMode::Widget(WidgetKind::Finance) => {
            "type symbol  Up/Down pick  Enter load  Tab range  Esc back"
        }
        AppMode::Widget(WidgetKind::Github) => "paste repository URL  Enter load  Esc back",
        AppMode::Widget(_) => "type to search  Up/Down pick  Enter load  Esc back",
    }
}

pub fn render_statusbar(f: &mut Frame, area: Rect, props: &StatusBarProps<'_>) {
    let mut spans = vec![Span::styled(
        format!(" {}", hints(props.mode)),
        Style::default().fg(Color::DarkGray),
    )];
    if let Some(msg) = props.status_message {
        spans.push(Span::raw("  "));
        spans.push(Span::styled(
            msg.to_string(),
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD),
        ));
    }
    f.render_widget(Paragraph::new(Line::from(spans)), area);
}
