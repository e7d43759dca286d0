use ratatui::{
    layout::{Constraint, Direction, Layout},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};

use crate::app::{App, AppMode};
use crate::ui::selector::{render_selector, SelectorProps};
use crate::ui::statusbar::{render_statusbar, StatusBarProps};
use crate::ui::widgets::render_widget;

/// Main render function: title row, body, status bar.
pub fn render(f: &mut Frame, app: &App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1),
            Constraint::Min(0),
            Constraint::Length(1),
        ])
        .split(f.area());

    let mode = app.mode();
    f.render_widget(Paragraph::new(title_line(app, mode)), chunks[0]);

    match mode {
        AppMode::Selector | AppMode::Dragging => {
            let props = SelectorProps {
                tiles: app.dashboard().tiles(),
                cursor: app.cursor(),
                dragging: (mode == AppMode::Dragging).then(|| app.cursor()),
            };
            render_selector(f, chunks[1], &props);
        }
        AppMode::Widget(kind) => render_widget(f, chunks[1], app, kind),
    }

    let status_props = StatusBarProps {
        mode,
        status_message: app.status(),
    };
    render_statusbar(f, chunks[2], &status_props);
}

fn title_line(app: &App, mode: AppMode) -> Line<'static> {
    let mut spans = vec![Span::styled(
        " Vantage",
        Style::default()
            .fg(Color::Cyan)
            .add_modifier(Modifier::BOLD),
    )];
    if let AppMode::Widget(kind) = mode {
        let label = app.dashboard().registry().get(kind).label;
        spans.push(Span::raw(format!(" / {label}")));
    }
    Line::from(spans)
}
