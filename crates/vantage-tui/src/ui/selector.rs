//! The selector grid: one tile per widget in the user's order.

use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::Line,
    widgets::{Block, BorderType, Borders, Paragraph},
    Frame,
};
use vantage_core::WidgetDescriptor;

use crate::app::GRID_COLUMNS;

/// Maps a registry accent token to a terminal color.
pub fn accent_color(accent: &str) -> Color {
    match accent {
        "blue-cyan" => Color::Cyan,
        "green-emerald" => Color::LightGreen,
        "purple-pink" => Color::Magenta,
        "gray" => Color::Gray,
        "red-orange" => Color::LightRed,
        "green" => Color::Green,
        _ => Color::White,
    }
}

/// Data needed to render the selector grid.
pub struct SelectorProps<'a> {
    pub tiles: Vec<&'a WidgetDescriptor>,
    pub cursor: usize,
    /// Index of the tile being dragged, if any.
    pub dragging: Option<usize>,
}

pub fn render_selector(f: &mut Frame, area: Rect, props: &SelectorProps<'_>) {
    if props.tiles.is_empty() {
        return;
    }
    let rows = props.tiles.len().div_ceil(GRID_COLUMNS);
    let row_areas = Layout::default()
        .direction(Direction::Vertical)
        .constraints(vec![Constraint::Ratio(1, rows as u32); rows])
        .split(area);

    for (row, chunk) in props.tiles.chunks(GRID_COLUMNS).enumerate() {
        let cells = Layout::default()
            .direction(Direction::Horizontal)
            .constraints(vec![Constraint::Ratio(1, GRID_COLUMNS as u32); GRID_COLUMNS])
            .split(row_areas[row]);
        for (col, tile) in chunk.iter().enumerate() {
            let index = row * GRID_COLUMNS + col;
            render_tile(f, cells[col], tile, index == props.cursor, props.dragging == Some(index));
        }
    }
}

fn render_tile(f: &mut Frame, area: Rect, tile: &WidgetDescriptor, focused: bool, dragging: bool) {
    let color = accent_color(tile.accent);
    let (border_type, border_style) = if dragging {
        (
            BorderType::Double,
            Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD),
        )
    } else if focused {
        (
            BorderType::Thick,
            Style::default().fg(color).add_modifier(Modifier::BOLD),
        )
    } else {
        (BorderType::Rounded, Style::default().fg(Color::DarkGray))
    };

    let block = Block::default()
        .borders(Borders::ALL)
        .border_type(border_type)
        .border_style(border_style);
    let inner = block.inner(area);
    f.render_widget(block, area);

    let vertical = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage(40),
            Constraint::Length(1),
            Constraint::Min(0),
        ])
        .split(inner);

    let mut style = Style::default().fg(color);
    if focused {
        style = style.add_modifier(Modifier::BOLD);
    }
    let label = Paragraph::new(Line::styled(tile.label, style)).alignment(Alignment::Center);
    f.render_widget(label, vertical[1]);
}

#[cfg(test)]
mod tests {
    use super::*;
    use vantage_core::WidgetRegistry;

    #[test]
    fn every_registry_accent_has_a_color() {
        for d in WidgetRegistry::new().all() {
            assert_ne!(accent_color(d.accent), Color::White, "{}", d.accent);
        }
    }

    #[test]
    fn unknown_accent_falls_back_to_white() {
        assert_eq!(accent_color("plaid"), Color::White);
    }
}
