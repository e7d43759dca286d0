use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use vantage_core::{Command, WidgetKind};

use crate::app::AppMode;

/// Actions that can result from a key press.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InputAction {
    /// Dispatch a core Command.
    Command(Command),
    /// Quit the application.
    Quit,
    /// Move the selector cursor (or the grabbed tile) one column left.
    CursorLeft,
    /// Move the selector cursor (or the grabbed tile) one column right.
    CursorRight,
    /// Move the selector cursor (or the grabbed tile) one row up.
    CursorUp,
    /// Move the selector cursor (or the grabbed tile) one row down.
    CursorDown,
    /// Open the widget under the cursor.
    OpenAtCursor,
    /// Pick up the tile under the cursor.
    Grab,
    /// Put the grabbed tile down where it is.
    Drop,
    /// Append a character to the widget's query.
    QueryChar(char),
    /// Remove the last character from the query.
    QueryBackspace,
    /// Submit the query, or refresh a widget without one.
    Submit,
    /// Highlight the previous suggestion.
    SuggestionUp,
    /// Highlight the next suggestion.
    SuggestionDown,
    /// Cycle the news category or the chart range.
    Cycle,
    /// Reveal the next page of headlines.
    LoadMore,
    /// Start the music login flow.
    Login,
    /// Forget the music token.
    Logout,
    /// No action for this key.
    None,
}

/// Maps a key event to an InputAction based on the current mode.
///
/// Ctrl+C quits from every mode. `q` only quits from the selector, since
/// widget views with a query box treat it as text.
pub fn handle_key(key: KeyEvent, mode: &AppMode) -> InputAction {
    if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
        return InputAction::Quit;
    }
    match mode {
        AppMode::Selector => handle_selector_key(key),
        AppMode::Dragging => handle_drag_key(key),
        AppMode::Widget(kind) => handle_widget_key(key, *kind),
    }
}

fn direction(code: KeyCode) -> Option<InputAction> {
    match code {
        KeyCode::Left | KeyCode::Char('h') => Some(InputAction::CursorLeft),
        KeyCode::Right | KeyCode::Char('l') => Some(InputAction::CursorRight),
        KeyCode::Up | KeyCode::Char('k') => Some(InputAction::CursorUp),
        KeyCode::Down | KeyCode::Char('j') => Some(InputAction::CursorDown),
        _ => None,
    }
}

fn handle_selector_key(key: KeyEvent) -> InputAction {
    if let Some(action) = direction(key.code) {
        return action;
    }
    match key.code {
        KeyCode::Char('q') => InputAction::Quit,
        KeyCode::Enter => InputAction::OpenAtCursor,
        KeyCode::Char(' ') => InputAction::Grab,
        KeyCode::Char('r') => InputAction::Command(Command::ResetOrder),
        _ => InputAction::None,
    }
}

fn handle_drag_key(key: KeyEvent) -> InputAction {
    if let Some(action) = direction(key.code) {
        return action;
    }
    match key.code {
        KeyCode::Char(' ') | KeyCode::Enter | KeyCode::Esc => InputAction::Drop,
        _ => InputAction::None,
    }
}

fn handle_widget_key(key: KeyEvent, kind: WidgetKind) -> InputAction {
    if key.code == KeyCode::Esc {
        return InputAction::Command(Command::ClearSelection);
    }
    match kind {
        WidgetKind::News => match key.code {
            KeyCode::Tab => InputAction::Cycle,
            KeyCode::Char('n') => InputAction::LoadMore,
            KeyCode::Enter | KeyCode::Char('r') => InputAction::Submit,
            _ => InputAction::None,
        },
        WidgetKind::Spotify => match key.code {
            KeyCode::Char('l') => InputAction::Login,
            KeyCode::Char('d') => InputAction::Logout,
            KeyCode::Enter | KeyCode::Char('r') => InputAction::Submit,
            _ => InputAction::None,
        },
        WidgetKind::Weather | WidgetKind::Finance | WidgetKind::Github | WidgetKind::Movie => {
            match key.code {
                KeyCode::Tab if kind == WidgetKind::Finance => InputAction::Cycle,
                KeyCode::Char(c) => InputAction::QueryChar(c),
                KeyCode::Backspace => InputAction::QueryBackspace,
                KeyCode::Enter => InputAction::Submit,
                KeyCode::Up => InputAction::SuggestionUp,
                KeyCode::Down => InputAction::SuggestionDown,
                _ => InputAction::None,
            }
        }
    }
}
