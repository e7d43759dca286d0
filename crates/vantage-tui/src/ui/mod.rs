//! UI widget modules for the terminal frontend.
//!
//! Each sub-module renders a single UI component using ratatui.

pub mod selector;
pub mod statusbar;
pub mod widgets;
