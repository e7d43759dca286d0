//! Adapters for the six external data providers.
//!
//! Each adapter owns an [`HttpClient`](crate::http::HttpClient) handle and
//! its config section, maps provider JSON into a small display record, and
//! offers a `describe_failure` that turns a [`CoreError`](crate::CoreError)
//! into the line its widget shows. Adapters never touch display state;
//! callers commit their results through a
//! [`WidgetSlot`](crate::fetch::view::WidgetSlot).

pub mod film;
pub mod finance;
pub mod music;
pub mod news;
pub mod repo;
pub mod weather;

use crate::error::CoreError;

/// Uses `fallback` for transport-level failures and passes user-facing
/// validation and empty-result text through.
pub(crate) fn describe_with(err: &CoreError, fallback: &str) -> String {
    match err {
        CoreError::InvalidInput(msg) | CoreError::Empty(msg) => msg.clone(),
        CoreError::Unauthorized => err.user_message(),
        _ => fallback.to_string(),
    }
}
