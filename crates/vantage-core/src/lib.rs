//! Vantage core library: UI-agnostic dashboard logic.
//!
//! `vantage-core` holds everything about the analytics dashboard that does
//! not depend on how it is drawn, so the terminal frontend (`vantage-tui`)
//! and the HTTP server (`vantage-web`) share one implementation.
//!
//! # Modules
//!
//! - [`widget`]: the widget catalog, the persisted order and the reorder/drag controller.
//! - [`selection`]: which widget is open.
//! - [`dashboard`]: applies [`Command`]s to order and selection, emitting [`Event`]s.
//! - [`store`]: the key-value persistence interface with memory and file backends.
//! - [`fetch`]: request generations, debouncing, throttling and the per-widget display state.
//! - [`http`]: the [`HttpClient`] seam and its `reqwest` implementation.
//! - [`providers`]: adapters for weather, news, finance, repository, film and music APIs.
//! - [`auth`]: music-streaming OAuth callback handling and token persistence.
//! - [`config`]: TOML configuration with environment overrides.
//! - [`error`]: unified error type ([`CoreError`]) and result alias ([`CoreResult`]).

pub mod auth;
pub mod config;
pub mod dashboard;
pub mod error;
pub mod event;
pub mod fetch;
pub mod http;
pub mod providers;
pub mod selection;
pub mod store;
pub mod widget;

pub use error::{CoreError, CoreResult};
pub use event::{Command, Event};

pub use auth::oauth::{complete_callback, parse_fragment, CallbackOutcome, OAuthConfig};
pub use auth::token::TokenStore;
pub use config::settings::Config;
pub use dashboard::Dashboard;
pub use fetch::debounce::{Debouncer, SuggestPolicy};
pub use fetch::generation::{Generation, Ticket};
pub use fetch::throttle::Throttle;
pub use fetch::view::{Display, WidgetSlot, WidgetView};
pub use http::{HttpClient, HttpRequest, HttpResponse, ReqwestClient};
#[cfg(any(test, feature = "test-support"))]
pub use http::StubClient;
pub use selection::Selection;
pub use store::file::FileStore;
pub use store::memory::MemoryStore;
pub use store::order_store::OrderStore;
pub use store::KeyValueStore;
pub use widget::order::WidgetOrder;
pub use widget::registry::{WidgetDescriptor, WidgetKind, WidgetRegistry};
pub use widget::reorder::{DragSession, ReorderController};
