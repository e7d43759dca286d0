mod auth;
mod pages;
mod stocks;
mod widgets;

use axum::routing::{get, post};
use axum::Router;

use crate::state::AppState;

/// Everything under `/api` except the rate-limited search route.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/widgets", get(widgets::list_widgets))
        .route(
            "/widgets/order",
            get(widgets::get_order).delete(widgets::reset_order),
        )
        .route("/widgets/order/move", post(widgets::move_widget))
        .route("/stock-data", get(stocks::stock_data))
        .route("/auth/login", get(auth::login_url))
        .route("/auth/callback", post(auth::callback))
        .route("/auth/status", get(auth::status))
        .route("/auth/logout", post(auth::logout))
}

/// Ticker search hits the provider's quota on every call; `main` puts a
/// per-IP limit in front of it.
pub fn search_router() -> Router<AppState> {
    Router::new().route("/stock-search", get(stocks::stock_search))
}

/// Full route table. `search_routes` is [`search_router`] with whatever
/// layers the caller adds.
pub fn app(search_routes: Router<AppState>) -> Router<AppState> {
    Router::new()
        .nest("/api", search_routes.merge(router()))
        .route("/", get(pages::index))
        .route("/callback", get(pages::callback))
        .route("/callback.js", get(pages::callback_script))
}
