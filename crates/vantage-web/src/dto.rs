use serde::{Deserialize, Serialize};
use vantage_core::{WidgetDescriptor, WidgetKind, WidgetOrder};

#[derive(Debug, Serialize)]
pub struct WidgetsResponse {
    /// Descriptors in the user's order.
    pub widgets: Vec<WidgetDescriptor>,
}

#[derive(Debug, Serialize)]
pub struct OrderResponse {
    pub order: Vec<WidgetKind>,
}

impl From<&WidgetOrder> for OrderResponse {
    fn from(order: &WidgetOrder) -> Self {
        Self {
            order: order.as_slice().to_vec(),
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct MoveRequest {
    pub from: usize,
    pub to: usize,
}

#[derive(Debug, Serialize)]
pub struct MoveResponse {
    pub changed: bool,
    pub order: Vec<WidgetKind>,
}

#[derive(Debug, Deserialize)]
pub struct StockQuery {
    pub symbol: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct SearchQuery {
    pub q: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct CallbackRequest {
    /// The redirect's URL fragment, with or without the leading `#`.
    pub fragment: String,
}

#[derive(Debug, Serialize)]
pub struct AuthStatus {
    pub connected: bool,
}

#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub authorize_url: String,
}
