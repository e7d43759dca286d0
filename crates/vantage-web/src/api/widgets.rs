use axum::extract::State;
use axum::Json;

use crate::dto::{MoveRequest, MoveResponse, OrderResponse, WidgetsResponse};
use crate::error::AppError;
use crate::state::AppState;

pub async fn list_widgets(State(state): State<AppState>) -> Json<WidgetsResponse> {
    let reorder = state.reorder.lock().await;
    let widgets = reorder
        .order()
        .iter()
        .map(|kind| *state.registry.get(kind))
        .collect();
    Json(WidgetsResponse { widgets })
}

pub async fn get_order(State(state): State<AppState>) -> Json<OrderResponse> {
    let reorder = state.reorder.lock().await;
    Json(OrderResponse::from(reorder.order()))
}

pub async fn move_widget(
    State(state): State<AppState>,
    Json(req): Json<MoveRequest>,
) -> Result<Json<MoveResponse>, AppError> {
    let mut reorder = state.reorder.lock().await;
    let changed = reorder.move_item(req.from, req.to)?;
    Ok(Json(MoveResponse {
        changed,
        order: reorder.order().as_slice().to_vec(),
    }))
}

pub async fn reset_order(State(state): State<AppState>) -> Json<OrderResponse> {
    let mut reorder = state.reorder.lock().await;
    Json(OrderResponse::from(reorder.reset()))
}

#[cfg(test)]
mod tests {
    use axum::http::StatusCode;
    use serde_json::json;
    use vantage_core::store::keys;
    use vantage_core::{KeyValueStore, StubClient};

    use crate::api::test_support::{delete, get, post_json, send, server};

    const DEFAULT_ORDER: [&str; 6] = ["weather", "news", "finance", "github", "movie", "spotify"];

    #[tokio::test]
    async fn widgets_follow_catalog_order_by_default() {
        let srv = server(StubClient::new());
        let (status, body) = send(&srv.router, get("/api/widgets")).await;
        assert_eq!(status, StatusCode::OK);
        let types: Vec<&str> = body["widgets"]
            .as_array()
            .unwrap()
            .iter()
            .map(|w| w["type"].as_str().unwrap())
            .collect();
        assert_eq!(types, DEFAULT_ORDER);
        assert_eq!(body["widgets"][0]["label"], "Weather");
    }

    #[tokio::test]
    async fn move_persists_and_reorders() {
        let srv = server(StubClient::new());
        let (status, body) = send(
            &srv.router,
            post_json("/api/widgets/order/move", json!({"from": 0, "to": 2})),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["changed"], true);
        assert_eq!(
            body["order"],
            json!(["news", "finance", "weather", "github", "movie", "spotify"])
        );

        let persisted = srv.store.get(keys::WIDGET_ORDER).unwrap().unwrap();
        assert!(persisted.starts_with(r#"["news","finance","weather""#));

        let (_, order) = send(&srv.router, get("/api/widgets/order")).await;
        assert_eq!(order["order"], body["order"]);
    }

    #[tokio::test]
    async fn consecutive_moves_build_on_each_other() {
        let srv = server(StubClient::new());
        send(
            &srv.router,
            post_json("/api/widgets/order/move", json!({"from": 0, "to": 1})),
        )
        .await;
        let (_, body) = send(
            &srv.router,
            post_json("/api/widgets/order/move", json!({"from": 1, "to": 2})),
        )
        .await;
        assert_eq!(
            body["order"],
            json!(["news", "finance", "weather", "github", "movie", "spotify"])
        );
    }

    #[tokio::test]
    async fn same_index_move_reports_unchanged() {
        let srv = server(StubClient::new());
        let (status, body) = send(
            &srv.router,
            post_json("/api/widgets/order/move", json!({"from": 3, "to": 3})),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["changed"], false);
        assert!(srv.store.get(keys::WIDGET_ORDER).unwrap().is_none());
    }

    #[tokio::test]
    async fn out_of_range_move_is_bad_request() {
        let srv = server(StubClient::new());
        let (status, body) = send(
            &srv.router,
            post_json("/api/widgets/order/move", json!({"from": 0, "to": 6})),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["success"], false);
    }

    #[tokio::test]
    async fn reset_restores_catalog_order() {
        let srv = server(StubClient::new());
        send(
            &srv.router,
            post_json("/api/widgets/order/move", json!({"from": 5, "to": 0})),
        )
        .await;
        let (status, body) = send(&srv.router, delete("/api/widgets/order")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["order"], json!(DEFAULT_ORDER));
        assert!(srv.store.get(keys::WIDGET_ORDER).unwrap().is_none());
    }
}
