use axum::{
    routing::{get, post},
    Router,
};
use std::sync::Arc;

use crate::features::items::{handlers, services::ItemService};

/// Create routes for the item catalog
pub fn routes(service: Arc<ItemService>) -> Router {
    Router::new()
        .route(
            "/api/items",
            get(handlers::list_recent_items).post(handlers::create_item),
        )
        .route("/api/items/bulk", post(handlers::bulk_create_items))
        .route("/api/items/all", get(handlers::list_all_items))
        .route("/api/items/categories", get(handlers::list_categories))
        .route(
            "/api/items/{id}",
            get(handlers::get_item)
                .put(handlers::update_item)
                .delete(handlers::delete_item),
        )
        .with_state(service)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shared::test_helpers::lazy_pool;
    use axum::http::StatusCode;
    use axum_test::TestServer;
    use serde_json::{json, Value};

    fn server() -> TestServer {
        let service = Arc::new(ItemService::new(lazy_pool()));
        TestServer::new(routes(service)).unwrap()
    }

    #[tokio::test]
    async fn test_create_with_missing_field_is_rejected() {
        let response = server()
            .post("/api/items")
            .json(&json!({"category": "road", "unit": "m2", "cost": 12.5}))
            .await;

        response.assert_status(StatusCode::BAD_REQUEST);
        let body: Value = response.json();
        assert_eq!(body["success"], false);
        assert!(body["error"].as_str().unwrap().contains("Invalid JSON data"));
    }

    #[tokio::test]
    async fn test_create_with_negative_cost_is_rejected() {
        let response = server()
            .post("/api/items")
            .json(&json!({
                "category": "road",
                "description": "asphalt patch",
                "unit": "m2",
                "cost": -3
            }))
            .await;

        response.assert_status(StatusCode::BAD_REQUEST);
        let body: Value = response.json();
        assert!(body["errors"].is_array());
    }

    #[tokio::test]
    async fn test_create_with_oversized_cost_is_rejected() {
        let response = server()
            .post("/api/items")
            .json(&json!({
                "category": "road",
                "description": "bridge",
                "unit": "pc",
                "cost": 10000000000_i64
            }))
            .await;

        response.assert_status(StatusCode::BAD_REQUEST);
        let body: Value = response.json();
        assert!(body["errors"].is_array());
    }

    #[tokio::test]
    async fn test_update_with_blank_description_is_rejected() {
        let response = server()
            .put("/api/items/1")
            .json(&json!({
                "category": "road",
                "description": "   ",
                "unit": "m2",
                "cost": 1
            }))
            .await;

        response.assert_status(StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_bulk_with_empty_items_is_rejected() {
        let response = server()
            .post("/api/items/bulk")
            .json(&json!({"items": []}))
            .await;

        response.assert_status(StatusCode::BAD_REQUEST);
        let body: Value = response.json();
        assert!(body["error"].as_str().unwrap().contains("non-empty"));
    }

    #[tokio::test]
    async fn test_non_numeric_id_is_rejected() {
        let response = server().get("/api/items/abc").await;

        response.assert_status(StatusCode::BAD_REQUEST);
        let body: Value = response.json();
        assert_eq!(body["success"], false);
    }
}
