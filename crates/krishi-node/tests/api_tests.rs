//! HTTP-level tests for the order endpoints.

use axum::http::header::AUTHORIZATION;
use axum::http::{HeaderValue, StatusCode};
use axum_test::TestServer;
use krishi_core::{DraftLine, OrderDraft, ShippingAddress};
use krishi_node::seed::{seed_demo_accounts, DEMO_BUYER_TOKEN, DEMO_SELLER_TOKEN, DEMO_SHOP_ID};
use krishi_node::{create_router, AppState};
use serde_json::{json, Value};

async fn server() -> TestServer {
    let state = AppState::new();
    seed_demo_accounts(&state).await;
    TestServer::new(create_router(state)).unwrap()
}

fn bearer(token: &str) -> HeaderValue {
    HeaderValue::from_str(&format!("Bearer {}", token)).unwrap()
}

fn draft() -> OrderDraft {
    OrderDraft::builder()
        .line(DraftLine::new("Fertilizer", 450.0, 1).seller("shop2", "Green Earth"))
        .line(DraftLine::new("Tomatoes", 40.0, 3).seller(DEMO_SHOP_ID, "Krishna Farms"))
        .shipping_cost(40.0)
        .ship_to(ShippingAddress {
            full_name: "Rajesh Kumar".to_string(),
            city: "Jaipur".to_string(),
            ..Default::default()
        })
        .payment_method("UPI")
        .build()
        .unwrap()
}

async fn place(server: &TestServer) -> Value {
    let response = server
        .post("/api/orders")
        .add_header(AUTHORIZATION, bearer(DEMO_BUYER_TOKEN))
        .json(&draft())
        .await;
    response.assert_status(StatusCode::CREATED);
    response.json::<Value>()
}

#[tokio::test]
async fn test_health() {
    let server = server().await;
    let body = server.get("/api/health").await.json::<Value>();
    assert_eq!(body["status"], "healthy");
    assert_eq!(body["orders"], 0);

    place(&server).await;
    let body = server.get("/api/health").await.json::<Value>();
    assert_eq!(body["orders"], 1);
}

#[tokio::test]
async fn test_requests_without_token_are_unauthorized() {
    let server = server().await;
    let response = server.get("/api/orders/my-orders").await;

    response.assert_status(StatusCode::UNAUTHORIZED);
    assert_eq!(response.json::<Value>()["message"], "Not authorized, no token");
}

#[tokio::test]
async fn test_place_and_list_orders() {
    let server = server().await;
    let placed = place(&server).await;

    assert_eq!(placed["success"], true);
    assert_eq!(placed["order"]["subtotal"], 570.0);
    assert_eq!(placed["order"]["total"], 610.0);
    assert_eq!(placed["order"]["status"], "pending");

    let mine = server
        .get("/api/orders/my-orders")
        .add_header(AUTHORIZATION, bearer(DEMO_BUYER_TOKEN))
        .await
        .json::<Value>();
    assert_eq!(mine["orders"].as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn test_invalid_draft_is_rejected_with_message() {
    let server = server().await;
    let mut body = serde_json::to_value(draft()).unwrap();
    body["total"] = json!(1.0);

    let response = server
        .post("/api/orders")
        .add_header(AUTHORIZATION, bearer(DEMO_BUYER_TOKEN))
        .json(&body)
        .await;

    response.assert_status(StatusCode::BAD_REQUEST);
    assert!(response.json::<Value>()["message"]
        .as_str()
        .unwrap()
        .contains("Total"));
}

#[tokio::test]
async fn test_seller_listing_is_scoped_and_grouped() {
    let server = server().await;
    place(&server).await;
    place(&server).await;

    let listing = server
        .get("/api/orders/seller/orders")
        .add_header(AUTHORIZATION, bearer(DEMO_SELLER_TOKEN))
        .await
        .json::<Value>();

    let orders = listing["orders"].as_array().unwrap();
    assert_eq!(orders.len(), 2);
    assert_eq!(orders[0]["items"].as_array().unwrap().len(), 1);
    assert_eq!(orders[0]["items"][0]["originalIndex"], 1);
    assert_eq!(orders[0]["subtotal"], 120.0);

    let groups = listing["groupedByCustomer"].as_array().unwrap();
    assert_eq!(groups.len(), 1);
    assert_eq!(groups[0]["totalOrders"], 2);
    assert_eq!(groups[0]["totalAmount"], 240.0);
    assert_eq!(groups[0]["customer"]["email"], "rajesh@example.com");
}

#[tokio::test]
async fn test_buyer_cannot_read_seller_listing() {
    let server = server().await;
    server
        .get("/api/orders/seller/orders")
        .add_header(AUTHORIZATION, bearer(DEMO_BUYER_TOKEN))
        .await
        .assert_status(StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_update_item_status_by_original_index() {
    let server = server().await;
    let placed = place(&server).await;
    let id = placed["order"]["_id"].as_str().unwrap();

    let response = server
        .patch(&format!("/api/orders/{}/item/1/status", id))
        .add_header(AUTHORIZATION, bearer(DEMO_SELLER_TOKEN))
        .json(&json!({"status": "shipped"}))
        .await;
    response.assert_status_ok();
    assert_eq!(response.json::<Value>()["order"]["items"][0]["status"], "shipped");

    let rejected = server
        .patch(&format!("/api/orders/{}/item/0/status", id))
        .add_header(AUTHORIZATION, bearer(DEMO_SELLER_TOKEN))
        .json(&json!({"status": "shipped"}))
        .await;
    rejected.assert_status(StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_update_item_status_by_line_id() {
    let server = server().await;
    let placed = place(&server).await;
    let id = placed["order"]["_id"].as_str().unwrap();
    let line = placed["order"]["items"][1]["lineId"].as_str().unwrap();

    let response = server
        .patch(&format!("/api/orders/{}/items/{}/status", id, line))
        .add_header(AUTHORIZATION, bearer(DEMO_SELLER_TOKEN))
        .json(&json!({"status": "delivered"}))
        .await;
    response.assert_status_ok();

    let full = server
        .get(&format!("/api/orders/{}", id))
        .add_header(AUTHORIZATION, bearer(DEMO_BUYER_TOKEN))
        .await
        .json::<Value>();
    assert_eq!(full["order"]["items"][1]["status"], "delivered");
    assert!(full["order"]["items"][0].get("status").is_none());
}

#[tokio::test]
async fn test_unknown_order_is_not_found() {
    let server = server().await;
    let response = server
        .get("/api/orders/does-not-exist")
        .add_header(AUTHORIZATION, bearer(DEMO_BUYER_TOKEN))
        .await;

    response.assert_status(StatusCode::NOT_FOUND);
    assert_eq!(response.json::<Value>()["message"], "Order not found");
}

#[tokio::test]
async fn test_malformed_body_is_rejected_with_json_message() {
    let server = server().await;
    let mut body = serde_json::to_value(draft()).unwrap();
    body["items"][0]["quantity"] = json!(-1);

    let response = server
        .post("/api/orders")
        .add_header(AUTHORIZATION, bearer(DEMO_BUYER_TOKEN))
        .json(&body)
        .await;

    response.assert_status(StatusCode::BAD_REQUEST);
    let error = response.json::<Value>();
    assert_eq!(error["success"], false);
    assert!(error["message"].as_str().unwrap().contains("quantity"));
}

#[tokio::test]
async fn test_malformed_line_id_is_rejected_with_json_message() {
    let server = server().await;
    let placed = place(&server).await;
    let id = placed["order"]["_id"].as_str().unwrap();

    let response = server
        .patch(&format!("/api/orders/{}/items/not-a-uuid/status", id))
        .add_header(AUTHORIZATION, bearer(DEMO_SELLER_TOKEN))
        .json(&json!({"status": "shipped"}))
        .await;

    response.assert_status(StatusCode::BAD_REQUEST);
    assert!(response.json::<Value>()["message"].is_string());
}
