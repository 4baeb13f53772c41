//! Order API endpoints.

use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use krishi_core::{CustomerGroup, ItemKey, Order, OrderDraft, ViewerRole};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::api::auth::CurrentAccount;
use crate::api::extract::{ApiJson, ApiPath};
use crate::error::ApiError;
use crate::state::AppState;

/// Response after placing an order.
#[derive(Debug, Serialize)]
pub struct PlaceOrderResponse {
    pub success: bool,
    pub message: String,
    pub order: Order,
}

/// Response carrying one order.
#[derive(Debug, Serialize)]
pub struct OrderResponse {
    pub success: bool,
    pub order: Order,
}

/// Response with a buyer's orders.
#[derive(Debug, Serialize)]
pub struct OrdersResponse {
    pub success: bool,
    pub orders: Vec<Order>,
}

/// Response with a seller's scoped orders.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SellerOrdersResponse {
    pub success: bool,
    pub orders: Vec<Order>,
    pub grouped_by_customer: Vec<CustomerGroup>,
}

/// Request to change an item's status.
#[derive(Debug, Deserialize)]
pub struct StatusUpdateRequest {
    pub status: String,
}

/// Place a new order.
pub async fn place_order(
    State(state): State<AppState>,
    CurrentAccount(account): CurrentAccount,
    ApiJson(draft): ApiJson<OrderDraft>,
) -> Result<(StatusCode, Json<PlaceOrderResponse>), ApiError> {
    draft.validate()?;

    let order = state.place_order(&account, draft).await;
    tracing::info!(order_id = %order.id, buyer = %account.id, total = order.total, "Order placed");

    Ok((
        StatusCode::CREATED,
        Json(PlaceOrderResponse {
            success: true,
            message: "Order placed successfully".to_string(),
            order,
        }),
    ))
}

/// List the caller's own orders.
pub async fn my_orders(
    State(state): State<AppState>,
    CurrentAccount(account): CurrentAccount,
) -> Json<OrdersResponse> {
    let orders = state.orders_for_buyer(&account.id).await;

    Json(OrdersResponse {
        success: true,
        orders,
    })
}

/// List orders containing the caller's products, grouped by customer.
pub async fn seller_orders(
    State(state): State<AppState>,
    CurrentAccount(account): CurrentAccount,
) -> Result<Json<SellerOrdersResponse>, ApiError> {
    if account.role != ViewerRole::Seller {
        return Err(ApiError::Forbidden("Seller account required".to_string()));
    }

    let listing = state.orders_for_seller(&account.id).await;

    Ok(Json(SellerOrdersResponse {
        success: true,
        orders: listing.orders,
        grouped_by_customer: listing.grouped_by_customer,
    }))
}

/// Get an order by id.
pub async fn get_order(
    State(state): State<AppState>,
    CurrentAccount(account): CurrentAccount,
    ApiPath(id): ApiPath<String>,
) -> Result<Json<OrderResponse>, ApiError> {
    let order = state.order_for(&account, &id).await?;

    Ok(Json(OrderResponse {
        success: true,
        order,
    }))
}

/// Update an item's status, addressed by index in the full item sequence.
pub async fn update_item_status_by_index(
    State(state): State<AppState>,
    CurrentAccount(account): CurrentAccount,
    ApiPath((id, index)): ApiPath<(String, usize)>,
    ApiJson(req): ApiJson<StatusUpdateRequest>,
) -> Result<Json<OrderResponse>, ApiError> {
    let order = state
        .update_item_status(&account, &id, ItemKey::Index(index), &req.status)
        .await?;

    Ok(Json(OrderResponse {
        success: true,
        order,
    }))
}

/// Update an item's status, addressed by line id.
pub async fn update_item_status_by_line(
    State(state): State<AppState>,
    CurrentAccount(account): CurrentAccount,
    ApiPath((id, line_id)): ApiPath<(String, Uuid)>,
    ApiJson(req): ApiJson<StatusUpdateRequest>,
) -> Result<Json<OrderResponse>, ApiError> {
    let order = state
        .update_item_status(&account, &id, ItemKey::Line(line_id), &req.status)
        .await?;

    Ok(Json(OrderResponse {
        success: true,
        order,
    }))
}
