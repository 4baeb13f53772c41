//! The seam between dashboard state and the order service.

use async_trait::async_trait;
use krishi_core::{FetchOutcome, ItemKey, Order, OrderDraft, Result, ViewerOrders, ViewerRole};

/// Order operations the dashboard depends on.
///
/// [`crate::OrderClient`] implements this over HTTP; tests substitute fakes.
#[async_trait]
pub trait OrderGateway: Send + Sync {
    /// Place a new order.
    async fn place_order(&self, draft: &OrderDraft) -> Result<Order>;

    /// Set the status of one item, addressed in the order's full item sequence.
    async fn update_item_status(&self, order_id: &str, item: ItemKey, status: &str)
        -> Result<Order>;

    /// Read the listing for a viewer. Degrades to `Unavailable` instead of failing.
    async fn fetch_orders_for_viewer(&self, role: ViewerRole) -> FetchOutcome<ViewerOrders>;
}
