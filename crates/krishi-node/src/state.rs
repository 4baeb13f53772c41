//! Application state.

use std::collections::HashMap;
use std::sync::Arc;

use chrono::Utc;
use krishi_core::status::is_seller_status;
use krishi_core::{
    Customer, ItemKey, Order, OrderDraft, OrderItem, SellerOrders, ViewerRole,
};
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::error::ApiError;

/// Status given to newly placed orders.
const INITIAL_STATUS: &str = "pending";

/// A registered account, identified by its bearer token.
#[derive(Debug, Clone, PartialEq)]
pub struct Account {
    /// Account id. For sellers this is the shop id carried on order lines.
    pub id: String,
    pub role: ViewerRole,
    pub profile: Customer,
}

impl Account {
    pub fn buyer(id: impl Into<String>, profile: Customer) -> Self {
        Self {
            id: id.into(),
            role: ViewerRole::Buyer,
            profile,
        }
    }

    pub fn seller(id: impl Into<String>, profile: Customer) -> Self {
        Self {
            id: id.into(),
            role: ViewerRole::Seller,
            profile,
        }
    }
}

/// Record of an order with its owner.
#[derive(Debug, Clone)]
pub struct OrderRecord {
    /// The order as stored, with every line.
    pub order: Order,

    /// Account that placed it.
    pub buyer_id: String,
}

/// Shared application state.
#[derive(Clone, Default)]
pub struct AppState {
    /// Orders in placement order.
    pub orders: Arc<RwLock<Vec<OrderRecord>>>,

    /// Accounts by bearer token.
    pub accounts: Arc<RwLock<HashMap<String, Account>>>,
}

impl AppState {
    /// Create a new application state.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an account under a bearer token.
    pub async fn register_account(&self, token: impl Into<String>, account: Account) {
        let mut accounts = self.accounts.write().await;
        accounts.insert(token.into(), account);
    }

    /// Look up the account for a bearer token.
    pub async fn authenticate(&self, token: &str) -> Option<Account> {
        let accounts = self.accounts.read().await;
        accounts.get(token).cloned()
    }

    /// Store a new order built from a validated draft.
    pub async fn place_order(&self, buyer: &Account, draft: OrderDraft) -> Order {
        let items = draft
            .items
            .into_iter()
            .map(|line| OrderItem {
                line_id: Some(Uuid::new_v4()),
                product_id: line.product_id,
                name: line.name,
                price: line.price,
                quantity: line.quantity,
                seller: line.seller,
                seller_name: line.seller_name,
                status: None,
                image: line.image,
                original_index: None,
            })
            .collect();

        let order = Order {
            id: Uuid::new_v4().simple().to_string(),
            created_at: Utc::now(),
            items,
            shipping_address: draft.shipping_address,
            payment_method: draft.payment_method,
            subtotal: draft.subtotal,
            shipping_cost: draft.shipping_cost,
            total: draft.total,
            status: INITIAL_STATUS.to_string(),
            customer: Some(buyer.profile.clone()),
            payment_status: None,
        };

        let mut orders = self.orders.write().await;
        orders.push(OrderRecord {
            order: order.clone(),
            buyer_id: buyer.id.clone(),
        });

        order
    }

    /// Orders placed by a buyer, newest first.
    pub async fn orders_for_buyer(&self, buyer_id: &str) -> Vec<Order> {
        let orders = self.orders.read().await;
        orders
            .iter()
            .rev()
            .filter(|record| record.buyer_id == buyer_id)
            .map(|record| record.order.clone())
            .collect()
    }

    /// Seller-scoped orders, newest first, grouped by customer.
    pub async fn orders_for_seller(&self, seller_id: &str) -> SellerOrders {
        let orders = self.orders.read().await;
        let scoped: Vec<Order> = orders
            .iter()
            .rev()
            .filter_map(|record| record.order.scoped_to_seller(seller_id))
            .collect();
        drop(orders);

        SellerOrders::from_orders(scoped)
    }

    /// Get an order as `viewer` may see it.
    ///
    /// Buyers see their own orders in full, sellers see their scoped lines.
    pub async fn order_for(&self, viewer: &Account, order_id: &str) -> Result<Order, ApiError> {
        let orders = self.orders.read().await;
        let record = orders
            .iter()
            .find(|record| record.order.id == order_id)
            .ok_or_else(|| ApiError::NotFound("Order not found".to_string()))?;

        if record.buyer_id == viewer.id {
            return Ok(record.order.clone());
        }
        if viewer.role == ViewerRole::Seller {
            if let Some(scoped) = record.order.scoped_to_seller(&viewer.id) {
                return Ok(scoped);
            }
        }

        Err(ApiError::Forbidden("Not authorized to view this order".to_string()))
    }

    /// Set the status of one of `seller`'s items and return the seller's view of the order.
    pub async fn update_item_status(
        &self,
        seller: &Account,
        order_id: &str,
        key: ItemKey,
        status: &str,
    ) -> Result<Order, ApiError> {
        if seller.role != ViewerRole::Seller {
            return Err(ApiError::Forbidden(
                "Only sellers can update item status".to_string(),
            ));
        }
        if !is_seller_status(status) {
            return Err(ApiError::BadRequest("Invalid status value".to_string()));
        }

        let mut orders = self.orders.write().await;
        let record = orders
            .iter_mut()
            .find(|record| record.order.id == order_id)
            .ok_or_else(|| ApiError::NotFound("Order not found".to_string()))?;

        let index = match record.order.find_item(key) {
            Some((index, _)) => index,
            None => {
                return Err(match key {
                    ItemKey::Index(_) => ApiError::BadRequest("Invalid item index".to_string()),
                    ItemKey::Line(_) => ApiError::NotFound("Order item not found".to_string()),
                })
            }
        };

        let item = &mut record.order.items[index];
        if !item.is_sold_by(&seller.id) {
            return Err(ApiError::Forbidden(
                "Not authorized to update this item".to_string(),
            ));
        }

        tracing::info!(order_id, index, status, seller = %seller.id, "Item status changed");
        item.status = Some(status.to_string());

        record
            .order
            .scoped_to_seller(&seller.id)
            .ok_or_else(|| ApiError::NotFound("Order item not found".to_string()))
    }

    /// Number of stored orders.
    pub async fn order_count(&self) -> usize {
        self.orders.read().await.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use krishi_core::{DraftLine, ShippingAddress};

    fn buyer() -> Account {
        Account::buyer("u1", Customer::new("Rajesh Kumar", "rajesh@example.com"))
    }

    fn seller(id: &str) -> Account {
        Account::seller(id, Customer::new(id, format!("{}@shops.example", id)))
    }

    fn draft() -> OrderDraft {
        OrderDraft::builder()
            .line(DraftLine::new("Tomatoes", 40.0, 3).seller("shop1", "Krishna Farms"))
            .line(DraftLine::new("Rice", 120.0, 5).seller("shop2", "Sharma Agro"))
            .line(DraftLine::new("Onions", 30.0, 2).seller("shop1", "Krishna Farms"))
            .ship_to(ShippingAddress::default())
            .build()
            .unwrap()
    }

    #[tokio::test]
    async fn test_place_order_assigns_ids() {
        let state = AppState::new();
        let order = state.place_order(&buyer(), draft()).await;

        assert_eq!(order.status, "pending");
        assert!(order.items.iter().all(|item| item.line_id.is_some()));
        assert_eq!(order.customer.as_ref().unwrap().email, "rajesh@example.com");
        assert_eq!(state.orders_for_buyer("u1").await.len(), 1);
        assert!(state.orders_for_buyer("u2").await.is_empty());
    }

    #[tokio::test]
    async fn test_seller_listing_is_scoped() {
        let state = AppState::new();
        state.place_order(&buyer(), draft()).await;

        let listing = state.orders_for_seller("shop1").await;
        assert_eq!(listing.orders.len(), 1);
        assert_eq!(listing.orders[0].subtotal, 180.0);
        assert_eq!(listing.grouped_by_customer[0].total_amount, 180.0);
        assert!(state.orders_for_seller("shop3").await.orders.is_empty());
    }

    #[tokio::test]
    async fn test_update_item_status_by_index() {
        let state = AppState::new();
        let order = state.place_order(&buyer(), draft()).await;

        let updated = state
            .update_item_status(&seller("shop1"), &order.id, ItemKey::Index(2), "shipped")
            .await
            .unwrap();
        assert_eq!(updated.items[1].original_index, Some(2));
        assert_eq!(updated.items[1].status.as_deref(), Some("shipped"));
        assert_eq!(updated.items[0].status, None);
    }

    #[tokio::test]
    async fn test_update_item_status_rejections() {
        let state = AppState::new();
        let order = state.place_order(&buyer(), draft()).await;
        let shop1 = seller("shop1");

        let err = state
            .update_item_status(&shop1, &order.id, ItemKey::Index(1), "shipped")
            .await
            .unwrap_err();
        assert!(matches!(err, ApiError::Forbidden(_)));

        let err = state
            .update_item_status(&shop1, &order.id, ItemKey::Index(9), "shipped")
            .await
            .unwrap_err();
        assert_eq!(err, ApiError::BadRequest("Invalid item index".to_string()));

        let err = state
            .update_item_status(&shop1, &order.id, ItemKey::Index(0), "teleported")
            .await
            .unwrap_err();
        assert_eq!(err, ApiError::BadRequest("Invalid status value".to_string()));

        let err = state
            .update_item_status(&shop1, "missing", ItemKey::Index(0), "shipped")
            .await
            .unwrap_err();
        assert!(matches!(err, ApiError::NotFound(_)));

        let err = state
            .update_item_status(&buyer(), &order.id, ItemKey::Index(0), "shipped")
            .await
            .unwrap_err();
        assert!(matches!(err, ApiError::Forbidden(_)));
    }

    #[tokio::test]
    async fn test_order_for_viewer() {
        let state = AppState::new();
        let order = state.place_order(&buyer(), draft()).await;

        assert_eq!(state.order_for(&buyer(), &order.id).await.unwrap().items.len(), 3);
        assert_eq!(state.order_for(&seller("shop2"), &order.id).await.unwrap().items.len(), 1);
        assert!(state.order_for(&seller("shop9"), &order.id).await.is_err());
    }
}
