//! Common types shared by the client and the dashboard.

use serde::{Deserialize, Serialize};

use crate::error::OrderError;
use crate::grouping::{group_by_customer, CustomerGroup};
use crate::order::Order;

/// Who is looking at the order dashboard.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ViewerRole {
    /// Sees their own purchases.
    Buyer,
    /// Sees orders containing their products, grouped by customer.
    Seller,
}

impl ViewerRole {
    /// Returns true if this role may change item statuses.
    pub fn can_edit_item_status(&self) -> bool {
        matches!(self, ViewerRole::Seller)
    }
}

/// Seller listing: scoped orders and their per-customer aggregation.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SellerOrders {
    #[serde(default)]
    pub orders: Vec<Order>,
    #[serde(default)]
    pub grouped_by_customer: Vec<CustomerGroup>,
}

impl SellerOrders {
    /// Build a listing from scoped orders, grouping them locally.
    pub fn from_orders(orders: Vec<Order>) -> Self {
        let grouped_by_customer = group_by_customer(&orders);
        Self {
            orders,
            grouped_by_customer,
        }
    }
}

/// Orders as shown to a viewer. The shape depends only on the role.
#[derive(Debug, Clone, PartialEq)]
pub enum ViewerOrders {
    Buyer(Vec<Order>),
    Seller(SellerOrders),
}

impl ViewerOrders {
    /// Empty listing for a role.
    pub fn empty(role: ViewerRole) -> Self {
        match role {
            ViewerRole::Buyer => ViewerOrders::Buyer(Vec::new()),
            ViewerRole::Seller => ViewerOrders::Seller(SellerOrders::default()),
        }
    }

    pub fn role(&self) -> ViewerRole {
        match self {
            ViewerOrders::Buyer(_) => ViewerRole::Buyer,
            ViewerOrders::Seller(_) => ViewerRole::Seller,
        }
    }

    /// Flat order list regardless of role.
    pub fn orders(&self) -> &[Order] {
        match self {
            ViewerOrders::Buyer(orders) => orders,
            ViewerOrders::Seller(listing) => &listing.orders,
        }
    }

    /// Customer groups; empty for buyers.
    pub fn customer_groups(&self) -> &[CustomerGroup] {
        match self {
            ViewerOrders::Buyer(_) => &[],
            ViewerOrders::Seller(listing) => &listing.grouped_by_customer,
        }
    }

    /// Find an order by id.
    pub fn find(&self, order_id: &str) -> Option<&Order> {
        self.orders().iter().find(|order| order.id == order_id)
    }

    pub fn is_empty(&self) -> bool {
        self.orders().is_empty()
    }
}

/// Result of a read that degrades instead of failing.
///
/// Keeps "nothing to show" apart from "could not ask": an empty listing is
/// `Loaded` with no orders, an unreachable service is `Unavailable`.
#[derive(Debug, Clone, PartialEq)]
pub enum FetchOutcome<T> {
    Loaded(T),
    Unavailable { error: OrderError },
}

impl<T> FetchOutcome<T> {
    pub fn is_loaded(&self) -> bool {
        matches!(self, FetchOutcome::Loaded(_))
    }

    /// The error, if the read did not reach the service.
    pub fn error(&self) -> Option<&OrderError> {
        match self {
            FetchOutcome::Loaded(_) => None,
            FetchOutcome::Unavailable { error } => Some(error),
        }
    }

    /// Loaded value, or `fallback` when unavailable.
    pub fn unwrap_or_else(self, fallback: impl FnOnce() -> T) -> T {
        match self {
            FetchOutcome::Loaded(value) => value,
            FetchOutcome::Unavailable { .. } => fallback(),
        }
    }

    /// Convert to a `Result`, for callers that want to propagate.
    pub fn into_result(self) -> Result<T, OrderError> {
        match self {
            FetchOutcome::Loaded(value) => Ok(value),
            FetchOutcome::Unavailable { error } => Err(error),
        }
    }
}
