//! # Krishi Core
//!
//! Order primitives shared by the Krishi client, dashboard state and the
//! reference order service.
//!
//! This crate provides the fundamental building blocks:
//! - [`Order`] / [`OrderItem`] - a checkout and its product lines
//! - [`StatusCategory`] - display buckets for free-form status strings
//! - [`group_by_customer`] - seller-side aggregation of orders per customer
//! - [`OrderError`] - error taxonomy for every order operation

pub mod error;
pub mod grouping;
pub mod money;
pub mod order;
pub mod status;
pub mod types;

// Re-exports for convenience
pub use error::{OrderError, Result};
pub use grouping::{group_by_customer, CustomerGroup};
pub use money::format_inr;
pub use order::{
    Customer, DraftLine, ItemKey, Order, OrderDraft, OrderDraftBuilder, OrderItem,
    ShippingAddress,
};
pub use status::{display_label, effective_status, StatusCategory, SELLER_STATUS_OPTIONS};
pub use types::*;

/// Prelude module for common imports
pub mod prelude {
    pub use crate::error::{OrderError, Result};
    pub use crate::grouping::{group_by_customer, CustomerGroup};
    pub use crate::order::{
        Customer, DraftLine, ItemKey, Order, OrderDraft, OrderItem, ShippingAddress,
    };
    pub use crate::status::{display_label, effective_status, StatusCategory};
    pub use crate::types::{FetchOutcome, SellerOrders, ViewerOrders, ViewerRole};
}
