//! Display status for orders and order items.
//!
//! Statuses arrive from the order service as free-form strings. They are
//! bucketed into a fixed [`StatusCategory`] set for display and never
//! rejected: anything unrecognized is [`StatusCategory::Unknown`].

use serde::{Deserialize, Serialize};

use crate::order::{Order, OrderItem};

/// Status values a seller may set on an item.
pub const SELLER_STATUS_OPTIONS: [&str; 5] =
    ["pending", "processing", "shipped", "delivered", "cancelled"];

/// Effective status used when neither the item nor the order has one.
const FALLBACK_STATUS: &str = "unknown";

/// Display bucket for a status string.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StatusCategory {
    Delivered,
    /// Shipped or in transit.
    Shipped,
    /// Processing or pending.
    Processing,
    Cancelled,
    Unknown,
}

impl StatusCategory {
    /// Classify a status string. Case-insensitive, ignores surrounding whitespace.
    pub fn from_status(status: &str) -> Self {
        match status.trim().to_lowercase().as_str() {
            "delivered" => StatusCategory::Delivered,
            "shipped" | "in transit" | "in-transit" | "in_transit" => StatusCategory::Shipped,
            "processing" | "pending" => StatusCategory::Processing,
            "cancelled" | "canceled" => StatusCategory::Cancelled,
            _ => StatusCategory::Unknown,
        }
    }

    /// Stable name of the category, usable as a style key.
    pub fn as_str(&self) -> &'static str {
        match self {
            StatusCategory::Delivered => "delivered",
            StatusCategory::Shipped => "shipped",
            StatusCategory::Processing => "processing",
            StatusCategory::Cancelled => "cancelled",
            StatusCategory::Unknown => "unknown",
        }
    }
}

/// Uppercase the first character, leaving the rest unchanged.
pub fn display_label(status: &str) -> String {
    let mut chars = status.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Status shown for an item: its own if set and non-empty, else the order's.
pub fn effective_status<'a>(item: &'a OrderItem, order: &'a Order) -> &'a str {
    match item.status.as_deref() {
        Some(status) if !status.trim().is_empty() => status,
        _ if !order.status.trim().is_empty() => &order.status,
        _ => FALLBACK_STATUS,
    }
}

/// Returns true if `status` is one of [`SELLER_STATUS_OPTIONS`].
pub fn is_seller_status(status: &str) -> bool {
    SELLER_STATUS_OPTIONS.contains(&status)
}

impl OrderItem {
    /// Effective status of this item within `order`.
    pub fn effective_status<'a>(&'a self, order: &'a Order) -> &'a str {
        effective_status(self, order)
    }

    /// Display category of this item's effective status.
    pub fn status_category(&self, order: &Order) -> StatusCategory {
        StatusCategory::from_status(self.effective_status(order))
    }
}

impl Order {
    /// Display category of the overall status.
    pub fn status_category(&self) -> StatusCategory {
        StatusCategory::from_status(&self.status)
    }

    /// Display label of the overall status.
    pub fn status_label(&self) -> String {
        display_label(&self.status)
    }
}
