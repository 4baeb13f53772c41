//! Order types and the checkout draft builder.
//!
//! An [`Order`] is a checkout transaction holding one or more [`OrderItem`]s,
//! possibly from several sellers. Orders are created by the order service and
//! only ever read or have an individual item status changed afterwards.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::{OrderError, Result};

/// Tolerance used when comparing money amounts computed from lines.
const AMOUNT_EPSILON: f64 = 0.005;

/// A checkout transaction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    /// Identifier assigned by the order service.
    #[serde(rename = "_id", alias = "id")]
    pub id: String,

    /// Timestamp when the order was placed.
    #[serde(alias = "orderDate", alias = "date")]
    pub created_at: DateTime<Utc>,

    /// Product lines in checkout order.
    #[serde(default)]
    pub items: Vec<OrderItem>,

    /// Where the order ships to.
    #[serde(default)]
    pub shipping_address: ShippingAddress,

    /// Payment method chosen at checkout (e.g. "Cash on Delivery", "UPI").
    #[serde(default)]
    pub payment_method: String,

    /// Sum of line totals. Seller-scoped listings carry the seller's share only.
    #[serde(default)]
    pub subtotal: f64,

    /// Shipping charged on top of the subtotal.
    #[serde(default)]
    pub shipping_cost: f64,

    /// Amount charged to the buyer.
    #[serde(default)]
    pub total: f64,

    /// Overall status, fixed at checkout and independent of item statuses.
    #[serde(default)]
    pub status: String,

    /// The purchasing customer, present on seller-facing listings.
    #[serde(default, alias = "user", skip_serializing_if = "Option::is_none")]
    pub customer: Option<Customer>,

    /// Payment state reported by the service (e.g. "Paid").
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub payment_status: Option<String>,
}

/// One product line within an order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderItem {
    /// Stable identifier of this line, assigned when the order is created.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub line_id: Option<Uuid>,

    /// Catalogue identifier of the product.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub product_id: Option<String>,

    pub name: String,

    /// Unit price in rupees.
    pub price: f64,

    pub quantity: u32,

    /// Identifier of the selling shop.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub seller: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub seller_name: Option<String>,

    /// Fulfilment status of this line. Falls back to the order status when absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,

    /// Position of this line in the parent order's full item sequence.
    /// Set on filtered views, where display position and order position differ.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub original_index: Option<usize>,
}

/// Delivery address captured at checkout.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ShippingAddress {
    pub full_name: String,
    pub address: String,
    pub city: String,
    pub state: String,
    pub pincode: String,
    pub phone: String,
}

/// Identity of a purchasing customer.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Customer {
    #[serde(default)]
    pub name: String,

    /// Uniqueness key for grouping; names may collide.
    #[serde(default)]
    pub email: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
}

/// How a status update addresses an item inside its order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ItemKey {
    /// Stable line identifier.
    Line(Uuid),
    /// Index into the order's full, unfiltered item sequence.
    Index(usize),
}

impl fmt::Display for ItemKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ItemKey::Line(id) => write!(f, "line {}", id),
            ItemKey::Index(index) => write!(f, "index {}", index),
        }
    }
}

impl Customer {
    /// Create a customer record.
    pub fn new(name: impl Into<String>, email: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            email: email.into(),
            phone: None,
        }
    }

    /// Set the phone number.
    pub fn with_phone(mut self, phone: impl Into<String>) -> Self {
        self.phone = Some(phone.into());
        self
    }

    /// Placeholder identity for orders whose customer is unknown.
    pub fn anonymous() -> Self {
        Self::new("Unknown customer", "")
    }

    /// Normalized email used as the grouping key.
    pub fn key(&self) -> String {
        self.email.trim().to_ascii_lowercase()
    }
}

impl OrderItem {
    /// Create an item with the given name, unit price and quantity.
    pub fn new(name: impl Into<String>, price: f64, quantity: u32) -> Self {
        Self {
            line_id: None,
            product_id: None,
            name: name.into(),
            price,
            quantity,
            seller: None,
            seller_name: None,
            status: None,
            image: None,
            original_index: None,
        }
    }

    /// Price times quantity.
    pub fn line_total(&self) -> f64 {
        self.price * f64::from(self.quantity)
    }

    /// Stable key for status updates, preferring the line id.
    ///
    /// Never falls back to the item's position in a displayed list: a
    /// filtered view may have removed or reordered lines.
    pub fn key(&self) -> Option<ItemKey> {
        self.line_id
            .map(ItemKey::Line)
            .or_else(|| self.original_index.map(ItemKey::Index))
    }

    /// Returns true if this line belongs to the given seller.
    pub fn is_sold_by(&self, seller_id: &str) -> bool {
        self.seller.as_deref() == Some(seller_id)
    }
}

impl Order {
    /// Sum of `price * quantity` over all items.
    pub fn items_subtotal(&self) -> f64 {
        self.items.iter().map(OrderItem::line_total).sum()
    }

    /// Check the subtotal reported by the service against the items.
    pub fn is_subtotal_consistent(&self) -> bool {
        (self.items_subtotal() - self.subtotal).abs() < AMOUNT_EPSILON
    }

    /// Resolve the key used to address `item` in a status update.
    pub fn item_key(&self, item: &OrderItem) -> Result<ItemKey> {
        item.key().ok_or_else(|| OrderError::MissingItemKey {
            order_id: self.id.clone(),
            item: item.name.clone(),
        })
    }

    /// Find an item by its key in the full item sequence.
    pub fn find_item(&self, key: ItemKey) -> Option<(usize, &OrderItem)> {
        match key {
            ItemKey::Index(index) => self.items.get(index).map(|item| (index, item)),
            ItemKey::Line(id) => self
                .items
                .iter()
                .enumerate()
                .find(|(_, item)| item.line_id == Some(id)),
        }
    }

    /// Copy of this order restricted to one seller's lines.
    ///
    /// Each kept line records its `original_index` in the full sequence and
    /// the subtotal is recomputed from the kept lines. Returns `None` if the
    /// seller has nothing in this order.
    pub fn scoped_to_seller(&self, seller_id: &str) -> Option<Order> {
        let items: Vec<OrderItem> = self
            .items
            .iter()
            .enumerate()
            .filter(|(_, item)| item.is_sold_by(seller_id))
            .map(|(index, item)| {
                let mut item = item.clone();
                item.original_index = Some(index);
                item
            })
            .collect();

        if items.is_empty() {
            return None;
        }

        let subtotal = items.iter().map(OrderItem::line_total).sum();
        Some(Order {
            items,
            subtotal,
            ..self.clone()
        })
    }
}

/// A product line in a checkout payload.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DraftLine {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub product_id: Option<String>,
    pub name: String,
    pub price: f64,
    pub quantity: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub seller: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub seller_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
}

impl DraftLine {
    /// Create a line with the given name, unit price and quantity.
    pub fn new(name: impl Into<String>, price: f64, quantity: u32) -> Self {
        Self {
            product_id: None,
            name: name.into(),
            price,
            quantity,
            seller: None,
            seller_name: None,
            image: None,
        }
    }

    /// Set the catalogue product id.
    pub fn product(mut self, product_id: impl Into<String>) -> Self {
        self.product_id = Some(product_id.into());
        self
    }

    /// Set the selling shop.
    pub fn seller(mut self, seller_id: impl Into<String>, seller_name: impl Into<String>) -> Self {
        self.seller = Some(seller_id.into());
        self.seller_name = Some(seller_name.into());
        self
    }

    /// Set the image reference.
    pub fn image(mut self, image: impl Into<String>) -> Self {
        self.image = Some(image.into());
        self
    }

    pub fn line_total(&self) -> f64 {
        self.price * f64::from(self.quantity)
    }
}

/// Checkout payload sent when placing an order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderDraft {
    pub items: Vec<DraftLine>,
    pub shipping_address: ShippingAddress,
    pub payment_method: String,
    pub subtotal: f64,
    #[serde(default)]
    pub shipping_cost: f64,
    pub total: f64,
}

impl OrderDraft {
    /// Create a new OrderDraftBuilder.
    pub fn builder() -> OrderDraftBuilder {
        OrderDraftBuilder::new()
    }

    /// Validate lines and amounts.
    ///
    /// The order service runs the same check on drafts it receives.
    pub fn validate(&self) -> Result<()> {
        if self.items.is_empty() {
            return Err(OrderError::Invalid("Order must contain at least one item".to_string()));
        }

        for line in &self.items {
            if line.name.trim().is_empty() {
                return Err(OrderError::Invalid("Item name cannot be empty".to_string()));
            }
            if line.quantity == 0 {
                return Err(OrderError::Invalid(format!(
                    "Quantity for '{}' must be at least 1",
                    line.name
                )));
            }
            if !line.price.is_finite() || line.price < 0.0 {
                return Err(OrderError::Invalid(format!(
                    "Price for '{}' must be a non-negative amount",
                    line.name
                )));
            }
        }

        if !self.shipping_cost.is_finite() || self.shipping_cost < 0.0 {
            return Err(OrderError::Invalid(
                "Shipping cost must be a non-negative amount".to_string(),
            ));
        }

        let subtotal: f64 = self.items.iter().map(DraftLine::line_total).sum();
        if (subtotal - self.subtotal).abs() >= AMOUNT_EPSILON {
            return Err(OrderError::Invalid(format!(
                "Subtotal {} does not match item total {}",
                self.subtotal, subtotal
            )));
        }
        if (subtotal + self.shipping_cost - self.total).abs() >= AMOUNT_EPSILON {
            return Err(OrderError::Invalid(format!(
                "Total {} does not match subtotal plus shipping",
                self.total
            )));
        }

        Ok(())
    }
}

/// Builder for checkout drafts with a fluent API.
#[derive(Debug)]
pub struct OrderDraftBuilder {
    items: Vec<DraftLine>,
    shipping_address: Option<ShippingAddress>,
    payment_method: String,
    shipping_cost: f64,
}

impl Default for OrderDraftBuilder {
    fn default() -> Self {
        Self {
            items: Vec::new(),
            shipping_address: None,
            payment_method: "Cash on Delivery".to_string(),
            shipping_cost: 0.0,
        }
    }
}

impl OrderDraftBuilder {
    /// Create a new OrderDraftBuilder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a line.
    pub fn line(mut self, line: DraftLine) -> Self {
        self.items.push(line);
        self
    }

    /// Add a simple line by name, unit price and quantity.
    pub fn item(self, name: impl Into<String>, price: f64, quantity: u32) -> Self {
        self.line(DraftLine::new(name, price, quantity))
    }

    /// Set the shipping address.
    pub fn ship_to(mut self, address: ShippingAddress) -> Self {
        self.shipping_address = Some(address);
        self
    }

    /// Set the payment method.
    pub fn payment_method(mut self, method: impl Into<String>) -> Self {
        self.payment_method = method.into();
        self
    }

    /// Set the shipping cost.
    pub fn shipping_cost(mut self, cost: f64) -> Self {
        self.shipping_cost = cost;
        self
    }

    /// Build the draft, computing subtotal and total from the lines.
    pub fn build(self) -> Result<OrderDraft> {
        let shipping_address = self
            .shipping_address
            .ok_or_else(|| OrderError::Invalid("Shipping address is required".to_string()))?;

        let subtotal = self.items.iter().map(DraftLine::line_total).sum();
        let draft = OrderDraft {
            items: self.items,
            shipping_address,
            payment_method: self.payment_method,
            subtotal,
            shipping_cost: self.shipping_cost,
            total: subtotal + self.shipping_cost,
        };

        draft.validate()?;
        Ok(draft)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn address() -> ShippingAddress {
        ShippingAddress {
            full_name: "Rajesh Kumar".to_string(),
            address: "123 Village Road".to_string(),
            city: "Jaipur".to_string(),
            state: "Rajasthan".to_string(),
            pincode: "302001".to_string(),
            phone: "9876543210".to_string(),
        }
    }

    fn mixed_order() -> Order {
        let mut tomatoes = OrderItem::new("Tomatoes", 40.0, 3);
        tomatoes.seller = Some("shop1".to_string());
        let mut rice = OrderItem::new("Basmati Rice", 120.0, 5);
        rice.seller = Some("shop2".to_string());
        let mut onions = OrderItem::new("Onions", 30.0, 2);
        onions.seller = Some("shop1".to_string());

        Order {
            id: "order1".to_string(),
            created_at: Utc::now(),
            items: vec![tomatoes, rice, onions],
            shipping_address: address(),
            payment_method: "UPI".to_string(),
            subtotal: 780.0,
            shipping_cost: 40.0,
            total: 820.0,
            status: "processing".to_string(),
            customer: None,
            payment_status: None,
        }
    }

    #[test]
    fn test_draft_builder_computes_totals() {
        let draft = OrderDraft::builder()
            .item("Tomatoes", 40.0, 3)
            .line(DraftLine::new("Rice", 120.0, 5).seller("shop2", "Sharma Agro"))
            .shipping_cost(40.0)
            .ship_to(address())
            .build()
            .unwrap();

        assert_eq!(draft.subtotal, 720.0);
        assert_eq!(draft.total, 760.0);
        assert_eq!(draft.payment_method, "Cash on Delivery");
    }

    #[test]
    fn test_draft_builder_rejects_empty_and_zero_quantity() {
        assert!(OrderDraft::builder().ship_to(address()).build().is_err());
        assert!(OrderDraft::builder()
            .item("Tomatoes", 40.0, 0)
            .ship_to(address())
            .build()
            .is_err());
        assert!(OrderDraft::builder().item("Tomatoes", 40.0, 1).build().is_err());
    }

    #[test]
    fn test_draft_validate_rejects_tampered_total() {
        let mut draft = OrderDraft::builder()
            .item("Tomatoes", 40.0, 3)
            .ship_to(address())
            .build()
            .unwrap();
        draft.total = 1.0;
        assert!(matches!(draft.validate(), Err(OrderError::Invalid(_))));
    }

    #[test]
    fn test_subtotal_consistency() {
        let order = mixed_order();
        assert_eq!(order.items_subtotal(), 780.0);
        assert!(order.is_subtotal_consistent());
    }

    #[test]
    fn test_scoped_to_seller_keeps_original_index() {
        let order = mixed_order();
        let scoped = order.scoped_to_seller("shop1").unwrap();

        assert_eq!(scoped.items.len(), 2);
        assert_eq!(scoped.items[0].original_index, Some(0));
        assert_eq!(scoped.items[1].original_index, Some(2));
        assert_eq!(scoped.subtotal, 180.0);
        assert_eq!(scoped.total, order.total);
        assert!(order.scoped_to_seller("shop9").is_none());
    }

    #[test]
    fn test_item_key_prefers_line_id_and_never_uses_position() {
        let order = mixed_order();
        let mut item = OrderItem::new("Tomatoes", 40.0, 1);
        assert!(matches!(
            order.item_key(&item),
            Err(OrderError::MissingItemKey { .. })
        ));

        item.original_index = Some(5);
        assert_eq!(order.item_key(&item).unwrap(), ItemKey::Index(5));

        let line = Uuid::new_v4();
        item.line_id = Some(line);
        assert_eq!(order.item_key(&item).unwrap(), ItemKey::Line(line));
    }

    #[test]
    fn test_find_item() {
        let mut order = mixed_order();
        let line = Uuid::new_v4();
        order.items[1].line_id = Some(line);

        assert_eq!(order.find_item(ItemKey::Line(line)).unwrap().0, 1);
        assert_eq!(order.find_item(ItemKey::Index(2)).unwrap().1.name, "Onions");
        assert!(order.find_item(ItemKey::Index(3)).is_none());
    }

    #[test]
    fn test_order_wire_format() {
        let json = serde_json::json!({
            "_id": "665f1c",
            "createdAt": "2025-05-01T10:30:00Z",
            "items": [
                {"name": "Tomatoes", "price": 40, "quantity": 3, "status": "shipped", "originalIndex": 2}
            ],
            "shippingAddress": {"fullName": "Rajesh Kumar", "city": "Jaipur"},
            "paymentMethod": "UPI",
            "subtotal": 120,
            "total": 120,
            "status": "processing",
            "user": {"name": "Rajesh Kumar", "email": "rajesh@example.com"}
        });

        let order: Order = serde_json::from_value(json).unwrap();
        assert_eq!(order.id, "665f1c");
        assert_eq!(order.items[0].original_index, Some(2));
        assert_eq!(order.shipping_address.city, "Jaipur");
        assert_eq!(order.shipping_cost, 0.0);
        assert_eq!(order.customer.unwrap().email, "rajesh@example.com");

        let back = serde_json::to_value(mixed_order()).unwrap();
        assert_eq!(back["_id"], "order1");
        assert!(back.get("customer").is_none());
    }
}
