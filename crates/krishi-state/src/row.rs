//! Orders as the dashboard renders them.

use krishi_core::{display_label, format_inr, Order, OrderItem, StatusCategory, ViewerRole};

/// One product line, ready to display.
#[derive(Debug, Clone, PartialEq)]
pub struct ItemRow {
    pub name: String,
    pub quantity: u32,
    pub line_total: String,
    /// Label of the effective status.
    pub status_label: String,
    pub status: StatusCategory,
    /// Whether the status control is shown for this line.
    pub editable: bool,
    pub item: OrderItem,
}

/// One order, ready to display.
#[derive(Debug, Clone, PartialEq)]
pub struct OrderRow {
    pub order_id: String,
    pub status_label: String,
    pub status: StatusCategory,
    pub subtotal: String,
    pub total: String,
    pub expanded: bool,
    /// Lines are only rendered for expanded orders.
    pub items: Vec<ItemRow>,
}

impl OrderRow {
    pub fn render(order: &Order, role: ViewerRole, expanded: bool) -> Self {
        let items = if expanded {
            order
                .items
                .iter()
                .map(|item| {
                    let status = item.effective_status(order);
                    ItemRow {
                        name: item.name.clone(),
                        quantity: item.quantity,
                        line_total: format_inr(item.line_total()),
                        status_label: display_label(status),
                        status: StatusCategory::from_status(status),
                        editable: role.can_edit_item_status(),
                        item: item.clone(),
                    }
                })
                .collect()
        } else {
            Vec::new()
        };

        Self {
            order_id: order.id.clone(),
            status_label: order.status_label(),
            status: order.status_category(),
            subtotal: format_inr(order.subtotal),
            total: format_inr(order.total),
            expanded,
            items,
        }
    }
}
