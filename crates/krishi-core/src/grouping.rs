//! Seller-side aggregation of orders by purchasing customer.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::order::{Customer, Order};

/// A seller's orders bucketed by the customer who placed them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CustomerGroup {
    pub customer: Customer,

    /// Orders in first-seen input order.
    #[serde(default)]
    pub orders: Vec<Order>,

    pub total_orders: usize,

    /// Sum of the (seller-scoped) subtotals of `orders`.
    pub total_amount: f64,
}

impl CustomerGroup {
    fn new(customer: Customer) -> Self {
        Self {
            customer,
            orders: Vec::new(),
            total_orders: 0,
            total_amount: 0.0,
        }
    }

    fn push(&mut self, order: Order) {
        self.total_orders += 1;
        self.total_amount += order.subtotal;
        self.orders.push(order);
    }
}

/// Group seller-scoped orders by customer email.
///
/// Subtotals are trusted as already restricted to the seller's lines. Groups
/// appear in the order their customer is first seen; orders without a
/// customer share one anonymous group. Empty orders are kept as members.
pub fn group_by_customer(orders: &[Order]) -> Vec<CustomerGroup> {
    let mut groups: Vec<CustomerGroup> = Vec::new();
    let mut positions: HashMap<String, usize> = HashMap::new();

    for order in orders {
        let customer = order.customer.clone().unwrap_or_else(Customer::anonymous);
        let key = customer.key();

        let position = *positions.entry(key).or_insert_with(|| {
            groups.push(CustomerGroup::new(customer));
            groups.len() - 1
        });
        groups[position].push(order.clone());
    }

    tracing::debug!(orders = orders.len(), groups = groups.len(), "Grouped orders by customer");
    groups
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn order(id: &str, email: Option<&str>, subtotal: f64) -> Order {
        Order {
            id: id.to_string(),
            created_at: Utc::now(),
            items: vec![],
            shipping_address: Default::default(),
            payment_method: "UPI".to_string(),
            subtotal,
            shipping_cost: 0.0,
            total: subtotal,
            status: "pending".to_string(),
            customer: email.map(|e| Customer::new(e.split('@').next().unwrap_or(e), e)),
            payment_status: None,
        }
    }

    #[test]
    fn test_groups_by_email() {
        let orders = vec![
            order("1", Some("a@x.com"), 100.0),
            order("2", Some("b@x.com"), 50.0),
            order("3", Some("a@x.com"), 30.0),
        ];

        let groups = group_by_customer(&orders);
        assert_eq!(groups.len(), 2);

        let a = groups.iter().find(|g| g.customer.email == "a@x.com").unwrap();
        assert_eq!(a.total_orders, 2);
        assert_eq!(a.total_amount, 130.0);
        assert_eq!(a.orders.len(), 2);

        let b = groups.iter().find(|g| g.customer.email == "b@x.com").unwrap();
        assert_eq!(b.total_orders, 1);
        assert_eq!(b.total_amount, 50.0);
    }

    #[test]
    fn test_grouping_is_deterministic() {
        let orders = vec![
            order("1", Some("c@x.com"), 10.5),
            order("2", Some("a@x.com"), 20.25),
            order("3", Some("c@x.com"), 0.1),
            order("4", Some("b@x.com"), 0.2),
        ];

        let first = group_by_customer(&orders);
        let second = group_by_customer(&orders);
        assert_eq!(first, second);

        let keys: Vec<&str> = first.iter().map(|g| g.customer.email.as_str()).collect();
        assert_eq!(keys, vec!["c@x.com", "a@x.com", "b@x.com"]);
    }

    #[test]
    fn test_total_amount_is_exact_sum() {
        let orders = vec![
            order("1", Some("a@x.com"), 0.1),
            order("2", Some("a@x.com"), 0.2),
        ];
        let groups = group_by_customer(&orders);
        assert_eq!(groups[0].total_amount, 0.1 + 0.2);
    }

    #[test]
    fn test_email_key_ignores_case_and_whitespace() {
        let orders = vec![
            order("1", Some("Asha@X.com"), 10.0),
            order("2", Some(" asha@x.com "), 15.0),
        ];
        let groups = group_by_customer(&orders);
        assert_eq!(groups.len(), 1);
        assert_eq!(groups[0].customer.email, "Asha@X.com");
        assert_eq!(groups[0].total_orders, 2);
    }

    #[test]
    fn test_tolerates_empty_and_anonymous_orders() {
        let orders = vec![
            order("1", None, 0.0),
            order("2", Some("a@x.com"), 0.0),
            order("3", None, 12.0),
        ];
        let groups = group_by_customer(&orders);

        assert_eq!(groups.len(), 2);
        assert_eq!(groups[0].customer, Customer::anonymous());
        assert_eq!(groups[0].total_orders, 2);
        assert_eq!(groups[0].total_amount, 12.0);
        assert_eq!(groups[1].total_amount, 0.0);
    }

    #[test]
    fn test_empty_input() {
        assert!(group_by_customer(&[]).is_empty());
    }
}
