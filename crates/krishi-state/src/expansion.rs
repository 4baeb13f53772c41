//! Per-order expand/collapse state.

use std::collections::HashSet;

/// Whether an order's details are shown.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Expansion {
    #[default]
    Collapsed,
    Expanded,
}

/// Expansion state keyed by order id. Orders start collapsed.
#[derive(Debug, Clone, Default)]
pub struct ExpansionState {
    expanded: HashSet<String>,
}

impl ExpansionState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Flip one order and return its new state. Other orders are untouched.
    pub fn toggle(&mut self, order_id: &str) -> Expansion {
        if self.expanded.remove(order_id) {
            Expansion::Collapsed
        } else {
            self.expanded.insert(order_id.to_string());
            Expansion::Expanded
        }
    }

    pub fn state(&self, order_id: &str) -> Expansion {
        if self.expanded.contains(order_id) {
            Expansion::Expanded
        } else {
            Expansion::Collapsed
        }
    }

    pub fn is_expanded(&self, order_id: &str) -> bool {
        self.state(order_id) == Expansion::Expanded
    }

    /// Drop state for orders no longer listed.
    pub fn retain_listed<'a>(&mut self, listed: impl IntoIterator<Item = &'a str>) {
        let listed: HashSet<&str> = listed.into_iter().collect();
        self.expanded.retain(|id| listed.contains(id.as_str()));
    }

    pub fn collapse_all(&mut self) {
        self.expanded.clear();
    }

    pub fn expanded_count(&self) -> usize {
        self.expanded.len()
    }
}
