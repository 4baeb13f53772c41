//! The order dashboard shown to buyers and sellers.

use std::sync::Arc;
use std::time::Duration;

use krishi_core::{
    CustomerGroup, FetchOutcome, Order, OrderDraft, OrderError, OrderItem, Result, ViewerOrders,
    ViewerRole,
};
use krishi_sdk::OrderGateway;
use tokio::sync::RwLock;
use tracing::{info, instrument, warn};

use crate::events::{DashboardEvent, EventBus, EventFilter, Subscription};
use crate::expansion::{Expansion, ExpansionState};
use crate::notice::{Notice, NoticeBoard, DEFAULT_NOTICE_TTL};
use crate::row::OrderRow;

/// Settings for a dashboard view.
#[derive(Debug, Clone)]
pub struct ViewConfig {
    /// How long success and error notices stay visible.
    pub notice_ttl: Duration,
}

impl Default for ViewConfig {
    fn default() -> Self {
        Self {
            notice_ttl: DEFAULT_NOTICE_TTL,
        }
    }
}

/// The listing on screen and why it is empty, swapped together on refresh.
#[derive(Debug)]
struct Displayed {
    listing: ViewerOrders,
    unavailable: Option<OrderError>,
}

/// Order dashboard state for one viewer.
///
/// Mutations are never applied locally: after the service accepts a change
/// the whole listing is read again, and only that read replaces what is
/// displayed. Cloning yields another handle to the same state.
#[derive(Clone)]
pub struct DashboardOrderView {
    gateway: Arc<dyn OrderGateway>,
    role: ViewerRole,

    displayed: Arc<RwLock<Displayed>>,

    expansion: Arc<RwLock<ExpansionState>>,
    notices: Arc<RwLock<NoticeBoard>>,
    events: EventBus,
}

impl DashboardOrderView {
    /// Create a view with an empty listing. Call [`refresh`](Self::refresh) to load it.
    pub fn new(gateway: Arc<dyn OrderGateway>, role: ViewerRole, config: ViewConfig) -> Self {
        Self {
            gateway,
            role,
            displayed: Arc::new(RwLock::new(Displayed {
                listing: ViewerOrders::empty(role),
                unavailable: None,
            })),
            expansion: Arc::new(RwLock::new(ExpansionState::new())),
            notices: Arc::new(RwLock::new(NoticeBoard::new(config.notice_ttl))),
            events: EventBus::new(),
        }
    }

    pub fn role(&self) -> ViewerRole {
        self.role
    }

    /// Read the listing and replace what is displayed.
    ///
    /// An unreachable service shows an empty listing and an error notice
    /// rather than failing.
    #[instrument(skip(self), fields(role = ?self.role))]
    pub async fn refresh(&self) -> FetchOutcome<()> {
        let outcome = self.gateway.fetch_orders_for_viewer(self.role).await;

        let (listing, error) = match outcome {
            FetchOutcome::Loaded(listing) => (listing, None),
            FetchOutcome::Unavailable { error } => {
                warn!(%error, "Showing empty listing");
                (ViewerOrders::empty(self.role), Some(error))
            }
        };
        let count = listing.orders().len();

        self.expansion
            .write()
            .await
            .retain_listed(listing.orders().iter().map(|order| order.id.as_str()));
        *self.displayed.write().await = Displayed {
            listing,
            unavailable: error.clone(),
        };

        self.events.publish(DashboardEvent::ListingRefreshed {
            role: self.role,
            orders: count,
            available: error.is_none(),
        });

        match error {
            None => FetchOutcome::Loaded(()),
            Some(error) => {
                self.post_notice(Notice::error("Failed to load orders. Please try again."))
                    .await;
                FetchOutcome::Unavailable { error }
            }
        }
    }

    /// Snapshot of the displayed listing.
    pub async fn listing(&self) -> ViewerOrders {
        self.displayed.read().await.listing.clone()
    }

    /// Displayed orders, flat.
    pub async fn orders(&self) -> Vec<Order> {
        self.displayed.read().await.listing.orders().to_vec()
    }

    /// Displayed customer groups; empty for buyers.
    pub async fn customer_groups(&self) -> Vec<CustomerGroup> {
        self.displayed.read().await.listing.customer_groups().to_vec()
    }

    /// Why the last read failed, if it did.
    pub async fn unavailable_reason(&self) -> Option<OrderError> {
        self.displayed.read().await.unavailable.clone()
    }

    /// Displayed orders rendered with labels, amounts and expansion.
    pub async fn rows(&self) -> Vec<OrderRow> {
        let displayed = self.displayed.read().await;
        let expansion = self.expansion.read().await;
        displayed
            .listing
            .orders()
            .iter()
            .map(|order| OrderRow::render(order, self.role, expansion.is_expanded(&order.id)))
            .collect()
    }

    /// Flip one order between collapsed and expanded.
    pub async fn toggle(&self, order_id: &str) -> Expansion {
        self.expansion.write().await.toggle(order_id)
    }

    pub async fn expansion(&self, order_id: &str) -> Expansion {
        self.expansion.read().await.state(order_id)
    }

    /// The status control shows only for sellers, on expanded orders.
    pub async fn status_editor_visible(&self, order_id: &str) -> bool {
        self.role.can_edit_item_status() && self.expansion.read().await.is_expanded(order_id)
    }

    /// Change one item's status, then re-read the listing.
    ///
    /// `item` is the item as displayed; it is addressed by its line id or
    /// original index, never by where it appears in the view.
    #[instrument(skip(self, item), fields(item = %item.name))]
    pub async fn change_item_status(
        &self,
        order_id: &str,
        item: &OrderItem,
        status: &str,
    ) -> Result<()> {
        let result = self.apply_item_status(order_id, item, status).await;

        match &result {
            Ok(()) => {
                self.post_notice(Notice::success("Item status updated successfully!"))
                    .await
            }
            Err(error) => self.post_notice(Notice::error(error.user_message())).await,
        }

        result
    }

    async fn apply_item_status(&self, order_id: &str, item: &OrderItem, status: &str) -> Result<()> {
        if !self.role.can_edit_item_status() {
            return Err(OrderError::Forbidden(
                "Only sellers can update item status".to_string(),
            ));
        }

        let key = item.key().ok_or_else(|| OrderError::MissingItemKey {
            order_id: order_id.to_string(),
            item: item.name.clone(),
        })?;

        self.gateway.update_item_status(order_id, key, status).await?;
        info!(order_id, %key, status, "Item status accepted, re-reading listing");

        self.refresh().await;

        self.events.publish(DashboardEvent::ItemStatusChanged {
            order_id: order_id.to_string(),
            item: key,
            status: status.to_string(),
        });
        Ok(())
    }

    /// Place an order from the buyer view, then re-read the listing.
    #[instrument(skip(self, draft), fields(items = draft.items.len()))]
    pub async fn place_order(&self, draft: &OrderDraft) -> Result<Order> {
        if self.role != ViewerRole::Buyer {
            let error = OrderError::Forbidden("Orders are placed from the buyer view".to_string());
            self.post_notice(Notice::error(error.user_message())).await;
            return Err(error);
        }

        let order = match self.gateway.place_order(draft).await {
            Ok(order) => order,
            Err(error) => {
                self.post_notice(Notice::error(error.user_message())).await;
                return Err(error);
            }
        };

        self.refresh().await;

        self.events.publish(DashboardEvent::OrderPlaced {
            order_id: order.id.clone(),
            total: order.total,
        });
        self.post_notice(Notice::success("Order placed successfully!")).await;

        Ok(order)
    }

    /// The visible notice, if any.
    pub async fn notice(&self) -> Option<Notice> {
        self.notices.read().await.current().cloned()
    }

    /// Hide the visible notice before it expires.
    pub async fn dismiss_notice(&self) {
        self.notices.write().await.dismiss();
    }

    async fn post_notice(&self, notice: Notice) {
        self.notices.write().await.post(notice.clone());
        self.events.publish(DashboardEvent::NoticePosted(notice));
    }

    /// Subscribe to changes in this view.
    pub async fn subscribe(&self, filter: EventFilter) -> Subscription {
        self.events.subscribe(filter).await
    }
}
