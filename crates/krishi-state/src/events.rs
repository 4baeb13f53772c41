//! Dashboard change notifications.
//!
//! Components that care about order changes (a cart badge, a second
//! dashboard tab) subscribe here instead of listening for a global event.

use futures::Stream;
use futures::StreamExt;
use krishi_core::{ItemKey, ViewerRole};
use tokio::sync::broadcast;
use tokio_stream::wrappers::BroadcastStream;
use uuid::Uuid;

use crate::notice::Notice;

/// Buffered events per subscriber before the slowest one starts lagging.
const CHANNEL_CAPACITY: usize = 256;

/// A change in dashboard state.
#[derive(Debug, Clone, PartialEq)]
pub enum DashboardEvent {
    /// The listing was replaced by a fresh read.
    ListingRefreshed {
        role: ViewerRole,
        orders: usize,
        available: bool,
    },
    /// An item status change was accepted and the listing re-read.
    ItemStatusChanged {
        order_id: String,
        item: ItemKey,
        status: String,
    },
    /// An order was placed from this view.
    OrderPlaced { order_id: String, total: f64 },
    /// A notice was posted.
    NoticePosted(Notice),
}

/// Kind of dashboard event, for filtering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventKind {
    ListingRefreshed,
    ItemStatusChanged,
    OrderPlaced,
    NoticePosted,
}

impl DashboardEvent {
    pub fn kind(&self) -> EventKind {
        match self {
            DashboardEvent::ListingRefreshed { .. } => EventKind::ListingRefreshed,
            DashboardEvent::ItemStatusChanged { .. } => EventKind::ItemStatusChanged,
            DashboardEvent::OrderPlaced { .. } => EventKind::OrderPlaced,
            DashboardEvent::NoticePosted(_) => EventKind::NoticePosted,
        }
    }

    /// Order the event concerns, if any.
    pub fn order_id(&self) -> Option<&str> {
        match self {
            DashboardEvent::ItemStatusChanged { order_id, .. }
            | DashboardEvent::OrderPlaced { order_id, .. } => Some(order_id),
            _ => None,
        }
    }
}

/// Filter for subscriptions.
#[derive(Debug, Clone, Default)]
pub struct EventFilter {
    /// Event kinds to receive. `None` receives all.
    pub kinds: Option<Vec<EventKind>>,

    /// Only events about this order.
    pub order_id: Option<String>,
}

impl EventFilter {
    /// Receive every event.
    pub fn all() -> Self {
        Self::default()
    }

    /// Create a filter for specific kinds.
    pub fn kinds(kinds: Vec<EventKind>) -> Self {
        Self {
            kinds: Some(kinds),
            ..Default::default()
        }
    }

    /// Create a filter for events about one order.
    pub fn order(order_id: impl Into<String>) -> Self {
        Self {
            order_id: Some(order_id.into()),
            ..Default::default()
        }
    }

    /// Check if an event matches this filter.
    pub fn matches(&self, event: &DashboardEvent) -> bool {
        if let Some(ref kinds) = self.kinds {
            if !kinds.contains(&event.kind()) {
                return false;
            }
        }

        if let Some(ref order_id) = self.order_id {
            if event.order_id() != Some(order_id.as_str()) {
                return false;
            }
        }

        true
    }
}

/// A subscription to dashboard events. Dropping it unsubscribes.
pub struct Subscription {
    /// Unique ID for this subscription.
    pub id: Uuid,

    /// Filter for this subscription.
    pub filter: EventFilter,

    receiver: broadcast::Receiver<DashboardEvent>,
}

impl Subscription {
    /// Next matching event. Returns `None` once the bus is gone.
    ///
    /// Events missed because this subscriber lagged are skipped.
    pub async fn recv(&mut self) -> Option<DashboardEvent> {
        loop {
            match self.receiver.recv().await {
                Ok(event) if self.filter.matches(&event) => return Some(event),
                Ok(_) => continue,
                Err(broadcast::error::RecvError::Lagged(missed)) => {
                    tracing::warn!(subscription = %self.id, missed, "Subscriber lagged");
                    continue;
                }
                Err(broadcast::error::RecvError::Closed) => return None,
            }
        }
    }

    /// Next matching event if one is already queued.
    pub fn try_recv(&mut self) -> Option<DashboardEvent> {
        loop {
            match self.receiver.try_recv() {
                Ok(event) if self.filter.matches(&event) => return Some(event),
                Ok(_) => continue,
                Err(broadcast::error::TryRecvError::Lagged(_)) => continue,
                Err(_) => return None,
            }
        }
    }

    /// Matching events as a stream.
    pub fn into_stream(self) -> impl Stream<Item = DashboardEvent> {
        let filter = self.filter;
        BroadcastStream::new(self.receiver).filter_map(move |event| {
            let event = event.ok().filter(|event| filter.matches(event));
            async move { event }
        })
    }
}

/// Broadcasts dashboard events to subscribers.
#[derive(Clone)]
pub struct EventBus {
    /// Sender for broadcasting events.
    sender: broadcast::Sender<DashboardEvent>,
}

impl EventBus {
    /// Create a new event bus.
    pub fn new() -> Self {
        let (sender, _) = broadcast::channel(CHANNEL_CAPACITY);
        Self { sender }
    }

    /// Subscribe to events with a filter.
    pub async fn subscribe(&self, filter: EventFilter) -> Subscription {
        let subscription = Subscription {
            id: Uuid::new_v4(),
            filter,
            receiver: self.sender.subscribe(),
        };
        tracing::debug!(subscription = %subscription.id, "Subscribed to dashboard events");
        subscription
    }

    /// Unsubscribe. Same as dropping the subscription.
    pub fn unsubscribe(&self, subscription: Subscription) {
        tracing::debug!(subscription = %subscription.id, "Unsubscribed from dashboard events");
    }

    /// Publish an event. Having no subscribers is not an error.
    pub fn publish(&self, event: DashboardEvent) {
        let _ = self.sender.send(event);
    }

    /// Get the number of active subscriptions.
    pub fn subscription_count(&self) -> usize {
        self.sender.receiver_count()
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new()
    }
}
