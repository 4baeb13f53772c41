//! # Krishi State
//!
//! Dashboard state for the buyer and seller order views: which orders are
//! expanded, what listing is shown, transient notices, and change
//! notifications for other components.

pub mod events;
pub mod expansion;
pub mod notice;
pub mod row;
pub mod view;

pub use events::{DashboardEvent, EventBus, EventFilter, EventKind, Subscription};
pub use expansion::{Expansion, ExpansionState};
pub use notice::{Notice, NoticeBoard, NoticeKind};
pub use row::{ItemRow, OrderRow};
pub use view::{DashboardOrderView, ViewConfig};
