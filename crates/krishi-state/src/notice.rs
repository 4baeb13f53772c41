//! Transient success and error messages shown above the order list.

use std::time::Duration;

use tokio::time::Instant;

/// Default time a notice stays visible.
pub const DEFAULT_NOTICE_TTL: Duration = Duration::from_secs(3);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeKind {
    Success,
    Error,
}

/// A message for the person using the dashboard.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub kind: NoticeKind,
    pub text: String,
}

impl Notice {
    pub fn success(text: impl Into<String>) -> Self {
        Self {
            kind: NoticeKind::Success,
            text: text.into(),
        }
    }

    pub fn error(text: impl Into<String>) -> Self {
        Self {
            kind: NoticeKind::Error,
            text: text.into(),
        }
    }
}

/// Holds at most one notice, which clears itself after the TTL.
///
/// A newer notice replaces the current one and restarts the clock.
#[derive(Debug)]
pub struct NoticeBoard {
    ttl: Duration,
    current: Option<(Notice, Instant)>,
}

impl NoticeBoard {
    pub fn new(ttl: Duration) -> Self {
        Self { ttl, current: None }
    }

    /// Show `notice` until the TTL elapses.
    pub fn post(&mut self, notice: Notice) {
        let expires_at = Instant::now() + self.ttl;
        self.current = Some((notice, expires_at));
    }

    /// The visible notice, if it has not expired.
    pub fn current(&self) -> Option<&Notice> {
        match &self.current {
            Some((notice, expires_at)) if Instant::now() < *expires_at => Some(notice),
            _ => None,
        }
    }

    /// Remove the notice before it expires.
    pub fn dismiss(&mut self) {
        self.current = None;
    }
}

impl Default for NoticeBoard {
    fn default() -> Self {
        Self::new(DEFAULT_NOTICE_TTL)
    }
}
