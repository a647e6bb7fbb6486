//! Event source traits
//!
//! The core pipeline only depends on these traits, so it runs against the
//! REST client in production and the scripted mock in tests.

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::error::Result;
use crate::vim::types::{Event, EventFilterSpec};

/// An authenticated handle to a vCenter server's event API.
#[async_trait]
pub trait EventSource: Send + Sync {
    /// Current time as reported by the server.
    ///
    /// Time-bounded queries must be anchored to the server clock, never the
    /// local one, so a skewed workstation clock cannot shift the window.
    /// Fails with [`crate::error::Error::RemoteClock`].
    async fn current_time(&self) -> Result<DateTime<Utc>>;

    /// Create a server-side event collector for the given filter spec.
    ///
    /// Collectors are a limited server resource and leak query state if not
    /// released; callers must destroy the returned collector on every exit
    /// path. Fails with [`crate::error::Error::CollectorCreation`].
    async fn create_collector(&self, spec: &EventFilterSpec) -> Result<Box<dyn EventCollector>>;
}

/// A server-side cursor over the events matching one filter spec.
///
/// Not reusable across unrelated queries; reading a page consumes it.
#[async_trait]
pub trait EventCollector: Send {
    /// Read the next page of at most `max_count` events.
    ///
    /// An empty page means the collector is exhausted. Fails with
    /// [`crate::error::Error::PageRead`].
    async fn read_next(&mut self, max_count: u32) -> Result<Vec<Event>>;

    /// Release the server-side collector state.
    async fn destroy(&mut self) -> Result<()>;
}
