//! Mock event source for testing
//!
//! Scripted responses plus call tracking, so tests can verify not just the
//! returned events but the collector lifecycle (reads attempted, destroys
//! issued) behind them.

use std::collections::VecDeque;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tokio::sync::Mutex;

use crate::error::{Error, Result};
use crate::vim::source::{EventCollector, EventSource};
use crate::vim::types::{Event, EventFilterSpec};

/// Mock implementation of [`EventSource`].
pub struct MockEventSource {
    /// Time reported by `current_time`.
    pub now: DateTime<Utc>,
    /// When set, `current_time` fails with this message.
    pub clock_error: Option<String>,
    /// When set, `create_collector` fails with this message.
    pub collector_error: Option<String>,
    /// When set, the first `read_next` fails with this message.
    pub page_error: Option<String>,
    /// Artificial delay before each `read_next` resolves.
    pub read_delay: Option<Duration>,
    /// Successive pages returned by `read_next`; an empty queue reads as an
    /// empty page.
    pub pages: Arc<Mutex<VecDeque<Vec<Event>>>>,
    /// Filter specs passed to `create_collector`.
    pub created_specs: Arc<Mutex<Vec<EventFilterSpec>>>,
    /// Number of `read_next` calls across all collectors.
    pub reads: Arc<Mutex<u32>>,
    /// Number of `destroy` calls across all collectors.
    pub destroys: Arc<Mutex<u32>>,
}

impl MockEventSource {
    pub fn new(now: DateTime<Utc>) -> Self {
        Self {
            now,
            clock_error: None,
            collector_error: None,
            page_error: None,
            read_delay: None,
            pages: Arc::new(Mutex::new(VecDeque::new())),
            created_specs: Arc::new(Mutex::new(Vec::new())),
            reads: Arc::new(Mutex::new(0)),
            destroys: Arc::new(Mutex::new(0)),
        }
    }

    /// Queue a page for the next `read_next` call.
    pub async fn push_page(&self, page: Vec<Event>) {
        self.pages.lock().await.push_back(page);
    }

    /// Get the filter specs collectors were created with.
    pub async fn get_created_specs(&self) -> Vec<EventFilterSpec> {
        self.created_specs.lock().await.clone()
    }

    pub async fn get_read_count(&self) -> u32 {
        *self.reads.lock().await
    }

    pub async fn get_destroy_count(&self) -> u32 {
        *self.destroys.lock().await
    }
}

#[async_trait]
impl EventSource for MockEventSource {
    async fn current_time(&self) -> Result<DateTime<Utc>> {
        match &self.clock_error {
            Some(message) => Err(Error::RemoteClock(message.clone())),
            None => Ok(self.now),
        }
    }

    async fn create_collector(&self, spec: &EventFilterSpec) -> Result<Box<dyn EventCollector>> {
        if let Some(message) = &self.collector_error {
            return Err(Error::CollectorCreation(message.clone()));
        }

        self.created_specs.lock().await.push(spec.clone());

        Ok(Box::new(MockEventCollector {
            pages: self.pages.clone(),
            page_error: self.page_error.clone(),
            read_delay: self.read_delay,
            reads: self.reads.clone(),
            destroys: self.destroys.clone(),
        }))
    }
}

/// Collector handed out by [`MockEventSource`]; shares its source's queues
/// and counters.
pub struct MockEventCollector {
    pages: Arc<Mutex<VecDeque<Vec<Event>>>>,
    page_error: Option<String>,
    read_delay: Option<Duration>,
    reads: Arc<Mutex<u32>>,
    destroys: Arc<Mutex<u32>>,
}

#[async_trait]
impl EventCollector for MockEventCollector {
    async fn read_next(&mut self, _max_count: u32) -> Result<Vec<Event>> {
        *self.reads.lock().await += 1;

        if let Some(delay) = self.read_delay {
            tokio::time::sleep(delay).await;
        }

        if let Some(message) = self.page_error.take() {
            return Err(Error::PageRead(message));
        }

        Ok(self.pages.lock().await.pop_front().unwrap_or_default())
    }

    async fn destroy(&mut self) -> Result<()> {
        *self.destroys.lock().await += 1;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{complete_event, fixed_now};
    use crate::vim::types::{
        EventFilterSpecByEntity, ManagedObjectRef, RecursionOption,
    };

    fn spec() -> EventFilterSpec {
        EventFilterSpec::new(
            EventFilterSpecByEntity::new(
                ManagedObjectRef::new("Folder", "group-d1"),
                RecursionOption::All,
            ),
            vec!["VmCreatedEvent".to_string()],
        )
    }

    #[tokio::test]
    async fn pages_drain_in_fifo_order() {
        let source = MockEventSource::new(fixed_now());
        source.push_page(vec![complete_event("VmCreatedEvent", "esx1", 1)]).await;
        source.push_page(vec![complete_event("VmRemovedEvent", "esx2", 2)]).await;

        let mut collector = source.create_collector(&spec()).await.unwrap();
        assert_eq!(collector.read_next(100).await.unwrap()[0].key, 1);
        assert_eq!(collector.read_next(100).await.unwrap()[0].key, 2);
        assert!(collector.read_next(100).await.unwrap().is_empty());
        assert_eq!(source.get_read_count().await, 3);
    }

    #[tokio::test]
    async fn scripted_failures_surface_as_taxonomy_errors() {
        let mut source = MockEventSource::new(fixed_now());
        source.clock_error = Some("clock offline".to_string());
        assert!(matches!(
            source.current_time().await,
            Err(Error::RemoteClock(_))
        ));

        source.collector_error = Some("quota exceeded".to_string());
        assert!(matches!(
            source.create_collector(&spec()).await.err(),
            Some(Error::CollectorCreation(_))
        ));
    }
}
