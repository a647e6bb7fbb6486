//! Event fetcher
//!
//! Drives the collector lifecycle: create, read, destroy on every exit
//! path. Server-side collectors are a limited resource and leak query
//! state if not released, so once creation succeeds the destroy attempt is
//! unconditional.

use std::time::Duration;

use tracing::{debug, warn};

use crate::error::{Error, Result};
use crate::events::filter::{filter_by_host, filter_complete};
use crate::vim::types::{Event, EventFilterSpec};
use crate::vim::{EventCollector, EventSource};

/// Upper bound on one collector page.
pub const EVENT_PAGE_SIZE: u32 = 100;

/// Fetch one page of events matching `spec`.
///
/// At most [`EVENT_PAGE_SIZE`] events are read; anything beyond the first
/// page stays on the server (use [`fetch_all_events`] to drain it). A
/// non-empty `host` narrows the page to that host before the completeness
/// filter runs. The optional `timeout` bounds the page read; the collector
/// is destroyed even when the read fails or times out.
pub async fn fetch_events(
    source: &dyn EventSource,
    spec: &EventFilterSpec,
    host: Option<&str>,
    timeout: Option<Duration>,
) -> Result<Vec<Event>> {
    let mut collector = source.create_collector(spec).await?;
    let page = read_page(collector.as_mut(), timeout).await;
    release(collector.as_mut()).await;
    Ok(narrow(page?, host))
}

/// Fetch every available event matching `spec`, page by page.
///
/// Stops at the first empty page; the per-page `timeout` applies to each
/// read individually. Same filtering and collector discipline as
/// [`fetch_events`].
pub async fn fetch_all_events(
    source: &dyn EventSource,
    spec: &EventFilterSpec,
    host: Option<&str>,
    timeout: Option<Duration>,
) -> Result<Vec<Event>> {
    let mut collector = source.create_collector(spec).await?;
    let drained = drain(collector.as_mut(), timeout).await;
    release(collector.as_mut()).await;
    Ok(narrow(drained?, host))
}

async fn drain(
    collector: &mut dyn EventCollector,
    timeout: Option<Duration>,
) -> Result<Vec<Event>> {
    let mut events = Vec::new();
    loop {
        let page = read_page(collector, timeout).await?;
        if page.is_empty() {
            break;
        }
        debug!("read page of {} events", page.len());
        events.extend(page);
    }
    Ok(events)
}

async fn read_page(
    collector: &mut dyn EventCollector,
    timeout: Option<Duration>,
) -> Result<Vec<Event>> {
    match timeout {
        Some(limit) => match tokio::time::timeout(limit, collector.read_next(EVENT_PAGE_SIZE)).await
        {
            Ok(result) => result,
            Err(_) => Err(Error::PageRead(format!(
                "timed out after {}s waiting for event page",
                limit.as_secs()
            ))),
        },
        None => collector.read_next(EVENT_PAGE_SIZE).await,
    }
}

/// A failed destroy does not override the read outcome; the leak is logged
/// and the fetch result stands.
async fn release(collector: &mut dyn EventCollector) {
    if let Err(err) = collector.destroy().await {
        warn!("failed to destroy event collector: {err}");
    }
}

fn narrow(events: Vec<Event>, host: Option<&str>) -> Vec<Event> {
    let events = match host {
        Some(name) if !name.is_empty() => filter_by_host(events, name),
        _ => events,
    };
    filter_complete(events)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{complete_event, datastoreless_event, fixed_now, hostless_event};
    use crate::vim::types::ManagedObjectRef;
    use crate::vim::MockEventSource;

    async fn spec(source: &MockEventSource) -> EventFilterSpec {
        crate::events::query::build_filter_spec(
            source,
            ManagedObjectRef::new("Folder", "group-d1"),
            0,
        )
        .await
        .unwrap()
    }

    #[tokio::test]
    async fn incomplete_events_are_dropped_in_order() {
        let source = MockEventSource::new(fixed_now());
        source
            .push_page(vec![
                complete_event("VmCreatedEvent", "esx1", 1),
                hostless_event(2),
                complete_event("VmMigratedEvent", "esx1", 3),
            ])
            .await;
        let spec = spec(&source).await;

        let events = fetch_events(&source, &spec, None, None).await.unwrap();
        let keys: Vec<i32> = events.iter().map(|e| e.key).collect();
        assert_eq!(keys, vec![1, 3]);
    }

    #[tokio::test]
    async fn host_filter_applies_before_completeness() {
        let source = MockEventSource::new(fixed_now());
        source
            .push_page(vec![
                complete_event("VmCreatedEvent", "esx1", 1),
                complete_event("VmMigratedEvent", "esx2", 2),
                datastoreless_event("esx2", 3),
            ])
            .await;
        let spec = spec(&source).await;

        let events = fetch_events(&source, &spec, Some("esx2"), None)
            .await
            .unwrap();
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].key, 2);
    }

    #[tokio::test]
    async fn empty_host_name_skips_the_host_stage() {
        let source = MockEventSource::new(fixed_now());
        source
            .push_page(vec![complete_event("VmCreatedEvent", "esx1", 1)])
            .await;
        let spec = spec(&source).await;

        let events = fetch_events(&source, &spec, Some(""), None).await.unwrap();
        assert_eq!(events.len(), 1);
    }

    #[tokio::test]
    async fn collector_creation_failure_reads_nothing() {
        let mut source = MockEventSource::new(fixed_now());
        source.collector_error = Some("quota exceeded".to_string());
        let spec = EventFilterSpec::new(
            crate::vim::types::EventFilterSpecByEntity::new(
                ManagedObjectRef::new("Folder", "group-d1"),
                crate::vim::types::RecursionOption::All,
            ),
            vec!["VmCreatedEvent".to_string()],
        );

        let err = fetch_events(&source, &spec, None, None).await.unwrap_err();
        assert!(matches!(err, Error::CollectorCreation(_)));
        assert_eq!(source.get_read_count().await, 0);
        assert_eq!(source.get_destroy_count().await, 0);
    }

    #[tokio::test]
    async fn empty_page_is_a_valid_outcome() {
        let source = MockEventSource::new(fixed_now());
        let spec = spec(&source).await;

        let events = fetch_events(&source, &spec, None, None).await.unwrap();
        assert!(events.is_empty());
        assert_eq!(source.get_destroy_count().await, 1);
    }

    #[tokio::test]
    async fn collector_is_destroyed_when_page_read_fails() {
        let mut source = MockEventSource::new(fixed_now());
        source.page_error = Some("transport fault".to_string());
        let spec = spec(&source).await;

        let err = fetch_events(&source, &spec, None, None).await.unwrap_err();
        assert!(matches!(err, Error::PageRead(_)));
        assert_eq!(source.get_destroy_count().await, 1);
    }

    #[tokio::test]
    async fn fetch_reads_at_most_one_page() {
        let source = MockEventSource::new(fixed_now());
        source
            .push_page(vec![complete_event("VmCreatedEvent", "esx1", 1)])
            .await;
        source
            .push_page(vec![complete_event("VmMigratedEvent", "esx1", 2)])
            .await;
        let spec = spec(&source).await;

        let events = fetch_events(&source, &spec, None, None).await.unwrap();
        assert_eq!(events.len(), 1);
        assert_eq!(source.get_read_count().await, 1);
        assert_eq!(source.get_destroy_count().await, 1);
    }

    #[tokio::test]
    async fn drain_concatenates_pages_in_order() {
        let source = MockEventSource::new(fixed_now());
        source
            .push_page(vec![
                complete_event("VmCreatedEvent", "esx1", 1),
                complete_event("VmMigratedEvent", "esx1", 2),
            ])
            .await;
        source
            .push_page(vec![complete_event("VmRemovedEvent", "esx1", 3)])
            .await;
        let spec = spec(&source).await;

        let events = fetch_all_events(&source, &spec, None, None).await.unwrap();
        let keys: Vec<i32> = events.iter().map(|e| e.key).collect();
        assert_eq!(keys, vec![1, 2, 3]);
        // two pages plus the empty page that ends the drain
        assert_eq!(source.get_read_count().await, 3);
        assert_eq!(source.get_destroy_count().await, 1);
    }

    #[tokio::test]
    async fn page_read_timeout_still_destroys_the_collector() {
        let mut source = MockEventSource::new(fixed_now());
        source.read_delay = Some(Duration::from_secs(5));
        source
            .push_page(vec![complete_event("VmCreatedEvent", "esx1", 1)])
            .await;
        let spec = spec(&source).await;

        let err = fetch_events(&source, &spec, None, Some(Duration::from_millis(50)))
            .await
            .unwrap_err();
        match err {
            Error::PageRead(message) => assert!(message.contains("timed out")),
            other => panic!("expected PageRead, got {other:?}"),
        }
        assert_eq!(source.get_destroy_count().await, 1);
    }
}
