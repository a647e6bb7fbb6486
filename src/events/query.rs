//! Event query construction
//!
//! Builds the filter spec for one retrieval: full-inventory scope, the
//! lifecycle event allow-list, and an optional server-relative time bound.

use chrono::Duration;
use tracing::debug;

use crate::error::Result;
use crate::vim::types::{
    EventFilterSpec, EventFilterSpecByEntity, EventFilterSpecByTime, ManagedObjectRef,
    RecursionOption,
};
use crate::vim::EventSource;

/// Lifecycle event subtypes this tool cares about.
pub const LIFECYCLE_EVENT_TYPES: [&str; 6] = [
    "VmBeingCreatedEvent",
    "VmMigratedEvent",
    "VmCreatedEvent",
    "VmRemovedEvent",
    "VmBeingClonedEvent",
    "VmRelocatedEvent",
];

/// Build the filter spec for one event retrieval.
///
/// The scope is always the full inventory subtree under `root`. When
/// `timelapse_minutes` is positive, the begin bound is `timelapse_minutes`
/// before the server's current time; the server clock is authoritative, so
/// a skewed workstation clock cannot shift the window. Zero or negative
/// leaves history unbounded and the server clock is not consulted.
pub async fn build_filter_spec(
    source: &dyn EventSource,
    root: ManagedObjectRef,
    timelapse_minutes: i64,
) -> Result<EventFilterSpec> {
    let mut spec = EventFilterSpec::new(
        EventFilterSpecByEntity::new(root, RecursionOption::All),
        LIFECYCLE_EVENT_TYPES.iter().map(|s| s.to_string()).collect(),
    );

    if timelapse_minutes > 0 {
        let now = source.current_time().await?;
        let begin = now - Duration::minutes(timelapse_minutes);
        debug!("restricting events to [{begin}, {now}]");
        spec.time = Some(EventFilterSpecByTime::begin(begin));
    }

    Ok(spec)
}
