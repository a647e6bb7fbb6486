//! Secondary event filters
//!
//! Both filters are order-preserving subsequence transforms, and retained
//! events keep their full record including the subtype discriminant.

use crate::vim::types::Event;

/// Keep only events whose originating host name equals `host`.
///
/// Events without a host argument never match. An empty result is a valid
/// outcome, not an error. Callers decide whether to run this stage at all;
/// an empty host name means "skip it", not "match hosts named ''".
pub fn filter_by_host(events: Vec<Event>, host: &str) -> Vec<Event> {
    events
        .into_iter()
        .filter(|event| event.host.as_ref().is_some_and(|h| h.name == host))
        .collect()
}

/// Keep only events that reference both a host and a datastore.
///
/// Downstream placement and capacity auditing needs the host+datastore
/// pair; events missing either are noise for that use case and are
/// dropped rather than reported as errors.
pub fn filter_complete(events: Vec<Event>) -> Vec<Event> {
    events
        .into_iter()
        .filter(|event| event.host.is_some() && event.ds.is_some())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{complete_event, datastoreless_event, hostless_event, vm_argument};

    #[test]
    fn completeness_keeps_only_host_and_datastore_pairs() {
        let events = vec![
            complete_event("VmCreatedEvent", "esx1", 1),
            hostless_event(2),
            complete_event("VmMigratedEvent", "esx1", 3),
            datastoreless_event("esx2", 4),
        ];

        let kept = filter_complete(events);
        let keys: Vec<i32> = kept.iter().map(|e| e.key).collect();
        assert_eq!(keys, vec![1, 3]);
        assert!(kept.iter().all(|e| e.host.is_some() && e.ds.is_some()));
    }

    #[test]
    fn completeness_is_idempotent() {
        let events = vec![
            complete_event("VmCreatedEvent", "esx1", 1),
            hostless_event(2),
            complete_event("VmRelocatedEvent", "esx3", 3),
        ];

        let once = filter_complete(events);
        let twice = filter_complete(once.clone());
        assert_eq!(once, twice);
    }

    #[test]
    fn completeness_of_empty_input_is_empty() {
        assert!(filter_complete(Vec::new()).is_empty());
    }

    #[test]
    fn host_filter_matches_exactly() {
        let events = vec![
            complete_event("VmCreatedEvent", "esx1", 1),
            complete_event("VmMigratedEvent", "esx2", 2),
            complete_event("VmRemovedEvent", "esx1", 3),
            complete_event("VmClonedEvent", "esx10", 4),
        ];

        let kept = filter_by_host(events, "esx1");
        let keys: Vec<i32> = kept.iter().map(|e| e.key).collect();
        assert_eq!(keys, vec![1, 3]);
        assert!(kept.iter().all(|e| e.host.as_ref().unwrap().name == "esx1"));
    }

    #[test]
    fn host_filter_without_match_returns_empty() {
        let events = vec![complete_event("VmCreatedEvent", "esx1", 1)];
        assert!(filter_by_host(events, "esx9").is_empty());
    }

    #[test]
    fn host_filter_ignores_hostless_events() {
        let events = vec![hostless_event(1), complete_event("VmCreatedEvent", "esx1", 2)];
        let kept = filter_by_host(events, "esx1");
        assert_eq!(kept.len(), 1);
        assert_eq!(kept[0].key, 2);
    }

    #[test]
    fn host_filter_keeps_the_full_event_record() {
        let mut event = complete_event("VmBeingClonedEvent", "esx1", 1);
        event.vm = Some(vm_argument("web-01"));

        let kept = filter_by_host(vec![event], "esx1");
        assert_eq!(kept[0].type_name, "VmBeingClonedEvent");
        assert_eq!(kept[0].vm.as_ref().unwrap().name, "web-01");
        assert!(kept[0].ds.is_some());
    }
}
