//! Testing utilities and fixtures
//!
//! Event constructors shared by the unit tests and the integration suite.

use chrono::{DateTime, TimeZone, Utc};

use crate::vim::types::{DatastoreArgument, Event, HostArgument, ManagedObjectRef, VmArgument};

/// Fixed reference instant for deterministic tests (a Friday noon, UTC).
pub fn fixed_now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 5, 17, 12, 0, 0).unwrap()
}

pub fn host_argument(name: &str) -> HostArgument {
    HostArgument {
        name: name.to_string(),
        host: Some(ManagedObjectRef::new("HostSystem", format!("host-{name}"))),
    }
}

pub fn datastore_argument(name: &str) -> DatastoreArgument {
    DatastoreArgument {
        name: name.to_string(),
        datastore: Some(ManagedObjectRef::new("Datastore", format!("datastore-{name}"))),
    }
}

pub fn vm_argument(name: &str) -> VmArgument {
    VmArgument {
        name: name.to_string(),
        vm: Some(ManagedObjectRef::new("VirtualMachine", format!("vm-{name}"))),
    }
}

fn base_event(type_name: &str, key: i32) -> Event {
    Event {
        type_name: type_name.to_string(),
        key,
        created_time: fixed_now(),
        user_name: "administrator@vsphere.local".to_string(),
        full_formatted_message: format!("{type_name} #{key}"),
        host: None,
        ds: None,
        vm: None,
    }
}

/// Event with both a host and a datastore argument.
pub fn complete_event(type_name: &str, host: &str, key: i32) -> Event {
    let mut event = base_event(type_name, key);
    event.host = Some(host_argument(host));
    event.ds = Some(datastore_argument("ds1"));
    event
}

/// Event missing its host argument.
pub fn hostless_event(key: i32) -> Event {
    let mut event = base_event("VmCreatedEvent", key);
    event.ds = Some(datastore_argument("ds1"));
    event
}

/// Event with a host but no datastore argument.
pub fn datastoreless_event(host: &str, key: i32) -> Event {
    let mut event = base_event("VmRemovedEvent", key);
    event.host = Some(host_argument(host));
    event
}
