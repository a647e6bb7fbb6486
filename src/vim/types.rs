//! Wire types for the vim25 event API
//!
//! Shapes follow the vim25 JSON bindings (vSphere 8.0+): camelCase member
//! names and a `_typeName` discriminant on every data object.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

fn moref_discriminant() -> String {
    "ManagedObjectReference".to_string()
}

/// Reference to a server-side managed object.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ManagedObjectRef {
    #[serde(rename = "_typeName", default = "moref_discriminant")]
    pub type_name: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub value: String,
}

impl ManagedObjectRef {
    pub fn new(kind: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            type_name: moref_discriminant(),
            kind: kind.into(),
            value: value.into(),
        }
    }
}

impl fmt::Display for ManagedObjectRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.kind, self.value)
    }
}

/// Host argument attached to an event (`HostEventArgument` on the wire).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HostArgument {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub host: Option<ManagedObjectRef>,
}

impl fmt::Display for HostArgument {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.host {
            Some(moref) => write!(f, "{} ({})", self.name, moref),
            None => write!(f, "{}", self.name),
        }
    }
}

/// Datastore argument attached to an event (`DatastoreEventArgument`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DatastoreArgument {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub datastore: Option<ManagedObjectRef>,
}

/// Virtual machine argument attached to an event (`VmEventArgument`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VmArgument {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub vm: Option<ManagedObjectRef>,
}

/// A single event record.
///
/// One concrete struct carries the field superset shared by the lifecycle
/// event subtypes; `type_name` keeps the concrete subtype, so filters pass
/// full records through and never narrow an event to a base view.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Event {
    #[serde(rename = "_typeName")]
    pub type_name: String,
    #[serde(default)]
    pub key: i32,
    pub created_time: DateTime<Utc>,
    #[serde(default)]
    pub user_name: String,
    #[serde(default)]
    pub full_formatted_message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub host: Option<HostArgument>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ds: Option<DatastoreArgument>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub vm: Option<VmArgument>,
}

/// Recursion scope for an entity-bound event query.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum RecursionOption {
    #[serde(rename = "self")]
    SelfOnly,
    Children,
    All,
}

/// Entity scope of an event query: a subtree of the managed inventory.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EventFilterSpecByEntity {
    #[serde(rename = "_typeName")]
    pub type_name: String,
    pub entity: ManagedObjectRef,
    pub recursion: RecursionOption,
}

impl EventFilterSpecByEntity {
    pub fn new(entity: ManagedObjectRef, recursion: RecursionOption) -> Self {
        Self {
            type_name: "EventFilterSpecByEntity".to_string(),
            entity,
            recursion,
        }
    }
}

/// Time bounds of an event query.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EventFilterSpecByTime {
    #[serde(rename = "_typeName")]
    pub type_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub begin_time: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub end_time: Option<DateTime<Utc>>,
}

impl EventFilterSpecByTime {
    /// Lower bound only; the upper bound stays open.
    pub fn begin(begin_time: DateTime<Utc>) -> Self {
        Self {
            type_name: "EventFilterSpecByTime".to_string(),
            begin_time: Some(begin_time),
            end_time: None,
        }
    }
}

/// Query descriptor handed to `CreateCollectorForEvents`.
///
/// Constructed fresh per retrieval and never mutated after it reaches the
/// server.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EventFilterSpec {
    #[serde(rename = "_typeName")]
    pub type_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub entity: Option<EventFilterSpecByEntity>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub event_type_id: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub time: Option<EventFilterSpecByTime>,
}

impl EventFilterSpec {
    pub fn new(entity: EventFilterSpecByEntity, event_type_id: Vec<String>) -> Self {
        Self {
            type_name: "EventFilterSpec".to_string(),
            entity: Some(entity),
            event_type_id,
            time: None,
        }
    }
}

/// The slice of `ServiceContent` this tool needs.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ServiceContent {
    pub root_folder: ManagedObjectRef,
    #[serde(default)]
    pub event_manager: Option<ManagedObjectRef>,
    pub about: AboutInfo,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AboutInfo {
    pub full_name: String,
    #[serde(default)]
    pub version: String,
}
