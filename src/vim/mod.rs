//! Abstraction layer over the vCenter event API
//!
//! The core pipeline only sees the [`EventSource`] and [`EventCollector`]
//! traits; production wires in the vim25 JSON REST client, tests wire in
//! the scripted mock.

pub mod mock;
pub mod rest;
pub mod source;
pub mod types;

pub use mock::{MockEventCollector, MockEventSource};
pub use rest::RestClient;
pub use source::{EventCollector, EventSource};
