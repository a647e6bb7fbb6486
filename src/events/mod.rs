//! Event retrieval and filtering pipeline
//!
//! Query builder, fetcher, and the two secondary filters. The fetcher owns
//! the collector lifecycle; the filters are pure, order-preserving
//! transforms over one page of events.

pub mod fetch;
pub mod filter;
pub mod query;

pub use fetch::{fetch_all_events, fetch_events, EVENT_PAGE_SIZE};
pub use filter::{filter_by_host, filter_complete};
pub use query::{build_filter_spec, LIFECYCLE_EVENT_TYPES};
