//! # vcevents
//!
//! A small Rust CLI tool that retrieves VM lifecycle events from a vCenter
//! server and filters them by time window and originating host.
//!
//! ## Usage
//!
//! ```bash
//! vcevents [--timelapse N] [--host NAME] [--all] [--output-format human|json]
//! ```
//!
//! ## Modules
//!
//! - `vim` - Trait-based abstraction over the vCenter event API (REST client + mock)
//! - `events` - Core pipeline: query builder, event fetcher, host and completeness filters
//! - `config` - Configuration resolution from file, environment and CLI flags
//! - `output` - Human-readable and JSON presenters
//! - `error` - Crate-wide error taxonomy
//! - `testing` - Event fixtures shared by unit and integration tests
pub mod config;
pub mod error;
pub mod events;
pub mod output;
pub mod vim;

pub mod testing;
