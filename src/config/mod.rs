//! Configuration management
//!
//! Connection and query parameters come from three layers with fixed
//! precedence: CLI flags over environment variables over an optional TOML
//! config file. Credentials never travel on the command line.

pub mod loader;

pub use loader::{default_config_path, resolve, ConfigFile, Overrides};

use crate::output::OutputFormat;

/// Fully-resolved runtime configuration.
///
/// Everything the pipeline needs is threaded through this struct; nothing
/// downstream reads the environment.
#[derive(Debug, Clone)]
pub struct VcConfig {
    /// vCenter endpoint: hostname, IP, or full URL.
    pub endpoint: String,
    pub username: String,
    pub password: String,
    /// Accept self-signed TLS certificates.
    pub insecure: bool,
    /// Restrict to events newer than this many minutes; <= 0 means
    /// unbounded history.
    pub timelapse_minutes: i64,
    /// Only keep events originating from this host; `None` disables the
    /// host stage.
    pub host: Option<String>,
    /// Drain every collector page instead of just the first.
    pub fetch_all: bool,
    /// Per-page read timeout in seconds.
    pub timeout_secs: Option<u64>,
    pub output_format: OutputFormat,
}
