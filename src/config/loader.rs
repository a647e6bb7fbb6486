//! Configuration resolution
//!
//! Defaults, then `~/.config/vcevents/config.toml` (or `--config`), then
//! `VCENTER_*` environment variables, then CLI flags.

use std::path::{Path, PathBuf};

use anyhow::Context;
use serde::Deserialize;

use super::VcConfig;
use crate::error::{Error, Result};
use crate::output::OutputFormat;

/// Flag-level overrides collected by the CLI layer.
#[derive(Debug, Default, Clone)]
pub struct Overrides {
    pub endpoint: Option<String>,
    pub username: Option<String>,
    pub insecure: bool,
    pub timelapse_minutes: Option<i64>,
    pub host: Option<String>,
    pub fetch_all: bool,
    pub timeout_secs: Option<u64>,
    pub output_format: Option<String>,
    pub config_path: Option<PathBuf>,
}

/// On-disk configuration shape; every field optional.
#[derive(Debug, Default, Clone, Deserialize)]
pub struct ConfigFile {
    pub endpoint: Option<String>,
    pub username: Option<String>,
    pub password: Option<String>,
    pub insecure: Option<bool>,
    pub timelapse_minutes: Option<i64>,
    pub host: Option<String>,
}

pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("vcevents").join("config.toml"))
}

/// Resolve the effective configuration.
///
/// `env` is injected so tests stay hermetic; production passes
/// `|key| std::env::var(key).ok()`.
pub fn resolve(overrides: &Overrides, env: impl Fn(&str) -> Option<String>) -> Result<VcConfig> {
    let file = load_file(overrides.config_path.as_deref())?;

    let endpoint = overrides
        .endpoint
        .clone()
        .or_else(|| env("VCENTER_IP"))
        .or(file.endpoint)
        .ok_or_else(|| {
            Error::Config(
                "vCenter endpoint not set (use --endpoint, VCENTER_IP, or the config file)"
                    .to_string(),
            )
        })?;

    let username = overrides
        .username
        .clone()
        .or_else(|| env("VCENTER_USERNAME"))
        .or(file.username)
        .ok_or_else(|| {
            Error::Config(
                "vCenter username not set (use --username, VCENTER_USERNAME, or the config file)"
                    .to_string(),
            )
        })?;

    let password = env("VCENTER_PASSWORD").or(file.password).ok_or_else(|| {
        Error::Config(
            "vCenter password not set (use VCENTER_PASSWORD or the config file)".to_string(),
        )
    })?;

    let insecure = overrides.insecure
        || env("VCENTER_INSECURE").map(|v| truthy(&v)).unwrap_or(false)
        || file.insecure.unwrap_or(false);

    let timelapse_minutes = match overrides.timelapse_minutes {
        Some(minutes) => minutes,
        None => match env("VCENTER_TIMELAPSE") {
            Some(raw) => raw
                .parse()
                .map_err(|_| Error::Config(format!("invalid VCENTER_TIMELAPSE value: {raw}")))?,
            None => file.timelapse_minutes.unwrap_or(0),
        },
    };

    let host = normalize_host(
        overrides
            .host
            .clone()
            .or_else(|| env("VCENTER_HOST"))
            .or(file.host),
    );

    let output_format = match overrides.output_format.as_deref() {
        Some(raw) => raw.parse::<OutputFormat>()?,
        None => OutputFormat::Human,
    };

    Ok(VcConfig {
        endpoint,
        username,
        password,
        insecure,
        timelapse_minutes,
        host,
        fetch_all: overrides.fetch_all,
        timeout_secs: overrides.timeout_secs,
        output_format,
    })
}

fn load_file(explicit: Option<&Path>) -> Result<ConfigFile> {
    let path = match explicit {
        Some(path) => Some(path.to_path_buf()),
        None => default_config_path().filter(|p| p.exists()),
    };
    let Some(path) = path else {
        return Ok(ConfigFile::default());
    };

    let content = std::fs::read_to_string(&path)
        .with_context(|| format!("failed to read config file {}", path.display()))?;
    let file = toml::from_str(&content)
        .with_context(|| format!("failed to parse config file {}", path.display()))?;
    Ok(file)
}

/// Blank host names mean "no host filter", matching the original
/// environment-driven behavior where an empty string disables the stage.
fn normalize_host(host: Option<String>) -> Option<String> {
    host.filter(|name| !name.trim().is_empty())
}

fn truthy(value: &str) -> bool {
    matches!(value.trim().to_ascii_lowercase().as_str(), "1" | "true" | "yes")
}
