//! Event presentation
//!
//! One line pair per event for operators, or a JSON dump for scripting.

use std::str::FromStr;

use crate::error::{Error, Result};
use crate::vim::types::Event;

/// ANSIC-style timestamp, locale independent.
const TIMESTAMP_FORMAT: &str = "%a %b %e %H:%M:%S %Y";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    #[default]
    Human,
    Json,
}

impl FromStr for OutputFormat {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "human" => Ok(Self::Human),
            "json" => Ok(Self::Json),
            other => Err(Error::Config(format!(
                "unknown output format: {other} (expected human or json)"
            ))),
        }
    }
}

pub fn print_events(events: &[Event]) {
    for event in events {
        print!("{}", render_event(event));
    }
}

pub fn print_events_json(events: &[Event]) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(events)?);
    Ok(())
}

/// `[<timestamp>] <message>`, then the host reference on its own line.
fn render_event(event: &Event) -> String {
    let mut out = format!(
        "[{}] {}\n",
        event.created_time.format(TIMESTAMP_FORMAT),
        event.full_formatted_message
    );
    if let Some(host) = &event.host {
        out.push_str(&format!("{host}\n"));
    }
    out
}
