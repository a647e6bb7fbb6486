use clap::Parser;
use std::path::PathBuf;
use std::time::Duration;
use tracing::{debug, error, warn};

use vcevents::config::{self, Overrides, VcConfig};
use vcevents::events::{build_filter_spec, fetch_all_events, fetch_events};
use vcevents::output::{print_events, print_events_json, OutputFormat};
use vcevents::vim::types::Event;
use vcevents::vim::RestClient;

/// Fetch and filter VM lifecycle events from a vCenter server
#[derive(Parser)]
#[command(name = "vcevents")]
#[command(about = "Fetch and filter VM lifecycle events from a vCenter server", long_about = None)]
struct Cli {
    /// Enable verbose output (-v for debug, -vv for trace, -vvv for all)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Only show events from the last N minutes (default: 0 = unbounded history)
    #[arg(short = 't', long)]
    timelapse: Option<i64>,

    /// Only show events originating from this ESXi host
    #[arg(long)]
    host: Option<String>,

    /// Drain every event page instead of the first 100 events
    #[arg(long)]
    all: bool,

    /// Per-page read timeout in seconds
    #[arg(long)]
    timeout: Option<u64>,

    /// Output format (human, json)
    #[arg(long, default_value = "human")]
    output_format: String,

    /// Path to configuration file
    #[arg(short = 'c', long)]
    config: Option<PathBuf>,

    /// vCenter endpoint (hostname, IP, or full URL)
    #[arg(long)]
    endpoint: Option<String>,

    /// vCenter user name
    #[arg(long)]
    username: Option<String>,

    /// Accept self-signed TLS certificates
    #[arg(short = 'k', long)]
    insecure: bool,
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let log_level = match cli.verbose {
        0 => "info",
        1 => "debug",
        2 => "trace",
        _ => "trace,hyper=debug,reqwest=debug", // -vvv shows everything including dependencies
    };

    tracing_subscriber::fmt()
        .with_env_filter(log_level)
        .with_writer(std::io::stderr) // keep stdout clean for the event dump
        .with_target(cli.verbose >= 2)
        .with_line_number(cli.verbose >= 3)
        .init();

    debug!("vcevents started with verbosity level: {}", cli.verbose);

    if let Err(e) = run(cli).await {
        error!("Fatal error: {}", e);
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    let overrides = Overrides {
        endpoint: cli.endpoint,
        username: cli.username,
        insecure: cli.insecure,
        timelapse_minutes: cli.timelapse,
        host: cli.host,
        fetch_all: cli.all,
        timeout_secs: cli.timeout,
        output_format: Some(cli.output_format),
        config_path: cli.config,
    };
    let config = config::resolve(&overrides, |key| std::env::var(key).ok())?;

    let client = RestClient::connect(&config).await?;
    let outcome = retrieve(&client, &config).await;
    if let Err(err) = client.logout().await {
        warn!("failed to log out of vCenter session: {err}");
    }
    let events = outcome?;

    debug!("retrieved {} events", events.len());
    match config.output_format {
        OutputFormat::Human => print_events(&events),
        OutputFormat::Json => print_events_json(&events)?,
    }
    Ok(())
}

async fn retrieve(client: &RestClient, config: &VcConfig) -> vcevents::error::Result<Vec<Event>> {
    let spec =
        build_filter_spec(client, client.root_folder().clone(), config.timelapse_minutes).await?;
    let timeout = config.timeout_secs.map(Duration::from_secs);
    let host = config.host.as_deref();

    if config.fetch_all {
        fetch_all_events(client, &spec, host, timeout).await
    } else {
        fetch_events(client, &spec, host, timeout).await
    }
}
