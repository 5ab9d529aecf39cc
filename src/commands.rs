//! Command Handlers
//!
//! The steps main.rs strings together: connect to qBittorrent, build the
//! selection engine from its inventory, and dispatch triggers. Each handler
//! prints through `Output` and maps failures to an `ExitCode`.

use std::future::Future;

use crate::api::{CrossSeedClient, InventoryProvider, QbitClient};
use crate::cli::{Cli, ExitCode, Output};
use crate::config::{Config, QbitConfig};
use crate::dispatch::{DispatchReport, Dispatcher, ItemStatus, Trigger};
use crate::models::SessionOutcome;
use crate::selection::SelectionEngine;

// =============================================================================
// Mode Routing
// =============================================================================

/// Run direct or interactive mode and return the process exit code
///
/// `connect` is only awaited in interactive mode; `session` runs the picker
/// over the loaded inventory.
pub async fn run_cmd<C, Fut, P, T, S>(
    cli: &Cli,
    connect: C,
    dispatcher: &Dispatcher<T>,
    session: S,
    output: &Output,
) -> ExitCode
where
    C: FnOnce() -> Fut,
    Fut: Future<Output = Result<P, ExitCode>>,
    P: InventoryProvider,
    T: Trigger,
    S: FnOnce(SelectionEngine) -> anyhow::Result<SessionOutcome>,
{
    if !cli.is_interactive() {
        let hashes = normalize_hashes(&cli.info_hash);
        if hashes.is_empty() {
            return output.error("No info hashes given", ExitCode::InvalidInput);
        }
        tracing::info!(count = hashes.len(), "Triggering hashes from command line");
        return dispatch_cmd(dispatcher, &hashes, output).await;
    }

    let provider = match connect().await {
        Ok(provider) => provider,
        Err(code) => return code,
    };
    let engine = match load_engine_cmd(&provider, output).await {
        Ok(Some(engine)) => engine,
        Ok(None) => return ExitCode::Success,
        Err(code) => return code,
    };

    match session(engine) {
        Ok(SessionOutcome::Cancelled) => {
            output.info("No torrents selected");
            ExitCode::Success
        }
        Ok(SessionOutcome::Confirmed(hashes)) => {
            output.info(format!("Selected {} torrents", hashes.len()));
            dispatch_cmd(dispatcher, &hashes, output).await
        }
        Err(e) => {
            tracing::error!(error = %e, "Terminal failure");
            output.error(format!("Terminal error: {}", e), ExitCode::Error)
        }
    }
}

// =============================================================================
// Inventory
// =============================================================================

/// Log in to qBittorrent and report its version
pub async fn connect_cmd(config: &QbitConfig, output: &Output) -> Result<QbitClient, ExitCode> {
    output.info("Connecting to qBittorrent...");

    let client = match QbitClient::connect(config).await {
        Ok(client) => client,
        Err(e) => {
            tracing::error!(url = %config.base_url(), error = %e, "Failed to connect to qBittorrent");
            return Err(output.error(
                format!("Failed to connect to qBittorrent at {}: {}", config.base_url(), e),
                ExitCode::ConnectionError,
            ));
        }
    };

    match client.version().await {
        Ok(version) => {
            tracing::info!(%version, "Connected to qBittorrent");
            output.info(format!("Connected to qBittorrent {}", version));
        }
        // Version is informational only
        Err(e) => tracing::warn!(error = %e, "Could not read qBittorrent version"),
    }

    Ok(client)
}

/// Fetch the inventory and build a selection engine over it
///
/// `Ok(None)` means qBittorrent has no torrents, which is not an error.
pub async fn load_engine_cmd<P: InventoryProvider>(
    provider: &P,
    output: &Output,
) -> Result<Option<SelectionEngine>, ExitCode> {
    let records = match provider.torrents().await {
        Ok(records) => records,
        Err(e) => {
            tracing::error!(error = %e, "Failed to fetch torrents");
            return Err(output.error(
                format!("Failed to fetch torrents: {}", e),
                ExitCode::ConnectionError,
            ));
        }
    };

    if records.is_empty() {
        tracing::info!("No torrents found in qBittorrent");
        output.info("No torrents found in qBittorrent");
        return Ok(None);
    }

    output.info(format!("Found {} torrents", records.len()));

    match SelectionEngine::with_records(records) {
        Ok(engine) => Ok(Some(engine)),
        Err(e) => {
            tracing::error!(error = %e, "Rejected torrent inventory");
            Err(output.error(
                format!("Invalid torrent inventory: {}", e),
                ExitCode::InvalidInput,
            ))
        }
    }
}

// =============================================================================
// Dispatch
// =============================================================================

/// Trim, drop blanks and repeats, keep first-seen order
pub fn normalize_hashes<S: AsRef<str>>(hashes: &[S]) -> Vec<String> {
    let mut seen = std::collections::HashSet::new();
    hashes
        .iter()
        .map(|h| h.as_ref().trim())
        .filter(|h| !h.is_empty())
        .filter(|h| seen.insert(h.to_string()))
        .map(str::to_string)
        .collect()
}

/// Dispatcher over the configured cross-seed daemon
pub fn cross_seed_dispatcher(
    config: &Config,
    include_single_episodes: bool,
) -> Dispatcher<CrossSeedClient> {
    let client = CrossSeedClient::new(&config.cross_seed);
    tracing::debug!(url = %client.webhook_url(), "Using cross-seed webhook");
    Dispatcher::new(client, include_single_episodes)
}

/// Run a dispatcher over `hashes`, printing progress and a summary
///
/// Per-item failures are reported but never change the exit code.
pub async fn dispatch_cmd<T: Trigger>(
    dispatcher: &Dispatcher<T>,
    hashes: &[String],
    output: &Output,
) -> ExitCode {
    let report = dispatcher
        .run_with_progress(
            hashes,
            |hash| output.info(format!("\nTriggering cross-seed for: {}", hash)),
            |item| match &item.status {
                ItemStatus::Success => output.info("✓ Success"),
                ItemStatus::Failed { reason } => output.info(format!("✗ Failed: {}", reason)),
            },
        )
        .await;

    print_summary(&report, output)
}

fn print_summary(report: &DispatchReport, output: &Output) -> ExitCode {
    if output.json {
        if let Err(e) = output.print_json(report) {
            return output.error(format!("Failed to serialize: {}", e), ExitCode::Error);
        }
        return ExitCode::Success;
    }

    output.info("\nSummary:");
    output.info(format!("Successful: {}", report.succeeded));
    if report.failed > 0 {
        output.info(format!("Failed: {}", report.failed));
    }
    ExitCode::Success
}
