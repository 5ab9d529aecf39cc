//! CLI - Command Line Interface for xseedtui
//!
//! Without arguments the torrent picker opens; with `--info-hash` the
//! given torrents are sent to cross-seed directly.
//!
//! # Examples
//!
//! ```bash
//! # Pick torrents interactively
//! xseedtui
//!
//! # Trigger specific torrents, skipping single episodes
//! xseedtui -i 3b245504cf5f11bbdbe1201cea6a6bf45aee1bc0 --no-single-episodes
//!
//! # Machine-readable report
//! xseedtui -i HASH1 HASH2 --json
//! ```

use clap::Parser;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

// =============================================================================
// Exit Codes
// =============================================================================

/// Exit codes for CLI operations (semantic for scripting)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(i32)]
pub enum ExitCode {
    /// Success, including a cancelled session and per-item trigger failures
    Success = 0,
    /// General error
    Error = 1,
    /// Configuration missing or invalid
    ConfigError = 2,
    /// qBittorrent unreachable or login refused
    ConnectionError = 3,
    /// Inventory rejected (duplicate or empty hashes)
    InvalidInput = 4,
}

impl From<ExitCode> for i32 {
    fn from(code: ExitCode) -> i32 {
        code as i32
    }
}

impl From<ExitCode> for std::process::ExitCode {
    fn from(code: ExitCode) -> std::process::ExitCode {
        std::process::ExitCode::from(code as u8)
    }
}

// =============================================================================
// Main CLI Structure
// =============================================================================

/// Pick torrents from qBittorrent and ask cross-seed to search for them
#[derive(Parser, Debug)]
#[command(
    name = "xseedtui",
    version,
    about = "Interactive cross-seed trigger for qBittorrent",
    long_about = "Lists the torrents in qBittorrent, lets you filter, sort and \
                  select them, then triggers a cross-seed search for each \
                  selected torrent.\n\n\
                  Run without arguments to open the picker.\n\
                  Pass --info-hash to skip the picker.",
    after_help = "ENVIRONMENT:\n\
                  CROSS_SEED_API_KEY (required), CROSS_SEED_HOST, CROSS_SEED_PORT,\n\
                  QBIT_HOST, QBIT_PORT, QBIT_USERNAME, QBIT_PASSWORD, CROSS_SEED_LOG_DIR"
)]
pub struct Cli {
    /// Info hash(es) to trigger directly (skips the picker)
    #[arg(long = "info-hash", short = 'i', num_args = 1.., value_name = "HASH")]
    pub info_hash: Vec<String>,

    /// Do not include single episodes in the search
    #[arg(long)]
    pub no_single_episodes: bool,

    /// Enable debug logging
    #[arg(long, short = 'v')]
    pub verbose: bool,

    /// Print the dispatch report as JSON
    #[arg(long, short = 'j')]
    pub json: bool,

    /// Suppress non-essential output
    #[arg(long, short = 'q')]
    pub quiet: bool,

    /// Path to config file
    #[arg(long, short = 'c', value_name = "PATH")]
    pub config: Option<PathBuf>,
}

impl Cli {
    /// Check if the picker should open (no hashes given)
    pub fn is_interactive(&self) -> bool {
        self.info_hash.is_empty()
    }

    pub fn include_single_episodes(&self) -> bool {
        !self.no_single_episodes
    }
}

// =============================================================================
// JSON Output Types
// =============================================================================

/// Generic JSON output wrapper with status
#[derive(Debug, Serialize, Deserialize)]
pub struct JsonOutput<T: Serialize> {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(skip_serializing_if = "is_zero")]
    pub exit_code: i32,
}

fn is_zero(n: &i32) -> bool {
    *n == 0
}

impl<T: Serialize> JsonOutput<T> {
    pub fn success(data: T) -> Self {
        Self {
            data: Some(data),
            error: None,
            exit_code: 0,
        }
    }
}

impl JsonOutput<()> {
    pub fn error_msg(msg: impl Into<String>, code: ExitCode) -> Self {
        Self {
            data: None,
            error: Some(msg.into()),
            exit_code: code.into(),
        }
    }
}

// =============================================================================
// Output Helpers
// =============================================================================

/// Output handler for consistent formatting
#[derive(Debug, Clone, Copy, Default)]
pub struct Output {
    pub json: bool,
    pub quiet: bool,
}

impl Output {
    pub fn new(cli: &Cli) -> Self {
        Self {
            json: cli.json,
            quiet: cli.quiet,
        }
    }

    /// Print a JSON success envelope on stdout
    pub fn print_json<T: Serialize>(&self, data: T) -> anyhow::Result<()> {
        println!("{}", serde_json::to_string_pretty(&JsonOutput::success(data))?);
        Ok(())
    }

    /// Print error and return exit code
    pub fn error(&self, msg: impl Into<String>, code: ExitCode) -> ExitCode {
        let msg = msg.into();
        if self.json {
            let output = JsonOutput::error_msg(&msg, code);
            if let Ok(json) = serde_json::to_string_pretty(&output) {
                eprintln!("{}", json);
            }
        } else {
            eprintln!("Error: {}", msg);
        }
        code
    }

    /// Print progress line on stdout (suppressed in quiet and JSON mode)
    pub fn info(&self, msg: impl std::fmt::Display) {
        if !self.quiet && !self.json {
            println!("{}", msg);
        }
    }
}

// =============================================================================
// Tests
// =============================================================================
