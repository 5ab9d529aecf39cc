//! xseedtui - pick qBittorrent torrents and trigger cross-seed searches
//!
//! Lists the torrents known to qBittorrent in a terminal table, lets the
//! user filter, sort and select them, then asks a cross-seed daemon to
//! search for each selected torrent.
//!
//! # Modules
//!
//! - `models` - Torrent records, sort keys, session outcome
//! - `selection` - Filter/sort/selection engine (no I/O)
//! - `dispatch` - Sequential trigger runner with per-call timeout
//! - `api` - qBittorrent and cross-seed HTTP clients
//! - `config` - Layered configuration (defaults, TOML, environment)
//! - `logging` - tracing subscriber setup
//! - `cli` - Argument parsing, exit codes, output helpers
//! - `commands` - Connect, load and dispatch steps used by the binary
//! - `app` - Key/mouse handling for the picker
//! - `ui` - ratatui rendering

pub mod api;
pub mod app;
pub mod cli;
pub mod commands;
pub mod config;
pub mod dispatch;
pub mod logging;
pub mod models;
pub mod selection;
pub mod ui;

// Re-export commonly used types
pub use models::{SessionOutcome, SortKey, TorrentRecord};
pub use selection::{SelectionEngine, SelectionError, SelectionStatus};
pub use dispatch::{DispatchReport, Dispatcher, ItemOutcome, ItemStatus, Trigger, TriggerRequest};

pub use api::{CrossSeedClient, InventoryProvider, QbitClient, QbitError, TriggerError};
pub use app::App;
pub use config::{Config, ConfigError};
