//! Data structures shared across xseedtui
//!
//! Organized by domain:
//! - **Inventory**: torrent snapshots as reported by the torrent client
//! - **Selection**: sort keys and the outcome of an interactive session
//! - **Display**: size and tracker formatting used by the table view

use serde::{Deserialize, Serialize};
use std::fmt;
use url::Url;

/// Bytes per gibibyte, the unit used for the size column
pub const BYTES_PER_GB: f64 = 1024.0 * 1024.0 * 1024.0;

/// Placeholder shown when a torrent has no tracker
pub const NO_TRACKER: &str = "-";

// =============================================================================
// Inventory Models
// =============================================================================

/// Immutable snapshot of one torrent known to the client
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TorrentRecord {
    /// Info hash, the primary key everywhere
    pub hash: String,
    /// Display name
    pub name: String,
    /// Total size in bytes
    pub size_bytes: u64,
    /// Current tracker URL, if the client reports one
    pub tracker: Option<String>,
    /// Client-side state (informational only)
    pub state: String,
}

impl TorrentRecord {
    /// Size formatted for the table, e.g. `1.00 GB`
    pub fn format_size(&self) -> String {
        format_size_gb(self.size_bytes)
    }

    /// Tracker hostname for display, `-` when there is no tracker
    pub fn tracker_display(&self) -> String {
        match self.tracker.as_deref() {
            Some(raw) if !raw.is_empty() => tracker_host(raw),
            _ => NO_TRACKER.to_string(),
        }
    }

    /// Tracker value used for sorting: hostname or raw string, empty when missing
    pub fn tracker_sort_key(&self) -> String {
        self.tracker
            .as_deref()
            .map(|raw| tracker_host(raw).to_lowercase())
            .unwrap_or_default()
    }
}

impl fmt::Display for TorrentRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} [{}] {}", self.name, self.format_size(), self.hash)
    }
}

/// Format a byte count as gibibytes with two decimals
pub fn format_size_gb(bytes: u64) -> String {
    format!("{:.2} GB", bytes as f64 / BYTES_PER_GB)
}

/// Extract the hostname from a tracker URL, falling back to the raw string
pub fn tracker_host(raw: &str) -> String {
    Url::parse(raw)
        .ok()
        .and_then(|url| url.host_str().filter(|h| !h.is_empty()).map(String::from))
        .unwrap_or_else(|| raw.to_string())
}

// =============================================================================
// Selection Models
// =============================================================================

/// Column a torrent list can be sorted by
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortKey {
    Name,
    Size,
    Tracker,
    Selected,
}

impl SortKey {
    /// All keys in table column order
    pub const ALL: [SortKey; 4] = [
        SortKey::Selected,
        SortKey::Name,
        SortKey::Size,
        SortKey::Tracker,
    ];

    /// Column header label
    pub fn label(&self) -> &'static str {
        match self {
            SortKey::Name => "Name",
            SortKey::Size => "Size",
            SortKey::Tracker => "Tracker",
            SortKey::Selected => "Sel",
        }
    }

    /// Keyboard shortcut that sorts by this key
    pub fn hotkey(&self) -> char {
        match self {
            SortKey::Name => '1',
            SortKey::Size => '2',
            SortKey::Tracker => '3',
            SortKey::Selected => '4',
        }
    }

    /// Resolve a keyboard shortcut back to a key
    pub fn from_hotkey(c: char) -> Option<Self> {
        SortKey::ALL.into_iter().find(|key| key.hotkey() == c)
    }
}

impl fmt::Display for SortKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

/// How an interactive session ended
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionOutcome {
    /// User confirmed a non-empty selection
    Confirmed(Vec<String>),
    /// User backed out without confirming
    Cancelled,
}

impl SessionOutcome {
    /// Hashes to dispatch (empty when cancelled)
    pub fn hashes(&self) -> &[String] {
        match self {
            SessionOutcome::Confirmed(hashes) => hashes,
            SessionOutcome::Cancelled => &[],
        }
    }

    pub fn is_cancelled(&self) -> bool {
        matches!(self, SessionOutcome::Cancelled)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
