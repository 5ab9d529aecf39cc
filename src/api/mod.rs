//! API clients for external services
//!
//! - qBittorrent: torrent inventory via the WebUI API
//! - cross-seed: webhook that triggers a search for one info hash

pub mod cross_seed;
pub mod qbittorrent;

pub use cross_seed::{CrossSeedClient, TriggerError};
pub use qbittorrent::{InventoryProvider, QbitClient, QbitError};
