//! Integration tests for xseedtui
//!
//! Tests are organized by component:
//! - selection_test: Filter, sort and selection engine
//! - qbittorrent_test: qBittorrent WebUI client (mocked server)
//! - dispatch_test: cross-seed webhook and dispatch runner
//! - commands_test: Direct vs interactive routing and exit codes
//! - config_test: Config file loading
//! - cli_test: Argument handling and JSON report
//! - ui_test: Rendering and input against a TestBackend

// Note: Each test file is a separate integration test crate
// Tests are run individually by cargo, not via mod.rs
