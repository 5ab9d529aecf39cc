//! qBittorrent WebUI client tests
//!
//! Login handshake, session cookie reuse and inventory parsing.

use mockito::{Matcher, Server};
use xseedtui::api::{InventoryProvider, QbitClient, QbitError};
use xseedtui::cli::{ExitCode, Output};
use xseedtui::commands;
use xseedtui::config::QbitConfig;

fn login_body() -> Matcher {
    Matcher::AllOf(vec![
        Matcher::UrlEncoded("username".into(), "admin".into()),
        Matcher::UrlEncoded("password".into(), "adminadmin".into()),
    ])
}

fn quiet() -> Output {
    Output {
        json: false,
        quiet: true,
    }
}

// =============================================================================
// Login
// =============================================================================

#[tokio::test]
async fn test_login_then_fetch_uses_session_cookie() {
    let mut server = Server::new_async().await;

    let login = server
        .mock("POST", "/api/v2/auth/login")
        .match_body(login_body())
        .with_status(200)
        .with_header("set-cookie", "SID=s3ss10n; HttpOnly; path=/")
        .with_body("Ok.")
        .create_async()
        .await;

    let torrents = server
        .mock("GET", "/api/v2/torrents/info")
        .match_header("cookie", Matcher::Regex("SID=s3ss10n".into()))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(
            r#"[
                {"hash": "bbb", "name": "zeta.release", "size": 2147483648,
                 "tracker": "https://tracker.example.org:443/announce", "state": "uploading"},
                {"hash": "aaa", "name": "Alpha.Release", "size": 1073741824,
                 "tracker": "", "state": "pausedUP", "ratio": 1.5}
            ]"#,
        )
        .create_async()
        .await;

    let client = QbitClient::with_base_url(server.url());
    client.login("admin", "adminadmin").await.unwrap();
    let records = client.torrents().await.unwrap();

    login.assert_async().await;
    torrents.assert_async().await;

    // Sorted by name, case-insensitive
    assert_eq!(records.len(), 2);
    assert_eq!(records[0].hash, "aaa");
    assert_eq!(records[0].tracker, None);
    assert_eq!(records[0].format_size(), "1.00 GB");
    assert_eq!(records[1].hash, "bbb");
    assert_eq!(records[1].tracker_display(), "tracker.example.org");
    assert_eq!(records[1].state, "uploading");
}

#[tokio::test]
async fn test_login_bad_credentials() {
    let mut server = Server::new_async().await;
    let _mock = server
        .mock("POST", "/api/v2/auth/login")
        .with_status(200)
        .with_body("Fails.")
        .create_async()
        .await;

    let client = QbitClient::with_base_url(server.url());
    let err = client.login("admin", "wrong").await.unwrap_err();
    assert!(matches!(err, QbitError::LoginFailed));
}

#[tokio::test]
async fn test_login_banned() {
    let mut server = Server::new_async().await;
    let _mock = server
        .mock("POST", "/api/v2/auth/login")
        .with_status(403)
        .create_async()
        .await;

    let client = QbitClient::with_base_url(server.url());
    let err = client.login("admin", "adminadmin").await.unwrap_err();
    assert!(matches!(err, QbitError::Banned));
}

#[tokio::test]
async fn test_version() {
    let mut server = Server::new_async().await;
    let _mock = server
        .mock("GET", "/api/v2/app/version")
        .with_status(200)
        .with_body("v4.6.2\n")
        .create_async()
        .await;

    let client = QbitClient::with_base_url(server.url());
    assert_eq!(client.version().await.unwrap(), "v4.6.2");
}

// =============================================================================
// Inventory Errors
// =============================================================================

#[tokio::test]
async fn test_torrents_forbidden_without_login() {
    let mut server = Server::new_async().await;
    let _mock = server
        .mock("GET", "/api/v2/torrents/info")
        .with_status(403)
        .create_async()
        .await;

    let client = QbitClient::with_base_url(server.url());
    let err = client.fetch_torrents().await.unwrap_err();
    assert!(matches!(err, QbitError::Status(403)));
}

#[tokio::test]
async fn test_torrents_invalid_json() {
    let mut server = Server::new_async().await;
    let _mock = server
        .mock("GET", "/api/v2/torrents/info")
        .with_status(200)
        .with_body("<html>not json</html>")
        .create_async()
        .await;

    let client = QbitClient::with_base_url(server.url());
    let err = client.fetch_torrents().await.unwrap_err();
    assert!(matches!(err, QbitError::InvalidResponse(_)));
}

// =============================================================================
// Command Flow
// =============================================================================

#[tokio::test]
async fn test_connect_cmd_unreachable_is_connection_error() {
    let config = QbitConfig {
        // Port 9 (discard) is closed on test machines
        host: "127.0.0.1".into(),
        port: 9,
        ..QbitConfig::default()
    };

    let result = commands::connect_cmd(&config, &quiet()).await;
    assert!(matches!(result, Err(ExitCode::ConnectionError)));
}

#[tokio::test]
async fn test_connect_and_load_engine() {
    let mut server = Server::new_async().await;
    let _login = server
        .mock("POST", "/api/v2/auth/login")
        .with_status(200)
        .with_header("set-cookie", "SID=abc; path=/")
        .with_body("Ok.")
        .create_async()
        .await;
    let _version = server
        .mock("GET", "/api/v2/app/version")
        .with_status(200)
        .with_body("v5.0.0")
        .create_async()
        .await;
    let _torrents = server
        .mock("GET", "/api/v2/torrents/info")
        .with_status(200)
        .with_body(r#"[{"hash":"h1","name":"One","size":1,"tracker":"","state":"uploading"}]"#)
        .create_async()
        .await;

    let address = server.socket_address();
    let config = QbitConfig {
        host: address.ip().to_string(),
        port: address.port(),
        ..QbitConfig::default()
    };

    let client = commands::connect_cmd(&config, &quiet()).await.unwrap();
    let engine = commands::load_engine_cmd(&client, &quiet())
        .await
        .unwrap()
        .unwrap();
    assert_eq!(engine.total_len(), 1);
    assert_eq!(engine.records()[0].name, "One");
}
