use std::io::Write;
use std::net::TcpListener;
use std::path::Path;
use std::time::Duration;

use reqwest::Client;
use serde_json::json;
use tempfile::{NamedTempFile, TempDir};
use tokio::time::{sleep, timeout};

/// Find an available port
fn get_available_port() -> u16 {
    TcpListener::bind("127.0.0.1:0")
        .unwrap()
        .local_addr()
        .unwrap()
        .port()
}

/// A config that never reaches the real site: prefetch is off and the
/// listing source points at a closed local port.
fn minimal_config(port: u16, db_path: &Path) -> String {
    format!(
        r#"
[server]
host = "127.0.0.1"
port = {}

[database]
path = "{}"

[source]
base_url = "http://127.0.0.1:9"
timeout_secs = 2

[cache]
prefetch = false
"#,
        port,
        db_path.display()
    )
}

fn write_config(content: &str) -> NamedTempFile {
    let mut temp_file = NamedTempFile::new().unwrap();
    temp_file.write_all(content.as_bytes()).unwrap();
    temp_file.flush().unwrap();
    temp_file
}

/// Spawn the server and return a handle
async fn spawn_server(config_path: &Path) -> tokio::process::Child {
    tokio::process::Command::new(env!("CARGO_BIN_EXE_shelf"))
        .env("SHELF_CONFIG", config_path)
        .env("RUST_LOG", "error") // Quiet logs during tests
        .kill_on_drop(true)
        .spawn()
        .expect("Failed to spawn server")
}

/// Wait for server to be ready
async fn wait_for_server(port: u16, max_attempts: u32) -> bool {
    let client = Client::new();
    for _ in 0..max_attempts {
        if client
            .get(format!("http://127.0.0.1:{}/api/v1/health", port))
            .send()
            .await
            .is_ok()
        {
            return true;
        }
        sleep(Duration::from_millis(50)).await;
    }
    false
}

#[tokio::test]
async fn test_health_endpoint() {
    let port = get_available_port();
    let dir = TempDir::new().unwrap();
    let config = write_config(&minimal_config(port, &dir.path().join("shelf.db")));

    let mut server = spawn_server(config.path()).await;
    assert!(
        wait_for_server(port, 40).await,
        "Server did not start in time"
    );

    let response = Client::new()
        .get(format!("http://127.0.0.1:{}/api/v1/health", port))
        .send()
        .await
        .expect("Failed to send request");
    assert!(response.status().is_success());

    let json: serde_json::Value = response.json().await.expect("Failed to parse JSON");
    assert_eq!(json["status"], "ok");

    server.kill().await.ok();
}

#[tokio::test]
async fn test_memorized_books_persist_across_restart() {
    let dir = TempDir::new().unwrap();
    let db_path = dir.path().join("shelf.db");
    let client = Client::new();

    let port = get_available_port();
    let config = write_config(&minimal_config(port, &db_path));
    let mut server = spawn_server(config.path()).await;
    assert!(wait_for_server(port, 40).await, "Server did not start in time");

    let created = client
        .post(format!("http://127.0.0.1:{}/api/v1/memorized", port))
        .json(&json!({"title": "Title 1", "link": "https://x/1"}))
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(created.status().as_u16(), 201);
    server.kill().await.ok();
    let _ = server.wait().await;

    let port = get_available_port();
    let config = write_config(&minimal_config(port, &db_path));
    let mut server = spawn_server(config.path()).await;
    assert!(wait_for_server(port, 40).await, "Server did not restart in time");

    let json: serde_json::Value = client
        .get(format!("http://127.0.0.1:{}/api/v1/memorized", port))
        .send()
        .await
        .expect("Failed to send request")
        .json()
        .await
        .expect("Failed to parse JSON");
    assert_eq!(json["total"], 1);
    assert_eq!(json["books"][0]["title"], "Title 1");

    server.kill().await.ok();
}

#[tokio::test]
async fn test_unreachable_source_is_bad_gateway() {
    let port = get_available_port();
    let dir = TempDir::new().unwrap();
    let config = write_config(&minimal_config(port, &dir.path().join("shelf.db")));

    let mut server = spawn_server(config.path()).await;
    assert!(wait_for_server(port, 40).await, "Server did not start in time");

    let response = Client::new()
        .get(format!("http://127.0.0.1:{}/api/v1/popular", port))
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status().as_u16(), 502);

    server.kill().await.ok();
}

#[tokio::test]
async fn test_invalid_config_exits_with_error() {
    let config = write_config(
        r#"
[server]
port = 0
"#,
    );

    let result = timeout(
        Duration::from_secs(5),
        tokio::process::Command::new(env!("CARGO_BIN_EXE_shelf"))
            .env("SHELF_CONFIG", config.path())
            .env("RUST_LOG", "error")
            .output(),
    )
    .await
    .expect("Command timed out")
    .expect("Failed to execute command");

    assert!(!result.status.success());
}

#[tokio::test]
async fn test_malformed_config_exits_with_error() {
    let config = write_config("[server\nport = ");

    let result = timeout(
        Duration::from_secs(5),
        tokio::process::Command::new(env!("CARGO_BIN_EXE_shelf"))
            .env("SHELF_CONFIG", config.path())
            .env("RUST_LOG", "error")
            .output(),
    )
    .await
    .expect("Command timed out")
    .expect("Failed to execute command");

    assert!(!result.status.success());
}
