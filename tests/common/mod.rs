//! Shared utilities for integration tests.

use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use tokio::net::TcpListener;
use update_server::config::ConfigStore;
use update_server::http::UpdateServer;
use update_server::lifecycle::Shutdown;

/// Three releases for linux plus a macOS-only preview.
///
/// - 1.1.0: open to everyone (linux, windows)
/// - 1.2.0: 100% rollout (linux)
/// - 1.3.0: customer `acme` or region `eu-west` only (linux)
/// - 2.0.0-beta.1: 0% rollout, customer `acme` (darwin)
#[allow(dead_code)]
pub const FIXTURE: &str = r#"
server:
  port: 0
  watch: false
releases:
  - version: 1.1.0
    notes: Stability fixes
    pub_date: "2025-01-10T09:00:00Z"
    platforms:
      linux-x86_64:
        url: https://downloads.example.com/1.1.0/app-linux.tar.gz
        signature: sig-linux-110
      windows-x86_64:
        url: https://downloads.example.com/1.1.0/app-setup.exe
        signature: sig-win-110
  - version: 1.2.0
    notes: New sync engine
    pub_date: "2025-02-10T09:00:00Z"
    platforms:
      linux-x86_64:
        url: https://downloads.example.com/1.2.0/app-linux.tar.gz
        signature: sig-linux-120
    rollout:
      percentage: 100
  - version: 1.3.0
    notes: Early access
    pub_date: "2025-03-10T09:00:00Z"
    platforms:
      linux-x86_64:
        url: https://downloads.example.com/1.3.0/app-linux.tar.gz
        signature: sig-linux-130
    rollout:
      customers: [acme]
      regions: [eu-west]
  - version: 2.0.0-beta.1
    notes: Preview
    pub_date: "2025-04-10T09:00:00Z"
    platforms:
      darwin-aarch64:
        url: https://downloads.example.com/2.0.0-beta.1/app.app.tar.gz
        signature: sig-mac-200b1
    rollout:
      customers: [acme]
      percentage: 0
"#;

/// Write `content` to `config.yaml` inside a fresh temp dir.
pub fn write_config(content: &str) -> (tempfile::TempDir, PathBuf) {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("config.yaml");
    std::fs::write(&path, content).unwrap();
    (dir, path)
}

/// Serve `store` on an ephemeral port. Returns the bound address.
pub async fn start_server(store: Arc<ConfigStore>, shutdown: &Shutdown) -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let server = UpdateServer::new(store);
    let server_shutdown = shutdown.subscribe();

    tokio::spawn(async move {
        let _ = server.run(listener, server_shutdown).await;
    });

    tokio::time::sleep(Duration::from_millis(100)).await;
    addr
}

/// A client that never pools connections, so shutdown is not held up.
pub fn client() -> reqwest::Client {
    reqwest::Client::builder()
        .pool_max_idle_per_host(0)
        .no_proxy()
        .build()
        .unwrap()
}

/// Poll `check` every 50ms until it holds or `timeout` expires.
#[allow(dead_code)]
pub async fn eventually<F: Fn() -> bool>(timeout: Duration, check: F) -> bool {
    let deadline = tokio::time::Instant::now() + timeout;
    while tokio::time::Instant::now() < deadline {
        if check() {
            return true;
        }
        tokio::time::sleep(Duration::from_millis(50)).await;
    }
    check()
}
