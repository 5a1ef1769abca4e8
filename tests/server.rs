//! End-to-end tests over a real listener.
//!
//! Each test binds an ephemeral port, runs the serve loop in a background
//! task against a scratch directory, and talks plain HTTP/1.1 over TCP so
//! the asserted bytes are exactly what a client would see.

use nocached::config::{AppState, Config, LoggingConfig, ServeConfig, ServerConfig};
use nocached::http::cache::format_http_date;
use nocached::server;
use std::net::SocketAddr;
use std::path::Path;
use std::sync::Arc;
use std::time::{Duration, SystemTime};
use tempfile::TempDir;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpStream;

fn test_config(root: &Path) -> Config {
    Config {
        server: ServerConfig {
            host: "127.0.0.1".to_string(),
            port: 0,
            workers: None,
        },
        serve: ServeConfig {
            root: root.to_string_lossy().into_owned(),
            index_files: vec!["index.html".to_string(), "index.htm".to_string()],
        },
        logging: LoggingConfig { access_log: false },
    }
}

/// Bind an ephemeral port, spawn the serve loop, return the bound address.
async fn start_server(root: &Path) -> SocketAddr {
    let cfg = test_config(root);
    let listener = server::bind_listener(cfg.socket_addr().unwrap()).unwrap();
    let addr = listener.local_addr().unwrap();
    let state = Arc::new(AppState::new(cfg).unwrap());
    tokio::spawn(async move {
        let _ = server::run(listener, state).await;
    });
    addr
}

/// Issue one request and parse the response into (status, headers, body).
/// Header names are lowercased; duplicates are kept.
async fn request(
    addr: SocketAddr,
    method: &str,
    target: &str,
    extra_headers: &[(&str, &str)],
) -> (u16, Vec<(String, String)>, String) {
    let mut stream = TcpStream::connect(addr).await.unwrap();
    let mut req = format!("{method} {target} HTTP/1.1\r\nHost: {addr}\r\nConnection: close\r\n");
    for (name, value) in extra_headers {
        req.push_str(&format!("{name}: {value}\r\n"));
    }
    req.push_str("\r\n");
    stream.write_all(req.as_bytes()).await.unwrap();

    let mut raw = Vec::new();
    stream.read_to_end(&mut raw).await.unwrap();
    let text = String::from_utf8_lossy(&raw).into_owned();
    let (head, body) = text.split_once("\r\n\r\n").unwrap();

    let mut lines = head.lines();
    let status = lines
        .next()
        .unwrap()
        .split_whitespace()
        .nth(1)
        .unwrap()
        .parse()
        .unwrap();
    let headers = lines
        .map(|line| {
            let (name, value) = line.split_once(": ").unwrap();
            (name.to_ascii_lowercase(), value.to_string())
        })
        .collect();

    (status, headers, body.to_string())
}

fn header_values<'a>(headers: &'a [(String, String)], name: &str) -> Vec<&'a str> {
    headers
        .iter()
        .filter(|(n, _)| n == name)
        .map(|(_, v)| v.as_str())
        .collect()
}

/// The three no-cache headers must be present exactly once each.
fn assert_no_cache_headers(headers: &[(String, String)]) {
    assert_eq!(
        header_values(headers, "cache-control"),
        ["no-cache, no-store, must-revalidate"]
    );
    assert_eq!(header_values(headers, "pragma"), ["no-cache"]);
    assert_eq!(header_values(headers, "expires"), ["0"]);
}

#[tokio::test]
async fn serves_file_with_no_cache_headers() {
    let root = TempDir::new().unwrap();
    std::fs::write(root.path().join("index.html"), "A").unwrap();
    let addr = start_server(root.path()).await;

    let (status, headers, body) = request(addr, "GET", "/index.html", &[]).await;
    assert_eq!(status, 200);
    assert_eq!(body, "A");
    assert_no_cache_headers(&headers);
    assert_eq!(
        header_values(&headers, "content-type"),
        ["text/html; charset=utf-8"]
    );
}

#[tokio::test]
async fn serves_current_content_after_modification() {
    let root = TempDir::new().unwrap();
    std::fs::write(root.path().join("index.html"), "A").unwrap();
    let addr = start_server(root.path()).await;

    let (_, _, body) = request(addr, "GET", "/index.html", &[]).await;
    assert_eq!(body, "A");

    std::fs::write(root.path().join("index.html"), "B").unwrap();
    let (status, headers, body) = request(addr, "GET", "/index.html", &[]).await;
    assert_eq!(status, 200);
    assert_eq!(body, "B");
    assert_no_cache_headers(&headers);
}

#[tokio::test]
async fn missing_path_gets_404_with_no_cache_headers() {
    let root = TempDir::new().unwrap();
    let addr = start_server(root.path()).await;

    let (status, headers, _) = request(addr, "GET", "/missing.txt", &[]).await;
    assert_eq!(status, 404);
    assert_no_cache_headers(&headers);
}

#[tokio::test]
async fn directory_without_slash_redirects_with_no_cache_headers() {
    let root = TempDir::new().unwrap();
    std::fs::create_dir(root.path().join("assets")).unwrap();
    std::fs::write(root.path().join("assets/a.txt"), "a").unwrap();
    let addr = start_server(root.path()).await;

    let (status, headers, _) = request(addr, "GET", "/assets", &[]).await;
    assert_eq!(status, 301);
    assert_eq!(header_values(&headers, "location"), ["/assets/"]);
    assert_no_cache_headers(&headers);
}

#[tokio::test]
async fn directory_with_index_serves_index() {
    let root = TempDir::new().unwrap();
    std::fs::write(root.path().join("index.html"), "home").unwrap();
    let addr = start_server(root.path()).await;

    let (status, _, body) = request(addr, "GET", "/", &[]).await;
    assert_eq!(status, 200);
    assert_eq!(body, "home");
}

#[tokio::test]
async fn directory_without_index_gets_listing() {
    let root = TempDir::new().unwrap();
    std::fs::write(root.path().join("notes.txt"), "n").unwrap();
    let addr = start_server(root.path()).await;

    let (status, headers, body) = request(addr, "GET", "/", &[]).await;
    assert_eq!(status, 200);
    assert!(body.contains("Directory listing for /"));
    assert!(body.contains("notes.txt"));
    assert_no_cache_headers(&headers);
}

#[tokio::test]
async fn if_modified_since_yields_304_with_no_cache_headers() {
    let root = TempDir::new().unwrap();
    std::fs::write(root.path().join("index.html"), "A").unwrap();
    let addr = start_server(root.path()).await;

    let future = format_http_date(SystemTime::now() + Duration::from_secs(3600));
    let (status, headers, body) = request(
        addr,
        "GET",
        "/index.html",
        &[("If-Modified-Since", &future)],
    )
    .await;
    assert_eq!(status, 304);
    assert!(body.is_empty());
    assert_no_cache_headers(&headers);
}

#[tokio::test]
async fn head_sends_headers_only() {
    let root = TempDir::new().unwrap();
    std::fs::write(root.path().join("index.html"), "hello").unwrap();
    let addr = start_server(root.path()).await;

    let (status, headers, body) = request(addr, "HEAD", "/index.html", &[]).await;
    assert_eq!(status, 200);
    assert!(body.is_empty());
    assert_eq!(header_values(&headers, "content-length"), ["5"]);
    assert_no_cache_headers(&headers);
}

#[tokio::test]
async fn unsupported_method_gets_405_with_no_cache_headers() {
    let root = TempDir::new().unwrap();
    let addr = start_server(root.path()).await;

    let (status, headers, _) = request(addr, "POST", "/", &[]).await;
    assert_eq!(status, 405);
    assert_eq!(header_values(&headers, "allow"), ["GET, HEAD"]);
    assert_no_cache_headers(&headers);
}

#[tokio::test]
async fn encoded_traversal_is_blocked() {
    let root = TempDir::new().unwrap();
    let addr = start_server(root.path()).await;

    let (status, headers, _) = request(addr, "GET", "/%2e%2e/%2e%2e/etc/passwd", &[]).await;
    assert_eq!(status, 404);
    assert_no_cache_headers(&headers);
}

#[tokio::test]
async fn duplicate_bind_fails() {
    let root = TempDir::new().unwrap();
    let addr = start_server(root.path()).await;

    // The port is held by the running server; a second bind must error out
    // rather than serve anything.
    assert!(server::bind_listener(addr).is_err());
}
