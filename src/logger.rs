//! Stdout/stderr logging helpers.
//!
//! Plain println logging with bracketed prefixes. The startup banner is the
//! only output the server is required to produce; access logging can be
//! turned off entirely.

use crate::config::AppState;
use chrono::Local;
use hyper::{Method, Uri, Version};
use std::net::SocketAddr;

pub fn log_server_start(addr: &SocketAddr, state: &AppState) {
    println!("======================================");
    println!("Serving {} over HTTP", state.root.display());
    println!("Server running on http://{addr}/");
    if let Some(workers) = state.config.server.workers {
        println!("Worker threads: {workers}");
    }
    println!("Caching disabled: every response is marked non-cacheable");
    println!("======================================\n");
}

pub fn log_connection_accepted(peer_addr: &SocketAddr) {
    println!("[Connection] Accepted from: {peer_addr}");
}

pub fn log_connection_error(err: &impl std::fmt::Debug) {
    eprintln!("[ERROR] Failed to serve connection: {err:?}");
}

pub fn log_request(method: &Method, uri: &Uri, version: Version) {
    println!(
        "[{}] [Request] {method} {uri} {version:?}",
        Local::now().format("%d/%b/%Y:%H:%M:%S %z")
    );
}

pub fn log_response(status: u16) {
    println!("[Response] {status}");
}

pub fn log_warning(message: &str) {
    eprintln!("[WARN] {message}");
}

pub fn log_error(message: &str) {
    eprintln!("[ERROR] {message}");
}
