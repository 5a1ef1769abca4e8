//! nocached: a static file server that never lets anyone cache.
//!
//! Serves files from a directory over HTTP/1.x and stamps every response,
//! errors and redirects included, with headers that instruct clients and
//! intermediaries to re-fetch on every request. The server itself keeps no
//! cache either: each request re-reads the file from disk, so the bytes on
//! the wire always match the bytes on disk.

pub mod config;
pub mod handler;
pub mod http;
pub mod logger;
pub mod server;
