//! Response header finalization.
//!
//! The request pipeline accepts a pluggable finalizer that gets the last
//! word on every response's headers before transmission. The server's one
//! behavioral override lives here: the no-cache finalizer that marks every
//! response, errors and redirects included, as non-cacheable.

use hyper::header::{HeaderMap, HeaderValue, CACHE_CONTROL, EXPIRES, PRAGMA};
use std::sync::Arc;

/// Capability applied to the headers of every outgoing response.
pub type HeaderFinalizer = Arc<dyn Fn(&mut HeaderMap) + Send + Sync>;

/// `Cache-Control` value that defeats both caching and revalidation reuse.
pub const NO_CACHE_CONTROL: &str = "no-cache, no-store, must-revalidate";

/// Finalizer that instructs clients and intermediaries to re-fetch on every
/// request.
///
/// Sets, in order:
/// 1. `Cache-Control: no-cache, no-store, must-revalidate`
/// 2. `Pragma: no-cache` (HTTP/1.0 caches)
/// 3. `Expires: 0`
///
/// Each header is set exactly once per response; `insert` replaces any
/// earlier value, so the finalizer is idempotent.
pub fn no_cache_finalizer() -> HeaderFinalizer {
    Arc::new(|headers: &mut HeaderMap| {
        headers.insert(CACHE_CONTROL, HeaderValue::from_static(NO_CACHE_CONTROL));
        headers.insert(PRAGMA, HeaderValue::from_static("no-cache"));
        headers.insert(EXPIRES, HeaderValue::from_static("0"));
    })
}
