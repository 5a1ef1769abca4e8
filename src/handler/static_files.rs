//! Static file serving module
//!
//! Maps request paths onto the served tree, with traversal protection,
//! index file lookup, generated directory listings, and conditional
//! responses. Every request reads from disk; nothing is cached server-side.

use crate::config::AppState;
use crate::handler::router::RequestContext;
use crate::http::{self, cache, mime};
use crate::logger;
use http_body_util::Full;
use hyper::body::Bytes;
use hyper::Response;
use std::path::{Path, PathBuf};
use tokio::fs;

/// Outcome of mapping a request path onto the served tree
#[derive(Debug)]
enum Resolved {
    File(PathBuf),
    Directory(PathBuf),
    /// Directory requested without a trailing slash
    RedirectToSlash,
    NotFound,
}

/// Serve a GET/HEAD request from the served root
pub async fn serve(ctx: &RequestContext<'_>, state: &AppState) -> Response<Full<Bytes>> {
    let Some(decoded) = percent_decode(ctx.path) else {
        return http::build_404_response();
    };

    match resolve(&state.root, &decoded) {
        Resolved::RedirectToSlash => {
            // Preserve the original encoding and the query string.
            let target = match ctx.query {
                Some(q) => format!("{}/?{q}", ctx.path),
                None => format!("{}/", ctx.path),
            };
            http::build_301_response(&target)
        }
        Resolved::File(file_path) => serve_file(ctx, &file_path).await,
        Resolved::Directory(dir_path) => {
            for index in &state.config.serve.index_files {
                let candidate = dir_path.join(index);
                if candidate.is_file() {
                    return serve_file(ctx, &candidate).await;
                }
            }
            serve_listing(ctx, &decoded, &dir_path).await
        }
        Resolved::NotFound => http::build_404_response(),
    }
}

/// Resolve a decoded request path to a filesystem entry under `root`.
///
/// `root` must already be canonicalized. Dot-dot segments are rejected up
/// front; the canonicalize-and-compare below is the backstop for symlinks
/// and anything the segment check misses.
fn resolve(root: &Path, path: &str) -> Resolved {
    let relative = path.trim_start_matches('/');
    if relative.split('/').any(|segment| segment == "..") {
        logger::log_warning(&format!("Path traversal attempt blocked: {path}"));
        return Resolved::NotFound;
    }

    let Ok(canonical) = root.join(relative).canonicalize() else {
        return Resolved::NotFound;
    };
    if !canonical.starts_with(root) {
        logger::log_warning(&format!(
            "Path escapes served root, blocked: {path} -> {}",
            canonical.display()
        ));
        return Resolved::NotFound;
    }

    if canonical.is_dir() {
        if path.ends_with('/') {
            Resolved::Directory(canonical)
        } else {
            Resolved::RedirectToSlash
        }
    } else {
        Resolved::File(canonical)
    }
}

/// Serve a single file, honoring `If-Modified-Since`
async fn serve_file(ctx: &RequestContext<'_>, path: &Path) -> Response<Full<Bytes>> {
    let mtime = match fs::metadata(path).await {
        Ok(metadata) => metadata.modified().ok(),
        Err(_) => return http::build_404_response(),
    };

    if let Some(mtime) = mtime {
        if cache::not_modified(mtime, ctx.if_modified_since.as_deref()) {
            return http::build_304_response();
        }
    }

    let content = match fs::read(path).await {
        Ok(c) => c,
        Err(e) => {
            logger::log_error(&format!("Failed to read file '{}': {e}", path.display()));
            return http::build_404_response();
        }
    };

    let content_type = mime::content_type_for(path.extension().and_then(|e| e.to_str()));
    let last_modified = mtime.map(cache::format_http_date);

    http::response::build_file_response(
        Bytes::from(content),
        content_type,
        last_modified.as_deref(),
        ctx.is_head,
    )
}

/// Serve a generated listing for a directory without an index file
async fn serve_listing(
    ctx: &RequestContext<'_>,
    display_path: &str,
    dir: &Path,
) -> Response<Full<Bytes>> {
    match render_listing(display_path, dir).await {
        Ok(html) => http::response::build_listing_response(html, ctx.is_head),
        Err(e) => {
            logger::log_error(&format!(
                "Failed to list directory '{}': {e}",
                dir.display()
            ));
            http::build_404_response()
        }
    }
}

/// Render a directory listing as HTML, entries sorted by name
async fn render_listing(display_path: &str, dir: &Path) -> std::io::Result<String> {
    let mut entries = Vec::new();
    let mut read_dir = fs::read_dir(dir).await?;
    while let Some(entry) = read_dir.next_entry().await? {
        let mut name = entry.file_name().to_string_lossy().into_owned();
        let is_dir = entry.file_type().await.is_ok_and(|t| t.is_dir());
        if is_dir {
            name.push('/');
        }
        entries.push(name);
    }
    entries.sort();

    let title = format!("Directory listing for {display_path}");
    let mut html = String::new();
    html.push_str("<!DOCTYPE html>\n<html>\n<head>\n<meta charset=\"utf-8\">\n");
    html.push_str(&format!("<title>{}</title>\n", escape_html(&title)));
    html.push_str("</head>\n<body>\n");
    html.push_str(&format!("<h1>{}</h1>\n<hr>\n<ul>\n", escape_html(&title)));
    for name in &entries {
        html.push_str(&format!(
            "<li><a href=\"{}\">{}</a></li>\n",
            percent_encode(name),
            escape_html(name)
        ));
    }
    html.push_str("</ul>\n<hr>\n</body>\n</html>\n");
    Ok(html)
}

/// Decode %XX escapes in a request path.
///
/// Returns `None` on a truncated or non-hex escape, or if the decoded bytes
/// are not valid UTF-8.
fn percent_decode(path: &str) -> Option<String> {
    let bytes = path.as_bytes();
    let mut out = Vec::with_capacity(bytes.len());
    let mut i = 0;
    while i < bytes.len() {
        if bytes[i] == b'%' {
            let hex = bytes.get(i + 1..i + 3)?;
            let hex = std::str::from_utf8(hex).ok()?;
            out.push(u8::from_str_radix(hex, 16).ok()?);
            i += 3;
        } else {
            out.push(bytes[i]);
            i += 1;
        }
    }
    String::from_utf8(out).ok()
}

/// Percent-encode a listing entry name for use in an href
fn percent_encode(name: &str) -> String {
    let mut out = String::with_capacity(name.len());
    for &b in name.as_bytes() {
        match b {
            b'A'..=b'Z' | b'a'..=b'z' | b'0'..=b'9' | b'-' | b'.' | b'_' | b'~' | b'/' => {
                out.push(b as char);
            }
            _ => out.push_str(&format!("%{b:02X}")),
        }
    }
    out
}

/// Escape text for embedding in listing HTML
fn escape_html(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}
