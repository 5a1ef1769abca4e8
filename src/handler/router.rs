//! Request entry point.
//!
//! Validates the method, extracts the header state the file server needs,
//! dispatches, and runs the header finalizer over every response, error
//! and redirect responses included.

use crate::config::AppState;
use crate::handler::static_files;
use crate::http;
use crate::logger;
use http_body_util::Full;
use hyper::body::Bytes;
use hyper::{Method, Request, Response};
use std::convert::Infallible;
use std::sync::Arc;

/// Request context encapsulating what the file server needs from a request
pub struct RequestContext<'a> {
    /// Raw (still percent-encoded) request path
    pub path: &'a str,
    pub query: Option<&'a str>,
    pub is_head: bool,
    pub if_modified_since: Option<String>,
}

/// Main entry point for HTTP request handling
pub async fn handle_request(
    req: Request<hyper::body::Incoming>,
    state: Arc<AppState>,
) -> Result<Response<Full<Bytes>>, Infallible> {
    let method = req.method();
    let path = req.uri().path();
    let is_head = *method == Method::HEAD;

    let access_log = state.config.logging.access_log;
    if access_log {
        logger::log_request(method, req.uri(), req.version());
    }

    let mut response = match method {
        &Method::GET | &Method::HEAD => {
            let ctx = RequestContext {
                path,
                query: req.uri().query(),
                is_head,
                if_modified_since: req
                    .headers()
                    .get("if-modified-since")
                    .and_then(|v| v.to_str().ok())
                    .map(ToString::to_string),
            };
            static_files::serve(&ctx, &state).await
        }
        other => {
            logger::log_warning(&format!("Method not allowed: {other}"));
            http::build_405_response()
        }
    };

    // The non-cacheable guarantee is a blanket policy: every response leaves
    // through the finalizer, whatever its status code.
    (state.finalize_headers)(response.headers_mut());

    if access_log {
        logger::log_response(response.status().as_u16());
    }

    Ok(response)
}
