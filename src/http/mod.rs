//! HTTP protocol layer module
//!
//! Protocol-level helpers shared by the request handler: response builders,
//! MIME detection, conditional request handling, and header finalization.

pub mod cache;
pub mod headers;
pub mod mime;
pub mod response;

// Re-export commonly used builders
pub use response::{
    build_301_response, build_304_response, build_404_response, build_405_response,
};
