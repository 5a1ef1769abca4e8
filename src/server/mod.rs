//! Server bootstrap module
//!
//! Listener creation, the accept loop, and per-connection handling.

pub mod connection;
pub mod listener;

// Rust does not allow `loop` as a module name (keyword), so the accept loop
// lives in loop.rs as server_loop.
#[path = "loop.rs"]
pub mod server_loop;

// Re-export commonly used entry points
pub use listener::bind_listener;
pub use server_loop::run;
