// Accept loop module
// Accepts connections forever, dispatching each to its own task

use crate::config::AppState;
use crate::logger;
use crate::server::connection;
use std::sync::Arc;
use tokio::net::TcpListener;

/// Run the serve loop.
///
/// Accept errors are logged and the loop keeps going; the only way out is
/// process termination by signal. There is no graceful shutdown.
pub async fn run(listener: TcpListener, state: Arc<AppState>) -> std::io::Result<()> {
    loop {
        match listener.accept().await {
            Ok((stream, peer_addr)) => {
                connection::handle_connection(stream, peer_addr, Arc::clone(&state));
            }
            Err(e) => {
                logger::log_error(&format!("Failed to accept connection: {e}"));
            }
        }
    }
}
