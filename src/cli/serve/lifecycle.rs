//! Server lifecycle management.

use crate::log;
use anyhow::Result;
use crossbeam::channel::{self, Receiver};
use std::{net::SocketAddr, sync::Arc};
use tiny_http::Server;

/// Maximum number of port binding attempts.
const MAX_PORT_RETRIES: u16 = 10;

/// Bind to the specified interface and port, with automatic port retry.
pub fn bind_with_retry(
    interface: std::net::IpAddr,
    base_port: u16,
) -> Result<(Server, SocketAddr)> {
    let mut last_error = None;
    for offset in 0..MAX_PORT_RETRIES {
        let port = base_port.saturating_add(offset);
        let addr = SocketAddr::new(interface, port);

        match Server::http(addr) {
            Ok(server) => {
                if offset > 0 {
                    log!("serve"; "port {} in use, using {} instead", base_port, port);
                }
                return Ok((server, addr));
            }
            Err(e) => last_error = Some(e),
        }
    }

    Err(anyhow::anyhow!(
        "failed to bind after {} attempts (ports {}-{}): {}",
        MAX_PORT_RETRIES,
        base_port,
        base_port.saturating_add(MAX_PORT_RETRIES - 1),
        last_error.map(|e| e.to_string()).unwrap_or_default()
    ))
}

/// Install the Ctrl+C handler: signal shutdown, then unblock the server so
/// the request loop ends.
///
/// The returned receiver becomes ready once shutdown was requested.
pub fn install_shutdown_handler(server: Arc<Server>) -> Result<Receiver<()>> {
    let (tx, rx) = channel::bounded::<()>(1);
    ctrlc::set_handler(move || {
        log!("serve"; "shutting down...");
        let _ = tx.try_send(());
        server.unblock();
    })
    .map_err(|e| anyhow::anyhow!("failed to set Ctrl+C handler: {}", e))?;
    Ok(rx)
}
