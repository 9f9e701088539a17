//! Server startup helpers.

use std::net::{IpAddr, SocketAddr};
use std::sync::Arc;

use anyhow::{Result, anyhow};
use tiny_http::Server;

use crate::log;

/// Maximum port retry attempts
const MAX_PORT_RETRIES: u16 = 10;

/// Bind the HTTP server, walking up from the configured port when it is
/// already taken. Returns the server and the port actually bound.
pub fn bind_with_retry(interface: IpAddr, base_port: u16) -> Result<(Arc<Server>, u16)> {
    let mut last_error = None;

    for offset in 0..MAX_PORT_RETRIES {
        let port = base_port.saturating_add(offset);
        let addr = SocketAddr::new(interface, port);
        match Server::http(addr) {
            Ok(server) => {
                if offset > 0 {
                    log!("serve"; "port {base_port} in use, bound {port} instead");
                }
                // Port 0 asks the OS for an ephemeral port
                let actual = server
                    .server_addr()
                    .to_ip()
                    .map(|a| a.port())
                    .unwrap_or(port);
                return Ok((Arc::new(server), actual));
            }
            Err(err) => {
                last_error = Some(err);
            }
        }
    }

    Err(anyhow!(
        "failed to bind {interface} after {MAX_PORT_RETRIES} attempts: {}",
        last_error.map(|e| e.to_string()).unwrap_or_default()
    ))
}
