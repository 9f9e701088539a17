//! WebSocket server for live reload.
//!
//! A background thread accepts browser connections; broadcasts run on
//! the caller's thread. Dead clients are dropped on the next broadcast.

use std::net::{TcpListener, TcpStream};
use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use parking_lot::Mutex;
use tungstenite::{Message, WebSocket};

use crate::{debug, log};

use super::ReloadMessage;

/// Maximum port retry attempts
const MAX_PORT_RETRIES: u16 = 10;

/// Live reload WebSocket server handle.
pub struct ReloadServer {
    /// Port actually bound (base port may have been taken).
    pub port: u16,
    clients: Arc<Mutex<Vec<WebSocket<TcpStream>>>>,
}

impl ReloadServer {
    /// Bind and start accepting clients on a background thread.
    pub fn start(base_port: u16) -> Result<Self> {
        let (listener, port) = try_bind_port(base_port, MAX_PORT_RETRIES)?;
        listener.set_nonblocking(true)?;

        let clients: Arc<Mutex<Vec<WebSocket<TcpStream>>>> = Arc::new(Mutex::new(Vec::new()));

        let accept_clients = Arc::clone(&clients);
        std::thread::spawn(move || {
            loop {
                if crate::core::is_shutdown() {
                    break;
                }
                match listener.accept() {
                    Ok((stream, addr)) => {
                        debug!("reload"; "client connected: {addr}");
                        let _ = stream.set_nonblocking(false);
                        match tungstenite::accept(stream) {
                            Ok(mut ws) => {
                                let hello = ReloadMessage::connected().to_json();
                                let _ = ws.send(Message::Text(hello.into()));
                                accept_clients.lock().push(ws);
                            }
                            Err(err) => {
                                debug!("reload"; "handshake failed: {err}");
                            }
                        }
                    }
                    Err(ref err) if err.kind() == std::io::ErrorKind::WouldBlock => {
                        std::thread::sleep(Duration::from_millis(100));
                    }
                    Err(err) => {
                        log!("reload"; "accept error: {err}");
                        std::thread::sleep(Duration::from_millis(100));
                    }
                }
            }
        });

        Ok(Self { port, clients })
    }

    /// Send a message to every connected client, dropping dead ones.
    pub fn broadcast(&self, message: &ReloadMessage) {
        let json = message.to_json();
        let mut clients = self.clients.lock();
        clients.retain_mut(|ws| ws.send(Message::Text(json.clone().into())).is_ok());
    }

    /// Broadcast a full page reload.
    pub fn reload(&self, reason: &str) {
        debug!("reload"; "reload: {reason}");
        self.broadcast(&ReloadMessage::reload(reason));
    }

    pub fn client_count(&self) -> usize {
        self.clients.lock().len()
    }

    /// Close all client connections.
    pub fn shutdown(&self) {
        let mut clients = self.clients.lock();
        for ws in clients.iter_mut() {
            let _ = ws.close(None);
        }
        clients.clear();
    }
}

/// Try binding to port, retry with incremented port if in use.
fn try_bind_port(base_port: u16, max_retries: u16) -> Result<(TcpListener, u16)> {
    let mut last_error = None;

    for offset in 0..max_retries {
        let port = base_port.saturating_add(offset);
        match TcpListener::bind(format!("127.0.0.1:{port}")) {
            Ok(listener) => {
                let actual_port = listener.local_addr()?.port();
                return Ok((listener, actual_port));
            }
            Err(err) => {
                last_error = Some(err);
            }
        }
    }

    Err(anyhow::anyhow!(
        "Failed to bind WebSocket server after {} attempts: {}",
        max_retries,
        last_error.map(|e| e.to_string()).unwrap_or_default()
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_port_retry_on_conflict() {
        let (first, first_port) = try_bind_port(0, 1).unwrap();
        // Port 0 asks the OS for an ephemeral port; bind its concrete
        // number again to force a retry
        let (_second, second_port) = try_bind_port(first_port, MAX_PORT_RETRIES).unwrap();
        assert_ne!(first_port, second_port);
        drop(first);
    }

    #[test]
    fn test_broadcast_without_clients() {
        let server = ReloadServer::start(0).unwrap();
        server.reload("nothing connected");
        assert_eq!(server.client_count(), 0);
        server.shutdown();
    }
}
