//! Datagram Server
//!
//! This module serves the connectionless (UDP) transport. There is no
//! session to manage: each received packet carries one request line, and
//! the reply goes back to the packet's source address.
//!
//! Packets are processed one at a time, to completion, before the next
//! receive. A `client_connected` flag stands in for the connection state
//! the stream transport gets for free: it drives the connected/closed log
//! lines, and QUIT resets it.
//!
//! ## Fault Handling
//!
//! A packet that is not valid UTF-8 is logged and dropped; a socket error
//! is logged and the loop proceeds to the next packet. Nothing a single
//! client sends can stop the server.

use crate::commands::CommandHandler;
use tokio::net::UdpSocket;
use tracing::{error, info, trace, warn};

/// Maximum receive buffer for one datagram (1024 bytes).
pub const MAX_DATAGRAM_SIZE: usize = 1024;

/// Serves the datagram transport over one bound socket.
pub struct DatagramServer {
    /// The bound UDP socket
    socket: UdpSocket,

    /// The command handler (backed by the shared store engine)
    command_handler: CommandHandler,

    /// Whether a client is currently considered connected.
    /// Set on the first packet, reset by QUIT.
    client_connected: bool,
}

impl DatagramServer {
    /// Creates a datagram server over an already-bound socket.
    pub fn new(socket: UdpSocket, command_handler: CommandHandler) -> Self {
        Self {
            socket,
            command_handler,
            client_connected: false,
        }
    }

    /// The local address the server is bound to.
    pub fn local_addr(&self) -> std::io::Result<std::net::SocketAddr> {
        self.socket.local_addr()
    }

    /// Runs the receive-execute-reply loop forever.
    pub async fn run(mut self) {
        let mut buf = [0u8; MAX_DATAGRAM_SIZE];

        loop {
            let (n, peer) = match self.socket.recv_from(&mut buf).await {
                Ok(received) => received,
                Err(e) => {
                    error!(error = %e, "Failed to receive datagram");
                    continue;
                }
            };

            let line = match std::str::from_utf8(&buf[..n]) {
                Ok(line) => line,
                Err(e) => {
                    warn!(client = %peer, error = %e, "Dropping non-UTF-8 datagram");
                    continue;
                }
            };

            if !self.client_connected {
                info!(client = %peer, "Client connected");
                self.client_connected = true;
            }
            trace!(client = %peer, command = %line, "Received datagram");

            let reply = self.command_handler.execute(line);

            if let Err(e) = self.socket.send_to(reply.text.as_bytes(), peer).await {
                error!(client = %peer, error = %e, "Failed to send reply");
                continue;
            }

            if reply.closes_session() {
                info!(client = %peer, "Client session closed");
                self.client_connected = false;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::ResponseStyle;
    use crate::storage::StoreEngine;
    use std::net::SocketAddr;
    use std::sync::Arc;

    async fn create_test_server() -> SocketAddr {
        let socket = UdpSocket::bind("127.0.0.1:0").await.unwrap();
        let addr = socket.local_addr().unwrap();

        let storage = Arc::new(StoreEngine::new());
        let handler = CommandHandler::new(storage, ResponseStyle::Datagram);
        tokio::spawn(DatagramServer::new(socket, handler).run());

        addr
    }

    async fn request(client: &UdpSocket, server: SocketAddr, line: &str) -> String {
        client.send_to(line.as_bytes(), server).await.unwrap();

        let mut buf = [0u8; MAX_DATAGRAM_SIZE];
        let (n, _) = client.recv_from(&mut buf).await.unwrap();
        String::from_utf8(buf[..n].to_vec()).unwrap()
    }

    #[tokio::test]
    async fn test_put_get_roundtrip() {
        let server = create_test_server().await;
        let client = UdpSocket::bind("127.0.0.1:0").await.unwrap();

        let reply = request(&client, server, "PUT alpha 123").await;
        assert!(reply.ends_with("Successfully: Key [alpha] with value [123] added successfully"));

        let reply = request(&client, server, "GET alpha").await;
        assert!(reply.ends_with("Key [alpha] with value [123]"));
    }

    #[tokio::test]
    async fn test_keys_datagram_format() {
        let server = create_test_server().await;
        let client = UdpSocket::bind("127.0.0.1:0").await.unwrap();

        let _ = request(&client, server, "PUT a 1").await;
        let _ = request(&client, server, "PUT b 2").await;

        // Datagram listing: bracketed keys separated by spaces, trailing space
        let reply = request(&client, server, "KEYS").await;
        assert!(reply.contains("Key Store: "));
        assert!(reply.contains("[a] "));
        assert!(reply.contains("[b] "));
        assert!(reply.ends_with(' '));
    }

    #[tokio::test]
    async fn test_edit_replies_are_timestamped() {
        let server = create_test_server().await;
        let client = UdpSocket::bind("127.0.0.1:0").await.unwrap();

        let _ = request(&client, server, "PUT alpha 123").await;

        let reply = request(&client, server, "EDIT_VALUE alpha 456").await;
        assert!(reply.starts_with('['));
        assert!(reply.ends_with("Value updated successfully."));

        let reply = request(&client, server, "EDIT_KEY alpha beta").await;
        assert!(reply.starts_with('['));
        assert!(reply.ends_with("Key updated successfully."));
    }

    #[tokio::test]
    async fn test_quit_acknowledges_and_server_keeps_running() {
        let server = create_test_server().await;
        let client = UdpSocket::bind("127.0.0.1:0").await.unwrap();

        let _ = request(&client, server, "PUT alpha 123").await;

        let reply = request(&client, server, "QUIT").await;
        assert!(reply.ends_with("Connection closed. Goodbye!"));

        // Stateless transport: the store survives and the server still answers
        let reply = request(&client, server, "GET alpha").await;
        assert!(reply.ends_with("Key [alpha] with value [123]"));
    }

    #[tokio::test]
    async fn test_invalid_command() {
        let server = create_test_server().await;
        let client = UdpSocket::bind("127.0.0.1:0").await.unwrap();

        let reply = request(&client, server, "FROB x").await;
        assert!(reply.ends_with("Invalid command"));
    }
}
