//! UDP transport implementation

use std::net::{Ipv4Addr, Ipv6Addr, SocketAddr};
use std::sync::Arc;

use tokio::net::UdpSocket;

use kelp_core::{KelpError, KelpResult};

use crate::DatagramSink;

/// Unspecified local address of the same family as `dest`
fn any_addr_for(dest: SocketAddr) -> SocketAddr {
    match dest {
        SocketAddr::V4(_) => SocketAddr::from((Ipv4Addr::UNSPECIFIED, 0)),
        SocketAddr::V6(_) => SocketAddr::from((Ipv6Addr::UNSPECIFIED, 0)),
    }
}

/// Blocking UDP sink with a fixed destination
///
/// Used from the synchronous capture loop. The socket is closed on drop.
#[derive(Debug)]
pub struct UdpSink {
    socket: std::net::UdpSocket,
    dest: SocketAddr,
}

impl UdpSink {
    /// Bind an ephemeral local port and target `dest`
    pub fn open(dest: SocketAddr) -> KelpResult<Self> {
        let socket = std::net::UdpSocket::bind(any_addr_for(dest))
            .map_err(|e| KelpError::TransportError(e.to_string()))?;
        Ok(UdpSink { socket, dest })
    }

    pub fn dest(&self) -> SocketAddr {
        self.dest
    }

    pub fn local_addr(&self) -> KelpResult<SocketAddr> {
        self.socket
            .local_addr()
            .map_err(|e| KelpError::TransportError(e.to_string()))
    }
}

impl DatagramSink for UdpSink {
    fn send(&mut self, payload: &[u8]) -> KelpResult<()> {
        self.socket
            .send_to(payload, self.dest)
            .map_err(|e| KelpError::TransportError(e.to_string()))?;
        Ok(())
    }
}

/// Async UDP transport for the relay
pub struct UdpTransport {
    socket: Arc<UdpSocket>,
    local_addr: SocketAddr,
}

impl UdpTransport {
    /// Bind to a local address
    pub async fn bind(addr: SocketAddr) -> KelpResult<Self> {
        let socket = UdpSocket::bind(addr)
            .await
            .map_err(|e| KelpError::TransportError(e.to_string()))?;

        let local_addr = socket
            .local_addr()
            .map_err(|e| KelpError::TransportError(e.to_string()))?;

        Ok(UdpTransport {
            socket: Arc::new(socket),
            local_addr,
        })
    }

    /// Bind an ephemeral port suitable for sending to `dest`
    pub async fn bind_for(dest: SocketAddr) -> KelpResult<Self> {
        Self::bind(any_addr_for(dest)).await
    }

    /// Get local address
    pub fn local_addr(&self) -> SocketAddr {
        self.local_addr
    }

    /// Send raw bytes to a destination
    pub async fn send_bytes_to(&self, bytes: &[u8], dest: SocketAddr) -> KelpResult<()> {
        self.socket
            .send_to(bytes, dest)
            .await
            .map_err(|e| KelpError::TransportError(e.to_string()))?;
        Ok(())
    }

    /// Receive raw bytes
    pub async fn recv_bytes_from(&self, max_len: usize) -> KelpResult<(Vec<u8>, SocketAddr)> {
        let mut buf = vec![0u8; max_len];
        let (len, addr) = self
            .socket
            .recv_from(&mut buf)
            .await
            .map_err(|e| KelpError::TransportError(e.to_string()))?;

        buf.truncate(len);
        Ok((buf, addr))
    }

    /// Get a clone of the socket for concurrent operations
    pub fn socket(&self) -> Arc<UdpSocket> {
        Arc::clone(&self.socket)
    }
}
