//! Local address discovery

use std::net::{IpAddr, Ipv4Addr, SocketAddr, UdpSocket};

/// Public address used only to pick a route; no packet is sent
pub const ROUTE_PROBE_ADDR: &str = "8.8.8.8:80";

/// LAN address of this machine, as seen by the default route
///
/// Falls back to loopback when there is no usable network.
pub fn detect_local_ip() -> IpAddr {
    match probe_route(ROUTE_PROBE_ADDR) {
        Ok(ip) => ip,
        Err(e) => {
            tracing::debug!("Local address discovery failed: {}", e);
            IpAddr::V4(Ipv4Addr::LOCALHOST)
        }
    }
}

fn probe_route(target: &str) -> std::io::Result<IpAddr> {
    let socket = UdpSocket::bind(SocketAddr::from((Ipv4Addr::UNSPECIFIED, 0)))?;
    socket.connect(target)?;
    Ok(socket.local_addr()?.ip())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_detect_local_ip_is_concrete() {
        // Either a routed address or the loopback fallback
        assert!(!detect_local_ip().is_unspecified());
    }

    #[test]
    fn test_probe_route_to_loopback() {
        let ip = probe_route("127.0.0.1:9").unwrap();
        assert!(ip.is_loopback());
    }
}
