//! UDP adapter.
//!
//! Implements [`DatagramPort`] over a non-blocking `std::net::UdpSocket`.
//! The host has no physical link to lose, so the link is reported up for
//! as long as the socket is open.

use std::io::ErrorKind;
use std::net::{Ipv4Addr, SocketAddr, SocketAddrV4, UdpSocket};

use log::{debug, info, warn};

use crate::app::ports::DatagramPort;

pub struct UdpAdapter {
    socket: UdpSocket,
}

impl UdpAdapter {
    /// Bind to `port` on every IPv4 interface. Port 0 picks a free one.
    pub fn bind(port: u16) -> std::io::Result<Self> {
        let socket = UdpSocket::bind(SocketAddrV4::new(Ipv4Addr::UNSPECIFIED, port))?;
        socket.set_nonblocking(true)?;
        info!("udp: listening on {}", socket.local_addr()?);
        Ok(Self { socket })
    }

    pub fn local_addr(&self) -> std::io::Result<SocketAddr> {
        self.socket.local_addr()
    }
}

impl DatagramPort for UdpAdapter {
    fn link_up(&mut self) -> bool {
        true
    }

    fn recv(&mut self, buf: &mut [u8]) -> Option<(usize, SocketAddrV4)> {
        match self.socket.recv_from(buf) {
            Ok((n, SocketAddr::V4(peer))) => Some((n, peer)),
            Ok((_, SocketAddr::V6(peer))) => {
                debug!("udp: ignoring IPv6 datagram from {}", peer);
                None
            }
            Err(e) if e.kind() == ErrorKind::WouldBlock => None,
            Err(e) => {
                warn!("udp: receive failed: {}", e);
                None
            }
        }
    }

    fn send_to(&mut self, peer: SocketAddrV4, payload: &[u8]) -> bool {
        match self.socket.send_to(payload, peer) {
            Ok(_) => true,
            Err(e) => {
                warn!("udp: send to {} failed: {}", peer, e);
                false
            }
        }
    }
}
