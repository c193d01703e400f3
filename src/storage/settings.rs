//! Persisted network settings.
//!
//! Stored as one length byte followed by a `postcard` blob. An erased or
//! undecodable block yields [`NetworkSettings::default`].

use std::net::{Ipv4Addr, SocketAddrV4};

use log::warn;
use serde::{Deserialize, Serialize};

use super::region::PersistentRegion;
use crate::app::ports::StorageError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct NetworkSettings {
    /// Where alarm notifications are sent. Unset while all zero.
    pub dest_ip: [u8; 4],
    pub dest_port: u16,
    pub local_ip: [u8; 4],
    pub subnet: [u8; 4],
    pub gateway: [u8; 4],
}

impl Default for NetworkSettings {
    fn default() -> Self {
        Self {
            dest_ip: [0; 4],
            dest_port: 0,
            local_ip: [192, 168, 1, 177],
            subnet: [255, 255, 255, 0],
            gateway: [192, 168, 1, 1],
        }
    }
}

impl NetworkSettings {
    pub fn destination(&self) -> Option<SocketAddrV4> {
        let ip = Ipv4Addr::from(self.dest_ip);
        (!ip.is_unspecified() && self.dest_port != 0).then(|| SocketAddrV4::new(ip, self.dest_port))
    }

    pub fn set_destination(&mut self, peer: SocketAddrV4) {
        self.dest_ip = peer.ip().octets();
        self.dest_port = peer.port();
    }

    pub fn load(region: &dyn PersistentRegion) -> Result<Self, StorageError> {
        let mut buf = [0u8; super::NETWORK_LEN];
        region.read_at(0, &mut buf)?;

        let len = usize::from(buf[0]);
        let Some(blob) = buf.get(1..1 + len) else {
            warn!("network settings: none stored, using defaults");
            return Ok(Self::default());
        };
        match postcard::from_bytes(blob) {
            Ok(settings) => Ok(settings),
            Err(e) => {
                warn!("network settings: undecodable ({}), using defaults", e);
                Ok(Self::default())
            }
        }
    }

    pub fn store(&self, region: &mut dyn PersistentRegion) -> Result<(), StorageError> {
        let mut buf = [0u8; super::NETWORK_LEN];
        let len = postcard::to_slice(self, &mut buf[1..])
            .map_err(|_| StorageError::OutOfBounds {
                offset: 1,
                len: super::NETWORK_LEN,
            })?
            .len();
        buf[0] = len as u8;
        region.write_at(0, &buf[..=len])
    }
}
