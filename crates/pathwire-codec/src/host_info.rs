use std::fmt;
use std::net::{IpAddr, Ipv4Addr, Ipv6Addr, SocketAddr};

use pathwire_core::{CoreError, HostAddr};
use serde::{Deserialize, Serialize};
use serde_bytes::ByteBuf;

use crate::error::DecodeError;

/// Dual-stack host address plus port.
///
/// Holds exactly one of an IPv4 or IPv6 address; the wire form carries both
/// slots and at most one of them is populated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "HostInfoWire", into = "HostInfoWire")]
pub struct HostInfo {
    port: u16,
    addr: IpAddr,
}

#[derive(Debug, Default, Serialize, Deserialize)]
struct AddrsWire {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    ipv4: Option<ByteBuf>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    ipv6: Option<ByteBuf>,
}

#[derive(Debug, Serialize, Deserialize)]
struct HostInfoWire {
    port: u16,
    addrs: AddrsWire,
}

impl HostInfo {
    pub fn new(addr: IpAddr, port: u16) -> Self {
        Self { port, addr }
    }

    /// Builds host info from a generic host address, keeping the address
    /// family. Service addresses have no IP form and are rejected.
    pub fn from_host_addr(host: HostAddr, port: u16) -> Result<Self, CoreError> {
        match host.ip() {
            Some(addr) => Ok(Self::new(addr, port)),
            None => Err(CoreError::UnsupportedAddressFamily(host.host_type())),
        }
    }

    /// Rebuilds host info from raw wire slots.
    ///
    /// A populated IPv4 slot takes precedence over the IPv6 slot. Fails when
    /// no slot is populated or the populated slot has the wrong length.
    pub fn from_slots(port: u16, ipv4: &[u8], ipv6: &[u8]) -> Result<Self, DecodeError> {
        if !ipv4.is_empty() {
            let octets: [u8; 4] = ipv4
                .try_into()
                .map_err(|_| DecodeError::InvalidHostInfo("ipv4 address must be 4 bytes"))?;
            return Ok(Self::new(IpAddr::V4(Ipv4Addr::from(octets)), port));
        }
        if !ipv6.is_empty() {
            let octets: [u8; 16] = ipv6
                .try_into()
                .map_err(|_| DecodeError::InvalidHostInfo("ipv6 address must be 16 bytes"))?;
            return Ok(Self::new(IpAddr::V6(Ipv6Addr::from(octets)), port));
        }
        Err(DecodeError::InvalidHostInfo("no address present"))
    }

    pub fn port(&self) -> u16 {
        self.port
    }

    /// Returns the carried address as a generic host address.
    pub fn host(&self) -> HostAddr {
        HostAddr::from(self.addr)
    }

    pub fn ip(&self) -> IpAddr {
        self.addr
    }

    pub fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.addr, self.port)
    }

    /// IPv4 slot contents, if this is an IPv4 host.
    pub fn ipv4(&self) -> Option<[u8; 4]> {
        match self.addr {
            IpAddr::V4(ip) => Some(ip.octets()),
            IpAddr::V6(_) => None,
        }
    }

    /// IPv6 slot contents, if this is an IPv6 host.
    pub fn ipv6(&self) -> Option<[u8; 16]> {
        match self.addr {
            IpAddr::V4(_) => None,
            IpAddr::V6(ip) => Some(ip.octets()),
        }
    }
}

impl From<SocketAddr> for HostInfo {
    fn from(addr: SocketAddr) -> Self {
        Self::new(addr.ip(), addr.port())
    }
}

impl TryFrom<HostInfoWire> for HostInfo {
    type Error = DecodeError;

    fn try_from(wire: HostInfoWire) -> Result<Self, Self::Error> {
        let ipv4 = wire.addrs.ipv4.as_ref().map_or(&[][..], |b| b.as_slice());
        let ipv6 = wire.addrs.ipv6.as_ref().map_or(&[][..], |b| b.as_slice());
        HostInfo::from_slots(wire.port, ipv4, ipv6)
    }
}

impl From<HostInfo> for HostInfoWire {
    fn from(info: HostInfo) -> Self {
        let addrs = match info.addr {
            IpAddr::V4(ip) => AddrsWire {
                ipv4: Some(ByteBuf::from(ip.octets().to_vec())),
                ipv6: None,
            },
            IpAddr::V6(ip) => AddrsWire {
                ipv4: None,
                ipv6: Some(ByteBuf::from(ip.octets().to_vec())),
            },
        };
        HostInfoWire {
            port: info.port,
            addrs,
        }
    }
}

impl fmt::Display for HostInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.socket_addr())
    }
}
