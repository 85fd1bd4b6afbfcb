use std::fmt;
use std::net::{IpAddr, Ipv4Addr, Ipv6Addr};

/// Address family of a [`HostAddr`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HostType {
    Ipv4,
    Ipv6,
    /// Service anycast address, resolved inside the AS.
    Svc,
}

impl fmt::Display for HostType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            HostType::Ipv4 => "IPv4",
            HostType::Ipv6 => "IPv6",
            HostType::Svc => "SVC",
        };
        f.write_str(name)
    }
}

/// AS-local host address.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HostAddr {
    Ipv4(Ipv4Addr),
    Ipv6(Ipv6Addr),
    /// Service address identified by its 16-bit service number.
    Svc(u16),
}

impl HostAddr {
    pub fn host_type(&self) -> HostType {
        match self {
            HostAddr::Ipv4(_) => HostType::Ipv4,
            HostAddr::Ipv6(_) => HostType::Ipv6,
            HostAddr::Svc(_) => HostType::Svc,
        }
    }

    /// Returns the IP address for IP families, `None` for service addresses.
    pub fn ip(&self) -> Option<IpAddr> {
        match self {
            HostAddr::Ipv4(ip) => Some(IpAddr::V4(*ip)),
            HostAddr::Ipv6(ip) => Some(IpAddr::V6(*ip)),
            HostAddr::Svc(_) => None,
        }
    }
}

impl From<IpAddr> for HostAddr {
    fn from(ip: IpAddr) -> Self {
        match ip {
            IpAddr::V4(ip) => HostAddr::Ipv4(ip),
            IpAddr::V6(ip) => HostAddr::Ipv6(ip),
        }
    }
}

impl fmt::Display for HostAddr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HostAddr::Ipv4(ip) => write!(f, "{ip}"),
            HostAddr::Ipv6(ip) => write!(f, "{ip}"),
            HostAddr::Svc(svc) => write!(f, "SVC:{svc:#06x}"),
        }
    }
}
