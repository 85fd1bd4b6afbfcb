use std::collections::HashMap;
use std::fmt;

use pathwire_core::IsdAsn;
use serde::{Deserialize, Serialize};

use crate::host_info::HostInfo;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AsInfoReq {
    /// AS to describe; the wildcard asks for the local AS.
    #[serde(rename = "isdas")]
    pub isd_as: IsdAsn,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AsInfoReplyEntry {
    #[serde(rename = "isdas")]
    pub isd_as: IsdAsn,
    pub mtu: u16,
    pub is_core: bool,
}

impl fmt::Display for AsInfoReplyEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "ia:{}, mtu:{}, core:{}",
            self.isd_as, self.mtu, self.is_core
        )
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct AsInfoReply {
    pub entries: Vec<AsInfoReplyEntry>,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct IfInfoRequest {
    /// Interfaces to resolve; empty asks for all.
    pub if_ids: Vec<u64>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct IfInfoReplyEntry {
    pub if_id: u64,
    pub host_info: HostInfo,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct IfInfoReply {
    pub entries: Vec<IfInfoReplyEntry>,
}

impl IfInfoReply {
    /// Maps interface IDs to their addresses.
    ///
    /// Rebuilt from `entries` on every call. A later entry for the same ID
    /// replaces an earlier one.
    pub fn interface_map(&self) -> HashMap<u64, HostInfo> {
        self.entries
            .iter()
            .map(|entry| (entry.if_id, entry.host_info))
            .collect()
    }
}

/// Role of an AS-local control-plane service.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ServiceType(pub u16);

impl ServiceType {
    /// Beacon service.
    pub const BS: ServiceType = ServiceType(0);
    /// Path service.
    pub const PS: ServiceType = ServiceType(1);
    /// Certificate service.
    pub const CS: ServiceType = ServiceType(2);
    /// Border router.
    pub const BR: ServiceType = ServiceType(3);
    /// SIBRA reservation service.
    pub const SB: ServiceType = ServiceType(4);
}

impl fmt::Display for ServiceType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match *self {
            Self::BS => "BS",
            Self::PS => "PS",
            Self::CS => "CS",
            Self::BR => "BR",
            Self::SB => "SB",
            _ => "??",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ServiceInfoRequest {
    pub service_types: Vec<ServiceType>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServiceInfoReplyEntry {
    pub service_type: ServiceType,
    /// Seconds the entry may be cached.
    pub ttl: u32,
    pub host_infos: Vec<HostInfo>,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ServiceInfoReply {
    pub entries: Vec<ServiceInfoReplyEntry>,
}

#[cfg(test)]
mod tests {
    use super::{AsInfoReplyEntry, IfInfoReply, IfInfoReplyEntry, ServiceType};
    use crate::host_info::HostInfo;
    use pathwire_core::IsdAsn;
    use std::net::{IpAddr, Ipv4Addr};

    fn host(last: u8, port: u16) -> HostInfo {
        HostInfo::new(IpAddr::V4(Ipv4Addr::new(10, 0, 0, last)), port)
    }

    #[test]
    fn interface_map_keeps_last_duplicate() {
        let reply = IfInfoReply {
            entries: vec![
                IfInfoReplyEntry {
                    if_id: 7,
                    host_info: host(1, 30_001),
                },
                IfInfoReplyEntry {
                    if_id: 3,
                    host_info: host(3, 30_003),
                },
                IfInfoReplyEntry {
                    if_id: 7,
                    host_info: host(2, 30_002),
                },
            ],
        };

        let map = reply.interface_map();
        assert_eq!(map.len(), 2);
        assert_eq!(map[&7], host(2, 30_002));
        assert_eq!(map[&3], host(3, 30_003));
    }

    #[test]
    fn interface_map_reflects_entry_changes() {
        let mut reply = IfInfoReply::default();
        assert!(reply.interface_map().is_empty());
        reply.entries.push(IfInfoReplyEntry {
            if_id: 1,
            host_info: host(9, 1),
        });
        assert_eq!(reply.interface_map()[&1], host(9, 1));
    }

    #[test]
    fn service_types_render_with_fallback() {
        assert_eq!(ServiceType::BR.to_string(), "BR");
        assert_eq!(ServiceType::CS.to_string(), "CS");
        assert_eq!(ServiceType(99).to_string(), "??");
    }

    #[test]
    fn as_info_entry_rendering() {
        let entry = AsInfoReplyEntry {
            isd_as: "1-ff00:0:110".parse::<IsdAsn>().expect("valid ia"),
            mtu: 1472,
            is_core: true,
        };
        assert_eq!(entry.to_string(), "ia:1-ff00:0:110, mtu:1472, core:true");
    }
}
