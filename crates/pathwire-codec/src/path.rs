use std::fmt;

use pathwire_core::IsdAsn;
use serde::{Deserialize, Serialize};

use crate::host_info::HostInfo;

/// Result code of a path lookup.
///
/// Values outside the known set decode unchanged and render with a fallback.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PathErrorCode(pub u16);

impl PathErrorCode {
    pub const OK: PathErrorCode = PathErrorCode(0);
    pub const NO_PATHS: PathErrorCode = PathErrorCode(1);
    pub const PS_TIMEOUT: PathErrorCode = PathErrorCode(2);
    pub const INTERNAL: PathErrorCode = PathErrorCode(3);

    pub fn is_ok(self) -> bool {
        self == Self::OK
    }
}

impl fmt::Display for PathErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            Self::OK => f.write_str("OK"),
            Self::NO_PATHS => f.write_str("No paths available"),
            Self::PS_TIMEOUT => f.write_str("Path service timed out while requesting paths"),
            Self::INTERNAL => f.write_str("Path service experienced an internal error"),
            PathErrorCode(raw) => write!(f, "Unknown error ({raw})"),
        }
    }
}

/// One hop interface on a forwarding path.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PathInterface {
    #[serde(rename = "isdas")]
    pub isd_as: IsdAsn,
    pub if_id: u64,
}

impl PathInterface {
    pub fn new(isd_as: IsdAsn, if_id: u64) -> Self {
        Self { isd_as, if_id }
    }
}

impl fmt::Display for PathInterface {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}#{}", self.isd_as, self.if_id)
    }
}

/// Forwarding path plus the metadata needed to use it.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct FwdPathMeta {
    /// Raw forwarding path, opaque to this layer.
    #[serde(with = "serde_bytes")]
    pub fwd_path: Vec<u8>,
    pub mtu: u16,
    /// Hop interfaces ordered from source to destination.
    pub interfaces: Vec<PathInterface>,
}

impl FwdPathMeta {
    /// AS of the first hop, or `None` for an empty path.
    pub fn src_ia(&self) -> Option<IsdAsn> {
        self.interfaces.first().map(|iface| iface.isd_as)
    }

    /// AS of the last hop, or `None` for an empty path.
    pub fn dst_ia(&self) -> Option<IsdAsn> {
        self.interfaces.last().map(|iface| iface.isd_as)
    }
}

impl fmt::Display for FwdPathMeta {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let hops = self
            .interfaces
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join(">");
        write!(f, "Hops: {hops} Mtu: {}", self.mtu)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct PathReqFlags {
    /// Bypass cached paths and ask the path service again.
    pub flush: bool,
    /// Request reservation-capable paths.
    pub sibra: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PathReq {
    pub dst: IsdAsn,
    pub src: IsdAsn,
    pub max_paths: u16,
    pub flags: PathReqFlags,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PathReplyEntry {
    pub path: FwdPathMeta,
    pub host_info: HostInfo,
}

impl fmt::Display for PathReplyEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} NextHop: {}", self.path, self.host_info)
    }
}

/// Path lookup result; entries are meaningful only when the code is OK.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PathReply {
    pub error_code: PathErrorCode,
    pub entries: Vec<PathReplyEntry>,
}

impl PathReply {
    pub fn error(code: PathErrorCode) -> Self {
        Self {
            error_code: code,
            entries: Vec::new(),
        }
    }

    /// Entries if the lookup succeeded, otherwise an empty slice.
    pub fn usable_entries(&self) -> &[PathReplyEntry] {
        if self.error_code.is_ok() {
            &self.entries
        } else {
            &[]
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{FwdPathMeta, PathErrorCode, PathInterface, PathReply};
    use pathwire_core::IsdAsn;

    fn ia(raw: &str) -> IsdAsn {
        raw.parse().expect("valid ia")
    }

    fn two_hop_path() -> FwdPathMeta {
        FwdPathMeta {
            fwd_path: vec![0x01, 0x02],
            mtu: 1400,
            interfaces: vec![
                PathInterface::new(ia("1-ff00:0:110"), 1),
                PathInterface::new(ia("1-ff00:0:111"), 41),
            ],
        }
    }

    #[test]
    fn error_codes_render_known_and_unknown_values() {
        assert_eq!(PathErrorCode::OK.to_string(), "OK");
        assert_eq!(PathErrorCode::NO_PATHS.to_string(), "No paths available");
        assert_eq!(PathErrorCode(17).to_string(), "Unknown error (17)");
    }

    #[test]
    fn endpoints_follow_first_and_last_hop() {
        let path = two_hop_path();
        assert_eq!(path.src_ia(), Some(ia("1-ff00:0:110")));
        assert_eq!(path.dst_ia(), Some(ia("1-ff00:0:111")));
    }

    #[test]
    fn empty_path_has_no_endpoints() {
        let path = FwdPathMeta::default();
        assert_eq!(path.src_ia(), None);
        assert_eq!(path.dst_ia(), None);
    }

    #[test]
    fn path_renders_hops_and_mtu() {
        assert_eq!(
            two_hop_path().to_string(),
            "Hops: 1-ff00:0:110#1>1-ff00:0:111#41 Mtu: 1400"
        );
    }

    #[test]
    fn failed_reply_exposes_no_entries() {
        let mut reply = PathReply::error(PathErrorCode::NO_PATHS);
        reply.entries.push(super::PathReplyEntry {
            path: two_hop_path(),
            host_info: "10.0.0.1:31000"
                .parse::<std::net::SocketAddr>()
                .expect("valid socket addr")
                .into(),
        });
        assert!(reply.usable_entries().is_empty());
    }
}
