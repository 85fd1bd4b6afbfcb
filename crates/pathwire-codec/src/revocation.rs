use std::fmt;

use pathwire_core::IsdAsn;
use serde::{Deserialize, Serialize};

/// Relationship of the revoked interface's link.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LinkType(pub u16);

impl LinkType {
    pub const UNSET: LinkType = LinkType(0);
    pub const CORE: LinkType = LinkType(1);
    pub const PARENT: LinkType = LinkType(2);
    pub const CHILD: LinkType = LinkType(3);
    pub const PEER: LinkType = LinkType(4);
}

impl fmt::Display for LinkType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            Self::UNSET => f.write_str("unset"),
            Self::CORE => f.write_str("core"),
            Self::PARENT => f.write_str("parent"),
            Self::CHILD => f.write_str("child"),
            Self::PEER => f.write_str("peer"),
            LinkType(raw) => write!(f, "Unknown link type ({raw})"),
        }
    }
}

/// Statement that an interface is unusable for a bounded time window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RevInfo {
    pub if_id: u64,
    #[serde(rename = "isdas")]
    pub isd_as: IsdAsn,
    pub link_type: LinkType,
    /// Issue time, seconds since the Unix epoch.
    pub timestamp: u32,
    /// Validity window in seconds.
    pub ttl: u32,
}

impl RevInfo {
    /// Seconds since the Unix epoch at which the revocation lapses.
    pub fn expiry(&self) -> u64 {
        u64::from(self.timestamp) + u64::from(self.ttl)
    }

    /// Whether the revocation is in force at `now` (seconds since epoch).
    pub fn active(&self, now: u64) -> bool {
        u64::from(self.timestamp) <= now && now < self.expiry()
    }
}

impl fmt::Display for RevInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "IF: {}#{} Link type: {} Timestamp: {} TTL: {}s",
            self.isd_as, self.if_id, self.link_type, self.timestamp, self.ttl
        )
    }
}

/// Outcome of checking a revocation handed to the path service.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RevResult(pub u16);

impl RevResult {
    pub const VALID: RevResult = RevResult(0);
    pub const STALE: RevResult = RevResult(1);
    pub const INVALID: RevResult = RevResult(2);
    pub const UNKNOWN: RevResult = RevResult(3);
}

impl fmt::Display for RevResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            Self::VALID => f.write_str("RevValid"),
            Self::STALE => f.write_str("RevStale"),
            Self::INVALID => f.write_str("RevInvalid"),
            Self::UNKNOWN => f.write_str("RevUnknown"),
            RevResult(raw) => write!(f, "Unknown revocation result ({raw})"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RevNotification {
    pub rev_info: RevInfo,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RevReply {
    pub result: RevResult,
}
