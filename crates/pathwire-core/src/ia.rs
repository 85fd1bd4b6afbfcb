use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::CoreError;

/// Number of low bits holding the AS number in a packed [`IsdAsn`].
pub const ASN_BITS: u32 = 48;
/// Largest representable AS number.
pub const MAX_ASN: u64 = (1 << ASN_BITS) - 1;
/// Largest representable ISD number.
pub const MAX_ISD: u16 = u16::MAX;
/// AS numbers up to this value render in decimal (BGP-compatible range).
const MAX_BGP_ASN: u64 = u32::MAX as u64;
const ASN_GROUP_BITS: u32 = 16;
const ASN_GROUPS: usize = 3;

/// Packed ISD and AS number: top 16 bits ISD, low 48 bits AS.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct IsdAsn(pub u64);

impl IsdAsn {
    /// Wildcard identifier (ISD 0, AS 0).
    pub const WILDCARD: IsdAsn = IsdAsn(0);

    /// Packs an ISD and AS number. Fails when `asn` exceeds 48 bits.
    pub fn new(isd: u16, asn: u64) -> Result<Self, CoreError> {
        if asn > MAX_ASN {
            return Err(CoreError::InvalidInput("AS number exceeds 48 bits"));
        }
        Ok(Self((u64::from(isd) << ASN_BITS) | asn))
    }

    pub fn isd(self) -> u16 {
        (self.0 >> ASN_BITS) as u16
    }

    pub fn asn(self) -> u64 {
        self.0 & MAX_ASN
    }

    pub fn is_wildcard(self) -> bool {
        self.isd() == 0 || self.asn() == 0
    }
}

impl fmt::Display for IsdAsn {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let asn = self.asn();
        if asn <= MAX_BGP_ASN {
            return write!(f, "{}-{}", self.isd(), asn);
        }
        let group = |i: u32| (asn >> (ASN_GROUP_BITS * i)) & 0xffff;
        write!(f, "{}-{:x}:{:x}:{:x}", self.isd(), group(2), group(1), group(0))
    }
}

fn parse_asn(raw: &str) -> Result<u64, CoreError> {
    if !raw.contains(':') {
        let asn = raw
            .parse::<u64>()
            .map_err(|_| CoreError::InvalidInput("AS number is not decimal"))?;
        if asn > MAX_BGP_ASN {
            return Err(CoreError::InvalidInput("decimal AS number exceeds 32 bits"));
        }
        return Ok(asn);
    }

    let groups: Vec<&str> = raw.split(':').collect();
    if groups.len() != ASN_GROUPS {
        return Err(CoreError::InvalidInput("AS number needs three hex groups"));
    }
    let mut asn = 0_u64;
    for group in groups {
        let value = u16::from_str_radix(group, 16)
            .map_err(|_| CoreError::InvalidInput("AS group is not 16-bit hex"))?;
        asn = (asn << ASN_GROUP_BITS) | u64::from(value);
    }
    Ok(asn)
}

impl FromStr for IsdAsn {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (isd, asn) = s
            .split_once('-')
            .ok_or(CoreError::InvalidInput("ISD-AS requires a '-' separator"))?;
        let isd = isd
            .parse::<u16>()
            .map_err(|_| CoreError::InvalidInput("ISD is not a 16-bit number"))?;
        IsdAsn::new(isd, parse_asn(asn)?)
    }
}
