//! pathwire wire codec.
//!
//! Defines the path-service request/reply schemas, the host and path
//! metadata they carry, and the discriminated payload envelope with its CBOR
//! encode/decode helpers.

pub mod error;
pub mod host_info;
pub mod info;
pub mod path;
pub mod payload;
pub mod revocation;

pub use error::{CodecError, DecodeError};
pub use host_info::HostInfo;
pub use payload::{decode_payload, describe_raw, encode_payload, Payload, PayloadBody, Which};
