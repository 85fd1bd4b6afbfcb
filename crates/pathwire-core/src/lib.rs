//! Core pathwire primitives shared across crates.
//!
//! Includes the ISD-AS identifier, generic host addresses, block padding,
//! and base errors.

pub mod error;
pub mod host;
pub mod ia;
pub mod padding;

pub use error::CoreError;
pub use host::{HostAddr, HostType};
pub use ia::{IsdAsn, ASN_BITS, MAX_ASN, MAX_ISD};
pub use padding::{apply_padding, compute_padding, pad_to_block};
