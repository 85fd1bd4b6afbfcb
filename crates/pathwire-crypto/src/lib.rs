//! Signing for pathwire control-plane messages.
//!
//! Includes the detached-signature envelope, Ed25519 signing/verification
//! backends, and the trust capabilities that supply key material.

pub mod sign;
pub mod signing;
pub mod trust;

pub use sign::{SignError, SignS, SignType, SignedBlobS};
pub use signing::{Ed25519Signer, Ed25519Verifier, Signer, SigningError, Verifier};
