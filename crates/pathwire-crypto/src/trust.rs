//! Capabilities through which the trust subsystem hands out key material.
//!
//! The signing code only sees these traits; which backend stores CA
//! certificates or issues signers is up to the caller.

use std::time::{SystemTime, UNIX_EPOCH};

use pathwire_core::IsdAsn;
use thiserror::Error;

use crate::sign::{SignError, SignS};
use crate::signing::{Ed25519Signer, Signer};

#[derive(Debug, Error, PartialEq, Eq)]
pub enum TrustError {
    #[error("no CA certificates available")]
    NoCertificates,
    #[error("no CA certificate valid at {0}")]
    NoValidCertificate(u64),
    #[error("trust backend error: {0}")]
    Backend(String),
}

/// CA certificate reduced to what signing and verification need.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CaCert {
    pub subject: IsdAsn,
    pub public_key: [u8; 32],
    /// Validity start, seconds since the Unix epoch.
    pub not_before: u64,
    /// Validity end (exclusive), seconds since the Unix epoch.
    pub not_after: u64,
}

impl CaCert {
    pub fn valid_at(&self, now: u64) -> bool {
        self.not_before <= now && now < self.not_after
    }
}

/// Signing policy derived from the current CA certificates.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CaPolicy {
    pub cert: CaCert,
}

impl CaPolicy {
    pub fn subject(&self) -> IsdAsn {
        self.cert.subject
    }

    /// Public key messages signed under this policy verify against.
    pub fn verifying_key(&self) -> [u8; 32] {
        self.cert.public_key
    }

    /// Verifies `sign` over `message` with this policy's key.
    pub fn verify(&self, sign: &SignS, message: &[u8]) -> Result<(), SignError> {
        sign.verify(&self.verifying_key(), message)
    }
}

/// Fetches the currently known CA certificates.
pub trait CaCertProvider {
    fn ca_certs(&self) -> Result<Vec<CaCert>, TrustError>;
}

/// Derives a signing policy from CA certificates.
pub trait PolicyGen {
    fn generate(&self) -> Result<CaPolicy, TrustError>;
}

/// Produces a signer for outgoing control-plane messages.
pub trait SignerGen {
    fn generate(&self) -> Result<Box<dyn Signer + Send + Sync>, TrustError>;
}

/// In-memory certificate set.
#[derive(Debug, Clone, Default)]
pub struct StaticCertProvider {
    certs: Vec<CaCert>,
}

impl StaticCertProvider {
    pub fn new(certs: Vec<CaCert>) -> Self {
        Self { certs }
    }
}

impl CaCertProvider for StaticCertProvider {
    fn ca_certs(&self) -> Result<Vec<CaCert>, TrustError> {
        Ok(self.certs.clone())
    }
}

/// Picks the currently valid certificate that stays valid the longest.
#[derive(Debug, Clone)]
pub struct LatestCertPolicyGen<P> {
    provider: P,
    fixed_now: Option<u64>,
}

impl<P: CaCertProvider> LatestCertPolicyGen<P> {
    pub fn new(provider: P) -> Self {
        Self {
            provider,
            fixed_now: None,
        }
    }

    /// Evaluates validity at `now` instead of the wall clock.
    pub fn at(provider: P, now: u64) -> Self {
        Self {
            provider,
            fixed_now: Some(now),
        }
    }

    fn now(&self) -> u64 {
        self.fixed_now.unwrap_or_else(|| {
            SystemTime::now()
                .duration_since(UNIX_EPOCH)
                .unwrap_or_default()
                .as_secs()
        })
    }
}

impl<P: CaCertProvider> PolicyGen for LatestCertPolicyGen<P> {
    fn generate(&self) -> Result<CaPolicy, TrustError> {
        let certs = self.provider.ca_certs()?;
        if certs.is_empty() {
            return Err(TrustError::NoCertificates);
        }
        let now = self.now();
        let cert = certs
            .into_iter()
            .filter(|cert| cert.valid_at(now))
            .max_by_key(|cert| cert.not_after)
            .ok_or(TrustError::NoValidCertificate(now))?;
        tracing::debug!(subject = %cert.subject, not_after = cert.not_after, "selected CA certificate");
        Ok(CaPolicy { cert })
    }
}

/// Hands out Ed25519 signers for a fixed secret key.
#[derive(Debug, Clone)]
pub struct StaticSignerGen {
    secret: [u8; 32],
}

impl StaticSignerGen {
    pub fn new(secret: [u8; 32]) -> Self {
        Self { secret }
    }
}

impl SignerGen for StaticSignerGen {
    fn generate(&self) -> Result<Box<dyn Signer + Send + Sync>, TrustError> {
        Ok(Box::new(Ed25519Signer::from_secret(self.secret)))
    }
}
