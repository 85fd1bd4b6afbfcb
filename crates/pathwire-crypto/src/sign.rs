//! Detached-signature envelope for control-plane messages.
//!
//! A [`SignS`] names its signing scheme and the source of the verification
//! key, and carries the signature and signing time. [`SignedBlobS`] pairs an
//! opaque blob with the envelope that authenticates it.

use std::fmt;
use std::str::FromStr;
use std::time::{Duration, SystemTime, UNIX_EPOCH};

use serde::{Deserialize, Deserializer, Serialize};
use thiserror::Error;

use crate::signing::{Ed25519Signer, Ed25519Verifier, Signer, SigningError, Verifier};

const ED25519_PUBLIC_KEY_LEN: usize = 32;
const ED25519_SIGNATURE_LEN: usize = 64;
/// First second of year 10000; later timestamps render as raw seconds.
const RFC3339_LIMIT_SECS: u64 = 253_402_300_800;
const BLOB_PREVIEW_LEN: usize = 20;

/// Signing scheme of a [`SignS`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "u16", into = "u16")]
pub enum SignType {
    /// No signature; verification always succeeds.
    None,
    Ed25519,
    /// Scheme value this implementation does not know.
    Unsupported(u16),
}

impl From<u16> for SignType {
    fn from(raw: u16) -> Self {
        match raw {
            0 => SignType::None,
            1 => SignType::Ed25519,
            other => SignType::Unsupported(other),
        }
    }
}

impl From<SignType> for u16 {
    fn from(sign_type: SignType) -> Self {
        match sign_type {
            SignType::None => 0,
            SignType::Ed25519 => 1,
            SignType::Unsupported(raw) => raw,
        }
    }
}

impl fmt::Display for SignType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SignType::None => f.write_str("none"),
            SignType::Ed25519 => f.write_str("ed25519"),
            SignType::Unsupported(raw) => write!(f, "SignType({raw})"),
        }
    }
}

impl FromStr for SignType {
    type Err = SignError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "none" => Ok(SignType::None),
            "ed25519" => Ok(SignType::Ed25519),
            _ => Err(SignError::UnknownSchemeName(s.to_string())),
        }
    }
}

/// Errors returned by envelope signing and verification.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum SignError {
    #[error("unsupported sign type: {0}")]
    UnsupportedScheme(SignType),
    #[error("unknown sign type name: {0}")]
    UnknownSchemeName(String),
    /// Signature does not authenticate the message under the given key.
    #[error("signature verification failed")]
    Verification,
    #[error("invalid sign source: {0}")]
    InvalidSource(&'static str),
    #[error(transparent)]
    Key(#[from] SigningError),
}

/// Checks the `WORD: METADATA` shape of a signature source.
///
/// The prefix must be one or more word characters followed by `": "`; the
/// metadata after it is unrestricted.
pub fn validate_src(src: &str) -> Result<(), SignError> {
    let (word, _) = src
        .split_once(": ")
        .ok_or(SignError::InvalidSource("missing \": \" separator"))?;
    if word.is_empty() {
        return Err(SignError::InvalidSource("empty source prefix"));
    }
    if !word.chars().all(|c| c.is_ascii_alphanumeric() || c == '_') {
        return Err(SignError::InvalidSource("source prefix must be a single word"));
    }
    Ok(())
}

fn deserialize_src<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    let src = String::deserialize(deserializer)?;
    validate_src(&src).map_err(serde::de::Error::custom)?;
    Ok(src)
}

fn unix_now() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_secs()
}

fn render_timestamp(secs: u64) -> String {
    if secs >= RFC3339_LIMIT_SECS {
        return secs.to_string();
    }
    humantime::format_rfc3339_seconds(UNIX_EPOCH + Duration::from_secs(secs)).to_string()
}

/// Signature metadata plus detached signature bytes.
///
/// Created unsigned with [`SignS::new`]; [`SignS::sign_and_set`] stamps the
/// time and stores the signature. Re-signing uses a fresh instance.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SignS {
    /// Signing time, seconds since the Unix epoch.
    timestamp: u64,
    sign_type: SignType,
    /// Where the verification key comes from, as `WORD: METADATA`.
    #[serde(deserialize_with = "deserialize_src")]
    src: String,
    #[serde(with = "serde_bytes")]
    signature: Vec<u8>,
}

impl SignS {
    pub fn new(sign_type: SignType, src: impl Into<String>) -> Result<Self, SignError> {
        let src = src.into();
        validate_src(&src)?;
        Ok(Self {
            timestamp: 0,
            sign_type,
            src,
            signature: Vec::new(),
        })
    }

    pub fn timestamp(&self) -> u64 {
        self.timestamp
    }

    pub fn sign_type(&self) -> SignType {
        self.sign_type
    }

    pub fn src(&self) -> &str {
        &self.src
    }

    pub fn signature(&self) -> &[u8] {
        &self.signature
    }

    /// Attaches a signature received out of band, e.g. next to a blob.
    pub fn with_signature(mut self, timestamp: u64, signature: Vec<u8>) -> Self {
        self.timestamp = timestamp;
        self.signature = signature;
        self
    }

    /// Signs `message` with raw secret key bytes under this envelope's
    /// scheme. Does not modify the envelope.
    pub fn sign(&self, key: &[u8], message: &[u8]) -> Result<Vec<u8>, SignError> {
        match self.sign_type {
            SignType::None => Ok(Vec::new()),
            SignType::Ed25519 => {
                let signer = Ed25519Signer::from_key_bytes(key)?;
                Ok(signer.sign(message)?.to_vec())
            }
            SignType::Unsupported(_) => {
                tracing::warn!(sign_type = %self.sign_type, "sign with unsupported scheme");
                Err(SignError::UnsupportedScheme(self.sign_type))
            }
        }
    }

    /// Signs `message` through a signer handed out by the trust layer.
    pub fn sign_with(&self, signer: &dyn Signer, message: &[u8]) -> Result<Vec<u8>, SignError> {
        match self.sign_type {
            SignType::None => Ok(Vec::new()),
            SignType::Ed25519 => Ok(signer.sign(message)?.to_vec()),
            SignType::Unsupported(_) => Err(SignError::UnsupportedScheme(self.sign_type)),
        }
    }

    /// Stamps the current time, then signs `message` and stores the result.
    pub fn sign_and_set(&mut self, key: &[u8], message: &[u8]) -> Result<(), SignError> {
        self.sign_and_set_at(key, message, unix_now())
    }

    /// Like [`SignS::sign_and_set`] with an explicit timestamp.
    ///
    /// The timestamp is written even when signing fails; the signature is
    /// only replaced on success.
    pub fn sign_and_set_at(
        &mut self,
        key: &[u8],
        message: &[u8],
        timestamp: u64,
    ) -> Result<(), SignError> {
        self.timestamp = timestamp;
        self.signature = self.sign(key, message)?;
        Ok(())
    }

    /// Stamps the current time and stores a signature from `signer`.
    pub fn sign_and_set_with(&mut self, signer: &dyn Signer, message: &[u8]) -> Result<(), SignError> {
        self.timestamp = unix_now();
        self.signature = self.sign_with(signer, message)?;
        Ok(())
    }

    /// Verifies the stored signature over `message` with raw public key
    /// bytes. Scheme `none` accepts everything.
    pub fn verify(&self, key: &[u8], message: &[u8]) -> Result<(), SignError> {
        match self.sign_type {
            SignType::None => Ok(()),
            SignType::Ed25519 => {
                let pubkey: [u8; ED25519_PUBLIC_KEY_LEN] = key
                    .try_into()
                    .map_err(|_| SigningError::InvalidPublicKey)?;
                let Ok(sig) = <[u8; ED25519_SIGNATURE_LEN]>::try_from(self.signature.as_slice())
                else {
                    tracing::warn!(len = self.signature.len(), src = %self.src, "signature has wrong length");
                    return Err(SignError::Verification);
                };
                if Ed25519Verifier.verify(pubkey, message, sig)? {
                    Ok(())
                } else {
                    tracing::warn!(src = %self.src, "signature rejected");
                    Err(SignError::Verification)
                }
            }
            SignType::Unsupported(_) => {
                tracing::warn!(sign_type = %self.sign_type, "verify with unsupported scheme");
                Err(SignError::UnsupportedScheme(self.sign_type))
            }
        }
    }

    /// Canonical bytes: big-endian timestamp, scheme name, source, signature.
    pub fn pack(&self) -> Vec<u8> {
        let scheme = self.sign_type.to_string();
        let mut raw =
            Vec::with_capacity(8 + scheme.len() + self.src.len() + self.signature.len());
        raw.extend_from_slice(&self.timestamp.to_be_bytes());
        raw.extend_from_slice(scheme.as_bytes());
        raw.extend_from_slice(self.src.as_bytes());
        raw.extend_from_slice(&self.signature);
        raw
    }
}

impl fmt::Display for SignS {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "SignType: {} Timestamp: {} SignSrc: {} Signature: {}",
            self.sign_type,
            render_timestamp(self.timestamp),
            self.src,
            hex::encode(&self.signature)
        )
    }
}

/// Opaque blob with the envelope that authenticates it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SignedBlobS {
    #[serde(with = "serde_bytes")]
    pub blob: Vec<u8>,
    pub sign: SignS,
}

impl SignedBlobS {
    /// Signs `blob` with `key` under `sign`'s scheme.
    pub fn new_signed(blob: Vec<u8>, mut sign: SignS, key: &[u8]) -> Result<Self, SignError> {
        sign.sign_and_set(key, &blob)?;
        Ok(Self { blob, sign })
    }

    /// Checks the envelope's signature over the blob.
    pub fn verify(&self, key: &[u8]) -> Result<(), SignError> {
        self.sign.verify(key, &self.blob)
    }

    /// Canonical bytes: blob followed by the packed envelope.
    pub fn pack(&self) -> Vec<u8> {
        let sign = self.sign.pack();
        let mut raw = Vec::with_capacity(self.blob.len() + sign.len());
        raw.extend_from_slice(&self.blob);
        raw.extend_from_slice(&sign);
        raw
    }
}

impl fmt::Display for SignedBlobS {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let preview = &self.blob[..self.blob.len().min(BLOB_PREVIEW_LEN)];
        write!(f, "Blob: {} Sign: {}", hex::encode(preview), self.sign)
    }
}
