use ed25519_dalek::{
    Signature as DalekSignature, Signer as DalekSignerTrait, SigningKey,
    Verifier as DalekVerifierTrait, VerifyingKey, KEYPAIR_LENGTH, SECRET_KEY_LENGTH,
};
use rand::rngs::OsRng;
use thiserror::Error;

/// Errors returned by signing/verification helpers.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum SigningError {
    /// Pubkey bytes are not a valid Ed25519 verifying key.
    #[error("invalid public key bytes")]
    InvalidPublicKey,
    /// Secret key is neither a 32-byte seed nor a 64-byte keypair.
    #[error("invalid secret key bytes (len {0})")]
    InvalidSecretKey(usize),
}

/// Trait for message signing backends.
pub trait Signer {
    /// Signs `msg` and returns a 64-byte signature.
    fn sign(&self, msg: &[u8]) -> Result<[u8; 64], SigningError>;
    /// Returns the signer's raw 32-byte public key.
    fn public_key(&self) -> [u8; 32];
}

/// Trait for signature verification backends.
pub trait Verifier {
    /// Verifies a signature against `(pubkey, msg)`.
    fn verify(&self, pubkey: [u8; 32], msg: &[u8], sig: [u8; 64]) -> Result<bool, SigningError>;
}

/// Ed25519 signing implementation backed by `ed25519-dalek`.
#[derive(Debug, Clone)]
pub struct Ed25519Signer {
    signing_key: SigningKey,
}

impl Ed25519Signer {
    /// Creates a signer from a 32-byte secret key.
    pub fn from_secret(secret: [u8; 32]) -> Self {
        Self {
            signing_key: SigningKey::from_bytes(&secret),
        }
    }

    /// Creates a signer from raw key bytes: a 32-byte seed or a 64-byte
    /// seed-plus-public-key pair.
    pub fn from_key_bytes(key: &[u8]) -> Result<Self, SigningError> {
        match key.len() {
            SECRET_KEY_LENGTH => {
                let mut seed = [0_u8; SECRET_KEY_LENGTH];
                seed.copy_from_slice(key);
                Ok(Self::from_secret(seed))
            }
            KEYPAIR_LENGTH => {
                let mut pair = [0_u8; KEYPAIR_LENGTH];
                pair.copy_from_slice(key);
                let signing_key = SigningKey::from_keypair_bytes(&pair)
                    .map_err(|_| SigningError::InvalidSecretKey(key.len()))?;
                Ok(Self { signing_key })
            }
            len => Err(SigningError::InvalidSecretKey(len)),
        }
    }

    /// Generates a fresh key from the OS random source.
    pub fn generate() -> Self {
        Self {
            signing_key: SigningKey::generate(&mut OsRng),
        }
    }

    /// Returns the 32-byte secret seed.
    pub fn secret_bytes(&self) -> [u8; 32] {
        self.signing_key.to_bytes()
    }
}

impl Signer for Ed25519Signer {
    fn sign(&self, msg: &[u8]) -> Result<[u8; 64], SigningError> {
        let signature = self.signing_key.sign(msg);
        Ok(signature.to_bytes())
    }

    fn public_key(&self) -> [u8; 32] {
        self.signing_key.verifying_key().to_bytes()
    }
}

/// Stateless Ed25519 verifier.
#[derive(Debug, Default, Clone, Copy)]
pub struct Ed25519Verifier;

impl Verifier for Ed25519Verifier {
    fn verify(&self, pubkey: [u8; 32], msg: &[u8], sig: [u8; 64]) -> Result<bool, SigningError> {
        let verifying_key =
            VerifyingKey::from_bytes(&pubkey).map_err(|_| SigningError::InvalidPublicKey)?;
        let signature = DalekSignature::from_bytes(&sig);
        Ok(verifying_key.verify(msg, &signature).is_ok())
    }
}
