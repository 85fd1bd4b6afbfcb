use config::{Config, ConfigError, Environment, File};
use pathwire_crypto::sign::validate_src;
use pathwire_crypto::{SignError, SignType};
use serde::Deserialize;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Deserialize, Clone, PartialEq, Eq)]
pub struct ToolConfig {
    pub block_size: usize,
    pub sign_type: String,
    pub sign_src: String,
    pub secret_key_path: PathBuf,
    pub public_key_path: PathBuf,
    pub max_paths: u16,
}

/// A loaded config whose values are unusable.
#[derive(Debug, Error)]
pub enum InvalidConfig {
    #[error("block_size must be greater than zero")]
    ZeroBlockSize,
    #[error("sign_type: {0}")]
    SignType(SignError),
    #[error("sign_src: {0}")]
    SignSrc(SignError),
    #[error("max_paths must be greater than zero")]
    ZeroMaxPaths,
    #[error("{0} must not be empty")]
    EmptyPath(&'static str),
}

const SAMPLE: &str = r#"# Padding block size in bytes applied by `pad`.
block_size = 16

# Signature scheme: "none" or "ed25519".
sign_type = "ed25519"

# Signature source, formatted as "WORD: metadata".
sign_src = "KEY: local"

# Hex-encoded Ed25519 secret seed written by `keygen`.
secret_key_path = "data/signing.key"

# Hex-encoded Ed25519 public key written by `keygen`.
public_key_path = "data/signing.pub"

# Paths requested by `path-req`.
max_paths = 5
"#;

impl ToolConfig {
    pub fn new(config_path: Option<PathBuf>) -> Result<Self, ConfigError> {
        let mut builder = Config::builder()
            .set_default("block_size", 16)?
            .set_default("sign_type", "ed25519")?
            .set_default("sign_src", "KEY: local")?
            .set_default("secret_key_path", "data/signing.key")?
            .set_default("public_key_path", "data/signing.pub")?
            .set_default("max_paths", 5)?;

        if let Some(path) = config_path {
            tracing::debug!("loading config from {}", path.display());
            builder = builder.add_source(File::from(path));
        }

        builder = builder.add_source(Environment::with_prefix("PATHWIRE").try_parsing(true));

        builder.build()?.try_deserialize()
    }

    /// Commented TOML carrying the default values.
    pub fn sample() -> &'static str {
        SAMPLE
    }

    pub fn validate(&self) -> Result<(), InvalidConfig> {
        if self.block_size == 0 {
            return Err(InvalidConfig::ZeroBlockSize);
        }
        self.sign_type().map_err(InvalidConfig::SignType)?;
        validate_src(&self.sign_src).map_err(InvalidConfig::SignSrc)?;
        if self.max_paths == 0 {
            return Err(InvalidConfig::ZeroMaxPaths);
        }
        if self.secret_key_path.as_os_str().is_empty() {
            return Err(InvalidConfig::EmptyPath("secret_key_path"));
        }
        if self.public_key_path.as_os_str().is_empty() {
            return Err(InvalidConfig::EmptyPath("public_key_path"));
        }
        Ok(())
    }

    pub fn sign_type(&self) -> Result<SignType, SignError> {
        self.sign_type.parse()
    }
}
