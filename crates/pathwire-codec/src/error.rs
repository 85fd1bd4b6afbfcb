use std::io;

use thiserror::Error;

/// Reasons a received payload could not be decoded.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DecodeError {
    /// Input ended before a complete value was read.
    #[error("truncated input")]
    Truncated,
    /// Bytes are not a well-formed payload.
    #[error("malformed input: {0}")]
    Malformed(String),
    /// Discriminant does not name any known message kind.
    #[error("unknown discriminant: {0}")]
    UnknownDiscriminant(u16),
    /// Host info does not carry exactly one usable address.
    #[error("invalid host info: {0}")]
    InvalidHostInfo(&'static str),
}

impl From<ciborium::de::Error<io::Error>> for DecodeError {
    fn from(err: ciborium::de::Error<io::Error>) -> Self {
        match err {
            ciborium::de::Error::Io(io_err) if io_err.kind() == io::ErrorKind::UnexpectedEof => {
                DecodeError::Truncated
            }
            other => DecodeError::Malformed(other.to_string()),
        }
    }
}

/// Errors returned by payload codec operations.
#[derive(Debug, Error)]
pub enum CodecError {
    /// CBOR serialization failure.
    #[error("encode error: {0}")]
    Encode(String),
    #[error(transparent)]
    Decode(#[from] DecodeError),
}

#[cfg(test)]
mod tests {
    use super::{CodecError, DecodeError};

    #[test]
    fn error_messages_are_stable() {
        assert_eq!(DecodeError::Truncated.to_string(), "truncated input");
        assert_eq!(
            DecodeError::UnknownDiscriminant(42).to_string(),
            "unknown discriminant: 42"
        );
        assert_eq!(
            CodecError::from(DecodeError::InvalidHostInfo("no address")).to_string(),
            "invalid host info: no address"
        );
    }

    #[test]
    fn eof_maps_to_truncated() {
        let err = ciborium::de::Error::Io(std::io::Error::from(
            std::io::ErrorKind::UnexpectedEof,
        ));
        assert_eq!(DecodeError::from(err), DecodeError::Truncated);
    }

    #[test]
    fn syntax_errors_map_to_malformed() {
        let err: ciborium::de::Error<std::io::Error> = ciborium::de::Error::Syntax(3);
        assert!(matches!(DecodeError::from(err), DecodeError::Malformed(_)));
    }
}
