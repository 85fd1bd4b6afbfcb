use thiserror::Error;

use crate::host::HostType;

/// Shared lightweight error type for core primitive operations.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum CoreError {
    /// Invalid caller input or malformed primitive value.
    #[error("invalid input: {0}")]
    InvalidInput(&'static str),
    /// Buffer too small for the requested write.
    #[error("out of bounds: required {required} bytes, capacity {capacity}")]
    OutOfBounds { required: usize, capacity: usize },
    /// Host address family that cannot be represented.
    #[error("unsupported address family: {0}")]
    UnsupportedAddressFamily(HostType),
}
