//! Error types for cryptographic operations.

use thiserror::Error;

/// Errors that can occur during cryptographic operations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CryptoError {
    #[error("Value out of range: {0}")]
    DomainRange(String),

    #[error("Point not on curve")]
    InvalidPoint,

    #[error("Invalid scalar encoding: {0}")]
    InvalidScalar(String),

    #[error("Unsupported curve: {0} does not match BN254")]
    UnsupportedCurve(&'static str),

    #[error("Inconsistent curve parameters: {0}")]
    InconsistentParameters(&'static str),
}
