//! Error types for key handling and sealing.

use thiserror::Error;

/// Errors produced by the cryptographic core.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CryptoError {
    /// The OS secure random source is unavailable or failed.
    ///
    /// Checked once up front via [`ensure_available`](crate::ensure_available);
    /// callers disable the encrypting surface entirely rather than retry.
    #[error("secure random source unavailable")]
    Unavailable,

    /// A key string did not decode to exactly 16 bytes.
    #[error("invalid key: expected 16 decoded bytes")]
    InvalidKey,

    /// A transport blob is not base64url or is too short to contain an IV
    /// and an authentication tag.
    #[error("malformed transport blob")]
    MalformedBlob,

    /// Authentication tag mismatch while opening a blob.
    ///
    /// Covers both a wrong key and tampered/corrupted ciphertext. The two
    /// are indistinguishable on purpose; do not try to tell them apart.
    #[error("authentication failed: wrong key or corrupted data")]
    AuthenticationFailed,
}
