//! Error types for payload encoding and decoding.
//!
//! Decode errors indicate a framing defect: the buffer was produced by
//! something that does not speak this format, or was corrupted after
//! authentication was stripped away. They are deliberately separate from
//! cryptographic errors, which live in the crypto layer.

use thiserror::Error;

/// Errors produced by [`Payload`](crate::Payload) encoding and decoding.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PayloadError {
    /// Discriminator byte is neither text nor file.
    #[error("unknown payload type: {found:#04x}")]
    UnknownType {
        /// The discriminator byte that was read.
        found: u8,
    },

    /// A declared length exceeds the remaining buffer, or the buffer ended
    /// before the discriminator.
    #[error("truncated payload: need {needed} bytes, {remaining} remaining")]
    Truncated {
        /// Bytes the format requires at this position.
        needed: usize,
        /// Bytes actually left in the buffer.
        remaining: usize,
    },

    /// Text content or file metadata is not valid UTF-8.
    #[error("payload contains invalid UTF-8 in {field}")]
    InvalidUtf8 {
        /// Which part of the payload failed to decode.
        field: &'static str,
    },

    /// Filename or content type does not fit a 2-byte length prefix.
    #[error("{field} is {len} bytes, exceeds the {max}-byte metadata limit")]
    MetadataTooLong {
        /// Which metadata string overflowed.
        field: &'static str,
        /// Its UTF-8 length.
        len: usize,
        /// The format limit (65535).
        max: usize,
    },
}
