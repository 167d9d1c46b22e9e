//! User-facing failure classes for the two flows.
//!
//! The `Display` strings here are what a UI adapter renders. Cryptographic
//! and framing failures deliberately share one generic message: revealing
//! whether the key was wrong or the data corrupted would hand an attacker a
//! decryption oracle.

use linkseal_crypto::CryptoError;
use linkseal_proto::PayloadError;
use thiserror::Error;

/// Why a submission did not produce a share link.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SubmitFailure {
    /// The draft exceeds the configured maximum. Caught before sealing;
    /// no key was consumed and no network call was made.
    #[error("secret too large: {size} bytes, maximum is {max}")]
    InputTooLarge {
        /// Draft content size in bytes.
        size: usize,
        /// Configured maximum.
        max: usize,
    },

    /// A text draft with no content.
    #[error("message cannot be empty")]
    EmptyDraft,

    /// No secure random source; encryption is disabled outright.
    #[error("encryption unavailable in this context")]
    CryptoUnavailable,

    /// The draft could not be encoded (e.g. metadata too long).
    #[error("invalid draft: {reason}")]
    InvalidDraft {
        /// What the encoder objected to.
        reason: String,
    },

    /// The server rejected the write as invalid. The sealed blob is kept
    /// so a corrected resubmission does not re-encrypt.
    #[error("submission rejected: {reason}")]
    Rejected {
        /// Server-reported reason.
        reason: String,
    },

    /// Transport-level failure. The flow has been reset; the next attempt
    /// starts from fresh plaintext.
    #[error("submission failed, please try again")]
    Transport,
}

/// Why a retrieval did not render a secret.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RetrieveFailure {
    /// Server-reported wrong credential. Retryable.
    #[error("wrong PIN, please try again")]
    AccessDenied,

    /// Opening or parsing the blob failed. One message for wrong key and
    /// corrupted data, by design. Retryable.
    #[error("decryption failed: the key may be incorrect or the data corrupted")]
    DecryptFailed,

    /// Transport-level failure. Retryable.
    #[error("failed to load the message, please try again")]
    Transport,

    /// No secure crypto primitives in this context. Not retryable.
    #[error("encryption unavailable in this context")]
    CryptoUnavailable,
}

/// Failure while turning a fetched blob back into a payload.
///
/// Internal to the runtime: by the time a [`RetrieveFailure`] reaches the
/// UI both variants have collapsed into the same generic message.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum OpenError {
    /// Key import or AEAD open failed.
    #[error(transparent)]
    Crypto(#[from] CryptoError),

    /// The decrypted bytes are not a valid payload (framing defect).
    #[error(transparent)]
    Payload(#[from] PayloadError),
}
