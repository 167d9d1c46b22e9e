//! Error types for the storage-service boundary.
//!
//! Strongly typed so orchestration logic can branch on error class without
//! string matching: wrong credential, permanently gone, transport trouble,
//! and server-side validation each drive a different recovery path.

use thiserror::Error;

/// Errors reported by a [`SecretStore`](crate::SecretStore).
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StoreError {
    /// The access credential (PIN) was wrong. The blob is NOT consumed;
    /// the caller may retry with a corrected credential.
    #[error("access denied: wrong credential")]
    AccessDenied,

    /// The blob no longer exists: already read once, or expired. There is
    /// nothing to retry against.
    #[error("message gone: already read or expired")]
    Gone,

    /// The server rejected the write as invalid (e.g. a bad expiry value).
    #[error("request rejected: {reason}")]
    Rejected {
        /// Server-reported reason, safe to show the user.
        reason: String,
    },

    /// Network-level failure.
    #[error("network failure: {0}")]
    Network(String),

    /// The request timed out.
    #[error("request timed out")]
    Timeout,

    /// The request was aborted before completing.
    #[error("request aborted")]
    Aborted,
}

impl StoreError {
    /// Returns true if the underlying resource is permanently unavailable.
    ///
    /// A terminal error offers no retry path: the blob has been deleted.
    /// Everything else is either user-correctable (`AccessDenied`,
    /// `Rejected`) or transient transport trouble.
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Gone)
    }

    /// Returns true for transport-level failures (abort, timeout, network).
    ///
    /// During submission these force a full reset of the encryption state:
    /// the next attempt must start from fresh plaintext with a fresh key,
    /// never resubmit stale ciphertext.
    pub fn is_transport(&self) -> bool {
        matches!(self, Self::Network(_) | Self::Timeout | Self::Aborted)
    }
}
