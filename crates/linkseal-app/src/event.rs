//! Flow input events.
//!
//! Events originate from two sources: user interactions (submit intents,
//! confirmation dialogs) and completions of the async work the runtime
//! performs on the flows' behalf (sealing, store calls).

use linkseal_client::{MessageLocator, StoreError};
use linkseal_crypto::SecretKey;
use linkseal_proto::Payload;

use crate::error::{OpenError, SubmitFailure};

/// Events processed by [`SubmitFlow`](crate::SubmitFlow).
#[derive(Debug, Clone)]
pub enum SubmitEvent {
    /// The one-time crypto availability probe failed; disable the form.
    CryptoMissing,

    /// User asked to submit a draft secret.
    SubmitRequested {
        /// The plaintext draft (text or file).
        draft: Payload,
        /// PIN as typed; empty means no PIN.
        pin: String,
    },

    /// User confirmed proceeding without a PIN.
    NoPinConfirmed,

    /// User cancelled the no-PIN confirmation.
    NoPinCancelled,

    /// Sealing finished: the key that sealed and the transport blob.
    SealCompleted {
        /// Key to later attach to the share link.
        key: SecretKey,
        /// Sealed transport blob (replaces the plaintext field).
        blob: String,
    },

    /// Sealing failed before any network call.
    SealFailed {
        /// What went wrong, already user-facing.
        failure: SubmitFailure,
    },

    /// The server accepted the write and returned a locator.
    LocatorReceived {
        /// Where the blob now lives.
        locator: MessageLocator,
    },

    /// The server rejected the write as invalid (validation error).
    SubmitRejected {
        /// Server-reported reason.
        reason: String,
    },

    /// Transport-level failure (abort, timeout, network).
    TransportFailed {
        /// The underlying store error.
        error: StoreError,
    },

    /// User dismissed the result view without completing the exchange.
    ResultDismissed,
}

/// Events processed by [`RetrieveFlow`](crate::RetrieveFlow).
#[derive(Debug, Clone)]
pub enum RetrieveEvent {
    /// No secure crypto primitives; the encrypted path cannot run.
    CryptoMissing,

    /// User submitted an access credential.
    CredentialSubmitted {
        /// PIN as typed; empty means none.
        pin: String,
    },

    /// The store returned the sealed blob.
    BlobFetched {
        /// Sealed transport blob.
        blob: String,
    },

    /// The store refused or failed.
    FetchFailed {
        /// Error class drives retryable vs terminal handling.
        error: StoreError,
    },

    /// Opening and parsing succeeded.
    Opened {
        /// The decrypted payload.
        payload: Payload,
    },

    /// Opening or parsing failed after a successful fetch.
    OpenFailed {
        /// Crypto or framing error; collapsed into one message for the UI.
        error: OpenError,
    },
}
