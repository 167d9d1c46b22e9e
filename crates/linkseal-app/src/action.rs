//! Flow side-effects and intents.
//!
//! Actions are instructions produced by the state machines for the runtime
//! (crypto and store work) or a UI adapter (focus, errors, rendering) to
//! execute. The flows themselves perform no I/O.

use linkseal_proto::Payload;

use crate::error::{RetrieveFailure, SubmitFailure};

/// Actions produced by [`SubmitFlow`](crate::SubmitFlow).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitAction {
    /// Disable the whole form: encryption is unavailable here.
    DisableForm,

    /// Ask the user to confirm sharing without a PIN.
    PromptNoPinConfirm,

    /// Return focus to the PIN field.
    FocusPin,

    /// Seal this draft: generate a key, encode, encrypt.
    Seal {
        /// The plaintext draft.
        draft: Payload,
    },

    /// Replace the plaintext field's content with the sealed blob.
    ///
    /// Always precedes [`SubmitAction::ReleaseSubmission`] so the
    /// substitution is complete before any request can fire.
    SubstituteField {
        /// Sealed transport blob.
        blob: String,
    },

    /// Let exactly one previously suspended submission proceed.
    ReleaseSubmission,

    /// Show the shareable link, key already in the fragment.
    PresentShareLink {
        /// Full share URL: `<base>/message/<id>#<key>`.
        url: String,
    },

    /// Surface a failure to the user.
    ShowError {
        /// User-facing failure class.
        failure: SubmitFailure,
    },

    /// Clear the (possibly ciphertext-bearing) form fields.
    ClearForm,
}

/// Actions produced by [`RetrieveFlow`](crate::RetrieveFlow).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RetrieveAction {
    /// No key in the fragment: hand the page over to the server-side
    /// decryption flow (external collaborator).
    DelegateToServerFlow,

    /// Disable the submit control while a fetch is in flight.
    DisableSubmit,

    /// Re-enable the submit control after a retryable failure.
    EnableSubmit,

    /// Fetch the sealed blob with this credential.
    FetchBlob {
        /// PIN, if one was entered.
        pin: Option<String>,
    },

    /// Open this blob with the fragment key and parse the payload.
    Open {
        /// Sealed transport blob.
        blob: String,
        /// Key string read from the URL fragment.
        key: String,
    },

    /// Render decrypted text read-only.
    RenderText {
        /// The secret text.
        content: String,
    },

    /// Trigger a local save of the decrypted file.
    SaveFile {
        /// Filename for the download.
        filename: String,
        /// MIME content type.
        content_type: String,
        /// Raw file bytes.
        data: Vec<u8>,
    },

    /// Clear the credential field.
    ClearCredential,

    /// Return focus to the credential field.
    FocusCredential,

    /// Surface a retryable failure to the user.
    ShowError {
        /// User-facing failure class.
        failure: RetrieveFailure,
    },

    /// Replace the interactive surface with a static "gone" explanation.
    /// There is no retry: the blob has been permanently deleted.
    ShowGone,
}
