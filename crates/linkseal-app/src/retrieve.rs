//! Fetch-then-decrypt state machine.
//!
//! Drives the receiving side: read the key from the URL fragment, fetch the
//! sealed blob with the user's credential, open and parse it, render text or
//! save a file. Failures split into retryable (wrong PIN, transport trouble,
//! undecryptable blob) and terminal (the blob is gone for good).
//!
//! # Invariants
//!
//! - Exactly one fetch per credential attempt; the submit control is
//!   disabled while one is in flight.
//! - A `Gone` store response is terminal: the flow ignores every further
//!   event and never issues another fetch.
//! - The fragment key is erased immediately after a successful open.

use linkseal_client::StoreError;
use linkseal_proto::Payload;
use zeroize::Zeroizing;

use crate::{
    action::RetrieveAction,
    error::RetrieveFailure,
    event::RetrieveEvent,
};

/// Retrieval flow states.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RetrieveState {
    /// No key in the fragment; the server-side flow owns this page.
    Delegated,
    /// Waiting for the user's credential.
    Idle,
    /// Blob fetch in flight; submit disabled.
    FetchingBlob,
    /// Blob fetched; opening and parsing in progress.
    Decrypting,
    /// Secret rendered (or file saved); the exchange is over.
    Rendered,
    /// Something failed.
    Errored {
        /// Terminal errors offer no retry: the blob no longer exists.
        terminal: bool,
    },
}

/// Fetch-then-decrypt state machine.
///
/// Pure: consumes [`RetrieveEvent`]s, produces [`RetrieveAction`]s. One
/// instance per message page, owned by the page controller.
#[derive(Debug)]
pub struct RetrieveFlow {
    state: RetrieveState,
    /// Key string from the URL fragment. Zeroized on erase/drop.
    key: Option<Zeroizing<String>>,
}

impl RetrieveFlow {
    /// Create a flow from the URL fragment, if any.
    ///
    /// A present, non-empty fragment selects the client-decryption path.
    /// Call [`RetrieveFlow::start`] afterwards to get the initial actions.
    pub fn from_fragment(fragment: Option<&str>) -> Self {
        match fragment {
            Some(key) if !key.is_empty() => Self {
                state: RetrieveState::Idle,
                key: Some(Zeroizing::new(key.to_owned())),
            },
            _ => Self { state: RetrieveState::Delegated, key: None },
        }
    }

    /// Initial actions for the page: none for the client path, a delegation
    /// for the server-side path.
    pub fn start(&self) -> Vec<RetrieveAction> {
        match self.state {
            RetrieveState::Delegated => vec![RetrieveAction::DelegateToServerFlow],
            _ => vec![],
        }
    }

    /// Current state.
    pub fn state(&self) -> RetrieveState {
        self.state
    }

    /// True while the fragment key is held in memory.
    pub fn holds_key(&self) -> bool {
        self.key.is_some()
    }

    /// Process an event and return actions for the runtime/UI to execute.
    pub fn handle(&mut self, event: RetrieveEvent) -> Vec<RetrieveAction> {
        if matches!(
            self.state,
            RetrieveState::Delegated | RetrieveState::Errored { terminal: true }
        ) {
            return vec![];
        }

        match event {
            RetrieveEvent::CryptoMissing => {
                self.key = None;
                self.state = RetrieveState::Errored { terminal: true };
                vec![
                    RetrieveAction::DisableSubmit,
                    RetrieveAction::ShowError { failure: RetrieveFailure::CryptoUnavailable },
                ]
            },
            RetrieveEvent::CredentialSubmitted { pin } => self.handle_credential(pin),
            RetrieveEvent::BlobFetched { blob } => self.handle_blob(blob),
            RetrieveEvent::FetchFailed { error } => self.handle_fetch_failed(&error),
            RetrieveEvent::Opened { payload } => self.handle_opened(payload),
            RetrieveEvent::OpenFailed { error } => {
                if self.state != RetrieveState::Decrypting {
                    return vec![];
                }
                tracing::debug!(%error, "open failed");
                self.retryable_error(RetrieveFailure::DecryptFailed)
            },
        }
    }

    fn handle_credential(&mut self, pin: String) -> Vec<RetrieveAction> {
        if !matches!(
            self.state,
            RetrieveState::Idle | RetrieveState::Errored { terminal: false }
        ) {
            // Single-flight: in-flight fetches and finished exchanges drop
            // further submissions.
            return vec![];
        }
        self.state = RetrieveState::FetchingBlob;
        let pin = (!pin.trim().is_empty()).then_some(pin);
        vec![RetrieveAction::DisableSubmit, RetrieveAction::FetchBlob { pin }]
    }

    fn handle_blob(&mut self, blob: String) -> Vec<RetrieveAction> {
        if self.state != RetrieveState::FetchingBlob {
            return vec![];
        }
        let key = match &self.key {
            Some(key) => key.as_str().to_owned(),
            // Unreachable on the client path; treat as undecryptable.
            None => return self.retryable_error(RetrieveFailure::DecryptFailed),
        };
        self.state = RetrieveState::Decrypting;
        vec![RetrieveAction::Open { blob, key }]
    }

    fn handle_fetch_failed(&mut self, error: &StoreError) -> Vec<RetrieveAction> {
        if self.state != RetrieveState::FetchingBlob {
            return vec![];
        }
        if error.is_terminal() {
            self.key = None;
            self.state = RetrieveState::Errored { terminal: true };
            // Submit stays disabled: there is nothing left to fetch.
            return vec![RetrieveAction::ShowGone];
        }
        match error {
            StoreError::AccessDenied => self.denied_error(),
            _ => {
                tracing::warn!(%error, "blob fetch failed");
                self.retryable_error(RetrieveFailure::Transport)
            },
        }
    }

    fn handle_opened(&mut self, payload: Payload) -> Vec<RetrieveAction> {
        if self.state != RetrieveState::Decrypting {
            return vec![];
        }
        // Single use: the key dies with the successful decrypt.
        self.key = None;
        self.state = RetrieveState::Rendered;
        match payload {
            Payload::Text { content } => vec![RetrieveAction::RenderText { content }],
            Payload::File { filename, content_type, data } => {
                vec![RetrieveAction::SaveFile { filename, content_type, data }]
            },
        }
    }

    /// Wrong credential: retryable, with the field cleared and refocused.
    fn denied_error(&mut self) -> Vec<RetrieveAction> {
        self.state = RetrieveState::Errored { terminal: false };
        vec![
            RetrieveAction::ShowError { failure: RetrieveFailure::AccessDenied },
            RetrieveAction::ClearCredential,
            RetrieveAction::FocusCredential,
            RetrieveAction::EnableSubmit,
        ]
    }

    /// Generic retryable failure; the credential field is cleared so a
    /// mistyped PIN is not silently resubmitted.
    fn retryable_error(&mut self, failure: RetrieveFailure) -> Vec<RetrieveAction> {
        self.state = RetrieveState::Errored { terminal: false };
        vec![
            RetrieveAction::ShowError { failure },
            RetrieveAction::ClearCredential,
            RetrieveAction::FocusCredential,
            RetrieveAction::EnableSubmit,
        ]
    }
}

#[cfg(test)]
mod tests {
    use linkseal_crypto::CryptoError;

    use super::*;
    use crate::error::OpenError;

    fn client_flow() -> RetrieveFlow {
        RetrieveFlow::from_fragment(Some("AAAAAAAAAAAAAAAAAAAAAA"))
    }

    fn credential(pin: &str) -> RetrieveEvent {
        RetrieveEvent::CredentialSubmitted { pin: pin.into() }
    }

    #[test]
    fn missing_fragment_delegates_to_server_flow() {
        let flow = RetrieveFlow::from_fragment(None);

        assert_eq!(flow.state(), RetrieveState::Delegated);
        assert!(matches!(flow.start().as_slice(), [RetrieveAction::DelegateToServerFlow]));
        assert!(!flow.holds_key());
    }

    #[test]
    fn empty_fragment_delegates_too() {
        let flow = RetrieveFlow::from_fragment(Some(""));
        assert_eq!(flow.state(), RetrieveState::Delegated);
    }

    #[test]
    fn delegated_flow_ignores_events() {
        let mut flow = RetrieveFlow::from_fragment(None);
        assert!(flow.handle(credential("1234")).is_empty());
    }

    #[test]
    fn credential_starts_single_fetch_with_submit_disabled() {
        let mut flow = client_flow();
        let actions = flow.handle(credential("1234"));

        assert!(matches!(
            actions.as_slice(),
            [RetrieveAction::DisableSubmit, RetrieveAction::FetchBlob { pin: Some(p) }]
                if p == "1234"
        ));
        assert_eq!(flow.state(), RetrieveState::FetchingBlob);
    }

    #[test]
    fn empty_pin_fetches_without_credential() {
        let mut flow = client_flow();
        let actions = flow.handle(credential("  "));

        assert!(matches!(
            actions.as_slice(),
            [RetrieveAction::DisableSubmit, RetrieveAction::FetchBlob { pin: None }]
        ));
    }

    #[test]
    fn second_submission_while_fetching_is_ignored() {
        let mut flow = client_flow();
        let _ = flow.handle(credential("1234"));
        let actions = flow.handle(credential("1234"));

        assert!(actions.is_empty());
    }

    #[test]
    fn fetched_blob_is_opened_with_fragment_key() {
        let mut flow = client_flow();
        let _ = flow.handle(credential("1234"));
        let actions = flow.handle(RetrieveEvent::BlobFetched { blob: "blob".into() });

        assert!(matches!(
            actions.as_slice(),
            [RetrieveAction::Open { blob, key }]
                if blob == "blob" && key == "AAAAAAAAAAAAAAAAAAAAAA"
        ));
        assert_eq!(flow.state(), RetrieveState::Decrypting);
    }

    #[test]
    fn text_payload_renders_and_erases_key() {
        let mut flow = client_flow();
        let _ = flow.handle(credential("1234"));
        let _ = flow.handle(RetrieveEvent::BlobFetched { blob: "blob".into() });
        let actions =
            flow.handle(RetrieveEvent::Opened { payload: Payload::text("the secret") });

        assert!(matches!(
            actions.as_slice(),
            [RetrieveAction::RenderText { content }] if content == "the secret"
        ));
        assert_eq!(flow.state(), RetrieveState::Rendered);
        assert!(!flow.holds_key());
    }

    #[test]
    fn file_payload_triggers_save() {
        let mut flow = client_flow();
        let _ = flow.handle(credential("1234"));
        let _ = flow.handle(RetrieveEvent::BlobFetched { blob: "blob".into() });
        let actions = flow.handle(RetrieveEvent::Opened {
            payload: Payload::file("doc.pdf", "application/pdf", vec![1, 2]),
        });

        assert!(matches!(
            actions.as_slice(),
            [RetrieveAction::SaveFile { filename, content_type, .. }]
                if filename == "doc.pdf" && content_type == "application/pdf"
        ));
        assert!(!flow.holds_key());
    }

    #[test]
    fn wrong_pin_is_retryable_with_cleared_refocused_field() {
        let mut flow = client_flow();
        let _ = flow.handle(credential("9999"));
        let actions =
            flow.handle(RetrieveEvent::FetchFailed { error: StoreError::AccessDenied });

        assert!(matches!(
            actions.as_slice(),
            [
                RetrieveAction::ShowError { failure: RetrieveFailure::AccessDenied },
                RetrieveAction::ClearCredential,
                RetrieveAction::FocusCredential,
                RetrieveAction::EnableSubmit,
            ]
        ));
        assert_eq!(flow.state(), RetrieveState::Errored { terminal: false });

        // Retry with the corrected PIN goes through.
        let retry = flow.handle(credential("1234"));
        assert!(matches!(retry.as_slice(), [RetrieveAction::DisableSubmit, _]));
    }

    #[test]
    fn gone_is_terminal_and_blocks_further_fetches() {
        let mut flow = client_flow();
        let _ = flow.handle(credential("1234"));
        let actions = flow.handle(RetrieveEvent::FetchFailed { error: StoreError::Gone });

        // No EnableSubmit: the control stays disabled.
        assert!(matches!(actions.as_slice(), [RetrieveAction::ShowGone]));
        assert_eq!(flow.state(), RetrieveState::Errored { terminal: true });
        assert!(!flow.holds_key());

        // No further fetch can be issued.
        assert!(flow.handle(credential("1234")).is_empty());
    }

    #[test]
    fn transport_failure_is_retryable() {
        let mut flow = client_flow();
        let _ = flow.handle(credential("1234"));
        let actions = flow
            .handle(RetrieveEvent::FetchFailed { error: StoreError::Network("reset".into()) });

        assert!(matches!(
            actions.as_slice(),
            [RetrieveAction::ShowError { failure: RetrieveFailure::Transport }, ..]
        ));
        assert_eq!(flow.state(), RetrieveState::Errored { terminal: false });
    }

    #[test]
    fn auth_failure_surfaces_one_generic_message() {
        let mut flow = client_flow();
        let _ = flow.handle(credential("1234"));
        let _ = flow.handle(RetrieveEvent::BlobFetched { blob: "blob".into() });
        let actions = flow.handle(RetrieveEvent::OpenFailed {
            error: OpenError::Crypto(CryptoError::AuthenticationFailed),
        });

        // Wrong key and corrupted data produce the identical failure class.
        assert!(matches!(
            actions.as_slice(),
            [RetrieveAction::ShowError { failure: RetrieveFailure::DecryptFailed }, ..]
        ));
        assert_eq!(flow.state(), RetrieveState::Errored { terminal: false });
    }

    #[test]
    fn framing_failure_surfaces_the_same_generic_message() {
        let mut flow = client_flow();
        let _ = flow.handle(credential("1234"));
        let _ = flow.handle(RetrieveEvent::BlobFetched { blob: "blob".into() });
        let actions = flow.handle(RetrieveEvent::OpenFailed {
            error: OpenError::Payload(linkseal_proto::PayloadError::UnknownType { found: 0x7F }),
        });

        assert!(matches!(
            actions.as_slice(),
            [RetrieveAction::ShowError { failure: RetrieveFailure::DecryptFailed }, ..]
        ));
    }

    #[test]
    fn crypto_missing_is_terminal() {
        let mut flow = client_flow();
        let actions = flow.handle(RetrieveEvent::CryptoMissing);

        assert!(matches!(
            actions.as_slice(),
            [
                RetrieveAction::DisableSubmit,
                RetrieveAction::ShowError { failure: RetrieveFailure::CryptoUnavailable },
            ]
        ));
        assert!(flow.handle(credential("1234")).is_empty());
    }

    #[test]
    fn stale_fetch_result_after_terminal_error_is_ignored() {
        let mut flow = client_flow();
        let _ = flow.handle(credential("1234"));
        let _ = flow.handle(RetrieveEvent::FetchFailed { error: StoreError::Gone });

        let actions = flow.handle(RetrieveEvent::BlobFetched { blob: "late".into() });
        assert!(actions.is_empty());
    }

    #[test]
    fn rendered_flow_ignores_further_credentials() {
        let mut flow = client_flow();
        let _ = flow.handle(credential("1234"));
        let _ = flow.handle(RetrieveEvent::BlobFetched { blob: "blob".into() });
        let _ = flow.handle(RetrieveEvent::Opened { payload: Payload::text("done") });

        assert!(flow.handle(credential("1234")).is_empty());
    }
}
