//! Generic runtime executing flow actions.
//!
//! The flows are pure; this is the layer that does the actual work their
//! actions call for: key generation and sealing, store calls, share-link
//! assembly. It feeds each result back into the flow as an event and keeps
//! going until the flow settles on an outcome.
//!
//! The store call is issued only when the flow emits
//! [`SubmitAction::ReleaseSubmission`], which it does strictly after
//! [`SubmitAction::SubstituteField`]. That gate is what guarantees the
//! server only ever sees ciphertext.
//!
//! Key material and plaintext are never logged.

use std::collections::VecDeque;

use linkseal_client::{
    FetchRequest, MessageId, MessageLocator, SecretStore, StoreError, StoreRequest,
};
use linkseal_crypto::{SecretKey, ensure_available, open, seal};
use linkseal_proto::Payload;

use crate::{
    action::{RetrieveAction, SubmitAction},
    config::FlowConfig,
    error::{OpenError, RetrieveFailure, SubmitFailure},
    event::{RetrieveEvent, SubmitEvent},
    retrieve::{RetrieveFlow, RetrieveState},
    submit::{SubmitFlow, SubmitState},
};

/// Resolution of the no-PIN confirmation, supplied by the caller up front
/// so a headless submission can run to completion.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PinDecision {
    /// Proceed without a PIN.
    Confirm,
    /// Go back and enter a PIN.
    Cancel,
}

/// Result of driving a submission to completion.
#[derive(Debug, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// The secret is stored; here is the link to share.
    ShareLink {
        /// Full share URL with the key in the fragment.
        url: String,
    },
    /// The user declined to share without a PIN.
    Cancelled,
    /// The submission was dropped (another one is already in flight).
    Ignored,
    /// The submission failed; see the failure class for recovery.
    Failed {
        /// User-facing failure.
        failure: SubmitFailure,
    },
}

/// Result of driving a retrieval attempt to completion.
#[derive(Debug, PartialEq, Eq)]
pub enum RetrieveOutcome {
    /// Decrypted text, rendered read-only.
    Text {
        /// The secret text.
        content: String,
    },
    /// Decrypted file, saved locally.
    File {
        /// Filename for the download.
        filename: String,
        /// MIME content type.
        content_type: String,
        /// Raw file bytes.
        data: Vec<u8>,
    },
    /// The blob is permanently gone; no retry exists.
    Gone,
    /// No key in the fragment; the server-side flow owns this page.
    Delegated,
    /// The attempt was dropped (one is already in flight, or the flow has
    /// finished).
    Ignored,
    /// A retryable failure.
    Failed {
        /// User-facing failure.
        failure: RetrieveFailure,
    },
}

/// Runtime binding the flows to a [`SecretStore`] and the crypto layer.
pub struct Runtime<S: SecretStore> {
    store: S,
    config: FlowConfig,
    crypto_available: bool,
}

impl<S: SecretStore> Runtime<S> {
    /// Create a runtime. Probes the secure random source exactly once;
    /// flows created afterwards start disabled if the probe failed.
    pub fn new(store: S, config: FlowConfig) -> Self {
        let crypto_available = ensure_available().is_ok();
        if !crypto_available {
            tracing::error!("secure random source unavailable, encryption disabled");
        }
        Self { store, config, crypto_available }
    }

    /// Configuration in use.
    pub fn config(&self) -> &FlowConfig {
        &self.config
    }

    /// Fresh submission flow, pre-disabled if crypto is unavailable.
    pub fn submit_flow(&self) -> SubmitFlow {
        let mut flow = SubmitFlow::new(self.config.clone());
        if !self.crypto_available {
            let _ = flow.handle(SubmitEvent::CryptoMissing);
        }
        flow
    }

    /// Fresh retrieval flow for a message URL, plus the message id to fetch
    /// under. Returns `None` if the URL is not a message locator.
    pub fn retrieve_flow(&self, url: &str) -> Option<(RetrieveFlow, MessageId)> {
        let (id, fragment) = linkseal_client::parse_share_url(url)?;
        Some((RetrieveFlow::from_fragment(fragment), id))
    }

    /// Drive one submission to completion.
    ///
    /// `decision` resolves the no-PIN confirmation if the flow raises it.
    pub async fn submit(
        &self,
        flow: &mut SubmitFlow,
        draft: Payload,
        pin: &str,
        decision: PinDecision,
    ) -> SubmitOutcome {
        if flow.state() == SubmitState::Disabled {
            return SubmitOutcome::Failed { failure: SubmitFailure::CryptoUnavailable };
        }

        let mut events = VecDeque::from([SubmitEvent::SubmitRequested {
            draft,
            pin: pin.to_owned(),
        }]);
        let mut sealed_blob: Option<String> = None;
        let mut outcome = None;

        while let Some(event) = events.pop_front() {
            for action in flow.handle(event) {
                match action {
                    SubmitAction::PromptNoPinConfirm => match decision {
                        PinDecision::Confirm => events.push_back(SubmitEvent::NoPinConfirmed),
                        PinDecision::Cancel => {
                            events.push_back(SubmitEvent::NoPinCancelled);
                            outcome = Some(SubmitOutcome::Cancelled);
                        },
                    },
                    SubmitAction::Seal { draft } => {
                        tracing::debug!(size = draft.content_len(), "sealing draft");
                        events.push_back(seal_draft(&draft));
                    },
                    SubmitAction::SubstituteField { blob } => sealed_blob = Some(blob),
                    SubmitAction::ReleaseSubmission => {
                        events.push_back(self.put_blob(sealed_blob.take(), pin).await);
                    },
                    SubmitAction::PresentShareLink { url } => {
                        outcome = Some(SubmitOutcome::ShareLink { url });
                    },
                    SubmitAction::ShowError { failure } => {
                        outcome = Some(SubmitOutcome::Failed { failure });
                    },
                    // Pure UI concerns; a rendering adapter handles these.
                    SubmitAction::FocusPin
                    | SubmitAction::ClearForm
                    | SubmitAction::DisableForm => {},
                }
            }
        }

        outcome.unwrap_or(SubmitOutcome::Ignored)
    }

    /// Drive one retrieval attempt to completion.
    pub async fn retrieve(
        &self,
        flow: &mut RetrieveFlow,
        id: MessageId,
        pin: &str,
    ) -> RetrieveOutcome {
        if flow.state() == RetrieveState::Delegated {
            return RetrieveOutcome::Delegated;
        }
        if !self.crypto_available {
            let _ = flow.handle(RetrieveEvent::CryptoMissing);
            return RetrieveOutcome::Failed { failure: RetrieveFailure::CryptoUnavailable };
        }

        let mut events =
            VecDeque::from([RetrieveEvent::CredentialSubmitted { pin: pin.to_owned() }]);
        let mut outcome = None;

        while let Some(event) = events.pop_front() {
            for action in flow.handle(event) {
                match action {
                    RetrieveAction::FetchBlob { pin } => {
                        tracing::debug!(%id, "fetching blob");
                        let result = self.store.fetch(FetchRequest { id, pin }).await;
                        events.push_back(match result {
                            Ok(blob) => RetrieveEvent::BlobFetched { blob },
                            Err(error) => RetrieveEvent::FetchFailed { error },
                        });
                    },
                    RetrieveAction::Open { blob, key } => {
                        events.push_back(open_blob(&blob, &key));
                    },
                    RetrieveAction::RenderText { content } => {
                        outcome = Some(RetrieveOutcome::Text { content });
                    },
                    RetrieveAction::SaveFile { filename, content_type, data } => {
                        outcome =
                            Some(RetrieveOutcome::File { filename, content_type, data });
                    },
                    RetrieveAction::ShowGone => outcome = Some(RetrieveOutcome::Gone),
                    RetrieveAction::ShowError { failure } => {
                        outcome = Some(RetrieveOutcome::Failed { failure });
                    },
                    RetrieveAction::DelegateToServerFlow => {
                        outcome = Some(RetrieveOutcome::Delegated);
                    },
                    // Pure UI concerns.
                    RetrieveAction::DisableSubmit
                    | RetrieveAction::EnableSubmit
                    | RetrieveAction::ClearCredential
                    | RetrieveAction::FocusCredential => {},
                }
            }
        }

        outcome.unwrap_or(RetrieveOutcome::Ignored)
    }

    /// Store the sealed blob, translating the result into a flow event.
    async fn put_blob(&self, sealed_blob: Option<String>, pin: &str) -> SubmitEvent {
        let Some(blob) = sealed_blob else {
            // A release without a substitution would mean the gate broke;
            // treat it as an abort rather than submit plaintext.
            return SubmitEvent::TransportFailed { error: StoreError::Aborted };
        };

        let pin = (!pin.trim().is_empty()).then(|| pin.trim().to_owned());
        let request = StoreRequest { blob, pin, ttl: self.config.default_ttl };

        match self.store.put(request).await {
            Ok(id) => {
                let locator = MessageLocator::new(self.config.base_url.clone(), id);
                tracing::info!(%id, "blob stored");
                SubmitEvent::LocatorReceived { locator }
            },
            Err(StoreError::Rejected { reason }) => SubmitEvent::SubmitRejected { reason },
            Err(error) => {
                tracing::warn!(%error, "blob store failed");
                SubmitEvent::TransportFailed { error }
            },
        }
    }
}

/// Generate a key, encode the draft, seal it. Pure crypto work, no I/O.
fn seal_draft(draft: &Payload) -> SubmitEvent {
    let key = match SecretKey::generate() {
        Ok(key) => key,
        Err(_) => {
            return SubmitEvent::SealFailed { failure: SubmitFailure::CryptoUnavailable };
        },
    };
    let bytes = match draft.to_bytes() {
        Ok(bytes) => bytes,
        Err(error) => {
            return SubmitEvent::SealFailed {
                failure: SubmitFailure::InvalidDraft { reason: error.to_string() },
            };
        },
    };
    match seal(&bytes, &key) {
        Ok(blob) => SubmitEvent::SealCompleted { key, blob },
        Err(_) => SubmitEvent::SealFailed { failure: SubmitFailure::CryptoUnavailable },
    }
}

/// Import the fragment key, open the blob, parse the payload.
fn open_blob(blob: &str, key_str: &str) -> RetrieveEvent {
    let result = SecretKey::import(key_str)
        .map_err(OpenError::from)
        .and_then(|key| open(blob, &key).map_err(OpenError::from))
        .and_then(|bytes| Payload::decode(&bytes).map_err(OpenError::from));

    match result {
        Ok(payload) => RetrieveEvent::Opened { payload },
        Err(error) => RetrieveEvent::OpenFailed { error },
    }
}
