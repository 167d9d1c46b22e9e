//! Encrypt-before-submit state machine.
//!
//! Owns the submission-side secret lifecycle: the freshly generated key and
//! the "encryption done" flag live as fields here, never as module state,
//! so every reset point is explicit and testable.
//!
//! # Invariants
//!
//! - The size gate runs before sealing: an oversized draft consumes no key
//!   and triggers no network call.
//! - [`SubmitAction::ReleaseSubmission`] is only ever emitted directly after
//!   [`SubmitAction::SubstituteField`]; the store call is gated on the
//!   `Encrypting -> Ready` transition, not on timing.
//! - At most one encryption is in flight; a second submit intent while
//!   `Encrypting` or `Ready` is ignored.
//! - Every terminal path clears the key and the done flag, and clearing is
//!   idempotent. A stale seal result arriving after a reset is ignored.

use linkseal_crypto::SecretKey;
use linkseal_proto::Payload;

use crate::{
    action::SubmitAction,
    config::FlowConfig,
    error::SubmitFailure,
    event::SubmitEvent,
};

/// Submission flow states.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmitState {
    /// Encryption unavailable; the form is dead.
    Disabled,
    /// Waiting for a submit intent.
    Idle,
    /// Submission suspended on the no-PIN confirmation.
    AwaitingPinDecision,
    /// Sealing in progress; submission still suspended.
    Encrypting,
    /// Sealed blob substituted; the one suspended submission may proceed.
    Ready,
}

/// Encrypt-before-submit state machine.
///
/// Pure: consumes [`SubmitEvent`]s, produces [`SubmitAction`]s, performs no
/// I/O. One instance per form, owned by the page controller.
#[derive(Debug)]
pub struct SubmitFlow {
    config: FlowConfig,
    state: SubmitState,
    /// Key for the submission in flight. Present only between a completed
    /// seal and the share link being presented (or a reset).
    key: Option<SecretKey>,
    /// Set when the plaintext field holds ciphertext instead of plaintext.
    encryption_done: bool,
    /// The user already confirmed proceeding without a PIN once.
    no_pin_confirmed: bool,
    /// Draft parked while the no-PIN confirmation is open.
    pending_draft: Option<Payload>,
}

impl SubmitFlow {
    /// Create an idle flow with the given configuration.
    pub fn new(config: FlowConfig) -> Self {
        Self {
            config,
            state: SubmitState::Idle,
            key: None,
            encryption_done: false,
            no_pin_confirmed: false,
            pending_draft: None,
        }
    }

    /// Current state.
    pub fn state(&self) -> SubmitState {
        self.state
    }

    /// True while a key is held in memory.
    pub fn holds_key(&self) -> bool {
        self.key.is_some()
    }

    /// True while the field holds ciphertext.
    pub fn encryption_done(&self) -> bool {
        self.encryption_done
    }

    /// Process an event and return actions for the runtime/UI to execute.
    pub fn handle(&mut self, event: SubmitEvent) -> Vec<SubmitAction> {
        if self.state == SubmitState::Disabled {
            return vec![];
        }

        match event {
            SubmitEvent::CryptoMissing => {
                self.reset();
                self.state = SubmitState::Disabled;
                vec![SubmitAction::DisableForm]
            },
            SubmitEvent::SubmitRequested { draft, pin } => self.handle_submit(draft, &pin),
            SubmitEvent::NoPinConfirmed => self.handle_no_pin_confirmed(),
            SubmitEvent::NoPinCancelled => self.handle_no_pin_cancelled(),
            SubmitEvent::SealCompleted { key, blob } => self.handle_seal_completed(key, blob),
            SubmitEvent::SealFailed { failure } => self.handle_seal_failed(failure),
            SubmitEvent::LocatorReceived { locator } => {
                let Some(key) = self.key.take() else {
                    // Stale locator after a reset; nothing to attach.
                    return vec![];
                };
                let url = locator.share_url(&key.export());
                self.encryption_done = false;
                self.no_pin_confirmed = false;
                self.state = SubmitState::Idle;
                vec![SubmitAction::PresentShareLink { url }]
            },
            SubmitEvent::SubmitRejected { reason } => {
                if self.state != SubmitState::Ready {
                    return vec![];
                }
                // Validation error: keep key and sealed field so a corrected
                // resubmission does not re-encrypt.
                vec![SubmitAction::ShowError { failure: SubmitFailure::Rejected { reason } }]
            },
            SubmitEvent::TransportFailed { error } => {
                if !matches!(self.state, SubmitState::Encrypting | SubmitState::Ready) {
                    return vec![];
                }
                tracing::warn!(%error, "transport failure, resetting submission state");
                self.reset();
                vec![
                    SubmitAction::ClearForm,
                    SubmitAction::ShowError { failure: SubmitFailure::Transport },
                ]
            },
            SubmitEvent::ResultDismissed => {
                if !self.encryption_done {
                    return vec![];
                }
                self.reset();
                vec![SubmitAction::ClearForm]
            },
        }
    }

    fn handle_submit(&mut self, draft: Payload, pin: &str) -> Vec<SubmitAction> {
        if self.state != SubmitState::Idle {
            // One encryption in flight per form; later intents are dropped.
            return vec![];
        }

        let size = draft.content_len();
        if size > self.config.max_secret_size {
            return vec![SubmitAction::ShowError {
                failure: SubmitFailure::InputTooLarge { size, max: self.config.max_secret_size },
            }];
        }
        if matches!(&draft, Payload::Text { content } if content.is_empty()) {
            return vec![SubmitAction::ShowError { failure: SubmitFailure::EmptyDraft }];
        }

        if pin.trim().is_empty() && !self.no_pin_confirmed {
            self.pending_draft = Some(draft);
            self.state = SubmitState::AwaitingPinDecision;
            return vec![SubmitAction::PromptNoPinConfirm];
        }

        self.state = SubmitState::Encrypting;
        vec![SubmitAction::Seal { draft }]
    }

    fn handle_no_pin_confirmed(&mut self) -> Vec<SubmitAction> {
        if self.state != SubmitState::AwaitingPinDecision {
            return vec![];
        }
        self.no_pin_confirmed = true;
        let Some(draft) = self.pending_draft.take() else {
            self.state = SubmitState::Idle;
            return vec![];
        };
        self.state = SubmitState::Encrypting;
        vec![SubmitAction::Seal { draft }]
    }

    fn handle_no_pin_cancelled(&mut self) -> Vec<SubmitAction> {
        if self.state != SubmitState::AwaitingPinDecision {
            return vec![];
        }
        self.pending_draft = None;
        self.state = SubmitState::Idle;
        vec![SubmitAction::FocusPin]
    }

    fn handle_seal_completed(&mut self, key: SecretKey, blob: String) -> Vec<SubmitAction> {
        if self.state != SubmitState::Encrypting {
            // Stale completion after a reset must not resurrect the key.
            return vec![];
        }
        self.key = Some(key);
        self.encryption_done = true;
        self.state = SubmitState::Ready;
        // Substitution first: the request may only fire once the field
        // provably holds ciphertext.
        vec![SubmitAction::SubstituteField { blob }, SubmitAction::ReleaseSubmission]
    }

    fn handle_seal_failed(&mut self, failure: SubmitFailure) -> Vec<SubmitAction> {
        if self.state != SubmitState::Encrypting {
            return vec![];
        }
        self.state = SubmitState::Idle;
        vec![SubmitAction::ShowError { failure }]
    }

    /// Clear key, flags, and any parked draft. Safe to call repeatedly.
    fn reset(&mut self) {
        self.key = None;
        self.encryption_done = false;
        self.no_pin_confirmed = false;
        self.pending_draft = None;
        self.state = SubmitState::Idle;
    }
}

#[cfg(test)]
mod tests {
    use linkseal_client::{MessageLocator, StoreError};

    use super::*;

    fn flow() -> SubmitFlow {
        SubmitFlow::new(FlowConfig { max_secret_size: 64, ..FlowConfig::default() })
    }

    fn submit(pin: &str) -> SubmitEvent {
        SubmitEvent::SubmitRequested { draft: Payload::text("a secret"), pin: pin.into() }
    }

    fn sealed() -> SubmitEvent {
        SubmitEvent::SealCompleted {
            key: SecretKey::from_bytes([7; 16]),
            blob: "sealed-blob".into(),
        }
    }

    fn locator() -> MessageLocator {
        MessageLocator::new("https://example.org", linkseal_client::MessageId::nil())
    }

    #[test]
    fn pin_submission_goes_straight_to_encrypting() {
        let mut flow = flow();
        let actions = flow.handle(submit("1234"));

        assert!(matches!(actions.as_slice(), [SubmitAction::Seal { .. }]));
        assert_eq!(flow.state(), SubmitState::Encrypting);
    }

    #[test]
    fn empty_pin_prompts_confirmation_without_sealing() {
        let mut flow = flow();
        let actions = flow.handle(submit(""));

        assert!(matches!(actions.as_slice(), [SubmitAction::PromptNoPinConfirm]));
        assert_eq!(flow.state(), SubmitState::AwaitingPinDecision);
        assert!(!flow.holds_key());
    }

    #[test]
    fn whitespace_pin_counts_as_empty() {
        let mut flow = flow();
        let actions = flow.handle(submit("   "));

        assert!(matches!(actions.as_slice(), [SubmitAction::PromptNoPinConfirm]));
    }

    #[test]
    fn confirming_no_pin_proceeds_with_parked_draft() {
        let mut flow = flow();
        let _ = flow.handle(submit(""));
        let actions = flow.handle(SubmitEvent::NoPinConfirmed);

        assert!(matches!(
            actions.as_slice(),
            [SubmitAction::Seal { draft: Payload::Text { content } }] if content == "a secret"
        ));
        assert_eq!(flow.state(), SubmitState::Encrypting);
    }

    #[test]
    fn cancelling_no_pin_returns_to_idle_and_refocuses() {
        let mut flow = flow();
        let _ = flow.handle(submit(""));
        let actions = flow.handle(SubmitEvent::NoPinCancelled);

        assert!(matches!(actions.as_slice(), [SubmitAction::FocusPin]));
        assert_eq!(flow.state(), SubmitState::Idle);
    }

    #[test]
    fn confirmation_is_remembered_within_the_lifecycle() {
        let mut flow = flow();
        let _ = flow.handle(submit(""));
        let _ = flow.handle(SubmitEvent::NoPinCancelled);
        let _ = flow.handle(submit(""));
        let _ = flow.handle(SubmitEvent::NoPinConfirmed);
        let _ = flow.handle(sealed());
        let _ = flow.handle(SubmitEvent::TransportFailed { error: StoreError::Aborted });

        // Reset also clears the remembered confirmation.
        let actions = flow.handle(submit(""));
        assert!(matches!(actions.as_slice(), [SubmitAction::PromptNoPinConfirm]));
    }

    #[test]
    fn size_gate_accepts_exact_limit() {
        let mut flow = flow();
        let draft = Payload::text("x".repeat(64));
        let actions = flow.handle(SubmitEvent::SubmitRequested { draft, pin: "1".into() });

        assert!(matches!(actions.as_slice(), [SubmitAction::Seal { .. }]));
    }

    #[test]
    fn size_gate_rejects_one_over_limit_before_sealing() {
        let mut flow = flow();
        let draft = Payload::text("x".repeat(65));
        let actions = flow.handle(SubmitEvent::SubmitRequested { draft, pin: "1".into() });

        assert!(matches!(
            actions.as_slice(),
            [SubmitAction::ShowError {
                failure: SubmitFailure::InputTooLarge { size: 65, max: 64 }
            }]
        ));
        assert_eq!(flow.state(), SubmitState::Idle);
        assert!(!flow.holds_key());
    }

    #[test]
    fn size_gate_counts_file_bytes() {
        let mut flow = flow();
        let draft = Payload::file("big.bin", "application/octet-stream", vec![0u8; 65]);
        let actions = flow.handle(SubmitEvent::SubmitRequested { draft, pin: "1".into() });

        assert!(matches!(
            actions.as_slice(),
            [SubmitAction::ShowError { failure: SubmitFailure::InputTooLarge { .. } }]
        ));
    }

    #[test]
    fn empty_text_draft_rejected() {
        let mut flow = flow();
        let actions = flow
            .handle(SubmitEvent::SubmitRequested { draft: Payload::text(""), pin: "1".into() });

        assert!(matches!(
            actions.as_slice(),
            [SubmitAction::ShowError { failure: SubmitFailure::EmptyDraft }]
        ));
    }

    #[test]
    fn substitution_precedes_release() {
        let mut flow = flow();
        let _ = flow.handle(submit("1234"));
        let actions = flow.handle(sealed());

        assert!(matches!(
            actions.as_slice(),
            [SubmitAction::SubstituteField { .. }, SubmitAction::ReleaseSubmission]
        ));
        assert_eq!(flow.state(), SubmitState::Ready);
        assert!(flow.holds_key());
        assert!(flow.encryption_done());
    }

    #[test]
    fn second_submit_while_encrypting_is_ignored() {
        let mut flow = flow();
        let _ = flow.handle(submit("1234"));
        let actions = flow.handle(submit("1234"));

        assert!(actions.is_empty());
        assert_eq!(flow.state(), SubmitState::Encrypting);
    }

    #[test]
    fn second_submit_while_ready_is_ignored() {
        let mut flow = flow();
        let _ = flow.handle(submit("1234"));
        let _ = flow.handle(sealed());
        let actions = flow.handle(submit("1234"));

        assert!(actions.is_empty());
        assert_eq!(flow.state(), SubmitState::Ready);
    }

    #[test]
    fn locator_attaches_key_as_fragment_and_erases_it() {
        let mut flow = flow();
        let _ = flow.handle(submit("1234"));
        let _ = flow.handle(sealed());
        let actions = flow.handle(SubmitEvent::LocatorReceived { locator: locator() });

        let expected_key = SecretKey::from_bytes([7; 16]).export();
        assert!(matches!(
            actions.as_slice(),
            [SubmitAction::PresentShareLink { url }] if url.ends_with(&format!("#{expected_key}"))
        ));
        assert!(!flow.holds_key());
        assert!(!flow.encryption_done());
        assert_eq!(flow.state(), SubmitState::Idle);
    }

    #[test]
    fn transport_failure_resets_key_and_flag() {
        let mut flow = flow();
        let _ = flow.handle(submit("1234"));
        let _ = flow.handle(sealed());
        let actions =
            flow.handle(SubmitEvent::TransportFailed { error: StoreError::Timeout });

        assert!(matches!(
            actions.as_slice(),
            [SubmitAction::ClearForm, SubmitAction::ShowError { .. }]
        ));
        assert!(!flow.holds_key());
        assert!(!flow.encryption_done());
        assert_eq!(flow.state(), SubmitState::Idle);
    }

    #[test]
    fn stale_seal_result_after_reset_is_ignored() {
        let mut flow = flow();
        let _ = flow.handle(submit("1234"));
        let _ = flow.handle(SubmitEvent::TransportFailed { error: StoreError::Aborted });

        // The seal completes after the reset already happened.
        let actions = flow.handle(sealed());

        assert!(actions.is_empty());
        assert!(!flow.holds_key());
        assert_eq!(flow.state(), SubmitState::Idle);
    }

    #[test]
    fn stale_locator_after_reset_is_ignored() {
        let mut flow = flow();
        let _ = flow.handle(submit("1234"));
        let _ = flow.handle(sealed());
        let _ = flow.handle(SubmitEvent::TransportFailed { error: StoreError::Aborted });

        let actions = flow.handle(SubmitEvent::LocatorReceived { locator: locator() });
        assert!(actions.is_empty());
    }

    #[test]
    fn rejection_keeps_sealed_state_for_resubmission() {
        let mut flow = flow();
        let _ = flow.handle(submit("1234"));
        let _ = flow.handle(sealed());
        let actions =
            flow.handle(SubmitEvent::SubmitRejected { reason: "expire out of range".into() });

        assert!(matches!(
            actions.as_slice(),
            [SubmitAction::ShowError { failure: SubmitFailure::Rejected { .. } }]
        ));
        assert_eq!(flow.state(), SubmitState::Ready);
        assert!(flow.holds_key());
    }

    #[test]
    fn dismissal_clears_only_when_encrypted() {
        let mut flow = flow();
        assert!(flow.handle(SubmitEvent::ResultDismissed).is_empty());

        let _ = flow.handle(submit("1234"));
        let _ = flow.handle(sealed());
        let actions = flow.handle(SubmitEvent::ResultDismissed);

        assert!(matches!(actions.as_slice(), [SubmitAction::ClearForm]));
        assert!(!flow.holds_key());
    }

    #[test]
    fn repeated_resets_are_idempotent() {
        let mut flow = flow();
        let _ = flow.handle(submit("1234"));
        let _ = flow.handle(sealed());

        let _ = flow.handle(SubmitEvent::TransportFailed { error: StoreError::Aborted });
        let again = flow.handle(SubmitEvent::TransportFailed { error: StoreError::Timeout });

        assert!(again.is_empty());
        assert_eq!(flow.state(), SubmitState::Idle);
    }

    #[test]
    fn disabled_flow_ignores_everything() {
        let mut flow = flow();
        let actions = flow.handle(SubmitEvent::CryptoMissing);
        assert!(matches!(actions.as_slice(), [SubmitAction::DisableForm]));

        assert!(flow.handle(submit("1234")).is_empty());
        assert!(flow.handle(sealed()).is_empty());
        assert_eq!(flow.state(), SubmitState::Disabled);
    }

    #[test]
    fn seal_failure_returns_to_idle() {
        let mut flow = flow();
        let _ = flow.handle(submit("1234"));
        let actions = flow.handle(SubmitEvent::SealFailed {
            failure: SubmitFailure::CryptoUnavailable,
        });

        assert!(matches!(
            actions.as_slice(),
            [SubmitAction::ShowError { failure: SubmitFailure::CryptoUnavailable }]
        ));
        assert_eq!(flow.state(), SubmitState::Idle);
        assert!(!flow.holds_key());
    }
}
