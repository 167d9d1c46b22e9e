//! Linkseal Application Layer
//!
//! Pure state machines and a generic runtime for the two halves of the
//! share-a-secret lifecycle:
//!
//! - [`SubmitFlow`]: encrypt-before-submit. Gates the network submission on
//!   the sealing having completed, owns the in-memory key until it lands in
//!   the share link's fragment, and resets itself on transport failures so
//!   stale ciphertext is never resubmitted.
//! - [`RetrieveFlow`]: fetch-then-decrypt. Reads the key from the URL
//!   fragment, issues exactly one fetch per credential attempt, and keeps
//!   "wrong PIN, try again" strictly apart from "gone forever".
//!
//! Both are pure: they consume events and produce actions, with no I/O and
//! no presentation concern, so the same code runs under the production
//! [`Runtime`] and in deterministic tests.

#![forbid(unsafe_code)]
#![deny(missing_docs)]

mod action;
mod config;
mod error;
mod event;
mod retrieve;
mod runtime;
mod submit;

pub use action::{RetrieveAction, SubmitAction};
pub use config::FlowConfig;
pub use error::{OpenError, RetrieveFailure, SubmitFailure};
pub use event::{RetrieveEvent, SubmitEvent};
pub use retrieve::{RetrieveFlow, RetrieveState};
pub use runtime::{PinDecision, RetrieveOutcome, Runtime, SubmitOutcome};
pub use submit::{SubmitFlow, SubmitState};
