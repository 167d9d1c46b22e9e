//! Linkseal Storage Contract
//!
//! The interface the client core uses to talk to the blob storage service,
//! and the share-link types built around it. The service is an external
//! collaborator: it stores an opaque sealed blob with an optional PIN and a
//! TTL, hands back an id, and serves the blob at most once.
//!
//! # Security
//!
//! The decryption key never crosses this boundary. [`StoreRequest`] and
//! [`FetchRequest`] have no field that could carry it; the key exists only
//! in the URL fragment of a [`MessageLocator`] share link, which browsers
//! never transmit.

#![forbid(unsafe_code)]
#![deny(missing_docs)]

mod error;
mod locator;
mod memory;
mod store;

pub use error::StoreError;
pub use locator::{MessageLocator, fragment_of, parse_share_url};
pub use memory::MemoryStore;
pub use store::{FetchRequest, MessageId, SecretStore, StoreRequest};
