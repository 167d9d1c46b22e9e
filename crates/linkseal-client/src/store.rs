//! Storage abstraction for sealed blobs.
//!
//! Trait-based so orchestration logic can run against the production HTTP
//! client, the in-memory reference store, or a chaos wrapper in tests
//! without changing.

use std::time::Duration;

use async_trait::async_trait;

use crate::error::StoreError;

/// Identifier the store assigns to a blob on write.
pub type MessageId = uuid::Uuid;

/// A write of one sealed blob.
///
/// # Invariants
///
/// - The blob is opaque to the store: already sealed and transport-encoded.
///   The store never sees plaintext.
/// - There is intentionally no key field. The decryption key travels in the
///   share link's URL fragment and must never reach the service.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreRequest {
    /// Sealed transport blob (unpadded base64url).
    pub blob: String,
    /// Optional access credential required to read the blob back.
    pub pin: Option<String>,
    /// How long the blob may live before the store deletes it.
    pub ttl: Duration,
}

/// A read of one sealed blob.
///
/// Carries only the id and the credential; see [`StoreRequest`] for why
/// there is no key field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchRequest {
    /// Id returned by the write.
    pub id: MessageId,
    /// Access credential, if the write set one.
    pub pin: Option<String>,
}

/// Storage service for sealed blobs.
///
/// # Contract
///
/// - `put` stores an opaque blob with an optional credential and a TTL,
///   returning a fresh id.
/// - `fetch` succeeds at most once per blob; a successful read deletes it.
///   A wrong credential fails with [`StoreError::AccessDenied`] and does
///   NOT consume the blob. A consumed or TTL-expired blob fails with
///   [`StoreError::Gone`] — the two cases must stay distinguishable so the
///   caller can offer retry for one and a terminal notice for the other.
#[async_trait]
pub trait SecretStore: Send + Sync {
    /// Store a sealed blob. Returns the id to build the share link from.
    async fn put(&self, request: StoreRequest) -> Result<MessageId, StoreError>;

    /// Fetch a sealed blob, consuming it on success.
    async fn fetch(&self, request: FetchRequest) -> Result<String, StoreError>;
}
