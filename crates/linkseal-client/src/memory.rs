//! In-memory store implementation for testing and simulation.

use std::{
    collections::HashMap,
    sync::{Arc, Mutex},
    time::Instant,
};

use async_trait::async_trait;

use crate::{
    error::StoreError,
    store::{FetchRequest, MessageId, SecretStore, StoreRequest},
};

/// In-memory [`SecretStore`] honoring the full contract: one-time read,
/// credential check before consumption, TTL expiry.
///
/// State is wrapped in `Arc<Mutex<_>>` so clones share the same store. Uses
/// `lock().expect()` which will panic if the mutex is poisoned - acceptable
/// for test code.
#[derive(Clone, Default)]
pub struct MemoryStore {
    inner: Arc<Mutex<HashMap<MessageId, StoredBlob>>>,
}

struct StoredBlob {
    blob: String,
    pin: Option<String>,
    expires_at: Instant,
}

impl MemoryStore {
    /// Create a new empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of live (stored, unconsumed) blobs.
    ///
    /// Expired entries still count until a fetch garbage-collects them.
    ///
    /// # Panics
    ///
    /// Panics if the internal mutex is poisoned.
    #[allow(clippy::expect_used)]
    pub fn len(&self) -> usize {
        self.inner.lock().expect("mutex poisoned").len()
    }

    /// True if no blobs are stored.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[async_trait]
impl SecretStore for MemoryStore {
    #[allow(clippy::expect_used)]
    async fn put(&self, request: StoreRequest) -> Result<MessageId, StoreError> {
        let id = MessageId::new_v4();
        let stored = StoredBlob {
            blob: request.blob,
            pin: request.pin,
            expires_at: Instant::now() + request.ttl,
        };
        self.inner.lock().expect("mutex poisoned").insert(id, stored);
        Ok(id)
    }

    #[allow(clippy::expect_used)]
    async fn fetch(&self, request: FetchRequest) -> Result<String, StoreError> {
        let mut entries = self.inner.lock().expect("mutex poisoned");

        let Some(stored) = entries.get(&request.id) else {
            return Err(StoreError::Gone);
        };

        if stored.expires_at <= Instant::now() {
            entries.remove(&request.id);
            return Err(StoreError::Gone);
        }

        // Credential check happens before consumption: a wrong PIN must not
        // burn the single read.
        if stored.pin != request.pin {
            return Err(StoreError::AccessDenied);
        }

        let stored = entries.remove(&request.id).expect("entry checked above");
        Ok(stored.blob)
    }
}
