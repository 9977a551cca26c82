use crate::store::KeyValueStore;
use crate::structs::kv::{
    GetRequest, GetResult, PutRequest, PutResult, RemoveRequest, RemoveResult,
};
use crate::tracing_shim::trace;
use crate::Error;
use std::collections::HashMap;
use tokio::sync::RwLock;
use tokio_util::sync::CancellationToken;

/// A key-value store held entirely in memory.
///
/// Nothing is persisted. This is useful for tests, demos, and short-lived data.
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: RwLock<HashMap<String, Vec<u8>>>,
}

impl MemoryStore {
    /// Create an empty store.
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    /// The number of entries currently stored.
    pub async fn len(&self) -> usize {
        self.entries.read().await.len()
    }

    /// Whether the store holds no entries.
    pub async fn is_empty(&self) -> bool {
        self.entries.read().await.is_empty()
    }
}

/// Fail early if the caller has already given up on the call.
fn ensure_live(cancel: &CancellationToken) -> Result<(), Error> {
    if cancel.is_cancelled() {
        Err(Error::Cancelled)
    } else {
        Ok(())
    }
}

#[tonic::async_trait]
impl KeyValueStore for MemoryStore {
    async fn get_value(
        &self,
        GetRequest { key }: GetRequest,
        cancel: CancellationToken,
    ) -> Result<GetResult, Error> {
        ensure_live(&cancel)?;
        let entries = self.entries.read().await;
        let result = match entries.get(&key) {
            Some(value) => GetResult::hit(value.clone()),
            None => GetResult::miss(),
        };
        trace!(key = %key, found = result.found(), "memory get");
        Ok(result)
    }

    async fn put_value(
        &self,
        PutRequest { key, value }: PutRequest,
        cancel: CancellationToken,
    ) -> Result<PutResult, Error> {
        ensure_live(&cancel)?;
        trace!(key = %key, len = value.len(), "memory put");
        let _previous = self.entries.write().await.insert(key, value);
        Ok(PutResult { success: true })
    }

    async fn remove_value(
        &self,
        RemoveRequest { key }: RemoveRequest,
        cancel: CancellationToken,
    ) -> Result<RemoveResult, Error> {
        ensure_live(&cancel)?;
        let removed = self.entries.write().await.remove(&key).is_some();
        trace!(key = %key, removed, "memory remove");
        Ok(RemoveResult { success: removed })
    }
}
