//! The storage-agnostic key-value interface.

mod arc;
mod memory;

pub use self::memory::MemoryStore;
use crate::structs::kv::{
    GetRequest, GetResult, PutRequest, PutResult, RemoveRequest, RemoveResult,
};
use crate::Error;
use tokio_util::sync::CancellationToken;

/// A key-value store.
///
/// Implementations are chosen at construction time and used through dynamic dispatch, so the
/// trait is object safe. Every call receives its own cancellation token; a cancelled call should
/// resolve with [`Error::Cancelled`] rather than a partial result.
///
/// Calls may run concurrently through a shared reference. No ordering is guaranteed between
/// concurrent calls.
#[tonic::async_trait]
pub trait KeyValueStore: Send + Sync {
    /// Look up the value stored under `request.key`.
    async fn get_value(
        &self,
        request: GetRequest,
        cancel: CancellationToken,
    ) -> Result<GetResult, Error>;

    /// Store `request.value` under `request.key`.
    async fn put_value(
        &self,
        request: PutRequest,
        cancel: CancellationToken,
    ) -> Result<PutResult, Error>;

    /// Remove the value stored under `request.key`.
    ///
    /// An absent key is reported as `success == false`, not as an error.
    async fn remove_value(
        &self,
        request: RemoveRequest,
        cancel: CancellationToken,
    ) -> Result<RemoveResult, Error>;
}
