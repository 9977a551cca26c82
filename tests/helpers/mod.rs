use kvbridge::store::{KeyValueStore, MemoryStore};
use kvbridge::structs::kv::{
    GetRequest, GetResult, PutRequest, PutResult, RemoveRequest, RemoveResult,
};
use kvbridge::{CancellationToken, Error};
use std::sync::{Arc, Mutex};
use tokio::sync::Notify;

/// Remembers every put it sees before handing it to a [`MemoryStore`].
#[derive(Debug, Default)]
pub(crate) struct RecordingStore {
    inner: MemoryStore,
    puts: Mutex<Vec<PutRequest>>,
}

impl RecordingStore {
    pub(crate) fn puts(&self) -> Vec<PutRequest> {
        self.puts.lock().unwrap().clone()
    }
}

#[tonic::async_trait]
impl KeyValueStore for RecordingStore {
    async fn get_value(
        &self,
        request: GetRequest,
        cancel: CancellationToken,
    ) -> Result<GetResult, Error> {
        self.inner.get_value(request, cancel).await
    }

    async fn put_value(
        &self,
        request: PutRequest,
        cancel: CancellationToken,
    ) -> Result<PutResult, Error> {
        self.puts.lock().unwrap().push(request.clone());
        self.inner.put_value(request, cancel).await
    }

    async fn remove_value(
        &self,
        request: RemoveRequest,
        cancel: CancellationToken,
    ) -> Result<RemoveResult, Error> {
        self.inner.remove_value(request, cancel).await
    }
}

/// Fails every call.
#[derive(Debug)]
pub(crate) struct FailingStore;

#[tonic::async_trait]
impl KeyValueStore for FailingStore {
    async fn get_value(
        &self,
        _request: GetRequest,
        _cancel: CancellationToken,
    ) -> Result<GetResult, Error> {
        Err(Error::store("get exploded"))
    }

    async fn put_value(
        &self,
        _request: PutRequest,
        _cancel: CancellationToken,
    ) -> Result<PutResult, Error> {
        Err(Error::store("put exploded"))
    }

    async fn remove_value(
        &self,
        _request: RemoveRequest,
        _cancel: CancellationToken,
    ) -> Result<RemoveResult, Error> {
        Err(Error::store("remove exploded"))
    }
}

/// Never answers. Reports when a call has started and when its token was cancelled.
#[derive(Debug, Default)]
pub(crate) struct StallingStore {
    pub(crate) started: Arc<Notify>,
    pub(crate) cancelled: Arc<Notify>,
}

impl StallingStore {
    async fn stall<T>(&self, cancel: CancellationToken) -> Result<T, Error> {
        // The call future is dropped on cancellation, so watch the token from elsewhere.
        let cancelled = Arc::clone(&self.cancelled);
        let _watcher = tokio::spawn(async move {
            cancel.cancelled().await;
            cancelled.notify_one();
        });
        self.started.notify_one();
        std::future::pending().await
    }
}

#[tonic::async_trait]
impl KeyValueStore for StallingStore {
    async fn get_value(
        &self,
        _request: GetRequest,
        cancel: CancellationToken,
    ) -> Result<GetResult, Error> {
        self.stall(cancel).await
    }

    async fn put_value(
        &self,
        _request: PutRequest,
        cancel: CancellationToken,
    ) -> Result<PutResult, Error> {
        self.stall(cancel).await
    }

    async fn remove_value(
        &self,
        _request: RemoveRequest,
        cancel: CancellationToken,
    ) -> Result<RemoveResult, Error> {
        self.stall(cancel).await
    }
}

/// Reports every key as missing while stuffing bytes into the payload.
#[derive(Debug)]
pub(crate) struct SloppyMissStore;

#[tonic::async_trait]
impl KeyValueStore for SloppyMissStore {
    async fn get_value(
        &self,
        _request: GetRequest,
        _cancel: CancellationToken,
    ) -> Result<GetResult, Error> {
        Ok(GetResult::new(false, b"should never be seen".to_vec()))
    }

    async fn put_value(
        &self,
        _request: PutRequest,
        _cancel: CancellationToken,
    ) -> Result<PutResult, Error> {
        Ok(PutResult { success: false })
    }

    async fn remove_value(
        &self,
        _request: RemoveRequest,
        _cancel: CancellationToken,
    ) -> Result<RemoveResult, Error> {
        Ok(RemoveResult { success: false })
    }
}
