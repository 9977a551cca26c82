//! Expose any [`KeyValueStore`] as a gRPC service.

pub use crate::proto::kv::key_value_store_server::{
    KeyValueStore as KeyValueStoreRpc, KeyValueStoreServer,
};
use crate::proto::kv::{
    GetValueRequest, GetValueResponse, PutValueRequest, PutValueResponse, RemoveValueRequest,
    RemoveValueResponse,
};
use crate::store::KeyValueStore;
use crate::structs::kv::{GetRequest, PutRequest, PutResult, RemoveRequest, RemoveResult};
use crate::tracing_shim::{debug_span, warn, Instrument as _};
use crate::{Error, RpcResponse};
use std::fmt;
use std::future::Future;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tonic::{Request, Response, Status};

/// The server side of the bridge.
///
/// Every incoming request is translated field-for-field into a call on the wrapped store, and its
/// result is translated back. Errors raised by the store are returned as a gRPC status; they are
/// never turned into a negative result.
#[derive(Clone)]
pub struct StoreService {
    store: Arc<dyn KeyValueStore>,
}

impl fmt::Debug for StoreService {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StoreService").finish_non_exhaustive()
    }
}

impl StoreService {
    /// Serve `store`.
    #[inline]
    pub fn new<Store>(store: Store) -> Self
    where
        Store: KeyValueStore + 'static,
    {
        Self::from_shared(Arc::new(store))
    }

    /// Serve a store that is shared with other owners.
    #[inline]
    pub fn from_shared(store: Arc<dyn KeyValueStore>) -> Self {
        Self { store }
    }

    /// Wrap the service so it can be added to a [`tonic::transport::Server`].
    #[inline]
    pub fn into_server(self) -> KeyValueStoreServer<Self> {
        KeyValueStoreServer::new(self)
    }
}

/// Run a store call with a token that is cancelled if the transport drops the call first.
///
/// Dropping the handler future drops the guard and cancels the token. On completion the guard is
/// disarmed, so the store never sees a cancellation for a call that finished.
async fn with_call_token<T, Fut>(
    call: impl FnOnce(CancellationToken) -> Fut,
) -> Result<T, Status>
where
    Fut: Future<Output = Result<T, Error>>,
{
    let cancel = CancellationToken::new();
    let guard = cancel.clone().drop_guard();
    let result = call(cancel).await;
    let _token = guard.disarm();

    result.map_err(|err| {
        warn!(%err, "store call failed");
        Status::from(err)
    })
}

#[tonic::async_trait]
impl KeyValueStoreRpc for StoreService {
    async fn get_value(&self, request: Request<GetValueRequest>) -> RpcResponse<GetValueResponse> {
        let GetValueRequest { key } = request.into_inner();
        let span = debug_span!("serve_get_value", key = %key);
        let (found, value) = with_call_token(|cancel| {
            self.store.get_value(GetRequest { key }, cancel)
        })
        .instrument(span)
        .await?
        .into_parts();
        Ok(Response::new(GetValueResponse { found, value }))
    }

    async fn put_value(&self, request: Request<PutValueRequest>) -> RpcResponse<PutValueResponse> {
        let PutValueRequest { key, value } = request.into_inner();
        let span = debug_span!("serve_put_value", key = %key, len = value.len());
        let PutResult { success } = with_call_token(|cancel| {
            self.store.put_value(PutRequest { key, value }, cancel)
        })
        .instrument(span)
        .await?;
        Ok(Response::new(PutValueResponse { success }))
    }

    async fn remove_value(
        &self,
        request: Request<RemoveValueRequest>,
    ) -> RpcResponse<RemoveValueResponse> {
        let RemoveValueRequest { key } = request.into_inner();
        let span = debug_span!("serve_remove_value", key = %key);
        let RemoveResult { success } = with_call_token(|cancel| {
            self.store.remove_value(RemoveRequest { key }, cancel)
        })
        .instrument(span)
        .await?;
        Ok(Response::new(RemoveValueResponse { success }))
    }
}
