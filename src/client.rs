//! A [`KeyValueStore`] whose calls are carried out by a remote gRPC service.

use crate::proto::kv::key_value_store_client::KeyValueStoreClient;
use crate::proto::kv::{
    GetValueRequest, GetValueResponse, PutValueRequest, PutValueResponse, RemoveValueRequest,
    RemoveValueResponse,
};
use crate::store::KeyValueStore;
use crate::structs::kv::{
    GetRequest, GetResult, PutRequest, PutResult, RemoveRequest, RemoveResult,
};
use crate::tracing_shim::{debug, debug_span, Instrument as _};
use crate::Error;
use std::future::{self, Future};
use std::time::Duration;
use tokio_util::sync::CancellationToken;
use tonic::transport::{Channel, Endpoint};

/// The client side of the bridge.
///
/// Each call is translated field-for-field into exactly one unary RPC. There is no retrying,
/// caching, or batching; policies like these belong to whoever owns the adapter.
///
/// Cloning is cheap and clones share the underlying connection.
#[derive(Debug, Clone)]
pub struct RemoteStore {
    client: KeyValueStoreClient<Channel>,
    timeout: Option<Duration>,
}

impl RemoteStore {
    /// Use an already established channel.
    #[inline]
    pub fn new(channel: Channel) -> Self {
        Self {
            client: KeyValueStoreClient::new(channel),
            timeout: None,
        }
    }

    /// Connect to the service at `uri`, failing if the connection cannot be established.
    pub async fn connect(uri: impl Into<String>) -> Result<Self, Error> {
        let channel = endpoint(uri)?.connect().await?;
        Ok(Self::new(channel))
    }

    /// Prepare a connection to the service at `uri` without connecting.
    ///
    /// The connection is made on the first call. If the service cannot be reached, that call
    /// fails with [`Error::Unavailable`].
    pub fn connect_lazy(uri: impl Into<String>) -> Result<Self, Error> {
        Ok(Self::new(endpoint(uri)?.connect_lazy()))
    }

    /// Abandon every call that takes longer than `timeout`.
    ///
    /// The deadline is sent along with each request so that the service can give up as well. An
    /// expired call fails with [`Error::Cancelled`].
    #[inline]
    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    fn request<T>(&self, message: T) -> tonic::Request<T> {
        let mut request = tonic::Request::new(message);
        if let Some(timeout) = self.timeout {
            request.set_timeout(timeout);
        }
        request
    }

    /// Drive a single RPC, giving up as soon as the caller cancels or the deadline passes.
    ///
    /// Dropping the RPC future resets its stream, which is how the service learns of the
    /// cancellation.
    async fn call<T>(
        &self,
        cancel: &CancellationToken,
        rpc: impl Future<Output = Result<tonic::Response<T>, tonic::Status>>,
    ) -> Result<T, Error> {
        if cancel.is_cancelled() {
            debug!("cancelled before the call was made");
            return Err(Error::Cancelled);
        }

        let deadline = async {
            match self.timeout {
                Some(timeout) => tokio::time::sleep(timeout).await,
                None => future::pending().await,
            }
        };

        let result = tokio::select! {
            biased;
            () = cancel.cancelled() => Err(Error::Cancelled),
            () = deadline => Err(Error::Cancelled),
            response = rpc => response.map(tonic::Response::into_inner).map_err(Error::from),
        };
        if let Err(err) = &result {
            debug!(%err, "remote call failed");
        }
        result
    }
}

fn endpoint(uri: impl Into<String>) -> Result<Endpoint, Error> {
    Endpoint::from_shared(uri.into())
        .map_err(|_| Error::Configuration("the endpoint is not a valid URI"))
}

#[tonic::async_trait]
impl KeyValueStore for RemoteStore {
    async fn get_value(
        &self,
        GetRequest { key }: GetRequest,
        cancel: CancellationToken,
    ) -> Result<GetResult, Error> {
        let span = debug_span!("remote_get_value", key = %key);
        let mut client = self.client.clone();
        let request = self.request(GetValueRequest { key });
        let GetValueResponse { found, value } = self
            .call(&cancel, client.get_value(request))
            .instrument(span)
            .await?;
        Ok(GetResult::new(found, value))
    }

    async fn put_value(
        &self,
        PutRequest { key, value }: PutRequest,
        cancel: CancellationToken,
    ) -> Result<PutResult, Error> {
        let span = debug_span!("remote_put_value", key = %key, len = value.len());
        let mut client = self.client.clone();
        let request = self.request(PutValueRequest { key, value });
        let PutValueResponse { success } = self
            .call(&cancel, client.put_value(request))
            .instrument(span)
            .await?;
        Ok(PutResult { success })
    }

    async fn remove_value(
        &self,
        RemoveRequest { key }: RemoveRequest,
        cancel: CancellationToken,
    ) -> Result<RemoveResult, Error> {
        let span = debug_span!("remote_remove_value", key = %key);
        let mut client = self.client.clone();
        let request = self.request(RemoveValueRequest { key });
        let RemoveValueResponse { success } = self
            .call(&cancel, client.remove_value(request))
            .instrument(span)
            .await?;
        Ok(RemoveResult { success })
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn malformed_uri_is_a_configuration_error() {
        let result = RemoteStore::connect_lazy("not a uri");
        assert!(matches!(result, Err(Error::Configuration(_))));
    }

    #[tokio::test]
    async fn cancelled_token_short_circuits() -> Result<(), Error> {
        // Nothing listens on this port; an attempted call would fail differently.
        let store = RemoteStore::connect_lazy("http://127.0.0.1:9")?;
        let cancel = CancellationToken::new();
        cancel.cancel();

        let result = store.get_value(GetRequest::new("key"), cancel).await;
        assert!(matches!(result, Err(Error::Cancelled)));
        Ok(())
    }
}
