//! Binding a [`StoreService`] to a network listener.
//!
//! The listener lifecycle lives here rather than in the adapters: a host is configured once at
//! startup, started explicitly, and shut down explicitly (or when its handle is dropped).

use crate::server::StoreService;
use crate::store::KeyValueStore;
use crate::tracing_shim::info;
use crate::Error;
use std::future::Future;
use std::net::{Ipv6Addr, SocketAddr};
use std::sync::Arc;
use tokio::net::TcpListener;
use tokio::sync::oneshot;
use tokio::task::JoinHandle;
use tokio_stream::wrappers::TcpListenerStream;
use tonic::transport::Server;

/// The address a host listens on unless told otherwise.
pub const DEFAULT_ADDR: SocketAddr = SocketAddr::new(
    std::net::IpAddr::V6(Ipv6Addr::LOCALHOST),
    50051,
);

/// Configuration for a [`ServiceHost`].
#[must_use]
pub struct HostBuilder {
    store: Option<Arc<dyn KeyValueStore>>,
    addr: SocketAddr,
}

impl std::fmt::Debug for HostBuilder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HostBuilder")
            .field("has_store", &self.store.is_some())
            .field("addr", &self.addr)
            .finish()
    }
}

impl Default for HostBuilder {
    fn default() -> Self {
        Self {
            store: None,
            addr: DEFAULT_ADDR,
        }
    }
}

impl HostBuilder {
    /// The store to serve.
    #[inline]
    pub fn store<Store>(self, store: Store) -> Self
    where
        Store: KeyValueStore + 'static,
    {
        self.shared_store(Arc::new(store))
    }

    /// A store to serve that is also used elsewhere.
    #[inline]
    pub fn shared_store(mut self, store: Arc<dyn KeyValueStore>) -> Self {
        self.store = Some(store);
        self
    }

    /// The address to listen on. Port `0` picks a free port.
    #[inline]
    pub fn addr(mut self, addr: SocketAddr) -> Self {
        self.addr = addr;
        self
    }

    /// Finish configuration.
    ///
    /// Fails with [`Error::Configuration`] if no store was supplied.
    pub fn build(self) -> Result<ServiceHost, Error> {
        let store = self
            .store
            .ok_or(Error::Configuration("no key-value store was supplied to the host"))?;
        Ok(ServiceHost {
            service: StoreService::from_shared(store),
            addr: self.addr,
        })
    }
}

/// A configured, not yet listening, key-value service.
#[derive(Debug)]
pub struct ServiceHost {
    service: StoreService,
    addr: SocketAddr,
}

impl ServiceHost {
    #[allow(missing_docs)]
    #[inline]
    pub fn builder() -> HostBuilder {
        HostBuilder::default()
    }

    /// Bind the listener and start accepting connections in the background.
    pub async fn start(self) -> Result<RunningHost, Error> {
        let listener = TcpListener::bind(self.addr).await?;
        let local_addr = listener.local_addr()?;
        let (shutdown, signal) = oneshot::channel::<()>();

        let router = Server::builder().add_service(self.service.into_server());
        let task = tokio::spawn(router.serve_with_incoming_shutdown(
            TcpListenerStream::new(listener),
            async move {
                // Either an explicit shutdown or a dropped handle.
                let _signalled = signal.await;
            },
        ));
        info!(%local_addr, "key-value service listening");

        Ok(RunningHost {
            local_addr,
            shutdown,
            task,
        })
    }

    /// Serve until `signal` resolves, then shut down.
    pub async fn serve_until(self, signal: impl Future<Output = ()>) -> Result<(), Error> {
        let host = self.start().await?;
        signal.await;
        host.shutdown().await
    }
}

/// A listening key-value service.
///
/// Dropping the handle stops the listener without waiting for it.
#[derive(Debug)]
pub struct RunningHost {
    local_addr: SocketAddr,
    shutdown: oneshot::Sender<()>,
    task: JoinHandle<Result<(), tonic::transport::Error>>,
}

impl RunningHost {
    /// The address the listener is bound to.
    #[inline]
    pub const fn local_addr(&self) -> SocketAddr {
        self.local_addr
    }

    /// The URI a [`RemoteStore`](crate::client::RemoteStore) can connect to.
    pub fn uri(&self) -> String {
        format!("http://{}", self.local_addr)
    }

    /// Stop accepting connections, wait for in-flight calls to finish, and release the listener.
    pub async fn shutdown(self) -> Result<(), Error> {
        info!(local_addr = %self.local_addr, "key-value service shutting down");
        let _sent = self.shutdown.send(());
        match self.task.await {
            Ok(served) => served.map_err(Error::from),
            Err(err) if err.is_panic() => std::panic::resume_unwind(err.into_panic()),
            Err(_) => Ok(()),
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::client::RemoteStore;
    use crate::store::MemoryStore;
    use crate::structs::kv::{GetRequest, PutRequest};
    use std::net::Ipv4Addr;
    use tokio_util::sync::CancellationToken;

    #[test]
    fn missing_store_fails_at_build() {
        let result = ServiceHost::builder().build();
        assert!(matches!(result, Err(Error::Configuration(_))));
    }

    #[tokio::test]
    async fn serves_over_tcp_until_shutdown() -> Result<(), Error> {
        let host = ServiceHost::builder()
            .store(MemoryStore::new())
            .addr(SocketAddr::from((Ipv4Addr::LOCALHOST, 0)))
            .build()?
            .start()
            .await?;
        assert_ne!(host.local_addr().port(), 0);

        let remote = RemoteStore::connect(host.uri()).await?;
        let put = remote
            .put_value(PutRequest::new("a", b"tcp".to_vec()), CancellationToken::new())
            .await?;
        assert!(put.success);
        let got = remote
            .get_value(GetRequest::new("a"), CancellationToken::new())
            .await?;
        assert_eq!(got.value(), Some(&b"tcp"[..]));

        drop(remote);
        host.shutdown().await
    }
}
