//! Both halves of the bridge joined in-process.
//!
//! A [`StoreService`] is served over an in-memory pipe and a [`RemoteStore`] is connected to it.
//! Every call still goes through the full gRPC encode/decode path, which makes this useful for
//! tests and for embedding a store behind the same interface a network client would use.

use crate::client::RemoteStore;
use crate::server::StoreService;
use crate::store::KeyValueStore;
use crate::tracing_shim::debug;
use crate::Error;
use hyper_util::rt::TokioIo;
use tonic::transport::{Channel, Endpoint, Server};

const DUPLEX_SIZE: usize = 64 * 1024;

/// Serve `store` in-process and return a client for it.
pub async fn remote_store<Store>(store: Store) -> Result<RemoteStore, Error>
where
    Store: KeyValueStore + 'static,
{
    channel(StoreService::new(store)).await.map(RemoteStore::new)
}

/// Serve `service` in-process and return a channel connected to it.
///
/// The service runs until the channel and all of its clones are dropped.
pub async fn channel(service: StoreService) -> Result<Channel, Error> {
    let (client, server) = tokio::io::duplex(DUPLEX_SIZE);

    let _join_handle = tokio::spawn(async move {
        let served = Server::builder()
            .add_service(service.into_server())
            .serve_with_incoming(tokio_stream::once(Ok::<_, std::io::Error>(server)))
            .await;
        if let Err(err) = &served {
            debug!(%err, "in-process service stopped");
        }
        served
    });

    let mut client = Some(client);
    // The URI is never dialed; the connector below hands out the pipe instead.
    let channel = Endpoint::try_from("http://[::]:50051")?
        .connect_with_connector(tower::service_fn(move |_| {
            let client = client.take();
            async move {
                client.map(TokioIo::new).ok_or_else(|| {
                    std::io::Error::new(
                        std::io::ErrorKind::NotConnected,
                        "the in-process pipe was already taken",
                    )
                })
            }
        }))
        .await?;

    Ok(channel)
}
