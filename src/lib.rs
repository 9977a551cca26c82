//! A two-way bridge between a storage-agnostic key-value interface and a gRPC service.
//!
//! - [`client::RemoteStore`] implements [`store::KeyValueStore`] by forwarding every call to a
//!   remote service.
//! - [`server::StoreService`] exposes any [`store::KeyValueStore`] as that remote service.
//!
//! The two adapters only ever meet across a transport. [`host`] binds a service to a socket and
//! [`transitive`] wires both ends together in-process.

mod error;
pub mod client;
pub mod host;
pub mod interop;
pub mod server;
pub mod store;
pub mod structs;
pub mod transitive;
mod tracing_shim;

pub use self::error::Error;
pub use tokio_util::sync::CancellationToken;

/// Generated protobuf types and gRPC stubs.
pub mod proto {
    /// The key-value wire schema.
    #[allow(
        missing_docs,
        clippy::missing_docs_in_private_items,
        unreachable_pub,
        unused_qualifications,
        unused_results
    )]
    pub mod kv {
        tonic::include_proto!("kvbridge.kv");
    }
}

/// The response of a unary RPC.
pub type RpcResponse<T> = Result<tonic::Response<T>, tonic::Status>;
