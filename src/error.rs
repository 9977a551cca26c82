use std::error::Error as StdError;

/// Everything that can go wrong while bridging a key-value call.
///
/// A negative outcome (`found == false`, `success == false`) is not an error. Only calls that did
/// not complete are reported through this type.
#[non_exhaustive]
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// A required collaborator was missing or malformed when an adapter was constructed.
    #[error("configuration error: {0}")]
    Configuration(&'static str),
    /// The connection to the remote service could not be established.
    #[error("transport error: {0}")]
    Transport(#[from] tonic::transport::Error),
    /// The call was cancelled by the caller or its deadline expired.
    #[error("call was cancelled")]
    Cancelled,
    /// The remote service could not be reached while making the call.
    #[error("service unavailable: {}", .0.message())]
    Unavailable(Box<tonic::Status>),
    /// The remote service reported a fault.
    #[error("remote call failed ({:?}): {}", .0.code(), .0.message())]
    Remote(Box<tonic::Status>),
    /// The service host could not bind or accept connections.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    /// The storage engine failed to serve the request.
    #[error("store failed: {0}")]
    Store(#[source] Box<dyn StdError + Send + Sync>),
}

impl Error {
    /// Wrap an error raised by a storage engine.
    #[inline]
    pub fn store<E>(err: E) -> Self
    where
        E: Into<Box<dyn StdError + Send + Sync>>,
    {
        Self::Store(err.into())
    }

    /// Whether the call was abandoned rather than failed.
    #[inline]
    pub const fn is_cancelled(&self) -> bool {
        matches!(self, Self::Cancelled)
    }
}
