use crate::store::KeyValueStore;
use crate::structs::kv::{
    GetRequest, GetResult, PutRequest, PutResult, RemoveRequest, RemoveResult,
};
use crate::Error;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;

macro_rules! forward_store {
    ($($ptr:ident),*) => {$(
        #[tonic::async_trait]
        impl<Store> KeyValueStore for $ptr<Store>
        where
            Store: KeyValueStore + ?Sized,
        {
            async fn get_value(
                &self,
                request: GetRequest,
                cancel: CancellationToken,
            ) -> Result<GetResult, Error> {
                self.as_ref().get_value(request, cancel).await
            }

            async fn put_value(
                &self,
                request: PutRequest,
                cancel: CancellationToken,
            ) -> Result<PutResult, Error> {
                self.as_ref().put_value(request, cancel).await
            }

            async fn remove_value(
                &self,
                request: RemoveRequest,
                cancel: CancellationToken,
            ) -> Result<RemoveResult, Error> {
                self.as_ref().remove_value(request, cancel).await
            }
        }
    )*};
}

forward_store!(Arc, Box);
