//! Plain request and result values exchanged with a [`KeyValueStore`](crate::store::KeyValueStore).

pub mod kv;
