pub mod rocksdb_state;

use graphbsp_common::error::BspResult;
use graphbsp_common::types::Vertex;
use serde::de::DeserializeOwned;
use serde::Serialize;

/// Persists and restores per-vertex computation state between runs.
/// `load_vertices` must reproduce exactly the fields `put_vertices`
/// wrote; malformed persisted state is a fatal load error, never
/// silently defaulted.
pub trait VertexStateStore<K, VV, EV>: Send + Sync {
    fn put_vertices(&self, vertices: &[Vertex<K, VV, EV>]) -> BspResult<()>;
    fn load_vertices(&self) -> BspResult<Vec<Vertex<K, VV, EV>>>;
    fn is_empty(&self) -> BspResult<bool>;
}

pub trait SerdeKey: Serialize + DeserializeOwned + Send + Sync + 'static {}
impl<T> SerdeKey for T where T: Serialize + DeserializeOwned + Send + Sync + 'static {}

pub trait SerdeValue: Serialize + DeserializeOwned + Send + Sync + 'static {}
impl<T> SerdeValue for T where T: Serialize + DeserializeOwned + Send + Sync + 'static {}
