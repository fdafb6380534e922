use graphbsp_common::error::BspResult;
use graphbsp_common::types::Vertex;
use std::path::Path;

/// Produces the initial vertex set from a raw record source. Consumed
/// once at job init, unless a non-empty state store takes precedence.
pub trait VertexReader<K, VV, EV>: Send + Sync {
    fn read(&self, path: &Path) -> BspResult<Vec<Vertex<K, VV, EV>>>;
}

/// Consumes the final vertices once the engine halts.
pub trait VertexWriter<K, VV, EV>: Send + Sync {
    fn write(&self, path: &Path, vertices: &[Vertex<K, VV, EV>]) -> BspResult<()>;
}
