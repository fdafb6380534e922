use crate::state::{SerdeKey, SerdeValue, VertexStateStore};
use graphbsp_common::error::{BspError, BspResult};
use graphbsp_common::types::Vertex;
use rocksdb::{ColumnFamilyDescriptor, IteratorMode, Options, WriteBatch, DB};
use std::path::Path;
use std::sync::Arc;

const CF_VERTICES: &str = "vertices";

/// Vertex-state store backed by RocksDB. The whole vertex record
/// (id, value, edges, active) is stored bincode-encoded under the
/// encoded id.
#[derive(Clone)]
pub struct RocksDbVertexState {
    db: Arc<DB>,
}

impl RocksDbVertexState {
    pub fn open(path: impl AsRef<Path>) -> BspResult<Self> {
        let mut opts = Options::default();
        opts.create_if_missing(true);
        opts.create_missing_column_families(true);

        let cfs = vec![ColumnFamilyDescriptor::new(CF_VERTICES, Options::default())];

        let db = DB::open_cf_descriptors(&opts, path, cfs)
            .map_err(|e| BspError::State(format!("rocksdb open failed: {e}")))?;
        Ok(Self { db: Arc::new(db) })
    }

    fn cf(&self) -> BspResult<&rocksdb::ColumnFamily> {
        self.db
            .cf_handle(CF_VERTICES)
            .ok_or_else(|| BspError::Internal(format!("missing column family: {CF_VERTICES}")))
    }

    fn encode<T: serde::Serialize>(v: &T) -> BspResult<Vec<u8>> {
        bincode::serialize(v).map_err(|e| BspError::State(format!("bincode encode: {e}")))
    }

    fn decode<T: serde::de::DeserializeOwned>(bytes: &[u8]) -> BspResult<T> {
        bincode::deserialize(bytes)
            .map_err(|e| BspError::State(format!("malformed persisted vertex state: {e}")))
    }
}

impl<K, VV, EV> VertexStateStore<K, VV, EV> for RocksDbVertexState
where
    K: SerdeKey,
    VV: SerdeValue,
    EV: SerdeValue,
{
    fn put_vertices(&self, vertices: &[Vertex<K, VV, EV>]) -> BspResult<()> {
        let cf = self.cf()?;
        let mut batch = WriteBatch::default();
        for v in vertices {
            batch.put_cf(cf, Self::encode(&v.id)?, Self::encode(v)?);
        }
        self.db
            .write(batch)
            .map_err(|e| BspError::State(format!("rocksdb write batch: {e}")))?;
        Ok(())
    }

    fn load_vertices(&self) -> BspResult<Vec<Vertex<K, VV, EV>>> {
        let cf = self.cf()?;
        let mut out = Vec::new();
        let iter = self.db.iterator_cf(cf, IteratorMode::Start);
        for kv in iter {
            let (_, v) = kv.map_err(|e| BspError::State(format!("rocksdb iter: {e}")))?;
            out.push(Self::decode(&v)?);
        }
        Ok(out)
    }

    fn is_empty(&self) -> BspResult<bool> {
        let cf = self.cf()?;
        let mut iter = self.db.iterator_cf(cf, IteratorMode::Start);
        match iter.next() {
            None => Ok(true),
            Some(Ok(_)) => Ok(false),
            Some(Err(e)) => Err(BspError::State(format!("rocksdb iter: {e}"))),
        }
    }
}
