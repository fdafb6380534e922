use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};

/// Deterministic mapping from vertex id to owning partition. Must be a
/// pure function of `(id, partitions)`: senders route messages with the
/// same partitioner the loader assigned ownership with.
pub trait Partitioner<K>: Send + Sync {
    fn partition(&self, id: &K, partitions: usize) -> usize;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct HashPartitioner;

impl<K: Hash> Partitioner<K> for HashPartitioner {
    fn partition(&self, id: &K, partitions: usize) -> usize {
        let mut h = DefaultHasher::new();
        id.hash(&mut h);
        (h.finish() as usize) % partitions.max(1)
    }
}
