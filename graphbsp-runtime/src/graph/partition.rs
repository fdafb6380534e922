use crate::shuffle::Inbox;
use graphbsp_api::partition::Partitioner;
use graphbsp_common::error::{BspError, BspResult};
use graphbsp_common::types::Vertex;
use std::collections::HashMap;
use std::fmt::Debug;
use std::hash::Hash;

/// A disjoint subset of the graph's vertices, exclusively owned by one
/// worker. Assignment is fixed at load time and never changes during a
/// run. Vertices live in a dense vector with an id index so the compute
/// loop can iterate them in parallel.
pub struct GraphPartition<K, VV, EV> {
    id: usize,
    vertices: Vec<Vertex<K, VV, EV>>,
    index: HashMap<K, usize>,
}

impl<K, VV, EV> GraphPartition<K, VV, EV>
where
    K: Clone + Eq + Hash + Debug,
{
    pub fn from_vertices(id: usize, vertices: Vec<Vertex<K, VV, EV>>) -> BspResult<Self> {
        let mut index = HashMap::with_capacity(vertices.len());
        for (i, v) in vertices.iter().enumerate() {
            if index.insert(v.id.clone(), i).is_some() {
                return Err(BspError::Config(format!(
                    "duplicate vertex id {:?} in partition {id}",
                    v.id
                )));
            }
        }
        Ok(Self {
            id,
            vertices,
            index,
        })
    }

    pub fn id(&self) -> usize {
        self.id
    }

    pub fn len(&self) -> usize {
        self.vertices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty()
    }

    pub fn vertices(&self) -> &[Vertex<K, VV, EV>] {
        &self.vertices
    }

    pub fn vertices_mut(&mut self) -> &mut [Vertex<K, VV, EV>] {
        &mut self.vertices
    }

    pub fn take_vertices(&mut self) -> Vec<Vertex<K, VV, EV>> {
        self.index.clear();
        std::mem::take(&mut self.vertices)
    }

    /// Distributes an inbox into per-vertex message slots, index-aligned
    /// with the vertex vector. Delivery reactivates a halted target. A
    /// message for an id this partition does not own means the graph and
    /// the partition assignment disagree, which is fatal.
    pub fn distribute<M>(&mut self, inbox: Inbox<K, M>) -> BspResult<Vec<Vec<M>>> {
        let mut slots: Vec<Vec<M>> = (0..self.vertices.len()).map(|_| Vec::new()).collect();
        for (target, mut msgs) in inbox {
            match self.index.get(&target) {
                Some(&i) => {
                    self.vertices[i].active = true;
                    slots[i].append(&mut msgs);
                }
                None => {
                    return Err(BspError::Routing(format!(
                        "message addressed to vertex {target:?}, not owned by partition {}",
                        self.id
                    )))
                }
            }
        }
        Ok(slots)
    }
}

/// Splits the loaded vertex set into `partitions` disjoint partitions by
/// vertex id. Every id maps to exactly one partition.
pub fn build_partitions<K, VV, EV>(
    vertices: Vec<Vertex<K, VV, EV>>,
    partitioner: &dyn Partitioner<K>,
    partitions: usize,
) -> BspResult<Vec<GraphPartition<K, VV, EV>>>
where
    K: Clone + Eq + Hash + Debug,
{
    let partitions = partitions.max(1);
    let mut buckets: Vec<Vec<Vertex<K, VV, EV>>> = (0..partitions).map(|_| Vec::new()).collect();
    for v in vertices {
        let p = partitioner.partition(&v.id, partitions);
        buckets[p].push(v);
    }
    buckets
        .into_iter()
        .enumerate()
        .map(|(id, bucket)| GraphPartition::from_vertices(id, bucket))
        .collect()
}
