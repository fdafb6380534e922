use graphbsp_api::partition::Partitioner;
use std::collections::HashMap;
use std::hash::Hash;
use std::sync::Arc;

pub type Outbox<K, M> = Vec<(K, M)>;
pub type Inbox<K, M> = HashMap<K, Vec<M>>;
pub type Inboxes<K, M> = Vec<Inbox<K, M>>;

/// Routes the messages emitted in superstep `t` into per-partition
/// inboxes for superstep `t+1`. Routing uses the same partitioner that
/// assigned vertex ownership at load time, so sender-side routing and
/// receiver-side ownership always agree.
pub struct MessageRouter<K> {
    partitioner: Arc<dyn Partitioner<K>>,
    partitions: usize,
}

impl<K> MessageRouter<K>
where
    K: Clone + Eq + Hash,
{
    pub fn new(partitioner: Arc<dyn Partitioner<K>>, partitions: usize) -> Self {
        Self {
            partitioner,
            partitions: partitions.max(1),
        }
    }

    pub fn partitions(&self) -> usize {
        self.partitions
    }

    pub fn empty_inboxes<M>(&self) -> Inboxes<K, M> {
        (0..self.partitions).map(|_| HashMap::new()).collect()
    }

    /// Returns the number of messages routed.
    pub fn route<M>(&self, outbox: Outbox<K, M>, next_inboxes: &mut Inboxes<K, M>) -> u64 {
        let mut routed = 0u64;
        for (target, msg) in outbox {
            let p = self.partitioner.partition(&target, self.partitions);
            next_inboxes[p].entry(target).or_default().push(msg);
            routed += 1;
        }
        routed
    }
}
