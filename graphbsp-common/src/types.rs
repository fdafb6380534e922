use serde::{Deserialize, Serialize};

/// An outgoing edge, owned by its source vertex.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Edge<K, EV> {
    pub target_id: K,
    pub value: EV,
}

impl<K, EV> Edge<K, EV> {
    pub fn new(target_id: K, value: EV) -> Self {
        Self { target_id, value }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Vertex<K, VV, EV> {
    pub id: K,
    pub value: VV,
    pub edges: Vec<Edge<K, EV>>,
    pub active: bool,
}

impl<K, VV, EV> Vertex<K, VV, EV> {
    /// A freshly loaded vertex starts active.
    pub fn new(id: K, value: VV, edges: Vec<Edge<K, EV>>) -> Self {
        Self {
            id,
            value,
            edges,
            active: true,
        }
    }
}
