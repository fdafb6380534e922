use graphbsp_common::config::{Configuration, SOURCE_VERTEX, WORKERS};
use graphbsp_common::error::BspError;
use graphbsp_common::types::{Edge, Vertex};
use graphbsp_runtime::algorithms::sssp::ShortestPathsProgram;
use graphbsp_runtime::job::GraphJob;
use graphbsp_runtime::state::rocksdb_state::RocksDbVertexState;
use graphbsp_runtime::state::VertexStateStore;
use std::sync::Arc;

#[test]
fn test_vertex_state_round_trip() {
    let dir = tempfile::tempdir().unwrap();
    let store = RocksDbVertexState::open(dir.path()).unwrap();

    let mut halted = Vertex::new(2u64, 165u64, vec![Edge::new(1u64, 80u64)]);
    halted.active = false;
    let written = vec![
        Vertex::new(1, 85, vec![Edge::new(0, 85), Edge::new(5, 80)]),
        halted,
        Vertex::new(3, u64::MAX, vec![]),
    ];
    store.put_vertices(&written).unwrap();

    let mut loaded: Vec<Vertex<u64, u64, u64>> = store.load_vertices().unwrap();
    loaded.sort_by_key(|v| v.id);
    assert_eq!(loaded, written);
}

#[test]
fn test_empty_store_is_reported_empty() {
    let dir = tempfile::tempdir().unwrap();
    let store = RocksDbVertexState::open(dir.path()).unwrap();
    assert!(
        <RocksDbVertexState as VertexStateStore<u64, u64, u64>>::is_empty(&store).unwrap()
    );

    <RocksDbVertexState as VertexStateStore<u64, u64, u64>>::put_vertices(
        &store,
        &[Vertex::new(1, 0, vec![])],
    )
    .unwrap();
    assert!(
        !<RocksDbVertexState as VertexStateStore<u64, u64, u64>>::is_empty(&store).unwrap()
    );
}

#[test]
fn test_malformed_persisted_state_is_a_load_error() {
    let dir = tempfile::tempdir().unwrap();
    let store = RocksDbVertexState::open(dir.path()).unwrap();

    // Persist records of a different shape, then load them as u64-valued
    // vertices: the decode must fail loudly, not default.
    let written: Vec<Vertex<u64, String, u64>> =
        vec![Vertex::new(1, "x".to_string(), vec![])];
    store.put_vertices(&written).unwrap();

    let err = <RocksDbVertexState as VertexStateStore<u64, u64, u64>>::load_vertices(&store)
        .unwrap_err();
    assert!(matches!(err, BspError::State(_)));
}

#[test]
fn test_job_reloads_persisted_state_instead_of_input() {
    let dir = tempfile::tempdir().unwrap();
    let store = Arc::new(RocksDbVertexState::open(dir.path().join("state")).unwrap());

    // A previously converged run: all vertices halted.
    let mut persisted = vec![
        Vertex::new(0u64, 0u64, vec![Edge::new(1u64, 85u64)]),
        Vertex::new(1, 85, vec![Edge::new(0, 85)]),
    ];
    for v in &mut persisted {
        v.active = false;
    }
    store.put_vertices(&persisted).unwrap();

    let mut configuration = Configuration::new();
    configuration.put(WORKERS, "2");
    configuration.put(SOURCE_VERTEX, "0");
    let program = ShortestPathsProgram::from_configuration(&configuration).unwrap();

    // No reader configured: the store must satisfy init on its own.
    let outcome = GraphJob::new("sssp-resume", Arc::new(program))
        .configuration(configuration)
        .state_store(store)
        .run()
        .unwrap();

    assert!(outcome.converged);
    let mut vertices = outcome.vertices;
    vertices.sort_by_key(|v| v.id);
    assert_eq!(vertices, persisted);
}
