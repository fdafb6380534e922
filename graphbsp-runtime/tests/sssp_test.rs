use graphbsp_common::config::{Configuration, SOURCE_VERTEX, WORKERS};
use graphbsp_runtime::algorithms::sssp::{ShortestPathsProgram, INFINITY};
use graphbsp_runtime::io::text::{AdjacencyListReader, TextVertexWriter};
use graphbsp_runtime::job::GraphJob;
use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;

const ADJACENCY: [&str; 10] = [
    "1:85\t2:217\t4:173",
    "0:85\t5:80",
    "0:217\t6:186\t7:103",
    "7:183",
    "0:173\t9:502",
    "1:80\t8:250",
    "2:186",
    "3:183\t9:167\t2:103",
    "5:250\t9:84",
    "4:502\t7:167\t8:84",
];

fn write_fixture(path: &Path) {
    let mut lines = String::new();
    for (id, edges) in ADJACENCY.iter().enumerate() {
        lines.push_str(&format!("{id}\t{edges}\n"));
    }
    std::fs::write(path, lines).unwrap();
}

fn read_distances(path: &Path) -> HashMap<u64, u64> {
    std::fs::read_to_string(path)
        .unwrap()
        .lines()
        .map(|line| {
            let (id, value) = line.split_once('\t').unwrap();
            (id.parse().unwrap(), value.parse().unwrap())
        })
        .collect()
}

fn sssp_job(source: u64, workers: usize, input: &Path, output: &Path) -> GraphJob<u64, u64, u64, u64> {
    let mut configuration = Configuration::new();
    configuration.put(WORKERS, workers.to_string());
    configuration.put(SOURCE_VERTEX, source.to_string());
    let program = ShortestPathsProgram::from_configuration(&configuration).unwrap();
    GraphJob::new("sssp", Arc::new(program))
        .configuration(configuration)
        .reader(Box::new(AdjacencyListReader::new(INFINITY)), input)
        .writer(Box::new(TextVertexWriter), output)
}

#[test]
fn test_shortest_paths_converge() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("graph.txt");
    let output = dir.path().join("distances.txt");
    write_fixture(&input);

    let outcome = sssp_job(0, 3, &input, &output).run().unwrap();
    assert!(outcome.converged);

    let expected: HashMap<u64, u64> = [
        (0, 0),
        (1, 85),
        (2, 217),
        (3, 503),
        (4, 173),
        (5, 165),
        (6, 403),
        (7, 320),
        (8, 415),
        (9, 487),
    ]
    .into_iter()
    .collect();
    assert_eq!(read_distances(&output), expected);
}

#[test]
fn test_single_worker_matches_partitioned_run() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("graph.txt");
    write_fixture(&input);

    let one = dir.path().join("one.txt");
    let four = dir.path().join("four.txt");
    sssp_job(0, 1, &input, &one).run().unwrap();
    sssp_job(0, 4, &input, &four).run().unwrap();

    assert_eq!(read_distances(&one), read_distances(&four));
}

#[test]
fn test_max_iteration_early_stop() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("graph.txt");
    write_fixture(&input);

    let full_out = dir.path().join("full.txt");
    let capped_out = dir.path().join("capped.txt");

    let full = sssp_job(0, 3, &input, &full_out).run().unwrap();
    assert!(full.converged);

    let capped = sssp_job(0, 3, &input, &capped_out)
        .max_iteration(2)
        .run()
        .unwrap();
    assert!(!capped.converged);
    assert_eq!(capped.supersteps, 2);

    let full = read_distances(&full_out);
    let capped = read_distances(&capped_out);

    // Two supersteps settle the source and its direct neighbors.
    for id in [0u64, 1, 2, 4] {
        assert_eq!(capped[&id], full[&id]);
    }
    // The rest is a valid partial result: never below the true distance.
    for (id, distance) in &capped {
        assert!(*distance >= full[id]);
    }
}

#[test]
fn test_missing_source_vertex_is_a_config_error() {
    let configuration = Configuration::new();
    let err = ShortestPathsProgram::from_configuration(&configuration).unwrap_err();
    assert!(matches!(
        err,
        graphbsp_common::error::BspError::Config(_)
    ));
}
