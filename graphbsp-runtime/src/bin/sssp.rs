use clap::Parser;
use graphbsp_common::config::{Configuration, MAX_ITERATION, SOURCE_VERTEX, WORKERS};
use graphbsp_common::error::BspResult;
use graphbsp_runtime::algorithms::sssp::{ShortestPathsProgram, INFINITY};
use graphbsp_runtime::io::text::{AdjacencyListReader, TextVertexWriter};
use graphbsp_runtime::job::GraphJob;
use graphbsp_runtime::observability::init_tracing;
use graphbsp_runtime::state::rocksdb_state::RocksDbVertexState;
use std::path::PathBuf;
use std::sync::Arc;

#[derive(Debug, Parser)]
#[command(
    name = "sssp",
    about = "single-source shortest paths on the BSP graph engine"
)]
struct Args {
    /// Seed vertex for the shortest-path computation
    source: u64,

    /// Tab-separated adjacency input: id, then target:weight fields
    input: PathBuf,

    /// Output path, one id<TAB>distance record per vertex
    output: PathBuf,

    /// Worker/partition count
    workers: usize,

    /// Hard superstep ceiling; by default the job runs to convergence
    #[arg(long)]
    max_iteration: Option<u64>,

    /// Persist final vertex state here and reload it on the next run
    #[arg(long)]
    state_dir: Option<PathBuf>,
}

fn run(args: Args) -> BspResult<()> {
    let mut configuration = Configuration::new();
    configuration.put(WORKERS, args.workers.to_string());
    configuration.put(SOURCE_VERTEX, args.source.to_string());
    if let Some(max) = args.max_iteration {
        configuration.put(MAX_ITERATION, max.to_string());
    }

    let program = ShortestPathsProgram::from_configuration(&configuration)?;
    let mut job = GraphJob::new("sssp", Arc::new(program))
        .configuration(configuration)
        .reader(Box::new(AdjacencyListReader::new(INFINITY)), args.input)
        .writer(Box::new(TextVertexWriter), args.output);
    if let Some(dir) = &args.state_dir {
        job = job.state_store(Arc::new(RocksDbVertexState::open(dir)?));
    }

    let outcome = job.run()?;
    tracing::info!(
        supersteps = outcome.supersteps,
        converged = outcome.converged,
        "sssp finished"
    );
    Ok(())
}

fn main() {
    let args = Args::parse();
    init_tracing();
    if let Err(e) = run(args) {
        eprintln!("sssp: {e}");
        std::process::exit(1);
    }
}
