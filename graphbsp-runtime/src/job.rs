use crate::graph::partition::build_partitions;
use crate::scheduler::superstep_scheduler::SuperstepScheduler;
use crate::state::VertexStateStore;
use graphbsp_api::aggregate::Aggregator;
use graphbsp_api::io::{VertexReader, VertexWriter};
use graphbsp_api::partition::{HashPartitioner, Partitioner};
use graphbsp_api::program::VertexProgram;
use graphbsp_common::config::{Configuration, JobConfig, MAX_ITERATION, WORKERS};
use graphbsp_common::error::{BspError, BspResult};
use graphbsp_common::types::Vertex;
use std::fmt::Debug;
use std::hash::Hash;
use std::path::PathBuf;
use std::sync::atomic::AtomicBool;
use std::sync::Arc;

#[derive(Debug, Clone)]
pub struct JobOutcome<K, VV, EV> {
    pub supersteps: u64,
    pub converged: bool,
    pub aborted: bool,
    pub vertices: Vec<Vertex<K, VV, EV>>,
}

/// Wires a vertex program, a partitioner, I/O and an optional state
/// store into one runnable graph job. Pluggable collaborators are
/// selected here, at configuration time.
pub struct GraphJob<K, VV, EV, M> {
    name: String,
    configuration: Configuration,
    program: Arc<dyn VertexProgram<K, VV, EV, M>>,
    partitioner: Arc<dyn Partitioner<K>>,
    reader: Option<Box<dyn VertexReader<K, VV, EV>>>,
    writer: Option<Box<dyn VertexWriter<K, VV, EV>>>,
    input: Option<PathBuf>,
    output: Option<PathBuf>,
    state_store: Option<Arc<dyn VertexStateStore<K, VV, EV>>>,
    aggregator: Option<Arc<dyn Aggregator<VV>>>,
    abort: Arc<AtomicBool>,
}

impl<K, VV, EV, M> GraphJob<K, VV, EV, M>
where
    K: Clone + Eq + Hash + Debug + Send + Sync + 'static,
    VV: Clone + Send + Sync + 'static,
    EV: Send + Sync + 'static,
    M: Send + 'static,
{
    pub fn new(name: impl Into<String>, program: Arc<dyn VertexProgram<K, VV, EV, M>>) -> Self {
        Self {
            name: name.into(),
            configuration: Configuration::new(),
            program,
            partitioner: Arc::new(HashPartitioner),
            reader: None,
            writer: None,
            input: None,
            output: None,
            state_store: None,
            aggregator: None,
            abort: Arc::new(AtomicBool::new(false)),
        }
    }

    pub fn configuration(mut self, configuration: Configuration) -> Self {
        self.configuration = configuration;
        self
    }

    pub fn workers(mut self, workers: usize) -> Self {
        self.configuration.put(WORKERS, workers.to_string());
        self
    }

    pub fn max_iteration(mut self, max_iteration: u64) -> Self {
        self.configuration.put(MAX_ITERATION, max_iteration.to_string());
        self
    }

    pub fn partitioner(mut self, partitioner: Arc<dyn Partitioner<K>>) -> Self {
        self.partitioner = partitioner;
        self
    }

    pub fn reader(
        mut self,
        reader: Box<dyn VertexReader<K, VV, EV>>,
        input: impl Into<PathBuf>,
    ) -> Self {
        self.reader = Some(reader);
        self.input = Some(input.into());
        self
    }

    pub fn writer(
        mut self,
        writer: Box<dyn VertexWriter<K, VV, EV>>,
        output: impl Into<PathBuf>,
    ) -> Self {
        self.writer = Some(writer);
        self.output = Some(output.into());
        self
    }

    pub fn state_store(mut self, store: Arc<dyn VertexStateStore<K, VV, EV>>) -> Self {
        self.state_store = Some(store);
        self
    }

    pub fn aggregator(mut self, aggregator: Arc<dyn Aggregator<VV>>) -> Self {
        self.aggregator = Some(aggregator);
        self
    }

    /// Handle for aborting the run. Sampled at barrier boundaries only;
    /// a superstep in flight always completes.
    pub fn abort_handle(&self) -> Arc<AtomicBool> {
        Arc::clone(&self.abort)
    }

    pub fn run(self) -> BspResult<JobOutcome<K, VV, EV>> {
        let job_config = JobConfig::from_configuration(&self.configuration)?;

        let vertices = self.load_vertices()?;
        tracing::info!(
            job = %self.name,
            vertices = vertices.len(),
            workers = job_config.workers,
            "job init"
        );

        let partitions = build_partitions(vertices, self.partitioner.as_ref(), job_config.workers)?;
        let scheduler = SuperstepScheduler::start(
            job_config,
            partitions,
            Arc::clone(&self.program),
            Arc::clone(&self.partitioner),
            self.aggregator.clone(),
            Arc::clone(&self.abort),
        )?;
        let outcome = scheduler.run()?;

        if let Some(store) = &self.state_store {
            store.put_vertices(&outcome.vertices)?;
        }
        if let (Some(writer), Some(output)) = (&self.writer, &self.output) {
            writer.write(output, &outcome.vertices)?;
        }

        tracing::info!(
            job = %self.name,
            supersteps = outcome.supersteps,
            converged = outcome.converged,
            aborted = outcome.aborted,
            "job halted"
        );

        Ok(JobOutcome {
            supersteps: outcome.supersteps,
            converged: outcome.converged,
            aborted: outcome.aborted,
            vertices: outcome.vertices,
        })
    }

    fn load_vertices(&self) -> BspResult<Vec<Vertex<K, VV, EV>>> {
        if let Some(store) = &self.state_store {
            if !store.is_empty()? {
                return store.load_vertices();
            }
        }
        let reader = self
            .reader
            .as_ref()
            .ok_or_else(|| BspError::Config("no vertex reader configured".to_string()))?;
        let input = self
            .input
            .as_ref()
            .ok_or_else(|| BspError::Config("no input path configured".to_string()))?;
        reader.read(input)
    }
}
