use crate::graph::partition::GraphPartition;
use crate::shuffle::{Inbox, Outbox};
use graphbsp_api::aggregate::Aggregator;
use graphbsp_api::program::{ComputeContext, VertexProgram};
use graphbsp_common::error::{BspError, BspResult};
use graphbsp_common::types::{Edge, Vertex};
use rayon::prelude::*;
use std::fmt::Debug;
use std::hash::Hash;
use std::sync::mpsc::{Receiver, Sender};
use std::sync::Arc;
use std::thread::JoinHandle;
use std::time::Instant;

#[derive(Debug, Clone, Copy, Default)]
pub struct StepSummary {
    pub active: u64,
    pub sent: u64,
    pub updated: u64,
}

impl StepSummary {
    pub fn merge(&mut self, other: &StepSummary) {
        self.active += other.active;
        self.sent += other.sent;
        self.updated += other.updated;
    }
}

pub enum WorkerCommand<K, VV, M> {
    Superstep {
        superstep: u64,
        inbox: Inbox<K, M>,
        global: Option<VV>,
    },
    Finish,
}

pub enum WorkerReply<K, VV, EV, M> {
    SuperstepDone {
        worker: usize,
        superstep: u64,
        outbox: Outbox<K, M>,
        summary: StepSummary,
        partial: Option<VV>,
    },
    Finished {
        worker: usize,
        vertices: Vec<Vertex<K, VV, EV>>,
    },
    Failed {
        worker: usize,
        error: BspError,
    },
}

struct VertexContext<'a, K, VV, EV, M> {
    superstep: u64,
    vertex_id: &'a K,
    value: &'a VV,
    new_value: Option<VV>,
    edges: &'a [Edge<K, EV>],
    outbox: Vec<(K, M)>,
    halted: bool,
    global: Option<&'a VV>,
}

impl<'a, K, VV, EV, M> ComputeContext<K, VV, EV, M> for VertexContext<'a, K, VV, EV, M> {
    fn superstep(&self) -> u64 {
        self.superstep
    }

    fn vertex_id(&self) -> &K {
        self.vertex_id
    }

    fn value(&self) -> &VV {
        self.new_value.as_ref().unwrap_or(self.value)
    }

    fn set_value(&mut self, value: VV) {
        self.new_value = Some(value);
    }

    fn edges(&self) -> &[Edge<K, EV>] {
        self.edges
    }

    fn send_message(&mut self, target_id: K, message: M) {
        self.outbox.push((target_id, message));
    }

    fn vote_to_halt(&mut self) {
        self.halted = true;
    }

    fn aggregated(&self) -> Option<&VV> {
        self.global
    }
}

struct VertexOutcome<K, M> {
    outbox: Vec<(K, M)>,
    updated: bool,
}

/// One worker owns one partition for the whole run and processes
/// scheduler commands until the run finishes. All cross-worker traffic
/// goes through the command/reply channels; vertex state never leaves
/// the worker before the run ends.
pub struct Worker<K, VV, EV, M> {
    id: usize,
    partition: GraphPartition<K, VV, EV>,
    program: Arc<dyn VertexProgram<K, VV, EV, M>>,
    aggregator: Option<Arc<dyn Aggregator<VV>>>,
    commands: Receiver<WorkerCommand<K, VV, M>>,
    replies: Sender<WorkerReply<K, VV, EV, M>>,
}

impl<K, VV, EV, M> Worker<K, VV, EV, M>
where
    K: Clone + Eq + Hash + Debug + Send + Sync + 'static,
    VV: Clone + Send + Sync + 'static,
    EV: Send + Sync + 'static,
    M: Send + 'static,
{
    pub fn spawn(
        id: usize,
        partition: GraphPartition<K, VV, EV>,
        program: Arc<dyn VertexProgram<K, VV, EV, M>>,
        aggregator: Option<Arc<dyn Aggregator<VV>>>,
        commands: Receiver<WorkerCommand<K, VV, M>>,
        replies: Sender<WorkerReply<K, VV, EV, M>>,
    ) -> BspResult<JoinHandle<()>> {
        let worker = Self {
            id,
            partition,
            program,
            aggregator,
            commands,
            replies,
        };
        std::thread::Builder::new()
            .name(format!("bsp-worker-{id}"))
            .spawn(move || worker.run())
            .map_err(|e| BspError::Internal(format!("spawn worker {id}: {e}")))
    }

    fn run(mut self) {
        while let Ok(cmd) = self.commands.recv() {
            match cmd {
                WorkerCommand::Superstep {
                    superstep,
                    inbox,
                    global,
                } => {
                    let reply = match self.superstep(superstep, inbox, global) {
                        Ok(reply) => reply,
                        Err(error) => {
                            let _ = self.replies.send(WorkerReply::Failed {
                                worker: self.id,
                                error,
                            });
                            return;
                        }
                    };
                    if self.replies.send(reply).is_err() {
                        return;
                    }
                }
                WorkerCommand::Finish => {
                    let _ = self.replies.send(WorkerReply::Finished {
                        worker: self.id,
                        vertices: self.partition.take_vertices(),
                    });
                    return;
                }
            }
        }
    }

    fn superstep(
        &mut self,
        superstep: u64,
        inbox: Inbox<K, M>,
        global: Option<VV>,
    ) -> BspResult<WorkerReply<K, VV, EV, M>> {
        let start = Instant::now();
        let slots = self.partition.distribute(inbox)?;

        let program = &self.program;
        let global = global.as_ref();

        let outcomes: Vec<Option<VertexOutcome<K, M>>> = self
            .partition
            .vertices_mut()
            .par_iter_mut()
            .zip(slots.into_par_iter())
            .map(|(vertex, messages)| {
                if !vertex.active && messages.is_empty() {
                    return None;
                }

                let mut ctx = VertexContext {
                    superstep,
                    vertex_id: &vertex.id,
                    value: &vertex.value,
                    new_value: None,
                    edges: &vertex.edges,
                    outbox: Vec::new(),
                    halted: false,
                    global,
                };
                let mut msg_iter = messages.into_iter();
                program.compute(&mut ctx, &mut msg_iter);

                let VertexContext {
                    new_value,
                    outbox,
                    halted,
                    ..
                } = ctx;

                let updated = new_value.is_some();
                if let Some(value) = new_value {
                    vertex.value = value;
                }
                vertex.active = !halted;

                Some(VertexOutcome { outbox, updated })
            })
            .collect();

        let mut outbox: Outbox<K, M> = Vec::new();
        let mut updated = 0u64;
        for outcome in outcomes.into_iter().flatten() {
            if outcome.updated {
                updated += 1;
            }
            outbox.extend(outcome.outbox);
        }

        let active = self
            .partition
            .vertices()
            .iter()
            .filter(|v| v.active)
            .count() as u64;

        let partial = self.aggregator.as_ref().map(|agg| {
            self.partition
                .vertices()
                .iter()
                .fold(None, |p, v| agg.observe(p, &v.value))
        });

        let summary = StepSummary {
            active,
            sent: outbox.len() as u64,
            updated,
        };

        metrics::counter!("graphbsp_worker_superstep_updates_total").increment(updated);
        metrics::counter!("graphbsp_worker_superstep_outbox_total").increment(summary.sent);
        metrics::histogram!("graphbsp_worker_superstep_duration_ms")
            .record(start.elapsed().as_secs_f64() * 1000.0);

        Ok(WorkerReply::SuperstepDone {
            worker: self.id,
            superstep,
            outbox,
            summary,
            partial: partial.flatten(),
        })
    }
}
