use crate::graph::partition::GraphPartition;
use crate::shuffle::{Inboxes, MessageRouter};
use crate::worker::{StepSummary, Worker, WorkerCommand, WorkerReply};
use graphbsp_api::aggregate::Aggregator;
use graphbsp_api::partition::Partitioner;
use graphbsp_api::program::VertexProgram;
use graphbsp_common::config::JobConfig;
use graphbsp_common::error::{BspError, BspResult};
use graphbsp_common::types::Vertex;
use std::fmt::Debug;
use std::hash::Hash;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::{channel, Receiver, RecvTimeoutError, Sender};
use std::sync::Arc;
use std::thread::JoinHandle;
use std::time::Instant;

#[derive(Debug, Clone)]
pub struct SchedulerOutcome<K, VV, EV> {
    pub supersteps: u64,
    pub converged: bool,
    pub aborted: bool,
    pub vertices: Vec<Vertex<K, VV, EV>>,
}

#[derive(Debug, Clone, Copy)]
enum State {
    Init,
    Running { superstep: u64 },
    Halted { executed: u64, converged: bool },
}

struct RoundResult<K, VV, M> {
    next_inboxes: Inboxes<K, M>,
    summary: StepSummary,
    routed: u64,
    global: Option<VV>,
}

/// Drives the compute / communicate / barrier / aggregate cycle over a
/// fixed set of workers. The only cross-worker synchronization point is
/// the barrier: every worker's reply for superstep `t` is collected
/// before any message routed at `t` becomes visible at `t+1`.
pub struct SuperstepScheduler<K, VV, EV, M> {
    config: JobConfig,
    router: MessageRouter<K>,
    command_txs: Vec<Sender<WorkerCommand<K, VV, M>>>,
    reply_rx: Receiver<WorkerReply<K, VV, EV, M>>,
    handles: Vec<JoinHandle<()>>,
    aggregator: Option<Arc<dyn Aggregator<VV>>>,
    abort: Arc<AtomicBool>,
}

impl<K, VV, EV, M> SuperstepScheduler<K, VV, EV, M>
where
    K: Clone + Eq + Hash + Debug + Send + Sync + 'static,
    VV: Clone + Send + Sync + 'static,
    EV: Send + Sync + 'static,
    M: Send + 'static,
{
    pub fn start(
        config: JobConfig,
        partitions: Vec<GraphPartition<K, VV, EV>>,
        program: Arc<dyn VertexProgram<K, VV, EV, M>>,
        partitioner: Arc<dyn Partitioner<K>>,
        aggregator: Option<Arc<dyn Aggregator<VV>>>,
        abort: Arc<AtomicBool>,
    ) -> BspResult<Self> {
        let router = MessageRouter::new(partitioner, partitions.len());
        let (reply_tx, reply_rx) = channel();

        let mut command_txs = Vec::with_capacity(partitions.len());
        let mut handles = Vec::with_capacity(partitions.len());
        for partition in partitions {
            let (command_tx, command_rx) = channel();
            let handle = Worker::spawn(
                partition.id(),
                partition,
                Arc::clone(&program),
                aggregator.clone(),
                command_rx,
                reply_tx.clone(),
            )?;
            command_txs.push(command_tx);
            handles.push(handle);
        }

        Ok(Self {
            config,
            router,
            command_txs,
            reply_rx,
            handles,
            aggregator,
            abort,
        })
    }

    pub fn run(mut self) -> BspResult<SchedulerOutcome<K, VV, EV>> {
        let mut inboxes: Inboxes<K, M> = self.router.empty_inboxes();
        let mut global: Option<VV> = None;
        let mut state = State::Init;

        loop {
            state = match state {
                State::Init => State::Running { superstep: 0 },
                State::Running { superstep } => {
                    if self.abort.load(Ordering::SeqCst) {
                        tracing::warn!(superstep, "run aborted at barrier boundary");
                        State::Halted {
                            executed: superstep,
                            converged: false,
                        }
                    } else if self
                        .config
                        .max_iteration
                        .is_some_and(|max| superstep >= max)
                    {
                        State::Halted {
                            executed: superstep,
                            converged: false,
                        }
                    } else {
                        let round = self.round(superstep, inboxes, global.take())?;
                        inboxes = round.next_inboxes;
                        global = round.global;
                        if round.summary.active == 0 && round.routed == 0 {
                            State::Halted {
                                executed: superstep + 1,
                                converged: true,
                            }
                        } else {
                            State::Running {
                                superstep: superstep + 1,
                            }
                        }
                    }
                }
                State::Halted {
                    executed,
                    converged,
                } => {
                    let vertices = self.finish()?;
                    let aborted = self.abort.load(Ordering::SeqCst);
                    return Ok(SchedulerOutcome {
                        supersteps: executed,
                        converged,
                        aborted,
                        vertices,
                    });
                }
            };
        }
    }

    fn round(
        &mut self,
        superstep: u64,
        inboxes: Inboxes<K, M>,
        global: Option<VV>,
    ) -> BspResult<RoundResult<K, VV, M>> {
        for (worker, (tx, inbox)) in self.command_txs.iter().zip(inboxes).enumerate() {
            tx.send(WorkerCommand::Superstep {
                superstep,
                inbox,
                global: global.clone(),
            })
            .map_err(|_| BspError::Internal(format!("worker {worker} command channel closed")))?;
        }

        let mut next_inboxes: Inboxes<K, M> = self.router.empty_inboxes();
        let mut summary = StepSummary::default();
        let mut partial: Option<VV> = None;
        let mut routed = 0u64;

        let deadline = Instant::now() + self.config.barrier_timeout;
        for _ in 0..self.command_txs.len() {
            let remaining = deadline.saturating_duration_since(Instant::now());
            let reply = self.reply_rx.recv_timeout(remaining).map_err(|e| match e {
                RecvTimeoutError::Timeout => BspError::Liveness(format!(
                    "a worker did not reach the superstep {superstep} barrier within {:?}",
                    self.config.barrier_timeout
                )),
                RecvTimeoutError::Disconnected => BspError::Internal(format!(
                    "a worker terminated before the superstep {superstep} barrier"
                )),
            })?;

            match reply {
                WorkerReply::SuperstepDone {
                    outbox,
                    summary: worker_summary,
                    partial: worker_partial,
                    ..
                } => {
                    summary.merge(&worker_summary);
                    if let Some(agg) = &self.aggregator {
                        partial = agg.merge(partial, worker_partial);
                    }
                    routed += self.router.route(outbox, &mut next_inboxes);
                }
                WorkerReply::Failed { worker, error } => {
                    tracing::error!(worker, %error, "worker failed, aborting run");
                    return Err(error);
                }
                WorkerReply::Finished { worker, .. } => {
                    return Err(BspError::Internal(format!(
                        "unexpected finish from worker {worker} during superstep {superstep}"
                    )));
                }
            }
        }

        tracing::debug!(
            superstep,
            active = summary.active,
            sent = summary.sent,
            updated = summary.updated,
            routed,
            "superstep barrier complete"
        );

        Ok(RoundResult {
            next_inboxes,
            summary,
            routed,
            global: partial,
        })
    }

    fn finish(&mut self) -> BspResult<Vec<Vertex<K, VV, EV>>> {
        for (worker, tx) in self.command_txs.iter().enumerate() {
            tx.send(WorkerCommand::Finish)
                .map_err(|_| BspError::Internal(format!("worker {worker} command channel closed")))?;
        }

        let mut vertices = Vec::new();
        let deadline = Instant::now() + self.config.barrier_timeout;
        for _ in 0..self.command_txs.len() {
            let remaining = deadline.saturating_duration_since(Instant::now());
            let reply = self.reply_rx.recv_timeout(remaining).map_err(|_| {
                BspError::Liveness("a worker did not hand back its partition".to_string())
            })?;
            match reply {
                WorkerReply::Finished {
                    vertices: mut part, ..
                } => vertices.append(&mut part),
                WorkerReply::Failed { error, .. } => return Err(error),
                WorkerReply::SuperstepDone { worker, .. } => {
                    return Err(BspError::Internal(format!(
                        "unexpected superstep reply from worker {worker} during finish"
                    )));
                }
            }
        }

        for handle in self.handles.drain(..) {
            let _ = handle.join();
        }
        Ok(vertices)
    }
}
