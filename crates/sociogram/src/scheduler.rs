//! Serialized compute context for embedding applications.
//!
//! One worker thread runs at most one full or incremental layout at a time.
//! A new full request cancels and supersedes the in-flight full run (the
//! token is checked between iteration batches, so partial writes never
//! become visible). Incremental requests that arrive while a run is in
//! flight queue up and coalesce: their hot sets union into a single pass
//! that runs once the backlog's newest full layout has finished.
//!
//! The interaction side stays synchronous: it mutates its own state, sends
//! a [`Constraints`] snapshot with each request, and picks up published
//! positions opportunistically. Neither side ever blocks on the other.

use rustc_hash::FxHashSet;
use sociogram_graph::{Graph, NodeId};
use sociogram_layout::{
    CancelToken, Constraints, LayoutConfig, LayoutReport, Positions, full_layout, incremental,
};
use std::sync::mpsc::{self, Receiver, Sender, TryRecvError};
use std::thread::JoinHandle;
use std::time::Duration;
use tracing::{debug, trace};

enum Request {
    Full {
        graph: Graph,
        cfg: LayoutConfig,
        cons: Constraints,
        cancel: CancelToken,
    },
    Incremental {
        graph: Graph,
        base: Positions,
        hot: FxHashSet<NodeId>,
        cfg: LayoutConfig,
        cons: Constraints,
    },
}

/// Positions published by one completed run.
#[derive(Debug, Clone)]
pub struct LayoutUpdate {
    pub positions: Positions,
    /// Present for full runs only.
    pub report: Option<LayoutReport>,
}

pub struct Scheduler {
    tx: Option<Sender<Request>>,
    updates: Receiver<LayoutUpdate>,
    /// Cancellation handle for the most recent full request.
    inflight: CancelToken,
    worker: Option<JoinHandle<()>>,
}

impl Scheduler {
    pub fn spawn() -> Self {
        let (tx, rx) = mpsc::channel::<Request>();
        let (out, updates) = mpsc::channel::<LayoutUpdate>();
        let worker = std::thread::Builder::new()
            .name("sociogram-layout".into())
            .spawn(move || worker_loop(rx, out))
            .ok();
        Self {
            tx: Some(tx),
            updates,
            inflight: CancelToken::new(),
            worker,
        }
    }

    /// Requests a full pipeline run, cancelling any in-flight full run.
    pub fn request_full(&mut self, graph: Graph, cfg: LayoutConfig, cons: Constraints) {
        self.inflight.cancel();
        let cancel = CancelToken::new();
        self.inflight = cancel.clone();
        self.send(Request::Full {
            graph,
            cfg,
            cons,
            cancel,
        });
    }

    /// Queues a bounded incremental pass over `hot` on top of `base`.
    pub fn request_incremental(
        &mut self,
        graph: Graph,
        base: Positions,
        hot: FxHashSet<NodeId>,
        cfg: LayoutConfig,
        cons: Constraints,
    ) {
        self.send(Request::Incremental {
            graph,
            base,
            hot,
            cfg,
            cons,
        });
    }

    fn send(&self, request: Request) {
        if let Some(tx) = &self.tx {
            let _ = tx.send(request);
        }
    }

    /// Most recent published update, if any arrived since the last poll.
    pub fn try_update(&self) -> Option<LayoutUpdate> {
        self.updates.try_iter().last()
    }

    /// Blocks up to `timeout` for the next published update.
    pub fn wait_update(&self, timeout: Duration) -> Option<LayoutUpdate> {
        self.updates.recv_timeout(timeout).ok()
    }
}

impl Drop for Scheduler {
    fn drop(&mut self) {
        self.inflight.cancel();
        self.tx = None;
        if let Some(worker) = self.worker.take() {
            let _ = worker.join();
        }
    }
}

struct FullJob {
    graph: Graph,
    cfg: LayoutConfig,
    cons: Constraints,
    cancel: CancelToken,
}

struct IncrementalJob {
    graph: Graph,
    base: Positions,
    hot: FxHashSet<NodeId>,
    cfg: LayoutConfig,
    cons: Constraints,
}

fn worker_loop(rx: Receiver<Request>, out: Sender<LayoutUpdate>) {
    while let Ok(first) = rx.recv() {
        let mut full: Option<FullJob> = None;
        let mut inc: Option<IncrementalJob> = None;
        absorb(first, &mut full, &mut inc);
        drain(&rx, &mut full, &mut inc);

        // A full run can gain deltas, or be superseded, while it executes;
        // re-drain after every attempt so queued deltas always land on the
        // freshest full result instead of their own stale base.
        while let Some(job) = full.take() {
            match full_layout(&job.graph, &job.cfg, &job.cons, &job.cancel) {
                Some(result) => {
                    drain(&rx, &mut full, &mut inc);
                    if full.is_some() {
                        // A newer full arrived mid-run; this result is stale.
                        continue;
                    }
                    let mut positions = result.positions;
                    if let Some(i) = inc.take() {
                        run_incremental(i, &mut positions);
                    }
                    debug!(nodes = job.graph.node_count(), "full layout published");
                    let _ = out.send(LayoutUpdate {
                        positions,
                        report: Some(result.report),
                    });
                }
                None => {
                    trace!("full layout cancelled, discarding partial work");
                    drain(&rx, &mut full, &mut inc);
                }
            }
        }

        if let Some(i) = inc.take()
            && let Some(update) = run_incremental_standalone(i)
        {
            let _ = out.send(update);
        }
    }
}

fn drain(rx: &Receiver<Request>, full: &mut Option<FullJob>, inc: &mut Option<IncrementalJob>) {
    loop {
        match rx.try_recv() {
            Ok(next) => absorb(next, full, inc),
            Err(TryRecvError::Empty) => break,
            Err(TryRecvError::Disconnected) => break,
        }
    }
}

fn absorb(request: Request, full: &mut Option<FullJob>, inc: &mut Option<IncrementalJob>) {
    match request {
        Request::Full {
            graph,
            cfg,
            cons,
            cancel,
        } => {
            *full = Some(FullJob {
                graph,
                cfg,
                cons,
                cancel,
            });
        }
        Request::Incremental {
            graph,
            base,
            hot,
            cfg,
            cons,
        } => match inc {
            Some(pending) => {
                pending.graph = graph;
                pending.base = base;
                pending.hot.extend(hot);
                pending.cfg = cfg;
                pending.cons = cons;
            }
            None => {
                *inc = Some(IncrementalJob {
                    graph,
                    base,
                    hot,
                    cfg,
                    cons,
                });
            }
        },
    }
}

/// Runs a coalesced delta pass directly on top of a just-computed full
/// layout, replacing the job's own stale base.
fn run_incremental(job: IncrementalJob, onto: &mut Positions) {
    trace!(hot = job.hot.len(), "coalesced delta pass after full layout");
    incremental::refine_hot(
        &job.graph,
        onto,
        job.hot,
        &job.cfg,
        &job.cons,
        &CancelToken::new(),
    );
}

fn run_incremental_standalone(job: IncrementalJob) -> Option<LayoutUpdate> {
    let IncrementalJob {
        graph,
        base,
        hot,
        cfg,
        cons,
    } = job;
    let mut positions = base;
    debug!(hot = hot.len(), "incremental pass");
    incremental::refine_hot(&graph, &mut positions, hot, &cfg, &cons, &CancelToken::new())?;
    Some(LayoutUpdate {
        positions,
        report: None,
    })
}
