// src/manager/pool.rs
// =============================================================================
// The orchestrator: one dispatcher feeding a fixed pool of workers.
//
// How a run works:
// 1. Spawn N workers, all pulling from one bounded queue (capacity N)
// 2. Read lines from the source in order
//    - end of input      -> close the queue
//    - read error        -> log it, go on with the next line
//    - invalid URL       -> queue an "INVALID URL" item
//    - valid URL         -> queue a check (waits while the queue is full)
// 3. Wait for every worker to drain the queue and exit
//
// Invalid lines travel through the same queue as URLs, so with one worker
// every output line comes out in input order.
//
// Cancellation:
// - the dispatcher checks the token before every read and stops admitting
// - workers check it between items and stop pulling
// - an item a worker already took is handed to the checker with the same
//   token, so its request is aborted rather than abandoned silently
// - whatever is still queued is counted as abandoned
// - the run then ends with RunError::Cancelled
//
// Concurrency notes:
// - tokio's mpsc channel has a single receiver, so the workers share it
//   through Arc<Mutex<Receiver>>; whoever holds the lock gets the next item
// - only the workers own the receiver; if they all die, send() fails
// - dropping the Sender closes the queue; recv() returns None once it is
//   empty, which is each worker's signal to exit
// =============================================================================

use futures::future::join_all;
use log::{debug, error};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use tokio::sync::{mpsc, Mutex};
use tokio_util::sync::CancellationToken;

use super::url::ParsedUrl;
use crate::checker::UrlCheck;
use crate::error::RunError;
use crate::output::ResultSink;
use crate::source::LineSource;

// One queued unit of output, in input order
#[derive(Debug)]
enum WorkItem {
    /// A valid URL to check
    Check(ParsedUrl),
    /// A line that failed validation, printed as-is
    Invalid(String),
}

type WorkQueue = Arc<Mutex<mpsc::Receiver<WorkItem>>>;

// Counters for one run, logged at debug level when the run ends
//
// admitted == checked + dropped + abandoned
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct RunSummary {
    /// Lines read successfully from the source
    pub lines: usize,
    /// Lines that could not be read
    pub read_errors: usize,
    /// Lines rejected as invalid URLs
    pub invalid: usize,
    /// URLs pushed onto the work queue
    pub admitted: usize,
    /// URLs checked and printed
    pub checked: usize,
    /// URLs whose check or print failed
    pub dropped: usize,
    /// URLs still queued when the run was cancelled
    pub abandoned: usize,
}

#[derive(Debug, Default)]
struct WorkerStats {
    checked: AtomicUsize,
    dropped: AtomicUsize,
    abandoned: AtomicUsize,
}

pub struct Manager<S, C, P> {
    source: S,
    checker: Arc<C>,
    sink: Arc<P>,
    parallelism: usize,
}

impl<S, C, P> Manager<S, C, P>
where
    S: LineSource,
    C: UrlCheck + 'static,
    P: ResultSink + 'static,
{
    /// `parallelism` is the number of workers and the queue capacity.
    /// 0 is treated as 1.
    pub fn new(source: S, checker: Arc<C>, sink: Arc<P>, parallelism: usize) -> Self {
        Self {
            source,
            checker,
            sink,
            parallelism: parallelism.max(1),
        }
    }

    /// Runs the pipeline to completion
    ///
    /// Returns `Err(RunError::Cancelled)` if `cancel` fired at any point,
    /// otherwise the run's counters. Failures of individual lines or URLs
    /// never end the run.
    pub async fn run(mut self, cancel: CancellationToken) -> Result<RunSummary, RunError> {
        let (tx, rx) = mpsc::channel(self.parallelism);
        let queue: WorkQueue = Arc::new(Mutex::new(rx));
        let stats = Arc::new(WorkerStats::default());

        debug!("starting worker pool with {} workers", self.parallelism);
        let workers: Vec<_> = (0..self.parallelism)
            .map(|worker_id| {
                tokio::spawn(worker(
                    worker_id,
                    queue.clone(),
                    self.checker.clone(),
                    self.sink.clone(),
                    cancel.clone(),
                    stats.clone(),
                ))
            })
            .collect();

        // The workers hold the only handles to the receiver from here on
        drop(queue);

        let mut summary = RunSummary::default();
        self.dispatch(&tx, &cancel, &mut summary).await;

        // Closing the queue lets idle workers exit once it is empty
        drop(tx);

        for joined in join_all(workers).await {
            if let Err(err) = joined {
                error!("worker task failed: {err}");
            }
        }

        summary.checked = stats.checked.load(Ordering::SeqCst);
        summary.dropped = stats.dropped.load(Ordering::SeqCst);
        summary.abandoned = stats.abandoned.load(Ordering::SeqCst);
        debug!("run finished: {summary:?}");

        if cancel.is_cancelled() {
            return Err(RunError::Cancelled);
        }

        Ok(summary)
    }

    // The single producer. Returns when the source is exhausted, the run
    // is cancelled or no worker is left to take items.
    async fn dispatch(
        &mut self,
        tx: &mpsc::Sender<WorkItem>,
        cancel: &CancellationToken,
        summary: &mut RunSummary,
    ) {
        loop {
            if cancel.is_cancelled() {
                debug!("dispatch stopped: run cancelled");
                return;
            }

            let next = tokio::select! {
                biased;
                _ = cancel.cancelled() => {
                    debug!("dispatch stopped: run cancelled");
                    return;
                }
                next = self.source.next_line() => next,
            };

            let line = match next {
                Ok(Some(line)) => line,
                Ok(None) => {
                    debug!("end of input after {} lines", summary.lines);
                    return;
                }
                Err(err) => {
                    summary.read_errors += 1;
                    error!("read url error: {err}");
                    continue;
                }
            };

            summary.lines += 1;
            debug!("read line {}: {line}", summary.lines);

            let item = match ParsedUrl::parse(&line) {
                Some(url) => {
                    debug!(
                        "admitting {url} (host {})",
                        url.url().host_str().unwrap_or_default()
                    );
                    WorkItem::Check(url)
                }
                None => {
                    debug!("line {line:?} is not a valid URL");
                    WorkItem::Invalid(line)
                }
            };
            let is_check = matches!(item, WorkItem::Check(_));

            // Blocks while all workers are busy and the queue is full
            tokio::select! {
                biased;
                _ = cancel.cancelled() => {
                    debug!("dispatch stopped: run cancelled, line {} not queued", summary.lines);
                    return;
                }
                sent = tx.send(item) => {
                    if sent.is_err() {
                        error!("work queue closed before end of input, no workers left");
                        return;
                    }
                    if is_check {
                        summary.admitted += 1;
                    } else {
                        summary.invalid += 1;
                    }
                }
            }
        }
    }
}

async fn worker<C, P>(
    worker_id: usize,
    queue: WorkQueue,
    checker: Arc<C>,
    sink: Arc<P>,
    cancel: CancellationToken,
    stats: Arc<WorkerStats>,
) where
    C: UrlCheck,
    P: ResultSink,
{
    debug!("worker {worker_id} started");

    loop {
        let next = if cancel.is_cancelled() {
            None
        } else {
            let mut rx = queue.lock().await;
            tokio::select! {
                biased;
                _ = cancel.cancelled() => None,
                item = rx.recv() => item,
            }
        };

        let Some(item) = next else {
            break;
        };

        let url = match item {
            WorkItem::Check(url) => url,
            WorkItem::Invalid(line) => {
                if let Err(err) = sink.emit_validation_error(&line) {
                    error!("print validation error for {line:?}: {err}");
                }
                continue;
            }
        };

        debug!("worker {worker_id}: checking {url}");

        match checker.check(url.as_str(), &cancel).await {
            Ok(result) => match sink.emit_result(url.as_str(), &result) {
                Ok(()) => {
                    stats.checked.fetch_add(1, Ordering::SeqCst);
                }
                Err(err) => {
                    stats.dropped.fetch_add(1, Ordering::SeqCst);
                    error!("print result for {url}: {err}");
                }
            },
            Err(err) if err.is_cancelled() || cancel.is_cancelled() => {
                stats.dropped.fetch_add(1, Ordering::SeqCst);
                debug!("worker {worker_id}: {url} stopped by cancellation: {err}");
            }
            Err(err) => {
                stats.dropped.fetch_add(1, Ordering::SeqCst);
                error!("url check error: {err}");
            }
        }
    }

    if cancel.is_cancelled() {
        let mut rx = queue.lock().await;
        while let Ok(item) = rx.try_recv() {
            if let WorkItem::Check(url) = item {
                debug!("abandoned {url}: run cancelled before it was checked");
                stats.abandoned.fetch_add(1, Ordering::SeqCst);
            }
        }
    }

    debug!("worker {worker_id} exiting");
}

// -----------------------------------------------------------------------------
// BEGINNER NOTES:
//
// 1. Why is the queue bounded?
//    - mpsc::channel(n) holds at most n items
//    - send().await waits while it is full, so a huge input file never
//      sits in memory; at most N URLs are queued at once
//    - This is called backpressure
//
// 2. Why Arc?
//    - Every worker is a separate tokio task that needs the checker, the
//      sink and the queue
//    - Arc (atomic reference counting) lets them share one copy
//    - clone() on an Arc only bumps a counter
//
// 3. What does `biased;` do in tokio::select!?
//    - Normally select! polls its branches in random order
//    - biased polls them top to bottom, so cancellation always wins a tie
//
// 4. Why `let ... else`?
//    - let Some(item) = next else { break; } binds item or leaves the loop
//    - Same as a match with two arms, but flatter
// -----------------------------------------------------------------------------
