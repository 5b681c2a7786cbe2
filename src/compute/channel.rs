use std::any::Any;
use std::future::Future;
use std::panic::{self, AssertUnwindSafe};
use std::pin::Pin;
use std::sync::atomic::{AtomicU64, Ordering};
use std::task::{Context, Poll};

use futures::channel::oneshot;
use serde::{Deserialize, Serialize};
use tracing::{debug, trace, warn};

use super::{ComputeJob, ComputeOutput};
use crate::error::{ChartError, ChartResult};

/// Where submitted jobs execute.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ExecutionMode {
    /// Isolated worker on the background pool.
    Background,
    /// Synchronously on the submitting thread.
    Inline,
}

impl ExecutionMode {
    /// `Background` when a worker pool is compiled in, `Inline` otherwise.
    #[must_use]
    pub fn detect() -> Self {
        if cfg!(feature = "background-compute") {
            Self::Background
        } else {
            Self::Inline
        }
    }
}

/// Encoded reply: the serialized output, or the worker's error message.
type WorkerReply = Result<String, String>;

#[derive(Debug, Serialize, Deserialize)]
struct WorkerRequest {
    job_id: u64,
    job: ComputeJob,
}

#[derive(Debug, Serialize, Deserialize)]
struct WorkerResponse {
    job_id: u64,
    output: ComputeOutput,
}

/// One-shot unit of background work, owned by the channel until it replies.
#[derive(Debug)]
pub struct WorkerJob {
    pub job_id: u64,
    pub inputs: String,
    pub result_channel: oneshot::Sender<WorkerReply>,
}

/// Typed request/response channel for data-shaping jobs.
///
/// Jobs are independent: nothing orders one job's completion relative to
/// another's, and there is no cancellation. Dropping a `JobHandle` only
/// discards the reply.
#[derive(Debug)]
pub struct ComputeChannel {
    mode: ExecutionMode,
    next_job_id: AtomicU64,
}

impl Default for ComputeChannel {
    fn default() -> Self {
        Self::detect()
    }
}

impl ComputeChannel {
    #[must_use]
    pub fn detect() -> Self {
        Self::with_mode(ExecutionMode::detect())
    }

    #[must_use]
    pub fn inline() -> Self {
        Self::with_mode(ExecutionMode::Inline)
    }

    #[must_use]
    pub fn with_mode(mode: ExecutionMode) -> Self {
        Self {
            mode,
            next_job_id: AtomicU64::new(1),
        }
    }

    #[must_use]
    pub fn mode(&self) -> ExecutionMode {
        self.mode
    }

    /// Submits `job` and returns a future resolving to its output.
    ///
    /// Inline channels have already resolved the handle when this returns.
    pub fn submit(&self, job: ComputeJob) -> JobHandle {
        let job_id = self.next_job_id.fetch_add(1, Ordering::Relaxed);
        let kind = job.kind_name();
        let (sender, receiver) = oneshot::channel();
        let handle = JobHandle {
            job_id,
            kind,
            receiver,
        };

        let inputs = match serde_json::to_string(&WorkerRequest { job_id, job }) {
            Ok(inputs) => inputs,
            Err(err) => {
                let _ = sender.send(Err(format!("failed to encode job payload: {err}")));
                return handle;
            }
        };
        let worker_job = WorkerJob {
            job_id,
            inputs,
            result_channel: sender,
        };

        debug!(job_id, kind, mode = ?self.mode, "submit compute job");
        match self.mode {
            ExecutionMode::Background => spawn_background(worker_job),
            ExecutionMode::Inline => run_worker_job(worker_job),
        }
        handle
    }
}

#[cfg(feature = "background-compute")]
fn spawn_background(job: WorkerJob) {
    rayon::spawn(move || run_worker_job(job));
}

#[cfg(not(feature = "background-compute"))]
fn spawn_background(job: WorkerJob) {
    run_worker_job(job);
}

/// Worker entry point: decode, run, encode, reply. Panics become errors.
fn run_worker_job(job: WorkerJob) {
    let WorkerJob {
        job_id,
        inputs,
        result_channel,
    } = job;
    let reply = panic::catch_unwind(AssertUnwindSafe(|| execute_encoded(&inputs)))
        .unwrap_or_else(|payload| Err(panic_message(payload.as_ref())));
    trace!(job_id, ok = reply.is_ok(), "compute job finished");
    if result_channel.send(reply).is_err() {
        trace!(job_id, "compute job reply dropped, handle no longer awaited");
    }
}

fn execute_encoded(inputs: &str) -> WorkerReply {
    let request: WorkerRequest = serde_json::from_str(inputs)
        .map_err(|err| format!("failed to decode job payload: {err}"))?;
    let output = request.job.run().map_err(|err| match err {
        ChartError::JobFailed(message) => message,
        other => other.to_string(),
    })?;
    serde_json::to_string(&WorkerResponse {
        job_id: request.job_id,
        output,
    })
    .map_err(|err| format!("failed to encode job result: {err}"))
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        format!("worker panicked: {message}")
    } else if let Some(message) = payload.downcast_ref::<String>() {
        format!("worker panicked: {message}")
    } else {
        "worker panicked".to_owned()
    }
}

/// Pending result of a submitted job.
#[derive(Debug)]
#[must_use = "a job handle does nothing unless awaited"]
pub struct JobHandle {
    job_id: u64,
    kind: &'static str,
    receiver: oneshot::Receiver<WorkerReply>,
}

impl JobHandle {
    #[must_use]
    pub fn job_id(&self) -> u64 {
        self.job_id
    }

    #[must_use]
    pub fn kind(&self) -> &'static str {
        self.kind
    }
}

impl Future for JobHandle {
    type Output = ChartResult<ComputeOutput>;

    fn poll(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        let job_id = self.job_id;
        let reply = match Pin::new(&mut self.receiver).poll(cx) {
            Poll::Pending => return Poll::Pending,
            Poll::Ready(Ok(reply)) => reply,
            Poll::Ready(Err(oneshot::Canceled)) => {
                Err("worker exited before replying".to_owned())
            }
        };

        let result = reply.and_then(|encoded| {
            serde_json::from_str::<WorkerResponse>(&encoded)
                .map(|response| response.output)
                .map_err(|err| format!("failed to decode job result: {err}"))
        });
        if let Err(message) = &result {
            warn!(job_id, kind = self.kind, error = %message, "compute job failed");
        }
        Poll::Ready(result.map_err(ChartError::JobFailed))
    }
}
