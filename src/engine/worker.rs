use std::any::Any;
use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

use tracing::{Level, Span};

use crate::engine::future::Future;
use crate::engine::latch::{Latch, Signal};
use crate::error::{TaskError, WorkerError};

/// Thread settings applied to every worker of a dispatch.
#[derive(Debug, Clone)]
pub(crate) struct WorkerOpts {
    pub(crate) name: String,
    pub(crate) stack_size: Option<usize>,
}

/// Starts a detached worker thread for one task. Nothing joins the thread: a
/// worker outliving a bounded wait keeps running until its task returns.
///
/// If the thread cannot be started the future is stopped right away with a
/// [`WorkerError::Spawn`] and the completion is still signalled.
pub(crate) fn spawn<T, F>(opts: &WorkerOpts, future: Arc<Future<T>>, latch: Arc<Latch>, task: F)
where
    T: Send + Sync + 'static,
    F: FnOnce() -> anyhow::Result<T> + Send + 'static,
{
    let id = future.id();
    let parent = Span::current();

    let mut builder = thread::Builder::new().name(format!("{}-{}", opts.name, id));
    if let Some(size) = opts.stack_size {
        builder = builder.stack_size(size);
    }

    let worker_future = future.clone();
    let worker_latch = latch.clone();
    let spawned = builder.spawn(move || {
        let span = tracing::span!(parent: &parent, Level::DEBUG, "task", id);
        let _enter = span.enter();
        run(&worker_future, &worker_latch, task);
    });

    if let Err(err) = spawned {
        tracing::error!(id, "failed to spawn worker: {}", err);
        future.settle(
            Err(TaskError::new(WorkerError::Spawn(id, err))),
            Duration::ZERO,
        );
        latch.count_down();
    }
}

/// Runs the task, classifies its outcome and writes it into the future.
pub(crate) fn run<T, F>(future: &Future<T>, latch: &Latch, task: F)
where
    F: FnOnce() -> anyhow::Result<T>,
{
    // Declared first so the completion is signalled after the write below.
    let _signal = Signal(latch);
    let start = Instant::now();

    // A panicking task only owns its own closure state, nothing it can leave
    // half-written is observed by anyone else.
    let output = match panic::catch_unwind(AssertUnwindSafe(task)) {
        Ok(result) => result.map_err(TaskError::from),
        Err(panic) => Err(TaskError::new(panic_error(&*panic))),
    };

    let elapsed = start.elapsed();
    match &output {
        Ok(_) => tracing::debug!(?elapsed, "task completed"),
        Err(err) => tracing::warn!(?elapsed, "task stopped: {}", err),
    }

    future.settle(output, elapsed);
}

fn panic_error(panic: &(dyn Any + Send)) -> WorkerError {
    if let Some(s) = panic.downcast_ref::<&str>() {
        WorkerError::Panicked(s.to_string())
    } else if let Some(s) = panic.downcast_ref::<String>() {
        WorkerError::Panicked(s.clone())
    } else {
        WorkerError::PanickedUnknown
    }
}
