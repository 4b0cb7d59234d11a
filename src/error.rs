use std::sync::Arc;

use thiserror::Error;

/// Error produced by a task, shared between its [`Future`](crate::Future) and
/// the aggregated error field of the handle that owns it.
#[derive(Debug, Error, Clone)]
#[error(transparent)]
pub struct TaskError(#[from] pub(crate) Arc<anyhow::Error>);

impl TaskError {
    pub fn new(err: impl Into<anyhow::Error>) -> Self {
        Self(Arc::new(err.into()))
    }

    /// Borrow the underlying error, e.g. to `downcast_ref` it.
    pub fn inner(&self) -> &anyhow::Error {
        &self.0
    }
}

impl From<anyhow::Error> for TaskError {
    fn from(e: anyhow::Error) -> Self {
        TaskError(Arc::new(e))
    }
}

/// Failures of the worker machinery itself. These never escape the engine,
/// they are recorded as the failing task's error.
#[derive(Debug, Error)]
pub enum WorkerError {
    #[error("Couldn't spawn worker thread for task {0}.\n{1}")]
    Spawn(usize, #[source] std::io::Error),

    #[error("Task panicked: {0}")]
    Panicked(String),

    #[error("Task panicked with unknown payload")]
    PanickedUnknown,
}

#[cfg(test)]
mod tests {
    use std::error::Error as _;

    use super::*;

    #[test]
    fn test_task_error_is_transparent() {
        let io = std::io::Error::other("disk on fire");
        let err = TaskError::new(anyhow::Error::new(io).context("reading config"));

        assert_eq!(err.to_string(), "reading config");
        assert_eq!(err.source().unwrap().to_string(), "disk on fire");
    }

    #[test]
    fn test_task_error_clones_share_inner() {
        let err = TaskError::from(Arc::new(anyhow::anyhow!("shared")));
        let copy = err.clone();

        assert!(Arc::ptr_eq(&err.0, &copy.0));
        assert_eq!(copy.inner().to_string(), "shared");
    }
}
