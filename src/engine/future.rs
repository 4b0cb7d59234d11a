use std::sync::OnceLock;
use std::time::Duration;

use crate::error::TaskError;

/// Lifecycle of a single task. A future leaves `Pending` exactly once.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Status {
    /// The task is still running.
    Pending,
    /// The task returned a value.
    Completed,
    /// The task returned an error, panicked, or could not be started.
    Stopped,
}

impl Status {
    pub fn is_terminal(self) -> bool {
        !matches!(self, Status::Pending)
    }
}

#[derive(Debug)]
struct Outcome<T> {
    value: Result<T, TaskError>,
    elapsed: Duration,
}

/// Execution record of one dispatched task.
///
/// The record is written once by the worker running the task and is read-only
/// afterwards. Its identity is the position the task had in the dispatched
/// collection.
#[derive(Debug)]
pub struct Future<T> {
    id: usize,
    outcome: OnceLock<Outcome<T>>,
}

impl<T> Future<T> {
    pub(crate) fn new(id: usize) -> Self {
        Self {
            id,
            outcome: OnceLock::new(),
        }
    }

    /// Stores the outcome. Only the first call has any effect.
    pub(crate) fn settle(&self, value: Result<T, TaskError>, elapsed: Duration) {
        let _ = self.outcome.set(Outcome { value, elapsed });
    }

    /// Identity assigned at dispatch time, `0..N`.
    pub fn id(&self) -> usize {
        self.id
    }

    pub fn status(&self) -> Status {
        match self.outcome.get() {
            None => Status::Pending,
            Some(Outcome { value: Ok(_), .. }) => Status::Completed,
            Some(Outcome { value: Err(_), .. }) => Status::Stopped,
        }
    }

    /// The value, present iff the status is [`Status::Completed`].
    pub fn result(&self) -> Option<&T> {
        self.outcome.get()?.value.as_ref().ok()
    }

    /// The error, present iff the status is [`Status::Stopped`].
    pub fn error(&self) -> Option<&TaskError> {
        self.outcome.get()?.value.as_ref().err()
    }

    /// Wall time the task took, once it has finished.
    pub fn elapsed(&self) -> Option<Duration> {
        self.outcome.get().map(|outcome| outcome.elapsed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pending_until_settled() {
        let future = Future::<i32>::new(3);

        assert_eq!(future.id(), 3);
        assert_eq!(future.status(), Status::Pending);
        assert!(future.result().is_none());
        assert!(future.error().is_none());
        assert!(future.elapsed().is_none());
    }

    #[test]
    fn test_completed() {
        let future = Future::new(0);
        future.settle(Ok("data"), Duration::from_millis(5));

        assert_eq!(future.status(), Status::Completed);
        assert_eq!(future.result(), Some(&"data"));
        assert!(future.error().is_none());
        assert_eq!(future.elapsed(), Some(Duration::from_millis(5)));
    }

    #[test]
    fn test_stopped() {
        let future = Future::<()>::new(0);
        future.settle(Err(TaskError::new(anyhow::anyhow!("boom"))), Duration::ZERO);

        assert_eq!(future.status(), Status::Stopped);
        assert!(future.result().is_none());
        assert_eq!(future.error().map(|e| e.to_string()).as_deref(), Some("boom"));
    }

    #[test]
    fn test_terminal_state_is_final() {
        let future = Future::new(0);
        future.settle(Ok(1), Duration::ZERO);
        future.settle(Err(TaskError::new(anyhow::anyhow!("late"))), Duration::ZERO);

        assert_eq!(future.status(), Status::Completed);
        assert_eq!(future.result(), Some(&1));
    }

    #[test]
    fn test_is_terminal() {
        assert!(!Status::Pending.is_terminal());
        assert!(Status::Completed.is_terminal());
        assert!(Status::Stopped.is_terminal());
    }
}
