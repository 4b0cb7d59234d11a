use std::sync::Arc;
use std::time::Duration;

use crate::engine::future::Future;
use crate::engine::latch::Latch;
use crate::engine::settle::{Settle, Wait};
use crate::error::TaskError;

/// Handle returned by [`all`](crate::all), results are addressed by position.
#[derive(Debug)]
pub struct List<T> {
    settle: Settle<T>,
    results: Vec<Option<T>>,
}

impl<T> List<T>
where
    T: Clone,
{
    /// Blocks until every task has finished, successfully or not.
    ///
    /// Slot `i` holds the value of task `i` if it completed and `None` if it
    /// failed. When any task failed, [`List::error`] holds the error of the
    /// last failed task in dispatch order.
    pub fn wait(&mut self) -> Vec<Option<T>> {
        self.extract(Wait::Forever)
    }

    /// Like [`List::wait`], but gives up waiting after `timeout`. Tasks that
    /// have not finished by then are left running and read as `None`; hitting
    /// the deadline is not an error.
    pub fn wait_timeout(&mut self, timeout: Duration) -> Vec<Option<T>> {
        self.extract(Wait::Deadline(timeout))
    }

    /// [`List::wait_timeout`] with the timeout in milliseconds.
    pub fn wait_ms(&mut self, millis: u64) -> Vec<Option<T>> {
        self.wait_timeout(Duration::from_millis(millis))
    }

    fn extract(&mut self, wait: Wait) -> Vec<Option<T>> {
        self.settle.block(wait);

        let mut results = vec![None; self.settle.futures.len()];
        self.settle.collect(|id, value| results[id] = Some(value.clone()));

        self.results = results;
        self.results.clone()
    }
}

impl<T> List<T> {
    pub(crate) fn new(futures: Vec<Arc<Future<T>>>, latch: Arc<Latch>) -> Self {
        Self {
            settle: Settle::new(futures, latch),
            results: Vec::new(),
        }
    }

    /// Results of the most recent wait, empty before the first one.
    pub fn results(&self) -> &[Option<T>] {
        &self.results
    }

    /// A representative error: the last one seen among failed tasks.
    pub fn error(&self) -> Option<&TaskError> {
        self.settle.error.as_ref()
    }

    /// Per-task records, indexed by identity.
    pub fn futures(&self) -> &[Arc<Future<T>>] {
        &self.settle.futures
    }

    pub fn len(&self) -> usize {
        self.settle.futures.len()
    }

    pub fn is_empty(&self) -> bool {
        self.settle.futures.is_empty()
    }

    /// Number of tasks that have not finished yet.
    pub fn pending(&self) -> usize {
        self.settle.pending()
    }

    pub fn is_settled(&self) -> bool {
        self.pending() == 0
    }
}
