use std::collections::HashMap;
use std::hash::Hash;
use std::sync::Arc;
use std::time::Duration;

use crate::engine::future::Future;
use crate::engine::latch::Latch;
use crate::engine::settle::{Settle, Wait};
use crate::error::TaskError;

/// Handle returned by [`props`](crate::props), results are addressed by the
/// key each task was dispatched under.
#[derive(Debug)]
pub struct Props<K, T> {
    settle: Settle<T>,
    /// Key of the task with identity `i` is `keys[i]`.
    keys: Vec<K>,
}

impl<K, T> Props<K, T>
where
    K: Eq + Hash + Clone,
    T: Clone,
{
    /// Blocks until every task has finished, successfully or not.
    ///
    /// Only completed tasks have an entry in the returned map. When any task
    /// failed, [`Props::error`] holds the error of the last failed task in
    /// dispatch order.
    pub fn wait(&mut self) -> HashMap<K, T> {
        self.extract(Wait::Forever)
    }

    /// Like [`Props::wait`], but gives up waiting after `timeout`. Tasks that
    /// have not finished by then are left running and have no entry; hitting
    /// the deadline is not an error.
    pub fn wait_timeout(&mut self, timeout: Duration) -> HashMap<K, T> {
        self.extract(Wait::Deadline(timeout))
    }

    /// [`Props::wait_timeout`] with the timeout in milliseconds.
    pub fn wait_ms(&mut self, millis: u64) -> HashMap<K, T> {
        self.wait_timeout(Duration::from_millis(millis))
    }

    fn extract(&mut self, wait: Wait) -> HashMap<K, T> {
        self.settle.block(wait);

        let keys = &self.keys;
        let mut results = HashMap::with_capacity(keys.len());
        self.settle.collect(|id, value| {
            results.insert(keys[id].clone(), value.clone());
        });

        results
    }

    /// Record of the task dispatched under `key`.
    pub fn future(&self, key: &K) -> Option<&Arc<Future<T>>> {
        let id = self.keys.iter().position(|k| k == key)?;
        self.settle.futures.get(id)
    }
}

impl<K, T> Props<K, T> {
    pub(crate) fn new(futures: Vec<Arc<Future<T>>>, keys: Vec<K>, latch: Arc<Latch>) -> Self {
        Self {
            settle: Settle::new(futures, latch),
            keys,
        }
    }

    /// Key the task with identity `id` was dispatched under.
    pub fn key(&self, id: usize) -> Option<&K> {
        self.keys.get(id)
    }

    /// A representative error: the last one seen among failed tasks.
    pub fn error(&self) -> Option<&TaskError> {
        self.settle.error.as_ref()
    }

    /// Per-task records, indexed by identity.
    pub fn futures(&self) -> &[Arc<Future<T>>] {
        &self.settle.futures
    }

    /// Number of dispatched tasks, one per distinct key.
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
