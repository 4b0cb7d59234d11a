use std::collections::HashMap;
use std::collections::hash_map::Entry;
use std::hash::Hash;
use std::sync::Arc;

use tracing::Level;

use crate::engine::future::Future;
use crate::engine::latch::Latch;
use crate::engine::list::List;
use crate::engine::props::Props;
use crate::engine::worker::{self, WorkerOpts};

/// Fan-out launcher. Every task handed to [`Dispatcher::all`] or
/// [`Dispatcher::props`] gets its own worker thread, started before the call
/// returns.
///
/// The defaults are what the free functions [`all`](crate::all) and
/// [`props`](crate::props) use; build a `Dispatcher` when the worker threads
/// need a recognisable name or a different stack size.
///
/// ```rust
/// use promise::Dispatcher;
///
/// let mut list = Dispatcher::new()
///     .name("fetch")
///     .stack_size(256 * 1024)
///     .all((1..=2).map(|i| move || Ok(i)));
///
/// assert_eq!(list.wait(), vec![Some(1), Some(2)]);
/// ```
#[derive(Debug, Clone)]
pub struct Dispatcher {
    opts: WorkerOpts,
}

impl Default for Dispatcher {
    fn default() -> Self {
        Self {
            opts: WorkerOpts {
                name: String::from("promise"),
                stack_size: None,
            },
        }
    }
}

impl Dispatcher {
    pub fn new() -> Self {
        Self::default()
    }

    /// Prefix for worker thread names, threads are called `<name>-<id>`.
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.opts.name = name.into();
        self
    }

    /// Stack size in bytes for each worker thread.
    pub fn stack_size(mut self, size: usize) -> Self {
        self.opts.stack_size = Some(size);
        self
    }

    /// Runs every task concurrently. Identities follow the order of `tasks`.
    pub fn all<T, F, I>(&self, tasks: I) -> List<T>
    where
        T: Send + Sync + 'static,
        F: FnOnce() -> anyhow::Result<T> + Send + 'static,
        I: IntoIterator<Item = F>,
    {
        let tasks: Vec<F> = tasks.into_iter().collect();

        let span = tracing::span!(Level::DEBUG, "dispatch", kind = "all", tasks = tasks.len());
        let _enter = span.enter();

        let latch = Arc::new(Latch::new(tasks.len()));
        let mut futures = Vec::with_capacity(tasks.len());

        for (id, task) in tasks.into_iter().enumerate() {
            let future = Arc::new(Future::new(id));
            futures.push(future.clone());
            worker::spawn(&self.opts, future, latch.clone(), task);
        }

        List::new(futures, latch)
    }

    /// Runs every task concurrently and remembers which key each one came
    /// with. Identities come from a counter over the enumeration order of
    /// `tasks`, so unordered inputs still map keys to identities 1:1.
    ///
    /// Keys are unique like in a map: when a key repeats, the last task given
    /// for it replaces the earlier one, which is never run, and the key keeps
    /// the position of its first appearance.
    pub fn props<K, T, F, I>(&self, tasks: I) -> Props<K, T>
    where
        K: Eq + Hash + Clone,
        T: Send + Sync + 'static,
        F: FnOnce() -> anyhow::Result<T> + Send + 'static,
        I: IntoIterator<Item = (K, F)>,
    {
        let tasks = unique_keys(tasks);

        let span = tracing::span!(Level::DEBUG, "dispatch", kind = "props", tasks = tasks.len());
        let _enter = span.enter();

        let latch = Arc::new(Latch::new(tasks.len()));
        let mut futures = Vec::with_capacity(tasks.len());
        let mut keys = Vec::with_capacity(tasks.len());

        let mut id = 0;
        for (key, task) in tasks {
            keys.push(key);
            let future = Arc::new(Future::new(id));
            futures.push(future.clone());
            worker::spawn(&self.opts, future, latch.clone(), task);
            id += 1;
        }

        Props::new(futures, keys, latch)
    }
}

fn unique_keys<K, F, I>(tasks: I) -> Vec<(K, F)>
where
    K: Eq + Hash + Clone,
    I: IntoIterator<Item = (K, F)>,
{
    let mut slots: HashMap<K, usize> = HashMap::new();
    let mut unique: Vec<(K, F)> = Vec::new();

    for (key, task) in tasks {
        match slots.entry(key) {
            Entry::Occupied(slot) => {
                tracing::debug!("duplicate key, replacing earlier task");
                unique[*slot.get()].1 = task;
            }
            Entry::Vacant(slot) => {
                unique.push((slot.key().clone(), task));
                slot.insert(unique.len() - 1);
            }
        }
    }

    unique
}
