#![forbid(unsafe_code)]
#![doc = include_str!("../README.md")]

mod engine;
mod error;
#[cfg(feature = "logging")]
pub mod logging;

use std::hash::Hash;

pub use crate::engine::{Dispatcher, Future, List, Props, Status, Task};
pub use crate::error::*;

/// Runs every task on its own thread and returns immediately with a handle
/// that collects the results by position.
///
/// Uses the default [`Dispatcher`].
pub fn all<T, F, I>(tasks: I) -> List<T>
where
    T: Send + Sync + 'static,
    F: FnOnce() -> anyhow::Result<T> + Send + 'static,
    I: IntoIterator<Item = F>,
{
    Dispatcher::default().all(tasks)
}

/// Runs every task on its own thread and returns immediately with a handle
/// that collects the results by key.
///
/// Uses the default [`Dispatcher`].
pub fn props<K, T, F, I>(tasks: I) -> Props<K, T>
where
    K: Eq + Hash + Clone,
    T: Send + Sync + 'static,
    F: FnOnce() -> anyhow::Result<T> + Send + 'static,
    I: IntoIterator<Item = (K, F)>,
{
    Dispatcher::default().props(tasks)
}
