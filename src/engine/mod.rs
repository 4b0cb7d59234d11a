mod dispatch;
mod future;
mod latch;
mod list;
mod props;
mod settle;
mod worker;

pub use crate::engine::dispatch::Dispatcher;
pub use crate::engine::future::{Future, Status};
pub use crate::engine::list::List;
pub use crate::engine::props::Props;

/// A boxed unit of work. Any `FnOnce() -> anyhow::Result<T> + Send + 'static`
/// is accepted by the dispatcher; this alias is handy when tasks of different
/// shapes have to share one collection.
pub type Task<T> = Box<dyn FnOnce() -> anyhow::Result<T> + Send + 'static>;
