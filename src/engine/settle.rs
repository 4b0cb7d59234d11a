use std::sync::Arc;
use std::time::Duration;

use crate::engine::future::{Future, Status};
use crate::engine::latch::Latch;
use crate::error::TaskError;

/// How long a handle is willing to block before it reads the futures.
#[derive(Debug, Clone, Copy)]
pub(crate) enum Wait {
    Forever,
    Deadline(Duration),
}

/// Fan-in state shared by both handle shapes.
#[derive(Debug)]
pub(crate) struct Settle<T> {
    pub(crate) futures: Vec<Arc<Future<T>>>,
    pub(crate) latch: Arc<Latch>,
    pub(crate) error: Option<TaskError>,
}

impl<T> Settle<T> {
    pub(crate) fn new(futures: Vec<Arc<Future<T>>>, latch: Arc<Latch>) -> Self {
        Self {
            futures,
            latch,
            error: None,
        }
    }

    /// Blocks according to `wait`. Returns `true` if every task finished.
    pub(crate) fn block(&self, wait: Wait) -> bool {
        match wait {
            Wait::Forever => {
                self.latch.wait();
                true
            }
            Wait::Deadline(timeout) => {
                let done = self.latch.wait_timeout(timeout);
                if !done {
                    tracing::debug!(
                        ?timeout,
                        pending = self.latch.remaining(),
                        "deadline elapsed, reading partial results"
                    );
                }
                done
            }
        }
    }

    /// Walks the futures in identity order, handing every completed value to
    /// `place`. The aggregated error ends up holding the error of the last
    /// stopped future in that order.
    pub(crate) fn collect(&mut self, mut place: impl FnMut(usize, &T)) {
        for future in &self.futures {
            if future.status() == Status::Completed
                && let Some(value) = future.result()
            {
                place(future.id(), value);
            }
            if let Some(err) = future.error() {
                self.error = Some(err.clone());
            }
        }
    }

    pub(crate) fn pending(&self) -> usize {
        self.latch.remaining()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn settled(outcomes: Vec<Option<Result<i32, &'static str>>>) -> Settle<i32> {
        let futures = outcomes
            .into_iter()
            .enumerate()
            .map(|(id, outcome)| {
                let future = Future::new(id);
                if let Some(outcome) = outcome {
                    let value = outcome.map_err(|msg| TaskError::new(anyhow::anyhow!(msg)));
                    future.settle(value, Duration::ZERO);
                }
                Arc::new(future)
            })
            .collect::<Vec<_>>();
        let pending = futures.iter().filter(|f| !f.status().is_terminal()).count();
        Settle::new(futures, Arc::new(Latch::new(pending)))
    }

    #[test]
    fn test_collect_places_completed_by_id() {
        let mut settle = settled(vec![Some(Ok(10)), None, Some(Ok(30))]);
        let mut placed = Vec::new();

        settle.collect(|id, value| placed.push((id, *value)));

        assert_eq!(placed, vec![(0, 10), (2, 30)]);
        assert!(settle.error.is_none());
        assert_eq!(settle.pending(), 1);
    }

    #[test]
    fn test_collect_keeps_last_error() {
        let mut settle = settled(vec![Some(Err("first")), Some(Ok(1)), Some(Err("second"))]);

        settle.collect(|_, _| {});

        assert_eq!(settle.error.unwrap().to_string(), "second");
    }

    #[test]
    fn test_block_deadline_reports_unfinished() {
        let settle = settled(vec![Some(Ok(1)), None]);
        assert!(!settle.block(Wait::Deadline(Duration::from_millis(10))));
    }

    #[test]
    fn test_block_forever_when_all_done() {
        let settle = settled(vec![Some(Ok(1)), Some(Err("x"))]);
        assert!(settle.block(Wait::Forever));
    }
}
