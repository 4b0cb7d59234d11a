use std::sync::{Condvar, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

/// Countdown shared by every worker of one dispatch. Waiters are released once
/// the count reaches zero.
#[derive(Debug)]
pub(crate) struct Latch {
    remaining: Mutex<usize>,
    zero: Condvar,
}

impl Latch {
    pub(crate) fn new(count: usize) -> Self {
        Self {
            remaining: Mutex::new(count),
            zero: Condvar::new(),
        }
    }

    fn lock(&self) -> MutexGuard<'_, usize> {
        self.remaining.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub(crate) fn count_down(&self) {
        let mut remaining = self.lock();
        *remaining = remaining.saturating_sub(1);
        if *remaining == 0 {
            self.zero.notify_all();
        }
    }

    pub(crate) fn remaining(&self) -> usize {
        *self.lock()
    }

    pub(crate) fn wait(&self) {
        let guard = self.lock();
        let _guard = self
            .zero
            .wait_while(guard, |remaining| *remaining > 0)
            .unwrap_or_else(PoisonError::into_inner);
    }

    /// Returns `true` if the count reached zero before the timeout elapsed.
    pub(crate) fn wait_timeout(&self, timeout: Duration) -> bool {
        let guard = self.lock();
        let (guard, _) = self
            .zero
            .wait_timeout_while(guard, timeout, |remaining| *remaining > 0)
            .unwrap_or_else(PoisonError::into_inner);
        *guard == 0
    }
}

/// Counts the latch down when dropped, so a worker signals completion on
/// every exit path.
pub(crate) struct Signal<'a>(pub(crate) &'a Latch);

impl Drop for Signal<'_> {
    fn drop(&mut self) {
        self.0.count_down();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::thread;
    use std::time::Instant;

    #[test]
    fn test_zero_count_is_open() {
        let latch = Latch::new(0);
        latch.wait();
        assert!(latch.wait_timeout(Duration::ZERO));
        assert_eq!(latch.remaining(), 0);
    }

    #[test]
    fn test_count_down_releases_waiter() {
        let latch = Arc::new(Latch::new(3));

        for _ in 0..3 {
            let latch = latch.clone();
            thread::spawn(move || {
                thread::sleep(Duration::from_millis(20));
                latch.count_down();
            });
        }

        latch.wait();
        assert_eq!(latch.remaining(), 0);
    }

    #[test]
    fn test_wait_timeout_expires() {
        let latch = Latch::new(1);
        let start = Instant::now();

        assert!(!latch.wait_timeout(Duration::from_millis(50)));
        assert!(start.elapsed() >= Duration::from_millis(50));
        assert_eq!(latch.remaining(), 1);
    }

    #[test]
    fn test_count_down_saturates() {
        let latch = Latch::new(1);
        latch.count_down();
        latch.count_down();
        assert_eq!(latch.remaining(), 0);
    }

    #[test]
    fn test_signal_counts_down_on_drop() {
        let latch = Latch::new(2);
        {
            let _signal = Signal(&latch);
        }
        assert_eq!(latch.remaining(), 1);
    }
}
