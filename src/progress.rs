//! Progress reporting over Countable sources
//!
//! The monitor polls one or more [`Countable`] values (typically queues) at a
//! fixed period and logs the running total whenever it moves.

use crate::queue::Countable;
use std::sync::Arc;
use thiserror::Error;
use tokio::sync::broadcast;
use tokio::time::{interval, Duration, MissedTickBehavior};

/// Module-local result type for monitor operations
type Result<T> = std::result::Result<T, MonitorError>;

#[derive(Debug, Error, Clone, PartialEq)]
pub enum MonitorError {
    #[error("Nothing to monitor")]
    NothingToMonitor,

    #[error("Polling period must be greater than zero")]
    InvalidPeriod,

    #[error("Batch size must be greater than zero")]
    InvalidBatch,
}

/// Shared handle to a monitored source
pub type CountableRef = Arc<dyn Countable + Send + Sync>;

/// Tracks the last observed total and the optional target
///
/// Each counted item may stand for `batch` units of work (a queue of
/// chunks, for instance); reported increases are scaled accordingly.
#[derive(Debug, Clone)]
pub struct ProgressTracker {
    current: usize,
    total: Option<usize>,
    batch: usize,
}

impl ProgressTracker {
    pub fn new(total: Option<usize>) -> Self {
        Self::with_batch(total, 1)
    }

    pub fn with_batch(total: Option<usize>, batch: usize) -> Self {
        Self {
            current: 0,
            total,
            batch,
        }
    }

    /// Record a reading; returns the scaled increase when the reading grew
    pub fn update(&mut self, reading: usize) -> Option<usize> {
        let delta = reading.saturating_sub(self.current);
        self.current = reading;
        match delta {
            0 => None,
            delta => Some(delta.saturating_mul(self.batch)),
        }
    }

    pub fn current(&self) -> usize {
        self.current
    }

    pub fn total(&self) -> Option<usize> {
        self.total
    }

    pub fn batch(&self) -> usize {
        self.batch
    }

    pub fn is_complete(&self) -> bool {
        self.total.is_some_and(|total| self.current >= total)
    }

    /// Completion in percent, if a total is known
    pub fn percent(&self) -> Option<f64> {
        match self.total {
            Some(0) => Some(100.0),
            Some(total) => Some(self.current as f64 * 100.0 / total as f64),
            None => None,
        }
    }
}

pub fn sum_counts(monitored: &[CountableRef]) -> usize {
    monitored.iter().map(|m| m.count()).sum()
}

/// Take a fresh reading and log it if it grew
fn poll(title: &str, monitored: &[CountableRef], tracker: &mut ProgressTracker) {
    let Some(delta) = tracker.update(sum_counts(monitored)) else {
        return;
    };
    match tracker.percent() {
        Some(percent) => log::info!(
            "{}: {} (+{}, {:.1}%)",
            title,
            tracker.current(),
            delta,
            percent
        ),
        None => log::info!("{}: {} (+{})", title, tracker.current(), delta),
    }
}

/// Poll `monitored` every `period` and log progress until done
///
/// Returns the total once it reaches `total`, or the final total when a
/// shutdown signal arrives (a dropped sender counts as one).
pub async fn run_monitor(
    title: &str,
    monitored: Vec<CountableRef>,
    total: Option<usize>,
    period: Duration,
    shutdown_rx: broadcast::Receiver<()>,
) -> Result<usize> {
    run_batched_monitor(title, monitored, total, period, 1, shutdown_rx).await
}

/// [`run_monitor`] where every counted item represents `batch` units
pub async fn run_batched_monitor(
    title: &str,
    monitored: Vec<CountableRef>,
    total: Option<usize>,
    period: Duration,
    batch: usize,
    mut shutdown_rx: broadcast::Receiver<()>,
) -> Result<usize> {
    if monitored.is_empty() {
        return Err(MonitorError::NothingToMonitor);
    }
    if period.is_zero() {
        return Err(MonitorError::InvalidPeriod);
    }
    if batch == 0 {
        return Err(MonitorError::InvalidBatch);
    }

    let mut tracker = ProgressTracker::with_batch(total, batch);
    let mut ticker = interval(period);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

    loop {
        tokio::select! {
            _ = shutdown_rx.recv() => {
                poll(title, &monitored, &mut tracker);
                log::debug!("{}: monitor stopped at {}", title, tracker.current());
                break;
            }

            _ = ticker.tick() => {
                poll(title, &monitored, &mut tracker);
                if tracker.is_complete() {
                    break;
                }
            }
        }
    }

    Ok(tracker.current())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::queue::api::CoordinatedQueue;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use tokio::time::timeout;

    struct Counter(AtomicUsize);

    impl Countable for Counter {
        fn count(&self) -> usize {
            self.0.load(Ordering::Relaxed)
        }
    }

    #[test]
    fn test_tracker_reports_changes_only() {
        let mut tracker = ProgressTracker::new(Some(10));
        assert_eq!(tracker.update(0), None);
        assert_eq!(tracker.update(4), Some(4));
        assert_eq!(tracker.update(4), None);
        assert_eq!(tracker.update(7), Some(3));
        assert!(!tracker.is_complete());
        assert_eq!(tracker.update(10), Some(3));
        assert!(tracker.is_complete());
        assert_eq!(tracker.percent(), Some(100.0));
    }

    #[test]
    fn test_tracker_ignores_falling_reading() {
        let mut tracker = ProgressTracker::new(None);
        assert_eq!(tracker.update(5), Some(5));
        assert_eq!(tracker.update(2), None);
        assert_eq!(tracker.current(), 2);
        assert_eq!(tracker.update(4), Some(2));
    }

    #[test]
    fn test_tracker_scales_by_batch() {
        let mut tracker = ProgressTracker::with_batch(Some(10), 50);
        assert_eq!(tracker.batch(), 50);
        assert_eq!(tracker.update(3), Some(150));
        assert_eq!(tracker.update(10), Some(350));
        assert!(tracker.is_complete());
    }

    #[test]
    fn test_tracker_without_total_never_completes() {
        let mut tracker = ProgressTracker::new(None);
        tracker.update(1_000_000);
        assert!(!tracker.is_complete());
        assert_eq!(tracker.percent(), None);
    }

    #[test]
    fn test_sum_counts_over_queues() {
        let q1 = Arc::new(CoordinatedQueue::new(0));
        let q2 = Arc::new(CoordinatedQueue::new(0));
        q1.try_put(1).unwrap();
        q2.try_put(2).unwrap();
        q2.try_put(3).unwrap();

        let monitored: Vec<CountableRef> = vec![q1, q2];
        assert_eq!(sum_counts(&monitored), 3);
    }

    #[tokio::test]
    async fn test_monitor_rejects_empty_input() {
        let (_tx, rx) = broadcast::channel(1);
        let result = run_monitor("empty", Vec::new(), None, Duration::from_millis(10), rx).await;
        assert_eq!(result, Err(MonitorError::NothingToMonitor));
    }

    #[tokio::test]
    async fn test_monitor_rejects_zero_period() {
        let (_tx, rx) = broadcast::channel(1);
        let counter: CountableRef = Arc::new(Counter(AtomicUsize::new(0)));
        let result = run_monitor("zero", vec![counter], None, Duration::ZERO, rx).await;
        assert_eq!(result, Err(MonitorError::InvalidPeriod));
    }

    #[tokio::test]
    async fn test_monitor_rejects_zero_batch() {
        let (_tx, rx) = broadcast::channel(1);
        let counter: CountableRef = Arc::new(Counter(AtomicUsize::new(0)));
        let result =
            run_batched_monitor("batch", vec![counter], None, Duration::from_millis(5), 0, rx)
                .await;
        assert_eq!(result, Err(MonitorError::InvalidBatch));
    }

    #[tokio::test]
    async fn test_monitor_reports_fresh_total_on_shutdown() {
        let (tx, rx) = broadcast::channel(1);
        let queue = Arc::new(CoordinatedQueue::new(0));
        let monitored: Vec<CountableRef> = vec![queue.clone()];

        // Only the immediate first tick fires within the test
        let monitor = tokio::spawn(async move {
            run_monitor("slow", monitored, None, Duration::from_secs(3600), rx).await
        });
        tokio::time::sleep(Duration::from_millis(20)).await;

        for i in 0..5 {
            queue.put(i).await.unwrap();
        }
        tx.send(()).unwrap();

        let seen = timeout(Duration::from_secs(2), monitor)
            .await
            .expect("monitor should stop on shutdown")
            .unwrap()
            .unwrap();
        assert_eq!(seen, 5);
        assert_eq!(queue.count(), 5);
    }

    #[tokio::test]
    async fn test_monitor_stops_at_total() {
        let (_tx, rx) = broadcast::channel(1);
        let queue = Arc::new(CoordinatedQueue::new(0));
        for i in 0..5 {
            queue.put(i).await.unwrap();
        }

        let monitored: Vec<CountableRef> = vec![queue.clone()];
        let seen = timeout(
            Duration::from_secs(2),
            run_monitor("items", monitored, Some(5), Duration::from_millis(5), rx),
        )
        .await
        .expect("monitor should stop once the total is reached")
        .unwrap();

        assert_eq!(seen, 5);
    }

    #[tokio::test]
    async fn test_monitor_stops_on_shutdown() {
        let (tx, rx) = broadcast::channel(1);
        let counter = Arc::new(Counter(AtomicUsize::new(0)));
        let monitored: Vec<CountableRef> = vec![counter.clone()];

        let monitor = tokio::spawn(async move {
            run_monitor("open-ended", monitored, None, Duration::from_millis(5), rx).await
        });

        counter.0.store(3, Ordering::Relaxed);
        tokio::time::sleep(Duration::from_millis(30)).await;
        tx.send(()).unwrap();

        let seen = timeout(Duration::from_secs(2), monitor)
            .await
            .expect("monitor should stop on shutdown")
            .unwrap()
            .unwrap();
        assert_eq!(seen, 3);
    }
}
