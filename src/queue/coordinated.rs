//! CoordinatedQueue: a bounded, closable MPMC queue
//!
//! The queue tracks how many producers are still active so that consumers
//! learn when no more items will ever arrive. Once every producer has called
//! [`CoordinatedQueue::finish`], or a supervisor has called
//! [`CoordinatedQueue::shutdown`], consumers drain the remaining items and
//! then receive [`QueueError::Done`].
//!
//! All state lives under one mutex that is never held across an await
//! point. Waiting is done with [`tokio::sync::Notify`]: a waiter registers
//! interest before it inspects the state, so a wake-up issued between the
//! check and the await is never lost.

use crate::core::sync::handle_mutex_poison;
use crate::queue::config::QueueConfig;
use crate::queue::error::{QueueError, QueueResult};
use crate::queue::internal::{Push, QueueState};
use crate::queue::traits::Countable;
use log::{debug, info, trace, warn};
use std::fmt;
use std::sync::{Mutex, MutexGuard, PoisonError};
use tokio::sync::Notify;

/// Bounded FIFO queue with producer accounting and an end-of-stream signal
///
/// The creator counts as the first producer. Additional producers register
/// with [`add_producer`](Self::add_producer) before they start and every
/// producer calls [`finish`](Self::finish) exactly once when done.
///
/// # Example
///
/// ```rust,no_run
/// use coordq::queue::api::CoordinatedQueue;
/// use std::sync::Arc;
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let queue = Arc::new(CoordinatedQueue::new(16));
///
/// let producer = {
///     let queue = Arc::clone(&queue);
///     tokio::spawn(async move {
///         for i in 0..100 {
///             queue.put(i).await?;
///         }
///         queue.finish()
///     })
/// };
///
/// while let Some(item) = queue.read().await? {
///     println!("Received: {}", item);
///     queue.task_done()?;
/// }
/// producer.await??;
/// # Ok(())
/// # }
/// ```
pub struct CoordinatedQueue<T> {
    state: Mutex<QueueState<T>>,

    /// Consumers waiting for an item or for the end of the stream
    not_empty: Notify,

    /// Producers waiting for free capacity
    not_full: Notify,

    /// Joiners waiting for the queue to be drained and acknowledged
    drained: Notify,
}

impl<T> CoordinatedQueue<T> {
    /// Create a queue holding at most `max_size` items (0 = unbounded) that counts enqueued items
    pub fn new(max_size: usize) -> Self {
        Self::with_config(QueueConfig {
            max_size,
            ..QueueConfig::default()
        })
    }

    pub fn with_config(config: QueueConfig) -> Self {
        debug!(
            "Creating queue (max size: {}, counting: {})",
            config.max_size, config.count_items
        );
        Self {
            state: Mutex::new(QueueState::new(config.max_size, config.count_items)),
            not_empty: Notify::new(),
            not_full: Notify::new(),
            drained: Notify::new(),
        }
    }

    fn lock(&self) -> QueueResult<MutexGuard<'_, QueueState<T>>> {
        handle_mutex_poison(self.state.lock(), |message| QueueError::Internal {
            message,
        })
    }

    /// Read-only snapshot; advisory, may be stale as soon as it returns
    fn snapshot<R>(&self, read: impl FnOnce(&QueueState<T>) -> R) -> R {
        let state = self.state.lock().unwrap_or_else(PoisonError::into_inner);
        read(&state)
    }

    fn wake_all(&self) {
        self.not_empty.notify_waiters();
        self.not_full.notify_waiters();
        self.drained.notify_waiters();
    }

    /// Register `n` additional producers, returning the new producer count
    pub fn add_producer(&self, n: usize) -> QueueResult<usize> {
        let count = self
            .lock()?
            .add_producer(n)
            .inspect_err(|e| warn!("add_producer({}) rejected: {}", n, e))?;
        debug!("Registered {} producer(s), {} active", n, count);
        Ok(count)
    }

    /// Retire one producer
    ///
    /// Returns `true` only for the call that brings the producer count to
    /// zero and so ends the stream. Blocked consumers and producers are
    /// woken to observe the change.
    pub fn finish(&self) -> QueueResult<bool> {
        let (finished, remaining) = {
            let mut state = self.lock()?;
            let finished = state
                .finish()
                .inspect_err(|e| warn!("finish rejected: {}", e))?;
            (finished, state.producers())
        };

        if finished {
            info!("All producers finished, queue is done");
            self.wake_all();
        } else {
            debug!("Producer finished, {} still active", remaining);
        }
        Ok(finished)
    }

    /// Stop the queue unconditionally
    ///
    /// Further puts fail with [`QueueError::Done`]. Items already buffered stay
    /// available to consumers, who receive `Done` once the buffer is empty.
    /// Every waiter is woken. Calling it again has no effect.
    pub fn shutdown(&self) {
        // Poisoning is ignored here; shutdown must always take effect
        let first = self
            .state
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .shutdown();
        if first {
            info!("Queue shut down");
            self.wake_all();
        }
    }

    /// Enqueue an item, waiting for capacity if the queue is full
    ///
    /// Fails with [`QueueError::Done`] if the queue is finished or closed,
    /// including when that happens while waiting for capacity.
    pub async fn put(&self, item: T) -> QueueResult<()> {
        let mut item = item;
        loop {
            let notified = self.not_full.notified();
            tokio::pin!(notified);
            notified.as_mut().enable();

            let outcome = self.lock()?.push(item)?;
            match outcome {
                Push::Accepted => {
                    trace!("Item enqueued");
                    self.not_empty.notify_one();
                    return Ok(());
                }
                Push::Full(returned) => item = returned,
            }

            trace!("Queue full, producer waiting");
            notified.await;
        }
    }

    /// Enqueue an item or fail immediately with [`QueueError::Full`]
    pub fn try_put(&self, item: T) -> QueueResult<()> {
        let outcome = {
            let mut state = self.lock()?;
            match state.push(item)? {
                Push::Accepted => Ok(()),
                Push::Full(_) => Err(QueueError::Full {
                    max_size: state.max_size(),
                }),
            }
        };
        if outcome.is_ok() {
            self.not_empty.notify_one();
        }
        outcome
    }

    /// Dequeue the front item, waiting while the queue is empty
    ///
    /// Fails with [`QueueError::Done`] once the queue is empty and finished.
    pub async fn get(&self) -> QueueResult<T> {
        loop {
            let notified = self.not_empty.notified();
            tokio::pin!(notified);
            notified.as_mut().enable();

            let popped = self.lock()?.pop()?;
            if let Some(item) = popped {
                trace!("Item dequeued");
                self.not_full.notify_one();
                return Ok(item);
            }

            notified.await;
        }
    }

    /// Dequeue the front item or fail immediately with [`QueueError::Empty`]
    pub fn try_get(&self) -> QueueResult<T> {
        let popped = self.lock()?.pop()?;
        match popped {
            Some(item) => {
                self.not_full.notify_one();
                Ok(item)
            }
            None => Err(QueueError::Empty),
        }
    }

    /// Like [`get`](Self::get), but end-of-stream is `Ok(None)` instead of an error
    pub async fn read(&self) -> QueueResult<Option<T>> {
        match self.get().await {
            Ok(item) => Ok(Some(item)),
            Err(QueueError::Done) => Ok(None),
            Err(e) => Err(e),
        }
    }

    /// Acknowledge one previously dequeued item
    pub fn task_done(&self) -> QueueResult<()> {
        let drained = {
            let mut state = self.lock()?;
            state
                .task_done()
                .inspect_err(|e| warn!("task_done rejected: {}", e))?;
            state.is_drained()
        };
        if drained {
            self.drained.notify_waiters();
        }
        Ok(())
    }

    /// Wait until the queue is finished, empty and every item acknowledged
    pub async fn join(&self) -> QueueResult<()> {
        loop {
            let notified = self.drained.notified();
            tokio::pin!(notified);
            notified.as_mut().enable();

            if self.lock()?.is_drained() {
                return Ok(());
            }

            notified.await;
        }
    }

    /// Number of buffered items
    pub fn qsize(&self) -> usize {
        self.snapshot(|state| state.len())
    }

    pub fn is_empty(&self) -> bool {
        self.qsize() == 0
    }

    pub fn is_full(&self) -> bool {
        self.snapshot(|state| state.is_full())
    }

    /// Capacity, 0 when unbounded
    pub fn maxsize(&self) -> usize {
        self.snapshot(|state| state.max_size())
    }

    /// Total items ever enqueued (0 when counting is disabled)
    pub fn count(&self) -> usize {
        self.snapshot(|state| state.total_enqueued())
    }

    /// Producers not yet finished
    pub fn producers(&self) -> usize {
        self.snapshot(|state| state.producers())
    }

    /// Dequeued items not yet acknowledged with [`task_done`](Self::task_done)
    pub fn pending_ack(&self) -> usize {
        self.snapshot(|state| state.pending_ack())
    }

    /// True once all producers finished or the queue was shut down
    pub fn is_finished(&self) -> bool {
        self.snapshot(|state| state.is_finished())
    }

    pub fn is_closed(&self) -> bool {
        self.snapshot(|state| state.is_closed())
    }
}

impl<T> Default for CoordinatedQueue<T> {
    fn default() -> Self {
        Self::with_config(QueueConfig::default())
    }
}

impl<T> Countable for CoordinatedQueue<T> {
    fn count(&self) -> usize {
        self.snapshot(|state| state.total_enqueued())
    }
}

impl<T> fmt::Debug for CoordinatedQueue<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.snapshot(|state| {
            f.debug_struct("CoordinatedQueue")
                .field("size", &state.len())
                .field("max_size", &state.max_size())
                .field("producers", &state.producers())
                .field("finished", &state.is_finished())
                .field("closed", &state.is_closed())
                .field("count", &state.total_enqueued())
                .field("pending_ack", &state.pending_ack())
                .finish()
        })
    }
}
