//! Blocking facade for callers on plain threads
//!
//! These methods park the calling thread until the corresponding async
//! operation completes. They must not be called from within an async
//! runtime worker, use the async methods there instead.

use crate::queue::coordinated::CoordinatedQueue;
use crate::queue::error::{QueueError, QueueResult};
use futures::executor::block_on;

impl<T> CoordinatedQueue<T> {
    /// Blocking [`put`](Self::put)
    pub fn blocking_put(&self, item: T) -> QueueResult<()> {
        block_on(self.put(item))
    }

    /// Blocking [`get`](Self::get)
    pub fn blocking_get(&self) -> QueueResult<T> {
        block_on(self.get())
    }

    /// Blocking [`read`](Self::read)
    pub fn blocking_read(&self) -> QueueResult<Option<T>> {
        block_on(self.read())
    }

    /// Blocking [`join`](Self::join)
    pub fn blocking_join(&self) -> QueueResult<()> {
        block_on(self.join())
    }

    /// Iterate the queue on the current thread until the end-of-stream signal
    pub fn blocking_iter(&self) -> BlockingIter<'_, T> {
        BlockingIter {
            queue: self,
            done: false,
        }
    }
}

/// Iterator returned by [`CoordinatedQueue::blocking_iter`]
#[derive(Debug)]
pub struct BlockingIter<'a, T> {
    queue: &'a CoordinatedQueue<T>,
    done: bool,
}

impl<T> Iterator for BlockingIter<'_, T> {
    type Item = QueueResult<T>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }
        match self.queue.blocking_get() {
            Ok(item) => Some(Ok(item)),
            Err(QueueError::Done) => {
                self.done = true;
                None
            }
            Err(e) => {
                self.done = true;
                Some(Err(e))
            }
        }
    }
}

impl<T> std::iter::FusedIterator for BlockingIter<'_, T> {}
