//! Internal queue state machine
//!
//! This module holds everything the queue guards with its single lock:
//! - The FIFO buffer and its capacity
//! - Producer registration and retirement
//! - The finished and closed transitions
//! - Enqueue and acknowledgement counters
//!
//! Nothing here suspends. `CoordinatedQueue` interprets the outcomes and
//! decides when a caller has to wait and who has to be woken.

use crate::queue::error::{QueueError, QueueResult};
use std::collections::VecDeque;

/// Outcome of offering an item to the buffer
#[derive(Debug)]
pub(crate) enum Push<T> {
    Accepted,
    /// Buffer at capacity, the item is handed back to the caller
    Full(T),
}

#[derive(Debug)]
pub(crate) struct QueueState<T> {
    buffer: VecDeque<T>,

    /// Maximum buffered items, 0 means unbounded
    max_size: usize,

    /// Producers not yet declared finished
    producers: usize,

    /// Set once `producers` reaches zero through `finish`
    finished: bool,

    /// Set by `shutdown`, implies finished
    closed: bool,

    count_items: bool,
    total_enqueued: usize,

    /// Dequeued items not yet acknowledged through `task_done`
    pending_ack: usize,
}

impl<T> QueueState<T> {
    pub(crate) fn new(max_size: usize, count_items: bool) -> Self {
        Self {
            buffer: VecDeque::new(),
            max_size,
            producers: 1, // The creator is the implicit first producer
            finished: false,
            closed: false,
            count_items,
            total_enqueued: 0,
            pending_ack: 0,
        }
    }

    pub(crate) fn add_producer(&mut self, n: usize) -> QueueResult<usize> {
        if n == 0 {
            return Err(QueueError::invalid_state(
                "producer increment must be at least 1",
            ));
        }
        if self.closed {
            return Err(QueueError::invalid_state(
                "cannot add producers to a closed queue",
            ));
        }
        if self.finished {
            return Err(QueueError::invalid_state(
                "cannot add producers to a finished queue",
            ));
        }
        self.producers = self
            .producers
            .checked_add(n)
            .ok_or_else(|| QueueError::invalid_state("producer count overflow"))?;
        Ok(self.producers)
    }

    /// Retire one producer; true only for the call that finishes the queue
    pub(crate) fn finish(&mut self) -> QueueResult<bool> {
        if self.producers == 0 {
            return Err(QueueError::invalid_state(
                "finish called with no registered producers left",
            ));
        }
        self.producers -= 1;
        if self.producers > 0 || self.finished {
            return Ok(false);
        }
        self.finished = true;
        // A shutdown already ended the stream, so this call transitions nothing
        Ok(!self.closed)
    }

    /// Close the queue; true only for the first call
    pub(crate) fn shutdown(&mut self) -> bool {
        if self.closed {
            return false;
        }
        self.closed = true;
        true
    }

    pub(crate) fn push(&mut self, item: T) -> QueueResult<Push<T>> {
        if self.is_finished() {
            return Err(QueueError::Done);
        }
        if self.is_full() {
            return Ok(Push::Full(item));
        }
        self.buffer.push_back(item);
        if self.count_items {
            self.total_enqueued += 1;
        }
        Ok(Push::Accepted)
    }

    /// Pop the front item; `Ok(None)` means the caller has to wait for more
    pub(crate) fn pop(&mut self) -> QueueResult<Option<T>> {
        match self.buffer.pop_front() {
            Some(item) => {
                self.pending_ack += 1;
                Ok(Some(item))
            }
            None if self.is_finished() => Err(QueueError::Done),
            None => Ok(None),
        }
    }

    pub(crate) fn task_done(&mut self) -> QueueResult<()> {
        if self.pending_ack == 0 {
            return Err(QueueError::invalid_state(
                "task_done called more times than items were dequeued",
            ));
        }
        self.pending_ack -= 1;
        Ok(())
    }

    pub(crate) fn is_finished(&self) -> bool {
        self.finished || self.closed
    }

    pub(crate) fn is_closed(&self) -> bool {
        self.closed
    }

    pub(crate) fn is_full(&self) -> bool {
        self.max_size > 0 && self.buffer.len() >= self.max_size
    }

    /// Finished, empty and every dequeued item acknowledged
    pub(crate) fn is_drained(&self) -> bool {
        self.is_finished() && self.buffer.is_empty() && self.pending_ack == 0
    }

    pub(crate) fn len(&self) -> usize {
        self.buffer.len()
    }

    pub(crate) fn max_size(&self) -> usize {
        self.max_size
    }

    pub(crate) fn producers(&self) -> usize {
        self.producers
    }

    pub(crate) fn total_enqueued(&self) -> usize {
        self.total_enqueued
    }

    pub(crate) fn pending_ack(&self) -> usize {
        self.pending_ack
    }
}
