//! Iteration over a CoordinatedQueue
//!
//! A consumer iterates by calling `get` repeatedly. The end-of-stream signal
//! ends the iteration; any other error is yielded once and ends it as well.
//! Several consumers may iterate the same queue concurrently, each item goes
//! to exactly one of them.

use crate::queue::coordinated::CoordinatedQueue;
use crate::queue::error::{QueueError, QueueResult};
use futures::stream::{self, Stream};
use std::ops::Deref;
use std::sync::Arc;

/// Build the consumer stream over any handle that derefs to the queue
fn consume<T, Q>(queue: Q) -> impl Stream<Item = QueueResult<T>>
where
    Q: Deref<Target = CoordinatedQueue<T>>,
{
    stream::unfold(Some(queue), |queue| async move {
        let queue = queue?;
        match queue.get().await {
            Ok(item) => Some((Ok(item), Some(queue))),
            Err(QueueError::Done) => None,
            Err(e) => Some((Err(e), None)),
        }
    })
}

impl<T> CoordinatedQueue<T> {
    /// Stream the queue's items until the end-of-stream signal
    ///
    /// ```rust,no_run
    /// use coordq::queue::api::CoordinatedQueue;
    /// use futures::StreamExt;
    ///
    /// # async fn example(queue: &CoordinatedQueue<String>) -> Result<(), Box<dyn std::error::Error>> {
    /// let mut items = std::pin::pin!(queue.stream());
    /// while let Some(item) = items.next().await {
    ///     println!("Processing: {}", item?);
    /// }
    /// # Ok(())
    /// # }
    /// ```
    pub fn stream(&self) -> impl Stream<Item = QueueResult<T>> + '_ {
        consume(self)
    }

    /// Owning variant of [`stream`](Self::stream), suitable for spawned tasks
    pub fn into_stream(self: Arc<Self>) -> impl Stream<Item = QueueResult<T>> + Send + 'static
    where
        T: Send + 'static,
    {
        consume(self)
    }
}
