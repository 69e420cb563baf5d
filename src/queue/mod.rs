//! Coordinated Queue Component
//!
//! A bounded, closable multi-producer/multi-consumer queue that knows when
//! no more items will ever arrive.
//!
//! # Overview
//!
//! On top of a plain FIFO buffer the queue tracks:
//!
//! - **Producers**: how many producers are still active. The creator is the
//!   first one, more register with `add_producer` and each calls `finish`
//!   exactly once.
//! - **Finished**: set when the last producer finishes. Consumers drain the
//!   buffer and then receive the end-of-stream signal instead of blocking.
//! - **Closed**: set by `shutdown`, an unconditional stop that any holder of
//!   the queue may issue. Buffered items stay consumable.
//! - **Backpressure**: `put` waits while the buffer is at capacity, `try_put`
//!   fails with `QueueError::Full`.
//!
//! # Architecture
//!
//! ```text
//! ┌────────────┐  ┌────────────┐
//! │ Producer A │  │ Producer B │   add_producer / put / finish
//! └─────┬──────┘  └─────┬──────┘
//!       │ put           │ put
//!       ▼               ▼
//! ┌──────────────────────────────────────────┐
//! │ CoordinatedQueue                          │
//! │  producers: 2   finished: no  closed: no  │◄── shutdown (supervisor)
//! │  ┌───┬───┬───┬───┐                        │
//! │  │ 1 │ 2 │ 3 │ 4 │  (max size M)          │
//! │  └───┴───┴───┴───┘                        │
//! └──────────────┬───────────────┬────────────┘
//!                │ get           │ get
//!          ┌─────┴──────┐  ┌─────┴──────┐
//!          │ Consumer A │  │ Consumer B │   each item goes to one consumer
//!          └────────────┘  └────────────┘
//! ```
//!
//! # Example Usage
//!
//! ```rust,no_run
//! use coordq::queue::{CoordinatedQueue, QueueError};
//! use std::sync::Arc;
//!
//! # async fn example() -> Result<(), QueueError> {
//! let queue = Arc::new(CoordinatedQueue::new(100));
//! queue.add_producer(1)?; // two producers in total
//!
//! for id in 0..2 {
//!     let queue = Arc::clone(&queue);
//!     tokio::spawn(async move {
//!         for i in 0..10 {
//!             queue.put(format!("producer-{}: {}", id, i)).await?;
//!         }
//!         queue.finish()
//!     });
//! }
//!
//! while let Some(line) = queue.read().await? {
//!     println!("{}", line);
//! }
//! # Ok(())
//! # }
//! ```

pub mod api;
mod blocking;
mod config;
mod coordinated;
mod error;
mod internal;
mod stream;
mod traits;

pub use blocking::BlockingIter;
pub use config::QueueConfig;
pub use coordinated::CoordinatedQueue;
pub use error::{QueueError, QueueResult};
pub use traits::Countable;

#[cfg(test)]
mod tests;
