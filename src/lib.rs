//! Bounded, closable multi-producer/multi-consumer queue with producer
//! accounting and an end-of-stream signal.

pub mod core;
pub mod progress;
pub mod queue;
