//! Public API for the queue system
//!
//! External modules should import from here rather than from the internal
//! modules. See the module documentation for usage and architecture.

// Core queue
pub use crate::queue::blocking::BlockingIter;
pub use crate::queue::coordinated::CoordinatedQueue;

// Configuration
pub use crate::queue::config::QueueConfig;

// Error handling
pub use crate::queue::error::{QueueError, QueueResult};

// Traits
pub use crate::queue::traits::Countable;
