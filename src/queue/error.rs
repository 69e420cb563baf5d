//! Queue Error Types

use crate::core::error_handling::ContextualError;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum QueueError {
    /// End-of-stream: every producer has finished or the queue was shut down
    #[error("Queue is done")]
    Done,

    #[error("Queue is full (max size: {max_size})")]
    Full { max_size: usize },

    #[error("Queue is empty")]
    Empty,

    /// Misuse of the producer/consumer protocol by the caller
    #[error("Invalid queue state: {message}")]
    InvalidState { message: String },

    #[error("Internal queue error: {message}")]
    Internal { message: String },

    #[error("Configuration error: {message}")]
    Configuration { message: String },
}

impl QueueError {
    pub(crate) fn invalid_state(message: impl Into<String>) -> Self {
        QueueError::InvalidState {
            message: message.into(),
        }
    }

    /// True for the end-of-stream signal, which is not a fault
    pub fn is_done(&self) -> bool {
        matches!(self, QueueError::Done)
    }

    /// True for errors the non-blocking operations raise under normal backpressure
    pub fn is_would_block(&self) -> bool {
        matches!(self, QueueError::Full { .. } | QueueError::Empty)
    }
}

impl ContextualError for QueueError {
    fn is_user_actionable(&self) -> bool {
        matches!(self, QueueError::Configuration { .. })
    }

    fn user_message(&self) -> Option<&str> {
        match self {
            QueueError::Configuration { message } => Some(message),
            _ => None,
        }
    }
}

/// Result type for queue operations
pub type QueueResult<T> = Result<T, QueueError>;
