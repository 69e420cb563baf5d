//! Generic error handling utilities

/// Errors that can tell user-actionable failures from system failures
///
/// When `is_user_actionable()` returns `true`, `user_message()` must return
/// `Some(message)` with something the user can act on, otherwise `None`.
pub trait ContextualError: std::error::Error {
    /// True if the error carries a message that should be shown as-is
    /// (a bad configuration value, for instance)
    fn is_user_actionable(&self) -> bool;

    fn user_message(&self) -> Option<&str>;
}

/// Log an error, preferring the user message for user-actionable errors
///
/// System errors are logged with the operation context only; the full
/// error is always available at debug level.
pub fn log_error_with_context<E: ContextualError + std::fmt::Debug>(
    error: &E,
    operation_context: &str,
) {
    match error.user_message() {
        Some(user_msg) if error.is_user_actionable() => {
            log::error!("{}: {}", operation_context, user_msg)
        }
        _ => log::error!("{} failed", operation_context),
    }
    log::debug!("DETAIL: {}", error);
    log::debug!("DEBUG_DETAILS: {:?}", error);
}
