//! Synchronization utilities for robust mutex handling

use std::sync::LockResult;

/// Convert a poisoned lock into an application error
///
/// A poisoned mutex means a thread panicked while holding it. Instead of
/// propagating the panic with `unwrap()`, callers turn it into their own
/// error type through `error_constructor`.
///
/// # Examples
/// ```
/// use std::sync::Mutex;
/// use coordq::core::sync::handle_mutex_poison;
/// use coordq::queue::QueueError;
///
/// let mutex = Mutex::new(42);
/// let guard = handle_mutex_poison(mutex.lock(), |message| QueueError::Internal { message })
///     .unwrap();
/// assert_eq!(*guard, 42);
/// ```
pub fn handle_mutex_poison<T, E>(
    result: LockResult<T>,
    error_constructor: impl FnOnce(String) -> E,
) -> Result<T, E> {
    result.map_err(|poison_err| {
        error_constructor(format!(
            "Internal synchronisation error (mutex poisoned). A panic occurred while holding a lock. PoisonError: {:?}",
            poison_err
        ))
    })
}
