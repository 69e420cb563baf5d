//! Traits for the queue system

/// Anything that can report how many items it has processed so far
///
/// Progress reporting polls this value, so implementations must be cheap
/// and must never decrease.
///
/// # Example Implementation
///
/// ```rust,no_run
/// use coordq::queue::Countable;
/// use std::sync::atomic::{AtomicUsize, Ordering};
///
/// struct RowWriter {
///     rows: AtomicUsize,
/// }
///
/// impl Countable for RowWriter {
///     fn count(&self) -> usize {
///         self.rows.load(Ordering::Relaxed)
///     }
/// }
/// ```
pub trait Countable {
    fn count(&self) -> usize;
}
