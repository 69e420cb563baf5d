//! Common test utilities for the integration tests

use coordq::queue::CoordinatedQueue;
use std::sync::Arc;
use tokio::task::JoinHandle;

/// Registered producers each put `items` numbered values, then finish
///
/// Each task resolves to the result of its `finish` call.
pub fn spawn_numbered_producers(
    queue: &Arc<CoordinatedQueue<(usize, usize)>>,
    producers: usize,
    items: usize,
) -> Vec<JoinHandle<bool>> {
    if producers > 1 {
        queue.add_producer(producers - 1).unwrap();
    }
    (0..producers)
        .map(|producer_id| {
            let queue = Arc::clone(queue);
            tokio::spawn(async move {
                for i in 0..items {
                    queue.put((producer_id, i)).await.unwrap();
                }
                queue.finish().unwrap()
            })
        })
        .collect()
}
