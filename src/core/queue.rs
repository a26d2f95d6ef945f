use std::collections::VecDeque;
use std::sync::{Mutex, MutexGuard, PoisonError};

use super::activity::ActivityRecord;

/// Default capacity shared by every queue in the crate.
pub const DEFAULT_QUEUE_CAPACITY: usize = 1000;

/// Outcome of a non-blocking push
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PushOutcome {
    Accepted,
    /// The queue was full; the item was discarded so the producer never
    /// stalls. Callers should log this.
    Dropped,
}

/// Bounded multi-producer queue drained by a single consumer.
///
/// `push` never blocks: when the queue is full the item is dropped and the
/// caller is told so. `drain_all` is also non-blocking and returns whatever
/// is currently enqueued, possibly nothing. Draining from more than one
/// consumer splits delivery between them; keeping a single consumer is the
/// caller's responsibility, not the queue's.
#[derive(Debug)]
pub struct BoundedQueue<T> {
    items: Mutex<VecDeque<T>>,
    capacity: usize,
}

/// Queue carrying progress events from worker stages to the render loop.
pub type ActivityQueue = BoundedQueue<ActivityRecord>;

impl<T> BoundedQueue<T> {
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_QUEUE_CAPACITY)
    }

    /// Capacity is fixed for the lifetime of the queue.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            items: Mutex::new(VecDeque::new()),
            capacity,
        }
    }

    /// Safe to call from any number of producer threads.
    pub fn push(&self, item: T) -> PushOutcome {
        let mut items = self.lock();
        if items.len() >= self.capacity {
            return PushOutcome::Dropped;
        }
        items.push_back(item);
        PushOutcome::Accepted
    }

    /// Remove and return everything currently enqueued, in push order.
    pub fn drain_all(&self) -> Vec<T> {
        self.lock().drain(..).collect()
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    // Poisoning only marks a producer panic mid-push; recover the guard
    // instead of spreading the panic to the consumer.
    fn lock(&self) -> MutexGuard<'_, VecDeque<T>> {
        self.items.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl<T> Default for BoundedQueue<T> {
    fn default() -> Self {
        Self::new()
    }
}
