use std::collections::VecDeque;
use std::sync::{Condvar, Mutex};

/// Blocking multi-producer queue: `pop_front` waits until an item arrives.
#[derive(Debug, Default)]
pub struct SharedQueue<T> {
    queue: Mutex<VecDeque<T>>,
    cond: Condvar,
}

impl<T> SharedQueue<T> {
    pub fn new() -> SharedQueue<T> {
        SharedQueue {
            queue: Mutex::new(VecDeque::new()),
            cond: Condvar::new(),
        }
    }

    pub fn push_back(&self, item: T) {
        let mut queue = self.queue.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
        queue.push_back(item);
        drop(queue);
        self.cond.notify_one();
    }

    pub fn pop_front(&self) -> T {
        let mut queue = self.queue.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
        loop {
            if let Some(item) = queue.pop_front() {
                return item;
            }
            queue = self.cond.wait(queue).unwrap_or_else(|poisoned| poisoned.into_inner());
        }
    }

    pub fn len(&self) -> usize {
        self.queue.lock().unwrap_or_else(|poisoned| poisoned.into_inner()).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
