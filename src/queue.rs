//! A fixed-capacity, thread-safe FIFO with blocking `put`/`take`.
//!
//! Translates the source's `std::mutex` + two `std::condition_variable`s
//! directly: one condvar wakes waiters blocked on "not full", the other
//! wakes waiters blocked on "not empty". The queue carries no shutdown or
//! error state of its own -- callers encode shutdown as a sentinel value.

use std::collections::VecDeque;
use std::sync::{Condvar, Mutex};

pub struct BoundedQueue<T> {
    inner: Mutex<VecDeque<T>>,
    not_full: Condvar,
    not_empty: Condvar,
    capacity: usize,
}

impl<T> BoundedQueue<T> {
    pub fn new(capacity: usize) -> Self {
        Self {
            inner: Mutex::new(VecDeque::with_capacity(capacity)),
            not_full: Condvar::new(),
            not_empty: Condvar::new(),
            capacity,
        }
    }

    /// Blocks while the queue is at capacity, then appends `item` and
    /// wakes one waiter blocked in `take`.
    pub fn put(&self, item: T) {
        let mut guard = self.inner.lock().unwrap();
        guard = self
            .not_full
            .wait_while(guard, |q| q.len() == self.capacity)
            .unwrap();
        guard.push_back(item);
        drop(guard);
        self.not_empty.notify_one();
    }

    /// Blocks while the queue is empty, then removes and returns the
    /// front item, waking one waiter blocked in `put`.
    pub fn take(&self) -> T {
        let mut guard = self.inner.lock().unwrap();
        guard = self.not_empty.wait_while(guard, |q| q.is_empty()).unwrap();
        let item = guard.pop_front().expect("queue non-empty after wait");
        drop(guard);
        self.not_full.notify_one();
        item
    }

    pub fn len(&self) -> usize {
        self.inner.lock().unwrap().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::thread;

    #[test]
    fn fifo_order_is_preserved() {
        let q = BoundedQueue::new(8);
        for i in 0..8 {
            q.put(i);
        }
        for i in 0..8 {
            assert_eq!(q.take(), i);
        }
    }

    #[test]
    fn size_never_exceeds_capacity() {
        let q = Arc::new(BoundedQueue::new(4));
        let producer = {
            let q = Arc::clone(&q);
            thread::spawn(move || {
                for i in 0..50 {
                    q.put(i);
                    assert!(q.len() <= 4);
                }
            })
        };
        let consumer = {
            let q = Arc::clone(&q);
            thread::spawn(move || {
                let mut received = Vec::new();
                for _ in 0..50 {
                    received.push(q.take());
                }
                received
            })
        };
        producer.join().unwrap();
        let received = consumer.join().unwrap();
        assert_eq!(received, (0..50).collect::<Vec<_>>());
    }

    #[test]
    fn put_and_take_do_not_deadlock_with_multiple_consumers() {
        let q = Arc::new(BoundedQueue::new(2));
        let n_items = 200;
        let n_workers = 4;

        let producer = {
            let q = Arc::clone(&q);
            thread::spawn(move || {
                for i in 0..n_items {
                    q.put(Some(i));
                }
                for _ in 0..n_workers {
                    q.put(None);
                }
            })
        };

        let workers: Vec<_> = (0..n_workers)
            .map(|_| {
                let q = Arc::clone(&q);
                thread::spawn(move || {
                    let mut count = 0;
                    loop {
                        match q.take() {
                            Some(_) => count += 1,
                            None => break,
                        }
                    }
                    count
                })
            })
            .collect();

        producer.join().unwrap();
        let total: usize = workers.into_iter().map(|h| h.join().unwrap()).sum();
        assert_eq!(total, n_items);
    }
}
