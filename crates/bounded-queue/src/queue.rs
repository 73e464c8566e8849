//! Fixed-Capacity Ring Buffer Implementation

use crate::error::QueueError;
use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::{info, warn};

/// Default queue capacity used by the PAC-RF binary
pub const DEFAULT_CAPACITY: usize = 10;

/// FIFO ring buffer with a hard capacity and no dynamic growth
///
/// Not internally synchronized: wrap it in a `Mutex` when a producer and a
/// consumer live on different threads.
pub struct BoundedQueue<T> {
    /// Pre-allocated slots, `None` when free
    slots: Box<[Option<T>]>,
    /// Read position
    head: usize,
    /// Write position
    tail: usize,
    /// Items currently stored
    count: usize,
}

/// Point-in-time view of the queue indices
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct QueueStatus {
    pub count: usize,
    pub capacity: usize,
    pub head: usize,
    pub tail: usize,
}

impl fmt::Display for QueueStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Queue Status -> Count: {} / {} | Head: {} | Tail: {}",
            self.count, self.capacity, self.head, self.tail
        )
    }
}

impl<T> BoundedQueue<T> {
    /// Create an empty queue holding at most `capacity` items
    pub fn new(capacity: usize) -> Result<Self, QueueError> {
        if capacity == 0 {
            return Err(QueueError::ZeroCapacity);
        }

        Ok(Self::allocate(capacity))
    }

    /// Create a queue with the default capacity (10 items)
    pub fn with_default_capacity() -> Self {
        Self::allocate(DEFAULT_CAPACITY)
    }

    fn allocate(capacity: usize) -> Self {
        let slots: Vec<Option<T>> = (0..capacity).map(|_| None).collect();
        info!("Queue initialized with capacity {}", capacity);
        Self {
            slots: slots.into_boxed_slice(),
            head: 0,
            tail: 0,
            count: 0,
        }
    }

    /// Append an item at the tail, rejecting it when the queue is full
    pub fn enqueue(&mut self, item: T) -> Result<(), QueueError> {
        if self.is_full() {
            warn!("Queue is full! Cannot enqueue new item.");
            return Err(QueueError::Full {
                capacity: self.capacity(),
            });
        }

        self.slots[self.tail] = Some(item);
        self.tail = (self.tail + 1) % self.capacity();
        self.count += 1;

        info!("Item enqueued successfully.");
        Ok(())
    }

    /// Remove and return the item at the head
    pub fn dequeue(&mut self) -> Result<T, QueueError> {
        if self.is_empty() {
            warn!("Queue is empty! Cannot dequeue.");
            return Err(QueueError::Empty);
        }

        let item = self.slots[self.head].take().ok_or(QueueError::Empty)?;
        self.head = (self.head + 1) % self.capacity();
        self.count -= 1;

        info!("Item dequeued successfully.");
        Ok(item)
    }

    /// Borrow the item at the head without removing it
    pub fn peek(&self) -> Option<&T> {
        if self.is_empty() {
            return None;
        }
        self.slots[self.head].as_ref()
    }

    /// Iterate stored items from oldest to newest
    pub fn iter(&self) -> impl Iterator<Item = &T> + '_ {
        let capacity = self.capacity();
        (0..self.count).filter_map(move |i| self.slots[(self.head + i) % capacity].as_ref())
    }

    /// Check if every slot is occupied
    pub fn is_full(&self) -> bool {
        self.count == self.capacity()
    }

    /// Check if no item is stored
    pub fn is_empty(&self) -> bool {
        self.count == 0
    }

    /// Number of stored items
    pub fn len(&self) -> usize {
        self.count
    }

    /// Get the queue capacity
    pub fn capacity(&self) -> usize {
        self.slots.len()
    }

    /// Snapshot of count, capacity and indices
    pub fn status(&self) -> QueueStatus {
        QueueStatus {
            count: self.count,
            capacity: self.capacity(),
            head: self.head,
            tail: self.tail,
        }
    }

    /// Emit the current status as an informational trace
    pub fn log_status(&self) {
        info!("{}", self.status());
    }

    /// Drop every stored item and rewind the indices
    pub fn clear(&mut self) {
        for slot in self.slots.iter_mut() {
            *slot = None;
        }
        self.head = 0;
        self.tail = 0;
        self.count = 0;
    }
}

impl<T> Drop for BoundedQueue<T> {
    fn drop(&mut self) {
        info!("Queue destroyed and memory freed.");
    }
}

impl<T> fmt::Debug for BoundedQueue<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BoundedQueue")
            .field("status", &self.status())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::QueueItem;
    use proptest::prelude::*;
    use std::io;
    use std::sync::{Arc, Mutex};

    #[derive(Clone, Default)]
    struct CapturedLogs(Arc<Mutex<Vec<u8>>>);

    impl io::Write for CapturedLogs {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn test_lifecycle_is_traced() {
        let logs = CapturedLogs::default();
        let writer = logs.clone();
        let subscriber = tracing_subscriber::fmt()
            .with_writer(move || writer.clone())
            .with_ansi(false)
            .finish();

        tracing::subscriber::with_default(subscriber, || {
            let queue = BoundedQueue::<u8>::with_default_capacity();
            assert_eq!(queue.capacity(), DEFAULT_CAPACITY);
            drop(queue);
        });

        let text = String::from_utf8(logs.0.lock().unwrap().clone()).unwrap();
        assert!(text.contains("Queue initialized with capacity 10"));
        assert!(text.contains("Queue destroyed and memory freed."));
    }

    #[test]
    fn test_zero_capacity_rejected() {
        assert!(matches!(
            BoundedQueue::<u32>::new(0),
            Err(QueueError::ZeroCapacity)
        ));
    }

    #[test]
    fn test_fifo_order() {
        let mut queue = BoundedQueue::new(4).unwrap();
        for i in 0..3 {
            queue.enqueue(i).unwrap();
        }

        assert_eq!(queue.peek(), Some(&0));
        assert_eq!(queue.dequeue().unwrap(), 0);
        assert_eq!(queue.dequeue().unwrap(), 1);
        assert_eq!(queue.dequeue().unwrap(), 2);
        assert!(queue.is_empty());
    }

    #[test]
    fn test_dequeue_empty() {
        let mut queue = BoundedQueue::<QueueItem>::new(2).unwrap();
        assert!(matches!(queue.dequeue(), Err(QueueError::Empty)));
        assert_eq!(queue.status().head, 0);
    }

    #[test]
    fn test_full_rejects_and_keeps_state() {
        let mut queue = BoundedQueue::new(2).unwrap();
        queue.enqueue("a").unwrap();
        queue.enqueue("b").unwrap();

        let before = queue.status();
        assert!(matches!(
            queue.enqueue("c"),
            Err(QueueError::Full { capacity: 2 })
        ));
        assert_eq!(queue.status(), before);
        assert_eq!(queue.dequeue().unwrap(), "a");
    }

    #[test]
    fn test_wraparound_indices() {
        let mut queue = BoundedQueue::new(3).unwrap();
        for round in 0..5 {
            queue.enqueue(round).unwrap();
            queue.enqueue(round + 100).unwrap();
            assert_eq!(queue.dequeue().unwrap(), round);
            assert_eq!(queue.dequeue().unwrap(), round + 100);

            let status = queue.status();
            assert!(status.head < 3 && status.tail < 3);
            assert_eq!(status.head, status.tail);
        }
    }

    #[test]
    fn test_status_display() {
        let mut queue = BoundedQueue::new(10).unwrap();
        queue.enqueue(QueueItem::new(b"SampleData").unwrap()).unwrap();

        assert_eq!(
            queue.status().to_string(),
            "Queue Status -> Count: 1 / 10 | Head: 0 | Tail: 1"
        );
    }

    #[test]
    fn test_iter_oldest_first_after_wrap() {
        let mut queue = BoundedQueue::new(3).unwrap();
        queue.enqueue(1).unwrap();
        queue.enqueue(2).unwrap();
        queue.dequeue().unwrap();
        queue.enqueue(3).unwrap();
        queue.enqueue(4).unwrap();

        let items: Vec<_> = queue.iter().copied().collect();
        assert_eq!(items, vec![2, 3, 4]);
    }

    #[test]
    fn test_clear() {
        let mut queue = BoundedQueue::new(2).unwrap();
        queue.enqueue(7).unwrap();
        queue.clear();
        assert!(queue.is_empty());
        assert_eq!(queue.status().tail, 0);
    }

    #[test]
    fn test_default_capacity() {
        let queue = BoundedQueue::<QueueItem>::with_default_capacity();
        assert_eq!(queue.capacity(), DEFAULT_CAPACITY);
        assert!(queue.is_empty());
    }

    proptest! {
        #[test]
        fn prop_capacity_is_hard_limit(capacity in 1usize..64) {
            let mut queue = BoundedQueue::new(capacity).unwrap();
            for i in 0..capacity {
                prop_assert!(queue.enqueue(i).is_ok());
            }
            prop_assert!(queue.is_full());
            let rejected = matches!(queue.enqueue(capacity), Err(QueueError::Full { .. }));
            prop_assert!(rejected);

            for i in 0..capacity {
                prop_assert_eq!(queue.dequeue().unwrap(), i);
            }
            prop_assert!(queue.is_empty());
        }
    }
}
