// Bounded blocking FIFO queue (monitor: one lock + two conditions)
//
// Hands items from one producer thread to one consumer thread. `put` blocks
// while the buffer is full, `get` blocks while it is empty. Every state change
// is signalled on the matching condition while the lock is still held, so a
// waiter can never miss the transition it is waiting for.

use crate::error::{PutTimeoutError, QueueError, TryPutError};
use crate::trace::{trace, warn};
use crate::HandoffQueue;
use parking_lot::{Condvar, Mutex};
use std::{
   collections::VecDeque,
   fmt,
   time::{Duration, Instant},
};

/*──────────────────────────────────────────────────────────────────────────*/
/*  Monitor state                                                           */
/*──────────────────────────────────────────────────────────────────────────*/

/// Capacity-limited FIFO with blocking `put` / `get`.
///
/// Built for exactly one producer and one consumer. It stays *safe* with
/// more of either (all access goes through the same lock), but then only
/// the multiset of items is preserved: there is no global FIFO or fairness
/// guarantee across producers, and each consumer needs its own
/// end-of-stream marker.
pub struct BoundedQueue<T> {
   capacity : usize,
   buf      : Mutex<VecDeque<T>>, // 0 ≤ len ≤ capacity outside the lock
   not_full : Condvar,            // signalled after every removal
   not_empty: Condvar,            // signalled after every insertion
}

impl<T> BoundedQueue<T> {
   /// Build an empty queue holding at most `capacity` items.
   ///
   /// # Errors
   /// [`QueueError::InvalidCapacity`] when `capacity == 0`.
   pub fn new(capacity: usize) -> Result<Self, QueueError> {
      if capacity == 0 {
         warn!(capacity, "rejecting zero-capacity queue");
         return Err(QueueError::InvalidCapacity { capacity });
      }

      Ok(Self {
         capacity,
         buf      : Mutex::new(VecDeque::with_capacity(capacity)),
         not_full : Condvar::new(),
         not_empty: Condvar::new(),
      })
   }

   #[inline]
   pub fn capacity(&self) -> usize {
      self.capacity
   }
}

/*──────────────────────────── blocking operations ─────────────────────────*/

impl<T> BoundedQueue<T> {
   /// Append `item` at the tail, waiting for room while the queue is full.
   ///
   /// Never fails; blocks forever if nobody drains the queue.
   pub fn put(&self, item: T) {
      let mut buf = self.buf.lock();

      // loop: a wake-up is only a hint that there *may* be room
      while buf.len() == self.capacity {
         self.not_full.wait(&mut buf);
      }

      self.push_locked(&mut buf, item);
   }

   /// Remove and return the head, waiting while the queue is empty.
   ///
   /// Blocks forever if nobody feeds the queue.
   pub fn get(&self) -> T {
      let mut buf = self.buf.lock();

      while buf.is_empty() {
         self.not_empty.wait(&mut buf);
      }

      self.pop_locked(&mut buf)
   }

   /// Number of buffered items at the instant the lock was held.
   ///
   /// Concurrent `put`/`get` calls may have changed it by the time the
   /// caller looks at the value; it is always within `0..=capacity`.
   pub fn size(&self) -> usize {
      self.buf.lock().len()
   }

   pub fn is_empty(&self) -> bool {
      self.size() == 0
   }

   pub fn is_full(&self) -> bool {
      self.size() == self.capacity
   }
}

/*──────────────────────────── bounded-wait variants ───────────────────────*/

impl<T> BoundedQueue<T> {
   /// Like [`put`](Self::put) but gives up after `timeout`.
   ///
   /// # Errors
   /// On expiry the queue is unchanged and the item comes back inside
   /// [`PutTimeoutError`].
   pub fn put_timeout(&self, item: T, timeout: Duration) -> Result<(), PutTimeoutError<T>> {
      let Some(deadline) = Instant::now().checked_add(timeout) else {
         // too far out to represent: same as waiting forever
         self.put(item);
         return Ok(());
      };

      let mut buf = self.buf.lock();
      while buf.len() == self.capacity {
         // a spurious wake re-waits against the same deadline
         if self.not_full.wait_until(&mut buf, deadline).timed_out()
            && buf.len() == self.capacity
         {
            trace!(?timeout, "put timed out");
            return Err(PutTimeoutError(item));
         }
      }

      self.push_locked(&mut buf, item);
      Ok(())
   }

   /// Like [`get`](Self::get) but gives up after `timeout`.
   ///
   /// # Errors
   /// [`QueueError::Timeout`] on expiry; nothing is removed.
   pub fn get_timeout(&self, timeout: Duration) -> Result<T, QueueError> {
      let Some(deadline) = Instant::now().checked_add(timeout) else {
         return Ok(self.get());
      };

      let mut buf = self.buf.lock();
      while buf.is_empty() {
         if self.not_empty.wait_until(&mut buf, deadline).timed_out() && buf.is_empty() {
            trace!(?timeout, "get timed out");
            return Err(QueueError::Timeout { waited: timeout });
         }
      }

      Ok(self.pop_locked(&mut buf))
   }

   /// Insert without waiting.
   ///
   /// # Errors
   /// [`TryPutError::Full`] with the item when there is no room.
   pub fn try_put(&self, item: T) -> Result<(), TryPutError<T>> {
      let mut buf = self.buf.lock();
      if buf.len() == self.capacity {
         return Err(TryPutError::Full(item));
      }
      self.push_locked(&mut buf, item);
      Ok(())
   }

   /// Remove the head without waiting; `None` when empty.
   pub fn try_get(&self) -> Option<T> {
      let mut buf = self.buf.lock();
      if buf.is_empty() {
         return None;
      }
      Some(self.pop_locked(&mut buf))
   }
}

/*──────────────────────────── lock-held helpers ───────────────────────────*/

impl<T> BoundedQueue<T> {
   // caller holds the lock and has seen len < capacity
   #[inline]
   fn push_locked(&self, buf: &mut VecDeque<T>, item: T) {
      debug_assert!(buf.len() < self.capacity);
      buf.push_back(item);
      trace!(size = buf.len(), "put");
      // notify before the guard drops: no lost wake-up
      self.not_empty.notify_one();
   }

   // caller holds the lock and has seen len > 0
   #[inline]
   fn pop_locked(&self, buf: &mut VecDeque<T>) -> T {
      let Some(item) = buf.pop_front() else {
         unreachable!("pop_locked called on an empty buffer");
      };
      trace!(size = buf.len(), "get");
      self.not_full.notify_one();
      item
   }
}

/*──────────────────────────────────────────────────────────────────────────*/

impl<T: Send> HandoffQueue<T> for BoundedQueue<T> {
   #[inline]
   fn put(&self, item: T) {
      BoundedQueue::put(self, item)
   }

   #[inline]
   fn get(&self) -> T {
      BoundedQueue::get(self)
   }

   #[inline]
   fn size(&self) -> usize {
      BoundedQueue::size(self)
   }

   #[inline]
   fn capacity(&self) -> usize {
      self.capacity
   }
}

impl<T> fmt::Debug for BoundedQueue<T> {
   fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
      f.debug_struct("BoundedQueue")
       .field("capacity", &self.capacity)
       .field("size", &self.size())
       .finish()
   }
}
