// Error types shared by the queue, the drivers and the session runner.

use std::time::Duration;
use thiserror::Error;

/// Failures reported by [`BoundedQueue`](crate::BoundedQueue) itself.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum QueueError {
   /// Construction was attempted with a capacity of zero.
   #[error("capacity must be greater than 0, got {capacity}")]
   InvalidCapacity { capacity: usize },

   /// A bounded wait in `get_timeout` expired before an item arrived.
   /// The queue is left untouched.
   #[error("timed out after {waited:?} waiting for an item")]
   Timeout { waited: Duration },
}

/// Returned by `put_timeout` when no slot freed up in time.
///
/// The rejected item is handed back so the caller can retry.
#[derive(Debug, PartialEq, Eq, Error)]
#[error("timed out waiting for free space")]
pub struct PutTimeoutError<T>(pub T);

impl<T> PutTimeoutError<T> {
   pub fn into_inner(self) -> T {
      self.0
   }
}

/// Returned by `try_put` when the queue is at capacity.
#[derive(Debug, PartialEq, Eq, Error)]
pub enum TryPutError<T> {
   #[error("queue is full")]
   Full(T),
}

impl<T> TryPutError<T> {
   /// Recover the item that could not be queued.
   pub fn into_inner(self) -> T {
      match self {
         TryPutError::Full(item) => item,
      }
   }
}

/// Failures of a whole producer/consumer session.
#[derive(Debug, Error)]
pub enum SessionError {
   #[error("could not build session queue: {0}")]
   Queue(#[from] QueueError),

   #[error("could not spawn driver thread: {0}")]
   Spawn(#[from] std::io::Error),

   /// A driver thread panicked; the payload names its role.
   #[error("{0} thread panicked")]
   DriverPanicked(&'static str),
}
