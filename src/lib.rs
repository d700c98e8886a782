pub mod driver;
pub mod error;
pub mod message;
pub mod session;
pub mod spsc;
pub mod trace;

pub use driver::{Consumer, Producer};
pub use error::{PutTimeoutError, QueueError, SessionError, TryPutError};
pub use message::Message;
pub use session::{run_session, SessionConfig, SessionReport};
pub use spsc::BoundedQueue;
pub use trace::init_tracing;

/// Common interface the producer/consumer drivers are written against.
pub trait HandoffQueue<T: Send>: Send + Sync {
    /// Insert at the tail, blocking while the queue is full.
    fn put(&self, item: T);
    /// Remove from the head, blocking while the queue is empty.
    fn get(&self) -> T;

    /// Point-in-time occupancy; may be stale as soon as it returns.
    fn size(&self) -> usize;
    fn capacity(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.size() == 0
    }
    fn is_full(&self) -> bool {
        self.size() >= self.capacity()
    }
}
