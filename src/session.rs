//! One producer/consumer session over a fresh [`BoundedQueue`].

use crate::driver::{Consumer, Producer, CONSUMER_THREAD, PRODUCER_THREAD};
use crate::error::{QueueError, SessionError};
use crate::message::Message;
use crate::spsc::BoundedQueue;
use crate::trace::{debug, warn};
use std::sync::Arc;

/// Queue size used when none is configured.
pub const DEFAULT_CAPACITY: usize = 10;

/// Knobs for [`run_session`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionConfig {
    pub capacity: usize,
    pub producer_name: String,
    pub consumer_name: String,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            capacity: DEFAULT_CAPACITY,
            producer_name: PRODUCER_THREAD.to_owned(),
            consumer_name: CONSUMER_THREAD.to_owned(),
        }
    }
}

impl SessionConfig {
    pub fn with_capacity(mut self, capacity: usize) -> Self {
        self.capacity = capacity;
        self
    }

    pub fn with_thread_names(
        mut self,
        producer: impl Into<String>,
        consumer: impl Into<String>,
    ) -> Self {
        self.producer_name = producer.into();
        self.consumer_name = consumer.into();
        self
    }

    pub fn build_queue<T>(&self) -> Result<BoundedQueue<T>, QueueError> {
        BoundedQueue::new(self.capacity)
    }
}

/// Outcome of a finished session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionReport<T> {
    /// Items in the order the consumer received them.
    pub destination: Vec<T>,
    /// Payload items the producer put (the marker is not counted).
    pub sent: usize,
    /// Queue occupancy after both drivers stopped; `0` on a clean run.
    pub final_size: usize,
}

/// Move `source` through a queue built from `config`, with the producer and
/// consumer on their own scoped threads, and wait for both to finish.
///
/// # Errors
/// - [`SessionError::Queue`] if the configured capacity is invalid.
/// - [`SessionError::Spawn`] if a driver thread could not be started.
/// - [`SessionError::DriverPanicked`] if either driver panicked. A panicking
///   producer still has the marker sent on its behalf so the consumer exits.
pub fn run_session<I>(
    config: &SessionConfig,
    source: I,
) -> Result<SessionReport<I::Item>, SessionError>
where
    I: IntoIterator + Send,
    I::Item: Send,
{
    let queue: Arc<BoundedQueue<Message<I::Item>>> = Arc::new(config.build_queue()?);
    debug!(capacity = config.capacity, "session started");

    let producer = Producer::new(source, Arc::clone(&queue)).with_name(config.producer_name.as_str());
    let consumer = Consumer::new(Arc::clone(&queue)).with_name(config.consumer_name.as_str());

    let outcome = crossbeam::thread::scope(|s| -> Result<(usize, Vec<I::Item>), SessionError> {
        // consumer first: if the producer cannot start we can still
        // release it with a marker
        let consumer_handle = s
            .builder()
            .name(config.consumer_name.clone())
            .spawn(move |_| consumer.run())?;

        let producer_handle = match s
            .builder()
            .name(config.producer_name.clone())
            .spawn(move |_| producer.run())
        {
            Ok(handle) => handle,
            Err(err) => {
                queue.put(Message::EndOfStream);
                return Err(SessionError::Spawn(err));
            }
        };

        let sent = producer_handle.join();
        if sent.is_err() {
            warn!("producer panicked, closing stream on its behalf");
            queue.put(Message::EndOfStream);
        }
        let destination = consumer_handle
            .join()
            .map_err(|_| SessionError::DriverPanicked("consumer"))?;
        let sent = sent.map_err(|_| SessionError::DriverPanicked("producer"))?;

        Ok((sent, destination))
    })
    .map_err(|_| SessionError::DriverPanicked("consumer"))?;

    let (sent, destination) = outcome?;
    let final_size = queue.size();
    debug!(sent, received = destination.len(), final_size, "session finished");

    Ok(SessionReport {
        destination,
        sent,
        final_size,
    })
}
