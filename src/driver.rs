//! Producer and consumer drivers.
//!
//! Both sides share one queue through an `Arc` and talk in [`Message`]s:
//! the producer sends every source item followed by a single
//! [`Message::EndOfStream`], the consumer collects items until it sees that
//! marker. Neither driver may be run concurrently with itself.

use crate::message::Message;
use crate::trace::debug;
use crate::HandoffQueue;
use std::io;
use std::sync::Arc;
use std::thread::{self, JoinHandle};

pub const PRODUCER_THREAD: &str = "producer";
pub const CONSUMER_THREAD: &str = "consumer";

/// Feeds a finite source into a queue, then closes the stream.
pub struct Producer<I, Q: ?Sized> {
    source: I,
    queue: Arc<Q>,
    name: String,
}

impl<I, Q> Producer<I, Q>
where
    I: IntoIterator,
    I::Item: Send,
    Q: HandoffQueue<Message<I::Item>> + ?Sized,
{
    pub fn new(source: I, queue: Arc<Q>) -> Self {
        Self {
            source,
            queue,
            name: PRODUCER_THREAD.to_owned(),
        }
    }

    /// Thread name used by [`spawn`](Self::spawn) and in log output.
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Put every source item in order, then exactly one end-of-stream
    /// marker. Returns the number of payload items sent.
    pub fn run(self) -> usize {
        debug!(producer = %self.name, "started");

        let mut sent = 0;
        for item in self.source {
            self.queue.put(Message::Item(item));
            sent += 1;
        }
        self.queue.put(Message::EndOfStream);

        debug!(producer = %self.name, sent, "finished");
        sent
    }

    /// Run on a dedicated, named OS thread.
    pub fn spawn(self) -> io::Result<JoinHandle<usize>>
    where
        I: Send + 'static,
        Q: 'static,
    {
        thread::Builder::new()
            .name(self.name.clone())
            .spawn(move || self.run())
    }
}

/// Drains a queue until the end-of-stream marker.
pub struct Consumer<Q: ?Sized> {
    queue: Arc<Q>,
    name: String,
}

impl<Q: ?Sized> Consumer<Q> {
    pub fn new(queue: Arc<Q>) -> Self {
        Self {
            queue,
            name: CONSUMER_THREAD.to_owned(),
        }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Collect items in the order received; the marker is never included.
    pub fn run<T>(&self) -> Vec<T>
    where
        T: Send,
        Q: HandoffQueue<Message<T>>,
    {
        let mut dest = Vec::new();
        self.run_into(&mut dest);
        dest
    }

    /// Append received items to `dest`, stopping at the first marker.
    /// Returns how many items were appended.
    pub fn run_into<T, E>(&self, dest: &mut E) -> usize
    where
        T: Send,
        Q: HandoffQueue<Message<T>>,
        E: Extend<T>,
    {
        debug!(consumer = %self.name, "started");

        let mut received = 0;
        while let Message::Item(item) = self.queue.get() {
            dest.extend(Some(item));
            received += 1;
        }

        debug!(consumer = %self.name, received, "finished");
        received
    }

    pub fn spawn<T>(self) -> io::Result<JoinHandle<Vec<T>>>
    where
        T: Send + 'static,
        Q: HandoffQueue<Message<T>> + 'static,
    {
        thread::Builder::new()
            .name(self.name.clone())
            .spawn(move || self.run())
    }
}
