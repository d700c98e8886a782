// In-band end-of-stream marker.

/// What travels through a queue shared by the [`Producer`](crate::Producer)
/// and [`Consumer`](crate::Consumer) drivers.
///
/// The consumer stops on the first `EndOfStream` it receives. With several
/// consumers on one queue, enqueue one marker per consumer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Message<T> {
    Item(T),
    EndOfStream,
}

impl<T> Message<T> {
    #[inline]
    pub fn is_end_of_stream(&self) -> bool {
        matches!(self, Message::EndOfStream)
    }

    /// `Some(payload)` for an item, `None` for the marker.
    #[inline]
    pub fn into_item(self) -> Option<T> {
        match self {
            Message::Item(v) => Some(v),
            Message::EndOfStream => None,
        }
    }
}

impl<T> From<T> for Message<T> {
    fn from(item: T) -> Self {
        Message::Item(item)
    }
}
