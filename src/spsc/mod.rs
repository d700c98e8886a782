mod bounded;

pub use bounded::BoundedQueue;
