// blocking_queues/tests/unit_test.rs

use blocking_queues::{BoundedQueue, PutTimeoutError, QueueError, TryPutError};

use crossbeam::channel;
use std::sync::Arc;
use std::thread;
use std::time::Duration;

const STILL_BLOCKED: Duration = Duration::from_millis(100);
const WAKE_WITHIN: Duration = Duration::from_secs(1);


#[test]
fn test_new_rejects_zero_capacity() {
   match BoundedQueue::<i32>::new(0) {
      Err(QueueError::InvalidCapacity { capacity }) => assert_eq!(capacity, 0),
      other => panic!("expected InvalidCapacity, got {:?}", other),
   }
}

#[test]
fn test_new_accepts_positive_capacity() {
   for cap in [1usize, 2, 3, 10, 1024] {
      let q = BoundedQueue::<i32>::new(cap).unwrap();
      assert_eq!(q.capacity(), cap);
      assert_eq!(q.size(), 0);
      assert!(q.is_empty());
   }
}

#[test]
fn test_invalid_capacity_message() {
   let err = BoundedQueue::<u8>::new(0).unwrap_err();
   assert_eq!(err.to_string(), "capacity must be greater than 0, got 0");
}

// ---------- FIFO behaviour ----------

#[test]
fn test_put_get_fifo_single_thread() {
   let q = BoundedQueue::new(3).unwrap();
   let items = [1, 2, 3];

   for item in items {
      q.put(item);
   }
   assert_eq!(q.size(), 3);

   let result = [q.get(), q.get(), q.get()];
   assert_eq!(result, items);
   assert_eq!(q.size(), 0);
}

#[test]
fn test_size_tracks_puts_and_gets() {
   let q = BoundedQueue::new(5).unwrap();
   q.put(10);
   q.put(20);
   assert_eq!(q.size(), 2);

   assert_eq!(q.get(), 10);
   assert_eq!(q.size(), 1);
}

#[test]
fn test_boundary_exact_capacity() {
   let q = BoundedQueue::new(3).unwrap();
   q.put("a");
   q.put("b");
   q.put("c");

   assert_eq!(q.size(), 3);
   assert!(q.is_full());

   assert_eq!(q.get(), "a");
   assert!(!q.is_full());
   assert_eq!(q.get(), "b");
   assert_eq!(q.get(), "c");
   assert!(q.is_empty());
}

#[test]
fn test_fifo_survives_wraparound() {
   // interleave so the ring index wraps several times
   let q = BoundedQueue::new(4).unwrap();
   let mut next_in = 0;
   let mut next_out = 0;

   for _ in 0..25 {
      while q.size() < 3 {
         q.put(next_in);
         next_in += 1;
      }
      for _ in 0..2 {
         assert_eq!(q.get(), next_out);
         next_out += 1;
      }
   }
   while !q.is_empty() {
      assert_eq!(q.get(), next_out);
      next_out += 1;
   }
   assert_eq!(next_in, next_out);
}

#[test]
fn test_items_are_moved_not_cloned() {
   // the same allocation comes back out
   let q = BoundedQueue::new(2).unwrap();
   let payload = Box::new(vec![1u8, 2, 3]);
   let addr = &*payload as *const Vec<u8>;

   q.put(payload);
   let back = q.get();
   assert_eq!(&*back as *const Vec<u8>, addr);
}

// ---------- blocking behaviour ----------

#[test]
fn test_get_blocks_until_item_available() {
   let q = Arc::new(BoundedQueue::new(1).unwrap());
   let (done_tx, done_rx) = channel::bounded(1);

   let q_consumer = q.clone();
   let consumer = thread::spawn(move || {
      let item = q_consumer.get();
      done_tx.send(item).unwrap();
   });

   assert!(
      done_rx.recv_timeout(STILL_BLOCKED).is_err(),
      "consumer should be blocked on an empty queue"
   );

   q.put(99);

   assert_eq!(done_rx.recv_timeout(WAKE_WITHIN), Ok(99));
   consumer.join().unwrap();
   assert_eq!(q.size(), 0);
}

#[test]
fn test_put_blocks_when_queue_full() {
   let q = Arc::new(BoundedQueue::new(1).unwrap());
   q.put("A");

   let (done_tx, done_rx) = channel::bounded(1);
   let q_producer = q.clone();
   let producer = thread::spawn(move || {
      q_producer.put("B");
      done_tx.send(()).unwrap();
   });

   assert!(
      done_rx.recv_timeout(STILL_BLOCKED).is_err(),
      "producer should be blocked on a full queue"
   );
   assert_eq!(q.size(), 1, "blocked put must not grow the queue");

   assert_eq!(q.get(), "A");

   assert!(done_rx.recv_timeout(WAKE_WITHIN).is_ok());
   assert_eq!(q.get(), "B");
   producer.join().unwrap();
}

#[test]
fn test_spsc_sequential_order_with_blocking() {
   let q = Arc::new(BoundedQueue::<i32>::new(2).unwrap());
   let q_producer = q.clone();
   let q_consumer = q.clone();
   let num_items = 500;

   let producer_thread = thread::spawn(move || {
      for i in 0..num_items {
         q_producer.put(i);
         if i % 50 == 0 {
            thread::yield_now();
         }
      }
   });

   let consumer_thread = thread::spawn(move || {
      for i in 0..num_items {
         assert_eq!(q_consumer.get(), i);
         if i % 70 == 0 {
            thread::sleep(Duration::from_millis(1));
         }
      }
   });

   producer_thread.join().unwrap();
   consumer_thread.join().unwrap();
   assert!(q.is_empty());
}

// ---------- bounded waits ----------

#[test]
fn test_get_timeout_on_empty_queue() {
   let q = BoundedQueue::<i32>::new(2).unwrap();
   let waited = Duration::from_millis(30);

   assert_eq!(q.get_timeout(waited), Err(QueueError::Timeout { waited }));
   assert_eq!(q.size(), 0);
}

#[test]
fn test_put_timeout_returns_item_and_leaves_queue_unchanged() {
   let q = BoundedQueue::new(1).unwrap();
   q.put(String::from("A"));

   let err = q
      .put_timeout(String::from("B"), Duration::from_millis(30))
      .unwrap_err();
   assert_eq!(err, PutTimeoutError(String::from("B")));
   assert_eq!(err.into_inner(), "B");

   assert_eq!(q.size(), 1);
   assert_eq!(q.get(), "A");
}

#[test]
fn test_get_timeout_succeeds_when_item_arrives_in_time() {
   let q = Arc::new(BoundedQueue::new(1).unwrap());
   let q_producer = q.clone();

   let producer = thread::spawn(move || {
      thread::sleep(Duration::from_millis(20));
      q_producer.put(7u64);
   });

   assert_eq!(q.get_timeout(Duration::from_secs(5)), Ok(7));
   producer.join().unwrap();
}

#[test]
fn test_put_timeout_succeeds_when_space_frees_in_time() {
   let q = Arc::new(BoundedQueue::new(1).unwrap());
   q.put(1);
   let q_consumer = q.clone();

   let consumer = thread::spawn(move || {
      thread::sleep(Duration::from_millis(20));
      q_consumer.get()
   });

   assert!(q.put_timeout(2, Duration::from_secs(5)).is_ok());
   assert_eq!(consumer.join().unwrap(), 1);
   assert_eq!(q.get(), 2);
}

#[test]
fn test_unrepresentable_timeout_waits_like_blocking_call() {
   let q = BoundedQueue::new(1).unwrap();
   assert!(q.put_timeout(5, Duration::MAX).is_ok());
   assert_eq!(q.get_timeout(Duration::MAX), Ok(5));
}

#[test]
fn test_zero_timeout_is_an_immediate_probe() {
   let q = BoundedQueue::new(1).unwrap();
   assert!(q.get_timeout(Duration::ZERO).is_err());
   assert!(q.put_timeout('x', Duration::ZERO).is_ok());
   assert!(q.put_timeout('y', Duration::ZERO).is_err());
   assert_eq!(q.get_timeout(Duration::ZERO), Ok('x'));
}

// ---------- non-blocking probes ----------

#[test]
fn test_try_put_and_try_get() {
   let q = BoundedQueue::new(2).unwrap();

   assert_eq!(q.try_get(), None);
   assert!(q.try_put(1).is_ok());
   assert!(q.try_put(2).is_ok());

   match q.try_put(3) {
      Err(TryPutError::Full(v)) => assert_eq!(v, 3),
      Ok(()) => panic!("queue with capacity 2 accepted a third item"),
   }
   assert_eq!(q.size(), 2);

   assert_eq!(q.try_get(), Some(1));
   assert_eq!(q.try_get(), Some(2));
   assert_eq!(q.try_get(), None);
}

#[test]
fn test_try_get_wakes_blocked_producer() {
   let q = Arc::new(BoundedQueue::new(1).unwrap());
   q.put(0);

   let (done_tx, done_rx) = channel::bounded(1);
   let q_producer = q.clone();
   let producer = thread::spawn(move || {
      q_producer.put(1);
      done_tx.send(()).unwrap();
   });

   assert!(done_rx.recv_timeout(STILL_BLOCKED).is_err());
   assert_eq!(q.try_get(), Some(0));
   assert!(done_rx.recv_timeout(WAKE_WITHIN).is_ok());
   producer.join().unwrap();
   assert_eq!(q.try_get(), Some(1));
}

#[test]
fn test_debug_shows_capacity_and_size() {
   struct Opaque;
   let q = BoundedQueue::new(4).unwrap();
   q.put(Opaque);
   assert_eq!(format!("{:?}", q), "BoundedQueue { capacity: 4, size: 1 }");
}
