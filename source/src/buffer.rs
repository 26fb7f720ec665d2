// src/buffer.rs

//! The bounded, blocking buffer between the filler thread and draw calls.
//!
//! This is a single-producer, multi-consumer work queue: one writer pushes
//! values in, any number of readers compete to pop them out, and every value
//! is delivered to exactly one reader. Both handles are usable from many
//! threads through a shared reference; all state lives behind one
//! `parking_lot::Mutex`.
//!
//! ## Behavior
//!
//! - **FIFO**: values leave in exactly the order they entered.
//! - **Blocking with backpressure**: `send` suspends while the buffer is
//!   full, `recv` suspends while it is empty. Suspension is an adaptive
//!   spin, then yield, then park; a waiter is woken through a done-flag
//!   handshake so a `park` that races a wake-up cannot be lost.
//! - **Drop-driven disconnect**: dropping the `Receiver` makes every later
//!   `send` fail with `SendError::Closed`; dropping the `Sender` lets
//!   readers drain what is buffered and then fail with
//!   `RecvError::Disconnected`.

use crate::error::{RecvError, SendError, TryRecvError, TrySendError};
use crate::telemetry;

use parking_lot::Mutex;
use std::collections::VecDeque;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread::{self, Thread};

const LOC_SEND: &str = "Sender::send";
const LOC_RECV: &str = "Receiver::recv";

const EVT_PARK: &str = "Park";
const EVT_UNPARK: &str = "Unparked";

const CTR_PRODUCER_PARKS: &str = "ProducerParkAttempts";
const CTR_CONSUMER_PARKS: &str = "ConsumerParkAttempts";

/// A parked thread waiting for the buffer's state to change.
///
/// The waker first publishes the state change through `done`, then unparks.
/// The waiter loops on `done`, so a spurious unpark or an unpark that lands
/// before the park just falls through to a re-check.
struct SyncWaiter {
  thread: Thread,
  done: Arc<AtomicBool>,
}

impl SyncWaiter {
  fn wake(self) {
    self.done.store(true, Ordering::Release);
    self.thread.unpark();
  }
}

/// Mutex-protected core state.
struct Internal<T> {
  queue: VecDeque<T>,
  /// The single filler thread, when it is parked on a full buffer.
  waiting_producer: Option<SyncWaiter>,
  /// Reader threads parked on an empty buffer, woken oldest-first.
  waiting_consumers: VecDeque<SyncWaiter>,
  producer_alive: bool,
  receiver_alive: bool,
}

struct Shared<T> {
  internal: Mutex<Internal<T>>,
  capacity: usize,
}

/// The write end. Held by exactly one filler thread.
pub(crate) struct Sender<T: Send> {
  shared: Arc<Shared<T>>,
}

/// The read end. One handle, shared by reference across any number of
/// drawing threads.
pub(crate) struct Receiver<T: Send> {
  shared: Arc<Shared<T>>,
}

/// Creates the buffer with a fixed capacity.
///
/// # Panics
///
/// Panics if `capacity` is zero. A rendezvous buffer would serialize every
/// draw against the producer, which is the opposite of what this queue is
/// for.
pub(crate) fn bounded<T: Send>(capacity: usize) -> (Sender<T>, Receiver<T>) {
  assert!(capacity > 0, "buffer capacity must be at least 1");
  let shared = Arc::new(Shared {
    internal: Mutex::new(Internal {
      queue: VecDeque::with_capacity(capacity),
      waiting_producer: None,
      waiting_consumers: VecDeque::new(),
      producer_alive: true,
      receiver_alive: true,
    }),
    capacity,
  });
  (
    Sender {
      shared: Arc::clone(&shared),
    },
    Receiver { shared },
  )
}

/// An adaptive wait: spin briefly, yield for a while, then park until the
/// condition holds. The thread is only unparked by a `SyncWaiter::wake`.
fn adaptive_wait<F>(cond: F)
where
  F: Fn() -> bool,
{
  for _ in 0..12 {
    if cond() {
      return;
    }
    std::hint::spin_loop();
  }

  for _ in 0..24 {
    if cond() {
      return;
    }
    thread::yield_now();
  }

  while !cond() {
    thread::park();
  }
}

impl<T: Send> Sender<T> {
  /// Sends a value, blocking the current thread while the buffer is full.
  ///
  /// Returns `Err(SendError::Closed)` once the `Receiver` has been dropped.
  pub(crate) fn send(&self, value: T) -> Result<(), SendError> {
    let mut pending = Some(value);

    loop {
      let value_to_send = pending
        .take()
        .expect("value must be present at the top of the send loop");

      match self.try_send(value_to_send) {
        Ok(()) => return Ok(()),
        Err(TrySendError::Closed(_)) => return Err(SendError::Closed),
        Err(full) => pending = Some(full.into_inner()),
      }

      let done = Arc::new(AtomicBool::new(false));
      {
        let mut guard = self.shared.internal.lock();

        // Re-check under the lock so a pop that raced ahead of our
        // registration is not missed.
        if guard.queue.len() < self.shared.capacity {
          continue;
        }
        if !guard.receiver_alive {
          return Err(SendError::Closed);
        }

        debug_assert!(
          guard.waiting_producer.is_none(),
          "the buffer has a single producer"
        );
        guard.waiting_producer = Some(SyncWaiter {
          thread: thread::current(),
          done: done.clone(),
        });
      }

      telemetry::increment_counter(LOC_SEND, CTR_PRODUCER_PARKS);
      telemetry::log_event(None, LOC_SEND, EVT_PARK, None);
      adaptive_wait(|| done.load(Ordering::Acquire));
      telemetry::log_event(None, LOC_SEND, EVT_UNPARK, None);
    }
  }

  /// Attempts to send a value without blocking.
  pub(crate) fn try_send(&self, value: T) -> Result<(), TrySendError<T>> {
    let mut guard = self.shared.internal.lock();

    if !guard.receiver_alive {
      return Err(TrySendError::Closed(value));
    }
    if guard.queue.len() >= self.shared.capacity {
      return Err(TrySendError::Full(value));
    }

    guard.queue.push_back(value);
    let waiter = guard.waiting_consumers.pop_front();
    drop(guard);

    // Wake outside the lock.
    if let Some(waiter) = waiter {
      waiter.wake();
    }
    Ok(())
  }
}

impl<T: Send> Drop for Sender<T> {
  fn drop(&mut self) {
    let waiters: Vec<SyncWaiter> = {
      let mut guard = self.shared.internal.lock();
      guard.producer_alive = false;
      guard.waiting_consumers.drain(..).collect()
    };
    for waiter in waiters {
      waiter.wake();
    }
  }
}

impl<T: Send> Receiver<T> {
  /// Receives the next value, blocking the current thread while the buffer
  /// is empty.
  ///
  /// Returns `Err(RecvError::Disconnected)` only after the `Sender` has been
  /// dropped *and* everything it buffered has been drained.
  pub(crate) fn recv(&self) -> Result<T, RecvError> {
    loop {
      match self.try_recv() {
        Ok(value) => return Ok(value),
        Err(TryRecvError::Disconnected) => return Err(RecvError::Disconnected),
        Err(TryRecvError::Empty) => {}
      }

      let done = Arc::new(AtomicBool::new(false));
      {
        let mut guard = self.shared.internal.lock();

        // Re-check under the lock so a push that raced ahead of our
        // registration is not missed.
        if !guard.queue.is_empty() || !guard.producer_alive {
          continue;
        }

        guard.waiting_consumers.push_back(SyncWaiter {
          thread: thread::current(),
          done: done.clone(),
        });
      }

      telemetry::increment_counter(LOC_RECV, CTR_CONSUMER_PARKS);
      telemetry::log_event(None, LOC_RECV, EVT_PARK, None);
      adaptive_wait(|| done.load(Ordering::Acquire));
      telemetry::log_event(None, LOC_RECV, EVT_UNPARK, None);
    }
  }

  /// Attempts to receive a value without blocking.
  pub(crate) fn try_recv(&self) -> Result<T, TryRecvError> {
    let mut guard = self.shared.internal.lock();

    if let Some(value) = guard.queue.pop_front() {
      // A slot just freed up; hand it to the producer if it is parked.
      let waiter = guard.waiting_producer.take();
      drop(guard);
      if let Some(waiter) = waiter {
        waiter.wake();
      }
      return Ok(value);
    }

    if !guard.producer_alive {
      return Err(TryRecvError::Disconnected);
    }
    Err(TryRecvError::Empty)
  }

  /// Returns the number of values currently buffered.
  pub(crate) fn len(&self) -> usize {
    self.shared.internal.lock().queue.len()
  }

  /// Returns `true` if the buffer holds no values.
  pub(crate) fn is_empty(&self) -> bool {
    self.len() == 0
  }

  /// Returns `true` if the buffer holds `capacity` values.
  pub(crate) fn is_full(&self) -> bool {
    self.len() == self.shared.capacity
  }

  /// Returns the fixed capacity of the buffer.
  pub(crate) fn capacity(&self) -> usize {
    self.shared.capacity
  }
}

impl<T: Send> Drop for Receiver<T> {
  fn drop(&mut self) {
    let waiter = {
      let mut guard = self.shared.internal.lock();
      guard.receiver_alive = false;
      guard.waiting_producer.take()
    };
    if let Some(waiter) = waiter {
      waiter.wake();
    }
  }
}
