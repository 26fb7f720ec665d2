// src/source.rs

//! The buffered source and its background filler thread.

use crate::buffer::{self, Receiver, Sender};
use crate::error::RecvError;
use crate::rng::Xorshift64Star;

use std::fmt;
use std::thread;

/// Buffer capacity used by [`BufferedSource::new`].
pub const DEFAULT_BUFFER_SIZE: usize = 500;

/// A source of pseudo-random numbers that any number of threads can draw
/// from concurrently, without locking.
///
/// Construction seeds a private [`Xorshift64Star`] and hands it to a single
/// background filler thread, which keeps a bounded FIFO buffer of
/// pre-generated values topped up. [`next_i63`](BufferedSource::next_i63)
/// pops from that buffer, waiting only when it is empty. The filler is the
/// only thread that ever touches the generator, which is what makes the
/// generator's state safe to mutate without a lock.
///
/// The filler is never joined. It runs until the source is dropped; the
/// drop disconnects the buffer's read end, the filler's next push fails,
/// and the thread exits on its own.
///
/// Changing the seed after construction is not supported - see
/// [`reseed`](BufferedSource::reseed).
///
/// # Examples
///
/// A single consumer sees exactly the raw generator's sequence:
///
/// ```
/// use bufrand::{BufferedSource, Xorshift64Star};
///
/// let source = BufferedSource::new(7);
/// let mut reference = Xorshift64Star::new(7);
/// for _ in 0..10 {
///   assert_eq!(source.next_i63(), reference.next_i63());
/// }
/// ```
pub struct BufferedSource {
  receiver: Receiver<i64>,
}

impl BufferedSource {
  /// Creates a source with the default buffer capacity of
  /// [`DEFAULT_BUFFER_SIZE`] values.
  pub fn new(seed: i64) -> Self {
    Self::with_capacity(seed, DEFAULT_BUFFER_SIZE)
  }

  /// Creates a source with an explicit buffer capacity.
  ///
  /// The capacity is fixed for the source's lifetime. It bounds how far the
  /// filler can run ahead of the slowest consumer: once `capacity` undrawn
  /// values are buffered, the filler suspends until a draw frees a slot.
  ///
  /// # Panics
  ///
  /// Panics if `capacity` is zero.
  pub fn with_capacity(seed: i64, capacity: usize) -> Self {
    let (tx, rx) = buffer::bounded(capacity);

    thread::Builder::new()
      .name("bufrand-filler".into())
      .spawn(move || run_filler(tx, Xorshift64Star::new(seed)))
      .expect("failed to spawn filler thread");

    BufferedSource { receiver: rx }
  }

  /// Returns the next 63-bit non-negative value, in the exact order the
  /// underlying generator produced it.
  ///
  /// Callable concurrently from any number of threads with no external
  /// synchronization. Each buffered value is consumed by exactly one call;
  /// if the buffer is empty, the calling thread suspends until the filler
  /// catches up. There is no timeout and no way to cancel the wait.
  pub fn next_i63(&self) -> i64 {
    match self.receiver.recv() {
      Ok(value) => value,
      // The filler only exits once this receiver has been dropped, so a
      // disconnect cannot be observed while `self` is alive.
      Err(RecvError::Disconnected) => {
        unreachable!("filler thread exited while the source is alive")
      }
    }
  }

  /// Unsupported. Always panics.
  ///
  /// The filler captured its own generator at construction and mutates it
  /// continuously; swapping that state from outside would need exactly the
  /// locking this design exists to avoid. Calling this is a programming
  /// error and fails fatally rather than silently doing nothing.
  ///
  /// # Panics
  ///
  /// Always.
  pub fn reseed(&self, _seed: i64) {
    panic!("reseeding a BufferedSource is not supported");
  }

  /// Returns the number of pre-generated values currently buffered.
  pub fn len(&self) -> usize {
    self.receiver.len()
  }

  /// Returns `true` if no pre-generated values are buffered right now.
  pub fn is_empty(&self) -> bool {
    self.receiver.is_empty()
  }

  /// Returns `true` if the buffer is full, i.e. the filler is suspended.
  pub fn is_full(&self) -> bool {
    self.receiver.is_full()
  }

  /// Returns the buffer capacity chosen at construction.
  pub fn capacity(&self) -> usize {
    self.receiver.capacity()
  }
}

impl fmt::Debug for BufferedSource {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.debug_struct("BufferedSource")
      .field("len", &self.len())
      .field("capacity", &self.capacity())
      .finish()
  }
}

/// The filler loop: advance the generator, push, repeat. The push suspends
/// while the buffer is full and fails once the source has been dropped,
/// which is the thread's only exit.
fn run_filler(tx: Sender<i64>, mut rng: Xorshift64Star) {
  while tx.send(rng.next_i63()).is_ok() {}
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn source_is_send_and_sync() {
    fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<BufferedSource>();
  }

  #[test]
  fn default_capacity_is_500() {
    let source = BufferedSource::new(42);
    assert_eq!(source.capacity(), DEFAULT_BUFFER_SIZE);
    assert_eq!(source.capacity(), 500);
  }
}
