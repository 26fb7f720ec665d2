// src/error.rs

//! Error types for the internal bounded buffer.
//!
//! These never cross the public API boundary: drawing from a
//! [`BufferedSource`](crate::BufferedSource) cannot fail. They exist so the
//! filler thread can observe the death of the source's read end and exit,
//! and so the buffer's own tests can speak about its edge states.

use core::fmt;

/// Error returned by `try_send` when the value could not be enqueued
/// immediately. The value being sent is returned.
#[derive(PartialEq, Eq, Clone)]
pub(crate) enum TrySendError<T> {
  /// The buffer is full and cannot accept more values at this time.
  Full(T),
  /// The read end has been dropped; nothing will ever drain the buffer.
  Closed(T),
}

impl<T> TrySendError<T> {
  /// Consumes the error, returning the value that failed to send.
  #[inline]
  pub(crate) fn into_inner(self) -> T {
    match self {
      TrySendError::Full(v) => v,
      TrySendError::Closed(v) => v,
    }
  }
}

impl<T> fmt::Debug for TrySendError<T> {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      TrySendError::Full(_) => write!(f, "TrySendError::Full(..)"),
      TrySendError::Closed(_) => write!(f, "TrySendError::Closed(..)"),
    }
  }
}

impl<T> fmt::Display for TrySendError<T> {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      TrySendError::Full(_) => f.write_str("buffer full"),
      TrySendError::Closed(_) => f.write_str("buffer closed"),
    }
  }
}

impl<T: fmt::Debug> std::error::Error for TrySendError<T> {}

/// Error returned by the blocking `send`.
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub(crate) enum SendError {
  /// The read end has been dropped.
  Closed,
}

impl std::error::Error for SendError {}
impl fmt::Display for SendError {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      SendError::Closed => write!(f, "buffer closed"),
    }
  }
}

/// Error returned by `try_recv` when a value could not be dequeued
/// immediately.
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub(crate) enum TryRecvError {
  /// The buffer holds no values right now.
  Empty,
  /// The buffer is empty and the write end has been dropped.
  Disconnected,
}

impl std::error::Error for TryRecvError {}
impl fmt::Display for TryRecvError {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      TryRecvError::Empty => write!(f, "buffer empty"),
      TryRecvError::Disconnected => {
        write!(f, "buffer disconnected (empty and the producer is gone)")
      }
    }
  }
}

/// Error returned by the blocking `recv`.
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub(crate) enum RecvError {
  /// The buffer is empty and the write end has been dropped.
  Disconnected,
}

impl std::error::Error for RecvError {}
impl fmt::Display for RecvError {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      RecvError::Disconnected => {
        write!(f, "buffer disconnected (empty and the producer is gone)")
      }
    }
  }
}
