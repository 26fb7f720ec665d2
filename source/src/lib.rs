//! A buffered source of pseudo-random numbers for concurrent programs.
//!
//! Bufrand decouples the inherently sequential act of advancing a PRNG from
//! the parallel act of consuming its output. A [`BufferedSource`] owns a
//! deterministic generator and a bounded FIFO buffer; a single background
//! "filler" thread advances the generator and keeps the buffer topped up,
//! and any number of threads draw pre-generated values out of the buffer.
//! Ordinary draws never contend on a user-visible lock; they only wait when
//! the buffer is empty, which is backpressure rather than contention.
//!
//! This is most useful when random numbers are needed across a lot of
//! concurrently running threads. For a single thread or a small handful,
//! using a generator such as [`Xorshift64Star`] directly is the better
//! choice.
//!
//! ## Behavior
//!
//! - **Single producer**: exactly one filler thread per source ever touches
//!   the generator, so its state mutates without any locking.
//! - **Destructive FIFO delivery**: every generated value is handed to
//!   exactly one draw call, in the exact order the generator produced it.
//!   Which *thread* receives a given value under concurrent draws depends on
//!   scheduling and is unspecified.
//! - **Deterministic under a single consumer**: one thread drawing from a
//!   source seeded with `S` sees the identical sequence as calling the raw
//!   generator seeded with `S` directly.
//! - **Bounded lookahead**: with capacity `C`, the filler runs at most `C`
//!   values ahead of the slowest draw, then suspends until a slot frees up.
//!
//! # Examples
//!
//! Drawing from several threads through a shared reference:
//!
//! ```
//! use bufrand::BufferedSource;
//!
//! let source = BufferedSource::new(42);
//!
//! std::thread::scope(|s| {
//!   for _ in 0..4 {
//!     s.spawn(|| {
//!       for _ in 0..100 {
//!         assert!(source.next_i63() >= 0);
//!       }
//!     });
//!   }
//! });
//! ```

pub mod rng;
pub mod source;
pub mod telemetry;

// Internal plumbing - the buffer's synchronization is not part of the public API.
mod buffer;
mod error;

pub use rng::Xorshift64Star;
pub use source::{BufferedSource, DEFAULT_BUFFER_SIZE};
