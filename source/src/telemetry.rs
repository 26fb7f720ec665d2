// src/telemetry.rs

//! Opt-in instrumentation for the buffer's park/wake machinery.
//!
//! Compiled in only with the `bufrand_telemetry` feature; without it every
//! entry point below is an empty `#[inline(always)]` function and the call
//! sites in the buffer cost nothing. Intended for debugging scheduling
//! behavior, not for production metrics.

#[cfg(feature = "bufrand_telemetry")]
pub mod enabled {
  use std::collections::HashMap;
  use std::fmt;
  use std::sync::atomic::{AtomicUsize, Ordering};
  use std::sync::Mutex;
  use std::thread::{self, ThreadId};
  use std::time::Instant;

  static NEXT_EVENT_SEQUENCE_ID: AtomicUsize = AtomicUsize::new(0);

  #[derive(Clone)]
  pub struct TelemetryEvent {
    pub seq_id: usize,
    pub timestamp: Instant,
    pub os_thread_id: ThreadId,
    /// Optional ID for the specific data item involved.
    pub item_id: Option<usize>,
    /// Code location (e.g., `Sender::send`).
    pub location: String,
    /// Event type (e.g., `Park`, `Unparked`).
    pub event_type: String,
    pub message: Option<String>,
  }

  impl fmt::Debug for TelemetryEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
      f.debug_struct("TelemetryEvent")
        .field("seq", &self.seq_id)
        .field("os_tid", &self.os_thread_id)
        .field("item_id", &self.item_id)
        .field("loc", &self.location)
        .field("evt", &self.event_type)
        .field("msg", &self.message.as_deref().unwrap_or(""))
        .finish()
    }
  }

  type CounterKey = (String, String); // (location, counter_name)

  struct CollectorData {
    events: Vec<TelemetryEvent>,
    counters: HashMap<CounterKey, usize>,
    start_time: Instant,
  }

  impl CollectorData {
    fn new() -> Self {
      CollectorData {
        events: Vec::new(),
        counters: HashMap::new(),
        start_time: Instant::now(),
      }
    }
  }

  lazy_static::lazy_static! {
    static ref GLOBAL_COLLECTOR: Mutex<CollectorData> = Mutex::new(CollectorData::new());
  }

  fn record_event_internal(
    item_id: Option<usize>,
    location: &str,
    event_type: &str,
    message: Option<String>,
  ) {
    let event = TelemetryEvent {
      seq_id: NEXT_EVENT_SEQUENCE_ID.fetch_add(1, Ordering::Relaxed),
      timestamp: Instant::now(),
      os_thread_id: thread::current().id(),
      item_id,
      location: location.to_string(),
      event_type: event_type.to_string(),
      message,
    };
    if let Ok(mut collector) = GLOBAL_COLLECTOR.lock() {
      collector.events.push(event);
    } else {
      eprintln!("[TELEMETRY FT-ERROR] Global collector mutex poisoned, event dropped.");
    }
  }

  fn increment_counter_internal(location: &'static str, counter_name: &str) {
    if let Ok(mut collector) = GLOBAL_COLLECTOR.lock() {
      *collector
        .counters
        .entry((location.to_string(), counter_name.to_string()))
        .or_insert(0) += 1;
    } else {
      eprintln!("[TELEMETRY FT-ERROR] Global collector mutex poisoned, counter dropped.");
    }
  }

  fn print_report_internal() {
    if let Ok(collector) = GLOBAL_COLLECTOR.lock() {
      println!("--- bufrand telemetry report ---");
      println!("elapsed: {:?}", collector.start_time.elapsed());
      let mut counters: Vec<_> = collector.counters.iter().collect();
      counters.sort();
      for ((location, counter), count) in counters {
        println!("  {location} / {counter}: {count}");
      }
      println!("events recorded: {}", collector.events.len());
      for event in &collector.events {
        println!("  {event:?}");
      }
      println!("--- end of report ---");
    } else {
      eprintln!("[TELEMETRY FT-ERROR] Global collector mutex poisoned, cannot report.");
    }
  }

  fn clear_data_internal() {
    if let Ok(mut collector) = GLOBAL_COLLECTOR.lock() {
      collector.events.clear();
      collector.counters.clear();
      collector.start_time = Instant::now();
    } else {
      eprintln!("[TELEMETRY FT-ERROR] Global collector mutex poisoned, cannot clear data.");
    }
    NEXT_EVENT_SEQUENCE_ID.store(0, Ordering::Relaxed);
  }

  // --- Public Instrumentation Functions ---

  pub fn log_event_fn(
    item_id: Option<usize>,
    location: &str,
    event_type: &str,
    message: Option<String>,
  ) {
    record_event_internal(item_id, location, event_type, message);
  }

  pub fn increment_counter_fn(location: &'static str, counter_name: &str) {
    increment_counter_internal(location, counter_name);
  }

  pub fn print_telemetry_report_fn() {
    print_report_internal();
  }

  pub fn clear_telemetry_fn() {
    clear_data_internal();
  }

  #[cfg(test)]
  mod tests {
    use super::*;

    #[test]
    fn counters_accumulate() {
      clear_telemetry_fn();
      increment_counter_fn("here", "ticks");
      increment_counter_fn("here", "ticks");
      let collector = GLOBAL_COLLECTOR.lock().unwrap();
      assert_eq!(
        collector.counters[&("here".to_string(), "ticks".to_string())],
        2
      );
    }
  }
}

#[cfg(not(feature = "bufrand_telemetry"))]
pub mod disabled {
  #[inline(always)]
  pub fn log_event_fn(
    _item_id: Option<usize>,
    _location: &'static str,
    _event_type: &'static str,
    _message: Option<String>,
  ) {
  }
  #[inline(always)]
  pub fn increment_counter_fn(_location: &'static str, _counter_name: &'static str) {}
  #[inline(always)]
  pub fn print_telemetry_report_fn() {}
  #[inline(always)]
  pub fn clear_telemetry_fn() {}
}

// Re-export the correct set of functions based on the feature flag
#[cfg(feature = "bufrand_telemetry")]
pub use enabled::{
  clear_telemetry_fn as clear_telemetry, increment_counter_fn as increment_counter,
  log_event_fn as log_event, print_telemetry_report_fn as print_telemetry_report,
};

#[cfg(not(feature = "bufrand_telemetry"))]
pub use disabled::{
  clear_telemetry_fn as clear_telemetry, increment_counter_fn as increment_counter,
  log_event_fn as log_event, print_telemetry_report_fn as print_telemetry_report,
};
