//! Debounce and throttle scheduling primitives for Tokio applications.
//!
//! Interactive programs see bursts: keystrokes while a user types, file
//! notifications while an editor saves, resize events while a window drags.
//! Reacting to every event wastes work; reacting only after the burst ends
//! adds unbounded latency. This crate offers two small schedulers that
//! coalesce bursts of [`run`](Debouncer::run) calls into a controlled
//! execution schedule:
//!
//! - [`Debouncer`]: classic trailing-edge debounce. The action runs once
//!   calls stop arriving for a fixed window, and only the most recent
//!   action survives.
//! - [`BoundedDebouncer`]: the same coalescing plus optional leading-edge
//!   execution and a hard per-burst deadline (`max_wait`), so a
//!   continuously active stream cannot postpone execution forever.
//!
//! Both capture the Tokio runtime handle at construction and run their
//! timers as plain spawned tasks, so `run`, `cancel`, and `flush` may be
//! called from any thread. Actions execute without any internal lock held;
//! an action may safely re-submit to the scheduler that invoked it.
//!
//! ```
//! use std::time::Duration;
//! use quiesce::Debouncer;
//!
//! #[tokio::main(flavor = "current_thread")]
//! async fn main() {
//!     let search = Debouncer::new(Duration::from_millis(50));
//!
//!     // Rapid calls coalesce: only the last query survives the window.
//!     for query in ["r", "ru", "rust"] {
//!         search.run(move || println!("searching for {query}"));
//!     }
//!
//!     tokio::time::sleep(Duration::from_millis(80)).await;
//! }
//! ```

mod bounded;
mod debounce;
mod error;
mod options;
mod timer;

pub use bounded::BoundedDebouncer;
pub use debounce::Debouncer;
pub use error::ConfigError;
pub use options::DebounceOptions;
