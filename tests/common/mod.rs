//! Shared test utilities for the timing suites.

#![allow(dead_code, unused_imports)]

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use parking_lot::Mutex;

/// Shorthand for the millisecond durations the timing tests live in.
pub fn ms(n: u64) -> Duration {
    Duration::from_millis(n)
}

/// Shared invocation counter for scheduled actions.
#[derive(Clone, Default)]
pub struct Counter(Arc<AtomicUsize>);

impl Counter {
    pub fn new() -> Self {
        Self::default()
    }

    /// An action that bumps the counter each time it runs.
    pub fn bump(&self) -> impl FnMut() + Send + 'static {
        let hits = Arc::clone(&self.0);
        move || {
            hits.fetch_add(1, Ordering::SeqCst);
        }
    }

    pub fn get(&self) -> usize {
        self.0.load(Ordering::SeqCst)
    }
}

/// Records which labelled actions ran, in order.
#[derive(Clone, Default)]
pub struct Recorder(Arc<Mutex<Vec<&'static str>>>);

impl Recorder {
    pub fn new() -> Self {
        Self::default()
    }

    /// An action that appends `label` to the log each time it runs.
    pub fn mark(&self, label: &'static str) -> impl FnMut() + Send + 'static {
        let log = self.clone();
        move || log.record(label)
    }

    pub fn record(&self, label: &'static str) {
        self.0.lock().push(label);
    }

    pub fn taken(&self) -> Vec<&'static str> {
        self.0.lock().clone()
    }
}
