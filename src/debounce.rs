//! Basic coalescing timer: classic trailing-edge debounce.
//!
//! Every `run` restarts the delay window; the action executes only once the
//! window elapses without another call, and only the most recently submitted
//! action survives.

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use parking_lot::Mutex;
use tokio::runtime::Handle;

use crate::timer::{Action, TimerSlot};

#[derive(Default)]
struct Inner {
    pending: Option<Action>,
    timer: Option<TimerSlot>,
    /// Monotonic source of timer generations; a wake-up is honored only
    /// while its generation matches the armed slot's.
    generations: u64,
}

/// Delays an action until calls stop arriving for a fixed window.
///
/// For N `run` calls arriving within the window of one another, exactly one
/// execution occurs, using the Nth action; earlier actions are dropped
/// silently. Dropping the debouncer cancels any pending execution.
///
/// # Example
///
/// ```
/// # #[tokio::main(flavor = "current_thread", start_paused = true)]
/// # async fn main() {
/// use std::time::Duration;
/// use quiesce::Debouncer;
///
/// let save = Debouncer::new(Duration::from_millis(100));
/// save.run(|| println!("write settings"));
/// assert!(save.is_active());
/// # }
/// ```
pub struct Debouncer {
    delay: Duration,
    runtime: Handle,
    inner: Arc<Mutex<Inner>>,
}

impl Debouncer {
    /// Create a debouncer with the given quiet window.
    ///
    /// # Panics
    ///
    /// Panics when called outside a Tokio runtime. The constructor captures
    /// the current handle, so `run`/`cancel` may later be called from any
    /// thread, including non-runtime ones.
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            runtime: Handle::current(),
            inner: Arc::new(Mutex::new(Inner::default())),
        }
    }

    /// The configured quiet window.
    pub fn delay(&self) -> Duration {
        self.delay
    }

    /// Record `action` as the pending action and restart the delay window.
    ///
    /// Returns immediately; the action runs on the runtime once the window
    /// elapses undisturbed. A newer `run` supersedes the pending action
    /// without executing it.
    pub fn run(&self, action: impl FnMut() + Send + 'static) {
        let mut inner = self.inner.lock();
        inner.pending = Some(Box::new(action));
        self.restart_timer(&mut inner);
    }

    /// Cancel the delay window and drop the pending action unexecuted.
    ///
    /// Idempotent; cancelling an inactive debouncer is a no-op.
    pub fn cancel(&self) {
        let mut inner = self.inner.lock();
        if let Some(slot) = inner.timer.take() {
            tracing::trace!(generation = slot.generation, "debounce cancelled");
            slot.cancel();
        }
        inner.pending = None;
    }

    /// Identical effect to [`cancel`](Self::cancel); signals the instance is
    /// done.
    ///
    /// Nothing forbids a later `run` from re-arming the instance; dropping
    /// the debouncer is the hard end-of-life and performs the same cleanup.
    pub fn dispose(&self) {
        self.cancel();
    }

    /// Execute the pending action immediately, if any, and resolve the
    /// burst.
    ///
    /// Returns whether an action ran.
    pub fn flush(&self) -> bool {
        let action = {
            let mut inner = self.inner.lock();
            if let Some(slot) = inner.timer.take() {
                slot.cancel();
            }
            inner.pending.take()
        };
        match action {
            Some(mut action) => {
                tracing::debug!("flush firing pending action");
                action();
                true
            }
            None => false,
        }
    }

    /// Whether a delay window is currently armed.
    pub fn is_active(&self) -> bool {
        self.inner.lock().timer.is_some()
    }

    fn restart_timer(&self, inner: &mut Inner) {
        if let Some(slot) = inner.timer.take() {
            slot.cancel();
        }
        inner.generations += 1;
        let generation = inner.generations;
        let state = Arc::clone(&self.inner);
        inner.timer = Some(TimerSlot::arm(
            &self.runtime,
            self.delay,
            generation,
            move || fire_delay(&state, generation),
        ));
        tracing::trace!(
            delay_ms = self.delay.as_millis() as u64,
            generation,
            "delay window armed"
        );
    }
}

impl Drop for Debouncer {
    fn drop(&mut self) {
        self.cancel();
    }
}

impl fmt::Debug for Debouncer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Debouncer")
            .field("delay", &self.delay)
            .field("active", &self.is_active())
            .finish()
    }
}

/// Timer-task entry: runs when the delay window elapses. The action is taken
/// and the state reset before the action executes, so a panicking action
/// still leaves the instance reusable.
fn fire_delay(state: &Mutex<Inner>, generation: u64) {
    let action = {
        let mut inner = state.lock();
        let current = inner
            .timer
            .as_ref()
            .is_some_and(|slot| slot.generation == generation);
        if !current {
            tracing::trace!(generation, "stale delay fire ignored");
            return;
        }
        inner.timer = None;
        inner.pending.take()
    };
    if let Some(mut action) = action {
        tracing::debug!(generation, "debounced action firing");
        action();
    }
}
