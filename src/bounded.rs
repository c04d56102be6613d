//! Bounded coalescing scheduler: debounce with configurable edges and a hard
//! per-burst deadline.
//!
//! The delay window slides with every call, as in [`Debouncer`]. The
//! optional deadline timer is armed once per burst, by the burst's first
//! call, and is never restarted within the burst, so a continuously active
//! input stream cannot postpone execution past `max_wait`.
//!
//! [`Debouncer`]: crate::Debouncer

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use parking_lot::Mutex;
use tokio::runtime::Handle;

use crate::error::ConfigError;
use crate::options::DebounceOptions;
use crate::timer::{Action, TimerSlot};

#[derive(Default)]
struct Inner {
    pending: Option<Action>,
    delay: Option<TimerSlot>,
    deadline: Option<TimerSlot>,
    /// Set when the leading edge has fired for the current burst; cleared
    /// whenever the burst resolves.
    has_invoked: bool,
    /// Monotonic stamp, bumped on every state mutation. Timer generations
    /// draw from it, and a leading fire uses it to detect that the burst
    /// moved on while the action was executing.
    stamp: u64,
}

impl Inner {
    fn next_stamp(&mut self) -> u64 {
        self.stamp += 1;
        self.stamp
    }

    /// Resolve the burst: clear both timers, the pending action, and the
    /// leading-edge gate.
    fn reset_burst(&mut self) {
        if let Some(slot) = self.delay.take() {
            slot.cancel();
        }
        if let Some(slot) = self.deadline.take() {
            slot.cancel();
        }
        self.pending = None;
        self.has_invoked = false;
        self.stamp += 1;
    }
}

/// Coalesces bursts of calls with a bounded worst-case latency.
///
/// Behaves like [`Debouncer`](crate::Debouncer) with three extra controls:
///
/// - `max_wait`: a deadline measured from the burst's first call. When it
///   elapses before the delay window does, the pending action executes
///   immediately instead of waiting for calls to stop.
/// - `leading`: the burst's first call executes its action synchronously,
///   before `run` returns.
/// - `trailing`: the delay window executes the latest action when it
///   elapses (the classic debounce edge, enabled by default).
///
/// With both edges enabled, a burst executes twice, once per edge. That
/// holds even for a burst of a single call: the one action runs on the
/// leading edge and again on the trailing edge, which is why actions are
/// `FnMut` rather than `FnOnce`.
///
/// # Example
///
/// ```
/// # #[tokio::main(flavor = "current_thread", start_paused = true)]
/// # async fn main() {
/// use std::time::Duration;
/// use quiesce::{BoundedDebouncer, DebounceOptions};
///
/// let commit = BoundedDebouncer::new(
///     Duration::from_millis(150),
///     DebounceOptions {
///         max_wait: Some(Duration::from_millis(500)),
///         ..Default::default()
///     },
/// )
/// .expect("trailing edge enabled by default");
///
/// commit.run(|| println!("apply filter"));
/// assert!(commit.is_active());
/// # }
/// ```
pub struct BoundedDebouncer {
    delay: Duration,
    options: DebounceOptions,
    runtime: Handle,
    inner: Arc<Mutex<Inner>>,
}

impl BoundedDebouncer {
    /// Create a bounded scheduler.
    ///
    /// Fails with [`ConfigError::NoTriggerEdge`] when the options disable
    /// both edges, since no call could ever execute anything.
    ///
    /// # Panics
    ///
    /// Panics when called outside a Tokio runtime. The constructor captures
    /// the current handle, so later calls may come from any thread.
    pub fn new(delay: Duration, options: DebounceOptions) -> Result<Self, ConfigError> {
        options.validate()?;
        if let Some(max_wait) = options.max_wait {
            if max_wait < delay {
                tracing::warn!(
                    delay_ms = delay.as_millis() as u64,
                    max_wait_ms = max_wait.as_millis() as u64,
                    "max_wait is shorter than delay; the deadline will always win"
                );
            }
        }
        Ok(Self {
            delay,
            options,
            runtime: Handle::current(),
            inner: Arc::new(Mutex::new(Inner::default())),
        })
    }

    /// The configured quiet window.
    pub fn delay(&self) -> Duration {
        self.delay
    }

    /// The configured edge and deadline tuning.
    pub fn options(&self) -> DebounceOptions {
        self.options
    }

    /// Record `action` as the pending action and (re)schedule execution.
    ///
    /// The delay window restarts on every call; the deadline, when
    /// configured, is armed only by the burst's first call. With `leading`
    /// enabled, the burst's first call executes `action` synchronously on
    /// the caller's thread before `run` returns. Only the most recent
    /// action survives coalescing.
    pub fn run(&self, action: impl FnMut() + Send + 'static) {
        let leading_fire = {
            let mut inner = self.inner.lock();
            inner.pending = Some(Box::new(action));
            let fire_leading = self.options.leading && !inner.has_invoked;

            self.restart_delay(&mut inner);
            self.arm_deadline(&mut inner);

            if fire_leading {
                inner.has_invoked = true;
                let stamp = inner.stamp;
                inner.pending.take().map(|action| (action, stamp))
            } else {
                None
            }
        };

        // The lock is released while the action runs, so the action may
        // reenter this scheduler.
        if let Some((mut action, stamp)) = leading_fire {
            tracing::debug!("leading edge firing");
            action();
            self.restore_pending(action, stamp);
        }
    }

    /// Reset all burst state without executing anything.
    ///
    /// Idempotent; cancelling an idle scheduler is a no-op.
    pub fn cancel(&self) {
        let mut inner = self.inner.lock();
        if inner.delay.is_some() || inner.deadline.is_some() {
            tracing::trace!("burst cancelled");
        }
        inner.reset_burst();
    }

    /// Identical effect to [`cancel`](Self::cancel); signals the instance is
    /// done.
    ///
    /// Nothing forbids a later `run` from starting a fresh burst; dropping
    /// the scheduler is the hard end-of-life and performs the same cleanup.
    pub fn dispose(&self) {
        self.cancel();
    }

    /// Execute the pending action now, if any, and resolve the burst.
    ///
    /// A manual counterpart of the deadline fire: it is not gated on
    /// `trailing`, so it executes a pending action even on a leading-only
    /// scheduler. Returns whether an action ran.
    pub fn flush(&self) -> bool {
        let action = {
            let mut inner = self.inner.lock();
            let action = inner.pending.take();
            inner.reset_burst();
            action
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

    /// Whether the delay window or the burst deadline is currently armed.
    pub fn is_active(&self) -> bool {
        let inner = self.inner.lock();
        inner.delay.is_some() || inner.deadline.is_some()
    }

    fn restart_delay(&self, inner: &mut Inner) {
        if let Some(slot) = inner.delay.take() {
            slot.cancel();
        }
        let generation = inner.next_stamp();
        let state = Arc::clone(&self.inner);
        let trailing = self.options.trailing;
        inner.delay = Some(TimerSlot::arm(
            &self.runtime,
            self.delay,
            generation,
            move || fire_delay(&state, generation, trailing),
        ));
        tracing::trace!(
            delay_ms = self.delay.as_millis() as u64,
            generation,
            "delay window armed"
        );
    }

    /// Arm the per-burst deadline if configured and not already running.
    /// Unlike the delay window it never restarts within a burst, keeping the
    /// deadline measured from the burst's first call.
    fn arm_deadline(&self, inner: &mut Inner) {
        if inner.deadline.is_some() {
            return;
        }
        let Some(max_wait) = self.options.max_wait else {
            return;
        };
        let generation = inner.next_stamp();
        let state = Arc::clone(&self.inner);
        inner.deadline = Some(TimerSlot::arm(
            &self.runtime,
            max_wait,
            generation,
            move || fire_deadline(&state, generation),
        ));
        tracing::trace!(
            max_wait_ms = max_wait.as_millis() as u64,
            generation,
            "burst deadline armed"
        );
    }

    /// Put a leading-fired action back into the pending slot as the
    /// trailing/deadline candidate, unless the burst moved on (a reentrant
    /// `run`, a cancel, or a timer fire) while the action was executing.
    fn restore_pending(&self, action: Action, stamp: u64) {
        let mut inner = self.inner.lock();
        if inner.stamp == stamp {
            inner.pending = Some(action);
        }
    }
}

impl Drop for BoundedDebouncer {
    fn drop(&mut self) {
        self.cancel();
    }
}

impl fmt::Debug for BoundedDebouncer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BoundedDebouncer")
            .field("delay", &self.delay)
            .field("options", &self.options)
            .field("active", &self.is_active())
            .finish()
    }
}

/// Delay-window wake-up: the trailing edge. The burst resets whether or not
/// anything executes; the reset happens before the action runs, so a
/// panicking action still leaves the scheduler reusable.
fn fire_delay(state: &Mutex<Inner>, generation: u64, trailing: bool) {
    let action = {
        let mut inner = state.lock();
        let current = inner
            .delay
            .as_ref()
            .is_some_and(|slot| slot.generation == generation);
        if !current {
            tracing::trace!(generation, "stale delay fire ignored");
            return;
        }
        let action = if trailing { inner.pending.take() } else { None };
        inner.reset_burst();
        action
    };
    if let Some(mut action) = action {
        tracing::debug!(generation, "trailing edge firing");
        action();
    }
}

/// Deadline wake-up: executes the pending action regardless of edge
/// configuration, so a continuously extended burst cannot starve execution.
fn fire_deadline(state: &Mutex<Inner>, generation: u64) {
    let action = {
        let mut inner = state.lock();
        let current = inner
            .deadline
            .as_ref()
            .is_some_and(|slot| slot.generation == generation);
        if !current {
            tracing::trace!(generation, "stale deadline fire ignored");
            return;
        }
        let action = inner.pending.take();
        inner.reset_burst();
        action
    };
    if let Some(mut action) = action {
        tracing::debug!(generation, "burst deadline firing");
        action();
    }
}
