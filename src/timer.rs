//! One-shot timer tasks with stale-fire filtering.
//!
//! Each armed timer is a detached Tokio task that sleeps and then runs a
//! fire callback. Aborting the task is best-effort: a task whose sleep has
//! already elapsed can still run to completion, so every arm also carries a
//! generation stamp and owners must re-check that stamp under their state
//! lock before honoring a fire.

use std::time::Duration;

use tokio::runtime::Handle;
use tokio::task::AbortHandle;

/// Callable scheduled by a debouncer. Argument-less and value-less; `FnMut`
/// because a leading+trailing burst can legally execute the same action on
/// both edges.
pub(crate) type Action = Box<dyn FnMut() + Send + 'static>;

/// A single outstanding wake-up.
///
/// Owners keep at most one slot per timer role and replace the whole slot
/// when re-arming; the generation of the slot currently in place is the only
/// one whose fire is honored.
pub(crate) struct TimerSlot {
    pub(crate) generation: u64,
    abort: AbortHandle,
}

impl TimerSlot {
    /// Spawn a one-shot timer on `runtime`. `on_fire` runs on the runtime
    /// after `after` has elapsed, unless the slot is cancelled first.
    pub(crate) fn arm(
        runtime: &Handle,
        after: Duration,
        generation: u64,
        on_fire: impl FnOnce() + Send + 'static,
    ) -> Self {
        let task = runtime.spawn(async move {
            tokio::time::sleep(after).await;
            on_fire();
        });
        Self {
            generation,
            abort: task.abort_handle(),
        }
    }

    /// Abort the underlying task. Harmless if it already fired or was
    /// never polled.
    pub(crate) fn cancel(self) {
        self.abort.abort();
    }
}
