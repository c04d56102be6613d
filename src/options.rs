use std::time::Duration;

use crate::error::ConfigError;

/// Tuning for a [`BoundedDebouncer`](crate::BoundedDebouncer).
///
/// The default is the classic trailing-edge debounce: no deadline, no
/// leading execution.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DebounceOptions {
    /// Hard upper bound on how long a burst may postpone execution, measured
    /// from the burst's first `run` call. `None` disables the deadline.
    ///
    /// Should be at least the delay to be meaningful; shorter values are
    /// accepted (the deadline then always wins) but logged as suspect.
    pub max_wait: Option<Duration>,
    /// Execute on the burst's first call, before any delay elapses.
    pub leading: bool,
    /// Execute when the delay elapses after the last call.
    pub trailing: bool,
}

impl Default for DebounceOptions {
    fn default() -> Self {
        Self {
            max_wait: None,
            leading: false,
            trailing: true,
        }
    }
}

impl DebounceOptions {
    /// At least one edge must be able to trigger execution.
    pub(crate) fn validate(&self) -> Result<(), ConfigError> {
        if !self.leading && !self.trailing {
            return Err(ConfigError::NoTriggerEdge);
        }
        Ok(())
    }
}
