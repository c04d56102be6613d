use thiserror::Error;

/// Errors raised while validating scheduler configuration.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum ConfigError {
    /// Neither edge can trigger execution, so the scheduler could never run
    /// anything it is given.
    #[error("at least one of `leading` or `trailing` must be enabled")]
    NoTriggerEdge,
}
