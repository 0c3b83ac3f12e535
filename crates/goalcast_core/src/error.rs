use std::fmt;
use std::time::Duration;

/// Failures at the worker dispatch boundary.
///
/// The numeric routines themselves are total and never error; only the
/// transport to a background worker can fail, and the caller falls back to
/// running the same pure function inline.
#[derive(Debug, Clone)]
pub enum DispatchError {
    /// The bounded wait elapsed before the worker responded.
    Timeout(Duration),
    /// The worker thread is gone and the channel is closed.
    Disconnected,
}

impl fmt::Display for DispatchError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DispatchError::Timeout(timeout) => {
                write!(f, "worker did not respond within {timeout:?}")
            }
            DispatchError::Disconnected => write!(f, "worker thread disconnected"),
        }
    }
}

impl std::error::Error for DispatchError {}
