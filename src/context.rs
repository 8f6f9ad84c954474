//! Deadline and cancellation propagation

use crate::error::WalkError;
use std::{
    sync::{
        Arc,
        atomic::{AtomicBool, Ordering},
    },
    time::{Duration, Instant},
};

/// The ambient handle threaded through every walk step and passed to every
/// callable. Carries an optional deadline and a shared cancellation flag.
///
/// Clones share the flag, so a clone handed to another thread doubles as a
/// cancellation handle for a walk in progress. Checks happen once per
/// recursion step: a callable that is already running is not preempted, but
/// it will not be re-entered for further segments.
#[derive(Clone, Debug, Default)]
pub struct Context {
    deadline: Option<Instant>,
    cancelled: Arc<AtomicBool>,
}

impl Context {
    /// A context with no deadline that is never cancelled
    pub fn new() -> Self {
        Self::default()
    }

    /// A context that fails walks once the absolute deadline has passed
    pub fn with_deadline(deadline: Instant) -> Self {
        Self {
            deadline: Some(deadline),
            cancelled: Arc::default(),
        }
    }

    /// A context whose deadline is `timeout` from now
    pub fn with_timeout(timeout: Duration) -> Self {
        Self::with_deadline(Instant::now() + timeout)
    }

    /// Signal every walk sharing this context to stop at its next step
    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::Relaxed);
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::Relaxed)
    }

    /// Fail if the deadline has passed or the context was cancelled. The
    /// deadline takes precedence when both hold. Long-running callables can
    /// call this themselves to stop early.
    pub fn check(&self) -> Result<(), WalkError> {
        if self.deadline.is_some_and(|deadline| Instant::now() >= deadline) {
            return Err(WalkError::DeadlineExceeded);
        }
        if self.is_cancelled() {
            return Err(WalkError::Cancelled);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unbounded() {
        let context = Context::new();
        assert!(context.check().is_ok());
        assert!(!context.is_cancelled());
    }

    #[test]
    fn test_deadline() {
        let context = Context::with_timeout(Duration::ZERO);
        assert!(matches!(context.check(), Err(WalkError::DeadlineExceeded)));
    }

    #[test]
    fn test_cancel() {
        let context = Context::new();
        assert!(context.check().is_ok());
        context.cancel();
        assert!(matches!(context.check(), Err(WalkError::Cancelled)));
    }

    /// Cancelling a clone cancels the original
    #[test]
    fn test_cancel_shared() {
        let context = Context::new();
        let handle = context.clone();
        handle.cancel();
        assert!(matches!(context.check(), Err(WalkError::Cancelled)));
    }

    /// An expired deadline wins over a cancelled flag
    #[test]
    fn test_deadline_precedence() {
        let context = Context::with_timeout(Duration::ZERO);
        context.cancel();
        assert!(matches!(context.check(), Err(WalkError::DeadlineExceeded)));
    }
}
