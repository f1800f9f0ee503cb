//! Cooperative cancellation for service calls.

use crate::service::error::{ServiceError, ServiceResult};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Caller-owned cancellation signal.
///
/// Clones share one flag, so a caller can keep a clone and cancel a call
/// running elsewhere. Once cancelled, a token stays cancelled.
#[derive(Debug, Clone, Default)]
pub struct CancellationToken {
    cancelled: Arc<AtomicBool>,
}

impl CancellationToken {
    pub fn new() -> Self {
        Self::default()
    }

    /// Requests cancellation of every call observing this token.
    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::Relaxed);
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::Relaxed)
    }

    /// Fails with `ServiceError::Cancelled` once cancellation was requested.
    pub fn check(&self) -> ServiceResult<()> {
        if self.is_cancelled() {
            return Err(ServiceError::Cancelled);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::CancellationToken;
    use crate::service::error::ServiceError;

    #[test]
    fn clones_observe_cancellation() {
        let token = CancellationToken::new();
        let observer = token.clone();
        assert!(observer.check().is_ok());

        token.cancel();
        assert!(observer.is_cancelled());
        assert!(matches!(observer.check(), Err(ServiceError::Cancelled)));
    }
}
