use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use crate::error::PaginationError;

/// Cooperative cancellation for a running pagination request.
///
/// Clones share one flag. The engine checks it before measuring and between
/// page captures; a capture already in flight is allowed to finish.
#[derive(Debug, Clone, Default)]
pub struct CancelToken {
    cancelled: Arc<AtomicBool>,
}

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::SeqCst)
    }

    /// `Err(Cancelled)` once cancelled, reporting `completed` of `total` pages
    pub fn check(&self, completed: usize, total: usize) -> Result<(), PaginationError> {
        if self.is_cancelled() {
            log::warn!("Render cancelled after {} of {} pages", completed, total);
            Err(PaginationError::Cancelled { completed, total })
        } else {
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clones_share_state() {
        let token = CancelToken::new();
        let handle = token.clone();
        assert!(token.check(0, 3).is_ok());

        handle.cancel();
        assert!(token.is_cancelled());
        assert!(matches!(
            token.check(1, 3),
            Err(PaginationError::Cancelled { completed: 1, total: 3 })
        ));
    }
}
