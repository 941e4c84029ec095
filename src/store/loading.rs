use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

/// Reference-counted busy flag shared by every remote call.
///
/// Prefer [`LoadingGate::enter`]: the returned guard leaves the gate when it
/// drops, on every exit path.
#[derive(Debug, Clone, Default)]
pub struct LoadingGate {
    count: Arc<AtomicUsize>,
}

impl LoadingGate {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn enter(&self) -> LoadingGuard {
        let count = self.count.fetch_add(1, Ordering::SeqCst) + 1;
        tracing::trace!(count, "loading gate entered");
        LoadingGuard { gate: self.clone() }
    }

    /// Decrements the counter, clamped at zero.
    pub fn leave(&self) {
        let _ = self
            .count
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| {
                Some(n.saturating_sub(1))
            });
    }

    pub fn count(&self) -> usize {
        self.count.load(Ordering::SeqCst)
    }

    pub fn is_busy(&self) -> bool {
        self.count() > 0
    }
}

#[must_use = "the gate is left as soon as the guard is dropped"]
#[derive(Debug)]
pub struct LoadingGuard {
    gate: LoadingGate,
}

impl Drop for LoadingGuard {
    fn drop(&mut self) {
        self.gate.leave();
        tracing::trace!(count = self.gate.count(), "loading gate left");
    }
}
