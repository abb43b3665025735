use std::sync::atomic::{AtomicU64, Ordering};

/// Internal counters, updated with relaxed atomics.
#[derive(Debug, Default)]
pub(crate) struct Counters {
    pub accepted: AtomicU64,
    pub dropped: AtomicU64,
    pub rejected: AtomicU64,
    pub completed: AtomicU64,
    pub failed: AtomicU64,
}

impl Counters {
    pub fn snapshot(&self) -> PipelineStats {
        PipelineStats {
            accepted: self.accepted.load(Ordering::Relaxed),
            dropped: self.dropped.load(Ordering::Relaxed),
            rejected: self.rejected.load(Ordering::Relaxed),
            completed: self.completed.load(Ordering::Relaxed),
            failed: self.failed.load(Ordering::Relaxed),
        }
    }
}

/// Point-in-time snapshot of pipeline activity.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct PipelineStats {
    /// Frames admitted for inference.
    pub accepted: u64,
    /// Frames discarded because a request was already in flight.
    pub dropped: u64,
    /// Frames discarded before admission for failing validation.
    pub rejected: u64,
    /// Requests that produced a delivered result.
    pub completed: u64,
    /// Requests discarded because inference failed.
    pub failed: u64,
}
