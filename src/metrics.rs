//! Ambient performance counters (SPEC_FULL.md §2.1, §4.8), grounded on the
//! reference codebase's own `metrics` module but trimmed to what this core
//! actually tracks: instructions dispatched, frames pushed, and built-in
//! faults observed. No metrics backend is wired up here — an embedder reads
//! these through [`VmMetrics::snapshot`].

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

#[derive(Debug, Clone, Default)]
pub struct VmMetrics {
    instructions_executed: Arc<AtomicU64>,
    frames_pushed: Arc<AtomicU64>,
    frames_popped: Arc<AtomicU64>,
    errors_raised: Arc<AtomicU64>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MetricsSnapshot {
    pub instructions_executed: u64,
    pub frames_pushed: u64,
    pub frames_popped: u64,
    pub errors_raised: u64,
}

impl VmMetrics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record_instruction(&self) {
        self.instructions_executed.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_frame_push(&self) {
        self.frames_pushed.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_frame_pop(&self) {
        self.frames_popped.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_error(&self) {
        self.errors_raised.fetch_add(1, Ordering::Relaxed);
    }

    pub fn snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            instructions_executed: self.instructions_executed.load(Ordering::Relaxed),
            frames_pushed: self.frames_pushed.load(Ordering::Relaxed),
            frames_popped: self.frames_popped.load(Ordering::Relaxed),
            errors_raised: self.errors_raised.load(Ordering::Relaxed),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn counters_accumulate() {
        let metrics = VmMetrics::new();
        metrics.record_instruction();
        metrics.record_instruction();
        metrics.record_frame_push();
        let snap = metrics.snapshot();
        assert_eq!(snap.instructions_executed, 2);
        assert_eq!(snap.frames_pushed, 1);
    }
}
