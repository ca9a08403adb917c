// file: src/pipeline/stats.rs
// description: per-search outcome counters and summary statistics
// reference: atomic counters shared by concurrent lookup tasks

use crate::models::SearchOutcome;
use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Instant;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ResolutionStats {
    pub keywords_dispatched: usize,
    pub matched: usize,
    pub empty: usize,
    pub failed: usize,
    pub timed_out: usize,
    pub duration_ms: u64,
}

impl ResolutionStats {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn completed(&self) -> usize {
        self.matched + self.empty + self.failed + self.timed_out
    }

    pub fn match_rate(&self) -> f64 {
        if self.keywords_dispatched == 0 {
            return 0.0;
        }
        (self.matched as f64 / self.keywords_dispatched as f64) * 100.0
    }

    pub fn lookups_per_second(&self) -> f64 {
        if self.duration_ms == 0 {
            return 0.0;
        }
        self.completed() as f64 / (self.duration_ms as f64 / 1000.0)
    }
}

pub struct StatsTracker {
    dispatched: AtomicUsize,
    matched: AtomicUsize,
    empty: AtomicUsize,
    failed: AtomicUsize,
    timed_out: AtomicUsize,
    start_time: Instant,
}

impl StatsTracker {
    pub fn new() -> Self {
        Self {
            dispatched: AtomicUsize::new(0),
            matched: AtomicUsize::new(0),
            empty: AtomicUsize::new(0),
            failed: AtomicUsize::new(0),
            timed_out: AtomicUsize::new(0),
            start_time: Instant::now(),
        }
    }

    pub fn inc_dispatched(&self) {
        self.dispatched.fetch_add(1, Ordering::SeqCst);
    }

    pub fn record(&self, outcome: &SearchOutcome) {
        let counter = match outcome {
            SearchOutcome::Matches(_) => &self.matched,
            SearchOutcome::Empty => &self.empty,
            SearchOutcome::Failed(_) => &self.failed,
            SearchOutcome::TimedOut => &self.timed_out,
        };
        counter.fetch_add(1, Ordering::SeqCst);
    }

    pub fn get_stats(&self) -> ResolutionStats {
        ResolutionStats {
            keywords_dispatched: self.dispatched.load(Ordering::SeqCst),
            matched: self.matched.load(Ordering::SeqCst),
            empty: self.empty.load(Ordering::SeqCst),
            failed: self.failed.load(Ordering::SeqCst),
            timed_out: self.timed_out.load(Ordering::SeqCst),
            duration_ms: self.start_time.elapsed().as_millis() as u64,
        }
    }
}

impl Default for StatsTracker {
    fn default() -> Self {
        Self::new()
    }
}
