// file: src/utils/telemetry.rs
// description: timing utilities for search observability

use crate::pipeline::ResolutionStats;
use std::time::{Duration, Instant};
use tracing::{debug, info};

/// Operation timer for performance tracking
pub struct OperationTimer {
    operation: String,
    start: Instant,
}

impl OperationTimer {
    pub fn new(operation: &str) -> Self {
        debug!("Starting operation: {}", operation);
        Self {
            operation: operation.to_string(),
            start: Instant::now(),
        }
    }

    pub fn elapsed(&self) -> Duration {
        self.start.elapsed()
    }

    pub fn finish(self) -> Duration {
        let elapsed = self.elapsed();
        info!(
            "Completed operation: {} in {:.2}s",
            self.operation,
            elapsed.as_secs_f64()
        );
        elapsed
    }

    /// Logs the outcome counts of a finished keyword search.
    pub fn finish_search(self, stats: &ResolutionStats) -> Duration {
        let elapsed = self.elapsed();
        info!(
            "Completed operation: {} in {:.3}s - {}/{} matched ({:.1}%), {} empty, {} failed, {} timed out, {:.1} lookups/sec",
            self.operation,
            elapsed.as_secs_f64(),
            stats.matched,
            stats.keywords_dispatched,
            stats.match_rate(),
            stats.empty,
            stats.failed,
            stats.timed_out,
            stats.lookups_per_second()
        );
        elapsed
    }
}
