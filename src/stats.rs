use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

/// Run-wide counters, shared across pool workers.
///
/// Cloning is cheap and every clone observes the same counters, so the
/// pipeline hands clones into map jobs for per-worker token tallies.
#[derive(Debug, Clone, Default)]
pub struct PipelineStats {
    lines: Arc<AtomicU64>,
    tokens: Arc<AtomicU64>,
    batches: Arc<AtomicU64>,
    map_nanos: Arc<AtomicU64>,
    merge_nanos: Arc<AtomicU64>,
}

impl PipelineStats {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record_lines(&self, n: u64) {
        self.lines.fetch_add(n, Ordering::Relaxed);
    }

    pub fn record_tokens(&self, n: u64) {
        self.tokens.fetch_add(n, Ordering::Relaxed);
    }

    pub fn record_batch(&self) {
        self.batches.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_map_time(&self, elapsed: Duration) {
        self.map_nanos
            .fetch_add(elapsed.as_nanos() as u64, Ordering::Relaxed);
    }

    pub fn record_merge_time(&self, elapsed: Duration) {
        self.merge_nanos
            .fetch_add(elapsed.as_nanos() as u64, Ordering::Relaxed);
    }

    pub fn total_lines(&self) -> u64 {
        self.lines.load(Ordering::Relaxed)
    }

    pub fn total_tokens(&self) -> u64 {
        self.tokens.load(Ordering::Relaxed)
    }

    pub fn total_batches(&self) -> u64 {
        self.batches.load(Ordering::Relaxed)
    }

    /// Get a snapshot of current counters
    pub fn snapshot(&self) -> StatsSnapshot {
        StatsSnapshot {
            lines: self.total_lines(),
            tokens: self.total_tokens(),
            batches: self.total_batches(),
            map_time: Duration::from_nanos(self.map_nanos.load(Ordering::Relaxed)),
            merge_time: Duration::from_nanos(self.merge_nanos.load(Ordering::Relaxed)),
        }
    }
}

/// A snapshot of pipeline counters at a point in time
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatsSnapshot {
    pub lines: u64,
    pub tokens: u64,
    pub batches: u64,
    pub map_time: Duration,
    pub merge_time: Duration,
}

impl StatsSnapshot {
    /// Format counters as a human-readable string
    pub fn format(&self) -> String {
        format!(
            "Lines: {}, Tokens: {}, Batches: {}, Map: {:.2}ms, Merge: {:.2}ms",
            self.lines,
            self.tokens,
            self.batches,
            self.map_time.as_secs_f64() * 1000.0,
            self.merge_time.as_secs_f64() * 1000.0,
        )
    }
}
