// Edit session metrics
//
// Counters for accepted, rejected and no-op edits plus collaborator calls

use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{Duration, Instant};

/// Counters collected over the lifetime of an editor session.
///
/// Metrics are logged when a session is closed and can be read at any time.
#[derive(Debug)]
pub struct EditMetrics {
    /// Edits that changed the meta or settings
    pub edits_applied: AtomicU64,

    /// Edits refused by validation
    pub edits_rejected: AtomicU64,

    /// Accepted edits that changed nothing
    pub edits_unchanged: AtomicU64,

    pub saves: AtomicU64,
    pub save_failures: AtomicU64,
    pub reloads: AtomicU64,
    pub reload_failures: AtomicU64,

    /// Session start time
    start_time: Instant,
}

impl EditMetrics {
    pub fn new() -> Self {
        Self {
            edits_applied: AtomicU64::new(0),
            edits_rejected: AtomicU64::new(0),
            edits_unchanged: AtomicU64::new(0),
            saves: AtomicU64::new(0),
            save_failures: AtomicU64::new(0),
            reloads: AtomicU64::new(0),
            reload_failures: AtomicU64::new(0),
            start_time: Instant::now(),
        }
    }

    pub fn record_applied(&self) {
        self.edits_applied.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_rejected(&self) {
        self.edits_rejected.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_unchanged(&self) {
        self.edits_unchanged.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_save(&self, success: bool) {
        if success {
            self.saves.fetch_add(1, Ordering::Relaxed);
        } else {
            self.save_failures.fetch_add(1, Ordering::Relaxed);
        }
    }

    pub fn record_reload(&self, success: bool) {
        if success {
            self.reloads.fetch_add(1, Ordering::Relaxed);
        } else {
            self.reload_failures.fetch_add(1, Ordering::Relaxed);
        }
    }

    pub fn uptime(&self) -> Duration {
        self.start_time.elapsed()
    }

    /// Share of submitted edits that were rejected, from 0.0 to 1.0
    pub fn rejection_rate(&self) -> f64 {
        let rejected = self.edits_rejected.load(Ordering::Relaxed);
        let total = rejected
            + self.edits_applied.load(Ordering::Relaxed)
            + self.edits_unchanged.load(Ordering::Relaxed);
        if total > 0 {
            rejected as f64 / total as f64
        } else {
            0.0
        }
    }

    pub fn log_summary(&self) {
        tracing::info!("=== Edit Session Summary ===");
        tracing::info!("Session length: {:.2}s", self.uptime().as_secs_f64());
        tracing::info!(
            "Edits: {} applied, {} rejected, {} unchanged",
            self.edits_applied.load(Ordering::Relaxed),
            self.edits_rejected.load(Ordering::Relaxed),
            self.edits_unchanged.load(Ordering::Relaxed)
        );
        tracing::info!(
            "Saves: {} ok, {} failed; reloads: {} ok, {} failed",
            self.saves.load(Ordering::Relaxed),
            self.save_failures.load(Ordering::Relaxed),
            self.reloads.load(Ordering::Relaxed),
            self.reload_failures.load(Ordering::Relaxed)
        );
    }
}

impl Default for EditMetrics {
    fn default() -> Self {
        Self::new()
    }
}
