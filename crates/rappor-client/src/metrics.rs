//! Metrics hooks for encoder operations
//!
//! Counts reports and mask draws so an embedding application can watch
//! encoder throughput and entropy-source health. Nothing here sees secrets or
//! input values.
//!
//! ## Usage
//!
//! ```
//! use std::sync::Arc;
//! use rappor_client::{Encoder, EncoderMetrics, ParameterSet};
//!
//! let metrics = Arc::new(EncoderMetrics::new());
//! let encoder = Encoder::new(ParameterSet::default(), 3, "secret")
//!     .unwrap()
//!     .with_metrics(metrics.clone());
//!
//! encoder.encode("foo").unwrap();
//! assert_eq!(metrics.snapshot().reports_encoded, 1);
//! ```

use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

/// Metrics collector for encoder operations
///
/// Thread-safe counters; one instance may be shared by many encoders.
#[derive(Default)]
pub struct EncoderMetrics {
    /// Reports returned to callers
    pub reports_encoded: AtomicU64,
    /// Pairs of IRR masks drawn from the entropy source
    pub sessions_sampled: AtomicU64,
    /// Entropy source failures
    pub entropy_failures: AtomicU64,
    /// Cumulative encode time in nanoseconds
    pub encode_time_ns: AtomicU64,
}

impl EncoderMetrics {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a completed report
    pub fn record_report(&self, duration: Duration) {
        self.reports_encoded.fetch_add(1, Ordering::Relaxed);
        self.encode_time_ns
            .fetch_add(duration.as_nanos() as u64, Ordering::Relaxed);
    }

    /// Record a fresh `(p_gen, q_gen)` draw
    pub fn record_session_sampled(&self) {
        self.sessions_sampled.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_entropy_failure(&self) {
        self.entropy_failures.fetch_add(1, Ordering::Relaxed);
    }

    /// Get current metrics snapshot
    pub fn snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            reports_encoded: self.reports_encoded.load(Ordering::Relaxed),
            sessions_sampled: self.sessions_sampled.load(Ordering::Relaxed),
            entropy_failures: self.entropy_failures.load(Ordering::Relaxed),
            avg_encode_ns: self.avg_encode_time_ns(),
        }
    }

    /// Average encode time in nanoseconds
    pub fn avg_encode_time_ns(&self) -> u64 {
        let total = self.encode_time_ns.load(Ordering::Relaxed);
        let count = self.reports_encoded.load(Ordering::Relaxed);
        if count > 0 {
            total / count
        } else {
            0
        }
    }

    /// Reset all counters
    pub fn reset(&self) {
        self.reports_encoded.store(0, Ordering::Relaxed);
        self.sessions_sampled.store(0, Ordering::Relaxed);
        self.entropy_failures.store(0, Ordering::Relaxed);
        self.encode_time_ns.store(0, Ordering::Relaxed);
    }
}

/// Point-in-time metrics snapshot
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct MetricsSnapshot {
    pub reports_encoded: u64,
    pub sessions_sampled: u64,
    pub entropy_failures: u64,
    pub avg_encode_ns: u64,
}

/// Trait for custom metrics recording implementations
///
/// Implement this to forward encoder events to Prometheus, StatsD, or
/// OpenTelemetry.
pub trait MetricsRecorder: Send + Sync {
    fn record_report(&self, duration: Duration);

    fn record_session_sampled(&self);

    fn record_entropy_failure(&self);
}

/// No-op metrics recorder for when metrics are disabled
#[derive(Default)]
pub struct NoOpMetrics;

impl MetricsRecorder for NoOpMetrics {
    fn record_report(&self, _: Duration) {}
    fn record_session_sampled(&self) {}
    fn record_entropy_failure(&self) {}
}

impl MetricsRecorder for EncoderMetrics {
    fn record_report(&self, duration: Duration) {
        EncoderMetrics::record_report(self, duration);
    }

    fn record_session_sampled(&self) {
        EncoderMetrics::record_session_sampled(self);
    }

    fn record_entropy_failure(&self) {
        EncoderMetrics::record_entropy_failure(self);
    }
}
