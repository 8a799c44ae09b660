use std::sync::Mutex;
use std::time::Duration;

use crate::MessageSummary;

/// Round-trip latency statistics of RPCs to one remote peer.
///
/// This is a single-pass estimator: every successful RPC updates the mean, the mean of squares,
/// the standard deviation and the extremes in constant time, and no sample is retained.
/// The standard deviation is the population one, derived with
/// `sdv = sqrt(avg(x^2) - avg(x)^2)`.
///
/// `LatencyStats` itself is not synchronized. Share a [`PeerLatencyEstimator`] when RPCs to the
/// same peer complete concurrently.
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
pub struct LatencyStats {
    #[cfg_attr(feature = "serde", serde(rename = "latency"))]
    last_latency_ms: f64,

    #[cfg_attr(feature = "serde", serde(rename = "averageLatency"))]
    mean_latency_ms: f64,

    #[cfg_attr(feature = "serde", serde(rename = "averageLatencySquare"))]
    mean_squared_latency_ms: f64,

    #[cfg_attr(feature = "serde", serde(rename = "sdvLatency"))]
    std_dev_latency_ms: f64,

    /// `None` until the first success.
    #[cfg_attr(feature = "serde", serde(rename = "minLatency"))]
    min_latency_ms: Option<f64>,

    #[cfg_attr(feature = "serde", serde(rename = "maxLatency"))]
    max_latency_ms: f64,

    #[cfg_attr(feature = "serde", serde(rename = "failsCount"))]
    failure_count: u64,

    #[cfg_attr(feature = "serde", serde(rename = "successCount"))]
    success_count: u64,
}

impl LatencyStats {
    pub fn new() -> Self {
        Self::default()
    }

    /// Count one failed RPC. Latency aggregates are left untouched.
    pub fn record_failure(&mut self) {
        self.failure_count += 1;
    }

    /// Account one successful RPC that took `elapsed`.
    pub fn record_success(&mut self, elapsed: Duration) {
        let x = elapsed.as_nanos() as f64 / 1_000_000.0;
        let n = self.success_count as f64;

        self.last_latency_ms = x;

        if x > self.max_latency_ms {
            self.max_latency_ms = x;
        }
        self.min_latency_ms = Some(match self.min_latency_ms {
            Some(min) if min <= x => min,
            _ => x,
        });

        self.mean_latency_ms = (self.mean_latency_ms * n + x) / (n + 1.0);
        self.mean_squared_latency_ms = (self.mean_squared_latency_ms * n + x * x) / (n + 1.0);
        self.success_count += 1;

        // Rounding may push the variance slightly below zero when all samples are equal.
        let variance = self.mean_squared_latency_ms - self.mean_latency_ms * self.mean_latency_ms;
        self.std_dev_latency_ms = variance.max(0.0).sqrt();
    }

    /// Latency in milliseconds of the last successful RPC, 0 if there is none.
    pub fn last_latency_ms(&self) -> f64 {
        self.last_latency_ms
    }

    pub fn mean_latency_ms(&self) -> f64 {
        self.mean_latency_ms
    }

    pub fn std_dev_latency_ms(&self) -> f64 {
        self.std_dev_latency_ms
    }

    /// The smallest latency seen, 0 if there has been no successful RPC.
    pub fn min_latency_ms(&self) -> f64 {
        self.min_latency_ms.unwrap_or_default()
    }

    pub fn max_latency_ms(&self) -> f64 {
        self.max_latency_ms
    }

    pub fn success_count(&self) -> u64 {
        self.success_count
    }

    pub fn failure_count(&self) -> u64 {
        self.failure_count
    }
}

impl MessageSummary for LatencyStats {
    fn summary(&self) -> String {
        format!(
            "Latency{{succ:{}, fail:{}, last:{:.3}ms, avg:{:.3}ms, sdv:{:.3}ms, min:{:.3}ms, max:{:.3}ms}}",
            self.success_count,
            self.failure_count,
            self.last_latency_ms,
            self.mean_latency_ms,
            self.std_dev_latency_ms,
            self.min_latency_ms(),
            self.max_latency_ms,
        )
    }
}

/// Thread-safe [`LatencyStats`] of one remote peer.
///
/// One estimator is kept per peer, by whatever maintains the set of peers. Updates are
/// serialized so that concurrent RPC completions to the same peer do not interleave the
/// incremental mean computation.
#[derive(Debug, Default)]
pub struct PeerLatencyEstimator {
    stats: Mutex<LatencyStats>,
}

impl PeerLatencyEstimator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Count one failed RPC to this peer.
    pub fn record_failure(&self) {
        self.stats.lock().unwrap().record_failure();
    }

    /// Account one successful RPC to this peer that took `elapsed`.
    pub fn record_success(&self, elapsed: Duration) {
        self.stats.lock().unwrap().record_success(elapsed);
    }

    /// Return a consistent copy of the current statistics.
    pub fn stats(&self) -> LatencyStats {
        self.stats.lock().unwrap().clone()
    }
}
