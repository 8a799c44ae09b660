use std::fmt;
use std::time::Duration;

/// Event and byte throughput estimated over a span of time.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
pub struct Rate {
    /// Events per second.
    pub events_per_sec: f64,

    /// Bytes per second.
    pub bytes_per_sec: f64,
}

impl Rate {
    /// Build the rate of `events` events carrying `bytes` bytes observed during `elapsed`.
    ///
    /// A zero `elapsed` yields the zero rate instead of dividing by zero.
    pub(crate) fn over(events: usize, bytes: u128, elapsed: Duration) -> Self {
        let secs = elapsed.as_secs_f64();
        if secs <= 0.0 {
            return Self::default();
        }

        Self {
            events_per_sec: events as f64 / secs,
            bytes_per_sec: bytes as f64 / secs,
        }
    }
}

impl fmt::Display for Rate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.2}/s, {:.2}B/s", self.events_per_sec, self.bytes_per_sec)
    }
}
